use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::api::error::{BtpAPIError, CatalogScope};
use crate::api::hierarchy::{resolve_entitlement_parent, AccountTreeClient};
use crate::api::types::entitlement::{
    AggregatedEntitlement, AssignedService, CatalogEntitlement, EntitledAndAssignedServices,
    EntitledService, EntitlementKey, EntitlementParent, SubaccountEntitlements,
};
use crate::api::utils::{
    catalog_entitlements, determine_service_from_entitled_list, find_entitled_plan,
    sum_assignments,
};

/// Read access to entitlement catalogs and assignments
///
/// Every call returns the entitled catalog together with the assignments
/// visible at that level.
#[async_trait]
pub trait EntitlementCatalogClient: Send + Sync {
    /// Catalog of the global account
    async fn list_by_global_account(&self) -> Result<EntitledAndAssignedServices, BtpAPIError>;

    /// Global account catalog plus the subaccount's assignments
    async fn list_by_subaccount(
        &self,
        subaccount_id: &str,
    ) -> Result<EntitledAndAssignedServices, BtpAPIError>;

    /// Directory catalog plus the subaccount's assignments
    async fn list_by_subaccount_with_directory_parent(
        &self,
        subaccount_id: &str,
        directory_id: &str,
    ) -> Result<EntitledAndAssignedServices, BtpAPIError>;

    /// Catalog of a directory
    async fn list_by_directory(
        &self,
        directory_id: &str,
    ) -> Result<EntitledAndAssignedServices, BtpAPIError>;
}

/// Merge assignments with the catalog, one record per assigned plan.
///
/// The assigned list drives the merge: entitled plans that were never
/// assigned do not show up, and assigned plans missing from the catalog
/// show up with empty descriptive fields. When the catalog has no plan of
/// that name, `plan_description` is the assigned plan's display name.
pub fn aggregate(
    entitled: &[EntitledService],
    assigned: &[AssignedService],
) -> BTreeMap<EntitlementKey, AggregatedEntitlement> {
    let mut result = BTreeMap::new();
    for service in assigned {
        let entitled_service = determine_service_from_entitled_list(entitled, &service.name);
        for plan in &service.plans {
            let (quota_assigned, quota_remaining) = sum_assignments(&plan.assignments);
            let plan_description = match find_entitled_plan(&entitled_service, &plan.name) {
                Some(p) => p.description.clone(),
                None => plan.display_name.clone(),
            };
            result.insert(
                EntitlementKey::new(service.name.as_str(), plan.name.as_str()),
                AggregatedEntitlement {
                    service_name: service.name.clone(),
                    service_display_name: entitled_service.display_name.clone(),
                    plan_name: plan.name.clone(),
                    plan_display_name: plan.display_name.clone(),
                    plan_description,
                    plan_unique_identifier: plan.unique_identifier.clone(),
                    quota_assigned,
                    quota_remaining,
                    category: plan.category.clone(),
                },
            );
        }
    }
    result
}

async fn fetch_for_subaccount<C>(
    catalog: &C,
    subaccount_id: &str,
    parent: &EntitlementParent,
) -> Result<EntitledAndAssignedServices, BtpAPIError>
where
    C: EntitlementCatalogClient + ?Sized,
{
    if parent.is_global_account {
        catalog
            .list_by_subaccount(subaccount_id)
            .await
            .map_err(|e| BtpAPIError::catalog(CatalogScope::GlobalAccount, e))
    } else {
        catalog
            .list_by_subaccount_with_directory_parent(subaccount_id, &parent.id)
            .await
            .map_err(|e| BtpAPIError::catalog(CatalogScope::Directory, e))
    }
}

/// Resolve the catalog owner, fetch and aggregate the subaccount's quota
pub async fn subaccount_entitlements<T, C>(
    tree: &T,
    catalog: &C,
    subaccount_id: &str,
) -> Result<SubaccountEntitlements, BtpAPIError>
where
    T: AccountTreeClient + ?Sized,
    C: EntitlementCatalogClient + ?Sized,
{
    let parent = resolve_entitlement_parent(tree, subaccount_id).await?;
    let data = fetch_for_subaccount(catalog, subaccount_id, &parent).await?;
    let entries = aggregate(&data.entitled_services, &data.assigned_services);
    Ok(SubaccountEntitlements::new(subaccount_id, parent, entries))
}

/// Look up one service plan in the catalog visible to a subaccount.
///
/// Scans the entitled list, not the assignments, so plans that were never
/// assigned are found too. Quota figures are the catalog's `amount` and
/// `remainingAmount` unchanged.
pub async fn find_entitlement<T, C>(
    tree: &T,
    catalog: &C,
    subaccount_id: &str,
    service_name: &str,
    plan_name: &str,
) -> Result<AggregatedEntitlement, BtpAPIError>
where
    T: AccountTreeClient + ?Sized,
    C: EntitlementCatalogClient + ?Sized,
{
    let parent = resolve_entitlement_parent(tree, subaccount_id).await?;
    let data = fetch_for_subaccount(catalog, subaccount_id, &parent).await?;

    let found = data
        .entitled_services
        .iter()
        .flat_map(|s| s.plans.iter().map(move |p| (s, p)))
        .find(|(s, p)| s.name == service_name && p.name == plan_name);
    match found {
        Some((service, plan)) => Ok(AggregatedEntitlement {
            service_name: service.name.clone(),
            service_display_name: service.display_name.clone(),
            plan_name: plan.name.clone(),
            plan_display_name: plan.display_name.clone(),
            plan_description: plan.description.clone(),
            plan_unique_identifier: plan.unique_identifier.clone(),
            quota_assigned: plan.amount,
            quota_remaining: plan.remaining_amount,
            category: plan.category.clone(),
        }),
        None => Err(BtpAPIError::PlanNotFound {
            subaccount_id: subaccount_id.to_string(),
            service_name: service_name.to_string(),
            plan_name: plan_name.to_string(),
        }),
    }
}

/// Every service plan entitled to a directory
pub async fn directory_entitlements<C>(
    catalog: &C,
    directory_id: &str,
) -> Result<BTreeMap<EntitlementKey, CatalogEntitlement>, BtpAPIError>
where
    C: EntitlementCatalogClient + ?Sized,
{
    let data = catalog
        .list_by_directory(directory_id)
        .await
        .map_err(|e| BtpAPIError::catalog(CatalogScope::Directory, e))?;
    Ok(catalog_entitlements(&data.entitled_services))
}

/// Every service plan entitled to the global account
pub async fn global_account_entitlements<C>(
    catalog: &C,
) -> Result<BTreeMap<EntitlementKey, CatalogEntitlement>, BtpAPIError>
where
    C: EntitlementCatalogClient + ?Sized,
{
    let data = catalog
        .list_by_global_account()
        .await
        .map_err(|e| BtpAPIError::catalog(CatalogScope::GlobalAccount, e))?;
    Ok(catalog_entitlements(&data.entitled_services))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::hierarchy::tests::FakeTree;
    use crate::api::types::account::ENTITLEMENTS_FEATURE;
    use crate::api::types::entitlement::{
        AssignedServicePlan, AssignmentInfo, EntitledServicePlan,
    };
    use std::sync::Mutex;

    /// Records which listing was called and serves fixed data
    #[derive(Default)]
    struct FakeCatalog {
        data: EntitledAndAssignedServices,
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn serve(&self, call: String) -> Result<EntitledAndAssignedServices, BtpAPIError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                return Err(BtpAPIError::Server);
            }
            Ok(self.data.clone())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EntitlementCatalogClient for FakeCatalog {
        async fn list_by_global_account(
            &self,
        ) -> Result<EntitledAndAssignedServices, BtpAPIError> {
            self.serve("global".to_string())
        }

        async fn list_by_subaccount(
            &self,
            subaccount_id: &str,
        ) -> Result<EntitledAndAssignedServices, BtpAPIError> {
            self.serve(format!("subaccount:{}", subaccount_id))
        }

        async fn list_by_subaccount_with_directory_parent(
            &self,
            subaccount_id: &str,
            directory_id: &str,
        ) -> Result<EntitledAndAssignedServices, BtpAPIError> {
            self.serve(format!("subaccount:{}:directory:{}", subaccount_id, directory_id))
        }

        async fn list_by_directory(
            &self,
            directory_id: &str,
        ) -> Result<EntitledAndAssignedServices, BtpAPIError> {
            self.serve(format!("directory:{}", directory_id))
        }
    }

    fn entitled_plan(name: &str, amount: f64, remaining: f64) -> EntitledServicePlan {
        EntitledServicePlan {
            name: name.to_string(),
            display_name: format!("{} plan", name),
            description: format!("{} description", name),
            unique_identifier: format!("uid-{}", name),
            category: "SERVICE".to_string(),
            amount,
            remaining_amount: remaining,
            ..Default::default()
        }
    }

    fn entitled(name: &str, plans: Vec<EntitledServicePlan>) -> EntitledService {
        EntitledService {
            name: name.to_string(),
            display_name: format!("{} display", name),
            plans,
            ..Default::default()
        }
    }

    fn assigned_plan(name: &str, assignments: &[(f64, f64)]) -> AssignedServicePlan {
        AssignedServicePlan {
            name: name.to_string(),
            display_name: format!("{} assigned", name),
            unique_identifier: format!("uid-{}", name),
            category: "SERVICE".to_string(),
            assignments: assignments
                .iter()
                .map(|(amount, remaining)| AssignmentInfo {
                    amount: *amount,
                    parent_remaining_amount: *remaining,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn assigned(name: &str, plans: Vec<AssignedServicePlan>) -> AssignedService {
        AssignedService {
            name: name.to_string(),
            plans,
            ..Default::default()
        }
    }

    fn hana_data() -> EntitledAndAssignedServices {
        EntitledAndAssignedServices {
            entitled_services: vec![entitled(
                "hana-cloud",
                vec![
                    entitled_plan("hana", 10.0, 4.0),
                    entitled_plan("relational-data-lake", 2.0, 2.0),
                ],
            )],
            assigned_services: vec![assigned(
                "hana-cloud",
                vec![assigned_plan("hana", &[(3.0, 2.0), (1.0, 0.0)])],
            )],
        }
    }

    #[test]
    fn multiple_assignments_are_summed() {
        let data = hana_data();
        let result = aggregate(&data.entitled_services, &data.assigned_services);
        let hana = &result[&EntitlementKey::new("hana-cloud", "hana")];
        assert_eq!(hana.quota_assigned, 4.0);
        assert_eq!(hana.quota_remaining, 2.0);
        assert_eq!(hana.plan_description, "hana description");
        assert_eq!(hana.service_display_name, "hana-cloud display");
        assert_eq!(hana.plan_unique_identifier, "uid-hana");
    }

    #[test]
    fn no_assignments_yield_zero() {
        let assigned = vec![assigned("hana-cloud", vec![assigned_plan("hana", &[])])];
        let result = aggregate(&hana_data().entitled_services, &assigned);
        let hana = &result[&EntitlementKey::new("hana-cloud", "hana")];
        assert_eq!(hana.quota_assigned, 0.0);
        assert_eq!(hana.quota_remaining, 0.0);
    }

    #[test]
    fn unassigned_catalog_plans_are_omitted() {
        let data = hana_data();
        let result = aggregate(&data.entitled_services, &data.assigned_services);
        assert_eq!(result.len(), 1);
        assert!(!result.contains_key(&EntitlementKey::new("hana-cloud", "relational-data-lake")));
    }

    #[test]
    fn assigned_plans_missing_from_catalog_are_kept() {
        let assigned = vec![assigned(
            "retired-service",
            vec![assigned_plan("legacy", &[(2.0, 1.0), (0.5, 0.5)])],
        )];
        let result = aggregate(&hana_data().entitled_services, &assigned);
        let legacy = &result[&EntitlementKey::new("retired-service", "legacy")];
        assert_eq!(legacy.service_display_name, "");
        assert_eq!(legacy.plan_description, "legacy assigned");
        assert_eq!(legacy.quota_assigned, 2.5);
        assert_eq!(legacy.quota_remaining, 1.5);
    }

    #[test]
    fn description_falls_back_to_display_name() {
        let assigned = vec![assigned("hana-cloud", vec![assigned_plan("hana-free", &[(1.0, 0.0)])])];
        let result = aggregate(&hana_data().entitled_services, &assigned);
        let free = &result[&EntitlementKey::new("hana-cloud", "hana-free")];
        assert_eq!(free.plan_description, "hana-free assigned");
        assert_eq!(free.service_display_name, "hana-cloud display");
    }

    #[test]
    fn keys_are_unique() {
        let assigned = vec![
            assigned(
                "hana-cloud",
                vec![
                    assigned_plan("hana", &[(1.0, 0.0)]),
                    assigned_plan("relational-data-lake", &[(1.0, 0.0)]),
                ],
            ),
            assigned("hana-cloud", vec![assigned_plan("hana", &[(5.0, 5.0)])]),
        ];
        let result = aggregate(&hana_data().entitled_services, &assigned);
        let keys: Vec<String> = result.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["hana-cloud:hana", "hana-cloud:relational-data-lake"]);
        assert_eq!(
            result[&EntitlementKey::new("hana-cloud", "hana")].quota_assigned,
            5.0
        );
    }

    #[tokio::test]
    async fn subaccount_below_global_account() {
        let tree = FakeTree::default().with_subaccount("sa-1", "ga-1");
        let catalog = FakeCatalog {
            data: hana_data(),
            ..Default::default()
        };
        let view = subaccount_entitlements(&tree, &catalog, "sa-1").await.unwrap();
        assert_eq!(catalog.calls(), vec!["subaccount:sa-1"]);
        assert!(view.parent.is_global_account);
        assert_eq!(view.get("hana-cloud", "hana").unwrap().quota_assigned, 4.0);
        assert!(view.get("hana-cloud", "relational-data-lake").is_none());
    }

    #[tokio::test]
    async fn subaccount_below_entitlement_directory() {
        let tree = FakeTree::default()
            .with_subaccount("sa-1", "dir-1")
            .with_directory("dir-1", &[ENTITLEMENTS_FEATURE]);
        let catalog = FakeCatalog {
            data: hana_data(),
            ..Default::default()
        };
        let view = subaccount_entitlements(&tree, &catalog, "sa-1").await.unwrap();
        assert_eq!(catalog.calls(), vec!["subaccount:sa-1:directory:dir-1"]);
        assert_eq!(view.parent.id, "dir-1");
    }

    #[tokio::test]
    async fn subaccount_below_plain_directory() {
        let tree = FakeTree::default()
            .with_subaccount("sa-1", "dir-1")
            .with_directory("dir-1", &["DEFAULT"]);
        let catalog = FakeCatalog {
            data: hana_data(),
            ..Default::default()
        };
        subaccount_entitlements(&tree, &catalog, "sa-1").await.unwrap();
        assert_eq!(catalog.calls(), vec!["subaccount:sa-1"]);
    }

    #[tokio::test]
    async fn catalog_failure_names_branch() {
        let tree = FakeTree::default()
            .with_subaccount("sa-1", "dir-1")
            .with_directory("dir-1", &[ENTITLEMENTS_FEATURE]);
        let catalog = FakeCatalog {
            fail: true,
            ..Default::default()
        };
        match subaccount_entitlements(&tree, &catalog, "sa-1").await {
            Err(BtpAPIError::CatalogFetch { scope, .. }) => {
                assert_eq!(scope, CatalogScope::Directory)
            }
            other => panic!("unexpected {:?}", other),
        }

        let tree = FakeTree::default().with_subaccount("sa-1", "ga-1");
        match subaccount_entitlements(&tree, &catalog, "sa-1").await {
            Err(BtpAPIError::CatalogFetch { scope, .. }) => {
                assert_eq!(scope, CatalogScope::GlobalAccount)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn resolution_failure_skips_catalog() {
        let tree = FakeTree::default();
        let catalog = FakeCatalog::default();
        let err = subaccount_entitlements(&tree, &catalog, "sa-1")
            .await
            .unwrap_err();
        assert!(matches!(err, BtpAPIError::HierarchyResolution(_)));
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn find_returns_catalog_figures() {
        let tree = FakeTree::default().with_subaccount("sa-1", "ga-1");
        let catalog = FakeCatalog {
            data: hana_data(),
            ..Default::default()
        };
        let hana = find_entitlement(&tree, &catalog, "sa-1", "hana-cloud", "hana")
            .await
            .unwrap();
        assert_eq!(hana.quota_assigned, 10.0);
        assert_eq!(hana.quota_remaining, 4.0);
        assert_eq!(hana.plan_unique_identifier, "uid-hana");
        assert_eq!(hana.category, "SERVICE");
    }

    #[tokio::test]
    async fn find_sees_unassigned_plans() {
        let tree = FakeTree::default().with_subaccount("sa-1", "ga-1");
        let catalog = FakeCatalog {
            data: hana_data(),
            ..Default::default()
        };
        let lake = find_entitlement(&tree, &catalog, "sa-1", "hana-cloud", "relational-data-lake")
            .await
            .unwrap();
        assert_eq!(lake.quota_assigned, 2.0);
    }

    #[tokio::test]
    async fn find_missing_plan() {
        let tree = FakeTree::default().with_subaccount("sa-1", "ga-1");
        let catalog = FakeCatalog {
            data: hana_data(),
            ..Default::default()
        };
        match find_entitlement(&tree, &catalog, "sa-1", "hana-cloud", "hana-free").await {
            Err(BtpAPIError::PlanNotFound {
                subaccount_id,
                service_name,
                plan_name,
            }) => {
                assert_eq!(subaccount_id, "sa-1");
                assert_eq!(service_name, "hana-cloud");
                assert_eq!(plan_name, "hana-free");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn directory_listing_is_flat() {
        let catalog = FakeCatalog {
            data: hana_data(),
            ..Default::default()
        };
        let listing = directory_entitlements(&catalog, "dir-1").await.unwrap();
        assert_eq!(catalog.calls(), vec!["directory:dir-1"]);
        assert_eq!(listing.len(), 2);
        let hana = &listing[&EntitlementKey::new("hana-cloud", "hana")];
        assert_eq!(hana.amount, 10.0);
        assert_eq!(hana.remaining_amount, 4.0);
    }

    #[tokio::test]
    async fn global_account_listing() {
        let catalog = FakeCatalog {
            data: hana_data(),
            ..Default::default()
        };
        let listing = global_account_entitlements(&catalog).await.unwrap();
        assert_eq!(catalog.calls(), vec!["global"]);
        assert!(listing.contains_key(&EntitlementKey::new("hana-cloud", "relational-data-lake")));
    }
}
