use std::collections::BTreeMap;

use crate::api::types::entitlement::{
    AssignmentInfo, CatalogEntitlement, EntitledService, EntitledServicePlan, EntitlementKey,
};

/// Find a service in the entitled list by exact name, or an empty one
pub fn determine_service_from_entitled_list(
    entitled: &[EntitledService],
    service_name: &str,
) -> EntitledService {
    entitled
        .iter()
        .find(|s| s.name == service_name)
        .cloned()
        .unwrap_or_default()
}

/// Find a plan of a service by exact name
pub fn find_entitled_plan<'a>(
    service: &'a EntitledService,
    plan_name: &str,
) -> Option<&'a EntitledServicePlan> {
    service.plans.iter().find(|p| p.name == plan_name)
}

/// Sums `(amount, parentRemainingAmount)` in list order
pub fn sum_assignments(assignments: &[AssignmentInfo]) -> (f64, f64) {
    let mut assigned = 0.0;
    let mut remaining = 0.0;
    for a in assignments {
        assigned += a.amount;
        remaining += a.parent_remaining_amount;
    }
    (assigned, remaining)
}

/// One record per (service, plan) of a catalog, without aggregation
pub fn catalog_entitlements(
    entitled: &[EntitledService],
) -> BTreeMap<EntitlementKey, CatalogEntitlement> {
    let mut result = BTreeMap::new();
    for service in entitled {
        for plan in &service.plans {
            result.insert(
                EntitlementKey::new(service.name.as_str(), plan.name.as_str()),
                CatalogEntitlement {
                    service_name: service.name.clone(),
                    service_display_name: service.display_name.clone(),
                    plan_name: plan.name.clone(),
                    plan_display_name: plan.display_name.clone(),
                    plan_description: plan.description.clone(),
                    plan_unique_identifier: plan.unique_identifier.clone(),
                    category: plan.category.clone(),
                    amount: plan.amount,
                    remaining_amount: plan.remaining_amount,
                    auto_assign: plan.auto_assign,
                    auto_distribute_amount: plan.auto_distribute_amount,
                    unlimited: plan.unlimited,
                },
            );
        }
    }
    result
}
