use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::api::error::BtpAPIError;

/// Catalog entry of a plan that could be granted
#[allow(missing_docs)]
#[serde_as]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntitledServicePlan {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub display_name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub description: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub unique_identifier: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub category: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub amount: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub remaining_amount: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub auto_assign: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub auto_distribute_amount: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub unlimited: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub provided_by: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub beta: bool,
}

/// Catalog entry of a service; plan names are unique within it
#[allow(missing_docs)]
#[serde_as]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntitledService {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub display_name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub description: String,
    #[serde(rename = "servicePlans")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub plans: Vec<EntitledServicePlan>,
}

/// One quota grant to a subaccount
#[allow(missing_docs)]
#[serde_as]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignmentInfo {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub amount: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub parent_remaining_amount: f64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub entity_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub entity_type: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub parent_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub parent_type: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub auto_assign: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub auto_distribute_amount: i64,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub entity_state: String,
}

/// Plan actually granted to a subaccount, possibly by several assignments
#[allow(missing_docs)]
#[serde_as]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignedServicePlan {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub display_name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub unique_identifier: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub category: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub beta: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub unlimited: bool,
    #[serde(rename = "assignmentInfo")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub assignments: Vec<AssignmentInfo>,
}

#[allow(missing_docs)]
#[serde_as]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignedService {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub display_name: String,
    #[serde(rename = "servicePlans")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub plans: Vec<AssignedServicePlan>,
}

/// Response of one entitlement listing call
#[allow(missing_docs)]
#[serde_as]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntitledAndAssignedServices {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub entitled_services: Vec<EntitledService>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub assigned_services: Vec<AssignedService>,
}

/// Map key identifying a service plan
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntitlementKey {
    /// Technical service name
    pub service_name: String,
    /// Technical plan name
    pub plan_name: String,
}

impl EntitlementKey {
    /// Creates new key
    pub fn new<S: Into<String>, P: Into<String>>(service_name: S, plan_name: P) -> Self {
        EntitlementKey {
            service_name: service_name.into(),
            plan_name: plan_name.into(),
        }
    }
}

impl fmt::Display for EntitlementKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.service_name, self.plan_name)
    }
}

/// Owner of the entitlement catalog for a subaccount
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementParent {
    /// Global account or directory id
    pub id: String,
    /// `false` when a directory with entitlement management owns the catalog
    pub is_global_account: bool,
}

/// Quota of one service plan as seen by a subaccount
#[allow(missing_docs)]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedEntitlement {
    pub service_name: String,
    pub service_display_name: String,
    pub plan_name: String,
    pub plan_display_name: String,
    pub plan_description: String,
    pub plan_unique_identifier: String,
    pub quota_assigned: f64,
    pub quota_remaining: f64,
    pub category: String,
}

/// Catalog-side view of a service plan at directory or global account level
#[allow(missing_docs)]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntitlement {
    pub service_name: String,
    pub service_display_name: String,
    pub plan_name: String,
    pub plan_display_name: String,
    pub plan_description: String,
    pub plan_unique_identifier: String,
    pub category: String,
    pub amount: f64,
    pub remaining_amount: f64,
    pub auto_assign: bool,
    pub auto_distribute_amount: i64,
    pub unlimited: bool,
}

/// Aggregated entitlements of one subaccount
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SubaccountEntitlements {
    /// Subaccount the view was built for
    pub subaccount_id: String,
    /// Catalog owner the data was read from
    pub parent: EntitlementParent,
    entries: BTreeMap<EntitlementKey, AggregatedEntitlement>,
}

impl SubaccountEntitlements {
    pub(crate) fn new(
        subaccount_id: &str,
        parent: EntitlementParent,
        entries: BTreeMap<EntitlementKey, AggregatedEntitlement>,
    ) -> Self {
        SubaccountEntitlements {
            subaccount_id: subaccount_id.to_string(),
            parent,
            entries,
        }
    }

    /// Look up a single service plan
    pub fn get(&self, service_name: &str, plan_name: &str) -> Option<&AggregatedEntitlement> {
        self.entries
            .get(&EntitlementKey::new(service_name, plan_name))
    }

    /// Iterate in key order
    pub fn iter(&self) -> impl Iterator<Item = (&EntitlementKey, &AggregatedEntitlement)> {
        self.entries.iter()
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Structured view of the entries
    pub fn entries(&self) -> &BTreeMap<EntitlementKey, AggregatedEntitlement> {
        &self.entries
    }

    /// Entries keyed by `"<service>:<plan>"`
    ///
    /// Fails when two structured keys render to the same string, e.g. a
    /// service or plan name containing `:`.
    pub fn into_flat(self) -> Result<BTreeMap<String, AggregatedEntitlement>, BtpAPIError> {
        let mut flat = BTreeMap::new();
        for (key, entitlement) in self.entries {
            match flat.entry(key.to_string()) {
                Entry::Occupied(e) => return Err(BtpAPIError::DuplicateKey(e.key().clone())),
                Entry::Vacant(e) => {
                    e.insert(entitlement);
                }
            }
        }
        Ok(flat)
    }
}
