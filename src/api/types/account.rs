use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

/// Directory feature that delegates entitlement management to the directory
pub const ENTITLEMENTS_FEATURE: &str = "ENTITLEMENTS";

/// Leaf node of the account tree
#[allow(missing_docs)]
#[serde_as]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subaccount {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub guid: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub technical_name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub display_name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub description: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub subdomain: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub region: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub state: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub state_message: String,
    #[serde(rename = "globalAccountGUID")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub global_account_guid: String,
    #[serde(rename = "parentGUID")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub parent_guid: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub parent_type: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub parent_features: Vec<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub beta_enabled: bool,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub used_for_production: String,
}

impl Subaccount {
    /// Whether the subaccount hangs directly below the global account
    pub fn parent_is_global_account(&self) -> bool {
        self.parent_guid.is_empty() || self.parent_guid == self.global_account_guid
    }
}

/// Intermediate node of the account tree
#[allow(missing_docs)]
#[serde_as]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Directory {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub guid: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub display_name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub description: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub subdomain: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub entity_state: String,
    #[serde(rename = "globalAccountGUID")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub global_account_guid: String,
    #[serde(rename = "parentGUID")]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub parent_guid: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub parent_type: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub directory_type: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub directory_features: Vec<String>,
}

impl Directory {
    /// Whether entitlement management has been delegated to this directory
    pub fn entitlements_enabled(&self) -> bool {
        self.directory_features
            .iter()
            .any(|f| f == ENTITLEMENTS_FEATURE)
    }
}

/// Root node of the account tree
#[allow(missing_docs)]
#[serde_as]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalAccount {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub guid: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub display_name: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub description: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub subdomain: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub entity_state: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub license_type: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub commercial_model: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub cost_object_type: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub cost_object_id: String,
}
