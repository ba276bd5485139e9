use async_trait::async_trait;

use crate::api::error::BtpAPIError;
use crate::api::types::account::{Directory, Subaccount};
use crate::api::types::entitlement::EntitlementParent;

/// Read access to the account tree
#[async_trait]
pub trait AccountTreeClient: Send + Sync {
    /// Fetch a subaccount, including its parent and global account ids
    async fn subaccount(&self, subaccount_id: &str) -> Result<Subaccount, BtpAPIError>;

    /// Fetch a directory, including its enabled features
    async fn directory(&self, directory_id: &str) -> Result<Directory, BtpAPIError>;
}

/// Determine which node owns entitlement assignment for a subaccount.
///
/// A subaccount directly below the global account resolves to the global
/// account. Below a directory, the directory owns the catalog only when
/// it has the `ENTITLEMENTS` feature; otherwise it is transparent and the
/// global account is used.
///
/// Only the immediate parent is inspected. An entitlement-disabled
/// directory nested in an entitlement-enabled one still resolves to the
/// global account.
pub async fn resolve_entitlement_parent<T>(
    tree: &T,
    subaccount_id: &str,
) -> Result<EntitlementParent, BtpAPIError>
where
    T: AccountTreeClient + ?Sized,
{
    let subaccount = tree
        .subaccount(subaccount_id)
        .await
        .map_err(BtpAPIError::hierarchy)?;

    let global_account = EntitlementParent {
        id: subaccount.global_account_guid.clone(),
        is_global_account: true,
    };
    if subaccount.parent_is_global_account() {
        return Ok(global_account);
    }

    let directory = tree
        .directory(&subaccount.parent_guid)
        .await
        .map_err(BtpAPIError::hierarchy)?;
    if directory.entitlements_enabled() {
        Ok(EntitlementParent {
            id: subaccount.parent_guid,
            is_global_account: false,
        })
    } else {
        Ok(global_account)
    }
}
