#![deny(missing_docs)]

//! # Account management API
//!
//! An asynchronous interface to the cloud account management API, focused
//! on entitlements across the account tree
//!
//! ## Current functionality
//!  - Client credentials authentication from a service key
//!  - Get Global Account, Directory and Subaccount details
//!  - Resolve which node owns entitlements for a subaccount
//!  - Aggregated quota per service plan of a subaccount
//!  - Look up a single entitled service plan
//!  - List directory and global account entitlements
//!
//! ```no_run
//! # async fn run() -> Result<(), btp_accounts::api::error::BtpAPIError> {
//! use btp_accounts::api::types::service_key::ServiceKey;
//! use btp_accounts::BtpAccounts;
//!
//! let mut btp = BtpAccounts::new(ServiceKey::from_file("service-key.json")?)?;
//! btp.login().await?;
//! for (key, entitlement) in btp.subaccount_entitlements("sa-guid").await?.iter() {
//!     println!("{} {}", key, entitlement.quota_assigned);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use log::{info, warn};

use api::error::BtpAPIError;
use api::types::account::{Directory, GlobalAccount, Subaccount};
use api::types::entitlement::{
    AggregatedEntitlement, CatalogEntitlement, EntitlementKey, EntitlementParent,
    SubaccountEntitlements,
};
use api::types::service_key::ServiceKey;
use api::types::session::Session;

use crate::api::BtpAPI;

/// Module for authenticated API communication
pub mod api;

/// Struct to manage the communication with the account management API
#[derive(Debug, Clone)]
pub struct BtpAccounts {
    btp: BtpAPI,
}

impl BtpAccounts {
    /// Creates new object for the given service key
    pub fn new(service_key: ServiceKey) -> Result<Self, BtpAPIError> {
        Ok(BtpAccounts {
            btp: BtpAPI::new(service_key)?,
        })
    }

    /// Check whether the session token is valid for at least ten more minutes
    pub fn is_logged_in(&self) -> bool {
        self.btp.session.is_valid(600)
    }

    /// Get session details
    pub fn session(&self) -> Session {
        self.btp.session.clone()
    }

    /// Update session details, e.g. from a persisted session
    pub fn set_session(&mut self, session: Session) {
        self.btp.session.update(session);
    }

    /// Obtain a token unless the current one is still valid
    pub async fn login(&mut self) -> Result<(), BtpAPIError> {
        if self.is_logged_in() {
            info!("Re-using existing session");
            return Ok(());
        }
        info!("Logging in...");
        match self.btp.start_session().await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("{}", e);
                Err(e)
            }
        }
    }

    /// Drop the current session
    pub fn logout(&mut self) -> bool {
        self.btp.invalidate_session()
    }

    /// Returns global account details
    pub async fn global_account(&self) -> Result<GlobalAccount, BtpAPIError> {
        self.btp.global_account().await
    }

    /// Returns subaccount details
    pub async fn subaccount(&self, subaccount_id: &str) -> Result<Subaccount, BtpAPIError> {
        self.btp.subaccount(subaccount_id).await
    }

    /// Returns directory details
    pub async fn directory(&self, directory_id: &str) -> Result<Directory, BtpAPIError> {
        self.btp.directory(directory_id).await
    }

    /// Returns the node that owns entitlements for a subaccount
    pub async fn resolve_entitlement_parent(
        &self,
        subaccount_id: &str,
    ) -> Result<EntitlementParent, BtpAPIError> {
        if subaccount_id.is_empty() {
            return Err(BtpAPIError::InvalidParams);
        }
        api::hierarchy::resolve_entitlement_parent(&self.btp, subaccount_id).await
    }

    /// Returns assigned and remaining quota per service plan of a subaccount
    pub async fn subaccount_entitlements(
        &self,
        subaccount_id: &str,
    ) -> Result<SubaccountEntitlements, BtpAPIError> {
        if subaccount_id.is_empty() {
            return Err(BtpAPIError::InvalidParams);
        }
        api::quota::subaccount_entitlements(&self.btp, &self.btp, subaccount_id).await
    }

    /// Returns a service plan from the catalog visible to a subaccount
    pub async fn find_entitlement(
        &self,
        subaccount_id: &str,
        service_name: &str,
        plan_name: &str,
    ) -> Result<AggregatedEntitlement, BtpAPIError> {
        if subaccount_id.is_empty() || service_name.is_empty() || plan_name.is_empty() {
            return Err(BtpAPIError::InvalidParams);
        }
        api::quota::find_entitlement(&self.btp, &self.btp, subaccount_id, service_name, plan_name)
            .await
    }

    /// Returns every service plan entitled to a directory
    pub async fn directory_entitlements(
        &self,
        directory_id: &str,
    ) -> Result<BTreeMap<EntitlementKey, CatalogEntitlement>, BtpAPIError> {
        if directory_id.is_empty() {
            return Err(BtpAPIError::InvalidParams);
        }
        api::quota::directory_entitlements(&self.btp, directory_id).await
    }

    /// Returns every service plan entitled to the global account
    pub async fn global_account_entitlements(
        &self,
    ) -> Result<BTreeMap<EntitlementKey, CatalogEntitlement>, BtpAPIError> {
        api::quota::global_account_entitlements(&self.btp).await
    }
}
