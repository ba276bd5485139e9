use async_trait::async_trait;

use crate::api::error::BtpAPIError;
use crate::api::quota::EntitlementCatalogClient;
use crate::api::types::entitlement::EntitledAndAssignedServices;
use crate::api::BtpAPI;

impl BtpAPI {
    fn assignments_url(&self) -> Result<url::Url, BtpAPIError> {
        BtpAPI::endpoint(
            &self.service_key.endpoints.entitlements_service_url,
            &["entitlements", "v1", "assignments"],
        )
    }

    pub async fn entitlements_by_global_account(
        &self,
    ) -> Result<EntitledAndAssignedServices, BtpAPIError> {
        let url = self.assignments_url()?;
        self.get_json(url).await
    }

    pub async fn entitlements_by_subaccount(
        &self,
        subaccount_id: &str,
    ) -> Result<EntitledAndAssignedServices, BtpAPIError> {
        if subaccount_id.is_empty() {
            return Err(BtpAPIError::InvalidParams);
        }
        let mut url = self.assignments_url()?;
        url.query_pairs_mut()
            .append_pair("subaccountGUID", subaccount_id);
        self.get_json(url).await
    }

    pub async fn entitlements_by_subaccount_with_directory_parent(
        &self,
        subaccount_id: &str,
        directory_id: &str,
    ) -> Result<EntitledAndAssignedServices, BtpAPIError> {
        if subaccount_id.is_empty() || directory_id.is_empty() {
            return Err(BtpAPIError::InvalidParams);
        }
        let mut url = self.assignments_url()?;
        url.query_pairs_mut()
            .append_pair("subaccountGUID", subaccount_id)
            .append_pair("directoryGUID", directory_id);
        self.get_json(url).await
    }

    pub async fn entitlements_by_directory(
        &self,
        directory_id: &str,
    ) -> Result<EntitledAndAssignedServices, BtpAPIError> {
        if directory_id.is_empty() {
            return Err(BtpAPIError::InvalidParams);
        }
        let url = BtpAPI::endpoint(
            &self.service_key.endpoints.entitlements_service_url,
            &["entitlements", "v1", "directories", directory_id, "assignments"],
        )?;
        self.get_json(url).await
    }
}

#[async_trait]
impl EntitlementCatalogClient for BtpAPI {
    async fn list_by_global_account(&self) -> Result<EntitledAndAssignedServices, BtpAPIError> {
        self.entitlements_by_global_account().await
    }

    async fn list_by_subaccount(
        &self,
        subaccount_id: &str,
    ) -> Result<EntitledAndAssignedServices, BtpAPIError> {
        self.entitlements_by_subaccount(subaccount_id).await
    }

    async fn list_by_subaccount_with_directory_parent(
        &self,
        subaccount_id: &str,
        directory_id: &str,
    ) -> Result<EntitledAndAssignedServices, BtpAPIError> {
        self.entitlements_by_subaccount_with_directory_parent(subaccount_id, directory_id)
            .await
    }

    async fn list_by_directory(
        &self,
        directory_id: &str,
    ) -> Result<EntitledAndAssignedServices, BtpAPIError> {
        self.entitlements_by_directory(directory_id).await
    }
}
