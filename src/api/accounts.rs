use async_trait::async_trait;

use crate::api::error::BtpAPIError;
use crate::api::hierarchy::AccountTreeClient;
use crate::api::types::account::{Directory, GlobalAccount, Subaccount};
use crate::api::BtpAPI;

impl BtpAPI {
    pub async fn global_account(&self) -> Result<GlobalAccount, BtpAPIError> {
        let url = BtpAPI::endpoint(
            &self.service_key.endpoints.accounts_service_url,
            &["accounts", "v1", "globalAccount"],
        )?;
        self.get_json(url).await
    }

    pub async fn subaccount(&self, subaccount_id: &str) -> Result<Subaccount, BtpAPIError> {
        if subaccount_id.is_empty() {
            return Err(BtpAPIError::InvalidParams);
        }
        let url = BtpAPI::endpoint(
            &self.service_key.endpoints.accounts_service_url,
            &["accounts", "v1", "subaccounts", subaccount_id],
        )?;
        self.get_json(url).await
    }

    pub async fn directory(&self, directory_id: &str) -> Result<Directory, BtpAPIError> {
        if directory_id.is_empty() {
            return Err(BtpAPIError::InvalidParams);
        }
        let url = BtpAPI::endpoint(
            &self.service_key.endpoints.accounts_service_url,
            &["accounts", "v1", "directories", directory_id],
        )?;
        self.get_json(url).await
    }
}

#[async_trait]
impl AccountTreeClient for BtpAPI {
    async fn subaccount(&self, subaccount_id: &str) -> Result<Subaccount, BtpAPIError> {
        BtpAPI::subaccount(self, subaccount_id).await
    }

    async fn directory(&self, directory_id: &str) -> Result<Directory, BtpAPIError> {
        BtpAPI::directory(self, directory_id).await
    }
}
