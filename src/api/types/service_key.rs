use crate::api::error::BtpAPIError;
use log::error;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Credentials and endpoints issued for the account management API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceKey {
    /// Service endpoints
    pub endpoints: Endpoints,
    /// Token issuer credentials
    pub uaa: UaaCredentials,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    pub accounts_service_url: Url,
    pub entitlements_service_url: Url,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UaaCredentials {
    pub url: Url,
    #[serde(rename = "clientid")]
    pub client_id: String,
    #[serde(rename = "clientsecret")]
    pub client_secret: String,
}

impl ServiceKey {
    /// Parse a service key from its JSON form
    pub fn from_json(json: &str) -> Result<Self, BtpAPIError> {
        let key: ServiceKey = match serde_json::from_str(json) {
            Ok(key) => key,
            Err(e) => {
                error!("Unable to parse service key: {}", e);
                return Err(BtpAPIError::InvalidParams);
            }
        };
        if key.uaa.client_id.is_empty() || key.uaa.client_secret.is_empty() {
            error!("Service key is missing client credentials");
            return Err(BtpAPIError::InvalidParams);
        }
        Ok(key)
    }

    /// Read and parse a service key file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BtpAPIError> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(json) => ServiceKey::from_json(&json),
            Err(e) => {
                error!("Unable to read {}: {}", path.as_ref().display(), e);
                Err(BtpAPIError::InvalidParams)
            }
        }
    }
}
