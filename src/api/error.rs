use std::error::Error;
use std::fmt;

/// Which catalog branch was being read when a fetch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogScope {
    /// Entitlements owned by the global account
    GlobalAccount,
    /// Entitlements owned by a directory with entitlement management enabled
    Directory,
}

impl fmt::Display for CatalogScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogScope::GlobalAccount => write!(f, "global account"),
            CatalogScope::Directory => write!(f, "directory"),
        }
    }
}

/// Error enum for the account management API
#[derive(Debug)]
pub enum BtpAPIError {
    /// Missing session or rejected token
    InvalidCredentials,
    /// API error - see the contents
    APIError(String),
    /// Unknown error
    Unknown,
    /// Invalid parameters
    InvalidParams,
    /// Server error
    Server,
    /// The requested resource does not exist
    NotFound(String),
    /// Looking up the subaccount or its parent directory failed
    HierarchyResolution(Box<BtpAPIError>),
    /// Listing entitled or assigned services failed
    CatalogFetch {
        /// Branch that was taken
        scope: CatalogScope,
        /// Underlying failure
        source: Box<BtpAPIError>,
    },
    /// The entitlement catalog has no such service plan
    PlanNotFound {
        /// Subaccount the catalog was resolved for
        subaccount_id: String,
        /// Service name searched
        service_name: String,
        /// Plan name searched
        plan_name: String,
    },
    /// Two service plans render to the same `"<service>:<plan>"` key
    DuplicateKey(String),
}

impl BtpAPIError {
    pub(crate) fn hierarchy(source: BtpAPIError) -> Self {
        BtpAPIError::HierarchyResolution(Box::new(source))
    }

    pub(crate) fn catalog(scope: CatalogScope, source: BtpAPIError) -> Self {
        BtpAPIError::CatalogFetch {
            scope,
            source: Box::new(source),
        }
    }

    /// Maps a non-success response to an error, preferring the backend's own message
    pub(crate) fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v["error"]["message"]
                    .as_str()
                    .or_else(|| v["error_description"].as_str())
                    .map(|m| m.to_string())
            })
            .unwrap_or_else(|| body.to_string());
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                BtpAPIError::InvalidCredentials
            }
            reqwest::StatusCode::NOT_FOUND => BtpAPIError::NotFound(message),
            s if s.is_server_error() => BtpAPIError::Server,
            _ => BtpAPIError::APIError(message),
        }
    }
}

impl fmt::Display for BtpAPIError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BtpAPIError::InvalidCredentials => {
                write!(f, "Invalid Credentials")
            }
            BtpAPIError::Unknown => {
                write!(f, "Unknown Error")
            }
            BtpAPIError::Server => {
                write!(f, "Server Error")
            }
            BtpAPIError::APIError(e) => {
                write!(f, "API Error: {}", e)
            }
            BtpAPIError::InvalidParams => {
                write!(f, "Invalid Input Parameters")
            }
            BtpAPIError::NotFound(e) => {
                write!(f, "Not Found: {}", e)
            }
            BtpAPIError::HierarchyResolution(e) => {
                write!(
                    f,
                    "error determining parent features for entitlements: {}",
                    e
                )
            }
            BtpAPIError::CatalogFetch { scope, source } => {
                write!(f, "error while reading entitlements ({}): {}", scope, source)
            }
            BtpAPIError::DuplicateKey(key) => {
                write!(f, "Duplicate entitlement key: {}", key)
            }
            BtpAPIError::PlanNotFound {
                subaccount_id,
                service_name,
                plan_name,
            } => {
                write!(
                    f,
                    "plan '{}' of service '{}' not found in entitlements of subaccount '{}'",
                    plan_name, service_name, subaccount_id
                )
            }
        }
    }
}

impl Error for BtpAPIError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BtpAPIError::HierarchyResolution(e) => Some(&**e),
            BtpAPIError::CatalogFetch { source, .. } => Some(&**source),
            _ => None,
        }
    }
}
