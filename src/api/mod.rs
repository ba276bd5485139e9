use log::{debug, error, warn};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::de::DeserializeOwned;
use types::service_key::ServiceKey;
use types::session::Session;
use url::Url;

use crate::api::error::BtpAPIError;

/// Module holding the API types
pub mod types;

/// Shared entitlement lookups
pub mod utils;

/// Error type
pub mod error;

/// Account tree methods
pub mod accounts;

/// Entitlement listing methods
pub mod entitlements;

/// Entitlement owner resolution
pub mod hierarchy;

/// Quota aggregation and listings
pub mod quota;

/// Session Handling
pub mod login;

#[derive(Debug, Clone)]
pub(crate) struct BtpAPI {
    client: Client,
    pub(crate) service_key: ServiceKey,
    pub(crate) session: Session,
}

impl BtpAPI {
    pub fn new(service_key: ServiceKey) -> Result<Self, BtpAPIError> {
        let client = match BtpAPI::build_client().build() {
            Ok(client) => client,
            Err(e) => {
                error!("{:?}", e);
                return Err(BtpAPIError::Unknown);
            }
        };
        Ok(BtpAPI {
            client,
            service_key,
            session: Default::default(),
        })
    }

    fn build_client() -> ClientBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("btp-accounts/", env!("CARGO_PKG_VERSION"))),
        );
        reqwest::Client::builder().default_headers(headers)
    }

    fn authorized_get_client(&self, url: Url) -> RequestBuilder {
        self.set_authorization_header(self.client.get(url))
    }

    fn set_authorization_header(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header(
            "Authorization",
            format!(
                "{} {}",
                self.session.token_type.as_deref().unwrap_or("bearer"),
                self.session.access_token.as_deref().unwrap_or("")
            ),
        )
    }

    /// Appends path segments to a service base url
    pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, BtpAPIError> {
        let mut url = base.clone();
        {
            let mut path = match url.path_segments_mut() {
                Ok(path) => path,
                Err(_) => return Err(BtpAPIError::InvalidParams),
            };
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, BtpAPIError> {
        if self.session.access_token.is_none() {
            return Err(BtpAPIError::InvalidCredentials);
        }
        debug!("GET {}", url);
        match self.authorized_get_client(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status == reqwest::StatusCode::OK {
                    match response.json().await {
                        Ok(body) => Ok(body),
                        Err(e) => {
                            error!("{:?}", e);
                            Err(BtpAPIError::Unknown)
                        }
                    }
                } else {
                    let body = response.text().await.unwrap_or_default();
                    warn!("{} result: {}", status, body);
                    Err(BtpAPIError::from_response(status, &body))
                }
            }
            Err(e) => {
                error!("{:?}", e);
                Err(BtpAPIError::Unknown)
            }
        }
    }
}
