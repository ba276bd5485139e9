use log::{error, info, warn};
use reqwest::Response;

use crate::api::error::BtpAPIError;
use crate::api::types::session::Session;
use crate::api::BtpAPI;

impl BtpAPI {
    pub async fn start_session(&mut self) -> Result<bool, BtpAPIError> {
        let url = BtpAPI::endpoint(&self.service_key.uaa.url, &["oauth", "token"])?;
        let params = [("grant_type", "client_credentials")];
        match self
            .client
            .post(url)
            .form(&params)
            .basic_auth(
                &self.service_key.uaa.client_id,
                Some(&self.service_key.uaa.client_secret),
            )
            .send()
            .await
        {
            Ok(response) => self.handle_login_response(response).await,
            Err(e) => {
                error!("{:?}", e);
                Err(BtpAPIError::Unknown)
            }
        }
    }

    async fn handle_login_response(&mut self, response: Response) -> Result<bool, BtpAPIError> {
        let status = response.status();
        if status.is_server_error() {
            error!("Server Error");
            return Err(BtpAPIError::Server);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            warn!("{} result: {}", status, response.text().await.unwrap_or_default());
            return Err(BtpAPIError::InvalidCredentials);
        }
        let new: Session = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                error!("{:?}", e);
                return Err(BtpAPIError::Unknown);
            }
        };

        self.session.update(new);

        if let Some(code) = &self.session.error {
            let message = self
                .session
                .error_description
                .clone()
                .unwrap_or_else(|| code.clone());
            error!("{}", message);
            return Err(BtpAPIError::APIError(message));
        }
        if !status.is_success() || self.session.access_token.is_none() {
            error!("{} returned no access token", status);
            return Err(BtpAPIError::APIError(format!("{} returned no access token", status)));
        }
        info!("Session started");
        Ok(true)
    }

    pub fn invalidate_session(&mut self) -> bool {
        if self.session.access_token.is_some() {
            self.session = Session::new();
            info!("Session invalidated");
            return true;
        }
        false
    }
}
