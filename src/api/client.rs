use async_trait::async_trait;
use log::debug;
use reqwest::{Response, StatusCode};
use serde::Deserialize;

use super::{AnalyticsApi, ApiError, IntegrationReceipt, IntegrationRequest};
use crate::config::Config;
use crate::core::constants::{endpoints, http_status};
use crate::core::error::Result;
use crate::workspace::snapshot::WorkspaceSnapshot;

/// reqwest-backed implementation of [`AnalyticsApi`].
#[derive(Debug, Clone)]
pub struct HttpAnalyticsClient {
    client: reqwest::Client,
    base_url: String,
}

/// FastAPI-style error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl HttpAnalyticsClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .user_agent(config.user_agent())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read the body of a response, mapping 401 and other non-2xx statuses.
    async fn read_body(response: Response) -> std::result::Result<String, ApiError> {
        let status = response.status();
        if status.as_u16() == http_status::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(ApiError::Status {
                code: status.as_u16(),
                message: error_message(status, &body),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl AnalyticsApi for HttpAnalyticsClient {
    async fn fetch_dashboard(
        &self,
        token: &str,
        property_id: Option<&str>,
    ) -> std::result::Result<WorkspaceSnapshot, ApiError> {
        let mut request = self
            .client
            .get(self.url(endpoints::DASHBOARD))
            .bearer_auth(token);
        if let Some(id) = property_id {
            request = request.query(&[(endpoints::PROPERTY_QUERY_PARAM, id)]);
        }

        debug!("GET {} (property: {property_id:?})", endpoints::DASHBOARD);
        let response = request.send().await.map_err(transport_error)?;
        let body = Self::read_body(response).await?;

        WorkspaceSnapshot::from_response_body(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn submit_integration(
        &self,
        token: &str,
        request: &IntegrationRequest,
    ) -> std::result::Result<IntegrationReceipt, ApiError> {
        debug!("POST {} (provider: {})", endpoints::INTEGRATIONS, request.provider);
        let response = self
            .client
            .post(self.url(endpoints::INTEGRATIONS))
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        let body = Self::read_body(response).await?;

        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    let description = std::error::Error::source(&err)
        .map(|e| e.to_string())
        .unwrap_or_else(|| err.to_string());
    ApiError::Transport(description)
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|detail| !detail.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}
