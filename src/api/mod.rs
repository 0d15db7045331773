//! Analytics API collaborator
//!
//! The controller reaches the server only through [`AnalyticsApi`], so the
//! transport can be swapped for a scripted fake in tests.

pub mod client;

pub use client::HttpAnalyticsClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::constants::endpoints;
use crate::core::error::{ArbflowError, Result};
use crate::workspace::snapshot::WorkspaceSnapshot;

/// Failure of a request to the analytics server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 401: the session is invalid or expired
    Unauthorized,
    /// Any other non-2xx response
    Status { code: u16, message: String },
    /// Connection, DNS, TLS or timeout failure
    Transport(String),
    /// Response body could not be understood
    Parse(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "session is no longer authorized"),
            ApiError::Status { code, message } => write!(f, "server returned {code}: {message}"),
            ApiError::Transport(msg) => write!(f, "could not reach server: {msg}"),
            ApiError::Parse(msg) => write!(f, "unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Credentials for connecting a data source to the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationRequest {
    pub provider: String,
    pub property_id: String,
    pub service_account_json: String,
}

impl IntegrationRequest {
    /// Build a request for the default provider.
    pub fn new(property_id: impl Into<String>, service_account_json: impl Into<String>) -> Self {
        Self {
            provider: endpoints::DEFAULT_PROVIDER.to_string(),
            property_id: property_id.into(),
            service_account_json: service_account_json.into(),
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Client-side required-field checks, run before anything is sent.
    pub fn validate(&self) -> Result<()> {
        if self.provider.trim().is_empty() {
            return Err(ArbflowError::InvalidArgument(
                "Provider is required".to_string(),
            ));
        }
        if self.property_id.trim().is_empty() {
            return Err(ArbflowError::InvalidArgument(
                "Property ID is required".to_string(),
            ));
        }
        if self.service_account_json.trim().is_empty() {
            return Err(ArbflowError::InvalidArgument(
                "Service account key is required".to_string(),
            ));
        }
        let parsed: serde_json::Value = serde_json::from_str(&self.service_account_json)
            .map_err(|e| {
                ArbflowError::InvalidArgument(format!("Service account key is not valid JSON: {e}"))
            })?;
        if !parsed.is_object() {
            return Err(ArbflowError::InvalidArgument(
                "Service account key must be a JSON object".to_string(),
            ));
        }
        Ok(())
    }
}

/// What the server returns for a saved integration. The key is never echoed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntegrationReceipt {
    pub id: i64,
    pub provider: String,
    pub property_id: String,
}

#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// `GET /api/v1/analytics/dashboard[?property_id=<id>]`
    async fn fetch_dashboard(
        &self,
        token: &str,
        property_id: Option<&str>,
    ) -> std::result::Result<WorkspaceSnapshot, ApiError>;

    /// `POST /api/v1/integrations/`
    async fn submit_integration(
        &self,
        token: &str,
        request: &IntegrationRequest,
    ) -> std::result::Result<IntegrationReceipt, ApiError>;
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn test_integration_request__defaults_to_google_analytics() {
        let request = IntegrationRequest::new("123456789", r#"{"type": "service_account"}"#);
        assert_eq!(request.provider, "google_analytics");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_integration_request__with_provider() {
        let request = IntegrationRequest::new("1", "{}").with_provider("meta_ads");
        assert_eq!(request.provider, "meta_ads");
    }

    #[test]
    fn test_integration_request__validate_required_fields() {
        assert!(IntegrationRequest::new("", "{}").validate().is_err());
        assert!(IntegrationRequest::new("1", "  ").validate().is_err());
        assert!(IntegrationRequest::new("1", "{}")
            .with_provider(" ")
            .validate()
            .is_err());
    }

    #[test]
    fn test_integration_request__validate_key_is_json_object() {
        assert!(IntegrationRequest::new("1", "not json").validate().is_err());
        assert!(IntegrationRequest::new("1", "[1, 2]").validate().is_err());
    }

    #[test]
    fn test_integration_request__serializes_wire_names() {
        let request = IntegrationRequest::new("42", "{}");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["provider"], "google_analytics");
        assert_eq!(json["property_id"], "42");
        assert_eq!(json["service_account_json"], "{}");
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            ApiError::Status {
                code: 500,
                message: "boom".to_string()
            }
            .to_string(),
            "server returned 500: boom"
        );
        assert!(ApiError::Unauthorized.is_unauthorized());
        assert!(!ApiError::Transport("x".to_string()).is_unauthorized());
    }
}
