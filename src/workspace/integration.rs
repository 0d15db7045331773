//! Data-source connection flow
//!
//! Credential submission shares the session handling of dashboard loads: a
//! 401 destroys the session the same way.

use log::info;

use crate::api::{AnalyticsApi, IntegrationReceipt, IntegrationRequest};
use crate::core::error::{ArbflowError, Result};
use crate::session::{Authorization, SessionGate};

/// Validate `request` and submit it for the current session.
pub async fn connect_integration(
    api: &dyn AnalyticsApi,
    gate: &SessionGate,
    request: &IntegrationRequest,
) -> Result<IntegrationReceipt> {
    request.validate()?;

    let token = match gate.authorize() {
        Authorization::Granted { token } => token,
        Authorization::Denied { .. } => return Err(ArbflowError::NotAuthenticated),
    };

    match api.submit_integration(&token, request).await {
        Ok(receipt) => {
            info!(
                "Connected {} property {} (integration #{})",
                receipt.provider, receipt.property_id, receipt.id
            );
            Ok(receipt)
        }
        Err(err) if err.is_unauthorized() => {
            gate.on_unauthorized_response();
            Err(ArbflowError::Api(err))
        }
        Err(err) => Err(ArbflowError::Api(err)),
    }
}
