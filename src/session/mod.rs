//! Session gate
//!
//! Holds the bearer credential and decides whether a protected view may
//! proceed. An authorization failure from the server is never retried: it
//! destroys the session and the caller must re-authenticate.

use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;

use crate::core::constants::storage_keys;
use crate::core::error::{ArbflowError, Result};
use crate::storage::KeyValueStore;

/// Why a protected view was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No session has been stored
    NoSession,
    /// The server rejected the stored session
    Unauthorized,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::NoSession => write!(f, "no active session"),
            DenialReason::Unauthorized => write!(f, "session expired or was rejected"),
        }
    }
}

/// Outcome of [`SessionGate::authorize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Granted { token: String },
    Denied { reason: DenialReason },
}

impl Authorization {
    pub fn is_granted(&self) -> bool {
        matches!(self, Authorization::Granted { .. })
    }
}

/// Gatekeeper over the stored bearer token.
#[derive(Clone)]
pub struct SessionGate {
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGate").finish_non_exhaustive()
    }
}

impl SessionGate {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Store a token issued by the external login flow.
    pub fn login(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ArbflowError::InvalidArgument(
                "Session token cannot be empty".to_string(),
            ));
        }
        self.store.set(storage_keys::SESSION_TOKEN, token)?;
        info!("Session stored");
        Ok(())
    }

    /// Whether a session token is present
    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    /// Decide whether a protected view may proceed.
    ///
    /// A store that cannot be read is treated like an absent session.
    pub fn authorize(&self) -> Authorization {
        match self.token() {
            Ok(Some(token)) => Authorization::Granted { token },
            Ok(None) => Authorization::Denied {
                reason: DenialReason::NoSession,
            },
            Err(err) => {
                warn!("Could not read session from storage: {err}");
                Authorization::Denied {
                    reason: DenialReason::NoSession,
                }
            }
        }
    }

    /// React to a 401 from any call made during a protected flow.
    pub fn on_unauthorized_response(&self) -> Authorization {
        warn!("Server rejected the session; clearing it");
        if let Err(err) = self.destroy() {
            warn!("Could not remove session from storage: {err}");
        }
        Authorization::Denied {
            reason: DenialReason::Unauthorized,
        }
    }

    /// Destroy the session. Idempotent.
    ///
    /// Fails only when the stored token could not be removed, in which case
    /// the session is still present.
    pub fn logout(&self) -> Result<()> {
        self.destroy()?;
        info!("Logged out");
        Ok(())
    }

    fn token(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(storage_keys::SESSION_TOKEN)?
            .filter(|token| !token.trim().is_empty()))
    }

    fn destroy(&self) -> Result<()> {
        self.store.remove(storage_keys::SESSION_TOKEN)?;
        debug!("Session removed from storage");
        Ok(())
    }
}
