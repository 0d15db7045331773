//! Branding store
//!
//! Persists an optional uploaded logo that is embedded into generated reports.
//! The logo is device-local presentation data and outlives any session.
//! Whether the bytes decode as an image is only checked when a report is built.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{info, warn};
use std::fmt;
use std::sync::Arc;

use crate::core::constants::storage_keys;
use crate::core::error::{ArbflowError, Result};
use crate::storage::KeyValueStore;

/// Encoded image bytes as uploaded (PNG, JPEG, ...).
#[derive(Clone, PartialEq, Eq)]
pub struct BrandingAsset {
    bytes: Vec<u8>,
}

impl fmt::Debug for BrandingAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrandingAsset")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl BrandingAsset {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL, the format browser uploads
    /// produce.
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let rest = data_url.trim().strip_prefix("data:").ok_or_else(|| {
            ArbflowError::InvalidArgument("Logo data URL must start with 'data:'".to_string())
        })?;
        let (meta, payload) = rest.split_once(',').ok_or_else(|| {
            ArbflowError::InvalidArgument("Logo data URL has no payload".to_string())
        })?;
        if !meta.ends_with(";base64") {
            return Err(ArbflowError::InvalidArgument(
                "Only base64 logo data URLs are supported".to_string(),
            ));
        }
        let bytes = STANDARD.decode(payload.trim()).map_err(|e| {
            ArbflowError::InvalidArgument(format!("Logo data URL payload is not base64: {e}"))
        })?;
        Ok(Self { bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Reads and writes the logo under a fixed key, independent of any session.
#[derive(Clone)]
pub struct BrandingStore {
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for BrandingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrandingStore").finish_non_exhaustive()
    }
}

impl BrandingStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored logo, if any. An unreadable entry is reported and treated as
    /// no logo, so report generation can continue without it.
    pub fn get(&self) -> Option<BrandingAsset> {
        let encoded = match self.store.get(storage_keys::BRANDING_LOGO) {
            Ok(Some(encoded)) => encoded,
            Ok(None) => return None,
            Err(err) => {
                warn!("Could not read branding logo from storage: {err}");
                return None;
            }
        };

        match STANDARD.decode(encoded.as_bytes()) {
            Ok(bytes) => Some(BrandingAsset::from_bytes(bytes)),
            Err(err) => {
                warn!("Stored branding logo is not valid base64, ignoring it: {err}");
                None
            }
        }
    }

    /// Persist a logo, replacing the previous one.
    pub fn set(&self, asset: &BrandingAsset) -> Result<()> {
        self.store
            .set(storage_keys::BRANDING_LOGO, &STANDARD.encode(asset.bytes()))?;
        info!("Branding logo saved ({} bytes)", asset.len());
        Ok(())
    }

    /// Remove the stored logo.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(storage_keys::BRANDING_LOGO)
    }
}
