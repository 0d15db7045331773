//! # arbflow
//!
//! Client-side workspace controller for the ArbFlow marketing-analytics
//! service. It holds the session, loads per-tenant dashboard snapshots
//! (optionally scoped to one property), derives the series shown in charts,
//! and exports the channel data as CSV or as a branded PDF report.
//!
//! ```no_run
//! use std::sync::Arc;
//! use arbflow::{Config, FileStore, HttpAnalyticsClient, SessionGate, WorkspaceController};
//!
//! # async fn run() -> arbflow::Result<()> {
//! let config = Config::default();
//! let store = Arc::new(FileStore::open(config.data_dir()?)?);
//! let api = Arc::new(HttpAnalyticsClient::new(&config)?);
//! let mut controller =
//!     WorkspaceController::new(api, SessionGate::new(store), config.sync_indicator_duration());
//!
//! let state = controller.load(false).await;
//! println!("{state}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod branding;
pub mod config;
pub mod core;
pub mod export;
pub mod logging;
pub mod series;
pub mod session;
pub mod storage;
pub mod ui;
pub mod workspace;

pub use api::{AnalyticsApi, ApiError, HttpAnalyticsClient, IntegrationReceipt, IntegrationRequest};
pub use branding::{BrandingAsset, BrandingStore};
pub use config::{CliConfig, Config};
pub use crate::core::{ArbflowError, Result};
pub use export::{ExportDocument, ExportEngine, ExportOutcome, tenant_safe_name};
pub use series::{AnomalyBanner, KpiCard, SeriesComposer};
pub use session::{Authorization, DenialReason, SessionGate};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use workspace::{
    LoadDisposition, LoadTicket, PropertyResolver, ReloadRequest, SyncIndicator, ViewState,
    WorkspaceController, WorkspaceSnapshot, connect_integration,
};
