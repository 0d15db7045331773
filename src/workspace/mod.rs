//! Tenant workspace: snapshot model, view state machine, property selection
//! and the loader that ties them together.

pub mod integration;
pub mod loader;
pub mod property;
pub mod snapshot;
pub mod state;

pub use integration::connect_integration;
pub use loader::{LoadDisposition, LoadTicket, SyncIndicator, WorkspaceController};
pub use property::{PropertyResolver, ReloadRequest};
pub use snapshot::{
    Anomaly, ChannelRecord, MetricValue, Property, SnapshotError, SnapshotStatus, Suggestions,
    WorkspaceSnapshot,
};
pub use state::{LoadEvent, ViewState};
