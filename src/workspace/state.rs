//! View state machine
//!
//! The view state is the whole observable surface toward rendering. It only
//! changes through [`ViewState::apply`], a pure `(State, Event) -> State`
//! function.

use std::fmt;
use std::sync::Arc;

use super::snapshot::WorkspaceSnapshot;

/// What the rendering layer may show. Exactly one holds at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Ready(Arc<WorkspaceSnapshot>),
    SessionExpired,
    PendingIntegration,
    Error(String),
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// A load was issued
    Started,
    /// A load returned a snapshot with data
    Succeeded(Arc<WorkspaceSnapshot>),
    /// A load returned a snapshot whose tenant has no data source yet
    PendingIntegration,
    /// The server rejected the session
    Unauthorized,
    /// Transport or parse failure
    Failed(String),
    /// The user picked a different property; the current snapshot is stale
    SelectionChanged,
    /// The session ended locally (logout, or no session at load time)
    SignedOut,
}

impl ViewState {
    /// Next state for `event`. Every event fully determines the next state, so
    /// no snapshot from an earlier state can survive a non-success event.
    pub fn apply(self, event: LoadEvent) -> ViewState {
        match event {
            LoadEvent::Started | LoadEvent::SelectionChanged => ViewState::Loading,
            LoadEvent::Succeeded(snapshot) => ViewState::Ready(snapshot),
            LoadEvent::PendingIntegration => ViewState::PendingIntegration,
            LoadEvent::Unauthorized | LoadEvent::SignedOut => ViewState::SessionExpired,
            LoadEvent::Failed(message) => ViewState::Error(message),
        }
    }

    /// The snapshot that may be rendered, only in `Ready`
    pub fn snapshot(&self) -> Option<&Arc<WorkspaceSnapshot>> {
        match self {
            ViewState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// Short machine-friendly name of the state
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Ready(_) => "ready",
            ViewState::SessionExpired => "session_expired",
            ViewState::PendingIntegration => "pending_integration",
            ViewState::Error(_) => "error",
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::Loading
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewState::Ready(snapshot) => write!(f, "ready ({})", snapshot.company_name),
            ViewState::Error(message) => write!(f, "error: {message}"),
            other => write!(f, "{}", other.name()),
        }
    }
}
