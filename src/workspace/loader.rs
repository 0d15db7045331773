//! Workspace data loader
//!
//! Orchestrates dashboard loads and owns the view state. Loads are two-phase:
//! [`WorkspaceController::begin_load`] hands out a [`LoadTicket`] tagged with
//! the requested property and a generation number, and
//! [`WorkspaceController::complete_load`] applies the result only if the tag
//! still matches the current selection and no newer result was applied. This
//! lets a caller keep several fetches in flight without an older one
//! overwriting a newer selection's data.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use super::property::{PropertyResolver, ReloadRequest};
use super::snapshot::{Property, WorkspaceSnapshot};
use super::state::{LoadEvent, ViewState};
use crate::api::{AnalyticsApi, ApiError};
use crate::logging;
use crate::session::{Authorization, SessionGate};

/// One issued load.
pub struct LoadTicket {
    generation: u64,
    property_id: Option<String>,
    manual: bool,
    token: String,
}

impl fmt::Debug for LoadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadTicket")
            .field("generation", &self.generation)
            .field("property_id", &self.property_id)
            .field("manual", &self.manual)
            .finish_non_exhaustive()
    }
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Property this load was issued for
    pub fn property_id(&self) -> Option<&str> {
        self.property_id.as_deref()
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Run the request this ticket describes.
    pub async fn fetch(&self, api: &dyn AnalyticsApi) -> Result<WorkspaceSnapshot, ApiError> {
        api.fetch_dashboard(&self.token, self.property_id.as_deref())
            .await
    }
}

/// What happened to a completed load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadDisposition {
    /// The result became the current view state
    Applied(ViewState),
    /// The result was stale and dropped
    Discarded,
}

/// Transient "syncing" affordance shown after a manual refresh. Purely
/// presentational: it expires on its own and says nothing about load success.
#[derive(Debug, Clone)]
pub struct SyncIndicator {
    window: Duration,
    started_at: Option<Instant>,
}

impl SyncIndicator {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            started_at: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.started_at
            .is_some_and(|started| now.saturating_duration_since(started) < self.window)
    }
}

/// Single owner and writer of the view state.
pub struct WorkspaceController {
    api: Arc<dyn AnalyticsApi>,
    gate: SessionGate,
    resolver: PropertyResolver,
    state_tx: watch::Sender<ViewState>,
    issued_generation: u64,
    applied_generation: u64,
    /// Tickets at or below this generation belong to an ended session
    session_floor: u64,
    sync: SyncIndicator,
}

impl fmt::Debug for WorkspaceController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceController")
            .field("state", &self.state().name())
            .field("selection", &self.resolver.current())
            .field("issued_generation", &self.issued_generation)
            .field("applied_generation", &self.applied_generation)
            .finish_non_exhaustive()
    }
}

impl WorkspaceController {
    pub fn new(api: Arc<dyn AnalyticsApi>, gate: SessionGate, sync_window: Duration) -> Self {
        let (state_tx, _) = watch::channel(ViewState::Loading);
        Self {
            api,
            gate,
            resolver: PropertyResolver::new(),
            state_tx,
            issued_generation: 0,
            applied_generation: 0,
            session_floor: 0,
            sync: SyncIndicator::new(sync_window),
        }
    }

    /// Receive every view state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state_tx.subscribe()
    }

    /// Current view state
    pub fn state(&self) -> ViewState {
        self.state_tx.borrow().clone()
    }

    /// Snapshot of the current `ready` state
    pub fn snapshot(&self) -> Option<Arc<WorkspaceSnapshot>> {
        self.state_tx.borrow().snapshot().cloned()
    }

    pub fn selected_property(&self) -> Option<&str> {
        self.resolver.current()
    }

    /// Properties offered by the current snapshot, for a selector
    pub fn properties(&self) -> Vec<Property> {
        self.snapshot()
            .map(|snapshot| snapshot.properties().to_vec())
            .unwrap_or_default()
    }

    pub fn is_syncing(&self, now: Instant) -> bool {
        self.sync.is_active(now)
    }

    pub fn session(&self) -> &SessionGate {
        &self.gate
    }

    /// Issue a load for the current selection.
    ///
    /// Returns `None` without touching the network when there is no session.
    /// A manual refresh keeps the current view and lights the sync indicator;
    /// any other load shows `loading`.
    pub fn begin_load(&mut self, manual: bool) -> Option<LoadTicket> {
        let token = match self.gate.authorize() {
            Authorization::Granted { token } => token,
            Authorization::Denied { reason } => {
                log::info!("Load skipped: {reason}");
                self.end_session_loads();
                self.transition(LoadEvent::SignedOut);
                return None;
            }
        };

        if manual {
            self.sync.start(Instant::now());
        } else {
            self.transition(LoadEvent::Started);
        }

        self.issued_generation += 1;
        let ticket = LoadTicket {
            generation: self.issued_generation,
            property_id: self.resolver.current().map(str::to_string),
            manual,
            token,
        };
        logging::log_load_started(ticket.generation, ticket.property_id(), manual);
        Some(ticket)
    }

    /// Apply the result of a load, unless it is stale.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<WorkspaceSnapshot, ApiError>,
    ) -> LoadDisposition {
        if self.is_stale(&ticket) {
            logging::log_stale_result_discarded(
                ticket.generation,
                ticket.property_id(),
                self.resolver.current(),
            );
            return LoadDisposition::Discarded;
        }
        self.applied_generation = ticket.generation;

        let event = match result {
            Err(ApiError::Unauthorized) => {
                self.gate.on_unauthorized_response();
                self.end_session_loads();
                LoadEvent::Unauthorized
            }
            Err(err) => LoadEvent::Failed(err.to_string()),
            Ok(snapshot) if snapshot.status.awaits_integration() => LoadEvent::PendingIntegration,
            Ok(snapshot) => {
                if let Some(ref id) = snapshot.active_property_id {
                    self.resolver.adopt_server_default(id);
                }
                LoadEvent::Succeeded(Arc::new(snapshot))
            }
        };

        let state = self.transition(event);
        logging::log_load_outcome(ticket.generation, &state);
        LoadDisposition::Applied(state)
    }

    /// Load the current selection and return the resulting view state.
    pub async fn load(&mut self, manual: bool) -> ViewState {
        let Some(ticket) = self.begin_load(manual) else {
            return self.state();
        };
        let api = Arc::clone(&self.api);
        let result = ticket.fetch(api.as_ref()).await;
        self.complete_load(ticket, result);
        self.state()
    }

    /// Change the selected property. On a change the current snapshot is
    /// invalidated immediately and the returned reload must be issued.
    pub fn select_property(&mut self, id: Option<&str>) -> Option<ReloadRequest> {
        let reload = self.resolver.set_selection(id)?;
        self.transition(LoadEvent::SelectionChanged);
        Some(reload)
    }

    /// Select a property and, if that changed anything, load it.
    pub async fn select_and_load(&mut self, id: Option<&str>) -> ViewState {
        match self.select_property(id) {
            Some(_) => self.load(false).await,
            None => self.state(),
        }
    }

    /// End the session locally. The view expires and in-flight loads are
    /// dropped even when the stored token could not be removed; that failure
    /// is returned.
    pub fn logout(&mut self) -> crate::core::error::Result<()> {
        let removed = self.gate.logout();
        self.end_session_loads();
        self.transition(LoadEvent::SignedOut);
        removed
    }

    /// A result is stale when its scope no longer matches the selection, a
    /// newer load was already applied, or its session has ended.
    ///
    /// A default-scope ticket stays current after the server default is
    /// adopted, since adopting does not change what the user asked for.
    fn is_stale(&self, ticket: &LoadTicket) -> bool {
        let same_scope = ticket.property_id() == self.resolver.current()
            || (ticket.property_id().is_none() && !self.resolver.has_explicit_selection());

        !same_scope
            || ticket.generation < self.applied_generation
            || ticket.generation <= self.session_floor
    }

    /// Drop every load issued so far; their results belong to a dead session.
    fn end_session_loads(&mut self) {
        self.session_floor = self.issued_generation;
    }

    fn transition(&mut self, event: LoadEvent) -> ViewState {
        let next = self.state().apply(event);
        self.state_tx.send_replace(next.clone());
        next
    }
}
