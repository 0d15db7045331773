//! Property resolver
//!
//! Tracks which sub-property of the tenant is selected. `None` means the
//! default/aggregate view.

use log::debug;

/// A reload the caller must issue because the selection changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadRequest {
    pub property_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PropertyResolver {
    current: Option<String>,
    explicit: bool,
}

impl PropertyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected property
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Whether the user has picked a property themselves
    pub fn has_explicit_selection(&self) -> bool {
        self.explicit
    }

    /// Apply a user selection. An empty id selects the aggregate view.
    /// Returns the reload to issue, or `None` when nothing changed.
    pub fn set_selection(&mut self, id: Option<&str>) -> Option<ReloadRequest> {
        let id = normalize(id);
        if id == self.current {
            return None;
        }

        debug!("Property selection {:?} -> {:?}", self.current, id);
        self.current = id.clone();
        self.explicit = true;
        Some(ReloadRequest { property_id: id })
    }

    /// Reflect the server's default after a successful load. Never triggers a
    /// reload and never overrides a user selection.
    pub fn adopt_server_default(&mut self, id: &str) {
        if self.explicit {
            return;
        }
        let id = normalize(Some(id));
        if id.is_some() && id != self.current {
            debug!("Adopting server default property {id:?}");
            self.current = id;
        }
    }
}

fn normalize(id: Option<&str>) -> Option<String> {
    id.map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
