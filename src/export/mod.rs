//! Export engine
//!
//! Turns the `post_level` rows of a `ready` snapshot into downloadable
//! documents. Without exportable rows every export is a no-op that reports
//! [`ExportOutcome::NothingToExport`].

pub mod delimited;
pub mod pdf;
pub mod report;

pub use delimited::render_delimited;
pub use report::{ReportLayout, render_report};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::branding::BrandingAsset;
use crate::core::constants::export_names::*;
use crate::core::constants::report_layout::DEFAULT_LOGO_WIDTH;
use crate::core::error::Result;
use crate::logging;
use crate::workspace::{ViewState, WorkspaceSnapshot};

const UNSAFE_FILENAME_PATTERN: &str = r"[^A-Za-z0-9_-]+";

static UNSAFE_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(UNSAFE_FILENAME_PATTERN).expect("Failed to compile filename regex pattern")
});

/// A generated document, ready to be saved or handed to a download.
#[derive(Clone, PartialEq)]
pub struct ExportDocument {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
    pub generated_at: DateTime<Utc>,
}

impl fmt::Debug for ExportDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportDocument")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .field("generated_at", &self.generated_at)
            .finish()
    }
}

impl ExportDocument {
    /// Content as text, for delimited exports
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Write the document into `dir` (created if missing) under its filename.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.bytes)?;
        logging::log_export(&self.filename, self.bytes.len(), Some(&path));
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Document(ExportDocument),
    /// No `ready` snapshot, or it has no rows
    NothingToExport,
}

impl ExportOutcome {
    pub fn document(self) -> Option<ExportDocument> {
        match self {
            ExportOutcome::Document(document) => Some(document),
            ExportOutcome::NothingToExport => None,
        }
    }

    pub fn is_nothing_to_export(&self) -> bool {
        matches!(self, ExportOutcome::NothingToExport)
    }
}

/// Reduce a company name to something safe in a filename.
pub fn tenant_safe_name(company_name: &str) -> String {
    let replaced = UNSAFE_FILENAME_CHARS.replace_all(company_name, "_");
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_TENANT.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct ExportEngine {
    logo_width_mm: f64,
}

impl Default for ExportEngine {
    fn default() -> Self {
        Self::new(DEFAULT_LOGO_WIDTH)
    }
}

impl ExportEngine {
    pub fn new(logo_width_mm: f64) -> Self {
        Self { logo_width_mm }
    }

    pub fn export_delimited(&self, state: &ViewState) -> ExportOutcome {
        let Some(snapshot) = exportable(state) else {
            return ExportOutcome::NothingToExport;
        };

        let text = render_delimited(snapshot.post_level());
        ExportOutcome::Document(ExportDocument {
            filename: filename(snapshot, DELIMITED_SUFFIX, DELIMITED_EXT),
            mime_type: "text/csv",
            bytes: text.into_bytes(),
            generated_at: Utc::now(),
        })
    }

    /// Build the paginated report. A logo that fails to decode is left out;
    /// it never prevents the report from being produced.
    pub fn export_report(&self, state: &ViewState, logo: Option<&BrandingAsset>) -> ExportOutcome {
        let Some(snapshot) = exportable(state) else {
            return ExportOutcome::NothingToExport;
        };

        let generated_at = Utc::now();
        let bytes = render_report(snapshot, logo, self.logo_width_mm, generated_at);
        ExportOutcome::Document(ExportDocument {
            filename: filename(snapshot, REPORT_SUFFIX, REPORT_EXT),
            mime_type: "application/pdf",
            bytes,
            generated_at,
        })
    }
}

fn exportable(state: &ViewState) -> Option<&WorkspaceSnapshot> {
    state
        .snapshot()
        .map(|snapshot| snapshot.as_ref())
        .filter(|snapshot| !snapshot.post_level().is_empty())
}

fn filename(snapshot: &WorkspaceSnapshot, suffix: &str, ext: &str) -> String {
    format!(
        "{}{suffix}.{ext}",
        tenant_safe_name(&snapshot.company_name)
    )
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::workspace::{ChannelRecord, SnapshotStatus};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn ready(company: &str, post_level: Option<Vec<ChannelRecord>>) -> ViewState {
        ViewState::Ready(Arc::new(WorkspaceSnapshot {
            company_name: company.to_string(),
            summary: None,
            post_level,
            forecast: None,
            properties: None,
            active_property_id: None,
            anomaly: None,
            suggestions: None,
            status: SnapshotStatus::Ready,
        }))
    }

    fn google_row() -> Vec<ChannelRecord> {
        vec![ChannelRecord {
            source: "google".to_string(),
            campaign: "brand".to_string(),
            users: 100,
            views: 500,
        }]
    }

    #[test]
    fn test_tenant_safe_name() {
        assert_eq!(tenant_safe_name("Acme Corp"), "Acme_Corp");
        assert_eq!(tenant_safe_name("  Acme / Corp!  "), "Acme_Corp");
        assert_eq!(tenant_safe_name("north-east_1"), "north-east_1");
        assert_eq!(tenant_safe_name("Café"), "Caf");
        assert_eq!(tenant_safe_name("!!!"), "Workspace");
        assert_eq!(tenant_safe_name(""), "Workspace");
    }

    #[test]
    fn test_export_delimited__exact_content() {
        let engine = ExportEngine::default();
        let document = engine
            .export_delimited(&ready("Acme Corp", Some(google_row())))
            .document()
            .unwrap();

        assert_eq!(document.filename, "Acme_Corp_Data.csv");
        assert_eq!(document.mime_type, "text/csv");
        assert_eq!(
            document.as_text(),
            Some("Source,Campaign,Users,Views\ngoogle,brand,100,500")
        );
    }

    #[test]
    fn test_export__nothing_to_export_without_rows() {
        let engine = ExportEngine::default();
        for state in [
            ready("Acme", Some(Vec::new())),
            ready("Acme", None),
            ViewState::Loading,
            ViewState::PendingIntegration,
            ViewState::SessionExpired,
            ViewState::Error("offline".to_string()),
        ] {
            assert!(engine.export_delimited(&state).is_nothing_to_export());
            assert!(engine.export_report(&state, None).is_nothing_to_export());
        }
    }

    #[test]
    fn test_export_report__filename_and_type() {
        let engine = ExportEngine::new(40.0);
        let document = engine
            .export_report(&ready("Acme Corp", Some(google_row())), None)
            .document()
            .unwrap();

        assert_eq!(document.filename, "Acme_Corp_Performance_Report.pdf");
        assert_eq!(document.mime_type, "application/pdf");
        assert!(document.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_export_report__undecodable_logo_is_skipped() {
        let engine = ExportEngine::default();
        let logo = BrandingAsset::from_bytes(vec![0x89, b'P', b'N', b'G']);

        let outcome = engine.export_report(&ready("Acme", Some(google_row())), Some(&logo));

        assert!(outcome.document().is_some());
    }

    #[test]
    fn test_write_to_dir__creates_directory() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("exports");
        let document = ExportEngine::default()
            .export_delimited(&ready("Acme", Some(google_row())))
            .document()
            .unwrap();

        let path = document.write_to_dir(&out).unwrap();

        assert_eq!(path, out.join("Acme_Data.csv"));
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "Source,Campaign,Users,Views\ngoogle,brand,100,500"
        );
    }
}
