//! Tenant workspace snapshot
//!
//! One complete, validated server response. Snapshots are replaced wholesale on
//! every successful load and never mutated in place.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-channel traffic record, used for both measured and forecast rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub source: String,
    pub campaign: String,
    #[serde(deserialize_with = "deserialize_count")]
    pub users: u64,
    #[serde(deserialize_with = "deserialize_count")]
    pub views: u64,
}

/// Forecast rows are model output and may carry fractions; counts are rounded
/// to the nearest whole number. Negative or non-finite values are rejected.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value.round() as u64)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a non-negative count, got {value}"
        )))
    }
}

/// A selectable sub-property of the tenant's analytics source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub is_anomaly: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub primary_focus: String,
    pub reason: String,
    pub action_item: String,
}

/// Data availability reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    /// Data is available. The live backend reports this as `connected`.
    #[serde(alias = "connected")]
    Ready,
    Pending,
    PendingIntegration,
}

impl SnapshotStatus {
    /// Whether the tenant still has to connect a data source
    pub fn awaits_integration(self) -> bool {
        matches!(
            self,
            SnapshotStatus::Pending | SnapshotStatus::PendingIntegration
        )
    }
}

/// A summary metric. The server mixes counts, ratios and preformatted text
/// such as `"42%"` or `"-"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(n) => write!(f, "{n}"),
            MetricValue::Float(x) => write!(f, "{x}"),
            MetricValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Reasons a response body is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Body is not JSON or a field has the wrong shape
    Malformed(String),
    /// A required field is absent
    MissingField(&'static str),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Malformed(msg) => write!(f, "malformed dashboard payload: {msg}"),
            SnapshotError::MissingField(field) => {
                write!(f, "dashboard payload is missing required field '{field}'")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<RawSnapshot>,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    company_name: Option<String>,
    summary: Option<BTreeMap<String, MetricValue>>,
    post_level: Option<Vec<ChannelRecord>>,
    forecast: Option<Vec<ChannelRecord>>,
    properties: Option<Vec<Property>>,
    active_property_id: Option<String>,
    anomaly: Option<Anomaly>,
    suggestions: Option<Suggestions>,
    status: Option<SnapshotStatus>,
    // Older servers send the KPIs at top level instead of under `summary`
    active_users: Option<MetricValue>,
    page_views: Option<MetricValue>,
    bounce_rate: Option<MetricValue>,
}

/// Validated tenant analytics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkspaceSnapshot {
    pub company_name: String,
    pub summary: Option<BTreeMap<String, MetricValue>>,
    pub post_level: Option<Vec<ChannelRecord>>,
    pub forecast: Option<Vec<ChannelRecord>>,
    pub properties: Option<Vec<Property>>,
    pub active_property_id: Option<String>,
    pub anomaly: Option<Anomaly>,
    pub suggestions: Option<Suggestions>,
    pub status: SnapshotStatus,
}

impl WorkspaceSnapshot {
    /// Parse and validate a `{ "data": { ... } }` response body.
    pub fn from_response_body(body: &str) -> Result<Self, SnapshotError> {
        let envelope: Envelope =
            serde_json::from_str(body).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
        let raw = envelope.data.ok_or(SnapshotError::MissingField("data"))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSnapshot) -> Result<Self, SnapshotError> {
        let company_name = raw
            .company_name
            .ok_or(SnapshotError::MissingField("company_name"))?;
        let status = raw.status.ok_or(SnapshotError::MissingField("status"))?;

        let summary = raw.summary.or_else(|| {
            let legacy: BTreeMap<String, MetricValue> = [
                ("active_users", raw.active_users),
                ("page_views", raw.page_views),
                ("bounce_rate", raw.bounce_rate),
            ]
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
            .collect();
            (!legacy.is_empty()).then_some(legacy)
        });

        Ok(Self {
            company_name,
            summary,
            post_level: raw.post_level,
            forecast: raw.forecast,
            properties: raw.properties,
            active_property_id: raw.active_property_id.filter(|id| !id.is_empty()),
            anomaly: raw.anomaly,
            suggestions: raw.suggestions,
            status,
        })
    }

    /// Measured channel rows, empty when absent
    pub fn post_level(&self) -> &[ChannelRecord] {
        self.post_level.as_deref().unwrap_or_default()
    }

    /// Forecast rows, empty when absent
    pub fn forecast(&self) -> &[ChannelRecord] {
        self.forecast.as_deref().unwrap_or_default()
    }

    /// Selectable properties, empty when absent
    pub fn properties(&self) -> &[Property] {
        self.properties.as_deref().unwrap_or_default()
    }
}
