//! Series composer
//!
//! Pure projections of a `ready` snapshot for visualization. Nothing here is
//! cached; every call derives its result from the snapshot it borrows.

use crate::workspace::{ChannelRecord, Suggestions, ViewState, WorkspaceSnapshot};

/// Placeholder shown for a KPI the server did not report
pub const MISSING_METRIC: &str = "-";

/// KPI cards in display order: (label, summary key)
const KPI_CARDS: [(&str, &str); 3] = [
    ("Active Users", "active_users"),
    ("Total Views", "page_views"),
    ("Bounce Rate", "bounce_rate"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyBanner {
    pub show: bool,
    pub message: Option<String>,
}

impl AnomalyBanner {
    fn hidden() -> Self {
        Self {
            show: false,
            message: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy)]
pub struct SeriesComposer<'a> {
    snapshot: &'a WorkspaceSnapshot,
}

impl<'a> SeriesComposer<'a> {
    pub fn new(snapshot: &'a WorkspaceSnapshot) -> Self {
        Self { snapshot }
    }

    /// Composer for `state`, only when it is `ready`
    pub fn for_state(state: &'a ViewState) -> Option<Self> {
        state.snapshot().map(|snapshot| Self::new(snapshot))
    }

    /// Measured rows followed by forecast rows. Rows are not merged or
    /// deduplicated: forecast rows describe later periods.
    pub fn combined_series(&self) -> Vec<&'a ChannelRecord> {
        self.snapshot
            .post_level()
            .iter()
            .chain(self.snapshot.forecast())
            .collect()
    }

    /// Measured rows as reported, for distribution charts
    pub fn channel_aggregates(&self) -> &'a [ChannelRecord] {
        self.snapshot.post_level()
    }

    pub fn anomaly_banner(&self) -> AnomalyBanner {
        match &self.snapshot.anomaly {
            Some(anomaly) if anomaly.is_anomaly => AnomalyBanner {
                show: true,
                message: Some(anomaly.message.clone()),
            },
            _ => AnomalyBanner::hidden(),
        }
    }

    pub fn kpi_cards(&self) -> Vec<KpiCard> {
        KPI_CARDS
            .iter()
            .map(|&(label, key)| KpiCard {
                label,
                value: self
                    .snapshot
                    .summary
                    .as_ref()
                    .and_then(|summary| summary.get(key))
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| MISSING_METRIC.to_string()),
            })
            .collect()
    }

    pub fn suggestion(&self) -> Option<&'a Suggestions> {
        self.snapshot.suggestions.as_ref()
    }

    /// Heading for the workspace view
    pub fn workspace_title(&self) -> String {
        let company = self.snapshot.company_name.trim();
        if company.is_empty() {
            "Workspace Overview".to_string()
        } else {
            format!("{company} Workspace")
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::workspace::{Anomaly, MetricValue, SnapshotStatus};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn record(source: &str, users: u64) -> ChannelRecord {
        ChannelRecord {
            source: source.to_string(),
            campaign: "brand".to_string(),
            users,
            views: users * 5,
        }
    }

    fn snapshot(
        post_level: Option<Vec<ChannelRecord>>,
        forecast: Option<Vec<ChannelRecord>>,
    ) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            company_name: "Acme".to_string(),
            summary: None,
            post_level,
            forecast,
            properties: None,
            active_property_id: None,
            anomaly: None,
            suggestions: None,
            status: SnapshotStatus::Ready,
        }
    }

    #[test]
    fn test_combined_series__concatenates_in_order() {
        let snap = snapshot(
            Some(vec![record("google", 1), record("meta", 2)]),
            Some(vec![record("google", 3)]),
        );
        let composer = SeriesComposer::new(&snap);

        let users: Vec<u64> = composer.combined_series().iter().map(|r| r.users).collect();

        assert_eq!(users, vec![1, 2, 3]);
        assert_eq!(composer.combined_series(), composer.combined_series());
    }

    #[test]
    fn test_combined_series__keeps_duplicate_keys() {
        let snap = snapshot(Some(vec![record("google", 1)]), Some(vec![record("google", 1)]));
        assert_eq!(SeriesComposer::new(&snap).combined_series().len(), 2);
    }

    #[test]
    fn test_combined_series__absent_forecast_is_empty() {
        let snap = snapshot(Some(vec![record("google", 1)]), None);
        assert_eq!(SeriesComposer::new(&snap).combined_series().len(), 1);

        let empty = snapshot(None, None);
        assert!(SeriesComposer::new(&empty).combined_series().is_empty());
    }

    #[test]
    fn test_channel_aggregates__is_post_level_unmodified() {
        let rows = vec![record("google", 1), record("google", 2)];
        let snap = snapshot(Some(rows.clone()), Some(vec![record("meta", 9)]));
        assert_eq!(SeriesComposer::new(&snap).channel_aggregates(), rows.as_slice());
    }

    #[test]
    fn test_anomaly_banner() {
        let mut snap = snapshot(None, None);
        assert_eq!(
            SeriesComposer::new(&snap).anomaly_banner(),
            AnomalyBanner::hidden()
        );

        snap.anomaly = Some(Anomaly {
            is_anomaly: false,
            message: "ignored".to_string(),
        });
        assert!(!SeriesComposer::new(&snap).anomaly_banner().show);

        snap.anomaly = Some(Anomaly {
            is_anomaly: true,
            message: "Traffic dropped 40%".to_string(),
        });
        let banner = SeriesComposer::new(&snap).anomaly_banner();
        assert!(banner.show);
        assert_eq!(banner.message.as_deref(), Some("Traffic dropped 40%"));
    }

    #[test]
    fn test_kpi_cards__fill_missing_with_dash() {
        let mut snap = snapshot(None, None);
        let mut summary = BTreeMap::new();
        summary.insert("active_users".to_string(), MetricValue::Integer(1432));
        summary.insert("bounce_rate".to_string(), MetricValue::Text("42%".to_string()));
        snap.summary = Some(summary);

        let cards = SeriesComposer::new(&snap).kpi_cards();

        assert_eq!(
            cards,
            vec![
                KpiCard {
                    label: "Active Users",
                    value: "1432".to_string()
                },
                KpiCard {
                    label: "Total Views",
                    value: "-".to_string()
                },
                KpiCard {
                    label: "Bounce Rate",
                    value: "42%".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_workspace_title() {
        let mut snap = snapshot(None, None);
        assert_eq!(SeriesComposer::new(&snap).workspace_title(), "Acme Workspace");

        snap.company_name = "  ".to_string();
        assert_eq!(
            SeriesComposer::new(&snap).workspace_title(),
            "Workspace Overview"
        );
    }

    #[test]
    fn test_for_state__only_ready() {
        let ready = ViewState::Ready(Arc::new(snapshot(None, None)));
        assert!(SeriesComposer::for_state(&ready).is_some());
        assert!(SeriesComposer::for_state(&ViewState::Loading).is_none());
        assert!(SeriesComposer::for_state(&ViewState::PendingIntegration).is_none());
    }
}
