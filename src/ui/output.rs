//! Text rendering of the workspace for the terminal

use crate::series::SeriesComposer;
use crate::ui::color::{Colors, colorize};
use crate::workspace::{ViewState, WorkspaceSnapshot};

/// Render a `ready` snapshot: title, KPI cards, anomaly banner, properties,
/// channel table and the current suggestion.
pub fn format_dashboard(snapshot: &WorkspaceSnapshot, selected: Option<&str>) -> String {
    let composer = SeriesComposer::new(snapshot);
    let mut out = Vec::new();

    out.push(colorize(
        &composer.workspace_title(),
        &format!("{}{}", Colors::BOLD, Colors::BRIGHT_CYAN),
    ));
    out.push(String::new());

    let cards: Vec<String> = composer
        .kpi_cards()
        .iter()
        .map(|card| format!("{}: {}", card.label, card.value))
        .collect();
    out.push(cards.join("   "));

    let banner = composer.anomaly_banner();
    if banner.show {
        out.push(String::new());
        out.push(colorize(
            &format!("! {}", banner.message.unwrap_or_default()),
            Colors::RED,
        ));
    }

    if !snapshot.properties().is_empty() {
        out.push(String::new());
        out.push("Properties:".to_string());
        for property in snapshot.properties() {
            let marker = if Some(property.id.as_str()) == selected {
                "*"
            } else {
                " "
            };
            out.push(format!(" {marker} {} ({})", property.name, property.id));
        }
    }

    let measured = composer.channel_aggregates().len();
    let rows = composer.combined_series();
    if !rows.is_empty() {
        out.push(String::new());
        out.push(format!(
            "{:<24} {:<24} {:>10} {:>10}",
            "Source", "Campaign", "Users", "Views"
        ));
        for (i, row) in rows.iter().enumerate() {
            let line = format!(
                "{:<24} {:<24} {:>10} {:>10}",
                row.source, row.campaign, row.users, row.views
            );
            if i < measured {
                out.push(line);
            } else {
                out.push(colorize(&format!("{line}  (forecast)"), Colors::DIM));
            }
        }
    }

    if let Some(suggestion) = composer.suggestion() {
        out.push(String::new());
        out.push(colorize(
            &format!("Focus: {}", suggestion.primary_focus),
            Colors::BOLD,
        ));
        out.push(format!("  Why: {}", suggestion.reason));
        out.push(format!("  Next: {}", suggestion.action_item));
    }

    out.join("\n")
}

/// One-line explanation of a state that has nothing to render
pub fn state_message(state: &ViewState) -> String {
    match state {
        ViewState::Loading => "Syncing engine...".to_string(),
        ViewState::Ready(snapshot) => format!("{} is ready", snapshot.company_name),
        ViewState::SessionExpired => colorize(
            "Session expired or missing. Run `arbflow login` to sign in again.",
            Colors::YELLOW,
        ),
        ViewState::PendingIntegration => colorize(
            "No data source connected yet. Run `arbflow connect --property-id <ID> --key-file <FILE>`.",
            Colors::BLUE,
        ),
        ViewState::Error(message) => colorize(&format!("Error: {message}"), Colors::RED),
    }
}
