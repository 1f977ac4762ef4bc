//! Terminal rendering of the session state. Pure: every function builds a
//! `String` from state and a clock reading.

use std::fmt::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::domain::{timestamp, InventoryStats, Node, NodeStatus};

use super::state::{ApiStatus, SessionState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn api_status(status: ApiStatus) -> String {
    let dot = match status {
        ApiStatus::Online => "●".green(),
        ApiStatus::Offline => "●".red(),
        ApiStatus::Checking => "●".yellow(),
    };
    format!("{} {}", dot, status.as_str())
}

fn status_label(status: NodeStatus) -> ColoredString {
    match status {
        NodeStatus::Available => status.as_str().green(),
        NodeStatus::Reserved => status.as_str().yellow(),
        NodeStatus::Unknown => status.as_str().dimmed(),
    }
}

pub fn header(state: &SessionState, base_url: &str) -> String {
    format!(
        "{}  {}  {}",
        "ReBM Node Manager".bold(),
        api_status(state.api_status),
        base_url.dimmed()
    )
}

pub fn error_banner(message: &str) -> String {
    format!("{} {}", "Error:".red().bold(), message.red())
}

pub fn stats(stats: InventoryStats) -> String {
    format!(
        "{} total  {} available  {} reserved",
        stats.total.to_string().bold(),
        stats.available.to_string().green().bold(),
        stats.reserved.to_string().yellow().bold()
    )
}

/// One list entry: name and status on the first line, reservation details
/// indented below.
pub fn node_row(node: &Node, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = write!(out, "  {}  {}", node.name.bold(), status_label(node.status));
    if node.is_expired_at(now) {
        let _ = write!(out, " {}", "(EXPIRED)".red());
    }
    if let Some(user) = &node.reserved_by {
        let _ = write!(out, "\n      reserved by: {}", user.bold());
    }
    if let Some(expires) = &node.expires_at {
        let _ = write!(out, "\n      expires:     {}", describe_instant(expires, now));
    }
    let _ = write!(
        out,
        "\n      updated:     {}",
        describe_instant(&node.updated_at, now).dimmed()
    );
    out
}

/// Whole console view.
pub fn dashboard(state: &SessionState, base_url: &str, now: DateTime<Utc>) -> String {
    let mut out = header(state, base_url);
    out.push('\n');

    if let Some(message) = &state.error {
        out.push_str(&error_banner(message));
        out.push('\n');
    }

    if state.loading {
        out.push_str(&"Loading nodes...".dimmed().to_string());
        out.push('\n');
        return out;
    }

    out.push_str(&stats(state.stats()));
    out.push('\n');

    out.push_str(&node_list(&state.nodes, now));
    out
}

pub fn node_list(nodes: &[Node], now: DateTime<Utc>) -> String {
    if nodes.is_empty() {
        return format!("{}\n", "No nodes found".dimmed());
    }
    let mut out = String::new();
    for node in nodes {
        out.push_str(&node_row(node, now));
        out.push('\n');
    }
    out
}

/// Detail view: list row plus any extra server properties.
pub fn node_detail(node: &Node, now: DateTime<Utc>) -> String {
    let mut out = node_row(node, now);
    for (key, value) in &node.extra {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let _ = write!(out, "\n      {}: {}", key, value);
    }
    out
}

/// Local time plus a relative hint; the raw string when unparseable.
fn describe_instant(raw: &str, now: DateTime<Utc>) -> String {
    match timestamp::parse(raw) {
        Some(at) => format!(
            "{} ({})",
            timestamp::format_local(raw),
            timestamp::relative(at, now)
        ),
        None => raw.to_string(),
    }
}

pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn plain() {
        colored::control::set_override(false);
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn node(value: serde_json::Value) -> Node {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn reserved_row_shows_owner_and_expiry() {
        plain();
        let row = node_row(
            &node(json!({
                "node": "alpha",
                "status": "reserved",
                "reserved_by": "bob",
                "expires_at": "2026-10-19T13:00:00Z",
                "updated_at": "2026-10-19T11:00:00Z"
            })),
            now(),
        );
        assert!(row.contains("alpha  reserved"));
        assert!(row.contains("reserved by: bob"));
        assert!(row.contains("(in 1 hour)"));
        assert!(!row.contains("EXPIRED"));
    }

    #[test]
    fn expired_and_unparseable_timestamps() {
        plain();
        let row = node_row(
            &node(json!({
                "node": "beta",
                "status": "reserved",
                "reserved_by": "eve",
                "expires_at": "2026-10-19T11:00:00Z",
                "updated_at": "yesterday-ish"
            })),
            now(),
        );
        assert!(row.contains("(EXPIRED)"));
        assert!(row.contains("updated:     yesterday-ish"));
    }

    #[test]
    fn dashboard_states() {
        plain();
        let mut state = SessionState::default();
        let out = dashboard(&state, "http://localhost:8000", now());
        assert!(out.contains("Loading nodes..."));
        assert!(out.contains("checking"));

        state.finish_load(Vec::new());
        state.api_status = ApiStatus::Online;
        state.set_error("Failed to load nodes".into());
        let out = dashboard(&state, "http://localhost:8000", now());
        assert!(out.contains("Error: Failed to load nodes"));
        assert!(out.contains("0 total"));
        assert!(out.contains("No nodes found"));
        assert!(out.contains("online"));
    }

    #[test]
    fn detail_lists_extra_properties() {
        plain();
        let out = node_detail(
            &node(json!({
                "node": "gamma",
                "status": "available",
                "updated_at": "2026-10-19T11:00:00Z",
                "description": "rack 4"
            })),
            now(),
        );
        assert!(out.contains("description: rack 4"));
    }
}
