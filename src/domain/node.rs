//! Node — a server-owned snapshot of one reservable machine.
//!
//! The console never mutates a `Node`. It only replaces its whole cached list
//! after a round trip to the backend.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Keys the backend may use for the node name, in order of preference.
const NAME_KEYS: [&str; 3] = ["node", "node_name", "name"];

/// A node as returned by `GET /nodes/` and `GET /nodes/{name}`.
///
/// The name is read from the first of `node`, `node_name` or `name` that is
/// present; the other two stay in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode")]
pub struct Node {
    #[serde(rename = "node")]
    pub name: String,
    pub status: NodeStatus,
    #[serde(default)]
    pub reserved_by: Option<String>,
    /// Raw server timestamp; see [`timestamp::parse`].
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub updated_at: String,
    /// Any other properties the backend stores (e.g. `description`).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(default)]
    node: Option<String>,
    #[serde(default)]
    node_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    status: NodeStatus,
    #[serde(default)]
    reserved_by: Option<String>,
    #[serde(default)]
    expires_at: Option<String>,
    #[serde(default)]
    updated_at: String,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl TryFrom<RawNode> for Node {
    type Error = String;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let mut extra = raw.extra;
        let mut name = None;
        for (key, value) in NAME_KEYS.into_iter().zip([raw.node, raw.node_name, raw.name]) {
            let Some(value) = value else { continue };
            if name.is_none() {
                name = Some(value);
            } else {
                extra.insert(key.to_string(), serde_json::Value::String(value));
            }
        }

        Ok(Node {
            name: name.ok_or("missing field `node`")?,
            status: raw.status,
            reserved_by: raw.reserved_by,
            expires_at: raw.expires_at,
            updated_at: raw.updated_at,
            extra,
        })
    }
}

/// Reservation status of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Available,
    Reserved,
    #[serde(other)]
    Unknown,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Available => "available",
            NodeStatus::Reserved => "reserved",
            NodeStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    pub fn is_reserved(&self) -> bool {
        self.status == NodeStatus::Reserved
    }

    /// Parsed expiry instant, if present and parseable.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expires_at.as_deref().and_then(timestamp::parse)
    }

    /// True when the expiry parses to an instant before `now`.
    /// An unparseable expiry is never considered expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry().is_some_and(|at| at < now)
    }

    /// Whether the reservation fields agree with the status: both set when
    /// reserved, both absent when available.
    pub fn reservation_consistent(&self) -> bool {
        match self.status {
            NodeStatus::Reserved => self.reserved_by.is_some() && self.expires_at.is_some(),
            NodeStatus::Available => self.reserved_by.is_none() && self.expires_at.is_none(),
            NodeStatus::Unknown => true,
        }
    }
}

/// Counts shown above the node list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    pub total: usize,
    pub available: usize,
    pub reserved: usize,
}

impl InventoryStats {
    pub fn from_nodes(nodes: &[Node]) -> Self {
        nodes.iter().fold(Self::default(), |mut stats, node| {
            stats.total += 1;
            match node.status {
                NodeStatus::Available => stats.available += 1,
                NodeStatus::Reserved => stats.reserved += 1,
                NodeStatus::Unknown => {}
            }
            stats
        })
    }
}
