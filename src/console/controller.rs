//! Node-lifecycle controller.
//!
//! Each user intent maps to one method. Mutations follow the same shape:
//! guard inputs locally, set `action_loading`, call the API, reload the full
//! list on success or surface the error on failure, clear `action_loading`.
//! Failures never propagate past the controller; they land in
//! `SessionState::error`.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::{Local, NaiveDateTime, TimeZone};
use tracing::{debug, info};

use crate::client::{ApiError, ApiResult, NodeClient};
use crate::domain::{timestamp, Ack, CreateNodeRequest, Node, ReserveNodeRequest};

use super::prompt::Prompter;
use super::state::{ApiStatus, SessionState};

const LOAD_FAILED: &str = "Failed to load nodes";
const GET_FAILED: &str = "Failed to load node";
const CREATE_FAILED: &str = "Failed to create node";
const RESERVE_FAILED: &str = "Failed to reserve node";
const RELEASE_FAILED: &str = "Failed to release node";
const DELETE_FAILED: &str = "Failed to delete node";
const CLEANUP_FAILED: &str = "Failed to cleanup expired nodes";
const INVALID_EXPIRY: &str = "Invalid expiry time";

pub struct NodeController<P> {
    client: NodeClient,
    prompter: P,
    state: SessionState,
    reservation_hours: i64,
}

impl<P: Prompter> NodeController<P> {
    pub fn new(client: NodeClient, prompter: P) -> Self {
        Self {
            client,
            prompter,
            state: SessionState::default(),
            reservation_hours: 1,
        }
    }

    /// Hours ahead the reserve form pre-fills its expiry.
    pub fn with_reservation_hours(mut self, hours: i64) -> Self {
        self.reservation_hours = hours;
        self
    }

    pub fn client(&self) -> &NodeClient {
        &self.client
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Form edits and other purely local transitions.
    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn prompter_mut(&mut self) -> &mut P {
        &mut self.prompter
    }

    pub fn reservation_hours(&self) -> i64 {
        self.reservation_hours
    }

    /// Startup: probe health and load the list.
    pub async fn start(&mut self) {
        self.load_nodes().await;
        self.check_health().await;
    }

    pub async fn load_nodes(&mut self) {
        self.state.begin_load();
        match self.client.list_nodes().await {
            Ok(nodes) => {
                debug!(count = nodes.len(), "loaded nodes");
                self.state.finish_load(nodes);
            }
            Err(err) => self.state.fail_load(message_for(&err, LOAD_FAILED)),
        }
    }

    /// One-shot probe. Only flips the status indicator.
    pub async fn check_health(&mut self) -> ApiStatus {
        self.state.api_status = match self.client.health().await {
            Ok(health) => {
                debug!(status = %health.status, "API healthy");
                ApiStatus::Online
            }
            Err(_) => ApiStatus::Offline,
        };
        self.state.api_status
    }

    /// Fetch a single node for a detail view.
    pub async fn get_node(&mut self, name: &str) -> Option<Node> {
        match self.client.get_node(name).await {
            Ok(node) => Some(node),
            Err(err) => {
                self.state.set_error(message_for(&err, GET_FAILED));
                None
            }
        }
    }

    pub async fn create_node(
        &mut self,
        name: &str,
        extra: BTreeMap<String, serde_json::Value>,
    ) -> Option<Ack> {
        let name = name.trim();
        if name.is_empty() {
            debug!("create skipped: empty node name");
            return None;
        }

        let request = CreateNodeRequest {
            node_name: name.to_string(),
            extra,
        };
        let client = self.client.clone();
        let ack = self
            .mutate(CREATE_FAILED, async move { client.create_node(&request).await })
            .await?;
        info!(node = %name, "node created");
        Some(ack)
    }

    /// Reserve `name` for `user` until `local_expiry` (local wall-clock time).
    pub async fn reserve_node(
        &mut self,
        name: &str,
        user: &str,
        local_expiry: Option<NaiveDateTime>,
    ) -> Option<Ack> {
        self.reserve_node_in(name, user, local_expiry, &Local).await
    }

    /// As [`reserve_node`](Self::reserve_node), resolving the expiry in `tz`.
    pub async fn reserve_node_in<Tz: TimeZone>(
        &mut self,
        name: &str,
        user: &str,
        local_expiry: Option<NaiveDateTime>,
        tz: &Tz,
    ) -> Option<Ack> {
        let user = user.trim();
        let Some(local_expiry) = local_expiry.filter(|_| !user.is_empty()) else {
            debug!(node = %name, "reserve skipped: missing user or expiry");
            return None;
        };

        let Some(instant) = timestamp::local_to_instant(local_expiry, tz) else {
            self.state
                .set_error(format!("{}: {} does not exist locally", INVALID_EXPIRY, local_expiry));
            return None;
        };

        let request = ReserveNodeRequest {
            user: user.to_string(),
            expires_at: timestamp::to_iso(instant),
        };
        let client = self.client.clone();
        let node = name.to_string();
        let ack = self
            .mutate(RESERVE_FAILED, async move {
                client.reserve_node(&node, &request).await
            })
            .await?;
        info!(node = %name, user = %user, expires_at = %timestamp::to_iso(instant), "node reserved");
        Some(ack)
    }

    pub async fn release_node(&mut self, name: &str) -> Option<Ack> {
        let client = self.client.clone();
        let node = name.to_string();
        let ack = self
            .mutate(RELEASE_FAILED, async move { client.release_node(&node).await })
            .await?;
        info!(node = %name, "node released");
        Some(ack)
    }

    /// Deletes only after the prompter confirms. Declining is a silent no-op.
    pub async fn delete_node(&mut self, name: &str) -> Option<Ack> {
        let question = format!("Are you sure you want to delete node \"{}\"?", name);
        if !self.prompter.confirm(&question) {
            debug!(node = %name, "delete declined");
            return None;
        }

        let client = self.client.clone();
        let node = name.to_string();
        let ack = self
            .mutate(DELETE_FAILED, async move { client.delete_node(&node).await })
            .await?;
        info!(node = %name, "node deleted");
        Some(ack)
    }

    /// Returns the server's summary message after showing it to the user.
    pub async fn cleanup_expired(&mut self) -> Option<String> {
        let client = self.client.clone();
        let ack = self
            .mutate(CLEANUP_FAILED, async move { client.cleanup_expired().await })
            .await?;

        let message = ack.message?;
        info!(summary = %message, "expired reservations cleaned up");
        self.prompter.acknowledge(&message);
        Some(message)
    }

    // ── Form-driven intents ────────────────────────────────

    pub async fn submit_create_form(&mut self) -> Option<Ack> {
        let name = self.state.create_form.name.clone();
        let ack = self.create_node(&name, BTreeMap::new()).await?;
        self.state.create_succeeded();
        Some(ack)
    }

    pub async fn submit_reserve_form(&mut self) -> Option<Ack> {
        let form = self.state.reserve_form.clone();
        let ack = self
            .reserve_node(&form.node, &form.user, form.expires_at)
            .await?;
        self.state.reserve_succeeded();
        Some(ack)
    }

    pub fn open_reserve_form(&mut self, name: &str) {
        let now = Local::now().naive_local();
        self.state
            .open_reserve_form(name, now, self.reservation_hours);
    }

    // ── Internal helpers ───────────────────────────────────

    /// Run a mutating call: flag `action_loading`, reload on success, surface
    /// the error on failure. The flag is cleared on every path.
    async fn mutate<F>(&mut self, fallback: &str, call: F) -> Option<Ack>
    where
        F: Future<Output = ApiResult<Ack>>,
    {
        self.state.action_loading = true;
        let outcome = match call.await {
            Ok(ack) => {
                self.load_nodes().await;
                Some(ack)
            }
            Err(err) => {
                self.state.set_error(message_for(&err, fallback));
                None
            }
        };
        self.state.action_loading = false;
        outcome
    }
}

/// Server detail when present, otherwise the operation's fixed message.
fn message_for(err: &ApiError, fallback: &str) -> String {
    err.detail()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
