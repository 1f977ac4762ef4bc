//! Session state for the console: the node snapshot, loading/error flags,
//! API status and the two forms. Transitions are plain methods; the
//! controller is the only writer.

use chrono::NaiveDateTime;

use crate::domain::{timestamp, InventoryStats, Node};

/// Result of the one-shot health probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

impl ApiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiStatus::Checking => "checking",
            ApiStatus::Online => "online",
            ApiStatus::Offline => "offline",
        }
    }
}

/// "Add node" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub open: bool,
    pub name: String,
}

/// "Reserve node" form, bound to one selected node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReserveForm {
    pub open: bool,
    pub node: String,
    pub user: String,
    /// Local wall-clock expiry.
    pub expires_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Last list returned by the server, in server order.
    pub nodes: Vec<Node>,
    pub loading: bool,
    pub action_loading: bool,
    pub error: Option<String>,
    pub api_status: ApiStatus,
    pub create_form: CreateForm,
    pub reserve_form: ReserveForm,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            loading: true,
            action_loading: false,
            error: None,
            api_status: ApiStatus::Checking,
            create_form: CreateForm::default(),
            reserve_form: ReserveForm::default(),
        }
    }
}

impl SessionState {
    pub fn stats(&self) -> InventoryStats {
        InventoryStats::from_nodes(&self.nodes)
    }

    pub fn find(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    // ── List transitions ───────────────────────────────────

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish_load(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes;
        self.loading = false;
    }

    pub fn fail_load(&mut self, message: String) {
        self.error = Some(message);
        self.loading = false;
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // ── Create form ────────────────────────────────────────

    pub fn open_create_form(&mut self) {
        self.create_form.open = true;
    }

    /// Closing keeps the typed name, like hiding a modal.
    pub fn close_create_form(&mut self) {
        self.create_form.open = false;
    }

    pub fn set_new_node_name(&mut self, name: impl Into<String>) {
        self.create_form.name = name.into();
    }

    pub fn create_succeeded(&mut self) {
        self.create_form = CreateForm::default();
    }

    /// Whether the submit affordance is enabled.
    pub fn can_submit_create(&self) -> bool {
        !self.action_loading && !self.create_form.name.trim().is_empty()
    }

    // ── Reserve form ───────────────────────────────────────

    /// Select `node` and pre-fill expiry `hours` after `now` (local time).
    pub fn open_reserve_form(&mut self, node: &str, now: NaiveDateTime, hours: i64) {
        self.reserve_form.open = true;
        self.reserve_form.node = node.to_string();
        self.reserve_form.expires_at = timestamp::default_expiry(now, hours);
    }

    pub fn close_reserve_form(&mut self) {
        self.reserve_form.open = false;
    }

    pub fn set_reserve_user(&mut self, user: impl Into<String>) {
        self.reserve_form.user = user.into();
    }

    pub fn set_reserve_expiry(&mut self, expires_at: Option<NaiveDateTime>) {
        self.reserve_form.expires_at = expires_at;
    }

    /// Closes the form and clears user and expiry; the selection stays.
    pub fn reserve_succeeded(&mut self) {
        self.reserve_form.open = false;
        self.reserve_form.user.clear();
        self.reserve_form.expires_at = None;
    }

    pub fn can_submit_reserve(&self) -> bool {
        !self.action_loading
            && !self.reserve_form.user.trim().is_empty()
            && self.reserve_form.expires_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn starts_loading_and_checking() {
        let state = SessionState::default();
        assert!(state.loading);
        assert!(!state.action_loading);
        assert_eq!(state.api_status, ApiStatus::Checking);
        assert!(state.nodes.is_empty());
    }

    #[test]
    fn load_clears_error_only_at_start() {
        let mut state = SessionState::default();
        state.set_error("boom".into());
        state.begin_load();
        assert!(state.error.is_none());
        assert!(state.loading);

        state.fail_load("Failed to load nodes".into());
        assert_eq!(state.error.as_deref(), Some("Failed to load nodes"));
        assert!(!state.loading);
    }

    #[test]
    fn reserve_form_prefills_expiry() {
        let mut state = SessionState::default();
        state.open_reserve_form("alpha", at(9, 15, 42), 1);
        assert!(state.reserve_form.open);
        assert_eq!(state.reserve_form.node, "alpha");
        assert_eq!(state.reserve_form.expires_at, Some(at(10, 15, 0)));
        assert!(!state.can_submit_reserve());

        state.set_reserve_user("  ");
        assert!(!state.can_submit_reserve());
        state.set_reserve_user("bob");
        assert!(state.can_submit_reserve());

        state.action_loading = true;
        assert!(!state.can_submit_reserve());
    }

    #[test]
    fn out_of_range_prefill_leaves_expiry_empty() {
        let mut state = SessionState::default();
        state.open_reserve_form("alpha", at(9, 15, 42), 100_000_000_000);
        assert!(state.reserve_form.open);
        assert!(state.reserve_form.expires_at.is_none());
    }

    #[test]
    fn form_success_resets_fields() {
        let mut state = SessionState::default();
        state.open_create_form();
        state.set_new_node_name("alpha");
        assert!(state.can_submit_create());
        state.create_succeeded();
        assert_eq!(state.create_form, CreateForm::default());

        state.open_reserve_form("alpha", at(9, 0, 0), 2);
        state.set_reserve_user("bob");
        state.reserve_succeeded();
        assert!(!state.reserve_form.open);
        assert!(state.reserve_form.user.is_empty());
        assert!(state.reserve_form.expires_at.is_none());
    }

    #[test]
    fn closing_create_form_keeps_name() {
        let mut state = SessionState::default();
        state.open_create_form();
        state.set_new_node_name("draft");
        state.close_create_form();
        assert!(!state.create_form.open);
        assert_eq!(state.create_form.name, "draft");
    }
}
