use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Generic success response from a mutating endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Fields some endpoints echo back, e.g. `expires_at` on reserve.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

/// Body of `POST /nodes/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateNodeRequest {
    pub node_name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CreateNodeRequest {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            extra: BTreeMap::new(),
        }
    }
}

/// Body of `POST /nodes/{name}/reserve`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReserveNodeRequest {
    pub user: String,
    /// Absolute ISO-8601 instant.
    pub expires_at: String,
}

/// FastAPI error body: `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Human-readable detail. Validation errors carry a list of objects
    /// instead of a string; those are rendered as compact JSON.
    pub fn into_detail(self) -> Option<String> {
        match self.detail {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_flattens_extra_properties() {
        let mut req = CreateNodeRequest::new("alpha");
        req.extra.insert("description".into(), json!("rack 4"));
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"node_name": "alpha", "description": "rack 4"})
        );
    }

    #[test]
    fn ack_keeps_echoed_fields() {
        let ack: Ack = serde_json::from_value(json!({
            "message": "Node reserved",
            "expires_at": "2026-10-19T13:00:00+00:00"
        }))
        .unwrap();
        assert_eq!(ack.message.as_deref(), Some("Node reserved"));
        assert!(ack.status.is_none());
        assert!(ack.extra.contains_key("expires_at"));
    }

    #[test]
    fn error_detail_shapes() {
        let body: ErrorBody = serde_json::from_value(json!({"detail": "Node not found"})).unwrap();
        assert_eq!(body.into_detail().as_deref(), Some("Node not found"));

        let body: ErrorBody =
            serde_json::from_value(json!({"detail": [{"loc": ["body"], "msg": "field required"}]}))
                .unwrap();
        assert!(body.into_detail().unwrap().contains("field required"));

        let body: ErrorBody = serde_json::from_value(json!({"detail": null})).unwrap();
        assert!(body.into_detail().is_none());
    }
}
