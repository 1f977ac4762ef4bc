mod common;

use httpmock::prelude::*;
use rebm_console::domain::{CreateNodeRequest, ReserveNodeRequest};
use rebm_console::{ApiError, NodeClient, NodeStatus};
use serde_json::json;

use common::{available, reserved};

fn client(server: &MockServer) -> NodeClient {
    NodeClient::new(&server.base_url()).unwrap()
}

#[tokio::test]
async fn list_preserves_server_order() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::GET).path("/nodes/");
        then.status(200).json_body(json!([
            available("zeta"),
            reserved("alpha", "bob", "2030-01-01T08:00:00+00:00"),
            available("mu")
        ]));
    });

    let nodes = client(&server).list_nodes().await.unwrap();
    let names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mu"]);
    assert_eq!(nodes[1].status, NodeStatus::Reserved);
}

#[tokio::test]
async fn get_node_not_found_carries_detail_and_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::GET).path("/nodes/ghost");
        then.status(404).json_body(json!({"detail": "Node not found"}));
    });

    let err = client(&server).get_node("ghost").await.unwrap_err();
    assert_eq!(err.detail(), Some("Node not found"));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    assert!(err.to_string().contains("Node not found"));
}

#[tokio::test]
async fn non_json_error_body_has_no_detail() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::DELETE).path("/nodes/alpha");
        then.status(502).body("<html>Bad Gateway</html>");
    });

    let err = client(&server).delete_node("alpha").await.unwrap_err();
    match err {
        ApiError::Status {
            status,
            detail,
            body,
            ..
        } => {
            assert_eq!(status.as_u16(), 502);
            assert!(detail.is_none());
            assert!(body.contains("Bad Gateway"));
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::GET).path("/nodes/");
        then.status(200).json_body(json!({"nodes": []}));
    });

    let err = client(&server).list_nodes().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }), "got: {err:?}");
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    let client = NodeClient::new("http://127.0.0.1:9").unwrap();
    let err = client.health().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }), "got: {err:?}");
    assert!(err.detail().is_none());
    assert!(err.status().is_none());
}

#[tokio::test]
async fn mutation_endpoints_use_documented_verbs_and_bodies() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(Method::POST)
            .path("/nodes/")
            .header("content-type", "application/json")
            .json_body(json!({"node_name": "alpha"}));
        then.status(200).json_body(json!({"message": "Node created"}));
    });
    let reserve = server.mock(|when, then| {
        when.method(Method::POST)
            .path("/nodes/alpha/reserve")
            .json_body(json!({"user": "bob", "expires_at": "2030-01-01T08:00:00.000Z"}));
        then.status(200).json_body(json!({
            "message": "Node reserved",
            "expires_at": "2030-01-01T08:00:00+00:00"
        }));
    });
    let release = server.mock(|when, then| {
        when.method(Method::POST).path("/nodes/alpha/release");
        then.status(200).json_body(json!({"message": "Node released"}));
    });
    let cleanup = server.mock(|when, then| {
        when.method(Method::POST).path("/nodes/cleanup/expired");
        then.status(200)
            .json_body(json!({"message": "Cleaned up 0 expired nodes"}));
    });
    let delete = server.mock(|when, then| {
        when.method(Method::DELETE).path("/nodes/alpha");
        then.status(200).json_body(json!({"message": "Node deleted"}));
    });

    let client = client(&server);
    client
        .create_node(&CreateNodeRequest::new("alpha"))
        .await
        .unwrap();
    let ack = client
        .reserve_node(
            "alpha",
            &ReserveNodeRequest {
                user: "bob".into(),
                expires_at: "2030-01-01T08:00:00.000Z".into(),
            },
        )
        .await
        .unwrap();
    assert!(ack.extra.contains_key("expires_at"));
    client.release_node("alpha").await.unwrap();
    let summary = client.cleanup_expired().await.unwrap();
    assert_eq!(summary.message.as_deref(), Some("Cleaned up 0 expired nodes"));
    client.delete_node("alpha").await.unwrap();

    create.assert_calls(1);
    reserve.assert_calls(1);
    release.assert_calls(1);
    cleanup.assert_calls(1);
    delete.assert_calls(1);
}

#[tokio::test]
async fn health_decodes_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::GET).path("/health");
        then.status(200).json_body(json!({"status": "ok"}));
    });

    let health = client(&server).health().await.unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn each_call_is_a_single_attempt() {
    let server = MockServer::start();
    let failing = server.mock(|when, then| {
        when.method(Method::POST).path("/nodes/alpha/release");
        then.status(500);
    });

    assert!(client(&server).release_node("alpha").await.is_err());
    failing.assert_calls(1);
}
