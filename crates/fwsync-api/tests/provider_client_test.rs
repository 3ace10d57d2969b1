#![allow(clippy::unwrap_used)]
// Integration tests for `ProviderClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fwsync_api::types::{BoundaryId, IngressCreate, PermissionId, SegmentId};
use fwsync_api::{Error, ProviderClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ProviderClient) {
    let server = MockServer::start().await;
    let client = ProviderClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Segment tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_segments() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/segments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "seg-1", "cidr_block": "10.0.0.0/16", "is_default": true },
            { "id": "seg-2" }
        ])))
        .mount(&server)
        .await;

    let segments = client.list_segments().await.unwrap();

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].id, SegmentId("seg-1".into()));
    assert_eq!(segments[0].cidr_block.as_deref(), Some("10.0.0.0/16"));
    assert!(segments[0].is_default);
    assert!(!segments[1].is_default);
}

// ── Boundary tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_find_boundaries_filters_by_name() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/segments/seg-1/boundaries"))
        .and(query_param("name", "managed-allow-list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "bnd-1", "name": "managed-allow-list", "segment_id": "seg-1" }
        ])))
        .mount(&server)
        .await;

    let boundaries = client
        .find_boundaries(&SegmentId("seg-1".into()), "managed-allow-list")
        .await
        .unwrap();

    assert_eq!(boundaries.len(), 1);
    assert_eq!(boundaries[0].id, BoundaryId("bnd-1".into()));
    assert_eq!(boundaries[0].name, "managed-allow-list");
}

#[tokio::test]
async fn test_find_boundaries_empty_result() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/segments/seg-9/boundaries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let boundaries = client
        .find_boundaries(&SegmentId("seg-9".into()), "managed-allow-list")
        .await
        .unwrap();

    assert!(boundaries.is_empty());
}

// ── Ingress tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_ingress_groupings() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/boundaries/bnd-1/ingress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "protocol": "tcp",
                "from_port": 443,
                "to_port": 443,
                "ip_ranges": [
                    { "cidr": "1.1.1.1/32", "description": "primary" },
                    { "cidr": "2.2.2.2/32" }
                ]
            }
        ])))
        .mount(&server)
        .await;

    let groupings = client
        .list_ingress(&BoundaryId("bnd-1".into()))
        .await
        .unwrap();

    assert_eq!(groupings.len(), 1);
    assert_eq!(groupings[0].protocol, "tcp");
    assert_eq!(groupings[0].ip_ranges.len(), 2);
    assert_eq!(groupings[0].ip_ranges[1].cidr, "2.2.2.2/32");
}

#[tokio::test]
async fn test_add_ingress_returns_permission_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/boundaries/bnd-1/ingress"))
        .and(body_partial_json(json!({
            "protocol": "tcp",
            "from_port": 443,
            "to_port": 443,
            "cidr": "1.1.1.1/32",
            "name": "ad.example.com-tcp-443-443"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "perm-77" })))
        .mount(&server)
        .await;

    let created = client
        .add_ingress(
            &BoundaryId("bnd-1".into()),
            &IngressCreate {
                protocol: "tcp".into(),
                from_port: 443,
                to_port: 443,
                cidr: "1.1.1.1/32".into(),
                name: "ad.example.com-tcp-443-443".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(created.id, PermissionId("perm-77".into()));
}

#[tokio::test]
async fn test_set_ingress_description() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/v1/boundaries/bnd-1/ingress/perm-77/description"))
        .and(body_partial_json(json!({ "description": "AD endpoint" })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client
        .set_ingress_description(
            &BoundaryId("bnd-1".into()),
            &PermissionId("perm-77".into()),
            "AD endpoint",
        )
        .await
        .unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_invalid_api_key() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_segments().await;

    assert!(
        matches!(result, Err(Error::InvalidApiKey)),
        "expected InvalidApiKey, got: {result:?}"
    );
}

#[tokio::test]
async fn test_api_error_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/boundaries/bnd-1/ingress"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "port range is inverted",
            "code": "invalid-port-range"
        })))
        .mount(&server)
        .await;

    let result = client
        .add_ingress(
            &BoundaryId("bnd-1".into()),
            &IngressCreate {
                protocol: "tcp".into(),
                from_port: 443,
                to_port: 80,
                cidr: "1.1.1.1/32".into(),
                name: "bad".into(),
            },
        )
        .await;

    match result {
        Err(Error::Api {
            status,
            ref message,
            ref code,
        }) => {
            assert_eq!(status, 400);
            assert!(message.contains("inverted"), "message: {message}");
            assert_eq!(code.as_deref(), Some("invalid-port-range"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_deserialization_error_keeps_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/segments"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_segments().await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}
