// Overview aggregation against a mock panel: degradation behavior that
// only shows up with a real HTTP round trip.

#![allow(clippy::unwrap_used)]

use guardly_core::{CoreError, Panel, PanelConfig};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, Panel) {
    let server = MockServer::start().await;
    let mut config = PanelConfig::new(
        Url::parse(&format!("{}/api", server.uri())).unwrap(),
        SecretString::from("token"),
    );
    config.timeout = std::time::Duration::from_secs(5);
    let panel = Panel::connect(&config).unwrap();
    (server, panel)
}

#[tokio::test]
async fn overview_merges_all_three_fetches() {
    let (server, panel) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "status": "active", "traffic_used": 10},
            {"id": 2, "status": "disabled", "traffic_used": 20},
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "2.1.0",
            "cpu_usage": 40.0,
            "ram_usage": 2048,
            "ram_total": 8192,
            "incoming_bandwidth": 900,
            "outgoing_bandwidth": 100,
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_users": 50,
            "online_users": 7,
        })))
        .mount(&server)
        .await;

    let overview = panel.overview().await.unwrap();
    // User list is present, so stats must not override its count.
    assert_eq!(overview.total_users, 2);
    assert_eq!(overview.active_users, 1);
    // Nobody in the list was online, so the stats value fills the slot.
    assert_eq!(overview.online_users, 7);
    // Server bandwidth overrides the 30-byte user sum.
    assert_eq!(overview.total_traffic, 1000);
    assert_eq!(overview.version.as_deref(), Some("2.1.0"));
}

#[tokio::test]
async fn failed_fetches_degrade_instead_of_failing() {
    let (server, panel) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/system"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_users": 12,
            "active_users": 9,
        })))
        .mount(&server)
        .await;

    let overview = panel.overview().await.unwrap();
    assert_eq!(overview.total_users, 12);
    assert_eq!(overview.active_users, 9);
    assert_eq!(overview.ram_total, 0);
}

#[tokio::test]
async fn overview_fails_only_when_everything_fails() {
    let (server, panel) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = panel.overview().await.unwrap_err();
    assert!(matches!(err, CoreError::Api(_)));
}

#[tokio::test]
async fn billing_operations_require_configuration() {
    let (_server, panel) = setup().await;

    let err = panel.list_tariffs().await.unwrap_err();
    assert!(matches!(err, CoreError::Config(_)));
}
