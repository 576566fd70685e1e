// Integration tests for the billing sidecar client.

#![allow(clippy::unwrap_used)]

use guardly_api::billing::types::PaymentQuery;
use guardly_api::billing::BillingClient;
use guardly_api::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, BillingClient) {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).unwrap();
    let client = BillingClient::with_client(reqwest::Client::new(), base);
    (server, client)
}

#[tokio::test]
async fn subscription_lookup_by_user_id() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/subscription/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "subscription_url": "https://vpn.example.com/sub/alice",
            "subscription_id": 7,
            "username": "alice",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sub = client.subscription_url(42).await.unwrap();
    assert_eq!(sub.url.as_deref(), Some("https://vpn.example.com/sub/alice"));
    assert_eq!(sub.subscription_id, Some(7));
    assert_eq!(sub.username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn subscription_lookup_accepts_legacy_url_key() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/subscription/43"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"url": "https://x/sub/carol"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sub = client.subscription_url(43).await.unwrap();
    assert_eq!(sub.url.as_deref(), Some("https://x/sub/carol"));
}

#[tokio::test]
async fn subscription_lookup_by_username() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/subscription/by-username/bob"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"subscription_url": "https://x/sub/bob"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sub = client.subscription_url_by_username("bob").await.unwrap();
    assert_eq!(sub.url.as_deref(), Some("https://x/sub/bob"));
}

#[tokio::test]
async fn payments_filtered_and_paginated() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/payments"))
        .and(query_param("status", "pending"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "payments": [{"id": 1, "status": "pending", "amount": 9.99}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = PaymentQuery {
        status: Some("pending".to_owned()),
        limit: Some(10),
        offset: Some(20),
    };
    let payments = client.list_payments(&query).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status.as_deref(), Some("pending"));
}

#[tokio::test]
async fn payments_accept_bare_array() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/payments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2}, {"id": 3}])))
        .mount(&server)
        .await;

    let payments = client.list_payments(&PaymentQuery::default()).await.unwrap();
    assert_eq!(payments.len(), 2);
}

#[tokio::test]
async fn confirm_payment_uses_put() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/payments/7/confirm"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 7, "status": "confirmed"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let payment = client.confirm_payment(7).await.unwrap();
    assert_eq!(payment.status.as_deref(), Some("confirmed"));
}

#[tokio::test]
async fn tariffs_come_back_typed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/tariffs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1, "name": "Basic", "price": 4.99, "duration_days": 30}],
        })))
        .mount(&server)
        .await;

    let tariffs = client.list_tariffs().await.unwrap();
    assert_eq!(tariffs.len(), 1);
    assert_eq!(tariffs[0].name, "Basic");
    assert_eq!(tariffs[0].duration_days, Some(30));
}

#[tokio::test]
async fn subscriptions_filter_by_user_and_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/subscriptions"))
        .and(query_param("user_id", "5"))
        .and(query_param("status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 8, "user_id": 5, "status": "active"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let subs = client
        .list_subscriptions(Some(5), Some("active"))
        .await
        .unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].id, 8);
}

#[tokio::test]
async fn reboot_server_posts_to_address_path() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/server/10.0.0.5/reboot"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "ok"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ack = client.reboot_server("10.0.0.5").await.unwrap();
    assert_eq!(ack.success, Some(true));
}

#[tokio::test]
async fn sidecar_error_surfaces_detail() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/payments/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "payment not found"})),
        )
        .mount(&server)
        .await;

    let err = client.get_payment(404).await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 404, ref message } if message == "payment not found"));
}
