//! Integration tests for the Monobank webhook ingress: signature
//! verification, status classification and exactly-once crediting.

mod common;

use axum::http::StatusCode;
use domain::models::UserRole;
use rust_decimal::Decimal;
use serde_json::json;

const WEBHOOK_URI: &str = "/api/v1/webhooks/monobank";

async fn pending_donation(
    app: &common::TestApp,
    amount: &str,
) -> (String, i64) {
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (_, campaign_id) = app.create_campaign(&coordinator_token).await;
    let (status, body) = app
        .request(
            "POST",
            "/api/v1/donations",
            None,
            Some(json!({
                "campaign_id": campaign_id,
                "amount": amount,
                "provider": "monobank",
                "payer_email": "donor@example.com"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    (body["reference"].as_str().unwrap().to_string(), campaign_id)
}

fn signed_webhook(reference: &str, provider_status: &str) -> (Vec<u8>, String) {
    let body = serde_json::to_vec(&json!({
        "provider": "monobank",
        "payload": {
            "data": {
                "invoiceId": reference,
                "status": provider_status,
                "amount": 10_000,
                "ccy": "UAH",
                "customerEmail": "payer@example.com",
                "customerName": "Payer"
            }
        }
    }))
    .unwrap();
    let signature = shared::crypto::webhook_signature(common::WEBHOOK_SECRET, &body);
    (body, signature)
}

async fn donation_status(app: &common::TestApp, reference: &str) -> String {
    let (status,): (String,) =
        sqlx::query_as("SELECT status::text FROM donations WHERE reference = $1")
            .bind(reference)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    status
}

async fn campaign_total(app: &common::TestApp, campaign_id: i64) -> Decimal {
    let (total,): (Decimal,) =
        sqlx::query_as("SELECT current_amount FROM campaigns WHERE id = $1")
            .bind(campaign_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    total
}

#[tokio::test]
async fn test_success_webhook_credits_exactly_once() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (reference, campaign_id) = pending_donation(&app, "100.00").await;
    let before = campaign_total(&app, campaign_id).await;

    let (body, signature) = signed_webhook(&reference, "success");
    let (status, response) = app
        .request_raw(WEBHOOK_URI, body.clone(), Some(&signature))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", response);
    assert_eq!(response["status"], "succeeded");
    assert_eq!(response["reference"], reference);

    assert_eq!(donation_status(&app, &reference).await, "succeeded");
    let after = campaign_total(&app, campaign_id).await;
    assert_eq!(after - before, Decimal::new(10000, 2));

    // Provider details copied from the payload
    let (external_id, payer_email): (Option<String>, Option<String>) = sqlx::query_as(
        "SELECT external_id, payer_email FROM donations WHERE reference = $1",
    )
    .bind(&reference)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(external_id.as_deref(), Some(reference.as_str()));
    assert_eq!(payer_email.as_deref(), Some("payer@example.com"));

    // Replay must be accepted but never credit again
    let (status, _) = app.request_raw(WEBHOOK_URI, body, Some(&signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(campaign_total(&app, campaign_id).await, after);
}

#[tokio::test]
async fn test_bad_signature_rejected_before_lookup() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (reference, _) = pending_donation(&app, "50.00").await;

    let (body, _) = signed_webhook(&reference, "success");
    let forged = shared::crypto::webhook_signature("wrong-secret", &body);
    let (status, response) = app.request_raw(WEBHOOK_URI, body, Some(&forged)).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{}", response);
    assert_eq!(donation_status(&app, &reference).await, "pending");
}

#[tokio::test]
async fn test_missing_signature_rejected_when_secret_configured() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (reference, _) = pending_donation(&app, "50.00").await;

    let (body, _) = signed_webhook(&reference, "success");
    let (status, _) = app.request_raw(WEBHOOK_URI, body, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(donation_status(&app, &reference).await, "pending");
}

#[tokio::test]
async fn test_unknown_invoice_is_not_found() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (body, signature) = signed_webhook("ffffffffffffffff", "success");
    let (status, _) = app.request_raw(WEBHOOK_URI, body, Some(&signature)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let body = b"{not json".to_vec();
    let signature = shared::crypto::webhook_signature(common::WEBHOOK_SECRET, &body);
    let (status, _) = app.request_raw(WEBHOOK_URI, body, Some(&signature)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unsupported_provider_is_bad_request() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let body = serde_json::to_vec(&json!({
        "provider": "paypal",
        "payload": {}
    }))
    .unwrap();
    let signature = shared::crypto::webhook_signature(common::WEBHOOK_SECRET, &body);
    let (status, _) = app.request_raw(WEBHOOK_URI, body, Some(&signature)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_failure_status_marks_failed_without_credit() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (reference, campaign_id) = pending_donation(&app, "75.00").await;
    let before = campaign_total(&app, campaign_id).await;

    let (body, signature) = signed_webhook(&reference, "failure");
    let (status, response) = app.request_raw(WEBHOOK_URI, body, Some(&signature)).await;
    assert_eq!(status, StatusCode::OK, "{}", response);
    assert_eq!(response["status"], "failed");
    assert_eq!(donation_status(&app, &reference).await, "failed");
    assert_eq!(campaign_total(&app, campaign_id).await, before);
}

#[tokio::test]
async fn test_unknown_status_stores_payload_as_processing() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (reference, campaign_id) = pending_donation(&app, "75.00").await;
    let before = campaign_total(&app, campaign_id).await;

    let (body, signature) = signed_webhook(&reference, "hold");
    let (status, response) = app.request_raw(WEBHOOK_URI, body, Some(&signature)).await;
    assert_eq!(status, StatusCode::OK, "{}", response);
    assert_eq!(response["status"], "processing");
    assert_eq!(donation_status(&app, &reference).await, "processing");
    assert_eq!(campaign_total(&app, campaign_id).await, before);

    let (payload,): (serde_json::Value,) =
        sqlx::query_as("SELECT payload FROM donations WHERE reference = $1")
            .bind(&reference)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(payload["monobank"]["status"], "hold");
}
