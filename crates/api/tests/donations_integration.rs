//! Integration tests for the donation ledger: creation, visibility, the
//! admin override and campaign total consistency.

mod common;

use axum::http::StatusCode;
use domain::models::UserRole;
use persistence::repositories::DonationRepository;
use rust_decimal::Decimal;
use serde_json::json;

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
async fn test_anonymous_donation_requires_payer_email() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (_, campaign_id) = app.create_campaign(&coordinator_token).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/v1/donations",
            None,
            Some(json!({"campaign_id": campaign_id, "amount": "100.00", "provider": "monobank"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{}", body);

    let (status, body) = app
        .request(
            "POST",
            "/api/v1/donations",
            None,
            Some(json!({
                "campaign_id": campaign_id,
                "amount": "100.00",
                "provider": "monobank",
                "payer_email": "donor@example.com"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["currency"], "UAH");
    let reference = body["reference"].as_str().unwrap();
    assert_eq!(reference.len(), 16);
    assert!(reference.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_amount_must_be_positive() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (_, campaign_id) = app.create_campaign(&coordinator_token).await;
    let (_, donor_token) = app.create_user(UserRole::Volunteer).await;

    let (status, _) = app
        .request(
            "POST",
            "/api/v1/donations",
            Some(&donor_token),
            Some(json!({"campaign_id": campaign_id, "amount": "0", "provider": "manual"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_authenticated_caller_becomes_donor() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (_, campaign_id) = app.create_campaign(&coordinator_token).await;
    let (donor, donor_token) = app.create_user(UserRole::Volunteer).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/v1/donations",
            Some(&donor_token),
            Some(json!({"campaign_id": campaign_id, "amount": "250.00", "provider": "manual"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["donor_id"].as_i64().unwrap(), donor.id);

    // The donor can read it back by reference
    let reference = body["reference"].as_str().unwrap();
    let (status, body) = app
        .request(
            "GET",
            &format!("/api/v1/donations/{}", reference),
            Some(&donor_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["reference"], reference);

    // An unrelated volunteer cannot
    let (_, stranger_token) = app.create_user(UserRole::Volunteer).await;
    let (status, _) = app
        .request(
            "GET",
            &format!("/api/v1/donations/{}", reference),
            Some(&stranger_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_override_succeeded_is_idempotent() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (_, campaign_id) = app.create_campaign(&coordinator_token).await;
    let (_, donor_token) = app.create_user(UserRole::Volunteer).await;
    let (_, admin_token) = app.create_user(UserRole::Admin).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/v1/donations",
            Some(&donor_token),
            Some(json!({"campaign_id": campaign_id, "amount": "300.00", "provider": "manual"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let reference = body["reference"].as_str().unwrap().to_string();

    let before = campaign_total(&app, campaign_id).await;

    let override_uri = format!("/api/v1/donations/{}/status", reference);
    let (status, body) = app
        .request(
            "PATCH",
            &override_uri,
            Some(&admin_token),
            Some(json!({"status": "succeeded"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "succeeded");
    assert!(body["confirmed_at"].is_string());

    let after_first = campaign_total(&app, campaign_id).await;
    assert_eq!(after_first - before, Decimal::new(30000, 2));

    // Re-marking succeeded must not credit the campaign again
    let (status, _) = app
        .request(
            "PATCH",
            &override_uri,
            Some(&admin_token),
            Some(json!({"status": "succeeded"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(campaign_total(&app, campaign_id).await, after_first);
}

#[tokio::test]
async fn test_override_requires_admin() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (_, campaign_id) = app.create_campaign(&coordinator_token).await;
    let (_, donor_token) = app.create_user(UserRole::Volunteer).await;

    let (status, body) = app
        .request(
            "POST",
            "/api/v1/donations",
            Some(&donor_token),
            Some(json!({"campaign_id": campaign_id, "amount": "10.00", "provider": "manual"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let reference = body["reference"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/v1/donations/{}/status", reference),
            Some(&donor_token),
            Some(json!({"status": "succeeded"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_campaign_total_matches_succeeded_sum() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (_, campaign_id) = app.create_campaign(&coordinator_token).await;
    let (_, donor_token) = app.create_user(UserRole::Volunteer).await;
    let (_, admin_token) = app.create_user(UserRole::Admin).await;

    let mut references = Vec::new();
    for amount in ["100.00", "40.50", "9.99"] {
        let (status, body) = app
            .request(
                "POST",
                "/api/v1/donations",
                Some(&donor_token),
                Some(json!({"campaign_id": campaign_id, "amount": amount, "provider": "manual"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        references.push(body["reference"].as_str().unwrap().to_string());
    }

    // Confirm the first two, fail the third
    for reference in &references[..2] {
        let (status, _) = app
            .request(
                "PATCH",
                &format!("/api/v1/donations/{}/status", reference),
                Some(&admin_token),
                Some(json!({"status": "succeeded"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/v1/donations/{}/status", references[2]),
            Some(&admin_token),
            Some(json!({"status": "failed"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let donations = DonationRepository::new(app.pool.clone());
    let succeeded_sum = donations.succeeded_total(campaign_id).await.unwrap();
    assert_eq!(campaign_total(&app, campaign_id).await, succeeded_sum);
    assert_eq!(succeeded_sum, Decimal::new(14050, 2));
}

#[tokio::test]
async fn test_donation_list_is_role_scoped() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (_, campaign_id) = app.create_campaign(&coordinator_token).await;
    let (_, first_token) = app.create_user(UserRole::Volunteer).await;
    let (_, second_token) = app.create_user(UserRole::Volunteer).await;

    for token in [&first_token, &second_token] {
        let (status, _) = app
            .request(
                "POST",
                "/api/v1/donations",
                Some(token),
                Some(json!({"campaign_id": campaign_id, "amount": "25.00", "provider": "manual"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // A donor sees only their own rows
    let (status, body) = app
        .request("GET", "/api/v1/donations", Some(&first_token), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    // The coordinator sees both (their campaign)
    let (status, body) = app
        .request("GET", "/api/v1/donations", Some(&coordinator_token), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["items"].as_array().unwrap().len() >= 2);
}
