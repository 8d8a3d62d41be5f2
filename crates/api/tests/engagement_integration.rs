//! Integration tests for the volunteer engagement workflow: applications,
//! shift joins with capacity enforcement, and the upcoming-assignments view.

mod common;

use axum::http::StatusCode;
use domain::models::shift::ShiftStatus;
use domain::models::UserRole;
use persistence::repositories::{AssignmentRepository, ShiftRepository};
use serde_json::json;

#[tokio::test]
async fn test_apply_withdraw_reapply_reuses_row() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (_, volunteer_token) = app.create_user(UserRole::Volunteer).await;
    let (slug, _) = app.create_campaign(&coordinator_token).await;

    // Fresh application
    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/campaigns/{}/apply", slug),
            Some(&volunteer_token),
            Some(json!({"motivation": "first try"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let application_id = body["id"].as_i64().unwrap();
    assert_eq!(body["status"], "pending");

    // Double apply while pending is a duplicate
    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/campaigns/{}/apply", slug),
            Some(&volunteer_token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "duplicate");

    // Withdraw, then re-apply: same row comes back as pending
    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/v1/volunteer-applications/{}", application_id),
            Some(&volunteer_token),
            Some(json!({"status": "withdrawn"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/campaigns/{}/apply", slug),
            Some(&volunteer_token),
            Some(json!({"motivation": "second try"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["id"].as_i64().unwrap(), application_id);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["motivation"], "second try");
}

#[tokio::test]
async fn test_coordinator_cannot_apply_to_own_campaign() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (slug, _) = app.create_campaign(&coordinator_token).await;

    let (status, _) = app
        .request(
            "POST",
            &format!("/api/v1/campaigns/{}/apply", slug),
            Some(&coordinator_token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_volunteer_cannot_approve_own_application() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (_, volunteer_token) = app.create_user(UserRole::Volunteer).await;
    let (slug, _) = app.create_campaign(&coordinator_token).await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/campaigns/{}/apply", slug),
            Some(&volunteer_token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let application_id = body["id"].as_i64().unwrap();

    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/v1/volunteer-applications/{}", application_id),
            Some(&volunteer_token),
            Some(json!({"status": "approved"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_join_requires_approved_application() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (_, volunteer_token) = app.create_user(UserRole::Volunteer).await;
    let (slug, _) = app.create_campaign(&coordinator_token).await;
    let shift_id = app.create_shift(&coordinator_token, &slug, 3, 24).await;

    // Pending application is not enough
    let (status, _) = app
        .request(
            "POST",
            &format!("/api/v1/campaigns/{}/apply", slug),
            Some(&volunteer_token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .request(
            "POST",
            &format!("/api/v1/campaign-shifts/{}/join", shift_id),
            Some(&volunteer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_capacity_one_join_scenario() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (_, first_token) = app.create_user(UserRole::Volunteer).await;
    let (_, second_token) = app.create_user(UserRole::Volunteer).await;
    let (slug, _) = app.create_campaign(&coordinator_token).await;
    let shift_id = app.create_shift(&coordinator_token, &slug, 1, 24).await;

    app.approved_application(&first_token, &coordinator_token, &slug)
        .await;
    app.approved_application(&second_token, &coordinator_token, &slug)
        .await;

    let join_uri = format!("/api/v1/campaign-shifts/{}/join", shift_id);

    // First volunteer takes the only slot
    let (status, body) = app.request("POST", &join_uri, Some(&first_token), None).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    // Rejoin is idempotent
    let (status, _) = app.request("POST", &join_uri, Some(&first_token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Second volunteer hits the capacity limit
    let (status, body) = app.request("POST", &join_uri, Some(&second_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "capacity_exceeded");

    // Leaving frees the slot
    let leave_uri = format!("/api/v1/campaign-shifts/{}/leave", shift_id);
    let (status, _) = app.request("DELETE", &leave_uri, Some(&first_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.request("DELETE", &leave_uri, Some(&first_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.request("POST", &join_uri, Some(&second_token), None).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_concurrent_joins_cannot_both_take_last_slot() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (_, first_token) = app.create_user(UserRole::Volunteer).await;
    let (_, second_token) = app.create_user(UserRole::Volunteer).await;
    let (slug, _) = app.create_campaign(&coordinator_token).await;
    let shift_id = app.create_shift(&coordinator_token, &slug, 1, 24).await;

    app.approved_application(&first_token, &coordinator_token, &slug)
        .await;
    app.approved_application(&second_token, &coordinator_token, &slug)
        .await;

    let join_uri = format!("/api/v1/campaign-shifts/{}/join", shift_id);
    let ((first_status, _), (second_status, _)) = tokio::join!(
        app.request("POST", &join_uri, Some(&first_token), None),
        app.request("POST", &join_uri, Some(&second_token), None)
    );

    let statuses = [first_status, second_status];
    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::CREATED).count(),
        1,
        "exactly one join must win: {:?}",
        statuses
    );
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::BAD_REQUEST)
            .count(),
        1,
        "the other must be rejected: {:?}",
        statuses
    );

    let shifts = ShiftRepository::new(app.pool.clone());
    assert_eq!(shifts.count_approved(shift_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_join_rejected_on_cancelled_shift() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (volunteer, volunteer_token) = app.create_user(UserRole::Volunteer).await;
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (slug, _) = app.create_campaign(&coordinator_token).await;
    let shift_id = app.create_shift(&coordinator_token, &slug, 3, 24).await;
    app.approved_application(&volunteer_token, &coordinator_token, &slug)
        .await;

    let shifts = ShiftRepository::new(app.pool.clone());
    shifts
        .update_status(shift_id, ShiftStatus::Cancelled)
        .await
        .unwrap()
        .expect("shift exists");

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/campaign-shifts/{}/join", shift_id),
            Some(&volunteer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "invalid_state");

    let assignments = AssignmentRepository::new(app.pool.clone());
    let existing = assignments
        .find_by_shift_and_volunteer(shift_id, volunteer.id)
        .await
        .unwrap();
    assert!(existing.is_none());
}

#[tokio::test]
async fn test_my_upcoming_assignments_ordering() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (_, coordinator_token) = app.create_user(UserRole::Coordinator).await;
    let (slug, _) = app.create_campaign(&coordinator_token).await;
    // The owning coordinator joins without an application.
    let later_shift = app.create_shift(&coordinator_token, &slug, 5, 48).await;
    let sooner_shift = app.create_shift(&coordinator_token, &slug, 5, 12).await;

    for shift_id in [later_shift, sooner_shift] {
        let (status, _) = app
            .request(
                "POST",
                &format!("/api/v1/campaign-shifts/{}/join", shift_id),
                Some(&coordinator_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .request(
            "GET",
            "/api/v1/my-shift-assignments",
            Some(&coordinator_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["shift_id"].as_i64().unwrap(), sooner_shift);
    assert_eq!(items[1]["shift_id"].as_i64().unwrap(), later_shift);
}

#[tokio::test]
async fn test_my_upcoming_requires_auth() {
    let Some(app) = common::try_init().await else {
        return;
    };
    let (status, _) = app
        .request("GET", "/api/v1/my-shift-assignments", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
