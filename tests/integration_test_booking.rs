mod common;

use axum::http::StatusCode;
use common::{days_from_now, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_booking_appears_in_listing() {
    let app = TestApp::new().await;
    let session_id = app.create_session("Club Night", days_from_now(2), None).await;

    let (status, body) = app.book(&session_id, "  Ada Lovelace ", "Ada@Example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["booking"]["session_id"], session_id.as_str());
    assert_eq!(body["booking"]["player_name"], "Ada Lovelace");
    assert_eq!(body["booking"]["player_email"], "ada@example.com");

    let (_, listing) = app.call("GET", "/api/sessions", None).await;
    let session = &listing[0];
    assert_eq!(session["booking_count"], 1);
    assert_eq!(session["available_spots"], 15);
    assert_eq!(session["bookings"][0]["id"], body["booking"]["id"]);
}

#[tokio::test]
async fn test_bookings_listed_in_creation_order() {
    let app = TestApp::new().await;
    let session_id = app.create_session("Ordered", days_from_now(2), None).await;

    for name in ["First", "Second", "Third"] {
        let (status, _) = app.book(&session_id, name, &format!("{}@club.test", name.to_lowercase())).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, listing) = app.call("GET", "/api/sessions", None).await;
    let names: Vec<&str> = listing[0]["bookings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["player_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn test_full_session_rejects_next_booking() {
    let app = TestApp::new().await;
    let session_id = app.create_session("Packed", days_from_now(1), None).await;

    for i in 0..16 {
        let (status, _) = app.book(&session_id, &format!("Player {}", i), &format!("p{}@club.test", i)).await;
        assert_eq!(status, StatusCode::OK, "booking {} should fit", i);
    }

    let (status, body) = app.book(&session_id, "Latecomer", "late@club.test").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Session is full");
    assert_eq!(app.booking_count(&session_id).await, 16);

    let (_, listing) = app.call("GET", "/api/sessions", None).await;
    assert_eq!(listing[0]["available_spots"], 0);
}

#[tokio::test]
async fn test_duplicate_email_rejected_case_insensitively() {
    let app = TestApp::new().await;
    let session_id = app.create_session("Dupes", days_from_now(1), None).await;

    let (status, _) = app.book(&session_id, "Grace", "grace@club.test").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.book(&session_id, "Grace Again", "GRACE@club.test").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You already have a booking for this session");
    assert_eq!(app.booking_count(&session_id).await, 1);
}

#[tokio::test]
async fn test_same_email_may_book_different_sessions() {
    let app = TestApp::new().await;
    let first = app.create_session("Monday", days_from_now(1), None).await;
    let second = app.create_session("Tuesday", days_from_now(2), None).await;

    assert_eq!(app.book(&first, "Grace", "grace@club.test").await.0, StatusCode::OK);
    assert_eq!(app.book(&second, "Grace", "grace@club.test").await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_booking_unknown_session() {
    let app = TestApp::new().await;

    let (status, body) = app.book("no-such-session", "Alan", "alan@club.test").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Session not found");
}

#[tokio::test]
async fn test_booking_missing_or_invalid_fields() {
    let app = TestApp::new().await;
    let session_id = app.create_session("Validation", days_from_now(1), None).await;

    let (status, body) = app
        .call("POST", "/api/bookings", Some(json!({ "sessionId": session_id, "playerName": "Alan" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: sessionId, playerName, playerEmail");

    let (status, body) = app.book(&session_id, "   ", "alan@club.test").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app.book(&session_id, "Alan", "not-an-email").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email address");

    assert_eq!(app.booking_count(&session_id).await, 0);
}

#[tokio::test]
async fn test_cancel_matches_email_case_insensitively() {
    let app = TestApp::new().await;
    let session_id = app.create_session("Cancel", days_from_now(1), None).await;
    let (_, booked) = app.book(&session_id, "Edsger", "edsger@club.test").await;

    let (status, body) = app
        .call(
            "POST",
            "/api/bookings/cancel",
            Some(json!({ "sessionId": session_id, "playerEmail": " Edsger@CLUB.test " })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["cancelledBooking"]["id"], booked["booking"]["id"]);
    assert_eq!(app.booking_count(&session_id).await, 0);

    // the freed seat can be taken again
    let (status, _) = app.book(&session_id, "Edsger", "edsger@club.test").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cancel_without_booking_changes_nothing() {
    let app = TestApp::new().await;
    let session_id = app.create_session("Cancel", days_from_now(1), None).await;
    app.book(&session_id, "Barbara", "barbara@club.test").await;

    let (status, body) = app
        .call(
            "POST",
            "/api/bookings/cancel",
            Some(json!({ "sessionId": session_id, "playerEmail": "someone@else.test" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No booking found for this email address in this session");
    assert_eq!(app.booking_count(&session_id).await, 1);

    let (status, body) = app
        .call("POST", "/api/bookings/cancel", Some(json!({ "sessionId": session_id })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: sessionId, playerEmail");
}
