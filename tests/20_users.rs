mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use stethoscope_api::store::{DocumentStore, USERS};

use common::{object, send, test_app, GOOD_TOKEN, TEST_UID};

#[tokio::test]
async fn register_creates_user_document_once() -> Result<()> {
    let (app, store) = test_app();

    let (status, body) = send(
        app,
        Method::POST,
        "/register",
        Some(GOOD_TOKEN),
        Some(json!({
            "email": "test@example.com",
            "firstName": "Test",
            "timeZone": "PST"
        })),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("User {} registered.", TEST_UID));

    let doc = store.get(USERS, TEST_UID).await?.expect("document created");
    assert_eq!(doc["userID"], TEST_UID);
    assert_eq!(doc["email"], "test@example.com");
    assert_eq!(doc["deviceIDs"], json!([]));
    assert_eq!(doc["deviceNicknames"], json!({}));
    assert_eq!(doc["currentDeviceID"], "");
    assert_eq!(store.put_count(), 1);
    Ok(())
}

#[tokio::test]
async fn register_missing_fields_reports_inline_error() -> Result<()> {
    let (app, store) = test_app();

    let (status, body) = send(
        app,
        Method::POST,
        "/register",
        Some(GOOD_TOKEN),
        Some(json!({ "email": "test@example.com" })),
    )
    .await?;

    // Inline-error contract: the client reads the body, not the status
    assert_eq!(status, StatusCode::OK);
    let error = body["error"].as_str().expect("error key present");
    assert!(error.contains("Missing required fields"));
    assert!(error.contains("firstName"));
    assert!(error.contains("timeZone"));
    assert_eq!(store.put_count(), 0);
    Ok(())
}

#[tokio::test]
async fn register_keeps_client_supplied_extras() -> Result<()> {
    let (app, store) = test_app();

    let (status, _) = send(
        app,
        Method::POST,
        "/register",
        Some(GOOD_TOKEN),
        Some(json!({
            "email": "test@example.com",
            "firstName": "Test",
            "timeZone": "PST",
            "deviceIDs": ["d1"],
            "clinic": "northside"
        })),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    let doc = store.get(USERS, TEST_UID).await?.expect("document created");
    assert_eq!(doc["deviceIDs"], json!(["d1"]));
    assert_eq!(doc["clinic"], "northside");
    Ok(())
}

#[tokio::test]
async fn login_returns_stored_profile() -> Result<()> {
    let (app, store) = test_app();
    store
        .put(
            USERS,
            TEST_UID,
            object(json!({
                "userID": TEST_UID,
                "email": "test@example.com",
                "firstName": "Test"
            })),
        )
        .await?;

    let (status, body) = send(app, Method::GET, "/login", Some(GOOD_TOKEN), None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "test@example.com");
    assert_eq!(body["firstName"], "Test");
    Ok(())
}

#[tokio::test]
async fn login_without_profile_reports_inline_error() -> Result<()> {
    let (app, _store) = test_app();

    let (status, body) = send(app, Method::GET, "/login", Some(GOOD_TOKEN), None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error": "Profile not found" }));
    Ok(())
}

#[tokio::test]
async fn update_device_requires_field() -> Result<()> {
    let (app, _store) = test_app();

    let (status, body) = send(
        app,
        Method::POST,
        "/user/update-device",
        Some(GOOD_TOKEN),
        Some(json!({ "device": "d1" })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Missing currentDeviceID");
    Ok(())
}

#[tokio::test]
async fn update_device_sets_current_device() -> Result<()> {
    let (app, store) = test_app();
    store
        .put(
            USERS,
            TEST_UID,
            object(json!({ "userID": TEST_UID, "currentDeviceID": "" })),
        )
        .await?;

    let (status, body) = send(
        app,
        Method::POST,
        "/user/update-device",
        Some(GOOD_TOKEN),
        Some(json!({ "currentDeviceID": "device9876" })),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Current device updated successfully");

    let doc = store.get(USERS, TEST_UID).await?.expect("document present");
    assert_eq!(doc["currentDeviceID"], "device9876");
    Ok(())
}

#[tokio::test]
async fn update_device_for_unregistered_user_is_silent_noop() -> Result<()> {
    let (app, store) = test_app();

    let (status, _) = send(
        app,
        Method::POST,
        "/user/update-device",
        Some(GOOD_TOKEN),
        Some(json!({ "currentDeviceID": "device9876" })),
    )
    .await?;

    // The update acknowledges success but never creates a document
    assert_eq!(status, StatusCode::OK);
    assert!(store.get(USERS, TEST_UID).await?.is_none());
    Ok(())
}
