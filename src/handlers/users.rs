use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

const REQUIRED_FIELDS: [&str; 3] = ["email", "firstName", "timeZone"];

/// POST /register - create the caller's user document
///
/// The document is keyed by the verified provider id; any extra fields the
/// client sends are stored as-is.
pub async fn register(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let Value::Object(mut body) = payload else {
        return Err(ApiError::bad_request("Expected a JSON object"));
    };

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !body.contains_key(**field))
        .copied()
        .collect();

    // The mobile client detects this failure from the body, not the status
    // code, so it stays a 200 with an inline "error" key.
    if !missing.is_empty() {
        return Ok(Json(json!({
            "error": format!("Missing required fields: {:?}", missing)
        })));
    }

    body.entry("deviceIDs").or_insert(json!([]));
    body.entry("deviceNicknames").or_insert(json!({}));
    body.entry("currentDeviceID").or_insert(json!(""));

    state.users().create(&auth.user_id, body).await?;

    Ok(Json(json!({
        "message": format!("User {} registered.", auth.user_id)
    })))
}

/// GET /login - fetch the caller's stored profile
pub async fn login(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    match state.users().fetch(&auth.user_id).await? {
        Some(profile) => Ok(Json(Value::Object(profile))),
        // Same inline-error style as /register
        None => Ok(Json(json!({ "error": "Profile not found" }))),
    }
}

/// POST /user/update-device - point the caller at a new current device
pub async fn update_device(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let device = payload
        .get("currentDeviceID")
        .cloned()
        .ok_or_else(|| ApiError::bad_request("Missing currentDeviceID"))?;

    state.users().set_current_device(&auth.user_id, device).await?;

    Ok(Json(json!({ "message": "Current device updated successfully" })))
}
