use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /recordings/compile - all recordings for the caller's current device
pub async fn compile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let device_id = state
        .users()
        .current_device(&auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("No device set for user."))?;

    let recordings = state.recordings().for_device(&device_id).await?;

    Ok(Json(Value::Array(recordings)))
}

/// PUT /recordings/update-title - set a recording's session title
pub async fn update_title(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let (Some(recording_id), Some(title)) = (
        non_empty_str(&payload, "recordingID"),
        non_empty_str(&payload, "title"),
    ) else {
        return Err(ApiError::bad_request("Missing recordingID or title"));
    };

    state.recordings().set_title(recording_id, title).await?;

    Ok(Json(json!({
        "message": "Current recording title updated successfully"
    })))
}

/// PUT /recordings/update-notes - set a recording's notes
pub async fn update_notes(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let (Some(recording_id), Some(notes)) = (
        non_empty_str(&payload, "recordingID"),
        non_empty_str(&payload, "note"),
    ) else {
        return Err(ApiError::bad_request("Missing recordingID or note"));
    };

    state.recordings().set_notes(recording_id, notes).await?;

    Ok(Json(json!({
        "message": "Current recording note updated successfully"
    })))
}

/// PUT /recordings/update-view - mark a recording as viewed
///
/// The client only ever flips this one way; `view: false` is rejected.
pub async fn update_view(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let recording_id = non_empty_str(&payload, "recordingID");
    let view = payload.get("view").and_then(Value::as_bool).unwrap_or(false);

    let Some(recording_id) = recording_id.filter(|_| view) else {
        return Err(ApiError::bad_request("Missing recording ID or view bool"));
    };

    state.recordings().set_viewed(recording_id, view).await?;

    Ok(Json(json!({
        "message": "Current recording view boolean updated successfully"
    })))
}

/// Required body fields are rejected when absent, null or empty, matching
/// how the client validates its own inputs.
fn non_empty_str<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
