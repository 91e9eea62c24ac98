use axum::{
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod store;

pub use state::AppState;

/// Build the full application router.
///
/// Everything except `/ping` sits behind the bearer-auth layer; the mobile
/// client sends an identity-provider ID token on every request.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(user_routes())
        .merge(recording_routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::bearer_auth,
        ));

    Router::new()
        .route("/ping", get(ping))
        .merge(protected)
        // Native mobile client; all origins allowed
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/register", post(users::register))
        .route("/login", get(users::login))
        .route("/user/update-device", post(users::update_device))
}

fn recording_routes() -> Router<AppState> {
    use handlers::recordings;

    Router::new()
        .route("/recordings/compile", get(recordings::compile))
        .route("/recordings/update-title", put(recordings::update_title))
        .route("/recordings/update-notes", put(recordings::update_notes))
        .route("/recordings/update-view", put(recordings::update_view))
}

/// GET /ping - liveness check used by the client during setup
async fn ping() -> axum::response::Json<Value> {
    axum::response::Json(json!({ "message": "server started successfully" }))
}
