use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse},
        services::{verify_password, SessionKeys},
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/admin/login", post(login))
}

/// Compares the submitted password with the shared admin secret. There is
/// no lockout or backoff on failure.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    let ok = match verify_password(&payload.password, &state.admin_hash) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "verify_password failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    if !ok {
        warn!("admin login rejected");
        return Err((StatusCode::UNAUTHORIZED, "Incorrect password".into()));
    }

    let keys = SessionKeys::from_ref(&state);
    let token = match keys.sign_session() {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "session sign failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!("admin logged in");
    Ok(Json(LoginResponse {
        token,
        expires_in: keys.ttl.as_secs(),
    }))
}
