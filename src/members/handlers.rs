use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    members::{
        dto::{CreateMemberRequest, CreatedMemberResponse, FormOptions},
        repo_types::{SkillLevel, Tenure},
        services::new_member_from_request,
    },
    state::AppState,
};

pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/members", post(create_member))
        .route("/options", get(form_options))
}

#[instrument(skip(state, payload))]
pub async fn create_member(
    State(state): State<AppState>,
    Json(payload): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<CreatedMemberResponse>), (StatusCode, String)> {
    let new_member = match new_member_from_request(payload) {
        Ok(m) => m,
        Err(msg) => {
            warn!(reason = %msg, "membership form rejected");
            return Err((StatusCode::BAD_REQUEST, msg));
        }
    };

    let member = match state.members.insert(new_member).await {
        Ok(m) => m,
        Err(e) => {
            error!(error = %e, "insert member failed");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to submit form. Please try again.".into(),
            ));
        }
    };

    info!(member_id = %member.id, "membership submitted");
    Ok((
        StatusCode::CREATED,
        Json(CreatedMemberResponse {
            id: member.id,
            created_at: member.created_at,
            message: "Welcome to the club! We will be in touch shortly.",
        }),
    ))
}

pub async fn form_options() -> Json<FormOptions> {
    Json(FormOptions {
        experience: SkillLevel::ALL.iter().map(|s| s.as_str()).collect(),
        years_playing: Tenure::ALL.iter().map(|t| t.as_str()).collect(),
    })
}
