use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    auth::services::AdminSession,
    dashboard::{
        dto::{DashboardResponse, DashboardStatus},
        export::{export_csv, ExportError, CSV_CONTENT_TYPE},
        filter::{FilterConfig, FilterQuery, LocalDay},
        state::{DashboardEvent, DashboardState, LoadStatus},
    },
    state::AppState,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/members/export", get(export_members))
}

/// One fetch per request; a failed fetch leaves the dashboard in its
/// failed state with no rows.
async fn load(state: &AppState, filter: FilterConfig) -> DashboardState {
    let loaded = match state.members.list_all().await {
        Ok(rows) => DashboardEvent::Loaded(rows),
        Err(e) => {
            error!(error = %e, "fetch members failed");
            DashboardEvent::LoadFailed(format!("Failed to fetch members: {}", e))
        }
    };
    debug!(filtered = !filter.is_unfiltered(), "dashboard loaded");
    DashboardState::default()
        .apply(loaded)
        .apply(DashboardEvent::FilterChanged(filter))
}

#[instrument(skip(state, session))]
pub async fn dashboard(
    State(state): State<AppState>,
    session: AdminSession,
    Query(q): Query<FilterQuery>,
) -> Response {
    let offset = state.config.dashboard_offset();
    let day = LocalDay::at(OffsetDateTime::now_utc(), offset);
    debug!(session_expires_at = session.expires_at, "dashboard requested");
    let view = load(&state, FilterConfig::from_query(&q)).await;

    let (code, status, err) = match view.status() {
        LoadStatus::Failed(msg) => (StatusCode::BAD_GATEWAY, DashboardStatus::Failed, Some(msg.clone())),
        _ => (StatusCode::OK, DashboardStatus::Ready, None),
    };

    let members = view.visible(&day);
    let total = view.total();
    let summary = if members.len() == total {
        "All form submissions".to_string()
    } else {
        format!("Filtered from {} total", total)
    };

    let body = DashboardResponse {
        status,
        error: err,
        total,
        shown: members.len(),
        summary,
        members,
        charts: view.charts(offset),
    };
    (code, Json(body)).into_response()
}

#[instrument(skip(state, _session))]
pub async fn export_members(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(q): Query<FilterQuery>,
) -> Result<(HeaderMap, Bytes), (StatusCode, String)> {
    let offset = state.config.dashboard_offset();
    let now = OffsetDateTime::now_utc();
    let day = LocalDay::at(now, offset);
    let view = load(&state, FilterConfig::from_query(&q)).await;

    if let LoadStatus::Failed(msg) = view.status() {
        return Err((StatusCode::BAD_GATEWAY, msg.clone()));
    }

    let visible = view.visible(&day);
    let export = match export_csv(visible.iter().copied(), now.date(), offset) {
        Ok(e) => e,
        Err(ExportError::NothingToExport) => {
            warn!("csv export requested with no matching members");
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                ExportError::NothingToExport.to_string(),
            ));
        }
        Err(e) => {
            error!(error = %e, "csv export failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        export.filename
    ))
    .map_err(|e| {
        error!(error = %e, "bad content-disposition");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to download CSV: {}", e),
        )
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CSV_CONTENT_TYPE));
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    info!(rows = visible.len(), filename = %export.filename, "csv exported");
    Ok((headers, export.body))
}

#[cfg(test)]
mod dashboard_handler_tests {
    use super::*;
    use crate::auth::services::SessionKeys;
    use crate::members::repo::{InMemoryMemberSource, MemberSource};
    use crate::members::repo_types::Member;
    use axum::{body::Body, extract::FromRef, http::Request};
    use std::sync::Arc;
    use time::Duration;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn member(name: &str, skill: &str, age_days: i64) -> Member {
        Member {
            id: Uuid::new_v4(),
            full_name: name.into(),
            email: format!(
                "{}@example.com",
                name.chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_lowercase()
            ),
            phone: None,
            experience: skill.into(),
            years_playing: "2-5 years".into(),
            created_at: OffsetDateTime::now_utc() - Duration::days(age_days),
        }
    }

    fn seeded_state() -> AppState {
        let source = InMemoryMemberSource::with_members(vec![
            member("Jane, Q. Doe", "Elite", 1),
            member("Bob Jones", "Beginner", 40),
            member("Carla Diaz", "Elite", 60),
        ]);
        AppState::fake_with(Arc::new(source) as Arc<dyn MemberSource>)
    }

    fn get(uri: &str, state: &AppState) -> Request<Body> {
        let token = SessionKeys::from_ref(state).sign_session().unwrap();
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn requires_admin_session() {
        let app = dashboard_routes().with_state(seeded_state());
        let req = Request::builder()
            .uri("/admin/dashboard")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unfiltered_dashboard_lists_everything() {
        let state = seeded_state();
        let app = dashboard_routes().with_state(state.clone());
        let res = app.oneshot(get("/admin/dashboard", &state)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["status"], "ready");
        assert_eq!(json["total"], 3);
        assert_eq!(json["summary"], "All form submissions");
        assert_eq!(json["members"][0]["full_name"], "Jane, Q. Doe");
        assert_eq!(json["charts"]["growth"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn skill_filter_narrows_table_only() {
        let state = seeded_state();
        let app = dashboard_routes().with_state(state.clone());
        let res = app
            .oneshot(get("/admin/dashboard?skill=Elite&date=all", &state))
            .await
            .unwrap();
        let json = body_json(res).await;
        assert_eq!(json["shown"], 2);
        assert_eq!(json["summary"], "Filtered from 3 total");
        assert_eq!(json["members"][1]["full_name"], "Carla Diaz");
        let skill_total: u64 = json["charts"]["skill"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["count"].as_u64().unwrap())
            .sum();
        assert_eq!(skill_total, 3);
    }

    #[tokio::test]
    async fn fetch_failure_reports_error_without_rows() {
        let state = AppState::fake_with(Arc::new(InMemoryMemberSource::unreachable()));
        let app = dashboard_routes().with_state(state.clone());
        let res = app.oneshot(get("/admin/dashboard", &state)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(res).await;
        assert_eq!(json["status"], "failed");
        assert!(json["error"].as_str().unwrap().starts_with("Failed to fetch members"));
        assert_eq!(json["members"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn export_downloads_filtered_csv() {
        let state = seeded_state();
        let app = dashboard_routes().with_state(state.clone());
        let res = app
            .oneshot(get("/admin/members/export?date=week", &state))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], CSV_CONTENT_TYPE);
        let disposition = res.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        let expected = format!("members_{}.csv", OffsetDateTime::now_utc().date());
        assert!(disposition.contains(&expected), "{disposition}");

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.starts_with('\u{feff}'));
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("\"Jane, Q. Doe\",janeqdoe@example.com,,Elite,2-5 years,"));
    }

    #[tokio::test]
    async fn export_with_no_matches_is_refused() {
        let state = seeded_state();
        let app = dashboard_routes().with_state(state.clone());
        let res = app
            .oneshot(get("/admin/members/export?search=nobody", &state))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"No members to download");
    }
}
