//! Admin dashboard: member filtering, chart aggregation and CSV export.

pub mod aggregate;
mod dto;
pub mod export;
pub mod filter;
pub mod handlers;
pub mod state;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::dashboard_routes()
}
