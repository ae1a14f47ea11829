use serde::Serialize;

use crate::dashboard::aggregate::Charts;
use crate::members::repo_types::Member;

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardStatus {
    Ready,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse<'a> {
    pub status: DashboardStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub total: usize,
    pub shown: usize,
    /// "All form submissions" or "Filtered from N total".
    pub summary: String,
    pub members: Vec<&'a Member>,
    pub charts: Charts,
}
