use std::sync::Arc;

use time::UtcOffset;

use crate::dashboard::aggregate::Charts;
use crate::dashboard::filter::{filter_members, FilterConfig, LocalDay};
use crate::members::repo_types::Member;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    Loaded(Vec<Member>),
    LoadFailed(String),
    FilterChanged(FilterConfig),
}

/// Dashboard view state. Transitions consume the old value and return the
/// next one.
#[derive(Debug, Clone)]
pub struct DashboardState {
    status: LoadStatus,
    members: Arc<[Member]>,
    filter: FilterConfig,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            status: LoadStatus::Loading,
            members: Arc::from(Vec::new()),
            filter: FilterConfig::default(),
        }
    }
}

impl DashboardState {
    pub fn apply(self, event: DashboardEvent) -> Self {
        match event {
            // a fresh snapshot replaces whatever was loaded before
            DashboardEvent::Loaded(rows) => Self {
                status: LoadStatus::Ready,
                members: rows.into(),
                ..self
            },
            DashboardEvent::LoadFailed(msg) => Self {
                status: LoadStatus::Failed(msg),
                members: Arc::from(Vec::new()),
                ..self
            },
            DashboardEvent::FilterChanged(filter) => Self { filter, ..self },
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    pub fn total(&self) -> usize {
        self.members.len()
    }

    /// Rows for the table and the CSV export.
    pub fn visible(&self, day: &LocalDay) -> Vec<&Member> {
        match self.status {
            LoadStatus::Ready => filter_members(&self.members, &self.filter, day),
            _ => Vec::new(),
        }
    }

    /// Charts always describe the whole snapshot, not the table filter.
    pub fn charts(&self, offset: UtcOffset) -> Charts {
        Charts::from_members(&self.members, offset)
    }
}
