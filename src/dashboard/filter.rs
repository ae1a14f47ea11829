use serde::Deserialize;
use time::{
    macros::format_description, util::days_in_year_month, Date, Duration, OffsetDateTime,
    PrimitiveDateTime, Time, UtcOffset,
};

use crate::members::repo_types::Member;

/// Raw filter parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    pub search: Option<String>,
    pub skill: Option<String>,
    pub years: Option<String>,
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Either every value or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    fn from_param(param: Option<&str>) -> Self {
        match param {
            None | Some("") | Some("all") => Choice::All,
            Some(v) => Choice::Only(v.to_string()),
        }
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
    Custom {
        start: Option<String>,
        end: Option<String>,
    },
    /// Unknown mode; matches nothing.
    Unrecognized(String),
}

impl DateRange {
    fn from_params(mode: Option<&str>, start: Option<&str>, end: Option<&str>) -> Self {
        let non_empty = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);
        match mode {
            None | Some("") | Some("all") => DateRange::All,
            Some("today") => DateRange::Today,
            Some("week") => DateRange::Week,
            Some("month") => DateRange::Month,
            Some("custom") => DateRange::Custom {
                start: non_empty(start),
                end: non_empty(end),
            },
            Some(other) => DateRange::Unrecognized(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub search: String,
    pub skill: Choice,
    pub tenure: Choice,
    pub date: DateRange,
}

impl FilterConfig {
    pub fn from_query(q: &FilterQuery) -> Self {
        Self {
            search: q.search.clone().unwrap_or_default(),
            skill: Choice::from_param(q.skill.as_deref()),
            tenure: Choice::from_param(q.years.as_deref()),
            date: DateRange::from_params(q.date.as_deref(), q.start.as_deref(), q.end.as_deref()),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        *self == FilterConfig::default()
    }
}

/// Calendar day used for the relative date ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDay {
    pub date: Date,
    pub offset: UtcOffset,
}

impl LocalDay {
    pub fn at(now: OffsetDateTime, offset: UtcOffset) -> Self {
        Self {
            date: now.to_offset(offset).date(),
            offset,
        }
    }

    fn start_of(&self, date: Date) -> OffsetDateTime {
        PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_offset(self.offset)
    }

    /// True when `ts` lies on or after the start of `first` and before the
    /// start of the day after `last`.
    fn within(&self, ts: OffsetDateTime, first: Date, last: Date) -> bool {
        if ts < self.start_of(first) {
            return false;
        }
        match last.next_day() {
            Some(after) => ts < self.start_of(after),
            None => true,
        }
    }
}

/// Same day one calendar month earlier, clamped to the shorter month's end.
/// Mar 31 gives Feb 29, not a rollover into early March.
fn one_month_before(date: Date) -> Date {
    let (year, month) = match date.month() {
        time::Month::January => (date.year() - 1, time::Month::December),
        m => (date.year(), m.previous()),
    };
    let day = date.day().min(days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN)
}

fn parse_day(s: &str) -> Option<Date> {
    Date::parse(s, format_description!("[year]-[month]-[day]")).ok()
}

fn matches_search(member: &Member, needle_lower: &str) -> bool {
    needle_lower.is_empty()
        || member.full_name.to_lowercase().contains(needle_lower)
        || member.email.to_lowercase().contains(needle_lower)
}

fn matches_date(member: &Member, range: &DateRange, day: &LocalDay) -> bool {
    let ts = member.created_at;
    match range {
        DateRange::All => true,
        DateRange::Today => day.within(ts, day.date, day.date),
        DateRange::Week => {
            let from = day.date.checked_sub(Duration::days(7)).unwrap_or(Date::MIN);
            ts >= day.start_of(from)
        }
        DateRange::Month => ts >= day.start_of(one_month_before(day.date)),
        DateRange::Custom {
            start: Some(start),
            end: Some(end),
        } => match (parse_day(start), parse_day(end)) {
            (Some(first), Some(last)) => day.within(ts, first, last),
            _ => false,
        },
        // a half-open custom range applies no constraint
        DateRange::Custom { .. } => true,
        DateRange::Unrecognized(_) => false,
    }
}

/// Members passing every predicate of `config`, in input order.
pub fn filter_members<'a>(
    members: &'a [Member],
    config: &FilterConfig,
    day: &LocalDay,
) -> Vec<&'a Member> {
    let needle = config.search.to_lowercase();
    members
        .iter()
        .filter(|m| {
            matches_search(m, &needle)
                && config.skill.matches(&m.experience)
                && config.tenure.matches(&m.years_playing)
                && matches_date(m, &config.date, day)
        })
        .collect()
}
