use serde::Serialize;
use time::{macros::format_description, UtcOffset};

use crate::members::repo_types::Member;

/// Upper bound on growth chart points.
pub const MAX_GROWTH_POINTS: usize = 20;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrowthPoint {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Charts {
    pub growth: Vec<GrowthPoint>,
    pub skill: Vec<CategoryCount>,
    pub tenure: Vec<CategoryCount>,
}

impl Charts {
    pub fn from_members(members: &[Member], offset: UtcOffset) -> Self {
        Self {
            growth: growth_series(members, offset),
            skill: skill_distribution(members),
            tenure: tenure_distribution(members),
        }
    }
}

/// Running sign-up count in creation order, thinned to at most
/// [`MAX_GROWTH_POINTS`] points.
pub fn growth_series(members: &[Member], offset: UtcOffset) -> Vec<GrowthPoint> {
    let mut ordered: Vec<&Member> = members.iter().collect();
    ordered.sort_by_key(|m| m.created_at);

    let short_date = format_description!("[month repr:short] [day padding:none]");
    let points = ordered
        .into_iter()
        .enumerate()
        .map(|(i, m)| GrowthPoint {
            label: m
                .created_at
                .to_offset(offset)
                .format(short_date)
                .unwrap_or_default(),
            count: i + 1,
        })
        .collect();
    downsample(points)
}

/// Keeps every `ceil(n / MAX)`-th point plus the final one. When the strided
/// points already fill the budget, the last of them gives way to the final
/// point.
fn downsample<T>(points: Vec<T>) -> Vec<T> {
    let n = points.len();
    if n <= MAX_GROWTH_POINTS {
        return points;
    }
    let stride = n.div_ceil(MAX_GROWTH_POINTS);
    let last = n - 1;
    let mut kept = Vec::with_capacity(MAX_GROWTH_POINTS);
    let mut final_point = None;
    for (i, p) in points.into_iter().enumerate() {
        if i == last {
            final_point = Some(p);
        } else if i % stride == 0 {
            kept.push(p);
        }
    }
    if kept.len() >= MAX_GROWTH_POINTS {
        kept.truncate(MAX_GROWTH_POINTS - 1);
    }
    kept.extend(final_point);
    kept
}

pub fn skill_distribution(members: &[Member]) -> Vec<CategoryCount> {
    count_by(members, |m| m.experience.as_str())
}

pub fn tenure_distribution(members: &[Member]) -> Vec<CategoryCount> {
    count_by(members, |m| m.years_playing.as_str())
}

/// Groups in first-seen order; blank keys count as "Unknown".
fn count_by<F>(members: &[Member], key: F) -> Vec<CategoryCount>
where
    F: Fn(&Member) -> &str,
{
    let mut out: Vec<CategoryCount> = Vec::new();
    for m in members {
        let label = match key(m) {
            "" => UNKNOWN,
            k => k,
        };
        match out.iter_mut().find(|c| c.label == label) {
            Some(c) => c.count += 1,
            None => out.push(CategoryCount {
                label: label.to_string(),
                count: 1,
            }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{macros::datetime, Duration, OffsetDateTime};
    use uuid::Uuid;

    fn member(skill: &str, years: &str, at: OffsetDateTime) -> Member {
        Member {
            id: Uuid::new_v4(),
            full_name: "Test Golfer".into(),
            email: "golfer@example.com".into(),
            phone: None,
            experience: skill.into(),
            years_playing: years.into(),
            created_at: at,
        }
    }

    fn daily(n: usize) -> Vec<Member> {
        let base = datetime!(2024-01-01 9:00 UTC);
        // newest first, the way the record source returns them
        (0..n)
            .rev()
            .map(|i| member("Beginner", "0-1 years", base + Duration::days(i as i64)))
            .collect()
    }

    #[test]
    fn empty_input_gives_empty_charts() {
        let charts = Charts::from_members(&[], UtcOffset::UTC);
        assert_eq!(charts, Charts::default());
    }

    #[test]
    fn growth_counts_run_oldest_first() {
        let rows = daily(5);
        let series = growth_series(&rows, UtcOffset::UTC);
        let counts: Vec<usize> = series.iter().map(|p| p.count).collect();
        assert_eq!(counts, vec![1, 2, 3, 4, 5]);
        assert_eq!(series[0].label, "Jan 1");
        assert_eq!(series[4].label, "Jan 5");
    }

    #[test]
    fn growth_labels_use_offset() {
        let rows = vec![member("Elite", "10+ years", datetime!(2024-01-05 02:00 UTC))];
        let series = growth_series(&rows, UtcOffset::from_hms(-5, 0, 0).unwrap());
        assert_eq!(series[0].label, "Jan 4");
    }

    #[test]
    fn growth_of_twenty_is_untouched() {
        assert_eq!(growth_series(&daily(20), UtcOffset::UTC).len(), 20);
    }

    #[test]
    fn growth_downsamples_with_stride_and_keeps_last() {
        // n = 45, stride 3: indices 0,3,..,42 then 44
        let series = growth_series(&daily(45), UtcOffset::UTC);
        let counts: Vec<usize> = series.iter().map(|p| p.count).collect();
        let mut expected: Vec<usize> = (0..45).step_by(3).map(|i| i + 1).collect();
        expected.push(45);
        assert_eq!(counts, expected);
        assert!(series.len() <= MAX_GROWTH_POINTS);
    }

    #[test]
    fn growth_never_exceeds_budget() {
        for n in 21..=200 {
            let series = growth_series(&daily(n), UtcOffset::UTC);
            assert!(series.len() <= MAX_GROWTH_POINTS, "n = {n}");
            assert_eq!(series.last().map(|p| p.count), Some(n), "n = {n}");
            assert!(series.windows(2).all(|w| w[0].count < w[1].count), "n = {n}");
        }
    }

    #[test]
    fn forty_points_replace_last_stride_point_with_final() {
        let counts: Vec<usize> = growth_series(&daily(40), UtcOffset::UTC)
            .iter()
            .map(|p| p.count)
            .collect();
        assert_eq!(counts.len(), 20);
        assert_eq!(counts[18], 37);
        assert_eq!(counts[19], 40);
    }

    #[test]
    fn distributions_keep_first_seen_order_and_sum() {
        let t = datetime!(2024-01-01 0:00 UTC);
        let rows = vec![
            member("Elite", "10+ years", t),
            member("Beginner", "", t),
            member("Elite", "2-5 years", t),
            member("", "10+ years", t),
            member("Pro", "2-5 years", t),
        ];
        let skill = skill_distribution(&rows);
        let labels: Vec<(&str, usize)> = skill.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(labels, vec![("Elite", 2), ("Beginner", 1), ("Unknown", 1), ("Pro", 1)]);

        let tenure = tenure_distribution(&rows);
        let labels: Vec<(&str, usize)> = tenure.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(labels, vec![("10+ years", 2), ("Unknown", 1), ("2-5 years", 2)]);

        assert_eq!(skill.iter().map(|c| c.count).sum::<usize>(), rows.len());
        assert_eq!(tenure.iter().map(|c| c.count).sum::<usize>(), rows.len());
    }
}
