//! Summary metrics for the insights view

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use super::entities::{ErrorCategory, Report};
use super::listing::StatusCounts;

/// Window for "recent" metrics
const RECENT_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: ErrorCategory,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub last_seven_days: usize,
    pub pending_count: usize,
    pub pending_percentage: u32,
    pub top_category: String,
    pub training_count: usize,
    pub by_day: Vec<DailyCount>,
    pub status_distribution: StatusCounts,
    pub category_distribution: Vec<CategoryCount>,
}

/// Compute insights relative to `now`
pub fn compute(reports: &[Report], now: DateTime<Utc>) -> Insights {
    let status_distribution = StatusCounts::tally(reports);
    let total = status_distribution.total;
    let pending_count = status_distribution.pending;

    let pending_percentage = if total == 0 {
        0
    } else {
        (pending_count as f64 / total as f64 * 100.0).round() as u32
    };

    let window_start = now - Duration::days(RECENT_DAYS);
    let last_seven_days = reports
        .iter()
        .filter(|r| r.created_at >= window_start)
        .count();

    let category_distribution = category_distribution(reports);
    let top_category = category_distribution
        .first()
        .map(|c| c.label.clone())
        .unwrap_or_else(|| "None".to_string());

    Insights {
        last_seven_days,
        pending_count,
        pending_percentage,
        top_category,
        training_count: reports.iter().filter(|r| r.is_training_example()).count(),
        by_day: by_day(reports, now.date_naive()),
        status_distribution,
        category_distribution,
    }
}

/// Counts for the seven UTC days ending `today`, oldest first
fn by_day(reports: &[Report], today: NaiveDate) -> Vec<DailyCount> {
    (0..RECENT_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            DailyCount {
                date,
                count: reports
                    .iter()
                    .filter(|r| r.created_at.date_naive() == date)
                    .count(),
            }
        })
        .collect()
}

/// Non-zero category counts, largest first; ties keep category order
fn category_distribution(reports: &[Report]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = ErrorCategory::ALL
        .into_iter()
        .map(|category| CategoryCount {
            category,
            label: category.label(),
            count: reports
                .iter()
                .filter(|r| r.error_category == Some(category))
                .count(),
        })
        .filter(|c| c.count > 0)
        .collect();

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
