//! Filtering, search and ordering for the reports list

use serde::{Deserialize, Serialize};

use super::entities::{Report, ReportStatus};

/// Status filter; `all` keeps every report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusFilter {
    #[default]
    #[serde(alias = "all")]
    All,
    Pending,
    Resolved,
    Dismissed,
}

impl StatusFilter {
    fn matches(&self, status: ReportStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == ReportStatus::Pending,
            Self::Resolved => status == ReportStatus::Resolved,
            Self::Dismissed => status == ReportStatus::Dismissed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Date,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// List parameters; with no `sort_by` the upstream order is kept
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub sort_by: Option<SortBy>,
    #[serde(default)]
    pub order: SortOrder,
}

/// Per-status totals over the unfiltered set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub resolved: usize,
    pub dismissed: usize,
}

impl StatusCounts {
    pub fn tally(reports: &[Report]) -> Self {
        reports.iter().fold(
            Self {
                total: reports.len(),
                ..Self::default()
            },
            |mut counts, report| {
                match report.status {
                    ReportStatus::Pending => counts.pending += 1,
                    ReportStatus::Resolved => counts.resolved += 1,
                    ReportStatus::Dismissed => counts.dismissed += 1,
                }
                counts
            },
        )
    }
}

/// Filtered view of the reports plus counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportListing {
    pub reports: Vec<Report>,
    pub counts: StatusCounts,
}

/// Apply filter, search and ordering to `reports`
pub fn list(reports: Vec<Report>, query: &ListQuery) -> ReportListing {
    let counts = StatusCounts::tally(&reports);

    let needle = query
        .q
        .as_deref()
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut filtered: Vec<Report> = reports
        .into_iter()
        .filter(|r| query.status.matches(r.status))
        .filter(|r| needle.as_deref().is_none_or(|n| r.matches_search(n)))
        .collect();

    if let Some(sort_by) = query.sort_by {
        // Vec::sort_by is stable, so ties keep upstream order
        filtered.sort_by(|a, b| {
            let ordering = match sort_by {
                SortBy::Date => a.created_at.cmp(&b.created_at),
                SortBy::Status => a.status.rank().cmp(&b.status.rank()),
            };
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    ReportListing {
        reports: filtered,
        counts,
    }
}
