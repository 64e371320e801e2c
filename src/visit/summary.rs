//! Package summary statistics over a visit schedule

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{earliest_visit_date, latest_visit_date, total_value, Visit};
use crate::projection::{same_month, MonthAnchors};

/// Average days per month used when converting day spans to months
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Headline numbers for a package of visits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSummary {
    pub total_value: f64,
    pub total_travel: f64,
    pub total_consulting: f64,

    pub visit_count: usize,
    pub onsite_count: usize,
    pub virtual_count: usize,

    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,

    /// Inclusive day span between first and last visit (0 with no dated visits)
    pub span_days: i64,

    /// Span in months (0 with no dated visits)
    pub span_months: u32,

    /// Billed amount per calendar month, first to last visit month
    pub monthly_spend: Vec<MonthlySpend>,

    pub distribution: SpendDistribution,
}

/// Spend billed within one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySpend {
    /// First day of the month
    pub month: NaiveDate,
    pub amount: f64,
}

impl PackageSummary {
    pub fn from_visits(visits: &[Visit]) -> Self {
        let first_date = earliest_visit_date(visits);
        let last_date = latest_visit_date(visits);

        let span_days = match (first_date, last_date) {
            (Some(first), Some(last)) => ((last - first).num_days() + 1).max(1),
            _ => 0,
        };
        let span_months = if span_days == 0 {
            0
        } else {
            ((span_days as f64 / DAYS_PER_MONTH).ceil() as u32).max(1)
        };

        let onsite_count = visits.iter().filter(|v| v.is_onsite()).count();

        Self {
            total_value: total_value(visits),
            total_travel: visits.iter().map(|v| v.travel_fee).sum(),
            total_consulting: visits.iter().map(|v| v.consulting_fee).sum(),
            visit_count: visits.len(),
            onsite_count,
            virtual_count: visits.len() - onsite_count,
            first_date,
            last_date,
            span_days,
            span_months,
            monthly_spend: monthly_spend(visits),
            distribution: SpendDistribution::from_visits(visits),
        }
    }
}

/// Billed amount per calendar month across the visit span
pub fn monthly_spend(visits: &[Visit]) -> Vec<MonthlySpend> {
    MonthAnchors::from_visits(visits)
        .map(|anchor| {
            let amount = visits
                .iter()
                .filter(|v| v.date.is_some_and(|d| same_month(d, anchor)))
                .map(Visit::amount)
                .sum();
            MonthlySpend {
                month: anchor.with_day(1).unwrap_or(anchor),
                amount,
            }
        })
        .collect()
}

/// Where in the schedule most of the money sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionLabel {
    FrontHeavy,
    MidHeavy,
    BackHeavy,
    Balanced,
}

impl DistributionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionLabel::FrontHeavy => "front heavy",
            DistributionLabel::MidHeavy => "mid heavy",
            DistributionLabel::BackHeavy => "back heavy",
            DistributionLabel::Balanced => "balanced",
        }
    }
}

impl std::fmt::Display for DistributionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Share of total spend in the first, middle and last third of visits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpendDistribution {
    pub front: f64,
    pub mid: f64,
    pub back: f64,
    pub label: DistributionLabel,
}

impl SpendDistribution {
    /// Visits are ordered by date with drafts last, then split into thirds by count
    pub fn from_visits(visits: &[Visit]) -> Self {
        if visits.is_empty() {
            return Self {
                front: 0.0,
                mid: 0.0,
                back: 0.0,
                label: DistributionLabel::Balanced,
            };
        }

        let mut sorted: Vec<&Visit> = visits.iter().collect();
        // Stable sort keeps entry order for equal dates and among drafts
        sorted.sort_by_key(|v| (v.date.is_none(), v.date));

        let n = sorted.len();
        let third = (n / 3).max(1);
        let front_end = third;
        let mid_end = n.min(third * 2);

        let sum = |slice: &[&Visit]| -> f64 { slice.iter().map(|v| v.amount()).sum() };
        let front_sum = sum(&sorted[..front_end]);
        let mid_sum = sum(&sorted[front_end..mid_end]);
        let back_sum = sum(&sorted[mid_end..]);

        let total = (front_sum + mid_sum + back_sum).max(1.0);
        let front = front_sum / total;
        let mid = mid_sum / total;
        let back = back_sum / total;

        let max = front.max(mid).max(back);
        let label = if max <= 0.5 {
            DistributionLabel::Balanced
        } else if front == max {
            DistributionLabel::FrontHeavy
        } else if mid == max {
            DistributionLabel::MidHeavy
        } else {
            DistributionLabel::BackHeavy
        };

        Self { front, mid, back, label }
    }
}
