//! Visit records, CSV loading and package summaries

mod data;
pub mod loader;
mod summary;

pub use data::{
    earliest_visit_date, latest_visit_date, total_value, validate_visits, Visit, VisitIssue,
};
pub use loader::{load_visits, load_visits_from_reader};
pub use summary::{
    monthly_spend, DistributionLabel, MonthlySpend, PackageSummary, SpendDistribution,
    DAYS_PER_MONTH,
};
