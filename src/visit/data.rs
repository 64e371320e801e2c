//! Visit records and draft validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single billable visit in a package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Opaque identifier, unique within a package
    pub id: String,

    /// Visit date (None while the visit is still a draft)
    pub date: Option<NaiveDate>,

    /// Travel component of the fee
    pub travel_fee: f64,

    /// Consulting component of the fee
    pub consulting_fee: f64,
}

impl Visit {
    /// Create a dated visit
    pub fn new(id: impl Into<String>, date: NaiveDate, travel_fee: f64, consulting_fee: f64) -> Self {
        Self {
            id: id.into(),
            date: Some(date),
            travel_fee,
            consulting_fee,
        }
    }

    /// Create an undated visit with no fees
    pub fn draft(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: None,
            travel_fee: 0.0,
            consulting_fee: 0.0,
        }
    }

    /// Billable amount (travel + consulting)
    pub fn amount(&self) -> f64 {
        self.travel_fee + self.consulting_fee
    }

    /// Onsite visits carry a travel fee; everything else is virtual
    pub fn is_onsite(&self) -> bool {
        self.travel_fee > 0.0
    }

    /// Check the visit is ready to be planned against
    pub fn issues(&self) -> Option<VisitIssue> {
        let missing_date = self.date.is_none();
        let missing_fee = self.travel_fee <= 0.0 && self.consulting_fee <= 0.0;

        if missing_date || missing_fee {
            Some(VisitIssue {
                visit_id: self.id.clone(),
                missing_date,
                missing_fee,
            })
        } else {
            None
        }
    }
}

/// What is wrong with a single draft visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitIssue {
    pub visit_id: String,

    /// No date selected
    pub missing_date: bool,

    /// Neither fee is positive
    pub missing_fee: bool,
}

impl std::fmt::Display for VisitIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut problems = Vec::new();
        if self.missing_date {
            problems.push("please select a date");
        }
        if self.missing_fee {
            problems.push("enter a positive travel or consulting fee");
        }
        write!(f, "visit {}: {}", self.visit_id, problems.join("; "))
    }
}

/// Validate every visit, collecting all problems instead of stopping at the first
pub fn validate_visits(visits: &[Visit]) -> Vec<VisitIssue> {
    visits.iter().filter_map(Visit::issues).collect()
}

/// Total billable value of a visit snapshot
pub fn total_value(visits: &[Visit]) -> f64 {
    visits.iter().map(Visit::amount).sum()
}

/// Latest visit date, ignoring drafts
pub fn latest_visit_date(visits: &[Visit]) -> Option<NaiveDate> {
    visits.iter().filter_map(|v| v.date).max()
}

/// Earliest visit date, ignoring drafts
pub fn earliest_visit_date(visits: &[Visit]) -> Option<NaiveDate> {
    visits.iter().filter_map(|v| v.date).min()
}
