//! Evaluated payment plans
//!
//! A `PaymentPlan` pairs a set of terms with the visit snapshot it was built
//! from. The total value, outstanding cap and validity are derived once on
//! construction and cannot be edited afterwards.

use chrono::NaiveDate;
use serde::Serialize;

use crate::projection::{
    generate_cash_flow, outstanding_cap, satisfies_cap, CashFlow, CashFlowSummary, PlanTerms,
};
use crate::visit::{total_value, Visit};

#[derive(Debug, Clone, Serialize)]
pub struct PaymentPlan {
    id: String,
    #[serde(flatten)]
    terms: PlanTerms,
    total_value: f64,
    visits: Vec<Visit>,
    end_date: Option<NaiveDate>,
    is_valid: bool,
    max_outstanding: f64,
}

impl PaymentPlan {
    /// Build a plan and run the outstanding-balance check against its visits
    pub fn new(
        id: impl Into<String>,
        terms: PlanTerms,
        visits: Vec<Visit>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        let total_value = total_value(&visits);
        let flow = generate_cash_flow(&terms, &visits);
        let is_valid = satisfies_cap(&flow, total_value);

        Self {
            id: id.into(),
            terms,
            total_value,
            visits,
            end_date,
            is_valid,
            max_outstanding: outstanding_cap(total_value),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn terms(&self) -> PlanTerms {
        self.terms
    }

    pub fn deposit(&self) -> f64 {
        self.terms.deposit
    }

    pub fn monthly_payment(&self) -> f64 {
        self.terms.monthly_payment
    }

    pub fn duration(&self) -> u32 {
        self.terms.duration
    }

    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Whether the balance never goes below the outstanding cap
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn max_outstanding(&self) -> f64 {
        self.max_outstanding
    }

    /// Simulate the plan's month-by-month balance
    pub fn cash_flow(&self) -> Vec<CashFlow> {
        generate_cash_flow(&self.terms, &self.visits)
    }

    pub fn summary(&self) -> CashFlowSummary {
        CashFlowSummary::from_flow(&self.cash_flow())
    }
}

/// Re-run the outstanding-balance check, with the cap recomputed from the visits
pub fn validate_payment_plan(plan: &PaymentPlan) -> bool {
    let flow = plan.cash_flow();
    satisfies_cap(&flow, total_value(plan.visits()))
}
