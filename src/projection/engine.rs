//! Month-by-month balance simulation for a payment plan

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::buckets::{same_month, MonthAnchors};
use super::cashflows::CashFlow;
use crate::visit::Visit;

/// The client-facing terms of a plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanTerms {
    /// Paid up front, credited in the first month
    pub deposit: f64,

    /// Fixed installment credited each month of the duration
    pub monthly_payment: f64,

    /// Number of installments, starting in the first month
    pub duration: u32,
}

impl PlanTerms {
    pub fn new(deposit: f64, monthly_payment: f64, duration: u32) -> Self {
        Self {
            deposit,
            monthly_payment,
            duration,
        }
    }

    /// Deposit plus every installment
    pub fn total_paid(&self) -> f64 {
        self.deposit + self.monthly_payment * self.duration as f64
    }
}

/// Simulation engine bound to one visit snapshot
///
/// Visit costs are bucketed once on construction, so repeated projections
/// (as in the bisection searches) only walk the month list.
#[derive(Debug, Clone)]
pub struct CashFlowEngine {
    /// (month anchor, billed in that month)
    months: Vec<(NaiveDate, f64)>,
}

impl CashFlowEngine {
    pub fn new(visits: &[Visit]) -> Self {
        let months = MonthAnchors::from_visits(visits)
            .map(|anchor| {
                let billed = visits
                    .iter()
                    .filter(|v| v.date.is_some_and(|d| same_month(d, anchor)))
                    .map(Visit::amount)
                    .sum();
                (anchor, billed)
            })
            .collect();

        Self { months }
    }

    /// Run the simulation for the given terms
    pub fn project(&self, terms: &PlanTerms) -> Vec<CashFlow> {
        let mut running_balance = 0.0;

        self.months
            .iter()
            .enumerate()
            .map(|(offset, &(anchor, billed))| {
                let row = Self::calculate_month(terms, offset, anchor, billed, running_balance);
                running_balance = row.balance;
                row
            })
            .collect()
    }

    /// Lowest balance reached under the given terms, without collecting rows
    pub fn min_balance(&self, terms: &PlanTerms) -> f64 {
        let mut running_balance = 0.0;
        let mut min = 0.0_f64;

        for (offset, &(anchor, billed)) in self.months.iter().enumerate() {
            running_balance = Self::calculate_month(terms, offset, anchor, billed, running_balance).balance;
            min = min.min(running_balance);
        }

        min
    }

    fn calculate_month(
        terms: &PlanTerms,
        offset: usize,
        anchor: NaiveDate,
        billed: f64,
        prior_balance: f64,
    ) -> CashFlow {
        let mut payment = 0.0;

        // Deposit lands in the first month only
        if offset == 0 && terms.deposit > 0.0 {
            payment += terms.deposit;
        }

        if offset < terms.duration as usize {
            payment += terms.monthly_payment;
        }

        CashFlow {
            date: anchor,
            balance: prior_balance + payment - billed,
            payment,
            visit_cost: billed,
        }
    }
}

/// Simulate the running balance of `terms` against a visit snapshot
pub fn generate_cash_flow(terms: &PlanTerms, visits: &[Visit]) -> Vec<CashFlow> {
    CashFlowEngine::new(visits).project(terms)
}
