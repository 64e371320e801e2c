//! Cash-flow output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One month of a simulated payment plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Month anchor (15th of the month)
    pub date: NaiveDate,

    /// Running balance after this month; negative means the client owes
    pub balance: f64,

    /// Credited this month (deposit in the first month plus any installment)
    pub payment: f64,

    /// Billed this month for visits falling in it
    pub visit_cost: f64,
}

/// Summary statistics for a simulated cash flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowSummary {
    pub months: usize,
    pub total_payments: f64,
    pub total_visit_cost: f64,
    pub final_balance: f64,

    /// Lowest balance reached, floored at zero
    pub min_balance: f64,

    /// Largest amount owed at any point (the magnitude of `min_balance`)
    pub max_owed: f64,
}

impl CashFlowSummary {
    pub fn from_flow(flow: &[CashFlow]) -> Self {
        let min_balance = super::min_balance(flow);

        Self {
            months: flow.len(),
            total_payments: flow.iter().map(|c| c.payment).sum(),
            total_visit_cost: flow.iter().map(|c| c.visit_cost).sum(),
            final_balance: flow.last().map(|c| c.balance).unwrap_or(0.0),
            min_balance,
            max_owed: if min_balance < 0.0 { -min_balance } else { 0.0 },
        }
    }
}
