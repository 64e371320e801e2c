//! Cash-flow projection for payment plans

mod buckets;
mod cashflows;
mod constraint;
mod engine;

pub use buckets::{month_anchor, same_month, MonthAnchors, ANCHOR_DAY};
pub use cashflows::{CashFlow, CashFlowSummary};
pub use constraint::{min_balance, outstanding_cap, satisfies_cap, within_cap, MAX_OUTSTANDING_RATIO};
pub use engine::{generate_cash_flow, CashFlowEngine, PlanTerms};
