//! The 20% outstanding-balance constraint

use super::cashflows::CashFlow;

/// Largest share of the package value a client may owe at any time
pub const MAX_OUTSTANDING_RATIO: f64 = 0.2;

/// Maximum amount a client may owe on a package of `total_value`
pub fn outstanding_cap(total_value: f64) -> f64 {
    total_value * MAX_OUTSTANDING_RATIO
}

/// Lowest balance across a cash flow; zero for an empty flow
pub fn min_balance(flow: &[CashFlow]) -> f64 {
    flow.iter().fold(0.0_f64, |acc, c| acc.min(c.balance))
}

/// True when `min_balance` stays within the cap for `total_value`
pub fn within_cap(min_balance: f64, total_value: f64) -> bool {
    min_balance >= -outstanding_cap(total_value)
}

/// True when the flow never owes more than the cap for `total_value`
pub fn satisfies_cap(flow: &[CashFlow], total_value: f64) -> bool {
    within_cap(min_balance(flow), total_value)
}
