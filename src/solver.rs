//! Minimum deposit and minimum monthly payment searches
//!
//! Both searches bisect over a single plan term. The lowest balance of the
//! simulated cash flow never decreases as the deposit or the installment
//! grows, so feasibility is monotone in the search variable and a fixed number
//! of halvings brackets the smallest feasible value.

use serde::{Deserialize, Serialize};

use crate::projection::{within_cap, CashFlowEngine, PlanTerms};
use crate::visit::Visit;

/// Default number of bisection steps (~ total_value / 2^40 precision)
pub const DEFAULT_MAX_ITERATIONS: u32 = 40;

/// Configuration for the bisection searches
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Number of halvings of the search bracket
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Result of a minimum-deposit search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepositSolution {
    pub deposit: f64,
    pub monthly_payment: f64,

    /// False for a zero duration, or when no tried deposit met the cap and the
    /// bracket's upper bound was returned instead. Re-check before presenting.
    pub feasible: bool,
}

/// Even installment that pays off what the deposit leaves, 0 for a zero duration
pub fn find_monthly_payment(total_value: f64, duration: u32, deposit: f64) -> f64 {
    if duration == 0 {
        return 0.0;
    }
    (total_value - deposit).max(0.0) / duration as f64
}

/// Plan searches over one visit snapshot
#[derive(Debug, Clone)]
pub struct PlanSolver {
    engine: CashFlowEngine,
    config: SolverConfig,
}

impl PlanSolver {
    pub fn new(visits: &[Visit], config: SolverConfig) -> Self {
        Self {
            engine: CashFlowEngine::new(visits),
            config,
        }
    }

    fn is_feasible(&self, terms: &PlanTerms, total_value: f64) -> bool {
        within_cap(self.engine.min_balance(terms), total_value)
    }

    /// Smallest deposit, with the remainder spread evenly over `duration`
    /// months, that keeps the client within the outstanding cap
    pub fn minimum_deposit(&self, total_value: f64, duration: u32) -> DepositSolution {
        if duration == 0 {
            log::debug!("Zero-month duration; skipping deposit search");
            return DepositSolution {
                deposit: 0.0,
                monthly_payment: 0.0,
                feasible: false,
            };
        }

        let mut low = 0.0;
        let mut high = total_value;
        let mut best: Option<(f64, f64)> = None;

        for iteration in 0..self.config.max_iterations {
            let mid = (low + high) / 2.0;
            let monthly = find_monthly_payment(total_value, duration, mid);
            let feasible = self.is_feasible(&PlanTerms::new(mid, monthly, duration), total_value);

            log::trace!(
                "deposit search {}: [{:.6}, {:.6}] mid={:.6} feasible={}",
                iteration, low, high, mid, feasible
            );

            if feasible {
                best = Some((mid, monthly));
                high = mid;
            } else {
                low = mid;
            }
        }

        match best {
            Some((deposit, monthly_payment)) => {
                log::debug!(
                    "Minimum deposit over {} months: {:.2} (monthly {:.2})",
                    duration, deposit, monthly_payment
                );
                DepositSolution {
                    deposit,
                    monthly_payment,
                    feasible: true,
                }
            }
            None => {
                log::warn!(
                    "No feasible deposit in [0, {:.2}] for {} months; returning upper bound",
                    total_value, duration
                );
                DepositSolution {
                    deposit: total_value,
                    monthly_payment: 0.0,
                    feasible: false,
                }
            }
        }
    }

    /// Smallest installment that keeps the client within the outstanding cap
    /// for a fixed deposit and duration
    pub fn minimum_monthly_payment(&self, total_value: f64, duration: u32, deposit: f64) -> f64 {
        if duration == 0 {
            return 0.0;
        }

        let mut low = 0.0;
        let mut high = (total_value - deposit).max(0.0);
        let mut result = high;
        let mut found = false;

        for iteration in 0..self.config.max_iterations {
            let mid = (low + high) / 2.0;
            let feasible = self.is_feasible(&PlanTerms::new(deposit, mid, duration), total_value);

            log::trace!(
                "payment search {}: [{:.6}, {:.6}] mid={:.6} feasible={}",
                iteration, low, high, mid, feasible
            );

            if feasible {
                result = mid;
                found = true;
                high = mid;
            } else {
                low = mid;
            }
        }

        if found {
            log::debug!(
                "Minimum monthly payment over {} months with deposit {:.2}: {:.2}",
                duration, deposit, result
            );
        } else {
            log::warn!(
                "No feasible monthly payment for deposit {:.2} over {} months; returning {:.2}",
                deposit, duration, result
            );
        }

        result
    }
}

/// Minimum deposit for `duration` months, with an amortized monthly payment
pub fn find_minimum_deposit(visits: &[Visit], total_value: f64, duration: u32) -> DepositSolution {
    PlanSolver::new(visits, SolverConfig::default()).minimum_deposit(total_value, duration)
}

/// Minimum monthly payment for a fixed deposit and duration
pub fn find_minimum_monthly_payment(
    visits: &[Visit],
    total_value: f64,
    duration: u32,
    deposit: f64,
) -> f64 {
    PlanSolver::new(visits, SolverConfig::default()).minimum_monthly_payment(total_value, duration, deposit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{generate_cash_flow, min_balance, outstanding_cap};
    use crate::visit::total_value;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// 900 billed in January, 100 in April
    fn front_loaded() -> Vec<Visit> {
        vec![
            Visit::new("kickoff", date(2024, 1, 15), 100.0, 800.0),
            Visit::new("wrap-up", date(2024, 4, 15), 0.0, 100.0),
        ]
    }

    #[test]
    fn test_zero_visits() {
        assert_eq!(total_value(&[]), 0.0);
        let solution = find_minimum_deposit(&[], 0.0, 3);
        assert_abs_diff_eq!(solution.deposit, 0.0, epsilon = EPS);
        assert_abs_diff_eq!(solution.monthly_payment, 0.0, epsilon = EPS);
        assert!(solution.feasible);
        assert_abs_diff_eq!(find_minimum_monthly_payment(&[], 0.0, 3, 0.0), 0.0, epsilon = EPS);
    }

    #[test]
    fn test_zero_duration_short_circuits() {
        let visits = front_loaded();
        let solution = find_minimum_deposit(&visits, 1000.0, 0);
        assert_eq!((solution.deposit, solution.monthly_payment), (0.0, 0.0));
        assert!(!solution.feasible);
        assert_eq!(find_minimum_monthly_payment(&visits, 1000.0, 0, 100.0), 0.0);
        assert_eq!(find_monthly_payment(1000.0, 0, 100.0), 0.0);
    }

    #[test]
    fn test_single_visit_single_month() {
        let visits = vec![Visit::new("only", date(2024, 1, 15), 0.0, 1000.0)];
        let solution = find_minimum_deposit(&visits, 1000.0, 1);

        assert_abs_diff_eq!(solution.deposit, 0.0, epsilon = EPS);
        assert_abs_diff_eq!(solution.monthly_payment, 1000.0, epsilon = EPS);
        assert!(solution.feasible);
    }

    #[test]
    fn test_two_month_spread() {
        let visits = vec![
            Visit::new("first", date(2024, 1, 15), 0.0, 500.0),
            Visit::new("second", date(2024, 2, 15), 0.0, 500.0),
        ];
        let solution = find_minimum_deposit(&visits, 1000.0, 2);

        assert_abs_diff_eq!(solution.deposit, 0.0, epsilon = EPS);
        assert_abs_diff_eq!(solution.monthly_payment, 500.0, epsilon = EPS);
    }

    #[test]
    fn test_interior_minimum_deposit() {
        // January: d + (1000 - d) / 4 - 900 >= -200  =>  d >= 600
        let visits = front_loaded();
        let solution = find_minimum_deposit(&visits, 1000.0, 4);

        assert_abs_diff_eq!(solution.deposit, 600.0, epsilon = EPS);
        assert_abs_diff_eq!(solution.monthly_payment, 100.0, epsilon = EPS);

        let flow = generate_cash_flow(&PlanTerms::new(solution.deposit, solution.monthly_payment, 4), &visits);
        assert!(min_balance(&flow) >= -outstanding_cap(1000.0) - EPS);
    }

    #[test]
    fn test_minimum_monthly_payment_with_fixed_deposit() {
        // January: m - 900 >= -200  =>  m >= 700
        let visits = front_loaded();
        let monthly = find_minimum_monthly_payment(&visits, 1000.0, 4, 0.0);
        assert_abs_diff_eq!(monthly, 700.0, epsilon = EPS);

        // A 600 deposit leaves January needing only 100 more
        let monthly = find_minimum_monthly_payment(&visits, 1000.0, 4, 600.0);
        assert_abs_diff_eq!(monthly, 100.0, epsilon = EPS);
    }

    #[test]
    fn test_deposit_covering_everything_needs_no_installment() {
        let visits = front_loaded();
        let monthly = find_minimum_monthly_payment(&visits, 1000.0, 4, 1000.0);
        assert_eq!(monthly, 0.0);
    }

    #[test]
    fn test_unreachable_cap_returns_upper_bound() {
        // Caller understates the package value; nothing in [0, 100] covers 1000 of visits
        let visits = vec![Visit::new("big", date(2024, 1, 15), 0.0, 1000.0)];

        let solution = find_minimum_deposit(&visits, 100.0, 1);
        assert!(!solution.feasible);
        assert_eq!(solution.deposit, 100.0);
        assert_eq!(solution.monthly_payment, 0.0);

        assert_eq!(find_minimum_monthly_payment(&visits, 100.0, 1, 20.0), 80.0);
    }

    #[test]
    fn test_iteration_budget_controls_precision() {
        let visits = front_loaded();
        let coarse = PlanSolver::new(&visits, SolverConfig { max_iterations: 4 }).minimum_deposit(1000.0, 4);
        // 1000 / 2^4 = 62.5 grid; smallest feasible grid point above 600 is 625
        assert_abs_diff_eq!(coarse.deposit, 625.0, epsilon = EPS);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_min_balance_monotone_in_deposit(
            fees in proptest::collection::vec(0u32..5_000, 1..8),
            gaps in proptest::collection::vec(0u32..3, 8),
            duration in 1u32..12,
            a in 0u32..1_000,
            b in 0u32..1_000,
        ) {
            let visits = spaced_visits(&fees, &gaps);
            let total = total_value(&visits);
            let (lo, hi) = (a.min(b) as f64 / 1_000.0 * total, a.max(b) as f64 / 1_000.0 * total);

            let at = |d: f64| {
                let terms = PlanTerms::new(d, find_monthly_payment(total, duration, d), duration);
                min_balance(&generate_cash_flow(&terms, &visits))
            };
            prop_assert!(at(hi) >= at(lo) - 1e-6);
        }

        #[test]
        fn prop_min_balance_monotone_in_payment(
            fees in proptest::collection::vec(0u32..5_000, 1..8),
            gaps in proptest::collection::vec(0u32..3, 8),
            duration in 1u32..12,
            deposit in 0u32..5_000,
            a in 0u32..5_000,
            b in 0u32..5_000,
        ) {
            let visits = spaced_visits(&fees, &gaps);
            let at = |m: f64| {
                min_balance(&generate_cash_flow(&PlanTerms::new(deposit as f64, m, duration), &visits))
            };
            prop_assert!(at(a.max(b) as f64) >= at(a.min(b) as f64) - 1e-6);
        }

        #[test]
        fn prop_minimum_deposit_conserves_total_and_meets_cap(
            fees in proptest::collection::vec(1u32..5_000, 1..8),
            gaps in proptest::collection::vec(0u32..3, 8),
            duration in 1u32..12,
        ) {
            let visits = spaced_visits(&fees, &gaps);
            let total = total_value(&visits);
            let solution = find_minimum_deposit(&visits, total, duration);
            prop_assert!(solution.feasible);

            let paid = solution.deposit + solution.monthly_payment * duration as f64;
            prop_assert!((paid - total).abs() <= 1e-6 * total.max(1.0));

            let flow = generate_cash_flow(&PlanTerms::new(solution.deposit, solution.monthly_payment, duration), &visits);
            prop_assert!(min_balance(&flow) >= -outstanding_cap(total) - 1e-6 * total.max(1.0));
        }
    }

    /// One visit per fee, each `gap` months after the previous
    fn spaced_visits(fees: &[u32], gaps: &[u32]) -> Vec<Visit> {
        let mut month = 0u32;
        fees.iter()
            .enumerate()
            .map(|(i, &fee)| {
                month += gaps[i % gaps.len()];
                let date = date(2024, 1, 10)
                    .checked_add_months(chrono::Months::new(month))
                    .unwrap();
                Visit::new(format!("v{}", i), date, 0.0, fee as f64)
            })
            .collect()
    }
}
