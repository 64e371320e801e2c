//! Candidate plan assembly for presentation
//!
//! Validates a visit schedule once, then builds plans from it with the
//! bisection solver: the simple three-duration options, a zero-deposit sweep
//! over every duration, the interactive designer plan and the tuner plan.
//!
//! # Example
//! ```ignore
//! let designer = PlanDesigner::new(visits)?;
//! for plan in designer.simple_options() {
//!     println!("{}: deposit {:.2}", plan.id(), plan.deposit());
//! }
//! ```

use chrono::{Months, NaiveDate};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{PlannerError, PlannerResult};
use crate::plan::PaymentPlan;
use crate::projection::PlanTerms;
use crate::solver::{find_monthly_payment, PlanSolver, SolverConfig};
use crate::visit::{
    earliest_visit_date, latest_visit_date, total_value, validate_visits, Visit, DAYS_PER_MONTH,
};

/// Step the designer's deposit slider moves in
pub const DEPOSIT_STEP: f64 = 5.0;

/// Longest plan offered: the visit span in months, at least 1
pub fn max_duration(visits: &[Visit]) -> u32 {
    match (earliest_visit_date(visits), latest_visit_date(visits)) {
        (Some(first), Some(last)) => {
            let months = ((last - first).num_days() as f64 / DAYS_PER_MONTH).ceil();
            (months as u32).max(1)
        }
        _ => 1,
    }
}

/// Round up to the next slider step
pub fn round_up_to_step(amount: f64) -> f64 {
    (amount / DEPOSIT_STEP).ceil() * DEPOSIT_STEP
}

/// The interactive plan plus the bounds of its deposit control
#[derive(Debug, Clone, Serialize)]
pub struct DesignedPlan {
    pub plan: PaymentPlan,

    /// Smallest deposit that satisfies the cap for this duration
    pub minimum_deposit: f64,

    /// Slider lower bound (minimum deposit rounded up to the step)
    pub slider_min: f64,

    /// Slider upper bound (total value rounded up to the step)
    pub slider_max: f64,
}

/// Builds candidate plans from one validated visit snapshot
#[derive(Debug, Clone)]
pub struct PlanDesigner {
    visits: Vec<Visit>,
    total_value: f64,
    first_date: NaiveDate,
    last_date: NaiveDate,
    solver: PlanSolver,
}

impl PlanDesigner {
    /// Validate visits and prepare a designer with the default solver config
    pub fn new(visits: Vec<Visit>) -> PlannerResult<Self> {
        Self::with_config(visits, SolverConfig::default())
    }

    pub fn with_config(visits: Vec<Visit>, config: SolverConfig) -> PlannerResult<Self> {
        let issues = validate_visits(&visits);
        if !issues.is_empty() {
            return Err(PlannerError::InvalidVisits(issues));
        }

        let (first_date, last_date) = match (earliest_visit_date(&visits), latest_visit_date(&visits)) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(PlannerError::NoDatedVisits),
        };

        Ok(Self {
            total_value: total_value(&visits),
            solver: PlanSolver::new(&visits, config),
            visits,
            first_date,
            last_date,
        })
    }

    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    pub fn max_duration(&self) -> u32 {
        max_duration(&self.visits)
    }

    /// Date of the last installment for a plan of `duration` months
    fn end_date_for(&self, duration: u32) -> Option<NaiveDate> {
        self.first_date
            .checked_add_months(Months::new(duration.saturating_sub(1)))
    }

    fn plan(&self, id: String, terms: PlanTerms, end_date: Option<NaiveDate>) -> PaymentPlan {
        PaymentPlan::new(id, terms, self.visits.clone(), end_date)
    }

    /// Minimum-deposit plans for 1 month, half the span and the full span
    pub fn simple_options(&self) -> Vec<PaymentPlan> {
        let max = self.max_duration();
        let mut durations = vec![1, max.div_ceil(2), max];
        durations.sort_unstable();
        durations.dedup();

        log::info!("Building simple options for durations {:?}", durations);

        durations
            .into_iter()
            .map(|duration| {
                let solution = self.solver.minimum_deposit(self.total_value, duration);
                self.plan(
                    format!("simple-{}m", duration),
                    PlanTerms::new(solution.deposit, solution.monthly_payment, duration),
                    self.end_date_for(duration),
                )
            })
            .collect()
    }

    /// Zero-deposit, evenly amortized plan for every duration up to the span
    pub fn zero_deposit_sweep(&self) -> Vec<PaymentPlan> {
        let max = self.max_duration();
        log::info!("Sweeping zero-deposit plans for 1..={} months", max);

        (1..=max)
            .into_par_iter()
            .map(|duration| {
                let monthly = find_monthly_payment(self.total_value, duration, 0.0);
                self.plan(
                    format!("plan-{}m", duration),
                    PlanTerms::new(0.0, monthly, duration),
                    self.end_date_for(duration),
                )
            })
            .collect()
    }

    /// Interactive plan: the requested deposit, raised to the minimum if it
    /// falls short, with the remainder amortized over `duration`
    pub fn design(&self, duration: u32, requested_deposit: f64) -> DesignedPlan {
        let minimum = self.solver.minimum_deposit(self.total_value, duration);
        let deposit = requested_deposit.max(minimum.deposit);
        let monthly = find_monthly_payment(self.total_value, duration, deposit);

        if deposit > requested_deposit {
            log::info!(
                "Requested deposit {:.2} below minimum; using {:.2}",
                requested_deposit, deposit
            );
        }

        DesignedPlan {
            plan: self.plan(
                format!("interactive-{}m", duration),
                PlanTerms::new(deposit, monthly, duration),
                None,
            ),
            minimum_deposit: minimum.deposit,
            slider_min: round_up_to_step(minimum.deposit),
            slider_max: round_up_to_step(self.total_value),
        }
    }

    /// Tuned plan: a fixed deposit (clamped to the package value) with the
    /// smallest installment that keeps within the cap
    pub fn tune(&self, duration: u32, deposit: f64) -> PaymentPlan {
        let deposit = deposit.clamp(0.0, self.total_value);
        let monthly = self
            .solver
            .minimum_monthly_payment(self.total_value, duration, deposit);

        self.plan(
            "tuned".to_string(),
            PlanTerms::new(deposit, monthly, duration),
            Some(self.last_date),
        )
    }
}
