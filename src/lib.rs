//! Package Planner - installment payment plans for scheduled visit packages
//!
//! This library provides:
//! - Calendar-month cash-flow simulation of a deposit + installment plan
//! - The 20% outstanding-balance check
//! - Bisection searches for the minimum deposit and minimum monthly payment
//! - Candidate plan assembly, visit loading and package summaries

pub mod error;
pub mod visit;
pub mod projection;
pub mod plan;
pub mod solver;
pub mod options;

// Re-export commonly used types
pub use error::{PlannerError, PlannerResult};
pub use visit::{total_value, latest_visit_date, Visit, PackageSummary};
pub use projection::{generate_cash_flow, CashFlow, PlanTerms};
pub use plan::{validate_payment_plan, PaymentPlan};
pub use solver::{
    find_minimum_deposit, find_minimum_monthly_payment, find_monthly_payment, DepositSolution,
    PlanSolver, SolverConfig,
};
pub use options::{PlanDesigner, DesignedPlan};
