//! Package Planner CLI
//!
//! Reads a visit schedule from CSV and prints payment plans that keep the
//! client's owed balance within 20% of the package value.
//!
//! Usage:
//!   package_planner visits.csv summary
//!   package_planner visits.csv options
//!   package_planner visits.csv design --duration 6 --deposit 250
//!   package_planner --json visits.csv tune --duration 6 --deposit 200
//!   package_planner visits.csv cashflow --deposit 600 --monthly 100 --duration 4 --csv flow.csv

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use package_planner::projection::{CashFlow, CashFlowSummary, PlanTerms};
use package_planner::visit::{load_visits, PackageSummary};
use package_planner::{PaymentPlan, PlanDesigner, PlannerError, Visit};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "package_planner", version, about = "Installment plans for visit packages")]
struct Cli {
    /// Visit schedule CSV with columns id,date,travel_fee,consulting_fee
    visits: PathBuf,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fee totals, visit counts, span and monthly spend
    Summary,

    /// Minimum-deposit plans for 1 month, half the span and the full span
    Options,

    /// Zero-deposit plan for every duration up to the span
    Sweep,

    /// Interactive plan: requested deposit raised to the minimum if needed
    Design {
        /// Plan length in months (defaults to the visit span)
        #[arg(long)]
        duration: Option<u32>,

        /// Requested deposit
        #[arg(long, default_value_t = 0.0, value_parser = non_negative_amount)]
        deposit: f64,
    },

    /// Fixed deposit with the smallest monthly payment that stays within the cap
    Tune {
        #[arg(long)]
        duration: u32,

        #[arg(long, value_parser = non_negative_amount)]
        deposit: f64,
    },

    /// Simulate explicit plan terms
    Cashflow {
        #[arg(long, default_value_t = 0.0, value_parser = non_negative_amount)]
        deposit: f64,

        #[arg(long, value_parser = non_negative_amount)]
        monthly: f64,

        #[arg(long)]
        duration: u32,

        /// Also write the month-by-month rows to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

/// Money amounts on the command line must be finite and not negative
fn non_negative_amount(raw: &str) -> Result<f64, String> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("'{}' must be a finite amount of at least 0", raw));
    }
    Ok(amount)
}

/// A plan together with its simulated months
#[derive(Serialize)]
struct PlanReport<'a> {
    plan: &'a PaymentPlan,
    summary: CashFlowSummary,
    cash_flow: Vec<CashFlow>,
}

impl<'a> PlanReport<'a> {
    fn new(plan: &'a PaymentPlan) -> Self {
        let cash_flow = plan.cash_flow();
        Self {
            plan,
            summary: CashFlowSummary::from_flow(&cash_flow),
            cash_flow,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let visits = load_visits(&cli.visits)
        .with_context(|| format!("Failed to load visits from {}", cli.visits.display()))?;
    log::info!("Loaded {} visits from {}", visits.len(), cli.visits.display());

    match cli.command {
        Command::Summary => {
            let summary = PackageSummary::from_visits(&visits);
            if cli.json {
                print_json(&summary)?;
            } else {
                print_summary(&summary);
            }
        }
        Command::Options => {
            let plans = build_designer(visits)?.simple_options();
            if cli.json {
                print_json(&plans)?;
            } else {
                print_plans(&plans);
            }
        }
        Command::Sweep => {
            let plans = build_designer(visits)?.zero_deposit_sweep();
            if cli.json {
                print_json(&plans)?;
            } else {
                print_plans(&plans);
            }
        }
        Command::Design { duration, deposit } => {
            let designer = build_designer(visits)?;
            let duration = duration.unwrap_or_else(|| designer.max_duration());
            let designed = designer.design(duration, deposit);
            if cli.json {
                print_json(&designed)?;
            } else {
                println!(
                    "Deposit range: ${:.0} - ${:.0} (minimum ${:.2})\n",
                    designed.slider_min, designed.slider_max, designed.minimum_deposit
                );
                print_report(&PlanReport::new(&designed.plan));
            }
        }
        Command::Tune { duration, deposit } => {
            let plan = build_designer(visits)?.tune(duration, deposit);
            output_report(&PlanReport::new(&plan), cli.json)?;
        }
        Command::Cashflow {
            deposit,
            monthly,
            duration,
            csv,
        } => {
            let plan = PaymentPlan::new("custom", PlanTerms::new(deposit, monthly, duration), visits, None);
            let report = PlanReport::new(&plan);
            if let Some(path) = csv {
                write_cash_flow_csv(&path, &report.cash_flow)?;
                log::info!("Cash flow written to {}", path.display());
            }
            output_report(&report, cli.json)?;
        }
    }

    Ok(())
}

fn build_designer(visits: Vec<Visit>) -> Result<PlanDesigner> {
    PlanDesigner::new(visits).map_err(|err| {
        if let PlannerError::InvalidVisits(issues) = &err {
            for issue in issues {
                eprintln!("  {}", issue);
            }
        }
        anyhow::Error::new(err).context("Visit schedule is not ready for planning")
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn output_report(report: &PlanReport, json: bool) -> Result<()> {
    if json {
        print_json(report)
    } else {
        print_report(report);
        Ok(())
    }
}

fn print_summary(summary: &PackageSummary) {
    println!("Package summary");
    println!("===============\n");
    println!("  Total value:  ${:.2}", summary.total_value);
    println!("    Travel:     ${:.2}", summary.total_travel);
    println!("    Consulting: ${:.2}", summary.total_consulting);
    println!(
        "  Visits:       {} ({} onsite, {} virtual)",
        summary.visit_count, summary.onsite_count, summary.virtual_count
    );
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        println!(
            "  Span:         {} - {} ({} days, {} mo)",
            first.format("%b %Y"),
            last.format("%b %Y"),
            summary.span_days,
            summary.span_months
        );
    }
    println!(
        "  Distribution: {} (front {:.0}%, mid {:.0}%, back {:.0}%)",
        summary.distribution.label,
        summary.distribution.front * 100.0,
        summary.distribution.mid * 100.0,
        summary.distribution.back * 100.0
    );

    if !summary.monthly_spend.is_empty() {
        println!("\nMonthly spend:");
        for month in &summary.monthly_spend {
            println!("  {} {:>12.2}", month.month.format("%b %Y"), month.amount);
        }
    }
}

fn print_plans(plans: &[PaymentPlan]) {
    println!(
        "{:<16} {:>8} {:>12} {:>12} {:>12} {:>12} {:>7}",
        "Plan", "Months", "Deposit", "Monthly", "Total", "Max Owed", "Valid"
    );
    println!("{}", "-".repeat(86));

    for plan in plans {
        let summary = plan.summary();
        println!(
            "{:<16} {:>8} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>7}",
            plan.id(),
            plan.duration(),
            plan.deposit(),
            plan.monthly_payment(),
            plan.terms().total_paid(),
            summary.max_owed,
            if plan.is_valid() { "yes" } else { "NO" },
        );
    }
}

fn print_report(report: &PlanReport) {
    let plan = report.plan;
    println!("Plan {} ({} months)", plan.id(), plan.duration());
    println!("  Deposit:         ${:.2}", plan.deposit());
    println!("  Monthly payment: ${:.2}", plan.monthly_payment());
    println!("  Total value:     ${:.2}", plan.total_value());
    println!("  Max outstanding: ${:.2}", plan.max_outstanding());
    println!(
        "  Status:          {}",
        if plan.is_valid() { "Valid" } else { "Exceeds 20% limit" }
    );

    println!("\n{:>10} {:>12} {:>12} {:>12}", "Month", "Payment", "Invoices", "Balance");
    println!("{}", "-".repeat(50));
    for row in &report.cash_flow {
        println!(
            "{:>10} {:>12.2} {:>12.2} {:>12.2}",
            row.date.format("%Y-%m"),
            row.payment,
            row.visit_cost,
            row.balance
        );
    }

    println!(
        "\nLargest amount owed: ${:.2} of ${:.2} allowed",
        report.summary.max_owed,
        plan.max_outstanding()
    );
}

fn write_cash_flow_csv(path: &Path, flow: &[CashFlow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Unable to create {}", path.display()))?;
    for row in flow {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
