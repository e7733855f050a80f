//! Payroll models.
//!
//! This module contains the [`PayrollInput`] submitted from the admin payroll
//! form, the computed [`PayrollLine`] with its itemised deductions and audit
//! trace, and the persisted [`PayrollRun`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

/// A statutory contribution scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Pension-style social security scheme.
    Pension,
    /// Health-insurance-style scheme.
    Health,
    /// Housing-fund-style scheme.
    Housing,
}

impl Scheme {
    /// All schemes in deduction order.
    pub const ALL: [Scheme; 3] = [Scheme::Pension, Scheme::Health, Scheme::Housing];

    /// Stable identifier used in audit steps.
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Pension => "pension",
            Scheme::Health => "health",
            Scheme::Housing => "housing",
        }
    }
}

/// Caller-supplied contribution amounts that replace the computed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionOverride {
    /// Employee share in cents.
    pub employee_cents: i64,
    /// Employer share in cents.
    #[serde(default)]
    pub employer_cents: i64,
}

/// Per-scheme overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionOverrides {
    /// Pension override.
    #[serde(default)]
    pub pension: Option<ContributionOverride>,
    /// Health override.
    #[serde(default)]
    pub health: Option<ContributionOverride>,
    /// Housing override.
    #[serde(default)]
    pub housing: Option<ContributionOverride>,
}

impl ContributionOverrides {
    /// Returns the override for a scheme, if any.
    pub fn get(&self, scheme: Scheme) -> Option<ContributionOverride> {
        match scheme {
            Scheme::Pension => self.pension,
            Scheme::Health => self.health,
            Scheme::Housing => self.housing,
        }
    }
}

/// Inputs for one employee's payroll line.
///
/// Rates are in pesos, hours and days are decimal counts. Either
/// `hourly_rate` or `daily_rate` must be given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollInput {
    /// The employee being paid.
    pub employee_id: String,
    /// Hourly rate; takes precedence over `daily_rate` for base pay.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Daily rate.
    #[serde(default)]
    pub daily_rate: Option<Decimal>,
    /// Days worked (used with `daily_rate`).
    #[serde(default)]
    pub days_worked: Decimal,
    /// Hours worked (used with `hourly_rate`).
    #[serde(default)]
    pub hours_worked: Decimal,
    /// Overtime hours.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Hours falling in the night-differential window.
    #[serde(default)]
    pub night_hours: Decimal,
    /// Hours worked on regular holidays.
    #[serde(default)]
    pub regular_holiday_hours: Decimal,
    /// Hours worked on special holidays.
    #[serde(default)]
    pub special_holiday_hours: Decimal,
    /// Signed manual adjustment added to gross.
    #[serde(default)]
    pub adjustment_cents: i64,
    /// Monthly salary base for bracketed statutory contributions.
    #[serde(default)]
    pub monthly_salary: Option<Decimal>,
    /// Scales full-month contributions to the pay period (e.g. 0.5).
    #[serde(default)]
    pub period_factor: Option<Decimal>,
    /// Fixed contribution amounts that replace computed ones.
    #[serde(default)]
    pub overrides: ContributionOverrides,
    /// Supplemental plan percentage overriding the configured one.
    #[serde(default)]
    pub supplemental_rate: Option<Decimal>,
}

impl PayrollInput {
    /// An input with only the employee ID set; everything else zero or absent.
    pub fn for_employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            hourly_rate: None,
            daily_rate: None,
            days_worked: Decimal::ZERO,
            hours_worked: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            night_hours: Decimal::ZERO,
            regular_holiday_hours: Decimal::ZERO,
            special_holiday_hours: Decimal::ZERO,
            adjustment_cents: 0,
            monthly_salary: None,
            period_factor: None,
            overrides: ContributionOverrides::default(),
            supplemental_rate: None,
        }
    }
}

/// How a contribution was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionBasis {
    /// Bracketed computation from the monthly salary base.
    MonthlySalary,
    /// Flat percentage of gross.
    FlatPercentage,
    /// Caller-supplied override.
    Override,
}

/// One statutory contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// The scheme.
    pub scheme: Scheme,
    /// Employee share, deducted from net pay.
    pub employee: Cents,
    /// Employer share, reported only.
    pub employer: Cents,
    /// How the amounts were determined.
    pub basis: ContributionBasis,
}

/// Gross pay components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earnings {
    /// Rate × time worked.
    pub base: Cents,
    /// Night differential premium.
    pub night_differential: Cents,
    /// Overtime premium.
    pub overtime: Cents,
    /// Regular holiday pay.
    pub regular_holiday: Cents,
    /// Special holiday pay.
    pub special_holiday: Cents,
    /// Manual adjustment.
    pub adjustment: Cents,
}

impl Earnings {
    /// Sum of all components.
    pub fn total(&self) -> Cents {
        self.base
            + self.night_differential
            + self.overtime
            + self.regular_holiday
            + self.special_holiday
            + self.adjustment
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete audit trace for a payroll line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// All calculation steps in order.
    pub steps: Vec<AuditStep>,
    /// Time taken to compute, in microseconds.
    pub duration_us: u64,
}

/// The computed payroll for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    /// Unique identifier of this computation.
    pub calculation_id: Uuid,
    /// When the computation ran.
    pub timestamp: DateTime<Utc>,
    /// The employee being paid.
    pub employee_id: String,
    /// Gross components.
    pub earnings: Earnings,
    /// Gross pay.
    pub gross: Cents,
    /// Statutory contributions in scheme order.
    pub contributions: Vec<Contribution>,
    /// Supplemental plan deduction (employee only).
    pub supplemental: Cents,
    /// Sum of all employee-side deductions.
    pub total_deductions: Cents,
    /// Sum of employer shares (not deducted).
    pub employer_contributions: Cents,
    /// Gross minus employee deductions.
    pub net: Cents,
    /// How each figure was reached.
    pub audit_trace: AuditTrace,
}

/// Aggregated totals of a payroll run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunTotals {
    /// Total gross.
    pub gross: Cents,
    /// Total employee deductions.
    pub deductions: Cents,
    /// Total employer contributions.
    pub employer_contributions: Cents,
    /// Total net.
    pub net: Cents,
}

impl PayrollRunTotals {
    /// Sums the totals of a set of lines.
    pub fn from_lines(lines: &[PayrollLine]) -> Self {
        lines.iter().fold(Self::default(), |mut acc, line| {
            acc.gross += line.gross;
            acc.deductions += line.total_deductions;
            acc.employer_contributions += line.employer_contributions;
            acc.net += line.net;
            acc
        })
    }
}

/// A persisted payroll run covering several employees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Run identifier.
    pub id: Uuid,
    /// Free-text label (e.g. "October 1-15").
    pub label: String,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// When the run was created.
    pub created_at: DateTime<Utc>,
    /// One line per employee.
    pub lines: Vec<PayrollLine>,
    /// Run totals.
    pub totals: PayrollRunTotals,
}
