//! Payroll line orchestration.
//!
//! Runs every payroll rule in order and assembles the [`PayrollLine`] with
//! its audit trace.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::PayrollRules;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{AuditStep, AuditTrace, Cents, Earnings, PayrollInput, PayrollLine};

use super::{
    calculate_base_pay, calculate_holiday_pay, calculate_night_differential, calculate_overtime,
    calculate_statutory, calculate_supplemental,
};

/// Rejects negative rates, hours and factors.
///
/// # Errors
///
/// Returns `InvalidPayrollInput` naming the first offending field.
pub fn validate_payroll_input(input: &PayrollInput) -> ServiceResult<()> {
    if input.employee_id.trim().is_empty() {
        return Err(ServiceError::invalid_input("employee_id", "must not be empty"));
    }
    if input.hourly_rate.is_none() && input.daily_rate.is_none() {
        return Err(ServiceError::invalid_input(
            "daily_rate",
            "either hourly_rate or daily_rate is required",
        ));
    }

    let checks: [(&str, Option<Decimal>); 11] = [
        ("hourly_rate", input.hourly_rate),
        ("daily_rate", input.daily_rate),
        ("days_worked", Some(input.days_worked)),
        ("hours_worked", Some(input.hours_worked)),
        ("overtime_hours", Some(input.overtime_hours)),
        ("night_hours", Some(input.night_hours)),
        ("regular_holiday_hours", Some(input.regular_holiday_hours)),
        ("special_holiday_hours", Some(input.special_holiday_hours)),
        ("monthly_salary", input.monthly_salary),
        ("period_factor", input.period_factor),
        ("supplemental_rate", input.supplemental_rate),
    ];
    for (field, value) in checks {
        if value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
            return Err(ServiceError::invalid_input(field, "must not be negative"));
        }
    }

    for scheme in crate::models::Scheme::ALL {
        if let Some(over) = input.overrides.get(scheme) {
            if over.employee_cents < 0 || over.employer_cents < 0 {
                return Err(ServiceError::invalid_input(
                    format!("overrides.{}", scheme.as_str()),
                    "must not be negative",
                ));
            }
        }
    }

    Ok(())
}

/// Computes one employee's payroll line.
///
/// Order of rules:
/// 1. Base pay (and implied hourly rate)
/// 2. Night differential
/// 3. Overtime
/// 4. Holiday pay
/// 5. Manual adjustment
/// 6. Statutory contributions
/// 7. Supplemental plan
///
/// Net pay is gross minus the employee shares and the supplemental
/// deduction. Employer shares are reported only.
///
/// # Errors
///
/// Returns `InvalidPayrollInput` when validation fails.
///
/// # Examples
///
/// ```
/// use innkeeper::calculation::compute_payroll_line;
/// use innkeeper::config::PayrollRules;
/// use innkeeper::models::{Cents, PayrollInput};
/// use rust_decimal::Decimal;
///
/// let mut input = PayrollInput::for_employee("emp_001");
/// input.daily_rate = Some(Decimal::from(500));
/// input.days_worked = Decimal::from(13);
///
/// let line = compute_payroll_line(&input, &PayrollRules::default()).unwrap();
/// assert_eq!(line.gross, Cents::new(650000));
/// assert_eq!(line.net, line.gross - line.total_deductions);
/// ```
pub fn compute_payroll_line(input: &PayrollInput, rules: &PayrollRules) -> ServiceResult<PayrollLine> {
    let started = Instant::now();
    validate_payroll_input(input)?;

    let mut steps: Vec<AuditStep> = Vec::new();

    let base = calculate_base_pay(input, rules, 1)?;
    steps.push(base.audit_step);
    let hourly = base.hourly_rate;

    let night = calculate_night_differential(
        hourly,
        input.night_hours,
        rules.night_differential_rate,
        2,
    )?;
    steps.push(night.audit_step);

    let overtime = calculate_overtime(hourly, input.overtime_hours, rules.overtime_multiplier, 3)?;
    steps.push(overtime.audit_step);

    let holiday = calculate_holiday_pay(
        hourly,
        input.regular_holiday_hours,
        input.special_holiday_hours,
        rules,
        4,
    )?;
    steps.push(holiday.audit_step);

    let adjustment = Cents::new(input.adjustment_cents);
    steps.push(AuditStep {
        step_number: 5,
        rule_id: "manual_adjustment".to_string(),
        rule_name: "Manual Adjustment".to_string(),
        input: serde_json::json!({ "adjustment_cents": input.adjustment_cents }),
        output: serde_json::json!({ "amount": adjustment.amount_string() }),
        reasoning: if adjustment.is_zero() {
            "No adjustment".to_string()
        } else {
            format!("Adjustment of {} added to gross", adjustment)
        },
    });

    let earnings = Earnings {
        base: base.base,
        night_differential: night.amount,
        overtime: overtime.amount,
        regular_holiday: holiday.regular,
        special_holiday: holiday.special,
        adjustment,
    };
    let gross = earnings.total();

    let statutory = calculate_statutory(input, gross, rules, 6)?;
    steps.push(statutory.audit_step);

    let supplemental_rate = input.supplemental_rate.unwrap_or(rules.supplemental_rate);
    let supplemental = calculate_supplemental(gross, supplemental_rate, 7)?;
    steps.push(supplemental.audit_step);

    let employee_shares: Cents = statutory.contributions.iter().map(|c| c.employee).sum();
    let employer_contributions: Cents = statutory.contributions.iter().map(|c| c.employer).sum();
    let total_deductions = employee_shares + supplemental.amount;
    let net = gross - total_deductions;

    Ok(PayrollLine {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        employee_id: input.employee_id.clone(),
        earnings,
        gross,
        contributions: statutory.contributions,
        supplemental: supplemental.amount,
        total_deductions,
        employer_contributions,
        net,
        audit_trace: AuditTrace {
            steps,
            duration_us: started.elapsed().as_micros() as u64,
        },
    })
}
