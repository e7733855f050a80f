//! Base pay calculation functionality.
//!
//! This module determines base pay from either an hourly or a daily rate,
//! and derives the hourly rate every premium is computed from.

use rust_decimal::Decimal;

use crate::config::PayrollRules;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{AuditStep, Cents, PayrollInput};

/// The result of the base pay calculation.
#[derive(Debug, Clone)]
pub struct BasePayResult {
    /// Rate × time worked.
    pub base: Cents,
    /// The hourly rate used for premiums, rounded to the cent.
    pub hourly_rate: Cents,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates base pay and the implied hourly rate.
///
/// Priority:
/// 1. If `hourly_rate` is supplied, base pay is `hourly_rate × hours_worked`
///    and the hourly rate is used as-is.
/// 2. Otherwise base pay is `daily_rate × days_worked` and the implied
///    hourly rate is `daily_rate / hours_per_day`.
///
/// Both products are rounded to the nearest cent immediately.
///
/// # Errors
///
/// Returns `InvalidPayrollInput` when neither rate is supplied, when
/// `hours_per_day` is not positive, or when pay does not fit in cents.
///
/// # Examples
///
/// ```
/// use innkeeper::calculation::calculate_base_pay;
/// use innkeeper::config::PayrollRules;
/// use innkeeper::models::{Cents, PayrollInput};
/// use rust_decimal::Decimal;
///
/// let mut input = PayrollInput::for_employee("emp_001");
/// input.daily_rate = Some(Decimal::from(500));
/// input.days_worked = Decimal::from(13);
///
/// let result = calculate_base_pay(&input, &PayrollRules::default(), 1).unwrap();
/// assert_eq!(result.base, Cents::new(650000));
/// assert_eq!(result.hourly_rate, Cents::new(6250));
/// ```
pub fn calculate_base_pay(
    input: &PayrollInput,
    rules: &PayrollRules,
    step_number: u32,
) -> ServiceResult<BasePayResult> {
    if let Some(hourly) = input.hourly_rate {
        let base = hourly
            .checked_mul(input.hours_worked)
            .and_then(Cents::from_decimal)
            .ok_or_else(|| ServiceError::out_of_range("hourly_rate"))?;
        let hourly_rate =
            Cents::from_decimal(hourly).ok_or_else(|| ServiceError::out_of_range("hourly_rate"))?;

        let audit_step = AuditStep {
            step_number,
            rule_id: "base_pay".to_string(),
            rule_name: "Base Pay".to_string(),
            input: serde_json::json!({
                "hourly_rate": hourly.to_string(),
                "hours_worked": input.hours_worked.to_string()
            }),
            output: serde_json::json!({
                "base": base.amount_string(),
                "hourly_rate": hourly_rate.amount_string(),
                "source": "hourly_rate"
            }),
            reasoning: format!("{} x {}h = {}", hourly, input.hours_worked, base),
        };

        return Ok(BasePayResult {
            base,
            hourly_rate,
            audit_step,
        });
    }

    let daily = input
        .daily_rate
        .ok_or_else(|| ServiceError::invalid_input("daily_rate", "either hourly_rate or daily_rate is required"))?;

    if rules.hours_per_day <= Decimal::ZERO {
        return Err(ServiceError::invalid_input(
            "hours_per_day",
            "configured hours per day must be positive",
        ));
    }

    let base = daily
        .checked_mul(input.days_worked)
        .and_then(Cents::from_decimal)
        .ok_or_else(|| ServiceError::out_of_range("daily_rate"))?;
    let hourly_rate = daily
        .checked_div(rules.hours_per_day)
        .and_then(Cents::from_decimal)
        .ok_or_else(|| ServiceError::out_of_range("daily_rate"))?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "base_pay".to_string(),
        rule_name: "Base Pay".to_string(),
        input: serde_json::json!({
            "daily_rate": daily.to_string(),
            "days_worked": input.days_worked.to_string(),
            "hours_per_day": rules.hours_per_day.to_string()
        }),
        output: serde_json::json!({
            "base": base.amount_string(),
            "hourly_rate": hourly_rate.amount_string(),
            "source": "daily_rate"
        }),
        reasoning: format!(
            "{} x {} days = {}; implied hourly {} / {} = {}",
            daily, input.days_worked, base, daily, rules.hours_per_day, hourly_rate
        ),
    };

    Ok(BasePayResult {
        base,
        hourly_rate,
        audit_step,
    })
}
