//! Night differential calculation.

use rust_decimal::Decimal;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{AuditStep, Cents};

/// The result of the night differential calculation.
#[derive(Debug, Clone)]
pub struct NightDifferentialResult {
    /// The premium added to gross.
    pub amount: Cents,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the night differential premium.
///
/// The premium is `hourly_rate × night_hours × rate`, rounded to the cent
/// after each multiplication. It is paid on top of any overtime or holiday
/// pay covering the same hours.
///
/// # Errors
///
/// Returns `InvalidPayrollInput` for `night_hours` when the premium does not
/// fit in cents.
///
/// # Examples
///
/// ```
/// use innkeeper::calculation::calculate_night_differential;
/// use innkeeper::models::Cents;
/// use rust_decimal::Decimal;
///
/// let result = calculate_night_differential(
///     Cents::new(6250),
///     Decimal::from(4),
///     Decimal::new(10, 2),
///     2,
/// )
/// .unwrap();
/// assert_eq!(result.amount, Cents::new(2500));
/// ```
pub fn calculate_night_differential(
    hourly_rate: Cents,
    night_hours: Decimal,
    rate: Decimal,
    step_number: u32,
) -> ServiceResult<NightDifferentialResult> {
    let amount = hourly_rate
        .mul_rounded(night_hours)
        .and_then(|hours_pay| hours_pay.mul_rounded(rate))
        .ok_or_else(|| ServiceError::out_of_range("night_hours"))?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "night_differential".to_string(),
        rule_name: "Night Differential".to_string(),
        input: serde_json::json!({
            "hourly_rate": hourly_rate.amount_string(),
            "night_hours": night_hours.to_string(),
            "rate": rate.to_string()
        }),
        output: serde_json::json!({
            "amount": amount.amount_string()
        }),
        reasoning: if night_hours.is_zero() {
            "No night hours worked".to_string()
        } else {
            format!("{} x {}h x {} = {}", hourly_rate, night_hours, rate, amount)
        },
    };

    Ok(NightDifferentialResult { amount, audit_step })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_no_night_hours_is_zero() {
        let result = calculate_night_differential(Cents::new(6250), Decimal::ZERO, dec("0.10"), 1).unwrap();

        assert!(result.amount.is_zero());
        assert_eq!(result.audit_step.reasoning, "No night hours worked");
    }

    #[test]
    fn test_premium_rounds_each_multiplication() {
        // 64.38 x 3 = 193.14, x 0.10 = 19.314 -> 19.31
        let result = calculate_night_differential(Cents::new(6438), dec("3"), dec("0.10"), 1).unwrap();

        assert_eq!(result.amount, Cents::new(1931));
    }

    #[test]
    fn test_fractional_hours() {
        // 62.50 x 1.5 = 93.75, x 0.10 = 9.375 -> 9.38
        let result = calculate_night_differential(Cents::new(6250), dec("1.5"), dec("0.10"), 1).unwrap();

        assert_eq!(result.amount, Cents::new(938));
        assert_eq!(result.audit_step.rule_id, "night_differential");
    }

    #[test]
    fn test_overflowing_hours_are_out_of_range() {
        let result = calculate_night_differential(Cents::new(i64::MAX), Decimal::MAX, dec("0.10"), 1);

        match result {
            Err(ServiceError::InvalidPayrollInput { field, .. }) => assert_eq!(field, "night_hours"),
            other => panic!("Expected InvalidPayrollInput, got {:?}", other),
        }
    }
}
