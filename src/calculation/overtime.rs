//! Overtime calculation.

use rust_decimal::Decimal;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{AuditStep, Cents};

/// The result of the overtime calculation.
#[derive(Debug, Clone)]
pub struct OvertimeResult {
    /// Overtime pay added to gross.
    pub amount: Cents,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates overtime pay as `hourly_rate × overtime_hours × multiplier`.
///
/// # Errors
///
/// Returns `InvalidPayrollInput` for `overtime_hours` when the amount does
/// not fit in cents.
///
/// # Examples
///
/// ```
/// use innkeeper::calculation::calculate_overtime;
/// use innkeeper::models::Cents;
/// use rust_decimal::Decimal;
///
/// let result = calculate_overtime(Cents::new(6250), Decimal::from(2), Decimal::new(125, 2), 3).unwrap();
/// assert_eq!(result.amount, Cents::new(15625));
/// ```
pub fn calculate_overtime(
    hourly_rate: Cents,
    overtime_hours: Decimal,
    multiplier: Decimal,
    step_number: u32,
) -> ServiceResult<OvertimeResult> {
    let amount = hourly_rate
        .mul_rounded(overtime_hours)
        .and_then(|hours_pay| hours_pay.mul_rounded(multiplier))
        .ok_or_else(|| ServiceError::out_of_range("overtime_hours"))?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "overtime".to_string(),
        rule_name: "Overtime".to_string(),
        input: serde_json::json!({
            "hourly_rate": hourly_rate.amount_string(),
            "overtime_hours": overtime_hours.to_string(),
            "multiplier": multiplier.to_string()
        }),
        output: serde_json::json!({
            "amount": amount.amount_string()
        }),
        reasoning: if overtime_hours.is_zero() {
            "No overtime worked".to_string()
        } else {
            format!(
                "{} x {}h x {} = {}",
                hourly_rate, overtime_hours, multiplier, amount
            )
        },
    };

    Ok(OvertimeResult { amount, audit_step })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_overtime_at_time_and_a_quarter() {
        let result = calculate_overtime(Cents::new(6250), dec("2"), dec("1.25"), 1).unwrap();

        assert_eq!(result.amount, Cents::new(15625));
        assert_eq!(result.audit_step.output["amount"], "156.25");
    }

    #[test]
    fn test_zero_overtime() {
        let result = calculate_overtime(Cents::new(6250), Decimal::ZERO, dec("1.25"), 1).unwrap();

        assert!(result.amount.is_zero());
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 64.38 x 1 = 64.38, x 1.25 = 80.475 -> 80.48
        let result = calculate_overtime(Cents::new(6438), dec("1"), dec("1.25"), 1).unwrap();

        assert_eq!(result.amount, Cents::new(8048));
    }

    #[test]
    fn test_huge_overtime_is_out_of_range() {
        // 1e17 hours at 62.50 is far beyond i64 cents.
        let result = calculate_overtime(Cents::new(6250), dec("100000000000000000"), dec("1.25"), 1);

        match result {
            Err(ServiceError::InvalidPayrollInput { field, .. }) => assert_eq!(field, "overtime_hours"),
            other => panic!("Expected InvalidPayrollInput, got {:?}", other),
        }
    }
}
