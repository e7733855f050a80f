//! Holiday pay calculation.
//!
//! Regular and special holidays pay hours worked at their own multipliers.

use rust_decimal::Decimal;

use crate::config::PayrollRules;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{AuditStep, Cents};

/// The result of the holiday pay calculation.
#[derive(Debug, Clone)]
pub struct HolidayPayResult {
    /// Pay for regular holiday hours.
    pub regular: Cents,
    /// Pay for special holiday hours.
    pub special: Cents,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates regular and special holiday pay.
///
/// Each is `hours × hourly_rate × multiplier`, rounded after each step.
///
/// # Errors
///
/// Returns `InvalidPayrollInput` naming the holiday hours field whose pay
/// does not fit in cents.
pub fn calculate_holiday_pay(
    hourly_rate: Cents,
    regular_hours: Decimal,
    special_hours: Decimal,
    rules: &PayrollRules,
    step_number: u32,
) -> ServiceResult<HolidayPayResult> {
    let regular = hourly_rate
        .mul_rounded(regular_hours)
        .and_then(|pay| pay.mul_rounded(rules.regular_holiday_multiplier))
        .ok_or_else(|| ServiceError::out_of_range("regular_holiday_hours"))?;
    let special = hourly_rate
        .mul_rounded(special_hours)
        .and_then(|pay| pay.mul_rounded(rules.special_holiday_multiplier))
        .ok_or_else(|| ServiceError::out_of_range("special_holiday_hours"))?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "holiday_pay".to_string(),
        rule_name: "Holiday Pay".to_string(),
        input: serde_json::json!({
            "hourly_rate": hourly_rate.amount_string(),
            "regular_holiday_hours": regular_hours.to_string(),
            "special_holiday_hours": special_hours.to_string(),
            "regular_multiplier": rules.regular_holiday_multiplier.to_string(),
            "special_multiplier": rules.special_holiday_multiplier.to_string()
        }),
        output: serde_json::json!({
            "regular": regular.amount_string(),
            "special": special.amount_string()
        }),
        reasoning: format!(
            "Regular {}h x {} x {} = {}; special {}h x {} x {} = {}",
            regular_hours,
            hourly_rate,
            rules.regular_holiday_multiplier,
            regular,
            special_hours,
            hourly_rate,
            rules.special_holiday_multiplier,
            special
        ),
    };

    Ok(HolidayPayResult {
        regular,
        special,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_holiday_is_double_pay() {
        let result = calculate_holiday_pay(
            Cents::new(6250),
            Decimal::from(8),
            Decimal::ZERO,
            &PayrollRules::default(),
            1,
        )
        .unwrap();

        assert_eq!(result.regular, Cents::new(100000));
        assert!(result.special.is_zero());
    }

    #[test]
    fn test_special_holiday_multiplier() {
        // 62.50 x 8 = 500.00, x 1.3 = 650.00
        let result = calculate_holiday_pay(
            Cents::new(6250),
            Decimal::ZERO,
            Decimal::from(8),
            &PayrollRules::default(),
            5,
        )
        .unwrap();

        assert_eq!(result.special, Cents::new(65000));
        assert_eq!(result.audit_step.step_number, 5);
    }

    #[test]
    fn test_overflowing_special_hours_are_out_of_range() {
        let result = calculate_holiday_pay(
            Cents::new(6250),
            Decimal::ZERO,
            Decimal::MAX,
            &PayrollRules::default(),
            1,
        );

        match result {
            Err(ServiceError::InvalidPayrollInput { field, .. }) => {
                assert_eq!(field, "special_holiday_hours")
            }
            other => panic!("Expected InvalidPayrollInput, got {:?}", other),
        }
    }
}
