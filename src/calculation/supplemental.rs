//! Supplemental plan deduction.

use rust_decimal::Decimal;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{AuditStep, Cents};

/// The result of the supplemental plan calculation.
#[derive(Debug, Clone)]
pub struct SupplementalResult {
    /// Employee-only deduction.
    pub amount: Cents,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the employee-only supplemental deduction as a percentage of
/// gross. Negative gross deducts nothing.
///
/// # Errors
///
/// Returns `InvalidPayrollInput` for `supplemental_rate` when the deduction
/// does not fit in cents.
pub fn calculate_supplemental(
    gross: Cents,
    rate: Decimal,
    step_number: u32,
) -> ServiceResult<SupplementalResult> {
    let amount = gross
        .max(Cents::ZERO)
        .mul_rounded(rate)
        .ok_or_else(|| ServiceError::out_of_range("supplemental_rate"))?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "supplemental_plan".to_string(),
        rule_name: "Supplemental Plan".to_string(),
        input: serde_json::json!({
            "gross": gross.amount_string(),
            "rate": rate.to_string()
        }),
        output: serde_json::json!({
            "amount": amount.amount_string()
        }),
        reasoning: format!("{} x {} = {}", gross, rate, amount),
    };

    Ok(SupplementalResult { amount, audit_step })
}
