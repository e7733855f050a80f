//! Statutory contribution calculation.
//!
//! Three schemes are deducted from every payroll line. How each share is
//! determined depends on what the caller supplied:
//!
//! 1. A caller override for the scheme is used as-is.
//! 2. With a monthly salary base, the bracketed rules compute a full-month
//!    share which is then prorated by the period factor.
//! 3. Otherwise a flat percentage of gross applies.

use rust_decimal::Decimal;

use crate::config::{FlatRate, HealthRules, HousingRules, PayrollRules, PensionRules};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{AuditStep, Cents, Contribution, ContributionBasis, PayrollInput, Scheme};

/// Employee and employer shares for one full month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyShares {
    /// Employee share.
    pub employee: Cents,
    /// Employer share.
    pub employer: Cents,
}

impl MonthlyShares {
    /// Prorates both shares by `factor`, rounding each independently.
    ///
    /// Returns `None` when either share overflows.
    pub fn prorate(self, factor: Decimal) -> Option<Self> {
        Some(Self {
            employee: self.employee.mul_rounded(factor)?,
            employer: self.employer.mul_rounded(factor)?,
        })
    }
}

/// The result of the statutory contribution calculation.
#[derive(Debug, Clone)]
pub struct StatutoryResult {
    /// One contribution per scheme, in [`Scheme::ALL`] order.
    pub contributions: Vec<Contribution>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Pension shares: the salary credit is clamped to the bracket range.
///
/// Returns `None` when a share does not fit in cents.
///
/// ```
/// use innkeeper::calculation::pension_shares;
/// use innkeeper::config::PensionRules;
/// use innkeeper::models::Cents;
/// use rust_decimal::Decimal;
///
/// let shares = pension_shares(Decimal::from(50_000), &PensionRules::default()).unwrap();
/// assert_eq!(shares.employee, Cents::new(175000));
/// ```
pub fn pension_shares(monthly_salary: Decimal, rules: &PensionRules) -> Option<MonthlyShares> {
    let credit = clamp(monthly_salary, rules.salary_floor, rules.salary_ceiling);
    Some(MonthlyShares {
        employee: share(credit, rules.employee_rate)?,
        employer: share(credit, rules.employer_rate)?,
    })
}

/// Health shares: the premium is split evenly, any odd cent goes to the
/// employer.
pub fn health_shares(monthly_salary: Decimal, rules: &HealthRules) -> Option<MonthlyShares> {
    let premium_base = clamp(monthly_salary, rules.salary_floor, rules.salary_ceiling);
    let premium = share(premium_base, rules.premium_rate)?;
    let employee = Cents::new(premium.value() / 2);
    Some(MonthlyShares {
        employee,
        employer: premium - employee,
    })
}

/// Housing shares: computed on the capped salary with a tiered employee rate.
pub fn housing_shares(monthly_salary: Decimal, rules: &HousingRules) -> Option<MonthlyShares> {
    let capped = monthly_salary.min(rules.salary_cap);
    let employee_rate = if monthly_salary <= rules.lower_tier_threshold {
        rules.lower_tier_employee_rate
    } else {
        rules.employee_rate
    };
    Some(MonthlyShares {
        employee: share(capped, employee_rate)?,
        employer: share(capped, rules.employer_rate)?,
    })
}

/// Full-month shares for a scheme under the bracketed rules.
pub fn monthly_shares(
    scheme: Scheme,
    monthly_salary: Decimal,
    rules: &PayrollRules,
) -> Option<MonthlyShares> {
    match scheme {
        Scheme::Pension => pension_shares(monthly_salary, &rules.statutory.pension),
        Scheme::Health => health_shares(monthly_salary, &rules.statutory.health),
        Scheme::Housing => housing_shares(monthly_salary, &rules.statutory.housing),
    }
}

fn flat_shares(gross: Cents, rate: &FlatRate) -> Option<MonthlyShares> {
    let base = gross.max(Cents::ZERO);
    Some(MonthlyShares {
        employee: base.mul_rounded(rate.employee)?,
        employer: base.mul_rounded(rate.employer)?,
    })
}

fn share(base: Decimal, rate: Decimal) -> Option<Cents> {
    Cents::from_decimal(base.checked_mul(rate)?)
}

fn clamp(value: Decimal, floor: Decimal, ceiling: Decimal) -> Decimal {
    value.max(floor).min(ceiling)
}

/// Calculates all three statutory contributions for a payroll line.
///
/// # Errors
///
/// Returns `InvalidPayrollInput` naming `monthly_salary`, `period_factor`
/// or `gross` when a share does not fit in cents.
///
/// # Examples
///
/// ```
/// use innkeeper::calculation::calculate_statutory;
/// use innkeeper::config::PayrollRules;
/// use innkeeper::models::{Cents, PayrollInput};
///
/// let input = PayrollInput::for_employee("emp_001");
/// let result = calculate_statutory(&input, Cents::new(650000), &PayrollRules::default(), 6).unwrap();
///
/// // Flat mode: 4.5% of 6,500.00
/// assert_eq!(result.contributions[0].employee, Cents::new(29250));
/// ```
pub fn calculate_statutory(
    input: &PayrollInput,
    gross: Cents,
    rules: &PayrollRules,
    step_number: u32,
) -> ServiceResult<StatutoryResult> {
    let factor = input.period_factor.unwrap_or(Decimal::ONE);
    let mut contributions = Vec::with_capacity(Scheme::ALL.len());
    let mut details = serde_json::Map::new();

    for scheme in Scheme::ALL {
        let (shares, basis) = if let Some(over) = input.overrides.get(scheme) {
            (
                MonthlyShares {
                    employee: Cents::new(over.employee_cents),
                    employer: Cents::new(over.employer_cents),
                },
                ContributionBasis::Override,
            )
        } else if let Some(salary) = input.monthly_salary {
            let full = monthly_shares(scheme, salary, rules)
                .ok_or_else(|| ServiceError::out_of_range("monthly_salary"))?;
            (
                full.prorate(factor)
                    .ok_or_else(|| ServiceError::out_of_range("period_factor"))?,
                ContributionBasis::MonthlySalary,
            )
        } else {
            (
                flat_shares(gross, rules.flat_rates.for_scheme(scheme))
                    .ok_or_else(|| ServiceError::out_of_range("gross"))?,
                ContributionBasis::FlatPercentage,
            )
        };

        details.insert(
            scheme.as_str().to_string(),
            serde_json::json!({
                "employee": shares.employee.amount_string(),
                "employer": shares.employer.amount_string(),
                "basis": basis
            }),
        );

        contributions.push(Contribution {
            scheme,
            employee: shares.employee,
            employer: shares.employer,
            basis,
        });
    }

    let employee_total: Cents = contributions.iter().map(|c| c.employee).sum();
    let reasoning = match input.monthly_salary {
        Some(salary) => format!(
            "Monthly salary {} prorated by {}; employee shares total {}",
            salary, factor, employee_total
        ),
        None => format!(
            "Flat percentages of gross {}; employee shares total {}",
            gross, employee_total
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "statutory_contributions".to_string(),
        rule_name: "Statutory Contributions".to_string(),
        input: serde_json::json!({
            "gross": gross.amount_string(),
            "monthly_salary": input.monthly_salary.map(|s| s.to_string()),
            "period_factor": factor.to_string()
        }),
        output: serde_json::Value::Object(details),
        reasoning,
    };

    Ok(StatutoryResult {
        contributions,
        audit_step,
    })
}
