//! Configuration types.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML files in the configuration directory.
//! Every section has defaults so a partial file still loads.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::Scheme;

/// Pension-style scheme brackets.
///
/// The monthly salary credit is clamped to `[salary_floor, salary_ceiling]`
/// and each side pays a fixed percentage of it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PensionRules {
    /// Lowest monthly salary credit.
    pub salary_floor: Decimal,
    /// Highest monthly salary credit.
    pub salary_ceiling: Decimal,
    /// Employee percentage of the salary credit.
    pub employee_rate: Decimal,
    /// Employer percentage of the salary credit.
    pub employer_rate: Decimal,
}

impl Default for PensionRules {
    fn default() -> Self {
        Self {
            salary_floor: Decimal::from(5_000),
            salary_ceiling: Decimal::from(35_000),
            employee_rate: Decimal::new(5, 2),
            employer_rate: Decimal::new(10, 2),
        }
    }
}

/// Health-insurance-style scheme.
///
/// The premium is a percentage of the monthly salary clamped to
/// `[salary_floor, salary_ceiling]`, split evenly between employee and employer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthRules {
    /// Total premium percentage.
    pub premium_rate: Decimal,
    /// Salary floor for the premium base.
    pub salary_floor: Decimal,
    /// Salary ceiling for the premium base.
    pub salary_ceiling: Decimal,
}

impl Default for HealthRules {
    fn default() -> Self {
        Self {
            premium_rate: Decimal::new(5, 2),
            salary_floor: Decimal::from(10_000),
            salary_ceiling: Decimal::from(100_000),
        }
    }
}

/// Housing-fund-style scheme.
///
/// Contributions are computed on the salary capped at `salary_cap`. The
/// employee pays `lower_tier_employee_rate` when the salary is at or below
/// `lower_tier_threshold`, otherwise `employee_rate`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HousingRules {
    /// Maximum salary contributions are computed on.
    pub salary_cap: Decimal,
    /// Salary at or below which the lower employee rate applies.
    pub lower_tier_threshold: Decimal,
    /// Employee percentage in the lower tier.
    pub lower_tier_employee_rate: Decimal,
    /// Employee percentage above the threshold.
    pub employee_rate: Decimal,
    /// Employer percentage.
    pub employer_rate: Decimal,
}

impl Default for HousingRules {
    fn default() -> Self {
        Self {
            salary_cap: Decimal::from(10_000),
            lower_tier_threshold: Decimal::from(1_500),
            lower_tier_employee_rate: Decimal::new(1, 2),
            employee_rate: Decimal::new(2, 2),
            employer_rate: Decimal::new(2, 2),
        }
    }
}

/// Bracketed statutory rules used when a monthly salary base is supplied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatutoryRules {
    /// Pension scheme.
    #[serde(default)]
    pub pension: PensionRules,
    /// Health scheme.
    #[serde(default)]
    pub health: HealthRules,
    /// Housing scheme.
    #[serde(default)]
    pub housing: HousingRules,
}

/// Employee and employer percentages of gross for one scheme.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlatRate {
    /// Employee percentage of gross.
    pub employee: Decimal,
    /// Employer percentage of gross.
    #[serde(default)]
    pub employer: Decimal,
}

/// Flat percentages used when no monthly salary base is supplied.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlatRates {
    /// Pension flat rate.
    pub pension: FlatRate,
    /// Health flat rate.
    pub health: FlatRate,
    /// Housing flat rate.
    pub housing: FlatRate,
}

impl FlatRates {
    /// Returns the flat rate for a scheme.
    pub fn for_scheme(&self, scheme: Scheme) -> &FlatRate {
        match scheme {
            Scheme::Pension => &self.pension,
            Scheme::Health => &self.health,
            Scheme::Housing => &self.housing,
        }
    }
}

impl Default for FlatRates {
    fn default() -> Self {
        Self {
            pension: FlatRate {
                employee: Decimal::new(45, 3),
                employer: Decimal::new(95, 3),
            },
            health: FlatRate {
                employee: Decimal::new(25, 3),
                employer: Decimal::new(25, 3),
            },
            housing: FlatRate {
                employee: Decimal::new(2, 2),
                employer: Decimal::new(2, 2),
            },
        }
    }
}

/// Payroll rules from `payroll.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PayrollRules {
    /// Hours in a working day, used to derive an hourly rate from a daily one.
    pub hours_per_day: Decimal,
    /// Night differential premium as a fraction of the hourly rate.
    pub night_differential_rate: Decimal,
    /// Overtime multiplier.
    pub overtime_multiplier: Decimal,
    /// Regular holiday multiplier.
    pub regular_holiday_multiplier: Decimal,
    /// Special holiday multiplier.
    pub special_holiday_multiplier: Decimal,
    /// Supplemental plan percentage of gross (employee only).
    pub supplemental_rate: Decimal,
    /// Bracketed statutory rules.
    pub statutory: StatutoryRules,
    /// Flat-percentage fallback rates.
    pub flat_rates: FlatRates,
}

impl Default for PayrollRules {
    fn default() -> Self {
        Self {
            hours_per_day: Decimal::from(8),
            night_differential_rate: Decimal::new(10, 2),
            overtime_multiplier: Decimal::new(125, 2),
            regular_holiday_multiplier: Decimal::new(20, 1),
            special_holiday_multiplier: Decimal::new(13, 1),
            supplemental_rate: Decimal::ZERO,
            statutory: StatutoryRules::default(),
            flat_rates: FlatRates::default(),
        }
    }
}

/// Chatbot tuning from `concierge.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConciergeSettings {
    /// Character budget for a single matched hotel's context.
    pub narrow_context_chars: usize,
    /// Character budget for the whole-knowledge-base context.
    pub broad_context_chars: usize,
    /// How many available rooms to fetch for a matched hotel.
    pub room_limit: usize,
    /// Minimum batch size of the unfiltered room scan.
    pub fallback_batch_minimum: usize,
    /// Sort rooms by ascending price before building context.
    pub sort_rooms_by_price: bool,
    /// Reply sent when generation fails.
    pub apology: String,
}

impl Default for ConciergeSettings {
    fn default() -> Self {
        Self {
            narrow_context_chars: 6_000,
            broad_context_chars: 12_000,
            room_limit: 20,
            fallback_batch_minimum: 50,
            sort_rooms_by_price: true,
            apology: "Sorry, I'm having trouble answering right now. Please try again in a moment."
                .to_string(),
        }
    }
}

/// Attendance terminal settings from `concierge.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AttendanceSettings {
    /// Failed attempts allowed before a client is locked out.
    pub max_failed_attempts: u32,
    /// Length of the lockout window in seconds.
    pub lockout_seconds: u64,
    /// Lifetime of an attendance code in minutes.
    pub code_ttl_minutes: i64,
}

impl Default for AttendanceSettings {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout_seconds: 60,
            code_ttl_minutes: 5,
        }
    }
}

/// Shape of `concierge.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConciergeFile {
    /// Chatbot section.
    #[serde(default)]
    pub concierge: ConciergeSettings,
    /// Attendance section.
    #[serde(default)]
    pub attendance: AttendanceSettings,
}

/// The complete service configuration loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    payroll: PayrollRules,
    concierge: ConciergeSettings,
    attendance: AttendanceSettings,
}

impl ServiceConfig {
    /// Creates a new ServiceConfig from its component parts.
    pub fn new(
        payroll: PayrollRules,
        concierge: ConciergeSettings,
        attendance: AttendanceSettings,
    ) -> Self {
        Self {
            payroll,
            concierge,
            attendance,
        }
    }

    /// Returns the payroll rules.
    pub fn payroll(&self) -> &PayrollRules {
        &self.payroll
    }

    /// Returns the chatbot settings.
    pub fn concierge(&self) -> &ConciergeSettings {
        &self.concierge
    }

    /// Returns the attendance settings.
    pub fn attendance(&self) -> &AttendanceSettings {
        &self.attendance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_payroll_yaml_keeps_defaults() {
        let rules: PayrollRules = serde_yaml::from_str("overtime_multiplier: \"1.30\"\n").unwrap();
        assert_eq!(rules.overtime_multiplier, Decimal::new(130, 2));
        assert_eq!(rules.hours_per_day, Decimal::from(8));
        assert_eq!(rules.statutory, StatutoryRules::default());
    }

    #[test]
    fn test_flat_rates_lookup() {
        let rates = FlatRates::default();
        assert_eq!(rates.for_scheme(Scheme::Housing).employee, Decimal::new(2, 2));
    }

    #[test]
    fn test_empty_concierge_file_uses_defaults() {
        let file: ConciergeFile = serde_yaml::from_str("{}").unwrap();
        assert_eq!(file.concierge.fallback_batch_minimum, 50);
        assert_eq!(file.attendance.max_failed_attempts, 5);
    }
}
