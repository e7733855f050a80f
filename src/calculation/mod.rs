//! Payroll calculation logic.
//!
//! This module contains the rule functions that make up a payroll line:
//! base pay and the implied hourly rate, night differential, overtime,
//! holiday pay, statutory contributions and the supplemental plan. Each rule
//! returns its amount alongside an [`AuditStep`](crate::models::AuditStep);
//! [`compute_payroll_line`] runs them in order.

mod base_pay;
mod holiday_pay;
mod night_differential;
mod overtime;
mod payroll_line;
mod statutory;
mod supplemental;

pub use base_pay::{BasePayResult, calculate_base_pay};
pub use holiday_pay::{HolidayPayResult, calculate_holiday_pay};
pub use night_differential::{NightDifferentialResult, calculate_night_differential};
pub use overtime::{OvertimeResult, calculate_overtime};
pub use payroll_line::{compute_payroll_line, validate_payroll_input};
pub use statutory::{
    MonthlyShares, StatutoryResult, calculate_statutory, health_shares, housing_shares,
    monthly_shares, pension_shares,
};
pub use supplemental::{SupplementalResult, calculate_supplemental};
