//! Core data models for the concierge and payroll service.
//!
//! This module contains all the domain models used throughout the service.

mod attendance;
mod conversation;
mod hotel;
mod money;
mod payroll;

pub use attendance::{AttendanceCode, AttendanceRecord, StaffMember};
pub use conversation::{ConversationLog, QuestionCategory, QuestionRecord, ReplySource};
pub use hotel::{FaqEntry, GENERAL_FAQ_SCOPE, HotelRecord, MatchResult, RoomDocument, RoomView};
pub use money::Cents;
pub use payroll::{
    AuditStep, AuditTrace, Contribution, ContributionBasis, ContributionOverride,
    ContributionOverrides, Earnings, PayrollInput, PayrollLine, PayrollRun, PayrollRunTotals,
    Scheme,
};
