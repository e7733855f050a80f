//! Attendance models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A member of staff who may check in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Employee identifier typed at the terminal.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Inactive staff cannot check in.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// A short-lived code shown as a QR image at the attendance terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceCode {
    /// The opaque code encoded in the QR image.
    pub code: String,
    /// Label of the admin or device that issued it.
    pub issued_by: String,
    /// Issue time.
    pub issued_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
}

impl AttendanceCode {
    /// Returns true while the code can still be used.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// One employee's attendance for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee.
    pub employee_id: String,
    /// The day being recorded.
    pub work_date: NaiveDate,
    /// Check-in time.
    pub checked_in_at: DateTime<Utc>,
    /// Check-out time, once recorded.
    pub checked_out_at: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    /// Minutes between check-in and check-out, if checked out.
    pub fn worked_minutes(&self) -> Option<i64> {
        self.checked_out_at
            .map(|out| (out - self.checked_in_at).num_minutes())
    }
}
