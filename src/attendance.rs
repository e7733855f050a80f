//! Staff attendance at the front-desk terminal.
//!
//! An admin issues a short-lived [`AttendanceCode`], shown as a QR image on
//! the terminal. Staff check in and out by submitting their employee id
//! with the current code. Repeated failures from one client lock it out for
//! a while; the lockout is advisory and lives only in this process.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AttendanceSettings;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{AttendanceCode, AttendanceRecord};
use crate::store::DocumentStore;

#[derive(Debug, Clone, Copy)]
struct AttemptState {
    failures: u32,
    last_failure: Instant,
    locked_until: Option<Instant>,
}

impl AttemptState {
    /// A lockout that has run out, or unlocked failures older than one
    /// lockout window, no longer affect the client.
    fn is_stale(&self, now: Instant, window: Duration) -> bool {
        match self.locked_until {
            Some(until) => now >= until,
            None => now.saturating_duration_since(self.last_failure) >= window,
        }
    }
}

/// Per-client failed-attempt counter with a timed lockout.
#[derive(Debug)]
pub struct AttemptGuard {
    max_failures: u32,
    lockout: Duration,
    clients: HashMap<String, AttemptState>,
}

impl AttemptGuard {
    /// Creates a guard allowing `max_failures` before locking for `lockout`.
    pub fn new(max_failures: u32, lockout: Duration) -> Self {
        Self {
            max_failures: max_failures.max(1),
            lockout,
            clients: HashMap::new(),
        }
    }

    /// Fails with `AttendanceLocked` while the client is locked out.
    pub fn check(&mut self, client: &str, now: Instant) -> ServiceResult<()> {
        self.prune(now);
        match self.clients.get(client).and_then(|state| state.locked_until) {
            Some(until) => {
                let remaining = until.duration_since(now);
                Err(ServiceError::AttendanceLocked {
                    retry_after_secs: remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0),
                })
            }
            None => Ok(()),
        }
    }

    /// Counts a failure; the last allowed failure starts the lockout.
    pub fn record_failure(&mut self, client: &str, now: Instant) {
        self.prune(now);
        let state = self.clients.entry(client.to_string()).or_insert(AttemptState {
            failures: 0,
            last_failure: now,
            locked_until: None,
        });
        state.failures += 1;
        state.last_failure = now;
        if state.failures >= self.max_failures {
            state.locked_until = Some(now + self.lockout);
            warn!(client = %client, failures = state.failures, "Attendance client locked out");
        }
    }

    /// Clears the client's failures.
    pub fn record_success(&mut self, client: &str) {
        self.clients.remove(client);
    }

    fn prune(&mut self, now: Instant) {
        let window = self.lockout;
        self.clients.retain(|_, state| !state.is_stale(now, window));
    }
}

/// Issued codes and open attendance records.
#[derive(Debug, Default)]
pub struct AttendanceBook {
    codes: HashMap<String, AttendanceCode>,
    records: HashMap<String, Vec<AttendanceRecord>>,
}

impl AttendanceBook {
    /// Issues a new code valid for `ttl`.
    pub fn issue_code(&mut self, issued_by: &str, ttl: chrono::Duration, now: DateTime<Utc>) -> AttendanceCode {
        self.codes.retain(|_, c| c.is_valid_at(now));
        let code = AttendanceCode {
            code: Uuid::new_v4().simple().to_string(),
            issued_by: issued_by.to_string(),
            issued_at: now,
            expires_at: now + ttl,
        };
        self.codes.insert(code.code.clone(), code.clone());
        code
    }

    /// Returns true when `code` was issued and has not expired.
    pub fn is_code_valid(&self, code: &str, now: DateTime<Utc>) -> bool {
        self.codes.get(code).is_some_and(|c| c.is_valid_at(now))
    }

    /// Builds today's record for an employee without storing it.
    pub fn check_in(&self, employee_id: &str, now: DateTime<Utc>) -> ServiceResult<AttendanceRecord> {
        let today = now.date_naive();
        let records = self.records.get(employee_id).map(Vec::as_slice).unwrap_or_default();
        if records.iter().any(|r| r.work_date == today || r.checked_out_at.is_none()) {
            return Err(ServiceError::DuplicateCheckIn {
                employee_id: employee_id.to_string(),
            });
        }
        Ok(AttendanceRecord {
            employee_id: employee_id.to_string(),
            work_date: today,
            checked_in_at: now,
            checked_out_at: None,
        })
    }

    /// Builds the closed copy of the employee's open record, which may have
    /// started on an earlier day. The book is unchanged until [`commit`].
    ///
    /// [`commit`]: AttendanceBook::commit
    pub fn check_out(&self, employee_id: &str, now: DateTime<Utc>) -> ServiceResult<AttendanceRecord> {
        let open = self
            .records
            .get(employee_id)
            .and_then(|records| records.iter().rev().find(|r| r.checked_out_at.is_none()))
            .ok_or_else(|| ServiceError::NotCheckedIn {
                employee_id: employee_id.to_string(),
            })?;
        Ok(AttendanceRecord {
            checked_out_at: Some(now),
            ..open.clone()
        })
    }

    /// Stores a record built by [`check_in`] or [`check_out`], replacing
    /// the open record it closes.
    ///
    /// [`check_in`]: AttendanceBook::check_in
    /// [`check_out`]: AttendanceBook::check_out
    pub fn commit(&mut self, record: AttendanceRecord) {
        let records = self.records.entry(record.employee_id.clone()).or_default();
        match records
            .iter_mut()
            .find(|r| r.checked_in_at == record.checked_in_at && r.checked_out_at.is_none())
        {
            Some(open) => *open = record,
            None => records.push(record),
        }
    }
}

/// Process-scoped attendance state.
#[derive(Debug)]
pub struct AttendanceService {
    book: Mutex<AttendanceBook>,
    guard: Mutex<AttemptGuard>,
    settings: AttendanceSettings,
}

/// Which end of the shift is being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punch {
    /// Start of shift.
    In,
    /// End of shift.
    Out,
}

impl AttendanceService {
    /// Creates the service from configuration.
    pub fn new(settings: AttendanceSettings) -> Self {
        Self {
            book: Mutex::new(AttendanceBook::default()),
            guard: Mutex::new(AttemptGuard::new(
                settings.max_failed_attempts,
                Duration::from_secs(settings.lockout_seconds),
            )),
            settings,
        }
    }

    /// Issues a fresh attendance code.
    pub async fn issue_code(&self, issued_by: &str) -> AttendanceCode {
        let ttl = chrono::Duration::minutes(self.settings.code_ttl_minutes);
        let code = self.book.lock().await.issue_code(issued_by, ttl, Utc::now());
        info!(issued_by = %issued_by, expires_at = %code.expires_at, "Attendance code issued");
        code
    }

    /// Records a check-in or check-out.
    ///
    /// # Errors
    ///
    /// - `AttendanceLocked` while the client is locked out
    /// - `UnknownEmployee` / `InvalidAttendanceCode`, which count as failures
    /// - `DuplicateCheckIn` / `NotCheckedIn` for out-of-order punches
    /// - store errors when the record cannot be saved
    pub async fn punch(
        &self,
        store: &dyn DocumentStore,
        client: &str,
        employee_id: &str,
        code: &str,
        punch: Punch,
    ) -> ServiceResult<AttendanceRecord> {
        self.guard.lock().await.check(client, Instant::now())?;

        let now = Utc::now();
        if let Err(e) = self.verify(store, employee_id, code, now).await {
            self.guard.lock().await.record_failure(client, Instant::now());
            return Err(e);
        }
        self.guard.lock().await.record_success(client);

        // The book stays locked until the store accepts the record, so a
        // failed save leaves it untouched and concurrent punches queue.
        let mut book = self.book.lock().await;
        let record = match punch {
            Punch::In => book.check_in(employee_id, now)?,
            Punch::Out => book.check_out(employee_id, now)?,
        };
        store.save_attendance(record.clone()).await?;
        book.commit(record.clone());
        drop(book);

        info!(employee_id = %employee_id, punch = ?punch, "Attendance recorded");
        Ok(record)
    }

    async fn verify(
        &self,
        store: &dyn DocumentStore,
        employee_id: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<()> {
        let staff = store.list_staff().await?;
        if !staff.iter().any(|s| s.active && s.id == employee_id) {
            return Err(ServiceError::UnknownEmployee {
                employee_id: employee_id.to_string(),
            });
        }
        if !self.book.lock().await.is_code_valid(code, now) {
            return Err(ServiceError::InvalidAttendanceCode);
        }
        Ok(())
    }
}
