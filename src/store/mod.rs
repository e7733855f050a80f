//! Document store abstraction.
//!
//! Hotels, rooms, FAQs, conversation logs, question intake, payroll runs,
//! the staff roster and attendance all live in a document database owned by
//! other tools. The service talks to it through [`DocumentStore`];
//! [`MemoryStore`] is the in-process implementation seeded from JSON.

mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ServiceResult;
use crate::models::{
    AttendanceRecord, ConversationLog, FaqEntry, HotelRecord, PayrollRun, QuestionRecord,
    RoomDocument, StaffMember,
};

pub use memory::{KnowledgeSeed, MemoryStore, SeedHotel};

/// Parameters of a room query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomQuery {
    /// Only return rooms whose `available` field is exactly `true`.
    pub available_only: bool,
    /// Maximum number of documents returned.
    pub limit: usize,
}

impl RoomQuery {
    /// An equality-filtered query for available rooms.
    pub fn available(limit: usize) -> Self {
        Self {
            available_only: true,
            limit,
        }
    }

    /// An unfiltered batch.
    pub fn unfiltered(limit: usize) -> Self {
        Self {
            available_only: false,
            limit,
        }
    }
}

/// Read and write access to the knowledge base and admin collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists every hotel, without rooms or FAQs attached.
    async fn list_hotels(&self) -> ServiceResult<Vec<HotelRecord>>;

    /// Queries a hotel's room documents.
    ///
    /// A filtered query may fail with `QueryRejected` when the backend
    /// cannot serve it.
    async fn query_rooms(&self, hotel_id: &str, query: RoomQuery) -> ServiceResult<Vec<RoomDocument>>;

    /// Lists FAQs for a hotel, or the general FAQs when `hotel_id` is `None`.
    async fn list_faqs(&self, hotel_id: Option<&str>) -> ServiceResult<Vec<FaqEntry>>;

    /// Appends an entry to the conversation log.
    async fn log_conversation(&self, entry: ConversationLog) -> ServiceResult<()>;

    /// Stores a classified guest question.
    async fn save_question(&self, record: QuestionRecord) -> ServiceResult<()>;

    /// Persists a payroll run.
    async fn save_payroll_run(&self, run: PayrollRun) -> ServiceResult<()>;

    /// Fetches a payroll run by id.
    async fn get_payroll_run(&self, run_id: Uuid) -> ServiceResult<Option<PayrollRun>>;

    /// Lists the staff roster.
    async fn list_staff(&self) -> ServiceResult<Vec<StaffMember>>;

    /// Inserts or replaces the attendance record for an employee and day.
    async fn save_attendance(&self, record: AttendanceRecord) -> ServiceResult<()>;
}
