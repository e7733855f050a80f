//! In-process document store.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    AttendanceRecord, ConversationLog, FaqEntry, GENERAL_FAQ_SCOPE, HotelRecord, PayrollRun,
    QuestionRecord, RoomDocument, StaffMember,
};

use super::{DocumentStore, RoomQuery};

/// A hotel as written in the seed file, with raw room documents.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedHotel {
    /// Hotel fields.
    #[serde(flatten)]
    pub hotel: HotelRecord,
    /// Raw room documents.
    #[serde(default, rename = "roomDocuments")]
    pub room_documents: Vec<RoomDocument>,
}

/// Shape of the knowledge seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeSeed {
    /// Hotels with their rooms and FAQs.
    #[serde(default)]
    pub hotels: Vec<SeedHotel>,
    /// FAQs not tied to a hotel.
    #[serde(default)]
    pub general_faqs: Vec<FaqEntry>,
    /// Staff roster.
    #[serde(default)]
    pub staff: Vec<StaffMember>,
}

#[derive(Debug, Default)]
struct Collections {
    hotels: Vec<HotelRecord>,
    rooms: HashMap<String, Vec<RoomDocument>>,
    faqs: Vec<FaqEntry>,
    conversations: Vec<ConversationLog>,
    questions: Vec<QuestionRecord>,
    payroll_runs: HashMap<Uuid, PayrollRun>,
    staff: Vec<StaffMember>,
    attendance: Vec<AttendanceRecord>,
}

/// A [`DocumentStore`] held in memory behind a `tokio` lock.
///
/// # Example
///
/// ```no_run
/// use innkeeper::store::MemoryStore;
///
/// let store = MemoryStore::from_seed_file("./data/knowledge.json")?;
/// # Ok::<(), innkeeper::error::ServiceError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Collections>,
    reject_filtered_queries: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a parsed seed.
    pub fn from_seed(seed: KnowledgeSeed) -> Self {
        let mut data = Collections::default();

        for entry in seed.hotels {
            let mut hotel = entry.hotel;
            let hotel_id = hotel.id.clone();
            for mut faq in std::mem::take(&mut hotel.faqs) {
                faq.hotel_id = hotel_id.clone();
                data.faqs.push(faq);
            }
            hotel.rooms.clear();
            data.rooms.insert(hotel_id, entry.room_documents);
            data.hotels.push(hotel);
        }
        for mut faq in seed.general_faqs {
            faq.hotel_id = GENERAL_FAQ_SCOPE.to_string();
            data.faqs.push(faq);
        }
        data.staff = seed.staff;

        Self {
            data: RwLock::new(data),
            reject_filtered_queries: AtomicBool::new(false),
        }
    }

    /// Reads and parses a seed file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` when the file is missing and
    /// `ConfigParseError` when it is not valid seed JSON.
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> ServiceResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ServiceError::ConfigNotFound {
            path: path_str.clone(),
        })?;
        let seed: KnowledgeSeed =
            serde_json::from_str(&content).map_err(|e| ServiceError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        Ok(Self::from_seed(seed))
    }

    /// Makes filtered room queries fail with `QueryRejected`, the way a
    /// backend without the needed index does.
    pub fn set_reject_filtered_queries(&self, reject: bool) {
        self.reject_filtered_queries.store(reject, Ordering::Relaxed);
    }

    /// Adds or replaces a hotel's room documents.
    pub async fn put_rooms(&self, hotel_id: &str, rooms: Vec<RoomDocument>) {
        self.data.write().await.rooms.insert(hotel_id.to_string(), rooms);
    }

    /// Snapshot of the conversation log.
    pub async fn conversations(&self) -> Vec<ConversationLog> {
        self.data.read().await.conversations.clone()
    }

    /// Snapshot of stored questions.
    pub async fn questions(&self) -> Vec<QuestionRecord> {
        self.data.read().await.questions.clone()
    }

    /// Snapshot of attendance records.
    pub async fn attendance(&self) -> Vec<AttendanceRecord> {
        self.data.read().await.attendance.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_hotels(&self) -> ServiceResult<Vec<HotelRecord>> {
        Ok(self.data.read().await.hotels.clone())
    }

    async fn query_rooms(&self, hotel_id: &str, query: RoomQuery) -> ServiceResult<Vec<RoomDocument>> {
        if query.available_only && self.reject_filtered_queries.load(Ordering::Relaxed) {
            return Err(ServiceError::QueryRejected {
                collection: format!("hotels/{hotel_id}/rooms"),
                message: "equality filter on 'available' requires an index".to_string(),
            });
        }

        let data = self.data.read().await;
        let Some(rooms) = data.rooms.get(hotel_id) else {
            return Ok(Vec::new());
        };

        Ok(rooms
            .iter()
            .filter(|doc| !query.available_only || doc.fields.get("available") == Some(&Value::Bool(true)))
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn list_faqs(&self, hotel_id: Option<&str>) -> ServiceResult<Vec<FaqEntry>> {
        let scope = hotel_id.unwrap_or(GENERAL_FAQ_SCOPE);
        Ok(self
            .data
            .read()
            .await
            .faqs
            .iter()
            .filter(|faq| faq.hotel_id == scope)
            .cloned()
            .collect())
    }

    async fn log_conversation(&self, entry: ConversationLog) -> ServiceResult<()> {
        self.data.write().await.conversations.push(entry);
        Ok(())
    }

    async fn save_question(&self, record: QuestionRecord) -> ServiceResult<()> {
        self.data.write().await.questions.push(record);
        Ok(())
    }

    async fn save_payroll_run(&self, run: PayrollRun) -> ServiceResult<()> {
        self.data.write().await.payroll_runs.insert(run.id, run);
        Ok(())
    }

    async fn get_payroll_run(&self, run_id: Uuid) -> ServiceResult<Option<PayrollRun>> {
        Ok(self.data.read().await.payroll_runs.get(&run_id).cloned())
    }

    async fn list_staff(&self) -> ServiceResult<Vec<StaffMember>> {
        Ok(self.data.read().await.staff.clone())
    }

    async fn save_attendance(&self, record: AttendanceRecord) -> ServiceResult<()> {
        let mut data = self.data.write().await;
        match data
            .attendance
            .iter_mut()
            .find(|r| r.employee_id == record.employee_id && r.work_date == record.work_date)
        {
            Some(existing) => *existing = record,
            None => data.attendance.push(record),
        }
        Ok(())
    }
}
