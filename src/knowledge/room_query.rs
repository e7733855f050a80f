//! Two-phase available-room query.
//!
//! The fast path asks the store for rooms whose `available` field is exactly
//! `true`. Documents written by older tools use other encodings, and some
//! backends refuse the filter outright, so an empty or rejected fast path
//! falls back to scanning an unfiltered batch and filtering locally.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::models::{RoomDocument, RoomView};
use crate::store::{DocumentStore, RoomQuery};

use super::fields::{AVAILABILITY, STATUS};
use super::rooms::{coerce_available, extract_rooms};

/// Default minimum size of the unfiltered scan batch.
pub const DEFAULT_BATCH_MINIMUM: usize = 50;

static UNAVAILABLE_STATUS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)occupied|booked|in-use|unavailable").expect("status pattern is valid")
});

/// Why the fast path was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The filtered query returned nothing.
    EmptyResult,
    /// The store refused the filtered query.
    QueryRejected,
}

/// Which path produced a room list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomFetchPath {
    /// The filtered query returned rooms.
    FastPath,
    /// The unfiltered scan was used.
    Fallback(FallbackReason),
}

/// Available rooms together with how they were found.
#[derive(Debug, Clone)]
pub struct RoomFetch {
    /// Normalized available rooms, at most `limit` of them.
    pub rooms: Vec<RoomView>,
    /// The path taken.
    pub path: RoomFetchPath,
}

/// The two phases of an available-room query.
#[async_trait]
pub trait RoomQueryStrategy: Send + Sync {
    /// Runs the filtered query. Returns the reason to fall back when it
    /// yields nothing usable.
    async fn try_fast_path(&self, hotel_id: &str, limit: usize) -> Result<Vec<RoomDocument>, FallbackReason>;

    /// Fetches an unfiltered batch and keeps the available rooms.
    async fn scan_fallback(&self, hotel_id: &str, limit: usize) -> ServiceResult<Vec<RoomDocument>>;
}

/// Decides availability for a document seen by the unfiltered scan.
///
/// An explicit availability value always wins, so `available: false` stays
/// unavailable whatever the status says. Without one, a status text marks
/// the room available unless it reads as occupied. With neither, the room
/// is unavailable.
pub fn is_available_in_scan(doc: &RoomDocument) -> bool {
    if let Some(value) = AVAILABILITY.get(&doc.fields) {
        return coerce_available(Some(value));
    }
    match STATUS.get_text(&doc.fields) {
        Some(status) => !UNAVAILABLE_STATUS.is_match(&status),
        None => false,
    }
}

/// [`RoomQueryStrategy`] backed by a [`DocumentStore`].
pub struct StoreRoomQuery<'a> {
    store: &'a dyn DocumentStore,
    batch_minimum: usize,
}

impl<'a> StoreRoomQuery<'a> {
    /// Creates a strategy over `store`.
    pub fn new(store: &'a dyn DocumentStore, batch_minimum: usize) -> Self {
        Self {
            store,
            batch_minimum,
        }
    }
}

#[async_trait]
impl RoomQueryStrategy for StoreRoomQuery<'_> {
    async fn try_fast_path(&self, hotel_id: &str, limit: usize) -> Result<Vec<RoomDocument>, FallbackReason> {
        match self.store.query_rooms(hotel_id, RoomQuery::available(limit)).await {
            Ok(docs) if docs.is_empty() => Err(FallbackReason::EmptyResult),
            Ok(docs) => Ok(docs),
            Err(ServiceError::QueryRejected { collection, message }) => {
                debug!(hotel_id = %hotel_id, collection = %collection, message = %message, "Filtered room query rejected");
                Err(FallbackReason::QueryRejected)
            }
            Err(e) => {
                warn!(hotel_id = %hotel_id, error = %e, "Filtered room query failed");
                Err(FallbackReason::QueryRejected)
            }
        }
    }

    async fn scan_fallback(&self, hotel_id: &str, limit: usize) -> ServiceResult<Vec<RoomDocument>> {
        let batch = limit.max(self.batch_minimum);
        let docs = self
            .store
            .query_rooms(hotel_id, RoomQuery::unfiltered(batch))
            .await?;

        Ok(docs
            .into_iter()
            .filter(is_available_in_scan)
            .take(limit)
            .collect())
    }
}

/// Fetches up to `limit` available rooms for a hotel.
///
/// # Errors
///
/// Returns the store error when the fallback scan itself fails.
pub async fn fetch_available_rooms(
    strategy: &dyn RoomQueryStrategy,
    hotel_id: &str,
    limit: usize,
) -> ServiceResult<RoomFetch> {
    let (docs, path) = match strategy.try_fast_path(hotel_id, limit).await {
        Ok(docs) => (docs, RoomFetchPath::FastPath),
        Err(reason) => {
            let docs = strategy.scan_fallback(hotel_id, limit).await?;
            (docs, RoomFetchPath::Fallback(reason))
        }
    };

    let mut rooms = extract_rooms(hotel_id, &docs);
    rooms.truncate(limit);
    // Rooms admitted by the status heuristic carry no flag of their own.
    for room in &mut rooms {
        room.available = true;
    }

    debug!(hotel_id = %hotel_id, path = ?path, count = rooms.len(), "Fetched available rooms");

    Ok(RoomFetch { rooms, path })
}
