//! Data access for songs.
//!
//! Handlers only see `SongRepository`; the PostgreSQL implementation lives in
//! [`crate::db`] and an in-process one in [`memory`].

pub mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::song::{Song, SongCreate, SongUpdate};

pub use memory::MemorySongs;

pub type StoreResult<T> = Result<T, StoreError>;

/// Song persistence operations.
///
/// Every listing is ordered by ascending `id` so that `skip`/`limit`
/// windows are stable between calls.
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Insert a new song and return it with its assigned id.
    async fn create(&self, song: &SongCreate) -> StoreResult<Song>;

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Song>>;

    async fn list(&self, skip: i64, limit: i64) -> StoreResult<Vec<Song>>;

    /// Number of songs, ignoring any filter.
    async fn count(&self) -> StoreResult<i64>;

    /// Songs whose name contains `needle` as a literal, case-sensitive substring.
    async fn search_by_name(&self, needle: &str, skip: i64, limit: i64) -> StoreResult<Vec<Song>>;

    /// Number of songs `search_by_name` would match without pagination.
    async fn count_by_name(&self, needle: &str) -> StoreResult<i64>;

    /// Apply the fields present in `changes`.
    ///
    /// # Returns
    /// - `Ok(Some(song))` with the stored state after the update
    /// - `Ok(None)` if no song has that id
    async fn update(&self, id: i64, changes: &SongUpdate) -> StoreResult<Option<Song>>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    /// Add exactly one play without a separate read.
    async fn increment_plays(&self, id: i64) -> StoreResult<Option<Song>>;
}
