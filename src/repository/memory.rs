use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SongRepository, StoreResult};
use crate::error::StoreError;
use crate::models::song::{Song, SongCreate, SongUpdate};

#[derive(Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, Song>,
}

/// In-process song store. Ids are never reused, even after deletes.
#[derive(Default)]
pub struct MemorySongs {
    inner: RwLock<Inner>,
}

impl MemorySongs {
    pub fn new() -> Self {
        Self::default()
    }
}

fn window<'a>(rows: impl Iterator<Item = &'a Song>, skip: i64, limit: i64) -> Vec<Song> {
    rows.skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl SongRepository for MemorySongs {
    async fn create(&self, song: &SongCreate) -> StoreResult<Song> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let row = Song {
            id: inner.last_id,
            name: song.name.clone(),
            path: song.path.clone(),
            plays: song.plays,
        };
        inner.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Song>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn list(&self, skip: i64, limit: i64) -> StoreResult<Vec<Song>> {
        let inner = self.inner.read().await;
        Ok(window(inner.rows.values(), skip, limit))
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.inner.read().await.rows.len() as i64)
    }

    async fn search_by_name(&self, needle: &str, skip: i64, limit: i64) -> StoreResult<Vec<Song>> {
        let inner = self.inner.read().await;
        let matches = inner.rows.values().filter(|s| s.name.contains(needle));
        Ok(window(matches, skip, limit))
    }

    async fn count_by_name(&self, needle: &str) -> StoreResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().filter(|s| s.name.contains(needle)).count() as i64)
    }

    async fn update(&self, id: i64, changes: &SongUpdate) -> StoreResult<Option<Song>> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            row.name = name.clone();
        }
        if let Some(path) = &changes.path {
            row.path = path.clone();
        }
        if let Some(plays) = changes.plays {
            row.plays = plays;
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }

    async fn increment_plays(&self, id: i64) -> StoreResult<Option<Song>> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        row.plays = row
            .plays
            .checked_add(1)
            .ok_or(StoreError::PlayCountOverflow { id })?;
        Ok(Some(row.clone()))
    }
}
