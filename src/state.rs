use std::sync::Arc;

use crate::repository::SongRepository;

/// Shared by every handler. Holds no mutable state of its own.
#[derive(Clone)]
pub struct AppState {
    songs: Arc<dyn SongRepository>,
}

impl AppState {
    pub fn new(songs: impl SongRepository + 'static) -> Self {
        Self {
            songs: Arc::new(songs),
        }
    }

    pub fn from_arc(songs: Arc<dyn SongRepository>) -> Self {
        Self { songs }
    }

    pub fn songs(&self) -> &dyn SongRepository {
        self.songs.as_ref()
    }
}
