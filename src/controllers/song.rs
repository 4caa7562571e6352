use axum::{Json, http::StatusCode};
use tracing::{debug, error, info};

use crate::error::{AppError, StoreError};
use crate::models::song::{
    ListSongsQuery, MessageResponse, Song, SongCreate, SongListResponse, SongUpdate,
};
use crate::repository::SongRepository;

pub struct SongController;

impl SongController {
    /// Storage failures here surface as 400 with the failure text.
    pub async fn create(
        songs: &dyn SongRepository,
        payload: SongCreate,
    ) -> Result<(StatusCode, Json<Song>), AppError> {
        match songs.create(&payload).await {
            Ok(song) => {
                info!("Created song {} ({})", song.id, song.name);
                Ok((StatusCode::CREATED, Json(song)))
            }
            Err(e) => {
                error!("Failed to create song: {}", e);
                Err(AppError::BadRequest(format!("Error al crear la canción: {}", e)))
            }
        }
    }

    pub async fn get(songs: &dyn SongRepository, id: i64) -> Result<Json<Song>, AppError> {
        songs.get_by_id(id).await?.map(Json).ok_or(AppError::NotFound)
    }

    /// `total` counts the rows matching the active search, not the whole table.
    pub async fn list(
        songs: &dyn SongRepository,
        query: ListSongsQuery,
    ) -> Result<Json<SongListResponse>, AppError> {
        let skip = query.skip();
        let limit = query.limit();

        let result = async {
            match query.search_term() {
                Some(term) => {
                    debug!("Searching songs for {:?} skip={} limit={}", term, skip, limit);
                    let rows = songs.search_by_name(term, skip, limit).await?;
                    Ok::<_, StoreError>((rows, songs.count_by_name(term).await?))
                }
                None => {
                    debug!("Listing songs skip={} limit={}", skip, limit);
                    let rows = songs.list(skip, limit).await?;
                    Ok((rows, songs.count().await?))
                }
            }
        }
        .await;

        match result {
            Ok((rows, total)) => Ok(Json(SongListResponse {
                songs: rows,
                total,
                page: query.page,
                size: query.size,
            })),
            Err(e) => {
                error!("Failed to fetch songs: {}", e);
                Err(AppError::BadRequest(format!("Error al obtener las canciones: {}", e)))
            }
        }
    }

    /// Shared by PUT and PATCH.
    pub async fn update(
        songs: &dyn SongRepository,
        id: i64,
        changes: SongUpdate,
    ) -> Result<Json<Song>, AppError> {
        if changes.is_empty() {
            debug!("Empty update for song {}", id);
        }
        songs
            .update(id, &changes)
            .await?
            .map(Json)
            .ok_or(AppError::NotFound)
    }

    pub async fn delete(
        songs: &dyn SongRepository,
        id: i64,
    ) -> Result<Json<MessageResponse>, AppError> {
        if !songs.delete(id).await? {
            return Err(AppError::NotFound);
        }
        info!("Deleted song {}", id);
        Ok(Json(MessageResponse::new(format!(
            "Canción con ID {} eliminada exitosamente",
            id
        ))))
    }

    pub async fn play(songs: &dyn SongRepository, id: i64) -> Result<Json<Song>, AppError> {
        songs
            .increment_plays(id)
            .await?
            .map(Json)
            .ok_or(AppError::NotFound)
    }
}
