// Song routes
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    Json,
    routing::{get, patch},
};
use axum_extra::extract::WithRejection;

use crate::controllers::SongController;
use crate::error::AppError;
use crate::extract::{SongId, ValidJson, ValidQuery};
use crate::models::song::{
    ListSongsQuery, MessageResponse, Song, SongCreate, SongListResponse, SongUpdate,
};
use crate::state::AppState;

pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/songs", get(list_songs_route).post(create_song_route))
        .route(
            "/songs/{id}",
            get(get_song_route)
                .put(update_song_route)
                .patch(update_song_route)
                .delete(delete_song_route),
        )
        .route("/songs/{id}/play", patch(play_song_route))
}

pub async fn create_song_route(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SongCreate>,
) -> Result<(StatusCode, Json<Song>), AppError> {
    SongController::create(state.songs(), payload).await
}

pub async fn get_song_route(
    State(state): State<AppState>,
    WithRejection(Path(id), _): SongId,
) -> Result<Json<Song>, AppError> {
    SongController::get(state.songs(), id).await
}

pub async fn list_songs_route(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ListSongsQuery>,
) -> Result<Json<SongListResponse>, AppError> {
    SongController::list(state.songs(), query).await
}

pub async fn update_song_route(
    State(state): State<AppState>,
    WithRejection(Path(id), _): SongId,
    ValidJson(changes): ValidJson<SongUpdate>,
) -> Result<Json<Song>, AppError> {
    SongController::update(state.songs(), id, changes).await
}

pub async fn delete_song_route(
    State(state): State<AppState>,
    WithRejection(Path(id), _): SongId,
) -> Result<Json<MessageResponse>, AppError> {
    SongController::delete(state.songs(), id).await
}

pub async fn play_song_route(
    State(state): State<AppState>,
    WithRejection(Path(id), _): SongId,
) -> Result<Json<Song>, AppError> {
    SongController::play(state.songs(), id).await
}
