use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::song::MessageResponse;

pub const NOT_FOUND_MESSAGE: &str = "Canción no encontrada";

/// Failure raised by a `SongRepository` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// `plays` is already at the column maximum.
    #[error("play count of song {id} cannot be incremented further")]
    PlayCountOverflow { id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("validation failed on {} field(s)", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Canción no encontrada")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[derive(Serialize)]
struct ValidationBody<'a> {
    message: &'static str,
    errors: &'a [FieldError],
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                debug!("Rejected request: {:?}", errors.fields());
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ValidationBody {
                        message: "Validation error",
                        errors: &errors.0,
                    }),
                )
                    .into_response()
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(MessageResponse::new(NOT_FOUND_MESSAGE)),
            )
                .into_response(),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(MessageResponse::new(message))).into_response()
            }
            AppError::Storage(StoreError::PlayCountOverflow { id }) => (
                StatusCode::CONFLICT,
                Json(MessageResponse::new(format!(
                    "La canción con ID {} alcanzó el máximo de reproducciones",
                    id
                ))),
            )
                .into_response(),
            AppError::Storage(e) => {
                error!("Storage failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MessageResponse::new("Internal storage error")),
                )
                    .into_response()
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationErrors::single("body", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(ValidationErrors::single("query", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(ValidationErrors::single("id", rejection.body_text()))
    }
}
