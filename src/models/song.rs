use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ValidationErrors;
use crate::extract::Validate;

pub const NAME_MAX_CHARS: usize = 255;
pub const PATH_MAX_CHARS: usize = 500;
pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A row of the `songs` table. Also the response shape of every single-song endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Song {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub plays: i64,
}

/// Body of `POST /songs`.
///
/// Clients send upper-case keys; the renames below are the only place the
/// wire names and the column names differ.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SongCreate {
    #[serde(rename = "SONG_NAME")]
    pub name: String,
    #[serde(rename = "SONG_PATH")]
    pub path: String,
    #[serde(rename = "PLAYS", default)]
    pub plays: i64,
}

/// Body of `PUT`/`PATCH /songs/{id}`. Absent and `null` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SongUpdate {
    #[serde(rename = "SONG_NAME")]
    pub name: Option<String>,
    #[serde(rename = "SONG_PATH")]
    pub path: Option<String>,
    #[serde(rename = "PLAYS")]
    pub plays: Option<i64>,
}

impl SongUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.path.is_none() && self.plays.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListSongsQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
    #[serde(default)]
    pub search: Option<String>,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for ListSongsQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            search: None,
        }
    }
}

impl ListSongsQuery {
    /// Rows to skip before the requested page.
    pub fn skip(&self) -> i64 {
        (self.page - 1).max(0).saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    /// The search term, if one was given. `?search=` counts as no search.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongListResponse {
    pub songs: Vec<Song>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn check_length(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    let len = value.chars().count();
    if len == 0 {
        errors.push(field, "must not be empty");
    } else if len > max {
        errors.push(field, format!("must be at most {max} characters, got {len}"));
    }
}

fn check_plays(errors: &mut ValidationErrors, plays: i64) {
    if plays < 0 {
        errors.push("PLAYS", "must be greater than or equal to 0");
    }
}

impl Validate for SongCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_length(&mut errors, "SONG_NAME", &self.name, NAME_MAX_CHARS);
        check_length(&mut errors, "SONG_PATH", &self.path, PATH_MAX_CHARS);
        check_plays(&mut errors, self.plays);
        errors.into_result()
    }
}

impl Validate for SongUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if let Some(name) = &self.name {
            check_length(&mut errors, "SONG_NAME", name, NAME_MAX_CHARS);
        }
        if let Some(path) = &self.path {
            check_length(&mut errors, "SONG_PATH", path, PATH_MAX_CHARS);
        }
        if let Some(plays) = self.plays {
            check_plays(&mut errors, plays);
        }
        errors.into_result()
    }
}

impl Validate for ListSongsQuery {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.page < 1 {
            errors.push("page", "must be greater than or equal to 1");
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.size) {
            errors.push("size", format!("must be between 1 and {MAX_PAGE_SIZE}"));
        }
        errors.into_result()
    }
}
