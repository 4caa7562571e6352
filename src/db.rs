use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::debug;

use crate::config::Settings;
use crate::error::StoreError;
use crate::models::song::{Song, SongCreate, SongUpdate};
use crate::repository::{SongRepository, StoreResult};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS songs (
    id    BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
    name  VARCHAR(255) NOT NULL,
    path  VARCHAR(500) NOT NULL,
    plays BIGINT NOT NULL DEFAULT 0 CHECK (plays >= 0)
)";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(settings: &Settings) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `songs` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SongRepository for Database {
    async fn create(&self, song: &SongCreate) -> StoreResult<Song> {
        let row = sqlx::query_as::<_, Song>(
            "INSERT INTO songs (name, path, plays) VALUES ($1, $2, $3)
             RETURNING id, name, path, plays",
        )
        .bind(&song.name)
        .bind(&song.path)
        .bind(song.plays)
        .fetch_one(&self.pool)
        .await?;

        debug!("inserted song id={}", row.id);
        Ok(row)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Song>> {
        let row = sqlx::query_as::<_, Song>("SELECT id, name, path, plays FROM songs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, skip: i64, limit: i64) -> StoreResult<Vec<Song>> {
        let rows = sqlx::query_as::<_, Song>(
            "SELECT id, name, path, plays FROM songs ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count(&self) -> StoreResult<i64> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM songs")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn search_by_name(&self, needle: &str, skip: i64, limit: i64) -> StoreResult<Vec<Song>> {
        // strpos keeps `%` and `_` literal, unlike LIKE
        let rows = sqlx::query_as::<_, Song>(
            "SELECT id, name, path, plays FROM songs
             WHERE strpos(name, $1) > 0
             ORDER BY id LIMIT $2 OFFSET $3",
        )
        .bind(needle)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_by_name(&self, needle: &str) -> StoreResult<i64> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM songs WHERE strpos(name, $1) > 0")
            .bind(needle)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn update(&self, id: i64, changes: &SongUpdate) -> StoreResult<Option<Song>> {
        let row = sqlx::query_as::<_, Song>(
            "UPDATE songs SET
                 name  = COALESCE($2, name),
                 path  = COALESCE($3, path),
                 plays = COALESCE($4, plays)
             WHERE id = $1
             RETURNING id, name, path, plays",
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.path.as_deref())
        .bind(changes.plays)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_plays(&self, id: i64) -> StoreResult<Option<Song>> {
        let row = sqlx::query_as::<_, Song>(
            "UPDATE songs SET plays = plays + 1 WHERE id = $1 RETURNING id, name, path, plays",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            // 22003: numeric_value_out_of_range
            let overflow = matches!(
                &e,
                sqlx::Error::Database(db) if db.code().as_deref() == Some("22003")
            );
            if overflow {
                StoreError::PlayCountOverflow { id }
            } else {
                StoreError::Database(e)
            }
        })?;
        Ok(row)
    }
}
