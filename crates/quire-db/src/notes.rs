//! Note store implementation.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use quire_core::{CreateNoteRequest, Error, Note, NoteStore, Result, UpdateNoteRequest};

/// PostgreSQL implementation of [`NoteStore`].
///
/// Every query folds the owner identity into the filter predicate. An id
/// belonging to another owner is indistinguishable from an unknown id:
/// information hiding, not an error.
pub struct PgNoteStore {
    pool: Pool<Postgres>,
}

impl PgNoteStore {
    /// Create a new PgNoteStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map a database row to a Note.
fn map_row_to_note(row: PgRow) -> Note {
    Note {
        uuid: row.get("uuid"),
        title: row.get("title"),
        notes: row.get("notes"),
        email: row.get("email"),
        summary: row.get("summary"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn list(&self, owner: &str) -> Result<Vec<Note>> {
        let rows = sqlx::query(
            "SELECT uuid, title, notes, email, summary, created_at, updated_at
             FROM library
             WHERE email = $1
             ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_note).collect())
    }

    async fn fetch(&self, owner: &str, id: Uuid) -> Result<Option<Note>> {
        let row = sqlx::query(
            "SELECT uuid, title, notes, email, summary, created_at, updated_at
             FROM library
             WHERE uuid = $1 AND email = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(map_row_to_note))
    }

    async fn insert(&self, owner: &str, req: CreateNoteRequest) -> Result<Note> {
        let row = sqlx::query(
            "INSERT INTO library (notes, title, email)
             VALUES ($1, $2, $3)
             RETURNING uuid, title, notes, email, summary, created_at, updated_at",
        )
        .bind(&req.notes)
        .bind(&req.title)
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(map_row_to_note(row))
    }

    async fn update(&self, owner: &str, id: Uuid, req: UpdateNoteRequest) -> Result<Option<Note>> {
        // Title and summary keep their stored values when the request omits
        // them. The owner column is never written: identity comes from the
        // session, and the filter predicate re-asserts ownership.
        let row = sqlx::query(
            "UPDATE library
             SET notes = $1,
                 title = COALESCE($2, title),
                 summary = COALESCE($3, summary),
                 updated_at = now()
             WHERE uuid = $4 AND email = $5
             RETURNING uuid, title, notes, email, summary, created_at, updated_at",
        )
        .bind(&req.notes)
        .bind(&req.title)
        .bind(&req.summary)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(map_row_to_note))
    }

    async fn delete(&self, owner: &str, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM library WHERE uuid = $1 AND email = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }
}
