//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide note header persistence APIs for the journal list.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - List order is always `created_at DESC, uuid ASC`.
//! - Title filtering is a case-sensitive substring containment test.
//! - `delete_note` is a hard delete; owned blocks go with it via FK cascade.

use crate::model::note::{NoteId, NoteRecord};
use crate::repo::{ensure_table_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    created_at,
    is_bookmarked
FROM notes";

/// Query options for listing notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListQuery {
    /// Case-sensitive substring filter applied to titles. `None` or empty
    /// returns the full set.
    pub title_filter: Option<String>,
}

impl NoteListQuery {
    /// Builds a query from raw search-bar text; blank input means no filter.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        let filter = filter.into();
        Self {
            title_filter: if filter.is_empty() { None } else { Some(filter) },
        }
    }
}

/// Repository interface for note header CRUD.
pub trait NoteRepository {
    /// Persists one note record and returns its stable id.
    fn create_note(&self, note: &NoteRecord) -> RepoResult<NoteId>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<NoteRecord>>;
    /// Lists notes newest-first with optional title substring filter.
    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<NoteRecord>>;
    /// Replaces the title of an existing note.
    fn rename_note(&self, id: NoteId, title: &str) -> RepoResult<()>;
    /// Sets the bookmark flag of an existing note.
    fn set_bookmark(&self, id: NoteId, bookmarked: bool) -> RepoResult<()>;
    /// Hard-deletes a note and (via cascade) its content blocks.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "notes",
            &["uuid", "title", "created_at", "is_bookmarked"],
        )?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &NoteRecord) -> RepoResult<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (uuid, title, created_at, is_bookmarked)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                note.id.to_string(),
                note.title.as_str(),
                note.created_at,
                bool_to_int(note.is_bookmarked),
            ],
        )?;

        Ok(note.id)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<NoteRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<NoteRecord>> {
        let mut sql = String::from(NOTE_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        // instr() keeps the match case-sensitive, unlike LIKE.
        if let Some(filter) = query.title_filter.as_deref().filter(|f| !f.is_empty()) {
            sql.push_str(" WHERE instr(title, ?) > 0");
            bind_values.push(Value::Text(filter.to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, uuid ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn rename_note(&self, id: NoteId, title: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes SET title = ?2 WHERE uuid = ?1;",
            params![id.to_string(), title],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn set_bookmark(&self, id: NoteId, bookmarked: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes SET is_bookmarked = ?2 WHERE uuid = ?1;",
            params![id.to_string(), bool_to_int(bookmarked)],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<NoteRecord> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    let is_bookmarked = match row.get::<_, i64>("is_bookmarked")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_bookmarked value `{other}` in notes.is_bookmarked"
            )));
        }
    };

    Ok(NoteRecord {
        id,
        title: row.get("title")?,
        created_at: row.get("created_at")?,
        is_bookmarked,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
