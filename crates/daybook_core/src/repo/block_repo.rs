//! Content-block repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the ordered block sequence owned by one note.
//! - Own whole-sequence replacement logic with atomic semantics.
//!
//! # Invariants
//! - `replace_blocks` rewrites the full sequence in a single transaction.
//! - Block rows are keyed by `(note_uuid, position)`; positions are dense
//!   starting at 0.
//! - Image lists are stored as a JSON array of URIs in `images`.

use crate::model::block::{ContentBlock, ImageRef};
use crate::model::note::NoteId;
use crate::repo::{ensure_table_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

/// Repository interface for per-note block sequences.
pub trait BlockRepository {
    /// Loads the block sequence for one note, ordered by position.
    ///
    /// A note with no persisted blocks yields an empty sequence; callers
    /// cannot distinguish that from a missing note here.
    fn load_blocks(&self, note_id: NoteId) -> RepoResult<Vec<ContentBlock>>;
    /// Replaces the full block sequence for one note in one transaction.
    fn replace_blocks(&mut self, note_id: NoteId, blocks: &[ContentBlock]) -> RepoResult<()>;
}

/// SQLite-backed block repository.
pub struct SqliteBlockRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteBlockRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "note_blocks",
            &["note_uuid", "position", "kind", "body", "images"],
        )?;
        Ok(Self { conn })
    }
}

impl BlockRepository for SqliteBlockRepository<'_> {
    fn load_blocks(&self, note_id: NoteId) -> RepoResult<Vec<ContentBlock>> {
        let mut stmt = self.conn.prepare(
            "SELECT kind, body, images
             FROM note_blocks
             WHERE note_uuid = ?1
             ORDER BY position ASC;",
        )?;

        let mut rows = stmt.query([note_id.to_string()])?;
        let mut blocks = Vec::new();
        while let Some(row) = rows.next()? {
            let kind: String = row.get("kind")?;
            let block = match kind.as_str() {
                "text" => {
                    let body: Option<String> = row.get("body")?;
                    ContentBlock::text(body.unwrap_or_default())
                }
                "images" => {
                    let encoded: Option<String> = row.get("images")?;
                    ContentBlock::images(decode_images(encoded.as_deref())?)
                }
                other => {
                    return Err(RepoError::InvalidData(format!(
                        "invalid block kind `{other}` in note_blocks.kind"
                    )));
                }
            };
            blocks.push(block);
        }

        Ok(blocks)
    }

    fn replace_blocks(&mut self, note_id: NoteId, blocks: &[ContentBlock]) -> RepoResult<()> {
        let note_uuid = note_id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !note_exists_in_tx(&tx, note_uuid.as_str())? {
            return Err(RepoError::NotFound(note_id));
        }

        tx.execute(
            "DELETE FROM note_blocks WHERE note_uuid = ?1;",
            [note_uuid.as_str()],
        )?;

        for (position, block) in blocks.iter().enumerate() {
            let (body, images) = match block {
                ContentBlock::Text { body } => (Some(body.as_str()), None),
                ContentBlock::Images { items } => (None, Some(encode_images(items)?)),
            };
            tx.execute(
                "INSERT INTO note_blocks (note_uuid, position, kind, body, images)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    note_uuid.as_str(),
                    position as i64,
                    block.kind_name(),
                    body,
                    images.as_deref(),
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

fn encode_images(items: &[ImageRef]) -> RepoResult<String> {
    let uris: Vec<&str> = items.iter().map(|image| image.uri.as_str()).collect();
    serde_json::to_string(&uris)
        .map_err(|err| RepoError::InvalidData(format!("unencodable image list: {err}")))
}

fn decode_images(encoded: Option<&str>) -> RepoResult<Vec<ImageRef>> {
    let Some(encoded) = encoded else {
        return Ok(Vec::new());
    };

    let uris: Vec<String> = serde_json::from_str(encoded).map_err(|err| {
        RepoError::InvalidData(format!("invalid image list in note_blocks.images: {err}"))
    })?;
    Ok(uris.into_iter().map(ImageRef::new).collect())
}

fn note_exists_in_tx(tx: &Transaction<'_>, note_uuid: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM notes
            WHERE uuid = ?1
        );",
        [note_uuid],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
