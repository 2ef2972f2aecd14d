use daybook_core::db::migrations::latest_version;
use daybook_core::db::open_db_in_memory;
use daybook_core::{
    BlockRepository, ContentBlock, EditorError, EditorSession, ImageRef, JournalService,
    PersistenceMode, RepoError, SqliteBlockRepository, SqliteNoteRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn new_note_id(conn: &Connection) -> Uuid {
    let repo = SqliteNoteRepository::try_new(conn).unwrap();
    let service = JournalService::new(repo);
    service.create_note().unwrap().id
}

#[test]
fn saved_blocks_survive_session_reload() {
    let mut conn = open_db_in_memory().unwrap();
    let note_id = new_note_id(&conn);

    {
        let mut repo = SqliteBlockRepository::try_new(&mut conn).unwrap();
        let mut session = EditorSession::open(&repo, note_id).unwrap();
        session.edit_text_block(0, "First entry").unwrap();
        session.append_image_block(ImageRef::new("sunset.jpg"));
        session.save(&mut repo).unwrap();
    }

    let repo = SqliteBlockRepository::try_new(&mut conn).unwrap();
    let reloaded = EditorSession::open(&repo, note_id).unwrap();

    assert_eq!(
        reloaded.blocks(),
        &[
            ContentBlock::text("First entry"),
            ContentBlock::single_image(ImageRef::new("sunset.jpg")),
        ]
    );
    // Expansion state is session-only: reloaded blocks start collapsed.
    assert!(!reloaded.is_expanded(0).unwrap());
    assert!(!reloaded.is_expanded(1).unwrap());
}

#[test]
fn image_order_round_trips_through_storage() {
    let mut conn = open_db_in_memory().unwrap();
    let note_id = new_note_id(&conn);

    {
        let mut repo = SqliteBlockRepository::try_new(&mut conn).unwrap();
        let mut session = EditorSession::open(&repo, note_id).unwrap();
        let image_index = session.append_image_block(ImageRef::new("one.jpg"));
        session
            .append_image(image_index, ImageRef::new("two.jpg"))
            .unwrap();
        session
            .append_image(image_index, ImageRef::new("three.jpg"))
            .unwrap();
        session.save(&mut repo).unwrap();
    }

    let repo = SqliteBlockRepository::try_new(&mut conn).unwrap();
    let blocks = repo.load_blocks(note_id).unwrap();
    assert_eq!(
        blocks[1],
        ContentBlock::images(vec![
            ImageRef::new("one.jpg"),
            ImageRef::new("two.jpg"),
            ImageRef::new("three.jpg"),
        ])
    );
}

#[test]
fn save_replaces_previous_sequence_fully() {
    let mut conn = open_db_in_memory().unwrap();
    let note_id = new_note_id(&conn);

    {
        let mut repo = SqliteBlockRepository::try_new(&mut conn).unwrap();
        let mut session = EditorSession::open(&repo, note_id).unwrap();
        session.edit_text_block(0, "draft one").unwrap();
        session.append_text_block();
        session.save(&mut repo).unwrap();
    }

    {
        let mut repo = SqliteBlockRepository::try_new(&mut conn).unwrap();
        let mut session = EditorSession::open(&repo, note_id).unwrap();
        session.edit_text_block(0, "rewritten").unwrap();
        session.save(&mut repo).unwrap();
    }

    let repo = SqliteBlockRepository::try_new(&mut conn).unwrap();
    let blocks = repo.load_blocks(note_id).unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0], ContentBlock::text("rewritten"));
    assert_eq!(blocks[1], ContentBlock::text(""));
}

#[test]
fn draft_only_session_never_writes_blocks() {
    let mut conn = open_db_in_memory().unwrap();
    let note_id = new_note_id(&conn);

    {
        let mut repo = SqliteBlockRepository::try_new(&mut conn).unwrap();
        let mut session =
            EditorSession::open_with_mode(&repo, note_id, PersistenceMode::DraftOnly).unwrap();
        assert_eq!(session.mode(), PersistenceMode::DraftOnly);
        session.edit_text_block(0, "ephemeral thoughts").unwrap();
        session.append_image_block(ImageRef::new("lost.jpg"));
        session.save(&mut repo).unwrap();
    }

    let repo = SqliteBlockRepository::try_new(&mut conn).unwrap();
    assert!(repo.load_blocks(note_id).unwrap().is_empty());
}

#[test]
fn replace_blocks_for_missing_note_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteBlockRepository::try_new(&mut conn).unwrap();
    let ghost = Uuid::new_v4();

    let err = repo
        .replace_blocks(ghost, &[ContentBlock::text("orphan")])
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == ghost));
    assert!(repo.load_blocks(ghost).unwrap().is_empty());
}

#[test]
fn save_surfaces_missing_note_as_recoverable_error() {
    let mut conn = open_db_in_memory().unwrap();
    let note_id = new_note_id(&conn);

    let mut session = {
        let repo = SqliteBlockRepository::try_new(&mut conn).unwrap();
        EditorSession::open(&repo, note_id).unwrap()
    };
    session.edit_text_block(0, "about to be orphaned").unwrap();

    {
        let note_repo = SqliteNoteRepository::try_new(&conn).unwrap();
        let service = JournalService::new(note_repo);
        service.delete_note(note_id).unwrap();
    }

    let mut repo = SqliteBlockRepository::try_new(&mut conn).unwrap();
    let err = session.save(&mut repo).unwrap_err();
    assert!(matches!(err, EditorError::Repo(RepoError::NotFound(id)) if id == note_id));
}

#[test]
fn deleting_note_cascades_to_its_blocks() {
    let mut conn = open_db_in_memory().unwrap();
    let note_id = new_note_id(&conn);

    {
        let mut repo = SqliteBlockRepository::try_new(&mut conn).unwrap();
        let mut session = EditorSession::open(&repo, note_id).unwrap();
        session.edit_text_block(0, "cascade target").unwrap();
        session.append_image_block(ImageRef::new("gone.jpg"));
        session.save(&mut repo).unwrap();
    }
    assert_eq!(block_row_count(&conn, note_id), 2);

    {
        let repo = SqliteNoteRepository::try_new(&conn).unwrap();
        let service = JournalService::new(repo);
        service.delete_note(note_id).unwrap();
    }

    assert_eq!(block_row_count(&conn, note_id), 0);
}

#[test]
fn block_repository_rejects_connection_without_blocks_table() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteBlockRepository::try_new(&mut conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("note_blocks"))
    ));
}

fn block_row_count(conn: &Connection, note_id: Uuid) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM note_blocks WHERE note_uuid = ?1;",
        [note_id.to_string()],
        |row| row.get(0),
    )
    .unwrap()
}
