use anyhow::Result;
use noteboard::application::NoteBoard;
use noteboard::cli::args::Command;
use noteboard::util::testing::{
    note, note_with_image, Call, CallLog, MockBlobStore, MockNotesApi,
};
use noteboard::{execute, load_image};
use std::path::PathBuf;
use tempfile::TempDir;

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("UTF-8 output")
}

#[tokio::test]
async fn given_remote_notes_when_listing_then_prints_one_line_per_note() -> Result<()> {
    // Arrange
    let api = MockNotesApi::builder()
        .with_notes([
            note_with_image("1", "Milk", "2%", "pic.png"),
            note("2", "Bread", "rye"),
        ])
        .build();
    let blobs = MockBlobStore::builder().with_blob("Milk", b"png").build();
    let mut board = NoteBoard::new(api, Some(blobs));
    let mut out = Vec::new();

    // Act
    execute(&mut board, Command::List { json: false }, None, &mut out).await?;

    // Assert
    assert_eq!(output(out), "1\tMilk\t2%\t[image]\n2\tBread\trye\n");
    Ok(())
}

#[tokio::test]
async fn given_remote_notes_when_listing_json_then_prints_resolved_urls() -> Result<()> {
    // Arrange
    let api = MockNotesApi::builder()
        .with_note(note_with_image("1", "Milk", "2%", "pic.png"))
        .build();
    let blobs = MockBlobStore::builder().with_blob("Milk", b"png").build();
    let mut board = NoteBoard::new(api, Some(blobs));
    let mut out = Vec::new();

    // Act
    execute(&mut board, Command::List { json: true }, None, &mut out).await?;

    // Assert
    let value: serde_json::Value = serde_json::from_str(&output(out))?;
    assert_eq!(value[0]["id"], "1");
    assert_eq!(value[0]["image_url"], MockBlobStore::address_of("Milk"));
    Ok(())
}

#[tokio::test]
async fn given_empty_remote_when_listing_then_says_so() -> Result<()> {
    let api = MockNotesApi::builder().build();
    let mut board: NoteBoard<MockNotesApi, MockBlobStore> = NoteBoard::new(api, None);
    let mut out = Vec::new();

    execute(&mut board, Command::List { json: false }, None, &mut out).await?;

    assert_eq!(output(out), "No notes\n");
    Ok(())
}

#[tokio::test]
async fn given_image_file_when_creating_then_uploads_creates_and_refreshes() -> Result<()> {
    // Arrange
    let dir = TempDir::new()?;
    let image = dir.path().join("pic.png");
    std::fs::write(&image, b"\x89PNG")?;

    let log = CallLog::new();
    let api = MockNotesApi::builder().with_log(log.clone()).build();
    let blobs = MockBlobStore::builder().with_log(log.clone()).build();
    let mut board = NoteBoard::new(api, Some(blobs));
    let mut out = Vec::new();

    // Act
    execute(
        &mut board,
        Command::Create {
            name: "Milk".to_string(),
            description: "2%".to_string(),
            image: Some(image),
        },
        None,
        &mut out,
    )
    .await?;

    // Assert
    let calls = log.calls();
    assert_eq!(calls[0], Call::ListNotes, "board mounts first");
    assert_eq!(calls[1], Call::PutBlob("Milk".to_string()));
    match &calls[2] {
        Call::CreateNote(payload) => assert_eq!(payload.image.as_deref(), Some("pic.png")),
        other => panic!("Expected CreateNote, got {other:?}"),
    }
    assert_eq!(calls[3], Call::ListNotes);
    assert_eq!(calls[4], Call::BlobUrl("Milk".to_string()));
    assert!(board.blobs().expect("image board").contains("Milk"));
    assert_eq!(board.notes().len(), 1);
    assert_eq!(output(out), "Created generated-1\tMilk\n");
    Ok(())
}

#[tokio::test]
async fn given_existing_note_when_deleting_then_removes_locally_and_remotely() -> Result<()> {
    // Arrange
    let log = CallLog::new();
    let api = MockNotesApi::builder()
        .with_log(log.clone())
        .with_notes([note("42", "Milk", "2%"), note("7", "Bread", "rye")])
        .build();
    let blobs = MockBlobStore::builder().with_log(log.clone()).build();
    let mut board = NoteBoard::new(api, Some(blobs));
    let mut out = Vec::new();

    // Act
    execute(
        &mut board,
        Command::Delete {
            note_id: "42".to_string(),
        },
        None,
        &mut out,
    )
    .await?;

    // Assert
    assert_eq!(log.count(|c| matches!(c, Call::DeleteNote { .. })), 1);
    assert_eq!(board.api().stored().len(), 1);
    assert_eq!(board.notes().len(), 1);
    assert_eq!(output(out), "Deleted 42\n");
    Ok(())
}

#[tokio::test]
async fn given_same_named_notes_when_one_is_deleted_then_board_stays_usable() -> Result<()> {
    // Arrange
    let api = MockNotesApi::builder()
        .with_notes([
            note_with_image("1", "Milk", "2%", "a.png"),
            note_with_image("2", "Milk", "skim", "b.png"),
        ])
        .build();
    let blobs = MockBlobStore::builder().with_blob("Milk", b"png").build();
    let mut board = NoteBoard::new(api, Some(blobs));
    let mut out = Vec::new();
    execute(
        &mut board,
        Command::Delete {
            note_id: "1".to_string(),
        },
        None,
        &mut out,
    )
    .await?;
    assert!(!board.blobs().expect("image board").contains("Milk"));

    // Act
    let mut listed = Vec::new();
    execute(&mut board, Command::List { json: false }, None, &mut listed).await?;
    let mut deleted = Vec::new();
    execute(
        &mut board,
        Command::Delete {
            note_id: "2".to_string(),
        },
        None,
        &mut deleted,
    )
    .await?;

    // Assert
    assert_eq!(output(listed), "2\tMilk\tskim\t[image]\n");
    assert_eq!(output(deleted), "Deleted 2\n");
    assert!(board.notes().is_empty());
    Ok(())
}

#[tokio::test]
async fn given_unknown_id_when_deleting_then_fails_without_remote_delete() {
    let log = CallLog::new();
    let api = MockNotesApi::builder().with_log(log.clone()).build();
    let mut board: NoteBoard<MockNotesApi, MockBlobStore> = NoteBoard::new(api, None);
    let mut out = Vec::new();

    let result = execute(
        &mut board,
        Command::Delete {
            note_id: "404".to_string(),
        },
        None,
        &mut out,
    )
    .await;

    let err = result.expect_err("Delete should fail");
    assert!(format!("{err:#}").contains("Note not found: 404"));
    assert_eq!(log.count(|c| matches!(c, Call::DeleteNote { .. })), 0);
}

#[tokio::test]
async fn given_failing_list_when_executing_then_reports_load_failure() {
    let api = MockNotesApi::builder().with_failing_list().build();
    let mut board: NoteBoard<MockNotesApi, MockBlobStore> = NoteBoard::new(api, None);
    let mut out = Vec::new();

    let result = execute(&mut board, Command::List { json: false }, None, &mut out).await;

    let err = result.expect_err("List should fail");
    assert!(err.to_string().contains("Failed to load notes"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn given_session_command_when_executing_on_board_then_rejects() {
    let api = MockNotesApi::builder().build();
    let mut board: NoteBoard<MockNotesApi, MockBlobStore> = NoteBoard::new(api, None);
    let mut out = Vec::new();

    let result = execute(&mut board, Command::Logout, None, &mut out).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn given_image_path_when_loading_then_uses_file_name_and_bytes() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("pic.png");
    std::fs::write(&path, b"abc")?;

    let image = load_image(&path).await?;

    assert_eq!(image.file_name, "pic.png");
    assert_eq!(image.bytes, b"abc");
    Ok(())
}

#[tokio::test]
async fn given_missing_or_directory_path_when_loading_image_then_fails() -> Result<()> {
    let dir = TempDir::new()?;

    assert!(load_image(&PathBuf::from("/nonexistent/pic.png")).await.is_err());
    assert!(load_image(dir.path()).await.is_err());
    Ok(())
}
