// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use application::{BlobStore, NoteBoard, NotesApi};
use domain::{ImageUpload, NoteForm, NoteId};
use infrastructure::renderer::ContentRenderer;
use infrastructure::{Config, Credentials, GraphQlNotesApi, HttpBlobStore, Session, SessionStore};
use ports::{HtmlPresenter, TerminalPresenter};
use tracing::{debug, info};

use crate::cli::args::{Args, Command};
use crate::constants::MAX_IMAGE_BYTES;

/// Board backed by the hosted API and blob store
pub type RemoteBoard = NoteBoard<GraphQlNotesApi, HttpBlobStore>;

pub async fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting noteboard with arguments");

    let sessions = SessionStore::default_location()?;
    let mut stdout = std::io::stdout();

    match args.command {
        Command::Login { token, username } => {
            sessions.sign_in(&Session { token, username })?;
            writeln!(stdout, "Signed in")?;
        }
        Command::Logout => {
            sessions.sign_out()?;
            writeln!(stdout, "Signed out")?;
        }
        Command::Init { force } => {
            let path = match args.config {
                Some(path) => path,
                None => Config::default_path().context("Could not find config directory")?,
            };
            if path.exists() && !force {
                bail!("{} already exists, use --force to overwrite", path.display());
            }
            Config::create_default(&path)?;
            writeln!(stdout, "Wrote {}", path.display())?;
        }
        command => {
            let config = Config::resolve(args.config.as_deref())?;
            debug!(endpoint = %config.api.endpoint, storage = config.storage.is_some(), "Loaded configuration");

            let mut board = connect(&config, &sessions)?;
            let username = sessions.current()?.and_then(|s| s.username);
            execute(&mut board, command, username, &mut stdout).await?;
        }
    }

    Ok(())
}

/// Build a board for the configured API, with image support when storage is configured
pub fn connect(config: &Config, sessions: &SessionStore) -> Result<RemoteBoard> {
    let credentials = Credentials::resolve(&config.api, sessions)?;

    let blobs = match &config.storage {
        Some(storage) => {
            let store = HttpBlobStore::from_config(storage, &config.api)?;
            Some(match &credentials {
                Credentials::Session(token) => store.with_authorization(token.clone()),
                Credentials::ApiKey(_) => store,
            })
        }
        None => None,
    };
    let api = GraphQlNotesApi::from_config(&config.api, credentials)?;

    Ok(NoteBoard::new(api, blobs))
}

/// Mount the board (initial fetch), then carry out one board command
pub async fn execute<A, B, W>(
    board: &mut NoteBoard<A, B>,
    command: Command,
    username: Option<String>,
    out: &mut W,
) -> Result<()>
where
    A: NotesApi,
    B: BlobStore,
    W: Write,
{
    board.fetch_notes().await.context("Failed to load notes")?;

    match command {
        Command::List { json } => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(board.notes())?)?;
            } else if board.notes().is_empty() {
                writeln!(out, "No notes")?;
            } else {
                writeln!(out, "{}", TerminalPresenter::new().render(board.notes()))?;
            }
        }
        Command::View => {
            let presenter = match username {
                Some(name) => HtmlPresenter::with_username(name),
                None => HtmlPresenter::new(),
            };
            let html = presenter.render(board.notes());

            let mut renderer = ContentRenderer::new();
            let path = renderer.create_temp_file(&html)?;
            renderer.open_in_browser(&path).await?;
        }
        Command::Create {
            name,
            description,
            image,
        } => {
            let mut form = NoteForm::new(name, description);
            if let Some(path) = image {
                form = form.with_image(load_image(&path).await?);
            }
            let created = board
                .create_note(&mut form)
                .await
                .context("Failed to create note")?;
            info!(id = %created.id, "Note created");
            writeln!(out, "Created {}\t{}", created.id, created.name)?;
        }
        Command::Delete { note_id } => {
            let id = NoteId::new(note_id);
            board
                .delete_note(&id)
                .await
                .with_context(|| format!("Failed to delete note {id}"))?;
            writeln!(out, "Deleted {id}")?;
        }
        Command::Login { .. } | Command::Logout | Command::Init { .. } => {
            bail!("not a board command")
        }
    }

    Ok(())
}

/// Read an image file selected for upload
pub async fn load_image(path: &Path) -> Result<ImageUpload> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Cannot read image {}", path.display()))?;
    if !metadata.is_file() {
        bail!("{} is not a file", path.display());
    }
    if metadata.len() > MAX_IMAGE_BYTES {
        bail!(
            "{} is {} bytes, larger than the {} byte limit",
            path.display(),
            metadata.len(),
            MAX_IMAGE_BYTES
        );
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("Image path has no usable file name")?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;

    Ok(ImageUpload { file_name, bytes })
}

#[cfg(test)]
/// must be public to be used from integration tests
mod tests {
    use crate::util::testing;
    #[ctor::ctor]
    fn init() {
        testing::init_test_setup().expect("Failed to initialize test setup");
    }
}
