// src/application/note_board.rs
use crate::application::{BlobStore, NotesApi};
use crate::domain::{DomainError, Note, NoteForm, NoteId};
use futures::future::try_join_all;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Local, ordered mirror of the remote note list.
///
/// The held list is replaced wholesale by every successful fetch and is
/// published on a watch channel after each change, so a view always renders
/// exactly what the board holds. Without a blob store the board is text-only:
/// no image resolution, no uploads, no blob cleanup on delete.
pub struct NoteBoard<A: NotesApi, B: BlobStore> {
    api: A,
    blobs: Option<B>,
    notes: Vec<Note>,
    published: watch::Sender<Vec<Note>>,
}

impl<A: NotesApi, B: BlobStore> NoteBoard<A, B> {
    pub fn new(api: A, blobs: Option<B>) -> Self {
        let (published, _) = watch::channel(Vec::new());
        Self {
            api,
            blobs,
            notes: Vec::new(),
            published,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn find(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn supports_images(&self) -> bool {
        self.blobs.is_some()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn blobs(&self) -> Option<&B> {
        self.blobs.as_ref()
    }

    /// Receive the held list after every change
    pub fn subscribe(&self) -> watch::Receiver<Vec<Note>> {
        self.published.subscribe()
    }

    fn publish(&self) {
        self.published.send_replace(self.notes.clone());
    }

    fn replace(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.publish();
    }

    /// Reload the list from the API, resolving image addresses when a blob
    /// store is configured. On error the held list is left as it was.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_notes(&mut self) -> Result<&[Note], DomainError> {
        let fetched = self.api.list_notes().await?;
        debug!(count = fetched.len(), "Fetched notes");

        let notes = match &self.blobs {
            Some(blobs) => resolve_images(blobs, fetched).await?,
            None => fetched,
        };

        self.replace(notes);
        Ok(&self.notes)
    }

    /// Submit the form: upload the image (if any) under the note's name, create
    /// the note, refresh the list, then clear the form.
    ///
    /// A failing step skips every later one, so the form keeps its input.
    #[instrument(level = "debug", skip_all, fields(name = %form.name))]
    pub async fn create_note(&mut self, form: &mut NoteForm) -> Result<Note, DomainError> {
        let payload = form.to_new_note()?;

        if let Some(image) = &form.image {
            let blobs = self.blobs.as_ref().ok_or(DomainError::ImagesUnsupported)?;
            blobs.put(&payload.name, &image.bytes).await?;
            debug!(key = %payload.name, file = %image.file_name, "Uploaded image");
        }

        let created = self.api.create_note(&payload).await?;
        info!(id = %created.id, name = %created.name, "Created note");

        self.fetch_notes().await?;
        form.reset();

        Ok(created)
    }

    /// Remove a note locally, then delete its blob and the note remotely.
    ///
    /// The published list drops the note before any remote call is issued. If a
    /// remote call fails, the note is put back where it was and the error returned.
    #[instrument(level = "debug", skip(self))]
    pub async fn delete_note(&mut self, id: &NoteId) -> Result<(), DomainError> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.notes.len());
        for (index, note) in std::mem::take(&mut self.notes).into_iter().enumerate() {
            if &note.id == id {
                removed.push((index, note));
            } else {
                kept.push(note);
            }
        }

        let Some((_, first)) = removed.first() else {
            self.notes = kept;
            return Err(DomainError::NoteNotFound(id.clone()));
        };
        let name = first.name.clone();

        self.replace(kept);
        debug!(%id, "Removed note from board");

        if let Err(e) = self.delete_remote(id, &name).await {
            warn!(%id, error = %e, "Remote delete failed, restoring note");
            self.restore(removed);
            return Err(e);
        }

        info!(%id, %name, "Deleted note");
        Ok(())
    }

    async fn delete_remote(&self, id: &NoteId, name: &str) -> Result<(), DomainError> {
        if let Some(blobs) = &self.blobs {
            blobs.remove(name).await?;
        }
        self.api.delete_note(id).await
    }

    fn restore(&mut self, removed: Vec<(usize, Note)>) {
        // Ascending original indices put every entry back in its old slot
        for (index, note) in removed {
            let at = index.min(self.notes.len());
            self.notes.insert(at, note);
        }
        self.publish();
    }
}

/// Resolve every note's image address concurrently, keyed by note name.
/// The first failure fails the whole batch.
async fn resolve_images<B: BlobStore>(blobs: &B, notes: Vec<Note>) -> Result<Vec<Note>, DomainError> {
    try_join_all(notes.into_iter().map(|mut note| async move {
        if note.has_image() {
            note.image_url = Some(blobs.url(&note.name).await?);
        }
        Ok::<_, DomainError>(note)
    }))
    .await
}
