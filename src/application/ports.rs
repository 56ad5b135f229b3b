// src/application/ports.rs
use crate::domain::{DomainError, NewNote, Note, NoteId};
use async_trait::async_trait;

/// Remote notes API: one listing query and two mutations.
#[async_trait]
pub trait NotesApi: Send + Sync {
    /// Fetch every note, in the order the API returns them
    async fn list_notes(&self) -> Result<Vec<Note>, DomainError>;

    /// Create a note and return the stored record
    async fn create_note(&self, note: &NewNote) -> Result<Note, DomainError>;

    async fn delete_note(&self, id: &NoteId) -> Result<(), DomainError>;
}

/// Remote blob store addressed by string keys.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), DomainError>;

    /// Resolve a key to an address the image can be fetched from
    async fn url(&self, key: &str) -> Result<String, DomainError>;

    /// Remove a blob; removing a missing key succeeds
    async fn remove(&self, key: &str) -> Result<(), DomainError>;
}
