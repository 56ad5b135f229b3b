// src/domain/error.rs
use crate::domain::NoteId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid note: {0}")]
    Validation(String),
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),
    #[error("Not signed in, run `noteboard login` first")]
    Unauthenticated,
    #[error("Image attachments require a [storage] section in the configuration")]
    ImagesUnsupported,
    #[error("API error: {0}")]
    Api(String),
    #[error("Blob store error: {0}")]
    BlobStore(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Session error: {0}")]
    Session(String),
}

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        DomainError::Transport(e.to_string())
    }
}
