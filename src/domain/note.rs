// src/domain/note.rs
use crate::domain::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by the remote API when a note is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A note as held on the board.
///
/// `image_key` is the reference the API stores for an attachment and is never
/// rewritten. `image_url` is the fetchable address resolved from the blob store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub name: String,
    pub description: String,
    pub image_key: Option<String>,
    pub image_url: Option<String>,
}

impl Note {
    pub fn has_image(&self) -> bool {
        self.image_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Creation payload for a note the API has not seen yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewNote {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewNote {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        image: Option<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let description = description.into();

        if name.trim().is_empty() {
            return Err(DomainError::Validation("name must not be empty".to_string()));
        }
        if description.trim().is_empty() {
            return Err(DomainError::Validation(
                "description must not be empty".to_string(),
            ));
        }

        Ok(Self {
            name,
            description,
            image,
        })
    }
}

/// A file selected for upload alongside a new note.
#[derive(Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Input fields of the creation form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteForm {
    pub name: String,
    pub description: String,
    pub image: Option<ImageUpload>,
}

impl NoteForm {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    /// Build the creation payload; the image reference is the selected file's name
    pub fn to_new_note(&self) -> Result<NewNote, DomainError> {
        NewNote::new(
            self.name.clone(),
            self.description.clone(),
            self.image.as_ref().map(|i| i.file_name.clone()),
        )
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.description.is_empty() && self.image.is_none()
    }
}
