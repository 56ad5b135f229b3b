// src/application/mod.rs
pub mod note_board;
pub mod ports;

pub use note_board::NoteBoard;
pub use ports::{BlobStore, NotesApi};
