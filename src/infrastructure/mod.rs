// src/infrastructure/mod.rs
pub mod blob;
pub mod config;
pub mod graphql;
pub mod renderer;
pub mod session;

pub use blob::HttpBlobStore;
pub use config::Config;
pub use graphql::{Credentials, GraphQlNotesApi};
pub use session::{Session, SessionStore};
