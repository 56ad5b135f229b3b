// src/infrastructure/graphql.rs
//! Notes API over GraphQL/HTTP
//!
//! Speaks the documents generated for a hosted `Note` model: a paginated
//! `listNotes` query and the `createNote`/`deleteNote` mutations. Requests are
//! plain `{"query", "variables"}` POSTs; a response carrying `errors` is
//! treated as a failure even when the HTTP status is 200.

use crate::application::NotesApi;
use crate::domain::{DomainError, NewNote, Note, NoteId};
use crate::infrastructure::config::{ApiConfig, AuthMode};
use crate::infrastructure::session::SessionStore;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument, trace};

pub const LIST_NOTES: &str = r#"query ListNotes($filter: ModelNoteFilterInput, $limit: Int, $nextToken: String) {
  listNotes(filter: $filter, limit: $limit, nextToken: $nextToken) {
    items {
      id
      name
      description
      image
    }
    nextToken
  }
}"#;

pub const CREATE_NOTE: &str = r#"mutation CreateNote($input: CreateNoteInput!) {
  createNote(input: $input) {
    id
    name
    description
    image
  }
}"#;

pub const DELETE_NOTE: &str = r#"mutation DeleteNote($input: DeleteNoteInput!) {
  deleteNote(input: $input) {
    id
  }
}"#;

const API_KEY_HEADER: &str = "x-api-key";

/// How requests authenticate against the API
#[derive(Clone, PartialEq)]
pub enum Credentials {
    /// Signed-in session token, sent as-is in `Authorization`
    Session(String),
    ApiKey(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Session(_) => f.write_str("Credentials::Session(..)"),
            Credentials::ApiKey(_) => f.write_str("Credentials::ApiKey(..)"),
        }
    }
}

impl Credentials {
    /// Pick credentials for the configured auth mode; user-pool mode needs a session
    pub fn resolve(api: &ApiConfig, sessions: &SessionStore) -> Result<Self, DomainError> {
        match api.auth_mode {
            AuthMode::UserPool => Ok(Credentials::Session(sessions.require()?.token)),
            AuthMode::ApiKey if api.api_key.is_empty() => Err(DomainError::Config(
                "auth_mode = \"api_key\" requires api.api_key".to_string(),
            )),
            AuthMode::ApiKey => Ok(Credentials::ApiKey(api.api_key.clone())),
        }
    }
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct NoteRecord {
    id: String,
    name: String,
    description: Option<String>,
    image: Option<String>,
}

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        Note {
            id: NoteId(record.id),
            name: record.name,
            description: record.description.unwrap_or_default(),
            image_key: record.image,
            image_url: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteConnection {
    // Entries the caller may not read come back as null
    items: Vec<Option<NoteRecord>>,
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListNotesData {
    list_notes: NoteConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateNoteData {
    create_note: NoteRecord,
}

pub struct GraphQlNotesApi {
    client: reqwest::Client,
    endpoint: String,
    credentials: Credentials,
    page_size: Option<u32>,
}

impl GraphQlNotesApi {
    pub fn new(
        endpoint: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            credentials,
            page_size: None,
        })
    }

    pub fn from_config(api: &ApiConfig, credentials: Credentials) -> Result<Self, DomainError> {
        Self::new(api.endpoint.clone(), credentials, api.timeout())
    }

    /// Ask for at most `limit` items per `listNotes` page
    pub fn with_page_size(mut self, limit: u32) -> Self {
        self.page_size = Some(limit);
        self
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, DomainError> {
        let request = self
            .client
            .post(&self.endpoint)
            .json(&GraphQlRequest { query, variables });
        let request = match &self.credentials {
            Credentials::Session(token) => request.header(AUTHORIZATION, token),
            Credentials::ApiKey(key) => request.header(API_KEY_HEADER, key),
        };

        let response = request.send().await?;
        let status = response.status();
        trace!(%status, "GraphQL response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(DomainError::Unauthenticated);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Api(format!("HTTP {status}: {body}")));
        }

        let body: GraphQlResponse<T> = response.json().await?;
        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(DomainError::Api(messages.join("; ")));
        }
        body.data
            .ok_or_else(|| DomainError::Api("response carried no data".to_string()))
    }
}

#[async_trait]
impl NotesApi for GraphQlNotesApi {
    #[instrument(level = "debug", skip(self))]
    async fn list_notes(&self) -> Result<Vec<Note>, DomainError> {
        let mut notes = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let variables = json!({ "limit": self.page_size, "nextToken": next_token });
            let data: ListNotesData = self.execute(LIST_NOTES, variables).await?;
            pages += 1;
            notes.extend(data.list_notes.items.into_iter().flatten().map(Note::from));

            match data.list_notes.next_token {
                Some(token) if next_token.as_deref() == Some(token.as_str()) => {
                    return Err(DomainError::Api(format!(
                        "listNotes returned the same nextToken twice: {token}"
                    )));
                }
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        debug!(count = notes.len(), pages, "Listed notes");
        Ok(notes)
    }

    #[instrument(level = "debug", skip(self))]
    async fn create_note(&self, note: &NewNote) -> Result<Note, DomainError> {
        let data: CreateNoteData = self
            .execute(CREATE_NOTE, json!({ "input": note }))
            .await?;
        Ok(data.create_note.into())
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_note(&self, id: &NoteId) -> Result<(), DomainError> {
        let _: Value = self
            .execute(DELETE_NOTE, json!({ "input": { "id": id } }))
            .await?;
        Ok(())
    }
}
