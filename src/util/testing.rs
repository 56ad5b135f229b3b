// src/util/testing.rs

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{watch, Barrier};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{BlobStore, NotesApi};
use crate::domain::{DomainError, NewNote, Note, NoteId};

pub const MOCK_BLOB_BASE: &str = "https://blobs.test/public";

/// One remote call observed by the mocks, in issue order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListNotes,
    CreateNote(NewNote),
    /// `visible` holds the board's published ids at the moment the call was issued,
    /// when an observer is attached
    DeleteNote {
        id: NoteId,
        visible: Option<Vec<NoteId>>,
    },
    PutBlob(String),
    BlobUrl(String),
    RemoveBlob(String),
}

/// Call log shared between mocks so tests can assert ordering across ports
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: Call) {
        lock(&self.0).push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.0).clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        lock(&self.0).iter().filter(|c| pred(c)).count()
    }

    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        lock(&self.0).iter().position(pred)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

pub fn note(id: &str, name: &str, description: &str) -> Note {
    Note {
        id: NoteId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        image_key: None,
        image_url: None,
    }
}

pub fn note_with_image(id: &str, name: &str, description: &str, image: &str) -> Note {
    Note {
        image_key: Some(image.to_string()),
        ..note(id, name, description)
    }
}

/// In-memory notes API
///
/// Created notes are appended to the stored list, so a list call after a
/// create sees them, the way the hosted API behaves.
///
/// # Examples
///
/// ```
/// use noteboard::util::testing::{note, MockNotesApi};
///
/// let api = MockNotesApi::builder()
///     .with_note(note("1", "Milk", "2%"))
///     .with_failing_delete()
///     .build();
/// assert_eq!(api.stored().len(), 1);
/// ```
pub struct MockNotesApi {
    notes: Mutex<Vec<Note>>,
    next_id: Mutex<u64>,
    fail_list: bool,
    fail_create: bool,
    fail_delete: bool,
    log: CallLog,
    observer: Mutex<Option<watch::Receiver<Vec<Note>>>>,
}

impl MockNotesApi {
    pub fn builder() -> MockNotesApiBuilder {
        MockNotesApiBuilder::new()
    }

    /// Snapshot the board's published list whenever a delete is issued
    pub fn observe(&self, rx: watch::Receiver<Vec<Note>>) {
        *lock(&self.observer) = Some(rx);
    }

    pub fn stored(&self) -> Vec<Note> {
        lock(&self.notes).clone()
    }

    /// Replace the remote list, simulating changes made by another client
    pub fn set_notes(&self, notes: Vec<Note>) {
        *lock(&self.notes) = notes;
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }
}

#[async_trait]
impl NotesApi for MockNotesApi {
    async fn list_notes(&self) -> Result<Vec<Note>, DomainError> {
        self.log.record(Call::ListNotes);
        if self.fail_list {
            return Err(DomainError::Api("listNotes failed".to_string()));
        }
        Ok(self.stored())
    }

    async fn create_note(&self, new_note: &NewNote) -> Result<Note, DomainError> {
        self.log.record(Call::CreateNote(new_note.clone()));
        if self.fail_create {
            return Err(DomainError::Api("createNote failed".to_string()));
        }

        let id = {
            let mut next = lock(&self.next_id);
            *next += 1;
            format!("generated-{}", *next)
        };
        let created = Note {
            id: NoteId(id),
            name: new_note.name.clone(),
            description: new_note.description.clone(),
            image_key: new_note.image.clone(),
            image_url: None,
        };
        lock(&self.notes).push(created.clone());
        Ok(created)
    }

    async fn delete_note(&self, id: &NoteId) -> Result<(), DomainError> {
        let visible = lock(&self.observer)
            .as_ref()
            .map(|rx| rx.borrow().iter().map(|n| n.id.clone()).collect());
        self.log.record(Call::DeleteNote {
            id: id.clone(),
            visible,
        });
        if self.fail_delete {
            return Err(DomainError::Api("deleteNote failed".to_string()));
        }
        lock(&self.notes).retain(|n| &n.id != id);
        Ok(())
    }
}

/// Builder for MockNotesApi
pub struct MockNotesApiBuilder {
    notes: Vec<Note>,
    fail_list: bool,
    fail_create: bool,
    fail_delete: bool,
    log: CallLog,
}

impl MockNotesApiBuilder {
    pub fn new() -> Self {
        Self {
            notes: vec![],
            fail_list: false,
            fail_create: false,
            fail_delete: false,
            log: CallLog::new(),
        }
    }

    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_notes(mut self, notes: impl IntoIterator<Item = Note>) -> Self {
        self.notes.extend(notes);
        self
    }

    pub fn with_failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn with_failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn with_failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    /// Record calls into a log shared with other mocks
    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    pub fn build(self) -> MockNotesApi {
        MockNotesApi {
            notes: Mutex::new(self.notes),
            next_id: Mutex::new(0),
            fail_list: self.fail_list,
            fail_create: self.fail_create,
            fail_delete: self.fail_delete,
            log: self.log,
            observer: Mutex::new(None),
        }
    }
}

impl Default for MockNotesApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory blob store; `url` builds an address whether or not the key was put
pub struct MockBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    fail_put: bool,
    fail_url: bool,
    fail_remove: bool,
    url_barrier: Option<Arc<Barrier>>,
    log: CallLog,
}

impl MockBlobStore {
    pub fn builder() -> MockBlobStoreBuilder {
        MockBlobStoreBuilder::new()
    }

    pub fn address_of(key: &str) -> String {
        format!("{MOCK_BLOB_BASE}/{key}")
    }

    pub fn contains(&self, key: &str) -> bool {
        lock(&self.blobs).contains_key(key)
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), DomainError> {
        if self.fail_put {
            return Err(DomainError::BlobStore(format!("put {key} failed")));
        }
        // Let other tasks run so ordering is not an accident of synchronous mocks
        tokio::task::yield_now().await;
        lock(&self.blobs).insert(key.to_string(), bytes.to_vec());
        self.log.record(Call::PutBlob(key.to_string()));
        Ok(())
    }

    async fn url(&self, key: &str) -> Result<String, DomainError> {
        self.log.record(Call::BlobUrl(key.to_string()));
        match &self.url_barrier {
            Some(barrier) => {
                barrier.wait().await;
            }
            None => tokio::task::yield_now().await,
        }
        if self.fail_url {
            return Err(DomainError::BlobStore(format!("resolve {key} failed")));
        }
        Ok(Self::address_of(key))
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        self.log.record(Call::RemoveBlob(key.to_string()));
        if self.fail_remove {
            return Err(DomainError::BlobStore(format!("remove {key} failed")));
        }
        lock(&self.blobs).remove(key);
        Ok(())
    }
}

/// Builder for MockBlobStore
pub struct MockBlobStoreBuilder {
    blobs: HashMap<String, Vec<u8>>,
    fail_put: bool,
    fail_url: bool,
    fail_remove: bool,
    url_barrier: Option<Arc<Barrier>>,
    log: CallLog,
}

impl MockBlobStoreBuilder {
    pub fn new() -> Self {
        Self {
            blobs: HashMap::new(),
            fail_put: false,
            fail_url: false,
            fail_remove: false,
            url_barrier: None,
            log: CallLog::new(),
        }
    }

    pub fn with_blob(mut self, key: &str, bytes: &[u8]) -> Self {
        self.blobs.insert(key.to_string(), bytes.to_vec());
        self
    }

    pub fn with_failing_put(mut self) -> Self {
        self.fail_put = true;
        self
    }

    pub fn with_failing_url(mut self) -> Self {
        self.fail_url = true;
        self
    }

    /// Every `url` call waits on this barrier before answering
    pub fn with_url_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.url_barrier = Some(barrier);
        self
    }

    pub fn with_failing_remove(mut self) -> Self {
        self.fail_remove = true;
        self
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    pub fn build(self) -> MockBlobStore {
        MockBlobStore {
            blobs: Mutex::new(self.blobs),
            fail_put: self.fail_put,
            fail_url: self.fail_url,
            fail_remove: self.fail_remove,
            url_barrier: self.url_barrier,
            log: self.log,
        }
    }
}

impl Default for MockBlobStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    let noisy_modules = ["hyper", "reqwest", "mio", "h2", "rustls"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
