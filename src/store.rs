//! Core store type and builder.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::persist::{self, WriteMode};
use crate::record::{Chirp, Record, User};
use crate::serializer::JsonSerializer;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Path the service uses when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = "database.json";

/// Single-file JSON database for chirps and users.
///
/// Nothing is cached between calls: every operation loads the file, so the
/// file is the only source of truth. Creates hold an exclusive lock across
/// load, id assignment and save; reads share a lock across their load. Wrap
/// the store in an `Arc` to share it between request threads.
///
/// The lock is in-process only. Two processes writing the same file will
/// clobber each other.
pub struct Store {
    path: PathBuf,
    serializer: JsonSerializer,
    write_mode: WriteMode,
    lock: RwLock<()>,
}

impl Store {
    /// Open (or create) the database at `path` with compact JSON and atomic
    /// saves.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder(path).build()
    }

    /// Start configuring a new store. Call [`.build()`](StoreBuilder::build)
    /// when ready.
    pub fn builder(path: impl AsRef<Path>) -> StoreBuilder {
        StoreBuilder::new(path)
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// How saves replace the file.
    #[must_use]
    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    // ---- writes ----

    /// Parse `raw` as a new `R`, assign it the next id in its collection, and
    /// persist the whole document. Returns the stored record.
    ///
    /// Malformed or invalid input fails before the file is read.
    pub fn create<R: Record>(&self, raw: &[u8]) -> Result<R> {
        let input = R::parse_input(raw)?;

        let _guard = self.lock.write();
        let mut doc = self.load::<R>()?;
        let table = R::table_mut(&mut doc);
        debug!(collection = %R::COLLECTION, count = table.len(), "loaded records");

        let Some(id) = Document::next_id(table) else {
            warn!(collection = %R::COLLECTION, "id space exhausted");
            return Err(Error::Corrupt(format!("{} id space exhausted", R::COLLECTION)));
        };
        let record = R::assemble(id, input);
        table.insert(id, record.clone());

        if let Err(err) = self.save(&doc) {
            warn!(collection = %R::COLLECTION, id, error = %err, "save failed");
            return Err(err);
        }
        info!(collection = %R::COLLECTION, id, "record created");
        Ok(record)
    }

    /// Create a chirp from a raw request body like `{"body":"hello"}`.
    pub fn create_chirp(&self, raw: &[u8]) -> Result<Chirp> {
        self.create(raw)
    }

    /// Create a user from a raw request body like `{"email":"a@b.com"}`.
    pub fn create_user(&self, raw: &[u8]) -> Result<User> {
        self.create(raw)
    }

    // ---- reads ----

    /// Every record in `R`'s collection, ascending by id. Empty collections
    /// give an empty vec.
    pub fn list<R: Record>(&self) -> Result<Vec<R>> {
        let doc = {
            let _guard = self.lock.read();
            self.load::<R>()?
        };
        let table = R::table(&doc);
        debug!(collection = %R::COLLECTION, count = table.len(), "loaded records");

        let mut records: Vec<R> = table.values().cloned().collect();
        records.sort_by_key(|r| r.id());
        Ok(records)
    }

    /// The record in `R`'s collection with this id.
    pub fn get<R: Record>(&self, id: u64) -> Result<R> {
        self.list::<R>()?
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or(Error::NotFound {
                collection: R::COLLECTION,
                id,
            })
    }

    /// All chirps, ascending by id.
    pub fn chirps(&self) -> Result<Vec<Chirp>> {
        self.list()
    }

    /// The chirp with this id.
    pub fn chirp(&self, id: u64) -> Result<Chirp> {
        self.get(id)
    }

    /// All users, ascending by id.
    pub fn users(&self) -> Result<Vec<User>> {
        self.list()
    }

    /// The user with this id.
    pub fn user(&self, id: u64) -> Result<User> {
        self.get(id)
    }

    // ---- internal ----

    // Callers hold the lock. `R` only names the collection in the log line.
    fn load<R: Record>(&self) -> Result<Document> {
        persist::load(&self.path, &self.serializer).map_err(|err| {
            warn!(collection = %R::COLLECTION, error = %err, "load failed");
            err
        })
    }

    fn save(&self, doc: &Document) -> Result<()> {
        let bytes = self.serializer.serialize(doc)?;
        persist::write(&self.path, &bytes, self.write_mode)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("write_mode", &self.write_mode)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`Store`].
///
/// ```rust,no_run
/// use chirpy_db::{Store, WriteMode};
///
/// let db = Store::builder("database.json")
///     .pretty(true)
///     .write_mode(WriteMode::InPlace)
///     .build()
///     .unwrap();
/// ```
pub struct StoreBuilder {
    path: PathBuf,
    write_mode: WriteMode,
    pretty: bool,
}

impl StoreBuilder {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_mode: WriteMode::default(),
            pretty: false,
        }
    }

    /// Set how saves replace the file (default: [`WriteMode::Atomic`]).
    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    /// Write human-readable JSON with indentation (default: compact).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Make sure the file exists and return the store. Existing content is
    /// not read here; a corrupt file shows up on the first operation.
    pub fn build(self) -> Result<Store> {
        persist::ensure_file(&self.path)?;
        debug!(path = %self.path.display(), "database opened");

        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };

        Ok(Store {
            path: self.path,
            serializer,
            write_mode: self.write_mode,
            lock: RwLock::new(()),
        })
    }
}

impl std::fmt::Debug for StoreBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreBuilder")
            .field("path", &self.path)
            .field("write_mode", &self.write_mode)
            .field("pretty", &self.pretty)
            .finish()
    }
}
