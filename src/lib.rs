//! Single-file JSON database behind the Chirpy API.
//!
//! Two collections, chirps and users, live in one JSON document on disk. Each
//! call loads the file, and creates write the whole document back before
//! returning.
//!
//! ```rust,no_run
//! use chirpy_db::Store;
//!
//! let db = Store::open("database.json").unwrap();
//! let chirp = db.create_chirp(br#"{"body":"hello"}"#).unwrap();
//! assert_eq!(db.chirp(chirp.id).unwrap().body, "hello");
//! ```
//!
//! **Single-process only.** The lock guarding the file lives in memory. If
//! multiple processes open the same file they will clobber each other.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod persist;
pub mod record;
pub mod serializer;
pub mod store;

pub use document::Document;
pub use error::{Error, Result, ValidationError};
pub use persist::WriteMode;
pub use record::{
    Chirp, Collection, NewChirp, NewUser, Record, User, CHIRP_TOO_LONG, MAX_CHIRP_LEN,
};
pub use store::{Store, StoreBuilder, DEFAULT_DB_PATH};
