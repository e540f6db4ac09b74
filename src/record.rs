//! Record types and the [`Record`] trait that ties each one to its collection.
//!
//! Implement [`Record`] to add another collection to the [`Document`].

use crate::document::Document;
use crate::error::{Error, Result, ValidationError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Longest accepted chirp body, in bytes.
pub const MAX_CHIRP_LEN: usize = 140;

/// Message handed back to clients whose chirp is over [`MAX_CHIRP_LEN`].
pub const CHIRP_TOO_LONG: &str = "Chirp is too long. Max length is 140.";

/// Names a collection inside the document. Displays as its on-disk field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Short posts.
    Chirps,
    /// Registered users.
    Users,
}

impl Collection {
    /// Field name of this collection in the JSON file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Chirps => "chirps",
            Collection::Users => "users",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type stored in one of the document's collections.
///
/// The store never builds records itself: it parses [`Record::Input`], runs
/// [`Record::validate`], picks the next id, and hands both to
/// [`Record::assemble`].
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned {
    /// Shape of the request body that creates this record.
    type Input: DeserializeOwned;

    /// Collection this record lives in.
    const COLLECTION: Collection;

    /// Id assigned at creation.
    fn id(&self) -> u64;

    /// Domain checks on parsed input. Runs before the file is touched.
    fn validate(_input: &Self::Input) -> std::result::Result<(), ValidationError> {
        Ok(())
    }

    /// Build the stored record from its assigned id.
    fn assemble(id: u64, input: Self::Input) -> Self;

    /// This record's table inside `doc`.
    fn table(doc: &Document) -> &BTreeMap<u64, Self>;

    /// Mutable access to this record's table inside `doc`.
    fn table_mut(doc: &mut Document) -> &mut BTreeMap<u64, Self>;

    /// Parse and validate raw request bytes.
    fn parse_input(raw: &[u8]) -> Result<Self::Input> {
        let input: Self::Input =
            serde_json::from_slice(raw).map_err(|e| Error::MalformedInput(e.to_string()))?;
        Self::validate(&input)?;
        Ok(input)
    }
}

// ---- Chirp -------------------------------------------------------------------

/// A short post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    /// Post text, at most [`MAX_CHIRP_LEN`] bytes.
    pub body: String,
    /// Assigned id.
    pub id: u64,
}

/// Request body for a new chirp.
#[derive(Debug, Clone, Deserialize)]
pub struct NewChirp {
    /// Post text.
    pub body: String,
}

impl Record for Chirp {
    type Input = NewChirp;

    const COLLECTION: Collection = Collection::Chirps;

    fn id(&self) -> u64 {
        self.id
    }

    fn validate(input: &NewChirp) -> std::result::Result<(), ValidationError> {
        if input.body.len() > MAX_CHIRP_LEN {
            return Err(ValidationError::ChirpTooLong {
                len: input.body.len(),
            });
        }
        Ok(())
    }

    fn assemble(id: u64, input: NewChirp) -> Self {
        Chirp {
            body: input.body,
            id,
        }
    }

    fn table(doc: &Document) -> &BTreeMap<u64, Self> {
        &doc.chirps
    }

    fn table_mut(doc: &mut Document) -> &mut BTreeMap<u64, Self> {
        &mut doc.chirps
    }
}

// ---- User --------------------------------------------------------------------

/// A registered user. The email is stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Contact address.
    pub email: String,
    /// Assigned id.
    pub id: u64,
}

/// Request body for a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Contact address.
    pub email: String,
}

impl Record for User {
    type Input = NewUser;

    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> u64 {
        self.id
    }

    fn assemble(id: u64, input: NewUser) -> Self {
        User {
            email: input.email,
            id,
        }
    }

    fn table(doc: &Document) -> &BTreeMap<u64, Self> {
        &doc.users
    }

    fn table_mut(doc: &mut Document) -> &mut BTreeMap<u64, Self> {
        &mut doc.users
    }
}
