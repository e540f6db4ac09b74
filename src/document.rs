//! The root structure persisted to disk.

use crate::error::{Error, Result};
use crate::record::{Chirp, Record, User};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Everything the database file holds.
///
/// Keys are the record ids; JSON writes them as strings. The key is
/// authoritative and must equal the record's own `id` field, see
/// [`Document::check_keys`]. A collection that is missing from the file, or
/// written as `null`, loads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Chirps by id.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chirps: BTreeMap<u64, Chirp>,
    /// Users by id.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub users: BTreeMap<u64, User>,
}

impl Document {
    /// Next free id for `table`: one past the highest key, or 1 when empty.
    /// `None` once the highest key is `u64::MAX`.
    ///
    /// Derived from contents every time, so removing the top record out of
    /// band means its id gets handed out again.
    #[must_use]
    pub fn next_id<V>(table: &BTreeMap<u64, V>) -> Option<u64> {
        match table.keys().next_back() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Fail with [`Error::Corrupt`] if any record sits under a key other than
    /// its own id. Hand-edited files are the usual cause.
    pub fn check_keys(&self) -> Result<()> {
        check_table(&self.chirps)?;
        check_table(&self.users)
    }
}

fn check_table<R: Record>(table: &BTreeMap<u64, R>) -> Result<()> {
    match table.iter().find(|(key, record)| **key != record.id()) {
        Some((key, record)) => Err(Error::Corrupt(format!(
            "{} key {key} holds record with id {}",
            R::COLLECTION,
            record.id()
        ))),
        None => Ok(()),
    }
}

fn null_as_empty<'de, D, V>(deserializer: D) -> std::result::Result<BTreeMap<u64, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    Ok(Option::<BTreeMap<u64, V>>::deserialize(deserializer)?.unwrap_or_default())
}
