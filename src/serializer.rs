//! Serialization layer. JSON via serde_json.

use crate::document::Document;
use crate::error::{Error, Result};

/// JSON serializer with optional pretty-printing.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with indentation, easier to read by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Encode a document to bytes.
    pub fn serialize(&self, doc: &Document) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(doc)
        } else {
            serde_json::to_vec(doc)
        };
        bytes.map_err(|e| Error::Serialize(e.to_string()))
    }

    /// Decode bytes back into a document. Empty input is an empty document,
    /// which is what a freshly created file holds. A record filed under a key
    /// that differs from its id is [`Error::Corrupt`].
    pub fn deserialize(&self, bytes: &[u8]) -> Result<Document> {
        if bytes.is_empty() {
            return Ok(Document::default());
        }
        let doc: Document = serde_json::from_slice(bytes).map_err(Error::from)?;
        doc.check_keys()?;
        Ok(doc)
    }
}
