//! Text-protocol data row.
//!
//! A row is the concatenation of one value per column, each either a
//! length-encoded byte string or the single NULL marker `0xFB`.

use bytes::Bytes;
use serde::Serialize;

use crate::codec::PayloadReader;
use crate::error::{MywireError, Result};
use crate::protocol::markers;

/// One row of a text result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRow {
    #[serde(serialize_with = "super::text::serialize_values")]
    values: Vec<Option<Bytes>>,
}

impl TextRow {
    /// Decode a row payload that must hold exactly `column_count` values.
    pub fn decode(payload: &Bytes, column_count: usize) -> Result<Self> {
        let mut r = PayloadReader::new(payload.clone());
        let mut values = Vec::with_capacity(column_count);

        while r.remaining() > 0 {
            if values.len() == column_count {
                return Err(MywireError::malformed(format!(
                    "Row carries more than {} values ({} bytes left over)",
                    column_count,
                    r.remaining()
                )));
            }

            if r.peek() == Some(markers::NULL) {
                r.skip(1)?;
                values.push(None);
            } else {
                values.push(Some(r.lenenc_bytes()?));
            }
        }

        if values.len() != column_count {
            return Err(MywireError::malformed(format!(
                "Row carries {} values, result set has {} columns",
                values.len(),
                column_count
            )));
        }

        Ok(Self { values })
    }

    /// Build a row from already-decoded values.
    pub fn from_values(values: Vec<Option<Bytes>>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value of column `index`; `None` for NULL or out of range.
    pub fn get(&self, index: usize) -> Option<&Bytes> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Value of column `index` as UTF-8 text.
    pub fn get_str(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| std::str::from_utf8(v).ok())
    }

    pub fn is_null(&self, index: usize) -> bool {
        matches!(self.values.get(index), Some(None))
    }

    pub fn values(&self) -> &[Option<Bytes>] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Option<Bytes>> {
        self.values
    }
}
