//! Serialize raw column bytes as text.
//!
//! Text-protocol values are character data in the column's charset; JSON
//! output renders them as (lossy) UTF-8 strings rather than byte arrays.

use bytes::Bytes;
use serde::Serializer;

pub(crate) fn serialize_opt<S: Serializer>(
    value: &Option<Bytes>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(bytes) => serializer.serialize_some(&String::from_utf8_lossy(bytes)),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn serialize_values<S: Serializer>(
    values: &[Option<Bytes>],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(
        values
            .iter()
            .map(|v| v.as_deref().map(String::from_utf8_lossy)),
    )
}
