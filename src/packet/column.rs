//! Column-count header and column definition packets.
//!
//! Column definition (protocol 4.1), decoded strictly in this order:
//! ```text
//! catalog lenenc-str    ("def")
//! schema lenenc-str
//! table lenenc-str      (alias)
//! org_table lenenc-str
//! name lenenc-str       (alias)
//! org_name lenenc-str
//! fixed_len lenenc-int  (always 0x0C)
//! charset u16
//! column_length u32
//! column_type u8
//! flags u16
//! decimals u8
//! filler [u8; 2]
//! [default lenenc-str]  (field-list responses only)
//! ```

use bytes::Bytes;
use serde::Serialize;

use crate::codec::PayloadReader;
use crate::error::{MywireError, Result};
use crate::protocol::markers;

/// Length of the fixed-width tail announced by every definition.
const FIXED_FIELDS_LEN: u64 = 0x0C;

/// Decode the header that opens a result set.
///
/// The discriminator is reinterpreted as the first byte of a length-encoded
/// column count. Zero columns and counts above `max_columns` are rejected.
pub fn decode_column_count(payload: &Bytes, max_columns: usize) -> Result<u64> {
    match payload.first() {
        None => return Err(MywireError::truncated(1, 0)),
        Some(&b) if b == markers::OK || b == markers::ERR || b == markers::LOCAL_INFILE => {
            return Err(MywireError::malformed(format!(
                "0x{:02X} is reserved and cannot start a column-count header",
                b
            )))
        }
        Some(_) => {}
    }

    let mut r = PayloadReader::new(payload.clone());
    let count = r.lenenc_int()?;
    if r.remaining() != 0 {
        return Err(MywireError::malformed(format!(
            "{} unexpected bytes after column count",
            r.remaining()
        )));
    }

    if count == 0 {
        return Err(MywireError::malformed(
            "Column-count header announces zero columns",
        ));
    }

    if count > max_columns as u64 {
        return Err(MywireError::malformed(format!(
            "Column count {} exceeds maximum {}",
            count, max_columns
        )));
    }

    Ok(count)
}

/// Declared column type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnType {
    Decimal,
    Tiny,
    Short,
    Long,
    Float,
    Double,
    Null,
    Timestamp,
    LongLong,
    Int24,
    Date,
    Time,
    DateTime,
    Year,
    NewDate,
    VarChar,
    Bit,
    Json,
    NewDecimal,
    Enum,
    Set,
    TinyBlob,
    MediumBlob,
    LongBlob,
    Blob,
    VarString,
    String,
    Geometry,
    /// A code this client does not know about.
    Unknown(u8),
}

impl ColumnType {
    pub fn from_u8(code: u8) -> Self {
        match code {
            0x00 => ColumnType::Decimal,
            0x01 => ColumnType::Tiny,
            0x02 => ColumnType::Short,
            0x03 => ColumnType::Long,
            0x04 => ColumnType::Float,
            0x05 => ColumnType::Double,
            0x06 => ColumnType::Null,
            0x07 => ColumnType::Timestamp,
            0x08 => ColumnType::LongLong,
            0x09 => ColumnType::Int24,
            0x0A => ColumnType::Date,
            0x0B => ColumnType::Time,
            0x0C => ColumnType::DateTime,
            0x0D => ColumnType::Year,
            0x0E => ColumnType::NewDate,
            0x0F => ColumnType::VarChar,
            0x10 => ColumnType::Bit,
            0xF5 => ColumnType::Json,
            0xF6 => ColumnType::NewDecimal,
            0xF7 => ColumnType::Enum,
            0xF8 => ColumnType::Set,
            0xF9 => ColumnType::TinyBlob,
            0xFA => ColumnType::MediumBlob,
            0xFB => ColumnType::LongBlob,
            0xFC => ColumnType::Blob,
            0xFD => ColumnType::VarString,
            0xFE => ColumnType::String,
            0xFF => ColumnType::Geometry,
            other => ColumnType::Unknown(other),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ColumnType::Decimal => 0x00,
            ColumnType::Tiny => 0x01,
            ColumnType::Short => 0x02,
            ColumnType::Long => 0x03,
            ColumnType::Float => 0x04,
            ColumnType::Double => 0x05,
            ColumnType::Null => 0x06,
            ColumnType::Timestamp => 0x07,
            ColumnType::LongLong => 0x08,
            ColumnType::Int24 => 0x09,
            ColumnType::Date => 0x0A,
            ColumnType::Time => 0x0B,
            ColumnType::DateTime => 0x0C,
            ColumnType::Year => 0x0D,
            ColumnType::NewDate => 0x0E,
            ColumnType::VarChar => 0x0F,
            ColumnType::Bit => 0x10,
            ColumnType::Json => 0xF5,
            ColumnType::NewDecimal => 0xF6,
            ColumnType::Enum => 0xF7,
            ColumnType::Set => 0xF8,
            ColumnType::TinyBlob => 0xF9,
            ColumnType::MediumBlob => 0xFA,
            ColumnType::LongBlob => 0xFB,
            ColumnType::Blob => 0xFC,
            ColumnType::VarString => 0xFD,
            ColumnType::String => 0xFE,
            ColumnType::Geometry => 0xFF,
            ColumnType::Unknown(code) => code,
        }
    }
}

/// Column attribute bitset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ColumnFlags(pub u16);

impl ColumnFlags {
    pub const NOT_NULL: u16 = 0x0001;
    pub const PRI_KEY: u16 = 0x0002;
    pub const UNIQUE_KEY: u16 = 0x0004;
    pub const MULTIPLE_KEY: u16 = 0x0008;
    pub const BLOB: u16 = 0x0010;
    pub const UNSIGNED: u16 = 0x0020;
    pub const ZEROFILL: u16 = 0x0040;
    pub const BINARY: u16 = 0x0080;
    pub const ENUM: u16 = 0x0100;
    pub const AUTO_INCREMENT: u16 = 0x0200;
    pub const TIMESTAMP: u16 = 0x0400;
    pub const SET: u16 = 0x0800;

    #[inline]
    pub fn contains(self, flag: u16) -> bool {
        self.0 & flag == flag
    }
}

/// Metadata for one result-set column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDefinition {
    pub catalog: String,
    pub schema: String,
    /// Table alias as written in the query.
    pub table: String,
    pub org_table: String,
    /// Column alias as written in the query.
    pub name: String,
    pub org_name: String,
    pub charset: u16,
    pub column_length: u32,
    pub column_type: ColumnType,
    pub flags: ColumnFlags,
    pub decimals: u8,
    /// Default value, only sent in field-list responses.
    #[serde(serialize_with = "super::text::serialize_opt")]
    pub default_value: Option<Bytes>,
}

impl ColumnDefinition {
    /// Decode a column definition payload.
    pub fn decode(payload: &Bytes) -> Result<Self> {
        let mut r = PayloadReader::new(payload.clone());

        let catalog = r.lenenc_str()?;
        let schema = r.lenenc_str()?;
        let table = r.lenenc_str()?;
        let org_table = r.lenenc_str()?;
        let name = r.lenenc_str()?;
        let org_name = r.lenenc_str()?;

        let fixed_len = r.lenenc_int()?;
        if fixed_len != FIXED_FIELDS_LEN {
            return Err(MywireError::malformed(format!(
                "Column '{}' announces {} fixed bytes, expected {}",
                name, fixed_len, FIXED_FIELDS_LEN
            )));
        }

        let charset = r.u16_le()?;
        let column_length = r.u32_le()?;
        let column_type = ColumnType::from_u8(r.u8()?);
        let flags = ColumnFlags(r.u16_le()?);
        let decimals = r.u8()?;

        // Filler is omitted by some proxies.
        if r.remaining() >= 2 {
            r.skip(2)?;
        } else if r.remaining() == 1 {
            return Err(MywireError::truncated(2, 1));
        }

        let default_value = if r.remaining() > 0 {
            Some(r.lenenc_bytes()?)
        } else {
            None
        };

        if r.remaining() != 0 {
            return Err(MywireError::malformed(format!(
                "{} unexpected bytes after column '{}'",
                r.remaining(),
                name
            )));
        }

        Ok(Self {
            catalog,
            schema,
            table,
            org_table,
            name,
            org_name,
            charset,
            column_length,
            column_type,
            flags,
            decimals,
            default_value,
        })
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        !self.flags.contains(ColumnFlags::NOT_NULL)
    }

    #[inline]
    pub fn is_unsigned(&self) -> bool {
        self.flags.contains(ColumnFlags::UNSIGNED)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::codec::{put_lenenc_bytes, put_lenenc_int};

    /// Encode a column definition payload for `name` of `column_type`.
    pub(crate) fn column_payload(name: &str, column_type: u8, flags: u16) -> Vec<u8> {
        let mut buf = Vec::new();
        for field in ["def", "shop", "o", "orders", name, name] {
            put_lenenc_bytes(&mut buf, field.as_bytes());
        }
        put_lenenc_int(&mut buf, FIXED_FIELDS_LEN);
        buf.extend_from_slice(&33u16.to_le_bytes());
        buf.extend_from_slice(&11u32.to_le_bytes());
        buf.push(column_type);
        buf.extend_from_slice(&flags.to_le_bytes());
        buf.push(0);
        buf.extend_from_slice(&[0, 0]);
        buf
    }

    #[test]
    fn test_decode_column_count() {
        assert_eq!(decode_column_count(&Bytes::from_static(&[0x02]), 4096).unwrap(), 2);
        assert_eq!(
            decode_column_count(&Bytes::from_static(&[0xFC, 0x2C, 0x01]), 4096).unwrap(),
            300
        );
    }

    #[test]
    fn test_column_count_rejects_sentinels() {
        for b in [0x00u8, 0xFF, 0xFB] {
            let err = decode_column_count(&Bytes::copy_from_slice(&[b]), 4096).unwrap_err();
            assert!(matches!(err, MywireError::MalformedPacket(_)), "0x{:02X}", b);
        }
    }

    #[test]
    fn test_column_count_rejects_wide_zero() {
        let zeros: [&[u8]; 3] = [
            &[0xFC, 0x00, 0x00],
            &[0xFD, 0x00, 0x00, 0x00],
            &[0xFE, 0, 0, 0, 0, 0, 0, 0, 0],
        ];
        for payload in zeros {
            let err = decode_column_count(&Bytes::copy_from_slice(payload), 4096).unwrap_err();
            assert!(err.to_string().contains("zero columns"), "{:02X?}", payload);
        }
    }

    #[test]
    fn test_column_count_limit_and_trailing_bytes() {
        let err = decode_column_count(&Bytes::from_static(&[0xFC, 0x2C, 0x01]), 100).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));

        let err = decode_column_count(&Bytes::from_static(&[0x02, 0x00]), 100).unwrap_err();
        assert!(matches!(err, MywireError::MalformedPacket(_)));

        let err = decode_column_count(&Bytes::from_static(&[0xFC, 0x01]), 100).unwrap_err();
        assert!(matches!(err, MywireError::TruncatedInput { .. }));
    }

    #[test]
    fn test_decode_definition() {
        let payload = column_payload(
            "id",
            0x03,
            ColumnFlags::NOT_NULL | ColumnFlags::PRI_KEY | ColumnFlags::UNSIGNED,
        );
        let col = ColumnDefinition::decode(&Bytes::from(payload)).unwrap();

        assert_eq!(col.catalog, "def");
        assert_eq!(col.schema, "shop");
        assert_eq!(col.table, "o");
        assert_eq!(col.org_table, "orders");
        assert_eq!(col.name, "id");
        assert_eq!(col.charset, 33);
        assert_eq!(col.column_length, 11);
        assert_eq!(col.column_type, ColumnType::Long);
        assert!(col.flags.contains(ColumnFlags::PRI_KEY));
        assert!(col.is_unsigned());
        assert!(!col.is_nullable());
        assert_eq!(col.default_value, None);
    }

    #[test]
    fn test_decode_field_list_default() {
        let mut payload = column_payload("status", 0xFD, 0);
        put_lenenc_bytes(&mut payload, b"new");

        let col = ColumnDefinition::decode(&Bytes::from(payload)).unwrap();
        assert_eq!(col.column_type, ColumnType::VarString);
        assert_eq!(col.default_value.as_deref(), Some(&b"new"[..]));
    }

    #[test]
    fn test_definition_json_renders_text() {
        let mut payload = column_payload("status", 0xFD, ColumnFlags::NOT_NULL);
        put_lenenc_bytes(&mut payload, b"new");
        let col = ColumnDefinition::decode(&Bytes::from(payload)).unwrap();

        let value = serde_json::to_value(&col).unwrap();
        assert_eq!(value["name"], "status");
        assert_eq!(value["column_type"], "VarString");
        assert_eq!(value["flags"], ColumnFlags::NOT_NULL);
        assert_eq!(value["default_value"], "new");

        let plain = ColumnDefinition::decode(&Bytes::from(column_payload("n", 0x20, 0))).unwrap();
        let value = serde_json::to_value(&plain).unwrap();
        assert_eq!(value["column_type"], serde_json::json!({ "Unknown": 0x20 }));
        assert!(value["default_value"].is_null());
    }

    #[test]
    fn test_missing_filler_is_accepted() {
        let mut payload = column_payload("n", 0x08, 0);
        payload.truncate(payload.len() - 2);

        let col = ColumnDefinition::decode(&Bytes::from(payload)).unwrap();
        assert_eq!(col.column_type, ColumnType::LongLong);
    }

    #[test]
    fn test_bad_fixed_length() {
        let mut buf = Vec::new();
        for field in ["def", "", "", "", "x", "x"] {
            put_lenenc_bytes(&mut buf, field.as_bytes());
        }
        put_lenenc_int(&mut buf, 0x0B);
        buf.extend_from_slice(&[0; 13]);

        let err = ColumnDefinition::decode(&Bytes::from(buf)).unwrap_err();
        assert!(err.to_string().contains("fixed bytes"));
    }

    #[test]
    fn test_truncated_definition() {
        let payload = column_payload("id", 0x03, 0);
        let err = ColumnDefinition::decode(&Bytes::copy_from_slice(&payload[..20])).unwrap_err();
        assert!(matches!(err, MywireError::TruncatedInput { .. }));
    }

    #[test]
    fn test_column_type_codes() {
        for code in 0u8..=255 {
            assert_eq!(ColumnType::from_u8(code).as_u8(), code);
        }
        assert_eq!(ColumnType::from_u8(0x20), ColumnType::Unknown(0x20));
    }
}
