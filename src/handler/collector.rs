//! Buffering handler that turns a response into owned results.
//!
//! Row counts live here, on the owner side, as `ResultSet::row_count`; the
//! decoder itself keeps no counters.

use serde_json::{Map, Value};

use super::ResponseHandler;
use crate::error::{MywireError, Result};
use crate::packet::{
    ColumnDefinition, EofPacket, ErrPacket, LocalInfileRequest, OkPacket, StatusFlags, TextRow,
};

/// Rows and metadata of one completed result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub columns: Vec<ColumnDefinition>,
    pub rows: Vec<TextRow>,
    pub status: StatusFlags,
    pub warnings: u16,
}

impl ResultSet {
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the first column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Rows as JSON objects keyed by column name.
    ///
    /// NULL maps to `null`; every other value becomes a lossy UTF-8 string.
    pub fn to_json_value(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut object = Map::with_capacity(self.columns.len());
                for (col, value) in self.columns.iter().zip(row.values()) {
                    let value = match value {
                        Some(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
                        None => Value::Null,
                    };
                    object.insert(col.name.clone(), value);
                }
                Value::Object(object)
            })
            .collect();
        Value::Array(rows)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json_value())?)
    }
}

/// Outcome of one statement in a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    Ok(OkPacket),
    Err(ErrPacket),
    LocalInfile(LocalInfileRequest),
    Rows(ResultSet),
}

/// Collects every event of a response into [`QueryResult`]s.
#[derive(Debug, Default)]
pub struct ResultSetCollector {
    results: Vec<QueryResult>,
    current: Option<ResultSet>,
}

impl ResultSetCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed results so far, in wire order.
    pub fn results(&self) -> &[QueryResult] {
        &self.results
    }

    /// Whether a result set is still being received.
    pub fn in_progress(&self) -> bool {
        self.current.is_some()
    }

    pub fn into_results(self) -> Vec<QueryResult> {
        self.results
    }

    fn current_mut(&mut self, event: &str) -> Result<&mut ResultSet> {
        self.current.as_mut().ok_or_else(|| {
            MywireError::malformed(format!("{} outside of a result set", event))
        })
    }
}

impl ResponseHandler for ResultSetCollector {
    fn on_ok(&mut self, ok: OkPacket) -> Result<()> {
        self.results.push(QueryResult::Ok(ok));
        Ok(())
    }

    fn on_error(&mut self, err: ErrPacket) -> Result<()> {
        if self.current.take().is_some() {
            tracing::debug!("Discarding partial result set after server error {}", err.code);
        }
        self.results.push(QueryResult::Err(err));
        Ok(())
    }

    fn on_local_infile(&mut self, request: LocalInfileRequest) -> Result<()> {
        self.results.push(QueryResult::LocalInfile(request));
        Ok(())
    }

    fn on_result_header(&mut self, column_count: u64) -> Result<()> {
        self.current = Some(ResultSet {
            columns: Vec::with_capacity(column_count as usize),
            ..ResultSet::default()
        });
        Ok(())
    }

    fn on_column(&mut self, column: ColumnDefinition) -> Result<()> {
        self.current_mut("Column definition")?.columns.push(column);
        Ok(())
    }

    fn on_row(&mut self, row: TextRow) -> Result<()> {
        self.current_mut("Row")?.rows.push(row);
        Ok(())
    }

    fn on_rows_complete(&mut self, eof: EofPacket) -> Result<()> {
        let mut set = self
            .current
            .take()
            .ok_or_else(|| MywireError::malformed("End of rows outside of a result set"))?;
        set.status = eof.status;
        set.warnings = eof.warnings;
        self.results.push(QueryResult::Rows(set));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn column(name: &str) -> ColumnDefinition {
        let payload = crate::packet::column_payload(name, 0xFD, 0);
        ColumnDefinition::decode(&Bytes::from(payload)).unwrap()
    }

    fn sample_set() -> ResultSet {
        ResultSet {
            columns: vec![column("id"), column("note")],
            rows: vec![
                TextRow::from_values(vec![Some(Bytes::from_static(b"1")), None]),
                TextRow::from_values(vec![
                    Some(Bytes::from_static(b"2")),
                    Some(Bytes::from_static(b"hi")),
                ]),
            ],
            ..ResultSet::default()
        }
    }

    #[test]
    fn test_collects_result_set() {
        let mut c = ResultSetCollector::new();
        c.on_result_header(2).unwrap();
        c.on_column(column("id")).unwrap();
        c.on_column(column("note")).unwrap();
        c.on_columns_complete(EofPacket::default()).unwrap();
        assert!(c.in_progress());
        c.on_row(TextRow::from_values(vec![None, None])).unwrap();
        c.on_rows_complete(EofPacket {
            warnings: 3,
            status: StatusFlags(StatusFlags::AUTOCOMMIT),
        })
        .unwrap();

        assert!(!c.in_progress());
        let results = c.into_results();
        let QueryResult::Rows(set) = &results[0] else {
            panic!("expected rows, got {:?}", results[0]);
        };
        assert_eq!(set.row_count(), 1);
        assert_eq!(set.warnings, 3);
        assert_eq!(set.column_index("note"), Some(1));
        assert_eq!(set.column_index("missing"), None);
    }

    #[test]
    fn test_error_discards_partial_set() {
        let mut c = ResultSetCollector::new();
        c.on_result_header(1).unwrap();
        c.on_column(column("id")).unwrap();
        c.on_error(ErrPacket {
            code: 1317,
            sql_state: Some("70100".to_string()),
            message: "Query execution was interrupted".to_string(),
        })
        .unwrap();

        assert!(!c.in_progress());
        assert!(matches!(c.results(), [QueryResult::Err(e)] if e.code == 1317));
    }

    #[test]
    fn test_row_without_header_is_rejected() {
        let mut c = ResultSetCollector::new();
        let err = c.on_row(TextRow::from_values(vec![])).unwrap_err();
        assert!(err.to_string().contains("outside of a result set"));
    }

    #[test]
    fn test_to_json() {
        let json = sample_set().to_json().unwrap();
        assert_eq!(
            json,
            r#"[{"id":"1","note":null},{"id":"2","note":"hi"}]"#
        );
    }
}
