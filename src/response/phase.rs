//! Decoder phase.

use std::fmt;

/// What the decoder expects the next frame to be.
///
/// Each variant carries the data that is only meaningful in that phase, so
/// the expected column count cannot outlive the result set it belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Between responses: the next frame is OK, ERR, a local infile request
    /// or a column-count header.
    #[default]
    Idle,
    /// A header announced `expected` columns; definitions are arriving.
    AwaitingColumns { expected: u64 },
    /// Column list closed; rows of `columns` values are arriving.
    AwaitingRows { columns: usize },
}

impl Phase {
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::AwaitingColumns { expected } => write!(f, "AwaitingColumns({})", expected),
            Phase::AwaitingRows { columns } => write!(f, "AwaitingRows({})", columns),
        }
    }
}
