use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The line has fewer tab-separated fields than the layout needs
    TooFewFields {
        /// Number of fields required
        expected: usize,
        /// Number of fields found
        found: usize,
    },
    /// A field that should hold an integer
    InvalidNumber(String),
    /// A region name without a `prefix_number` suffix
    MissingSuffix(String),
    /// A member descriptor without `(start,end)` coordinates
    MissingCoordinates(String),
    /// Coordinate arithmetic out of the i64 range
    Overflow(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::TooFewFields { expected, found } => {
                write!(
                    f,
                    "Malformed record: expected at least {} fields, found {}",
                    expected, found
                )
            }
            RecordError::InvalidNumber(s) => write!(f, "Malformed record: invalid integer '{}'", s),
            RecordError::MissingSuffix(s) => {
                write!(f, "Malformed record: name '{}' lacks a numeric _suffix", s)
            }
            RecordError::MissingCoordinates(s) => {
                write!(f, "Malformed record: no coordinates in member '{}'", s)
            }
            RecordError::Overflow(s) => {
                write!(f, "Malformed record: coordinate overflow in {}", s)
            }
        }
    }
}

impl std::error::Error for RecordError {}

/// Parses a coordinate field
///
/// ```
/// # use pkr::libs::error::{parse_pos, RecordError};
/// assert_eq!(parse_pos("150").unwrap(), 150);
/// assert_eq!(parse_pos("-3").unwrap(), -3);
/// assert_eq!(parse_pos("1e3"), Err(RecordError::InvalidNumber("1e3".to_string())));
/// ```
pub fn parse_pos(s: &str) -> Result<i64, RecordError> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| RecordError::InvalidNumber(s.to_string()))
}
