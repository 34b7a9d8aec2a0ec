use thiserror::Error;

/// Malformed-input errors the parser rejects before the driver ever runs.
///
/// Per spec.md §7, these are the only recoverable errors in the system —
/// everything past this point is either a normal "no flight" price lookup
/// or a fatal contract violation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("'{0}' is not a valid 3-letter uppercase city code")]
    BadCityCode(String),

    #[error("expected a non-negative integer, got '{0}'")]
    BadInteger(String),

    #[error("area list does not contain the starting city")]
    StartCityMissing,

    #[error("starting city appears in more than one area")]
    StartCityInMultipleAreas,
}
