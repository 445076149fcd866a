//! Error types for kodeks conversion.

use std::fmt;

use thiserror::Error;

/// Errors that can occur during a conversion.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML writing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A problem found in the source markup.
///
/// Parse errors are collected while events are delivered and only the first
/// one is reported once the input is drained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at byte {position}")]
pub struct ParseError {
    /// Byte offset in the decoded input where the problem was detected.
    pub position: u64,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(position: u64, kind: ParseErrorKind) -> Self {
        Self { position, kind }
    }
}

/// What went wrong in the source markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Syntax error reported by the XML reader.
    Malformed(String),
    /// Entity reference that is neither predefined nor a character reference.
    UnknownEntity(String),
    /// Attribute that could not be read or unescaped.
    InvalidAttribute(String),
    /// End tag with no open element.
    UnexpectedEnd(String),
    /// End tag that does not close the innermost open element.
    MismatchedEnd { expected: String, found: String },
    /// Element still open when the input ended.
    Unclosed(String),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "malformed markup: {msg}"),
            Self::UnknownEntity(name) => write!(f, "unknown entity `&{name};`"),
            Self::InvalidAttribute(msg) => write!(f, "invalid attribute: {msg}"),
            Self::UnexpectedEnd(name) => write!(f, "unexpected end tag `</{name}>`"),
            Self::MismatchedEnd { expected, found } => {
                write!(f, "expected `</{expected}>`, found `</{found}>`")
            }
            Self::Unclosed(name) => write!(f, "element `<{name}>` is never closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(
            12,
            ParseErrorKind::MismatchedEnd {
                expected: "P".to_string(),
                found: "B".to_string(),
            },
        );
        assert_eq!(err.to_string(), "expected `</P>`, found `</B>` at byte 12");
    }

    #[test]
    fn test_parse_error_converts_into_error() {
        let err: Error = ParseError::new(0, ParseErrorKind::Unclosed("P".to_string())).into();
        assert!(matches!(err, Error::Parse(_)));
        assert_eq!(
            err.to_string(),
            "Parse error: element `<P>` is never closed at byte 0"
        );
    }
}
