//! Error taxonomy for the reader.
//!
//! Four kinds of failure can surface: malformed input
//! ([`SyntaxError`]), well-formed input that does not match the shape the
//! caller asked for ([`DataError`]), operating on the reader outside of its
//! legal state machine ([`StateError`]), and failures bubbled up from the
//! underlying [`crate::byte_source::ByteSource`]. All four are folded into
//! [`JsonError`], which always carries the reader's current [`Path`] so a
//! caller can locate the failure without re-deriving it.

use alloc::string::String;

use thiserror::Error;

use crate::path::Path;

/// Result alias used throughout the crate's public API.
pub type Result<T> = core::result::Result<T, JsonError>;

/// Top-level error returned by reader operations.
#[derive(Debug, Error, PartialEq)]
#[error("{source} at {path}")]
pub struct JsonError {
    pub(crate) source: ErrorKind,
    pub(crate) path: Path,
}

impl JsonError {
    pub(crate) fn new(source: ErrorKind, path: &Path) -> Self {
        Self {
            source,
            path: path.clone(),
        }
    }

    /// The path the reader had reached when this error occurred.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The underlying error kind, for callers that want to match on it.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.source
    }
}

/// Distinguishes the four failure categories a reader operation can surface.
#[derive(Debug, Error, PartialEq)]
pub enum ErrorKind {
    /// Malformed input: an unexpected byte, unterminated literal, or similar.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// Well-formed input that does not match the requested shape.
    #[error(transparent)]
    Data(#[from] DataError),
    /// The reader was asked to do something its state machine forbids.
    #[error(transparent)]
    State(#[from] StateError),
    /// The underlying byte source failed to produce more bytes.
    #[error("source error: {0}")]
    Source(String),
}

/// Malformed-input errors.
#[derive(Debug, Error, PartialEq)]
pub enum SyntaxError {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("unexpected byte {0:#04x} ('{}')", *.0 as char)]
    UnexpectedByte(u8),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("invalid unicode escape sequence \\u{0:04x}")]
    InvalidUnicodeEscape(u32),
    #[error("invalid escape character '\\{0}'")]
    InvalidEscapeCharacter(char),
    #[error("malformed number literal")]
    MalformedNumber,
    #[error("use JsonReader::setLenient(true) to accept malformed JSON")]
    LenientRequired,
    #[error("nesting too deep; exceeded the maximum of {0} scopes")]
    NestingTooDeep(usize),
    #[error("expected a name")]
    ExpectedName,
    #[error("expected ':' or '='")]
    ExpectedColon,
    #[error("expected value")]
    ExpectedValue,
}

/// Well-formed-but-wrong-shape errors.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("expected {expected} but was {actual}")]
    UnexpectedToken {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("number {literal} does not fit in a 64-bit signed integer")]
    LongOverflow { literal: String },
    #[error("number {literal} does not fit in a 32-bit signed integer")]
    IntOverflow { literal: String },
    #[error("number {literal} cannot be read as a double")]
    NotADouble { literal: String },
    #[error("JSON forbids NaN and infinities: {literal}")]
    NonFiniteDouble { literal: String },
    #[error("cannot read unknown {what} in strict failOnUnknown mode")]
    FailedOnUnknown { what: &'static str },
}

/// State-machine violations.
#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("reader is closed")]
    Closed,
    #[error("a value source obtained from nextSource() is still open")]
    ValueSourceOpen,
    #[error("nextSource() called but the next token is not a value")]
    NotAValue,
}
