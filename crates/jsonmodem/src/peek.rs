//! Peek State — the single cached look-ahead classification
//! plus its ancillary data, and the public [`TokenKind`] it maps to.

use alloc::string::String;
use alloc::vec::Vec;

/// The reader's internal, fine-grained look-ahead classification.
/// It is monotone: once set by `doPeek`, it is cleared only by an advance
/// operation (a terminal reader op consuming the token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Peeked {
    #[default]
    None,
    Eof,
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    True,
    False,
    Null,
    SingleQuoted,
    DoubleQuoted,
    Unquoted,
    Buffered,
    SingleQuotedName,
    DoubleQuotedName,
    UnquotedName,
    BufferedName,
    Long,
    Number,
}

impl Peeked {
    pub(crate) const fn is_name(self) -> bool {
        matches!(
            self,
            Self::SingleQuotedName | Self::DoubleQuotedName | Self::UnquotedName | Self::BufferedName
        )
    }

    /// Re-classifies a `*Name` peek as the equivalent value-flavor peek
    /// (used by `promoteNameToValue`).
    pub(crate) const fn demote_to_value(self) -> Self {
        match self {
            Self::SingleQuotedName => Self::SingleQuoted,
            Self::DoubleQuotedName => Self::DoubleQuoted,
            Self::UnquotedName => Self::Unquoted,
            Self::BufferedName => Self::Buffered,
            other => other,
        }
    }

    /// Maps the internal classification to the public, coarse [`TokenKind`].
    pub(crate) fn kind(self) -> Option<TokenKind> {
        Some(match self {
            Self::None => return None,
            Self::Eof => TokenKind::EndDocument,
            Self::BeginObject => TokenKind::BeginObject,
            Self::EndObject => TokenKind::EndObject,
            Self::BeginArray => TokenKind::BeginArray,
            Self::EndArray => TokenKind::EndArray,
            Self::True | Self::False => TokenKind::Boolean,
            Self::Null => TokenKind::Null,
            Self::SingleQuoted | Self::DoubleQuoted | Self::Unquoted | Self::Buffered => {
                TokenKind::String
            }
            Self::SingleQuotedName
            | Self::DoubleQuotedName
            | Self::UnquotedName
            | Self::BufferedName => TokenKind::Name,
            Self::Long | Self::Number => TokenKind::Number,
        })
    }
}

/// The public, coarse token classification returned by
/// [`JsonReader::peek`](crate::reader::JsonReader::peek).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    Name,
    String,
    Number,
    Boolean,
    Null,
    EndDocument,
}

/// Ancillary data attached to the current peek token. Transient: cleared whenever a new peek token is classified.
#[derive(Debug, Clone, Default)]
pub(crate) struct PeekAncillary {
    /// Filled when the peek is `Peeked::Long`: the accumulated signed value.
    pub(crate) peeked_long: i64,
    /// Filled when the peek is `Peeked::Long` or `Peeked::Number`: the byte
    /// length of the lexed number literal (already buffered in full).
    pub(crate) number_length: usize,
    /// Filled when the peek is `Peeked::Buffered`/`Peeked::BufferedName`:
    /// the already-materialized string.
    pub(crate) peeked_string: Option<String>,
    /// Filled when the peek is `Peeked::True`/`Peeked::False`/`Peeked::Null`:
    /// the exact bytes `doPeek` consumed to recognize the keyword. Needed
    /// because the keyword match is case-insensitive, so the bytes that
    /// were actually on the wire (e.g. `"True"`) cannot be reconstructed
    /// from the token kind alone once passthrough wants to replay them.
    pub(crate) raw_keyword: Option<Vec<u8>>,
}
