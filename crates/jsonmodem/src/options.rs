#![allow(clippy::struct_excessive_bools)]

//! Reader configuration.

/// Configuration for a [`JsonReader`](crate::reader::JsonReader).
///
/// # Examples
///
/// ```rust
/// use jsonmodem::{ReaderOptions, SliceSource};
///
/// let options = ReaderOptions {
///     lenient: true,
///     ..Default::default()
/// };
/// let mut reader = jsonmodem::JsonReader::new(SliceSource::new(b"{a:1}"), options);
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReaderOptions {
    /// Accept a lenient superset of RFC 8259:
    /// `//`, `/* */`, and `#` comments; single-quoted and unquoted names and
    /// strings; `=`/`=>` in place of `:`; `;` in place of `,`; a comma
    /// immediately followed by `]` or `,` treated as `null`; and NaN/Infinity
    /// number literals.
    ///
    /// # Default
    ///
    /// `false`
    pub lenient: bool,

    /// Reject `skipName` and `skipValue` with a [`DataError`](crate::error::DataError)
    /// instead of silently discarding the unknown name or value.
    ///
    /// # Default
    ///
    /// `false`
    pub fail_on_unknown: bool,
}
