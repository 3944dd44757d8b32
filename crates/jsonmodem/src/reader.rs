//! Reader Protocol — the public pull-style API.
//!
//! `JsonReader<S>` is generic over the byte source it reads from
//! ([`ByteSource`]); see [`crate::buffered`] for ready-made adapters. Every
//! terminal operation follows the same shape: ensure a peek, validate its
//! [`TokenKind`], consume it, update the path, clear the peek.

use alloc::{format, string::String, sync::Arc, vec::Vec};

use crate::byte_source::{Blackhole, ByteSource, SourceError};
use crate::error::{DataError, ErrorKind, JsonError, Result, StateError};
use crate::escape::UnicodeEscapeBuffer;
use crate::options::ReaderOptions;
use crate::path::{Path, Scope, ScopeStack};
use crate::peek::{PeekAncillary, Peeked, TokenKind};
use crate::value_source::VsState;

/// A streaming, pull-style UTF-8 JSON reader.
///
/// `JsonReader` never buffers a whole document. It keeps one look-ahead
/// token ([`Peeked`]) and a bounded nesting stack ([`ScopeStack`]), and pulls
/// bytes from `S` only as far as it needs to classify or consume that
/// token.
#[derive(Debug)]
pub struct JsonReader<S: ByteSource> {
    pub(crate) source: S,
    pub(crate) scopes: ScopeStack,
    pub(crate) peeked: Peeked,
    pub(crate) ancillary: PeekAncillary,
    pub(crate) options: ReaderOptions,
    pub(crate) closed: bool,
    pub(crate) unicode_escape: UnicodeEscapeBuffer,
    /// Set while a [`crate::value_source::ValueSource`] handed out by
    /// `nextSource()` has not yet been drained to completion.
    pub(crate) pending_value_source: bool,
    /// Set by `promote_name_to_value`: the next value consumed
    /// is actually a pending object name read through the value API, so its
    /// completion must transition the scope to `DanglingName` (awaiting the
    /// colon) rather than run the ordinary post-value transition.
    pub(crate) promoted_name_pending: bool,
    /// Value Sub-Source state, live only while
    /// `pending_value_source` is set.
    pub(crate) vs_state: VsState,
    /// The opener or fully-known primitive bytes `nextSource()` seeds
    /// before any further byte is pulled from `source`.
    pub(crate) vs_prefix: Vec<u8>,
    pub(crate) vs_prefix_pos: usize,
    /// Nesting depth while `vs_state` is `VsState::Json`.
    pub(crate) vs_depth: u32,
    /// Whether the quote state currently in `vs_state` was entered from
    /// inside `VsState::Json` (a nested string, returns there on close) as
    /// opposed to being the sub-source's own top-level value (ends the
    /// sub-source on close).
    pub(crate) vs_return_to_json: bool,
    /// A single byte read one call ahead of an escape pair that didn't fit
    /// in the caller's buffer, held over for the next `read()`.
    pub(crate) vs_pending: Option<u8>,
}

/// What a fully-consumed number token turned out to be (internal).
enum NumberToken {
    Long(i64),
    Text(String),
}

impl<S: ByteSource> JsonReader<S> {
    /// Creates a reader over `source` with the given `options`.
    #[must_use]
    pub fn new(source: S, options: ReaderOptions) -> Self {
        Self {
            source,
            scopes: ScopeStack::new(),
            peeked: Peeked::None,
            ancillary: PeekAncillary::default(),
            options,
            closed: false,
            unicode_escape: UnicodeEscapeBuffer::new(),
            pending_value_source: false,
            promoted_name_pending: false,
            vs_state: VsState::EndOfJson,
            vs_prefix: Vec::new(),
            vs_prefix_pos: 0,
            vs_depth: 0,
            vs_return_to_json: false,
            vs_pending: None,
        }
    }

    /// Whether lenient extensions are accepted.
    #[must_use]
    pub fn is_lenient(&self) -> bool {
        self.options.lenient
    }

    /// Enables or disables lenient extensions at runtime.
    pub fn set_lenient(&mut self, lenient: bool) {
        self.options.lenient = lenient;
    }

    /// Whether `skipName`/`skipValue` are rejected as data errors.
    #[must_use]
    pub fn fails_on_unknown(&self) -> bool {
        self.options.fail_on_unknown
    }

    /// Enables or disables `failOnUnknown` at runtime.
    pub fn set_fail_on_unknown(&mut self, fail: bool) {
        self.options.fail_on_unknown = fail;
    }

    /// The reader's current position as a JSONPath-like string.
    #[must_use]
    pub fn path(&self) -> Path {
        self.scopes.render_path()
    }

    pub(crate) fn err(&self, kind: impl Into<ErrorKind>) -> JsonError {
        JsonError::new(kind.into(), &self.path())
    }

    pub(crate) fn source_err(&self, e: SourceError) -> JsonError {
        self.err(ErrorKind::Source(format!("{e}")))
    }

    pub(crate) fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(self.err(StateError::Closed));
        }
        Ok(())
    }

    /// Auto-drains an outstanding value source before any other operation
    /// may proceed.
    pub(crate) fn drain_pending_value_source(&mut self) -> Result<()> {
        if self.pending_value_source {
            self.finish_value_source()?;
        }
        Ok(())
    }

    /// Ensures `self.peeked` holds a classified token, without consuming it.
    pub(crate) fn ensure_peeked(&mut self) -> Result<Peeked> {
        self.check_open()?;
        self.drain_pending_value_source()?;
        if self.peeked == Peeked::None {
            let mut sink = Blackhole;
            self.peeked = self.do_peek(&mut sink, false)?;
        }
        Ok(self.peeked)
    }

    /// After a scalar value at the top scope is fully consumed: bump the
    /// enclosing array index, promote an empty document to non-empty, and
    /// clear the cached peek.
    pub(crate) fn after_value_consumed(&mut self) {
        if self.promoted_name_pending {
            self.promoted_name_pending = false;
            self.scopes.set_top(Scope::DanglingName);
        } else {
            self.scopes.increment_index();
            self.scopes.set_top(promote_document_scope(self.scopes.top()));
        }
        self.peeked = Peeked::None;
    }

    /// Returns the coarse [`TokenKind`] of the next token without consuming
    /// it.
    pub fn peek(&mut self) -> Result<TokenKind> {
        let peeked = self.ensure_peeked()?;
        Ok(peeked.kind().expect("ensure_peeked never leaves None"))
    }

    /// Whether the current array/object scope has another element (spec
    /// §6).
    pub fn has_next(&mut self) -> Result<bool> {
        let kind = self.peek()?;
        Ok(!matches!(kind, TokenKind::EndArray | TokenKind::EndObject))
    }

    fn expect(&mut self, expected: Peeked, what: &'static str) -> Result<()> {
        let peeked = self.ensure_peeked()?;
        if peeked != expected {
            return Err(self.err(DataError::UnexpectedToken {
                expected: what,
                actual: token_name(peeked),
            }));
        }
        Ok(())
    }

    /// Consumes a `{`.
    pub fn begin_object(&mut self) -> Result<()> {
        self.expect(Peeked::BeginObject, "BEGIN_OBJECT")?;
        self.scopes.push(Scope::EmptyObject)?;
        self.peeked = Peeked::None;
        Ok(())
    }

    /// Consumes a `}`.
    pub fn end_object(&mut self) -> Result<()> {
        self.expect(Peeked::EndObject, "END_OBJECT")?;
        self.scopes.pop();
        self.after_value_consumed();
        Ok(())
    }

    /// Consumes a `[`.
    pub fn begin_array(&mut self) -> Result<()> {
        self.expect(Peeked::BeginArray, "BEGIN_ARRAY")?;
        self.scopes.push(Scope::EmptyArray)?;
        self.peeked = Peeked::None;
        Ok(())
    }

    /// Consumes a `]`.
    pub fn end_array(&mut self) -> Result<()> {
        self.expect(Peeked::EndArray, "END_ARRAY")?;
        self.scopes.pop();
        self.after_value_consumed();
        Ok(())
    }

    /// Reads the next object name.
    pub fn next_name(&mut self) -> Result<Arc<str>> {
        let peeked = self.ensure_peeked()?;
        if !peeked.is_name() {
            return Err(self.err(DataError::UnexpectedToken {
                expected: "NAME",
                actual: token_name(peeked),
            }));
        }
        let name = self.finish_name_or_string(peeked)?;
        let name: Arc<str> = Arc::from(name.as_str());
        self.scopes.set_name(name.clone());
        self.scopes.set_top(Scope::DanglingName);
        self.peeked = Peeked::None;
        Ok(name)
    }

    /// Skips the next object name without returning it. Records the
    /// literal path component `"null"`.
    pub fn skip_name(&mut self) -> Result<()> {
        if self.options.fail_on_unknown {
            return Err(self.err(DataError::FailedOnUnknown { what: "a name" }));
        }
        let peeked = self.ensure_peeked()?;
        if !peeked.is_name() {
            return Err(self.err(DataError::UnexpectedToken {
                expected: "NAME",
                actual: token_name(peeked),
            }));
        }
        self.finish_name_or_string(peeked)?;
        self.scopes.stamp_null_name();
        self.scopes.set_top(Scope::DanglingName);
        self.peeked = Peeked::None;
        Ok(())
    }

    /// Attempts to match the next name against `options` (pre-encoded, each
    /// ending in its own terminator byte) without raising on a miss (spec
    /// §4.D, §7).
    pub fn select_name(&mut self, options: &[&[u8]]) -> Result<Option<usize>> {
        self.select_name_or_string(options, true)
    }

    /// Attempts to match the next string value against `options` without
    /// raising on a miss.
    pub fn select_string(&mut self, options: &[&[u8]]) -> Result<Option<usize>> {
        self.select_name_or_string(options, false)
    }

    /// Reads the next string value. Also accepts a peeked number,
    /// matching Moshi's leniency: scalar tokens other than booleans coerce
    /// to their textual form when a string is asked for.
    pub fn next_string(&mut self) -> Result<String> {
        let peeked = self.ensure_peeked()?;
        let s = match peeked {
            Peeked::SingleQuoted | Peeked::DoubleQuoted | Peeked::Unquoted | Peeked::Buffered => {
                self.finish_name_or_string(peeked)?
            }
            Peeked::Long | Peeked::Number => match self.take_number()? {
                NumberToken::Long(v) => {
                    self.after_value_consumed();
                    return Ok(format!("{v}"));
                }
                NumberToken::Text(t) => {
                    self.after_value_consumed();
                    return Ok(t);
                }
            },
            _ => {
                return Err(self.err(DataError::UnexpectedToken {
                    expected: "STRING",
                    actual: token_name(peeked),
                }));
            }
        };
        self.after_value_consumed();
        Ok(s)
    }

    /// Consumes a boolean literal.
    pub fn next_boolean(&mut self) -> Result<bool> {
        let peeked = self.ensure_peeked()?;
        let value = match peeked {
            Peeked::True => true,
            Peeked::False => false,
            _ => {
                return Err(self.err(DataError::UnexpectedToken {
                    expected: "BOOLEAN",
                    actual: token_name(peeked),
                }));
            }
        };
        self.after_value_consumed();
        Ok(value)
    }

    /// Consumes a `null` literal.
    pub fn next_null(&mut self) -> Result<()> {
        self.expect(Peeked::Null, "NULL")?;
        self.after_value_consumed();
        Ok(())
    }

    fn take_number(&mut self) -> Result<NumberToken> {
        let peeked = self.ensure_peeked()?;
        match peeked {
            Peeked::Long => {
                let v = self.ancillary.peeked_long;
                self.finish_number_literal()?;
                Ok(NumberToken::Long(v))
            }
            Peeked::Number => Ok(NumberToken::Text(self.finish_number_literal()?)),
            _ => Err(self.err(DataError::UnexpectedToken {
                expected: "NUMBER",
                actual: token_name(peeked),
            })),
        }
    }

    /// Consumes a number and narrows it to `i64`.
    pub fn next_long(&mut self) -> Result<i64> {
        let token = self.take_number()?;
        let value = match token {
            NumberToken::Long(v) => Ok(v),
            NumberToken::Text(ref literal) => literal.parse::<i64>().map_err(|_| {
                self.err(DataError::LongOverflow {
                    literal: literal.clone(),
                })
            }),
        };
        self.after_value_consumed();
        value
    }

    /// Consumes a number and narrows it to `i32`.
    pub fn next_int(&mut self) -> Result<i32> {
        let token = self.take_number()?;
        let value = match token {
            NumberToken::Long(v) => i32::try_from(v).map_err(|_| {
                self.err(DataError::IntOverflow {
                    literal: format!("{v}"),
                })
            }),
            NumberToken::Text(ref literal) => literal
                .parse::<i64>()
                .ok()
                .and_then(|v| i32::try_from(v).ok())
                .or_else(|| {
                    literal
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|d| d.fract() == 0.0 && *d >= f64::from(i32::MIN) && *d <= f64::from(i32::MAX))
                        .map(|d| d as i32)
                })
                .ok_or_else(|| {
                    self.err(DataError::IntOverflow {
                        literal: literal.clone(),
                    })
                }),
        };
        self.after_value_consumed();
        value
    }

    /// Consumes a number as `f64`. Rejects NaN/±∞ unless lenient.
    pub fn next_double(&mut self) -> Result<f64> {
        let peeked = self.ensure_peeked()?;
        let literal = match peeked {
            Peeked::Long | Peeked::Number => match self.take_number()? {
                NumberToken::Long(v) => {
                    self.after_value_consumed();
                    return Ok(v as f64);
                }
                NumberToken::Text(t) => t,
            },
            Peeked::SingleQuoted | Peeked::DoubleQuoted | Peeked::Unquoted | Peeked::Buffered => {
                self.finish_name_or_string(peeked)?
            }
            _ => {
                return Err(self.err(DataError::UnexpectedToken {
                    expected: "NUMBER",
                    actual: token_name(peeked),
                }));
            }
        };
        let value: f64 = literal.trim().parse().map_err(|_| {
            self.err(DataError::NotADouble {
                literal: literal.clone(),
            })
        })?;
        if (value.is_nan() || value.is_infinite()) && !self.options.lenient {
            return Err(self.err(DataError::NonFiniteDouble { literal }));
        }
        self.after_value_consumed();
        Ok(value)
    }

    /// Skips the next value, however deeply nested.
    pub fn skip_value(&mut self) -> Result<()> {
        if self.options.fail_on_unknown {
            return Err(self.err(DataError::FailedOnUnknown { what: "a value" }));
        }
        let mut depth: i64 = 0;
        loop {
            let peeked = self.ensure_peeked()?;
            match peeked {
                Peeked::BeginArray => {
                    self.scopes.push(Scope::EmptyArray)?;
                    self.peeked = Peeked::None;
                    depth += 1;
                }
                Peeked::BeginObject => {
                    self.scopes.push(Scope::EmptyObject)?;
                    self.peeked = Peeked::None;
                    depth += 1;
                }
                Peeked::EndArray | Peeked::EndObject => {
                    self.scopes.pop();
                    self.scopes.increment_index();
                    self.peeked = Peeked::None;
                    depth -= 1;
                }
                _ if peeked.is_name() => {
                    self.finish_name_or_string(peeked)?;
                    self.scopes.stamp_null_name();
                    self.scopes.set_top(Scope::DanglingName);
                    self.peeked = Peeked::None;
                }
                Peeked::Long | Peeked::Number => {
                    self.finish_number_literal()?;
                    self.scopes.increment_index();
                    self.peeked = Peeked::None;
                }
                _ => {
                    self.finish_name_or_string(peeked)?;
                    self.scopes.increment_index();
                    self.peeked = Peeked::None;
                }
            }
            if depth == 0 {
                break;
            }
        }
        self.scopes.set_top(promote_document_scope(self.scopes.top()));
        Ok(())
    }

    /// Re-classifies a pending object name as a plain value token of the
    /// same quoting flavor, for decoding
    /// objects as maps whose key type is not a string.
    pub fn promote_name_to_value(&mut self) -> Result<()> {
        let peeked = self.ensure_peeked()?;
        if !peeked.is_name() {
            return Err(self.err(DataError::UnexpectedToken {
                expected: "NAME",
                actual: token_name(peeked),
            }));
        }
        self.peeked = peeked.demote_to_value();
        self.promoted_name_pending = true;
        Ok(())
    }

    /// A cheap, non-mutating forward scan: classifies the
    /// next non-separator byte as `Other`, `Null`, or `String` without
    /// validating the rest of a `null` literal. Does not mutate `peek`.
    pub fn peek_dry_run(&mut self) -> Result<DryRunKind> {
        self.check_open()?;
        let mut i = 0usize;
        loop {
            if !self
                .source
                .request(i + 1)
                .map_err(|e| self.source_err(e))?
            {
                return Ok(DryRunKind::Other);
            }
            let b = self.source.get(i);
            if matches!(b, b':' | b',' | b'\n' | b' ' | b'\r' | b'\t') {
                i += 1;
                continue;
            }
            return Ok(match b {
                b'"' => DryRunKind::String,
                b'n' | b'N' => DryRunKind::Null,
                _ => DryRunKind::Other,
            });
        }
    }

    /// Whether the next value, without mutating state, appears to be `null`
    ///.
    pub fn next_value_is_null_dry_run(&mut self) -> Result<bool> {
        Ok(self.peek_dry_run()? == DryRunKind::Null)
    }

    /// Returns an independent deep-copy reader positioned at the same
    /// logical offset: the scope/path stacks and
    /// peek state are snapshotted, and the byte source is forked so the
    /// copy shares the already-buffered prefix without sharing a cursor.
    /// Subsequent operations on the copy never affect `self`.
    #[must_use]
    pub fn peek_json(&self) -> Self {
        Self {
            source: self.source.fork(),
            scopes: self.scopes.clone(),
            peeked: self.peeked,
            ancillary: self.ancillary.clone(),
            options: self.options,
            closed: self.closed,
            unicode_escape: UnicodeEscapeBuffer::new(),
            pending_value_source: self.pending_value_source,
            promoted_name_pending: self.promoted_name_pending,
            vs_state: self.vs_state,
            vs_prefix: self.vs_prefix.clone(),
            vs_prefix_pos: self.vs_prefix_pos,
            vs_depth: self.vs_depth,
            vs_return_to_json: self.vs_return_to_json,
            vs_pending: self.vs_pending,
        }
    }

    /// Closes the reader. Fails if a value source is still open (spec
    /// §4.E, §7).
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        if self.pending_value_source {
            return Err(self.err(StateError::ValueSourceOpen));
        }
        self.source.close().map_err(|e| self.source_err(e))?;
        self.closed = true;
        self.scopes.set_top(Scope::Closed);
        Ok(())
    }
}

/// Result of [`JsonReader::peek_dry_run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DryRunKind {
    Other,
    Null,
    String,
}

pub(crate) fn token_name(peeked: Peeked) -> &'static str {
    match peeked {
        Peeked::None => "NONE",
        Peeked::Eof => "END_DOCUMENT",
        Peeked::BeginObject => "BEGIN_OBJECT",
        Peeked::EndObject => "END_OBJECT",
        Peeked::BeginArray => "BEGIN_ARRAY",
        Peeked::EndArray => "END_ARRAY",
        Peeked::True | Peeked::False => "BOOLEAN",
        Peeked::Null => "NULL",
        Peeked::SingleQuoted | Peeked::DoubleQuoted | Peeked::Unquoted | Peeked::Buffered => {
            "STRING"
        }
        Peeked::SingleQuotedName
        | Peeked::DoubleQuotedName
        | Peeked::UnquotedName
        | Peeked::BufferedName => "NAME",
        Peeked::Long | Peeked::Number => "NUMBER",
    }
}

/// After consuming a scalar, the enclosing scope's "have I seen a first
/// element yet" flag flips so the next `doPeek` requires a separator before
/// the following one. Object scopes handle
/// this transition explicitly at the colon (`scanner.rs`'s `DanglingName`
/// arm), since an object's first member is read through `scanName` rather
/// than `scanValue`; arrays and the top-level document have no such
/// intermediate step, so it happens here instead.
pub(crate) fn promote_document_scope(scope: Scope) -> Scope {
    match scope {
        Scope::EmptyDocument => Scope::NonemptyDocument,
        Scope::EmptyArray => Scope::NonemptyArray,
        other => other,
    }
}
