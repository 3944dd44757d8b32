//! Passthrough routing — `streamValue`/`readValue` and
//! `streamDoubleQuotedStringUnescape`.
//!
//! Both reuse the scanner exactly as ordinary structured decoding does; the
//! only difference is that every byte the scanner would otherwise discard
//! is routed to a caller-supplied sink instead, so the copied bytes are
//! byte-identical to the input.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::byte_source::{Blackhole, ByteSource, Sink};
use crate::error::{DataError, Result};
use crate::path::Scope;
use crate::peek::Peeked;
use crate::reader::{token_name, JsonReader};

/// A byte sink that passthrough output is written to.
///
/// The sibling JSON *writer* a caller might be feeding is treated as an
/// external collaborator out of scope for this crate; only the narrow
/// byte-sink part of that contract is needed, so it is modeled as a small
/// trait rather than a dependency on a concrete writer type. `Vec<u8>` and
/// `String` (which validates the written bytes are UTF-8) implement it out
/// of the box.
pub trait ValueSink {
    /// Appends `bytes` to the sink.
    fn write_bytes(&mut self, bytes: &[u8]);
}

impl ValueSink for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl ValueSink for String {
    fn write_bytes(&mut self, bytes: &[u8]) {
        debug_assert!(core::str::from_utf8(bytes).is_ok());
        self.push_str(unsafe { core::str::from_utf8_unchecked(bytes) });
    }
}

/// A [`ValueSink`] that also gets a "before value" hook invoked once,
/// before the first byte of the streamed value is written — standing in
/// for the sibling JSON writer's own hook in a `streamValue(writer)`
/// variant.
pub trait ValueWriter: ValueSink {
    /// Called once, immediately before the first byte of the streamed
    /// value would be written, so the writer can insert separators or
    /// indentation per its own pretty-printing state.
    fn before_value(&mut self);
}

/// Adapts a `&mut dyn ValueSink` to the crate-internal [`Sink`] trait the
/// scanner already knows how to write through.
struct ExternalSink<'a>(&'a mut dyn ValueSink);

impl Sink for ExternalSink<'_> {
    fn write(&mut self, bytes: &[u8]) {
        self.0.write_bytes(bytes);
    }
}

impl<S: ByteSource> JsonReader<S> {
    /// Copies the next full JSON value — however deeply nested — into
    /// `sink`, byte-identical to the input, including whitespace and
    /// comments between its inner tokens once past its opening structural
    /// byte.
    pub fn stream_value(&mut self, sink: &mut dyn ValueSink) -> Result<()> {
        self.check_open()?;
        self.drain_pending_value_source()?;
        let mut adapter = ExternalSink(sink);
        self.stream_value_raw(&mut adapter)
    }

    /// `streamValue(jsonWriter)`: as [`Self::stream_value`], but
    /// invokes `writer.before_value()` once first so an adjacent pretty
    /// printer can insert its own separators.
    pub fn stream_value_with_writer<W: ValueWriter>(&mut self, writer: &mut W) -> Result<()> {
        self.check_open()?;
        self.drain_pending_value_source()?;
        writer.before_value();
        let mut adapter = ExternalSink(writer);
        self.stream_value_raw(&mut adapter)
    }

    /// Shared implementation: mirrors `skip_value`'s depth-tracked traversal,
    /// but copies every consumed byte to `sink` instead of discarding it,
    /// and writes only the leading token at depth 0 (so whitespace/comments
    /// *before* the value are excluded, while those *inside* a container are
    /// included).
    pub(crate) fn stream_value_raw(&mut self, sink: &mut dyn Sink) -> Result<()> {
        let mut depth: i64 = 0;
        let mut first = true;
        loop {
            let peeked = if first {
                let p = if self.peeked == Peeked::None {
                    let mut blackhole = Blackhole;
                    self.do_peek(&mut blackhole, false)?
                } else {
                    self.peeked
                };
                let is_value_start = matches!(
                    p,
                    Peeked::BeginArray
                        | Peeked::BeginObject
                        | Peeked::True
                        | Peeked::False
                        | Peeked::Null
                        | Peeked::Long
                        | Peeked::Number
                        | Peeked::SingleQuoted
                        | Peeked::DoubleQuoted
                        | Peeked::Unquoted
                        | Peeked::Buffered
                );
                if !is_value_start {
                    return Err(self.err(DataError::UnexpectedToken {
                        expected: "a value",
                        actual: token_name(p),
                    }));
                }
                self.emit_already_consumed_prefix(p, sink);
                first = false;
                p
            } else {
                debug_assert!(self.peeked == Peeked::None);
                self.do_peek(sink, false)?
            };
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
                    self.copy_scalar_raw(peeked, sink)?;
                    self.scopes.stamp_null_name();
                    self.scopes.set_top(Scope::DanglingName);
                    self.peeked = Peeked::None;
                }
                _ => {
                    self.copy_scalar_raw(peeked, sink)?;
                    self.scopes.increment_index();
                    self.peeked = Peeked::None;
                }
            }
            if depth == 0 {
                break;
            }
        }
        self.scopes
            .set_top(crate::reader::promote_document_scope(self.scopes.top()));
        Ok(())
    }

    /// Writes the bytes a *previously cached* peek token already consumed
    /// from the source: this only matters when the caller called a plain
    /// `peek()` before deciding to stream, so `doPeek` ran with the
    /// blackhole sink and those bytes would otherwise be lost. Numbers and
    /// unquoted literals are classified without consuming, so they need no
    /// special handling here — `copy_scalar_raw` reads their body fresh
    /// either way.
    fn emit_already_consumed_prefix(&mut self, peeked: Peeked, sink: &mut dyn Sink) {
        match peeked {
            Peeked::BeginObject => sink.write(b"{"),
            Peeked::EndObject => sink.write(b"}"),
            Peeked::BeginArray => sink.write(b"["),
            Peeked::EndArray => sink.write(b"]"),
            Peeked::DoubleQuoted | Peeked::DoubleQuotedName => sink.write(b"\""),
            Peeked::SingleQuoted | Peeked::SingleQuotedName => sink.write(b"'"),
            Peeked::True => {
                let bytes = self.ancillary.raw_keyword.take();
                sink.write(bytes.as_deref().unwrap_or(b"true"));
            }
            Peeked::False => {
                let bytes = self.ancillary.raw_keyword.take();
                sink.write(bytes.as_deref().unwrap_or(b"false"));
            }
            Peeked::Null => {
                let bytes = self.ancillary.raw_keyword.take();
                sink.write(bytes.as_deref().unwrap_or(b"null"));
            }
            _ => {}
        }
    }

    /// `streamDoubleQuotedStringUnescape`: writes the opening `"`, the
    /// *decoded* string content (escapes resolved, surrogate pairs
    /// combined), and the closing `"` — a canonical quoted form rather than
    /// a byte-identical copy.
    pub fn stream_double_quoted_string_unescape(&mut self, sink: &mut dyn ValueSink) -> Result<()> {
        let peeked = self.ensure_peeked()?;
        if !matches!(peeked, Peeked::DoubleQuoted | Peeked::DoubleQuotedName) {
            return Err(self.err(DataError::UnexpectedToken {
                expected: "a double-quoted string",
                actual: token_name(peeked),
            }));
        }
        let mut adapter = ExternalSink(sink);
        adapter.write(b"\"");
        let mut decoded = String::new();
        self.scan_quoted_string_into(b'"', &mut decoded)?;
        adapter.write(decoded.as_bytes());
        adapter.write(b"\"");
        if peeked.is_name() {
            self.scopes.set_name(Arc::from(decoded.as_str()));
            self.scopes.set_top(Scope::DanglingName);
            self.peeked = Peeked::None;
        } else {
            self.after_value_consumed();
        }
        Ok(())
    }
}
