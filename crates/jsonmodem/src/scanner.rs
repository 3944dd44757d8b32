//! Lexical Scanner — classifies the next token (`doPeek`) and,
//! for tokens whose length can't be known from a single byte, performs the
//! deferred consumption a terminal reader op asks for afterwards.
//!
//! Structural single-byte tokens, opening quotes, and fully-matched
//! keywords are consumed immediately, as soon as `doPeek` recognizes them.
//! Numbers and unquoted literals are only classified here — `get`/`request`
//! look-ahead only, no `skip`/`read_utf8` — and actually consumed later by
//! `finish_number_literal`/`finish_name_or_string`, mirroring how
//! `JsonUtf8Reader.peekNumber()` defers consumption in the system this
//! reader's protocol is modeled on.

use alloc::string::String;
use alloc::sync::Arc;

use crate::byte_source::{ByteSource, Sink};
use crate::error::{DataError, SyntaxError};
use crate::escape;
use crate::literal::Keyword;
use crate::path::Scope;
use crate::peek::Peeked;
use crate::reader::{token_name, JsonReader};

/// Bytes that end an unquoted literal or number.
fn is_literal_terminator(b: u8) -> bool {
    matches!(
        b,
        b'{' | b'}' | b'[' | b']' | b':' | b',' | b';' | b'=' | b'"' | b'\'' | b'/' | b'#'
    ) || b.is_ascii_whitespace()
}

/// Bytes `isLiteral` only admits into a literal in lenient mode (spec.md
/// §4.D): `;`, `=`, `/`, `#` double as comma/colon/comment punctuation, so in
/// strict mode hitting one where a value or name was expected means the
/// caller needs lenient mode, not that the byte is structurally illegal.
fn is_lenient_extension_byte(b: u8) -> bool {
    matches!(b, b';' | b'=' | b'/' | b'#')
}

/// Strips `select`'s trailing terminator byte (e.g. the closing `"`) off a
/// precomputed option, yielding the plain text it stands for.
fn option_text(opt: &[u8]) -> &str {
    opt.get(..opt.len().saturating_sub(1))
        .and_then(|b| core::str::from_utf8(b).ok())
        .unwrap_or_default()
}

/// UTF-8 sequence length implied by a leading byte.
fn utf8_len(lead: u8) -> usize {
    if lead & 0x80 == 0 {
        1
    } else if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else {
        4
    }
}

impl<S: ByteSource> JsonReader<S> {
    /// Classifies the next token, consuming structural bytes, opening
    /// quotes, and fully-matched keywords as it goes; numbers and unquoted
    /// literals are classified only.
    pub(crate) fn do_peek(&mut self, sink: &mut dyn Sink, _in_value_source: bool) -> Result<Peeked, crate::error::JsonError> {
        self.skip_whitespace_and_comments(sink)?;
        match self.scopes.top() {
            Scope::Closed => Err(self.err(crate::error::StateError::Closed)),
            Scope::StreamingValue => Err(self.err(crate::error::StateError::NotAValue)),
            Scope::EmptyDocument => {
                if !self.has_more_input()? {
                    return Ok(Peeked::Eof);
                }
                self.scan_value(sink)
            }
            Scope::NonemptyDocument => {
                if !self.has_more_input()? {
                    return Ok(Peeked::Eof);
                }
                if !self.options.lenient {
                    let b = self.peek_byte(0)?.unwrap();
                    return Err(self.err(SyntaxError::UnexpectedByte(b)));
                }
                self.scan_value(sink)
            }
            Scope::EmptyObject => {
                if self.peek_byte(0)? == Some(b'}') {
                    self.consume_and_sink(1, sink)?;
                    return Ok(Peeked::EndObject);
                }
                self.scan_name(sink)
            }
            Scope::NonemptyObject => match self.peek_byte(0)? {
                Some(b'}') => {
                    self.consume_and_sink(1, sink)?;
                    Ok(Peeked::EndObject)
                }
                Some(b',') => {
                    self.consume_and_sink(1, sink)?;
                    self.skip_whitespace_and_comments(sink)?;
                    self.scan_name(sink)
                }
                Some(b';') if self.options.lenient => {
                    self.consume_and_sink(1, sink)?;
                    self.skip_whitespace_and_comments(sink)?;
                    self.scan_name(sink)
                }
                Some(b';') => Err(self.err(SyntaxError::LenientRequired)),
                Some(b) => Err(self.err(SyntaxError::UnexpectedByte(b))),
                None => Err(self.err(SyntaxError::UnexpectedEndOfInput)),
            },
            Scope::DanglingName => match self.peek_byte(0)? {
                Some(b':') => {
                    self.consume_and_sink(1, sink)?;
                    self.skip_whitespace_and_comments(sink)?;
                    self.scopes.set_top(Scope::NonemptyObject);
                    self.scan_value(sink)
                }
                Some(b'=') if self.options.lenient => {
                    self.consume_and_sink(1, sink)?;
                    if self.peek_byte(0)? == Some(b'>') {
                        self.consume_and_sink(1, sink)?;
                    }
                    self.skip_whitespace_and_comments(sink)?;
                    self.scopes.set_top(Scope::NonemptyObject);
                    self.scan_value(sink)
                }
                _ => Err(self.err(SyntaxError::ExpectedColon)),
            },
            Scope::EmptyArray => {
                match self.peek_byte(0)? {
                    Some(b']') => {
                        self.consume_and_sink(1, sink)?;
                        return Ok(Peeked::EndArray);
                    }
                    // A leading `,`/`;` (lenient) means the element before it
                    // was omitted; it stays unconsumed so the following
                    // `NonemptyArray` peek can still use it as the separator
                    // ahead of the next element.
                    Some(b',' | b';') if self.options.lenient => return Ok(Peeked::Null),
                    _ => {}
                }
                self.scan_value(sink)
            }
            Scope::NonemptyArray => match self.peek_byte(0)? {
                Some(b']') => {
                    self.consume_and_sink(1, sink)?;
                    Ok(Peeked::EndArray)
                }
                Some(b @ (b',' | b';')) if b == b',' || self.options.lenient => {
                    self.consume_and_sink(1, sink)?;
                    self.skip_whitespace_and_comments(sink)?;
                    match self.peek_byte(0)? {
                        Some(b']' | b',' | b';') if self.options.lenient => Ok(Peeked::Null),
                        _ => self.scan_value(sink),
                    }
                }
                Some(b';') => Err(self.err(SyntaxError::LenientRequired)),
                Some(b) => Err(self.err(SyntaxError::UnexpectedByte(b))),
                None => Err(self.err(SyntaxError::UnexpectedEndOfInput)),
            },
        }
    }

    fn has_more_input(&mut self) -> Result<bool, crate::error::JsonError> {
        self.source.request(1).map_err(|e| self.source_err(e))
    }

    fn peek_byte(&mut self, offset: usize) -> Result<Option<u8>, crate::error::JsonError> {
        if self
            .source
            .request(offset + 1)
            .map_err(|e| self.source_err(e))?
        {
            Ok(Some(self.source.get(offset)))
        } else {
            Ok(None)
        }
    }

    fn consume_and_sink(&mut self, n: usize, sink: &mut dyn Sink) -> Result<(), crate::error::JsonError> {
        for _ in 0..n {
            let b = self.source.read_byte().map_err(|e| self.source_err(e))?;
            sink.write(&[b]);
        }
        Ok(())
    }

    /// Like `consume_and_sink`, but also returns the consumed bytes — used
    /// only for keywords, whose case-insensitive match means the
    /// literal bytes on the wire can't be reconstructed from the token kind
    /// alone once a later passthrough operation wants to replay them.
    fn consume_and_capture(
        &mut self,
        n: usize,
        sink: &mut dyn Sink,
    ) -> Result<alloc::vec::Vec<u8>, crate::error::JsonError> {
        let mut bytes = alloc::vec::Vec::with_capacity(n);
        for _ in 0..n {
            let b = self.source.read_byte().map_err(|e| self.source_err(e))?;
            sink.write(&[b]);
            bytes.push(b);
        }
        Ok(bytes)
    }

    pub(crate) fn skip_whitespace_and_comments(&mut self, sink: &mut dyn Sink) -> Result<(), crate::error::JsonError> {
        loop {
            match self.peek_byte(0)? {
                Some(b) if b.is_ascii_whitespace() => {
                    self.consume_and_sink(1, sink)?;
                }
                Some(b'#') if self.options.lenient => self.skip_line_comment(sink)?,
                Some(b'/') if self.options.lenient && self.peek_byte(1)? == Some(b'/') => {
                    self.skip_line_comment(sink)?;
                }
                Some(b'/') if self.options.lenient && self.peek_byte(1)? == Some(b'*') => {
                    self.consume_and_sink(2, sink)?;
                    loop {
                        match self.peek_byte(0)? {
                            None => return Err(self.err(SyntaxError::UnterminatedComment)),
                            Some(b'*') if self.peek_byte(1)? == Some(b'/') => {
                                self.consume_and_sink(2, sink)?;
                                break;
                            }
                            Some(_) => {
                                self.consume_and_sink(1, sink)?;
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_line_comment(&mut self, sink: &mut dyn Sink) -> Result<(), crate::error::JsonError> {
        loop {
            match self.peek_byte(0)? {
                None | Some(b'\n') => return Ok(()),
                Some(_) => {
                    self.consume_and_sink(1, sink)?;
                }
            }
        }
    }

    fn scan_name(&mut self, sink: &mut dyn Sink) -> Result<Peeked, crate::error::JsonError> {
        match self.peek_byte(0)? {
            Some(b'"') => {
                self.consume_and_sink(1, sink)?;
                Ok(Peeked::DoubleQuotedName)
            }
            Some(b'\'') if self.options.lenient => {
                self.consume_and_sink(1, sink)?;
                Ok(Peeked::SingleQuotedName)
            }
            Some(b'\'') => Err(self.err(SyntaxError::LenientRequired)),
            Some(b) if self.options.lenient && !is_literal_terminator(b) => Ok(Peeked::UnquotedName),
            Some(b) if !is_literal_terminator(b) || is_lenient_extension_byte(b) => {
                Err(self.err(SyntaxError::LenientRequired))
            }
            Some(b) => Err(self.err(SyntaxError::UnexpectedByte(b))),
            None => Err(self.err(SyntaxError::ExpectedName)),
        }
    }

    fn scan_value(&mut self, sink: &mut dyn Sink) -> Result<Peeked, crate::error::JsonError> {
        let Some(b) = self.peek_byte(0)? else {
            return Err(self.err(SyntaxError::UnexpectedEndOfInput));
        };
        match b {
            b'{' => {
                self.consume_and_sink(1, sink)?;
                Ok(Peeked::BeginObject)
            }
            b'[' => {
                self.consume_and_sink(1, sink)?;
                Ok(Peeked::BeginArray)
            }
            b'"' => {
                self.consume_and_sink(1, sink)?;
                Ok(Peeked::DoubleQuoted)
            }
            b'\'' if self.options.lenient => {
                self.consume_and_sink(1, sink)?;
                Ok(Peeked::SingleQuoted)
            }
            b'\'' => Err(self.err(SyntaxError::LenientRequired)),
            b'-' | b'+' | b'.' | b'0'..=b'9' => self.scan_number(b),
            _ => {
                if let Some(kw) = Keyword::from_first_byte(b) {
                    let len = kw.len();
                    if self.source.request(len).map_err(|e| self.source_err(e))? {
                        let mut tail = [0_u8; 8];
                        for (i, slot) in tail[..len - 1].iter_mut().enumerate() {
                            *slot = self.source.get(i + 1);
                        }
                        let terminated = self
                            .peek_byte(len)?
                            .is_none_or(is_literal_terminator);
                        if kw.matches_tail(&tail[..len - 1]) && terminated {
                            let raw = self.consume_and_capture(len, sink)?;
                            self.ancillary.raw_keyword = Some(raw);
                            return Ok(match kw {
                                Keyword::True => Peeked::True,
                                Keyword::False => Peeked::False,
                                Keyword::Null => Peeked::Null,
                            });
                        }
                    }
                }
                if self.options.lenient && !is_literal_terminator(b) {
                    return Ok(Peeked::Unquoted);
                }
                if !self.options.lenient && (!is_literal_terminator(b) || is_lenient_extension_byte(b)) {
                    return Err(self.err(SyntaxError::LenientRequired));
                }
                if is_literal_terminator(b) {
                    Err(self.err(SyntaxError::ExpectedValue))
                } else {
                    Err(self.err(SyntaxError::UnexpectedByte(b)))
                }
            }
        }
    }

    /// Classifies a number without consuming it. Picks `Peeked::Long` with a precomputed value when the
    /// literal is a plain, in-range integer; falls back to `Peeked::Number`
    /// (consumed and parsed later as text) for floats, overflow, and the
    /// lenient `NaN`/`Infinity` literals.
    fn scan_number(&mut self, first: u8) -> Result<Peeked, crate::error::JsonError> {
        let mut i = 0usize;
        let negative = first == b'-';
        if first == b'-' || first == b'+' {
            i += 1;
        }

        if self.options.lenient {
            if let Some(len) = self.match_ahead(i, b"NaN") {
                self.ancillary.number_length = i + len;
                return Ok(Peeked::Number);
            }
            if let Some(len) = self.match_ahead(i, b"Infinity") {
                self.ancillary.number_length = i + len;
                return Ok(Peeked::Number);
            }
        }

        let int_start = i;
        let mut overflow = false;
        // Accumulate negatively (0, then subtract each digit) so that
        // `i64::MIN`'s magnitude — one past `i64::MAX` — is representable
        // during the walk; only the final sign is resolved afterwards.
        let mut value: i64 = 0;
        loop {
            let Some(b) = self.peek_byte(i)? else { break };
            if !b.is_ascii_digit() {
                break;
            }
            let digit = i64::from(b - b'0');
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_sub(digit))
                .unwrap_or_else(|| {
                    overflow = true;
                    0
                });
            i += 1;
        }
        let digit_count = i - int_start;
        if digit_count == 0 {
            if self.options.lenient && self.peek_byte(i)? == Some(b'.') {
                // leading-dot literal, e.g. ".5"
            } else {
                return Err(self.err(SyntaxError::MalformedNumber));
            }
        }
        let leading_zero_issue =
            digit_count > 1 && self.peek_byte(int_start)? == Some(b'0');
        if leading_zero_issue && !self.options.lenient {
            return Err(self.err(SyntaxError::MalformedNumber));
        }

        let mut is_float = false;
        if self.peek_byte(i)? == Some(b'.') {
            is_float = true;
            i += 1;
            let frac_start = i;
            loop {
                let Some(b) = self.peek_byte(i)? else { break };
                if !b.is_ascii_digit() {
                    break;
                }
                i += 1;
            }
            if i == frac_start {
                return Err(self.err(SyntaxError::MalformedNumber));
            }
        }
        if matches!(self.peek_byte(i)?, Some(b'e' | b'E')) {
            is_float = true;
            i += 1;
            if matches!(self.peek_byte(i)?, Some(b'+' | b'-')) {
                i += 1;
            }
            let exp_start = i;
            loop {
                let Some(b) = self.peek_byte(i)? else { break };
                if !b.is_ascii_digit() {
                    break;
                }
                i += 1;
            }
            if i == exp_start {
                return Err(self.err(SyntaxError::MalformedNumber));
            }
        }

        if !self
            .peek_byte(i)?
            .is_none_or(is_literal_terminator)
        {
            return Err(self.err(SyntaxError::MalformedNumber));
        }

        self.ancillary.number_length = i;
        // "-0" must classify as NUMBER, not LONG (spec.md §8): the negative
        // accumulation above yields 0 either way, so the sign bit is the
        // only witness that the literal actually had a leading '-'.
        let negative_zero = negative && digit_count == 1 && value == 0;
        if is_float || leading_zero_issue || overflow || negative_zero {
            return Ok(Peeked::Number);
        }
        if negative {
            // `value` is already the negative accumulation; this is the
            // literal's true signed value, including `i64::MIN`.
            self.ancillary.peeked_long = value;
            Ok(Peeked::Long)
        } else {
            // A positive literal's magnitude can be negated as long as it
            // doesn't exceed `i64::MAX`; `i64::MIN`'s magnitude (one past
            // `i64::MAX`) has no positive representation and falls back to
            // `Peeked::Number`, matching spec.md §8's `"9223372036854775808"`
            // case.
            match value.checked_neg() {
                Some(v) => {
                    self.ancillary.peeked_long = v;
                    Ok(Peeked::Long)
                }
                None => Ok(Peeked::Number),
            }
        }
    }

    /// Matches `literal` (ASCII, case-sensitive) starting at buffered
    /// offset `at`, requiring the byte that follows to be a literal
    /// terminator or EOF. Returns the matched length (`at` plus
    /// `literal.len()`) on success.
    fn match_ahead(&mut self, at: usize, literal: &[u8]) -> Option<usize> {
        self.source.request(at + literal.len()).ok()?;
        if self.source.buffered_len() < at + literal.len() {
            return None;
        }
        for (i, &want) in literal.iter().enumerate() {
            if self.source.get(at + i) != want {
                return None;
            }
        }
        let after = at + literal.len();
        let terminated = match self.source.request(after + 1) {
            Ok(more) => !more || is_literal_terminator(self.source.get(after)),
            Err(_) => true,
        };
        terminated.then_some(literal.len())
    }

    /// Consumes the number literal already classified by `scan_number` and
    /// returns its textual form.
    pub(crate) fn finish_number_literal(&mut self) -> Result<String, crate::error::JsonError> {
        let len = self.ancillary.number_length;
        self.source.read_utf8(len).map_err(|e| self.source_err(e))
    }

    /// Consumes and decodes the name or string already classified as
    /// `peeked`.
    pub(crate) fn finish_name_or_string(&mut self, peeked: Peeked) -> Result<String, crate::error::JsonError> {
        match peeked {
            Peeked::DoubleQuoted | Peeked::DoubleQuotedName => self.scan_quoted_string(b'"'),
            Peeked::SingleQuoted | Peeked::SingleQuotedName => self.scan_quoted_string(b'\''),
            Peeked::Unquoted | Peeked::UnquotedName => self.scan_unquoted_string(),
            Peeked::Buffered | Peeked::BufferedName => Ok(self
                .ancillary
                .peeked_string
                .take()
                .unwrap_or_default()),
            _ => Err(self.err(DataError::UnexpectedToken {
                expected: "STRING",
                actual: token_name(peeked),
            })),
        }
    }

    fn scan_quoted_string(&mut self, quote: u8) -> Result<String, crate::error::JsonError> {
        let mut out = String::new();
        self.scan_quoted_string_into(quote, &mut out)?;
        Ok(out)
    }

    /// Decodes a quoted string's remaining content (the opening quote
    /// already consumed) directly into a caller-owned buffer, so a large
    /// passthrough run can extract one embedded string without an
    /// intermediate allocation.
    pub(crate) fn scan_quoted_string_into(
        &mut self,
        quote: u8,
        out: &mut String,
    ) -> Result<(), crate::error::JsonError> {
        loop {
            if !self.source.request(1).map_err(|e| self.source_err(e))? {
                return Err(self.err(SyntaxError::UnterminatedString));
            }
            let b = self.source.get(0);
            if b == quote {
                self.source.skip(1).map_err(|e| self.source_err(e))?;
                return Ok(());
            }
            if b == b'\\' {
                self.source.skip(1).map_err(|e| self.source_err(e))?;
                self.scan_escape_into(out)?;
                continue;
            }
            if b < 0x80 {
                self.source.skip(1).map_err(|e| self.source_err(e))?;
                out.push(b as char);
                continue;
            }
            let len = utf8_len(b);
            if !self.source.request(len).map_err(|e| self.source_err(e))? {
                return Err(self.err(SyntaxError::UnterminatedString));
            }
            let s = self.source.read_utf8(len).map_err(|e| self.source_err(e))?;
            out.push_str(&s);
        }
    }

    fn scan_unquoted_string(&mut self) -> Result<String, crate::error::JsonError> {
        let mut out = String::new();
        loop {
            if !self.source.request(1).map_err(|e| self.source_err(e))? {
                break;
            }
            let b = self.source.get(0);
            if is_literal_terminator(b) {
                break;
            }
            if b == b'\\' {
                self.source.skip(1).map_err(|e| self.source_err(e))?;
                self.scan_escape_into(&mut out)?;
                continue;
            }
            if b < 0x80 {
                self.source.skip(1).map_err(|e| self.source_err(e))?;
                out.push(b as char);
                continue;
            }
            let len = utf8_len(b);
            self.source.request(len).map_err(|e| self.source_err(e))?;
            let s = self.source.read_utf8(len).map_err(|e| self.source_err(e))?;
            out.push_str(&s);
        }
        Ok(out)
    }

    /// Decodes one backslash escape (the `\` itself already consumed) into
    /// `out`. Handles the `\uXXXX` high/low surrogate pairing explicitly so
    /// a high surrogate followed by an escape that is *not* its low half is
    /// never silently folded into one replacement character and dropped —
    /// both units are still emitted.
    fn scan_escape_into(&mut self, out: &mut String) -> Result<(), crate::error::JsonError> {
        let b = self.source.read_byte().map_err(|e| self.source_err(e))?;
        match b {
            b'"' => out.push('"'),
            b'\'' => out.push('\''),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{8}'),
            b'f' => out.push('\u{c}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let unit = self.read_unicode_escape_unit()?;
                if escape::high_surrogate(unit).is_some() && self.next_is_unicode_escape()? {
                    self.source.skip(2).map_err(|e| self.source_err(e))?;
                    let second = self.read_unicode_escape_unit()?;
                    if escape::low_surrogate(second).is_some() {
                        escape::encode_escape_unit(unit, Some(second), out);
                    } else {
                        out.push(escape::unit_to_char_lossy(unit));
                        out.push(escape::unit_to_char_lossy(second));
                    }
                } else {
                    out.push(escape::unit_to_char_lossy(unit));
                }
            }
            other => {
                return Err(self.err(SyntaxError::InvalidEscapeCharacter(other as char)));
            }
        }
        Ok(())
    }

    fn read_unicode_escape_unit(&mut self) -> Result<u16, crate::error::JsonError> {
        self.unicode_escape.reset();
        loop {
            let b = self.source.read_byte().map_err(|e| self.source_err(e))?;
            let path = self.path();
            if let Some(unit) = self.unicode_escape.feed(b, &path)? {
                return Ok(unit);
            }
        }
    }

    fn next_is_unicode_escape(&mut self) -> Result<bool, crate::error::JsonError> {
        Ok(self.source.request(2).map_err(|e| self.source_err(e))?
            && self.source.get(0) == b'\\'
            && self.source.get(1) == b'u')
    }

    /// `selectName`/`selectString`: atomically matches the
    /// longest of `options` at the current quoted-token position. A match
    /// consumes it and updates scope/path as the equivalent `next_*` call
    /// would. A miss falls back to a full decode, caching the result so the
    /// next ordinary `next_name`/`next_string` call returns it without
    /// re-reading.
    pub(crate) fn select_name_or_string(
        &mut self,
        options: &[&[u8]],
        is_name: bool,
    ) -> Result<Option<usize>, crate::error::JsonError> {
        let peeked = self.ensure_peeked()?;
        let compatible = if is_name {
            peeked.is_name()
        } else {
            matches!(
                peeked,
                Peeked::SingleQuoted | Peeked::DoubleQuoted | Peeked::Unquoted | Peeked::Buffered
            )
        };
        if !compatible {
            return Err(self.err(DataError::UnexpectedToken {
                expected: if is_name { "NAME" } else { "STRING" },
                actual: token_name(peeked),
            }));
        }
        let quoted = matches!(
            peeked,
            Peeked::DoubleQuoted
                | Peeked::DoubleQuotedName
                | Peeked::SingleQuoted
                | Peeked::SingleQuotedName
        );
        if quoted {
            if let Some(idx) = self.source.select(options).map_err(|e| self.source_err(e))? {
                self.finish_selected(idx, options, is_name);
                return Ok(Some(idx));
            }
        }
        let decoded = self.finish_name_or_string(peeked)?;
        if let Some(idx) = options
            .iter()
            .position(|opt| option_text(opt) == decoded.as_str())
        {
            self.finish_selected(idx, options, is_name);
            return Ok(Some(idx));
        }
        self.ancillary.peeked_string = Some(decoded);
        self.peeked = if is_name {
            Peeked::BufferedName
        } else {
            Peeked::Buffered
        };
        Ok(None)
    }

    /// Copies the scalar token already classified as `peeked` through to
    /// `sink` byte-for-byte, without decoding escapes — the passthrough
    /// router and `nextSource()` both need the
    /// original bytes, not the decoded value `finish_name_or_string` would
    /// produce.
    pub(crate) fn copy_scalar_raw(
        &mut self,
        peeked: Peeked,
        sink: &mut dyn Sink,
    ) -> Result<(), crate::error::JsonError> {
        match peeked {
            Peeked::DoubleQuoted | Peeked::DoubleQuotedName => self.copy_quoted_raw(b'"', sink),
            Peeked::SingleQuoted | Peeked::SingleQuotedName => self.copy_quoted_raw(b'\'', sink),
            Peeked::Unquoted | Peeked::UnquotedName => self.copy_unquoted_raw(sink),
            Peeked::Buffered | Peeked::BufferedName => {
                if let Some(text) = self.ancillary.peeked_string.take() {
                    sink.write(text.as_bytes());
                }
                Ok(())
            }
            Peeked::Long | Peeked::Number => {
                let len = self.ancillary.number_length;
                let text = self.source.read_utf8(len).map_err(|e| self.source_err(e))?;
                sink.write(text.as_bytes());
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn copy_quoted_raw(&mut self, quote: u8, sink: &mut dyn Sink) -> Result<(), crate::error::JsonError> {
        loop {
            if !self.source.request(1).map_err(|e| self.source_err(e))? {
                return Err(self.err(SyntaxError::UnterminatedString));
            }
            let b = self.source.get(0);
            self.source.skip(1).map_err(|e| self.source_err(e))?;
            sink.write(&[b]);
            if b == quote {
                return Ok(());
            }
            if b == b'\\' {
                let esc = self.source.read_byte().map_err(|e| self.source_err(e))?;
                sink.write(&[esc]);
                if esc == b'u' {
                    for _ in 0..4 {
                        let h = self.source.read_byte().map_err(|e| self.source_err(e))?;
                        sink.write(&[h]);
                    }
                }
            }
        }
    }

    fn copy_unquoted_raw(&mut self, sink: &mut dyn Sink) -> Result<(), crate::error::JsonError> {
        loop {
            if !self.source.request(1).map_err(|e| self.source_err(e))? {
                return Ok(());
            }
            let b = self.source.get(0);
            if is_literal_terminator(b) {
                return Ok(());
            }
            self.source.skip(1).map_err(|e| self.source_err(e))?;
            sink.write(&[b]);
        }
    }

    fn finish_selected(&mut self, idx: usize, options: &[&[u8]], is_name: bool) {
        if is_name {
            let text = option_text(options[idx]);
            self.scopes.set_name(Arc::from(text));
            self.scopes.set_top(Scope::DanglingName);
            self.peeked = Peeked::None;
        } else {
            self.scopes.increment_index();
            self.scopes
                .set_top(crate::reader::promote_document_scope(self.scopes.top()));
            self.peeked = Peeked::None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffered::SliceSource;
    use crate::options::ReaderOptions;
    use crate::peek::TokenKind;

    fn reader(input: &str) -> JsonReader<SliceSource> {
        JsonReader::new(SliceSource::new(input.as_bytes()), ReaderOptions::default())
    }

    fn lenient_reader(input: &str) -> JsonReader<SliceSource> {
        JsonReader::new(
            SliceSource::new(input.as_bytes()),
            ReaderOptions {
                lenient: true,
                ..Default::default()
            },
        )
    }

    #[test]
    fn classifies_structural_tokens() {
        let mut r = reader("[1,2]");
        assert_eq!(r.peek().unwrap(), TokenKind::BeginArray);
        r.begin_array().unwrap();
        assert_eq!(r.next_long().unwrap(), 1);
        assert_eq!(r.next_long().unwrap(), 2);
        assert_eq!(r.peek().unwrap(), TokenKind::EndArray);
        r.end_array().unwrap();
        assert_eq!(r.peek().unwrap(), TokenKind::EndDocument);
    }

    #[test]
    fn decodes_escaped_string() {
        let mut r = reader(r#""a\nb""#);
        assert_eq!(r.next_string().unwrap(), "a\nb");
    }

    #[test]
    fn combines_surrogate_pair() {
        let mut r = reader(r#""😀""#);
        assert_eq!(r.next_string().unwrap(), "\u{1F600}");
    }

    #[test]
    fn lone_high_surrogate_and_following_escape_both_emit() {
        let mut r = reader(r#""\ud800A""#);
        assert_eq!(r.next_string().unwrap(), "\u{FFFD}A");
    }

    #[test]
    fn rejects_leading_zero_by_default() {
        let mut r = reader("[01]");
        r.begin_array().unwrap();
        assert!(r.peek().is_err());
    }

    #[test]
    fn lenient_accepts_unquoted_members() {
        let mut r = lenient_reader("{a:1, b:'two'}");
        r.begin_object().unwrap();
        assert_eq!(&*r.next_name().unwrap(), "a");
        assert_eq!(r.next_long().unwrap(), 1);
        assert_eq!(&*r.next_name().unwrap(), "b");
        assert_eq!(r.next_string().unwrap(), "two");
        r.end_object().unwrap();
    }

    #[test]
    fn lenient_treats_doubled_comma_as_null() {
        let mut r = lenient_reader("[1,,3]");
        r.begin_array().unwrap();
        assert_eq!(r.next_long().unwrap(), 1);
        r.next_null().unwrap();
        assert_eq!(r.next_long().unwrap(), 3);
        r.end_array().unwrap();
    }

    #[test]
    fn lenient_treats_leading_comma_as_null() {
        let mut r = lenient_reader("[,1]");
        r.begin_array().unwrap();
        r.next_null().unwrap();
        assert_eq!(r.next_long().unwrap(), 1);
        r.end_array().unwrap();
    }

    /// Internal classification behind spec.md §8's number table, using
    /// `do_peek`/`Peeked` directly since the public `TokenKind` collapses
    /// `Long`/`Number` into one `Number` case and can't distinguish them.
    #[test]
    fn peeked_long_vs_number_matches_spec_table() {
        let mut blackhole = crate::byte_source::Blackhole;

        let mut r = reader("-0");
        assert_eq!(r.do_peek(&mut blackhole, false).unwrap(), Peeked::Number);

        let mut r = reader("0");
        assert_eq!(r.do_peek(&mut blackhole, false).unwrap(), Peeked::Long);
        assert_eq!(r.ancillary.peeked_long, 0);

        let mut r = reader("-9223372036854775808");
        assert_eq!(r.do_peek(&mut blackhole, false).unwrap(), Peeked::Long);
        assert_eq!(r.ancillary.peeked_long, i64::MIN);

        let mut r = reader("9223372036854775808");
        assert_eq!(r.do_peek(&mut blackhole, false).unwrap(), Peeked::Number);

        let mut r = reader("9223372036854775807");
        assert_eq!(r.do_peek(&mut blackhole, false).unwrap(), Peeked::Long);
        assert_eq!(r.ancillary.peeked_long, i64::MAX);
    }

    #[test]
    fn strict_mode_reports_lenient_required_for_extension_bytes() {
        let mut r = reader("[1;2]");
        r.begin_array().unwrap();
        assert_eq!(r.next_long().unwrap(), 1);
        assert!(matches!(
            r.peek().unwrap_err().kind(),
            crate::error::ErrorKind::Syntax(SyntaxError::LenientRequired)
        ));

        let mut r = reader("{'a':1}");
        r.begin_object().unwrap();
        assert!(matches!(
            r.peek().unwrap_err().kind(),
            crate::error::ErrorKind::Syntax(SyntaxError::LenientRequired)
        ));
    }

    #[test]
    fn strict_mode_reports_expected_value_for_leading_comma() {
        let mut r = reader("[,1]");
        r.begin_array().unwrap();
        assert!(matches!(
            r.peek().unwrap_err().kind(),
            crate::error::ErrorKind::Syntax(SyntaxError::ExpectedValue)
        ));
    }
}
