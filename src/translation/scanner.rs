/// Lexical context of the byte currently being scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Context {
    Code,
    SingleQuoted,
    /// Postgres `E'...'` string, where a backslash escapes the next byte.
    EscapeQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    /// Holds the closing `$tag$` delimiter.
    DollarQuoted(String),
}

/// One lexical item the translator cares about.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Token<'a> {
    /// Verbatim SQL text, including literals and comments.
    Text(&'a str),
    /// A bare `?` in code.
    Marker,
    /// `?` followed by digits in code, e.g. `?3`.
    NumberedMarker(&'a str),
    /// `??` in code: an escaped literal question mark.
    EscapedMarker,
}

/// Splits SQL into verbatim text and placeholder markers.
///
/// Markers inside quoted strings, quoted identifiers, comments, and dollar-quoted bodies are
/// emitted as text.
pub(super) struct Scanner<'a> {
    sql: &'a str,
    bytes: &'a [u8],
    pos: usize,
    context: Context,
}

impl<'a> Scanner<'a> {
    pub(super) fn new(sql: &'a str) -> Self {
        Self {
            sql,
            bytes: sql.as_bytes(),
            pos: 0,
            context: Context::Code,
        }
    }

    fn starts_with(&self, idx: usize, pat: &[u8]) -> bool {
        self.bytes
            .get(idx..idx + pat.len())
            .is_some_and(|window| window == pat)
    }

    fn scan_digits(&self, start: usize) -> usize {
        let mut idx = start;
        while idx < self.bytes.len() && self.bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        idx
    }

    /// Returns the closing delimiter and the index just past the opening `$tag$`.
    fn dollar_quote_at(&self, start: usize) -> Option<(String, usize)> {
        let mut idx = start + 1;
        while idx < self.bytes.len() && self.bytes[idx] != b'$' {
            let b = self.bytes[idx];
            if !(b.is_ascii_alphanumeric() || b == b'_') {
                return None;
            }
            idx += 1;
        }
        // `$1` is a Postgres parameter, not a tag.
        let tag = &self.sql[start + 1..idx.min(self.bytes.len())];
        if idx >= self.bytes.len() || tag.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        Some((format!("${tag}$"), idx + 1))
    }

    /// True when the quote at `idx` opens an `E'...'` string: an `E`/`e` that is not the tail
    /// of a longer identifier.
    fn opens_escape_string(&self, idx: usize) -> bool {
        let is_ident = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
        idx >= 1
            && matches!(self.bytes[idx - 1], b'E' | b'e')
            && (idx < 2 || !is_ident(self.bytes[idx - 2]))
    }

    /// Advance over one byte (or one multi-byte delimiter) of literal or comment text.
    fn step_quoted(&mut self, idx: usize) -> usize {
        let (next, advance) = match &self.context {
            Context::Code => (None, 1),
            Context::SingleQuoted => self.close_quote(idx, b'\''),
            Context::EscapeQuoted if self.bytes[idx] == b'\\' => (None, 2),
            Context::EscapeQuoted => self.close_quote(idx, b'\''),
            Context::DoubleQuoted => self.close_quote(idx, b'"'),
            Context::LineComment if self.bytes[idx] == b'\n' => (Some(Context::Code), 1),
            Context::LineComment => (None, 1),
            Context::BlockComment(depth) => {
                if self.starts_with(idx, b"/*") {
                    (Some(Context::BlockComment(depth + 1)), 2)
                } else if self.starts_with(idx, b"*/") && *depth == 1 {
                    (Some(Context::Code), 2)
                } else if self.starts_with(idx, b"*/") {
                    (Some(Context::BlockComment(depth - 1)), 2)
                } else {
                    (None, 1)
                }
            }
            Context::DollarQuoted(closing) if self.starts_with(idx, closing.as_bytes()) => {
                (Some(Context::Code), closing.len())
            }
            Context::DollarQuoted(_) => (None, 1),
        };
        if let Some(context) = next {
            self.context = context;
        }
        idx + advance
    }

    fn close_quote(&self, idx: usize, quote: u8) -> (Option<Context>, usize) {
        if self.bytes[idx] != quote {
            (None, 1)
        } else if self.bytes.get(idx + 1) == Some(&quote) {
            // doubled quote is an escape
            (None, 2)
        } else {
            (Some(Context::Code), 1)
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let start = self.pos;
        if start >= self.bytes.len() {
            return None;
        }

        if self.context == Context::Code && self.bytes[start] == b'?' {
            if self.bytes.get(start + 1) == Some(&b'?') {
                self.pos = start + 2;
                return Some(Token::EscapedMarker);
            }
            let digits_end = self.scan_digits(start + 1);
            self.pos = digits_end.max(start + 1);
            return Some(if digits_end > start + 1 {
                Token::NumberedMarker(&self.sql[start + 1..digits_end])
            } else {
                Token::Marker
            });
        }

        let mut idx = start;
        while idx < self.bytes.len() {
            if self.context != Context::Code {
                idx = self.step_quoted(idx);
                continue;
            }
            match self.bytes[idx] {
                b'?' => break,
                b'\'' => {
                    self.context = if self.opens_escape_string(idx) {
                        Context::EscapeQuoted
                    } else {
                        Context::SingleQuoted
                    };
                    idx += 1;
                }
                b'"' => {
                    self.context = Context::DoubleQuoted;
                    idx += 1;
                }
                b'-' if self.starts_with(idx, b"--") => {
                    self.context = Context::LineComment;
                    idx += 2;
                }
                b'/' if self.starts_with(idx, b"/*") => {
                    self.context = Context::BlockComment(1);
                    idx += 2;
                }
                b'$' => {
                    if let Some((closing, body_start)) = self.dollar_quote_at(idx) {
                        self.context = Context::DollarQuoted(closing);
                        idx = body_start;
                    } else {
                        idx += 1;
                    }
                }
                _ => idx += 1,
            }
        }

        let end = idx.min(self.bytes.len());
        self.pos = end;
        Some(Token::Text(&self.sql[start..end]))
    }
}
