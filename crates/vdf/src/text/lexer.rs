//! Tokenizer for the text encoding.
//!
//! The lexer works on raw bytes, so files in legacy single-byte encodings
//! tokenize the same way UTF-8 files do. Every token carries the exact
//! whitespace and comment bytes that preceded it, so the parser can record
//! them for byte-exact replay.

use std::borrow::Cow;

use super::escape::{is_escape_at, unescape_bytes};
use super::TextError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Quoted,
    Bare,
    /// A bare token of the form `[...]`.
    Conditional,
    Open,
    Close,
    Eof,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Token<'a> {
    pub(crate) kind: TokenKind,
    /// Whitespace and comments before the token.
    pub(crate) prefix: &'a [u8],
    /// Source bytes of the token; for quoted tokens, the bytes between the quotes.
    pub(crate) raw: &'a [u8],
    /// Byte offset of the token itself.
    pub(crate) offset: usize,
}

impl<'a> Token<'a> {
    /// Source bytes without the brackets of a conditional.
    pub(crate) fn body(&self) -> &'a [u8] {
        match self.kind {
            TokenKind::Conditional => &self.raw[1..self.raw.len() - 1],
            _ => self.raw,
        }
    }

    /// Decoded token text. Invalid UTF-8 decodes to U+FFFD.
    pub(crate) fn text(&self) -> Cow<'a, str> {
        match self.kind {
            TokenKind::Quoted => unescape_bytes(self.raw),
            _ => String::from_utf8_lossy(self.body()),
        }
    }
}

pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

fn ends_bare(b: u8) -> bool {
    is_space(b) || matches!(b, b'"' | b'{' | b'}')
}

fn is_conditional(raw: &[u8]) -> bool {
    raw.len() >= 2 && raw.starts_with(b"[") && raw.ends_with(b"]")
}

/// Returns `true` if `s` would lex back as a single bare name or value token.
pub(crate) fn is_bare_safe(s: &str) -> bool {
    !s.is_empty()
        && !s.bytes().any(ends_bare)
        && !s.starts_with("//")
        && !is_conditional(s.as_bytes())
}

pub(crate) struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Rewinds to a position previously returned by [`Lexer::pos`].
    pub(crate) fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn starts_comment(&self) -> bool {
        self.src[self.pos..].starts_with(b"//")
    }

    /// Advances past the end of the current line, newline included.
    fn skip_line(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += match rest.iter().position(|&b| b == b'\n') {
            Some(i) => i + 1,
            None => rest.len(),
        };
    }

    fn skip_trivia(&mut self) {
        let bytes = self.src;
        loop {
            while self.pos < bytes.len() && is_space(bytes[self.pos]) {
                self.pos += 1;
            }
            if !self.starts_comment() {
                return;
            }
            self.skip_line();
        }
    }

    /// Consumes the rest of the current line: whitespace up to and including
    /// a newline, or whitespace followed by a `//` comment and its newline.
    /// Stops before any other token.
    pub(crate) fn line_ending(&mut self) -> &'a [u8] {
        let bytes = self.src;
        let start = self.pos;
        while self.pos < bytes.len() && is_space(bytes[self.pos]) {
            self.pos += 1;
            if bytes[self.pos - 1] == b'\n' {
                return &bytes[start..self.pos];
            }
        }
        if self.starts_comment() {
            self.skip_line();
        }
        &bytes[start..self.pos]
    }

    pub(crate) fn next_token(&mut self) -> Result<Token<'a>, TextError> {
        let bytes = self.src;
        let start = self.pos;
        self.skip_trivia();
        let prefix = &bytes[start..self.pos];
        let offset = self.pos;
        let token = |kind: TokenKind, raw: &'a [u8]| Token {
            kind,
            prefix,
            raw,
            offset,
        };

        let Some(&c) = bytes.get(offset) else {
            return Ok(token(TokenKind::Eof, b""));
        };
        match c {
            b'{' | b'}' => {
                self.pos += 1;
                let kind = if c == b'{' {
                    TokenKind::Open
                } else {
                    TokenKind::Close
                };
                Ok(token(kind, &bytes[offset..self.pos]))
            }
            b'"' => {
                let body = offset + 1;
                let mut i = body;
                loop {
                    match bytes.get(i) {
                        None => return Err(TextError::UnterminatedString { offset }),
                        Some(b'"') => break,
                        Some(b'\\') if is_escape_at(bytes, i) => i += 2,
                        Some(b'\\') if i + 1 == bytes.len() => {
                            return Err(TextError::UnterminatedString { offset })
                        }
                        Some(_) => i += 1,
                    }
                }
                self.pos = i + 1;
                Ok(token(TokenKind::Quoted, &bytes[body..i]))
            }
            _ => {
                let len = bytes[offset..]
                    .iter()
                    .position(|&b| ends_bare(b))
                    .unwrap_or(bytes.len() - offset);
                self.pos = offset + len;
                let raw = &bytes[offset..self.pos];
                let kind = if is_conditional(raw) {
                    TokenKind::Conditional
                } else {
                    TokenKind::Bare
                };
                Ok(token(kind, raw))
            }
        }
    }
}
