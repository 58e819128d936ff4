//! Backslash escapes inside quoted tokens.

use std::borrow::Cow;

/// Maps the character after a backslash to the character it stands for.
fn unescape_byte(c: u8) -> Option<char> {
    Some(match c {
        b'\\' => '\\',
        b'n' => '\n',
        b't' => '\t',
        b'v' => '\x0B',
        b'b' => '\x08',
        b'r' => '\r',
        b'f' => '\x0C',
        b'a' => '\x07',
        b'\'' => '\'',
        b'"' => '"',
        _ => return None,
    })
}

fn escape_char(c: char) -> Option<&'static str> {
    Some(match c {
        '\\' => "\\\\",
        '\n' => "\\n",
        '\t' => "\\t",
        '\x0B' => "\\v",
        '\x08' => "\\b",
        '\r' => "\\r",
        '\x0C' => "\\f",
        '\x07' => "\\a",
        '\'' => "\\'",
        '"' => "\\\"",
        _ => return None,
    })
}

/// Returns `true` if `raw[i]` is a backslash starting a recognized escape.
pub(crate) fn is_escape_at(raw: &[u8], i: usize) -> bool {
    raw[i] == b'\\' && raw.get(i + 1).copied().and_then(unescape_byte).is_some()
}

/// Decodes escapes. Unrecognized escapes keep their backslash.
pub(crate) fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if is_escape_at(bytes, i) {
            out.push_str(&raw[start..i]);
            if let Some(c) = unescape_byte(bytes[i + 1]) {
                out.push(c);
            }
            i += 2;
            start = i;
        } else {
            i += 1;
        }
    }
    out.push_str(&raw[start..]);
    Cow::Owned(out)
}

/// Decodes the bytes between the quotes of a quoted token. Bytes that are
/// not valid UTF-8 become U+FFFD before escapes are resolved.
pub(crate) fn unescape_bytes(raw: &[u8]) -> Cow<'_, str> {
    match String::from_utf8_lossy(raw) {
        Cow::Borrowed(s) => unescape(s),
        Cow::Owned(s) => Cow::Owned(unescape(&s).into_owned()),
    }
}

/// Writes `s` with every escapable character escaped.
fn escape_into(out: &mut String, s: &str) {
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if let Some(esc) = escape_char(c) {
            out.push_str(&s[start..i]);
            out.push_str(esc);
            start = i + c.len_utf8();
        }
    }
    out.push_str(&s[start..]);
}

pub(crate) fn escape(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| escape_char(c).is_some()) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    escape_into(&mut out, s);
    Cow::Owned(out)
}
