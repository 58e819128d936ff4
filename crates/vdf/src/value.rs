//! Leaf values and their typed views.
//!
//! KeyValues files store numbers permissively as text, so every typed view
//! is a total conversion: a view that makes no sense for the stored type (or
//! text that does not parse) yields the view's zero value instead of an error.

use std::borrow::Cow;
use std::fmt;

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses the first four whitespace-separated decimal channels of `s`.
    fn parse(s: &str) -> Option<Self> {
        let mut fields = s.split_ascii_whitespace().map(str::parse::<u8>);
        let mut channel = || fields.next()?.ok();
        Some(Self::new(channel()?, channel()?, channel()?, channel()?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.r, self.g, self.b, self.a)
    }
}

/// The value slot of a node.
///
/// `None` marks an interior node; every other variant is a leaf scalar.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    None,
    String(String),
    Int(i32),
    Float(f32),
    /// 32-bit unsigned "pointer" integer.
    Ptr(u32),
    /// UTF-16 code units, not necessarily well-formed.
    WString(Vec<u16>),
    Color(Color),
    Uint64(u64),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Short lowercase name of the stored type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Ptr(_) => "ptr",
            Value::WString(_) => "wstring",
            Value::Color(_) => "color",
            Value::Uint64(_) => "uint64",
        }
    }

    /// Text view. Interior markers render as the empty string.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::None => Cow::Borrowed(""),
            Value::String(s) => Cow::Borrowed(s),
            Value::Int(v) => Cow::Owned(v.to_string()),
            Value::Float(v) => Cow::Owned(format_float(*v)),
            Value::Ptr(v) => Cow::Owned(v.to_string()),
            Value::WString(v) => Cow::Owned(String::from_utf16_lossy(v)),
            Value::Color(v) => Cow::Owned(v.to_string()),
            Value::Uint64(v) => Cow::Owned(v.to_string()),
        }
    }

    pub fn to_int(&self) -> i32 {
        match self {
            Value::None | Value::Color(_) => 0,
            Value::String(_) | Value::WString(_) => self.to_text().parse().unwrap_or(0),
            Value::Int(v) => *v,
            Value::Float(v) => *v as i32,
            Value::Ptr(v) => *v as i32,
            Value::Uint64(v) => *v as i32,
        }
    }

    pub fn to_float(&self) -> f32 {
        match self {
            Value::None | Value::Color(_) => 0.0,
            Value::String(_) | Value::WString(_) => parse_float(&self.to_text()),
            Value::Int(v) => *v as f32,
            Value::Float(v) => *v,
            Value::Ptr(v) => *v as f32,
            Value::Uint64(v) => *v as f32,
        }
    }

    pub fn to_ptr(&self) -> u32 {
        match self {
            Value::None | Value::Color(_) => 0,
            Value::String(_) | Value::WString(_) => self.to_text().parse().unwrap_or(0),
            Value::Int(v) => *v as u32,
            Value::Float(v) => *v as u32,
            Value::Ptr(v) => *v,
            Value::Uint64(v) => *v as u32,
        }
    }

    /// Wide-string view: a copy of stored UTF-16, or the text view re-encoded.
    pub fn to_wstring(&self) -> Vec<u16> {
        match self {
            Value::WString(v) => v.clone(),
            _ => self.to_text().encode_utf16().collect(),
        }
    }

    pub fn to_color(&self) -> Color {
        match self {
            Value::String(_) | Value::WString(_) => Color::parse(&self.to_text()).unwrap_or_default(),
            Value::Color(v) => *v,
            Value::None
            | Value::Int(_)
            | Value::Float(_)
            | Value::Ptr(_)
            | Value::Uint64(_) => Color::default(),
        }
    }

    pub fn to_uint64(&self) -> u64 {
        match self {
            Value::None | Value::Color(_) => 0,
            Value::String(_) | Value::WString(_) => self.to_text().parse().unwrap_or(0),
            Value::Int(v) => *v as u64,
            Value::Float(v) => *v as u64,
            Value::Ptr(v) => u64::from(*v),
            Value::Uint64(v) => *v,
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Ptr(v)
    }
}

impl From<Vec<u16>> for Value {
    fn from(v: Vec<u16>) -> Self {
        Value::WString(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Value::Color(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint64(v)
    }
}

/// Parses a float the way the text views do: text that overflows `f32`
/// reads as zero, while an explicit `inf` or `infinity` stays infinite.
fn parse_float(s: &str) -> f32 {
    match s.parse::<f32>() {
        Ok(v) if v.is_infinite() && !names_infinity(s) => 0.0,
        Ok(v) => v,
        Err(_) => 0.0,
    }
}

fn names_infinity(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    s.eq_ignore_ascii_case("inf") || s.eq_ignore_ascii_case("infinity")
}

/// Formats `v` with the fewest digits that parse back to the same `f32`.
///
/// Follows `%g` conventions: exponent form when the decimal exponent is
/// below -4 or at least 6, with a sign and at least two exponent digits.
pub(crate) fn format_float(v: f32) -> String {
    if v.is_nan() {
        return "NaN".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "+Inf" } else { "-Inf" }.to_owned();
    }
    let sci = format!("{v:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return v.to_string();
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if (-4..6).contains(&exp) {
        return v.to_string();
    }
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_formatting() {
        assert_eq!(format_float(0.0), "0");
        assert_eq!(format_float(-0.0), "-0");
        assert_eq!(format_float(3.14), "3.14");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(100000.0), "100000");
        assert_eq!(format_float(1e6), "1e+06");
        assert_eq!(format_float(123456789.0), "1.2345679e+08");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(-1.5e-7), "-1.5e-07");
        assert_eq!(format_float(1e38), "1e+38");
        assert_eq!(format_float(f32::NAN), "NaN");
        assert_eq!(format_float(f32::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn float_text_parses_back() {
        for v in [3.14f32, 1e-7, 123456789.0, f32::MAX, f32::MIN_POSITIVE, -2.5e12] {
            assert_eq!(format_float(v).parse::<f32>(), Ok(v));
        }
        assert_eq!("+Inf".parse::<f32>(), Ok(f32::INFINITY));
    }

    #[test]
    fn float_text_overflow_reads_as_zero() {
        assert_eq!(parse_float("1e40"), 0.0);
        assert_eq!(parse_float("-3.5e39"), 0.0);
        assert_eq!(parse_float("+Inf"), f32::INFINITY);
        assert_eq!(parse_float("-infinity"), f32::NEG_INFINITY);
        assert_eq!(parse_float("3.4e38"), 3.4e38);
        assert_eq!(parse_float("1e-50"), 0.0);
        assert_eq!(parse_float("x"), 0.0);
    }

    #[test]
    fn color_parsing() {
        assert_eq!(Color::parse("1 2 3 4"), Some(Color::new(1, 2, 3, 4)));
        assert_eq!(Color::parse(" 255\t0 0 255 extra"), Some(Color::new(255, 0, 0, 255)));
        assert_eq!(Color::parse("1 2 3"), None);
        assert_eq!(Color::parse("1 2 3 256"), None);
        assert_eq!(Color::parse("a b c d"), None);
    }

    #[test]
    fn numeric_conversions_wrap_like_casts() {
        assert_eq!(Value::Int(-1).to_ptr(), u32::MAX);
        assert_eq!(Value::Int(-1).to_uint64(), u64::MAX);
        assert_eq!(Value::Ptr(u32::MAX).to_int(), -1);
        assert_eq!(Value::Uint64(1 << 32 | 7).to_int(), 7);
        assert_eq!(Value::Float(-3.9).to_int(), -3);
        assert_eq!(Value::Float(f32::NAN).to_int(), 0);
    }

    #[test]
    fn text_views() {
        assert_eq!(Value::None.to_text(), "");
        assert_eq!(Value::Ptr(0xdeadbeef).to_text(), "3735928559");
        assert_eq!(Value::Color(Color::new(255, 0, 0, 255)).to_text(), "255 0 0 255");
        assert_eq!(Value::WString(vec![0xd83d, 0xdca9]).to_text(), "\u{1f4a9}");
        assert_eq!(Value::WString(vec![0xd83d]).to_text(), "\u{fffd}");
        assert_eq!(Value::Uint64(u64::MAX).to_text(), "18446744073709551615");
    }

    #[test]
    fn wide_views() {
        assert_eq!(Value::from("hé").to_wstring(), vec![0x68, 0xe9]);
        assert_eq!(Value::Int(12).to_wstring(), vec![0x31, 0x32]);
        assert_eq!(Value::WString(vec![0x34, 0x32]).to_int(), 42);
        assert_eq!(Value::WString(vec![0x31, 0x20, 0x32, 0x20, 0x33, 0x20, 0x34]).to_color(), Color::new(1, 2, 3, 4));
        assert!(Value::None.to_wstring().is_empty());
    }

    #[test]
    fn color_views_of_numbers_are_zero() {
        assert_eq!(Value::Int(5).to_color(), Color::default());
        assert_eq!(Value::Color(Color::new(1, 2, 3, 4)).to_int(), 0);
        assert_eq!(Value::Color(Color::new(1, 2, 3, 4)).to_float(), 0.0);
    }
}
