use std::fmt;

use imforge_core::coords::Color32;
use imforge_source::{quote, Rhs, Token};

use super::ident::rename_interpolated;
use super::{parse_text_as_source, ValueError, ValueType};

/// A design-time literal of one semantic type.
///
/// The parse functions take `&self` as a prototype: table-bound types
/// (flags) parse against the same table as the value they replace.
pub trait Literal: Clone + PartialEq + fmt::Debug {
    fn value_type(&self) -> ValueType;

    fn to_text(&self) -> String;

    fn parse_text(&self, text: &str) -> Result<Self, ValueError>;

    fn to_source(&self) -> String;

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError>;

    fn scale(&mut self, _factor: f32) {}

    fn rename_field(&mut self, _old: &str, _new: &str) -> bool {
        false
    }
}

pub(crate) fn finite(v: f32, raw: &str) -> Result<f32, ValueError> {
    if v.is_finite() { Ok(v) } else { Err(ValueError::expected("a finite number", raw)) }
}

pub(crate) fn parse_f32(raw: &str) -> Result<f32, ValueError> {
    let raw = raw.trim();
    let digits = raw.trim_end_matches(['f', 'F']);
    let v: f32 = digits.parse().map_err(|_| ValueError::expected("a number", raw))?;
    finite(v, raw)
}

pub(crate) fn source_f32(rhs: &Rhs<'_>) -> Result<f32, ValueError> {
    match rhs.number() {
        Some(n) if !n.contains(['x', 'X']) => parse_f32(&n),
        _ => Err(ValueError::expected("a number", rhs.text())),
    }
}

pub(crate) fn source_i64(rhs: &Rhs<'_>) -> Result<i64, ValueError> {
    let n = rhs.number().ok_or_else(|| ValueError::expected("an integer", rhs.text()))?;
    let (neg, body) = match n.strip_prefix('-') {
        Some(b) => (true, b),
        None => (false, n.as_str()),
    };
    let v = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else {
        body.parse::<i64>()
    }
    .map_err(|_| ValueError::expected("an integer", rhs.text()))?;
    Ok(if neg { -v } else { v })
}

// ── Scalars ───────────────────────────────────────────────────────────────

impl Literal for bool {
    fn value_type(&self) -> ValueType {
        ValueType::Bool
    }

    fn to_text(&self) -> String {
        self.to_string()
    }

    fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
        match text.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(ValueError::expected("`true` or `false`", other)),
        }
    }

    fn to_source(&self) -> String {
        self.to_string()
    }

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        match rhs.single().and_then(Token::ident) {
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            _ => Err(ValueError::expected("`true` or `false`", rhs.text())),
        }
    }
}

impl Literal for i32 {
    fn value_type(&self) -> ValueType {
        ValueType::Int
    }

    fn to_text(&self) -> String {
        self.to_string()
    }

    fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
        text.trim().parse().map_err(|_| ValueError::expected("an integer", text))
    }

    fn to_source(&self) -> String {
        self.to_string()
    }

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        let v = source_i64(rhs)?;
        i32::try_from(v).map_err(|_| ValueError::expected("a 32-bit integer", rhs.text()))
    }
}

impl Literal for f32 {
    fn value_type(&self) -> ValueType {
        ValueType::Float
    }

    // `{}` on f32 prints the shortest text that parses back to the same bits
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
        parse_f32(text)
    }

    fn to_source(&self) -> String {
        self.to_string()
    }

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        source_f32(rhs)
    }
}

impl Literal for String {
    fn value_type(&self) -> ValueType {
        ValueType::String
    }

    fn to_text(&self) -> String {
        self.clone()
    }

    fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
        Ok(text.to_string())
    }

    fn to_source(&self) -> String {
        quote(self)
    }

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        rhs.string()
            .map(str::to_string)
            .ok_or_else(|| ValueError::expected("a string literal", rhs.text()))
    }

    fn rename_field(&mut self, old: &str, new: &str) -> bool {
        match rename_interpolated(self, old, new) {
            Some(renamed) => {
                *self = renamed;
                true
            }
            None => false,
        }
    }
}

// ── Color ─────────────────────────────────────────────────────────────────

impl Literal for Color32 {
    fn value_type(&self) -> ValueType {
        ValueType::Color
    }

    fn to_text(&self) -> String {
        self.to_hex()
    }

    fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
        Color32::from_hex(text.trim()).ok_or_else(|| ValueError::expected("a #rrggbbaa colour", text))
    }

    fn to_source(&self) -> String {
        format!("IM_COL32({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        let bad = || ValueError::expected("IM_COL32(r, g, b, a)", rhs.text());
        let (callee, args) = rhs.call().ok_or_else(bad)?;
        if callee != "IM_COL32" || args.len() != 4 {
            return Err(bad());
        }
        let mut c = [0u8; 4];
        for (slot, arg) in c.iter_mut().zip(&args) {
            *slot = u8::try_from(source_i64(arg)?).map_err(|_| ValueError::expected("a channel 0..=255", arg.text()))?;
        }
        Ok(Color32::rgba(c[0], c[1], c[2], c[3]))
    }
}

// ── Font ──────────────────────────────────────────────────────────────────

/// Name of a font registered by the host application. Empty selects the
/// default font.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontName(pub String);

impl Literal for FontName {
    fn value_type(&self) -> ValueType {
        ValueType::Font
    }

    fn to_text(&self) -> String {
        self.0.clone()
    }

    fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
        Ok(FontName(text.trim().to_string()))
    }

    fn to_source(&self) -> String {
        quote(&self.0)
    }

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        match rhs.string() {
            Some(s) if s.trim() == s => Ok(FontName(s.to_string())),
            _ => Err(ValueError::expected("a font name literal", rhs.text())),
        }
    }
}

// ── Combo items ───────────────────────────────────────────────────────────

/// One item per line in the editor; a `\0`-terminated list in source.
impl Literal for Vec<String> {
    fn value_type(&self) -> ValueType {
        ValueType::Items
    }

    fn to_text(&self) -> String {
        self.join("\n")
    }

    fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
        if text.contains('\0') {
            return Err(ValueError::new("combo items may not contain NUL"));
        }
        Ok(text.lines().map(str::to_string).collect())
    }

    fn to_source(&self) -> String {
        let joined: String = self.iter().map(|item| format!("{}\0", item)).collect();
        quote(&joined)
    }

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        let s = rhs.string().ok_or_else(|| ValueError::expected("a string literal", rhs.text()))?;
        if !s.is_empty() && !s.ends_with('\0') {
            return Err(ValueError::new("combo item list must end with \\0"));
        }
        if s.contains(['\n', '\r']) {
            return Err(ValueError::new("combo items may not contain line breaks"));
        }
        Ok(s.split_terminator('\0').map(str::to_string).collect())
    }
}

// ── Inherit ───────────────────────────────────────────────────────────────

/// `None` inherits from the enclosing style; empty text, `std::nullopt` in
/// source.
impl<T: Literal + Default> Literal for Option<T> {
    fn value_type(&self) -> ValueType {
        match self {
            Some(v) => v.value_type(),
            None => T::default().value_type(),
        }
    }

    fn to_text(&self) -> String {
        self.as_ref().map(Literal::to_text).unwrap_or_default()
    }

    fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let proto = self.clone().unwrap_or_default();
        proto.parse_text(text).map(Some)
    }

    fn to_source(&self) -> String {
        match self {
            Some(v) => v.to_source(),
            None => "std::nullopt".to_string(),
        }
    }

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        if rhs.compact() == "std::nullopt" {
            return Ok(None);
        }
        let proto = self.clone().unwrap_or_default();
        proto.parse_source(rhs).map(Some)
    }

    fn scale(&mut self, factor: f32) {
        if let Some(v) = self {
            v.scale(factor);
        }
    }

    fn rename_field(&mut self, old: &str, new: &str) -> bool {
        self.as_mut().is_some_and(|v| v.rename_field(old, new))
    }
}

/// Parses editor text the way source is parsed. For types whose text form
/// is their source form.
pub(crate) fn parse_text_via_source<T: Literal>(proto: &T, text: &str) -> Result<T, ValueError> {
    parse_text_as_source(text, |rhs| proto.parse_source(rhs))
}
