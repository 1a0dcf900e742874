use imforge_source::Rhs;

use super::literal::{parse_f32, parse_text_via_source, source_f32};
use super::{Literal, ValueError, ValueType};

// ── Dimension ─────────────────────────────────────────────────────────────

/// A widget extent along one axis.
///
/// `Px` may be negative: `-8` means "available space minus 8", the way the
/// immediate-mode toolkit reads negative item sizes. `Px(0.0)` never exists;
/// [`Dimension::px`] folds it into `Auto`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Dimension {
    #[default]
    Auto,
    Px(f32),
    /// Percentage of the space left after fixed siblings.
    Pct(f32),
}

impl Dimension {
    pub fn px(v: f32) -> Self {
        if v == 0.0 { Dimension::Auto } else { Dimension::Px(v) }
    }

    pub fn pct(p: f32) -> Self {
        Dimension::Pct(p)
    }

    #[inline]
    pub fn is_auto(self) -> bool {
        self == Dimension::Auto
    }
}

fn non_negative_pct(p: f32, raw: &str) -> Result<f32, ValueError> {
    if p < 0.0 { Err(ValueError::expected("a non-negative percentage", raw)) } else { Ok(p) }
}

impl Literal for Dimension {
    fn value_type(&self) -> ValueType {
        ValueType::Dimension
    }

    fn to_text(&self) -> String {
        match self {
            Dimension::Auto => "auto".to_string(),
            Dimension::Px(v) => v.to_string(),
            Dimension::Pct(p) => format!("{}%", p),
        }
    }

    fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
        let t = text.trim();
        if t.is_empty() || t == "auto" {
            return Ok(Dimension::Auto);
        }
        match t.strip_suffix('%') {
            Some(p) => Ok(Dimension::Pct(non_negative_pct(parse_f32(p)?, t)?)),
            None => Ok(Dimension::px(parse_f32(t)?)),
        }
    }

    fn to_source(&self) -> String {
        match self {
            Dimension::Auto => "0".to_string(),
            Dimension::Px(v) => v.to_string(),
            Dimension::Pct(p) => format!("ImRad::Pct({})", p),
        }
    }

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        if let Some((callee, args)) = rhs.call() {
            return match (callee.as_str(), args.as_slice()) {
                ("ImRad::Pct", [arg]) => Ok(Dimension::Pct(non_negative_pct(source_f32(arg)?, arg.text())?)),
                _ => Err(ValueError::expected("a size or ImRad::Pct(n)", rhs.text())),
            };
        }
        Ok(Dimension::px(source_f32(rhs)?))
    }

    fn scale(&mut self, factor: f32) {
        if let Dimension::Px(v) = self {
            *self = Dimension::px(*v * factor);
        }
    }
}

// ── Lengths ───────────────────────────────────────────────────────────────

/// A non-negative pixel length (rounding, border, thickness).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Px(pub f32);

fn length(v: f32, raw: &str) -> Result<f32, ValueError> {
    if v < 0.0 { Err(ValueError::expected("a non-negative length", raw)) } else { Ok(v) }
}

impl Literal for Px {
    fn value_type(&self) -> ValueType {
        ValueType::Length
    }

    fn to_text(&self) -> String {
        self.0.to_string()
    }

    fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
        Ok(Px(length(parse_f32(text)?, text)?))
    }

    fn to_source(&self) -> String {
        self.0.to_string()
    }

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        Ok(Px(length(source_f32(rhs)?, rhs.text())?))
    }

    fn scale(&mut self, factor: f32) {
        self.0 *= factor;
    }
}

/// A pair of pixel lengths (padding, spacing).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Px2 {
    pub x: f32,
    pub y: f32,
}

impl Px2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Literal for Px2 {
    fn value_type(&self) -> ValueType {
        ValueType::Length2
    }

    fn to_text(&self) -> String {
        format!("{}, {}", self.x, self.y)
    }

    fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
        if text.contains('(') {
            return parse_text_via_source(self, text);
        }
        let (x, y) = text.split_once(',').ok_or_else(|| ValueError::expected("`x, y`", text))?;
        Ok(Px2::new(length(parse_f32(x)?, x)?, length(parse_f32(y)?, y)?))
    }

    fn to_source(&self) -> String {
        format!("ImVec2({}, {})", self.x, self.y)
    }

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        match rhs.call() {
            Some((callee, args)) if callee == "ImVec2" && args.len() == 2 => Ok(Px2::new(
                length(source_f32(&args[0])?, args[0].text())?,
                length(source_f32(&args[1])?, args[1].text())?,
            )),
            _ => Err(ValueError::expected("ImVec2(x, y)", rhs.text())),
        }
    }

    fn scale(&mut self, factor: f32) {
        self.x *= factor;
        self.y *= factor;
    }
}

#[cfg(test)]
mod tests {
    use imforge_source::Lexer;

    use super::*;

    fn src<T: Literal>(proto: &T, text: &str) -> Result<T, ValueError> {
        let toks = Lexer::new(text).tokenize().unwrap();
        proto.parse_source(&Rhs::new(text, &toks))
    }

    #[test]
    fn zero_is_auto() {
        assert_eq!(Dimension::px(0.0), Dimension::Auto);
        assert_eq!(src(&Dimension::Auto, "0"), Ok(Dimension::Auto));
        assert_eq!(Dimension::Auto.to_source(), "0");
    }

    #[test]
    fn dimension_text_forms() {
        let d = Dimension::default();
        assert_eq!(d.parse_text("auto"), Ok(Dimension::Auto));
        assert_eq!(d.parse_text("120"), Ok(Dimension::Px(120.0)));
        assert_eq!(d.parse_text("-8"), Ok(Dimension::Px(-8.0)));
        assert_eq!(d.parse_text("50%"), Ok(Dimension::Pct(50.0)));
        assert!(d.parse_text("-5%").is_err());
        assert!(d.parse_text("wide").is_err());
    }

    #[test]
    fn dimension_source_forms() {
        assert_eq!(Dimension::Pct(50.0).to_source(), "ImRad::Pct(50)");
        assert_eq!(src(&Dimension::Auto, "ImRad::Pct(50)"), Ok(Dimension::Pct(50.0)));
        assert_eq!(src(&Dimension::Auto, "120.5f"), Ok(Dimension::Px(120.5)));
        assert!(src(&Dimension::Auto, "ImRad::Pct(1, 2)").is_err());
    }

    #[test]
    fn scaling_touches_pixels_only() {
        let mut d = Dimension::Px(10.0);
        d.scale(1.5);
        assert_eq!(d, Dimension::Px(15.0));
        let mut p = Dimension::Pct(40.0);
        p.scale(2.0);
        assert_eq!(p, Dimension::Pct(40.0));
    }

    #[test]
    fn lengths_are_non_negative() {
        assert!(Px(0.0).parse_text("-1").is_err());
        assert_eq!(src(&Px2::default(), "ImVec2(4, 2)"), Ok(Px2::new(4.0, 2.0)));
        assert_eq!(Px2::default().parse_text("4, 2"), Ok(Px2::new(4.0, 2.0)));
        assert!(src(&Px2::default(), "ImVec2(-4, 2)").is_err());
    }
}
