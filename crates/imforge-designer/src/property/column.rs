use imforge_source::{quote, Rhs};

use super::flags::{Flags, TABLE_COLUMN_FLAGS};
use super::literal::{parse_text_via_source, source_f32};
use super::{Literal, ValueError, ValueType};

/// One table column: header label, column flags and initial width
/// (0 lets the table size it).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnData {
    pub label: String,
    pub flags: Flags,
    pub width: f32,
}

impl ColumnData {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), flags: Flags::empty(&TABLE_COLUMN_FLAGS), width: 0.0 }
    }

    pub fn stretch(label: impl Into<String>) -> Self {
        let mut c = Self::new(label);
        c.flags = Flags::with_bits(&TABLE_COLUMN_FLAGS, 1 << 3);
        c
    }

    fn to_source(&self) -> String {
        format!("ImRad::Column({}, {}, {})", quote(&self.label), self.flags.to_source(), self.width)
    }

    fn parse(rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        let bad = || ValueError::expected("ImRad::Column(label, flags, width)", rhs.text());
        let (callee, args) = rhs.call().ok_or_else(bad)?;
        let [label, flags, width] = args.as_slice() else {
            return Err(bad());
        };
        if callee != "ImRad::Column" {
            return Err(bad());
        }
        let width = source_f32(width)?;
        if width < 0.0 {
            return Err(ValueError::expected("a non-negative column width", rhs.text()));
        }
        Ok(ColumnData {
            label: label.string().ok_or_else(bad)?.to_string(),
            flags: Flags::empty(&TABLE_COLUMN_FLAGS).parse_source(flags)?,
            width,
        })
    }
}

impl Literal for Vec<ColumnData> {
    fn value_type(&self) -> ValueType {
        ValueType::Columns
    }

    fn to_text(&self) -> String {
        self.to_source()
    }

    fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
        parse_text_via_source(self, text)
    }

    fn to_source(&self) -> String {
        let cols: Vec<String> = self.iter().map(ColumnData::to_source).collect();
        format!("ImRad::Columns({})", cols.join(", "))
    }

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        match rhs.call() {
            Some((callee, args)) if callee == "ImRad::Columns" => args.iter().map(ColumnData::parse).collect(),
            _ => Err(ValueError::expected("ImRad::Columns(...)", rhs.text())),
        }
    }

    fn scale(&mut self, factor: f32) {
        for c in self {
            c.width *= factor;
        }
    }
}
