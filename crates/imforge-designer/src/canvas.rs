//! The draw context seen by the layout pass.
//!
//! The designer never touches rendering primitives. Everything layout needs
//! from the host toolkit (cursor, available size, style metrics, text
//! measurement and the current value of bound expressions) comes through
//! [`Canvas`].

use std::collections::HashMap;

use imforge_core::coords::Vec2;

// ── Style ─────────────────────────────────────────────────────────────────

/// Metrics the layout pass reads. Defaults match the toolkit's stock style.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub font_size: f32,
    pub frame_padding: Vec2,
    pub item_spacing: Vec2,
    pub item_inner_spacing: Vec2,
    pub window_padding: Vec2,
    pub cell_padding: Vec2,
    pub indent_spacing: f32,
    pub separator_thickness: f32,
    pub scrollbar_size: f32,
    /// Default item width as a fraction of the available width.
    pub item_width_ratio: f32,
    pub title_bar: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font_size: 13.0,
            frame_padding: Vec2::new(4.0, 3.0),
            item_spacing: Vec2::new(8.0, 4.0),
            item_inner_spacing: Vec2::new(4.0, 4.0),
            window_padding: Vec2::new(8.0, 8.0),
            cell_padding: Vec2::new(4.0, 2.0),
            indent_spacing: 21.0,
            separator_thickness: 1.0,
            scrollbar_size: 14.0,
            item_width_ratio: 0.65,
            title_bar: true,
        }
    }
}

impl Style {
    /// Height of a framed single-line widget.
    #[inline]
    pub fn frame_height(&self) -> f32 {
        self.font_size + 2.0 * self.frame_padding.y
    }

    fn apply(&mut self, var: StyleVar) {
        match var {
            StyleVar::FontSize(s) => self.font_size = s,
            StyleVar::FramePadding(v) => self.frame_padding = v,
            StyleVar::ItemSpacing(v) => self.item_spacing = v,
            StyleVar::WindowPadding(v) => self.window_padding = v,
            StyleVar::CellPadding(v) => self.cell_padding = v,
        }
    }
}

/// One overridable style metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleVar {
    FontSize(f32),
    FramePadding(Vec2),
    ItemSpacing(Vec2),
    WindowPadding(Vec2),
    CellPadding(Vec2),
}

/// Current value of a bound expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Bool(bool),
    Int(i64),
    Float(f32),
    Str(String),
}

impl Resolved {
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Resolved::Int(i) => Some(*i as f32),
            Resolved::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Resolved::Bool(b) => Some(*b),
            Resolved::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Resolved::Bool(b) => b.to_string(),
            Resolved::Int(i) => i.to_string(),
            Resolved::Float(f) => f.to_string(),
            Resolved::Str(s) => s.clone(),
        }
    }
}

// ── Canvas ────────────────────────────────────────────────────────────────

/// Capability object supplied by the host for one layout pass.
pub trait Canvas {
    /// Effective style, overrides included.
    fn style(&self) -> &Style;

    /// Canvas-space point where the top window starts.
    fn cursor(&self) -> Vec2;

    /// Space available to the top window.
    fn available(&self) -> Vec2;

    /// Size of `text` in the current font, wrapped at `wrap_width` if given.
    fn text_size(&self, text: &str, wrap_width: Option<f32>) -> Vec2;

    /// Current value of a bound expression, if the host can evaluate it.
    fn resolve(&self, expr: &str) -> Option<Resolved>;

    fn push_style(&mut self, var: StyleVar);

    fn pop_style(&mut self, count: usize);

    /// Pixel size of an image file, if known.
    fn texture_size(&self, _file: &str) -> Option<Vec2> {
        None
    }
}

// ── HeadlessCanvas ────────────────────────────────────────────────────────

/// A canvas with fixed-pitch text metrics and a table of bound values. Used
/// by the studio front end and by tests.
#[derive(Debug, Clone)]
pub struct HeadlessCanvas {
    style: Style,
    saved: Vec<Style>,
    cursor: Vec2,
    available: Vec2,
    /// Advance of one character, in pixels at the default font size.
    pub glyph_width: f32,
    bindings: HashMap<String, Resolved>,
    textures: HashMap<String, Vec2>,
}

impl HeadlessCanvas {
    pub fn new(available: Vec2) -> Self {
        Self {
            style: Style::default(),
            saved: Vec::new(),
            cursor: Vec2::zero(),
            available,
            glyph_width: 7.0,
            bindings: HashMap::new(),
            textures: HashMap::new(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_cursor(mut self, cursor: Vec2) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn bind(mut self, expr: impl Into<String>, value: Resolved) -> Self {
        self.bindings.insert(expr.into(), value);
        self
    }

    pub fn texture(mut self, file: impl Into<String>, size: Vec2) -> Self {
        self.textures.insert(file.into(), size);
        self
    }

    /// Number of style overrides currently pushed.
    pub fn style_depth(&self) -> usize {
        self.saved.len()
    }
}

impl Canvas for HeadlessCanvas {
    fn style(&self) -> &Style {
        &self.style
    }

    fn cursor(&self) -> Vec2 {
        self.cursor
    }

    fn available(&self) -> Vec2 {
        self.available
    }

    fn text_size(&self, text: &str, wrap_width: Option<f32>) -> Vec2 {
        let glyph = self.glyph_width * self.style.font_size / 13.0;
        let line_h = self.style.font_size;
        let mut width: f32 = 0.0;
        let mut lines = 0usize;
        for line in text.split('\n') {
            let w = line.chars().count() as f32 * glyph;
            match wrap_width {
                Some(wrap) if wrap > glyph && w > wrap => {
                    let per_line = (wrap / glyph).floor().max(1.0);
                    let chars = line.chars().count() as f32;
                    lines += (chars / per_line).ceil() as usize;
                    width = width.max(per_line * glyph);
                }
                _ => {
                    lines += 1;
                    width = width.max(w);
                }
            }
        }
        if text.is_empty() {
            return Vec2::new(0.0, line_h);
        }
        Vec2::new(width, lines as f32 * line_h)
    }

    fn resolve(&self, expr: &str) -> Option<Resolved> {
        self.bindings.get(expr.trim()).cloned()
    }

    fn push_style(&mut self, var: StyleVar) {
        self.saved.push(self.style.clone());
        self.style.apply(var);
    }

    fn pop_style(&mut self, count: usize) {
        for _ in 0..count {
            match self.saved.pop() {
                Some(s) => self.style = s,
                None => {
                    log::warn!("style stack underflow");
                    break;
                }
            }
        }
    }

    fn texture_size(&self, file: &str) -> Option<Vec2> {
        self.textures.get(file).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_pitch_text() {
        let c = HeadlessCanvas::new(Vec2::new(400.0, 300.0));
        assert_eq!(c.text_size("OK", None), Vec2::new(14.0, 13.0));
        assert_eq!(c.text_size("a\nbcd", None), Vec2::new(21.0, 26.0));
        assert_eq!(c.text_size("", None), Vec2::new(0.0, 13.0));
    }

    #[test]
    fn wrapping_adds_lines() {
        let c = HeadlessCanvas::new(Vec2::new(400.0, 300.0));
        let s = c.text_size("abcdefghij", Some(35.0));
        assert_eq!(s, Vec2::new(35.0, 26.0));
    }

    #[test]
    fn style_stack_is_lifo() {
        let mut c = HeadlessCanvas::new(Vec2::new(100.0, 100.0));
        c.push_style(StyleVar::ItemSpacing(Vec2::new(1.0, 1.0)));
        c.push_style(StyleVar::FontSize(20.0));
        assert_eq!(c.style().font_size, 20.0);
        c.pop_style(1);
        assert_eq!(c.style().font_size, 13.0);
        assert_eq!(c.style().item_spacing, Vec2::new(1.0, 1.0));
        c.pop_style(1);
        assert_eq!(c.style().item_spacing, Vec2::new(8.0, 4.0));
        assert_eq!(c.style_depth(), 0);
    }

    #[test]
    fn bindings_resolve() {
        let c = HeadlessCanvas::new(Vec2::zero()).bind("rows.size()", Resolved::Int(3));
        assert_eq!(c.resolve(" rows.size() ").and_then(|r| r.as_f32()), Some(3.0));
        assert_eq!(c.resolve("missing"), None);
    }
}
