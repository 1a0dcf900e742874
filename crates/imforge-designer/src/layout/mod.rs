//! The layout pass.
//!
//! One pass walks the tree top-down. Every widget is measured with its own
//! origin at zero (containers lay their children out inside that local
//! frame) and then moved into place by its parent's flow, which translates
//! the whole subtree. After the pass each node's [`Geometry`] holds its
//! canvas-space rectangle and, for containers, the region its children
//! were laid out in.
//!
//! [`Geometry`]: crate::node::Geometry

mod boxes;
mod flow;
mod size;

use std::fmt;

use bitflags::bitflags;
use imforge_core::coords::{Rect, Vec2};

use crate::canvas::{Canvas, Style, StyleVar};
use crate::context::NodeId;
use crate::node::UiNode;
use crate::property::{Bindable, DataLoop, Dimension, FieldRef, Placement};
use crate::widget::{Widget, WidgetKind};
use crate::window::TopWindow;

pub use boxes::{BoxLayout, BoxStacks, HBox, VBox};
pub(crate) use flow::layout_of;

// ── GeometryError ─────────────────────────────────────────────────────────

/// A computed size or position that is non-finite or negative.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryError {
    pub node: NodeId,
    pub message: String,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid geometry for node {}: {}", self.node, self.message)
    }
}

impl std::error::Error for GeometryError {}

pub(crate) fn check_rect(node: NodeId, rect: Rect) -> Result<Rect, GeometryError> {
    if !rect.is_finite() {
        return Err(GeometryError { node, message: format!("non-finite rectangle {:?}", rect) });
    }
    if rect.size.x < 0.0 || rect.size.y < 0.0 {
        return Err(GeometryError { node, message: format!("negative size {}x{}", rect.size.x, rect.size.y) });
    }
    Ok(rect)
}

// ── Layout descriptor ─────────────────────────────────────────────────────

bitflags! {
    /// Position of a widget in its parent's flow.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct LayoutFlags: u8 {
        /// First row of its column.
        const TOPMOST  = 1 << 0;
        /// First item of its row.
        const LEFTMOST = 1 << 1;
        /// Its row holds more than one item.
        const H_LAYOUT = 1 << 2;
        /// Its column holds more than one row.
        const V_LAYOUT = 1 << 3;
    }
}

/// Where a widget sits in its parent's flow. Widgets outside the flow
/// (explicitly positioned ones, menus) get the default, empty descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Layout {
    pub flags: LayoutFlags,
    pub col_id: usize,
    pub row_id: usize,
}

// ── LayoutCtx ─────────────────────────────────────────────────────────────

/// The draw context plus value resolution helpers for one pass.
pub(crate) struct LayoutCtx<'a> {
    pub(crate) canvas: &'a mut dyn Canvas,
}

impl<'a> LayoutCtx<'a> {
    pub(crate) fn new(canvas: &'a mut dyn Canvas) -> Self {
        Self { canvas }
    }

    pub(crate) fn style(&self) -> Style {
        self.canvas.style().clone()
    }

    /// Displayed text of a label. Interpolated segments are shown as
    /// written; a bound label shows its current value if the host knows it.
    pub(crate) fn text(&self, label: &Bindable<String>) -> String {
        let raw = match label {
            Bindable::Value(s) => s.clone(),
            Bindable::Bound(e) => self.canvas.resolve(e).map(|r| r.display()).unwrap_or_else(|| e.clone()),
        };
        match raw.split_once("##") {
            Some((shown, _)) => shown.to_string(),
            None => raw,
        }
    }

    pub(crate) fn text_size(&self, text: &str, wrap: Option<f32>) -> Vec2 {
        self.canvas.text_size(text, wrap)
    }

    pub(crate) fn flag(&self, b: &Bindable<bool>, unresolved: bool) -> bool {
        match b {
            Bindable::Value(v) => *v,
            Bindable::Bound(e) => self.canvas.resolve(e).and_then(|r| r.as_bool()).unwrap_or(unresolved),
        }
    }

    pub(crate) fn int(&self, b: &Bindable<i32>, unresolved: i32) -> i32 {
        match b {
            Bindable::Value(v) => *v,
            Bindable::Bound(e) => self.canvas.resolve(e).and_then(|r| r.as_f32()).map_or(unresolved, |v| v as i32),
        }
    }

    pub(crate) fn dimension(&self, b: &Bindable<Dimension>) -> Dimension {
        match b {
            Bindable::Value(d) => *d,
            Bindable::Bound(e) => match self.canvas.resolve(e).and_then(|r| r.as_f32()) {
                Some(v) => Dimension::px(v),
                None => Dimension::Auto,
            },
        }
    }

    /// Current value of a field reference, if the host knows it.
    pub(crate) fn field(&self, f: &FieldRef) -> Option<f32> {
        if f.is_empty() {
            return None;
        }
        self.canvas.resolve(f.name()).and_then(|r| r.as_f32())
    }

    /// Iterations of a data loop. A bound count the host cannot evaluate
    /// counts as one.
    pub(crate) fn loop_count(&self, l: &DataLoop) -> usize {
        self.int(l.count(), 1).max(0) as usize
    }
}

// ── Subtree helpers ───────────────────────────────────────────────────────

/// Moves a measured widget so its rectangle starts at `pos`.
pub(crate) fn move_to(w: &mut Widget, pos: Vec2) {
    if let Some(r) = w.geometry.rect() {
        translate(w, pos - r.origin);
    }
}

pub(crate) fn translate(w: &mut Widget, delta: Vec2) {
    w.geometry.translate(delta);
    for c in &mut w.children {
        translate(c, delta);
    }
}

/// Forgets the geometry of a subtree that is not shown this pass.
pub(crate) fn clear_subtree(children: &mut [Widget]) {
    for c in children {
        c.geometry.clear();
        clear_subtree(&mut c.children);
    }
}

// ── Window pass ───────────────────────────────────────────────────────────

/// Lays out `win` and its whole subtree. Returns the window rectangle.
pub fn layout_window(win: &mut TopWindow, canvas: &mut dyn Canvas) -> Result<Rect, GeometryError> {
    let mut lc = LayoutCtx::new(canvas);
    let mut pushed = 0;
    if let Some(p) = win.style_padding.get() {
        lc.canvas.push_style(StyleVar::WindowPadding(Vec2::new(p.x, p.y)));
        pushed += 1;
    }
    if let Some(s) = win.style_spacing.get() {
        lc.canvas.push_style(StyleVar::ItemSpacing(Vec2::new(s.x, s.y)));
        pushed += 1;
    }
    let result = layout_window_inner(win, &mut lc);
    lc.canvas.pop_style(pushed);
    let rect = result?;
    log::debug!(
        "layout: window {}x{} at ({}, {}), {} widgets",
        rect.size.x,
        rect.size.y,
        rect.origin.x,
        rect.origin.y,
        win.all_children().len()
    );
    Ok(rect)
}

fn window_extent(lc: &LayoutCtx<'_>, d: &Bindable<Dimension>, avail: f32) -> f32 {
    match lc.dimension(d) {
        Dimension::Auto => avail,
        Dimension::Px(v) if v < 0.0 => (avail + v).max(0.0),
        Dimension::Px(v) => v,
        Dimension::Pct(p) => avail * p / 100.0,
    }
}

fn layout_window_inner(win: &mut TopWindow, lc: &mut LayoutCtx<'_>) -> Result<Rect, GeometryError> {
    let style = lc.style();
    let cursor = lc.canvas.cursor();
    let avail = lc.canvas.available();
    let mut size = Vec2::new(window_extent(lc, &win.size_x, avail.x), window_extent(lc, &win.size_y, avail.y));
    let mut origin = cursor;
    match win.placement.get() {
        Placement::None => {}
        Placement::Center => origin = cursor + (avail - size) * 0.5,
        Placement::Maximize => size = avail,
        Placement::Left => size.y = avail.y,
        Placement::Right => {
            origin.x = cursor.x + avail.x - size.x;
            size.y = avail.y;
        }
        Placement::Top => size.x = avail.x,
        Placement::Bottom => {
            origin.y = cursor.y + avail.y - size.y;
            size.x = avail.x;
        }
    }
    let rect = check_rect(win.id(), Rect::from_origin_size(origin, size))?;

    let title_h = if win.has_title_bar() { style.frame_height() } else { 0.0 };
    let mut top = origin.y + title_h;
    let TopWindow { children, geometry, boxes, .. } = win;
    for bar in children.iter_mut().filter(|c| matches!(c.kind, WidgetKind::MenuBar(_))) {
        let s = size::calc_size_ex(bar, Vec2::new(size.x, avail.y), size::Forced::default(), lc)?;
        move_to(bar, Vec2::new(origin.x, top));
        top += s.y;
    }

    let pad = style.window_padding;
    let content = Rect::from_origin_size(
        Vec2::new(origin.x + pad.x, top + pad.y),
        Vec2::new((size.x - 2.0 * pad.x).max(0.0), (origin.y + size.y - top - 2.0 * pad.y).max(0.0)),
    );
    geometry.set_rect(rect);
    geometry.set_content(content);
    flow::flow(children, boxes, content, 1, lc)?;
    debug_assert!(boxes.is_balanced());
    Ok(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{HeadlessCanvas, Resolved};
    use crate::context::UiContext;
    use crate::property::PropertyValue;

    fn canvas() -> HeadlessCanvas {
        HeadlessCanvas::new(Vec2::new(800.0, 600.0))
    }

    #[test]
    fn window_rect_and_content() {
        let mut ctx = UiContext::default();
        let mut win = TopWindow::new(&mut ctx);
        let rect = layout_window(&mut win, &mut canvas()).unwrap();
        assert_eq!(rect, Rect::new(0.0, 0.0, 640.0, 480.0));
        // title bar 19 plus padding 8
        assert_eq!(win.geometry().content(), Some(Rect::new(8.0, 27.0, 624.0, 445.0)));
    }

    #[test]
    fn centered_and_maximized_placement() {
        let mut ctx = UiContext::default();
        let mut win = TopWindow::new(&mut ctx);
        win.placement.set_text("Center").unwrap();
        let rect = layout_window(&mut win, &mut canvas()).unwrap();
        assert_eq!(rect.origin, Vec2::new(80.0, 60.0));
        win.placement.set_text("Maximize").unwrap();
        let rect = layout_window(&mut win, &mut canvas()).unwrap();
        assert_eq!(rect.size, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn non_finite_binding_is_a_geometry_error() {
        let mut ctx = UiContext::default();
        let mut b = Widget::create("Button", &mut ctx).unwrap();
        b.set("size_x", "{w}").unwrap();
        let id = b.id();
        let mut win = TopWindow::new(&mut ctx).with_child(b);
        let mut c = canvas().bind("w", Resolved::Float(f32::INFINITY));
        let err = layout_window(&mut win, &mut c).unwrap_err();
        assert_eq!(err.node, id);
        assert_eq!(c.style_depth(), 0);
    }

    #[test]
    fn style_overrides_are_popped() {
        let mut ctx = UiContext::default();
        let mut win = TopWindow::new(&mut ctx);
        win.style_padding.set_text("2, 2").unwrap();
        let mut c = canvas();
        layout_window(&mut win, &mut c).unwrap();
        assert_eq!(c.style_depth(), 0);
        assert_eq!(win.geometry().content().map(|r| r.origin), Some(Vec2::new(2.0, 21.0)));
    }
}
