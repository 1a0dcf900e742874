//! The node tree: capabilities, cached geometry and the generic tree
//! operations shared by [`Widget`] and [`TopWindow`](crate::window::TopWindow).

use std::fmt::Write as _;

use bitflags::bitflags;
use imforge_core::coords::{Rect, Vec2};

use crate::context::{NodeId, UiContext};
use crate::property::{edit_property, Prop, PropMut, PropertyEditor, ValueError};
use crate::widget::{Widget, WidgetKind};

// ── Behavior ──────────────────────────────────────────────────────────────

bitflags! {
    /// Layout and editor capabilities of a node kind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Behavior: u32 {
        /// Edges are snap targets for siblings.
        const SNAP_SIDES            = 1 << 0;
        /// Interior edges are snap targets for children.
        const SNAP_INTERIOR         = 1 << 1;
        /// Children are clipped against the grandparent, not this node.
        const SNAP_GRANDPARENT_CLIP = 1 << 2;
        const NO_CONTEXT_MENU       = 1 << 3;
        /// Explicit positioning makes no sense for this kind.
        const NO_OVERLAY_POS        = 1 << 4;
        const HAS_SIZE_X            = 1 << 5;
        const HAS_SIZE_Y            = 1 << 6;

        const HAS_SIZE = Self::HAS_SIZE_X.bits() | Self::HAS_SIZE_Y.bits();
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────

/// Result of the most recent layout pass. Empty until a pass has run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Geometry {
    rect: Option<Rect>,
    content: Option<Rect>,
}

impl Geometry {
    #[inline]
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    pub fn pos(&self) -> Option<Vec2> {
        self.rect.map(|r| r.origin)
    }

    pub fn size(&self) -> Option<Vec2> {
        self.rect.map(|r| r.size)
    }

    /// Region children were laid out in.
    #[inline]
    pub fn content(&self) -> Option<Rect> {
        self.content
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = Some(rect);
    }

    pub(crate) fn set_content(&mut self, region: Rect) {
        self.content = Some(region);
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.rect = self.rect.map(|r| r.translate(delta));
        self.content = self.content.map(|r| r.translate(delta));
    }

    pub(crate) fn clear(&mut self) {
        *self = Geometry::default();
    }
}

// ── User code ─────────────────────────────────────────────────────────────

/// Free-form host code emitted verbatim before and after a node's
/// generated statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserCode {
    before: String,
    after: String,
}

pub(crate) const USER_CODE_END: &str = "/// @user-end";

fn check_user_code(code: &str) -> Result<(), ValueError> {
    if code.lines().any(|l| l.trim() == USER_CODE_END) {
        return Err(ValueError::new("user code may not contain a `/// @user-end` line"));
    }
    Ok(())
}

impl UserCode {
    #[inline]
    pub fn before(&self) -> &str {
        &self.before
    }

    #[inline]
    pub fn after(&self) -> &str {
        &self.after
    }

    pub fn set_before(&mut self, code: &str) -> Result<(), ValueError> {
        check_user_code(code)?;
        self.before = code.to_string();
        Ok(())
    }

    pub fn set_after(&mut self, code: &str) -> Result<(), ValueError> {
        check_user_code(code)?;
        self.after = code.to_string();
        Ok(())
    }
}

// ── UiNode ────────────────────────────────────────────────────────────────

/// A tree element with owned children and cached layout geometry.
///
/// Implementors supply the accessors; the tree operations are provided.
pub trait UiNode {
    fn id(&self) -> NodeId;

    fn type_name(&self) -> &'static str;

    fn behavior(&self) -> Behavior;

    fn children(&self) -> &[Widget];

    fn children_mut(&mut self) -> &mut Vec<Widget>;

    fn geometry(&self) -> &Geometry;

    /// Ordered property descriptors (editor order, export order).
    fn properties(&self) -> Vec<Prop<'_>>;

    fn properties_mut(&mut self) -> Vec<PropMut<'_>>;

    fn events(&self) -> Vec<Prop<'_>>;

    fn events_mut(&mut self) -> Vec<PropMut<'_>>;

    fn user_code(&self) -> &UserCode;

    fn user_code_mut(&mut self) -> &mut UserCode;

    /// Whether a widget of `kind` may be placed directly inside this node.
    fn accepts_child(&self, kind: &WidgetKind) -> bool;

    /// One-line label for outlines.
    fn describe(&self) -> String;

    #[inline]
    fn cached_rect(&self) -> Option<Rect> {
        self.geometry().rect()
    }

    /// Lets `editor` edit property `index`. Returns whether it changed.
    ///
    /// # Panics
    /// If `index` is out of range.
    fn property_ui(&mut self, index: usize, editor: &mut dyn PropertyEditor, ctx: &mut UiContext) -> bool {
        let mut props = self.properties_mut();
        assert!(index < props.len(), "property index {} out of range ({} properties)", index, props.len());
        edit_property(props.swap_remove(index), editor, ctx)
    }

    /// Lets `editor` edit event `index`. Returns whether it changed.
    ///
    /// # Panics
    /// If `index` is out of range.
    fn event_ui(&mut self, index: usize, editor: &mut dyn PropertyEditor, ctx: &mut UiContext) -> bool {
        let mut events = self.events_mut();
        assert!(index < events.len(), "event index {} out of range ({} events)", index, events.len());
        edit_property(events.swap_remove(index), editor, ctx)
    }

    /// Direct parent of `target` and its index among siblings, searching the
    /// whole subtree.
    fn find_child(&self, target: NodeId) -> Option<(NodeId, usize)> {
        for (i, c) in self.children().iter().enumerate() {
            if c.id() == target {
                return Some((self.id(), i));
            }
            if let Some(found) = c.find_child(target) {
                return Some(found);
            }
        }
        None
    }

    fn find(&self, id: NodeId) -> Option<&Widget> {
        for c in self.children() {
            if c.id() == id {
                return Some(c);
            }
            if let Some(found) = c.find(id) {
                return Some(found);
            }
        }
        None
    }

    fn find_mut(&mut self, id: NodeId) -> Option<&mut Widget> {
        for c in self.children_mut().iter_mut() {
            if c.id() == id {
                return Some(c);
            }
            if let Some(found) = c.find_mut(id) {
                return Some(found);
            }
        }
        None
    }

    /// Descendants whose cached rect touches `rect`, parents before
    /// children. Nodes without geometry are skipped.
    fn find_in_rect(&self, rect: Rect) -> Vec<NodeId> {
        let mut out = Vec::new();
        for c in self.all_children() {
            if c.cached_rect().is_some_and(|r| r.touches(rect)) {
                out.push(c.id());
            }
        }
        out
    }

    /// Every descendant, depth first.
    fn all_children(&self) -> Vec<&Widget> {
        fn walk<'a>(node: &'a [Widget], out: &mut Vec<&'a Widget>) {
            for c in node {
                out.push(c);
                walk(c.children(), out);
            }
        }
        let mut out = Vec::new();
        walk(self.children(), &mut out);
        out
    }

    /// Appends deep copies of `source`'s children with fresh identities.
    fn clone_children_from(&mut self, source: &dyn UiNode, ctx: &mut UiContext) {
        for c in source.children() {
            let copy = c.clone_in(ctx);
            self.children_mut().push(copy);
        }
    }

    /// Renames exact-token references to field `old` across the subtree.
    /// Returns the number of holders changed.
    fn rename_field_vars(&mut self, old: &str, new: &str) -> usize {
        let mut n = 0;
        for p in self.properties_mut() {
            if p.value.rename_field(old, new) {
                n += 1;
            }
        }
        for c in self.children_mut().iter_mut() {
            n += c.rename_field_vars(old, new);
        }
        n
    }

    /// Multiplies every fixed pixel quantity in the subtree by `factor`.
    fn scale_dimensions(&mut self, factor: f32) {
        for p in self.properties_mut() {
            p.value.scale(factor);
        }
        for c in self.children_mut().iter_mut() {
            c.scale_dimensions(factor);
        }
    }

    /// Inserts `child` at `index` (clamped). A child this node does not
    /// accept is handed back.
    fn insert_child(&mut self, index: usize, child: Widget) -> Result<(), Widget> {
        if !self.accepts_child(&child.kind) {
            return Err(child);
        }
        let kids = self.children_mut();
        let at = index.min(kids.len());
        kids.insert(at, child);
        Ok(())
    }

    /// Detaches node `id` from anywhere in the subtree.
    fn remove_child(&mut self, id: NodeId) -> Option<Widget> {
        let kids = self.children_mut();
        if let Some(i) = kids.iter().position(|c| c.id() == id) {
            return Some(kids.remove(i));
        }
        kids.iter_mut().find_map(|c| c.remove_child(id))
    }

    /// Indented tree of [`describe`](UiNode::describe) lines with cached
    /// rectangles.
    fn outline(&self) -> String {
        fn line(out: &mut String, depth: usize, label: &str, rect: Option<Rect>) {
            let _ = write!(out, "{:indent$}{}", "", label, indent = depth * 2);
            if let Some(r) = rect {
                let _ = write!(out, "  [{} {} {}x{}]", r.origin.x, r.origin.y, r.size.x, r.size.y);
            }
            out.push('\n');
        }
        fn walk(out: &mut String, depth: usize, kids: &[Widget]) {
            for c in kids {
                line(out, depth, &c.describe(), c.cached_rect());
                walk(out, depth + 1, c.children());
            }
        }
        let mut out = String::new();
        line(&mut out, 0, &self.describe(), self.cached_rect());
        walk(&mut out, 1, self.children());
        out
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::property::{Bindable, Dimension};
    use crate::window::TopWindow;

    fn widget(ctx: &mut UiContext, ty: &str, props: &[(&str, &str)]) -> Widget {
        let mut w = Widget::create(ty, ctx).unwrap();
        for (k, v) in props {
            w.set(k, v).unwrap();
        }
        w
    }

    fn sample(ctx: &mut UiContext) -> TopWindow {
        let check = widget(ctx, "CheckBox", &[("field", "done"), ("label", "Done {done}")]);
        let input = widget(ctx, "Input", &[("field", "done_text"), ("size_x", "{done * 2}")]);
        let child = widget(ctx, "Child", &[("size_x", "120"), ("size_y", "50%")]).with_child(input);
        TopWindow::new(ctx).with_child(check).with_child(child)
    }

    #[test]
    fn find_child_reports_parent_and_index() {
        let mut ctx = UiContext::default();
        let win = sample(&mut ctx);
        let child = &win.children()[1];
        let input = child.children()[0].id();
        assert_eq!(win.find_child(child.id()), Some((win.id(), 1)));
        assert_eq!(win.find_child(input), Some((child.id(), 0)));
        assert_eq!(win.find(input).map(|w| w.type_name()), Some("Input"));
        assert!(win.find_child(win.id()).is_none());
    }

    #[test]
    fn find_child_on_a_cloned_subtree() {
        let mut ctx = UiContext::default();
        let win = sample(&mut ctx);
        let mut copy = TopWindow::new(&mut ctx);
        copy.clone_children_from(&win, &mut ctx);
        let original = win.children()[1].children()[0].id();
        let cloned = copy.children()[1].children()[0].id();
        assert!(copy.find_child(original).is_none());
        assert_eq!(copy.find_child(cloned), Some((copy.children()[1].id(), 0)));
        assert_eq!(copy, win);
    }

    #[test]
    fn rename_touches_exact_tokens_only() {
        let mut ctx = UiContext::default();
        let mut win = sample(&mut ctx);
        // field, label interpolation and the bound width; `done_text` stays
        assert_eq!(win.rename_field_vars("done", "finished"), 3);
        let check = &win.children()[0];
        let labels: Vec<_> = check.properties().iter().map(|p| (p.name, p.value.to_text())).collect();
        assert!(labels.contains(&("field", "finished".to_string())));
        assert!(labels.contains(&("label", "Done {finished}".to_string())));
        assert_eq!(win.rename_field_vars("done", "x"), 0);
    }

    #[test]
    fn insert_and_remove() {
        let mut ctx = UiContext::default();
        let mut win = sample(&mut ctx);
        let tab = Widget::create("TabItem", &mut ctx).unwrap();
        assert!(win.insert_child(0, tab).is_err());
        let text = Widget::create("Text", &mut ctx).unwrap();
        let id = text.id();
        win.insert_child(99, text).unwrap();
        assert_eq!(win.find_child(id), Some((win.id(), 2)));
        let input = win.children()[1].children()[0].id();
        assert!(win.remove_child(input).is_some());
        assert!(win.children()[1].children().is_empty());
        assert!(win.remove_child(input).is_none());
    }

    #[test]
    fn user_code_rejects_the_end_marker() {
        let mut uc = UserCode::default();
        assert!(uc.set_before("x();").is_ok());
        assert!(uc.set_after("/// @user-end").is_err());
        assert_eq!(uc.before(), "x();");
    }

    fn size_x(w: &Widget) -> Bindable<Dimension> {
        w.base.size_x.clone()
    }

    proptest! {
        #[test]
        fn scaling_composes(k1 in 0.25f32..4.0, k2 in 0.25f32..4.0) {
            let mut ctx = UiContext::default();
            let mut a = sample(&mut ctx);
            let mut b = sample(&mut ctx);
            a.scale_dimensions(k1);
            a.scale_dimensions(k2);
            b.scale_dimensions(k1 * k2);

            let (Bindable::Value(Dimension::Px(x)), Bindable::Value(Dimension::Px(y))) =
                (size_x(&a.children()[1]), size_x(&b.children()[1]))
            else {
                panic!("fixed width lost");
            };
            prop_assert!((x - y).abs() < 1e-3 * y.abs().max(1.0));
            prop_assert!((x - 120.0 * k1 * k2).abs() < 1e-2);

            let child = &a.children()[1];
            prop_assert_eq!(child.base.size_y.clone(), Bindable::Value(Dimension::Pct(50.0)));
            prop_assert_eq!(size_x(&child.children()[0]), Bindable::Bound("done * 2".to_string()));
        }
    }
}
