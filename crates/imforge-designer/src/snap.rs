//! Interactive editing against the cached layout: dragging and resizing
//! with edge snapping and overlap rejection, and hit testing.
//!
//! All operations read the geometry of the most recent layout pass and
//! write their result back through the property holders, so the next pass
//! reproduces it.

use imforge_core::coords::{Rect, Vec2};

use crate::context::{NodeId, UiContext};
use crate::layout::translate;
use crate::node::{Behavior, UiNode};
use crate::property::Dimension;
use crate::widget::Widget;

// ── Outcomes ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Right,
    Bottom,
}

/// Why an edit left the tree unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotFound,
    /// The node or its parent has not been laid out.
    NoGeometry,
    NoOverlayPos,
    /// The result would overlap this sibling.
    Overlap(NodeId),
    /// The kind does not own a size along the dragged axis.
    NoSize,
    DataBoundSize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    Moved(Rect),
    Resized(Rect),
    Rejected(RejectReason),
}

// ── Snapping ──────────────────────────────────────────────────────────────

/// Nearest candidate within `tolerance` of `value`. Ties go to the earlier
/// candidate.
pub fn snap_value(value: f32, candidates: &[f32], tolerance: f32) -> Option<f32> {
    let mut best: Option<(f32, f32)> = None;
    for &c in candidates {
        let d = (c - value).abs();
        if d <= tolerance && best.is_none_or(|(_, bd)| d < bd) {
            best = Some((c, d));
        }
    }
    best.map(|(c, _)| c)
}

/// Snap targets along one axis for child `index` of `parent`: sibling
/// edges first, in sibling order, then the parent's interior.
fn candidates(parent: &dyn UiNode, index: usize, horizontal: bool) -> Vec<f32> {
    let span = |r: Rect| if horizontal { [r.left(), r.right()] } else { [r.top(), r.bottom()] };
    let mut out = Vec::new();
    for (j, s) in parent.children().iter().enumerate() {
        if j == index || !s.behavior().contains(Behavior::SNAP_SIDES) {
            continue;
        }
        if let Some(r) = s.cached_rect() {
            out.extend(span(r));
        }
    }
    if parent.behavior().contains(Behavior::SNAP_INTERIOR) {
        if let Some(r) = parent.geometry().content() {
            out.extend(span(r));
        }
    }
    out
}

/// Start of a span of `size` at `lo` after snapping whichever of its two
/// edges lands nearer a candidate.
fn snap_span(lo: f32, size: f32, candidates: &[f32], tolerance: f32) -> f32 {
    let hi = lo + size;
    match (snap_value(lo, candidates, tolerance), snap_value(hi, candidates, tolerance)) {
        (Some(a), Some(b)) if (a - lo).abs() <= (b - hi).abs() => a,
        (_, Some(b)) => b - size,
        (Some(a), None) => a,
        (None, None) => lo,
    }
}

/// First sibling of `index` that `rect` would overlap, unless either side
/// allows overlap.
fn overlapping(siblings: &[Widget], index: usize, rect: Rect) -> Option<NodeId> {
    if *siblings[index].base.allow_overlap.get() {
        return None;
    }
    siblings
        .iter()
        .enumerate()
        .filter(|(j, s)| *j != index && !*s.base.allow_overlap.get())
        .find(|(_, s)| s.cached_rect().is_some_and(|r| r.overlaps(rect)))
        .map(|(_, s)| s.id())
}

/// The direct parent of `id` and the child's index in it.
fn parent_of(root: &mut dyn UiNode, id: NodeId) -> Option<(&mut dyn UiNode, usize)> {
    let (parent_id, index) = root.find_child(id)?;
    if parent_id == root.id() {
        return Some((root, index));
    }
    let parent: &mut dyn UiNode = root.find_mut(parent_id)?;
    Some((parent, index))
}

// ── Editing ───────────────────────────────────────────────────────────────

/// Drags widget `id` to `proposed` (canvas coordinates). On success the
/// widget is positioned explicitly, relative to its parent's content
/// region, and its cached subtree is moved along.
pub fn move_widget(root: &mut dyn UiNode, id: NodeId, proposed: Rect, ctx: &mut UiContext) -> DragOutcome {
    let Some((parent, index)) = parent_of(root, id) else {
        return DragOutcome::Rejected(RejectReason::NotFound);
    };
    let w = &parent.children()[index];
    if w.behavior().contains(Behavior::NO_OVERLAY_POS) {
        return DragOutcome::Rejected(RejectReason::NoOverlayPos);
    }
    let (Some(current), Some(region)) = (w.cached_rect(), parent.geometry().content()) else {
        return DragOutcome::Rejected(RejectReason::NoGeometry);
    };

    let tol = ctx.config.snap_tolerance;
    let x = snap_span(proposed.left(), proposed.size.x, &candidates(&*parent, index, true), tol);
    let y = snap_span(proposed.top(), proposed.size.y, &candidates(&*parent, index, false), tol);
    // a negative offset would read as "from the far edge"
    let offset = Vec2::new((x - region.left()).max(0.0), (y - region.top()).max(0.0));
    let rect = Rect::from_origin_size(region.origin + offset, current.size);

    if let Some(other) = overlapping(parent.children(), index, rect) {
        log::trace!("snap: move of {} rejected, overlaps {}", id, other);
        return DragOutcome::Rejected(RejectReason::Overlap(other));
    }

    let w = &mut parent.children_mut()[index];
    w.base.has_pos.set(true);
    w.base.pos_x.set(Dimension::px(offset.x));
    w.base.pos_y.set(Dimension::px(offset.y));
    translate(w, rect.origin - current.origin);
    ctx.mark_modified();
    log::trace!("snap: moved {} to ({}, {})", id, rect.origin.x, rect.origin.y);
    DragOutcome::Moved(rect)
}

/// Drags the `edge` of widget `id` to canvas coordinate `to`.
pub fn resize_widget(root: &mut dyn UiNode, id: NodeId, edge: Edge, to: f32, ctx: &mut UiContext) -> DragOutcome {
    let Some((parent, index)) = parent_of(root, id) else {
        return DragOutcome::Rejected(RejectReason::NotFound);
    };
    let w = &parent.children()[index];
    let (owned, size) = match edge {
        Edge::Right => (Behavior::HAS_SIZE_X, &w.base.size_x),
        Edge::Bottom => (Behavior::HAS_SIZE_Y, &w.base.size_y),
    };
    if !w.behavior().contains(owned) {
        return DragOutcome::Rejected(RejectReason::NoSize);
    }
    if size.is_bound() {
        return DragOutcome::Rejected(RejectReason::DataBoundSize);
    }
    let Some(current) = w.cached_rect() else {
        return DragOutcome::Rejected(RejectReason::NoGeometry);
    };

    let horizontal = edge == Edge::Right;
    let to = snap_value(to, &candidates(&*parent, index, horizontal), ctx.config.snap_tolerance).unwrap_or(to);
    let rect = match edge {
        Edge::Right => Rect::new(current.left(), current.top(), (to - current.left()).max(0.0), current.size.y),
        Edge::Bottom => Rect::new(current.left(), current.top(), current.size.x, (to - current.top()).max(0.0)),
    };

    if let Some(other) = overlapping(parent.children(), index, rect) {
        log::trace!("snap: resize of {} rejected, overlaps {}", id, other);
        return DragOutcome::Rejected(RejectReason::Overlap(other));
    }

    let w = &mut parent.children_mut()[index];
    match edge {
        Edge::Right => w.base.size_x.set_value(Dimension::px(rect.size.x)),
        Edge::Bottom => w.base.size_y.set_value(Dimension::px(rect.size.y)),
    }
    w.geometry.set_rect(rect);
    ctx.mark_modified();
    log::trace!("snap: resized {} to {}x{}", id, rect.size.x, rect.size.y);
    DragOutcome::Resized(rect)
}

// ── Hit testing ───────────────────────────────────────────────────────────

/// Clip applied to the children of `node`, given the clip `node` itself is
/// drawn under.
fn child_clip(node: &Widget, rect: Rect, clip: Rect) -> Option<Rect> {
    if node.behavior().contains(Behavior::SNAP_GRANDPARENT_CLIP) {
        Some(clip)
    } else {
        rect.intersect(clip)
    }
}

fn hit(node: &Widget, clip: Rect, point: Vec2) -> Option<NodeId> {
    let rect = node.cached_rect()?;
    if let Some(inner) = child_clip(node, rect, clip).filter(|c| c.contains(point)) {
        for c in node.children().iter().rev() {
            if let Some(found) = hit(c, inner, point) {
                return Some(found);
            }
        }
    }
    rect.intersect(clip).filter(|v| v.contains(point)).map(|_| node.id())
}

/// Deepest node whose visible rectangle holds `point`. Later siblings are
/// drawn on top and win.
pub fn hit_test(root: &dyn UiNode, point: Vec2) -> Option<NodeId> {
    let clip = root.cached_rect()?;
    if !clip.contains(point) {
        return None;
    }
    root.children().iter().rev().find_map(|c| hit(c, clip, point)).or(Some(root.id()))
}

/// The clip rectangle node `id` is drawn under.
pub fn clip_rect(root: &dyn UiNode, id: NodeId) -> Option<Rect> {
    fn find(kids: &[Widget], clip: Rect, id: NodeId) -> Option<Rect> {
        for c in kids {
            let Some(rect) = c.cached_rect() else {
                continue;
            };
            if c.id() == id {
                return Some(clip);
            }
            if let Some(found) = child_clip(c, rect, clip).and_then(|inner| find(c.children(), inner, id)) {
                return Some(found);
            }
        }
        None
    }
    let clip = root.cached_rect()?;
    if root.id() == id {
        return Some(clip);
    }
    find(root.children(), clip, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::HeadlessCanvas;
    use crate::layout::layout_window;
    use crate::property::Bindable;
    use crate::window::TopWindow;

    fn button(ctx: &mut UiContext, label: &str) -> Widget {
        let mut b = Widget::create("Button", ctx).unwrap();
        b.set("label", label).unwrap();
        b
    }

    /// Window content starts at (8, 27); "A" sits at (8, 27) and "B" at
    /// (8, 50), both 15x19.
    fn two_buttons(ctx: &mut UiContext) -> (TopWindow, NodeId, NodeId) {
        let a = button(ctx, "A");
        let b = button(ctx, "B");
        let (ia, ib) = (a.id(), b.id());
        let mut win = TopWindow::new(ctx).with_child(a).with_child(b);
        layout_window(&mut win, &mut HeadlessCanvas::new(Vec2::new(800.0, 600.0))).unwrap();
        (win, ia, ib)
    }

    #[test]
    fn snaps_within_tolerance() {
        assert_eq!(snap_value(103.0, &[100.0], 5.0), Some(100.0));
        assert_eq!(snap_value(110.0, &[100.0], 5.0), None);
        assert_eq!(snap_value(105.0, &[100.0], 5.0), Some(100.0));
    }

    #[test]
    fn ties_go_to_the_earlier_candidate() {
        assert_eq!(snap_value(103.0, &[98.0, 108.0], 5.0), Some(98.0));
        assert_eq!(snap_value(103.0, &[108.0, 98.0], 5.0), Some(108.0));
    }

    #[test]
    fn move_snaps_to_sibling_edge_and_persists() {
        let mut ctx = UiContext::default();
        let (mut win, _, b) = two_buttons(&mut ctx);
        let out = move_widget(&mut win, b, Rect::new(26.0, 80.0, 15.0, 19.0), &mut ctx);
        assert_eq!(out, DragOutcome::Moved(Rect::new(23.0, 80.0, 15.0, 19.0)));
        assert!(ctx.is_modified());
        let w = win.find(b).unwrap();
        assert!(*w.base.has_pos.get());
        assert_eq!(*w.base.pos_x.get(), Dimension::Px(15.0));
        assert_eq!(*w.base.pos_y.get(), Dimension::Px(53.0));

        layout_window(&mut win, &mut HeadlessCanvas::new(Vec2::new(800.0, 600.0))).unwrap();
        assert_eq!(win.find(b).unwrap().cached_rect(), Some(Rect::new(23.0, 80.0, 15.0, 19.0)));
    }

    #[test]
    fn overlapping_move_is_rejected() {
        let mut ctx = UiContext::default();
        let (mut win, a, b) = two_buttons(&mut ctx);
        let before = win.find(b).unwrap().cached_rect();
        let out = move_widget(&mut win, b, Rect::new(10.0, 30.0, 15.0, 19.0), &mut ctx);
        assert_eq!(out, DragOutcome::Rejected(RejectReason::Overlap(a)));
        assert_eq!(win.find(b).unwrap().cached_rect(), before);
        assert!(!*win.find(b).unwrap().base.has_pos.get());
        assert!(!ctx.is_modified());
    }

    #[test]
    fn allow_overlap_lifts_the_rule() {
        let mut ctx = UiContext::default();
        let (mut win, _, b) = two_buttons(&mut ctx);
        win.find_mut(b).unwrap().set("allow_overlap", "true").unwrap();
        let out = move_widget(&mut win, b, Rect::new(10.0, 30.0, 15.0, 19.0), &mut ctx);
        assert_eq!(out, DragOutcome::Moved(Rect::new(8.0, 27.0, 15.0, 19.0)));
    }

    #[test]
    fn tab_bars_cannot_be_moved() {
        let mut ctx = UiContext::default();
        let bar = Widget::create("TabBar", &mut ctx).unwrap();
        let id = bar.id();
        let mut win = TopWindow::new(&mut ctx).with_child(bar);
        layout_window(&mut win, &mut HeadlessCanvas::new(Vec2::new(800.0, 600.0))).unwrap();
        let out = move_widget(&mut win, id, Rect::new(100.0, 100.0, 10.0, 10.0), &mut ctx);
        assert_eq!(out, DragOutcome::Rejected(RejectReason::NoOverlayPos));
    }

    #[test]
    fn resize_writes_the_size_property() {
        let mut ctx = UiContext::default();
        let (mut win, _, b) = two_buttons(&mut ctx);
        let out = resize_widget(&mut win, b, Edge::Right, 100.0, &mut ctx);
        assert_eq!(out, DragOutcome::Resized(Rect::new(8.0, 50.0, 92.0, 19.0)));
        assert_eq!(win.find(b).unwrap().base.size_x, Bindable::Value(Dimension::Px(92.0)));
        // right edge of the sibling above is a candidate
        let out = resize_widget(&mut win, b, Edge::Right, 25.0, &mut ctx);
        assert_eq!(out, DragOutcome::Resized(Rect::new(8.0, 50.0, 15.0, 19.0)));
    }

    #[test]
    fn resize_rejections() {
        let mut ctx = UiContext::default();
        let text = Widget::create("Text", &mut ctx).unwrap();
        let t = text.id();
        let (win, _, b) = two_buttons(&mut ctx);
        let mut win = win.with_child(text);
        win.find_mut(b).unwrap().set("size_x", "{width}").unwrap();
        assert_eq!(
            resize_widget(&mut win, b, Edge::Right, 100.0, &mut ctx),
            DragOutcome::Rejected(RejectReason::DataBoundSize)
        );
        assert_eq!(resize_widget(&mut win, t, Edge::Bottom, 100.0, &mut ctx), DragOutcome::Rejected(RejectReason::NoSize));
    }

    #[test]
    fn hit_test_finds_the_deepest_node() {
        let mut ctx = UiContext::default();
        let (win, a, _) = two_buttons(&mut ctx);
        assert_eq!(hit_test(&win, Vec2::new(10.0, 30.0)), Some(a));
        assert_eq!(hit_test(&win, Vec2::new(300.0, 300.0)), Some(win.id()));
        assert_eq!(hit_test(&win, Vec2::new(700.0, 300.0)), None);
    }

    #[test]
    fn tab_content_is_clipped_by_the_bar() {
        let mut ctx = UiContext::default();
        let text = Widget::create("Text", &mut ctx).unwrap();
        let t = text.id();
        let tab = Widget::create("TabItem", &mut ctx).unwrap().with_child(text);
        let bar = Widget::create("TabBar", &mut ctx).unwrap().with_child(tab);
        let bar_id = bar.id();
        let mut win = TopWindow::new(&mut ctx).with_child(bar);
        layout_window(&mut win, &mut HeadlessCanvas::new(Vec2::new(800.0, 600.0))).unwrap();
        let bar_rect = win.find(bar_id).unwrap().cached_rect();
        assert_eq!(clip_rect(&win, t), bar_rect);
        let text_rect = win.find(t).unwrap().cached_rect().unwrap();
        assert_eq!(hit_test(&win, text_rect.origin + Vec2::new(1.0, 1.0)), Some(t));
    }
}
