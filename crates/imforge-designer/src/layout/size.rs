//! Per-kind measurement. Every widget is measured at origin zero; containers
//! lay their children out in that local frame before the parent moves them.

use imforge_core::coords::{Rect, Vec2};

use super::flow::flow;
use super::{check_rect, clear_subtree, move_to, GeometryError, LayoutCtx};
use crate::canvas::{Style, StyleVar};
use crate::node::{Behavior, UiNode};
use crate::property::{ArrowDir, Bindable, Dimension};
use crate::widget::{Widget, WidgetKind};

/// Sizes imposed by the parent's box distribution. They win over both the
/// widget's own size properties and its natural size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Forced {
    pub(crate) w: Option<f32>,
    pub(crate) h: Option<f32>,
}

/// Measures `w` given the space its parent offers and caches the result as
/// a rectangle at origin zero.
pub(crate) fn calc_size_ex(
    w: &mut Widget,
    avail: Vec2,
    forced: Forced,
    lc: &mut LayoutCtx<'_>,
) -> Result<Vec2, GeometryError> {
    let id = w.id();
    let vars: Vec<StyleVar> = w.base.style_frame_padding.get().iter().map(|p| StyleVar::FramePadding(Vec2::new(p.x, p.y))).collect();
    let size = scoped(lc, &vars, |lc| measure(w, avail, forced, lc))?;
    let rect = check_rect(id, Rect::from_origin_size(Vec2::zero(), size))?;
    w.geometry.set_rect(rect);
    Ok(size)
}

/// Runs `f` with `vars` pushed, popping them again whatever `f` returns.
fn scoped<T>(
    lc: &mut LayoutCtx<'_>,
    vars: &[StyleVar],
    f: impl FnOnce(&mut LayoutCtx<'_>) -> Result<T, GeometryError>,
) -> Result<T, GeometryError> {
    for v in vars {
        lc.canvas.push_style(*v);
    }
    let result = f(lc);
    lc.canvas.pop_style(vars.len());
    result
}

/// Size along one axis from the widget's own size property. `None` means
/// the natural size applies.
fn axis(lc: &LayoutCtx<'_>, d: &Bindable<Dimension>, owned: bool, avail: f32, forced: Option<f32>) -> Option<f32> {
    if forced.is_some() {
        return forced;
    }
    if !owned {
        return None;
    }
    match lc.dimension(d) {
        Dimension::Auto => None,
        Dimension::Px(v) if v < 0.0 => Some((avail + v).max(0.0)),
        Dimension::Px(v) => Some(v),
        Dimension::Pct(p) => Some(avail * p / 100.0),
    }
}

/// Total extent of `n` repetitions of a body separated by `spacing`.
fn repeat(body: f32, n: usize, spacing: f32) -> f32 {
    if n == 0 {
        return 0.0;
    }
    body * n as f32 + spacing * (n - 1) as f32
}

/// A pane's minimum length out of `span`. `auto` imposes none.
fn min_extent(d: Dimension, span: f32) -> f32 {
    match d {
        Dimension::Auto => 0.0,
        Dimension::Px(v) => v.max(0.0),
        Dimension::Pct(p) => span * p / 100.0,
    }
}

/// Width a side label adds to a framed widget.
fn side_label(lc: &LayoutCtx<'_>, label: &str, st: &Style) -> f32 {
    let shown = label.split_once("##").map_or(label, |(s, _)| s);
    if shown.is_empty() {
        return 0.0;
    }
    st.item_inner_spacing.x + lc.text_size(shown, None).x
}

/// A check mark or radio circle followed by its label.
fn ticked(lc: &LayoutCtx<'_>, label: &Bindable<String>, st: &Style) -> Vec2 {
    let square = st.frame_height();
    let text = lc.text(label);
    if text.is_empty() {
        return Vec2::new(square, square);
    }
    let ts = lc.text_size(&text, None);
    Vec2::new(square + st.item_inner_spacing.x + ts.x, square.max(ts.y))
}

fn measure(w: &mut Widget, avail: Vec2, forced: Forced, lc: &mut LayoutCtx<'_>) -> Result<Vec2, GeometryError> {
    let behavior = w.behavior();
    let st = lc.style();
    let sx = axis(lc, &w.base.size_x, behavior.contains(Behavior::HAS_SIZE_X), avail.x, forced.w);
    let sy = axis(lc, &w.base.size_y, behavior.contains(Behavior::HAS_SIZE_Y), avail.y, forced.h);
    let fit = |natural: Vec2| Vec2::new(sx.unwrap_or(natural.x), sy.unwrap_or(natural.y));
    let item_w = avail.x * st.item_width_ratio;
    let frame_h = st.frame_height();

    let Widget { kind, children, geometry, boxes, .. } = w;
    let size = match kind {
        WidgetKind::Spacer(_) => fit(Vec2::zero()),
        WidgetKind::Separator(s) => {
            let thickness = s.style_thickness.get().map_or(st.separator_thickness, |p| p.0);
            let text = lc.text(&s.label);
            let h = if text.is_empty() { thickness } else { lc.text_size(&text, None).y.max(thickness) };
            fit(Vec2::new(avail.x, h))
        }
        WidgetKind::Text(t) => {
            let wrap = (*t.wrap.get()).then_some(avail.x);
            let mut s = lc.text_size(&lc.text(&t.text), wrap);
            if *t.align_to_frame.get() {
                s.y = s.y.max(frame_h);
            }
            fit(s)
        }
        WidgetKind::Selectable(s) => {
            let ts = lc.text_size(&lc.text(&s.label), None);
            let h = if *s.align_to_frame.get() { ts.y.max(frame_h) } else { ts.y };
            fit(Vec2::new(avail.x.max(ts.x), h))
        }
        WidgetKind::Button(b) => {
            let natural = if *b.arrow_dir.get() != ArrowDir::None {
                Vec2::new(frame_h, frame_h)
            } else {
                let ts = lc.text_size(&lc.text(&b.label), None);
                if *b.small.get() {
                    Vec2::new(ts.x + 2.0 * st.frame_padding.x, ts.y)
                } else {
                    ts + st.frame_padding * 2.0
                }
            };
            fit(natural)
        }
        WidgetKind::CheckBox(c) => fit(ticked(lc, &c.label, &st)),
        WidgetKind::RadioButton(r) => fit(ticked(lc, &r.label, &st)),
        WidgetKind::Input(i) => {
            let h = if i.is_multiline() { st.font_size * 8.0 + 2.0 * st.frame_padding.y } else { frame_h };
            fit(Vec2::new(item_w + side_label(lc, i.label.get(), &st), h))
        }
        WidgetKind::Combo(c) => fit(Vec2::new(item_w + side_label(lc, c.label.get(), &st), frame_h)),
        WidgetKind::Slider(s) => fit(Vec2::new(item_w + side_label(lc, s.label.get(), &st), frame_h)),
        WidgetKind::ColorEdit(c) => fit(Vec2::new(item_w + side_label(lc, c.label.get(), &st), frame_h)),
        WidgetKind::ProgressBar(_) | WidgetKind::CustomWidget(_) => fit(Vec2::new(item_w, frame_h)),
        WidgetKind::Image(i) => {
            let file = lc.text(&i.file_name);
            let natural = lc.canvas.texture_size(&file).unwrap_or(Vec2::new(st.font_size, st.font_size));
            fit(natural)
        }

        WidgetKind::Child(c) => {
            let pad = c.style_padding.get().map_or(st.window_padding, |p| Vec2::new(p.x, p.y));
            let width = sx.unwrap_or(avail.x);
            let columns = lc.int(&c.column_count, 1).max(1) as usize;
            let mut top = 0.0;
            for bar in children.iter_mut().filter(|k| matches!(k.kind, WidgetKind::MenuBar(_))) {
                let s = calc_size_ex(bar, Vec2::new(width, avail.y), Forced::default(), lc)?;
                move_to(bar, Vec2::new(0.0, top));
                top += s.y;
            }
            let inner_h = (sy.unwrap_or(avail.y) - top - 2.0 * pad.y).max(0.0);
            let region = Rect::from_origin_size(Vec2::new(pad.x, top + pad.y), Vec2::new((width - 2.0 * pad.x).max(0.0), inner_h));
            let vars: Vec<StyleVar> = c.style_spacing.get().iter().map(|s| StyleVar::ItemSpacing(Vec2::new(s.x, s.y))).collect();
            let extent = scoped(lc, &vars, |lc| flow(children, boxes, region, columns, lc))?;
            let body = repeat(extent.y, lc.loop_count(&c.item_count), st.item_spacing.y);
            geometry.set_content(Rect::from_origin_size(region.origin, Vec2::new(region.size.x, sy.map_or(body, |_| inner_h))));
            Vec2::new(width, sy.unwrap_or(top + body + 2.0 * pad.y))
        }
        WidgetKind::Table(t) => {
            let cp = t.style_cell_padding.get().map_or(st.cell_padding, |p| Vec2::new(p.x, p.y));
            let width = sx.unwrap_or(avail.x);
            let columns = t.columns.get().len().max(1);
            let header_h = if *t.header.get() { st.font_size + 2.0 * cp.y } else { 0.0 };
            let region = Rect::from_origin_size(
                Vec2::new(cp.x, header_h + cp.y),
                Vec2::new((width - 2.0 * cp.x).max(0.0), (sy.unwrap_or(avail.y) - header_h - 2.0 * cp.y).max(0.0)),
            );
            let extent = flow(children, boxes, region, columns, lc)?;
            let row_h = (extent.y + 2.0 * cp.y).max(t.row_height.get().0);
            let body = repeat(row_h, lc.loop_count(&t.row_count), 0.0);
            geometry.set_content(Rect::from_origin_size(region.origin, Vec2::new(region.size.x, extent.y)));
            Vec2::new(width, sy.unwrap_or(header_h + body))
        }
        WidgetKind::CollapsingHeader(h) => {
            if lc.flag(&h.open, true) {
                let region = Rect::from_origin_size(
                    Vec2::new(0.0, frame_h + st.item_spacing.y),
                    Vec2::new(avail.x, (avail.y - frame_h - st.item_spacing.y).max(0.0)),
                );
                let extent = flow(children, boxes, region, 1, lc)?;
                geometry.set_content(Rect::from_origin_size(region.origin, Vec2::new(avail.x, extent.y)));
                Vec2::new(avail.x, region.top() + extent.y)
            } else {
                clear_subtree(children);
                geometry.set_content(Rect::from_origin_size(Vec2::new(0.0, frame_h), Vec2::new(avail.x, 0.0)));
                Vec2::new(avail.x, frame_h)
            }
        }
        WidgetKind::TreeNode(n) => {
            let header = if n.flags.get().contains("ImGuiTreeNodeFlags_Framed") { frame_h } else { st.font_size };
            if lc.flag(&n.open, true) {
                let region = Rect::from_origin_size(
                    Vec2::new(st.indent_spacing, header + st.item_spacing.y),
                    Vec2::new((avail.x - st.indent_spacing).max(0.0), (avail.y - header - st.item_spacing.y).max(0.0)),
                );
                let extent = flow(children, boxes, region, 1, lc)?;
                geometry.set_content(Rect::from_origin_size(region.origin, Vec2::new(region.size.x, extent.y)));
                Vec2::new(avail.x, region.top() + extent.y)
            } else {
                clear_subtree(children);
                geometry.set_content(Rect::from_origin_size(Vec2::new(st.indent_spacing, header), Vec2::new(avail.x, 0.0)));
                Vec2::new(avail.x, header)
            }
        }
        WidgetKind::TabBar(tb) => {
            let strip = frame_h;
            let active = lc.field(&tb.active_tab).map_or(0, |v| v.max(0.0) as usize).min(children.len().saturating_sub(1));
            let region = Rect::from_origin_size(
                Vec2::new(0.0, strip + st.item_spacing.y),
                Vec2::new(avail.x, (avail.y - strip - st.item_spacing.y).max(0.0)),
            );
            let mut x = 0.0;
            let mut body = 0.0;
            for (k, tab) in children.iter_mut().enumerate() {
                let tab_id = tab.id();
                let Widget { kind: tab_kind, children: kids, geometry: tab_geom, boxes: tab_boxes, .. } = tab;
                tab_geom.clear();
                let WidgetKind::TabItem(item) = tab_kind else {
                    clear_subtree(kids);
                    continue;
                };
                let mut tw = lc.text_size(&lc.text(&item.label), None).x + 2.0 * st.frame_padding.x;
                if *item.close_button.get() {
                    tw += st.item_inner_spacing.x + st.font_size;
                }
                tab_geom.set_rect(check_rect(tab_id, Rect::new(x, 0.0, tw, strip))?);
                x += tw + st.item_inner_spacing.x;
                if k == active {
                    let extent = flow(kids, tab_boxes, region, 1, lc)?;
                    tab_geom.set_content(Rect::from_origin_size(region.origin, Vec2::new(region.size.x, extent.y)));
                    body = extent.y;
                } else {
                    clear_subtree(kids);
                }
            }
            geometry.set_content(Rect::from_origin_size(region.origin, Vec2::new(region.size.x, body)));
            Vec2::new(avail.x, region.top() + body)
        }
        WidgetKind::TabItem(_) => {
            // Tabs are placed by their bar; measured alone a tab is a bare header.
            clear_subtree(children);
            Vec2::new(2.0 * st.frame_padding.x, frame_h)
        }
        WidgetKind::Splitter(sp) => {
            let width = sx.unwrap_or(avail.x);
            let height = sy.unwrap_or(avail.y);
            let side_by_side = width >= height;
            let (total, bar) = if side_by_side { (width, st.item_spacing.x) } else { (height, st.item_spacing.y) };
            let min1 = min_extent(*sp.min_size1.get(), total - bar);
            let min2 = min_extent(*sp.min_size2.get(), total - bar);
            let hi = (total - bar - min2).max(min1);
            let first = lc.field(&sp.position).unwrap_or((total - bar) / 2.0).clamp(min1, hi);
            let second = (total - first - bar).max(0.0);
            let panes = if side_by_side {
                [Rect::new(0.0, 0.0, first, height), Rect::new(first + bar, 0.0, second, height)]
            } else {
                [Rect::new(0.0, 0.0, width, first), Rect::new(0.0, first + bar, width, second)]
            };
            for (k, c) in children.iter_mut().enumerate() {
                match panes.get(k) {
                    Some(pane) => {
                        let forced = Forced { w: Some(pane.size.x), h: Some(pane.size.y) };
                        calc_size_ex(c, pane.size, forced, lc)?;
                        move_to(c, pane.origin);
                    }
                    None => {
                        c.geometry.clear();
                        clear_subtree(&mut c.children);
                    }
                }
            }
            geometry.set_content(Rect::new(0.0, 0.0, width, height));
            Vec2::new(width, height)
        }

        WidgetKind::MenuBar(_) => {
            let mut x = st.window_padding.x;
            for item in children.iter_mut() {
                let item_id = item.id();
                let Widget { kind: item_kind, children: kids, geometry: item_geom, .. } = item;
                item_geom.clear();
                let WidgetKind::MenuIt(m) = item_kind else {
                    continue;
                };
                let iw = lc.text_size(&lc.text(&m.label), None).x + 2.0 * st.item_spacing.x;
                item_geom.set_rect(check_rect(item_id, Rect::new(x, 0.0, iw, frame_h))?);
                dropdown(kids, Vec2::new(x, frame_h), lc)?;
                x += iw;
            }
            geometry.set_content(Rect::new(0.0, 0.0, avail.x, frame_h));
            Vec2::new(avail.x, frame_h)
        }
        WidgetKind::MenuIt(m) => {
            let iw = lc.text_size(&lc.text(&m.label), None).x + 2.0 * st.item_spacing.x;
            dropdown(children, Vec2::new(iw, 0.0), lc)?;
            Vec2::new(iw, frame_h)
        }
    };
    Ok(size)
}

/// Lays out a vertical drop-down of menu entries at `origin`. Entries with
/// children open their own drop-down to the right.
fn dropdown(items: &mut [Widget], origin: Vec2, lc: &mut LayoutCtx<'_>) -> Result<(), GeometryError> {
    if items.is_empty() {
        return Ok(());
    }
    let st = lc.style();
    let pad = st.window_padding;
    let row_h = st.font_size + st.item_spacing.y;

    let mut width: f32 = 0.0;
    for it in items.iter() {
        if let WidgetKind::MenuIt(m) = &it.kind {
            let mut w = lc.text_size(&lc.text(&m.label), None).x;
            if !m.shortcut.get().is_empty() {
                w += 2.0 * st.item_spacing.x + lc.text_size(m.shortcut.get(), None).x;
            }
            width = width.max(w);
        }
    }
    // check mark and submenu arrow columns
    width += 2.0 * pad.x + 2.0 * st.font_size;

    let mut y = origin.y + pad.y;
    for it in items.iter_mut() {
        let id = it.id();
        let Widget { kind, children, geometry, .. } = it;
        if let WidgetKind::MenuIt(m) = kind {
            if *m.separator.get() {
                y += st.item_spacing.y + st.separator_thickness;
            }
        }
        geometry.clear();
        geometry.set_rect(check_rect(id, Rect::new(origin.x, y, width, row_h))?);
        dropdown(children, Vec2::new(origin.x + width, y - pad.y), lc)?;
        y += row_h;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{HeadlessCanvas, Resolved};
    use crate::context::UiContext;
    use crate::layout::LayoutCtx;

    fn measure_one(w: &mut Widget, canvas: &mut HeadlessCanvas) -> Vec2 {
        let mut lc = LayoutCtx::new(canvas);
        calc_size_ex(w, Vec2::new(400.0, 300.0), Forced::default(), &mut lc).unwrap()
    }

    #[test]
    fn button_is_text_plus_frame_padding() {
        let mut ctx = UiContext::default();
        let mut canvas = HeadlessCanvas::new(Vec2::new(800.0, 600.0));
        let glyph = canvas.glyph_width;
        let mut b = Widget::create("Button", &mut ctx).unwrap();
        b.set("label", "OK").unwrap();
        let s = measure_one(&mut b, &mut canvas);
        assert_eq!(s, Vec2::new(2.0 * glyph + 8.0, 19.0));
        assert_eq!(b.geometry().rect(), Some(Rect::new(0.0, 0.0, s.x, s.y)));
    }

    #[test]
    fn explicit_and_relative_sizes() {
        let mut ctx = UiContext::default();
        let mut canvas = HeadlessCanvas::new(Vec2::new(800.0, 600.0));
        let mut b = Widget::create("Button", &mut ctx).unwrap();
        b.set("size_x", "120").unwrap();
        b.set("size_y", "-100").unwrap();
        assert_eq!(measure_one(&mut b, &mut canvas), Vec2::new(120.0, 200.0));
        b.set("size_x", "50%").unwrap();
        assert_eq!(measure_one(&mut b, &mut canvas).x, 200.0);
    }

    #[test]
    fn frame_padding_override_is_scoped() {
        let mut ctx = UiContext::default();
        let mut canvas = HeadlessCanvas::new(Vec2::new(800.0, 600.0));
        let mut b = Widget::create("Button", &mut ctx).unwrap();
        b.set("style_frame_padding", "10, 10").unwrap();
        let s = measure_one(&mut b, &mut canvas);
        assert_eq!(s.y, 13.0 + 20.0);
        assert_eq!(canvas.style_depth(), 0);
    }

    #[test]
    fn closed_header_hides_children() {
        let mut ctx = UiContext::default();
        let mut canvas = HeadlessCanvas::new(Vec2::new(800.0, 600.0)).bind("open", Resolved::Bool(false));
        let text = Widget::create("Text", &mut ctx).unwrap();
        let mut h = Widget::create("CollapsingHeader", &mut ctx).unwrap().with_child(text);
        h.set("open", "{open}").unwrap();
        let s = measure_one(&mut h, &mut canvas);
        assert_eq!(s, Vec2::new(400.0, 19.0));
        assert_eq!(h.children()[0].cached_rect(), None);
    }

    #[test]
    fn table_multiplies_rows() {
        let mut ctx = UiContext::default();
        let mut canvas = HeadlessCanvas::new(Vec2::new(800.0, 600.0)).bind("rows", Resolved::Int(3));
        let text = Widget::create("Text", &mut ctx).unwrap();
        let mut t = Widget::create("Table", &mut ctx).unwrap().with_child(text);
        t.set("row_count", "{rows}").unwrap();
        let s = measure_one(&mut t, &mut canvas);
        // header 13 + 4, rows (13 + 4) each
        assert_eq!(s.y, 17.0 + 3.0 * 17.0);
        t.set("row_count", "{unknown}").unwrap();
        assert_eq!(measure_one(&mut t, &mut canvas).y, 17.0 + 17.0);
    }

    #[test]
    fn splitter_panes_fill_halves() {
        let mut ctx = UiContext::default();
        let mut canvas = HeadlessCanvas::new(Vec2::new(800.0, 600.0));
        let a = Widget::create("Child", &mut ctx).unwrap();
        let b = Widget::create("Child", &mut ctx).unwrap();
        let mut sp = Widget::create("Splitter", &mut ctx).unwrap().with_child(a).with_child(b);
        measure_one(&mut sp, &mut canvas);
        let left = sp.children()[0].cached_rect().unwrap();
        let right = sp.children()[1].cached_rect().unwrap();
        assert_eq!(left, Rect::new(0.0, 0.0, 196.0, 300.0));
        assert_eq!(right, Rect::new(204.0, 0.0, 196.0, 300.0));
    }

    #[test]
    fn inactive_tabs_are_cleared() {
        let mut ctx = UiContext::default();
        let mut canvas = HeadlessCanvas::new(Vec2::new(800.0, 600.0));
        let t1 = Widget::create("TabItem", &mut ctx).unwrap().with_child(Widget::create("Text", &mut ctx).unwrap());
        let t2 = Widget::create("TabItem", &mut ctx).unwrap().with_child(Widget::create("Text", &mut ctx).unwrap());
        let mut bar = Widget::create("TabBar", &mut ctx).unwrap().with_child(t1).with_child(t2);
        measure_one(&mut bar, &mut canvas);
        assert!(bar.children()[0].children()[0].cached_rect().is_some());
        assert!(bar.children()[1].cached_rect().is_some());
        assert_eq!(bar.children()[1].children()[0].cached_rect(), None);
    }
}
