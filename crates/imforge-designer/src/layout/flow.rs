//! Immediate-mode flow: rows joined by `same_line`, groups, columns and
//! percentage stretch resolved through the container's box stacks.

use imforge_core::coords::{Rect, Vec2};

use super::size::{calc_size_ex, Forced};
use super::{clear_subtree, move_to, BoxStacks, GeometryError, HBox, Layout, LayoutCtx, LayoutFlags, VBox};
use crate::canvas::Style;
use crate::node::{Behavior, UiNode};
use crate::property::Dimension;
use crate::widget::{Widget, WidgetKind};

/// Whether `w` takes part in its parent's flow. Explicitly positioned
/// widgets and menus are placed separately.
fn is_flow_item(w: &Widget) -> bool {
    !w.base.positioned(w.behavior()) && !matches!(w.kind, WidgetKind::MenuBar(_) | WidgetKind::MenuIt(_))
}

// ── Planning ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum FlowItem {
    Single(usize),
    Group(Vec<FlowRow>),
}

type FlowRow = Vec<FlowItem>;

/// A group being collected: its rows and whether it continues the row it
/// was opened in.
struct OpenGroup {
    rows: Vec<FlowRow>,
    same_line: bool,
}

fn push_item(rows: &mut Vec<FlowRow>, item: FlowItem, same_line: bool) {
    match rows.last_mut() {
        Some(row) if same_line => row.push(item),
        _ => rows.push(vec![item]),
    }
}

/// Splits flow items into columns of rows.
fn plan(children: &[Widget]) -> Vec<Vec<FlowRow>> {
    let mut columns: Vec<Vec<FlowRow>> = vec![Vec::new()];
    let mut groups: Vec<OpenGroup> = Vec::new();

    for (i, c) in children.iter().enumerate() {
        if !is_flow_item(c) {
            continue;
        }
        let next_column = (*c.base.next_column.get()).max(0) as usize;
        if next_column > 0 && groups.is_empty() {
            columns.extend(std::iter::repeat_with(Vec::new).take(next_column));
        }
        let mut same_line = *c.base.same_line.get() && next_column == 0;
        if *c.base.begin_group.get() {
            groups.push(OpenGroup { rows: Vec::new(), same_line });
            same_line = false;
        }
        let rows = match groups.last_mut() {
            Some(g) => &mut g.rows,
            None => match columns.last_mut() {
                Some(col) => col,
                None => continue,
            },
        };
        push_item(rows, FlowItem::Single(i), same_line);

        if *c.base.end_group.get() {
            close_group(&mut groups, &mut columns);
        }
    }
    while !groups.is_empty() {
        close_group(&mut groups, &mut columns);
    }
    columns
}

fn close_group(groups: &mut Vec<OpenGroup>, columns: &mut [Vec<FlowRow>]) {
    let Some(g) = groups.pop() else {
        return;
    };
    let item = FlowItem::Group(g.rows);
    match groups.last_mut() {
        Some(parent) => push_item(&mut parent.rows, item, g.same_line),
        None => {
            if let Some(col) = columns.last_mut() {
                push_item(col, item, g.same_line);
            }
        }
    }
}

/// Innermost row holding child `index`: (row, position, row length, rows).
fn locate(rows: &[FlowRow], index: usize) -> Option<(usize, usize, usize, usize)> {
    for (r, row) in rows.iter().enumerate() {
        for (p, item) in row.iter().enumerate() {
            match item {
                FlowItem::Single(i) if *i == index => return Some((r, p, row.len(), rows.len())),
                FlowItem::Group(inner) => {
                    if let Some(found) = locate(inner, index) {
                        return Some(found);
                    }
                }
                FlowItem::Single(_) => {}
            }
        }
    }
    None
}

/// Flow descriptor of `siblings[index]`.
pub(crate) fn layout_of(siblings: &[Widget], index: usize) -> Layout {
    for (col, rows) in plan(siblings).iter().enumerate() {
        let Some((r, p, row_len, rows_len)) = locate(rows, index) else {
            continue;
        };
        let row_id = rows.iter().position(|row| locate(std::slice::from_ref(row), index).is_some()).unwrap_or(r);
        let mut flags = LayoutFlags::empty();
        flags.set(LayoutFlags::TOPMOST, r == 0);
        flags.set(LayoutFlags::LEFTMOST, p == 0);
        flags.set(LayoutFlags::H_LAYOUT, row_len > 1);
        flags.set(LayoutFlags::V_LAYOUT, rows_len > 1);
        return Layout { flags, col_id: col, row_id };
    }
    Layout::default()
}

// ── Measuring ─────────────────────────────────────────────────────────────

fn stretch(lc: &LayoutCtx<'_>, w: &Widget, owned: Behavior, d: &crate::property::Bindable<Dimension>) -> Option<f32> {
    if !w.behavior().contains(owned) {
        return None;
    }
    match lc.dimension(d) {
        Dimension::Pct(p) => Some(p),
        _ => None,
    }
}

fn indent(w: &Widget, st: &Style) -> f32 {
    (*w.base.indent.get()).max(0) as f32 * st.indent_spacing
}

/// Extra vertical space requested by the items of a row.
fn extra_spacing(children: &[Widget], row: &[FlowItem], st: &Style) -> f32 {
    row.iter()
        .filter_map(|item| match item {
            FlowItem::Single(i) => Some((*children[*i].base.spacing.get()).max(0) as f32 * st.item_spacing.y),
            FlowItem::Group(_) => None,
        })
        .fold(0.0, f32::max)
}

fn item_size(children: &[Widget], item: &FlowItem, st: &Style) -> Vec2 {
    match item {
        FlowItem::Single(i) => {
            let w = &children[*i];
            let s = w.geometry.size().unwrap_or_default();
            Vec2::new(s.x + indent(w, st), s.y)
        }
        FlowItem::Group(rows) => block_size(children, rows, st),
    }
}

fn row_size(children: &[Widget], row: &[FlowItem], st: &Style) -> Vec2 {
    let mut size = Vec2::zero();
    for (k, item) in row.iter().enumerate() {
        let s = item_size(children, item, st);
        size.x += s.x + if k > 0 { st.item_spacing.x } else { 0.0 };
        size.y = size.y.max(s.y);
    }
    size
}

fn block_size(children: &[Widget], rows: &[FlowRow], st: &Style) -> Vec2 {
    let mut size = Vec2::zero();
    for (r, row) in rows.iter().enumerate() {
        let s = row_size(children, row, st);
        size.x = size.x.max(s.x);
        size.y += s.y + extra_spacing(children, row, st) + if r > 0 { st.item_spacing.y } else { 0.0 };
    }
    size
}

/// Measures one row, handing percentage widths what the fixed items leave.
fn measure_row(
    children: &mut [Widget],
    row: &[FlowItem],
    avail: Vec2,
    boxes: &mut BoxStacks,
    lc: &mut LayoutCtx<'_>,
) -> Result<(), GeometryError> {
    let st = lc.style();
    let indents: f32 = row
        .iter()
        .map(|item| match item {
            FlowItem::Single(i) => indent(&children[*i], &st),
            FlowItem::Group(_) => 0.0,
        })
        .sum();
    let mut hbox = HBox::new((avail.x - indents).max(0.0), st.item_spacing.x);
    let mut stretched = Vec::new();
    for item in row {
        match item {
            FlowItem::Single(i) => {
                let w = &mut children[*i];
                let inner = Vec2::new((avail.x - indent(w, &st)).max(0.0), avail.y);
                match stretch(lc, w, Behavior::HAS_SIZE_X, &w.base.size_x) {
                    Some(pct) => stretched.push((hbox.add_stretch(pct), *i, inner)),
                    None => {
                        let s = calc_size_ex(w, inner, Forced::default(), lc)?;
                        hbox.add_fixed(s.x);
                    }
                }
            }
            FlowItem::Group(rows) => {
                let s = measure_rows(children, rows, avail, boxes, lc)?;
                hbox.add_fixed(s.x);
            }
        }
    }
    boxes.hbox.push(hbox);
    let widths = boxes.hbox.last().map(HBox::resolve).unwrap_or_default();
    let mut result = Ok(());
    for (slot, i, inner) in stretched {
        let forced = Forced { w: widths.get(slot).copied(), h: None };
        if let Err(e) = calc_size_ex(&mut children[i], inner, forced, lc) {
            result = Err(e);
            break;
        }
    }
    boxes.hbox.pop();
    result
}

/// Measures a column of rows, handing percentage heights what the fixed
/// rows leave. Returns the block's size.
fn measure_rows(
    children: &mut [Widget],
    rows: &[FlowRow],
    avail: Vec2,
    boxes: &mut BoxStacks,
    lc: &mut LayoutCtx<'_>,
) -> Result<Vec2, GeometryError> {
    for row in rows {
        measure_row(children, row, avail, boxes, lc)?;
    }
    let st = lc.style();
    let mut vbox = VBox::new(avail.y, st.item_spacing.y);
    let mut stretched = Vec::new();
    for row in rows {
        let pct = row
            .iter()
            .filter_map(|item| match item {
                FlowItem::Single(i) => stretch(lc, &children[*i], Behavior::HAS_SIZE_Y, &children[*i].base.size_y),
                FlowItem::Group(_) => None,
            })
            .reduce(f32::max);
        match pct {
            Some(p) => stretched.push((vbox.add_stretch(p), row)),
            None => {
                vbox.add_fixed(row_size(children, row, &st).y + extra_spacing(children, row, &st));
            }
        }
    }
    boxes.vbox.push(vbox);
    let heights = boxes.vbox.last().map(VBox::resolve).unwrap_or_default();
    let mut result = Ok(());
    'rows: for (slot, row) in stretched {
        for item in row {
            let FlowItem::Single(i) = item else {
                continue;
            };
            if stretch(lc, &children[*i], Behavior::HAS_SIZE_Y, &children[*i].base.size_y).is_none() {
                continue;
            }
            let w = &mut children[*i];
            let inner = Vec2::new((avail.x - indent(w, &st)).max(0.0), avail.y);
            let forced = Forced { w: w.geometry.size().map(|s| s.x), h: heights.get(slot).copied() };
            if let Err(e) = calc_size_ex(w, inner, forced, lc) {
                result = Err(e);
                break 'rows;
            }
        }
    }
    boxes.vbox.pop();
    result.map(|()| block_size(children, rows, &st))
}

// ── Placing ───────────────────────────────────────────────────────────────

/// Moves measured rows into place starting at `origin`. Returns the block's
/// size.
fn place_rows(children: &mut [Widget], rows: &[FlowRow], origin: Vec2, st: &Style) -> Vec2 {
    let mut y = origin.y;
    let mut width: f32 = 0.0;
    for (r, row) in rows.iter().enumerate() {
        if r > 0 {
            y += st.item_spacing.y;
        }
        y += extra_spacing(children, row, st);
        let mut x = origin.x;
        let mut height: f32 = 0.0;
        for (k, item) in row.iter().enumerate() {
            if k > 0 {
                x += st.item_spacing.x;
            }
            let s = match item {
                FlowItem::Single(i) => {
                    let w = &mut children[*i];
                    x += indent(w, st);
                    move_to(w, Vec2::new(x, y));
                    w.geometry.size().unwrap_or_default()
                }
                FlowItem::Group(inner) => place_rows(children, inner, Vec2::new(x, y), st),
            };
            x += s.x;
            height = height.max(s.y);
        }
        width = width.max(x - origin.x);
        y += height;
    }
    Vec2::new(width, y - origin.y)
}

/// Offset of a positioned widget along one axis.
fn coord(d: Dimension, start: f32, extent: f32, size: f32) -> f32 {
    match d {
        Dimension::Auto => start,
        Dimension::Px(v) if v < 0.0 => start + extent + v - size,
        Dimension::Px(v) => start + v,
        Dimension::Pct(p) => start + extent * p / 100.0,
    }
}

/// Lays `children` out inside `region` with `columns` side-by-side slots.
/// Returns the extent used, measured from the region's origin.
pub(crate) fn flow(
    children: &mut [Widget],
    boxes: &mut BoxStacks,
    region: Rect,
    columns: usize,
    lc: &mut LayoutCtx<'_>,
) -> Result<Vec2, GeometryError> {
    let st = lc.style();
    let n = columns.max(1);
    let col_w = region.size.x / n as f32;
    let mut slot_y = vec![region.top(); n];
    let mut extent = Vec2::zero();

    for (k, rows) in plan(children).iter().enumerate() {
        let slot = k % n;
        if k > 0 && slot == 0 {
            let top = slot_y.iter().fold(region.top(), |m, y| m.max(*y)) + st.item_spacing.y;
            slot_y.fill(top);
        }
        let origin = Vec2::new(region.left() + slot as f32 * col_w, slot_y[slot]);
        let avail = Vec2::new(col_w, (region.bottom() - origin.y).max(0.0));
        measure_rows(children, rows, avail, boxes, lc)?;
        let size = place_rows(children, rows, origin, &st);
        slot_y[slot] += size.y;
        extent = extent.max(Vec2::new(origin.x + size.x - region.left(), slot_y[slot] - region.top()));
    }

    for c in children.iter_mut().filter(|c| !is_flow_item(c)) {
        match c.kind {
            // placed by the window or child that owns it
            WidgetKind::MenuBar(_) => {}
            // context menus are closed while designing
            WidgetKind::MenuIt(_) => {
                c.geometry.clear();
                clear_subtree(&mut c.children);
            }
            _ => {
                let s = calc_size_ex(c, region.size, Forced::default(), lc)?;
                let pos = Vec2::new(
                    coord(*c.base.pos_x.get(), region.left(), region.size.x, s.x),
                    coord(*c.base.pos_y.get(), region.top(), region.size.y, s.y),
                );
                move_to(c, pos);
                extent = extent.max(pos + s - region.origin);
            }
        }
    }
    Ok(extent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::HeadlessCanvas;
    use crate::context::UiContext;

    fn widget(ctx: &mut UiContext, ty: &str, props: &[(&str, &str)]) -> Widget {
        let mut w = Widget::create(ty, ctx).unwrap();
        for (k, v) in props {
            w.set(k, v).unwrap();
        }
        w
    }

    fn run(children: &mut [Widget], region: Rect, columns: usize) -> Vec2 {
        let mut canvas = HeadlessCanvas::new(Vec2::new(800.0, 600.0));
        let mut lc = LayoutCtx::new(&mut canvas);
        let mut boxes = BoxStacks::default();
        let extent = flow(children, &mut boxes, region, columns, &mut lc).unwrap();
        assert!(boxes.is_balanced());
        extent
    }

    #[test]
    fn same_line_joins_rows() {
        let mut ctx = UiContext::default();
        let kids = [
            widget(&mut ctx, "Button", &[("label", "A")]),
            widget(&mut ctx, "Button", &[("label", "B"), ("same_line", "true")]),
            widget(&mut ctx, "Button", &[("label", "C")]),
        ];
        let layouts: Vec<Layout> = (0..3).map(|i| layout_of(&kids, i)).collect();
        assert_eq!(layouts[0].flags, LayoutFlags::all());
        assert_eq!(layouts[1].flags, LayoutFlags::TOPMOST | LayoutFlags::H_LAYOUT | LayoutFlags::V_LAYOUT);
        assert_eq!(layouts[2].flags, LayoutFlags::LEFTMOST | LayoutFlags::V_LAYOUT);
        assert_eq!(layouts[2].row_id, 1);
    }

    #[test]
    fn placement_follows_rows() {
        let mut ctx = UiContext::default();
        let mut kids = [
            widget(&mut ctx, "Button", &[("label", "A")]),
            widget(&mut ctx, "Button", &[("label", "B"), ("same_line", "true")]),
            widget(&mut ctx, "Button", &[("label", "C")]),
        ];
        let extent = run(&mut kids, Rect::new(10.0, 20.0, 300.0, 200.0), 1);
        // each button is 7 + 8 wide, 19 tall
        assert_eq!(kids[0].cached_rect(), Some(Rect::new(10.0, 20.0, 15.0, 19.0)));
        assert_eq!(kids[1].cached_rect(), Some(Rect::new(33.0, 20.0, 15.0, 19.0)));
        assert_eq!(kids[2].cached_rect(), Some(Rect::new(10.0, 43.0, 15.0, 19.0)));
        assert_eq!(extent, Vec2::new(38.0, 42.0));
    }

    #[test]
    fn percentage_width_takes_the_rest() {
        let mut ctx = UiContext::default();
        let mut kids = [
            widget(&mut ctx, "Button", &[("label", "A"), ("size_x", "100")]),
            widget(&mut ctx, "Button", &[("label", "B"), ("size_x", "100%"), ("same_line", "true")]),
        ];
        run(&mut kids, Rect::new(0.0, 0.0, 300.0, 200.0), 1);
        assert_eq!(kids[1].cached_rect().map(|r| r.size.x), Some(192.0));
    }

    #[test]
    fn groups_stack_inside_a_row() {
        let mut ctx = UiContext::default();
        let mut kids = [
            widget(&mut ctx, "Button", &[("label", "A"), ("begin_group", "true")]),
            widget(&mut ctx, "Button", &[("label", "B"), ("end_group", "true")]),
            widget(&mut ctx, "Button", &[("label", "C"), ("same_line", "true")]),
        ];
        run(&mut kids, Rect::new(0.0, 0.0, 300.0, 200.0), 1);
        assert_eq!(kids[1].cached_rect().map(|r| r.origin), Some(Vec2::new(0.0, 23.0)));
        assert_eq!(kids[2].cached_rect().map(|r| r.origin), Some(Vec2::new(23.0, 0.0)));
        let l = layout_of(&kids, 1);
        assert_eq!(l.row_id, 0);
        assert!(l.flags.contains(LayoutFlags::LEFTMOST | LayoutFlags::V_LAYOUT));
    }

    #[test]
    fn next_column_moves_to_the_next_slot() {
        let mut ctx = UiContext::default();
        let mut kids = [
            widget(&mut ctx, "Button", &[("label", "A")]),
            widget(&mut ctx, "Button", &[("label", "B"), ("next_column", "1")]),
        ];
        run(&mut kids, Rect::new(0.0, 0.0, 300.0, 200.0), 2);
        assert_eq!(kids[1].cached_rect().map(|r| r.origin), Some(Vec2::new(150.0, 0.0)));
        assert_eq!(layout_of(&kids, 1).col_id, 1);
    }

    #[test]
    fn positioned_widgets_leave_the_flow() {
        let mut ctx = UiContext::default();
        let mut kids = [
            widget(&mut ctx, "Button", &[("label", "A"), ("has_pos", "true"), ("pos_x", "-10"), ("pos_y", "5")]),
            widget(&mut ctx, "Button", &[("label", "B")]),
        ];
        run(&mut kids, Rect::new(0.0, 0.0, 300.0, 200.0), 1);
        assert_eq!(kids[0].cached_rect().map(|r| r.origin), Some(Vec2::new(275.0, 5.0)));
        assert_eq!(kids[1].cached_rect().map(|r| r.origin), Some(Vec2::zero()));
        assert_eq!(layout_of(&kids, 0), Layout::default());
    }
}
