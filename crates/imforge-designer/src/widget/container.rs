//! Widgets that own children.

use imforge_core::coords::Color32;

use super::{is_content, WidgetKind, WidgetType};
use crate::node::Behavior;
use crate::property::{
    prop_methods, Bindable, ColumnData, DataLoop, Dimension, Direct, EventSlot, FieldRef, FieldType, Flags, PropertyValue, Px,
    Px2, CHILD_FLAGS, TABLE_FLAGS, TAB_BAR_FLAGS, TREE_NODE_FLAGS, WINDOW_FLAGS,
};

const CONTAINER: Behavior = Behavior::SNAP_SIDES.union(Behavior::SNAP_INTERIOR);

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub flags: Direct<Flags>,
    pub columns: Direct<Vec<ColumnData>>,
    pub header: Direct<bool>,
    /// Row repetition; children are one row's cells.
    pub row_count: DataLoop,
    /// Minimum row height; 0 lets rows size to content.
    pub row_height: Direct<Px>,
    pub scroll_when_dragging: Direct<bool>,
    pub style_cell_padding: Direct<Option<Px2>>,
    pub style_header_bg: Bindable<Option<Color32>>,
    pub style_row_bg: Bindable<Option<Color32>>,
    pub style_row_bg_alt: Bindable<Option<Color32>>,
    pub style_child_bg: Bindable<Option<Color32>>,
    pub on_begin_row: EventSlot,
    pub on_end_row: EventSlot,
}

impl Default for Table {
    fn default() -> Self {
        let borders = TABLE_FLAGS.lookup("ImGuiTableFlags_Borders").unwrap_or(0);
        let row_bg = TABLE_FLAGS.lookup("ImGuiTableFlags_RowBg").unwrap_or(0);
        Self {
            flags: Direct::new(Flags::with_bits(&TABLE_FLAGS, borders | row_bg)),
            columns: Direct::new(vec![ColumnData::stretch("A")]),
            header: Direct::new(true),
            row_count: DataLoop::default(),
            row_height: Direct::default(),
            scroll_when_dragging: Direct::default(),
            style_cell_padding: Direct::default(),
            style_header_bg: Bindable::default(),
            style_row_bg: Bindable::default(),
            style_row_bg_alt: Bindable::default(),
            style_child_bg: Bindable::default(),
            on_begin_row: EventSlot::new(),
            on_end_row: EventSlot::new(),
        }
    }
}

impl WidgetType for Table {
    fn behavior(&self) -> Behavior {
        CONTAINER | Behavior::HAS_SIZE
    }

    prop_methods!(fn properties / properties_mut {
        "flags" => flags,
        "columns" => columns,
        "header" => header,
        "row_count" => row_count [kbd],
        "row_height" => row_height [kbd],
        "scroll_when_dragging" => scroll_when_dragging,
        "style_cell_padding" => style_cell_padding [kbd],
        "style_header_bg" => style_header_bg,
        "style_row_bg" => style_row_bg,
        "style_row_bg_alt" => style_row_bg_alt,
        "style_child_bg" => style_child_bg,
    });

    prop_methods!(fn events / events_mut {
        "on_begin_row" => on_begin_row [kbd],
        "on_end_row" => on_end_row [kbd],
    });

    fn accepts(&self, child: &WidgetKind) -> bool {
        is_content(child)
    }
}

/// Scrollable sub-region, optionally split into columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub flags: Direct<Flags>,
    pub window_flags: Direct<Flags>,
    pub column_count: Bindable<i32>,
    pub column_border: Direct<bool>,
    pub item_count: DataLoop,
    pub scroll_when_dragging: Direct<bool>,
    pub style_padding: Direct<Option<Px2>>,
    pub style_spacing: Direct<Option<Px2>>,
    /// Keep the window padding around the region.
    pub style_outer_padding: Direct<bool>,
    pub style_rounding: Direct<Option<Px>>,
    pub style_bg: Bindable<Option<Color32>>,
    pub style_border: Bindable<Option<Color32>>,
}

impl Default for Child {
    fn default() -> Self {
        Self {
            flags: Direct::new(Flags::empty(&CHILD_FLAGS)),
            window_flags: Direct::new(Flags::empty(&WINDOW_FLAGS)),
            column_count: Bindable::new(1),
            column_border: Direct::new(true),
            item_count: DataLoop::default(),
            scroll_when_dragging: Direct::default(),
            style_padding: Direct::default(),
            style_spacing: Direct::default(),
            style_outer_padding: Direct::new(true),
            style_rounding: Direct::default(),
            style_bg: Bindable::default(),
            style_border: Bindable::default(),
        }
    }
}

impl WidgetType for Child {
    fn behavior(&self) -> Behavior {
        CONTAINER | Behavior::HAS_SIZE
    }

    prop_methods!(fn properties / properties_mut {
        "flags" => flags,
        "window_flags" => window_flags,
        "column_count" => column_count [kbd],
        "column_border" => column_border,
        "item_count" => item_count [kbd],
        "scroll_when_dragging" => scroll_when_dragging,
        "style_padding" => style_padding [kbd],
        "style_spacing" => style_spacing [kbd],
        "style_outer_padding" => style_outer_padding,
        "style_rounding" => style_rounding [kbd],
        "style_bg" => style_bg,
        "style_border" => style_border,
    });

    fn accepts(&self, child: &WidgetKind) -> bool {
        is_content(child) || matches!(child, WidgetKind::MenuBar(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollapsingHeader {
    pub label: Bindable<String>,
    /// Whether the header starts expanded; a binding tracks it live.
    pub open: Bindable<bool>,
}

impl Default for CollapsingHeader {
    fn default() -> Self {
        Self { label: Bindable::new("Header".to_string()), open: Bindable::new(true) }
    }
}

impl WidgetType for CollapsingHeader {
    fn behavior(&self) -> Behavior {
        CONTAINER
    }

    prop_methods!(fn properties / properties_mut {
        "label" => label [kbd],
        "open" => open,
    });

    fn accepts(&self, child: &WidgetKind) -> bool {
        is_content(child)
    }

    fn label(&self) -> Option<String> {
        Some(self.label.to_text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabBar {
    pub flags: Direct<Flags>,
    /// Repetition of the single tab child.
    pub tab_count: DataLoop,
    /// Field holding the index of the selected tab.
    pub active_tab: FieldRef,
}

impl Default for TabBar {
    fn default() -> Self {
        Self {
            flags: Direct::new(Flags::empty(&TAB_BAR_FLAGS)),
            tab_count: DataLoop::default(),
            active_tab: FieldRef::new(FieldType::Int),
        }
    }
}

impl WidgetType for TabBar {
    fn behavior(&self) -> Behavior {
        Behavior::SNAP_SIDES | Behavior::NO_OVERLAY_POS
    }

    prop_methods!(fn properties / properties_mut {
        "flags" => flags,
        "tab_count" => tab_count [kbd],
        "active_tab" => active_tab [kbd],
    });

    fn accepts(&self, child: &WidgetKind) -> bool {
        matches!(child, WidgetKind::TabItem(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TabItem {
    pub label: Bindable<String>,
    pub close_button: Direct<bool>,
    pub on_close: EventSlot,
}

impl Default for TabItem {
    fn default() -> Self {
        Self { label: Bindable::new("TabItem".to_string()), close_button: Direct::default(), on_close: EventSlot::new() }
    }
}

impl WidgetType for TabItem {
    fn behavior(&self) -> Behavior {
        CONTAINER | Behavior::SNAP_GRANDPARENT_CLIP | Behavior::NO_OVERLAY_POS
    }

    prop_methods!(fn properties / properties_mut {
        "label" => label [kbd],
        "close_button" => close_button,
    });

    prop_methods!(fn events / events_mut {
        "on_close" => on_close [kbd],
    });

    fn accepts(&self, child: &WidgetKind) -> bool {
        is_content(child)
    }

    fn label(&self) -> Option<String> {
        Some(self.label.to_text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub flags: Direct<Flags>,
    pub label: Bindable<String>,
    pub open: Bindable<bool>,
}

impl Default for TreeNode {
    fn default() -> Self {
        Self {
            flags: Direct::new(Flags::empty(&TREE_NODE_FLAGS)),
            label: Bindable::new("Node".to_string()),
            open: Bindable::new(true),
        }
    }
}

impl WidgetType for TreeNode {
    fn behavior(&self) -> Behavior {
        CONTAINER
    }

    prop_methods!(fn properties / properties_mut {
        "flags" => flags,
        "label" => label [kbd],
        "open" => open,
    });

    fn accepts(&self, child: &WidgetKind) -> bool {
        is_content(child)
    }

    fn label(&self) -> Option<String> {
        Some(self.label.to_text())
    }
}

/// Two panes separated by a draggable bar. The first child fills the first
/// pane and the second child the other; the split runs vertically when
/// the widget is wider than tall.
#[derive(Debug, Clone, PartialEq)]
pub struct Splitter {
    pub min_size1: Direct<Dimension>,
    pub min_size2: Direct<Dimension>,
    /// Field holding the bar position.
    pub position: FieldRef,
    pub style_active: Bindable<Option<Color32>>,
    pub style_bg: Bindable<Option<Color32>>,
}

impl Default for Splitter {
    fn default() -> Self {
        Self {
            min_size1: Direct::new(Dimension::px(10.0)),
            min_size2: Direct::new(Dimension::px(10.0)),
            position: FieldRef::new(FieldType::Float),
            style_active: Bindable::default(),
            style_bg: Bindable::default(),
        }
    }
}

impl WidgetType for Splitter {
    fn behavior(&self) -> Behavior {
        CONTAINER | Behavior::HAS_SIZE | Behavior::NO_OVERLAY_POS
    }

    prop_methods!(fn properties / properties_mut {
        "min_size1" => min_size1 [kbd],
        "min_size2" => min_size2 [kbd],
        "position" => position [kbd],
        "style_active" => style_active,
        "style_bg" => style_bg,
    });

    fn accepts(&self, child: &WidgetKind) -> bool {
        is_content(child)
    }
}
