//! The widget catalog.
//!
//! A [`Widget`] is a node with the properties every widget shares
//! ([`WidgetBase`]) plus a [`WidgetKind`] payload carrying the kind-specific
//! holders. Dispatch over kinds is a `match`, so adding a kind is checked
//! everywhere layout, export and import handle kinds.

mod basic;
mod container;
mod input;
mod menu;

use std::fmt;

use crate::context::{NodeId, UiContext};
use crate::layout::{layout_of, BoxStacks, Layout};
use crate::node::{Behavior, Geometry, UiNode, UserCode};
use crate::property::{
    prop_methods, Bindable, Dimension, Direct, EventSlot, FontName, MouseCursor, Prop, PropMut, Px, Px2, ValueError,
};
use imforge_core::coords::Color32;

pub use basic::{Button, CheckBox, RadioButton, Selectable, Separator, Spacer, Text};
pub use container::{Child, CollapsingHeader, Splitter, TabBar, TabItem, Table, TreeNode};
pub use input::{ColorEdit, Combo, CustomWidget, Image, Input, ProgressBar, Slider};
pub use menu::{MenuBar, MenuIt};

// ── Kind payloads ─────────────────────────────────────────────────────────

/// What a kind payload declares about itself.
pub(crate) trait WidgetType: Default + Clone + PartialEq + fmt::Debug {
    fn behavior(&self) -> Behavior {
        Behavior::SNAP_SIDES
    }

    fn properties(&self) -> Vec<Prop<'_>>;

    fn properties_mut(&mut self) -> Vec<PropMut<'_>>;

    fn events(&self) -> Vec<Prop<'_>> {
        Vec::new()
    }

    fn events_mut(&mut self) -> Vec<PropMut<'_>> {
        Vec::new()
    }

    fn accepts(&self, _child: &WidgetKind) -> bool {
        false
    }

    /// Kind-specific defaults for the shared properties.
    fn init_base(&self, _base: &mut WidgetBase) {}

    /// Short text identifying the instance in an outline.
    fn label(&self) -> Option<String> {
        None
    }
}

/// Ordinary content: anything except tab items and menu pieces, which only
/// live inside their own bars.
pub(crate) fn is_content(kind: &WidgetKind) -> bool {
    !matches!(kind, WidgetKind::TabItem(_) | WidgetKind::MenuIt(_) | WidgetKind::MenuBar(_))
}

macro_rules! widget_kinds {
    ($( $variant:ident ),+ $(,)?) => {
        /// Every widget kind, each carrying its own property payload.
        #[derive(Debug, Clone, PartialEq)]
        pub enum WidgetKind {
            $( $variant($variant) ),+
        }

        impl WidgetKind {
            /// Type tokens accepted by [`Widget::create`].
            pub const NAMES: &'static [&'static str] = &[$( stringify!($variant) ),+];

            /// Default payload for a type token.
            pub fn create(type_name: &str) -> Option<WidgetKind> {
                match type_name {
                    $( stringify!($variant) => Some(WidgetKind::$variant($variant::default())), )+
                    _ => None,
                }
            }

            /// A default payload of the same kind.
            pub(crate) fn fresh(&self) -> WidgetKind {
                match self {
                    $( WidgetKind::$variant(_) => WidgetKind::$variant($variant::default()) ),+
                }
            }

            pub fn type_name(&self) -> &'static str {
                match self {
                    $( WidgetKind::$variant(_) => stringify!($variant) ),+
                }
            }

            pub fn behavior(&self) -> Behavior {
                match self {
                    $( WidgetKind::$variant(w) => w.behavior() ),+
                }
            }

            fn properties(&self) -> Vec<Prop<'_>> {
                match self {
                    $( WidgetKind::$variant(w) => w.properties() ),+
                }
            }

            fn properties_mut(&mut self) -> Vec<PropMut<'_>> {
                match self {
                    $( WidgetKind::$variant(w) => w.properties_mut() ),+
                }
            }

            fn events(&self) -> Vec<Prop<'_>> {
                match self {
                    $( WidgetKind::$variant(w) => w.events() ),+
                }
            }

            fn events_mut(&mut self) -> Vec<PropMut<'_>> {
                match self {
                    $( WidgetKind::$variant(w) => w.events_mut() ),+
                }
            }

            pub fn accepts(&self, child: &WidgetKind) -> bool {
                match self {
                    $( WidgetKind::$variant(w) => w.accepts(child) ),+
                }
            }

            fn init_base(&self, base: &mut WidgetBase) {
                match self {
                    $( WidgetKind::$variant(w) => w.init_base(base) ),+
                }
            }

            fn label(&self) -> Option<String> {
                match self {
                    $( WidgetKind::$variant(w) => w.label() ),+
                }
            }
        }
    };
}

widget_kinds! {
    Spacer, Separator, Text, Selectable, Button, CheckBox, RadioButton,
    Input, Combo, Slider, ProgressBar, ColorEdit, Image, CustomWidget,
    Table, Child, CollapsingHeader, TabBar, TabItem, TreeNode, Splitter,
    MenuBar, MenuIt,
}

// ── WidgetBase ────────────────────────────────────────────────────────────

/// Properties and events every widget kind shares.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetBase {
    pub style_font: Bindable<FontName>,
    pub style_text: Bindable<Option<Color32>>,
    pub style_frame_bg: Bindable<Option<Color32>>,
    pub style_frame_rounding: Direct<Option<Px>>,
    pub style_frame_padding: Direct<Option<Px2>>,
    pub visible: Bindable<bool>,
    pub disabled: Bindable<bool>,
    pub tooltip: Bindable<String>,
    pub cursor: Direct<MouseCursor>,
    /// Name of the popup opened on right click.
    pub context_menu: Direct<String>,
    /// Extra indent steps before this widget.
    pub indent: Direct<i32>,
    /// Extra vertical item-spacing steps before this widget.
    pub spacing: Direct<i32>,
    pub same_line: Direct<bool>,
    pub next_column: Direct<i32>,
    pub begin_group: Direct<bool>,
    pub end_group: Direct<bool>,
    pub allow_overlap: Direct<bool>,
    pub has_pos: Direct<bool>,
    pub pos_x: Direct<Dimension>,
    pub pos_y: Direct<Dimension>,
    pub size_x: Bindable<Dimension>,
    pub size_y: Bindable<Dimension>,

    pub on_item_clicked: EventSlot,
    pub on_item_double_clicked: EventSlot,
    pub on_item_hovered: EventSlot,
    pub on_item_focused: EventSlot,
    pub on_item_activated: EventSlot,
    pub on_item_deactivated: EventSlot,
    pub on_item_deactivated_after_edit: EventSlot,
    pub on_item_context_menu_clicked: EventSlot,
}

impl Default for WidgetBase {
    fn default() -> Self {
        Self {
            style_font: Bindable::default(),
            style_text: Bindable::default(),
            style_frame_bg: Bindable::default(),
            style_frame_rounding: Direct::default(),
            style_frame_padding: Direct::default(),
            visible: Bindable::new(true),
            disabled: Bindable::new(false),
            tooltip: Bindable::default(),
            cursor: Direct::default(),
            context_menu: Direct::default(),
            indent: Direct::default(),
            spacing: Direct::default(),
            same_line: Direct::default(),
            next_column: Direct::default(),
            begin_group: Direct::default(),
            end_group: Direct::default(),
            allow_overlap: Direct::default(),
            has_pos: Direct::default(),
            pos_x: Direct::default(),
            pos_y: Direct::default(),
            size_x: Bindable::default(),
            size_y: Bindable::default(),
            on_item_clicked: EventSlot::new(),
            on_item_double_clicked: EventSlot::new(),
            on_item_hovered: EventSlot::new(),
            on_item_focused: EventSlot::new(),
            on_item_activated: EventSlot::new(),
            on_item_deactivated: EventSlot::new(),
            on_item_deactivated_after_edit: EventSlot::new(),
            on_item_context_menu_clicked: EventSlot::new(),
        }
    }
}

impl WidgetBase {
    // style overrides come first; `split_style` relies on the prefix
    prop_methods!(fn properties / properties_mut {
        "style_font" => style_font [kbd],
        "style_text" => style_text,
        "style_frame_bg" => style_frame_bg,
        "style_frame_rounding" => style_frame_rounding [kbd],
        "style_frame_padding" => style_frame_padding [kbd],
        "visible" => visible,
        "disabled" => disabled,
        "tooltip" => tooltip [kbd],
        "cursor" => cursor,
        "context_menu" => context_menu [kbd],
        "indent" => indent [kbd],
        "spacing" => spacing [kbd],
        "same_line" => same_line,
        "next_column" => next_column [kbd],
        "begin_group" => begin_group,
        "end_group" => end_group,
        "allow_overlap" => allow_overlap,
        "has_pos" => has_pos,
        "pos_x" => pos_x [kbd],
        "pos_y" => pos_y [kbd],
        "size_x" => size_x [kbd],
        "size_y" => size_y [kbd],
    });

    prop_methods!(fn events / events_mut {
        "on_item_clicked" => on_item_clicked [kbd],
        "on_item_double_clicked" => on_item_double_clicked [kbd],
        "on_item_hovered" => on_item_hovered [kbd],
        "on_item_focused" => on_item_focused [kbd],
        "on_item_activated" => on_item_activated [kbd],
        "on_item_deactivated" => on_item_deactivated [kbd],
        "on_item_deactivated_after_edit" => on_item_deactivated_after_edit [kbd],
        "on_item_context_menu_clicked" => on_item_context_menu_clicked [kbd],
    });

    /// Whether the overlay position is in effect.
    pub fn positioned(&self, behavior: Behavior) -> bool {
        *self.has_pos.get() && !behavior.contains(Behavior::NO_OVERLAY_POS)
    }
}

/// Whether a shared property applies to a kind with `behavior`.
fn exposed(name: &str, behavior: Behavior) -> bool {
    match name {
        "context_menu" => !behavior.contains(Behavior::NO_CONTEXT_MENU),
        "has_pos" | "pos_x" | "pos_y" => !behavior.contains(Behavior::NO_OVERLAY_POS),
        "size_x" => behavior.contains(Behavior::HAS_SIZE_X),
        "size_y" => behavior.contains(Behavior::HAS_SIZE_Y),
        _ => true,
    }
}

/// Orders shared and kind properties: style overrides, kind properties,
/// then the remaining shared ones that apply to `behavior`.
fn merge<P>(mut base: Vec<P>, kind: Vec<P>, behavior: Behavior, name: impl Fn(&P) -> &'static str) -> Vec<P> {
    let split = base.iter().position(|p| !name(p).starts_with("style_")).unwrap_or(base.len());
    let common = base.split_off(split);
    base.extend(kind);
    base.extend(common.into_iter().filter(|p| exposed(name(p), behavior)));
    base
}

// ── Widget ────────────────────────────────────────────────────────────────

/// One control in the design tree.
#[derive(Debug)]
pub struct Widget {
    id: NodeId,
    pub base: WidgetBase,
    pub kind: WidgetKind,
    pub(crate) children: Vec<Widget>,
    user_code: UserCode,
    pub(crate) geometry: Geometry,
    pub(crate) boxes: BoxStacks,
}

/// Shared values that apply to the widget's kind. Hidden ones are neither
/// exported nor compared.
fn shown_base(w: &Widget) -> Vec<String> {
    let behavior = w.behavior();
    w.base
        .properties()
        .into_iter()
        .chain(w.base.events())
        .filter(|p| exposed(p.name, behavior))
        .map(|p| p.value.to_source())
        .collect()
}

impl PartialEq for Widget {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && shown_base(self) == shown_base(other)
            && self.user_code == other.user_code
            && self.children == other.children
    }
}

impl Widget {
    /// A default instance of the kind named `type_name`, or `None` for an
    /// unknown type token.
    pub fn create(type_name: &str, ctx: &mut UiContext) -> Option<Widget> {
        WidgetKind::create(type_name).map(|kind| Widget::new(kind, ctx))
    }

    pub fn new(kind: WidgetKind, ctx: &mut UiContext) -> Widget {
        Widget::with_id(kind, ctx.alloc_id())
    }

    /// A default instance that never enters a document; export compares
    /// against it.
    pub(crate) fn prototype(kind: WidgetKind) -> Widget {
        Widget::with_id(kind, NodeId::DETACHED)
    }

    fn with_id(kind: WidgetKind, id: NodeId) -> Widget {
        let mut base = WidgetBase::default();
        kind.init_base(&mut base);
        Widget {
            id,
            base,
            kind,
            children: Vec::new(),
            user_code: UserCode::default(),
            geometry: Geometry::default(),
            boxes: BoxStacks::default(),
        }
    }

    /// Deep copy with fresh identities throughout. Cached geometry is not
    /// copied.
    pub fn clone_in(&self, ctx: &mut UiContext) -> Widget {
        let mut copy = Widget::new(self.kind.clone(), ctx);
        copy.base = self.base.clone();
        copy.user_code = self.user_code.clone();
        copy.children = self.children.iter().map(|c| c.clone_in(ctx)).collect();
        copy
    }

    /// Appends `child`, builder style. Panics on a child this kind does not
    /// accept; use [`UiNode::insert_child`] for fallible insertion.
    pub fn with_child(mut self, child: Widget) -> Widget {
        let kind = child.kind.type_name();
        let at = self.children.len();
        if self.insert_child(at, child).is_err() {
            panic!("{} does not accept {}", self.kind.type_name(), kind);
        }
        self
    }

    /// Flow position of this widget among `parent`'s children.
    pub fn get_layout(&self, parent: &dyn UiNode) -> Layout {
        let siblings = parent.children();
        match siblings.iter().position(|c| c.id == self.id) {
            Some(index) => layout_of(siblings, index),
            None => Layout::default(),
        }
    }

    /// Sets a property or event by name from editor text.
    pub fn set(&mut self, name: &str, text: &str) -> Result<(), ValueError> {
        let type_name = self.kind.type_name();
        if let Some(p) = self.properties_mut().iter_mut().find(|p| p.name == name) {
            return p.value.set_text(text);
        }
        if let Some(p) = self.events_mut().iter_mut().find(|p| p.name == name) {
            return p.value.set_text(text);
        }
        Err(ValueError::new(format!("{} has no property `{}`", type_name, name)))
    }
}

impl UiNode for Widget {
    #[inline]
    fn id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    fn behavior(&self) -> Behavior {
        self.kind.behavior()
    }

    fn children(&self) -> &[Widget] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Widget> {
        &mut self.children
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn properties(&self) -> Vec<Prop<'_>> {
        merge(self.base.properties(), self.kind.properties(), self.behavior(), |p| p.name)
    }

    fn properties_mut(&mut self) -> Vec<PropMut<'_>> {
        let behavior = self.behavior();
        merge(self.base.properties_mut(), self.kind.properties_mut(), behavior, |p| p.name)
    }

    fn events(&self) -> Vec<Prop<'_>> {
        let mut v = self.kind.events();
        v.extend(self.base.events());
        v
    }

    fn events_mut(&mut self) -> Vec<PropMut<'_>> {
        let mut v = self.kind.events_mut();
        v.extend(self.base.events_mut());
        v
    }

    fn user_code(&self) -> &UserCode {
        &self.user_code
    }

    fn user_code_mut(&mut self) -> &mut UserCode {
        &mut self.user_code
    }

    fn accepts_child(&self, kind: &WidgetKind) -> bool {
        self.kind.accepts(kind)
    }

    fn describe(&self) -> String {
        match self.kind.label() {
            Some(label) if !label.is_empty() => format!("{} {:?}", self.kind.type_name(), label),
            _ => self.kind.type_name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DesignerConfig;
    use crate::property::{FieldType, PropertyEditor};

    fn ctx() -> UiContext {
        UiContext::new(DesignerConfig::default())
    }

    #[test]
    fn create_known_and_unknown() {
        let mut ctx = ctx();
        let b = Widget::create("Button", &mut ctx).unwrap();
        assert_eq!(b.type_name(), "Button");
        assert!(Widget::create("Gizmo", &mut ctx).is_none());
        assert_eq!(WidgetKind::NAMES.len(), 23);
    }

    #[test]
    fn every_kind_has_unique_property_names() {
        let mut ctx = ctx();
        for name in WidgetKind::NAMES {
            let w = Widget::create(name, &mut ctx).unwrap();
            let mut names: Vec<_> = w.properties().iter().map(|p| p.name).collect();
            names.extend(w.events().iter().map(|p| p.name));
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total, "{} repeats a property name", name);
        }
    }

    #[test]
    fn property_order_style_kind_common() {
        let mut ctx = ctx();
        let b = Widget::create("Button", &mut ctx).unwrap();
        let names: Vec<_> = b.properties().iter().map(|p| p.name).collect();
        assert_eq!(names[0], "style_font");
        let label = names.iter().position(|n| *n == "label").unwrap();
        let visible = names.iter().position(|n| *n == "visible").unwrap();
        assert!(label < visible);
        assert_eq!(names.last(), Some(&"size_y"));
    }

    #[test]
    fn behavior_filters_shared_properties() {
        let mut ctx = ctx();
        let cb = Widget::create("CheckBox", &mut ctx).unwrap();
        let names: Vec<_> = cb.properties().iter().map(|p| p.name).collect();
        assert!(!names.contains(&"size_x"));
        assert!(names.contains(&"has_pos"));
        let item = Widget::create("MenuIt", &mut ctx).unwrap();
        let names: Vec<_> = item.properties().iter().map(|p| p.name).collect();
        assert!(!names.contains(&"has_pos"));
        assert_eq!(names.iter().filter(|n| **n == "context_menu").count(), 1);
        let bar = Widget::create("MenuBar", &mut ctx).unwrap();
        assert_eq!(bar.behavior(), Behavior::NO_OVERLAY_POS);
        let names: Vec<_> = bar.properties().iter().map(|p| p.name).collect();
        assert!(names.contains(&"context_menu"));
        assert!(!names.contains(&"pos_x"));
    }

    #[test]
    fn events_kind_first() {
        let mut ctx = ctx();
        let b = Widget::create("Button", &mut ctx).unwrap();
        let names: Vec<_> = b.events().iter().map(|p| p.name).collect();
        assert_eq!(names[0], "on_change");
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn clone_in_gives_fresh_ids() {
        let mut ctx = ctx();
        let mut child = Widget::create("Child", &mut ctx).unwrap();
        child.set("style_padding", "2, 2").unwrap();
        let child = child.with_child(Widget::create("Text", &mut ctx).unwrap());
        let copy = child.clone_in(&mut ctx);
        assert_eq!(copy, child);
        assert_ne!(copy.id(), child.id());
        assert_ne!(copy.children()[0].id(), child.children()[0].id());
    }

    #[test]
    fn property_ui_edits_through_editor() {
        let mut ctx = ctx();
        let mut cb = Widget::create("CheckBox", &mut ctx).unwrap();
        let index = cb.properties().iter().position(|p| p.name == "field").unwrap();
        let mut editor = |p: &Prop<'_>, _: &str| {
            assert_eq!(p.value.kind(), crate::property::HolderKind::Field(FieldType::Bool));
            Some("done".to_string())
        };
        assert!(cb.property_ui(index, &mut editor, &mut ctx));
        assert!(ctx.is_modified());
        let WidgetKind::CheckBox(payload) = &cb.kind else { unreachable!() };
        assert_eq!(payload.field.name(), "done");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn property_ui_out_of_range_panics() {
        let mut ctx = ctx();
        let mut t = Widget::create("Text", &mut ctx).unwrap();
        let mut editor = |_: &Prop<'_>, _: &str| -> Option<String> { None };
        let n = t.properties().len();
        let editor: &mut dyn PropertyEditor = &mut editor;
        t.property_ui(n, editor, &mut ctx);
    }

    #[test]
    fn hidden_shared_values_are_not_compared() {
        let mut ctx = ctx();
        let mut input = Widget::create("Input", &mut ctx).unwrap();
        input.base.size_y.set_value(Dimension::Px(100.0));
        let plain = Widget::create("Input", &mut ctx).unwrap();
        assert_eq!(input, plain);

        input.set("flags", "ImGuiInputTextFlags_Multiline").unwrap();
        let mut multiline = Widget::create("Input", &mut ctx).unwrap();
        multiline.set("flags", "ImGuiInputTextFlags_Multiline").unwrap();
        assert!(input != multiline);
        multiline.set("size_y", "100").unwrap();
        assert_eq!(input, multiline);
    }

    #[test]
    fn describe_uses_label() {
        let mut ctx = ctx();
        let mut b = Widget::create("Button", &mut ctx).unwrap();
        b.set("label", "OK").unwrap();
        assert_eq!(b.describe(), "Button \"OK\"");
        assert_eq!(Widget::create("Spacer", &mut ctx).unwrap().describe(), "Spacer");
    }
}
