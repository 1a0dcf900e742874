//! The root of every design: a main window, floating window, popup, modal
//! popup or activity surface.

use imforge_core::coords::Color32;

use crate::context::{NodeId, UiContext};
use crate::layout::BoxStacks;
use crate::node::{Behavior, Geometry, UiNode, UserCode};
use crate::property::{
    prop_methods, Bindable, Dimension, Direct, EventSlot, Flags, FontName, Placement, Prop, PropMut, PropertyValue,
    Px, Px2, WindowKind, WINDOW_FLAGS,
};
use crate::widget::{is_content, Widget, WidgetKind};

#[derive(Debug)]
pub struct TopWindow {
    id: NodeId,
    pub title: Bindable<String>,
    pub kind: Direct<WindowKind>,
    pub flags: Direct<Flags>,
    pub size_x: Bindable<Dimension>,
    pub size_y: Bindable<Dimension>,
    pub style_font: Bindable<FontName>,
    pub style_padding: Direct<Option<Px2>>,
    pub style_spacing: Direct<Option<Px2>>,
    pub style_border: Direct<Option<Px>>,
    pub style_rounding: Direct<Option<Px>>,
    pub style_scrollbar_size: Direct<Option<Px>>,
    pub style_bg: Bindable<Option<Color32>>,
    pub style_menu_bg: Bindable<Option<Color32>>,
    pub placement: Direct<Placement>,
    pub animate: Direct<bool>,
    /// Fired on the platform back gesture (activities only).
    pub on_back_button: EventSlot,
    pub(crate) children: Vec<Widget>,
    user_code: UserCode,
    pub(crate) geometry: Geometry,
    pub(crate) boxes: BoxStacks,
}

impl PartialEq for TopWindow {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.kind == other.kind
            && self.flags == other.flags
            && self.size_x == other.size_x
            && self.size_y == other.size_y
            && self.style_font == other.style_font
            && self.style_padding == other.style_padding
            && self.style_spacing == other.style_spacing
            && self.style_border == other.style_border
            && self.style_rounding == other.style_rounding
            && self.style_scrollbar_size == other.style_scrollbar_size
            && self.style_bg == other.style_bg
            && self.style_menu_bg == other.style_menu_bg
            && self.placement == other.placement
            && self.animate == other.animate
            && self.on_back_button == other.on_back_button
            && self.user_code == other.user_code
            && self.children == other.children
    }
}

impl TopWindow {
    pub fn new(ctx: &mut UiContext) -> TopWindow {
        TopWindow::with_id(ctx.alloc_id())
    }

    pub(crate) fn prototype() -> TopWindow {
        TopWindow::with_id(NodeId::DETACHED)
    }

    fn with_id(id: NodeId) -> TopWindow {
        let no_collapse = WINDOW_FLAGS.lookup("ImGuiWindowFlags_NoCollapse").unwrap_or(0);
        TopWindow {
            id,
            title: Bindable::new("title".to_string()),
            kind: Direct::default(),
            flags: Direct::new(Flags::with_bits(&WINDOW_FLAGS, no_collapse)),
            size_x: Bindable::new(Dimension::px(640.0)),
            size_y: Bindable::new(Dimension::px(480.0)),
            style_font: Bindable::default(),
            style_padding: Direct::default(),
            style_spacing: Direct::default(),
            style_border: Direct::default(),
            style_rounding: Direct::default(),
            style_scrollbar_size: Direct::default(),
            style_bg: Bindable::default(),
            style_menu_bg: Bindable::default(),
            placement: Direct::default(),
            animate: Direct::default(),
            on_back_button: EventSlot::new(),
            children: Vec::new(),
            user_code: UserCode::default(),
            geometry: Geometry::default(),
            boxes: BoxStacks::default(),
        }
    }

    /// Appends `child`, builder style.
    ///
    /// # Panics
    /// If the window does not accept the child's kind.
    pub fn with_child(mut self, child: Widget) -> TopWindow {
        let kind = child.kind.type_name();
        let at = self.children.len();
        if self.insert_child(at, child).is_err() {
            panic!("TopWindow does not accept {}", kind);
        }
        self
    }

    /// Whether the window draws a title bar.
    pub fn has_title_bar(&self) -> bool {
        let popup = matches!(self.kind.get(), WindowKind::Popup | WindowKind::Activity | WindowKind::MainWindow);
        !popup && !self.flags.get().contains("ImGuiWindowFlags_NoTitleBar")
    }

    prop_methods!(fn own_properties / own_properties_mut {
        "title" => title [kbd],
        "kind" => kind,
        "flags" => flags,
        "size_x" => size_x [kbd],
        "size_y" => size_y [kbd],
        "style_font" => style_font [kbd],
        "style_padding" => style_padding [kbd],
        "style_spacing" => style_spacing [kbd],
        "style_border" => style_border [kbd],
        "style_rounding" => style_rounding [kbd],
        "style_scrollbar_size" => style_scrollbar_size [kbd],
        "style_bg" => style_bg,
        "style_menu_bg" => style_menu_bg,
        "placement" => placement,
        "animate" => animate,
    });

    prop_methods!(fn own_events / own_events_mut {
        "on_back_button" => on_back_button [kbd],
    });
}

impl UiNode for TopWindow {
    #[inline]
    fn id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> &'static str {
        "TopWindow"
    }

    fn behavior(&self) -> Behavior {
        Behavior::SNAP_INTERIOR
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
        self.own_properties()
    }

    fn properties_mut(&mut self) -> Vec<PropMut<'_>> {
        self.own_properties_mut()
    }

    fn events(&self) -> Vec<Prop<'_>> {
        self.own_events()
    }

    fn events_mut(&mut self) -> Vec<PropMut<'_>> {
        self.own_events_mut()
    }

    fn user_code(&self) -> &UserCode {
        &self.user_code
    }

    fn user_code_mut(&mut self) -> &mut UserCode {
        &mut self.user_code
    }

    fn accepts_child(&self, kind: &WidgetKind) -> bool {
        is_content(kind) || matches!(kind, WidgetKind::MenuBar(_) | WidgetKind::MenuIt(_))
    }

    fn describe(&self) -> String {
        format!("TopWindow {:?} ({})", self.title.to_text(), self.kind.to_text())
    }
}
