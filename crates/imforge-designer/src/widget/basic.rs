//! Leaf widgets without a data-model binding of their own beyond a field
//! reference: spacers, separators, text and the clickable controls.

use imforge_core::coords::Color32;

use super::{WidgetBase, WidgetType};
use crate::node::Behavior;
use crate::property::{
    prop_methods, ArrowDir, Bindable, Dimension, Direct, EventSlot, FieldRef, FieldType, Flags, HAlign, ModalResult,
    PropertyValue, Px, VAlign, SELECTABLE_FLAGS,
};

/// Empty space of a fixed size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spacer;

impl WidgetType for Spacer {
    fn behavior(&self) -> Behavior {
        Behavior::SNAP_SIDES | Behavior::HAS_SIZE
    }

    prop_methods!(fn properties / properties_mut {});

    fn init_base(&self, base: &mut WidgetBase) {
        base.size_x.set_value(Dimension::px(20.0));
        base.size_y.set_value(Dimension::px(20.0));
    }
}

/// Horizontal rule, optionally with a caption.
#[derive(Debug, Clone, PartialEq)]
pub struct Separator {
    pub label: Bindable<String>,
    pub style_thickness: Direct<Option<Px>>,
    pub style_outer_padding: Direct<bool>,
}

impl Default for Separator {
    fn default() -> Self {
        Self { label: Bindable::default(), style_thickness: Direct::default(), style_outer_padding: Direct::new(true) }
    }
}

impl WidgetType for Separator {
    prop_methods!(fn properties / properties_mut {
        "label" => label [kbd],
        "style_thickness" => style_thickness [kbd],
        "style_outer_padding" => style_outer_padding,
    });

    fn label(&self) -> Option<String> {
        Some(self.label.to_text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: Bindable<String>,
    /// Shift down to line up with framed widgets on the same line.
    pub align_to_frame: Direct<bool>,
    pub wrap: Direct<bool>,
}

impl Default for Text {
    fn default() -> Self {
        Self { text: Bindable::new("Text".to_string()), align_to_frame: Direct::default(), wrap: Direct::default() }
    }
}

impl WidgetType for Text {
    prop_methods!(fn properties / properties_mut {
        "text" => text [kbd],
        "align_to_frame" => align_to_frame,
        "wrap" => wrap,
    });

    fn label(&self) -> Option<String> {
        Some(self.text.to_text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selectable {
    pub label: Bindable<String>,
    pub flags: Direct<Flags>,
    pub horiz_align: Direct<HAlign>,
    pub vert_align: Direct<VAlign>,
    pub align_to_frame: Direct<bool>,
    pub read_only: Direct<bool>,
    pub field: FieldRef,
    pub on_change: EventSlot,
}

impl Default for Selectable {
    fn default() -> Self {
        Self {
            label: Bindable::new("label".to_string()),
            flags: Direct::new(Flags::empty(&SELECTABLE_FLAGS)),
            horiz_align: Direct::default(),
            vert_align: Direct::default(),
            align_to_frame: Direct::default(),
            read_only: Direct::default(),
            field: FieldRef::new(FieldType::Bool),
            on_change: EventSlot::new(),
        }
    }
}

impl WidgetType for Selectable {
    fn behavior(&self) -> Behavior {
        Behavior::SNAP_SIDES | Behavior::HAS_SIZE
    }

    prop_methods!(fn properties / properties_mut {
        "label" => label [kbd],
        "flags" => flags,
        "horiz_align" => horiz_align,
        "vert_align" => vert_align,
        "align_to_frame" => align_to_frame,
        "read_only" => read_only,
        "field" => field [kbd],
    });

    prop_methods!(fn events / events_mut {
        "on_change" => on_change [kbd],
    });

    fn label(&self) -> Option<String> {
        Some(self.label.to_text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: Bindable<String>,
    /// Draws an arrow button instead of a labelled one when not `None`.
    pub arrow_dir: Direct<ArrowDir>,
    pub small: Direct<bool>,
    /// Result reported to the caller when the button closes a modal popup.
    pub modal_result: Direct<ModalResult>,
    pub shortcut: Direct<String>,
    /// Name of a popup menu opened under the button.
    pub drop_down_menu: Direct<String>,
    pub style_button: Bindable<Option<Color32>>,
    pub style_hovered: Bindable<Option<Color32>>,
    pub on_change: EventSlot,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            label: Bindable::new("Button".to_string()),
            arrow_dir: Direct::default(),
            small: Direct::default(),
            modal_result: Direct::default(),
            shortcut: Direct::default(),
            drop_down_menu: Direct::default(),
            style_button: Bindable::default(),
            style_hovered: Bindable::default(),
            on_change: EventSlot::new(),
        }
    }
}

impl WidgetType for Button {
    fn behavior(&self) -> Behavior {
        Behavior::SNAP_SIDES | Behavior::HAS_SIZE
    }

    prop_methods!(fn properties / properties_mut {
        "label" => label [kbd],
        "arrow_dir" => arrow_dir,
        "small" => small,
        "modal_result" => modal_result,
        "shortcut" => shortcut [kbd],
        "drop_down_menu" => drop_down_menu [kbd],
        "style_button" => style_button,
        "style_hovered" => style_hovered,
    });

    prop_methods!(fn events / events_mut {
        "on_change" => on_change [kbd],
    });

    fn label(&self) -> Option<String> {
        Some(self.label.to_text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckBox {
    pub label: Bindable<String>,
    pub field: FieldRef,
    pub on_change: EventSlot,
}

impl Default for CheckBox {
    fn default() -> Self {
        Self { label: Bindable::new("label".to_string()), field: FieldRef::new(FieldType::Bool), on_change: EventSlot::new() }
    }
}

impl WidgetType for CheckBox {
    prop_methods!(fn properties / properties_mut {
        "label" => label [kbd],
        "field" => field [kbd],
    });

    prop_methods!(fn events / events_mut {
        "on_change" => on_change [kbd],
    });

    fn label(&self) -> Option<String> {
        Some(self.label.to_text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadioButton {
    pub label: Bindable<String>,
    /// Value written to `field` when this button is picked.
    pub value_id: Direct<i32>,
    pub field: FieldRef,
}

impl Default for RadioButton {
    fn default() -> Self {
        Self {
            label: Bindable::new("label".to_string()),
            value_id: Direct::default(),
            field: FieldRef::new(FieldType::Int),
        }
    }
}

impl WidgetType for RadioButton {
    prop_methods!(fn properties / properties_mut {
        "label" => label [kbd],
        "value_id" => value_id [kbd],
        "field" => field [kbd],
    });

    fn label(&self) -> Option<String> {
        Some(self.label.to_text())
    }
}
