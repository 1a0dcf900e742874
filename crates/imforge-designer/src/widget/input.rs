//! Editing widgets: each one is tied to an application field.

use imforge_core::coords::Color32;

use super::WidgetType;
use crate::node::Behavior;
use crate::property::{
    prop_methods, Bindable, ColorType, Direct, EventSlot, FieldRef, FieldType, Flags, ImeAction, ImeClass, InputType,
    PropertyValue, SliderType, COLOR_EDIT_FLAGS, INPUT_TEXT_FLAGS,
};

const MULTILINE: &str = "ImGuiInputTextFlags_Multiline";

/// Text or numeric entry. With the multiline flag set the widget grows a
/// height property.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    pub field: FieldRef,
    pub label: Direct<String>,
    pub ty: Direct<InputType>,
    pub hint: Bindable<String>,
    pub ime_class: Direct<ImeClass>,
    pub ime_action: Direct<ImeAction>,
    /// Increment of the +/- buttons on numeric inputs; 0 hides them.
    pub step: Direct<f32>,
    pub format: Direct<String>,
    pub flags: Direct<Flags>,
    pub initial_focus: Direct<bool>,
    pub force_focus: Bindable<bool>,
    pub on_change: EventSlot,
    pub on_ime_action: EventSlot,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            field: FieldRef::new(FieldType::Any),
            label: Direct::default(),
            ty: Direct::default(),
            hint: Bindable::default(),
            ime_class: Direct::default(),
            ime_action: Direct::default(),
            step: Direct::new(1.0),
            format: Direct::default(),
            flags: Direct::new(Flags::empty(&INPUT_TEXT_FLAGS)),
            initial_focus: Direct::default(),
            force_focus: Bindable::default(),
            on_change: EventSlot::new(),
            on_ime_action: EventSlot::new(),
        }
    }
}

impl Input {
    pub fn is_multiline(&self) -> bool {
        self.ty.get().is_text() && self.flags.get().contains(MULTILINE)
    }
}

impl WidgetType for Input {
    fn behavior(&self) -> Behavior {
        if self.is_multiline() {
            Behavior::SNAP_SIDES | Behavior::HAS_SIZE
        } else {
            Behavior::SNAP_SIDES | Behavior::HAS_SIZE_X
        }
    }

    prop_methods!(fn properties / properties_mut {
        "field" => field [kbd],
        "label" => label [kbd],
        "type" => ty,
        "hint" => hint [kbd],
        "ime_class" => ime_class,
        "ime_action" => ime_action,
        "step" => step [kbd],
        "format" => format [kbd],
        "flags" => flags,
        "initial_focus" => initial_focus,
        "force_focus" => force_focus,
    });

    prop_methods!(fn events / events_mut {
        "on_change" => on_change [kbd],
        "on_ime_action" => on_ime_action [kbd],
    });

    fn label(&self) -> Option<String> {
        Some(self.field.to_text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Combo {
    pub label: Direct<String>,
    pub field: FieldRef,
    pub items: Bindable<Vec<String>>,
    pub on_change: EventSlot,
}

impl Default for Combo {
    fn default() -> Self {
        Self {
            label: Direct::default(),
            field: FieldRef::new(FieldType::String),
            items: Bindable::default(),
            on_change: EventSlot::new(),
        }
    }
}

impl WidgetType for Combo {
    fn behavior(&self) -> Behavior {
        Behavior::SNAP_SIDES | Behavior::HAS_SIZE_X
    }

    prop_methods!(fn properties / properties_mut {
        "label" => label [kbd],
        "field" => field [kbd],
        "items" => items [kbd],
    });

    prop_methods!(fn events / events_mut {
        "on_change" => on_change [kbd],
    });

    fn label(&self) -> Option<String> {
        Some(self.field.to_text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub label: Direct<String>,
    pub field: FieldRef,
    pub ty: Direct<SliderType>,
    pub min: Direct<f32>,
    pub max: Direct<f32>,
    pub format: Direct<String>,
    pub on_change: EventSlot,
}

impl Default for Slider {
    fn default() -> Self {
        Self {
            label: Direct::default(),
            field: FieldRef::new(FieldType::Float),
            ty: Direct::default(),
            min: Direct::new(0.0),
            max: Direct::new(1.0),
            format: Direct::default(),
            on_change: EventSlot::new(),
        }
    }
}

impl WidgetType for Slider {
    fn behavior(&self) -> Behavior {
        Behavior::SNAP_SIDES | Behavior::HAS_SIZE_X
    }

    prop_methods!(fn properties / properties_mut {
        "label" => label [kbd],
        "field" => field [kbd],
        "type" => ty,
        "min" => min [kbd],
        "max" => max [kbd],
        "format" => format [kbd],
    });

    prop_methods!(fn events / events_mut {
        "on_change" => on_change [kbd],
    });

    fn label(&self) -> Option<String> {
        Some(self.field.to_text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBar {
    /// Overlay the percentage text.
    pub indicator: Direct<bool>,
    pub field: FieldRef,
    pub style_color: Bindable<Option<Color32>>,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self { indicator: Direct::new(true), field: FieldRef::new(FieldType::Float), style_color: Bindable::default() }
    }
}

impl WidgetType for ProgressBar {
    fn behavior(&self) -> Behavior {
        Behavior::SNAP_SIDES | Behavior::HAS_SIZE
    }

    prop_methods!(fn properties / properties_mut {
        "indicator" => indicator,
        "field" => field [kbd],
        "style_color" => style_color,
    });

    fn label(&self) -> Option<String> {
        Some(self.field.to_text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorEdit {
    pub field: FieldRef,
    pub label: Direct<String>,
    pub ty: Direct<ColorType>,
    pub flags: Direct<Flags>,
    pub on_change: EventSlot,
}

impl Default for ColorEdit {
    fn default() -> Self {
        Self {
            field: FieldRef::new(FieldType::Color),
            label: Direct::default(),
            ty: Direct::default(),
            flags: Direct::new(Flags::empty(&COLOR_EDIT_FLAGS)),
            on_change: EventSlot::new(),
        }
    }
}

impl WidgetType for ColorEdit {
    fn behavior(&self) -> Behavior {
        Behavior::SNAP_SIDES | Behavior::HAS_SIZE_X
    }

    prop_methods!(fn properties / properties_mut {
        "field" => field [kbd],
        "label" => label [kbd],
        "type" => ty,
        "flags" => flags,
    });

    prop_methods!(fn events / events_mut {
        "on_change" => on_change [kbd],
    });

    fn label(&self) -> Option<String> {
        Some(self.field.to_text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub file_name: Bindable<String>,
    /// Texture handle the host loads `file_name` into.
    pub field: FieldRef,
}

impl Default for Image {
    fn default() -> Self {
        Self { file_name: Bindable::default(), field: FieldRef::new(FieldType::Texture) }
    }
}

impl WidgetType for Image {
    fn behavior(&self) -> Behavior {
        Behavior::SNAP_SIDES | Behavior::HAS_SIZE
    }

    prop_methods!(fn properties / properties_mut {
        "file_name" => file_name [kbd],
        "field" => field [kbd],
    });

    fn label(&self) -> Option<String> {
        Some(self.file_name.to_text())
    }
}

/// A rectangle the host draws itself through the `on_draw` handler.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomWidget {
    pub on_draw: EventSlot,
}

impl Default for CustomWidget {
    fn default() -> Self {
        Self { on_draw: EventSlot::with_args("const ImRad::CustomWidgetArgs&") }
    }
}

impl WidgetType for CustomWidget {
    fn behavior(&self) -> Behavior {
        Behavior::SNAP_SIDES | Behavior::HAS_SIZE
    }

    prop_methods!(fn properties / properties_mut {});

    prop_methods!(fn events / events_mut {
        "on_draw" => on_draw [kbd],
    });

    fn label(&self) -> Option<String> {
        Some(self.on_draw.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiline_input_grows_height() {
        let mut input = Input::default();
        assert!(!input.behavior().contains(Behavior::HAS_SIZE_Y));
        input.flags.set(Flags::with_bits(&INPUT_TEXT_FLAGS, 1 << 26));
        assert!(input.is_multiline());
        assert!(input.behavior().contains(Behavior::HAS_SIZE_Y));
        input.ty.set(InputType::Int);
        assert!(!input.behavior().contains(Behavior::HAS_SIZE_Y));
    }

    #[test]
    fn custom_widget_event_has_args() {
        let w = CustomWidget::default();
        let events = w.events();
        assert_eq!(events[0].name, "on_draw");
        assert_eq!(
            events[0].value.kind(),
            crate::property::HolderKind::Event { args: Some("const ImRad::CustomWidgetArgs&") }
        );
    }
}
