use super::{WidgetKind, WidgetType};
use crate::node::Behavior;
use crate::property::{prop_methods, Bindable, Direct, EventSlot, FieldRef, FieldType, PropertyValue, Px, Px2};

/// The window's menu strip. Holds top-level menus only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuBar;

impl WidgetType for MenuBar {
    fn behavior(&self) -> Behavior {
        Behavior::NO_OVERLAY_POS
    }

    prop_methods!(fn properties / properties_mut {});

    fn accepts(&self, child: &WidgetKind) -> bool {
        matches!(child, WidgetKind::MenuIt(_))
    }
}

/// A menu, a menu entry or, directly under the window with `context_menu`
/// set, a right-click popup. Entries with children open submenus.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuIt {
    pub context_menu: Direct<bool>,
    /// Host draws the entry through `on_change`.
    pub owner_draw: Direct<bool>,
    pub label: Bindable<String>,
    pub shortcut: Direct<String>,
    pub separator: Direct<bool>,
    pub checked: FieldRef,
    pub style_padding: Direct<Option<Px2>>,
    pub style_spacing: Direct<Option<Px2>>,
    pub style_rounding: Direct<Option<Px>>,
    pub on_change: EventSlot,
}

impl Default for MenuIt {
    fn default() -> Self {
        Self {
            context_menu: Direct::default(),
            owner_draw: Direct::default(),
            label: Bindable::new("Item".to_string()),
            shortcut: Direct::default(),
            separator: Direct::default(),
            checked: FieldRef::new(FieldType::Bool),
            style_padding: Direct::default(),
            style_spacing: Direct::default(),
            style_rounding: Direct::default(),
            on_change: EventSlot::new(),
        }
    }
}

impl MenuIt {
    #[inline]
    pub fn is_context_menu(&self) -> bool {
        *self.context_menu.get()
    }
}

impl WidgetType for MenuIt {
    fn behavior(&self) -> Behavior {
        Behavior::NO_OVERLAY_POS | Behavior::NO_CONTEXT_MENU
    }

    prop_methods!(fn properties / properties_mut {
        "context_menu" => context_menu,
        "owner_draw" => owner_draw,
        "label" => label [kbd],
        "shortcut" => shortcut [kbd],
        "separator" => separator,
        "checked" => checked [kbd],
        "style_padding" => style_padding [kbd],
        "style_spacing" => style_spacing [kbd],
        "style_rounding" => style_rounding [kbd],
    });

    prop_methods!(fn events / events_mut {
        "on_change" => on_change [kbd],
    });

    fn accepts(&self, child: &WidgetKind) -> bool {
        matches!(child, WidgetKind::MenuIt(_))
    }

    fn label(&self) -> Option<String> {
        Some(self.label.to_text())
    }
}
