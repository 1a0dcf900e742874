//! Property model: literal semantic types, the value holders every widget
//! attribute is built from, and the descriptors the editor iterates.
//!
//! A widget never exposes its holders by type to the outside world. It hands
//! out ordered lists of [`Prop`] / [`PropMut`] descriptors, each pairing a
//! stable name with a `&dyn PropertyValue`. Everything generic (editor,
//! export, import, rename, rescale) goes through those lists.

mod column;
mod dimension;
mod enums;
mod flags;
mod holders;
mod ident;
mod literal;

use std::fmt;

use imforge_source::{Lexer, Rhs};

use crate::context::UiContext;

pub use column::ColumnData;
pub use dimension::{Dimension, Px, Px2};
pub use enums::{
    ArrowDir, ColorType, HAlign, ImeAction, ImeClass, InputType, ModalResult, MouseCursor, Placement,
    SliderType, VAlign, WindowKind,
};
pub use flags::{
    FlagTable, Flags, CHILD_FLAGS, COLOR_EDIT_FLAGS, INPUT_TEXT_FLAGS, SELECTABLE_FLAGS, TABLE_COLUMN_FLAGS,
    TABLE_FLAGS, TAB_BAR_FLAGS, TREE_NODE_FLAGS, WINDOW_FLAGS,
};
pub use holders::{Bindable, DataLoop, Direct, EventSlot, FieldRef, FieldType};
pub use ident::{is_identifier, rename_identifier, rename_interpolated};
pub use literal::{FontName, Literal};

// ── ValueError ────────────────────────────────────────────────────────────

/// A text or source value that does not parse for a holder's semantic type.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueError {
    pub message: String,
}

impl ValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub(crate) fn expected(what: &str, got: &str) -> Self {
        Self::new(format!("expected {}, found `{}`", what, got))
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value: {}", self.message)
    }
}

impl std::error::Error for ValueError {}

// ── Introspection ─────────────────────────────────────────────────────────

/// Semantic type of a literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    String,
    Dimension,
    Length,
    Length2,
    Color,
    Font,
    Flags(&'static FlagTable),
    /// Closed enum; the slice lists the variant names in declaration order.
    Enum(&'static [&'static str]),
    Items,
    Columns,
}

/// Which holder variant backs a property, and over which type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HolderKind {
    Direct(ValueType),
    Bindable(ValueType),
    Field(FieldType),
    Event { args: Option<&'static str> },
    Loop,
}

// ── PropertyValue ─────────────────────────────────────────────────────────

mod sealed {
    pub trait Sealed {}
}

pub(crate) use sealed::Sealed;

/// The capability set shared by every value holder.
///
/// Text is what the property editor shows and accepts; source is what
/// export writes and import reads back. For both forms parsing the emitted
/// value reproduces an equal holder.
pub trait PropertyValue: fmt::Debug + Sealed {
    fn kind(&self) -> HolderKind;

    fn to_text(&self) -> String;

    fn set_text(&mut self, text: &str) -> Result<(), ValueError>;

    fn to_source(&self) -> String;

    fn set_source(&mut self, rhs: &Rhs<'_>) -> Result<(), ValueError>;

    /// Rewrites exact-token references to field `old`. Returns whether the
    /// holder changed.
    fn rename_field(&mut self, _old: &str, _new: &str) -> bool {
        false
    }

    /// Multiplies fixed pixel quantities. Bound expressions are untouched.
    fn scale(&mut self, _factor: f32) {}
}

// ── Descriptors ───────────────────────────────────────────────────────────

/// Read-only property descriptor.
#[derive(Debug, Clone, Copy)]
pub struct Prop<'a> {
    pub name: &'static str,
    pub value: &'a dyn PropertyValue,
    /// Whether the editor offers direct keyboard entry.
    pub kbd_input: bool,
}

#[derive(Debug)]
pub struct PropMut<'a> {
    pub name: &'static str,
    pub value: &'a mut dyn PropertyValue,
    pub kbd_input: bool,
}

impl PropMut<'_> {
    pub fn as_prop(&self) -> Prop<'_> {
        Prop { name: self.name, value: &*self.value, kbd_input: self.kbd_input }
    }
}

/// Generates a pair of ordered descriptor accessors over one field list, so
/// the shared and mutable views can never drift apart.
///
/// ```ignore
/// prop_methods!(fn properties / properties_mut {
///     "label" => label [kbd],
///     "small" => small,
/// });
/// ```
macro_rules! prop_methods {
    (@kbd kbd) => { true };
    (@kbd) => { false };
    ($vis:vis fn $get:ident / $get_mut:ident { $( $key:literal => $field:ident $([$kbd:ident])? ),* $(,)? }) => {
        $vis fn $get(&self) -> Vec<$crate::property::Prop<'_>> {
            vec![$(
                $crate::property::Prop {
                    name: $key,
                    value: &self.$field,
                    kbd_input: $crate::property::prop_methods!(@kbd $($kbd)?),
                }
            ),*]
        }

        $vis fn $get_mut(&mut self) -> Vec<$crate::property::PropMut<'_>> {
            vec![$(
                $crate::property::PropMut {
                    name: $key,
                    value: &mut self.$field,
                    kbd_input: $crate::property::prop_methods!(@kbd $($kbd)?),
                }
            ),*]
        }
    };
}

pub(crate) use prop_methods;

// ── Editor hook ───────────────────────────────────────────────────────────

/// The external property editor. Given a descriptor and the current text,
/// returns the edited text, or `None` when the user did not commit a change.
pub trait PropertyEditor {
    fn edit(&mut self, prop: &Prop<'_>, current: &str) -> Option<String>;
}

impl<F> PropertyEditor for F
where
    F: FnMut(&Prop<'_>, &str) -> Option<String>,
{
    fn edit(&mut self, prop: &Prop<'_>, current: &str) -> Option<String> {
        self(prop, current)
    }
}

/// Runs one editor interaction against `prop`. Returns whether the value
/// changed; a rejected text is logged and leaves the value as it was.
pub(crate) fn edit_property(prop: PropMut<'_>, editor: &mut dyn PropertyEditor, ctx: &mut UiContext) -> bool {
    let before = prop.value.to_text();
    let Some(text) = editor.edit(&prop.as_prop(), &before) else {
        return false;
    };
    let before_src = prop.value.to_source();
    if let Err(e) = prop.value.set_text(&text) {
        log::warn!("rejected edit of `{}`: {}", prop.name, e);
        return false;
    }
    let changed = prop.value.to_source() != before_src;
    if changed {
        ctx.mark_modified();
    }
    changed
}

// ── Helpers ───────────────────────────────────────────────────────────────

/// Lexes editor text and hands the tokens to `f` as one right-hand side.
pub(crate) fn parse_text_as_source<T>(
    text: &str,
    f: impl FnOnce(&Rhs<'_>) -> Result<T, ValueError>,
) -> Result<T, ValueError> {
    let tokens = Lexer::new(text).tokenize().map_err(|e| ValueError::new(e.message))?;
    f(&Rhs::new(text, &tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DesignerConfig;

    #[derive(Debug, Default)]
    struct Pair {
        label: Bindable<String>,
        small: Direct<bool>,
    }

    impl Pair {
        prop_methods!(fn properties / properties_mut {
            "label" => label [kbd],
            "small" => small,
        });
    }

    #[test]
    fn macro_lists_share_order() {
        let mut p = Pair::default();
        let names: Vec<_> = p.properties().iter().map(|p| (p.name, p.kbd_input)).collect();
        assert_eq!(names, vec![("label", true), ("small", false)]);
        let names_mut: Vec<_> = p.properties_mut().iter().map(|p| p.name).collect();
        assert_eq!(names_mut, vec!["label", "small"]);
    }

    #[test]
    fn editor_edit_marks_modified() {
        let mut p = Pair::default();
        let mut ctx = UiContext::new(DesignerConfig::default());
        let mut editor = |_: &Prop<'_>, _: &str| Some("true".to_string());
        let prop = p.properties_mut().into_iter().nth(1).unwrap();
        assert!(edit_property(prop, &mut editor, &mut ctx));
        assert!(ctx.is_modified());
        assert_eq!(p.small.get(), &true);
    }

    #[test]
    fn rejected_edit_keeps_value() {
        let mut p = Pair::default();
        let mut ctx = UiContext::new(DesignerConfig::default());
        let mut editor = |_: &Prop<'_>, _: &str| Some("maybe".to_string());
        let prop = p.properties_mut().into_iter().nth(1).unwrap();
        assert!(!edit_property(prop, &mut editor, &mut ctx));
        assert!(!ctx.is_modified());
        assert_eq!(p.small.get(), &false);
    }

    #[test]
    fn unchanged_edit_is_not_a_change() {
        let mut p = Pair::default();
        let mut ctx = UiContext::new(DesignerConfig::default());
        let mut editor = |_: &Prop<'_>, cur: &str| Some(cur.to_string());
        let prop = p.properties_mut().into_iter().next().unwrap();
        assert!(!edit_property(prop, &mut editor, &mut ctx));
    }
}
