//! Closed enums with a fixed host-token spelling.

use imforge_source::Rhs;

use super::{Literal, ValueError, ValueType};

/// Declares an enum whose text form is the variant name and whose source
/// form is the host token(s) given per variant. Multi-token spellings such
/// as `std::string` are matched with whitespace removed.
macro_rules! literal_enum {
    (
        $(#[$meta:meta])*
        $name:ident default $default:ident {
            $( $variant:ident => $src:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant ),+
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl $name {
            pub const VARIANTS: &'static [&'static str] = &[$( stringify!($variant) ),+];

            pub fn host_token(self) -> &'static str {
                match self {
                    $( $name::$variant => $src ),+
                }
            }
        }

        impl Literal for $name {
            fn value_type(&self) -> ValueType {
                ValueType::Enum(Self::VARIANTS)
            }

            fn to_text(&self) -> String {
                match self {
                    $( $name::$variant => stringify!($variant).to_string() ),+
                }
            }

            fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
                match text.trim() {
                    $( stringify!($variant) => Ok($name::$variant), )+
                    other => Err(ValueError::new(format!(
                        "unknown {} `{}`", stringify!($name), other
                    ))),
                }
            }

            fn to_source(&self) -> String {
                self.host_token().to_string()
            }

            fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
                match rhs.compact().as_str() {
                    $( $src => Ok($name::$variant), )+
                    _ => Err(ValueError::new(format!(
                        "unknown {} `{}`", stringify!($name), rhs.text()
                    ))),
                }
            }
        }
    };
}

literal_enum! {
    ArrowDir default None {
        None => "ImGuiDir_None",
        Left => "ImGuiDir_Left",
        Right => "ImGuiDir_Right",
        Up => "ImGuiDir_Up",
        Down => "ImGuiDir_Down",
    }
}

literal_enum! {
    /// Result a button closes its modal popup with.
    ModalResult default None {
        None => "ImRad::None",
        Ok => "ImRad::Ok",
        Cancel => "ImRad::Cancel",
        Yes => "ImRad::Yes",
        No => "ImRad::No",
        Abort => "ImRad::Abort",
        Retry => "ImRad::Retry",
        Ignore => "ImRad::Ignore",
        All => "ImRad::All",
    }
}

literal_enum! {
    HAlign default Left {
        Left => "ImRad::AlignLeft",
        Center => "ImRad::AlignHCenter",
        Right => "ImRad::AlignRight",
    }
}

literal_enum! {
    VAlign default Top {
        Top => "ImRad::AlignTop",
        Center => "ImRad::AlignVCenter",
        Bottom => "ImRad::AlignBottom",
    }
}

literal_enum! {
    MouseCursor default Arrow {
        Arrow => "ImGuiMouseCursor_Arrow",
        TextInput => "ImGuiMouseCursor_TextInput",
        ResizeAll => "ImGuiMouseCursor_ResizeAll",
        ResizeNS => "ImGuiMouseCursor_ResizeNS",
        ResizeEW => "ImGuiMouseCursor_ResizeEW",
        ResizeNESW => "ImGuiMouseCursor_ResizeNESW",
        ResizeNWSE => "ImGuiMouseCursor_ResizeNWSE",
        Hand => "ImGuiMouseCursor_Hand",
        NotAllowed => "ImGuiMouseCursor_NotAllowed",
    }
}

literal_enum! {
    WindowKind default Window {
        MainWindow => "ImRad::MainWindow",
        Window => "ImRad::Window",
        Popup => "ImRad::Popup",
        ModalPopup => "ImRad::ModalPopup",
        Activity => "ImRad::Activity",
    }
}

literal_enum! {
    /// Where a top window sits inside the available area.
    Placement default None {
        None => "ImRad::Placement_None",
        Left => "ImRad::Placement_Left",
        Right => "ImRad::Placement_Right",
        Top => "ImRad::Placement_Top",
        Bottom => "ImRad::Placement_Bottom",
        Center => "ImRad::Placement_Center",
        Maximize => "ImRad::Placement_Maximize",
    }
}

literal_enum! {
    /// Soft keyboard layout requested by a text input.
    ImeClass default Text {
        Text => "ImRad::ImeText",
        Number => "ImRad::ImeNumber",
        Decimal => "ImRad::ImeDecimal",
        Phone => "ImRad::ImePhone",
        Email => "ImRad::ImeEmail",
    }
}

literal_enum! {
    ImeAction default None {
        None => "ImRad::ImeActionNone",
        Done => "ImRad::ImeActionDone",
        Go => "ImRad::ImeActionGo",
        Next => "ImRad::ImeActionNext",
        Previous => "ImRad::ImeActionPrevious",
        Search => "ImRad::ImeActionSearch",
        Send => "ImRad::ImeActionSend",
    }
}

literal_enum! {
    /// Data type edited by an input field.
    InputType default Text {
        Text => "std::string",
        Int => "int",
        Int2 => "ImRad::Int2",
        Int3 => "ImRad::Int3",
        Int4 => "ImRad::Int4",
        Float => "float",
        Double => "double",
        Float2 => "ImVec2",
        Float3 => "ImRad::Float3",
        Float4 => "ImVec4",
    }
}

literal_enum! {
    SliderType default Float {
        Int => "int",
        Float => "float",
        Angle => "ImRad::Angle",
        Float2 => "ImVec2",
        Float3 => "ImRad::Float3",
        Float4 => "ImVec4",
    }
}

literal_enum! {
    ColorType default Color4 {
        Color3 => "ImRad::Color3",
        Color4 => "ImVec4",
        Picker3 => "ImRad::ColorPicker3",
        Picker4 => "ImRad::ColorPicker4",
    }
}

impl InputType {
    pub fn is_text(self) -> bool {
        self == InputType::Text
    }
}

#[cfg(test)]
mod tests {
    use imforge_source::Lexer;

    use super::*;

    fn src<T: Literal>(proto: &T, text: &str) -> Result<T, ValueError> {
        let toks = Lexer::new(text).tokenize().unwrap();
        proto.parse_source(&Rhs::new(text, &toks))
    }

    #[test]
    fn multi_token_spelling() {
        assert_eq!(src(&InputType::Int, "std :: string"), Ok(InputType::Text));
        assert_eq!(InputType::Text.to_source(), "std::string");
    }

    #[test]
    fn text_is_variant_name() {
        assert_eq!(ModalResult::Cancel.to_text(), "Cancel");
        assert_eq!(ModalResult::None.parse_text("Retry"), Ok(ModalResult::Retry));
        assert!(ModalResult::None.parse_text("Maybe").is_err());
    }

    #[test]
    fn defaults() {
        assert_eq!(WindowKind::default(), WindowKind::Window);
        assert_eq!(Placement::default().to_source(), "ImRad::Placement_None");
    }

    #[test]
    fn unknown_token_rejected() {
        assert!(src(&ArrowDir::None, "ImGuiDir_Sideways").is_err());
    }
}
