//! Static bit-flag option tables and the table-bound [`Flags`] literal.

use std::fmt;

use imforge_source::Rhs;

use super::literal::source_i64;
use super::{parse_text_as_source, Literal, ValueError, ValueType};

/// Named bits of one host flag family. Entries are listed in canonical
/// emission order; a composite entry (several bits) placed before its parts
/// is preferred when all of its bits are set.
#[derive(Debug, PartialEq, Eq)]
pub struct FlagTable {
    pub name: &'static str,
    pub entries: &'static [(&'static str, u32)],
}

impl FlagTable {
    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, b)| *b)
    }

    pub fn mask(&self) -> u32 {
        self.entries.iter().fold(0, |m, (_, b)| m | b)
    }

    /// Entry names covering `bits`, in table order.
    pub fn names(&self, bits: u32) -> Vec<&'static str> {
        let mut covered = 0;
        let mut out = Vec::new();
        for &(name, b) in self.entries {
            if b != 0 && bits & b == b && covered & b != b {
                out.push(name);
                covered |= b;
            }
        }
        out
    }
}

// ── Flags ─────────────────────────────────────────────────────────────────

/// A set of bits from one [`FlagTable`]. Equality compares bits only.
#[derive(Clone, Copy)]
pub struct Flags {
    bits: u32,
    table: &'static FlagTable,
}

impl Flags {
    pub const fn empty(table: &'static FlagTable) -> Self {
        Self { bits: 0, table }
    }

    pub const fn with_bits(table: &'static FlagTable, bits: u32) -> Self {
        Self { bits, table }
    }

    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    pub fn table(&self) -> &'static FlagTable {
        self.table
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.lookup(name).is_some_and(|b| self.bits & b == b)
    }

    pub fn set(&mut self, name: &str, on: bool) -> Result<(), ValueError> {
        let b = self
            .table
            .lookup(name)
            .ok_or_else(|| ValueError::new(format!("unknown {} flag `{}`", self.table.name, name)))?;
        if on {
            self.bits |= b;
        } else {
            self.bits &= !b;
        }
        Ok(())
    }

    fn from_rhs(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        let mut bits = 0;
        for part in rhs.split_top_level("|") {
            if part.is_empty() {
                return Err(ValueError::expected("a flag name", rhs.text()));
            }
            if part.number().is_some() {
                let v = source_i64(&part)?;
                let v = u32::try_from(v).map_err(|_| ValueError::expected("a flag mask", part.text()))?;
                if v & !self.table.mask() != 0 {
                    return Err(ValueError::new(format!("bits {:#x} are not {} flags", v, self.table.name)));
                }
                bits |= v;
                continue;
            }
            let name = part.compact();
            bits |= self
                .table
                .lookup(&name)
                .ok_or_else(|| ValueError::new(format!("unknown {} flag `{}`", self.table.name, name)))?;
        }
        Ok(Flags { bits, table: self.table })
    }
}

impl PartialEq for Flags {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flags({}: {})", self.table.name, self.to_source())
    }
}

impl Literal for Flags {
    fn value_type(&self) -> ValueType {
        ValueType::Flags(self.table)
    }

    fn to_text(&self) -> String {
        self.to_source()
    }

    fn parse_text(&self, text: &str) -> Result<Self, ValueError> {
        parse_text_as_source(text, |rhs| self.parse_source(rhs))
    }

    fn to_source(&self) -> String {
        let names = self.table.names(self.bits);
        if names.is_empty() { "0".to_string() } else { names.join(" | ") }
    }

    fn parse_source(&self, rhs: &Rhs<'_>) -> Result<Self, ValueError> {
        self.from_rhs(rhs)
    }
}

// ── Tables ────────────────────────────────────────────────────────────────

pub static WINDOW_FLAGS: FlagTable = FlagTable {
    name: "window",
    entries: &[
        ("ImGuiWindowFlags_NoTitleBar", 1 << 0),
        ("ImGuiWindowFlags_NoResize", 1 << 1),
        ("ImGuiWindowFlags_NoMove", 1 << 2),
        ("ImGuiWindowFlags_NoScrollbar", 1 << 3),
        ("ImGuiWindowFlags_NoScrollWithMouse", 1 << 4),
        ("ImGuiWindowFlags_NoCollapse", 1 << 5),
        ("ImGuiWindowFlags_AlwaysAutoResize", 1 << 6),
        ("ImGuiWindowFlags_NoBackground", 1 << 7),
        ("ImGuiWindowFlags_NoSavedSettings", 1 << 8),
        ("ImGuiWindowFlags_NoMouseInputs", 1 << 9),
        ("ImGuiWindowFlags_MenuBar", 1 << 10),
        ("ImGuiWindowFlags_HorizontalScrollbar", 1 << 11),
        ("ImGuiWindowFlags_NoFocusOnAppearing", 1 << 12),
        ("ImGuiWindowFlags_NoBringToFrontOnFocus", 1 << 13),
        ("ImGuiWindowFlags_AlwaysVerticalScrollbar", 1 << 14),
        ("ImGuiWindowFlags_AlwaysHorizontalScrollbar", 1 << 15),
        ("ImGuiWindowFlags_NoNavInputs", 1 << 16),
        ("ImGuiWindowFlags_NoNavFocus", 1 << 17),
        ("ImGuiWindowFlags_UnsavedDocument", 1 << 18),
    ],
};

pub static CHILD_FLAGS: FlagTable = FlagTable {
    name: "child",
    entries: &[
        ("ImGuiChildFlags_Borders", 1 << 0),
        ("ImGuiChildFlags_AlwaysUseWindowPadding", 1 << 1),
        ("ImGuiChildFlags_ResizeX", 1 << 2),
        ("ImGuiChildFlags_ResizeY", 1 << 3),
        ("ImGuiChildFlags_AutoResizeX", 1 << 4),
        ("ImGuiChildFlags_AutoResizeY", 1 << 5),
        ("ImGuiChildFlags_AlwaysAutoResize", 1 << 6),
        ("ImGuiChildFlags_FrameStyle", 1 << 7),
        ("ImGuiChildFlags_NavFlattened", 1 << 8),
    ],
};

pub static TABLE_FLAGS: FlagTable = FlagTable {
    name: "table",
    entries: &[
        ("ImGuiTableFlags_Resizable", 1 << 0),
        ("ImGuiTableFlags_Reorderable", 1 << 1),
        ("ImGuiTableFlags_Hideable", 1 << 2),
        ("ImGuiTableFlags_Sortable", 1 << 3),
        ("ImGuiTableFlags_NoSavedSettings", 1 << 4),
        ("ImGuiTableFlags_ContextMenuInBody", 1 << 5),
        ("ImGuiTableFlags_RowBg", 1 << 6),
        ("ImGuiTableFlags_Borders", 0xF << 7),
        ("ImGuiTableFlags_BordersInnerH", 1 << 7),
        ("ImGuiTableFlags_BordersOuterH", 1 << 8),
        ("ImGuiTableFlags_BordersInnerV", 1 << 9),
        ("ImGuiTableFlags_BordersOuterV", 1 << 10),
        ("ImGuiTableFlags_NoBordersInBody", 1 << 11),
        ("ImGuiTableFlags_NoBordersInBodyUntilResize", 1 << 12),
        ("ImGuiTableFlags_NoHostExtendX", 1 << 16),
        ("ImGuiTableFlags_NoHostExtendY", 1 << 17),
        ("ImGuiTableFlags_NoKeepColumnsVisible", 1 << 18),
        ("ImGuiTableFlags_PreciseWidths", 1 << 19),
        ("ImGuiTableFlags_NoClip", 1 << 20),
        ("ImGuiTableFlags_PadOuterX", 1 << 21),
        ("ImGuiTableFlags_NoPadOuterX", 1 << 22),
        ("ImGuiTableFlags_NoPadInnerX", 1 << 23),
        ("ImGuiTableFlags_ScrollX", 1 << 24),
        ("ImGuiTableFlags_ScrollY", 1 << 25),
        ("ImGuiTableFlags_SortMulti", 1 << 26),
        ("ImGuiTableFlags_SortTristate", 1 << 27),
        ("ImGuiTableFlags_HighlightHoveredColumn", 1 << 28),
    ],
};

pub static TABLE_COLUMN_FLAGS: FlagTable = FlagTable {
    name: "table column",
    entries: &[
        ("ImGuiTableColumnFlags_Disabled", 1 << 0),
        ("ImGuiTableColumnFlags_DefaultHide", 1 << 1),
        ("ImGuiTableColumnFlags_DefaultSort", 1 << 2),
        ("ImGuiTableColumnFlags_WidthStretch", 1 << 3),
        ("ImGuiTableColumnFlags_WidthFixed", 1 << 4),
        ("ImGuiTableColumnFlags_NoResize", 1 << 5),
        ("ImGuiTableColumnFlags_NoReorder", 1 << 6),
        ("ImGuiTableColumnFlags_NoHide", 1 << 7),
        ("ImGuiTableColumnFlags_NoClip", 1 << 8),
        ("ImGuiTableColumnFlags_NoSort", 1 << 9),
        ("ImGuiTableColumnFlags_NoSortAscending", 1 << 10),
        ("ImGuiTableColumnFlags_NoSortDescending", 1 << 11),
        ("ImGuiTableColumnFlags_NoHeaderLabel", 1 << 12),
        ("ImGuiTableColumnFlags_NoHeaderWidth", 1 << 13),
        ("ImGuiTableColumnFlags_PreferSortAscending", 1 << 14),
        ("ImGuiTableColumnFlags_PreferSortDescending", 1 << 15),
        ("ImGuiTableColumnFlags_IndentEnable", 1 << 16),
        ("ImGuiTableColumnFlags_IndentDisable", 1 << 17),
        ("ImGuiTableColumnFlags_AngledHeader", 1 << 18),
    ],
};

pub static SELECTABLE_FLAGS: FlagTable = FlagTable {
    name: "selectable",
    entries: &[
        ("ImGuiSelectableFlags_NoAutoClosePopups", 1 << 0),
        ("ImGuiSelectableFlags_SpanAllColumns", 1 << 1),
        ("ImGuiSelectableFlags_AllowDoubleClick", 1 << 2),
        ("ImGuiSelectableFlags_Disabled", 1 << 3),
        ("ImGuiSelectableFlags_AllowOverlap", 1 << 4),
        ("ImGuiSelectableFlags_Highlight", 1 << 5),
    ],
};

/// Bit 26 is the toolkit-internal multiline flag; the designer uses it to
/// pick the multiline input variant.
pub static INPUT_TEXT_FLAGS: FlagTable = FlagTable {
    name: "input text",
    entries: &[
        ("ImGuiInputTextFlags_CharsDecimal", 1 << 0),
        ("ImGuiInputTextFlags_CharsHexadecimal", 1 << 1),
        ("ImGuiInputTextFlags_CharsScientific", 1 << 2),
        ("ImGuiInputTextFlags_CharsUppercase", 1 << 3),
        ("ImGuiInputTextFlags_CharsNoBlank", 1 << 4),
        ("ImGuiInputTextFlags_AllowTabInput", 1 << 5),
        ("ImGuiInputTextFlags_EnterReturnsTrue", 1 << 6),
        ("ImGuiInputTextFlags_EscapeClearsAll", 1 << 7),
        ("ImGuiInputTextFlags_CtrlEnterForNewLine", 1 << 8),
        ("ImGuiInputTextFlags_ReadOnly", 1 << 9),
        ("ImGuiInputTextFlags_Password", 1 << 10),
        ("ImGuiInputTextFlags_AlwaysOverwrite", 1 << 11),
        ("ImGuiInputTextFlags_AutoSelectAll", 1 << 12),
        ("ImGuiInputTextFlags_ParseEmptyRefVal", 1 << 13),
        ("ImGuiInputTextFlags_DisplayEmptyRefVal", 1 << 14),
        ("ImGuiInputTextFlags_NoHorizontalScroll", 1 << 15),
        ("ImGuiInputTextFlags_NoUndoRedo", 1 << 16),
        ("ImGuiInputTextFlags_Multiline", 1 << 26),
    ],
};

pub static COLOR_EDIT_FLAGS: FlagTable = FlagTable {
    name: "colour edit",
    entries: &[
        ("ImGuiColorEditFlags_NoAlpha", 1 << 1),
        ("ImGuiColorEditFlags_NoPicker", 1 << 2),
        ("ImGuiColorEditFlags_NoOptions", 1 << 3),
        ("ImGuiColorEditFlags_NoSmallPreview", 1 << 4),
        ("ImGuiColorEditFlags_NoInputs", 1 << 5),
        ("ImGuiColorEditFlags_NoTooltip", 1 << 6),
        ("ImGuiColorEditFlags_NoLabel", 1 << 7),
        ("ImGuiColorEditFlags_NoSidePreview", 1 << 8),
        ("ImGuiColorEditFlags_NoDragDrop", 1 << 9),
        ("ImGuiColorEditFlags_NoBorder", 1 << 10),
        ("ImGuiColorEditFlags_AlphaBar", 1 << 16),
        ("ImGuiColorEditFlags_AlphaPreview", 1 << 17),
        ("ImGuiColorEditFlags_AlphaPreviewHalf", 1 << 18),
        ("ImGuiColorEditFlags_HDR", 1 << 19),
        ("ImGuiColorEditFlags_DisplayRGB", 1 << 20),
        ("ImGuiColorEditFlags_DisplayHSV", 1 << 21),
        ("ImGuiColorEditFlags_DisplayHex", 1 << 22),
        ("ImGuiColorEditFlags_Uint8", 1 << 23),
        ("ImGuiColorEditFlags_Float", 1 << 24),
        ("ImGuiColorEditFlags_PickerHueBar", 1 << 25),
        ("ImGuiColorEditFlags_PickerHueWheel", 1 << 26),
        ("ImGuiColorEditFlags_InputRGB", 1 << 27),
        ("ImGuiColorEditFlags_InputHSV", 1 << 28),
    ],
};

pub static TAB_BAR_FLAGS: FlagTable = FlagTable {
    name: "tab bar",
    entries: &[
        ("ImGuiTabBarFlags_Reorderable", 1 << 0),
        ("ImGuiTabBarFlags_AutoSelectNewTabs", 1 << 1),
        ("ImGuiTabBarFlags_TabListPopupButton", 1 << 2),
        ("ImGuiTabBarFlags_NoCloseWithMiddleMouseButton", 1 << 3),
        ("ImGuiTabBarFlags_NoTabListScrollingButtons", 1 << 4),
        ("ImGuiTabBarFlags_NoTooltip", 1 << 5),
        ("ImGuiTabBarFlags_DrawSelectedOverline", 1 << 6),
        ("ImGuiTabBarFlags_FittingPolicyResizeDown", 1 << 7),
        ("ImGuiTabBarFlags_FittingPolicyScroll", 1 << 8),
    ],
};

pub static TREE_NODE_FLAGS: FlagTable = FlagTable {
    name: "tree node",
    entries: &[
        ("ImGuiTreeNodeFlags_Selected", 1 << 0),
        ("ImGuiTreeNodeFlags_Framed", 1 << 1),
        ("ImGuiTreeNodeFlags_AllowOverlap", 1 << 2),
        ("ImGuiTreeNodeFlags_NoTreePushOnOpen", 1 << 3),
        ("ImGuiTreeNodeFlags_NoAutoOpenOnLog", 1 << 4),
        ("ImGuiTreeNodeFlags_DefaultOpen", 1 << 5),
        ("ImGuiTreeNodeFlags_OpenOnDoubleClick", 1 << 6),
        ("ImGuiTreeNodeFlags_OpenOnArrow", 1 << 7),
        ("ImGuiTreeNodeFlags_Leaf", 1 << 8),
        ("ImGuiTreeNodeFlags_Bullet", 1 << 9),
        ("ImGuiTreeNodeFlags_FramePadding", 1 << 10),
        ("ImGuiTreeNodeFlags_SpanAvailWidth", 1 << 11),
        ("ImGuiTreeNodeFlags_SpanFullWidth", 1 << 12),
        ("ImGuiTreeNodeFlags_SpanTextWidth", 1 << 13),
        ("ImGuiTreeNodeFlags_SpanAllColumns", 1 << 14),
        ("ImGuiTreeNodeFlags_NavLeftJumpsBackHere", 1 << 15),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_entry_preferred() {
        let all = Flags::with_bits(&TABLE_FLAGS, (0xF << 7) | 1);
        assert_eq!(all.to_source(), "ImGuiTableFlags_Resizable | ImGuiTableFlags_Borders");
        let some = Flags::with_bits(&TABLE_FLAGS, 1 << 7);
        assert_eq!(some.to_source(), "ImGuiTableFlags_BordersInnerH");
    }

    #[test]
    fn empty_is_zero() {
        let f = Flags::empty(&WINDOW_FLAGS);
        assert_eq!(f.to_source(), "0");
        assert_eq!(f.parse_text("0"), Ok(f));
    }

    #[test]
    fn parse_names_and_masks() {
        let f = Flags::empty(&WINDOW_FLAGS);
        let g = f.parse_text("ImGuiWindowFlags_NoTitleBar | ImGuiWindowFlags_MenuBar").unwrap();
        assert_eq!(g.bits(), 1 | (1 << 10));
        assert!(g.contains("ImGuiWindowFlags_MenuBar"));
        assert_eq!(f.parse_text("0x401"), Ok(g));
    }

    #[test]
    fn unknown_names_are_rejected() {
        let f = Flags::empty(&WINDOW_FLAGS);
        assert!(f.parse_text("ImGuiWindowFlags_Bogus").is_err());
        assert!(f.parse_text("ImGuiChildFlags_Borders").is_err());
        assert!(f.parse_text("ImGuiWindowFlags_NoMove |").is_err());
        assert!(f.parse_text("0x80000000").is_err());
    }

    #[test]
    fn set_by_name() {
        let mut f = Flags::empty(&INPUT_TEXT_FLAGS);
        f.set("ImGuiInputTextFlags_Multiline", true).unwrap();
        assert_eq!(f.bits(), 1 << 26);
        assert!(f.set("nope", true).is_err());
    }
}
