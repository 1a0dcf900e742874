//! Source round trip: a window tree is written as marker comments and
//! `Type.property = value;` statements, and read back into an equal tree.
//!
//! ```text
//! /// @begin TopWindow
//! TopWindow.title = "Settings";
//!     /// @begin Button
//!     /// @user-before
//!     if (advanced) {
//!     /// @user-end
//!     Button.label = "OK";
//!     Button.on_change = OnOk;
//!     /// @user-after
//!     }
//!     /// @user-end
//!     /// @end Button
//! /// @end TopWindow
//! ```

mod error;
mod export;
mod import;

pub use error::{ImportError, ImportErrorKind};
pub use export::export_window;
pub use import::import_window;

const USER_BEFORE: &str = "user-before";
const USER_AFTER: &str = "user-after";

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::config::{DesignerConfig, ImportPolicy};
    use crate::context::UiContext;
    use crate::node::UiNode;
    use crate::property::{HolderKind, PropertyValue, ValueType};
    use crate::widget::{Widget, WidgetKind};
    use crate::window::TopWindow;

    fn round_trip(win: &TopWindow) -> TopWindow {
        let config = DesignerConfig::default();
        let src = export_window(win, &config);
        let mut ctx = UiContext::new(config);
        let back = import_window(&src, &mut ctx).unwrap_or_else(|e| panic!("{}\n--- source ---\n{}", e, src));
        assert!(ctx.import_errors().is_empty(), "{:?}", ctx.import_errors());
        back
    }

    fn widget(ctx: &mut UiContext, ty: &str, props: &[(&str, &str)]) -> Widget {
        let mut w = Widget::create(ty, ctx).unwrap();
        for (k, v) in props {
            w.set(k, v).unwrap_or_else(|e| panic!("{}.{}: {}", ty, k, e));
        }
        w
    }

    #[test]
    fn default_window_exports_markers_only() {
        let mut ctx = UiContext::default();
        let win = TopWindow::new(&mut ctx);
        let src = export_window(&win, &DesignerConfig::default());
        assert_eq!(src, "/// @begin TopWindow\n/// @end TopWindow\n");
    }

    #[test]
    fn button_and_checkbox_end_to_end() {
        let mut ctx = UiContext::default();
        let mut ok = widget(&mut ctx, "Button", &[("label", "OK"), ("on_change", "OnOk")]);
        ok.user_code_mut().set_before("if (ready) {").unwrap();
        ok.user_code_mut().set_after("}").unwrap();
        let done = widget(&mut ctx, "CheckBox", &[("label", "Done"), ("field", "done"), ("same_line", "true")]);
        let win = TopWindow::new(&mut ctx).with_child(ok).with_child(done);

        let src = export_window(&win, &DesignerConfig::default());
        let expected = "\
/// @begin TopWindow
    /// @begin Button
    /// @user-before
if (ready) {
    /// @user-end
    Button.label = \"OK\";
    Button.on_change = OnOk;
    /// @user-after
}
    /// @user-end
    /// @end Button
    /// @begin CheckBox
    CheckBox.label = \"Done\";
    CheckBox.field = done;
    CheckBox.same_line = true;
    /// @end CheckBox
/// @end TopWindow
";
        assert_eq!(src, expected);
        assert_eq!(round_trip(&win), win);
    }

    #[test]
    fn every_kind_survives_a_round_trip() {
        let mut ctx = UiContext::default();
        let mut win = TopWindow::new(&mut ctx);
        for name in WidgetKind::NAMES {
            let w = Widget::create(name, &mut ctx).unwrap();
            let w = match *name {
                "TabItem" => Widget::create("TabBar", &mut ctx).unwrap().with_child(w),
                _ => w,
            };
            win = win.with_child(w);
        }
        assert_eq!(round_trip(&win), win);
    }

    #[test]
    fn nested_containers_and_bindings() {
        let mut ctx = UiContext::default();
        let input = widget(&mut ctx, "Input", &[("field", "name"), ("hint", "{hint_text}"), ("size_x", "50%")]);
        let child = widget(&mut ctx, "Child", &[("column_count", "2"), ("item_count", "{items.size()} as i")])
            .with_child(input)
            .with_child(widget(&mut ctx, "Text", &[("text", "Item {i}"), ("next_column", "1")]));
        let table = widget(&mut ctx, "Table", &[("row_count", "{rows}")]).with_child(child);
        let mut win = TopWindow::new(&mut ctx).with_child(table);
        win.title.set_text("Editor").unwrap();
        win.size_x.set_text("{width}").unwrap();
        assert_eq!(round_trip(&win), win);
    }

    #[test]
    fn comments_are_inert() {
        let src = "\
// generated file
/// @begin TopWindow
/* block */
TopWindow.title = \"x\";
/// @end TopWindow
// trailing
";
        let mut ctx = UiContext::default();
        let win = import_window(src, &mut ctx).unwrap();
        assert_eq!(win.title.to_text(), "x");
    }

    #[test]
    fn unknown_widget_is_skipped_and_reported() {
        let src = "\
/// @begin TopWindow
    /// @begin Gizmo
    Gizmo.size = 3;
    /// @end Gizmo
    /// @begin Text
    Text.text = \"after\";
    /// @end Text
/// @end TopWindow
";
        let mut ctx = UiContext::default();
        let win = import_window(src, &mut ctx).unwrap();
        assert_eq!(win.children().len(), 1);
        assert_eq!(win.children()[0].describe(), "Text \"after\"");
        let errors = ctx.take_import_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ImportErrorKind::UnknownWidget("Gizmo".to_string()));
        assert_eq!((errors[0].line, errors[0].col), (2, 5));
    }

    #[test]
    fn bad_value_skips_only_its_subtree() {
        let src = "\
/// @begin TopWindow
/// @begin Child
/// @begin Button
Button.small = maybe;
/// @end Button
/// @begin Text
/// @end Text
/// @end Child
/// @end TopWindow
";
        let mut ctx = UiContext::default();
        let win = import_window(src, &mut ctx).unwrap();
        let child = &win.children()[0];
        assert_eq!(child.children().len(), 1);
        assert_eq!(child.children()[0].type_name(), "Text");
        assert_eq!(ctx.import_errors()[0].line, 4);
    }

    #[test]
    fn abort_policy_fails_the_import() {
        let src = "/// @begin TopWindow\n/// @begin Gizmo\n/// @end Gizmo\n/// @end TopWindow\n";
        let mut ctx = UiContext::new(DesignerConfig::default().import_policy(ImportPolicy::Abort));
        let err = import_window(src, &mut ctx).unwrap_err();
        assert_eq!(err.kind, ImportErrorKind::UnknownWidget("Gizmo".to_string()));
    }

    #[test]
    fn misplaced_children_are_rejected() {
        let src = "/// @begin TopWindow\n/// @begin TabItem\n/// @end TabItem\n/// @end TopWindow\n";
        let mut ctx = UiContext::default();
        let win = import_window(src, &mut ctx).unwrap();
        assert!(win.children().is_empty());
        assert_eq!(ctx.import_errors()[0].kind, ImportErrorKind::Malformed);
    }

    #[test]
    fn structural_errors() {
        let mut ctx = UiContext::default();
        for src in [
            "",
            "/// @begin Button\n/// @end Button\n",
            "/// @begin TopWindow\n",
            "/// @begin TopWindow\n/// @end TopWindow\nA.b = 1;\n",
            "/// @begin TopWindow\nTopWindow.nope = 1;\n/// @end TopWindow\n",
            "/// @begin TopWindow\n/// @end Child\n",
        ] {
            let err = import_window(src, &mut ctx).unwrap_err();
            assert_eq!(err.kind, ImportErrorKind::Malformed, "{:?}", src);
        }
    }

    // ── Random values ─────────────────────────────────────────────────────

    fn literal_text(ty: ValueType, r: u32) -> Option<String> {
        let pick = |options: &[&str]| options[r as usize % options.len()].to_string();
        Some(match ty {
            ValueType::Bool => (r % 2 == 0).to_string(),
            ValueType::Int => (r as i32 % 9 - 2).to_string(),
            ValueType::Float => ((r % 40) as f32 / 4.0).to_string(),
            ValueType::String => pick(&["", "OK", "Item {i}", "say \"hi\" 1", "tab\there"]),
            ValueType::Dimension => match r % 4 {
                0 => "auto".to_string(),
                1 => (r % 300 + 1).to_string(),
                2 => format!("-{}", r % 20 + 1),
                _ => format!("{}%", r % 100 + 1),
            },
            ValueType::Length => (r % 12).to_string(),
            ValueType::Length2 => format!("{}, {}", r % 9, r % 5),
            ValueType::Color => format!("#{:08x}", r.wrapping_mul(2_654_435_761)),
            ValueType::Font => pick(&["", "Roboto", "Mono"]),
            ValueType::Flags(table) => {
                let chosen: Vec<_> = table
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| (r >> (k % 32)) & 1 == 1)
                    .map(|(_, (name, _))| *name)
                    .collect();
                if chosen.is_empty() { "0".to_string() } else { chosen.join(" | ") }
            }
            ValueType::Enum(names) => pick(names),
            ValueType::Items => pick(&["", "one\ntwo", "1\n2\n30"]),
            ValueType::Columns => return None,
        })
    }

    /// Editor text for a holder of `kind`, drawn from `r`.
    fn holder_text(kind: HolderKind, r: u32) -> Option<String> {
        let pick = |options: &[&str]| Some(options[r as usize % options.len()].to_string());
        match kind {
            HolderKind::Direct(ty) => literal_text(ty, r),
            HolderKind::Bindable(ty) if ty != ValueType::String && r % 4 == 3 => Some(format!("{{expr_{}}}", r % 10)),
            HolderKind::Bindable(ty) => literal_text(ty, r / 4),
            HolderKind::Field(_) => pick(&["", "value", "model_total"]),
            HolderKind::Event { .. } => pick(&["", "OnClick", "OnChange2"]),
            HolderKind::Loop => pick(&["1", "3 as j", "{rows.size()} as k if visible(k)"]),
        }
    }

    /// Sets every property and event of `w` to a value drawn from `seeds`.
    /// Values a holder rejects leave it unchanged.
    fn randomize(w: &mut Widget, seeds: &[u32]) {
        let names: Vec<_> = w.properties().iter().chain(w.events().iter()).map(|p| (p.name, p.value.kind())).collect();
        for (i, (name, kind)) in names.into_iter().enumerate() {
            if let Some(text) = holder_text(kind, seeds[i % seeds.len()]) {
                let _ = w.set(name, &text);
            }
        }
    }

    proptest! {
        #[test]
        fn every_kind_round_trips_with_random_values(
            kind in 0..WidgetKind::NAMES.len(),
            seeds in prop::collection::vec(any::<u32>(), 1..64),
        ) {
            let mut ctx = UiContext::default();
            let name = WidgetKind::NAMES[kind];
            let mut w = Widget::create(name, &mut ctx).unwrap();
            randomize(&mut w, &seeds);
            let w = match name {
                "TabItem" => Widget::create("TabBar", &mut ctx).unwrap().with_child(w),
                _ => w,
            };
            let win = TopWindow::new(&mut ctx).with_child(w);
            prop_assert_eq!(round_trip(&win), win);
        }

        #[test]
        fn random_buttons_round_trip(
            label in "[a-zA-Z0-9 _.,!?#%-]{0,12}",
            width in -200i32..400,
            pct in 1u32..=100,
            same_line in any::<bool>(),
            indent in 0i32..4,
            code in "[a-z(); ]{0,16}",
        ) {
            let mut ctx = UiContext::default();
            let mut a = Widget::create("Button", &mut ctx).unwrap();
            a.set("label", &label).unwrap();
            a.set("size_x", &width.to_string()).unwrap();
            a.set("indent", &indent.to_string()).unwrap();
            a.user_code_mut().set_before(&code).unwrap();
            let mut b = Widget::create("Selectable", &mut ctx).unwrap();
            b.set("size_y", &format!("{}%", pct)).unwrap();
            b.set("same_line", if same_line { "true" } else { "false" }).unwrap();
            let win = TopWindow::new(&mut ctx).with_child(a).with_child(b);
            prop_assert_eq!(round_trip(&win), win);
        }
    }
}
