use std::collections::HashMap;

use imforge_source::marker;

use super::{USER_AFTER, USER_BEFORE};
use crate::config::DesignerConfig;
use crate::node::{UiNode, USER_CODE_END};
use crate::property::Prop;
use crate::widget::Widget;
use crate::window::TopWindow;

/// Writes `win` and its subtree as a source unit. Only values that differ
/// from a freshly created node are written, so the output is stable across
/// unrelated edits.
pub fn export_window(win: &TopWindow, config: &DesignerConfig) -> String {
    let mut out = String::new();
    let proto = TopWindow::prototype();
    write_node(&mut out, win, &proto, 0, config.indent);
    log::debug!("export: window with {} widgets, {} bytes", win.all_children().len(), out.len());
    out
}

fn write_node(out: &mut String, node: &dyn UiNode, proto: &dyn UiNode, depth: usize, indent: usize) {
    let pad = " ".repeat(depth * indent);
    let ty = node.type_name();
    line(out, &pad, &marker("begin", ty));
    user_block(out, &pad, USER_BEFORE, node.user_code().before());
    assignments(out, &pad, ty, &node.properties(), &proto.properties());
    assignments(out, &pad, ty, &node.events(), &proto.events());
    for c in node.children() {
        let child_proto = Widget::prototype(c.kind.fresh());
        write_node(out, c, &child_proto, depth + 1, indent);
    }
    user_block(out, &pad, USER_AFTER, node.user_code().after());
    line(out, &pad, &marker("end", ty));
}

fn line(out: &mut String, pad: &str, text: &str) {
    out.push_str(pad);
    out.push_str(text);
    out.push('\n');
}

/// One statement per value that differs from the prototype's. A property
/// the prototype does not list (it depends on other values) is always
/// written.
fn assignments(out: &mut String, pad: &str, ty: &str, props: &[Prop<'_>], proto: &[Prop<'_>]) {
    let defaults: HashMap<&str, String> = proto.iter().map(|p| (p.name, p.value.to_source())).collect();
    for p in props {
        let src = p.value.to_source();
        if defaults.get(p.name) == Some(&src) {
            continue;
        }
        line(out, pad, &format!("{}.{} = {};", ty, p.name, src));
    }
}

/// User code is written as is, without indentation, so it reads back
/// byte for byte.
fn user_block(out: &mut String, pad: &str, directive: &str, code: &str) {
    if code.is_empty() {
        return;
    }
    line(out, pad, &marker(directive, ""));
    out.push_str(code);
    out.push('\n');
    line(out, pad, USER_CODE_END);
}
