use imforge_source::{split_statements_with, Stmt, StmtIter, StmtKind, VerbatimRule};

use super::{ImportError, USER_AFTER, USER_BEFORE};
use crate::config::ImportPolicy;
use crate::context::UiContext;
use crate::node::UiNode;
use crate::widget::{Widget, WidgetKind};
use crate::window::TopWindow;

const USER_CODE: VerbatimRule<'static> = VerbatimRule { openers: &[USER_BEFORE, USER_AFTER], closer: "user-end" };

/// Reads a source unit holding exactly one `TopWindow`. Subtrees that fail
/// to import are handled per [`ImportPolicy`]; skipped ones are recorded in
/// `ctx`.
pub fn import_window(src: &str, ctx: &mut UiContext) -> Result<TopWindow, ImportError> {
    let stmts = split_statements_with(src, USER_CODE)?;
    let mut it = StmtIter::new(&stmts);

    skip_comments(&mut it);
    let Some(first) = it.next() else {
        return Err(ImportError::malformed("no `@begin TopWindow` marker", None));
    };
    match &first.kind {
        StmtKind::Marker { directive, arg } if directive == "begin" && arg == "TopWindow" => {}
        _ => return Err(ImportError::malformed("expected `/// @begin TopWindow`", Some(first))),
    }

    let mut win = TopWindow::new(ctx);
    import_body(&mut win, &mut it, ctx)?;

    skip_comments(&mut it);
    if let Some(extra) = it.next() {
        return Err(ImportError::malformed("statements after the window's `@end`", Some(extra)));
    }
    log::debug!(
        "import: window with {} widgets, {} subtrees skipped",
        win.all_children().len(),
        ctx.import_errors().len()
    );
    Ok(win)
}

fn skip_comments(it: &mut StmtIter<'_>) {
    while matches!(it.peek().map(|s| &s.kind), Some(StmtKind::Comment(_))) {
        it.next();
    }
}

/// Reads statements into `node` up to its `@end` marker.
fn import_body(node: &mut dyn UiNode, it: &mut StmtIter<'_>, ctx: &mut UiContext) -> Result<(), ImportError> {
    let ty = node.type_name();
    loop {
        let Some(stmt) = it.next() else {
            return Err(ImportError::malformed(format!("`@begin {}` is never closed", ty), it.previous()));
        };
        match &stmt.kind {
            StmtKind::Comment(_) => {}
            StmtKind::Verbatim { directive, text } => {
                let code = text.strip_suffix('\n').unwrap_or(text);
                let uc = node.user_code_mut();
                let set = if directive == USER_BEFORE { uc.set_before(code) } else { uc.set_after(code) };
                set.map_err(|e| ImportError::value(e, directive, stmt))?;
            }
            StmtKind::Marker { directive, arg } if directive == "begin" => {
                let start = it.offset() - 1;
                match import_child(&*node, arg, stmt, it, ctx) {
                    Ok(child) => node.children_mut().push(child),
                    Err(e) if ctx.config.import_policy == ImportPolicy::SkipSubtree => {
                        log::warn!("import: skipping `{}` subtree: {}", arg, e);
                        ctx.report(e);
                        it.reset(start);
                        if !it.skip_block("begin", "end") {
                            return Err(ImportError::malformed(format!("`@begin {}` is never closed", arg), Some(stmt)));
                        }
                    }
                    Err(e) => return Err(e),
                }
            }
            StmtKind::Marker { directive, arg } if directive == "end" => {
                if arg != ty {
                    return Err(ImportError::malformed(format!("`@end {}` closes `@begin {}`", arg, ty), Some(stmt)));
                }
                return Ok(());
            }
            StmtKind::Marker { directive, .. } => {
                return Err(ImportError::malformed(format!("unexpected marker `@{}`", directive), Some(stmt)));
            }
            StmtKind::Code(_) => assign(node, stmt)?,
        }
    }
}

fn import_child(
    parent: &dyn UiNode,
    type_name: &str,
    stmt: &Stmt,
    it: &mut StmtIter<'_>,
    ctx: &mut UiContext,
) -> Result<Widget, ImportError> {
    let kind = WidgetKind::create(type_name).ok_or_else(|| ImportError::unknown_widget(type_name, stmt))?;
    if !parent.accepts_child(&kind) {
        return Err(ImportError::malformed(
            format!("{} does not accept {}", parent.type_name(), type_name),
            Some(stmt),
        ));
    }
    let mut w = Widget::new(kind, ctx);
    import_body(&mut w, it, ctx)?;
    Ok(w)
}

/// Applies `Type.name = value;` to the property or event `name`.
fn assign(node: &mut dyn UiNode, stmt: &Stmt) -> Result<(), ImportError> {
    let ty = node.type_name();
    let Some((path, rhs)) = stmt.assignment() else {
        return Err(ImportError::malformed("expected `Type.property = value;`", Some(stmt)));
    };
    let [owner, name] = path.as_slice() else {
        return Err(ImportError::malformed(format!("unsupported assignment target `{}`", path.join(".")), Some(stmt)));
    };
    if *owner != ty {
        return Err(ImportError::malformed(format!("assignment to `{}` inside `{}`", owner, ty), Some(stmt)));
    }

    let mut props = node.properties_mut();
    if let Some(p) = props.iter_mut().find(|p| p.name == *name) {
        return p.value.set_source(&rhs).map_err(|e| ImportError::value(e, name, stmt));
    }
    drop(props);
    let mut events = node.events_mut();
    if let Some(p) = events.iter_mut().find(|p| p.name == *name) {
        return p.value.set_source(&rhs).map_err(|e| ImportError::value(e, name, stmt));
    }
    Err(ImportError::malformed(format!("{} has no property `{}`", ty, name), Some(stmt)))
}
