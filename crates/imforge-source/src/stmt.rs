use crate::error::SourceError;
use crate::lexer::{Lexer, Spanned, Token};
use crate::rhs::Rhs;

// ── Stmt ──────────────────────────────────────────────────────────────────

/// One logical statement of a source unit.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `/// @directive argument`: a structural marker comment.
    Marker { directive: String, arg: String },
    /// Any other `//` comment. Structurally inert.
    Comment(String),
    /// Raw text captured between a verbatim opener marker and its closer.
    Verbatim { directive: String, text: String },
    /// Tokens up to and including the terminating `;`.
    Code(Vec<Spanned>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    /// 1-based line of the first token.
    pub line: usize,
    /// 1-based column of the first token.
    pub col: usize,
    /// Raw statement text. Token spans of `Code` statements index into it.
    pub text: String,
}

impl Stmt {
    pub fn is_marker(&self, directive: &str) -> bool {
        matches!(&self.kind, StmtKind::Marker { directive: d, .. } if d == directive)
    }

    /// `a.b.c = rhs;` → (`["a", "b", "c"]`, rhs). The trailing `;` is not
    /// part of the right-hand side.
    pub fn assignment(&self) -> Option<(Vec<&str>, Rhs<'_>)> {
        let StmtKind::Code(tokens) = &self.kind else {
            return None;
        };
        let body = strip_semicolon(tokens);
        let eq = body.iter().position(|t| t.token.is_punct("="))?;
        let lhs = &body[..eq];
        let rhs = &body[eq + 1..];
        if lhs.is_empty() || rhs.is_empty() || lhs.len() % 2 == 0 {
            return None;
        }
        let mut path = Vec::new();
        for (i, t) in lhs.iter().enumerate() {
            match (&t.token, i % 2) {
                (Token::Ident(s), 0) => path.push(s.as_str()),
                (Token::Punct("."), 1) => {}
                _ => return None,
            }
        }
        Some((path, Rhs::new(&self.text, rhs)))
    }

    /// The whole statement body (without `;`) as an expression.
    pub fn expr(&self) -> Option<Rhs<'_>> {
        match &self.kind {
            StmtKind::Code(tokens) => Some(Rhs::new(&self.text, strip_semicolon(tokens))),
            _ => None,
        }
    }
}

fn strip_semicolon(tokens: &[Spanned]) -> &[Spanned] {
    match tokens.split_last() {
        Some((last, body)) if last.token.is_punct(";") => body,
        _ => tokens,
    }
}

// ── Verbatim blocks ───────────────────────────────────────────────────────

/// Marker directives whose following lines are captured verbatim up to a
/// line holding the `closer` marker.
#[derive(Debug, Clone, Copy)]
pub struct VerbatimRule<'r> {
    pub openers: &'r [&'r str],
    pub closer: &'r str,
}

impl VerbatimRule<'_> {
    pub const NONE: VerbatimRule<'static> = VerbatimRule { openers: &[], closer: "" };
}

/// Renders a marker comment line (without newline).
pub fn marker(directive: &str, arg: &str) -> String {
    if arg.is_empty() {
        format!("/// @{}", directive)
    } else {
        format!("/// @{} {}", directive, arg)
    }
}

fn parse_marker(comment: &str) -> Option<(String, String)> {
    // comment text starts after `//`, so a `///` doc comment keeps one slash
    let body = comment.strip_prefix('/')?.trim_start().strip_prefix('@')?;
    let mut parts = body.splitn(2, char::is_whitespace);
    let directive = parts.next().filter(|d| !d.is_empty())?;
    let arg = parts.next().unwrap_or("").trim();
    Some((directive.to_string(), arg.to_string()))
}

// ── Splitter ──────────────────────────────────────────────────────────────

/// Splits a source unit into statements.
pub fn split_statements(src: &str) -> Result<Vec<Stmt>, SourceError> {
    split_statements_with(src, VerbatimRule::NONE)
}

/// Splits a source unit into statements, capturing verbatim blocks.
pub fn split_statements_with(src: &str, rule: VerbatimRule<'_>) -> Result<Vec<Stmt>, SourceError> {
    let mut lexer = Lexer::new(src);
    let mut out = Vec::new();
    let mut pending: Vec<Spanned> = Vec::new();

    while let Some(tok) = lexer.next_token()? {
        if let Token::Comment(text) = &tok.token {
            let Some((directive, arg)) = parse_marker(text) else {
                // plain comments inside a statement are dropped
                if pending.is_empty() {
                    out.push(Stmt {
                        kind: StmtKind::Comment(text.clone()),
                        line: tok.line,
                        col: tok.col,
                        text: src[tok.start..tok.end].to_string(),
                    });
                }
                continue;
            };
            if !pending.is_empty() {
                return Err(SourceError::new(
                    format!("marker @{} inside an unterminated statement", directive),
                    tok.line,
                    tok.col,
                ));
            }
            if rule.openers.contains(&directive.as_str()) {
                let body_start = line_end(src, tok.end);
                let (body_end, resume) = find_closer(src, body_start, rule.closer).ok_or_else(|| {
                    SourceError::new(
                        format!("@{} block is missing its @{} line", directive, rule.closer),
                        tok.line,
                        tok.col,
                    )
                })?;
                out.push(Stmt {
                    kind: StmtKind::Verbatim { directive, text: src[body_start..body_end].to_string() },
                    line: tok.line,
                    col: tok.col,
                    text: src[tok.start..resume].to_string(),
                });
                lexer.seek(resume);
                continue;
            }
            out.push(Stmt {
                kind: StmtKind::Marker { directive, arg },
                line: tok.line,
                col: tok.col,
                text: src[tok.start..tok.end].to_string(),
            });
            continue;
        }

        let end = tok.token.is_punct(";");
        pending.push(tok);
        if end {
            out.push(code_stmt(src, std::mem::take(&mut pending)));
        }
    }

    if let Some(first) = pending.first() {
        return Err(SourceError::new("statement is missing its terminating ';'", first.line, first.col));
    }
    Ok(out)
}

fn code_stmt(src: &str, mut tokens: Vec<Spanned>) -> Stmt {
    let start = tokens[0].start;
    let end = tokens[tokens.len() - 1].end;
    let (line, col) = (tokens[0].line, tokens[0].col);
    for t in &mut tokens {
        t.start -= start;
        t.end -= start;
    }
    Stmt { kind: StmtKind::Code(tokens), line, col, text: src[start..end].to_string() }
}

/// Offset just past the newline ending the line that contains `pos`.
fn line_end(src: &str, pos: usize) -> usize {
    src[pos..].find('\n').map_or(src.len(), |i| pos + i + 1)
}

/// Finds the first line at or after `from` whose trimmed text is the closer
/// marker. Returns (start of that line, offset just past it).
fn find_closer(src: &str, from: usize, closer: &str) -> Option<(usize, usize)> {
    let wanted = marker(closer, "");
    let mut line_start = from;
    while line_start < src.len() {
        let next = line_end(src, line_start);
        if src[line_start..next].trim() == wanted {
            return Some((line_start, next));
        }
        line_start = next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE: VerbatimRule<'static> = VerbatimRule { openers: &["user-before"], closer: "user-end" };

    #[test]
    fn markers_comments_and_code() {
        let stmts = split_statements("/// @begin Text\n// note\nText.text = \"hi\";\n/// @end Text\n").unwrap();
        assert_eq!(stmts.len(), 4);
        assert!(stmts[0].is_marker("begin"));
        assert!(matches!(&stmts[1].kind, StmtKind::Comment(c) if c == " note"));
        assert!(matches!(stmts[2].kind, StmtKind::Code(_)));
        assert!(stmts[3].is_marker("end"));
    }

    #[test]
    fn marker_argument() {
        let stmts = split_statements("/// @begin   TabItem  ").unwrap();
        assert_eq!(
            stmts[0].kind,
            StmtKind::Marker { directive: "begin".into(), arg: "TabItem".into() }
        );
    }

    #[test]
    fn assignment_splits_path_and_rhs() {
        let stmts = split_statements("Button.size_x = ImRad::Pct(50);").unwrap();
        let (path, rhs) = stmts[0].assignment().unwrap();
        assert_eq!(path, vec!["Button", "size_x"]);
        assert_eq!(rhs.text(), "ImRad::Pct(50)");
    }

    #[test]
    fn statement_may_span_lines() {
        let stmts = split_statements("a.b =\n  c +\n  d;").unwrap();
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].assignment().unwrap().1.text(), "c +\n  d");
    }

    #[test]
    fn verbatim_block_is_captured_raw() {
        let src = "/// @user-before\n  if (x) { y(); } // raw\n/// @user-end\nA.b = 1;\n";
        let stmts = split_statements_with(src, RULE).unwrap();
        assert_eq!(stmts.len(), 2);
        assert_eq!(
            stmts[0].kind,
            StmtKind::Verbatim { directive: "user-before".into(), text: "  if (x) { y(); } // raw\n".into() }
        );
        assert_eq!((stmts[1].line, stmts[1].col), (4, 1));
    }

    #[test]
    fn verbatim_may_hold_unlexable_text() {
        let src = "/// @user-before\n#include <x> @@ \"\n    /// @user-end\n";
        let stmts = split_statements_with(src, RULE).unwrap();
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn err_missing_semicolon() {
        let err = split_statements("a.b = 1;\nc.d = 2").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn err_marker_inside_statement() {
        assert!(split_statements("a.b =\n/// @end X\n1;").is_err());
    }

    #[test]
    fn err_unclosed_verbatim() {
        assert!(split_statements_with("/// @user-before\nabc\n", RULE).is_err());
    }
}
