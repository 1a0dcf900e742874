use crate::lexer::{Spanned, Token};

/// A token range inside one statement, typically an assignment's
/// right-hand side or one argument of a call.
#[derive(Debug, Clone, Copy)]
pub struct Rhs<'a> {
    src: &'a str,
    tokens: &'a [Spanned],
}

impl<'a> Rhs<'a> {
    /// `src` is the statement text the token spans index into.
    pub fn new(src: &'a str, tokens: &'a [Spanned]) -> Self {
        Self { src, tokens }
    }

    #[inline]
    pub fn tokens(&self) -> &'a [Spanned] {
        self.tokens
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Raw source text covered by the tokens, as written.
    pub fn text(&self) -> &'a str {
        match (self.tokens.first(), self.tokens.last()) {
            (Some(a), Some(b)) => &self.src[a.start..b.end],
            _ => "",
        }
    }

    /// Token texts concatenated without whitespace (`std :: string` →
    /// `std::string`).
    pub fn compact(&self) -> String {
        self.tokens.iter().map(|t| &self.src[t.start..t.end]).collect()
    }

    /// The only token, if there is exactly one.
    pub fn single(&self) -> Option<&'a Token> {
        match self.tokens {
            [t] => Some(&t.token),
            _ => None,
        }
    }

    /// Position of the first token, for diagnostics.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.tokens.first().map(|t| (t.line, t.col))
    }

    pub fn string(&self) -> Option<&'a str> {
        match self.single()? {
            Token::Str(s) => Some(s),
            _ => None,
        }
    }

    /// A numeric literal with an optional leading `-`, returned as written
    /// minus any type suffix (`-1.5f` → `-1.5`).
    pub fn number(&self) -> Option<String> {
        let (neg, tok) = match self.tokens {
            [t] => (false, &t.token),
            [m, t] if m.token.is_punct("-") => (true, &t.token),
            _ => return None,
        };
        let Token::Number(raw) = tok else {
            return None;
        };
        let is_hex = raw.starts_with("0x") || raw.starts_with("0X");
        let digits = if is_hex {
            raw.trim_end_matches(['u', 'U', 'l', 'L'])
        } else {
            raw.trim_end_matches(['f', 'F', 'u', 'U', 'l', 'L'])
        };
        Some(if neg { format!("-{}", digits) } else { digits.to_string() })
    }

    /// `a::b::c` (one or more identifiers joined by `::`).
    pub fn path(&self) -> Option<String> {
        if self.tokens.len() % 2 == 0 {
            return None;
        }
        let mut out = String::new();
        for (i, t) in self.tokens.iter().enumerate() {
            match (&t.token, i % 2) {
                (Token::Ident(s), 0) => out.push_str(s),
                (Token::Punct("::"), 1) => out.push_str("::"),
                _ => return None,
            }
        }
        Some(out)
    }

    /// `callee(arg, arg, ...)` spanning the whole range. The callee may be a
    /// `::` path. Arguments are split at top-level commas.
    pub fn call(&self) -> Option<(String, Vec<Rhs<'a>>)> {
        let open = self.tokens.iter().position(|t| t.token.is_punct("("))?;
        let callee = Rhs::new(self.src, &self.tokens[..open]).path()?;
        let last = self.tokens.last()?;
        if !last.token.is_punct(")") || matching_close(self.tokens, open)? != self.tokens.len() - 1 {
            return None;
        }
        let inner = Rhs::new(self.src, &self.tokens[open + 1..self.tokens.len() - 1]);
        let args = if inner.is_empty() { Vec::new() } else { inner.split_top_level(",") };
        Some((callee, args))
    }

    /// Splits at every occurrence of punctuation `sep` that is not nested in
    /// brackets. Empty pieces are kept so callers can reject them.
    pub fn split_top_level(&self, sep: &str) -> Vec<Rhs<'a>> {
        let mut parts = Vec::new();
        let mut depth = 0i32;
        let mut start = 0;
        for (i, t) in self.tokens.iter().enumerate() {
            match &t.token {
                Token::Punct("(" | "[" | "{") => depth += 1,
                Token::Punct(")" | "]" | "}") => depth -= 1,
                tok if depth == 0 && tok.is_punct(sep) => {
                    parts.push(Rhs::new(self.src, &self.tokens[start..i]));
                    start = i + 1;
                }
                _ => {}
            }
        }
        parts.push(Rhs::new(self.src, &self.tokens[start..]));
        parts
    }

    /// `true` when brackets balance and no `;` appears, i.e. the range can
    /// stand as one expression.
    pub fn is_balanced_expr(&self) -> bool {
        let mut depth = 0i32;
        for t in self.tokens {
            match &t.token {
                Token::Punct("(" | "[" | "{") => depth += 1,
                Token::Punct(")" | "]" | "}") => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                Token::Punct(";") | Token::Comment(_) => return false,
                _ => {}
            }
        }
        depth == 0 && !self.tokens.is_empty()
    }
}

fn matching_close(tokens: &[Spanned], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, t) in tokens.iter().enumerate().skip(open) {
        match &t.token {
            Token::Punct("(" | "[" | "{") => depth += 1,
            Token::Punct(")" | "]" | "}") => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use crate::lexer::Lexer;

    use super::*;

    fn with_rhs<R>(src: &str, f: impl FnOnce(Rhs<'_>) -> R) -> R {
        let toks = Lexer::new(src).tokenize().unwrap();
        f(Rhs::new(src, &toks))
    }

    #[test]
    fn negative_number_strips_suffix() {
        assert_eq!(with_rhs("- 2.5f", |r| r.number()), Some("-2.5".to_string()));
        assert_eq!(with_rhs("0xFF", |r| r.number()), Some("0xFF".to_string()));
        assert_eq!(with_rhs("a", |r| r.number()), None);
    }

    #[test]
    fn path_joins_scope() {
        assert_eq!(with_rhs("ImRad :: Ok", |r| r.path()), Some("ImRad::Ok".to_string()));
        assert_eq!(with_rhs("a.b", |r| r.path()), None);
    }

    #[test]
    fn call_splits_nested_arguments() {
        with_rhs("ImRad::Loop(items.size(), i, f(a, b))", |r| {
            let (callee, args) = r.call().unwrap();
            assert_eq!(callee, "ImRad::Loop");
            let texts: Vec<_> = args.iter().map(|a| a.text()).collect();
            assert_eq!(texts, vec!["items.size()", "i", "f(a, b)"]);
        });
    }

    #[test]
    fn call_must_span_whole_range() {
        assert!(with_rhs("f(a) + g(b)", |r| r.call().is_none()));
        assert!(with_rhs("f()", |r| r.call().is_some_and(|(_, a)| a.is_empty())));
    }

    #[test]
    fn compact_drops_whitespace() {
        assert_eq!(with_rhs("std :: string", |r| r.compact()), "std::string");
    }

    #[test]
    fn balanced_expression() {
        assert!(with_rhs("a[i].b(c)", |r| r.is_balanced_expr()));
        assert!(!with_rhs("a(b", |r| r.is_balanced_expr()));
        assert!(!with_rhs("a) (b", |r| r.is_balanced_expr()));
    }
}
