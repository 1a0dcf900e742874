//! Exact-token field renaming inside host expressions.

/// `true` for a plain host identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Replaces every identifier token equal to `old` with `new`. Member names
/// (after `.`, `->` or `::`) and the contents of string and character
/// literals are left alone. Returns `None` when nothing matched.
pub fn rename_identifier(expr: &str, old: &str, new: &str) -> Option<String> {
    let bytes = expr.as_bytes();
    let mut out = String::with_capacity(expr.len());
    let mut changed = false;
    let mut i = 0;
    // last non-whitespace text emitted, for the member-access check
    let mut prev_tail = "";

    while i < expr.len() {
        let c = expr[i..].chars().next().unwrap_or_default();
        if c == '"' || c == '\'' {
            let end = literal_end(bytes, i);
            out.push_str(&expr[i..end]);
            prev_tail = &expr[i..end];
            i = end;
        } else if c.is_alphabetic() || c == '_' || c.is_ascii_digit() {
            let start = i;
            while let Some(ch) = expr[i..].chars().next() {
                if ch.is_alphanumeric() || ch == '_' {
                    i += ch.len_utf8();
                } else {
                    break;
                }
            }
            let word = &expr[start..i];
            let member = prev_tail.ends_with('.') || prev_tail.ends_with("->") || prev_tail.ends_with("::");
            if word == old && !member && !c.is_ascii_digit() {
                out.push_str(new);
                changed = true;
            } else {
                out.push_str(word);
            }
            prev_tail = word;
        } else {
            out.push(c);
            if !c.is_whitespace() {
                // keep two characters so `->` and `::` are seen whole
                let from = expr[..i].char_indices().next_back().map_or(i, |(k, _)| k);
                prev_tail = &expr[from..i + c.len_utf8()];
            }
            i += c.len_utf8();
        }
    }
    changed.then_some(out)
}

/// Offset just past the string or char literal starting at `start`.
fn literal_end(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Applies [`rename_identifier`] to every `{expr}` segment of an
/// interpolated label. `{{` and `}}` are literal braces.
pub fn rename_interpolated(text: &str, old: &str, new: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut changed = false;
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        if let Some(tail) = after.strip_prefix('{') {
            out.push_str("{{");
            rest = tail;
            continue;
        }
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let inner = &after[..close];
        out.push('{');
        match rename_identifier(inner, old, new) {
            Some(renamed) => {
                out.push_str(&renamed);
                changed = true;
            }
            None => out.push_str(inner),
        }
        out.push('}');
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    changed.then_some(out)
}
