use crate::stmt::{Stmt, StmtKind};

/// A rewindable cursor over split statements.
///
/// Importers record [`offset`](Self::offset) before consuming a
/// construct and [`reset`](Self::reset) to it on failure, so a rejected
/// construct never leaves the cursor mid-way.
#[derive(Debug, Clone)]
pub struct StmtIter<'a> {
    stmts: &'a [Stmt],
    pos: usize,
}

impl<'a> StmtIter<'a> {
    pub fn new(stmts: &'a [Stmt]) -> Self {
        Self { stmts, pos: 0 }
    }

    /// Index of the next statement.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Rewinds (or fast-forwards) to an offset returned by [`offset`](Self::offset).
    #[inline]
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos.min(self.stmts.len());
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.pos >= self.stmts.len()
    }

    pub fn peek(&self) -> Option<&'a Stmt> {
        self.stmts.get(self.pos)
    }

    /// The statement just before the cursor, used to anchor diagnostics at
    /// end of input.
    pub fn previous(&self) -> Option<&'a Stmt> {
        self.pos.checked_sub(1).and_then(|i| self.stmts.get(i))
    }

    /// Skips a block that starts at the cursor with an `open` marker,
    /// through its matching `close` marker. Returns `false` (cursor at end)
    /// when the block never closes.
    pub fn skip_block(&mut self, open: &str, close: &str) -> bool {
        let mut depth = 0usize;
        while let Some(stmt) = self.next() {
            if let StmtKind::Marker { directive, .. } = &stmt.kind {
                if directive == open {
                    depth += 1;
                } else if directive == close {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return true;
                    }
                }
            }
        }
        false
    }
}

impl<'a> Iterator for StmtIter<'a> {
    type Item = &'a Stmt;

    fn next(&mut self) -> Option<&'a Stmt> {
        let stmt = self.stmts.get(self.pos)?;
        self.pos += 1;
        Some(stmt)
    }
}

#[cfg(test)]
mod tests {
    use crate::stmt::split_statements;

    use super::*;

    #[test]
    fn reset_rewinds() {
        let stmts = split_statements("a.b = 1; c.d = 2;").unwrap();
        let mut it = StmtIter::new(&stmts);
        let mark = it.offset();
        it.next();
        it.next();
        assert!(it.is_end());
        it.reset(mark);
        assert_eq!(it.peek(), stmts.first());
    }

    #[test]
    fn offset_through_mut_ref() {
        let stmts = split_statements("a.b = 1; c.d = 2;").unwrap();
        let mut cursor = StmtIter::new(&stmts);
        let it = &mut cursor;
        it.next();
        assert_eq!(it.offset() - 1, 0);
        assert_eq!(it.previous().map(|s| s.text.as_str()), Some("a.b = 1;"));
    }

    #[test]
    fn skip_block_honours_nesting() {
        let src = "/// @begin A\n/// @begin B\n/// @end B\nA.x = 1;\n/// @end A\nZ.y = 2;";
        let stmts = split_statements(src).unwrap();
        let mut it = StmtIter::new(&stmts);
        assert!(it.skip_block("begin", "end"));
        assert_eq!(it.peek().map(|s| s.text.as_str()), Some("Z.y = 2;"));
    }

    #[test]
    fn skip_unclosed_block_reaches_end() {
        let stmts = split_statements("/// @begin A\nA.x = 1;").unwrap();
        let mut it = StmtIter::new(&stmts);
        assert!(!it.skip_block("begin", "end"));
        assert!(it.is_end());
    }
}
