use crate::error::SourceError;

// ── Token ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Ident(String),
    /// String literal with escapes already decoded.
    Str(String),
    /// Character literal with escapes already decoded.
    Char(char),
    /// Numeric literal exactly as written (`12`, `0.5f`, `0x1F`), sign excluded.
    Number(String),
    // Punctuation and operators
    Punct(&'static str),
    /// `//` comment; the text after the two slashes, trailing space trimmed.
    Comment(String),
}

impl Token {
    #[inline]
    pub fn is_punct(&self, p: &str) -> bool {
        matches!(self, Token::Punct(q) if *q == p)
    }

    #[inline]
    pub fn ident(&self) -> Option<&str> {
        match self {
            Token::Ident(s) => Some(s),
            _ => None,
        }
    }
}

/// A token plus its byte span and 1-based position in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

// Longest first: the lexer takes the first entry that matches.
const PUNCT: &[&str] = &[
    "::", "->", "==", "!=", "<=", ">=", "&&", "||", "<<", ">>", "++", "--",
    ".", ",", "(", ")", "[", "]", "{", "}", "|", "&", "=", ";", "+", "-",
    "*", "/", "%", "<", ">", "!", "?", ":", "^", "~",
];

// ── Lexer ─────────────────────────────────────────────────────────────────

pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 1, col: 1 }
    }

    /// Byte offset of the next unread character.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Moves the read position forward to `offset`, keeping line/column
    /// bookkeeping correct. Offsets behind the current position are ignored.
    pub fn seek(&mut self, offset: usize) {
        while self.pos < offset.min(self.src.len()) {
            self.advance();
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Spanned>, SourceError> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token()? {
            tokens.push(tok);
        }
        Ok(tokens)
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.rest().chars().next()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn err(&self, msg: impl Into<String>) -> SourceError {
        SourceError::new(msg, self.line, self.col)
    }

    fn skip_whitespace_and_block_comments(&mut self) -> Result<(), SourceError> {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.advance();
            }
            if self.rest().starts_with("/*") {
                let (line, col) = (self.line, self.col);
                self.advance();
                self.advance();
                loop {
                    if self.rest().starts_with("*/") {
                        self.advance();
                        self.advance();
                        break;
                    }
                    if self.advance().is_none() {
                        return Err(SourceError::new("unterminated block comment", line, col));
                    }
                }
            } else {
                return Ok(());
            }
        }
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Spanned>, SourceError> {
        self.skip_whitespace_and_block_comments()?;

        let Some(ch) = self.peek() else {
            return Ok(None);
        };
        let (start, line, col) = (self.pos, self.line, self.col);

        let token = if self.rest().starts_with("//") {
            self.lex_line_comment()
        } else if ch == '"' {
            self.lex_string()?
        } else if ch == '\'' {
            self.lex_char()?
        } else if ch.is_ascii_digit() || (ch == '.' && matches!(self.peek_second(), Some(d) if d.is_ascii_digit())) {
            self.lex_number()
        } else if ch.is_alphabetic() || ch == '_' {
            self.lex_ident()
        } else if let Some(p) = PUNCT.iter().find(|p| self.rest().starts_with(**p)) {
            for _ in 0..p.len() {
                self.advance();
            }
            Token::Punct(p)
        } else {
            return Err(self.err(format!("unexpected character {:?}", ch)));
        };

        Ok(Some(Spanned { token, start, end: self.pos, line, col }))
    }

    fn lex_line_comment(&mut self) -> Token {
        self.advance();
        self.advance(); // consume `//`
        let start = self.pos;
        while !matches!(self.peek(), None | Some('\n')) {
            self.advance();
        }
        Token::Comment(self.src[start..self.pos].trim_end().to_string())
    }

    fn lex_escape(&mut self) -> Result<char, SourceError> {
        match self.advance() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some('"') => Ok('"'),
            Some('\'') => Ok('\''),
            Some('\\') => Ok('\\'),
            // octal: up to three digits
            Some(d @ '0'..='7') => {
                let mut code = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|c| c.to_digit(8)) {
                        Some(v) => {
                            self.advance();
                            code = code * 8 + v;
                        }
                        None => break,
                    }
                }
                u8::try_from(code).map(char::from).map_err(|_| self.err("octal escape out of range"))
            }
            // hex: every following hex digit belongs to the escape
            Some('x') => {
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                    self.advance();
                }
                if start == self.pos {
                    return Err(self.err("\\x escape needs a hex digit"));
                }
                u8::from_str_radix(&self.src[start..self.pos], 16)
                    .map(char::from)
                    .map_err(|_| self.err("\\x escape out of range"))
            }
            Some(c) => Err(self.err(format!("unknown escape sequence \\{}", c))),
            None => Err(self.err("unterminated escape sequence")),
        }
    }

    fn lex_string(&mut self) -> Result<Token, SourceError> {
        let (line, col) = (self.line, self.col);
        self.advance(); // consume opening `"`
        let mut s = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(SourceError::new("unterminated string literal", line, col));
                }
                Some('"') => break,
                Some('\\') => s.push(self.lex_escape()?),
                Some(c) => s.push(c),
            }
        }
        Ok(Token::Str(s))
    }

    fn lex_char(&mut self) -> Result<Token, SourceError> {
        let (line, col) = (self.line, self.col);
        self.advance(); // consume opening `'`
        let ch = match self.advance() {
            Some('\\') => self.lex_escape()?,
            Some(c) if c != '\'' && c != '\n' => c,
            _ => return Err(SourceError::new("empty or unterminated character literal", line, col)),
        };
        if self.advance() != Some('\'') {
            return Err(SourceError::new("unterminated character literal", line, col));
        }
        Ok(Token::Char(ch))
    }

    fn lex_number(&mut self) -> Token {
        let start = self.pos;
        if self.rest().starts_with("0x") || self.rest().starts_with("0X") {
            self.advance();
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) {
                self.advance();
            }
        } else {
            while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
                self.advance();
            }
            if matches!(self.peek(), Some('e' | 'E'))
                && matches!(self.peek_second(), Some(c) if c.is_ascii_digit() || c == '-' || c == '+')
            {
                self.advance();
                self.advance();
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }
        // type suffixes: 1.5f, 10u, 3ll
        while matches!(self.peek(), Some('f' | 'F' | 'u' | 'U' | 'l' | 'L')) {
            self.advance();
        }
        Token::Number(self.src[start..self.pos].to_string())
    }

    fn lex_ident(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        Token::Ident(self.src[start..self.pos].to_string())
    }
}

// ── Quoting ───────────────────────────────────────────────────────────────

/// Renders `s` as a string literal the lexer reads back as exactly `s`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            // a following octal digit would extend a short escape
            '\0' if !matches!(chars.peek(), Some('0'..='7')) => out.push_str("\\0"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
