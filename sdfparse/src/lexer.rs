//! SDF tokenizer.
//!
//! Operates in a pull mode: each call to [`Lexer::next_token`] skips
//! whitespace and comments and returns one [`Token`] tagged with the
//! line and column of its first character.

use crate::error::{Location, SDFError, SDFErrorKind, SDFResult};
use compact_str::CompactString;
use std::fmt;
use std::str::Chars;

/// The keywords of the supported SDF subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    DelayFile, SdfVersion, Design, Vendor, Program, Version,
    Divider, Timescale, Cell, CellType, Instance,
    Delay, Absolute, IOPath, TimingCheck,
    Setup, Hold, Recovery, Removal,
    Posedge, Negedge
}

const KEYWORDS: [(&str, Keyword); 21] = [
    ("DELAYFILE", Keyword::DelayFile),
    ("SDFVERSION", Keyword::SdfVersion),
    ("DESIGN", Keyword::Design),
    ("VENDOR", Keyword::Vendor),
    ("PROGRAM", Keyword::Program),
    ("VERSION", Keyword::Version),
    ("DIVIDER", Keyword::Divider),
    ("TIMESCALE", Keyword::Timescale),
    ("CELL", Keyword::Cell),
    ("CELLTYPE", Keyword::CellType),
    ("INSTANCE", Keyword::Instance),
    ("DELAY", Keyword::Delay),
    ("ABSOLUTE", Keyword::Absolute),
    ("IOPATH", Keyword::IOPath),
    ("TIMINGCHECK", Keyword::TimingCheck),
    ("SETUP", Keyword::Setup),
    ("HOLD", Keyword::Hold),
    ("RECOVERY", Keyword::Recovery),
    ("REMOVAL", Keyword::Removal),
    ("posedge", Keyword::Posedge),
    ("negedge", Keyword::Negedge)
];

impl Keyword {
    /// Look up a keyword, ignoring ASCII case.
    pub fn lookup(s: &str) -> Option<Keyword> {
        KEYWORDS.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(s))
            .map(|&(_, kw)| kw)
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        KEYWORDS.iter()
            .find(|&&(_, kw)| kw == self)
            .map(|&(k, _)| k)
            .unwrap_or("?")
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    LParen,
    RParen,
    Colon,
    Keyword(Keyword),
    /// A double-quoted string, quotes stripped.
    QString,
    Number(f64),
    /// Any other bare word, escapes kept in the text.
    Ident,
    Eof
}

/// Line and column of a token, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: usize,
    pub column: usize
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: CompactString,
    pub pos: Pos
}

impl Token {
    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::Colon => "':'".into(),
            TokenKind::Keyword(kw) => format!("keyword {kw}"),
            TokenKind::QString => format!("string \"{}\"", self.text),
            TokenKind::Number(_) => format!("number {}", self.text),
            TokenKind::Ident => format!("identifier {}", self.text),
            TokenKind::Eof => "end of input".into()
        }
    }
}

/// Hand-written SDF lexer with one character of lookahead.
pub struct Lexer<'src> {
    chars: Chars<'src>,
    next_char: Option<char>,
    filename: CompactString,
    line: usize,
    column: usize
}

impl<'src> Lexer<'src> {
    /// Create a lexer over `src`. `filename` only shows up in errors.
    pub fn new(src: &'src str, filename: &str) -> Self {
        let mut chars = src.chars();
        let next_char = chars.next();
        Lexer {
            chars, next_char,
            filename: filename.into(),
            line: 1,
            column: 1
        }
    }

    #[inline]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[inline]
    pub fn location(&self, pos: Pos) -> Location {
        Location::new(self.filename.clone(), pos.line, pos.column)
    }

    #[inline]
    fn pos(&self) -> Pos {
        Pos { line: self.line, column: self.column }
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.next_char
    }

    /// Take the next character, tracking line and column.
    fn bump(&mut self) -> Option<char> {
        let c = std::mem::replace(&mut self.next_char, self.chars.next())?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, pos: Pos, msg: impl Into<String>) -> SDFError {
        SDFError::new(SDFErrorKind::Lexical, msg, self.location(pos))
    }

    /// Skip whitespace, `// line` and `/* block */` comments.
    ///
    /// A `/` has to be consumed before it is known whether a comment
    /// follows. When it does not, the position of that `/` is returned
    /// and the caller continues the word it starts.
    fn skip_trivia(&mut self) -> SDFResult<Option<Pos>> {
        loop {
            match self.peek_char() {
                Some(c) if c.is_ascii_whitespace() => { self.bump(); }
                Some('/') => {
                    let start = self.pos();
                    self.bump();
                    match self.peek_char() {
                        Some('/') => {
                            while !matches!(self.peek_char(), None | Some('\n')) {
                                self.bump();
                            }
                        }
                        Some('*') => {
                            self.bump();
                            self.skip_block_comment(start)?;
                        }
                        _ => return Ok(Some(start))
                    }
                }
                _ => return Ok(None)
            }
        }
    }

    /// Rest of a block comment after its `/*`.
    fn skip_block_comment(&mut self, start: Pos) -> SDFResult<()> {
        loop {
            match self.bump() {
                None => return Err(self.error(start, "unterminated block comment")),
                Some('*') if self.peek_char() == Some('/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
            }
        }
    }

    /// Read the next token. After the end of input, keeps returning `Eof`.
    pub fn next_token(&mut self) -> SDFResult<Token> {
        if let Some(pos) = self.skip_trivia()? {
            return self.lex_word(pos, "/".into());
        }
        let pos = self.pos();
        let token = |kind, text: &str| Token { kind, text: text.into(), pos };
        let Some(c) = self.peek_char() else {
            return Ok(token(TokenKind::Eof, ""));
        };
        match c {
            '(' => { self.bump(); Ok(token(TokenKind::LParen, "(")) }
            ')' => { self.bump(); Ok(token(TokenKind::RParen, ")")) }
            ':' => { self.bump(); Ok(token(TokenKind::Colon, ":")) }
            '"' => self.lex_string(pos),
            c if starts_word(c) => self.lex_word(pos, CompactString::default()),
            c => Err(self.error(pos, format!("unexpected character {c:?}")))
        }
    }

    fn lex_string(&mut self, pos: Pos) -> SDFResult<Token> {
        self.bump();
        let mut text = CompactString::default();
        loop {
            match self.bump() {
                Some('"') => break,
                Some(c) => text.push(c),
                None => return Err(self.error(pos, "unterminated string"))
            }
        }
        Ok(Token { kind: TokenKind::QString, text, pos })
    }

    /// A run of word characters, continuing `text`; keywords and
    /// numbers are classified here.
    fn lex_word(&mut self, pos: Pos, mut text: CompactString) -> SDFResult<Token> {
        let mut escaped = false;
        while let Some(c) = self.peek_char() {
            if c == '\\' {
                let at = self.pos();
                self.bump();
                let Some(lit) = self.bump() else {
                    return Err(self.error(at, "backslash at end of input"));
                };
                text.push('\\');
                text.push(lit);
                escaped = true;
            } else if starts_word(c) {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let kind = if escaped {
            TokenKind::Ident
        } else if let Some(kw) = Keyword::lookup(&text) {
            TokenKind::Keyword(kw)
        } else if is_real_literal(&text) {
            match text.parse::<f64>() {
                Ok(v) if v.is_finite() => TokenKind::Number(v),
                Ok(_) => return Err(self.error(pos, format!("number {text} out of range"))),
                Err(e) => return Err(SDFError::new(
                    SDFErrorKind::Internal,
                    format!("accepted number {text} does not convert: {e}"),
                    self.location(pos)))
            }
        } else {
            TokenKind::Ident
        };
        Ok(Token { kind, text, pos })
    }
}

/// Whether `c` can be part of a bare word (identifier, number or keyword).
#[inline]
fn starts_word(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '(' | ')' | ':' | '"')
}

/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
pub fn is_real_literal(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    let digits = |i: &mut usize| {
        let start = *i;
        while *i < b.len() && b[*i].is_ascii_digit() {
            *i += 1;
        }
        *i - start
    };
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let mut mantissa = digits(&mut i);
    if i < b.len() && b[i] == b'.' {
        i += 1;
        mantissa += digits(&mut i);
    }
    if mantissa == 0 {
        return false;
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        i += 1;
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        }
        if digits(&mut i) == 0 {
            return false;
        }
    }
    i == b.len()
}
