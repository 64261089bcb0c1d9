use std::fmt;

/// Zero-based line and column of a character in the source text.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Scanning progress: a byte offset into the source plus the matching location.
///
/// Cursors are plain values. Scanners take one and hand back a new one, so a
/// failed scan simply leaves the caller holding the cursor it started with.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Cursor {
    pub pointer: usize,
    pub location: Location,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Keyword,
    Symbol,
    Identifier,
    String,
    Numeric,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Keyword {
    Select,
    From,
    As,
    Table,
    Create,
    Where,
    Insert,
    Into,
    Values,
    Int,
    Text,
}

impl Keyword {
    pub const ALL: [Keyword; 11] = [
        Keyword::Select,
        Keyword::From,
        Keyword::As,
        Keyword::Table,
        Keyword::Create,
        Keyword::Where,
        Keyword::Insert,
        Keyword::Into,
        Keyword::Values,
        Keyword::Int,
        Keyword::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Select => "select",
            Keyword::From => "from",
            Keyword::As => "as",
            Keyword::Table => "table",
            Keyword::Create => "create",
            Keyword::Where => "where",
            Keyword::Insert => "insert",
            Keyword::Into => "into",
            Keyword::Values => "values",
            Keyword::Int => "int",
            Keyword::Text => "text",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Symbol {
    Comma,
    LeftParen,
    RightParen,
    Semicolon,
    Asterisk,
}

impl Symbol {
    pub const ALL: [Symbol; 5] = [
        Symbol::Comma,
        Symbol::LeftParen,
        Symbol::RightParen,
        Symbol::Semicolon,
        Symbol::Asterisk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Comma => ",",
            Symbol::LeftParen => "(",
            Symbol::RightParen => ")",
            Symbol::Semicolon => ";",
            Symbol::Asterisk => "*",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, location: Location) -> Self {
        Token {
            kind,
            value: value.into(),
            location,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword && self.value == keyword.as_str()
    }

    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        self.kind == TokenKind::Symbol && self.value == symbol.as_str()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
