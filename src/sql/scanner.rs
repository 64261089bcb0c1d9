use super::{
    error::LexError,
    keywords::{KEYWORD_OPTIONS, SYMBOL_OPTIONS},
    token::{Cursor, Location, Token, TokenKind},
};

/// Outcome of a successful scan: the token, if the lexeme produces one, and
/// the cursor just past the lexeme.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Scanned {
    pub token: Option<Token>,
    pub cursor: Cursor,
}

impl Scanned {
    fn token(token: Token, cursor: Cursor) -> Option<Self> {
        Some(Scanned {
            token: Some(token),
            cursor,
        })
    }

    fn skip(cursor: Cursor) -> Option<Self> {
        Some(Scanned {
            token: None,
            cursor,
        })
    }
}

/// Tokenizer over a borrowed source string.
///
/// Holds no progress of its own; every scanner takes the cursor to start from
/// and returns `None` without side effects when it does not match.
pub struct Scanner<'a> {
    source: &'a str,
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Scanner::new(source).scan_tokens()
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner { source }
    }

    pub fn scan_tokens(&self) -> Result<Vec<Token>, LexError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut cursor = Cursor::default();

        // Priority order: the first scanner that matches at a position wins
        let scanners: [fn(&Self, Cursor) -> Option<Scanned>; 5] = [
            Self::keyword,
            Self::symbol,
            Self::string,
            Self::numeric,
            Self::identifier,
        ];

        'lex: while cursor.pointer < self.source.len() {
            for scan in scanners {
                if let Some(scanned) = scan(self, cursor) {
                    cursor = scanned.cursor;
                    // Whitespace matches but produces nothing
                    if let Some(token) = scanned.token {
                        tokens.push(token);
                    }
                    continue 'lex;
                }
            }

            let hint = tokens.last().map(|token| token.value.clone());
            tracing::trace!(location = %cursor.location, ?hint, "no scanner matched");
            return Err(LexError {
                location: cursor.location,
                hint,
            });
        }

        tracing::debug!(count = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    pub fn keyword(&self, initial: Cursor) -> Option<Scanned> {
        let matched = longest_match(self.source, initial, &KEYWORD_OPTIONS)?;
        let end = initial.pointer + matched.len();

        // A keyword must not run into an identifier: `asterisk` is not `as`.
        if let Some(&next) = self.source.as_bytes().get(end) {
            if is_identifier_byte(next) {
                return None;
            }
        }

        let cursor = Cursor {
            pointer: end,
            location: Location::new(
                initial.location.line,
                initial.location.column + matched.len(),
            ),
        };
        Scanned::token(
            Token::new(TokenKind::Keyword, matched, initial.location),
            cursor,
        )
    }

    pub fn symbol(&self, initial: Cursor) -> Option<Scanned> {
        let c = *self.source.as_bytes().get(initial.pointer)?;
        let mut cursor = initial;
        cursor.pointer += 1;
        cursor.location.column += 1;

        match c {
            b'\n' => {
                cursor.location.line += 1;
                cursor.location.column = 0;
                return Scanned::skip(cursor);
            }
            b' ' | b'\t' | b'\r' => return Scanned::skip(cursor),
            _ => {}
        }

        let matched = longest_match(self.source, initial, &SYMBOL_OPTIONS)?;
        cursor.pointer = initial.pointer + matched.len();
        cursor.location.column = initial.location.column + matched.len();
        Scanned::token(
            Token::new(TokenKind::Symbol, matched, initial.location),
            cursor,
        )
    }

    pub fn string(&self, initial: Cursor) -> Option<Scanned> {
        self.delimited(initial, b'\'', TokenKind::String)
    }

    pub fn numeric(&self, initial: Cursor) -> Option<Scanned> {
        let bytes = self.source.as_bytes();
        let mut cursor = initial;
        let mut period_found = false;
        let mut exp_marker_found = false;
        let mut digit_found = false;

        while cursor.pointer < bytes.len() {
            let c = bytes[cursor.pointer];
            // Counted before the terminator check, so the column of the
            // character that ends the run is included.
            cursor.location.column += 1;

            let is_digit = c.is_ascii_digit();
            let is_period = c == b'.';
            let is_exp_marker = c == b'e';

            if cursor.pointer == initial.pointer {
                if !is_digit && !is_period {
                    return None;
                }
                period_found = is_period;
                digit_found = is_digit;
                cursor.pointer += 1;
                continue;
            }

            if is_period {
                if period_found {
                    return None;
                }
                period_found = true;
                cursor.pointer += 1;
                continue;
            }

            if is_exp_marker {
                if exp_marker_found {
                    return None;
                }
                // No periods after the exponent marker
                period_found = true;
                exp_marker_found = true;

                if cursor.pointer == bytes.len() - 1 {
                    return None;
                }
                if matches!(bytes[cursor.pointer + 1], b'-' | b'+') {
                    cursor.pointer += 1;
                    cursor.location.column += 1;
                }
                cursor.pointer += 1;
                continue;
            }

            if !is_digit {
                break;
            }
            digit_found = true;
            cursor.pointer += 1;
        }

        // A lone `.` is not a number
        if cursor.pointer == initial.pointer || !digit_found {
            return None;
        }

        let value = &self.source[initial.pointer..cursor.pointer];
        Scanned::token(
            Token::new(TokenKind::Numeric, value, initial.location),
            cursor,
        )
    }

    pub fn identifier(&self, initial: Cursor) -> Option<Scanned> {
        if let Some(scanned) = self.delimited(initial, b'"', TokenKind::Identifier) {
            return Some(scanned);
        }

        let bytes = self.source.as_bytes();
        let first = *bytes.get(initial.pointer)?;
        if !first.is_ascii_alphabetic() {
            return None;
        }

        let mut cursor = initial;
        while cursor.pointer < bytes.len() && is_identifier_byte(bytes[cursor.pointer]) {
            cursor.pointer += 1;
            cursor.location.column += 1;
        }

        // Unquoted identifiers are case-insensitive
        let value = self.source[initial.pointer..cursor.pointer].to_ascii_lowercase();
        Scanned::token(
            Token::new(TokenKind::Identifier, value, initial.location),
            cursor,
        )
    }

    /// Scans a literal wrapped in `delimiter`. SQL escapes the delimiter by
    /// doubling it, never with a backslash.
    fn delimited(&self, initial: Cursor, delimiter: u8, kind: TokenKind) -> Option<Scanned> {
        let bytes = self.source.as_bytes();
        if bytes.get(initial.pointer) != Some(&delimiter) {
            return None;
        }

        let mut cursor = initial;
        cursor.pointer += 1;
        cursor.location.column += 1;

        let mut value = String::new();
        let mut segment_start = cursor.pointer;
        while cursor.pointer < bytes.len() {
            let c = bytes[cursor.pointer];

            if c == delimiter {
                value.push_str(&self.source[segment_start..cursor.pointer]);
                cursor.pointer += 1;
                cursor.location.column += 1;

                if bytes.get(cursor.pointer) != Some(&delimiter) {
                    return Scanned::token(Token::new(kind, value, initial.location), cursor);
                }

                // Doubled delimiter: keep one, drop the other
                segment_start = cursor.pointer;
                cursor.pointer += 1;
                cursor.location.column += 1;
                continue;
            }

            if c == b'\n' {
                cursor.location.line += 1;
                cursor.location.column = 0;
            } else if !is_continuation_byte(c) {
                cursor.location.column += 1;
            }
            cursor.pointer += 1;
        }

        // Unterminated
        None
    }
}

fn is_identifier_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'$' || c == b'_'
}

fn is_continuation_byte(c: u8) -> bool {
    c & 0xC0 == 0x80
}

/// Finds the longest option equal to the (lowercased) text at `initial`.
///
/// The prefix grows one byte at a time. Options that stop sharing it are
/// dropped, and an option that equals it exactly is recorded but scanning
/// goes on, so `into` wins over `int`.
fn longest_match(source: &str, initial: Cursor, options: &[&'static str]) -> Option<&'static str> {
    let bytes = source.as_bytes();
    let mut value: Vec<u8> = Vec::new();
    let mut skipped = vec![false; options.len()];
    let mut matched: Option<&'static str> = None;
    let mut pointer = initial.pointer;

    while pointer < bytes.len() {
        value.push(bytes[pointer].to_ascii_lowercase());
        pointer += 1;

        for (i, option) in options.iter().enumerate() {
            if skipped[i] {
                continue;
            }

            if option.as_bytes() == value.as_slice() {
                skipped[i] = true;
                if matched.map_or(true, |m| option.len() > m.len()) {
                    matched = Some(*option);
                }
                continue;
            }

            if !option.as_bytes().starts_with(&value) {
                skipped[i] = true;
            }
        }

        if skipped.iter().all(|skip| *skip) {
            break;
        }
    }

    matched
}
