use thiserror::Error;

use super::token::Location;

/// No scanner recognized the input at `location`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to lex token{}, at {location}", hint_suffix(.hint))]
pub struct LexError {
    pub location: Location,
    /// Value of the last token produced before the failure, if any.
    pub hint: Option<String>,
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(value) => format!(" after {value}"),
        None => String::new(),
    }
}

/// The token stream did not match any statement form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{location}]: {message}, got: {}", .found.as_deref().unwrap_or("end of input"))]
pub struct ParseError {
    pub location: Location,
    pub message: String,
    pub found: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    pub fn location(&self) -> Location {
        match self {
            Error::Lex(err) => err.location,
            Error::Parse(err) => err.location,
        }
    }
}
