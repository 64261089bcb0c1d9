//! Lexer and recursive-descent parser for the `CREATE TABLE` / `INSERT` /
//! `SELECT` dialect.

pub mod ast;
pub mod error;
pub mod keywords;
pub mod parser;
pub mod scanner;
pub mod token;

pub use ast::Ast;
pub use error::{Error, LexError, ParseError};
pub use parser::{parse, Parser};
pub use scanner::{tokenize, Scanner};
pub use token::{Cursor, Keyword, Location, Symbol, Token, TokenKind};
