//! A small SQL front end: a lexer and parser for `CREATE TABLE`, `INSERT`
//! and `SELECT`, plus an in-memory backend that executes the parsed AST.

pub mod backend;
pub mod db;
pub mod sql;

pub use backend::{Backend, BackendError, Cell, ColumnType, MemoryBackend, Results};
pub use db::Db;
pub use sql::{parse, Ast};
