//! Storage consumers of the parsed AST.

pub mod memory;

use thiserror::Error;

use crate::sql::ast::{CreateTableStatement, InsertStatement, SelectStatement};

pub use memory::{MemoryBackend, MemoryCell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Int,
}

/// A stored value as handed back by [`Backend::select`].
pub trait Cell {
    fn as_text(&self) -> String;
    /// `None` when the cell does not hold a 32-bit integer.
    fn as_int(&self) -> Option<i32>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultColumn {
    pub column_type: ColumnType,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Results<C> {
    pub columns: Vec<ResultColumn>,
    pub rows: Vec<Vec<C>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("table `{0}` already exists")]
    TableAlreadyExists(String),

    #[error("invalid datatype `{0}`")]
    InvalidDatatype(String),

    #[error("table `{0}` does not exist")]
    TableDoesNotExist(String),

    #[error("missing values: expected {expected}, got {found}")]
    MissingValues { expected: usize, found: usize },

    #[error("column `{0}` does not exist")]
    ColumnDoesNotExist(String),

    #[error("select item is not valid")]
    InvalidSelectItem,

    #[error("invalid literal: {0}")]
    InvalidLiteral(String),
}

pub trait Backend {
    type Cell: Cell;

    fn create_table(&mut self, statement: &CreateTableStatement) -> Result<(), BackendError>;

    fn insert(&mut self, statement: &InsertStatement) -> Result<(), BackendError>;

    fn select(&self, statement: &SelectStatement) -> Result<Results<Self::Cell>, BackendError>;
}
