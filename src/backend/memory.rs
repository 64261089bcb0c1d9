use std::collections::HashMap;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{Backend, BackendError, Cell, ColumnType, ResultColumn, Results};
use crate::sql::{
    ast::{CreateTableStatement, Expression, InsertStatement, SelectItem, SelectStatement},
    keywords,
    token::{Keyword, Token, TokenKind},
};

/// Raw cell bytes: big-endian `i32` for int columns, UTF-8 for text columns.
///
/// Cloning shares the underlying buffer, so projecting rows out of a table
/// does not copy cell contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCell(Bytes);

impl MemoryCell {
    pub fn from_int(value: i32) -> Self {
        let mut buf = BytesMut::with_capacity(4);
        buf.put_i32(value);
        MemoryCell(buf.freeze())
    }

    pub fn from_text(value: &str) -> Self {
        MemoryCell(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl Cell for MemoryCell {
    fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }

    fn as_int(&self) -> Option<i32> {
        if self.0.len() != 4 {
            return None;
        }
        Some(self.0.clone().get_i32())
    }
}

#[derive(Debug)]
struct Column {
    name: String,
    column_type: ColumnType,
}

#[derive(Debug)]
struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<MemoryCell>>,
}

impl Table {
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }
}

/// Where a result column takes its values from.
enum Source {
    Column(usize),
    Constant(MemoryCell),
}

/// Tables kept in a map keyed by (already case-folded) table name.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: HashMap<String, Table>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    type Cell = MemoryCell;

    fn create_table(&mut self, statement: &CreateTableStatement) -> Result<(), BackendError> {
        let name = &statement.name.value;
        if self.tables.contains_key(name) {
            return Err(BackendError::TableAlreadyExists(name.clone()));
        }

        let columns = statement
            .columns
            .iter()
            .map(|definition| {
                Ok(Column {
                    name: definition.name.value.clone(),
                    column_type: column_type(&definition.datatype)?,
                })
            })
            .collect::<Result<Vec<_>, BackendError>>()?;

        tracing::debug!(table = %name, columns = columns.len(), "created table");
        self.tables.insert(
            name.clone(),
            Table {
                columns,
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    fn insert(&mut self, statement: &InsertStatement) -> Result<(), BackendError> {
        let name = &statement.table.value;
        let table = self
            .tables
            .get_mut(name)
            .ok_or_else(|| BackendError::TableDoesNotExist(name.clone()))?;

        if statement.values.len() != table.columns.len() {
            return Err(BackendError::MissingValues {
                expected: table.columns.len(),
                found: statement.values.len(),
            });
        }

        let row = table
            .columns
            .iter()
            .zip(&statement.values)
            .map(|(column, Expression::Literal(token))| {
                match (column.column_type, token.kind) {
                    (ColumnType::Int, TokenKind::Numeric) => {
                        parse_int(token).map(MemoryCell::from_int)
                    }
                    (ColumnType::Text, TokenKind::String) => {
                        Ok(MemoryCell::from_text(&token.value))
                    }
                    _ => Err(BackendError::InvalidLiteral(format!(
                        "`{}` is not a value for column `{}`",
                        token.value, column.name
                    ))),
                }
            })
            .collect::<Result<Vec<_>, BackendError>>()?;

        table.rows.push(row);
        tracing::debug!(table = %name, rows = table.rows.len(), "inserted row");
        Ok(())
    }

    fn select(&self, statement: &SelectStatement) -> Result<Results<MemoryCell>, BackendError> {
        let table = match &statement.from {
            Some(from) => Some(
                self.tables
                    .get(&from.table.value)
                    .ok_or_else(|| BackendError::TableDoesNotExist(from.table.value.clone()))?,
            ),
            None => None,
        };

        let mut columns = Vec::new();
        let mut sources = Vec::new();
        for item in &statement.items {
            for (column, source) in projection(item, table)? {
                columns.push(column);
                sources.push(source);
            }
        }

        // An empty select list has no columns and therefore no rows
        if columns.is_empty() {
            return Ok(Results {
                columns,
                rows: Vec::new(),
            });
        }

        let rows = match table {
            Some(table) => table.rows.iter().map(|row| project(&sources, row)).collect(),
            // Without FROM every source is a constant: one row
            None => vec![project(&sources, &[])],
        };

        Ok(Results { columns, rows })
    }
}

fn column_type(datatype: &Token) -> Result<ColumnType, BackendError> {
    match keywords::get(&datatype.value) {
        Some(Keyword::Int) => Ok(ColumnType::Int),
        Some(Keyword::Text) => Ok(ColumnType::Text),
        _ => Err(BackendError::InvalidDatatype(datatype.value.clone())),
    }
}

fn parse_int(token: &Token) -> Result<i32, BackendError> {
    token
        .value
        .parse::<i32>()
        .map_err(|_| {
            BackendError::InvalidLiteral(format!("`{}` is not a 32-bit integer", token.value))
        })
}

/// Resolves one select item into result columns and their value sources.
fn projection(
    item: &SelectItem,
    table: Option<&Table>,
) -> Result<Vec<(ResultColumn, Source)>, BackendError> {
    let (expression, alias) = match item {
        SelectItem::Asterisk => {
            let table = table.ok_or(BackendError::InvalidSelectItem)?;
            return Ok(table
                .columns
                .iter()
                .enumerate()
                .map(|(index, column)| {
                    (
                        ResultColumn {
                            column_type: column.column_type,
                            name: column.name.clone(),
                        },
                        Source::Column(index),
                    )
                })
                .collect());
        }
        SelectItem::Expression { expression, alias } => (expression, alias),
    };

    let Expression::Literal(token) = expression;
    let (column_type, source) = match token.kind {
        TokenKind::Identifier => {
            let (table, index) = table
                .and_then(|table| table.column_index(&token.value).map(|index| (table, index)))
                .ok_or_else(|| BackendError::ColumnDoesNotExist(token.value.clone()))?;
            (table.columns[index].column_type, Source::Column(index))
        }
        TokenKind::Numeric => {
            let cell = MemoryCell::from_int(parse_int(token)?);
            (ColumnType::Int, Source::Constant(cell))
        }
        TokenKind::String => {
            let cell = MemoryCell::from_text(&token.value);
            (ColumnType::Text, Source::Constant(cell))
        }
        TokenKind::Keyword | TokenKind::Symbol => return Err(BackendError::InvalidSelectItem),
    };

    let name = alias.as_ref().unwrap_or(token).value.clone();
    Ok(vec![(ResultColumn { column_type, name }, source)])
}

fn project(sources: &[Source], row: &[MemoryCell]) -> Vec<MemoryCell> {
    sources
        .iter()
        .map(|source| match source {
            Source::Column(index) => row[*index].clone(),
            Source::Constant(cell) => cell.clone(),
        })
        .collect()
}
