use anyhow::Context;

use crate::{
    backend::{Backend, Cell, ColumnType, MemoryBackend, Results},
    sql::{self, ast::Statement},
};

const SEPARATOR_WIDTH: usize = 20;

/// Parses SQL text and runs each statement against a [`Backend`].
pub struct Db<B: Backend = MemoryBackend> {
    pub backend: B,
}

impl Db<MemoryBackend> {
    pub fn in_memory() -> Self {
        Db::new(MemoryBackend::new())
    }
}

impl<B: Backend> Db<B> {
    pub fn new(backend: B) -> Self {
        Db { backend }
    }

    /// Runs every statement in `source` in order, stopping at the first
    /// failure, and returns the rendered output of the ones that ran.
    pub fn execute(&mut self, source: &str) -> anyhow::Result<String> {
        let ast = sql::parse(source).context("parse sql")?;
        let mut output = String::new();

        for statement in &ast.statements {
            match statement {
                Statement::CreateTable(create) => {
                    self.backend
                        .create_table(create)
                        .with_context(|| format!("create table {}", create.name))?;
                    output.push_str("ok\n");
                }
                Statement::Insert(insert) => {
                    self.backend
                        .insert(insert)
                        .with_context(|| format!("insert into {}", insert.table))?;
                    output.push_str("ok\n");
                }
                Statement::Select(select) => {
                    let results = self.backend.select(select).context("select")?;
                    tracing::debug!(rows = results.rows.len(), "selected rows");
                    output.push_str(&render(&results));
                }
            }
        }

        anyhow::Ok(output)
    }
}

/// Renders results as a header line, a separator and one line per row.
pub fn render<C: Cell>(results: &Results<C>) -> String {
    let mut out = String::new();

    for column in &results.columns {
        out.push_str(&format!("| {} ", column.name));
    }
    out.push_str("|\n");
    out.push_str(&"=".repeat(SEPARATOR_WIDTH));
    out.push('\n');

    for row in &results.rows {
        out.push('|');
        for (column, cell) in results.columns.iter().zip(row) {
            let value = match column.column_type {
                ColumnType::Int => cell
                    .as_int()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| cell.as_text()),
                ColumnType::Text => cell.as_text(),
            };
            out.push_str(&format!(" {value} |"));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;

    #[test]
    fn executes_a_script() {
        let mut db = Db::in_memory();
        let output = db
            .execute(
                "CREATE TABLE users (id INT, name TEXT);
                 INSERT INTO users VALUES (1, 'alice');
                 INSERT INTO users VALUES (2, 'bob');
                 SELECT id, name FROM users;",
            )
            .unwrap();
        assert_eq!(
            output,
            "ok\nok\nok\n| id | name |\n====================\n| 1 | alice |\n| 2 | bob |\n"
        );
    }

    #[test]
    fn renders_empty_results() {
        let mut db = Db::in_memory();
        db.execute("CREATE TABLE t (a INT);").unwrap();
        assert_eq!(db.execute("SELECT a FROM t;").unwrap(), "| a |\n====================\n");
    }

    #[test]
    fn renders_an_empty_select_list() {
        let mut db = Db::in_memory();
        db.execute("CREATE TABLE t (a INT); INSERT INTO t VALUES (1);")
            .unwrap();
        assert_eq!(db.execute("SELECT FROM t;").unwrap(), "|\n====================\n");
    }

    #[test]
    fn parse_errors_run_nothing() {
        let mut db = Db::in_memory();
        let err = db
            .execute("CREATE TABLE t (a INT); SELECT a FROM t SELECT a FROM t;")
            .unwrap_err();
        assert!(err.downcast_ref::<sql::Error>().is_some());
        // The create was never dispatched
        assert!(db.execute("CREATE TABLE t (a INT);").is_ok());
    }

    #[test]
    fn backend_errors_keep_their_type() {
        let mut db = Db::in_memory();
        let err = db.execute("SELECT a FROM missing;").unwrap_err();
        assert_eq!(
            err.downcast_ref::<BackendError>(),
            Some(&BackendError::TableDoesNotExist("missing".into()))
        );
    }
}
