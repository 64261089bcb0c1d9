use super::token::Token;

/// Statements in source order. Built whole by the parser or not at all.
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Ast {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    CreateTable(CreateTableStatement),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expression {
    /// A single identifier, numeric or string token.
    Literal(Token),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SelectItem {
    Asterisk,
    Expression {
        expression: Expression,
        alias: Option<Token>,
    },
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FromItem {
    pub table: Token,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SelectStatement {
    pub items: Vec<SelectItem>,
    pub from: Option<FromItem>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct InsertStatement {
    pub table: Token,
    pub values: Vec<Expression>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ColumnDefinition {
    pub name: Token,
    /// Keyword token naming the type, e.g. `int`.
    pub datatype: Token,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CreateTableStatement {
    pub name: Token,
    pub columns: Vec<ColumnDefinition>,
}
