use super::{
    ast::{
        Ast, ColumnDefinition, CreateTableStatement, Expression, FromItem, InsertStatement,
        SelectItem, SelectStatement, Statement,
    },
    error::{Error, ParseError},
    scanner::tokenize,
    token::{Keyword, Symbol, Token, TokenKind},
};

/// Token kinds accepted as a literal expression, tried in this order.
const LITERAL_KINDS: [TokenKind; 3] = [
    TokenKind::Identifier,
    TokenKind::Numeric,
    TokenKind::String,
];

/// Where and why a grammar rule stopped matching.
#[derive(Debug, PartialEq, Eq)]
struct Mismatch {
    cursor: usize,
    message: &'static str,
}

impl Mismatch {
    fn new(cursor: usize, message: &'static str) -> Self {
        Mismatch { cursor, message }
    }

    /// Keeps whichever failure got further into the token stream, the
    /// earlier alternative on ties.
    fn further(self, other: Mismatch) -> Mismatch {
        if other.cursor > self.cursor {
            other
        } else {
            self
        }
    }
}

/// A rule's node plus the cursor just past it. On `Err` the caller still
/// holds the cursor it started from, which is what backtracking relies on.
type Parsed<T> = Result<(T, usize), Mismatch>;

/// Lexes and parses `source` into an [`Ast`].
pub fn parse(source: &str) -> Result<Ast, Error> {
    let tokens = tokenize(source)?;
    Ok(Parser::new(&tokens).parse()?)
}

pub struct Parser<'a> {
    tokens: &'a [Token],
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens }
    }

    pub fn parse(&self) -> Result<Ast, ParseError> {
        let mut statements = Vec::new();
        let mut cursor = 0;

        while cursor < self.tokens.len() {
            let (statement, next) = self.statement(cursor).map_err(|m| self.error(m))?;
            tracing::debug!(?statement, "parsed statement");
            statements.push(statement);
            cursor = next;

            let mut semicolons = 0;
            while self.check_symbol(cursor, Symbol::Semicolon) {
                cursor += 1;
                semicolons += 1;
            }

            if semicolons == 0 && cursor < self.tokens.len() {
                return Err(self.error(Mismatch::new(
                    cursor,
                    "missing semicolon between statements",
                )));
            }
        }

        Ok(Ast { statements })
    }

    fn statement(&self, initial: usize) -> Parsed<Statement> {
        let select = match self.select_statement(initial) {
            Ok((select, cursor)) => return Ok((Statement::Select(select), cursor)),
            Err(mismatch) => mismatch,
        };

        let insert = match self.insert_statement(initial) {
            Ok((insert, cursor)) => return Ok((Statement::Insert(insert), cursor)),
            Err(mismatch) => mismatch,
        };

        let create = match self.create_table_statement(initial) {
            Ok((create, cursor)) => return Ok((Statement::CreateTable(create), cursor)),
            Err(mismatch) => mismatch,
        };

        let furthest = select.further(insert).further(create);
        if furthest.cursor == initial {
            return Err(Mismatch::new(initial, "expected statement"));
        }
        Err(furthest)
    }

    fn select_statement(&self, initial: usize) -> Parsed<SelectStatement> {
        let cursor = self.expect_keyword(initial, Keyword::Select, "expected SELECT")?;
        let (items, mut cursor) = self.select_items(cursor)?;

        let mut from = None;
        if self.check_keyword(cursor, Keyword::From) {
            let (table, next) = self.expect_kind(
                cursor + 1,
                TokenKind::Identifier,
                "expected table name after FROM",
            )?;
            from = Some(FromItem { table });
            cursor = next;
        }

        Ok((SelectStatement { items, from }, cursor))
    }

    /// Items up to `FROM`, `;` or the end of input; the list may be empty.
    /// A token that is neither a delimiter nor a comma also ends the list,
    /// leaving the caller to report what is missing.
    fn select_items(&self, initial: usize) -> Parsed<Vec<SelectItem>> {
        let mut items = Vec::new();
        let mut cursor = initial;

        loop {
            let Some(current) = self.tokens.get(cursor) else {
                break;
            };
            if current.is_keyword(Keyword::From) || current.is_symbol(Symbol::Semicolon) {
                break;
            }

            if !items.is_empty() {
                if !current.is_symbol(Symbol::Comma) {
                    break;
                }
                cursor += 1;
            }

            let (item, next) = self.select_item(cursor)?;
            items.push(item);
            cursor = next;
        }

        Ok((items, cursor))
    }

    fn select_item(&self, initial: usize) -> Parsed<SelectItem> {
        if self.check_symbol(initial, Symbol::Asterisk) {
            return Ok((SelectItem::Asterisk, initial + 1));
        }

        let (expression, mut cursor) = self
            .expression(initial)
            .map_err(|m| Mismatch::new(m.cursor, "expected select item"))?;

        let mut alias = None;
        if self.check_keyword(cursor, Keyword::As) {
            let (identifier, next) = self.expect_kind(
                cursor + 1,
                TokenKind::Identifier,
                "expected identifier after AS",
            )?;
            alias = Some(identifier);
            cursor = next;
        }

        Ok((SelectItem::Expression { expression, alias }, cursor))
    }

    fn insert_statement(&self, initial: usize) -> Parsed<InsertStatement> {
        let cursor = self.expect_keyword(initial, Keyword::Insert, "expected INSERT")?;
        let cursor = self.expect_keyword(cursor, Keyword::Into, "expected INTO")?;
        let (table, cursor) =
            self.expect_kind(cursor, TokenKind::Identifier, "expected table name")?;
        let cursor = self.expect_keyword(cursor, Keyword::Values, "expected VALUES")?;
        let cursor = self.expect_symbol(cursor, Symbol::LeftParen, "expected left parenthesis")?;
        let (values, cursor) = self.comma_separated(cursor, |c| self.expression(c))?;
        let cursor = self.expect_symbol(cursor, Symbol::RightParen, "expected right parenthesis")?;

        Ok((InsertStatement { table, values }, cursor))
    }

    fn create_table_statement(&self, initial: usize) -> Parsed<CreateTableStatement> {
        let cursor = self.expect_keyword(initial, Keyword::Create, "expected CREATE")?;
        let cursor = self.expect_keyword(cursor, Keyword::Table, "expected TABLE")?;
        let (name, cursor) =
            self.expect_kind(cursor, TokenKind::Identifier, "expected table name")?;
        let cursor = self.expect_symbol(cursor, Symbol::LeftParen, "expected left parenthesis")?;
        let (columns, cursor) = self.comma_separated(cursor, |c| self.column_definition(c))?;
        let cursor = self.expect_symbol(cursor, Symbol::RightParen, "expected right parenthesis")?;

        Ok((CreateTableStatement { name, columns }, cursor))
    }

    fn column_definition(&self, initial: usize) -> Parsed<ColumnDefinition> {
        let (name, cursor) =
            self.expect_kind(initial, TokenKind::Identifier, "expected column name")?;
        let (datatype, cursor) =
            self.expect_kind(cursor, TokenKind::Keyword, "expected column type")?;
        Ok((ColumnDefinition { name, datatype }, cursor))
    }

    fn expression(&self, initial: usize) -> Parsed<Expression> {
        for kind in LITERAL_KINDS {
            if let Some(token) = self.token_of_kind(initial, kind) {
                return Ok((Expression::Literal(token.clone()), initial + 1));
            }
        }
        Err(Mismatch::new(initial, "expected expression"))
    }

    /// Parses the non-empty `element (, element)*`. A failed element fails
    /// the whole list; the list ends at the first element not followed by a
    /// comma.
    fn comma_separated<T>(
        &self,
        initial: usize,
        element: impl Fn(usize) -> Parsed<T>,
    ) -> Parsed<Vec<T>> {
        let (first, mut cursor) = element(initial)?;
        let mut elements = vec![first];

        while self.check_symbol(cursor, Symbol::Comma) {
            let (next_element, next) = element(cursor + 1)?;
            elements.push(next_element);
            cursor = next;
        }

        Ok((elements, cursor))
    }

    fn token_of_kind(&self, cursor: usize, kind: TokenKind) -> Option<&'a Token> {
        self.tokens.get(cursor).filter(|token| token.kind == kind)
    }

    fn check_keyword(&self, cursor: usize, keyword: Keyword) -> bool {
        self.tokens
            .get(cursor)
            .is_some_and(|token| token.is_keyword(keyword))
    }

    fn check_symbol(&self, cursor: usize, symbol: Symbol) -> bool {
        self.tokens
            .get(cursor)
            .is_some_and(|token| token.is_symbol(symbol))
    }

    fn expect_keyword(
        &self,
        cursor: usize,
        keyword: Keyword,
        message: &'static str,
    ) -> Result<usize, Mismatch> {
        if self.check_keyword(cursor, keyword) {
            return Ok(cursor + 1);
        }
        Err(Mismatch::new(cursor, message))
    }

    fn expect_symbol(
        &self,
        cursor: usize,
        symbol: Symbol,
        message: &'static str,
    ) -> Result<usize, Mismatch> {
        if self.check_symbol(cursor, symbol) {
            return Ok(cursor + 1);
        }
        Err(Mismatch::new(cursor, message))
    }

    fn expect_kind(&self, cursor: usize, kind: TokenKind, message: &'static str) -> Parsed<Token> {
        match self.token_of_kind(cursor, kind) {
            Some(token) => Ok((token.clone(), cursor + 1)),
            None => Err(Mismatch::new(cursor, message)),
        }
    }

    fn error(&self, mismatch: Mismatch) -> ParseError {
        let found = self.tokens.get(mismatch.cursor);
        // Past the end: point at the last token
        let location = found
            .or_else(|| self.tokens.last())
            .map(|token| token.location)
            .unwrap_or_default();

        ParseError {
            location,
            message: mismatch.message.to_string(),
            found: found.map(|token| token.value.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::token::Location;

    fn identifier(value: &str, column: usize) -> Token {
        Token::new(TokenKind::Identifier, value, Location::new(0, column))
    }

    fn numeric(value: &str, column: usize) -> Token {
        Token::new(TokenKind::Numeric, value, Location::new(0, column))
    }

    fn keyword(value: &str, column: usize) -> Token {
        Token::new(TokenKind::Keyword, value, Location::new(0, column))
    }

    fn single(source: &str) -> Statement {
        let ast = parse(source).unwrap();
        assert_eq!(ast.statements.len(), 1, "{source}");
        ast.statements.into_iter().next().unwrap()
    }

    fn parse_error(source: &str) -> ParseError {
        match parse(source) {
            Err(Error::Parse(err)) => err,
            other => panic!("expected a parse error for {source:?}, got {other:?}"),
        }
    }

    #[test]
    fn insert_statement() {
        let statement = single("INSERT INTO users VALUES (105, 233);");
        assert_eq!(
            statement,
            Statement::Insert(InsertStatement {
                table: identifier("users", 12),
                values: vec![
                    Expression::Literal(numeric("105", 26)),
                    Expression::Literal(numeric("233", 32)),
                ],
            })
        );
    }

    #[test]
    fn create_table_statement() {
        let statement = single("CREATE TABLE users (id INT, name TEXT);");
        assert_eq!(
            statement,
            Statement::CreateTable(CreateTableStatement {
                name: identifier("users", 13),
                columns: vec![
                    ColumnDefinition {
                        name: identifier("id", 20),
                        datatype: keyword("int", 23),
                    },
                    ColumnDefinition {
                        name: identifier("name", 28),
                        datatype: keyword("text", 33),
                    },
                ],
            })
        );
    }

    #[test]
    fn select_without_from() {
        let statement = single("SELECT *, exclusive;");
        assert_eq!(
            statement,
            Statement::Select(SelectStatement {
                items: vec![
                    SelectItem::Asterisk,
                    SelectItem::Expression {
                        expression: Expression::Literal(identifier("exclusive", 10)),
                        alias: None,
                    },
                ],
                from: None,
            })
        );
    }

    #[test]
    fn select_with_alias_and_from() {
        let statement = single("SELECT id, name AS fullname FROM users;");
        assert_eq!(
            statement,
            Statement::Select(SelectStatement {
                items: vec![
                    SelectItem::Expression {
                        expression: Expression::Literal(identifier("id", 7)),
                        alias: None,
                    },
                    SelectItem::Expression {
                        expression: Expression::Literal(identifier("name", 11)),
                        alias: Some(identifier("fullname", 19)),
                    },
                ],
                from: Some(FromItem {
                    table: identifier("users", 33),
                }),
            })
        );
    }

    #[test]
    fn select_string_literal() {
        let Statement::Select(select) = single("select 'a '' b'") else {
            panic!("expected a select statement");
        };
        assert_eq!(
            select.items,
            vec![SelectItem::Expression {
                expression: Expression::Literal(Token::new(
                    TokenKind::String,
                    "a ' b",
                    Location::new(0, 7)
                )),
                alias: None,
            }]
        );
    }

    #[test]
    fn several_statements() {
        let ast = parse(
            "CREATE TABLE t (a INT);\nINSERT INTO t VALUES (1);\nSELECT a FROM t;",
        )
        .unwrap();
        assert_eq!(ast.statements.len(), 3);
        assert!(matches!(ast.statements[0], Statement::CreateTable(_)));
        assert!(matches!(ast.statements[1], Statement::Insert(_)));
        let Statement::Select(select) = &ast.statements[2] else {
            panic!("expected a select statement");
        };
        assert_eq!(select.from.as_ref().unwrap().table.location, Location::new(2, 14));
    }

    #[test]
    fn trailing_semicolons_are_accepted() {
        assert_eq!(parse("SELECT 1;;;").unwrap().statements.len(), 1);
        assert_eq!(parse("SELECT 1;; SELECT 2;").unwrap().statements.len(), 2);
    }

    #[test]
    fn final_semicolon_is_optional() {
        assert_eq!(parse("SELECT a FROM t").unwrap().statements.len(), 1);
    }

    #[test]
    fn empty_source_has_no_statements() {
        assert_eq!(parse("").unwrap(), Ast::default());
        assert_eq!(parse("  \n ").unwrap(), Ast::default());
    }

    #[test]
    fn missing_semicolon_between_statements() {
        let cases = [
            ("SELECT 1 SELECT 2", 10),
            ("INSERT INTO t VALUES (1) SELECT a FROM t", 26),
            ("CREATE TABLE t (a INT) CREATE TABLE u (b TEXT)", 23),
        ];
        for (source, column) in cases {
            let err = parse_error(source);
            assert_eq!(err.message, "missing semicolon between statements", "{source}");
            assert_eq!(err.location, Location::new(0, column), "{source}");
        }
    }

    #[test]
    fn missing_semicolon_display() {
        let err = parse_error("SELECT 1 SELECT 2");
        assert_eq!(
            err.to_string(),
            "[0:10]: missing semicolon between statements, got: select"
        );
    }

    #[test]
    fn reports_furthest_failure() {
        let err = parse_error("INSERT users VALUES (1);");
        assert_eq!(err.message, "expected INTO");
        assert_eq!(err.location, Location::new(0, 7));

        let err = parse_error("CREATE TABLE t (a INT, b);");
        assert_eq!(err.message, "expected column type");
        assert_eq!(err.found.as_deref(), Some(")"));

        let err = parse_error("SELECT a AS 1;");
        assert_eq!(err.message, "expected identifier after AS");
    }

    #[test]
    fn reports_unknown_statement() {
        let err = parse_error("users;");
        assert_eq!(err.message, "expected statement");
        assert_eq!(err.location, Location::new(0, 0));
        assert_eq!(err.found.as_deref(), Some("users"));
    }

    #[test]
    fn empty_lists_are_rejected() {
        assert_eq!(parse_error("INSERT INTO t VALUES ();").message, "expected expression");
        assert_eq!(parse_error("CREATE TABLE t ();").message, "expected column name");
    }

    #[test]
    fn select_list_may_be_empty() {
        assert_eq!(
            single("SELECT;"),
            Statement::Select(SelectStatement {
                items: vec![],
                from: None,
            })
        );

        let Statement::Select(select) = single("SELECT FROM t;") else {
            panic!("expected a select statement");
        };
        assert!(select.items.is_empty());
        assert_eq!(select.from.unwrap().table, identifier("t", 12));

        assert!(matches!(single("select"), Statement::Select(s) if s.items.is_empty()));
    }

    #[test]
    fn select_item_after_comma_is_required() {
        assert_eq!(parse_error("SELECT a, ;").message, "expected select item");
        assert_eq!(parse_error("SELECT a, FROM t;").message, "expected select item");
    }

    #[test]
    fn running_out_of_tokens_points_at_last_token() {
        let err = parse_error("INSERT INTO t VALUES (1,");
        assert_eq!(err.message, "expected expression");
        assert_eq!(err.location, Location::new(0, 24));
        assert_eq!(err.found, None);
        assert!(err.to_string().ends_with("got: end of input"));
    }

    #[test]
    fn lex_errors_pass_through() {
        let err = parse("SELECT a = 1;").unwrap_err();
        assert!(matches!(err, Error::Lex(_)));
        assert_eq!(err.location(), Location::new(0, 9));
    }

    #[test]
    fn datatype_may_be_any_keyword() {
        let Statement::CreateTable(create) = single("CREATE TABLE t (a select)") else {
            panic!("expected a create table statement");
        };
        assert_eq!(create.columns[0].datatype.value, "select");
    }

    #[test]
    fn quoted_identifiers_keep_case() {
        let Statement::Select(select) = single("SELECT \"Name\" FROM \"People\";") else {
            panic!("expected a select statement");
        };
        assert_eq!(select.from.unwrap().table.value, "People");
    }
}
