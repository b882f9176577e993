//! Recursive-descent parser building a [`Statement`] from a token stream.

use crate::ast::{ColumnDef, Columns, Cond, Op, Order, OrderBy, Statement};
use crate::error::{Error, ParseErrorKind, Result};
use crate::lexer::Token;
use crate::value::{ColumnType, Value};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

pub fn parse(tokens: Vec<Token>) -> Result<Statement> {
    let mut parser = Parser::new(tokens);
    let stmt = parser.parse_statement()?;
    parser.expect_end()?;
    Ok(stmt)
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(unexpected(self.peek()))
        }
    }

    /// After the terminating `;` (if any) only `Eof` may remain.
    fn expect_end(&mut self) -> Result<()> {
        if let Token::Semicolon = self.peek() {
            self.advance();
        }
        match self.peek() {
            Token::Eof => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.advance() {
            Token::Ident(name) => Ok(name),
            other => Err(unexpected(&other)),
        }
    }

    fn expect_literal(&mut self) -> Result<Value> {
        match self.advance() {
            Token::Number(n) => Ok(Value::Integer(n)),
            Token::StringLiteral(s) => Ok(Value::Text(s)),
            other => Err(unexpected(&other)),
        }
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        match self.peek() {
            Token::Select => self.parse_select(),
            Token::Insert => self.parse_insert(),
            Token::Update => self.parse_update(),
            Token::Delete => self.parse_delete(),
            Token::Create => self.parse_create(),
            Token::Drop => self.parse_drop(),
            other => Err(unexpected(other)),
        }
    }

    fn parse_select(&mut self) -> Result<Statement> {
        self.expect(&Token::Select)?;
        let cols = if matches!(self.peek(), Token::Star) {
            self.advance();
            Columns::All
        } else {
            let mut names = vec![self.expect_ident()?];
            while matches!(self.peek(), Token::Comma) {
                self.advance();
                names.push(self.expect_ident()?);
            }
            Columns::Named(names)
        };
        self.expect(&Token::From)?;
        let table = self.expect_ident()?;

        let cond = if matches!(self.peek(), Token::Where) {
            self.advance();
            Some(self.parse_condition()?)
        } else {
            None
        };

        let order = if matches!(self.peek(), Token::Order) {
            self.advance();
            self.expect(&Token::By)?;
            let col = self.expect_ident()?;
            let order = match self.peek() {
                Token::Asc => {
                    self.advance();
                    Order::Asc
                }
                Token::Desc => {
                    self.advance();
                    Order::Desc
                }
                _ => Order::Asc,
            };
            Some(OrderBy { col, order })
        } else {
            None
        };

        let limit = if matches!(self.peek(), Token::Limit) {
            self.advance();
            match self.advance() {
                Token::Number(n) => Some(n),
                other => return Err(unexpected(&other)),
            }
        } else {
            None
        };

        Ok(Statement::Select { cols, table, cond, order, limit })
    }

    fn parse_insert(&mut self) -> Result<Statement> {
        self.expect(&Token::Insert)?;
        self.expect(&Token::Into)?;
        let table = self.expect_ident()?;
        self.expect(&Token::Values)?;
        self.expect(&Token::LeftParen)?;
        let mut values = vec![self.expect_literal()?];
        while matches!(self.peek(), Token::Comma) {
            self.advance();
            values.push(self.expect_literal()?);
        }
        self.expect(&Token::RightParen)?;
        Ok(Statement::Insert { table, values })
    }

    fn parse_update(&mut self) -> Result<Statement> {
        self.expect(&Token::Update)?;
        let table = self.expect_ident()?;
        self.expect(&Token::Set)?;
        let mut assignments = vec![self.parse_assignment()?];
        while matches!(self.peek(), Token::Comma) {
            self.advance();
            assignments.push(self.parse_assignment()?);
        }
        let cond = if matches!(self.peek(), Token::Where) {
            self.advance();
            Some(self.parse_condition()?)
        } else {
            None
        };
        Ok(Statement::Update { table, assignments, cond })
    }

    fn parse_assignment(&mut self) -> Result<(String, Value)> {
        let name = self.expect_ident()?;
        self.expect(&Token::Eq)?;
        let value = self.expect_literal()?;
        Ok((name, value))
    }

    fn parse_delete(&mut self) -> Result<Statement> {
        self.expect(&Token::Delete)?;
        self.expect(&Token::From)?;
        let table = self.expect_ident()?;
        let cond = if matches!(self.peek(), Token::Where) {
            self.advance();
            Some(self.parse_condition()?)
        } else {
            None
        };
        Ok(Statement::Delete { table, cond })
    }

    fn parse_create(&mut self) -> Result<Statement> {
        self.expect(&Token::Create)?;
        self.expect(&Token::Table)?;
        let name = self.expect_ident()?;
        self.expect(&Token::LeftParen)?;
        let mut columns = vec![self.parse_coldef()?];
        while matches!(self.peek(), Token::Comma) {
            self.advance();
            columns.push(self.parse_coldef()?);
        }
        self.expect(&Token::RightParen)?;
        Ok(Statement::CreateTable { name, columns })
    }

    fn parse_coldef(&mut self) -> Result<ColumnDef> {
        let name = self.expect_ident()?;
        let col_type = match self.advance() {
            Token::Int => ColumnType::Int,
            Token::Text => ColumnType::Text,
            other => return Err(unexpected(&other)),
        };
        Ok(ColumnDef { name, col_type })
    }

    fn parse_drop(&mut self) -> Result<Statement> {
        self.expect(&Token::Drop)?;
        self.expect(&Token::Table)?;
        let name = self.expect_ident()?;
        Ok(Statement::DropTable { name })
    }

    /// `condition := and_cond (OR and_cond)*` — `AND` binds tighter than `OR`.
    fn parse_condition(&mut self) -> Result<Cond> {
        let mut terms = vec![self.parse_and_cond()?];
        while matches!(self.peek(), Token::Or) {
            self.advance();
            terms.push(self.parse_and_cond()?);
        }
        Ok(if terms.len() == 1 { terms.remove(0) } else { Cond::Or(terms) })
    }

    fn parse_and_cond(&mut self) -> Result<Cond> {
        let mut terms = vec![self.parse_predicate()?];
        while matches!(self.peek(), Token::And) {
            self.advance();
            terms.push(self.parse_predicate()?);
        }
        Ok(if terms.len() == 1 { terms.remove(0) } else { Cond::And(terms) })
    }

    fn parse_predicate(&mut self) -> Result<Cond> {
        let col = self.expect_ident()?;
        let op = match self.advance() {
            Token::Eq => Op::Eq,
            Token::NotEq => Op::NotEq,
            Token::Lt => Op::Lt,
            Token::Gt => Op::Gt,
            Token::LtEq => Op::LtEq,
            Token::GtEq => Op::GtEq,
            other => return Err(unexpected(&other)),
        };
        let literal = self.expect_literal()?;
        Ok(Cond::Pred { col, op, literal })
    }
}

fn unexpected(tok: &Token) -> Error {
    if *tok == Token::Eof {
        Error::Parse(ParseErrorKind::UnexpectedEof)
    } else {
        Error::Parse(ParseErrorKind::UnexpectedToken(format!("{tok:?}")))
    }
}
