// # ========================= START OF THE GRAMMAR =========================
//
// program:     statement* ENDMARKER
// statement:   'var' NAME ['=' expression] ';'
//            | 'print' expression ';'
//            | '{' statement* '}'
//            | 'if' '(' expression ')' statement ['else' statement]
//            | 'while' '(' expression ')' statement
//            | expression ';'
//
// expression:  comma
// comma:       assignment (',' assignment)*
// assignment:  [NAME '='] conditional
// conditional: logic_or ['?' expression ':' expression]
// logic_or:    logic_and ('or' logic_and)*
// logic_and:   equality ('and' equality)*
// equality:    comparison (('==' | '!=') comparison)*
// comparison:  term (('>' | '>=' | '<' | '<=') term)*
// term:        factor (('+' | '-') factor)*
// factor:      unary (('*' | '/') unary)*
// unary:       ('!' | '-') primary | primary
// primary:     NUMBER | STRING | 'true' | 'false' | 'nil' | '(' expression ')' | NAME
//
// Error productions for binary operators without a left-hand side:
// primary:     ('==' | '!=') equality
//            | ('>' | '>=' | '<' | '<=') comparison
//            | '+' term
//            | ('*' | '/') factor

use log::debug;

use super::ast::*;
use super::error::Error;
use super::tokenizer::{Literal, Token, TokenType as TT};

/// Marks a statement that must be abandoned. The diagnostic is recorded before this is
/// returned, so the only thing left to do is to resynchronize.
#[derive(Debug)]
pub(super) struct Unwind;

type ParseResult<T> = Result<T, Unwind>;

type Rule<'a> = fn(&mut Parser<'a>) -> ParseResult<Expression>;

pub fn parse(tokens: &[Token]) -> (Vec<Statement>, Vec<Error>) {
    match tokens.last() {
        Some(last) if last.typ == TT::ENDMARKER => Parser::new(tokens).program(),
        last => {
            let line = last.map_or(1, |t| t.line);
            let mut tokens = tokens.to_vec();
            tokens.push(Token::new(TT::ENDMARKER, "", None, line));
            Parser::new(&tokens).program()
        }
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    errors: Vec<Error>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            current: 0,
            errors: vec![],
        }
    }

    fn program(mut self) -> (Vec<Statement>, Vec<Error>) {
        let mut statements = vec![];
        while !self.is_at_end() {
            if let Some(statement) = self.statement_or_recover() {
                statements.push(statement);
            }
        }
        debug!(
            "parsed {} statements with {} errors",
            statements.len(),
            self.errors.len()
        );
        (statements, self.errors)
    }

    // # STATEMENTS
    // # ==========

    fn statement_or_recover(&mut self) -> Option<Statement> {
        match self.statement() {
            Ok(statement) => Some(statement),
            Err(Unwind) => {
                self.synchronize();
                None
            }
        }
    }

    fn statement(&mut self) -> ParseResult<Statement> {
        match self.peek().typ {
            TT::VAR => {
                self.advance();
                self.var_declaration()
            }
            TT::PRINT => {
                self.advance();
                self.print_statement()
            }
            TT::LBRACE => {
                self.advance();
                self.block().map(Statement::Block)
            }
            TT::IF => {
                self.advance();
                self.if_statement()
            }
            TT::WHILE => {
                self.advance();
                self.while_statement()
            }
            _ => self.expression_statement(),
        }
    }

    fn var_declaration(&mut self) -> ParseResult<Statement> {
        let name = self.consume(TT::NAME, "Expected variable name.")?;
        let initializer = match self.matches(&[TT::EQUAL]) {
            Some(_) => Some(self.expression()?),
            None => None,
        };
        self.consume(TT::SEMI, "Expected ';' after variable declaration.")?;
        Ok(Statement::Var(name.clone(), initializer))
    }

    fn print_statement(&mut self) -> ParseResult<Statement> {
        let value = self.expression()?;
        self.consume(TT::SEMI, "Expected ';' after value.")?;
        Ok(Statement::Print(value))
    }

    fn expression_statement(&mut self) -> ParseResult<Statement> {
        let expr = self.expression()?;
        self.consume(TT::SEMI, "Expected ';' after expression.")?;
        Ok(Statement::Expression(expr))
    }

    // A malformed statement inside a block is dropped without abandoning the block.
    fn block(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = vec![];
        while !self.check(TT::RBRACE) && !self.is_at_end() {
            if let Some(statement) = self.statement_or_recover() {
                statements.push(statement);
            }
        }
        self.consume(TT::RBRACE, "Expected '}' after block.")?;
        Ok(statements)
    }

    fn if_statement(&mut self) -> ParseResult<Statement> {
        self.consume(TT::LPAR, "Expected '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TT::RPAR, "Expected ')' after if condition.")?;
        let then_branch = Box::new(self.statement()?);
        let else_branch = match self.matches(&[TT::ELSE]) {
            Some(_) => Some(Box::new(self.statement()?)),
            None => None,
        };
        Ok(Statement::If(condition, then_branch, else_branch))
    }

    fn while_statement(&mut self) -> ParseResult<Statement> {
        self.consume(TT::LPAR, "Expected '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TT::RPAR, "Expected ')' after condition.")?;
        let body = Box::new(self.statement()?);
        Ok(Statement::While(condition, body))
    }

    // # EXPRESSIONS
    // # ===========

    fn expression(&mut self) -> ParseResult<Expression> {
        self.comma()
    }

    fn comma(&mut self) -> ParseResult<Expression> {
        self.left_associative(&[TT::COMMA], Self::assignment, Expression::binary)
    }

    fn assignment(&mut self) -> ParseResult<Expression> {
        let expr = self.conditional()?;
        if let Some(equals) = self.matches(&[TT::EQUAL]) {
            let value = self.assignment()?;
            return match expr {
                Expression::Variable(name) => Ok(Expression::Assign(name, Box::new(value))),
                _ => {
                    // Reported, but the surrounding statement still parses.
                    self.report(equals, "Invalid assignment target.");
                    Ok(expr)
                }
            };
        }
        Ok(expr)
    }

    fn conditional(&mut self) -> ParseResult<Expression> {
        let condition = self.logic_or()?;
        if self.matches(&[TT::QUESTION]).is_some() {
            let then_branch = self.expression()?;
            self.consume(
                TT::COLON,
                "Expected ':' after then branch of conditional expression.",
            )?;
            let else_branch = self.expression()?;
            return Ok(Expression::Conditional(Box::new((
                condition,
                then_branch,
                else_branch,
            ))));
        }
        Ok(condition)
    }

    fn logic_or(&mut self) -> ParseResult<Expression> {
        self.left_associative(&[TT::OR], Self::logic_and, Expression::logical)
    }

    fn logic_and(&mut self) -> ParseResult<Expression> {
        self.left_associative(&[TT::AND], Self::equality, Expression::logical)
    }

    fn equality(&mut self) -> ParseResult<Expression> {
        self.left_associative(
            &[TT::EQEQUAL, TT::NOTEQUAL],
            Self::comparison,
            Expression::binary,
        )
    }

    fn comparison(&mut self) -> ParseResult<Expression> {
        self.left_associative(
            &[TT::GREATER, TT::GREATEREQUAL, TT::LESS, TT::LESSEQUAL],
            Self::term,
            Expression::binary,
        )
    }

    fn term(&mut self) -> ParseResult<Expression> {
        self.left_associative(&[TT::PLUS, TT::MINUS], Self::factor, Expression::binary)
    }

    fn factor(&mut self) -> ParseResult<Expression> {
        self.left_associative(&[TT::STAR, TT::SLASH], Self::unary, Expression::binary)
    }

    fn unary(&mut self) -> ParseResult<Expression> {
        if let Some(op) = self.matches(&[TT::EXCLAMATION, TT::MINUS]) {
            let operand = self.primary()?;
            return Ok(Expression::Unary(op.clone(), Box::new(operand)));
        }
        self.primary()
    }

    fn primary(&mut self) -> ParseResult<Expression> {
        let token = self.peek();
        let expr = match (token.typ, &token.literal) {
            (TT::FALSE, _) => Expression::Boolean(false),
            (TT::TRUE, _) => Expression::Boolean(true),
            (TT::NIL, _) => Expression::Nil,
            (TT::NUMBER, Some(Literal::Number(n))) => Expression::Number(*n),
            (TT::STRING, Some(Literal::String(s))) => Expression::String(s.clone()),
            (TT::NAME, _) => Expression::Variable(token.clone()),
            (TT::LPAR, _) => {
                self.advance();
                let inner = self.expression()?;
                self.consume(TT::RPAR, "Expected ')' after expression.")?;
                return Ok(Expression::Grouping(Box::new(inner)));
            }
            (TT::EQEQUAL | TT::NOTEQUAL, _) => return self.missing_left_operand(Self::equality),
            (TT::GREATER | TT::GREATEREQUAL | TT::LESS | TT::LESSEQUAL, _) => {
                return self.missing_left_operand(Self::comparison)
            }
            (TT::PLUS, _) => return self.missing_left_operand(Self::term),
            (TT::STAR | TT::SLASH, _) => return self.missing_left_operand(Self::factor),
            _ => return Err(self.error(token, "Expected expression.")),
        };
        self.advance();
        Ok(expr)
    }

    // The right-hand side is parsed and discarded so the error stays local.
    fn missing_left_operand(&mut self, rhs: Rule<'a>) -> ParseResult<Expression> {
        let op = self.advance();
        self.report(op, "Missing left-hand operand.");
        rhs(self)?;
        Err(Unwind)
    }

    fn left_associative(
        &mut self,
        operators: &[TT],
        operand: Rule<'a>,
        node: fn(Token, Expression, Expression) -> Expression,
    ) -> ParseResult<Expression> {
        let mut expr = operand(self)?;
        while let Some(op) = self.matches(operators) {
            let right = operand(self)?;
            expr = node(op.clone(), expr, right);
        }
        Ok(expr)
    }

    // # HELPERS
    // # =======

    fn synchronize(&mut self) {
        let mut consumed = self.advance();
        while !self.is_at_end() {
            if consumed.typ == TT::SEMI {
                break;
            }
            if matches!(
                self.peek().typ,
                TT::CLASS
                    | TT::FUN
                    | TT::VAR
                    | TT::FOR
                    | TT::IF
                    | TT::WHILE
                    | TT::PRINT
                    | TT::RETURN
            ) {
                break;
            }
            consumed = self.advance();
        }
        debug!("resynchronized before {}", self.peek());
    }

    fn matches(&mut self, types: &[TT]) -> Option<&'a Token> {
        if types.contains(&self.peek().typ) {
            return Some(self.advance());
        }
        None
    }

    fn consume(&mut self, typ: TT, msg: &str) -> ParseResult<&'a Token> {
        if self.check(typ) {
            return Ok(self.advance());
        }
        let token = self.peek();
        Err(self.error(token, msg))
    }

    fn check(&self, typ: TT) -> bool {
        self.peek().typ == typ
    }

    fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn peek(&self) -> &'a Token {
        &self.tokens[self.current]
    }

    fn is_at_end(&self) -> bool {
        self.peek().typ == TT::ENDMARKER
    }

    fn report(&mut self, token: &Token, msg: &str) {
        let error = Error::at_token(token, msg);
        debug!("{}", error);
        self.errors.push(error);
    }

    fn error(&mut self, token: &Token, msg: &str) -> Unwind {
        self.report(token, msg);
        Unwind
    }
}
