mod environment;
mod error;
mod value;

pub use environment::Environment;
pub use error::RuntimeError;
pub use value::Value;

use derivative::Derivative;
use log::{debug, trace};
use std::io::{self, Write};

use crate::parser::tokenizer::{Token, TokenType as TT};
use crate::parser::{Expression, Statement};

/// Tree-walking evaluator. The root environment outlives single `interpret` calls, so
/// an interactive session keeps its variables between lines.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Interpreter<W = io::Stdout> {
    environment: Environment,
    #[derivative(Debug = "ignore")]
    out: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Sends everything `print` produces to `out`.
    pub fn with_output(out: W) -> Self {
        Self {
            environment: Environment::new(),
            out,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Runs `statements` in order, stopping at the first runtime error.
    pub fn interpret(&mut self, statements: &[Statement]) -> Result<(), RuntimeError> {
        debug!("interpreting {} statements", statements.len());
        for statement in statements {
            self.evaluate(statement)?;
        }
        Ok(())
    }

    fn evaluate(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        trace!("executing {}", statement);
        match statement {
            Statement::Expression(expr) => {
                self.evaluate_expr(expr)?;
            }
            Statement::Print(expr) => {
                let value = self.evaluate_expr(expr)?;
                writeln!(self.out, "{}", value)?;
            }
            Statement::Var(name, initializer) => {
                let value = match initializer {
                    Some(expr) => self.evaluate_expr(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(&name.lexeme, value);
            }
            Statement::Block(statements) => self.evaluate_block(statements)?,
            Statement::If(condition, then_branch, else_branch) => {
                if self.evaluate_expr(condition)?.is_truthy() {
                    self.evaluate(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.evaluate(else_branch)?;
                }
            }
            Statement::While(condition, body) => {
                while self.evaluate_expr(condition)?.is_truthy() {
                    self.evaluate(body)?;
                }
            }
        }
        Ok(())
    }

    // The enclosing scope is restored before any error leaves the block.
    fn evaluate_block(&mut self, statements: &[Statement]) -> Result<(), RuntimeError> {
        self.environment.enter_scope();
        trace!("entered scope at depth {}", self.environment.depth());
        let result = statements
            .iter()
            .try_for_each(|statement| self.evaluate(statement));
        self.environment.exit_scope();
        result
    }

    pub fn evaluate_expr(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        match expression {
            Expression::String(s) => Ok(Value::String(s.clone())),
            Expression::Number(n) => Ok(Value::Number(*n)),
            Expression::Boolean(b) => Ok(Value::Boolean(*b)),
            Expression::Nil => Ok(Value::Nil),
            Expression::Grouping(inner) => self.evaluate_expr(inner),
            Expression::Unary(op, operand) => {
                let operand = self.evaluate_expr(operand)?;
                unary(op, operand)
            }
            Expression::Binary(op, operands) => {
                let left = self.evaluate_expr(&operands.0)?;
                let right = self.evaluate_expr(&operands.1)?;
                binary(op, left, right)
            }
            Expression::Logical(op, operands) => {
                let left = self.evaluate_expr(&operands.0)?;
                let decided = match op.typ {
                    TT::OR => left.is_truthy(),
                    _ => !left.is_truthy(),
                };
                if decided {
                    return Ok(left);
                }
                self.evaluate_expr(&operands.1)
            }
            Expression::Conditional(branches) => {
                let (condition, then_branch, else_branch) = branches.as_ref();
                if self.evaluate_expr(condition)?.is_truthy() {
                    self.evaluate_expr(then_branch)
                } else {
                    self.evaluate_expr(else_branch)
                }
            }
            Expression::Variable(name) => self.environment.get(name),
            Expression::Assign(name, value) => {
                let value = self.evaluate_expr(value)?;
                self.environment.assign(name, value.clone())?;
                Ok(value)
            }
        }
    }
}

fn unary(op: &Token, operand: Value) -> Result<Value, RuntimeError> {
    match (op.typ, operand) {
        (TT::MINUS, Value::Number(n)) => Ok(Value::Number(-n)),
        (TT::MINUS, _) => Err(RuntimeError::OperandNotNumber { line: op.line }),
        (_, operand) => Ok(Value::Boolean(!operand.is_truthy())),
    }
}

fn binary(op: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    let line = op.line;
    match op.typ {
        // Both sides are already evaluated; the left one only for its effects.
        TT::COMMA => Ok(right),
        TT::EQEQUAL => Ok(Value::Boolean(left == right)),
        TT::NOTEQUAL => Ok(Value::Boolean(left != right)),
        TT::PLUS => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
            (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
            _ => Err(RuntimeError::InvalidAddition { line }),
        },
        _ => match (left, right) {
            (Value::Number(l), Value::Number(r)) => numeric(op, l, r),
            _ => Err(RuntimeError::OperandsNotNumbers { line }),
        },
    }
}

fn numeric(op: &Token, l: f64, r: f64) -> Result<Value, RuntimeError> {
    let value = match op.typ {
        TT::MINUS => Value::Number(l - r),
        TT::STAR => Value::Number(l * r),
        TT::SLASH if r == 0.0 => return Err(RuntimeError::DivisionByZero { line: op.line }),
        TT::SLASH => Value::Number(l / r),
        TT::GREATER => Value::Boolean(l > r),
        TT::GREATEREQUAL => Value::Boolean(l >= r),
        TT::LESS => Value::Boolean(l < r),
        TT::LESSEQUAL => Value::Boolean(l <= r),
        _ => unreachable!("{} is not a binary operator", op),
    };
    Ok(value)
}
