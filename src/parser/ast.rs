use super::tokenizer::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(Expression),
    Print(Expression),
    Var(Token, Option<Expression>),
    Block(Vec<Statement>),
    If(Expression, Box<Statement>, Option<Box<Statement>>),
    While(Expression, Box<Statement>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    String(String),
    Number(f64),
    Boolean(bool),
    Nil,
    Unary(Token, Box<Expression>),
    /// Arithmetic, comparison, equality and the comma operator.
    Binary(Token, Box<(Expression, Expression)>),
    Logical(Token, Box<(Expression, Expression)>),
    Conditional(Box<(Expression, Expression, Expression)>),
    Grouping(Box<Expression>),
    Variable(Token),
    Assign(Token, Box<Expression>),
}

impl Expression {
    pub(super) fn binary(op: Token, left: Expression, right: Expression) -> Self {
        Self::Binary(op, Box::new((left, right)))
    }
    pub(super) fn logical(op: Token, left: Expression, right: Expression) -> Self {
        Self::Logical(op, Box::new((left, right)))
    }
}

// Prefix form, one pair of parentheses per node: `(+ 1 (* 2 3))`.
impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{:?}", s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Nil => write!(f, "nil"),
            Self::Unary(op, operand) => write!(f, "({} {})", op.lexeme, operand),
            Self::Binary(op, operands) | Self::Logical(op, operands) => {
                write!(f, "({} {} {})", op.lexeme, operands.0, operands.1)
            }
            Self::Conditional(branches) => write!(
                f,
                "(?: {} {} {})",
                branches.0, branches.1, branches.2
            ),
            Self::Grouping(inner) => write!(f, "(group {})", inner),
            Self::Variable(name) => write!(f, "{}", name.lexeme),
            Self::Assign(name, value) => write!(f, "(= {} {})", name.lexeme, value),
        }
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expression(expr) => write!(f, "(; {})", expr),
            Self::Print(expr) => write!(f, "(print {})", expr),
            Self::Var(name, Some(init)) => write!(f, "(var {} {})", name.lexeme, init),
            Self::Var(name, None) => write!(f, "(var {})", name.lexeme),
            Self::Block(statements) => {
                write!(f, "(block")?;
                for statement in statements {
                    write!(f, " {}", statement)?;
                }
                write!(f, ")")
            }
            Self::If(condition, then_branch, Some(else_branch)) => {
                write!(f, "(if {} {} {})", condition, then_branch, else_branch)
            }
            Self::If(condition, then_branch, None) => {
                write!(f, "(if {} {})", condition, then_branch)
            }
            Self::While(condition, body) => write!(f, "(while {} {})", condition, body),
        }
    }
}
