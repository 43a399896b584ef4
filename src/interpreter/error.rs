/// Errors raised while evaluating. Any of them aborts the current run.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Operand must be a number.")]
    OperandNotNumber { line: usize },
    #[error("Operands must be numbers.")]
    OperandsNotNumbers { line: usize },
    #[error("Operands must be two numbers or two strings.")]
    InvalidAddition { line: usize },
    #[error("Division by zero.")]
    DivisionByZero { line: usize },
    #[error("Undefined variable '{name}'.")]
    UndefinedVariable { name: String, line: usize },
    #[error("Could not write program output: {0}")]
    Output(#[from] std::io::Error),
}

impl RuntimeError {
    /// Source line of the offending token, if the error came from the program itself.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::OperandNotNumber { line }
            | Self::OperandsNotNumbers { line }
            | Self::InvalidAddition { line }
            | Self::DivisionByZero { line }
            | Self::UndefinedVariable { line, .. } => Some(*line),
            Self::Output(_) => None,
        }
    }
}
