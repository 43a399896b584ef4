//! Scanner, parser and tree-walking interpreter for a small dynamically typed
//! scripting language.
//!
//! ```
//! let (statements, diagnostics) = lox::scan_and_parse("var a = 1; print a + 2;");
//! assert!(diagnostics.is_empty());
//!
//! let mut interpreter = lox::Interpreter::with_output(Vec::new());
//! interpreter.interpret(&statements).unwrap();
//! assert_eq!(interpreter.output(), b"3\n");
//! ```

mod parser;
pub use parser::tokenizer::{tokenize_string, Literal, Token, TokenType, Tokenizer};
pub use parser::{parse, Error, Expression, Location, Statement};

mod interpreter;
pub use interpreter::{Environment, Interpreter, RuntimeError, Value};

/// Tokenizes and parses `source`. Lexical diagnostics come first, followed by syntax
/// diagnostics; the statements that parsed cleanly are returned either way.
pub fn scan_and_parse(source: &str) -> (Vec<Statement>, Vec<Error>) {
    let (tokens, mut diagnostics) = tokenize_string(source);
    let (statements, syntax_errors) = parse(&tokens);
    diagnostics.extend(syntax_errors);
    (statements, diagnostics)
}
