use super::tokenizer::{Token, TokenType};

/// Where in the token stream a diagnostic points.
#[derive(Clone, Debug, PartialEq)]
pub enum Location {
    Nowhere,
    AtEnd,
    At(String),
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nowhere => Ok(()),
            Self::AtEnd => write!(f, " at end"),
            Self::At(lexeme) => write!(f, " at '{}'", lexeme),
        }
    }
}

/// A lexical or syntax diagnostic. Collected, never thrown past the parser.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct Error {
    pub line: usize,
    pub location: Location,
    pub message: String,
}

impl Error {
    pub fn new(line: usize, msg: &str) -> Self {
        Self {
            line,
            location: Location::Nowhere,
            message: msg.to_string(),
        }
    }
    pub fn at_token(token: &Token, msg: &str) -> Self {
        let location = match token.typ {
            TokenType::ENDMARKER => Location::AtEnd,
            _ => Location::At(token.lexeme.clone()),
        };
        Self {
            line: token.line,
            location,
            message: msg.to_string(),
        }
    }
}
