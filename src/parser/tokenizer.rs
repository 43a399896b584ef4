use super::error::Error;
use const_format::concatcp;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::{Match, Regex};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub typ: TokenType,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: usize,
}

impl Token {
    pub fn new(typ: TokenType, lexeme: &str, literal: Option<Literal>, line: usize) -> Self {
        Self {
            typ,
            lexeme: lexeme.to_string(),
            literal,
            line,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.literal {
            Some(literal) => write!(f, "{:?}('{}', {})", self.typ, self.lexeme, literal),
            None => write!(f, "{:?}('{}')", self.typ, self.lexeme),
        }
    }
}

/// Payload of `STRING` and `NUMBER` tokens.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TokenType {
    LPAR,
    RPAR,
    LBRACE,
    RBRACE,
    COMMA,
    DOT,
    MINUS,
    PLUS,
    SEMI,
    SLASH,
    STAR,
    QUESTION,
    COLON,
    EXCLAMATION,
    NOTEQUAL,
    EQUAL,
    EQEQUAL,
    GREATER,
    GREATEREQUAL,
    LESS,
    LESSEQUAL,
    NAME,
    STRING,
    NUMBER,
    AND,
    CLASS,
    ELSE,
    FALSE,
    FUN,
    FOR,
    IF,
    NIL,
    OR,
    PRINT,
    RETURN,
    SUPER,
    THIS,
    TRUE,
    VAR,
    WHILE,
    ENDMARKER,
}

const NOTEQUAL: (&str, TokenType) = ("!=", TokenType::NOTEQUAL);
const EQEQUAL: (&str, TokenType) = ("==", TokenType::EQEQUAL);
const LESSEQUAL: (&str, TokenType) = ("<=", TokenType::LESSEQUAL);
const GREATEREQUAL: (&str, TokenType) = (">=", TokenType::GREATEREQUAL);
const LPAR: (&str, TokenType) = ("(", TokenType::LPAR);
const RPAR: (&str, TokenType) = (")", TokenType::RPAR);
const LBRACE: (&str, TokenType) = ("{", TokenType::LBRACE);
const RBRACE: (&str, TokenType) = ("}", TokenType::RBRACE);
const COMMA: (&str, TokenType) = (",", TokenType::COMMA);
const DOT: (&str, TokenType) = (".", TokenType::DOT);
const MINUS: (&str, TokenType) = ("-", TokenType::MINUS);
const PLUS: (&str, TokenType) = ("+", TokenType::PLUS);
const SEMI: (&str, TokenType) = (";", TokenType::SEMI);
const SLASH: (&str, TokenType) = ("/", TokenType::SLASH);
const STAR: (&str, TokenType) = ("*", TokenType::STAR);
const QUESTION: (&str, TokenType) = ("?", TokenType::QUESTION);
const COLON: (&str, TokenType) = (":", TokenType::COLON);
const EXCLAMATION: (&str, TokenType) = ("!", TokenType::EXCLAMATION);
const EQUAL: (&str, TokenType) = ("=", TokenType::EQUAL);
const GREATER: (&str, TokenType) = (">", TokenType::GREATER);
const LESS: (&str, TokenType) = ("<", TokenType::LESS);

// Two-character operators must come before their one-character prefixes.
const SIMPLE_TOKENS: [(&str, TokenType); 21] = [
    NOTEQUAL,
    EQEQUAL,
    LESSEQUAL,
    GREATEREQUAL,
    LPAR,
    RPAR,
    LBRACE,
    RBRACE,
    COMMA,
    DOT,
    MINUS,
    PLUS,
    SEMI,
    SLASH,
    STAR,
    QUESTION,
    COLON,
    EXCLAMATION,
    EQUAL,
    GREATER,
    LESS,
];

const S_WHITESPACE: &str = r"^[ \r\t]+";
const S_DIGITS: &str = r"[0-9]+";
const S_NUMBER: &str = concatcp!("^", S_DIGITS, r"(?:\.", S_DIGITS, ")?");
const S_NAME: &str = r"^[A-Za-z_][A-Za-z0-9_]*";

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_WHITESPACE).expect("Error compiling regex."));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(S_NUMBER).expect("Error compiling regex."));
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(S_NAME).expect("Error compiling regex."));

static KEYWORDS: Lazy<HashMap<&'static str, TokenType>> = Lazy::new(|| {
    HashMap::from([
        ("and", TokenType::AND),
        ("class", TokenType::CLASS),
        ("else", TokenType::ELSE),
        ("false", TokenType::FALSE),
        ("for", TokenType::FOR),
        ("fun", TokenType::FUN),
        ("if", TokenType::IF),
        ("nil", TokenType::NIL),
        ("or", TokenType::OR),
        ("print", TokenType::PRINT),
        ("return", TokenType::RETURN),
        ("super", TokenType::SUPER),
        ("this", TokenType::THIS),
        ("true", TokenType::TRUE),
        ("var", TokenType::VAR),
        ("while", TokenType::WHILE),
    ])
});

/// Single left-to-right pass over the source. Errors are collected and scanning
/// resumes with the next character.
pub struct Tokenizer<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    errors: Vec<Error>,
    start: usize,
    current: usize,
    line: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: vec![],
            errors: vec![],
            start: 0,
            current: 0,
            line: 1,
        }
    }

    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Error>) {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }
        self.tokens
            .push(Token::new(TokenType::ENDMARKER, "", None, self.line));
        debug!(
            "tokenized {} tokens with {} errors over {} lines",
            self.tokens.len(),
            self.errors.len(),
            self.line
        );
        (self.tokens, self.errors)
    }

    fn scan_token(&mut self) {
        let rest = self.rest();
        if rest.starts_with("//") {
            self.current += rest.find('\n').unwrap_or(rest.len());
            return;
        }
        if rest.starts_with("/*") {
            self.block_comment();
            return;
        }
        if let Some(m) = WHITESPACE.find(rest) {
            self.current += m.end();
            return;
        }
        if rest.starts_with('\n') {
            self.current += 1;
            self.line += 1;
            return;
        }
        if rest.starts_with('"') {
            self.string();
            return;
        }
        if let Some(m) = NUMBER.find(rest) {
            self.number(m);
            return;
        }
        if let Some(m) = NAME.find(rest) {
            self.current += m.end();
            let typ = KEYWORDS
                .get(m.as_str())
                .copied()
                .unwrap_or(TokenType::NAME);
            self.push(typ, None);
            return;
        }
        for (lexeme, typ) in SIMPLE_TOKENS {
            if rest.starts_with(lexeme) {
                self.current += lexeme.len();
                self.push(typ, None);
                return;
            }
        }
        if let Some(c) = self.peek() {
            trace!("unexpected character {:?} on line {}", c, self.line);
            self.current += c.len_utf8();
        }
        self.errors
            .push(Error::new(self.line, "Unexpected character."));
    }

    fn number(&mut self, m: Match) {
        self.current += m.end();
        match m.as_str().parse::<f64>() {
            Ok(value) => self.push(TokenType::NUMBER, Some(Literal::Number(value))),
            Err(_) => self
                .errors
                .push(Error::new(self.line, "Invalid number literal.")),
        }
    }

    fn string(&mut self) {
        self.current += 1;
        loop {
            match self.peek() {
                None => {
                    self.errors
                        .push(Error::new(self.line, "Unterminated string."));
                    return;
                }
                Some('"') => break,
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    self.current += c.len_utf8();
                }
            }
        }
        self.current += 1;
        let value = self.source[self.start + 1..self.current - 1].to_string();
        self.push(TokenType::STRING, Some(Literal::String(value)));
    }

    // Block comments nest: every "/*" needs its own "*/".
    fn block_comment(&mut self) {
        self.current += 2;
        let mut depth = 1;
        while depth > 0 {
            let rest = self.rest();
            if rest.starts_with("/*") {
                depth += 1;
                self.current += 2;
            } else if rest.starts_with("*/") {
                depth -= 1;
                self.current += 2;
            } else if let Some(c) = self.peek() {
                if c == '\n' {
                    self.line += 1;
                }
                self.current += c.len_utf8();
            } else {
                self.errors
                    .push(Error::new(self.line, "Unterminated block comment."));
                return;
            }
        }
    }

    fn push(&mut self, typ: TokenType, literal: Option<Literal>) {
        let token = Token::new(
            typ,
            &self.source[self.start..self.current],
            literal,
            self.line,
        );
        trace!("{}", token);
        self.tokens.push(token);
    }

    fn rest(&self) -> &'a str {
        &self.source[self.current..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

pub fn tokenize_string(source: &str) -> (Vec<Token>, Vec<Error>) {
    Tokenizer::new(source).tokenize()
}
