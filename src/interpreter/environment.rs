use std::collections::HashMap;

use super::error::RuntimeError;
use super::value::Value;
use crate::parser::tokenizer::Token;

/// One lexical scope, owning the scope it is nested in.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Box<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` in the innermost scope, replacing any earlier binding there.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }
        match &self.enclosing {
            Some(parent) => parent.get(name),
            None => Err(undefined(name)),
        }
    }

    /// Updates the nearest existing binding. Never creates one.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            return Ok(());
        }
        match &mut self.enclosing {
            Some(parent) => parent.assign(name, value),
            None => Err(undefined(name)),
        }
    }

    /// Number of scopes between this one and the root, inclusive.
    pub fn depth(&self) -> usize {
        1 + self.enclosing.as_ref().map_or(0, |parent| parent.depth())
    }

    pub(crate) fn enter_scope(&mut self) {
        let parent = std::mem::take(self);
        self.enclosing = Some(Box::new(parent));
    }

    pub(crate) fn exit_scope(&mut self) {
        if let Some(parent) = self.enclosing.take() {
            *self = *parent;
        }
    }
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError::UndefinedVariable {
        name: name.lexeme.clone(),
        line: name.line,
    }
}
