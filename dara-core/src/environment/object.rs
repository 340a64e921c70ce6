use std::{fmt::Display, rc::Rc};

use crate::parser::prelude::FunctionLiteral;

use super::prelude::Env;

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NIL: Object = Object::Nil;

#[derive(Debug, Clone)]
pub enum Object {
    Number(f64),
    String(String),
    Boolean(bool),
    Nil,
    Function(Rc<Function>),
    /// Carries a `return` value out of nested blocks up to the nearest call.
    Return(Box<Object>),
    Error(String),
}

/// A function value: its literal plus the environment it was created in.
///
/// A function bound in the environment it captured forms an `Rc` cycle that
/// is never freed.
pub struct Function {
    pub literal: Rc<FunctionLiteral>,
    pub env: Env,
}

// the captured environment may refer back to this function
impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("literal", &self.literal.to_string())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(left), Self::Number(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Boolean(left), Self::Boolean(right)) => left == right,
            (Self::Nil, Self::Nil) => true,
            (Self::Function(left), Self::Function(right)) => Rc::ptr_eq(left, right),
            (Self::Return(left), Self::Return(right)) => left == right,
            (Self::Error(left), Self::Error(right)) => left == right,
            _ => false,
        }
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Nil => write!(f, "nil"),
            Self::Function(function) => write!(f, "{}", function.literal),
            Self::Return(value) => write!(f, "{value}"),
            Self::Error(message) => write!(f, "ERROR: {message}"),
        }
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        if value { TRUE } else { FALSE }
    }
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "NUMBER",
            Self::String(_) => "STRING",
            Self::Boolean(_) => "BOOLEAN",
            Self::Nil => "NIL",
            Self::Function(_) => "FUNCTION",
            Self::Return(_) => "RETURN",
            Self::Error(_) => "ERROR",
        }
    }

    /// `nil` and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn describe(&self) -> String {
        self.to_string()
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}
