use thiserror::Error;

use crate::{lexer::prelude::TokenKind, utils::prelude::SrcSpan};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseErrorType {
    #[error("expected next token to be {expected}, got {got} instead")]
    UnexpectedToken {
        expected: TokenKind,
        got: TokenKind,
    },
    #[error("no prefix parse function for {token}")]
    NoPrefixParseFn {
        token: TokenKind,
    },
    #[error("could not parse {literal} as number")]
    InvalidNumber {
        literal: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{error}")]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    /// Short label for the offending span plus explanatory lines.
    pub fn details(&self) -> (String, Vec<String>) {
        match &self.error {
            ParseErrorType::UnexpectedToken { expected, got } => {
                let found = describe(got);

                (
                    format!("Expected `{}`", expected.as_literal()),
                    vec![format!("Found {found} instead")],
                )
            },
            ParseErrorType::NoPrefixParseFn { token } => (
                "Not expected this".to_string(),
                vec![format!("Found {}, which cannot start an expression", describe(token))],
            ),
            ParseErrorType::InvalidNumber { literal } => (
                "Invalid number".to_string(),
                vec![format!("`{literal}` is not a valid number")],
            ),
        }
    }
}

fn describe(token: &TokenKind) -> String {
    match token {
        TokenKind::Eof => "the end of input".to_string(),
        TokenKind::Ident => "an Identifier".to_string(),
        TokenKind::Number => "a Number".to_string(),
        TokenKind::String => "a String".to_string(),
        TokenKind::Illegal => "an unrecognised character".to_string(),
        _ if token.is_keyword() => format!("the keyword `{}`", token.as_literal()),
        _ => format!("`{}`", token.as_literal()),
    }
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
