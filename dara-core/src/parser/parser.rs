use crate::{
    lexer::prelude::{Lexer, Spanned, Token, TokenKind},
    utils::prelude::SrcSpan
};
use super::error::{parse_error, ParseError, ParseErrorType};
use super::ast::{Expression, Identifier, Parsed, Program, Statement};

pub trait Parse<T: Iterator<Item = Spanned>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse<T: Iterator<Item = Spanned>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub struct Parser<T: Iterator<Item = Spanned>> {
    pub current_token: Option<Spanned>,
    pub next_token: Option<Spanned>,
    pub comments: Vec<SrcSpan>,
    pub errors: Vec<ParseError>,

    tokens: T,
    last_end: u32,
}

impl<T: Iterator<Item = Spanned>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: None,
            next_token: None,
            comments: vec![],
            errors: vec![],

            tokens: input,
            last_end: 0,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    /// Consumes the current token and returns it. Comment tokens never reach
    /// the grammar: their spans are recorded and they are skipped.
    pub fn next_token(&mut self) -> Spanned {
        let t = self.current_token.take();

        let next = loop {
            match self.tokens.next() {
                Some((start, token, end)) if token.kind == TokenKind::Comment => {
                    self.comments.push(SrcSpan { start, end })
                },
                next => break next
            }
        };

        self.current_token = self.next_token.take();
        self.next_token = next;

        match t {
            Some(spanned) => {
                self.last_end = spanned.2;
                spanned
            },
            None => (self.last_end, Token::eof(), self.last_end)
        }
    }

    pub fn current_kind(&self) -> TokenKind {
        match &self.current_token {
            Some((_, token, _)) => token.kind,
            None => TokenKind::Eof
        }
    }

    pub fn next_kind(&self) -> TokenKind {
        match &self.next_token {
            Some((_, token, _)) => token.kind,
            None => TokenKind::Eof
        }
    }

    pub fn current_span(&self) -> SrcSpan {
        match &self.current_token {
            Some((start, _, end)) => SrcSpan { start: *start, end: *end },
            None => SrcSpan { start: self.last_end, end: self.last_end }
        }
    }

    pub fn current_precedence(&self) -> Precedence {
        Precedence::from(&self.current_kind())
    }

    pub fn parse(&mut self) -> Parsed {
        let start = self.current_span().start;
        let mut statements = vec![];

        while self.current_kind() != TokenKind::Eof {
            match Statement::parse(self, None) {
                Ok(statement) => statements.push(statement),
                Err(err) => {
                    tracing::debug!(location = %err.span, "{err}");

                    self.errors.push(err);
                    self.synchronize();
                }
            }
        }

        let program = Program {
            statements,
            location: SrcSpan { start, end: self.last_end.max(start) }
        };

        Parsed {
            program,
            comments: std::mem::take(&mut self.comments),
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Skips the rest of a malformed statement, up to and including its `;`.
    fn synchronize(&mut self) {
        loop {
            match self.current_kind() {
                TokenKind::Eof => return,
                TokenKind::Semicolon => {
                    self.step();
                    return;
                },
                _ => self.step()
            }
        }
    }

    pub fn expect_one(&mut self, kind: TokenKind) -> Result<(u32, u32), ParseError> {
        match self.skip_one(kind) {
            Some(span) => Ok(span),
            None => parse_error(
                ParseErrorType::UnexpectedToken {
                    expected: kind,
                    got: self.current_kind(),
                },
                self.current_span()
            )
        }
    }

    /// Consumes the current token only when it is of `kind`.
    pub fn skip_one(&mut self, kind: TokenKind) -> Option<(u32, u32)> {
        if self.current_kind() != kind {
            return None;
        }

        let (start, _, end) = self.next_token();

        Some((start, end))
    }

    pub fn expect_ident(&mut self) -> Result<Identifier, ParseError> {
        match self.current_kind() {
            TokenKind::Ident => {
                let (start, token, end) = self.next_token();

                Ok(Identifier::from((start, token.literal, end)))
            },
            got => parse_error(
                ParseErrorType::UnexpectedToken {
                    expected: TokenKind::Ident,
                    got,
                },
                self.current_span()
            )
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Or,
    And,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call
}

impl From<&TokenKind> for Precedence {
    fn from(value: &TokenKind) -> Self {
        match value {
            TokenKind::Or => Self::Or,
            TokenKind::And => Self::And,
            TokenKind::Equal | TokenKind::NotEqual => Self::Equals,
            TokenKind::LessThan | TokenKind::GreaterThan |
            TokenKind::LessThanOrEqual | TokenKind::GreaterThanOrEqual => Self::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Self::Sum,
            TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent => Self::Product,
            TokenKind::LParen => Self::Call,
            _ => Self::Lowest,
        }
    }
}

pub fn parse_program(src: &str) -> Parsed {
    let lexer = Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)));
    let mut parser = Parser::new(lexer);

    parser.parse()
}

pub fn parse_tokens(tokens: Vec<Spanned>) -> Parsed {
    let mut parser = Parser::new(tokens.into_iter());

    parser.parse()
}

pub fn parse_program_from_stream(stream: impl Iterator<Item = char>) -> Parsed {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );
    let mut parser = Parser::new(lexer);

    parser.parse()
}
