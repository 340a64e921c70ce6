use std::{fmt::Display, rc::Rc};

use crate::{
    lexer::prelude::{Spanned, Token, TokenKind},
    parser::prelude::{parse_error, InfixParse, Parse, ParseError, ParseErrorType, Parser, Precedence},
    utils::prelude::{ensure_sufficient_stack, SrcSpan}
};

#[derive(Debug)]
pub struct Parsed {
    pub program: Program,
    pub comments: Vec<SrcSpan>,
    pub errors: Vec<ParseError>,
}

impl Parsed {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter()
            .map(|error| error.to_string())
            .collect()
    }
}

// program -> { <statement> }
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

// Top-level statements are not separated, so `a; -b` renders as `a(-b)`.
// Printing and re-parsing is stable per statement, and inside blocks.
impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }

        Ok(())
    }
}

impl Program {
    pub fn token_literal(&self) -> String {
        match self.statements.first() {
            Some(statement) => statement.token_literal(),
            None => String::new()
        }
    }
}

// statement -> <declare> | <assign> | <return> | <if> | <block> | <expression_statement>
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(ExpressionStatement),
    Declare(DeclareStatement),
    Assign(AssignStatement),
    Return(ReturnStatement),
    Block(BlockStatement),
    If(IfStatement),
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Statement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let res = match (parser.current_kind(), parser.next_kind()) {
            (TokenKind::Let, _)
            | (TokenKind::Ident, TokenKind::Declare) => Self::Declare(DeclareStatement::parse(parser, None)?),
            (TokenKind::Ident, TokenKind::Assign) => Self::Assign(AssignStatement::parse(parser, None)?),
            (TokenKind::Return, _) => Self::Return(ReturnStatement::parse(parser, None)?),
            (TokenKind::If, _) => Self::If(IfStatement::parse(parser, None)?),
            (TokenKind::LBrace, _) => {
                let mut block = BlockStatement::parse(parser, None)?;

                if let Some((_, end)) = parser.skip_one(TokenKind::Semicolon) {
                    block.location.end = end;
                }

                Self::Block(block)
            },
            _ => Self::Expression(ExpressionStatement::parse(parser, None)?),
        };

        Ok(res)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expression(statement) => write!(f, "{statement}"),
            Self::Declare(statement) => write!(f, "{statement}"),
            Self::Assign(statement) => write!(f, "{statement}"),
            Self::Return(statement) => write!(f, "{statement}"),
            Self::Block(statement) => write!(f, "{statement}"),
            Self::If(statement) => write!(f, "{statement}"),
        }
    }
}

impl Statement {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Expression(statement) => statement.location,
            Self::Declare(statement) => statement.location,
            Self::Assign(statement) => statement.location,
            Self::Return(statement) => statement.location,
            Self::Block(statement) => statement.location,
            Self::If(statement) => statement.location,
        }
    }

    pub fn token_literal(&self) -> String {
        match self {
            Self::Expression(statement) => statement.expression.token_literal(),
            Self::Declare(statement) => statement.token.literal.clone(),
            Self::Assign(_) => TokenKind::Assign.as_literal().to_string(),
            Self::Return(_) => TokenKind::Return.as_literal().to_string(),
            Self::Block(_) => TokenKind::LBrace.as_literal().to_string(),
            Self::If(_) => TokenKind::If.as_literal().to_string(),
        }
    }
}

// expression_statement -> <expression> [;]
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> Parse<T> for ExpressionStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let expression = Expression::parse(parser, None)?;
        let mut location = expression.location();

        if let Some((_, end)) = parser.skip_one(TokenKind::Semicolon) {
            location.end = end;
        }

        Ok(Self {
            expression,
            location
        })
    }
}

impl Display for ExpressionStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression)
    }
}

// declare -> <identifier> := <expression> [;] | let <identifier> (= | :=) <expression> [;]
#[derive(Debug, Clone, PartialEq)]
pub struct DeclareStatement {
    pub token: Token,
    pub name: Identifier,
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> Parse<T> for DeclareStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, token, name) = match parser.skip_one(TokenKind::Let) {
            Some((start, _)) => {
                let name = parser.expect_ident()?;

                if parser.skip_one(TokenKind::Assign).is_none() {
                    parser.expect_one(TokenKind::Declare)?;
                }

                (start, Token::fixed(TokenKind::Let), name)
            },
            None => {
                let name = parser.expect_ident()?;
                parser.expect_one(TokenKind::Declare)?;

                (name.location.start, Token::fixed(TokenKind::Declare), name)
            }
        };

        let value = Expression::parse(parser, None)?;
        let end = parser.skip_one(TokenKind::Semicolon)
            .map_or(value.location().end, |(_, end)| end);

        Ok(Self {
            token,
            name,
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for DeclareStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.token.kind {
            TokenKind::Let => write!(f, "let {} = {};", self.name, self.value),
            _ => write!(f, "{} := {};", self.name, self.value)
        }
    }
}

// assign -> <identifier> = <expression> [;]
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStatement {
    pub name: Identifier,
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> Parse<T> for AssignStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let name = parser.expect_ident()?;
        let start = name.location.start;

        parser.expect_one(TokenKind::Assign)?;

        let value = Expression::parse(parser, None)?;
        let end = parser.skip_one(TokenKind::Semicolon)
            .map_or(value.location().end, |(_, end)| end);

        Ok(Self {
            name,
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for AssignStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {};", self.name, self.value)
    }
}

// return -> return <expression> [;]
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> Parse<T> for ReturnStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(TokenKind::Return)?;

        let value = Expression::parse(parser, None)?;
        let end = parser.skip_one(TokenKind::Semicolon)
            .map_or(value.location().end, |(_, end)| end);

        Ok(Self {
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for ReturnStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "return {};", self.value)
    }
}

// block -> { { <statement> } }
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> Parse<T> for BlockStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(TokenKind::LBrace)?;

        let mut statements = vec![];

        while !matches!(parser.current_kind(), TokenKind::RBrace | TokenKind::Eof) {
            statements.push(Statement::parse(parser, None)?);
        }

        let (_, end) = parser.expect_one(TokenKind::RBrace)?;

        Ok(Self {
            statements,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;

        for (idx, statement) in self.statements.iter().enumerate() {
            write!(f, " {statement}")?;

            // keeps `a; (b)` from reading back as the call `a(b)`
            if matches!(statement, Statement::Expression(_)) && idx + 1 < self.statements.len() {
                write!(f, ";")?;
            }
        }

        write!(f, " }}")
    }
}

// if -> if <expression> <block> [else (<if> | <block>)]
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub consequence: BlockStatement,
    pub alternative: Option<Alternative>,
    pub location: SrcSpan
}

#[derive(Debug, Clone, PartialEq)]
pub enum Alternative {
    Block(BlockStatement),
    If(Box<IfStatement>),
}

impl<T: Iterator<Item = Spanned>> Parse<T> for IfStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        ensure_sufficient_stack(|| {
            let (start, _) = parser.expect_one(TokenKind::If)?;

            let condition = Expression::parse(parser, None)?;
            let consequence = BlockStatement::parse(parser, None)?;

            let mut end = consequence.location.end;

            let alternative = match parser.skip_one(TokenKind::Else) {
                Some(_) => {
                    let alternative = match parser.current_kind() {
                        TokenKind::If => Alternative::If(Box::new(IfStatement::parse(parser, None)?)),
                        _ => Alternative::Block(BlockStatement::parse(parser, None)?)
                    };

                    end = alternative.location().end;

                    Some(alternative)
                },
                None => None
            };

            if let Some((_, semicolon_end)) = parser.skip_one(TokenKind::Semicolon) {
                end = semicolon_end;
            }

            Ok(Self {
                condition,
                consequence,
                alternative,
                location: SrcSpan { start, end }
            })
        })
    }
}

impl Display for IfStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "if {} {}", self.condition, self.consequence)?;

        match &self.alternative {
            Some(alternative) => write!(f, " else {alternative}"),
            None => Ok(())
        }
    }
}

impl Display for Alternative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Block(block) => write!(f, "{block}"),
            Self::If(if_statement) => write!(f, "{if_statement}"),
        }
    }
}

impl Alternative {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Block(block) => block.location,
            Self::If(if_statement) => if_statement.location,
        }
    }
}

// expression -> <identifier> | <primitive> | <prefix> | <infix> | <function> | <call> | "(" <expression> ")"
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Primitive(Primitive),
    Prefix(Prefix),
    Infix(Infix),
    Function(Rc<FunctionLiteral>),
    Call(Call),
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Expression {
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        ensure_sufficient_stack(|| {
            let mut expr = match parser.current_kind() {
                TokenKind::Ident => Self::Identifier(parser.expect_ident()?),
                TokenKind::Number
                | TokenKind::String
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil => Self::Primitive(Primitive::parse(parser, None)?),
                TokenKind::Bang
                | TokenKind::Minus => Self::Prefix(Prefix::parse(parser, None)?),
                TokenKind::Function => Self::Function(Rc::new(FunctionLiteral::parse(parser, None)?)),
                TokenKind::LParen => {
                    parser.expect_one(TokenKind::LParen)?;

                    let expression = Expression::parse(parser, None)?;

                    parser.expect_one(TokenKind::RParen)?;

                    expression
                },
                token => return parse_error(
                    ParseErrorType::NoPrefixParseFn { token },
                    parser.current_span()
                )
            };

            while precedence.unwrap_or(Precedence::Lowest) < parser.current_precedence() {
                expr = match parser.current_kind() {
                    TokenKind::LParen => Self::Call(Call::parse(parser, expr, precedence)?),
                    kind if kind.is_infix_operator() => Self::Infix(Infix::parse(parser, expr, precedence)?),
                    _ => break
                }
            }

            Ok(expr)
        })
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Prefix(prefix) => write!(f, "{prefix}"),
            Self::Infix(infix) => write!(f, "{infix}"),
            Self::Function(function) => write!(f, "{function}"),
            Self::Call(call) => write!(f, "{call}"),
        }
    }
}

impl Expression {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Identifier(ident) => ident.location,
            Self::Primitive(primitive) => primitive.location(),
            Self::Prefix(prefix) => prefix.location,
            Self::Infix(infix) => infix.location,
            Self::Function(function) => function.location,
            Self::Call(call) => call.location,
        }
    }

    pub fn token_literal(&self) -> String {
        match self {
            Self::Identifier(ident) => ident.value.clone(),
            Self::Primitive(primitive) => primitive.token_literal(),
            Self::Prefix(prefix) => prefix.operator.as_literal().to_string(),
            Self::Infix(infix) => infix.operator.as_literal().to_string(),
            Self::Function(_) => TokenKind::Function.as_literal().to_string(),
            Self::Call(_) => TokenKind::LParen.as_literal().to_string(),
        }
    }
}

// identifier -> (<letter> | _) { <letter> | <digit> | _ }
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<(u32, String, u32)> for Identifier {
    fn from(value: (u32, String, u32)) -> Self {
        Identifier {
            value: value.1,
            location: SrcSpan { start: value.0, end: value.2 }
        }
    }
}

// primitive -> <number> | <string> | true | false | nil
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Number {
        value: f64,
        literal: String,
        location: SrcSpan
    },
    String {
        value: String,
        location: SrcSpan
    },
    Bool {
        value: bool,
        location: SrcSpan
    },
    Nil {
        location: SrcSpan
    }
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Primitive {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, token, end) = parser.next_token();
        let location = SrcSpan { start, end };

        match token.kind {
            TokenKind::Number => match token.literal.parse::<f64>() {
                Ok(value) => Ok(Self::Number {
                    value,
                    literal: token.literal,
                    location
                }),
                Err(_) => parse_error(
                    ParseErrorType::InvalidNumber { literal: token.literal },
                    location
                )
            },
            TokenKind::String => Ok(Self::String { value: token.literal, location }),
            TokenKind::True => Ok(Self::Bool { value: true, location }),
            TokenKind::False => Ok(Self::Bool { value: false, location }),
            TokenKind::Nil => Ok(Self::Nil { location }),
            token => parse_error(ParseErrorType::NoPrefixParseFn { token }, location)
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number { literal, .. } => write!(f, "{literal}"),
            Self::String { value, .. } if value.contains('"') => write!(f, "'{value}'"),
            Self::String { value, .. } => write!(f, "\"{value}\""),
            Self::Bool { value, .. } => write!(f, "{value}"),
            Self::Nil { .. } => write!(f, "nil")
        }
    }
}

impl Primitive {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Number { location, .. }
            | Self::String { location, .. }
            | Self::Bool { location, .. }
            | Self::Nil { location } => *location
        }
    }

    pub fn token_literal(&self) -> String {
        match self {
            Self::Number { literal, .. } => literal.clone(),
            Self::String { value, .. } => value.clone(),
            Self::Bool { value, .. } => value.to_string(),
            Self::Nil { .. } => TokenKind::Nil.as_literal().to_string()
        }
    }
}

// prefix -> (! | -) <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Prefix {
    pub operator: TokenKind,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> Parse<T> for Prefix {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, token, _) = parser.next_token();

        let right = Expression::parse(parser, Some(Precedence::Prefix))?;
        let end = right.location().end;

        Ok(Self {
            operator: token.kind,
            right: Box::new(right),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}{})", self.operator.as_literal(), self.right)
    }
}

// infix -> <expression> <operator> <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Infix {
    pub left: Box<Expression>,
    pub operator: TokenKind,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> InfixParse<T> for Infix {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = parser.current_precedence();
        let (_, operator, _) = parser.next_token();

        let right = Expression::parse(parser, Some(precedence))?;
        let location = left.location().to(right.location());

        Ok(Self {
            left: Box::new(left),
            operator: operator.kind,
            right: Box::new(right),
            location
        })
    }
}

impl Display for Infix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator.as_literal(), self.right)
    }
}

// function -> fn ( [<identifier> {, <identifier>}] ) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> Parse<T> for FunctionLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(TokenKind::Function)?;
        parser.expect_one(TokenKind::LParen)?;

        let mut parameters = vec![];

        if parser.skip_one(TokenKind::RParen).is_none() {
            parameters.push(parser.expect_ident()?);

            while parser.skip_one(TokenKind::Comma).is_some() {
                parameters.push(parser.expect_ident()?);
            }

            parser.expect_one(TokenKind::RParen)?;
        }

        let body = BlockStatement::parse(parser, None)?;
        let end = body.location.end;

        Ok(Self {
            parameters,
            body,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parameters = self.parameters.iter()
            .map(|param| param.to_string())
            .collect::<Vec<String>>();

        write!(f, "fn({}) {}", parameters.join(", "), self.body)
    }
}

// call -> <expression> ( [<expression> {, <expression>}] )
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = Spanned>> InfixParse<T> for Call {
    fn parse(
        parser: &mut Parser<T>,
        callee: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        parser.expect_one(TokenKind::LParen)?;

        let mut arguments = vec![];

        let end = match parser.skip_one(TokenKind::RParen) {
            Some((_, end)) => end,
            None => {
                arguments.push(Expression::parse(parser, None)?);

                while parser.skip_one(TokenKind::Comma).is_some() {
                    arguments.push(Expression::parse(parser, None)?);
                }

                parser.expect_one(TokenKind::RParen)?.1
            }
        };

        let start = callee.location().start;

        Ok(Self {
            callee: Box::new(callee),
            arguments,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arguments = self.arguments.iter()
            .map(|argument| argument.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}({})", self.callee, arguments.join(", "))
    }
}
