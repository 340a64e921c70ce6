#[cfg(test)]
mod tests;

use std::rc::Rc;

use crate::{
    environment::prelude::{Env, Environment, Function, Object, FALSE, NIL, TRUE},
    lexer::prelude::TokenKind,
    parser::prelude::{
        Alternative, BlockStatement, Call, Expression, IfStatement, Infix, Prefix, Primitive,
        Program, Statement
    },
    utils::prelude::ensure_sufficient_stack
};

pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// Active function calls allowed before evaluation fails.
    pub max_call_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH
        }
    }
}

/// Evaluates `program` in `env` with the default configuration.
pub fn eval(program: &Program, env: &Env) -> Object {
    Evaluator::new(EvalConfig::default()).eval_program(program, env)
}

#[derive(Debug, Default)]
pub struct Evaluator {
    config: EvalConfig,
    depth: usize,
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self {
            config,
            depth: 0
        }
    }

    /// Runs every statement in order. A `return` ends the program with its
    /// value; an error ends it with the error.
    pub fn eval_program(&mut self, program: &Program, env: &Env) -> Object {
        let mut result = NIL;

        for statement in &program.statements {
            result = self.eval_statement(statement, env);

            match result {
                Object::Return(value) => return *value,
                Object::Error(_) => return result,
                _ => {}
            }
        }

        result
    }

    pub fn eval_statement(&mut self, statement: &Statement, env: &Env) -> Object {
        match statement {
            Statement::Expression(statement) => self.eval_expression(&statement.expression, env),
            Statement::Declare(statement) => {
                let value = self.eval_expression(&statement.value, env);
                if value.is_error() {
                    return value;
                }

                env.borrow_mut().set(statement.name.value.as_str(), value)
            },
            Statement::Assign(statement) => {
                let value = self.eval_expression(&statement.value, env);
                if value.is_error() {
                    return value;
                }

                // always the current scope, an outer binding is shadowed
                env.borrow_mut().set(statement.name.value.as_str(), value)
            },
            Statement::Return(statement) => {
                let value = self.eval_expression(&statement.value, env);
                if value.is_error() {
                    return value;
                }

                Object::Return(Box::new(value))
            },
            Statement::Block(block) => self.eval_block(block, env),
            Statement::If(statement) => self.eval_if(statement, env),
        }
    }

    /// Value of the last statement; `return` and errors stop the block and
    /// travel up unchanged.
    pub fn eval_block(&mut self, block: &BlockStatement, env: &Env) -> Object {
        let mut result = NIL;

        for statement in &block.statements {
            result = self.eval_statement(statement, env);

            if matches!(result, Object::Return(_) | Object::Error(_)) {
                return result;
            }
        }

        result
    }

    fn eval_if(&mut self, statement: &IfStatement, env: &Env) -> Object {
        ensure_sufficient_stack(|| {
            let condition = self.eval_expression(&statement.condition, env);
            if condition.is_error() {
                return condition;
            }

            if condition.is_truthy() {
                return self.eval_block(&statement.consequence, env);
            }

            match &statement.alternative {
                Some(Alternative::Block(block)) => self.eval_block(block, env),
                Some(Alternative::If(statement)) => self.eval_if(statement, env),
                None => NIL
            }
        })
    }

    pub fn eval_expression(&mut self, expression: &Expression, env: &Env) -> Object {
        ensure_sufficient_stack(|| {
            match expression {
                Expression::Identifier(ident) => match env.borrow().get(&ident.value) {
                    Some(value) => value,
                    None => Object::error(format!("identifier not found: {}", ident.value))
                },
                Expression::Primitive(primitive) => match primitive {
                    Primitive::Number { value, .. } => Object::Number(*value),
                    Primitive::String { value, .. } => Object::String(value.clone()),
                    Primitive::Bool { value, .. } => Object::from(*value),
                    Primitive::Nil { .. } => NIL
                },
                Expression::Prefix(prefix) => self.eval_prefix(prefix, env),
                Expression::Infix(infix) => self.eval_infix(infix, env),
                Expression::Function(literal) => Object::Function(Rc::new(Function {
                    literal: Rc::clone(literal),
                    env: Rc::clone(env)
                })),
                Expression::Call(call) => self.eval_call(call, env),
            }
        })
    }

    fn eval_prefix(&mut self, prefix: &Prefix, env: &Env) -> Object {
        let right = self.eval_expression(&prefix.right, env);
        if right.is_error() {
            return right;
        }

        match (prefix.operator, right) {
            (TokenKind::Bang, right) => Object::from(!right.is_truthy()),
            (TokenKind::Minus, Object::Number(value)) => Object::Number(-value),
            (operator, right) => Object::error(format!(
                "unknown operator: {}{}", operator.as_literal(), right.type_name()
            ))
        }
    }

    fn eval_infix(&mut self, infix: &Infix, env: &Env) -> Object {
        let left = self.eval_expression(&infix.left, env);
        if left.is_error() {
            return left;
        }

        match infix.operator {
            TokenKind::And if !left.is_truthy() => return FALSE,
            TokenKind::Or if left.is_truthy() => return TRUE,
            _ => {}
        }

        let right = self.eval_expression(&infix.right, env);
        if right.is_error() {
            return right;
        }

        match infix.operator {
            TokenKind::And | TokenKind::Or => Object::from(right.is_truthy()),
            operator => infix_operation(operator, left, right)
        }
    }

    fn eval_call(&mut self, call: &Call, env: &Env) -> Object {
        let callee = self.eval_expression(&call.callee, env);
        if callee.is_error() {
            return callee;
        }

        let mut arguments = Vec::with_capacity(call.arguments.len());

        for argument in &call.arguments {
            let value = self.eval_expression(argument, env);
            if value.is_error() {
                return value;
            }

            arguments.push(value);
        }

        let function = match callee {
            Object::Function(function) => function,
            other => return Object::error(format!("not a function: {}", other.type_name()))
        };

        self.apply_function(&function, arguments)
    }

    fn apply_function(&mut self, function: &Function, arguments: Vec<Object>) -> Object {
        let parameters = &function.literal.parameters;

        if parameters.len() != arguments.len() {
            return Object::error(format!(
                "wrong number of arguments: want={}, got={}", parameters.len(), arguments.len()
            ));
        }

        if self.depth >= self.config.max_call_depth {
            tracing::debug!(depth = self.depth, "call depth limit reached");

            return Object::error(format!(
                "maximum call depth of {} exceeded", self.config.max_call_depth
            ));
        }

        let _span = tracing::trace_span!("call", depth = self.depth, arity = arguments.len()).entered();

        let call_env = Environment::new_enclosed(&function.env);

        {
            let mut call_env = call_env.borrow_mut();

            for (param, argument) in parameters.iter().zip(arguments) {
                call_env.set(param.value.as_str(), argument);
            }
        }

        self.depth += 1;
        let result = self.eval_block(&function.literal.body, &call_env);
        self.depth -= 1;

        match result {
            Object::Return(value) => *value,
            result => result
        }
    }
}

fn infix_operation(operator: TokenKind, left: Object, right: Object) -> Object {
    match (left, right) {
        (Object::Number(left), Object::Number(right)) => number_operation(operator, left, right),
        (Object::String(left), Object::String(right)) if operator == TokenKind::Plus => {
            Object::String(left + &right)
        },
        (left, right) => match operator {
            TokenKind::Equal => Object::from(left == right),
            TokenKind::NotEqual => Object::from(left != right),
            _ if left.type_name() != right.type_name() => Object::error(format!(
                "type mismatch: {} {} {}", left.type_name(), operator.as_literal(), right.type_name()
            )),
            _ => Object::error(format!(
                "unknown operator: {} {} {}", left.type_name(), operator.as_literal(), right.type_name()
            )),
        }
    }
}

fn number_operation(operator: TokenKind, left: f64, right: f64) -> Object {
    match operator {
        TokenKind::Plus => Object::Number(left + right),
        TokenKind::Minus => Object::Number(left - right),
        TokenKind::Asterisk => Object::Number(left * right),
        TokenKind::Slash if right == 0.0 => Object::error("division by zero"),
        TokenKind::Slash => Object::Number(left / right),
        TokenKind::Percent if right == 0.0 => Object::error("modulo by zero"),
        TokenKind::Percent => Object::Number(left % right),
        TokenKind::LessThan => Object::from(left < right),
        TokenKind::GreaterThan => Object::from(left > right),
        TokenKind::LessThanOrEqual => Object::from(left <= right),
        TokenKind::GreaterThanOrEqual => Object::from(left >= right),
        TokenKind::Equal => Object::from(left == right),
        TokenKind::NotEqual => Object::from(left != right),
        _ => Object::error(format!("unknown operator: NUMBER {} NUMBER", operator.as_literal())),
    }
}
