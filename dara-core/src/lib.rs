pub mod lexer;
pub mod parser;
pub mod environment;
pub mod eval;
pub mod interpreter;
pub mod utils;

pub use environment::prelude::{Env, Environment, Object};
pub use eval::{eval, EvalConfig, Evaluator};
pub use lexer::prelude::lex;
pub use parser::prelude::{parse_program, parse_tokens};
