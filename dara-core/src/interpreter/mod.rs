#[cfg(test)]
mod tests;

use std::path::PathBuf;

use utf8_chars::BufReadCharsExt;

use crate::{
    environment::prelude::{Env, Environment, Object},
    eval::{EvalConfig, Evaluator},
    parser::prelude::{parse_program, parse_program_from_stream, Parsed, Program},
    utils::prelude::Error
};

/// A parsed source file together with the text it came from.
#[derive(Debug)]
pub struct Module {
    pub path: PathBuf,
    pub src: String,
    pub program: Program,
}

fn checked(path: PathBuf, src: String, parsed: Parsed) -> Result<Module, Error> {
    if parsed.has_errors() {
        return Err(Error::Parse { path, src, errors: parsed.errors });
    }

    Ok(Module {
        path,
        src,
        program: parsed.program
    })
}

pub fn parse_module(path: PathBuf, src: String) -> Result<Module, Error> {
    let parsed = parse_program(&src);

    checked(path, src, parsed)
}

/// Parses a file while it is being read, keeping the text for diagnostics.
pub fn parse_module_from_file(path: PathBuf) -> Result<Module, Error> {
    let file = std::fs::File::open(&path)
        .map_err(|err| Error::StdIo { err: err.kind() })?;

    let file_size = file.metadata()
        .map_err(|err| Error::StdIo { err: err.kind() })?.len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut io_error = None;
    let mut reader = std::io::BufReader::new(file);

    let stream = reader.chars()
        .map_while(|c| match c {
            Ok(c) => {
                src.push(c);
                Some(c)
            },
            Err(err) => {
                io_error = Some(err.kind());
                None
            }
        });

    let parsed = parse_program_from_stream(stream);

    if let Some(err) = io_error {
        return Err(Error::StdIo { err });
    }

    checked(path, src, parsed)
}

/// Evaluates a checked module. An error object becomes `Error::Runtime`.
pub fn run_module(module: &Module, env: &Env, evaluator: &mut Evaluator) -> Result<Object, Error> {
    match evaluator.eval_program(&module.program, env) {
        Object::Error(message) => Err(Error::Runtime {
            path: module.path.clone(),
            message
        }),
        result => Ok(result)
    }
}

pub fn run_file(path: PathBuf, config: EvalConfig) -> Result<Object, Error> {
    let module = parse_module_from_file(path)?;

    run_module(&module, &Environment::new_env(), &mut Evaluator::new(config))
}
