use std::path::PathBuf;

use pretty_assertions::assert_eq;

use crate::{
    environment::prelude::{Environment, Object},
    eval::{EvalConfig, Evaluator},
    parser::prelude::ParseErrorType,
    lexer::prelude::TokenKind,
    utils::prelude::Error
};

use super::{parse_module, parse_module_from_file, run_file, run_module};

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("dara-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).expect("write temp source");
    path
}

#[test]
fn test_parse_module_reports_all_errors() {
    let src = "x := ;\ny := (1 + 2;\nz := 3;";

    match parse_module(PathBuf::from("test.dara"), src.to_string()) {
        Err(Error::Parse { path, src: kept, errors }) => {
            assert_eq!(PathBuf::from("test.dara"), path);
            assert_eq!(src, kept);
            assert_eq!(
                vec![
                    ParseErrorType::NoPrefixParseFn { token: TokenKind::Semicolon },
                    ParseErrorType::UnexpectedToken { expected: TokenKind::RParen, got: TokenKind::Semicolon },
                ],
                errors.into_iter().map(|err| err.error).collect::<Vec<_>>()
            );
        },
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_parse_error_diagnostics() {
    let err = parse_module(PathBuf::from("test.dara"), "add(1, 2".to_string())
        .expect_err("missing paren");

    let rendered = err.pretty_string();

    assert!(rendered.contains("Syntax error"), "{rendered}");
    assert!(rendered.contains("test.dara"), "{rendered}");
    assert!(rendered.contains("Expected `)`"), "{rendered}");
    assert!(rendered.contains("Found the end of input instead"), "{rendered}");
}

#[test]
fn test_run_module_reports_runtime_errors() {
    let module = parse_module(PathBuf::from("main.dara"), "x := 1; x / 0".to_string())
        .expect("valid source");

    let result = run_module(&module, &Environment::new_env(), &mut Evaluator::default());

    assert_eq!(
        Err(Error::Runtime { path: PathBuf::from("main.dara"), message: "division by zero".into() }),
        result.map(|object| object.describe())
    );
}

#[test]
fn test_run_file() {
    let path = write_temp("fib.dara", "
        // naive fibonacci
        fib := fn(n) {
            if n < 2 { return n; }
            fib(n - 1) + fib(n - 2)
        };

        /* 'ß' keeps the reader honest about multi-byte input */
        label := 'ß';
        fib(10)
    ");

    let result = run_file(path.clone(), EvalConfig::default());
    let _ = std::fs::remove_file(path);

    assert_eq!(Ok(Object::Number(55.0)), result.map_err(|err| err.to_string()));
}

#[test]
fn test_parse_module_from_file_keeps_source() {
    let src = "greeting := 'héllo';\ngreeting + '!'";
    let path = write_temp("greeting.dara", src);

    let module = parse_module_from_file(path.clone());
    let _ = std::fs::remove_file(path);

    let module = module.expect("valid source");

    assert_eq!(src, module.src);
    assert_eq!(2, module.program.statements.len());
    assert_eq!(src.len() as u32, module.program.location.end);
}

#[test]
fn test_missing_file() {
    let path = std::env::temp_dir().join("dara-file-that-does-not-exist.dara");

    assert_eq!(
        Err(Error::StdIo { err: std::io::ErrorKind::NotFound }),
        run_file(path, EvalConfig::default()).map(|object| object.describe())
    );
}
