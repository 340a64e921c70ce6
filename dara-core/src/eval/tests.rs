use pretty_assertions::assert_eq;

use crate::{
    environment::prelude::{Env, Environment, Object, FALSE, NIL, TRUE},
    parser::prelude::parse_program
};

use super::{eval, EvalConfig, Evaluator};

fn run_in(input: &str, env: &Env) -> Object {
    let parsed = parse_program(input);

    assert!(
        !parsed.has_errors(),
        "parser has {} errors: {:?}", parsed.errors.len(), parsed.error_messages()
    );

    eval(&parsed.program, env)
}

fn run(input: &str) -> Object {
    run_in(input, &Environment::new_env())
}

fn assert_results(tests: &[(&str, Object)]) {
    for (input, expected) in tests {
        assert_eq!(*expected, run(input), "input: {input}");
    }
}

fn assert_errors(tests: &[(&str, &str)]) {
    for (input, expected) in tests {
        assert_eq!(Object::error(*expected), run(input), "input: {input}");
    }
}

#[test]
fn test_eval_literals() {
    assert_results(&[
        ("5.4", Object::Number(5.4)),
        ("10", Object::Number(10.0)),
        (r#""hello world""#, Object::String("hello world".into())),
        ("'hello world'", Object::String("hello world".into())),
        ("true", TRUE),
        ("false", FALSE),
        ("nil", NIL),
        ("", NIL),
    ]);
}

#[test]
fn test_eval_number_expressions() {
    assert_results(&[
        ("-5", Object::Number(-5.0)),
        ("--5", Object::Number(5.0)),
        ("5 + 5 + 5 + 5 - 10", Object::Number(10.0)),
        ("2 * 2 * 2 * 2 * 2", Object::Number(32.0)),
        ("-50 + 100 + -50", Object::Number(0.0)),
        ("20 + 2 * -10", Object::Number(0.0)),
        ("2 * (5 + 10)", Object::Number(30.0)),
        ("(5 + 10 * 2 + 15 / 3) * 2 + -10", Object::Number(50.0)),
        ("7 / 2", Object::Number(3.5)),
        ("7 % 3", Object::Number(1.0)),
        ("-7 % 3", Object::Number(-1.0)),
        ("5.5 % 2", Object::Number(1.5)),
    ]);
}

#[test]
fn test_eval_boolean_expressions() {
    assert_results(&[
        ("1 < 2", TRUE),
        ("1 > 2", FALSE),
        ("2 <= 2", TRUE),
        ("3 >= 4", FALSE),
        ("1 == 1", TRUE),
        ("1 != 1", FALSE),
        ("true == true", TRUE),
        ("true != false", TRUE),
        ("(1 < 2) == true", TRUE),
        ("(1 > 2) == true", FALSE),
    ]);
}

#[test]
fn test_eval_bang_operator() {
    assert_results(&[
        ("!true", FALSE),
        ("!false", TRUE),
        ("!nil", TRUE),
        ("!5", FALSE),
        ("!0", FALSE),
        ("!!true", TRUE),
        ("!!5", TRUE),
        ("!''", FALSE),
    ]);
}

#[test]
fn test_eval_equality_across_types() {
    assert_results(&[
        ("1 == '1'", FALSE),
        ("1 != '1'", TRUE),
        ("nil == nil", TRUE),
        ("nil == false", FALSE),
        ("'a' == 'a'", TRUE),
        ("'a' != \"a\"", FALSE),
        ("f := fn() {}; f == f", TRUE),
        ("fn() {} == fn() {}", FALSE),
    ]);
}

#[test]
fn test_eval_string_concatenation() {
    assert_results(&[
        (r#""Hello" + " " + "World!""#, Object::String("Hello World!".into())),
        ("greet := fn(name) { 'hi ' + name }; greet('bob')", Object::String("hi bob".into())),
    ]);
}

#[test]
fn test_eval_logical_operators() {
    assert_results(&[
        ("true && true", TRUE),
        ("true && false", FALSE),
        ("false || true", TRUE),
        ("false || nil", FALSE),
        ("1 && 'a'", TRUE),
        ("1 && nil", FALSE),
        ("nil || 'a'", TRUE),
        // the right operand is never evaluated here
        ("false && undefined", FALSE),
        ("nil && undefined()", FALSE),
        ("true || undefined", TRUE),
        ("0 || 1 / 0", TRUE),
    ]);

    assert_errors(&[
        ("true && undefined", "identifier not found: undefined"),
        ("false || 1 / 0", "division by zero"),
    ]);
}

#[test]
fn test_eval_if_statements() {
    assert_results(&[
        ("if (true) { 10 }", Object::Number(10.0)),
        ("if (false) { 10 }", NIL),
        ("if 1 { 10 }", Object::Number(10.0)),
        ("if 0 { 10 }", Object::Number(10.0)),
        ("if nil { 10 } else { 20 }", Object::Number(20.0)),
        ("if (1 < 2) { 10 } else { 20 }", Object::Number(10.0)),
        ("if (1 > 2) { 10 } else { 20 }", Object::Number(20.0)),
        ("x := 3; if x < 2 { 1 } else if x < 4 { 2 } else { 3 }", Object::Number(2.0)),
        ("x := 9; if x < 2 { 1 } else if x < 4 { 2 } else { 3 }", Object::Number(3.0)),
        ("x := 9; if x < 2 { 1 } else if x < 4 { 2 }", NIL),
        ("if true { }", NIL),
    ]);
}

#[test]
fn test_if_does_not_open_a_scope() {
    assert_results(&[
        ("x := 1; if true { x = 2 }; x", Object::Number(2.0)),
        ("if true { y := 3 } y", Object::Number(3.0)),
    ]);
}

#[test]
fn test_eval_block_statements() {
    assert_results(&[
        ("{ a := 2; a * 3 }", Object::Number(6.0)),
        ("{ }", NIL),
        ("{ x := 1 }; x", Object::Number(1.0)),
        ("x := 1; { x = 2; }; x", Object::Number(2.0)),
        ("{ return 4; 5 }; 6", Object::Number(4.0)),
        ("f := fn() { { return 1; } 2 }; f()", Object::Number(1.0)),
    ]);

    assert_errors(&[
        ("{ 1 + nil; 2 }; 3", "type mismatch: NUMBER + NIL"),
    ]);
}

#[test]
fn test_eval_return_statements() {
    assert_results(&[
        ("return 10;", Object::Number(10.0)),
        ("return 10; 9;", Object::Number(10.0)),
        ("return 2 * 5; 9;", Object::Number(10.0)),
        ("9; return 2 * 5; 9;", Object::Number(10.0)),
        ("if (10 > 1) { if (10 > 1) { return 10; } return 1; }", Object::Number(10.0)),
        ("f := fn(x) { return x; x + 10; }; f(10);", Object::Number(10.0)),
        ("f := fn(x) { x * 2 }; f(4)", Object::Number(8.0)),
        (
            "f := fn(x) { result := x + 10; return result; return 10; }; f(10);",
            Object::Number(20.0)
        ),
    ]);
}

#[test]
fn test_return_stops_at_call_boundary() {
    let input = "
        inner := fn() { return 1; };
        outer := fn() { inner(); 2 };
        outer()
    ";

    assert_eq!(Object::Number(2.0), run(input));
}

#[test]
fn test_eval_declare_and_assign() {
    assert_results(&[
        ("a := 5; a;", Object::Number(5.0)),
        ("a := 5 * 5; a;", Object::Number(25.0)),
        ("a := 5; b := a; b;", Object::Number(5.0)),
        ("a := 5; b := a; c := a + b + 5; c;", Object::Number(15.0)),
        ("let a = 5; a = a + 1; a", Object::Number(6.0)),
        ("a := 5", Object::Number(5.0)),
        ("a = 'x'", Object::String("x".into())),
    ]);
}

#[test]
fn test_assignment_in_call_shadows_outer_binding() {
    let env = Environment::new_env();

    run_in("x := 1; fn() { x = 2; }();", &env);

    assert_eq!(Some(Object::Number(1.0)), env.borrow().get("x"));
    assert_eq!(Object::Number(1.0), run("x := 1; fn() { x = 2; }(); x"));
}

#[test]
fn test_eval_function_object() {
    let result = run("fn(x) { x + 2; };");

    match &result {
        Object::Function(function) => {
            assert_eq!(1, function.literal.parameters.len());
            assert_eq!("x", function.literal.parameters[0].value);
            assert_eq!("{ (x + 2) }", function.literal.body.to_string());
        },
        other => panic!("object is not a function. got={other:?}"),
    }

    assert_eq!("fn(x) { (x + 2) }", result.describe());
}

#[test]
fn test_eval_function_application() {
    assert_results(&[
        ("identity := fn(x) { x; }; identity(5);", Object::Number(5.0)),
        ("identity := fn(x) { return x; }; identity(5);", Object::Number(5.0)),
        ("double := fn(x) { x * 2; }; double(5);", Object::Number(10.0)),
        ("add := fn(x, y) { x + y; }; add(5, 5);", Object::Number(10.0)),
        ("add := fn(x, y) { x + y; }; add(5 + 5, add(5, 5));", Object::Number(20.0)),
        ("fn(x) { x; }(5)", Object::Number(5.0)),
        ("fn() {}()", NIL),
    ]);
}

#[test]
fn test_eval_closures() {
    let input = "
        newAdder := fn(x) {
            fn(y) { x + y };
        };

        addTwo := newAdder(2);
        addTwo(3);
    ";

    assert_eq!(Object::Number(5.0), run(input));

    let input = "
        counter := fn(start) {
            fn() { start = start + 1; start }
        };

        c := counter(10);
        c();
        c()
    ";

    // each call assigns in its own scope, the captured `start` stays 10
    assert_eq!(Object::Number(11.0), run(input));
}

#[test]
fn test_closure_sees_later_bindings_of_its_scope() {
    let input = "
        get := fn() { late };
        late := 'bound after';
        get()
    ";

    assert_eq!(Object::String("bound after".into()), run(input));
}

#[test]
fn test_recursion() {
    let input = "
        fib := fn(n) {
            if n < 2 { return n; }
            fib(n - 1) + fib(n - 2)
        };
        fib(15)
    ";

    assert_eq!(Object::Number(610.0), run(input));
}

#[test]
fn test_error_handling() {
    assert_errors(&[
        ("5 + true;", "type mismatch: NUMBER + BOOLEAN"),
        ("5 + true; 5;", "type mismatch: NUMBER + BOOLEAN"),
        ("nil < 1", "type mismatch: NIL < NUMBER"),
        ("'a' * 2", "type mismatch: STRING * NUMBER"),
        ("-true", "unknown operator: -BOOLEAN"),
        ("-'a'", "unknown operator: -STRING"),
        ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
        ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
        ("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN"),
        (r#""Hello" - "World""#, "unknown operator: STRING - STRING"),
        ("nil + nil", "unknown operator: NIL + NIL"),
        (
            "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
            "unknown operator: BOOLEAN + BOOLEAN"
        ),
        ("foobar", "identifier not found: foobar"),
        ("if foobar { 1 }", "identifier not found: foobar"),
        ("f := fn(x) { x }; f(a, b)", "identifier not found: a"),
        ("-(1 + nil)", "type mismatch: NUMBER + NIL"),
        ("!missing", "identifier not found: missing"),
    ]);
}

#[test]
fn test_division_and_modulo_by_zero() {
    assert_errors(&[
        ("1 / 0", "division by zero"),
        ("0 / 0", "division by zero"),
        ("5 % 0", "modulo by zero"),
        ("x := 10; y := x - 10; x / y", "division by zero"),
        ("(1 / 0) + 1", "division by zero"),
    ]);
}

#[test]
fn test_call_errors() {
    assert_errors(&[
        ("5(1)", "not a function: NUMBER"),
        ("nil()", "not a function: NIL"),
        ("'f'()", "not a function: STRING"),
        ("fn(x) { x }()", "wrong number of arguments: want=1, got=0"),
        ("add := fn(a, b) { a + b }; add(1, 2, 3)", "wrong number of arguments: want=2, got=3"),
        ("f := fn() { 1 + nil }; f() + 1", "type mismatch: NUMBER + NIL"),
        ("f := fn() { missing }; g := fn() { f() }; g()", "identifier not found: missing"),
    ]);
}

#[test]
fn test_error_stops_declaration() {
    let env = Environment::new_env();

    assert_eq!(Object::error("identifier not found: foo"), run_in("x := foo; y := 1", &env));
    assert_eq!(None, env.borrow().get("x"));
    assert_eq!(None, env.borrow().get("y"));
}

#[test]
fn test_call_depth_limit() {
    let parsed = parse_program("f := fn(n) { f(n + 1) }; f(0)");
    let mut evaluator = Evaluator::new(EvalConfig { max_call_depth: 50 });

    assert_eq!(
        Object::error("maximum call depth of 50 exceeded"),
        evaluator.eval_program(&parsed.program, &Environment::new_env())
    );

    // the evaluator is usable again after unwinding
    let parsed = parse_program("g := fn(n) { if n == 0 { return 0; } g(n - 1) }; g(49)");

    assert_eq!(
        Object::Number(0.0),
        evaluator.eval_program(&parsed.program, &Environment::new_env())
    );
}

#[test]
fn test_unbounded_recursion_with_default_limit() {
    assert_errors(&[
        ("loop := fn() { loop() }; loop()", "maximum call depth of 10000 exceeded"),
    ]);
}

#[test]
fn test_persistent_environment_across_programs() {
    let env = Environment::new_env();

    run_in("add := fn(a, b) { a + b };", &env);
    run_in("x := add(1, 2);", &env);

    assert_eq!(Object::Number(6.0), run_in("add(x, 3)", &env));
}
