//! Unit tests for the parser module.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::parser::parse;
use crate::{
    ast::{
        ast::{File, FunctionState, Stmt},
        types::{Primitive, Type},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
};

fn parse_source(source: &str) -> Result<File, Error> {
    let tokens = tokenize(source.to_string(), Some("test.jay".to_string()))?;
    parse(tokens, Rc::new("test.jay".to_string()))
}

fn body_of<'a>(file: &'a File, name: &str) -> &'a [Stmt] {
    &file.get(name).unwrap().body
}

#[test]
fn test_parse_main_function() {
    let source = "i32 main(i32 argc, i8** argv) { i32 x = 4  i32 y = 12  i32 z = x + y  return 0 }";
    let file = parse_source(source).unwrap();

    let main = file.get("main").unwrap();
    assert_eq!(main.state, FunctionState::Parsed);
    assert!(!main.is_foreign());
    assert_eq!(main.params.len(), 2);
    assert_eq!(main.params[1].ty.to_string(), "i8**");
    assert_eq!(main.params[1].name.as_deref(), Some("argv"));

    assert_eq!(
        main.to_string(),
        "i32 main(i32 argc, i8** argv) {\n    i32 x = 4\n    i32 y = 12\n    i32 z = (x + y)\n    return 0\n}"
    );
}

#[test]
fn test_parse_foreign_variadic_declaration() {
    let file = parse_source("@foreign i32 printf(i8*, ...)").unwrap();

    let printf = file.get("printf").unwrap();
    assert!(printf.is_foreign());
    assert!(printf.is_variadic());
    assert_eq!(printf.return_type, Type::Primitive(Primitive::I32));
    assert_eq!(printf.params[0].ty, Type::string());
    assert_eq!(printf.params[1].ty, Type::Variadic);
    assert_eq!(printf.fixed_params().len(), 1);
    assert_eq!(printf.to_string(), "@foreign i32 printf(i8*, ...)");
}

#[test]
fn test_parse_foreign_without_params() {
    let file = parse_source("@foreign void abort()").unwrap();

    let abort = file.get("abort").unwrap();
    assert!(abort.is_foreign());
    assert!(!abort.is_variadic());
    assert!(abort.return_type.is_void());
}

#[test]
fn test_empty_user_function_is_not_foreign() {
    let file = parse_source("void noop() { }").unwrap();

    assert!(!file.get("noop").unwrap().is_foreign());
}

#[test]
fn test_parse_call_statement() {
    let source = "@foreign i32 printf(i8*, ...)\ni32 main() { printf(\"hi\", 1) return 0 }";
    let file = parse_source(source).unwrap();

    let body = body_of(&file, "main");
    assert_eq!(body.len(), 2);
    match &body[0] {
        Stmt::Call(expr) => {
            assert!(expr.is_call());
            assert_eq!(expr.to_string(), "printf(\"hi\", 1)");
        }
        other => panic!("Expected call statement, got {:?}", other),
    }
}

#[test]
fn test_sequence_stops_at_next_statement() {
    let source = "void f() { i32 x = y  g(x)  i32 z = x * 2  g(z) }";
    let file = parse_source(source).unwrap();

    let body = body_of(&file, "f");
    assert_eq!(body.len(), 4);
    assert_eq!(body[0].to_string(), "i32 x = y");
    assert_eq!(body[1].to_string(), "g(x)");
    assert_eq!(body[2].to_string(), "i32 z = (x * 2)");
    assert_eq!(body[3].to_string(), "g(z)");
}

#[test]
fn test_call_initializer_followed_by_call_statement() {
    let source = "@foreign i32 random()\n\
                  @foreign i32 printf(i8*, ...)\n\
                  i32 main() { i32 value = random()  printf(\"%d\", value)  return 0 }";
    let file = parse_source(source).unwrap();

    let body = body_of(&file, "main");
    assert_eq!(body.len(), 3);
    assert_eq!(body[0].to_string(), "i32 value = random()");
    match &body[1] {
        Stmt::Call(expr) => assert_eq!(expr.to_string(), "printf(\"%d\", value)"),
        other => panic!("Expected call statement, got {:?}", other),
    }
    assert_eq!(body[2].to_string(), "return 0");
}

#[test]
fn test_call_with_arguments_followed_by_call_statement() {
    let file = parse_source("void f() { i32 r = f(1, 2 + 3)  g(r) }").unwrap();

    let body = body_of(&file, "f");
    assert_eq!(body.len(), 2);
    assert_eq!(body[0].to_string(), "i32 r = f(1, (2 + 3))");
    assert_eq!(body[1].to_string(), "g(r)");
}

#[test]
fn test_sequences_stay_flat() {
    let file = parse_source("i32 f() { i32 x = 1 + 2 * 3 - 4  return x }").unwrap();

    assert_eq!(body_of(&file, "f")[0].to_string(), "i32 x = (1 + 2 * 3 - 4)");
}

#[test]
fn test_call_arguments_are_independent_sequences() {
    let file = parse_source("i32 f() { i32 r = add(1 + 2, 0x3) * 4  return r }").unwrap();

    assert_eq!(body_of(&file, "f")[0].to_string(), "i32 r = (add((1 + 2), 0x3) * 4)");
}

#[test]
fn test_return_sequence() {
    let file = parse_source("i32 add(i32 a, i32 b) { return a + b }").unwrap();

    assert_eq!(body_of(&file, "add")[0].to_string(), "return (a + b)");
}

#[test]
fn test_bare_return_before_close() {
    let file = parse_source("void f() { return }").unwrap();

    match &body_of(&file, "f")[0] {
        Stmt::Return(ret) => assert!(ret.value.is_none()),
        other => panic!("Expected return, got {:?}", other),
    }
}

#[test]
fn test_functions_keep_declaration_order() {
    let source = "i32 b() { return 1 }\n@foreign i32 puts(i8*)\ni32 a() { return 2 }";
    let file = parse_source(source).unwrap();

    let names: Vec<&str> = file.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["b", "puts", "a"]);
    assert_eq!(file.foreign_functions().count(), 1);
    assert_eq!(file.user_functions().count(), 2);
}

#[test]
fn test_duplicate_function_is_rejected() {
    let error = parse_source("i32 f() { return 1 }\ni32 f() { return 2 }").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::FunctionAlreadyDeclared {
            function: "f".to_string()
        }
    );
    assert_eq!(error.get_position().0, 21);
}

#[test]
fn test_control_flow_is_rejected() {
    let error = parse_source("i32 f() { if x { } return 0 }").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedToken {
            token: "if".to_string()
        }
    );
}

#[test]
fn test_unexpected_top_level_token() {
    let error = parse_source("return 0").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.get_position().0, 0);
}

#[test]
fn test_eof_in_initializer() {
    let error = parse_source("i32 main() { i32 x =").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedEof {
            expected: "expression".to_string()
        }
    );
}

#[test]
fn test_eof_before_closing_curly() {
    let error = parse_source("i32 main() { return 0").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedEof {
            expected: "CloseCurly".to_string()
        }
    );
}

#[test]
fn test_eof_in_type() {
    let error = parse_source("@foreign").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedEof {
            expected: "type".to_string()
        }
    );
}

#[test]
fn test_bare_identifier_statement_is_rejected() {
    let error = parse_source("void f() { x }").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_missing_parameter_name() {
    let error = parse_source("i32 f(i32) { return 0 }").unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(error.get_position().0, 9);
}

#[test]
fn test_empty_source() {
    let file = parse_source("// nothing here\n").unwrap();

    assert!(file.functions.is_empty());
}
