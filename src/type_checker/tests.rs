//! Unit tests for semantic analysis and precedence resolution.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::{sequence::resolve_sequence, type_checker::type_check};
use crate::{
    ast::{
        ast::{File, FunctionState, Stmt},
        expressions::ExprKind,
        types::{Primitive, Type},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

fn parse_source(source: &str) -> File {
    let tokens = tokenize(source.to_string(), Some("test.jay".to_string())).unwrap();
    parse(tokens, Rc::new("test.jay".to_string())).unwrap()
}

fn check_source(source: &str) -> Result<File, Error> {
    let mut file = parse_source(source);
    type_check(&mut file)?;
    Ok(file)
}

fn first_initializer(file: &File, function: &str) -> String {
    match &file.get(function).unwrap().body[0] {
        Stmt::Variable(variable) => variable.value.to_string(),
        other => panic!("Expected variable declaration, got {:?}", other),
    }
}

const QUAD: &str = "i32 f(i32 a, i32 b, i32 c, i32 d) { i32 x = ";
const QUAD_END: &str = "  return x }";

fn resolve(expression: &str) -> String {
    let file = check_source(&format!("{}{}{}", QUAD, expression, QUAD_END)).unwrap();
    first_initializer(&file, "f")
}

#[test]
fn test_tighter_operator_on_the_right_is_grouped() {
    assert_eq!(resolve("a + b * c"), "(a + (b * c))");
}

#[test]
fn test_two_products_are_grouped() {
    assert_eq!(resolve("a * b + c * d"), "((a * b) + (c * d))");
}

#[test]
fn test_same_tier_chain_stays_in_one_group() {
    assert_eq!(resolve("a - b * c * d"), "(a - (b * c * d))");
    assert_eq!(resolve("a - b - c * d"), "(a - b - (c * d))");
}

#[test]
fn test_product_between_sums() {
    assert_eq!(resolve("a + b * c + d"), "(a + (b * c) + d)");
}

#[test]
fn test_sequences_in_evaluation_order_are_untouched() {
    assert_eq!(resolve("a * b + c"), "(a * b + c)");
    assert_eq!(resolve("a - b + c"), "(a - b + c)");
    assert_eq!(resolve("a / b"), "(a / b)");
}

#[test]
fn test_resolved_groups_are_typed() {
    let file = check_source(&format!("{}{}{}", QUAD, "a + b * c", QUAD_END)).unwrap();

    let Stmt::Variable(variable) = &file.get("f").unwrap().body[0] else {
        panic!("Expected variable declaration");
    };
    assert_eq!(variable.value.ty, Some(Type::Primitive(Primitive::I32)));

    let ExprKind::Sequence(elements) = &variable.value.kind else {
        panic!("Expected sequence");
    };
    assert_eq!(elements.len(), 3);
    for element in elements {
        assert_eq!(element.ty, Some(Type::Primitive(Primitive::I32)));
    }
}

#[test]
fn test_literals_take_the_declared_integer_type() {
    let file = check_source("i64 f() { i64 x = 1 + 2  return x }").unwrap();

    let Stmt::Variable(variable) = &file.get("f").unwrap().body[0] else {
        panic!("Expected variable declaration");
    };
    let ExprKind::Sequence(elements) = &variable.value.kind else {
        panic!("Expected sequence");
    };
    assert_eq!(elements[0].ty, Some(Type::Primitive(Primitive::I64)));
    assert_eq!(elements[2].ty, Some(Type::Primitive(Primitive::I64)));
}

#[test]
fn test_literals_must_fit_their_type() {
    assert!(check_source("i8 f() { i8 x = 127  return x }").is_ok());
    assert!(check_source("i64 f() { i64 x = 0x7FFFFFFFFFFFFFFF  return x }").is_ok());

    let error = check_source("i8 f() { i8 x = 300  return x }").unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::IntegerOutOfRange {
            literal: "300".to_string(),
            type_: "i8".to_string(),
        }
    );
    assert_eq!(error.get_position().0, 16);

    let error = check_source("i8 f() { i8 x = 0b10000000  return x }").unwrap_err();
    assert_eq!(error.get_error_name(), "IntegerOutOfRange");
    assert_eq!(error.get_tip().to_string(), "Literal `0b10000000` does not fit in `i8`");

    let error = check_source("i32 f() { i32 x = 99999999999  return x }").unwrap_err();
    assert_eq!(error.get_error_name(), "IntegerOutOfRange");
}

#[test]
fn test_untyped_literals_must_fit_i32() {
    let source = "@foreign i32 printf(i8*, ...)\ni32 main() { printf(\"%d\", 3000000000)  return 0 }";
    let error = check_source(source).unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::IntegerOutOfRange {
            literal: "3000000000".to_string(),
            type_: "i32".to_string(),
        }
    );
}

#[test]
fn test_typed_display() {
    let file = check_source("i32 main() { i32 x = 4  return x }").unwrap();

    assert_eq!(
        format!("{:#}", file.get("main").unwrap()),
        "i32 main() {\n    i32 x = 4 : i32\n    return x : i32\n}"
    );
}

#[test]
fn test_functions_advance_to_checked() {
    let file = check_source("@foreign i32 puts(i8*)\ni32 main() { return 0 }").unwrap();

    assert!(file.functions.iter().all(|f| f.state == FunctionState::Checked));
}

#[test]
fn test_checking_twice_is_a_stage_error() {
    let mut file = parse_source("i32 main() { return 0 }");
    type_check(&mut file).unwrap();

    let error = type_check(&mut file).unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::InvalidStage {
            function: "main".to_string(),
            expected: "parsed".to_string(),
            found: "checked".to_string(),
        }
    );
}

#[test]
fn test_reference_before_declaration() {
    let error = check_source("i32 main() { i32 x = y  i32 y = 1  return x }").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UndeclaredReference {
            name: "y".to_string()
        }
    );
    assert_eq!(error.get_position().0, 21);
}

#[test]
fn test_calls_resolve_across_the_file() {
    let source = "i32 main() { i32 x = later(1)  return x }\ni32 later(i32 n) { return n }";

    assert!(check_source(source).is_ok());
}

#[test]
fn test_undeclared_function() {
    let error = check_source("i32 main() { missing()  return 0 }").unwrap_err();

    assert_eq!(error.get_error_name(), "UndeclaredReference");
}

#[test]
fn test_variadic_extra_arguments_keep_their_type() {
    let source = "@foreign i32 printf(i8*, ...)\ni32 main() { i32 x = 3  printf(\"%d %d\", x, 0x10)  return 0 }";
    let file = check_source(source).unwrap();

    let Stmt::Call(call) = &file.get("main").unwrap().body[1] else {
        panic!("Expected call statement");
    };
    let ExprKind::DeclRef { args, .. } = &call.kind else {
        panic!("Expected call");
    };
    assert_eq!(args[0].ty, Some(Type::string()));
    assert_eq!(args[1].ty, Some(Type::Primitive(Primitive::I32)));
    assert_eq!(args[2].ty, Some(Type::Primitive(Primitive::I32)));
    assert_eq!(call.ty, Some(Type::Primitive(Primitive::I32)));
}

#[test]
fn test_argument_type_mismatch() {
    let source = "@foreign i32 printf(i8*, ...)\ni32 main() { printf(1)  return 0 }";
    let error = check_source(source).unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeMatchError {
            decl: "argument 1 of printf".to_string(),
            expected: "i8*".to_string(),
            received: "i32".to_string(),
        }
    );
}

#[test]
fn test_void_arguments_are_rejected() {
    let source = "@foreign i32 printf(i8*, ...)\nvoid nothing() { }\ni32 main() { printf(\"%d\", nothing())  return 0 }";
    let error = check_source(source).unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::VoidValue {
            decl: "argument 2 of printf".to_string()
        }
    );

    let source = "@foreign i32 printf(i8*, ...)\nvoid nothing() { }\ni32 main() { printf(\"%d\", nothing() + nothing())  return 0 }";
    let error = check_source(source).unwrap_err();
    assert_eq!(error.get_error_name(), "VoidValue");
}

#[test]
fn test_argument_counts() {
    let source = "i32 add(i32 a, i32 b) { return a + b }\ni32 main() { i32 x = add(1)  return x }";
    let error = check_source(source).unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::MissingArguments {
            expected: 2,
            received: 1
        }
    );

    let source = "i32 add(i32 a, i32 b) { return a + b }\ni32 main() { i32 x = add(1, 2, 3)  return x }";
    let error = check_source(source).unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnexpectedArguments {
            expected: 2,
            received: 3
        }
    );
}

#[test]
fn test_operand_type_mismatch() {
    let error = check_source("i32 f(i64 a) { i32 x = a + 1  return x }").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeMatchError {
            decl: "x".to_string(),
            expected: "i32".to_string(),
            received: "i64".to_string(),
        }
    );
}

#[test]
fn test_string_assigned_to_integer() {
    let error = check_source("i32 main() { i32 x = \"hello\"  return x }").unwrap_err();

    assert_eq!(error.get_error_name(), "TypeMatchError");
    assert_eq!(
        error.get_tip().to_string(),
        "Expected type `i32` for `x`, received `i8*`"
    );
}

#[test]
fn test_trailing_operator() {
    let error = check_source("i32 f() { i32 x = 1 +  return x }").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::MissingOperand {
            operator: "+".to_string()
        }
    );
}

#[test]
fn test_leading_operator() {
    let error = check_source("i32 f() { i32 x = * 2  return x }").unwrap_err();

    assert_eq!(error.get_error_name(), "MissingOperand");
    assert_eq!(error.get_position().0, 18);
}

#[test]
fn test_adjacent_operands() {
    let error = check_source("i32 f() { i32 x = 1 2  return x }").unwrap_err();

    assert_eq!(error.get_internal_error(), &ErrorImpl::AdjacentOperands);
    assert_eq!(error.get_position().0, 20);
}

#[test]
fn test_empty_sequence_is_malformed() {
    let error = resolve_sequence(Vec::new(), None).unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::MalformedSequence {
            message: "empty sequence".to_string()
        }
    );
    assert_eq!(error.get_tip().to_string(), "Could not group sequence: empty sequence");
}

#[test]
fn test_duplicate_variable() {
    let error = check_source("i32 f(i32 a) { i32 a = 1  return a }").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::VariableAlreadyDeclared {
            variable: "a".to_string()
        }
    );
}

#[test]
fn test_void_variable() {
    let error = check_source("void f() { void x = 1 }").unwrap_err();

    assert_eq!(error.get_error_name(), "TypeMatchError");
}

#[test]
fn test_return_checks() {
    let error = check_source("i32 f() { return }").unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::MissingReturnValue {
            function: "f".to_string()
        }
    );

    let error = check_source("i32 f() { i32 x = 1 }").unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::MissingReturn {
            function: "f".to_string()
        }
    );

    let error = check_source("void f() { return 1 }").unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::TypeMatchError {
            decl: "f".to_string(),
            expected: "void".to_string(),
            received: "i32".to_string(),
        }
    );

    assert!(check_source("void f() { }").is_ok());
    assert!(check_source("void f() { return }").is_ok());
}

#[test]
fn test_statement_after_return() {
    let error = check_source("i32 f() { return 1  g() }").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::StatementAfterReturn {
            function: "f".to_string()
        }
    );
}

#[test]
fn test_variadic_marker_must_be_last() {
    let error = check_source("@foreign i32 bad(..., i32)").unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::VariadicNotLast {
            function: "bad".to_string()
        }
    );
}
