//! Unit tests for error handling.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.jay".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "#".to_string(),
        },
        at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "#".to_string(),
        },
        at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_illegal_integer_literal_substitutes_radix_and_char() {
    let error = Error::new(
        ErrorImpl::IllegalIntegerLiteral {
            radix: "binary".to_string(),
            character: '2',
        },
        at(3),
    );

    assert_eq!(error.get_error_name(), "IllegalIntegerLiteral");
    assert_eq!(error.get_tip().to_string(), "Illegal character `2` in binary literal");
    assert_eq!(error.to_string(), "illegal character '2' in binary literal");
}

#[test]
fn test_unexpected_eof_names_expected_construct() {
    let error = Error::new(
        ErrorImpl::UnexpectedEof {
            expected: "identifier".to_string(),
        },
        at(0),
    );

    assert_eq!(
        error.to_string(),
        "was expecting identifier, but reached the end of the file"
    );
}

#[test]
fn test_type_mismatch_names_declaration() {
    let error = Error::new(
        ErrorImpl::TypeMatchError {
            decl: "x".to_string(),
            expected: "i32".to_string(),
            received: "i8*".to_string(),
        },
        at(0),
    );

    assert_eq!(error.get_error_name(), "TypeMatchError");
    assert_eq!(
        error.get_tip().to_string(),
        "Expected type `i32` for `x`, received `i8*`"
    );
}

#[test]
fn test_undeclared_reference_error() {
    let error = Error::new(
        ErrorImpl::UndeclaredReference {
            name: "foo".to_string(),
        },
        at(0),
    );

    assert_eq!(error.get_error_name(), "UndeclaredReference");
    assert_eq!(error.to_string(), "reference to undeclared name \"foo\"");
}

#[test]
fn test_missing_operand_error() {
    let error = Error::new(
        ErrorImpl::MissingOperand {
            operator: "+".to_string(),
        },
        at(0),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains('+')),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_argument_count_errors() {
    let unexpected = Error::new(
        ErrorImpl::UnexpectedArguments {
            expected: 2,
            received: 3,
        },
        at(0),
    );
    let missing = Error::new(
        ErrorImpl::MissingArguments {
            expected: 3,
            received: 1,
        },
        at(0),
    );

    assert_eq!(unexpected.get_error_name(), "UnexpectedArguments");
    assert_eq!(missing.get_error_name(), "MissingArguments");
    assert_eq!(missing.get_tip().to_string(), "Expected 3 arguments, received 1");
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}
