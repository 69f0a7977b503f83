use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::IllegalIntegerLiteral { .. } => "IllegalIntegerLiteral",
            ErrorImpl::MissingClosing { .. } => "MissingClosing",
            ErrorImpl::IllegalEscape { .. } => "IllegalEscape",
            ErrorImpl::UnexpectedEof { .. } => "UnexpectedEof",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::UndeclaredReference { .. } => "UndeclaredReference",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::VariadicNotLast { .. } => "VariadicNotLast",
            ErrorImpl::MissingOperand { .. } => "MissingOperand",
            ErrorImpl::AdjacentOperands => "AdjacentOperands",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::MissingReturnValue { .. } => "MissingReturnValue",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
            ErrorImpl::StatementAfterReturn { .. } => "StatementAfterReturn",
            ErrorImpl::VoidValue { .. } => "VoidValue",
            ErrorImpl::IntegerOutOfRange { .. } => "IntegerOutOfRange",
            ErrorImpl::MalformedSequence { .. } => "MalformedSequence",
            ErrorImpl::InvalidStage { .. } => "InvalidStage",
            ErrorImpl::UnsupportedExpression { .. } => "UnsupportedExpression",
            ErrorImpl::UnsupportedReturn { .. } => "UnsupportedReturn",
            ErrorImpl::UnsupportedType { .. } => "UnsupportedType",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::Backend { .. } => "Backend",
            ErrorImpl::MissingInput => "MissingInput",
            ErrorImpl::InputUnreadable { .. } => "InputUnreadable",
            ErrorImpl::UnknownArgument { .. } => "UnknownArgument",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::IllegalIntegerLiteral { radix, character } => ErrorTip::Suggestion(format!(
                "Illegal character `{}` in {} literal",
                character, radix
            )),
            ErrorImpl::MissingClosing { delimiter } => {
                ErrorTip::Suggestion(format!("Missing closing `{}`", delimiter))
            }
            ErrorImpl::IllegalEscape { escape } => ErrorTip::Suggestion(format!(
                "Escape `{}` is outside ASCII, strings only hold ASCII escapes",
                escape
            )),
            ErrorImpl::UnexpectedEof { expected } => ErrorTip::Suggestion(format!(
                "Was expecting {}, but reached the end of the file",
                expected
            )),
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::UndeclaredReference { name } => {
                ErrorTip::Suggestion(format!("Reference to undeclared name `{}`", name))
            }
            ErrorImpl::TypeMatchError {
                decl,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Expected type `{}` for `{}`, received `{}`",
                expected, decl, received
            )),
            ErrorImpl::VariadicNotLast { function } => ErrorTip::Suggestion(format!(
                "Variadic marker `...` must be the last parameter of `{}`",
                function
            )),
            ErrorImpl::MissingOperand { operator } => {
                ErrorTip::Suggestion(format!("Operator `{}` is missing an operand", operator))
            }
            ErrorImpl::AdjacentOperands => ErrorTip::Suggestion(String::from(
                "Two operands follow each other without an operator",
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` already declared", variable))
            }
            ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MissingReturnValue { function } => ErrorTip::Suggestion(format!(
                "Function `{}` must return a value",
                function
            )),
            ErrorImpl::MissingReturn { function } => ErrorTip::Suggestion(format!(
                "Function `{}` must end with a return statement",
                function
            )),
            ErrorImpl::StatementAfterReturn { function } => ErrorTip::Suggestion(format!(
                "Statement after return in `{}` is never reached",
                function
            )),
            ErrorImpl::VoidValue { decl } => ErrorTip::Suggestion(format!(
                "`{}` needs a value, but the expression has type `void`",
                decl
            )),
            ErrorImpl::IntegerOutOfRange { literal, type_ } => ErrorTip::Suggestion(format!(
                "Literal `{}` does not fit in `{}`",
                literal, type_
            )),
            ErrorImpl::MalformedSequence { message } => {
                ErrorTip::Suggestion(format!("Could not group sequence: {}", message))
            }
            ErrorImpl::InvalidStage {
                function,
                expected,
                found,
            } => ErrorTip::Suggestion(format!(
                "Function `{}` is {}, expected it to be {}",
                function, found, expected
            )),
            ErrorImpl::UnsupportedExpression { expression } => ErrorTip::Suggestion(format!(
                "Cannot generate code for expression `{}`",
                expression
            )),
            ErrorImpl::UnsupportedReturn { function } => ErrorTip::Suggestion(format!(
                "Cannot create a return for `{}` with the given expression",
                function
            )),
            ErrorImpl::UnsupportedType { type_ } => {
                ErrorTip::Suggestion(format!("Code generation for type `{}` is not supported", type_))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, does it fit its declared type?",
                token
            )),
            ErrorImpl::Backend { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::MissingInput => ErrorTip::Suggestion(String::from(
                "Could not find input file, try marking it with `-i`",
            )),
            ErrorImpl::InputUnreadable { path, message } => ErrorTip::Suggestion(format!(
                "Could not read `{}`: {}",
                path, message
            )),
            ErrorImpl::UnknownArgument { argument } => {
                ErrorTip::Suggestion(format!("Unknown argument `{}`", argument))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("illegal character {character:?} in {radix} literal")]
    IllegalIntegerLiteral { radix: String, character: char },
    #[error("missing closing {delimiter:?}")]
    MissingClosing { delimiter: String },
    #[error("illegal escape {escape:?} in string literal")]
    IllegalEscape { escape: String },

    // Parse
    #[error("was expecting {expected}, but reached the end of the file")]
    UnexpectedEof { expected: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("function {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },

    // Semantic
    #[error("reference to undeclared name {name:?}")]
    UndeclaredReference { name: String },
    #[error("mismatched type while checking {decl:?}: expected {expected:?}, received {received:?}")]
    TypeMatchError {
        decl: String,
        expected: String,
        received: String,
    },
    #[error("variadic type used before last parameter of {function:?}")]
    VariadicNotLast { function: String },
    #[error("infix operator {operator:?} without operand")]
    MissingOperand { operator: String },
    #[error("two operands without an operator between them")]
    AdjacentOperands,
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("unexpected arguments: expected {expected:?}, received {received:?}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("missing arguments: expected {expected:?}, received {received:?}")]
    MissingArguments { expected: usize, received: usize },
    #[error("missing return expression for function {function:?}")]
    MissingReturnValue { function: String },
    #[error("function {function:?} does not end with a return")]
    MissingReturn { function: String },
    #[error("statement after return in function {function:?}")]
    StatementAfterReturn { function: String },
    #[error("void value used for {decl:?}")]
    VoidValue { decl: String },
    #[error("integer literal {literal:?} out of range for {type_}")]
    IntegerOutOfRange { literal: String, type_: String },
    #[error("malformed sequence: {message}")]
    MalformedSequence { message: String },
    #[error("function {function:?} is {found}, expected {expected}")]
    InvalidStage {
        function: String,
        expected: String,
        found: String,
    },

    // Code generation
    #[error("unsupported expression {expression:?}")]
    UnsupportedExpression { expression: String },
    #[error("could not create return for {function:?} with given expression")]
    UnsupportedReturn { function: String },
    #[error("unsupported type {type_}")]
    UnsupportedType { type_: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("backend error: {message}")]
    Backend { message: String },

    // Driver
    #[error("could not find input file")]
    MissingInput,
    #[error("could not read {path:?}: {message}")]
    InputUnreadable { path: String, message: String },
    #[error("unknown argument {argument:?}")]
    UnknownArgument { argument: String },
}
