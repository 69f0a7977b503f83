use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Function, Stmt},
        expressions::{Expr, Precedence},
    },
    errors::errors::Error,
    lexer::tokens::{Radix, TokenKind},
};

use super::{expr::*, parser::Parser, stmt::*};

pub type DeclHandler = fn(&mut Parser) -> Result<Function, Error>;
pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;

const PRIMITIVES: [TokenKind; 8] = [
    TokenKind::Void,
    TokenKind::I8,
    TokenKind::I16,
    TokenKind::I32,
    TokenKind::I64,
    TokenKind::F16,
    TokenKind::F32,
    TokenKind::F64,
];

pub fn create_token_lookups(parser: &mut Parser) {
    // Top level
    parser.decl(TokenKind::Foreign, parse_foreign_decl);
    for kind in PRIMITIVES {
        parser.decl(kind, parse_function_decl);
    }

    // Function bodies
    for kind in PRIMITIVES {
        parser.stmt(kind, parse_variable_stmt);
    }
    parser.stmt(TokenKind::Identifier, parse_call_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);

    // Operators
    parser.operator(TokenKind::Plus, Precedence::Additive, parse_operator_expr);
    parser.operator(TokenKind::Dash, Precedence::Additive, parse_operator_expr);
    parser.operator(TokenKind::Star, Precedence::Multiplicative, parse_operator_expr);
    parser.operator(TokenKind::Slash, Precedence::Multiplicative, parse_operator_expr);

    // Literals and symbols
    for radix in [Radix::Binary, Radix::Octal, Radix::Decimal, Radix::Hexadecimal] {
        parser.nud(TokenKind::Integer(radix), parse_integer_expr);
    }
    parser.nud(TokenKind::String, parse_string_expr);
    parser.nud(TokenKind::Identifier, parse_decl_ref_expr);
}

pub type DeclLookup = HashMap<TokenKind, DeclHandler>;
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type PrecedenceLookup = HashMap<TokenKind, Precedence>;
