//! Type annotation parsing.
//!
//! A type is a primitive keyword followed by any number of `*`.

use std::collections::HashMap;

use crate::{
    ast::types::{Primitive, Type},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

pub type TypeLookup = HashMap<TokenKind, Primitive>;

pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.primitive(TokenKind::Void, Primitive::Void);
    parser.primitive(TokenKind::I8, Primitive::I8);
    parser.primitive(TokenKind::I16, Primitive::I16);
    parser.primitive(TokenKind::I32, Primitive::I32);
    parser.primitive(TokenKind::I64, Primitive::I64);
    parser.primitive(TokenKind::F16, Primitive::F16);
    parser.primitive(TokenKind::F32, Primitive::F32);
    parser.primitive(TokenKind::F64, Primitive::F64);
}

pub fn parse_type(parser: &mut Parser) -> Result<Type, Error> {
    if parser.at_eof() {
        return Err(parser.unexpected_eof("type"));
    }

    let primitive = parser
        .get_type_lookup()
        .get(&parser.current_token_kind())
        .copied();

    let Some(primitive) = primitive else {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected type"),
            },
            parser.get_position(),
        ));
    };
    parser.advance();

    let mut ty = Type::Primitive(primitive);
    while parser.current_token_kind() == TokenKind::Star {
        parser.advance();
        ty = Type::pointer_to(ty);
    }

    Ok(ty)
}

/// Parses a parameter type, accepting the variadic marker `...`.
pub fn parse_param_type(parser: &mut Parser) -> Result<Type, Error> {
    if parser.current_token_kind() == TokenKind::Ellipsis {
        parser.advance();
        return Ok(Type::Variadic);
    }

    parse_type(parser)
}
