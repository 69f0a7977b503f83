use crate::{
    ast::expressions::{BinaryOperator, Expr, ExprKind, Precedence},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Parses one sequence element: a literal, a bare operator or a reference.
///
/// Returns `Ok(None)` when the current token cannot start an element, which
/// ends the enclosing sequence.
pub fn parse_expr(parser: &mut Parser) -> Result<Option<Expr>, Error> {
    if parser.at_eof() {
        return Err(parser.unexpected_eof("expression"));
    }

    let handler = parser
        .get_nud_lookup()
        .get(&parser.current_token_kind())
        .copied();

    match handler {
        Some(handler) => Ok(Some(handler(parser)?)),
        None => Ok(None),
    }
}

/// Accumulates elements until one can't be parsed, or until a bare
/// identifier follows an operand: that identifier starts the next statement.
pub fn parse_seq_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let mut expressions: Vec<Expr> = vec![];

    loop {
        if let Some(last) = expressions.last() {
            if !last.is_operator() && parser.current_token_kind() == TokenKind::Identifier {
                break;
            }
        }

        if parser.at_eof() {
            break;
        }

        match parse_expr(parser)? {
            Some(expr) => expressions.push(expr),
            None => break,
        }
    }

    Ok(Expr::sequence(expressions))
}

/// Parses an initializer, argument or return value.
///
/// A lone element is returned as is. If a second element parses, the cursor
/// is restored to the start and the whole run is read by [`parse_seq_expr`].
pub fn try_parse_seq_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.mark();

    let Some(first) = parse_expr(parser)? else {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected expression"),
            },
            parser.get_position(),
        ));
    };

    // A failed lookahead consumes nothing
    if parser.at_eof() || parse_expr(parser)?.is_none() {
        return Ok(first);
    }

    parser.rewind(start);
    parse_seq_expr(parser)
}

pub fn parse_integer_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();

    let TokenKind::Integer(radix) = token.kind else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken { token: token.value },
            token.span.start,
        ));
    };

    Ok(Expr::new(
        ExprKind::Integer {
            value: token.value,
            radix,
        },
        token.span,
    ))
}

pub fn parse_string_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();
    Ok(Expr::new(ExprKind::String { value: token.value }, token.span))
}

pub fn parse_operator_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let precedence = parser
        .get_precedence_lookup()
        .get(&parser.current_token_kind())
        .copied()
        .unwrap_or(Precedence::Additive);
    let token = parser.advance();

    Ok(Expr::new(
        ExprKind::BinaryOperator(BinaryOperator {
            symbol: token.value,
            precedence,
        }),
        token.span,
    ))
}

/// A bare identifier, or a call when followed by `(`.
pub fn parse_decl_ref_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();

    if parser.current_token_kind() != TokenKind::OpenParen {
        return Ok(Expr::new(
            ExprKind::DeclRef {
                name: token.value,
                args: vec![],
                is_call: false,
            },
            token.span,
        ));
    }

    let (args, close) = parse_args(parser)?;

    Ok(Expr::new(
        ExprKind::DeclRef {
            name: token.value,
            args,
            is_call: true,
        },
        token.span.to(&close),
    ))
}

/// Parses `( <seq>, <seq>, ... )`, returning the arguments and the span of
/// the closing parenthesis.
pub fn parse_args(parser: &mut Parser) -> Result<(Vec<Expr>, crate::Span), Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut args = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        if !args.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }

        args.push(try_parse_seq_expr(parser)?);
    }

    let close = parser.expect(TokenKind::CloseParen)?;
    Ok((args, close.span))
}
