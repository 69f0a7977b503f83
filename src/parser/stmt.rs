use crate::{
    ast::{
        ast::{Function, FunctionState, Param, ReturnStmt, Stmt, Variable},
        expressions::ExprKind,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::expr::{parse_expr, try_parse_seq_expr},
    Span,
};

use super::{
    parser::Parser,
    types::{parse_param_type, parse_type},
};

/// `@foreign <type> <name>(<type>, ..., [...])`
pub fn parse_foreign_decl(parser: &mut Parser) -> Result<Function, Error> {
    let start = parser.advance().span;

    let return_type = parse_type(parser)?;
    let name = parser.expect_identifier("for foreign function name")?;

    parser.expect(TokenKind::OpenParen)?;

    let mut params = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        if !params.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }

        params.push(Param {
            name: None,
            ty: parse_param_type(parser)?,
        });
    }

    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(Function {
        name,
        return_type,
        params,
        body: vec![],
        foreign: true,
        state: FunctionState::Parsed,
        span: start.to(&close.span),
    })
}

/// `<type> <name>(<type> <name>, ...) { <statements> }`
pub fn parse_function_decl(parser: &mut Parser) -> Result<Function, Error> {
    let start = parser.current_token().span.clone();

    let return_type = parse_type(parser)?;
    let name = parser.expect_identifier("for function name")?;

    parser.expect(TokenKind::OpenParen)?;

    let mut params = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        if !params.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }

        let ty = parse_type(parser)?;
        let param_name = parser.expect_identifier("for parameter name")?;
        params.push(Param {
            name: Some(param_name),
            ty,
        });
    }

    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::OpenCurly)?;

    let mut body = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        body.push(parse_stmt(parser)?);
    }

    let close = parser.expect(TokenKind::CloseCurly)?;

    Ok(Function {
        name,
        return_type,
        params,
        body,
        foreign: false,
        state: FunctionState::Parsed,
        span: start.to(&close.span),
    })
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if parser.at_eof() {
        return Err(parser.unexpected_eof("CloseCurly"));
    }

    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();

    match handler {
        Some(handler) => handler(parser),
        None => Err(parser.unexpected_token()),
    }
}

/// `<type> <name> = <sequence>`
pub fn parse_variable_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.current_token().span.clone();

    let ty = parse_type(parser)?;
    let name = parser.expect_identifier("during variable declaration")?;

    parser.expect(TokenKind::Assignment)?;

    let value = try_parse_seq_expr(parser)?;

    Ok(Stmt::Variable(Variable {
        span: start.to(&value.span),
        name,
        ty,
        value,
    }))
}

/// A call used as a statement: `<name>(<args>)`
pub fn parse_call_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.get_position();

    let Some(expr) = parse_expr(parser)? else {
        return Err(parser.unexpected_token());
    };

    if let ExprKind::DeclRef {
        is_call: false,
        name,
        ..
    } = &expr.kind
    {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: name.clone(),
                message: String::from("expected a call statement"),
            },
            position,
        ));
    }

    Ok(Stmt::Call(expr))
}

/// `return [<sequence>]`, without a value only right before `}`.
pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span;

    if parser.current_token_kind() == TokenKind::CloseCurly {
        return Ok(Stmt::Return(ReturnStmt {
            value: None,
            span: start,
        }));
    }

    let value = try_parse_seq_expr(parser)?;

    Ok(Stmt::Return(ReturnStmt {
        span: Span {
            start: start.start,
            end: value.span.end.clone(),
        },
        value: Some(value),
    }))
}
