use inkwell::{
    types::{BasicTypeEnum, StringRadix},
    values::{BasicMetadataValueEnum, BasicValueEnum, IntValue},
};

use crate::{
    ast::{
        expressions::{Expr, ExprKind},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Radix,
};

use super::compiler::{backend_error, unsupported_type, Compiler};

fn unsupported_expression(expression: &Expr) -> Error {
    Error::new(
        ErrorImpl::UnsupportedExpression {
            expression: expression.to_string(),
        },
        expression.span.start.clone(),
    )
}

fn resolved_type(expression: &Expr) -> Result<&Type, Error> {
    expression
        .ty
        .as_ref()
        .ok_or_else(|| unsupported_expression(expression))
}

/// Generates LLVM IR for the given expression.
///
/// Returns `None` for calls to `void` functions.
pub fn gen_expression<'a>(
    compiler: &Compiler<'a>,
    expression: &Expr,
) -> Result<Option<BasicValueEnum<'a>>, Error> {
    match &expression.kind {
        ExprKind::Integer { value, radix } => {
            gen_integer(compiler, expression, value, *radix).map(|v| Some(v.into()))
        }
        ExprKind::String { value } => {
            let global = compiler
                .builder
                .build_global_string_ptr(value, "")
                .map_err(backend_error)?;

            Ok(Some(global.as_pointer_value().into()))
        }
        ExprKind::DeclRef {
            name,
            args,
            is_call: true,
        } => gen_call(compiler, expression, name, args),
        ExprKind::DeclRef { name, .. } => {
            let alloca = compiler.named_allocas.get(name).ok_or_else(|| {
                Error::new(
                    ErrorImpl::UndeclaredReference { name: name.clone() },
                    expression.span.start.clone(),
                )
            })?;

            let value = compiler
                .builder
                .build_load(*alloca, name)
                .map_err(backend_error)?;

            Ok(Some(value))
        }
        ExprKind::Sequence(elements) => gen_sequence(compiler, expression, elements).map(Some),
        ExprKind::BinaryOperator(_) => Err(unsupported_expression(expression)),
    }
}

fn gen_integer<'a>(
    compiler: &Compiler<'a>,
    expression: &Expr,
    digits: &str,
    radix: Radix,
) -> Result<IntValue<'a>, Error> {
    let ty = resolved_type(expression)?;
    let BasicTypeEnum::IntType(int_type) = compiler.convert_type(ty)? else {
        return Err(unsupported_type(ty));
    };

    let string_radix = match radix {
        Radix::Binary => StringRadix::Binary,
        Radix::Octal => StringRadix::Octal,
        Radix::Decimal => StringRadix::Decimal,
        Radix::Hexadecimal => StringRadix::Hexadecimal,
    };

    int_type
        .const_int_from_string(digits, string_radix)
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::NumberParseError {
                    token: expression.to_string(),
                },
                expression.span.start.clone(),
            )
        })
}

fn gen_call<'a>(
    compiler: &Compiler<'a>,
    expression: &Expr,
    name: &str,
    args: &[Expr],
) -> Result<Option<BasicValueEnum<'a>>, Error> {
    let function = compiler.module.get_function(name).ok_or_else(|| {
        Error::new(
            ErrorImpl::UndeclaredReference {
                name: name.to_string(),
            },
            expression.span.start.clone(),
        )
    })?;

    let mut arguments: Vec<BasicMetadataValueEnum<'a>> = Vec::with_capacity(args.len());
    for arg in args {
        let value = gen_expression(compiler, arg)?.ok_or_else(|| unsupported_expression(arg))?;
        arguments.push(value.into());
    }

    let call = compiler
        .builder
        .build_call(function, &arguments, "")
        .map_err(backend_error)?;

    Ok(call.try_as_basic_value().left())
}

fn gen_operand<'a>(compiler: &Compiler<'a>, operand: &Expr) -> Result<IntValue<'a>, Error> {
    match gen_expression(compiler, operand)? {
        Some(BasicValueEnum::IntValue(value)) => Ok(value),
        Some(_) => Err(unsupported_type(resolved_type(operand)?)),
        None => Err(unsupported_expression(operand)),
    }
}

/// Folds `[e0, op1, e1, op2, e2, ...]` from the left.
fn gen_sequence<'a>(
    compiler: &Compiler<'a>,
    expression: &Expr,
    elements: &[Expr],
) -> Result<BasicValueEnum<'a>, Error> {
    let ty = resolved_type(expression)?;
    if !ty.is_integer() {
        return Err(unsupported_type(ty));
    }

    let Some((first, rest)) = elements.split_first() else {
        return Err(unsupported_expression(expression));
    };

    let mut accumulator = gen_operand(compiler, first)?;

    for pair in rest.chunks(2) {
        let [operator, operand] = pair else {
            return Err(unsupported_expression(expression));
        };
        let Some(operator) = operator.operator() else {
            return Err(unsupported_expression(expression));
        };

        let rhs = gen_operand(compiler, operand)?;
        let builder = &compiler.builder;

        accumulator = match operator.symbol.as_str() {
            "+" => builder.build_int_add(accumulator, rhs, "add"),
            "-" => builder.build_int_sub(accumulator, rhs, "sub"),
            "*" => builder.build_int_mul(accumulator, rhs, "mul"),
            "/" => builder.build_int_signed_div(accumulator, rhs, "div"),
            _ => return Err(unsupported_expression(expression)),
        }
        .map_err(backend_error)?;
    }

    Ok(accumulator.into())
}
