use inkwell::values::FunctionValue;
use log::debug;

use crate::{
    ast::ast::{Function, Stmt},
    errors::errors::{Error, ErrorImpl},
};

use super::{
    compiler::{backend_error, Compiler},
    expr::gen_expression,
};

/// Generates the body of a user function into its declared prototype.
///
/// Pass 1 gives every named parameter and every local a stack slot,
/// parameters receiving their incoming value. Pass 2 lowers the statements in
/// order.
pub fn gen_function_body<'a>(
    compiler: &mut Compiler<'a>,
    function: &Function,
    value: FunctionValue<'a>,
) -> Result<(), Error> {
    debug!("Generating function `{}`", function.name);

    let entry = compiler.context.append_basic_block(value, "entry");
    compiler.builder.position_at_end(entry);
    compiler.named_allocas.clear();

    for (index, param) in function.params.iter().enumerate() {
        let Some(name) = &param.name else {
            continue;
        };

        let alloca = compiler
            .builder
            .build_alloca(compiler.convert_type(&param.ty)?, name)
            .map_err(backend_error)?;

        let incoming = value
            .get_nth_param(index as u32)
            .ok_or_else(|| backend_error(format!("missing parameter `{}`", name)))?;
        compiler
            .builder
            .build_store(alloca, incoming)
            .map_err(backend_error)?;

        compiler.named_allocas.insert(name.clone(), alloca);
    }

    for stmt in function.body.iter() {
        if let Stmt::Variable(variable) = stmt {
            let alloca = compiler
                .builder
                .build_alloca(compiler.convert_type(&variable.ty)?, &variable.name)
                .map_err(backend_error)?;
            compiler.named_allocas.insert(variable.name.clone(), alloca);
        }
    }

    for stmt in function.body.iter() {
        gen_statement(compiler, function, stmt)?;
    }

    let terminated = compiler
        .builder
        .get_insert_block()
        .and_then(|block| block.get_terminator())
        .is_some();

    if !terminated && function.return_type.is_void() {
        compiler.builder.build_return(None).map_err(backend_error)?;
    }

    compiler.named_allocas.clear();
    Ok(())
}

pub fn gen_statement(
    compiler: &mut Compiler<'_>,
    function: &Function,
    statement: &Stmt,
) -> Result<(), Error> {
    match statement {
        Stmt::Variable(variable) => {
            let value = gen_expression(compiler, &variable.value)?.ok_or_else(|| {
                Error::new(
                    ErrorImpl::UnsupportedExpression {
                        expression: variable.value.to_string(),
                    },
                    variable.value.span.start.clone(),
                )
            })?;

            let alloca = compiler.named_allocas.get(&variable.name).copied().ok_or_else(|| {
                Error::new(
                    ErrorImpl::UndeclaredReference {
                        name: variable.name.clone(),
                    },
                    variable.span.start.clone(),
                )
            })?;

            compiler
                .builder
                .build_store(alloca, value)
                .map_err(backend_error)?;
        }
        Stmt::Call(expr) => {
            gen_expression(compiler, expr)?;
        }
        Stmt::Return(ret) => match &ret.value {
            Some(expr) => {
                let value = gen_expression(compiler, expr)?.ok_or_else(|| {
                    Error::new(
                        ErrorImpl::UnsupportedReturn {
                            function: function.name.clone(),
                        },
                        expr.span.start.clone(),
                    )
                })?;

                compiler
                    .builder
                    .build_return(Some(&value))
                    .map_err(backend_error)?;
            }
            None => {
                compiler.builder.build_return(None).map_err(backend_error)?;
            }
        },
    }

    Ok(())
}
