use std::collections::HashMap;

use log::debug;

use crate::{
    ast::{
        ast::{File, Function, FunctionState, Stmt},
        expressions::{Expr, ExprKind},
        types::{Primitive, Type},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Radix,
    Position,
};

use super::sequence::resolve_sequence;

/// What a call site needs to know about a function.
#[derive(Debug, Clone)]
pub struct Signature {
    pub return_type: Type,
    /// Fixed parameter types, without the variadic marker.
    pub params: Vec<Type>,
    pub is_variadic: bool,
}

impl Signature {
    pub fn of(function: &Function) -> Self {
        Signature {
            return_type: function.return_type.clone(),
            params: function.fixed_params().iter().map(|p| p.ty.clone()).collect(),
            is_variadic: function.is_variadic(),
        }
    }
}

/// The declaration an expression is checked against.
pub struct DeclContext<'a> {
    pub name: &'a str,
    /// `None` when the expression keeps its natural type, as for arguments
    /// matching a variadic marker.
    pub ty: Option<&'a Type>,
}

#[derive(Debug, Default)]
pub struct TypeChecker {
    pub globals: HashMap<String, Signature>,
    /// Locals of the function being checked, in scope once checked.
    pub scope_vars: HashMap<String, Type>,
}

impl TypeChecker {
    pub fn new(file: &File) -> Self {
        TypeChecker {
            globals: file
                .functions
                .iter()
                .map(|function| (function.name.clone(), Signature::of(function)))
                .collect(),
            scope_vars: HashMap::new(),
        }
    }

    pub fn declare_variable(
        &mut self,
        name: &str,
        ty: Type,
        position: Position,
    ) -> Result<(), Error> {
        if self.scope_vars.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: name.to_string(),
                },
                position,
            ));
        }

        self.scope_vars.insert(name.to_string(), ty);
        Ok(())
    }
}

fn mismatch(decl: &str, expected: &Type, received: Option<&Type>, position: Position) -> Error {
    Error::new(
        ErrorImpl::TypeMatchError {
            decl: decl.to_string(),
            expected: expected.to_string(),
            received: received.map_or_else(|| String::from("<untyped>"), |ty| ty.to_string()),
        },
        position,
    )
}

/// Integer types are signed: a literal may not exceed the signed maximum of
/// its type.
fn check_literal_range(
    digits: &str,
    radix: Radix,
    ty: &Type,
    position: Position,
) -> Result<(), Error> {
    let max = match ty {
        Type::Primitive(primitive) => primitive.bit_width().map(|bits| (1u128 << (bits - 1)) - 1),
        _ => None,
    };
    let Some(max) = max else {
        return Ok(());
    };

    match u128::from_str_radix(digits, radix.base()) {
        Ok(value) if value <= max => Ok(()),
        _ => Err(Error::new(
            ErrorImpl::IntegerOutOfRange {
                literal: format!("{}{}", radix.prefix(), digits),
                type_: ty.to_string(),
            },
            position,
        )),
    }
}

fn undeclared(name: &str, position: Position) -> Error {
    Error::new(
        ErrorImpl::UndeclaredReference {
            name: name.to_string(),
        },
        position,
    )
}

/// Types `expr` against `ctx`, regrouping sequences by precedence.
pub fn type_check_expr(
    type_checker: &mut TypeChecker,
    expr: &mut Expr,
    ctx: &DeclContext,
) -> Result<(), Error> {
    match &mut expr.kind {
        ExprKind::Integer { value, radix } => {
            let ty = match ctx.ty {
                Some(ty) if ty.is_integer() => ty.clone(),
                _ => Type::Primitive(Primitive::I32),
            };

            check_literal_range(value, *radix, &ty, expr.span.start.clone())?;
            expr.ty = Some(ty);
        }
        ExprKind::String { .. } => {
            expr.ty = Some(Type::string());
        }
        ExprKind::BinaryOperator(_) => {
            expr.ty = ctx.ty.cloned();
        }
        ExprKind::DeclRef {
            name,
            args,
            is_call,
        } => {
            if *is_call {
                let signature = type_checker
                    .globals
                    .get(name.as_str())
                    .cloned()
                    .ok_or_else(|| undeclared(name.as_str(), expr.span.start.clone()))?;

                type_check_call_args(
                    type_checker,
                    name.as_str(),
                    args,
                    &signature,
                    &expr.span.start,
                )?;
                expr.ty = Some(signature.return_type);
            } else {
                let ty = type_checker
                    .scope_vars
                    .get(name.as_str())
                    .cloned()
                    .ok_or_else(|| undeclared(name.as_str(), expr.span.start.clone()))?;

                expr.ty = Some(ty);
            }
        }
        ExprKind::Sequence(elements) => {
            if elements.is_empty() {
                return Err(Error::new(
                    ErrorImpl::MalformedSequence {
                        message: String::from("empty sequence"),
                    },
                    expr.span.start.clone(),
                ));
            }

            let ty = type_check_sequence_elements(type_checker, elements, ctx)?;

            let elements = std::mem::take(elements);
            *expr = resolve_sequence(elements, Some(&ty))?;
        }
    }

    if let Some(expected) = ctx.ty {
        if expr.ty.as_ref() != Some(expected) {
            return Err(mismatch(ctx.name, expected, expr.ty.as_ref(), expr.span.start.clone()));
        }
    }

    Ok(())
}

/// Types the operands of a flat sequence and returns the sequence type.
///
/// Under a declaration every operand must have the declared type. Without
/// one, the first operand that is not an integer literal sets the type and
/// literals follow it.
fn type_check_sequence_elements(
    type_checker: &mut TypeChecker,
    elements: &mut [Expr],
    ctx: &DeclContext,
) -> Result<Type, Error> {
    let is_literal = |expr: &Expr| matches!(expr.kind, ExprKind::Integer { .. });

    let mut sequence_type: Option<Type> = ctx.ty.cloned();

    for element in elements.iter_mut() {
        if element.is_operator() || is_literal(element) {
            continue;
        }

        let element_ctx = DeclContext {
            name: ctx.name,
            ty: sequence_type.as_ref(),
        };
        type_check_expr(type_checker, element, &element_ctx)?;

        if sequence_type.is_none() {
            sequence_type = element.ty.clone();
        }
    }

    let sequence_type = sequence_type.unwrap_or(Type::Primitive(Primitive::I32));
    let element_ctx = DeclContext {
        name: ctx.name,
        ty: Some(&sequence_type),
    };
    for element in elements.iter_mut() {
        if element.is_operator() || is_literal(element) {
            type_check_expr(type_checker, element, &element_ctx)?;
        }
    }

    Ok(sequence_type)
}

fn type_check_call_args(
    type_checker: &mut TypeChecker,
    callee: &str,
    args: &mut [Expr],
    signature: &Signature,
    position: &Position,
) -> Result<(), Error> {
    let expected = signature.params.len();
    let received = args.len();

    if received < expected {
        return Err(Error::new(
            ErrorImpl::MissingArguments { expected, received },
            position.clone(),
        ));
    }

    if received > expected && !signature.is_variadic {
        return Err(Error::new(
            ErrorImpl::UnexpectedArguments { expected, received },
            args[expected].span.start.clone(),
        ));
    }

    for (index, arg) in args.iter_mut().enumerate() {
        let decl = format!("argument {} of {}", index + 1, callee);
        let ctx = DeclContext {
            name: &decl,
            ty: signature.params.get(index),
        };
        type_check_expr(type_checker, arg, &ctx)?;

        if arg.ty.as_ref().map_or(false, Type::is_void) {
            return Err(Error::new(
                ErrorImpl::VoidValue { decl },
                arg.span.start.clone(),
            ));
        }
    }

    Ok(())
}

fn check_variadic_position(function: &Function) -> Result<(), Error> {
    let last = function.params.len().saturating_sub(1);

    for (index, param) in function.params.iter().enumerate() {
        if param.ty.is_variadic() && index != last {
            return Err(Error::new(
                ErrorImpl::VariadicNotLast {
                    function: function.name.clone(),
                },
                function.span.start.clone(),
            ));
        }
    }

    Ok(())
}

pub fn type_check_function(
    type_checker: &mut TypeChecker,
    function: &mut Function,
) -> Result<(), Error> {
    function.advance(FunctionState::Parsed, FunctionState::Checked)?;
    check_variadic_position(function)?;

    if function.is_foreign() {
        return Ok(());
    }

    debug!("Checking function `{}`", function.name);
    type_checker.scope_vars.clear();

    for param in function.params.iter() {
        if let Some(name) = &param.name {
            type_checker.declare_variable(name, param.ty.clone(), function.span.start.clone())?;
        }
    }

    let mut returned = false;
    for stmt in function.body.iter_mut() {
        if returned {
            return Err(Error::new(
                ErrorImpl::StatementAfterReturn {
                    function: function.name.clone(),
                },
                stmt.span().start.clone(),
            ));
        }

        match stmt {
            Stmt::Variable(variable) => {
                if variable.ty.is_void() {
                    return Err(mismatch(
                        &variable.name,
                        &variable.ty,
                        None,
                        variable.span.start.clone(),
                    ));
                }

                if type_checker.scope_vars.contains_key(&variable.name) {
                    return Err(Error::new(
                        ErrorImpl::VariableAlreadyDeclared {
                            variable: variable.name.clone(),
                        },
                        variable.span.start.clone(),
                    ));
                }

                let ctx = DeclContext {
                    name: &variable.name,
                    ty: Some(&variable.ty),
                };
                type_check_expr(type_checker, &mut variable.value, &ctx)?;

                type_checker.declare_variable(
                    &variable.name,
                    variable.ty.clone(),
                    variable.span.start.clone(),
                )?;
            }
            Stmt::Call(expr) => {
                let ctx = DeclContext {
                    name: &function.name,
                    ty: None,
                };
                type_check_expr(type_checker, expr, &ctx)?;
            }
            Stmt::Return(ret) => {
                returned = true;

                match (&mut ret.value, function.return_type.is_void()) {
                    (None, true) => {}
                    (None, false) => {
                        return Err(Error::new(
                            ErrorImpl::MissingReturnValue {
                                function: function.name.clone(),
                            },
                            ret.span.start.clone(),
                        ))
                    }
                    (Some(value), is_void) => {
                        let ctx = DeclContext {
                            name: &function.name,
                            ty: if is_void { None } else { Some(&function.return_type) },
                        };
                        type_check_expr(type_checker, value, &ctx)?;

                        if is_void {
                            return Err(mismatch(
                                &function.name,
                                &function.return_type,
                                value.ty.as_ref(),
                                value.span.start.clone(),
                            ));
                        }
                    }
                }
            }
        }
    }

    if !returned && !function.return_type.is_void() {
        return Err(Error::new(
            ErrorImpl::MissingReturn {
                function: function.name.clone(),
            },
            function.span.end.clone(),
        ));
    }

    type_checker.scope_vars.clear();
    Ok(())
}

/// Checks every function of `file` in declaration order.
///
/// Calls resolve against all functions of the file; locals only against
/// parameters and variables checked so far in the same function.
pub fn type_check(file: &mut File) -> Result<TypeChecker, Error> {
    let mut type_checker = TypeChecker::new(file);

    for function in file.functions.iter_mut() {
        type_check_function(&mut type_checker, function)?;
    }

    Ok(type_checker)
}
