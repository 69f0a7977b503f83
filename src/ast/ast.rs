use std::{collections::HashMap, fmt::Display};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Span,
};

use super::{expressions::Expr, types::Type};

/// Lifecycle of a function through the pipeline. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionState {
    Parsed,
    Checked,
    Generated,
}

impl Display for FunctionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionState::Parsed => write!(f, "parsed"),
            FunctionState::Checked => write!(f, "checked"),
            FunctionState::Generated => write!(f, "generated"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    /// Absent for foreign function parameters.
    pub name: Option<String>,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub ty: Type,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Variable(Variable),
    /// A call used as a statement.
    Call(Expr),
    Return(ReturnStmt),
}

impl Stmt {
    pub fn span(&self) -> &Span {
        match self {
            Stmt::Variable(variable) => &variable.span,
            Stmt::Call(expr) => &expr.span,
            Stmt::Return(ret) => &ret.span,
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `{:#}` also prints the resolved type of each statement's expression
        let alternate = f.alternate();
        let typed = |expr: &Expr| match (&expr.ty, alternate) {
            (Some(ty), true) => format!("{} : {}", expr, ty),
            _ => expr.to_string(),
        };

        match self {
            Stmt::Variable(variable) => {
                write!(f, "{} {} = {}", variable.ty, variable.name, typed(&variable.value))
            }
            Stmt::Call(expr) => write!(f, "{}", typed(expr)),
            Stmt::Return(ReturnStmt { value: Some(value), .. }) => {
                write!(f, "return {}", typed(value))
            }
            Stmt::Return(ReturnStmt { value: None, .. }) => write!(f, "return"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    /// Declared with `@foreign`: no body and unnamed parameters.
    pub foreign: bool,
    pub state: FunctionState,
    pub span: Span,
}

impl Function {
    pub fn is_foreign(&self) -> bool {
        self.foreign && self.body.is_empty() && self.params.iter().all(|p| p.name.is_none())
    }

    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(|p| p.ty.is_variadic())
    }

    /// Parameters before the variadic marker.
    pub fn fixed_params(&self) -> &[Param] {
        if self.is_variadic() {
            &self.params[..self.params.len() - 1]
        } else {
            &self.params
        }
    }

    /// Moves the function from `from` to `to`, failing if it is not at `from`.
    pub fn advance(&mut self, from: FunctionState, to: FunctionState) -> Result<(), Error> {
        if self.state != from {
            return Err(Error::new(
                ErrorImpl::InvalidStage {
                    function: self.name.clone(),
                    expected: from.to_string(),
                    found: self.state.to_string(),
                },
                self.span.start.clone(),
            ));
        }

        self.state = to;
        Ok(())
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|param| match &param.name {
                Some(name) => format!("{} {}", param.ty, name),
                None => param.ty.to_string(),
            })
            .collect();

        if self.is_foreign() {
            return write!(f, "@foreign {} {}({})", self.return_type, self.name, params.join(", "));
        }

        writeln!(f, "{} {}({}) {{", self.return_type, self.name, params.join(", "))?;
        for stmt in &self.body {
            if f.alternate() {
                writeln!(f, "    {:#}", stmt)?;
            } else {
                writeln!(f, "    {}", stmt)?;
            }
        }
        write!(f, "}}")
    }
}

/// A parsed source file: every function in declaration order, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct File {
    pub functions: Vec<Function>,
    lookup: HashMap<String, usize>,
}

impl File {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, function: Function) -> Result<(), Error> {
        if self.lookup.contains_key(&function.name) {
            return Err(Error::new(
                ErrorImpl::FunctionAlreadyDeclared {
                    function: function.name.clone(),
                },
                function.span.start.clone(),
            ));
        }

        self.lookup.insert(function.name.clone(), self.functions.len());
        self.functions.push(function);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.lookup.get(name).map(|index| &self.functions[*index])
    }

    pub fn foreign_functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter().filter(|function| function.is_foreign())
    }

    pub fn user_functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter().filter(|function| !function.is_foreign())
    }
}

impl Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for function in &self.functions {
            if f.alternate() {
                writeln!(f, "{:#}", function)?;
            } else {
                writeln!(f, "{}", function)?;
            }
        }
        Ok(())
    }
}
