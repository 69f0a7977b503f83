use std::fmt::Display;

use crate::{lexer::tokens::Radix, Span};

use super::types::Type;

/// Binding tier of an infix operator. Higher binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Additive = 1,
    Multiplicative = 2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperator {
    pub symbol: String,
    pub precedence: Precedence,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Integer {
        value: String,
        radix: Radix,
    },
    String {
        value: String,
    },
    /// A bare read of `name`, or a call when `is_call` is set.
    DeclRef {
        name: String,
        args: Vec<Expr>,
        is_call: bool,
    },
    BinaryOperator(BinaryOperator),
    /// Operands and operators in source order. Flat after parsing, grouped
    /// by precedence after type checking.
    Sequence(Vec<Expr>),
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    /// Filled in by the type checker.
    pub ty: Option<Type>,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            ty: None,
            span,
        }
    }

    /// Builds a sequence, collapsing a single element to itself.
    pub fn sequence(mut expressions: Vec<Expr>) -> Self {
        if expressions.len() == 1 {
            return expressions.remove(0);
        }

        let span = match (expressions.first(), expressions.last()) {
            (Some(first), Some(last)) => first.span.to(&last.span),
            _ => Span::null(),
        };

        Expr::new(ExprKind::Sequence(expressions), span)
    }

    pub fn operator(&self) -> Option<&BinaryOperator> {
        match &self.kind {
            ExprKind::BinaryOperator(operator) => Some(operator),
            _ => None,
        }
    }

    pub fn is_operator(&self) -> bool {
        self.operator().is_some()
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, ExprKind::DeclRef { is_call: true, .. })
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ExprKind::Integer { value, radix } => write!(f, "{}{}", radix.prefix(), value),
            ExprKind::String { value } => write!(f, "\"{}\"", value.escape_default()),
            ExprKind::DeclRef {
                name,
                args,
                is_call,
            } => {
                if !is_call {
                    return write!(f, "{}", name);
                }

                let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
                write!(f, "{}({})", name, args.join(", "))
            }
            ExprKind::BinaryOperator(operator) => write!(f, "{}", operator.symbol),
            ExprKind::Sequence(expressions) => {
                let parts: Vec<String> = expressions.iter().map(|e| e.to_string()).collect();
                write!(f, "({})", parts.join(" "))
            }
        }
    }
}
