//! Type annotations.
//!
//! A Jay type is a primitive keyword followed by any number of `*`, or the
//! variadic marker `...` which may only appear as the last parameter type of
//! a function.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Void,
    I8,
    I16,
    I32,
    I64,
    F16,
    F32,
    F64,
}

impl Primitive {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Primitive::I8 | Primitive::I16 | Primitive::I32 | Primitive::I64
        )
    }

    /// Width in bits of an integer primitive.
    pub fn bit_width(&self) -> Option<u32> {
        match self {
            Primitive::I8 => Some(8),
            Primitive::I16 => Some(16),
            Primitive::I32 => Some(32),
            Primitive::I64 => Some(64),
            _ => None,
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Primitive::Void => "void",
            Primitive::I8 => "i8",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::F16 => "f16",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(Primitive),
    Pointer(Box<Type>),
    Variadic,
}

impl Type {
    pub fn pointer_to(pointee: Type) -> Type {
        Type::Pointer(Box::new(pointee))
    }

    /// `i8*`, the type of string literals.
    pub fn string() -> Type {
        Type::pointer_to(Type::Primitive(Primitive::I8))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::Void))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Primitive(p) if p.is_integer())
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, Type::Variadic)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Primitive(primitive) => write!(f, "{}", primitive),
            Type::Pointer(inner) => write!(f, "{}*", inner),
            Type::Variadic => write!(f, "..."),
        }
    }
}
