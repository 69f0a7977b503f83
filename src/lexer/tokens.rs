use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("void", TokenKind::Void);
        map.insert("i8", TokenKind::I8);
        map.insert("i16", TokenKind::I16);
        map.insert("i32", TokenKind::I32);
        map.insert("i64", TokenKind::I64);
        map.insert("f16", TokenKind::F16);
        map.insert("f32", TokenKind::F32);
        map.insert("f64", TokenKind::F64);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("return", TokenKind::Return);
        map.insert("struct", TokenKind::Struct);
        map
    };
}

/// Base of an integer literal, selected by its `0b`/`0o`/`0x` prefix.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
}

impl Radix {
    pub fn base(&self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Radix::Binary => "0b",
            Radix::Octal => "0o",
            Radix::Decimal => "",
            Radix::Hexadecimal => "0x",
        }
    }

    pub fn accepts(&self, c: char) -> bool {
        c.is_digit(self.base())
    }
}

impl Display for Radix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Radix::Binary => write!(f, "binary"),
            Radix::Octal => write!(f, "octal"),
            Radix::Decimal => write!(f, "decimal"),
            Radix::Hexadecimal => write!(f, "hex"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Integer(Radix),
    String,
    Identifier,

    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,

    Comma,
    Assignment, // =
    Ellipsis,   // ...

    Plus,
    Dash,
    Slash,
    Star,

    // Primitive types
    Void,
    I8,
    I16,
    I32,
    I64,
    F16,
    F32,
    F64,

    // Reserved
    If,
    Else,
    For,
    Return,
    Struct,

    // Attributes
    Foreign,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Integer(radix) => write!(f, "Integer({})", radix),
            _ => write!(f, "{:?}", self),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::String | TokenKind::Identifier | TokenKind::Integer(_) => {
                write!(f, "{} ({})", self.kind, self.source_text())
            }
            _ => write!(f, "{}", self.kind),
        }
    }
}

impl Token {
    /// The token as it would be written in source.
    ///
    /// String literals are re-quoted with their escapes restored and integer
    /// literals get their radix prefix back, so concatenating the source text
    /// of a token stream reproduces the program modulo whitespace and comments.
    pub fn source_text(&self) -> String {
        match self.kind {
            TokenKind::EOF => String::new(),
            TokenKind::Integer(radix) => format!("{}{}", radix.prefix(), self.value),
            TokenKind::String => format!("\"{}\"", escape_string(&self.value)),
            _ => self.value.clone(),
        }
    }
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\0' => escaped.push_str("\\0"),
            c if c.is_ascii_control() => escaped.push_str(&format!("\\x{:02x}", c as u32)),
            c => escaped.push(c),
        }
    }

    escaped
}
