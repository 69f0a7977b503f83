//! Parser module for building the AST.
//!
//! Transforms a token stream into a [`crate::ast::ast::File`]. Initializers,
//! call arguments and return values are kept as flat sequences of operands and
//! operators; precedence is resolved later by the type checker.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
