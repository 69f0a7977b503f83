//! Code generation module for the compiler.
//!
//! Lowers a checked [`crate::ast::ast::File`] into an LLVM module through
//! inkwell and writes assembly and object files for the host target.

pub mod compiler;
pub mod expr;
pub mod stmt;
