//! Semantic analysis.
//!
//! Checks each function body top-down against its declarations: variable
//! initializers against the variable's type, call arguments against the
//! callee's parameters and return values against the function's return type.
//! Flat sequences are regrouped by operator precedence on the way and every
//! expression node receives its resolved type.

pub mod sequence;
pub mod type_checker;

#[cfg(test)]
mod tests;
