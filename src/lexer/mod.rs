//! Lexical analysis.
//!
//! Converts source text into a token stream with an ordered table of anchored
//! regex patterns. Keywords, the `@foreign` attribute, radix-prefixed integer
//! literals and escaped string literals are recognised here; whitespace and
//! `//` comments are dropped.

pub mod lexer;
pub mod tokens;
