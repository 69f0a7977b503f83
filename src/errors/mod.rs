//! Error types and error handling for the compiler.
//!
//! Every stage of the pipeline reports failures through the same positioned
//! [`errors::Error`]. Errors are fatal: the first one produced aborts the
//! compilation and is rendered by the driver with the offending source line.

pub mod errors;

#[cfg(test)]
mod tests;
