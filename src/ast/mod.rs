/// AST (Abstract Syntax Tree) module
///
/// Submodules:
/// - ast: files, functions, parameters and statements
/// - expressions: expression nodes, including flat operator sequences
/// - types: type annotations
pub mod ast;
pub mod expressions;
pub mod types;
