//! Parser state and entry point.
//!
//! The parser walks the token stream with lookup tables keyed by token kind:
//! top-level declaration handlers, statement handlers, expression "nud"
//! handlers and an operator precedence table. Expressions are parsed into
//! flat operand/operator sequences; grouping happens in the type checker.

use std::{collections::HashMap, rc::Rc};

use log::debug;

use crate::{
    ast::{ast::File, expressions::Precedence, types::Primitive},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position,
};

use super::{
    lookups::{
        create_token_lookups, DeclHandler, DeclLookup, NUDHandler, NUDLookup, PrecedenceLookup,
        StmtHandler, StmtLookup,
    },
    types::{create_token_type_lookups, TypeLookup},
};

pub struct Parser {
    tokens: Vec<Token>,
    /// Index of the current token
    pos: usize,
    file: Rc<String>,
    decl_lookup: DeclLookup,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    precedence_lookup: PrecedenceLookup,
    type_lookup: TypeLookup,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, file: Rc<String>) -> Self {
        Parser {
            tokens,
            pos: 0,
            file,
            decl_lookup: HashMap::new(),
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            precedence_lookup: HashMap::new(),
            type_lookup: HashMap::new(),
        }
    }

    /// The stream always ends in `EOF`, which the cursor never moves past.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous one.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub fn at_eof(&self) -> bool {
        self.current_token_kind() == TokenKind::EOF
    }

    pub fn has_tokens(&self) -> bool {
        !self.at_eof()
    }

    /// Cursor index, for speculative parsing.
    pub fn mark(&self) -> usize {
        self.pos
    }

    pub fn rewind(&mut self, mark: usize) {
        self.pos = mark;
    }

    pub fn unexpected_eof(&self, expected: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedEof {
                expected: String::from(expected),
            },
            self.get_position(),
        )
    }

    pub fn unexpected_token(&self) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: self.current_token().value.clone(),
            },
            self.get_position(),
        )
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// Running out of tokens is always reported as `UnexpectedEof` naming
    /// `expected_kind`.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let kind = self.current_token_kind();

        if kind == expected_kind {
            return Ok(self.advance());
        }

        if kind == TokenKind::EOF {
            return Err(self.unexpected_eof(&expected_kind.to_string()));
        }

        match error {
            Some(error) => Err(error),
            None => Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: self.current_token().value.clone(),
                    message: format!("expected {}", expected_kind),
                },
                self.get_position(),
            )),
        }
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Expects an identifier and returns its name.
    pub fn expect_identifier(&mut self, context: &str) -> Result<String, Error> {
        let error = Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.current_token().value.clone(),
                message: format!("expected identifier {}", context),
            },
            self.get_position(),
        );

        if self.at_eof() {
            return Err(self.unexpected_eof("identifier"));
        }

        Ok(self.expect_error(TokenKind::Identifier, Some(error))?.value)
    }

    pub fn get_decl_lookup(&self) -> &DeclLookup {
        &self.decl_lookup
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_precedence_lookup(&self) -> &PrecedenceLookup {
        &self.precedence_lookup
    }

    pub fn get_type_lookup(&self) -> &TypeLookup {
        &self.type_lookup
    }

    /// Registers a top-level declaration handler.
    pub fn decl(&mut self, kind: TokenKind, decl_fn: DeclHandler) {
        self.decl_lookup.insert(kind, decl_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a null denotation (single element) expression handler.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers an infix operator. Operators are standalone sequence
    /// elements carrying their precedence tier.
    pub fn operator(&mut self, kind: TokenKind, precedence: Precedence, nud_fn: NUDHandler) {
        self.precedence_lookup.insert(kind, precedence);
        self.nud_lookup.insert(kind, nud_fn);
    }

    pub fn primitive(&mut self, kind: TokenKind, primitive: Primitive) {
        self.type_lookup.insert(kind, primitive);
    }

    /// Position of the current token.
    pub fn get_position(&self) -> Position {
        match self.tokens.get(self.pos) {
            Some(token) => token.span.start.clone(),
            None => Position(0, Rc::clone(&self.file)),
        }
    }
}

/// Parses a token stream into a [`File`] of functions in declaration order.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<File, Error> {
    let mut result = File::new();

    if tokens.is_empty() {
        return Ok(result);
    }

    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    while parser.has_tokens() {
        let handler = parser
            .get_decl_lookup()
            .get(&parser.current_token_kind())
            .copied();

        let Some(handler) = handler else {
            return Err(parser.unexpected_token());
        };

        let function = handler(&mut parser)?;
        debug!(
            "Parsed {}function `{}` with {} statements",
            if function.is_foreign() { "foreign " } else { "" },
            function.name,
            function.body.len()
        );
        result.insert(function)?;
    }

    Ok(result)
}
