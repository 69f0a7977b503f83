use std::rc::Rc;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Radix, Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

// Order matters: the first pattern matching at the cursor wins.
lazy_static! {
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^//[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^@[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: attribute_handler },
        RegexPattern { regex: Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new(r"^[0-9][a-zA-Z0-9_]*").unwrap(), handler: integer_handler },
        RegexPattern { regex: Regex::new(r#"^"(?:[^"\\]|\\.)*""#).unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r#"^""#).unwrap(), handler: unterminated_string_handler },
        RegexPattern { regex: Regex::new(r"^\.\.\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Ellipsis, "...") },
        RegexPattern { regex: Regex::new(r"^\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new(r"^\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new(r"^\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new(r"^\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        RegexPattern { regex: Regex::new(r"^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new(r"^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: Regex::new(r"^\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new(r"^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new(r"^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new(r"^\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = match file {
            Some(file) => Rc::new(file),
            None => Rc::new(String::from("shell")),
        };

        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self, offset: usize) -> Position {
        Position((self.pos + offset) as u32, Rc::clone(&self.file))
    }

    /// Span of the next `len` bytes from the cursor.
    pub fn span_for(&self, len: usize) -> Span {
        Span {
            start: self.position(0),
            end: self.position(len),
        }
    }

    fn matched(&self, regex: &Regex) -> String {
        regex
            .find(self.remainder())
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    lexer.advance_n(matched.len());
    Ok(())
}

fn attribute_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);

    if matched != "@foreign" {
        return Err(Error::new(
            ErrorImpl::UnrecognisedToken { token: matched },
            lexer.position(0),
        ));
    }

    let span = lexer.span_for(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Foreign, matched.clone(), span));
    lexer.advance_n(matched.len());
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = lexer.matched(regex);
    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    let span = lexer.span_for(value.len());
    lexer.push(MK_TOKEN!(kind, value.clone(), span));
    lexer.advance_n(value.len());
    Ok(())
}

fn integer_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);

    let (radix, digits_start) = match matched.get(..2) {
        Some("0b") => (Radix::Binary, 2),
        Some("0o") => (Radix::Octal, 2),
        Some("0x") => (Radix::Hexadecimal, 2),
        _ => (Radix::Decimal, 0),
    };

    let digits = &matched[digits_start..];
    if digits.is_empty() {
        return Err(Error::new(
            ErrorImpl::UnrecognisedToken { token: matched.clone() },
            lexer.position(0),
        ));
    }

    if let Some((offset, character)) = digits.char_indices().find(|(_, c)| !radix.accepts(*c)) {
        return Err(Error::new(
            ErrorImpl::IllegalIntegerLiteral {
                radix: radix.to_string(),
                character,
            },
            lexer.position(digits_start + offset),
        ));
    }

    let span = lexer.span_for(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Integer(radix), digits.to_string(), span));
    lexer.advance_n(matched.len());
    Ok(())
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    let string_literal = &matched[1..matched.len() - 1];

    let mut result = String::new();
    let mut chars = string_literal.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek().map(|(_, next)| *next) {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('0') => result.push('\0'),
            Some('x') => {
                chars.next();

                let mut hex = String::new();
                while hex.len() < 2 {
                    match chars.peek() {
                        Some((_, c)) if c.is_ascii_hexdigit() => {
                            hex.push(*c);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) if byte.is_ascii() => result.push(byte as char),
                    // String values are UTF-8, a lone high byte has no encoding
                    Ok(_) => {
                        return Err(Error::new(
                            ErrorImpl::IllegalEscape {
                                escape: format!("\\x{}", hex),
                            },
                            lexer.position(1 + offset),
                        ))
                    }
                    // Not an escape after all
                    Err(_) => result.push_str("\\x"),
                }
                continue;
            }
            // Unknown escapes keep their backslash
            _ => {
                result.push(ch);
                continue;
            }
        }

        chars.next();
    }

    let span = lexer.span_for(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::String, result, span));
    lexer.advance_n(matched.len());
    Ok(())
}

fn unterminated_string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    Err(Error::new(
        ErrorImpl::MissingClosing {
            delimiter: String::from("\""),
        },
        lexer.position(0),
    ))
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let pattern = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex)?,
            None => {
                let token = lex.remainder().chars().next().map(String::from).unwrap_or_default();
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken { token },
                    lex.position(0),
                ));
            }
        }
    }

    let span = lex.span_for(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));

    debug!("Tokenized {} into {} tokens", lex.file, lex.tokens.len());
    Ok(lex.tokens)
}
