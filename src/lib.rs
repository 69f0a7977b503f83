#![allow(clippy::module_inception)]

use std::{fs, path::Path, rc::Rc};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod compiler;
pub mod config;
pub mod driver;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }

    pub fn is_null(&self) -> bool {
        self.1.as_str() == "<null>"
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }

    /// Span covering `self` through `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}

/// Finds the line containing the byte offset `position`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` within that line, or `None` when the offset lies past the end
/// of the source.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    // End of input: point just past the last character of the last line
    content
        .split_inclusive('\n')
        .last()
        .map(|line| (line_number - 1, line.to_string(), line.trim_end_matches('\n').len()))
}

/// Renders a diagnostic for `error` in the form
///
/// ```text
/// Error: TypeMatchError (Expected type `i32` for `x`, received `i8*`)
/// -> main.jay
///    |
/// 20 | i32 x = "hello"
///    | --------^
/// ```
///
/// The source snippet is omitted when the error carries no position.
pub fn format_error(error: &Error, file: &Path, content: Option<&str>) -> String {
    let mut output = String::new();

    if let ErrorTip::None = error.get_tip() {
        output.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        output.push_str(&format!("Error: {} ({})\n", error.get_error_name(), error.get_tip()));
    }

    let position = error.get_position();
    let located = match content {
        Some(content) if !position.is_null() => get_line_at_position(content, position.0),
        _ => None,
    };

    let Some((line, line_text, line_pos)) = located else {
        output.push_str(&format!("-> {}\n", file.to_string_lossy()));
        return output;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    output.push_str(&format!("-> {}\n", file.to_string_lossy()));
    output.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    output.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    output.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    output
}

/// Prints the diagnostic for `error`, re-reading `file` for the source line.
pub fn display_error(error: &Error, file: &Path) {
    let content = fs::read_to_string(file).ok();
    eprint!("{}", format_error(error, file, content.as_deref()));
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, rc::Rc};

    use crate::{
        errors::errors::{Error, ErrorImpl},
        Position,
    };

    #[test]
    fn test_get_line_at_position() {
        let content = "Hello, world!\nsecond\n\n  Testing { }\n";

        let (line_number, line, line_pos) = super::get_line_at_position(content, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(content, 32).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "  Testing { }\n");
        assert_eq!(line_pos, 10);

        assert!(super::get_line_at_position(content, 500).is_none());
    }

    #[test]
    fn test_format_error_points_at_offset() {
        let content = "i32 main() {\n  i32 x = y\n}\n";
        let error = Error::new(
            ErrorImpl::UndeclaredReference { name: "y".to_string() },
            Position(23, Rc::new("main.jay".to_string())),
        );

        let rendered = super::format_error(&error, &PathBuf::from("main.jay"), Some(content));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Error: UndeclaredReference (Reference to undeclared name `y`)");
        assert_eq!(lines[1], "-> main.jay");
        assert_eq!(lines[3], "2 | i32 x = y");
        assert_eq!(lines[4], "  | --------^");
    }

    #[test]
    fn test_format_error_without_position() {
        let error = Error::new(ErrorImpl::MissingInput, Position::null());
        let rendered = super::format_error(&error, &PathBuf::from("<args>"), None);

        assert!(rendered.starts_with("Error: MissingInput"));
        assert_eq!(rendered.lines().count(), 2);
    }
}
