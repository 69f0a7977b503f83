//! Command-line configuration.
//!
//! ```text
//! jayc -i <path> [-emit-lex | -emit-parse | -emit-sema | -emit-ir]
//! ```

use std::{fmt::Display, path::PathBuf};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// The stage after which the pipeline stops and prints its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Sema,
    Ir,
}

impl Stage {
    pub fn from_flag(flag: &str) -> Option<Stage> {
        match flag {
            "-emit-lex" => Some(Stage::Lex),
            "-emit-parse" => Some(Stage::Parse),
            "-emit-sema" => Some(Stage::Sema),
            "-emit-ir" => Some(Stage::Ir),
            _ => None,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Lex => write!(f, "lex"),
            Stage::Parse => write!(f, "parse"),
            Stage::Sema => write!(f, "sema"),
            Stage::Ir => write!(f, "ir"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_path: PathBuf,
    /// `None` runs the full pipeline and writes assembly and object files.
    pub stop_after: Option<Stage>,
}

impl Config {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Config {
            input_path: input_path.into(),
            stop_after: None,
        }
    }

    pub fn stop_after(mut self, stage: Stage) -> Self {
        self.stop_after = Some(stage);
        self
    }

    /// Builds a configuration from the program arguments, without the
    /// program name. The last `-emit-*` flag wins.
    pub fn from_args<I, S>(args: I) -> Result<Config, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut input_path = None;
        let mut stop_after = None;

        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            if arg == "-i" {
                let path = args
                    .next()
                    .ok_or_else(|| Error::new(ErrorImpl::MissingInput, Position::null()))?;
                input_path = Some(PathBuf::from(path));
                continue;
            }

            match Stage::from_flag(&arg) {
                Some(stage) => stop_after = Some(stage),
                None => {
                    return Err(Error::new(
                        ErrorImpl::UnknownArgument { argument: arg },
                        Position::null(),
                    ))
                }
            }
        }

        let input_path =
            input_path.ok_or_else(|| Error::new(ErrorImpl::MissingInput, Position::null()))?;

        Ok(Config {
            input_path,
            stop_after,
        })
    }

    /// The input file name without directories or extension.
    pub fn stem(&self) -> String {
        self.input_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("out"))
    }

    /// The input file name as shown in diagnostics.
    pub fn file_name(&self) -> String {
        self.input_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input_path.to_string_lossy().into_owned())
    }
}
