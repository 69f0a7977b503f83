//! Runs the pipeline described by a [`Config`].

use std::{fs, path::Path, rc::Rc, time::Instant};

use inkwell::context::Context;
use log::info;

use crate::{
    compiler::compiler::compile,
    config::{Config, Stage},
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
    Position,
};

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// The printed form of the stage the run stopped after.
    Text(String),
    /// Assembly and object files were written.
    Emitted,
}

/// Runs the configured stages over `source`.
///
/// Artifacts of a full compilation are written to the working directory.
pub fn run_source(config: &Config, source: String) -> Result<Output, Error> {
    let file_name = config.file_name();
    let start = Instant::now();

    let tokens = tokenize(source, Some(file_name.clone()))?;
    info!("Tokenized in {:?}", start.elapsed());

    if config.stop_after == Some(Stage::Lex) {
        let lines: Vec<String> = tokens.iter().map(|token| token.to_string()).collect();
        return Ok(Output::Text(lines.join("\n") + "\n"));
    }

    let parse_start = Instant::now();
    let mut file = parse(tokens, Rc::new(file_name.clone()))?;
    info!("Parsed in {:?}", parse_start.elapsed());

    if config.stop_after == Some(Stage::Parse) {
        return Ok(Output::Text(file.to_string()));
    }

    let type_check_start = Instant::now();
    type_check(&mut file)?;
    info!("Type checked in {:?}", type_check_start.elapsed());

    if config.stop_after == Some(Stage::Sema) {
        return Ok(Output::Text(format!("{:#}", file)));
    }

    let compile_start = Instant::now();
    let context = Context::create();
    let compiler = compile(&mut file, &file_name, &context)?;
    info!("Compiled in {:?}", compile_start.elapsed());

    if config.stop_after == Some(Stage::Ir) {
        return Ok(Output::Text(compiler.ir()));
    }

    compiler.emit(Path::new("."), &config.stem())?;
    info!("Total time: {:?}", start.elapsed());

    Ok(Output::Emitted)
}

/// Reads the input file, runs the pipeline and prints any textual output.
pub fn run(config: &Config) -> Result<(), Error> {
    let source = fs::read_to_string(&config.input_path).map_err(|error| {
        Error::new(
            ErrorImpl::InputUnreadable {
                path: config.input_path.to_string_lossy().into_owned(),
                message: error.to_string(),
            },
            Position::null(),
        )
    })?;

    match run_source(config, source)? {
        Output::Text(text) => print!("{}", text),
        Output::Emitted => {}
    }

    Ok(())
}
