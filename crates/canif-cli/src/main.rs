//! Command-line interface for canif.
//!
//! Reads one JSON-ish document from stdin, writes the reformatted
//! rendering to stdout:
//!
//!   canif [-i N | -f] [-j] [-T] [--ensure-ascii] [-I ENC] [-O ENC]

use std::io::{self, BufWriter, Read, Write};

use clap::{Arg, ArgAction, Command};

use canif_parse::Parser;
use canif_print::{JsonLowerer, PrintOptions, Printer};

use crate::encoding::{Encoding, EncodingWriter, SUPPORTED};

mod encoding;

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SUCCESS: i32 = 0;
const EXIT_SYNTAX_ERROR: i32 = 1;
const EXIT_USAGE_ERROR: i32 = 2;
const EXIT_IO_ERROR: i32 = 3;

// ============================================================================
// Options
// ============================================================================

/// Everything the flags decide.
#[derive(Debug, Clone)]
struct Options {
    indent: usize,
    json_output: bool,
    trailing_commas: bool,
    ensure_ascii: bool,
    input_encoding: Encoding,
    output_encoding: Encoding,
}

fn command() -> Command {
    Command::new("canif")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Pretty-print JSON and JSON-ish data")
        .arg(
            Arg::new("indent")
                .short('i')
                .long("indent")
                .value_name("N")
                .default_value("4")
                .value_parser(clap::value_parser!(usize))
                .help("Indent each level by N spaces (0 means flat, single-line output)"),
        )
        .arg(
            Arg::new("flatten")
                .short('f')
                .long("flatten")
                .action(ArgAction::SetTrue)
                .conflicts_with("indent")
                .help("Flatten output (equivalent to -i 0)"),
        )
        .arg(
            Arg::new("json-output")
                .short('j')
                .long("json-output")
                .action(ArgAction::SetTrue)
                .help("Convert data to valid JSON if it wasn't already (e.g. None becomes null)"),
        )
        .arg(
            Arg::new("no-trailing-commas")
                .short('T')
                .long("no-trailing-commas")
                .action(ArgAction::SetTrue)
                .help("Don't insert trailing commas after the last item in a sequence (implied by --json-output)"),
        )
        .arg(
            Arg::new("ensure-ascii")
                .long("ensure-ascii")
                .action(ArgAction::SetTrue)
                .help("Escape non-ASCII characters in string output as \\uXXXX sequences"),
        )
        .arg(
            Arg::new("input-encoding")
                .short('I')
                .long("input-encoding")
                .value_name("ENCODING")
                .default_value("utf-8")
                .help("Character set used for decoding the input (default: UTF-8)"),
        )
        .arg(
            Arg::new("output-encoding")
                .short('O')
                .long("output-encoding")
                .value_name("ENCODING")
                .default_value("utf-8")
                .help("Character set used for encoding the output (default: UTF-8)"),
        )
}

fn options_from_args(matches: &clap::ArgMatches) -> Result<Options, CliError> {
    let indent = if matches.get_flag("flatten") {
        0
    } else {
        matches.get_one::<usize>("indent").copied().unwrap_or(4)
    };
    let json_output = matches.get_flag("json-output");
    let encoding = |id: &str| -> Result<Encoding, CliError> {
        let name = matches
            .get_one::<String>(id)
            .map(String::as_str)
            .unwrap_or("utf-8");
        Encoding::by_name(name).ok_or_else(|| {
            CliError::Usage(format!(
                "unknown encoding '{name}', expected one of: {SUPPORTED}"
            ))
        })
    };
    Ok(Options {
        indent,
        json_output,
        trailing_commas: !json_output && !matches.get_flag("no-trailing-commas"),
        ensure_ascii: matches.get_flag("ensure-ascii"),
        input_encoding: encoding("input-encoding")?,
        output_encoding: encoding("output-encoding")?,
    })
}

impl Options {
    fn print_options(&self) -> PrintOptions {
        let options = PrintOptions::default()
            .indent(self.indent)
            .trailing_commas(self.trailing_commas)
            .ensure_ascii(self.ensure_ascii);
        if self.json_output {
            options.for_json()
        } else {
            options
        }
    }
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug)]
enum CliError {
    Syntax(canif_parse::Error),
    Io(io::Error),
    Usage(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Syntax(_) => EXIT_SYNTAX_ERROR,
            CliError::Io(_) => EXIT_IO_ERROR,
            CliError::Usage(_) => EXIT_USAGE_ERROR,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Syntax(err) => write!(f, "{err}"),
            CliError::Io(err) => write!(f, "{err}"),
            CliError::Usage(err) => write!(f, "{err}"),
        }
    }
}

impl From<canif_parse::Error> for CliError {
    fn from(err: canif_parse::Error) -> Self {
        match err {
            canif_parse::Error::Io(err) => CliError::Io(err),
            other => CliError::Syntax(other),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Io(err)
    }
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let matches = command().get_matches();
    let result = options_from_args(&matches).and_then(run);
    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("canif: error: {err}");
            std::process::exit(err.exit_code());
        }
    }
}

fn run(options: Options) -> Result<(), CliError> {
    let mut input = Vec::new();
    io::stdin().lock().read_to_end(&mut input)?;
    let source = options.input_encoding.decode(input)?;

    let stdout = io::stdout().lock();
    let out = EncodingWriter::new(BufWriter::new(stdout), options.output_encoding);
    translate(&source, &options, out)?;
    Ok(())
}

/// Drive the pipeline over one document.
fn translate<W: Write>(source: &str, options: &Options, out: W) -> Result<(), CliError> {
    let parser = Parser::new(source);
    let printer = Printer::new(out, options.print_options());
    if options.json_output {
        let mut sink = JsonLowerer::new(printer);
        parser.parse(&mut sink)?;
        sink.into_inner().finish()?;
    } else {
        let mut sink = printer;
        parser.parse(&mut sink)?;
        sink.finish()?;
    }
    Ok(())
}
