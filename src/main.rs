// jackparse: parse Jack source or token files and print the result

use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use thiserror::Error;
use tracing::{info, Level};

use jackparse::parser::cursor::Cursor;
use jackparse::parser::declarations::{
    parse_class, parse_class_variable_declarations, parse_subroutine_declaration,
    parse_subroutine_declarations, parse_variable_declarations,
};
use jackparse::parser::expressions::parse_expression;
use jackparse::parser::lexer::SourceLocation;
use jackparse::parser::parse::{complete, InputError, ParseError, Parsed, Parser};
use jackparse::parser::statements::{parse_statement, parse_statements};
use jackparse::parser::token::write_tokens;
use jackparse::printer::print_statements;

#[derive(Debug, ClapParser)]
#[command(
    name = "jackparse",
    version,
    about = "Parse Jack source or token files and print the syntax tree"
)]
struct Args {
    /// Input file: Jack source or a "<kind> <payload>" token file
    file: PathBuf,

    /// How to read the input; `auto` lexes `.jack` files and reads anything else as tokens
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    format: InputFormat,

    /// Grammar rule to parse the input with
    #[arg(long, value_enum, default_value_t = Rule::Class)]
    rule: Rule,

    /// What to print on success
    #[arg(long, value_enum, default_value_t = Emit::Source)]
    emit: Emit,

    /// Report leftover tokens instead of failing on them
    #[arg(long)]
    allow_trailing: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Auto,
    Source,
    Tokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Rule {
    Class,
    Subroutine,
    Subroutines,
    ClassVariables,
    Variables,
    Statements,
    Statement,
    Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Normalized Jack source
    Source,
    /// Debug dump of the syntax tree
    Ast,
    /// The token sequence in token file format
    Tokens,
}

/// Everything that can end a run with a non-zero exit status
#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A parse error in lexed source, where the offending token has a position
    #[error("{error} ({location})")]
    ParseAt {
        error: ParseError,
        location: SourceLocation,
    },
}

/// A parsed node, rendered according to `--emit`.
struct Output {
    source: String,
    ast: String,
}

impl Output {
    fn node<T: Display + std::fmt::Debug>(node: &T) -> Self {
        Self {
            source: node.to_string(),
            ast: format!("{:#?}", node),
        }
    }

    fn list<T: Display + std::fmt::Debug>(nodes: &[T]) -> Self {
        Self {
            source: nodes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
            ast: format!("{:#?}", nodes),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", styled("error:", true), err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn styled(prefix: &str, is_error: bool) -> String {
    if !io::stderr().is_tty() {
        return prefix.to_string();
    }
    if is_error {
        prefix.red().bold().to_string()
    } else {
        prefix.yellow().bold().to_string()
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let text = fs::read_to_string(&args.file).map_err(|source| CliError::Read {
        path: args.file.clone(),
        source,
    })?;

    let parser = match resolve_format(args.format, &args.file) {
        InputFormat::Source => Parser::new(&text),
        _ => Parser::from_token_file(&text),
    }?;
    info!(file = %args.file.display(), tokens = parser.tokens().len(), "loaded input");

    if args.emit == Emit::Tokens {
        print!("{}", write_tokens(parser.tokens()));
        return Ok(());
    }

    let output = parse_with_rule(&parser, args.rule, args.allow_trailing)
        .map_err(|e| locate(&parser, e))?;

    match args.emit {
        Emit::Source => println!("{}", output.source),
        Emit::Ast => println!("{}", output.ast),
        Emit::Tokens => {}
    }
    Ok(())
}

fn resolve_format(format: InputFormat, path: &Path) -> InputFormat {
    match format {
        InputFormat::Auto if path.extension().is_some_and(|ext| ext == "jack") => {
            InputFormat::Source
        }
        InputFormat::Auto => InputFormat::Tokens,
        other => other,
    }
}

/// Attach a source location to a parse error when the input was source text.
fn locate(parser: &Parser, error: ParseError) -> CliError {
    match parser.location_of(error.offset()) {
        Some(location) => CliError::ParseAt { error, location },
        None => CliError::Parse(error),
    }
}

fn parse_with_rule(
    parser: &Parser,
    rule: Rule,
    allow_trailing: bool,
) -> Result<Output, ParseError> {
    let cursor = parser.cursor();
    match rule {
        Rule::Class => finish("class declaration", cursor, parse_class(cursor), allow_trailing)
            .map(|n| Output::node(&n)),
        Rule::Subroutine => finish(
            "subroutine declaration",
            cursor,
            parse_subroutine_declaration(cursor),
            allow_trailing,
        )
        .map(|n| Output::node(&n)),
        Rule::Subroutines => finish(
            "subroutine declarations",
            cursor,
            parse_subroutine_declarations(cursor).map(Some),
            allow_trailing,
        )
        .map(|n| Output::list(&n)),
        Rule::ClassVariables => finish(
            "class variable declarations",
            cursor,
            parse_class_variable_declarations(cursor).map(Some),
            allow_trailing,
        )
        .map(|n| Output::list(&n)),
        Rule::Variables => finish(
            "variable declarations",
            cursor,
            parse_variable_declarations(cursor).map(Some),
            allow_trailing,
        )
        .map(|n| Output::list(&n)),
        Rule::Statements => finish(
            "statements",
            cursor,
            parse_statements(cursor).map(Some),
            allow_trailing,
        )
        .map(|n| Output {
            source: print_statements(&n),
            ast: format!("{:#?}", n),
        }),
        Rule::Statement => finish("statement", cursor, parse_statement(cursor), allow_trailing)
            .map(|n| Output::node(&n)),
        Rule::Expression => finish("expression", cursor, parse_expression(cursor), allow_trailing)
            .map(|n| Output::node(&n)),
    }
}

/// Whole-input parse, or with `allow_trailing` a prefix parse that reports
/// what was left over.
fn finish<'t, T>(
    unit: &'static str,
    cursor: Cursor<'t>,
    parsed: Parsed<'t, T>,
    allow_trailing: bool,
) -> Result<T, ParseError> {
    if !allow_trailing {
        return complete(unit, cursor, parsed);
    }

    let (node, rest) = parsed?.ok_or_else(|| cursor.unexpected(unit))?;

    if !rest.is_at_end() {
        eprintln!(
            "{} {} trailing token(s) after {}:",
            styled("warning:", false),
            rest.remaining(),
            unit
        );
        for token in rest.rest() {
            eprintln!("  {}", token);
        }
    }
    Ok(node)
}
