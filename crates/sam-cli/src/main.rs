mod common;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use owo_colors::OwoColorize;
use tracing::{info, Level};

use sam_analyzer::Analyzer;
use sam_compiler::Compiler;
use sam_lexer::Lexer;
use sam_parser::Parser as SamParser;
use sam_syntax::error::{Error, Result};
use sam_vm::{Vm, DEFAULT_MEMORY};

use crate::common::provide_error_suggestions;

#[derive(Parser, Debug)]
#[command(name = "sam", version, about = "Compile a sam program to bytecode and run it")]
struct Cli {
    /// Source file to run
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Print the output of a pipeline stage instead of running the program
    #[arg(long, value_enum)]
    emit: Option<Emit>,

    /// Stop after semantic analysis and print "ok"
    #[arg(long, conflicts_with = "emit")]
    check: bool,

    /// Number of VM memory slots
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MEMORY)]
    memory: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    Tokens,
    Ast,
    Bytecode,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn render_error(source: &str, err: &Error) {
    let kind = err.kind.to_string();
    eprintln!("{}: {}", kind.red().bold(), err.msg.red());
    if let (Some(line), Some(col)) = (err.line, err.col) {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src_line) = source.lines().nth(line.saturating_sub(1)) {
            let line_num_str = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", line_num_str.bright_black(), src_line);

            let mut marker = " ".repeat(line_num_str.len() + col.saturating_sub(1));
            marker.push('^');
            eprintln!("{}{}", marker.red(), " error here".red());
            eprintln!("     |");
        }
    }
    provide_error_suggestions(&err.msg);
}

fn fail(msg: String) -> ExitCode {
    eprintln!("{}: {}", "error".red().bold(), msg.red());
    ExitCode::FAILURE
}

/// Lex → parse → analyze → compile → run, stopping early for `--emit`
/// and `--check`.
fn run(cli: &Cli, src: &str) -> Result<()> {
    let tokens = Lexer::new(src).tokenize()?;
    if cli.emit == Some(Emit::Tokens) {
        for tok in &tokens {
            println!("{}:{} {:?} '{}'", tok.line, tok.col, tok.kind, tok.lexeme);
        }
        return Ok(());
    }

    let program = SamParser::new(tokens).parse_program()?;
    if cli.emit == Some(Emit::Ast) {
        println!("{:#?}", program);
        return Ok(());
    }

    Analyzer::new().analyze(&program)?;
    if cli.check {
        println!("ok");
        return Ok(());
    }

    let bytecode = Compiler::new().compile(&program)?;
    if cli.emit == Some(Emit::Bytecode) {
        print!("{}", bytecode);
        return Ok(());
    }

    let mut vm = Vm::new().with_memory(cli.memory);
    vm.run(&bytecode)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !cli.path.exists() {
        return fail(format!("File not found: {}", cli.path.display()));
    }
    let src = match fs::read_to_string(&cli.path) {
        Ok(s) => s,
        Err(e) => return fail(format!("Failed to read {}: {}", cli.path.display(), e)),
    };
    info!(path = %cli.path.display(), bytes = src.len(), "loaded source");

    match run(&cli, &src) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            render_error(&src, &e);
            ExitCode::FAILURE
        }
    }
}
