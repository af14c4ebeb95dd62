//! Batch runner for FALL programs: read a source file, interpret it, print
//! the transcript.

use std::env;
use std::fs;
use std::process;

use fall::{EvaluationMode, Interpreter, Lexer, Parser};
use fall::runtime::Environment;

fn usage() -> ! {
    eprintln!("Usage: fall_run [OPTIONS] <file.fall>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tokens      Dump the token stream before interpreting");
    eprintln!("  --json        Emit proof reports as JSON after the transcript");
    eprintln!("  --structural  Evaluate assertions with the structural missing-value policy");
    process::exit(2);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut path = None;
    let mut show_tokens = false;
    let mut emit_json = false;
    let mut mode = EvaluationMode::Strict;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--tokens" => show_tokens = true,
            "--json" => emit_json = true,
            "--structural" => mode = EvaluationMode::Structural,
            "--help" | "-h" => usage(),
            other if other.starts_with('-') => {
                eprintln!("Unknown option: {other}");
                usage();
            }
            other => {
                if path.replace(other.to_string()).is_some() {
                    eprintln!("Only one input file is supported");
                    usage();
                }
            }
        }
    }

    let Some(path) = path else { usage() };

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {path}: {error}");
            process::exit(1);
        }
    };

    let tokens = Lexer::new(&source).scan();
    if show_tokens {
        for token in &tokens {
            println!("{token}");
        }
    }

    let mut parser = Parser::new(&tokens);
    let program = parser.parse();
    for error in parser.errors() {
        eprintln!("parse error: {error}");
    }

    let mut interpreter =
        Interpreter::with_environment(Environment::with_evaluation_mode(mode));
    interpreter.interpret(&program);

    let transcript = interpreter.output();
    if !transcript.is_empty() {
        println!("{transcript}");
    }

    if emit_json {
        for report in &interpreter.environment.reports {
            match report.to_json() {
                Ok(json) => println!("{json}"),
                Err(error) => eprintln!("Failed to serialize report: {error}"),
            }
        }
    }
}
