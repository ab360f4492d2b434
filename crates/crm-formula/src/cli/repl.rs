//! REPL implementation

use super::{eval, output, record};
use crate::eval::FormulaEngine;
use crate::lexer::tokenize;
use crate::types::Record;
use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;

/// Configuration for REPL
pub struct ReplConfig {
    pub record: Option<PathBuf>,
    pub now: Option<String>,
}

/// REPL state
struct ReplState {
    engine: FormulaEngine,
    /// Record formulas are evaluated against
    record: Record,
}

/// What the loop should do after a command
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the interactive REPL
pub fn run(config: ReplConfig) -> Result<()> {
    println!("{}", "Formula REPL".cyan().bold());
    println!("Type {} for help, {} to quit", ":help".green(), ":quit".green());
    println!();

    let mut state = ReplState {
        engine: eval::engine_for(config.now.as_deref())?,
        record: record::build_record(config.record.as_deref(), &[])?,
    };

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("formula> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line)?;

                if line.starts_with(':') {
                    match handle_command(line, &mut state) {
                        Ok(Flow::Quit) => break,
                        Ok(Flow::Continue) => {}
                        Err(e) => eprintln!("{}", output::format_error(&e)),
                    }
                    continue;
                }

                match evaluate_line(line, &state) {
                    Ok(result) => println!("{}", result),
                    Err(e) => eprintln!("{}", output::format_error(&e)),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Handle REPL commands (starting with :)
fn handle_command(command: &str, state: &mut ReplState) -> Result<Flow> {
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((command, ""));

    match name {
        ":help" | ":h" => print_help(),
        ":quit" | ":q" | ":exit" => return Ok(Flow::Quit),
        ":record" | ":r" => {
            if rest.is_empty() {
                anyhow::bail!("Usage: :record <file.json>");
            }
            state.record = record::load_record(&PathBuf::from(rest))?;
            println!(
                "{}",
                output::format_success(&format!("Loaded {} field(s)", state.record.len()))
            );
        }
        ":set" => {
            if rest.is_empty() {
                anyhow::bail!("Usage: :set <name>=<value>");
            }
            let (field, value) = record::parse_assignment(rest)?;
            println!("{} = {}", field.cyan(), value);
            state.record.insert(field, value);
        }
        ":show" | ":s" => print_record(&state.record),
        ":tokens" | ":t" => {
            if rest.is_empty() {
                anyhow::bail!("Usage: :tokens <formula>");
            }
            for token in tokenize(rest) {
                println!("  {}", token);
            }
        }
        other => anyhow::bail!("Unknown command: {}. Type :help for help", other),
    }
    Ok(Flow::Continue)
}

/// Evaluate a formula and describe the outcome
fn evaluate_line(formula: &str, state: &ReplState) -> Result<String> {
    let value = state
        .engine
        .evaluate(formula, &state.record)
        .map_err(eval::formula_error)?;

    let verdict = if value.is_truthy() {
        "violation".red()
    } else {
        "valid".green()
    };
    Ok(format!("{} {}", value.to_js_string(), format!("({})", verdict).dimmed()))
}

fn print_record(record: &Record) {
    if record.is_empty() {
        println!("(empty record)");
        return;
    }
    for (name, value) in record.iter() {
        println!("  {} = {}", name.cyan(), value.to_json());
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  {}  Show this help", ":help, :h".green());
    println!("  {}  Exit the REPL", ":quit, :q".green());
    println!("  {}  Load the record from a JSON file", ":record FILE".green());
    println!("  {}  Set a record field (JSON or bare string)", ":set NAME=VALUE".green());
    println!("  {}  Show the current record", ":show, :s".green());
    println!("  {}  Show the tokens of a formula", ":tokens FORMULA".green());
    println!();
    println!("Anything else is evaluated as a formula against the current record.");
    println!("A truthy result is a violation: the record would be rejected.");
}
