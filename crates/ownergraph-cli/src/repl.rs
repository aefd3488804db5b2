//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! The corpus is loaded once; every query in the session reuses the same
//! name index and reverse graph.

use crate::cli::OwnersArgs;
use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config as EditorConfig, Editor};
use std::path::PathBuf;
use tracing::debug;

/// Run the interactive REPL.
pub fn run_repl(session: &Session, config: &Config, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("Ownergraph REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!(
        "{}",
        formatter.info(&format!(
            "{} entities, {} ownership edges loaded",
            session.corpus.entities.len(),
            session.graph.edge_count()
        ))
    );
    println!();

    let editor_config = EditorConfig::builder()
        .max_history_size(config.settings.history_size)?
        .auto_add_history(false)
        .build();
    let mut editor: Editor<(), DefaultHistory> = Editor::with_config(editor_config)?;

    let history_path = get_history_path()?;
    if let Err(e) = editor.load_history(&history_path) {
        debug!("No history loaded from {}: {}", history_path.display(), e);
    }

    loop {
        match editor.readline("ownergraph> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(ReplCommand::Owners(args)) => {
                        if let Err(e) = commands::execute_owners(&args, session, formatter) {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Ok(ReplCommand::Check) => {
                        if let Err(e) = commands::execute_check(session, formatter) {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    Check,
    Owners(OwnersArgs),
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let Some(command) = parts.first() else {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    };

    match *command {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "check" => Ok(ReplCommand::Check),
        "owners" | "o" => parse_owners_command(&parts[1..]),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            command
        ))),
    }
}

/// `owners [--any-type] [--limit N] <name...>`
///
/// Words after the options are joined with single spaces, so names such as
/// "Le Monde" need no quoting.
fn parse_owners_command(args: &[&str]) -> Result<ReplCommand> {
    let mut owners = OwnersArgs::default();
    let mut rest = args;

    while let Some((first, tail)) = rest.split_first() {
        match *first {
            "--any-type" => {
                owners.any_type = true;
                rest = tail;
            }
            "--limit" => {
                let (value, tail) = tail.split_first().ok_or_else(|| {
                    CliError::InvalidInput("--limit needs a number".to_string())
                })?;
                let limit = value.parse().map_err(|_| {
                    CliError::InvalidInput(format!("Invalid limit: {}", value))
                })?;
                owners.limit = Some(limit);
                rest = tail;
            }
            _ => break,
        }
    }

    if !rest.is_empty() {
        owners.name = Some(rest.join(" "));
    }

    Ok(ReplCommand::Owners(owners))
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let dir = home.join(".ownergraph");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  owners [--any-type] [--limit N] [name] - List the ultimate owners of an entity");
    println!("    name: entity name, case-insensitive (default: query.default_target)");
    println!("  check                                  - Show load and graph diagnostics");
    println!("  help, ?                                - Show this help");
    println!("  exit, quit, q                          - Exit REPL");
    println!();
}
