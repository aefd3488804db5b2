//! Ownergraph CLI - Resolve the ultimate owners of media outlets.

use clap::Parser;
use ownergraph_cli::commands;
use ownergraph_cli::repl;
use ownergraph_cli::cli::{ConfigAction, ConfigArgs};
use ownergraph_cli::{logging, Cli, Command, Config, Formatter, Session};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> ownergraph_cli::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // `config init` must work before any file exists
    let init = matches!(
        &cli.command,
        Some(Command::Config(ConfigArgs {
            action: ConfigAction::Init { .. }
        }))
    );

    // Flags and env vars win over the file, which wins over defaults
    let mut config = if init {
        Config::default()
    } else {
        Config::load(cli.config.as_deref())?
    };
    config.override_data(cli.entities, cli.relations);
    config.validate()?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Some(Command::Config(args)) => {
            commands::execute_config(args, &config, cli.config.as_deref(), &formatter)?;
        }
        Some(Command::Owners(args)) => {
            let session = Session::load(&config)?;
            commands::execute_owners(&args, &session, &formatter)?;
        }
        Some(Command::Check) => {
            let session = Session::load(&config)?;
            commands::execute_check(&session, &formatter)?;
        }
        None | Some(Command::Repl) => {
            let session = Session::load(&config)?;
            repl::run_repl(&session, &config, &formatter)?;
        }
    }

    Ok(())
}
