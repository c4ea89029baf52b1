//! Namesync CLI
//!
//! Command-line interface for source item / layer name synchronization.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::debug;

use namesync::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("Namesync v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = handle_command(cli.command) {
        if let Some(hint) = e.recovery_suggestion() {
            eprintln!("hint: {}", hint);
        }
        let code = e.error_code();
        return Err(e).context(format!("namesync failed [{}]", code));
    }
    Ok(())
}

fn handle_command(cmd: Commands) -> namesync::Result<()> {
    match cmd {
        Commands::Init { path, name } => commands::init(&path, name.as_deref()),
        Commands::AddItem { path, name } => commands::add_item(&path, &name),
        Commands::AddComp { path, name } => commands::add_comp(&path, &name),
        Commands::AddLayer {
            path,
            comp,
            name,
            source,
        } => commands::add_layer(&path, &comp, &name, source.as_deref()),
        Commands::Select { path, selection } => commands::select(&path, &selection),
        Commands::Sync {
            path,
            selection,
            exclude,
            interactive,
            policy,
            json,
        } => commands::sync(&path, &selection, &exclude, interactive, policy, json).map(|_| ()),
        Commands::Undo { path } => commands::undo(&path),
        Commands::Redo { path } => commands::redo(&path),
        Commands::History { path } => commands::show_history(&path),
        Commands::PrintState { path } => commands::print_state(&path),
    }
}
