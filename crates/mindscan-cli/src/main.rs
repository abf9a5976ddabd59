//! Mindscan CLI - a private, local-first mood journal
//!
//! The presentation layer over `mindscan-core`: account signup and login,
//! journal submission with classifier fusion, and mood trends.

mod app;
mod classifier;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{accounts, entries, maintenance, misc};
use crate::constants::LOG_ENV;
use crate::errors::exit_code_for;

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    if let Err(err) = run(&ctx, &cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Signup(args) => accounts::handle_signup(ctx, args),
        Commands::Login(args) => accounts::handle_login(ctx, args),
        Commands::Add(args) => entries::handle_add(ctx, args),
        Commands::Trends(args) => entries::handle_trends(ctx, args),
        Commands::Migrate => maintenance::handle_migrate(ctx),
        Commands::Check => maintenance::handle_check(ctx),
        Commands::Completions(args) => misc::handle_completions(args.shell),
    }
}
