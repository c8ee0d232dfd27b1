//! Lavoir CLI - prompt-driven data cleaning for tabular files.

mod cli;
mod commands;
mod table;

use clap::Parser;
use cli::{Cli, Commands};
use log::LevelFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Preview {
            file,
            rows,
            header,
            sentinel,
            header_row,
        } => commands::preview::run(file, rows, header, sentinel, header_row),

        Commands::Rules => commands::rules::run(),

        Commands::Clean {
            file,
            rule,
            kind,
            column,
            value,
            output,
        } => commands::clean::run(file, rule, kind, column, value, output),

        Commands::Chat {
            file,
            base_url,
            email,
        } => commands::chat::run(file, base_url, email),

        Commands::Kpi {
            prompt,
            file,
            base_url,
            email,
        } => commands::kpi::run(prompt, file, base_url, email),

        Commands::Admin { action, base_url } => commands::admin::run(action, base_url),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}
