//! repobrowser - p2 repository browser
//!
//! Presents software-distribution content (OSGi bundles, Eclipse features,
//! and their p2 provisioning metadata) from multiple backing stores as one
//! browsable tree, and synthesizes the p2 repository descriptors
//! provisioning clients install from.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod p2;
mod registry;
mod store;
mod vfs;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List(args) => commands::list::run(cli.config, args),
        Commands::Show(args) => commands::show::run(cli.config, args),
        Commands::Composite(args) => commands::composite::run(cli.config, args),
        Commands::Site(args) => commands::site::run(cli.config, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
