//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// repobrowser - p2 repository browser
///
/// Browse aggregated update-site content and generate the p2 metadata
/// documents provisioning clients consume.
#[derive(Parser, Debug)]
#[command(
    name = "repobrowser",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Browse aggregated update-site content and its p2 metadata",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  repobrowser list\n    \
                  repobrowser list releases/plugins --long\n    \
                  repobrowser show releases/content.xml\n    \
                  repobrowser composite --artifacts\n    \
                  repobrowser site releases"
)]
pub struct Cli {
    /// Configuration file (defaults to repobrowser.yaml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the merged directory entries at a path
    List(ListArgs),

    /// Print a file's bytes, or a folder's listing
    Show(ShowArgs),

    /// Print a composite repository descriptor for the aggregate root
    Composite(CompositeArgs),

    /// Print a single site's update-site metadata
    Site(SiteArgs),
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Path to list, relative to the aggregate root
    #[arg(default_value = "")]
    pub path: String,

    /// Show sizes and modification stamps
    #[arg(long, short = 'l')]
    pub long: bool,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Path to resolve, relative to the aggregate root
    pub path: String,
}

/// Arguments for the composite command
#[derive(Parser, Debug)]
pub struct CompositeArgs {
    /// Print compositeArtifacts.xml instead of compositeContent.xml
    #[arg(long)]
    pub artifacts: bool,
}

/// Arguments for the site command
#[derive(Parser, Debug)]
pub struct SiteArgs {
    /// Name of a configured site
    pub name: String,

    /// Print artifacts.xml instead of content.xml
    #[arg(long)]
    pub artifacts: bool,
}
