//! Command implementations

pub mod composite;
pub mod list;
pub mod show;
pub mod site;

use std::path::PathBuf;

use crate::config::{BrowserConfig, CONFIG_FILE};
use crate::domain::TableTranslator;
use crate::error::Result;
use crate::registry::{
    Context, FilesystemProvider, LocalFilesystemProvider, UpdateSiteProvider,
};

/// Resolves the config path from the CLI argument or the default filename
pub fn config_path(config: Option<PathBuf>) -> PathBuf {
    config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Builds a fresh aggregation context from the configuration.
///
/// Provider registration order matches the original site layout: local
/// repository tree first, then the configured update sites; the composite
/// source is synthesized by the context itself.
pub fn build_context(config_path: &PathBuf) -> Result<Context> {
    let config = BrowserConfig::load(config_path)?;
    let providers: Vec<Box<dyn FilesystemProvider>> = vec![
        Box::new(LocalFilesystemProvider::new(
            config.repository_dir(config_path),
        )),
        Box::new(UpdateSiteProvider::new(config.site_locations(config_path))),
    ];
    Ok(Context::new(
        providers,
        Box::new(TableTranslator::new(config.strings)),
    ))
}
