//! Site command implementation
//!
//! Generates one configured site's metadata directly from its record store,
//! without going through the aggregate tree.

use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli::SiteArgs;
use crate::config::BrowserConfig;
use crate::error::{BrowserError, Result};
use crate::p2::update_site;
use crate::store;

/// Run site command
pub fn run(config: Option<PathBuf>, args: SiteArgs) -> Result<()> {
    let config_path = super::config_path(config);
    let browser_config = BrowserConfig::load(&config_path)?;

    let location = browser_config
        .site_locations(&config_path)
        .into_iter()
        .find(|site| site.name == args.name)
        .ok_or(BrowserError::UnknownSite { name: args.name })?;

    let (data, attachment_store) = store::load_site(&location.definition, &location.attachments)?;
    let document = if args.artifacts {
        update_site::artifacts_xml(&data, &attachment_store)?
    } else {
        update_site::content_xml(&data)?
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(&document.bytes)?;
    Ok(())
}
