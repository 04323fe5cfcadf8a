//! Composite command implementation

use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli::CompositeArgs;
use crate::error::Result;

/// Run composite command
pub fn run(config: Option<PathBuf>, args: CompositeArgs) -> Result<()> {
    let config_path = super::config_path(config);
    let context = super::build_context(&config_path)?;

    let documents = context.composite_documents()?;
    let document = if args.artifacts {
        &documents.artifacts
    } else {
        &documents.content
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(&document.bytes)?;
    Ok(())
}
