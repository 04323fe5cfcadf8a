//! Show command implementation
//!
//! Resolves a path across all sources. Files stream their bytes to stdout
//! unmodified; folders print their merged listing. An unresolved path is a
//! normal negative for the core, surfaced here as a nonzero exit.

use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli::ShowArgs;
use crate::error::{BrowserError, Result};
use crate::vfs::Resource;

/// Run show command
pub fn run(config: Option<PathBuf>, args: ShowArgs) -> Result<()> {
    let config_path = super::config_path(config);
    let context = super::build_context(&config_path)?;

    match context.resolve(&args.path)? {
        Some(Resource::File(file)) => {
            let mut reader = file.open()?;
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            io::copy(&mut reader, &mut handle)?;
            handle.flush()?;
            Ok(())
        }
        Some(Resource::Folder(folder)) => {
            for resource in context.merged_listing(folder.path())? {
                if resource.is_folder() {
                    println!("{}/", resource.name());
                } else {
                    println!("{}", resource.name());
                }
            }
            Ok(())
        }
        None => Err(BrowserError::ResourceNotFound { path: args.path }),
    }
}
