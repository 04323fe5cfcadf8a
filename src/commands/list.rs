//! List command implementation
//!
//! Prints the merged, sorted listing at a path: folders first (marked with a
//! trailing separator), then files, case-insensitively by name.

use std::path::PathBuf;

use console::Style;

use crate::cli::ListArgs;
use crate::error::Result;
use crate::vfs::Resource;

/// Run list command
pub fn run(config: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let config_path = super::config_path(config);
    let context = super::build_context(&config_path)?;

    let listing = context.merged_listing(&args.path)?;
    if listing.is_empty() {
        println!("No entries.");
        return Ok(());
    }

    let folder_style = Style::new().bold().cyan();
    for resource in &listing {
        match resource {
            Resource::Folder(folder) => {
                let name = format!("{}/", folder.name());
                if args.long {
                    println!("{:>12}  {:>15}  {}", "-", folder.last_modified(), folder_style.apply_to(name));
                } else {
                    println!("{}", folder_style.apply_to(name));
                }
            }
            Resource::File(file) => {
                if args.long {
                    println!("{:>12}  {:>15}  {}", file.size(), file.last_modified(), file.name());
                } else {
                    println!("{}", file.name());
                }
            }
        }
    }

    Ok(())
}
