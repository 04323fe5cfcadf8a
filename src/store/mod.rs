//! YAML-backed update-site record store
//!
//! A site lives as a definition file (title, revision stamp, and a `units`
//! list tagged `kind: feature` / `kind: plugin`) next to a directory of jar
//! attachments. Loading materializes the records up front; binaries stay in
//! the attachment directory and are served through [`AttachmentStore`].
//!
//! Records with an empty id are dropped at load time. A unit with an
//! unknown kind, or an otherwise malformed definition, fails the load.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::{AttachmentStore, FeatureRecord, PluginRecord, SiteData};
use crate::error::{BrowserError, Result};

#[derive(Debug, Deserialize)]
struct SiteDefinition {
    title: String,
    #[serde(default)]
    timestamp: i64,
    #[serde(default)]
    units: Vec<UnitEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum UnitEntry {
    Feature(FeatureRecord),
    Plugin(PluginRecord),
}

/// Loads a site definition and pairs it with its attachment store
pub fn load_site(
    definition: &Path,
    attachments: &Path,
) -> Result<(SiteData, DirectoryAttachmentStore)> {
    let text = fs::read_to_string(definition).map_err(|e| BrowserError::Backend {
        message: format!("cannot read site definition {}: {e}", definition.display()),
    })?;
    let parsed: SiteDefinition =
        serde_yaml::from_str(&text).map_err(|e| BrowserError::SiteDefinitionInvalid {
            path: definition.display().to_string(),
            reason: e.to_string(),
        })?;

    let mut data = SiteData {
        title: parsed.title,
        timestamp: parsed.timestamp,
        features: Vec::new(),
        plugins: Vec::new(),
    };
    for unit in parsed.units {
        match unit {
            UnitEntry::Feature(feature) if !feature.id.is_empty() => data.features.push(feature),
            UnitEntry::Plugin(plugin) if !plugin.id.is_empty() => data.plugins.push(plugin),
            _ => {}
        }
    }

    Ok((data, DirectoryAttachmentStore::new(attachments)))
}

/// Attachment store over a flat directory of jar files
#[derive(Debug, Clone)]
pub struct DirectoryAttachmentStore {
    dir: PathBuf,
}

impl DirectoryAttachmentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectoryAttachmentStore { dir: dir.into() }
    }

    fn entry_path(&self, name: &str) -> Result<PathBuf> {
        // Attachment keys are plain file names, never paths
        if name.contains(['/', '\\']) {
            return Err(BrowserError::AttachmentMissing {
                name: name.to_string(),
            });
        }
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(BrowserError::AttachmentMissing {
                name: name.to_string(),
            });
        }
        Ok(path)
    }
}

impl AttachmentStore for DirectoryAttachmentStore {
    fn size(&self, name: &str) -> Result<u64> {
        Ok(fs::metadata(self.entry_path(name)?)?.len())
    }

    fn extract(&self, name: &str, dest: &Path) -> Result<()> {
        fs::copy(self.entry_path(name)?, dest)?;
        Ok(())
    }
}
