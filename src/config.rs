//! Browser configuration
//!
//! Loaded from `repobrowser.yaml`: the local repository base directory, the
//! configured update sites, and the display-string table. A missing file
//! yields the defaults (a `repository/` directory next to the config path
//! and no sites); a file that exists but does not parse is an error.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BrowserError, Result};
use crate::registry::SiteLocation;

/// Default config filename
pub const CONFIG_FILE: &str = "repobrowser.yaml";

fn default_repository() -> PathBuf {
    PathBuf::from("repository")
}

/// Top-level browser configuration
#[derive(Debug, Deserialize)]
pub struct BrowserConfig {
    /// Local repository base directory, relative to the config file
    #[serde(default = "default_repository")]
    pub repository: PathBuf,
    #[serde(default)]
    pub sites: Vec<SiteEntry>,
    /// Display strings (`app_name` names the aggregate repository)
    #[serde(default)]
    pub strings: HashMap<String, String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        BrowserConfig {
            repository: default_repository(),
            sites: Vec::new(),
            strings: HashMap::new(),
        }
    }
}

/// One configured update site
#[derive(Debug, Clone, Deserialize)]
pub struct SiteEntry {
    /// Folder name the site is exposed under
    pub name: String,
    /// Site definition YAML, relative to the config file
    pub definition: PathBuf,
    /// Attachment directory; defaults to the definition's parent directory
    #[serde(default)]
    pub attachments: Option<PathBuf>,
}

impl BrowserConfig {
    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(BrowserConfig::default());
        }
        let text = fs::read_to_string(path).map_err(|e| BrowserError::ConfigReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml(&text, path)
    }

    pub fn from_yaml(text: &str, path: &Path) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| BrowserError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Repository base directory resolved against the config file location
    pub fn repository_dir(&self, config_path: &Path) -> PathBuf {
        resolve_against(config_path, &self.repository)
    }

    /// Site locations with all paths resolved against the config file
    pub fn site_locations(&self, config_path: &Path) -> Vec<SiteLocation> {
        self.sites
            .iter()
            .map(|site| {
                let definition = resolve_against(config_path, &site.definition);
                let attachments = match &site.attachments {
                    Some(dir) => resolve_against(config_path, dir),
                    None => definition
                        .parent()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| PathBuf::from(".")),
                };
                SiteLocation {
                    name: site.name.clone(),
                    definition,
                    attachments,
                }
            })
            .collect()
    }
}

fn resolve_against(config_path: &Path, relative: &Path) -> PathBuf {
    if relative.is_absolute() {
        relative.to_path_buf()
    } else {
        match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(relative),
            _ => relative.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_YAML: &str = "\
repository: content
sites:
  - name: releases
    definition: sites/releases.yaml
  - name: snapshots
    definition: sites/snapshots.yaml
    attachments: jars/snapshots
strings:
  app_name: Example Repository
";

    #[test]
    fn test_parse_full_config() {
        let config =
            BrowserConfig::from_yaml(CONFIG_YAML, Path::new("/srv/repobrowser.yaml")).unwrap();
        assert_eq!(config.repository, PathBuf::from("content"));
        assert_eq!(config.sites.len(), 2);
        assert_eq!(
            config.strings.get("app_name").map(String::as_str),
            Some("Example Repository")
        );
    }

    #[test]
    fn test_paths_resolve_against_config_location() {
        let config =
            BrowserConfig::from_yaml(CONFIG_YAML, Path::new("/srv/repobrowser.yaml")).unwrap();
        let config_path = Path::new("/srv/repobrowser.yaml");
        assert_eq!(
            config.repository_dir(config_path),
            PathBuf::from("/srv/content")
        );
        let sites = config.site_locations(config_path);
        assert_eq!(sites[0].definition, PathBuf::from("/srv/sites/releases.yaml"));
        // attachments default next to the definition
        assert_eq!(sites[0].attachments, PathBuf::from("/srv/sites"));
        assert_eq!(sites[1].attachments, PathBuf::from("/srv/jars/snapshots"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = BrowserConfig::load(Path::new("/definitely/not/here.yaml")).unwrap();
        assert_eq!(config.repository, PathBuf::from("repository"));
        assert!(config.sites.is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = BrowserConfig::from_yaml("repository: [oops", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, BrowserError::ConfigParseFailed { .. }));
    }
}
