//! Software unit records
//!
//! A site is described by two ordered lists of records: features and
//! plugins (OSGi bundles). Records arrive fully materialized from a record
//! store; the fields here are copied through to generated metadata verbatim,
//! with absent versions defaulting to `0.0.0`. No version or range syntax is
//! validated anywhere in this crate.

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::p2::manifest;

/// Default version literal used wherever a record omits one
pub const DEFAULT_VERSION: &str = "0.0.0";

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

/// A (unit id, version-or-range) pair referenced by a requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRef {
    pub id: String,
    pub version: String,
}

/// An Eclipse feature record
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureRecord {
    pub id: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Display name
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_url: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub license_url: String,
    #[serde(default)]
    pub copyright: String,
    #[serde(default)]
    pub copyright_url: String,
    #[serde(default)]
    pub category: String,
    /// Required feature ids, paired element-wise with `required_feature_ranges`
    #[serde(default)]
    pub required_features: Vec<String>,
    /// Version ranges for `required_features`; may be shorter than the id list
    #[serde(default)]
    pub required_feature_ranges: Vec<String>,
    /// Embedded plugin ids, paired element-wise with `plugin_versions`
    #[serde(default)]
    pub plugins: Vec<String>,
    #[serde(default)]
    pub plugin_versions: Vec<String>,
    /// Epoch milliseconds of the backing binary
    #[serde(default)]
    pub last_modified: i64,
    /// Key of the feature jar in the site's attachment store
    pub attachment: String,
}

impl FeatureRecord {
    /// File name the feature jar is exposed under
    pub fn file_name(&self) -> String {
        format!("{}_{}.jar", self.id, self.version)
    }

    /// Embedded plugin references, skipping entries with an empty id and
    /// defaulting a missing companion version at the same index
    pub fn embedded_plugins(&self) -> Vec<UnitRef> {
        let mut result = Vec::new();
        for (i, id) in self.plugins.iter().enumerate() {
            if id.is_empty() {
                continue;
            }
            let version = match self.plugin_versions.get(i) {
                Some(v) if !v.is_empty() => v.clone(),
                _ => DEFAULT_VERSION.to_string(),
            };
            result.push(UnitRef {
                id: id.clone(),
                version,
            });
        }
        result
    }
}

/// An OSGi plugin/bundle record
#[derive(Debug, Clone, Deserialize)]
pub struct PluginRecord {
    pub id: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub fragment: bool,
    /// Verbatim MANIFEST.MF text of the bundle
    #[serde(default)]
    pub manifest: String,
    /// Epoch milliseconds of the backing binary
    #[serde(default)]
    pub last_modified: i64,
    /// Key of the bundle jar in the site's attachment store
    pub attachment: String,
}

impl PluginRecord {
    /// File name the bundle jar is exposed under
    pub fn file_name(&self) -> String {
        format!("{}_{}.jar", self.id, self.version)
    }

    /// Host bundle id, when this bundle is a fragment
    pub fn fragment_host(&self) -> Result<Option<String>> {
        let headers = manifest::parse_manifest(&self.manifest)?;
        Ok(headers
            .get("Fragment-Host")
            .and_then(|v| manifest::parse_header(v).ok())
            .and_then(|els| els.first().map(|el| el.value().to_string())))
    }

    /// Non-optional `Require-Bundle` entries from the manifest
    pub fn required_bundles(&self) -> Result<Vec<UnitRef>> {
        let headers = manifest::parse_manifest(&self.manifest)?;
        manifest::requirement_refs(headers.get("Require-Bundle").map(String::as_str))
    }

    /// Non-optional `Import-Package` entries from the manifest
    pub fn imported_packages(&self) -> Result<Vec<UnitRef>> {
        let headers = manifest::parse_manifest(&self.manifest)?;
        manifest::requirement_refs(headers.get("Import-Package").map(String::as_str))
    }
}

/// Fully materialized content of one update site
#[derive(Debug, Clone, Default)]
pub struct SiteData {
    /// Display title of the site
    pub title: String,
    /// Site revision stamp in epoch milliseconds
    pub timestamp: i64,
    pub features: Vec<FeatureRecord>,
    pub plugins: Vec<PluginRecord>,
}

/// Store holding the binary artifacts of a site's records.
///
/// The extraction API is file-based: a caller extracts into a path it
/// controls (usually a temporary file it deletes after streaming). `close`
/// releases any native handle the store holds and must be idempotent.
pub trait AttachmentStore {
    /// Size of the named attachment in bytes
    fn size(&self, name: &str) -> Result<u64>;

    /// Extracts the named attachment into `dest`, replacing its content
    fn extract(&self, name: &str, dest: &Path) -> Result<()>;

    fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_with_plugins(ids: &[&str], versions: &[&str]) -> FeatureRecord {
        FeatureRecord {
            id: "com.example.feat".to_string(),
            version: "1.0.0".to_string(),
            label: String::new(),
            description: String::new(),
            description_url: String::new(),
            license: String::new(),
            license_url: String::new(),
            copyright: String::new(),
            copyright_url: String::new(),
            category: String::new(),
            required_features: Vec::new(),
            required_feature_ranges: Vec::new(),
            plugins: ids.iter().map(ToString::to_string).collect(),
            plugin_versions: versions.iter().map(ToString::to_string).collect(),
            last_modified: 0,
            attachment: "com.example.feat_1.0.0.jar".to_string(),
        }
    }

    #[test]
    fn test_embedded_plugins_default_missing_versions() {
        let feature = feature_with_plugins(&["a", "b"], &["1.2.3"]);
        let plugins = feature.embedded_plugins();
        assert_eq!(plugins.len(), 2);
        assert_eq!(plugins[0].version, "1.2.3");
        assert_eq!(plugins[1].version, "0.0.0");
    }

    #[test]
    fn test_embedded_plugins_skip_empty_ids() {
        let feature = feature_with_plugins(&["a", "", "c"], &["1", "2", ""]);
        let plugins = feature.embedded_plugins();
        assert_eq!(plugins.len(), 2);
        assert_eq!(plugins[0].id, "a");
        assert_eq!(plugins[1].id, "c");
        assert_eq!(plugins[1].version, "0.0.0");
    }

    #[test]
    fn test_file_name() {
        let feature = feature_with_plugins(&[], &[]);
        assert_eq!(feature.file_name(), "com.example.feat_1.0.0.jar");
    }

    #[test]
    fn test_fragment_host_from_manifest() {
        let plugin = PluginRecord {
            id: "com.example.nl".to_string(),
            version: "1.0.0".to_string(),
            name: String::new(),
            provider: String::new(),
            fragment: true,
            manifest: "Manifest-Version: 1.0\nFragment-Host: com.example.host;bundle-version=\"1.0.0\"\n"
                .to_string(),
            last_modified: 0,
            attachment: "x.jar".to_string(),
        };
        assert_eq!(
            plugin.fragment_host().unwrap(),
            Some("com.example.host".to_string())
        );
    }
}
