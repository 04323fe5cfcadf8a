//! Common test utilities for repobrowser integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A fully configured browser workspace on disk: a config file, a local
/// repository tree with one nested p2 repository, and one update site with
/// a feature and two plugins (one a fragment).
#[allow(dead_code)]
pub struct TestRepository {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to the workspace root (where repobrowser.yaml lives)
    pub path: PathBuf,
}

pub const CONFIG_YAML: &str = "\
repository: repository
sites:
  - name: releases
    definition: sites/releases.yaml
strings:
  app_name: Example Repository
";

pub const RELEASES_YAML: &str = "\
title: Example Releases
timestamp: 1600000000000
units:
  - kind: feature
    id: com.example.feat
    version: 1.0.0
    label: Example Feature
    description: An example feature
    description_url: https://example.com/feat
    license: Example license text
    license_url: https://example.com/license
    copyright: Example copyright
    copyright_url: https://example.com/copyright
    required_features:
      - com.example.dep
    plugins:
      - com.example.bundle
    plugin_versions:
      - 2.0.0
    last_modified: 1600000000000
    attachment: com.example.feat_1.0.0.jar
  - kind: plugin
    id: com.example.bundle
    version: 2.0.0
    name: Example Bundle
    provider: Example Corp
    manifest: |
      Manifest-Version: 1.0
      Bundle-SymbolicName: com.example.bundle
      Require-Bundle: org.eclipse.core.runtime,org.junit;resolution:=optional
      Import-Package: com.example.api;version=\"[1.0,2.0)\"
    last_modified: 1600000000000
    attachment: com.example.bundle_2.0.0.jar
  - kind: plugin
    id: com.example.bundle.nl
    version: 2.0.0
    name: Example Bundle NL
    provider: Example Corp
    fragment: true
    manifest: |
      Manifest-Version: 1.0
      Bundle-SymbolicName: com.example.bundle.nl
      Fragment-Host: com.example.bundle
    last_modified: 1600000000000
    attachment: com.example.bundle.nl_2.0.0.jar
";

impl TestRepository {
    /// Create a new test repository workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let repo = Self { temp, path };

        repo.write_file("repobrowser.yaml", CONFIG_YAML);
        repo.write_file("sites/releases.yaml", RELEASES_YAML);
        repo.write_file("sites/com.example.feat_1.0.0.jar", "feature-jar-bytes");
        repo.write_file("sites/com.example.bundle_2.0.0.jar", "bundle-jar-bytes");
        repo.write_file("sites/com.example.bundle.nl_2.0.0.jar", "fragment-jar");

        // A nested p2 repository inside the local tree, picked up by the
        // composite discovery pass
        repo.write_file("repository/archive/2023-06/content.xml", "<x/>");
        repo.write_file("repository/archive/2023-06/artifacts.xml", "<x/>");
        repo.write_file("repository/readme.txt", "plain file");

        repo
    }

    /// Write a file in the workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }
}
