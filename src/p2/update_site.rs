//! Update-site metadata generation
//!
//! Turns one site's feature and plugin records into the `content.xml` and
//! `artifacts.xml` documents a p2 client consumes. Values are copied from
//! the records verbatim with no version or range validation, and every `size`
//! attribute counts the elements actually emitted.

use crate::domain::{AttachmentStore, FeatureRecord, PluginRecord, SiteData, DEFAULT_VERSION};
use crate::error::{BrowserError, Result};
use crate::p2::xml::{Document, Element};
use crate::p2::{RepositoryDocument, MIME_JAR, NS_BUNDLE, NS_FRAGMENT, NS_IU, NS_PACKAGE};

const FEATURE_CLASSIFIER: &str = "org.eclipse.update.feature";
const BUNDLE_CLASSIFIER: &str = "osgi.bundle";

/// Generates the site's `content.xml`
pub fn content_xml(site: &SiteData) -> Result<RepositoryDocument> {
    let mut repository = Element::new("repository");
    repository.set_attr("name", &site.title);
    repository.set_attr(
        "type",
        "org.eclipse.equinox.internal.p2.metadata.repository.LocalMetadataRepository",
    );
    repository.set_attr("version", "1");
    add_repository_properties(&mut repository, site.timestamp);

    let units = repository.add_child("units");
    units.set_attr(
        "size",
        (site.features.len() + site.plugins.len()).to_string(),
    );
    for feature in &site.features {
        add_feature_unit(units, feature);
    }
    for plugin in &site.plugins {
        add_plugin_unit(units, plugin, &site.plugins)?;
    }

    let document = Document::new("metadataRepository", "version='1.1.0'", repository);
    Ok(RepositoryDocument {
        file_name: "content.xml".to_string(),
        bytes: document.to_bytes(),
        last_modified: site.timestamp,
    })
}

/// Generates the site's `artifacts.xml`
pub fn artifacts_xml(site: &SiteData, store: &dyn AttachmentStore) -> Result<RepositoryDocument> {
    let mut repository = Element::new("repository");
    repository.set_attr("name", format!("{} Artifacts", site.title));
    repository.set_attr(
        "type",
        "org.eclipse.equinox.p2.artifact.repository.simpleRepository",
    );
    repository.set_attr("version", "1");
    add_repository_properties(&mut repository, site.timestamp);

    let mappings = repository.add_child("mappings");
    mappings.set_attr("size", "3");
    for (filter, output) in [
        (
            "(& (classifier=osgi.bundle))",
            "${repoUrl}/plugins/${id}_${version}.jar",
        ),
        ("(& (classifier=binary))", "${repoUrl}/binary/${id}_${version}"),
        (
            "(& (classifier=org.eclipse.update.feature))",
            "${repoUrl}/features/${id}_${version}.jar",
        ),
    ] {
        let rule = mappings.add_child("rule");
        rule.set_attr("filter", filter);
        rule.set_attr("output", output);
    }

    let artifacts = repository.add_child("artifacts");
    artifacts.set_attr(
        "size",
        (site.features.len() + site.plugins.len()).to_string(),
    );
    for feature in &site.features {
        let size = store.size(&feature.attachment)?;
        let artifact = artifacts.add_child("artifact");
        artifact.set_attr("classifier", FEATURE_CLASSIFIER);
        artifact.set_attr("id", &feature.id);
        artifact.set_attr("version", &feature.version);
        let properties = artifact.add_child("properties");
        properties.set_attr("size", "3");
        add_property(properties, "artifact.size", size.to_string());
        add_property(properties, "download.size", size.to_string());
        add_property(properties, "download.contentType", MIME_JAR);
    }
    for plugin in &site.plugins {
        let size = store.size(&plugin.attachment)?;
        let artifact = artifacts.add_child("artifact");
        artifact.set_attr("classifier", BUNDLE_CLASSIFIER);
        artifact.set_attr("id", &plugin.id);
        artifact.set_attr("version", &plugin.version);
        let properties = artifact.add_child("properties");
        properties.set_attr("size", "2");
        add_property(properties, "artifact.size", size.to_string());
        add_property(properties, "download.size", size.to_string());
    }

    let document = Document::new("artifactRepository", "version='1.1.0'", repository);
    Ok(RepositoryDocument {
        file_name: "artifacts.xml".to_string(),
        bytes: document.to_bytes(),
        last_modified: site.timestamp,
    })
}

/// `p2.timestamp` / `p2.compressed`, shared by both documents
fn add_repository_properties(repository: &mut Element, timestamp: i64) {
    let properties = repository.add_child("properties");
    properties.set_attr("size", "2");
    add_property(properties, "p2.timestamp", timestamp.to_string());
    add_property(properties, "p2.compressed", "false");
}

fn add_property(parent: &mut Element, name: &str, value: impl Into<String>) {
    let property = parent.add_child("property");
    property.set_attr("name", name);
    property.set_attr("value", value);
}

fn add_update_descriptor(unit: &mut Element, id: &str, version: &str) {
    let update = unit.add_child("update");
    update.set_attr("id", format!("{id}.feature.group"));
    update.set_attr("range", format!("[0.0.0,{version})"));
    update.set_attr("severity", "0");
}

fn add_feature_unit(units: &mut Element, feature: &FeatureRecord) {
    let group_id = format!("{}.feature.group", feature.id);
    let unit = units.add_child("unit");
    unit.set_attr("id", &group_id);
    unit.set_attr("version", &feature.version);

    add_update_descriptor(unit, &feature.id, &feature.version);

    let properties = unit.add_child("properties");
    properties.set_attr("size", "4");
    add_property(properties, "org.eclipse.equinox.p2.name", &feature.label);
    add_property(
        properties,
        "org.eclipse.equinox.p2.description",
        &feature.description,
    );
    add_property(
        properties,
        "org.eclipse.equinox.p2.description.url",
        &feature.description_url,
    );
    add_property(properties, "org.eclipse.equinox.p2.type.group", "true");

    let provides = unit.add_child("provides");
    provides.set_attr("size", "1");
    let provided = provides.add_child("provided");
    provided.set_attr("namespace", NS_IU);
    provided.set_attr("name", &group_id);
    provided.set_attr("version", &feature.version);

    let requires = unit.add_child("requires");
    for (i, required_id) in feature.required_features.iter().enumerate() {
        if required_id.is_empty() {
            continue;
        }
        let range = match feature.required_feature_ranges.get(i) {
            Some(range) if !range.is_empty() => range.clone(),
            _ => DEFAULT_VERSION.to_string(),
        };
        let required = requires.add_child("required");
        required.set_attr("namespace", NS_IU);
        required.set_attr("name", format!("{required_id}.feature.group"));
        required.set_attr("range", range);
    }
    for plugin in feature.embedded_plugins() {
        let required = requires.add_child("required");
        required.set_attr("namespace", NS_IU);
        required.set_attr("name", &plugin.id);
        required.set_attr("range", format!("[{0},{0}]", plugin.version));
    }
    // Installing the feature jar itself is gated on the install-features flag
    let required = requires.add_child("required");
    required.set_attr("namespace", NS_IU);
    required.set_attr("name", format!("{}.feature.jar", feature.id));
    required.set_attr("range", format!("[{0},{0}]", feature.version));
    required
        .add_child("filter")
        .set_text("(org.eclipse.update.install.features=true)");
    let count = requires.child_count();
    requires.set_attr("size", count.to_string());

    let touchpoint = unit.add_child("touchpoint");
    touchpoint.set_attr("id", "null");
    touchpoint.set_attr("version", "0.0.0");

    let licenses = unit.add_child("licenses");
    licenses.set_attr("size", "1");
    let license = licenses.add_child("license");
    license.set_attr("uri", &feature.license_url);
    license.set_attr("url", &feature.license_url);
    license.set_text(&feature.license);

    let copyright = unit.add_child("copyright");
    copyright.set_attr("uri", &feature.copyright_url);
    copyright.set_attr("url", &feature.copyright_url);
    copyright.set_text(&feature.copyright);
}

fn add_plugin_unit(
    units: &mut Element,
    plugin: &PluginRecord,
    siblings: &[PluginRecord],
) -> Result<()> {
    let unit = units.add_child("unit");
    unit.set_attr("id", &plugin.id);
    unit.set_attr("version", &plugin.version);

    add_update_descriptor(unit, &plugin.id, &plugin.version);

    let properties = unit.add_child("properties");
    properties.set_attr("size", "2");
    add_property(properties, "org.eclipse.equinox.p2.name", &plugin.name);
    let provider = properties.add_child("provider");
    provider.set_attr("name", "org.eclipse.equinox.p2.provider");
    provider.set_attr("value", &plugin.provider);

    let provides = unit.add_child("provides");
    provides.set_attr("size", if plugin.fragment { "4" } else { "3" });
    for namespace in [NS_IU, NS_BUNDLE] {
        let provided = provides.add_child("provided");
        provided.set_attr("namespace", namespace);
        provided.set_attr("name", &plugin.id);
        provided.set_attr("version", &plugin.version);
    }
    let provided = provides.add_child("provided");
    provided.set_attr("namespace", "org.eclipse.equinox.p2.eclipse.type");
    provided.set_attr("name", "bundle");
    provided.set_attr("version", "1.0.0");
    if plugin.fragment {
        let host = plugin
            .fragment_host()?
            .ok_or_else(|| BrowserError::MissingManifestHeader {
                id: plugin.id.clone(),
                header: "Fragment-Host".to_string(),
            })?;
        // The host's version comes from this site's own plugin list
        let host_version = siblings
            .iter()
            .find(|p| p.id == host)
            .map_or(DEFAULT_VERSION, |p| p.version.as_str());
        let provided = provides.add_child("provided");
        provided.set_attr("namespace", NS_FRAGMENT);
        provided.set_attr("name", host);
        provided.set_attr("version", host_version);
    }

    let requires = unit.add_child("requires");
    for bundle in plugin.required_bundles()? {
        let required = requires.add_child("required");
        required.set_attr("namespace", NS_BUNDLE);
        required.set_attr("name", bundle.id);
        required.set_attr("range", bundle.version);
    }
    for package in plugin.imported_packages()? {
        let required = requires.add_child("required");
        required.set_attr("namespace", NS_PACKAGE);
        required.set_attr("name", package.id);
        required.set_attr("range", package.version);
    }
    let count = requires.child_count();
    requires.set_attr("size", count.to_string());

    let artifacts = unit.add_child("artifacts");
    artifacts.set_attr("size", "1");
    let artifact = artifacts.add_child("artifact");
    artifact.set_attr("classifier", BUNDLE_CLASSIFIER);
    artifact.set_attr("id", &plugin.id);
    artifact.set_attr("version", &plugin.version);

    let touchpoint = unit.add_child("touchpoint");
    touchpoint.set_attr("id", "org.eclipse.equinox.p2.osgi");
    touchpoint.set_attr("version", "1.0.0");

    let touchpoint_data = unit.add_child("touchpointData");
    touchpoint_data.set_attr("size", "1");
    let instructions = touchpoint_data.add_child("instructions");
    instructions.set_attr("size", "2");
    let zipped = instructions.add_child("instruction");
    zipped.set_attr("key", "zipped");
    zipped.set_text("false");
    let manifest = instructions.add_child("manifest");
    manifest.set_attr("key", "manifest");
    manifest.set_text(&plugin.manifest);

    Ok(())
}
