//! p2 provisioning metadata synthesis
//!
//! Generators for the four repository descriptors provisioning clients
//! consume: `content.xml` / `artifacts.xml` for a single update site, and
//! `compositeContent.xml` / `compositeArtifacts.xml` for the aggregate root.
//! Attribute names and values are a wire contract; the shapes here are kept
//! byte-for-byte compatible with what Eclipse tooling produces.

pub mod composite;
pub mod manifest;
pub mod update_site;
pub mod xml;

/// Capability namespace for installable units
pub const NS_IU: &str = "org.eclipse.equinox.p2.iu";
/// Capability namespace for OSGi bundles
pub const NS_BUNDLE: &str = "osgi.bundle";
/// Capability namespace for imported Java packages
pub const NS_PACKAGE: &str = "java.package";
/// Capability namespace for OSGi fragments
pub const NS_FRAGMENT: &str = "osgi.fragment";

/// MIME type reported for feature and bundle jars
pub const MIME_JAR: &str = "application/java-archive";

/// One synthesized repository descriptor, immutable once built
#[derive(Debug, Clone)]
pub struct RepositoryDocument {
    /// File name the document is exposed under (e.g. `content.xml`)
    pub file_name: String,
    /// Serialized XML bytes
    pub bytes: Vec<u8>,
    /// Epoch milliseconds, used by collaborators for caching
    pub last_modified: i64,
}
