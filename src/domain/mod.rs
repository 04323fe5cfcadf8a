//! Domain model for update-site content
//!
//! Contains the software unit records (features and plugins/bundles) that
//! update-site metadata is generated from, the attachment-store collaborator
//! trait backing their binaries, and the display-string translation lookup.

mod translate;
mod unit;

pub use translate::{TableTranslator, Translator};
pub use unit::{AttachmentStore, FeatureRecord, PluginRecord, SiteData, UnitRef, DEFAULT_VERSION};
