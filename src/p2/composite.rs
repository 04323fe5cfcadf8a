//! Composite repository metadata generation
//!
//! Walks every aggregated filesystem for nested p2 repositories: any folder
//! holding a `content.jar`/`content.xml` (metadata flavor) or
//! `artifacts.jar`/`artifacts.xml` (artifact flavor) at any depth, and
//! records each such folder as a `<child>` of the aggregate root's composite
//! descriptors. The synthesized composite source itself is never passed in
//! here, so it cannot discover its own output.

use crate::error::Result;
use crate::p2::xml::{Document, Element};
use crate::p2::RepositoryDocument;
use crate::vfs::{sort_resources, Filesystem, Folder, Resource};

/// The two composite descriptors for the aggregate root
#[derive(Debug, Clone)]
pub struct CompositeDocuments {
    pub content: RepositoryDocument,
    pub artifacts: RepositoryDocument,
}

/// Generates both composite documents over the given filesystems.
///
/// `display_name` becomes the repository `name` attribute on both.
pub fn generate(
    filesystems: &[&dyn Filesystem],
    display_name: &str,
) -> Result<CompositeDocuments> {
    let content = generate_document(
        filesystems,
        display_name,
        "compositeMetadataRepository",
        "compositeContent.xml",
        "org.eclipse.equinox.internal.p2.metadata.repository.CompositeMetadataRepository",
        &["content.jar", "content.xml"],
        true,
    )?;
    let artifacts = generate_document(
        filesystems,
        display_name,
        "compositeArtifactRepository",
        "compositeArtifacts.xml",
        "org.eclipse.equinox.internal.p2.artifact.repository.CompositeArtifactRepository",
        &["artifacts.jar", "artifacts.xml"],
        false,
    )?;
    Ok(CompositeDocuments { content, artifacts })
}

fn generate_document(
    filesystems: &[&dyn Filesystem],
    display_name: &str,
    pi_target: &str,
    file_name: &str,
    repository_type: &str,
    marker_names: &[&str],
    atomic_loading: bool,
) -> Result<RepositoryDocument> {
    let mut repository = Element::new("repository");
    repository.set_attr("name", display_name);
    repository.set_attr("type", repository_type);
    repository.set_attr("version", "1.0.0");

    let properties = repository.add_child("properties");
    if atomic_loading {
        properties.set_attr("size", "1");
        let property = properties.add_child("property");
        property.set_attr("name", "p2.atomic.composite.loading");
        property.set_attr("value", "true");
    } else {
        properties.set_attr("size", "0");
    }

    let mut last_modified = 0;
    let children = repository.add_child("children");
    for fs in filesystems {
        for marker in marker_names {
            let mut parents = Vec::new();
            collect_marker_parents(*fs, &fs.root(), marker, &mut parents)?;
            for parent in parents {
                last_modified = last_modified.max(parent.last_modified());
                children
                    .add_child("child")
                    .set_attr("location", parent.path());
            }
        }
    }
    let count = children.child_count();
    children.set_attr("size", count.to_string());

    let document = Document::new(pi_target, "version='1.0.0'", repository);
    Ok(RepositoryDocument {
        file_name: file_name.to_string(),
        bytes: document.to_bytes(),
        last_modified,
    })
}

/// Depth-first search for folders containing a file named `marker`.
///
/// Entries are visited in sorted order so child locations are stable across
/// backends with unordered listings.
fn collect_marker_parents(
    fs: &dyn Filesystem,
    folder: &Folder,
    marker: &str,
    hits: &mut Vec<Folder>,
) -> Result<()> {
    let mut entries = fs.list_entries(folder.path())?;
    sort_resources(&mut entries);
    for entry in &entries {
        if !entry.is_folder() && entry.name() == marker {
            hits.push(folder.clone());
        }
    }
    for entry in entries {
        if let Resource::Folder(sub) = entry {
            collect_marker_parents(fs, &sub, marker, hits)?;
        }
    }
    Ok(())
}
