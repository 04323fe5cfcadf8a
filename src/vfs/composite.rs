//! Composite-site filesystem backend
//!
//! A purely virtual source that contributes exactly two files to the
//! aggregate root: the composite descriptors computed over every other
//! filesystem in the aggregation pass. Built after the other sources so its
//! own output can never appear in its children.

use crate::error::Result;
use crate::p2::composite::CompositeDocuments;
use crate::vfs::{mem, File, Filesystem, Folder, Resource};

/// Filesystem exposing `compositeContent.xml` / `compositeArtifacts.xml`
pub struct CompositeSiteFilesystem {
    files: Vec<File>,
}

impl CompositeSiteFilesystem {
    pub fn new(documents: &CompositeDocuments) -> Self {
        CompositeSiteFilesystem {
            files: vec![
                mem::xml_document_file(&documents.content.file_name, &documents.content),
                mem::xml_document_file(&documents.artifacts.file_name, &documents.artifacts),
            ],
        }
    }
}

impl Filesystem for CompositeSiteFilesystem {
    fn name(&self) -> &str {
        "composite"
    }

    fn root(&self) -> Folder {
        Folder::new("", 0)
    }

    fn list_entries(&self, path: &str) -> Result<Vec<Resource>> {
        if path.is_empty() {
            Ok(self.files.iter().cloned().map(Resource::File).collect())
        } else {
            Ok(Vec::new())
        }
    }

    fn find_resource(
        &self,
        folder: &Folder,
        name: &str,
        recursive: bool,
    ) -> Result<Option<Resource>> {
        crate::vfs::find_in_entries(self, folder, name, recursive)
    }
}
