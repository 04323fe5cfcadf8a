//! In-memory file contents
//!
//! Backs the synthesized metadata documents: the bytes live in memory, reads
//! are repeatable, and the MIME type is known up front.

use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::error::Result;
use crate::p2::RepositoryDocument;
use crate::vfs::{File, FileContent};

/// File content over an immutable in-memory byte buffer
pub struct MemContent {
    bytes: Arc<[u8]>,
    mime_type: Option<&'static str>,
}

impl FileContent for MemContent {
    fn open(&self) -> Result<Box<dyn Read>> {
        Ok(Box::new(Cursor::new(Arc::clone(&self.bytes))))
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type
    }
}

/// Builds an in-memory [`File`] from raw bytes
pub fn bytes_file(path: &str, bytes: &[u8], last_modified: i64, mime_type: Option<&'static str>) -> File {
    let bytes: Arc<[u8]> = bytes.into();
    File::new(
        path,
        bytes.len() as u64,
        last_modified,
        Arc::new(MemContent { bytes, mime_type }),
    )
}

/// Exposes a synthesized repository document as an XML file resource
pub fn xml_document_file(path: &str, document: &RepositoryDocument) -> File {
    bytes_file(path, &document.bytes, document.last_modified, Some("text/xml"))
}
