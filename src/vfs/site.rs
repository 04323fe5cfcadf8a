//! Update-site filesystem backend
//!
//! Exposes one site's record store as a browsable tree:
//!
//! ```text
//! {site}/
//!   features/{id}_{version}.jar
//!   plugins/{id}_{version}.jar
//!   content.xml
//!   artifacts.xml
//! ```
//!
//! The two metadata documents are generated on first access and memoized for
//! the life of the filesystem instance. Jar bytes come from the site's
//! attachment store: each open extracts into a fresh temporary file that is
//! deleted when the reader is dropped, whether or not the read completed.

use std::cell::Cell;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use once_cell::unsync::OnceCell;
use tempfile::TempPath;

use crate::domain::{AttachmentStore, SiteData};
use crate::error::Result;
use crate::p2::{update_site, MIME_JAR};
use crate::vfs::{
    join_path, mem, File, FileContent, Filesystem, Folder, Resource,
};

/// Filesystem over one update site's records and attachments
pub struct UpdateSiteFilesystem {
    name: String,
    data: SiteData,
    store: Arc<dyn AttachmentStore>,
    documents: OnceCell<Vec<File>>,
    closed: Cell<bool>,
}

impl UpdateSiteFilesystem {
    pub fn new(name: impl Into<String>, data: SiteData, store: Arc<dyn AttachmentStore>) -> Self {
        UpdateSiteFilesystem {
            name: name.into(),
            data,
            store,
            documents: OnceCell::new(),
            closed: Cell::new(false),
        }
    }

    fn features_path(&self) -> String {
        join_path(&self.name, "features")
    }

    fn plugins_path(&self) -> String {
        join_path(&self.name, "plugins")
    }

    /// The site's generated `content.xml` / `artifacts.xml` resources
    fn documents(&self) -> Result<&[File]> {
        let files = self.documents.get_or_try_init(|| {
            let content = update_site::content_xml(&self.data)?;
            let artifacts = update_site::artifacts_xml(&self.data, self.store.as_ref())?;
            Ok::<_, crate::error::BrowserError>(vec![
                mem::xml_document_file(&join_path(&self.name, &content.file_name), &content),
                mem::xml_document_file(&join_path(&self.name, &artifacts.file_name), &artifacts),
            ])
        })?;
        Ok(files.as_slice())
    }

    fn jar_file(&self, folder: &str, file_name: &str, attachment: &str, last_modified: i64) -> Result<File> {
        Ok(File::new(
            join_path(folder, file_name),
            self.store.size(attachment)?,
            last_modified,
            Arc::new(StoreContent {
                store: Arc::clone(&self.store),
                attachment: attachment.to_string(),
            }),
        ))
    }

    fn feature_files(&self) -> Result<Vec<Resource>> {
        let folder = self.features_path();
        self.data
            .features
            .iter()
            .map(|f| {
                self.jar_file(&folder, &f.file_name(), &f.attachment, f.last_modified)
                    .map(Resource::File)
            })
            .collect()
    }

    fn plugin_files(&self) -> Result<Vec<Resource>> {
        let folder = self.plugins_path();
        self.data
            .plugins
            .iter()
            .map(|p| {
                self.jar_file(&folder, &p.file_name(), &p.attachment, p.last_modified)
                    .map(Resource::File)
            })
            .collect()
    }
}

impl Filesystem for UpdateSiteFilesystem {
    fn name(&self) -> &str {
        &self.name
    }

    fn root(&self) -> Folder {
        Folder::new("", self.data.timestamp)
    }

    fn list_entries(&self, path: &str) -> Result<Vec<Resource>> {
        if path.is_empty() {
            return Ok(vec![Resource::Folder(Folder::new(
                self.name.clone(),
                self.data.timestamp,
            ))]);
        }
        if path == self.name {
            let mut entries = vec![
                Resource::Folder(Folder::new(self.features_path(), self.data.timestamp)),
                Resource::Folder(Folder::new(self.plugins_path(), self.data.timestamp)),
            ];
            entries.extend(self.documents()?.iter().cloned().map(Resource::File));
            return Ok(entries);
        }
        if path == self.features_path() {
            return self.feature_files();
        }
        if path == self.plugins_path() {
            return self.plugin_files();
        }
        Ok(Vec::new())
    }

    fn find_resource(
        &self,
        folder: &Folder,
        name: &str,
        recursive: bool,
    ) -> Result<Option<Resource>> {
        crate::vfs::find_in_entries(self, folder, name, recursive)
    }

    fn close(&mut self) {
        if !self.closed.replace(true) {
            self.store.close();
        }
    }
}

/// File content backed by an attachment store entry.
///
/// Every open extracts to a disposable temporary file; the returned reader
/// owns the temp path and removes it on drop.
struct StoreContent {
    store: Arc<dyn AttachmentStore>,
    attachment: String,
}

impl FileContent for StoreContent {
    fn open(&self) -> Result<Box<dyn Read>> {
        let reader = open_extracted(self.store.as_ref(), &self.attachment, &std::env::temp_dir())?;
        Ok(Box::new(reader))
    }

    fn mime_type(&self) -> Option<&str> {
        Some(MIME_JAR)
    }
}

/// Extracts an attachment into a temporary file under `dir` and returns a
/// reader over it. The file is deleted when the reader is dropped; if the
/// extraction itself fails, it is deleted before the error propagates.
fn open_extracted(
    store: &dyn AttachmentStore,
    attachment: &str,
    dir: &Path,
) -> Result<TempFileReader> {
    let temp_path = tempfile::NamedTempFile::new_in(dir)?.into_temp_path();
    store.extract(attachment, &temp_path)?;
    let file = std::fs::File::open(&temp_path)?;
    Ok(TempFileReader {
        file,
        _temp_path: temp_path,
    })
}

/// Reader over an extracted temporary file; deletes the file on drop
struct TempFileReader {
    file: std::fs::File,
    _temp_path: TempPath,
}

impl Read for TempFileReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}
