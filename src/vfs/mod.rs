//! Virtual filesystem abstraction
//!
//! Every content source (local disk tree, in-memory documents, update-site
//! record stores, the synthesized composite site) presents itself as a
//! [`Filesystem`] producing [`Resource`]s, a tagged union of [`Folder`] and
//! [`File`]. Paths are `/`-separated and relative to the filesystem's root
//! regardless of backend; the aggregate namespace is the union of all
//! filesystems' roots.
//!
//! All filesystems are read-only. Listing order is unspecified at this
//! layer; callers sort with [`sort_resources`], the single ordering rule for
//! every directory listing the browser surfaces.

pub mod composite;
pub mod local;
pub mod mem;
pub mod resolve;
pub mod site;

use std::cmp::Ordering;
use std::io::Read;
use std::sync::Arc;

use crate::error::{BrowserError, Result};

/// Path separator used by every filesystem, regardless of backend
pub const SEPARATOR: char = '/';

/// Openable content behind a [`File`], with an optional MIME-type capability.
///
/// Each `open` yields an independent stream. In-memory contents give
/// repeatable reads; store-backed contents extract to a disposable temporary
/// file per open, deleted when the returned reader is dropped.
pub trait FileContent {
    fn open(&self) -> Result<Box<dyn Read>>;

    /// MIME type, when the backend knows it. Callers fall back to probing by
    /// file name when this is `None`.
    fn mime_type(&self) -> Option<&str> {
        None
    }
}

/// A directory in a virtual filesystem
#[derive(Debug, Clone)]
pub struct Folder {
    path: String,
    last_modified: i64,
}

impl Folder {
    pub fn new(path: impl Into<String>, last_modified: i64) -> Self {
        Folder {
            path: path.into(),
            last_modified,
        }
    }

    /// Path relative to the filesystem root, empty for the root itself
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Final path segment
    pub fn name(&self) -> &str {
        leaf_name(&self.path)
    }

    pub fn last_modified(&self) -> i64 {
        self.last_modified
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}

/// A file in a virtual filesystem
#[derive(Clone)]
pub struct File {
    path: String,
    size: u64,
    last_modified: i64,
    content: Arc<dyn FileContent>,
}

impl File {
    pub fn new(
        path: impl Into<String>,
        size: u64,
        last_modified: i64,
        content: Arc<dyn FileContent>,
    ) -> Self {
        File {
            path: path.into(),
            size,
            last_modified,
            content,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        leaf_name(&self.path)
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn last_modified(&self) -> i64 {
        self.last_modified
    }

    /// Opens a fresh read stream over the file's bytes
    pub fn open(&self) -> Result<Box<dyn Read>> {
        self.content.open()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.content.mime_type()
    }
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("last_modified", &self.last_modified)
            .finish_non_exhaustive()
    }
}

/// A filesystem entry: either a folder or a file
#[derive(Debug, Clone)]
pub enum Resource {
    Folder(Folder),
    File(File),
}

impl Resource {
    pub fn path(&self) -> &str {
        match self {
            Resource::Folder(folder) => folder.path(),
            Resource::File(file) => file.path(),
        }
    }

    pub fn name(&self) -> &str {
        leaf_name(self.path())
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Resource::Folder(_))
    }

    pub fn last_modified(&self) -> i64 {
        match self {
            Resource::Folder(folder) => folder.last_modified(),
            Resource::File(file) => file.last_modified(),
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Resource::Folder(folder) => Some(folder),
            Resource::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Resource::File(file) => Some(file),
            Resource::Folder(_) => None,
        }
    }
}

/// A read-only, closable session over one content source.
///
/// `close` releases any native handle the backend holds and is idempotent;
/// write operations always fail. `find_resource` with `recursive` searches
/// the entire subtree below `folder` for the first entry with that name.
pub trait Filesystem {
    /// Short identifier used in error messages
    fn name(&self) -> &str;

    /// Root folder; always exists
    fn root(&self) -> Folder;

    /// Entries directly under `path`, in unspecified order. A path that
    /// does not exist in this filesystem lists as empty.
    fn list_entries(&self, path: &str) -> Result<Vec<Resource>>;

    /// Looks up `name` within `folder` (or its subtree when `recursive`)
    fn find_resource(&self, folder: &Folder, name: &str, recursive: bool)
    -> Result<Option<Resource>>;

    fn is_readonly(&self) -> bool {
        true
    }

    /// Releases backend handles; safe to call more than once
    fn close(&mut self) {}

    fn create_folder(&self, _path: &str) -> Result<Folder> {
        Err(BrowserError::ReadOnly {
            name: self.name().to_string(),
        })
    }

    fn create_file(&self, _path: &str) -> Result<File> {
        Err(BrowserError::ReadOnly {
            name: self.name().to_string(),
        })
    }

    fn delete(&self, _path: &str) -> Result<()> {
        Err(BrowserError::ReadOnly {
            name: self.name().to_string(),
        })
    }
}

/// Orders folders strictly before files, then case-insensitively by name.
///
/// This is the one sorting rule for every listing surfaced anywhere.
pub fn compare_resources(a: &Resource, b: &Resource) -> Ordering {
    sortable(a).cmp(&sortable(b))
}

fn sortable(resource: &Resource) -> (u8, String) {
    let rank = if resource.is_folder() { 0 } else { 1 };
    (rank, resource.name().to_lowercase())
}

/// Sorts a listing in place with [`compare_resources`]
pub fn sort_resources(resources: &mut [Resource]) {
    resources.sort_by(compare_resources);
}

/// Joins a parent path and a child name with the canonical separator
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}{SEPARATOR}{name}")
    }
}

fn leaf_name(path: &str) -> &str {
    path.rsplit(SEPARATOR).next().unwrap_or(path)
}

/// Shared lookup used by backends without a native search primitive: scans
/// the folder's entries, then descends depth-first when `recursive`.
pub(crate) fn find_in_entries(
    fs: &dyn Filesystem,
    folder: &Folder,
    name: &str,
    recursive: bool,
) -> Result<Option<Resource>> {
    let entries = fs.list_entries(folder.path())?;
    for entry in &entries {
        if entry.name() == name {
            return Ok(Some(entry.clone()));
        }
    }
    if recursive {
        for entry in entries {
            if let Resource::Folder(sub) = entry {
                if let Some(found) = find_in_entries(fs, &sub, name, true)? {
                    return Ok(Some(found));
                }
            }
        }
    }
    Ok(None)
}
