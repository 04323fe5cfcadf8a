//! Local-disk filesystem backend
//!
//! Serves a configured base directory. Every lookup is guarded twice: the
//! requested path is normalized lexically before touching the disk (so a
//! `..` segment cannot step above the base even when the target does not
//! exist), and existing paths are canonicalized to catch symlink escapes.
//! Either way out of the base directory is an access error, never a listing.

use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use crate::error::{BrowserError, Result};
use crate::vfs::{join_path, File, FileContent, Filesystem, Folder, Resource};

/// Filesystem over a local directory tree
pub struct LocalFilesystem {
    base: PathBuf,
}

impl LocalFilesystem {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        LocalFilesystem {
            base: normalize(&base.into()),
        }
    }

    /// Maps a virtual path onto the disk, enforcing the base-directory
    /// boundary. `Ok(None)` means the path does not exist.
    fn disk_path(&self, path: &str) -> Result<Option<PathBuf>> {
        let joined = normalize(&self.base.join(path));
        if !joined.starts_with(&self.base) {
            return Err(BrowserError::AccessDenied {
                path: path.to_string(),
            });
        }
        if !joined.exists() {
            return Ok(None);
        }
        // The lexical check above cannot see through symlinks
        let canonical = dunce::canonicalize(&joined)?;
        let canonical_base = dunce::canonicalize(&self.base)?;
        if !canonical.starts_with(&canonical_base) {
            return Err(BrowserError::AccessDenied {
                path: path.to_string(),
            });
        }
        Ok(Some(joined))
    }

    /// Walks the subtree below `folder` for the first entry named `name`
    fn find_recursive(&self, folder: &Folder, name: &str) -> Result<Option<Resource>> {
        let Some(start) = self.disk_path(folder.path())? else {
            return Ok(None);
        };
        for entry in walkdir::WalkDir::new(&start).min_depth(1) {
            let entry = entry.map_err(|e| BrowserError::backend(e.to_string()))?;
            if entry.file_name().to_str() != Some(name) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.base) else {
                continue;
            };
            let path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let metadata = entry.metadata().map_err(|e| BrowserError::backend(e.to_string()))?;
            let resource = if metadata.is_dir() {
                Resource::Folder(Folder::new(path, mtime_millis(&metadata)))
            } else {
                Resource::File(File::new(
                    path,
                    metadata.len(),
                    mtime_millis(&metadata),
                    Arc::new(LocalContent {
                        path: entry.path().to_path_buf(),
                    }),
                ))
            };
            return Ok(Some(resource));
        }
        Ok(None)
    }

    fn entry_resource(&self, parent: &str, entry: &fs::DirEntry) -> Result<Option<Resource>> {
        let Some(name) = entry.file_name().to_str().map(ToString::to_string) else {
            // Skip entries whose names are not valid UTF-8
            return Ok(None);
        };
        let metadata = entry.metadata()?;
        let path = join_path(parent, &name);
        let resource = if metadata.is_dir() {
            Resource::Folder(Folder::new(path, mtime_millis(&metadata)))
        } else {
            Resource::File(File::new(
                path,
                metadata.len(),
                mtime_millis(&metadata),
                Arc::new(LocalContent {
                    path: entry.path(),
                }),
            ))
        };
        Ok(Some(resource))
    }
}

impl Filesystem for LocalFilesystem {
    fn name(&self) -> &str {
        "local"
    }

    fn root(&self) -> Folder {
        let last_modified = fs::metadata(&self.base)
            .map(|md| mtime_millis(&md))
            .unwrap_or(0);
        Folder::new("", last_modified)
    }

    fn list_entries(&self, path: &str) -> Result<Vec<Resource>> {
        let Some(dir) = self.disk_path(path)? else {
            return Ok(Vec::new());
        };
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            if let Some(resource) = self.entry_resource(path, &entry?)? {
                entries.push(resource);
            }
        }
        Ok(entries)
    }

    fn find_resource(
        &self,
        folder: &Folder,
        name: &str,
        recursive: bool,
    ) -> Result<Option<Resource>> {
        if recursive {
            return self.find_recursive(folder, name);
        }
        let path = join_path(folder.path(), name);
        let Some(disk) = self.disk_path(&path)? else {
            return Ok(None);
        };
        let metadata = fs::metadata(&disk)?;
        let resource = if metadata.is_dir() {
            Resource::Folder(Folder::new(path, mtime_millis(&metadata)))
        } else {
            Resource::File(File::new(
                path,
                metadata.len(),
                mtime_millis(&metadata),
                Arc::new(LocalContent { path: disk }),
            ))
        };
        Ok(Some(resource))
    }
}

struct LocalContent {
    path: PathBuf,
}

impl FileContent for LocalContent {
    fn open(&self) -> Result<Box<dyn Read>> {
        Ok(Box::new(fs::File::open(&self.path)?))
    }
}

/// Epoch milliseconds from file metadata, 0 when unavailable
pub fn mtime_millis(metadata: &fs::Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Lexical normalization: applies `.` and `..` without touching the disk
fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    result.push(Component::ParentDir);
                }
            }
            other => result.push(other),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::resolve::resolve;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, LocalFilesystem) {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("updates/sub")).unwrap();
        fs::write(temp.path().join("updates/content.xml"), "<x/>").unwrap();
        fs::write(temp.path().join("updates/sub/a.jar"), "jar").unwrap();
        fs::write(temp.path().join("outside.txt"), "secret").unwrap();
        let fs = LocalFilesystem::new(temp.path().join("updates"));
        (temp, fs)
    }

    #[test]
    fn test_list_entries_at_root() {
        let (_temp, fs) = fixture();
        let entries = fs.list_entries("").unwrap();
        let mut names: Vec<&str> = entries.iter().map(Resource::name).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["content.xml", "sub"]);
    }

    #[test]
    fn test_missing_path_lists_empty() {
        let (_temp, fs) = fixture();
        assert!(fs.list_entries("nope").unwrap().is_empty());
    }

    #[test]
    fn test_find_resource_reports_metadata() {
        let (_temp, fs) = fixture();
        let resource = fs
            .find_resource(&fs.root(), "content.xml", false)
            .unwrap()
            .unwrap();
        let file = resource.as_file().unwrap();
        assert_eq!(file.size(), 4);
        assert!(file.last_modified() > 0);
    }

    #[test]
    fn test_recursive_find() {
        let (_temp, fs) = fixture();
        let resource = fs.find_resource(&fs.root(), "a.jar", true).unwrap().unwrap();
        assert_eq!(resource.path(), "sub/a.jar");
    }

    #[test]
    fn test_parent_traversal_is_access_error() {
        let (_temp, fs) = fixture();
        let err = resolve(&fs, "../outside.txt").unwrap_err();
        assert!(matches!(err, BrowserError::AccessDenied { .. }));
    }

    #[test]
    fn test_traversal_guard_applies_to_missing_targets() {
        let (_temp, fs) = fixture();
        let err = resolve(&fs, "../does-not-exist").unwrap_err();
        assert!(matches!(err, BrowserError::AccessDenied { .. }));
    }

    #[test]
    fn test_file_content_streams() {
        let (_temp, fs) = fixture();
        let resource = resolve(&fs, "sub/a.jar").unwrap().unwrap();
        let mut text = String::new();
        resource
            .as_file()
            .unwrap()
            .open()
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "jar");
    }
}
