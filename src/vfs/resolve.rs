//! Slash-delimited path resolution within a single filesystem
//!
//! A path that leads nowhere is a normal negative result (`Ok(None)`), not
//! an error: missing segments, and non-terminal segments that turn out to be
//! files, both end resolution quietly. Backends may still fail a lookup with
//! a hard error (e.g. the local-disk traversal guard), which propagates.

use crate::error::Result;
use crate::vfs::{Filesystem, Folder, Resource, SEPARATOR};

/// Resolves `path` relative to the filesystem root.
///
/// Empty and all-separator paths resolve to the root folder. The terminal
/// segment's result is returned as-is: folder, file, or `None`.
pub fn resolve(fs: &dyn Filesystem, path: &str) -> Result<Option<Resource>> {
    let segments: Vec<&str> = path.split(SEPARATOR).filter(|s| !s.is_empty()).collect();
    let Some((last, ancestors)) = segments.split_last() else {
        return Ok(Some(Resource::Folder(fs.root())));
    };

    let mut folder = fs.root();
    for segment in ancestors {
        match fs.find_resource(&folder, segment, false)? {
            Some(Resource::Folder(sub)) => folder = sub,
            // A file (or nothing) mid-path ends the line here
            _ => return Ok(None),
        }
    }
    fs.find_resource(&folder, last, false)
}

/// Resolves `path` and keeps the result only when it is a folder
pub fn resolve_folder(fs: &dyn Filesystem, path: &str) -> Result<Option<Folder>> {
    match resolve(fs, path)? {
        Some(Resource::Folder(folder)) => Ok(Some(folder)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::mem::bytes_file;

    /// Fixed-shape filesystem for resolver tests: `docs/readme.txt`
    struct FixtureFs;

    impl Filesystem for FixtureFs {
        fn name(&self) -> &str {
            "fixture"
        }

        fn root(&self) -> Folder {
            Folder::new("", 0)
        }

        fn list_entries(&self, path: &str) -> Result<Vec<Resource>> {
            Ok(match path {
                "" => vec![Resource::Folder(Folder::new("docs", 0))],
                "docs" => vec![Resource::File(bytes_file("docs/readme.txt", b"hi", 0, None))],
                _ => Vec::new(),
            })
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

    #[test]
    fn test_empty_path_resolves_to_root() {
        let resource = resolve(&FixtureFs, "").unwrap().unwrap();
        assert!(resource.is_folder());
        assert!(resource.as_folder().unwrap().is_root());

        let resource = resolve(&FixtureFs, "/").unwrap().unwrap();
        assert!(resource.is_folder());
    }

    #[test]
    fn test_resolves_nested_file() {
        let resource = resolve(&FixtureFs, "docs/readme.txt").unwrap().unwrap();
        assert!(!resource.is_folder());
        assert_eq!(resource.path(), "docs/readme.txt");
    }

    #[test]
    fn test_redundant_separators_ignored() {
        let resource = resolve(&FixtureFs, "docs//readme.txt/").unwrap().unwrap();
        assert_eq!(resource.path(), "docs/readme.txt");
    }

    #[test]
    fn test_missing_terminal_is_none() {
        assert!(resolve(&FixtureFs, "docs/missing.txt").unwrap().is_none());
    }

    #[test]
    fn test_file_in_non_terminal_position_is_none() {
        // readme.txt is a file, so nothing can live below it
        assert!(resolve(&FixtureFs, "docs/readme.txt/inner").unwrap().is_none());
    }

    #[test]
    fn test_missing_ancestor_is_none() {
        assert!(resolve(&FixtureFs, "nope/readme.txt").unwrap().is_none());
    }

    #[test]
    fn test_resolve_folder_rejects_files() {
        assert!(resolve_folder(&FixtureFs, "docs/readme.txt").unwrap().is_none());
        assert!(resolve_folder(&FixtureFs, "docs").unwrap().is_some());
    }
}
