//! Filesystem provider SPI and the request-scoped aggregation context
//!
//! Providers are factories producing zero or more filesystem instances.
//! They are queried exactly once per [`Context`]: enumeration can be
//! expensive (a record-store scan per site), so the concatenated output is
//! memoized for the context's lifetime, as are the composite descriptors
//! computed from it. A failure inside any provider aborts the whole pass;
//! no partial aggregation is ever surfaced.
//!
//! Contexts are single-threaded and never shared; dropping one closes every
//! filesystem it opened.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::unsync::OnceCell;

use crate::domain::Translator;
use crate::error::Result;
use crate::p2::composite;
use crate::store;
use crate::vfs::composite::CompositeSiteFilesystem;
use crate::vfs::local::LocalFilesystem;
use crate::vfs::resolve::{resolve, resolve_folder};
use crate::vfs::site::UpdateSiteFilesystem;
use crate::vfs::{sort_resources, Filesystem, Resource};

/// Factory for filesystem instances, queried once per aggregation pass.
///
/// Implementations rethrow backend-specific failures as
/// [`crate::error::BrowserError::Backend`].
pub trait FilesystemProvider {
    fn filesystems(&self) -> Result<Vec<Box<dyn Filesystem>>>;
}

/// Provides one local-disk filesystem over the repository base directory
pub struct LocalFilesystemProvider {
    base: PathBuf,
}

impl LocalFilesystemProvider {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        LocalFilesystemProvider { base: base.into() }
    }
}

impl FilesystemProvider for LocalFilesystemProvider {
    fn filesystems(&self) -> Result<Vec<Box<dyn Filesystem>>> {
        Ok(vec![Box::new(LocalFilesystem::new(self.base.clone()))])
    }
}

/// One configured update site: where its definition and binaries live
#[derive(Debug, Clone)]
pub struct SiteLocation {
    pub name: String,
    pub definition: PathBuf,
    pub attachments: PathBuf,
}

/// Provides one update-site filesystem per configured site
pub struct UpdateSiteProvider {
    sites: Vec<SiteLocation>,
}

impl UpdateSiteProvider {
    pub fn new(sites: Vec<SiteLocation>) -> Self {
        UpdateSiteProvider { sites }
    }
}

impl FilesystemProvider for UpdateSiteProvider {
    fn filesystems(&self) -> Result<Vec<Box<dyn Filesystem>>> {
        self.sites
            .iter()
            .map(|site| {
                let (data, attachment_store) = store::load_site(&site.definition, &site.attachments)?;
                Ok(Box::new(UpdateSiteFilesystem::new(
                    site.name.clone(),
                    data,
                    Arc::new(attachment_store),
                )) as Box<dyn Filesystem>)
            })
            .collect()
    }
}

/// One request/session's aggregated view over all providers.
///
/// Listing, resolution, and composite generation all go through here and
/// share the memoized provider output. The composite source is synthesized
/// last from the provider filesystems, so its discovery pass never sees its
/// own two documents.
pub struct Context {
    providers: Vec<Box<dyn FilesystemProvider>>,
    translator: Box<dyn Translator>,
    filesystems: OnceCell<Vec<Box<dyn Filesystem>>>,
    composite: OnceCell<CompositeState>,
}

/// Memoized result of the composite discovery pass
struct CompositeState {
    documents: composite::CompositeDocuments,
    filesystem: CompositeSiteFilesystem,
}

impl Context {
    pub fn new(
        providers: Vec<Box<dyn FilesystemProvider>>,
        translator: Box<dyn Translator>,
    ) -> Self {
        Context {
            providers,
            translator,
            filesystems: OnceCell::new(),
            composite: OnceCell::new(),
        }
    }

    /// Provider filesystems in registration order, enumerated once
    fn provider_filesystems(&self) -> Result<&[Box<dyn Filesystem>]> {
        let filesystems = self.filesystems.get_or_try_init(|| {
            let mut all = Vec::new();
            for provider in &self.providers {
                all.extend(provider.filesystems()?);
            }
            Ok::<_, crate::error::BrowserError>(all)
        })?;
        Ok(filesystems.as_slice())
    }

    /// The composite discovery result, computed once per context
    fn composite_state(&self) -> Result<&CompositeState> {
        self.composite.get_or_try_init(|| {
            let filesystems: Vec<&dyn Filesystem> = self
                .provider_filesystems()?
                .iter()
                .map(AsRef::as_ref)
                .collect();
            let documents =
                composite::generate(&filesystems, &self.translator.translate("app_name"))?;
            let filesystem = CompositeSiteFilesystem::new(&documents);
            Ok::<_, crate::error::BrowserError>(CompositeState {
                documents,
                filesystem,
            })
        })
    }

    /// Every active filesystem: provider output plus the composite source
    fn all_filesystems(&self) -> Result<Vec<&dyn Filesystem>> {
        let mut all: Vec<&dyn Filesystem> = self
            .provider_filesystems()?
            .iter()
            .map(AsRef::as_ref)
            .collect();
        all.push(&self.composite_state()?.filesystem);
        Ok(all)
    }

    /// The composite descriptors for the aggregate root
    pub fn composite_documents(&self) -> Result<&composite::CompositeDocuments> {
        Ok(&self.composite_state()?.documents)
    }

    /// Union of every filesystem's entries at `path`, folders first, then
    /// case-insensitive by name. Same-named entries from different sources
    /// are all kept.
    pub fn merged_listing(&self, path: &str) -> Result<Vec<Resource>> {
        let mut merged = Vec::new();
        for fs in self.all_filesystems()? {
            if let Some(folder) = resolve_folder(fs, path)? {
                merged.extend(fs.list_entries(folder.path())?);
            }
        }
        sort_resources(&mut merged);
        Ok(merged)
    }

    /// First resource any filesystem resolves for `path`
    pub fn resolve(&self, path: &str) -> Result<Option<Resource>> {
        for fs in self.all_filesystems()? {
            if let Some(resource) = resolve(fs, path)? {
                return Ok(Some(resource));
            }
        }
        Ok(None)
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if let Some(filesystems) = self.filesystems.get_mut() {
            for fs in filesystems {
                fs.close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TableTranslator;
    use crate::error::BrowserError;
    use crate::vfs::mem::bytes_file;
    use crate::vfs::Folder;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// Single-folder filesystem holding the given file names at `dir/`
    struct FlatFs {
        dir: String,
        files: Vec<String>,
    }

    impl Filesystem for FlatFs {
        fn name(&self) -> &str {
            "flat"
        }

        fn root(&self) -> Folder {
            Folder::new("", 0)
        }

        fn list_entries(&self, path: &str) -> Result<Vec<Resource>> {
            if path.is_empty() {
                return Ok(vec![Resource::Folder(Folder::new(self.dir.clone(), 0))]);
            }
            if path == self.dir {
                return Ok(self
                    .files
                    .iter()
                    .map(|name| {
                        Resource::File(bytes_file(
                            &crate::vfs::join_path(&self.dir, name),
                            b"x",
                            0,
                            None,
                        ))
                    })
                    .collect());
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
    }

    struct FlatProvider {
        dir: &'static str,
        files: &'static [&'static str],
        calls: Rc<Cell<u32>>,
    }

    impl FilesystemProvider for FlatProvider {
        fn filesystems(&self) -> Result<Vec<Box<dyn Filesystem>>> {
            self.calls.set(self.calls.get() + 1);
            Ok(vec![Box::new(FlatFs {
                dir: self.dir.to_string(),
                files: self.files.iter().map(ToString::to_string).collect(),
            })])
        }
    }

    /// Filesystem that records how many times it was closed
    struct CloseTrackingFs {
        closes: Rc<Cell<u32>>,
    }

    impl Filesystem for CloseTrackingFs {
        fn name(&self) -> &str {
            "tracking"
        }

        fn root(&self) -> Folder {
            Folder::new("", 0)
        }

        fn list_entries(&self, _path: &str) -> Result<Vec<Resource>> {
            Ok(Vec::new())
        }

        fn find_resource(
            &self,
            _folder: &Folder,
            _name: &str,
            _recursive: bool,
        ) -> Result<Option<Resource>> {
            Ok(None)
        }

        fn close(&mut self) {
            self.closes.set(self.closes.get() + 1);
        }
    }

    struct CloseTrackingProvider {
        closes: Rc<Cell<u32>>,
    }

    impl FilesystemProvider for CloseTrackingProvider {
        fn filesystems(&self) -> Result<Vec<Box<dyn Filesystem>>> {
            Ok(vec![Box::new(CloseTrackingFs {
                closes: Rc::clone(&self.closes),
            })])
        }
    }

    struct FailingProvider;

    impl FilesystemProvider for FailingProvider {
        fn filesystems(&self) -> Result<Vec<Box<dyn Filesystem>>> {
            Err(BrowserError::backend("store unavailable"))
        }
    }

    fn translator() -> Box<dyn Translator> {
        let mut strings = HashMap::new();
        strings.insert("app_name".to_string(), "Test Repository".to_string());
        Box::new(TableTranslator::new(strings))
    }

    #[test]
    fn test_providers_enumerated_once_per_context() {
        let calls = Rc::new(Cell::new(0));
        let context = Context::new(
            vec![Box::new(FlatProvider {
                dir: "updates",
                files: &["a.jar"],
                calls: Rc::clone(&calls),
            })],
            translator(),
        );
        context.merged_listing("").unwrap();
        context.merged_listing("updates").unwrap();
        context.resolve("updates/a.jar").unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_merged_listing_is_sorted_across_sources() {
        let calls = Rc::new(Cell::new(0));
        let context = Context::new(
            vec![
                Box::new(FlatProvider {
                    dir: "zeta",
                    files: &[],
                    calls: Rc::clone(&calls),
                }),
                Box::new(FlatProvider {
                    dir: "Alpha",
                    files: &[],
                    calls: Rc::clone(&calls),
                }),
            ],
            translator(),
        );
        let listing = context.merged_listing("").unwrap();
        let names: Vec<&str> = listing.iter().map(Resource::name).collect();
        // folders (Alpha, zeta) precede the composite descriptor files,
        // which sort case-insensitively among themselves
        assert_eq!(
            names,
            vec![
                "Alpha",
                "zeta",
                "compositeArtifacts.xml",
                "compositeContent.xml"
            ]
        );
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let calls = Rc::new(Cell::new(0));
        let context = Context::new(
            vec![
                Box::new(FlatProvider {
                    dir: "updates",
                    files: &["same.jar"],
                    calls: Rc::clone(&calls),
                }),
                Box::new(FlatProvider {
                    dir: "updates",
                    files: &["same.jar"],
                    calls: Rc::clone(&calls),
                }),
            ],
            translator(),
        );
        let listing = context.merged_listing("updates").unwrap();
        assert_eq!(listing.len(), 2);
        assert!(listing.iter().all(|r| r.name() == "same.jar"));
    }

    #[test]
    fn test_provider_failure_aborts_the_pass() {
        let calls = Rc::new(Cell::new(0));
        let context = Context::new(
            vec![
                Box::new(FlatProvider {
                    dir: "updates",
                    files: &["a.jar"],
                    calls: Rc::clone(&calls),
                }),
                Box::new(FailingProvider),
            ],
            translator(),
        );
        let err = context.merged_listing("").unwrap_err();
        assert!(matches!(err, BrowserError::Backend { .. }));
    }

    #[test]
    fn test_composite_descriptors_appear_at_root_only() {
        let calls = Rc::new(Cell::new(0));
        let context = Context::new(
            vec![Box::new(FlatProvider {
                dir: "updates",
                files: &[],
                calls,
            })],
            translator(),
        );
        let resource = context.resolve("compositeContent.xml").unwrap().unwrap();
        assert!(!resource.is_folder());
        assert!(context.resolve("updates/compositeContent.xml").unwrap().is_none());
    }

    #[test]
    fn test_dropping_a_context_closes_its_filesystems() {
        let closes = Rc::new(Cell::new(0));
        {
            let context = Context::new(
                vec![Box::new(CloseTrackingProvider {
                    closes: Rc::clone(&closes),
                })],
                translator(),
            );
            context.merged_listing("").unwrap();
            assert_eq!(closes.get(), 0);
        }
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_unused_context_closes_nothing() {
        let closes = Rc::new(Cell::new(0));
        drop(Context::new(
            vec![Box::new(CloseTrackingProvider {
                closes: Rc::clone(&closes),
            })],
            translator(),
        ));
        assert_eq!(closes.get(), 0);
    }

    #[test]
    fn test_composite_repository_name_is_translated() {
        let calls = Rc::new(Cell::new(0));
        let context = Context::new(
            vec![Box::new(FlatProvider {
                dir: "updates",
                files: &[],
                calls,
            })],
            translator(),
        );
        let documents = context.composite_documents().unwrap();
        let text = String::from_utf8(documents.content.bytes.clone()).unwrap();
        assert!(text.contains("name=\"Test Repository\""));
    }
}
