// Analysis module for crawling a source tree into a package model

pub mod graph;
pub mod package;
pub mod resolver;
pub mod walker;

pub use graph::*;
pub use package::Package;
pub use resolver::{discover_roots, is_package_directory, module_name_from_path};
pub use walker::{iter_source_files, IGNORED_DIRS};

use crate::error::Result;
use crate::parser::ModuleBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Crawls a directory tree and assembles a [`Package`]
pub struct Crawler {
    builder: ModuleBuilder,
    progress: bool,
}

impl Crawler {
    /// Create a new crawler
    pub fn new() -> Result<Self> {
        Ok(Self {
            builder: ModuleBuilder::new()?,
            progress: false,
        })
    }

    /// Show a spinner on stderr while crawling
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Crawl `root` and return everything that parsed.
    ///
    /// Files that fail to parse are recorded in [`Package::parse_errors`] and
    /// never fail the crawl. A missing root produces an empty package.
    pub fn crawl(&mut self, root: &Path) -> Package {
        let root = resolver::absolute(root);
        tracing::debug!("crawling {}", root.display());

        let mut package = Package::new(&root);
        let progress = self.spinner();

        for path in iter_source_files(&root) {
            if let Some(ref pb) = progress {
                let msg = path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                pb.set_message(msg);
                pb.inc(1);
            }

            match self.builder.try_build(&path, &root) {
                Ok(module) => {
                    if let Some(old) = package.insert_module(module) {
                        tracing::debug!(
                            "module {} from {} shadowed by {}",
                            old.name,
                            old.path.display(),
                            path.display()
                        );
                    }
                }
                Err(e) => {
                    tracing::trace!("skipping {}: {}", path.display(), e);
                    package.parse_errors.insert(path, e.to_string());
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        package.roots = discover_roots(&root);
        tracing::debug!(
            "crawled {}: {} modules, {} skipped",
            root.display(),
            package.modules.len(),
            package.parse_errors.len()
        );
        package
    }

    fn spinner(&self) -> Option<ProgressBar> {
        if !self.progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} {pos} files {msg}")
        {
            pb.set_style(style);
        }
        Some(pb)
    }
}

/// Crawl `root` with a fresh [`Crawler`]
pub fn crawl(root: impl AsRef<Path>) -> Result<Package> {
    Ok(Crawler::new()?.crawl(root.as_ref()))
}
