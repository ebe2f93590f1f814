// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Resolution of story paths of configured batches.

use std::{fmt, io, path::PathBuf, sync::Arc};

use serde::Deserialize;
use smart_default::SmartDefault;

use super::{BatchDefinition, Batches};
use crate::error::Result;

/// Configured batch: a location on the filesystem and glob patterns
/// selecting its stories.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, SmartDefault)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceBatch {
    /// Name of the batch. Defaults to `batch-<position>`, starting from 1.
    pub name: Option<String>,

    /// Directory to look for stories in.
    #[default(PathBuf::from("."))]
    pub location: PathBuf,

    /// Glob patterns of stories to include, relative to [`location`].
    ///
    /// [`location`]: ResourceBatch::location
    #[default(vec!["**/*.story".to_owned()])]
    pub include_patterns: Vec<String>,

    /// Glob patterns of stories to exclude, relative to [`location`].
    ///
    /// [`location`]: ResourceBatch::location
    pub exclude_patterns: Vec<String>,

    /// Number of worker threads overriding the default controls.
    pub threads: Option<usize>,

    /// Story failure policy overriding the default controls.
    pub ignore_failure: Option<bool>,
}

impl ResourceBatch {
    /// Returns the name of this batch at the given zero-based `position`.
    #[must_use]
    pub fn name_at(&self, position: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("batch-{}", position + 1))
    }
}

/// Finder of story paths of a single [`ResourceBatch`].
pub trait PathFinder: Send + Sync {
    /// Returns story paths relative to the batch's location, sorted.
    ///
    /// # Errors
    ///
    /// If the location or any directory beneath it cannot be walked, or the
    /// patterns are invalid.
    fn find_paths(&self, batch: &ResourceBatch) -> Result<Vec<String>>;
}

/// [`PathFinder`] walking the filesystem with [`globwalk`].
///
/// Exclude patterns are applied as `!`-prefixed overrides.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobPathFinder;

impl PathFinder for GlobPathFinder {
    fn find_paths(&self, batch: &ResourceBatch) -> Result<Vec<String>> {
        let location = batch.location.canonicalize()?;
        if !location.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("`{}` is not a directory", batch.location.display()),
            )
            .into());
        }

        let patterns = batch
            .include_patterns
            .iter()
            .cloned()
            .chain(batch.exclude_patterns.iter().map(|p| format!("!{p}")))
            .collect::<Vec<_>>();
        let walker = globwalk::GlobWalkerBuilder::from_patterns(&location, &patterns)
            .file_type(globwalk::FileType::FILE)
            .build()?;

        let mut paths = Vec::new();
        for entry in walker {
            let entry = entry.map_err(io::Error::from)?;
            if let Ok(path) = entry.path().strip_prefix(&location) {
                paths.push(path.to_string_lossy().replace('\\', "/"));
            }
        }
        paths.sort();
        Ok(paths)
    }
}

/// Resolver of every configured [`ResourceBatch`] into [`Batches`].
#[derive(Clone)]
pub struct BatchedPathFinder {
    finder: Arc<dyn PathFinder>,
}

impl fmt::Debug for BatchedPathFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchedPathFinder").finish_non_exhaustive()
    }
}

impl Default for BatchedPathFinder {
    fn default() -> Self {
        Self::new(Arc::new(GlobPathFinder))
    }
}

impl BatchedPathFinder {
    /// Creates a new [`BatchedPathFinder`] using the given [`PathFinder`].
    #[must_use]
    pub fn new(finder: Arc<dyn PathFinder>) -> Self {
        Self { finder }
    }

    /// Resolves story paths of every batch, preserving configuration order.
    ///
    /// # Errors
    ///
    /// If paths of any batch cannot be found, or batch names clash.
    pub fn find_batches(&self, resources: &[ResourceBatch]) -> Result<Batches> {
        let mut batches = Batches::new();
        for (position, resource) in resources.iter().enumerate() {
            let paths = self.finder.find_paths(resource)?;
            let mut definition = BatchDefinition::new(resource.name_at(position), paths);
            definition.threads = resource.threads;
            definition.ignore_failure = resource.ignore_failure;
            tracing::debug!(
                batch = %definition.name,
                stories = definition.story_paths.len(),
                "Resolved batch",
            );
            batches.insert(definition)?;
        }
        Ok(batches)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(root: &std::path::Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "Scenario: x").unwrap();
    }

    #[test]
    fn finds_included_minus_excluded_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b/login.story");
        touch(dir.path(), "a/search.story");
        touch(dir.path(), "a/skip/broken.story");
        touch(dir.path(), "a/readme.md");

        let paths = GlobPathFinder
            .find_paths(&ResourceBatch {
                location: dir.path().to_owned(),
                exclude_patterns: vec!["**/skip/**".to_owned()],
                ..ResourceBatch::default()
            })
            .unwrap();

        assert_eq!(paths, ["a/search.story", "b/login.story"]);
    }

    #[test]
    fn missing_location_is_error() {
        let dir = tempfile::tempdir().unwrap();

        let res = GlobPathFinder.find_paths(&ResourceBatch {
            location: dir.path().join("absent"),
            ..ResourceBatch::default()
        });

        assert!(matches!(res, Err(crate::Error::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_error() {
        use std::os::unix::fs::PermissionsExt as _;

        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "open/a.story");
        touch(dir.path(), "locked/b.story");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let readable_anyway = fs::read_dir(&locked).is_ok();

        let res = GlobPathFinder.find_paths(&ResourceBatch {
            location: dir.path().to_owned(),
            ..ResourceBatch::default()
        });
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Privileged users read through permission bits.
        if readable_anyway {
            assert_eq!(res.unwrap(), ["locked/b.story", "open/a.story"]);
        } else {
            assert!(matches!(res, Err(crate::Error::Io(_))));
        }
    }

    struct Fixed;

    impl PathFinder for Fixed {
        fn find_paths(&self, batch: &ResourceBatch) -> Result<Vec<String>> {
            Ok(vec![format!("{}.story", batch.location.display())])
        }
    }

    #[test]
    fn maps_resource_batches_in_order() {
        let finder = BatchedPathFinder::new(Arc::new(Fixed));

        let batches = finder
            .find_batches(&[
                ResourceBatch {
                    name: Some("smoke".to_owned()),
                    location: "first".into(),
                    threads: Some(2),
                    ..ResourceBatch::default()
                },
                ResourceBatch { location: "second".into(), ..ResourceBatch::default() },
            ])
            .unwrap();

        let all = batches.iter().collect::<Vec<_>>();
        assert_eq!(all[0].name, "smoke");
        assert_eq!(all[0].story_paths, ["first.story"]);
        assert_eq!(all[0].threads, Some(2));
        assert_eq!(all[1].name, "batch-2");
        assert_eq!(all[1].story_paths, ["second.story"]);
    }

    #[test]
    fn clashing_names_are_rejected() {
        let finder = BatchedPathFinder::new(Arc::new(Fixed));

        let res = finder.find_batches(&[
            ResourceBatch { name: Some("batch-2".to_owned()), ..ResourceBatch::default() },
            ResourceBatch::default(),
        ]);

        assert!(matches!(res, Err(crate::Error::Config(_))));
    }
}
