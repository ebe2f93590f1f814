// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Batch definitions and their ordered, uniquely named collection.

use linked_hash_map::LinkedHashMap;

use crate::error::{ConfigError, ConfigResult};

/// Named group of stories executed with its own controls.
///
/// Read-only once scheduling starts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchDefinition {
    /// Unique name of this batch.
    pub name: String,

    /// Story paths, in submission order.
    pub story_paths: Vec<String>,

    /// Number of worker threads overriding the default controls.
    pub threads: Option<usize>,

    /// Story failure policy overriding the default controls.
    pub ignore_failure: Option<bool>,
}

impl BatchDefinition {
    /// Creates a new [`BatchDefinition`] using the default controls.
    #[must_use]
    pub fn new<P>(name: impl Into<String>, story_paths: P) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            name: name.into(),
            story_paths: story_paths.into_iter().map(Into::into).collect(),
            threads: None,
            ignore_failure: None,
        }
    }

    /// Overrides the number of worker threads of this batch.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Overrides the story failure policy of this batch.
    #[must_use]
    pub fn with_ignore_failure(mut self, ignore: bool) -> Self {
        self.ignore_failure = Some(ignore);
        self
    }
}

/// [`BatchDefinition`]s keyed by name, iterated in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Batches(LinkedHashMap<String, BatchDefinition>);

impl Batches {
    /// Creates an empty [`Batches`] collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds [`Batches`] from definitions in declaration order.
    ///
    /// # Errors
    ///
    /// If two definitions share a name, or a definition overrides its thread
    /// count with zero.
    pub fn try_from_definitions(
        definitions: impl IntoIterator<Item = BatchDefinition>,
    ) -> ConfigResult<Self> {
        definitions.into_iter().try_fold(Self::new(), |mut batches, def| {
            batches.insert(def)?;
            Ok(batches)
        })
    }

    /// Appends a [`BatchDefinition`].
    ///
    /// # Errors
    ///
    /// If a batch with the same name is present already, or the definition
    /// overrides its thread count with zero.
    pub fn insert(&mut self, definition: BatchDefinition) -> ConfigResult<()> {
        if definition.threads == Some(0) {
            return Err(ConfigError::invalid_threads(definition.name, 0));
        }
        if self.0.contains_key(&definition.name) {
            return Err(ConfigError::duplicate_batch(definition.name));
        }
        _ = self.0.insert(definition.name.clone(), definition);
        Ok(())
    }

    /// Returns the [`BatchDefinition`] with the given `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BatchDefinition> {
        self.0.get(name)
    }

    /// Iterates over [`BatchDefinition`]s in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &BatchDefinition> {
        self.0.values()
    }

    /// Number of batches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no batches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_declaration_order() {
        let batches = Batches::try_from_definitions([
            BatchDefinition::new("zeta", ["z.story"]),
            BatchDefinition::new("alpha", ["a.story"]),
            BatchDefinition::new("mid", Vec::<String>::new()),
        ])
        .expect("unique names");

        let names = batches.iter().map(|b| b.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(batches.len(), 3);
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Batches::try_from_definitions([
            BatchDefinition::new("smoke", ["a.story"]),
            BatchDefinition::new("smoke", ["b.story"]),
        ])
        .unwrap_err();

        assert_eq!(err.to_string(), "Batch `smoke` is declared more than once");
    }

    #[test]
    fn rejects_zero_threads_override() {
        let mut batches = Batches::new();

        let err = batches
            .insert(BatchDefinition::new("smoke", ["a.story"]).with_threads(0))
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidThreads { threads: 0, .. }));
        assert!(batches.is_empty());
    }

    #[test]
    fn overrides() {
        let def = BatchDefinition::new("b", ["x"])
            .with_threads(4)
            .with_ignore_failure(true);

        assert_eq!(def.threads, Some(4));
        assert_eq!(def.ignore_failure, Some(true));
        assert_eq!(def.story_paths, ["x"]);
    }
}
