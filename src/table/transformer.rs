// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Named transformers of examples table text.

use std::{collections::HashMap, fmt, sync::Arc};

use super::TableProperties;
use crate::error::{TableError, TableResult};

/// Transformer of an examples table, selected by the `transformer` table
/// property.
pub trait TableTransformer: Send + Sync {
    /// Transforms the `table` text.
    ///
    /// # Errors
    ///
    /// If the table cannot be transformed.
    fn transform(&self, table: &str, properties: &TableProperties) -> TableResult<String>;
}

impl<F> TableTransformer for F
where
    F: Fn(&str, &TableProperties) -> TableResult<String> + Send + Sync,
{
    fn transform(&self, table: &str, properties: &TableProperties) -> TableResult<String> {
        self(table, properties)
    }
}

/// Registry of [`TableTransformer`]s by name.
#[derive(Clone, Default)]
pub struct TableTransformers(HashMap<String, Arc<dyn TableTransformer>>);

impl fmt::Debug for TableTransformers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl TableTransformers {
    /// Creates an empty [`TableTransformers`] registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a [`TableTransformer`] under the given `name`, replacing any
    /// registered before.
    #[must_use]
    pub fn register(
        mut self,
        name: impl Into<String>,
        transformer: impl TableTransformer + 'static,
    ) -> Self {
        _ = self.0.insert(name.into(), Arc::new(transformer));
        self
    }

    /// Returns the [`TableTransformer`] registered under the given `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn TableTransformer>> {
        self.0.get(name)
    }

    /// Applies the transformer named by the `transformer` property, if any.
    ///
    /// # Errors
    ///
    /// With [`TableError::UnknownTransformer`] if no transformer is
    /// registered under that name, or if the transformer fails.
    pub fn apply(&self, table: &str, properties: &TableProperties) -> TableResult<String> {
        let Some(name) = properties.transformer() else {
            return Ok(table.to_owned());
        };
        let transformer = self
            .get(name)
            .ok_or_else(|| TableError::UnknownTransformer(name.to_owned()))?;
        tracing::debug!(transformer = name, "Transforming examples table");
        transformer.transform(table, properties)
    }
}
