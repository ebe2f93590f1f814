// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Creation of [`VariablesSnapshot`]s and staging of `NEXT_BATCHES`
//! variables.

use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use super::{Variables, VariablesSnapshot};

/// Collaborator creating fresh [`VariablesSnapshot`]s and staging values
/// written into the `NEXT_BATCHES` scope.
///
/// A staged value must stay invisible until [`commit_next_batches()`] is
/// called, which the scheduler does right before a batch starts.
///
/// [`commit_next_batches()`]: VariablesFactory::commit_next_batches
pub trait VariablesFactory: Send + Sync {
    /// Creates a new [`VariablesSnapshot`], seeded with `GLOBAL` and the
    /// committed `NEXT_BATCHES` variables.
    fn create_variables(&self) -> VariablesSnapshot;

    /// Stages a `NEXT_BATCHES` variable.
    fn add_next_batches_variable(&self, key: String, value: Value);

    /// Makes every staged variable visible to batches starting from now on
    /// and returns all the committed `NEXT_BATCHES` variables.
    fn commit_next_batches(&self) -> Variables;
}

/// Default [`VariablesFactory`] backed by in-memory maps.
#[derive(Debug, Default)]
pub struct DefaultVariablesFactory {
    /// Read-only `GLOBAL` variables.
    global: Variables,

    /// `NEXT_BATCHES` variables, split into staged and committed ones.
    next_batches: Mutex<NextBatches>,
}

#[derive(Debug, Default)]
struct NextBatches {
    staged: Variables,
    committed: Variables,
}

impl DefaultVariablesFactory {
    /// Creates a new [`DefaultVariablesFactory`] with the provided `GLOBAL`
    /// variables.
    #[must_use]
    pub fn new(global: Variables) -> Self {
        Self { global, next_batches: Mutex::default() }
    }
}

impl VariablesFactory for DefaultVariablesFactory {
    fn create_variables(&self) -> VariablesSnapshot {
        let committed = self
            .next_batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .committed
            .clone();
        VariablesSnapshot::seeded(self.global.clone(), committed)
    }

    fn add_next_batches_variable(&self, key: String, value: Value) {
        _ = self
            .next_batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .staged
            .insert(key, value);
    }

    fn commit_next_batches(&self) -> Variables {
        let mut next = self.next_batches.lock().unwrap_or_else(PoisonError::into_inner);
        let staged = std::mem::take(&mut next.staged);
        next.committed.extend(staged);
        next.committed.clone()
    }
}
