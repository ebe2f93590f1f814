// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Run-wide context shared by the scheduler and every story execution.

use std::sync::{Arc, PoisonError, RwLock};

use crate::variable::RunVariables;

/// State of a single run, shared by all of its stories.
///
/// Only the scheduler writes the running batch marker, between a batch's
/// first task submission and the end of its last task.
#[derive(Debug)]
pub struct RunContext {
    running_batch: RwLock<Option<String>>,
    variables: Arc<RunVariables>,
}

impl RunContext {
    /// Creates a new [`RunContext`] with no running batch.
    #[must_use]
    pub fn new(variables: Arc<RunVariables>) -> Self {
        Self { running_batch: RwLock::new(None), variables }
    }

    /// Marks the batch with the given `name` as the running one.
    pub fn put_running_batch(&self, name: impl Into<String>) {
        *self
            .running_batch
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(name.into());
    }

    /// Returns the name of the running batch, if any.
    #[must_use]
    pub fn running_batch(&self) -> Option<String> {
        self.running_batch
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes the running batch marker.
    pub fn remove_running_batch(&self) {
        *self
            .running_batch
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns the run-wide variables.
    #[must_use]
    pub fn variables(&self) -> &Arc<RunVariables> {
        &self.variables
    }
}
