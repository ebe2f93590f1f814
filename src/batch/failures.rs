// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Story failures recorded during a batch.

use std::sync::{Mutex, PoisonError};

use derive_more::with_trait::Display;
use linked_hash_map::LinkedHashMap;

/// Way a story execution ended unsuccessfully.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum FailureKind {
    /// Story runner returned an error.
    #[display("failed")]
    Failed,

    /// Story runner panicked.
    #[display("panicked")]
    Panicked,

    /// Story was cancelled by a stop request, or its task was discarded
    /// before completion.
    #[display("cancelled")]
    Cancelled,
}

/// Failure of a single story.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("`{story}` {kind}: {message}")]
pub struct StoryFailure {
    /// Path of the failed story.
    pub story: String,

    /// How the story failed.
    pub kind: FailureKind,

    /// Human-readable cause.
    pub message: String,
}

impl StoryFailure {
    /// Creates a new [`StoryFailure`].
    #[must_use]
    pub fn new(
        story: impl Into<String>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self { story: story.into(), kind, message: message.into() }
    }
}

/// Failures of a single batch, keyed by failure identifier.
///
/// Populated concurrently by the batch's story tasks, and drained once the
/// batch's worker pool has fully drained.
#[derive(Debug, Default)]
pub struct BatchFailures(Mutex<LinkedHashMap<String, StoryFailure>>);

impl BatchFailures {
    /// Creates an empty [`BatchFailures`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a `failure` under the given identifier, replacing any failure
    /// recorded under it before.
    pub fn record(&self, id: impl Into<String>, failure: StoryFailure) {
        _ = self
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.into(), failure);
    }

    /// Returns `true` if a failure is recorded under the given identifier.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes every recorded failure in recording order, leaving this set
    /// empty.
    #[must_use]
    pub fn drain(&self) -> Vec<StoryFailure> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
            .into_iter()
            .map(|(_, failure)| failure)
            .collect()
    }
}
