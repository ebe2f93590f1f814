// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Outcome of a run.

use derive_more::with_trait::Display;

use super::StoryFailure;
use crate::error::{Error, Result};

/// Terminal state of a run.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum RunState {
    /// Every batch was either executed or skipped.
    #[display("DONE")]
    Done,

    /// Remaining batches were not started because of batch failures or a
    /// stop request.
    #[display("ABORTED")]
    Aborted,
}

/// Outcome of a single batch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BatchOutcome {
    /// Every story of the batch was executed.
    Completed {
        /// Failed stories, in recording order.
        failures: Vec<StoryFailure>,

        /// Whether the batch's controls ignore story failures.
        failures_ignored: bool,
    },

    /// Batch was skipped by its controls.
    Skipped,

    /// Batch never started because the run was aborted before.
    NotStarted,

    /// Batch could not be started, and its stories were not executed.
    Errored {
        /// Human-readable cause.
        reason: String,
    },
}

impl BatchOutcome {
    /// Returns failures of a [`BatchOutcome::Completed`] batch.
    #[must_use]
    pub fn failures(&self) -> &[StoryFailure] {
        match self {
            Self::Completed { failures, .. } => failures,
            Self::Skipped | Self::NotStarted | Self::Errored { .. } => &[],
        }
    }
}

/// [`BatchOutcome`] of a named batch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchReport {
    /// Name of the batch.
    pub name: String,

    /// What happened to the batch.
    pub outcome: BatchOutcome,
}

/// Outcome of [`BatchScheduler::run()`].
///
/// [`BatchScheduler::run()`]: super::BatchScheduler::run
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunSummary {
    /// Every batch, in declaration order.
    pub batches: Vec<BatchReport>,

    /// Terminal state of the run.
    pub state: RunState,
}

impl RunSummary {
    /// Returns the [`BatchOutcome`] of the batch with the given `name`.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&BatchOutcome> {
        self.batches
            .iter()
            .find_map(|b| (b.name == name).then_some(&b.outcome))
    }

    /// Iterates over every recorded failure, ignored ones included.
    pub fn failures(&self) -> impl Iterator<Item = &StoryFailure> {
        self.batches.iter().flat_map(|b| b.outcome.failures())
    }

    /// Returns `true` if the run was aborted.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.state == RunState::Aborted
    }

    /// Converts this summary into a [`Result`].
    ///
    /// # Errors
    ///
    /// - With [`Error::BatchNotStarted`] if some batch could not be started.
    /// - With [`Error::StoriesFailed`] if any batch whose controls don't
    ///   ignore story failures recorded one.
    pub fn into_result(self) -> Result<Self> {
        if let Some((batch, reason)) = self.batches.iter().find_map(|b| match &b.outcome {
            BatchOutcome::Errored { reason } => Some((b.name.clone(), reason.clone())),
            BatchOutcome::Completed { .. }
            | BatchOutcome::Skipped
            | BatchOutcome::NotStarted => None,
        }) {
            return Err(Error::BatchNotStarted { batch, reason });
        }
        let failures = self
            .batches
            .iter()
            .filter_map(|b| match &b.outcome {
                BatchOutcome::Completed { failures, failures_ignored: false } => {
                    Some(failures.iter().cloned())
                }
                BatchOutcome::Completed { .. }
                | BatchOutcome::Skipped
                | BatchOutcome::NotStarted
                | BatchOutcome::Errored { .. } => None,
            })
            .flatten()
            .collect::<Vec<_>>();
        if failures.is_empty() {
            Ok(self)
        } else {
            Err(Error::StoriesFailed { failures })
        }
    }
}
