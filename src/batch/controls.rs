// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Controls applied uniformly to every story of a batch.

use derive_more::with_trait::Display;
use smart_default::SmartDefault;

use super::BatchDefinition;

/// Effective controls of a batch, resolved once right before it starts.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, SmartDefault)]
#[display(
    "threads={threads}, skip={skip}, \
     ignore_failure_in_stories={ignore_failure_in_stories}"
)]
pub struct EmbedderControls {
    /// Size of the batch's worker pool.
    #[default(1)]
    pub threads: usize,

    /// Skips execution of the batch, reporting its stories as skipped.
    pub skip: bool,

    /// Keeps story failures of the batch out of the run's result.
    pub ignore_failure_in_stories: bool,
}

/// Source of [`EmbedderControls`].
pub trait EmbedderControlsProvider: Send + Sync {
    /// Returns the run-wide default controls.
    fn default_controls(&self) -> EmbedderControls;

    /// Returns the controls for the given `batch`.
    ///
    /// Defaults to [`default_controls()`] with the batch's own overrides
    /// applied.
    ///
    /// [`default_controls()`]: Self::default_controls
    fn controls(&self, batch: &BatchDefinition) -> EmbedderControls {
        let defaults = self.default_controls();
        EmbedderControls {
            threads: batch.threads.unwrap_or(defaults.threads),
            ignore_failure_in_stories: batch
                .ignore_failure
                .unwrap_or(defaults.ignore_failure_in_stories),
            ..defaults
        }
    }
}

/// [`EmbedderControlsProvider`] with fixed defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticControls(pub EmbedderControls);

impl EmbedderControlsProvider for StaticControls {
    fn default_controls(&self) -> EmbedderControls {
        self.0
    }
}
