// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Observer of batch execution.

use super::{EmbedderControls, StoryFailure};

/// Receiver of batch execution notifications.
///
/// Notifications are observational only and never affect control flow.
/// [`story_failed()`] is called from worker threads.
///
/// [`story_failed()`]: EmbedderMonitor::story_failed
pub trait EmbedderMonitor: Send + Sync {
    /// Notifies that `controls` are in effect for the `batch` about to run.
    fn using_controls(&self, batch: &str, controls: &EmbedderControls);

    /// Notifies that every story of the `batch` was skipped.
    fn stories_skipped(&self, batch: &str, story_paths: &[String]);

    /// Notifies that a story of the `batch` failed.
    fn story_failed(&self, batch: &str, failure: &StoryFailure);
}

/// [`EmbedderMonitor`] emitting [`tracing`] events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingMonitor;

impl EmbedderMonitor for TracingMonitor {
    fn using_controls(&self, batch: &str, controls: &EmbedderControls) {
        tracing::info!(batch, %controls, "Using controls");
    }

    fn stories_skipped(&self, batch: &str, story_paths: &[String]) {
        tracing::info!(batch, stories = ?story_paths, "Stories skipped");
    }

    fn story_failed(&self, batch: &str, failure: &StoryFailure) {
        tracing::warn!(
            batch,
            story = %failure.story,
            kind = %failure.kind,
            message = %failure.message,
            "Story failed",
        );
    }
}
