// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Top-level error type.
//!
//! [`Error`] consolidates the domain errors of configuration, step
//! invocation, table processing, story path resolution and batch execution
//! into a single hierarchy.

use std::io;

use derive_more::with_trait::{Display, Error as StdError};

use super::{ConfigError, StepError, TableError};
use crate::batch::StoryFailure;

/// Top-level error type for all operations of this crate.
#[derive(Debug, Display, StdError)]
pub enum Error {
    /// Invalid configuration or argument, aborting the calling operation.
    #[display("Configuration error: {_0}")]
    Config(ConfigError),

    /// Step invocation failed.
    #[display("Step execution failed: {_0}")]
    Step(StepError),

    /// Examples table could not be encoded or decoded.
    #[display("Examples table error: {_0}")]
    Table(TableError),

    /// I/O error.
    #[display("I/O operation failed: {_0}")]
    Io(io::Error),

    /// Story paths of a batch could not be resolved.
    #[display("Failed to resolve story paths: {_0}")]
    Source(globwalk::GlobError),

    /// Worker pool of a batch could not be started.
    #[display("Failed to start worker pool for batch `{batch}`: {source}")]
    Pool {
        /// Name of the batch.
        #[error(not(source))]
        batch: String,

        /// Underlying spawn error.
        source: io::Error,
    },

    /// Batch could not be started, so its stories were not executed.
    #[display("Batch `{batch}` could not be started: {reason}")]
    BatchNotStarted {
        /// Name of the batch.
        #[error(not(source))]
        batch: String,

        /// Human-readable cause.
        #[error(not(source))]
        reason: String,
    },

    /// Stories failed in batches not ignoring story failures.
    #[display("{} story(ies) failed: {}", failures.len(), list_failures(failures))]
    StoriesFailed {
        /// Every recorded failure, in batch order.
        #[error(not(source))]
        failures: Vec<StoryFailure>,
    },
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an [`Error::Pool`].
    #[must_use]
    pub fn pool(batch: impl Into<String>, source: io::Error) -> Self {
        Self::Pool { batch: batch.into(), source }
    }

    /// Returns `true` if this error reports failed stories.
    #[must_use]
    pub fn is_stories_failed(&self) -> bool {
        matches!(self, Self::StoriesFailed { .. })
    }
}

fn list_failures(failures: &[StoryFailure]) -> String {
    itertools::join(failures.iter().map(|f| f.story.as_str()), ", ")
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<StepError> for Error {
    fn from(err: StepError) -> Self {
        Self::Step(err)
    }
}

impl From<TableError> for Error {
    fn from(err: TableError) -> Self {
        Self::Table(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<globwalk::GlobError> for Error {
    fn from(err: globwalk::GlobError) -> Self {
        Self::Source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::FailureKind;

    #[test]
    fn stories_failed_lists_story_paths() {
        let err = Error::StoriesFailed {
            failures: vec![
                StoryFailure::new("a.story", FailureKind::Failed, "boom"),
                StoryFailure::new("b.story", FailureKind::Panicked, "oops"),
            ],
        };

        assert!(err.is_stories_failed());
        assert_eq!(err.to_string(), "2 story(ies) failed: a.story, b.story");
    }

    #[test]
    fn pool_error_names_batch() {
        let err = Error::pool("smoke", io::Error::new(io::ErrorKind::Other, "no threads"));

        assert_eq!(
            err.to_string(),
            "Failed to start worker pool for batch `smoke`: no threads",
        );
    }

    #[test]
    fn exposes_sources_through_std_error() {
        use std::error::Error as _;

        let pool = Error::pool("smoke", io::Error::new(io::ErrorKind::Other, "no threads"));
        let not_started = Error::BatchNotStarted {
            batch: "smoke".to_owned(),
            reason: "no threads".to_owned(),
        };

        assert_eq!(pool.source().map(ToString::to_string).as_deref(), Some("no threads"));
        assert!(not_started.source().is_none());
    }
}
