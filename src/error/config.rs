// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration and validation error types.
//!
//! These errors are raised synchronously and abort only the single calling
//! operation.

use derive_more::with_trait::{Display, Error};

use crate::{step::EXECUTIONS_NUMBER_THRESHOLD, variable::VariableScope};

/// Configuration and validation errors.
#[derive(Debug, Display, Error)]
pub enum ConfigError {
    /// Variable write into a read-only scope.
    #[display("Setting of {scope} variables is forbidden (key `{key}`)")]
    ForbiddenScope {
        /// Rejected scope.
        scope: VariableScope,

        /// Key of the rejected write.
        #[error(not(source))]
        key: String,
    },

    /// Repetition count of a sub-step block is out of bounds.
    #[display(
        "Please, specify executions number in the range from {min} to {max} \
         (got {number})"
    )]
    ExecutionsNumberOutOfRange {
        /// Requested number of executions.
        number: i64,

        /// Lower bound, inclusive.
        min: i64,

        /// Upper bound, inclusive.
        max: i64,
    },

    /// Batch is configured with no worker threads.
    #[display("Batch `{batch}` must run with at least one thread, got {threads}")]
    InvalidThreads {
        /// Name of the batch.
        #[error(not(source))]
        batch: String,

        /// Configured thread count.
        threads: usize,
    },

    /// Batch name is declared twice.
    #[display("Batch `{name}` is declared more than once")]
    DuplicateBatch {
        /// Duplicated batch name.
        #[error(not(source))]
        name: String,
    },

    /// Mandatory property is absent or blank.
    #[display("Property `{name}` is mandatory and must not be blank")]
    MissingProperty {
        /// Property name.
        #[error(not(source))]
        name: String,
    },

    /// Property value cannot be interpreted.
    #[display("Property `{name}` has invalid value `{value}`")]
    InvalidProperty {
        /// Property name.
        #[error(not(source))]
        name: String,

        /// Rejected value.
        value: String,
    },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Creates a new [`ConfigError::ForbiddenScope`].
    #[must_use]
    pub fn forbidden_scope(scope: VariableScope, key: impl Into<String>) -> Self {
        Self::ForbiddenScope { scope, key: key.into() }
    }

    /// Creates a new [`ConfigError::ExecutionsNumberOutOfRange`] for the
    /// `0..=50` sub-step repetition bounds.
    #[must_use]
    pub fn executions_number_out_of_range(number: i64) -> Self {
        Self::ExecutionsNumberOutOfRange {
            number,
            min: 0,
            max: i64::from(EXECUTIONS_NUMBER_THRESHOLD),
        }
    }

    /// Creates a new [`ConfigError::InvalidThreads`].
    #[must_use]
    pub fn invalid_threads(batch: impl Into<String>, threads: usize) -> Self {
        Self::InvalidThreads { batch: batch.into(), threads }
    }

    /// Creates a new [`ConfigError::DuplicateBatch`].
    #[must_use]
    pub fn duplicate_batch(name: impl Into<String>) -> Self {
        Self::DuplicateBatch { name: name.into() }
    }

    /// Creates a new [`ConfigError::MissingProperty`].
    #[must_use]
    pub fn missing_property(name: impl Into<String>) -> Self {
        Self::MissingProperty { name: name.into() }
    }

    /// Creates a new [`ConfigError::InvalidProperty`].
    #[must_use]
    pub fn invalid_property(
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidProperty { name: name.into(), value: value.into() }
    }

    /// Returns `true` if this is a forbidden scope write.
    #[must_use]
    pub fn is_forbidden_scope(&self) -> bool {
        matches!(self, Self::ForbiddenScope { .. })
    }

    /// Returns `true` if this is an out-of-range repetition count.
    #[must_use]
    pub fn is_executions_number_out_of_range(&self) -> bool {
        matches!(self, Self::ExecutionsNumberOutOfRange { .. })
    }
}
