// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step invocation error types.

use derive_more::with_trait::{Display, Error};

/// Errors surfaced by the step-invocation collaborator.
///
/// A [`StepError`] always propagates to the immediate caller: sub-step blocks
/// abort on it, stories record it as their failure.
#[derive(Debug, Display, Error)]
pub enum StepError {
    /// Step ran and failed.
    #[display("Step `{step}` failed: {reason}")]
    Failed {
        /// Text of the failed step.
        #[error(not(source))]
        step: String,

        /// Failure description.
        reason: String,
    },

    /// Step panicked.
    #[display("Step `{step}` panicked: {message}")]
    Panic {
        /// Text of the panicked step.
        #[error(not(source))]
        step: String,

        /// Panic payload rendered as text.
        message: String,
    },

    /// No step definition matches the step text.
    #[display("No matching step found for: {step}")]
    NoMatch {
        /// The step text that couldn't be matched.
        #[error(not(source))]
        step: String,
    },
}

/// Result type alias for step operations.
pub type StepResult<T> = Result<T, StepError>;

impl StepError {
    /// Creates a new [`StepError::Failed`].
    #[must_use]
    pub fn failed(step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed { step: step.into(), reason: reason.into() }
    }

    /// Creates a new [`StepError::Panic`].
    #[must_use]
    pub fn panic(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Panic { step: step.into(), message: message.into() }
    }

    /// Creates a new [`StepError::NoMatch`].
    #[must_use]
    pub fn no_match(step: impl Into<String>) -> Self {
        Self::NoMatch { step: step.into() }
    }

    /// Returns the text of the step this error belongs to.
    #[must_use]
    pub fn step_text(&self) -> &str {
        match self {
            Self::Failed { step, .. }
            | Self::Panic { step, .. }
            | Self::NoMatch { step } => step,
        }
    }

    /// Returns `true` if this is a panic error.
    #[must_use]
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panic { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_error_constructors() {
        let err = StepError::panic("When I click", "element is gone");
        assert!(err.is_panic());
        assert_eq!(err.step_text(), "When I click");
        assert_eq!(err.to_string(), "Step `When I click` panicked: element is gone");

        let err = StepError::no_match("Given undefined");
        assert!(!err.is_panic());
        assert_eq!(err.to_string(), "No matching step found for: Given undefined");

        let err = StepError::failed("Then it is 1", "was 2");
        assert_eq!(err.step_text(), "Then it is 1");
    }
}
