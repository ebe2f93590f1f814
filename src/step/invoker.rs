// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step invocation collaborator.

use std::fmt;

use async_trait::async_trait;
use futures::future::BoxFuture;
use lazy_regex::Regex;

use crate::{
    context::StoryContext,
    error::{StepError, StepResult},
};

/// Executes a single step text.
///
/// Failures surface as [`StepError`]s and are never swallowed.
#[async_trait]
pub trait StepInvoker: Send + Sync {
    /// Executes the given `step` text in the given story `context`.
    ///
    /// # Errors
    ///
    /// If the step doesn't match any definition or fails.
    async fn invoke(&self, step: &str, context: &mut StoryContext) -> StepResult<()>;
}

/// Alias for a step function, receiving the capture groups of its [`Regex`]
/// match (the whole match excluded).
pub type Step =
    for<'a> fn(&'a mut StoryContext, Vec<String>) -> BoxFuture<'a, StepResult<()>>;

/// Collection of [`Step`]s matched by [`Regex`]es.
///
/// The first registered [`Regex`] matching a step text wins.
#[derive(Clone, Default)]
pub struct StepRegistry {
    steps: Vec<(Regex, Step)>,
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|(re, step)| {
                (re.as_str(), format!("{:p}", *step as *const ()))
            }))
            .finish()
    }
}

impl StepRegistry {
    /// Creates a new empty [`StepRegistry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a [`Step`] matching the given `regex`.
    #[must_use]
    pub fn step(mut self, regex: Regex, step: Step) -> Self {
        self.steps.push((regex, step));
        self
    }

    /// Returns the [`Step`] matching the given `text` along with its
    /// captured values, if any.
    ///
    /// Optional groups that didn't participate in the match capture an
    /// empty string.
    #[must_use]
    pub fn find(&self, text: &str) -> Option<(&Step, Vec<String>)> {
        self.steps.iter().find_map(|(re, step)| {
            let captures = re.captures(text)?;
            let values = captures
                .iter()
                .skip(1)
                .map(|m| m.map_or_else(String::new, |m| m.as_str().to_owned()))
                .collect();
            Some((step, values))
        })
    }

    /// Number of registered [`Step`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if no [`Step`] is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[async_trait]
impl StepInvoker for StepRegistry {
    async fn invoke(&self, step: &str, context: &mut StoryContext) -> StepResult<()> {
        let (func, captures) =
            self.find(step).ok_or_else(|| StepError::no_match(step))?;
        tracing::debug!(step, "Invoking step");
        func(context, captures).await
    }
}
