// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sequential execution of sub-step blocks.

use std::{borrow::Cow, fmt, sync::Arc};

use lazy_regex::{regex, Captures};

use super::StepInvoker;
use crate::{
    context::StoryContext,
    error::StepResult,
    table::{ExamplesTable, Row},
};

/// Column of an [`ExamplesTable`] listing the steps of a block.
pub const STEP_COLUMN: &str = "step";

/// Ordered block of steps executed one by one against a [`StepInvoker`].
#[derive(Clone)]
pub struct SubStepExecutor {
    steps: Vec<String>,
    invoker: Arc<dyn StepInvoker>,
}

impl fmt::Debug for SubStepExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubStepExecutor")
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}

impl SubStepExecutor {
    /// Creates a new [`SubStepExecutor`] of the given `steps`.
    #[must_use]
    pub fn new(steps: Vec<String>, invoker: Arc<dyn StepInvoker>) -> Self {
        Self { steps, invoker }
    }

    /// Returns the steps of this block.
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Executes every step of this block in order.
    ///
    /// With `parameters` given, `<name>` placeholders in each step text are
    /// replaced by the value of the `name` parameter. Placeholders without a
    /// parameter are left as is.
    ///
    /// # Errors
    ///
    /// With the first [`StepError`] raised. The remaining steps are not
    /// executed then.
    ///
    /// [`StepError`]: crate::error::StepError
    pub async fn execute(
        &self,
        context: &mut StoryContext,
        parameters: Option<&Row>,
    ) -> StepResult<()> {
        for step in &self.steps {
            let step = match parameters {
                Some(row) => substitute(step, row),
                None => Cow::Borrowed(step.as_str()),
            };
            self.invoker.invoke(&step, context).await?;
        }
        Ok(())
    }
}

fn substitute<'s>(step: &'s str, parameters: &Row) -> Cow<'s, str> {
    regex!(r"<([^<>]+)>").replace_all(step, |caps: &Captures<'_>| {
        parameters
            .get(&caps[1])
            .cloned()
            .unwrap_or_else(|| caps[0].to_owned())
    })
}

/// Creates [`SubStepExecutor`]s from [`ExamplesTable`]s.
#[derive(Clone)]
pub struct SubStepExecutorFactory {
    invoker: Arc<dyn StepInvoker>,
}

impl fmt::Debug for SubStepExecutorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubStepExecutorFactory").finish_non_exhaustive()
    }
}

impl SubStepExecutorFactory {
    /// Creates a new [`SubStepExecutorFactory`] invoking steps with the given
    /// [`StepInvoker`].
    #[must_use]
    pub fn new(invoker: Arc<dyn StepInvoker>) -> Self {
        Self { invoker }
    }

    /// Creates a [`SubStepExecutor`] of the steps listed in the
    /// [`STEP_COLUMN`] of the given `table`, or in its first column if there
    /// is no such one.
    #[must_use]
    pub fn create(&self, table: &ExamplesTable) -> SubStepExecutor {
        let steps = table
            .column(STEP_COLUMN)
            .or_else(|| table.column(table.headers().first()?))
            .unwrap_or_default()
            .into_iter()
            .map(str::to_owned)
            .collect();
        SubStepExecutor::new(steps, Arc::clone(&self.invoker))
    }
}
