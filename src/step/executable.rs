// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Conditional and repeated execution of sub-step blocks.

use super::{SubStepExecutorFactory, EXECUTIONS_NUMBER_THRESHOLD};
use crate::{
    context::StoryContext,
    error::{ConfigError, Result},
    table::ExamplesTable,
};

/// Executes sub-step blocks given as [`ExamplesTable`]s under a condition or
/// a fixed number of times.
#[derive(Clone, Debug)]
pub struct ExecutableSteps {
    factory: SubStepExecutorFactory,
}

impl ExecutableSteps {
    /// Creates new [`ExecutableSteps`] building blocks with the given
    /// `factory`.
    #[must_use]
    pub fn new(factory: SubStepExecutorFactory) -> Self {
        Self { factory }
    }

    /// Executes the `steps` once if `condition` holds.
    ///
    /// # Errors
    ///
    /// If some step fails.
    pub async fn perform_if_condition(
        &self,
        condition: bool,
        steps: &ExamplesTable,
        context: &mut StoryContext,
    ) -> Result<()> {
        if condition {
            self.factory.create(steps).execute(context, None).await?;
        }
        Ok(())
    }

    /// Executes the `steps` once if the variable `name` resolves to nothing.
    ///
    /// # Errors
    ///
    /// If some step fails.
    pub async fn perform_if_variable_not_set(
        &self,
        name: &str,
        steps: &ExamplesTable,
        context: &mut StoryContext,
    ) -> Result<()> {
        let is_set = context.variables().get(name).is_some();
        self.perform_if_condition(!is_set, steps, context).await
    }

    /// Executes the `steps` `number` times in a row.
    ///
    /// # Errors
    ///
    /// - With [`ConfigError::ExecutionsNumberOutOfRange`] if `number` is out
    ///   of `0..=`[`EXECUTIONS_NUMBER_THRESHOLD`]. Nothing is executed then.
    /// - If some step fails. Remaining executions are skipped then.
    pub async fn perform_n_times(
        &self,
        number: i64,
        steps: &ExamplesTable,
        context: &mut StoryContext,
    ) -> Result<()> {
        if !(0..=i64::from(EXECUTIONS_NUMBER_THRESHOLD)).contains(&number) {
            return Err(ConfigError::executions_number_out_of_range(number).into());
        }
        let executor = self.factory.create(steps);
        for _ in 0..number {
            executor.execute(context, None).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        error::Error,
        step::STEP_COLUMN,
        test_utils::common::{story_context, RecordingInvoker},
        variable::VariableScope,
    };

    fn executable() -> (ExecutableSteps, Arc<RecordingInvoker>) {
        let invoker = Arc::new(RecordingInvoker::default());
        let steps = ExecutableSteps::new(SubStepExecutorFactory::new(invoker.clone()));
        (steps, invoker)
    }

    fn block(steps: &[&str]) -> ExamplesTable {
        ExamplesTable::from_column(STEP_COLUMN, steps.iter().copied())
    }

    #[tokio::test]
    async fn performs_only_if_condition_holds() {
        let (steps, invoker) = executable();
        let mut ctx = story_context();

        steps.perform_if_condition(false, &block(&["When I a"]), &mut ctx).await.unwrap();
        steps.perform_if_condition(true, &block(&["When I b"]), &mut ctx).await.unwrap();

        assert_eq!(invoker.invoked(), ["When I b"]);
    }

    #[tokio::test]
    async fn performs_only_if_variable_not_set() {
        let (steps, invoker) = executable();
        let mut ctx = story_context();

        steps
            .perform_if_variable_not_set("token", &block(&["When I log in"]), &mut ctx)
            .await
            .unwrap();
        ctx.variables_mut().put(VariableScope::Story, "token", "abc").unwrap();
        steps
            .perform_if_variable_not_set("token", &block(&["When I log in again"]), &mut ctx)
            .await
            .unwrap();

        assert_eq!(invoker.invoked(), ["When I log in"]);
    }

    #[tokio::test]
    async fn performs_n_times() {
        let (steps, invoker) = executable();
        let mut ctx = story_context();

        steps.perform_n_times(3, &block(&["When I a", "Then b"]), &mut ctx).await.unwrap();

        assert_eq!(
            invoker.invoked(),
            ["When I a", "Then b", "When I a", "Then b", "When I a", "Then b"],
        );
    }

    #[tokio::test]
    async fn zero_times_executes_nothing() {
        let (steps, invoker) = executable();

        steps
            .perform_n_times(0, &block(&["When I a"]), &mut story_context())
            .await
            .unwrap();

        assert!(invoker.invoked().is_empty());
    }

    #[tokio::test]
    async fn rejects_out_of_range_number_before_executing() {
        let (steps, invoker) = executable();
        let mut ctx = story_context();

        for number in [-1, 51] {
            let err = steps
                .perform_n_times(number, &block(&["When I a"]), &mut ctx)
                .await
                .unwrap_err();

            let Error::Config(err) = err else {
                panic!("expected configuration error, got: {err}");
            };
            assert!(err.is_executions_number_out_of_range());
            assert!(err
                .to_string()
                .starts_with("Please, specify executions number in the range from 0 to 50"));
        }
        assert!(invoker.invoked().is_empty());
    }

    #[tokio::test]
    async fn stops_repeating_on_failure() {
        let (steps, invoker) = executable();

        let err = steps
            .perform_n_times(5, &block(&["When I fail"]), &mut story_context())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Step(_)));
        assert_eq!(invoker.invoked(), ["When I fail"]);
    }
}
