// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Context of a single story execution.

use std::sync::Arc;

use super::{ExecutionStages, Label, RunContext, StoryLabels};
use crate::variable::{VariableContext, VariableScope};

/// Everything a single story execution owns: its label and stage stacks and
/// its private `STEP`/`SCENARIO` variables, plus a handle to the shared
/// [`RunContext`].
///
/// One [`StoryContext`] is created per story task, so concurrently running
/// stories never observe each other's labels, stages or story-local
/// variables.
#[derive(Debug)]
pub struct StoryContext {
    run: Arc<RunContext>,
    labels: StoryLabels,
    stages: ExecutionStages,
    variables: VariableContext,
}

impl StoryContext {
    /// Creates a new [`StoryContext`] attached to the given [`RunContext`].
    #[must_use]
    pub fn new(run: Arc<RunContext>) -> Self {
        let variables = VariableContext::new(Arc::clone(run.variables()));
        Self {
            run,
            labels: StoryLabels::new(),
            stages: ExecutionStages::new(),
            variables,
        }
    }

    /// Returns the shared [`RunContext`].
    #[must_use]
    pub fn run(&self) -> &RunContext {
        &self.run
    }

    /// Returns the name of the batch this story runs in.
    #[must_use]
    pub fn running_batch(&self) -> Option<String> {
        self.run.running_batch()
    }

    /// Returns the [`StoryLabels`] stack.
    pub fn labels(&mut self) -> &mut StoryLabels {
        &mut self.labels
    }

    /// Returns the [`ExecutionStages`] stack.
    #[must_use]
    pub fn stages(&self) -> &ExecutionStages {
        &self.stages
    }

    /// Returns the mutable [`ExecutionStages`] stack.
    pub fn stages_mut(&mut self) -> &mut ExecutionStages {
        &mut self.stages
    }

    /// Returns the [`VariableContext`].
    #[must_use]
    pub fn variables(&self) -> &VariableContext {
        &self.variables
    }

    /// Returns the mutable [`VariableContext`].
    pub fn variables_mut(&mut self) -> &mut VariableContext {
        &mut self.variables
    }

    /// Opens a story nesting level, pushing a fresh label list and stage
    /// pair together.
    pub fn enter_story(&mut self, given_story: bool) -> &mut Vec<Label> {
        self.stages.init_execution_stages();
        self.labels.create_new_story_labels(given_story)
    }

    /// Closes the nesting level opened by the matching [`enter_story()`]
    /// call, restoring the enclosing story's labels and stages.
    ///
    /// [`enter_story()`]: Self::enter_story
    pub fn exit_story(&mut self, given_story: bool) {
        self.labels.reset_current_story_labels(given_story);
        self.stages.reset_execution_stages();
    }

    /// Finishes a scenario: unsets the scenario stage and empties the
    /// `STEP` and `SCENARIO` scopes.
    pub fn end_scenario(&mut self) {
        self.stages.reset_scenario_execution_stage();
        self.variables.clear(VariableScope::Step);
        self.variables.clear(VariableScope::Scenario);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::{
        context::{ScenarioExecutionStage, StoryExecutionStage},
        variable::{DefaultVariablesFactory, RunVariables, SystemProperties},
    };

    fn story_context() -> StoryContext {
        StoryContext::new(Arc::new(RunContext::new(Arc::new(RunVariables::new(
            Arc::new(DefaultVariablesFactory::default()),
            Arc::new(SystemProperties::new(HashMap::new())),
        )))))
    }

    #[test]
    fn given_story_nesting_restores_enclosing_level() {
        let mut ctx = story_context();
        ctx.enter_story(false).push(Label::new("story", "root"));
        ctx.stages_mut()
            .set_story_execution_stage(StoryExecutionStage::BeforeScenario);

        ctx.enter_story(true).push(Label::new("story", "given"));
        assert_eq!(ctx.stages().story_execution_stage(), None);
        ctx.stages_mut()
            .set_story_execution_stage(StoryExecutionStage::AfterStory);
        assert_eq!(ctx.labels().current_story_labels()[0].value, "given");

        ctx.exit_story(true);

        assert_eq!(ctx.labels().current_story_labels()[0].value, "root");
        assert_eq!(
            ctx.stages().story_execution_stage(),
            Some(StoryExecutionStage::BeforeScenario),
        );
    }

    #[test]
    fn end_scenario_clears_story_local_state() {
        let mut ctx = story_context();
        ctx.enter_story(false);
        ctx.stages_mut()
            .set_story_execution_stage(StoryExecutionStage::BeforeScenario);
        ctx.stages_mut()
            .set_scenario_execution_stage(ScenarioExecutionStage::InProgress);
        let vars = ctx.variables_mut();
        vars.put(VariableScope::Step, "s", 1).expect("writable scope");
        vars.put(VariableScope::Scenario, "c", 2).expect("writable scope");
        vars.put(VariableScope::Story, "t", 3).expect("writable scope");

        ctx.end_scenario();

        assert_eq!(ctx.stages().scenario_execution_stage(), None);
        assert_eq!(
            ctx.stages().story_execution_stage(),
            Some(StoryExecutionStage::BeforeScenario),
        );
        assert_eq!(ctx.variables().get("s"), None);
        assert_eq!(ctx.variables().get("c"), None);
        assert_eq!(ctx.variables().get("t"), Some(json!(3)));
    }

    #[test]
    fn sees_running_batch() {
        let ctx = story_context();
        ctx.run().put_running_batch("regression");

        assert_eq!(ctx.running_batch().as_deref(), Some("regression"));
    }
}
