// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Execution stages of nested stories.

use derive_more::with_trait::Display;

/// Where within a story lifecycle execution currently is.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum StoryExecutionStage {
    /// Before-story steps are running.
    BeforeStory,

    /// Before-scenario steps are running.
    BeforeScenario,

    /// After-scenario steps are running.
    AfterScenario,

    /// After-story steps are running.
    AfterStory,
}

/// Where within a scenario lifecycle execution currently is.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ScenarioExecutionStage {
    /// Scenario started, its steps didn't yet.
    BeforeSteps,

    /// Scenario steps are running.
    InProgress,

    /// Scenario steps finished.
    AfterSteps,
}

/// Stage pair of a single story nesting level.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct Stages {
    story: Option<StoryExecutionStage>,
    scenario: Option<ScenarioExecutionStage>,
}

/// Stack of execution stages, one level per root or given story.
///
/// Entering a given story pushes a level with both stages unset, leaving it
/// pops the level, restoring the enclosing story's stages. Pushes and pops
/// must pair with the ones of [`StoryLabels`].
///
/// [`StoryLabels`]: super::StoryLabels
#[derive(Clone, Debug, Default)]
pub struct ExecutionStages {
    levels: Vec<Stages>,
}

impl ExecutionStages {
    /// Creates an empty [`ExecutionStages`] stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a new nesting level with both stages unset.
    pub fn init_execution_stages(&mut self) {
        self.levels.push(Stages::default());
    }

    /// Pops the current nesting level, exposing the enclosing one.
    pub fn reset_execution_stages(&mut self) {
        _ = self.levels.pop();
    }

    /// Returns the story stage of the current nesting level.
    #[must_use]
    pub fn story_execution_stage(&self) -> Option<StoryExecutionStage> {
        self.levels.last().and_then(|s| s.story)
    }

    /// Returns the scenario stage of the current nesting level.
    #[must_use]
    pub fn scenario_execution_stage(&self) -> Option<ScenarioExecutionStage> {
        self.levels.last().and_then(|s| s.scenario)
    }

    /// Sets the story stage of the current nesting level.
    pub fn set_story_execution_stage(&mut self, stage: StoryExecutionStage) {
        self.current().story = Some(stage);
    }

    /// Sets the scenario stage of the current nesting level.
    pub fn set_scenario_execution_stage(&mut self, stage: ScenarioExecutionStage) {
        self.current().scenario = Some(stage);
    }

    /// Unsets the scenario stage of the current nesting level, keeping the
    /// story one.
    pub fn reset_scenario_execution_stage(&mut self) {
        if let Some(level) = self.levels.last_mut() {
            level.scenario = None;
        }
    }

    /// Number of nesting levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Current level, implicitly creating the root one when setting a stage
    /// before any [`init_execution_stages()`] call.
    ///
    /// [`init_execution_stages()`]: Self::init_execution_stages
    fn current(&mut self) -> &mut Stages {
        if self.levels.is_empty() {
            self.levels.push(Stages::default());
        }
        let top = self.levels.len() - 1;
        &mut self.levels[top]
    }
}
