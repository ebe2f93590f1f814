// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Run and story execution context.
//!
//! A [`RunContext`] is shared by the scheduler and every story of a run. Each
//! story task owns a [`StoryContext`] holding the [`StoryLabels`] and
//! [`ExecutionStages`] stacks of the root story and the given stories nested
//! into it.

mod labels;
mod run;
mod stage;
mod story;

pub use self::{
    labels::{Label, StoryLabels},
    run::RunContext,
    stage::{ExecutionStages, ScenarioExecutionStage, StoryExecutionStage},
    story::StoryContext,
};
