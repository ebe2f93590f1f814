// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sub-step blocks: ordered step rows executed as a unit against a
//! [`StepInvoker`].
//!
//! - [`invoker`]: the step invocation collaborator and a [`Regex`]-based
//!   [`StepRegistry`] implementing it
//! - [`sub_steps`]: [`SubStepExecutor`] running a block sequentially,
//!   optionally parameterized by a single [`Row`]
//! - [`executable`]: conditional and repeated execution of a block
//!
//! [`Regex`]: lazy_regex::Regex
//! [`Row`]: crate::table::Row

pub mod executable;
pub mod invoker;
pub mod sub_steps;

pub use self::{
    executable::ExecutableSteps,
    invoker::{Step, StepInvoker, StepRegistry},
    sub_steps::{SubStepExecutor, SubStepExecutorFactory, STEP_COLUMN},
};

/// Upper bound of [`ExecutableSteps::perform_n_times()`] executions number.
pub const EXECUTIONS_NUMBER_THRESHOLD: u32 = 50;
