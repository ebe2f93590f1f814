// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Batch-parallel story scheduling.
//!
//! [`Batches`] run sequentially in declaration order. Stories of one batch
//! run concurrently on a [`WorkerPool`] created for that batch only, and
//! their failures are collected into [`BatchFailures`]. A batch is always
//! torn down (running batch marker removed, pool shut down) before the next
//! one starts, whatever the outcome.
//!
//! # Example
//!
//! ```rust
//! # use std::{collections::HashMap, sync::Arc};
//! #
//! # use async_trait::async_trait;
//! # use storybatch::{
//! #     batch::{BatchDefinition, BatchScheduler, Batches, StoryRunner},
//! #     context::{RunContext, StoryContext},
//! #     variable::{DefaultVariablesFactory, RunVariables, SystemProperties},
//! # };
//! #
//! struct Noop;
//!
//! #[async_trait]
//! impl StoryRunner for Noop {
//!     async fn run_story(
//!         &self,
//!         _: &str,
//!         _: &mut StoryContext,
//!     ) -> storybatch::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let context = Arc::new(RunContext::new(Arc::new(RunVariables::new(
//!     Arc::new(DefaultVariablesFactory::default()),
//!     Arc::new(SystemProperties::new(HashMap::new())),
//! ))));
//! let batches = Batches::try_from_definitions([
//!     BatchDefinition::new("smoke", ["login.story"]),
//! ])?;
//!
//! let summary = futures::executor::block_on(
//!     BatchScheduler::new(Arc::new(Noop), context).run(&batches),
//! );
//! assert!(!summary.is_aborted());
//! # Ok::<_, storybatch::Error>(())
//! ```

mod controls;
mod definition;
mod failures;
mod monitor;
mod pool;
mod runner;
mod scheduler;
mod source;
mod stop;
mod summary;

pub use self::{
    controls::{EmbedderControls, EmbedderControlsProvider, StaticControls},
    definition::{BatchDefinition, Batches},
    failures::{BatchFailures, FailureKind, StoryFailure},
    monitor::{EmbedderMonitor, TracingMonitor},
    pool::{ThreadPoolFactory, ThreadWorkerPool, WorkerPool, WorkerPoolFactory},
    runner::StoryRunner,
    scheduler::BatchScheduler,
    source::{BatchedPathFinder, GlobPathFinder, PathFinder, ResourceBatch},
    stop::StopSignal,
    summary::{BatchOutcome, BatchReport, RunState, RunSummary},
};
