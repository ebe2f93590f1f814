// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sequential execution of batches, each on its own bounded worker pool.

use std::{fmt, future::Future, panic::AssertUnwindSafe, sync::Arc};

use futures::{
    channel::oneshot,
    future::{self, AbortHandle, AbortRegistration, Abortable},
    stream, FutureExt as _, StreamExt as _,
};
use tracing::Instrument as _;

use super::{
    BatchDefinition, BatchFailures, BatchOutcome, BatchReport, Batches,
    EmbedderControlsProvider, EmbedderMonitor, FailureKind, RunState, RunSummary,
    StaticControls, StopSignal, StoryFailure, StoryRunner, ThreadPoolFactory,
    TracingMonitor, WorkerPool, WorkerPoolFactory,
};
use crate::{
    context::{RunContext, StoryContext},
    error::{format_error_chain, ConfigError, Error, PanicPayloadExt as _, Result},
};

/// Driver running [`Batches`] one after another.
///
/// Stories of a batch run on a fresh [`WorkerPool`] sized by the batch's
/// [`EmbedderControls`], with no more than [`EmbedderControls::threads`] of
/// them in flight at once, in full isolation from each other: a failed or
/// panicked story never affects its siblings. Unless
/// [`ignore_failure_in_batches()`] is set, a batch recording any failure
/// prevents every following batch from starting. A batch which cannot be
/// started at all aborts the run as well.
///
/// [`EmbedderControls`]: super::EmbedderControls
/// [`ignore_failure_in_batches()`]: Self::ignore_failure_in_batches
pub struct BatchScheduler {
    runner: Arc<dyn StoryRunner>,
    context: Arc<RunContext>,
    controls: Arc<dyn EmbedderControlsProvider>,
    monitor: Arc<dyn EmbedderMonitor>,
    pools: Arc<dyn WorkerPoolFactory>,
    stop: Arc<StopSignal>,
    ignore_failure_in_batches: bool,
}

impl fmt::Debug for BatchScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchScheduler")
            .field("context", &self.context)
            .field("stop", &self.stop)
            .field("ignore_failure_in_batches", &self.ignore_failure_in_batches)
            .finish_non_exhaustive()
    }
}

impl BatchScheduler {
    /// Creates a new [`BatchScheduler`] with [`StaticControls`] defaults,
    /// [`TracingMonitor`] and [`ThreadPoolFactory`].
    #[must_use]
    pub fn new(runner: Arc<dyn StoryRunner>, context: Arc<RunContext>) -> Self {
        Self {
            runner,
            context,
            controls: Arc::new(StaticControls::default()),
            monitor: Arc::new(TracingMonitor),
            pools: Arc::new(ThreadPoolFactory),
            stop: Arc::new(StopSignal::new()),
            ignore_failure_in_batches: false,
        }
    }

    /// Replaces the [`EmbedderControlsProvider`].
    #[must_use]
    pub fn with_controls(mut self, controls: Arc<dyn EmbedderControlsProvider>) -> Self {
        self.controls = controls;
        self
    }

    /// Replaces the [`EmbedderMonitor`].
    #[must_use]
    pub fn with_monitor(mut self, monitor: Arc<dyn EmbedderMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Replaces the [`WorkerPoolFactory`].
    #[must_use]
    pub fn with_pool_factory(mut self, pools: Arc<dyn WorkerPoolFactory>) -> Self {
        self.pools = pools;
        self
    }

    /// Replaces the [`StopSignal`].
    #[must_use]
    pub fn with_stop_signal(mut self, stop: Arc<StopSignal>) -> Self {
        self.stop = stop;
        self
    }

    /// Makes batches run even if previous ones recorded failures.
    #[must_use]
    pub fn ignore_failure_in_batches(mut self, ignore: bool) -> Self {
        self.ignore_failure_in_batches = ignore;
        self
    }

    /// Returns the [`StopSignal`] of this scheduler.
    #[must_use]
    pub fn stop_signal(&self) -> &Arc<StopSignal> {
        &self.stop
    }

    /// Returns the shared [`RunContext`].
    #[must_use]
    pub fn context(&self) -> &Arc<RunContext> {
        &self.context
    }

    /// Runs the given `batches` in declaration order.
    ///
    /// A batch which cannot be started (its controls request zero threads,
    /// or its [`WorkerPool`] cannot be created) is reported as
    /// [`BatchOutcome::Errored`] and aborts the run. Results of batches
    /// completed before stand. Neither this nor story failures are errors
    /// here, see [`RunSummary::into_result()`].
    pub async fn run(&self, batches: &Batches) -> RunSummary {
        let mut reports = Vec::with_capacity(batches.len());
        let mut state = RunState::Done;

        for batch in batches.iter() {
            if state == RunState::Aborted || self.stop.is_stop_requested() {
                state = RunState::Aborted;
                reports.push(BatchReport {
                    name: batch.name.clone(),
                    outcome: BatchOutcome::NotStarted,
                });
                continue;
            }

            let span = tracing::info_span!("batch", name = %batch.name);
            let outcome = match self.run_batch(batch).instrument(span).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let reason = format_error_chain(&e);
                    tracing::error!(
                        batch = %batch.name,
                        %reason,
                        "Batch cannot be started, remaining batches won't be started",
                    );
                    state = RunState::Aborted;
                    BatchOutcome::Errored { reason }
                }
            };

            let failed = !outcome.failures().is_empty();
            if failed && !self.ignore_failure_in_batches {
                tracing::warn!(
                    batch = %batch.name,
                    "Batch failed, remaining batches won't be started",
                );
                state = RunState::Aborted;
            }
            if self.stop.is_stop_requested() {
                state = RunState::Aborted;
            }
            reports.push(BatchReport { name: batch.name.clone(), outcome });
        }

        tracing::info!(%state, batches = reports.len(), "Run finished");
        RunSummary { batches: reports, state }
    }

    async fn run_batch(&self, batch: &BatchDefinition) -> Result<BatchOutcome> {
        let controls = self.controls.controls(batch);
        self.monitor.using_controls(&batch.name, &controls);
        if controls.skip {
            self.monitor.stories_skipped(&batch.name, &batch.story_paths);
            return Ok(BatchOutcome::Skipped);
        }
        if controls.threads == 0 {
            return Err(ConfigError::invalid_threads(&batch.name, 0).into());
        }

        self.context.variables().begin_batch();
        let mut scope = BatchScope::enter(&self.context, &self.stop, &batch.name);
        let pool = self
            .pools
            .create(&batch.name, controls.threads)
            .map_err(|e| Error::pool(&batch.name, e))?;
        let pool = scope.attach(pool);
        tracing::info!(
            stories = batch.story_paths.len(),
            threads = controls.threads,
            "Batch started",
        );

        let failures = Arc::new(BatchFailures::new());
        let finished = stream::iter(batch.story_paths.iter().enumerate())
            .map(|(index, story)| {
                let task = StoryTask {
                    batch: batch.name.clone(),
                    story: story.clone(),
                    id: format!("{story}#{index}"),
                    failures: Arc::clone(&failures),
                };
                let (abort, registration) = AbortHandle::new_pair();
                let (done, finished) = oneshot::channel();
                self.stop.register(abort);
                pool.spawn(self.execute(task.clone(), registration, done).boxed());
                finished.map(move |res| (task, res.is_ok()))
            })
            .buffer_unordered(controls.threads)
            .collect::<Vec<_>>()
            .await;

        for (task, completed) in finished {
            if !completed && !failures.contains(&task.id) {
                let failure = StoryFailure::new(
                    task.story,
                    FailureKind::Cancelled,
                    "story task was discarded before completion",
                );
                self.monitor.story_failed(&task.batch, &failure);
                failures.record(task.id, failure);
            }
        }
        drop(scope);

        let failures = failures.drain();
        tracing::info!(failed = failures.len(), "Batch finished");
        Ok(BatchOutcome::Completed {
            failures,
            failures_ignored: controls.ignore_failure_in_stories,
        })
    }

    /// Runs a single story on a worker, recording its failure, if any.
    fn execute(
        &self,
        task: StoryTask,
        registration: AbortRegistration,
        done: oneshot::Sender<()>,
    ) -> impl Future<Output = ()> + Send + 'static {
        let runner = Arc::clone(&self.runner);
        let context = Arc::clone(&self.context);
        let monitor = Arc::clone(&self.monitor);

        async move {
            let StoryTask { batch, story, id, failures } = task;
            let run = async {
                let mut ctx = StoryContext::new(context);
                runner.run_story(&story, &mut ctx).await
            };

            let res = Abortable::new(AssertUnwindSafe(run).catch_unwind(), registration).await;
            let failure = match res {
                Ok(Ok(Ok(()))) => None,
                Ok(Ok(Err(e))) => Some((FailureKind::Failed, format_error_chain(&e))),
                Ok(Err(panic)) => Some((FailureKind::Panicked, panic.to_readable_string())),
                Err(future::Aborted) => {
                    Some((FailureKind::Cancelled, "story execution was cancelled".to_owned()))
                }
            };
            if let Some((kind, message)) = failure {
                let failure = StoryFailure::new(story, kind, message);
                monitor.story_failed(&batch, &failure);
                failures.record(id, failure);
            }
            _ = done.send(());
        }
    }
}

/// Identity of a story task and the failure set it reports into.
#[derive(Clone, Debug)]
struct StoryTask {
    batch: String,
    story: String,
    id: String,
    failures: Arc<BatchFailures>,
}

/// Running batch scope.
///
/// Dropping it, on any exit path, removes the running batch marker, aborts
/// still pending story tasks and shuts the batch's [`WorkerPool`] down, in
/// this order and exactly once.
struct BatchScope<'a> {
    context: &'a RunContext,
    stop: &'a StopSignal,
    pool: Option<Box<dyn WorkerPool>>,
}

impl<'a> BatchScope<'a> {
    fn enter(context: &'a RunContext, stop: &'a StopSignal, batch: &str) -> Self {
        context.put_running_batch(batch);
        Self { context, stop, pool: None }
    }

    fn attach(&mut self, pool: Box<dyn WorkerPool>) -> &dyn WorkerPool {
        &**self.pool.insert(pool)
    }
}

impl Drop for BatchScope<'_> {
    fn drop(&mut self) {
        self.context.remove_running_batch();
        self.stop.release_batch();
        if let Some(pool) = self.pool.take() {
            pool.shutdown_now();
        }
    }
}
