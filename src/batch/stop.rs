// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Global stop of a run.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError,
};

use futures::future::AbortHandle;

/// Run-wide stop request.
///
/// Requesting a stop aborts every story task registered for the running
/// batch: queued tasks never start, running ones are dropped at their next
/// suspension point. No batch starts afterwards.
#[derive(Debug, Default)]
pub struct StopSignal {
    stopped: AtomicBool,
    tasks: Mutex<Vec<AbortHandle>>,
}

impl StopSignal {
    /// Creates a new [`StopSignal`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the run to stop.
    pub fn request_stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        let tasks = std::mem::take(&mut *self.lock());
        tracing::info!(tasks = tasks.len(), "Stop requested");
        for task in tasks {
            task.abort();
        }
    }

    /// Returns `true` if a stop was requested.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Registers a story task of the running batch. The task is aborted
    /// right away if a stop was requested already.
    pub(crate) fn register(&self, task: AbortHandle) {
        let mut tasks = self.lock();
        if self.is_stop_requested() {
            task.abort();
        } else {
            tasks.push(task);
        }
    }

    /// Aborts the tasks of a batch being torn down which are still pending,
    /// and forgets all of them. Doesn't stop the run.
    pub(crate) fn release_batch(&self) {
        for task in std::mem::take(&mut *self.lock()) {
            task.abort();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AbortHandle>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use futures::{
        future::{self, Abortable},
        FutureExt as _,
    };

    use super::*;

    #[test]
    fn aborts_registered_tasks() {
        let stop = StopSignal::new();
        let (handle, registration) = AbortHandle::new_pair();
        stop.register(handle);

        stop.request_stop();

        let res = Abortable::new(future::pending::<()>(), registration).now_or_never();
        assert!(matches!(res, Some(Err(_))));
        assert!(stop.is_stop_requested());
    }

    #[test]
    fn aborts_tasks_registered_after_stop() {
        let stop = StopSignal::new();
        stop.request_stop();

        let (handle, registration) = AbortHandle::new_pair();
        stop.register(handle);

        let res = Abortable::new(future::pending::<()>(), registration).now_or_never();
        assert!(matches!(res, Some(Err(_))));
    }

    #[test]
    fn releasing_batch_aborts_leftovers_without_stopping() {
        let stop = StopSignal::new();
        let (handle, registration) = AbortHandle::new_pair();
        stop.register(handle);

        stop.release_batch();

        let res = Abortable::new(future::pending::<()>(), registration).now_or_never();
        assert!(matches!(res, Some(Err(_))));
        assert!(!stop.is_stop_requested());

        let (handle, registration) = AbortHandle::new_pair();
        stop.register(handle);
        let res = Abortable::new(future::pending::<()>(), registration).now_or_never();
        assert!(res.is_none());
    }
}
