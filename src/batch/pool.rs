// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Bounded worker pools executing story tasks of a single batch.

use std::{
    io,
    sync::{Mutex, PoisonError},
};

use futures::{executor::ThreadPool, future::BoxFuture};

/// Pool of worker threads running the story tasks of one batch.
pub trait WorkerPool: Send + Sync {
    /// Submits a task. Tasks submitted after [`shutdown_now()`] are dropped
    /// without being polled.
    ///
    /// [`shutdown_now()`]: WorkerPool::shutdown_now
    fn spawn(&self, task: BoxFuture<'static, ()>);

    /// Releases the worker threads. Queued tasks still run to completion
    /// before their thread exits, so callers abort them first.
    fn shutdown_now(&self);
}

/// Factory of a fresh [`WorkerPool`] per batch.
pub trait WorkerPoolFactory: Send + Sync {
    /// Creates a [`WorkerPool`] of `threads` workers for the given `batch`.
    ///
    /// # Errors
    ///
    /// If worker threads cannot be spawned.
    fn create(&self, batch: &str, threads: usize) -> io::Result<Box<dyn WorkerPool>>;
}

/// [`WorkerPool`] backed by a [`ThreadPool`].
#[derive(Debug)]
pub struct ThreadWorkerPool(Mutex<Option<ThreadPool>>);

impl ThreadWorkerPool {
    /// Spawns a [`ThreadWorkerPool`] with `threads` workers named after the
    /// `batch`.
    ///
    /// # Errors
    ///
    /// If worker threads cannot be spawned.
    pub fn new(batch: &str, threads: usize) -> io::Result<Self> {
        let pool = ThreadPool::builder()
            .pool_size(threads)
            .name_prefix(format!("{batch}-worker-"))
            .create()?;
        Ok(Self(Mutex::new(Some(pool))))
    }
}

impl WorkerPool for ThreadWorkerPool {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        if let Some(pool) = &*self.0.lock().unwrap_or_else(PoisonError::into_inner) {
            pool.spawn_ok(task);
        }
    }

    fn shutdown_now(&self) {
        drop(self.0.lock().unwrap_or_else(PoisonError::into_inner).take());
    }
}

/// [`WorkerPoolFactory`] of [`ThreadWorkerPool`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadPoolFactory;

impl WorkerPoolFactory for ThreadPoolFactory {
    fn create(&self, batch: &str, threads: usize) -> io::Result<Box<dyn WorkerPool>> {
        Ok(Box::new(ThreadWorkerPool::new(batch, threads)?))
    }
}

#[cfg(test)]
mod tests {
    use futures::{channel::oneshot, executor::block_on, FutureExt as _};

    use super::*;

    #[test]
    fn runs_tasks_on_named_workers() {
        let pool = ThreadPoolFactory.create("smoke", 2).expect("pool spawns");
        let (tx, rx) = oneshot::channel();

        pool.spawn(
            async move {
                _ = tx.send(std::thread::current().name().map(ToOwned::to_owned));
            }
            .boxed(),
        );

        let name = block_on(rx).expect("task completes");
        assert!(name.is_some_and(|n| n.starts_with("smoke-worker-")));
        pool.shutdown_now();
    }

    #[test]
    fn drops_tasks_after_shutdown() {
        let pool = ThreadWorkerPool::new("done", 1).expect("pool spawns");
        pool.shutdown_now();
        let (tx, rx) = oneshot::channel::<()>();

        pool.spawn(
            async move {
                _ = tx.send(());
            }
            .boxed(),
        );

        assert!(block_on(rx).is_err());
    }
}
