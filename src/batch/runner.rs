// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Execution of a single story.

use async_trait::async_trait;

use crate::{context::StoryContext, error::Result};

/// Executor of a single story, invoked once per story path on a worker of
/// the batch's pool.
///
/// Each invocation gets its own fresh [`StoryContext`]. An [`Err`] or a panic
/// fails only this story, never its siblings.
#[async_trait]
pub trait StoryRunner: Send + Sync {
    /// Runs the story located at `story`.
    ///
    /// # Errors
    ///
    /// If the story fails.
    async fn run_story(&self, story: &str, context: &mut StoryContext) -> Result<()>;
}
