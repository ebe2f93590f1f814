// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Common test utilities shared by unit test modules.

#[cfg(test)]
pub mod common {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex, PoisonError},
    };

    use async_trait::async_trait;

    use crate::{
        context::{RunContext, StoryContext},
        error::{StepError, StepResult},
        step::StepInvoker,
        variable::{DefaultVariablesFactory, RunVariables, SystemProperties},
    };

    /// Creates a [`RunContext`] with no global variables and no property
    /// overrides.
    pub fn run_context() -> Arc<RunContext> {
        Arc::new(RunContext::new(Arc::new(RunVariables::new(
            Arc::new(DefaultVariablesFactory::default()),
            Arc::new(SystemProperties::new(HashMap::new())),
        ))))
    }

    /// Creates a [`StoryContext`] attached to a fresh [`run_context()`].
    pub fn story_context() -> StoryContext {
        StoryContext::new(run_context())
    }

    /// [`StepInvoker`] recording every invoked step and failing the ones
    /// containing `"fail"`.
    #[derive(Debug, Default)]
    pub struct RecordingInvoker {
        invoked: Mutex<Vec<String>>,
    }

    impl RecordingInvoker {
        pub fn invoked(&self) -> Vec<String> {
            self.invoked.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }
    }

    #[async_trait]
    impl StepInvoker for RecordingInvoker {
        async fn invoke(&self, step: &str, _: &mut StoryContext) -> StepResult<()> {
            self.invoked
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(step.to_owned());
            if step.contains("fail") {
                return Err(StepError::failed(step, "requested failure"));
            }
            Ok(())
        }
    }
}
