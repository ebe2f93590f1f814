// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Variable scopes.

use std::str::FromStr;

use derive_more::with_trait::Display;
use serde::Deserialize;

/// Named precedence tier of variable storage.
///
/// Variants are declared in read precedence order: a [`Step`] variable
/// shadows a [`Scenario`] one with the same key, and so on down to
/// [`Global`].
///
/// [`Global`]: VariableScope::Global
/// [`Scenario`]: VariableScope::Scenario
/// [`Step`]: VariableScope::Step
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableScope {
    /// Lives until the end of the current step.
    #[display("STEP")]
    Step,

    /// Lives until the end of the current scenario.
    #[display("SCENARIO")]
    Scenario,

    /// Lives until the end of the current story.
    #[display("STORY")]
    Story,

    /// Staged for batches that have not started yet.
    #[display("NEXT_BATCHES")]
    NextBatches,

    /// Read-only, seeded from configuration.
    #[display("GLOBAL")]
    Global,
}

impl VariableScope {
    /// All scopes in read precedence order.
    pub const PRECEDENCE: [Self; 5] = [
        Self::Step,
        Self::Scenario,
        Self::Story,
        Self::NextBatches,
        Self::Global,
    ];

    /// Indicates whether every story execution owns a private instance of
    /// this scope.
    #[must_use]
    pub const fn is_story_local(self) -> bool {
        matches!(self, Self::Step | Self::Scenario)
    }
}

impl FromStr for VariableScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(' ', "_").as_str() {
            "STEP" => Ok(Self::Step),
            "SCENARIO" => Ok(Self::Scenario),
            "STORY" => Ok(Self::Story),
            "NEXT_BATCHES" => Ok(Self::NextBatches),
            "GLOBAL" => Ok(Self::Global),
            _ => Err(format!("unknown variable scope: {s}")),
        }
    }
}
