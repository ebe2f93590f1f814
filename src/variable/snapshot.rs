// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-scope variable storage.

use super::{VariableScope, Variables};

/// One key-value mapping per [`VariableScope`].
///
/// Keys are unique and case-sensitive within a scope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariablesSnapshot {
    step: Variables,
    scenario: Variables,
    story: Variables,
    next_batches: Variables,
    global: Variables,
}

impl VariablesSnapshot {
    /// Creates an empty [`VariablesSnapshot`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a [`VariablesSnapshot`] seeded with `GLOBAL` and
    /// `NEXT_BATCHES` variables.
    #[must_use]
    pub fn seeded(global: Variables, next_batches: Variables) -> Self {
        Self { global, next_batches, ..Self::default() }
    }

    /// Returns the mapping of the given `scope`.
    #[must_use]
    pub fn scope(&self, scope: VariableScope) -> &Variables {
        match scope {
            VariableScope::Step => &self.step,
            VariableScope::Scenario => &self.scenario,
            VariableScope::Story => &self.story,
            VariableScope::NextBatches => &self.next_batches,
            VariableScope::Global => &self.global,
        }
    }

    /// Returns the mutable mapping of the given `scope`.
    pub fn scope_mut(&mut self, scope: VariableScope) -> &mut Variables {
        match scope {
            VariableScope::Step => &mut self.step,
            VariableScope::Scenario => &mut self.scenario,
            VariableScope::Story => &mut self.story,
            VariableScope::NextBatches => &mut self.next_batches,
            VariableScope::Global => &mut self.global,
        }
    }

    /// Empties the mapping of the given `scope`.
    pub fn clear(&mut self, scope: VariableScope) {
        self.scope_mut(scope).clear();
    }
}
