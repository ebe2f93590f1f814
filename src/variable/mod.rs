// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Hierarchical variable storage.
//!
//! Reads resolve across five [`VariableScope`]s in precedence order
//! `STEP > SCENARIO > STORY > NEXT_BATCHES > GLOBAL`, applying a
//! [`VariableKey`] path expression to each scope, and fall back to a
//! [`PropertySource`].

mod context;
mod factory;
pub mod key;
mod properties;
mod scope;
mod snapshot;

use std::collections::HashMap;

pub use serde_json::Value;

pub use self::{
    context::{RunVariables, VariableContext},
    factory::{DefaultVariablesFactory, VariablesFactory},
    key::VariableKey,
    properties::{PropertySource, SystemProperties},
    scope::VariableScope,
    snapshot::VariablesSnapshot,
};

/// Key-value mapping of a single [`VariableScope`].
pub type Variables = HashMap<String, Value>;
