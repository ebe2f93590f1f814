// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Last-resort variable lookup in properties and the process environment.

use std::{collections::HashMap, env};

/// Source of properties consulted when no scope holds a variable.
///
/// Lookup is done by exact key, no path expression is applied.
pub trait PropertySource: Send + Sync {
    /// Returns the property value, if any.
    fn property(&self, key: &str) -> Option<String>;
}

/// [`PropertySource`] consulting explicit overrides first and the process
/// environment next.
#[derive(Clone, Debug, Default)]
pub struct SystemProperties {
    overrides: HashMap<String, String>,
}

impl SystemProperties {
    /// Creates [`SystemProperties`] with the given overrides.
    #[must_use]
    pub fn new(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }
}

impl PropertySource for SystemProperties {
    fn property(&self, key: &str) -> Option<String> {
        self.overrides.get(key).cloned().or_else(|| env::var(key).ok())
    }
}
