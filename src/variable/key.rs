// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Variable key expressions with nested list/map access.
//!
//! Grammar: `name([index])?(.remainder)?`. `name` selects the top-level
//! variable, the bracketed zero-based `index` selects a list element and
//! the dotted `remainder` selects a map entry by string key.

use lazy_regex::regex;
use serde_json::Value;

use super::Variables;

/// Parsed variable key expression.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VariableKey<'k> {
    /// Top-level variable name.
    pub name: &'k str,

    /// List index, if any. Indices overflowing [`usize`] are kept as
    /// [`usize::MAX`] and never resolve.
    pub index: Option<usize>,

    /// Map key, if any.
    pub map_key: Option<&'k str>,
}

impl<'k> VariableKey<'k> {
    /// Parses the whole `expression`, returning [`None`] if it doesn't follow
    /// the grammar (then it can only be used as a plain key).
    #[must_use]
    pub fn parse(expression: &'k str) -> Option<Self> {
        let captures =
            regex!(r"(?s)^([^\[\].]*)(?:\[(\d+)\])?(?:\.(.*))?$").captures(expression)?;

        let name = captures.get(1).map_or("", |m| m.as_str());
        let index = captures
            .get(2)
            .map(|m| m.as_str().parse().unwrap_or(usize::MAX));
        let map_key = captures.get(3).map(|m| m.as_str());

        Some(Self { name, index, map_key })
    }

    /// Looks this key up in `variables`.
    ///
    /// Short-circuits to [`None`] once the base variable is absent or an
    /// index is out of range or a map key is absent. Traversal steps that
    /// don't apply to the value at hand (an index on a non-list, a key on a
    /// non-map) are skipped and the value is returned as is.
    #[must_use]
    pub fn resolve<'v>(&self, variables: &'v Variables) -> Option<&'v Value> {
        let mut value = present(variables.get(self.name))?;

        if let (Some(index), Value::Array(list)) = (self.index, value) {
            value = present(list.get(index))?;
        }
        if let (Some(key), Value::Object(map)) = (self.map_key, value) {
            value = present(map.get(key))?;
        }

        Some(value)
    }
}

/// Resolves `expression` against `variables`, falling back to a verbatim
/// lookup when `expression` isn't a valid [`VariableKey`].
#[must_use]
pub fn resolve<'v>(variables: &'v Variables, expression: &str) -> Option<&'v Value> {
    match VariableKey::parse(expression) {
        Some(key) => key.resolve(variables),
        None => present(variables.get(expression)),
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}
