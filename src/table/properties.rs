// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Properties of an examples table.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Default separator of header and value cells.
pub const DEFAULT_SEPARATOR: &str = "|";

/// Property naming the header separator.
pub const HEADER_SEPARATOR: &str = "headerSeparator";

/// Property naming the value separator.
pub const VALUE_SEPARATOR: &str = "valueSeparator";

/// Property naming the [`TableTransformer`] to apply.
///
/// [`TableTransformer`]: super::TableTransformer
pub const TRANSFORMER: &str = "transformer";

/// Explicitly set properties of an examples table.
///
/// Only explicitly set properties are rendered into a properties line, the
/// separators fall back to [`DEFAULT_SEPARATOR`] otherwise.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct TableProperties(BTreeMap<String, String>);

impl TableProperties {
    /// Creates empty [`TableProperties`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a property.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        _ = self.0.insert(key.into(), value.into());
    }

    /// Returns the property with the given `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Separator of header cells.
    #[must_use]
    pub fn header_separator(&self) -> &str {
        self.get(HEADER_SEPARATOR).unwrap_or(DEFAULT_SEPARATOR)
    }

    /// Separator of value cells.
    #[must_use]
    pub fn value_separator(&self) -> &str {
        self.get(VALUE_SEPARATOR).unwrap_or(DEFAULT_SEPARATOR)
    }

    /// Name of the transformer to apply, if any.
    #[must_use]
    pub fn transformer(&self) -> Option<&str> {
        self.get(TRANSFORMER)
    }

    /// Returns `true` if no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the `{key=value,...}` properties line.
    #[must_use]
    pub fn to_properties_line(&self) -> String {
        let pairs = self.0.iter().map(|(k, v)| format!("{k}={v}"));
        format!("{{{}}}", itertools::join(pairs, ","))
    }

    /// Parses a `{key=value,...}` properties line. Returns [`None`] if `line`
    /// is not a properties line.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let inner = line.trim().strip_prefix('{')?.strip_suffix('}')?;
        Some(Self(
            inner
                .split(',')
                .filter_map(|pair| {
                    let (k, v) = pair.split_once('=')?;
                    Some((k.trim().to_owned(), v.trim().to_owned()))
                })
                .collect(),
        ))
    }

    /// Overlays `other` onto these properties.
    #[must_use]
    pub fn merged(mut self, other: &Self) -> Self {
        self.0.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }
}
