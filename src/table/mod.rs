// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Examples tables: pipe-separated tables of a header row and data rows,
//! optionally preceded by a `{key=value,...}` properties line.
//!
//! ```text
//! {valueSeparator=!}
//! |step|
//! !When I log in as <user>!
//! ```

pub mod processor;
pub mod properties;
mod transformer;

use linked_hash_map::LinkedHashMap;

pub use self::{
    processor::{
        build_table, build_table_from_columns, parse_data_rows, parse_rows,
        VALUE_SEPARATORS,
    },
    properties::TableProperties,
    transformer::{TableTransformer, TableTransformers},
};
use crate::error::{TableError, TableResult};

/// Single data row as header-to-value pairs, in header order.
pub type Row = LinkedHashMap<String, String>;

/// Decoded examples table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExamplesTable {
    properties: TableProperties,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ExamplesTable {
    /// Creates a new [`ExamplesTable`].
    ///
    /// # Errors
    ///
    /// With [`TableError::RowLength`] if a row's length differs from the
    /// header's one.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> TableResult<Self> {
        if let Some((row, cells)) =
            rows.iter().enumerate().find(|(_, r)| r.len() != headers.len())
        {
            return Err(TableError::RowLength {
                row,
                expected: headers.len(),
                actual: cells.len(),
            });
        }
        Ok(Self { properties: TableProperties::new(), headers, rows })
    }

    /// Creates a single-column [`ExamplesTable`].
    #[must_use]
    pub fn from_column<I>(header: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            properties: TableProperties::new(),
            headers: vec![header.into()],
            rows: values.into_iter().map(|v| vec![v.into()]).collect(),
        }
    }

    /// Decodes an [`ExamplesTable`] from text.
    ///
    /// Blank lines are ignored. A leading properties line overrides the
    /// given `defaults`.
    ///
    /// # Errors
    ///
    /// With [`TableError::RowLength`] if a row's length differs from the
    /// header's one.
    pub fn parse(text: &str, defaults: &TableProperties) -> TableResult<Self> {
        let mut lines = parse_rows(text)
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .peekable();

        let properties = match lines.peek().and_then(|l| TableProperties::parse_line(l)) {
            Some(inline) => {
                _ = lines.next();
                defaults.clone().merged(&inline)
            }
            None => defaults.clone(),
        };

        let Some(header) = lines.next() else {
            return Ok(Self { properties, ..Self::default() });
        };
        let headers = processor::split_row(header, properties.header_separator());
        let rows = lines
            .map(|row| processor::split_row(row, properties.value_separator()))
            .collect();

        let mut table = Self::new(headers, rows)?;
        table.properties = properties;
        Ok(table)
    }

    /// Encodes this table as text, switching to another value separator if
    /// the configured one occurs in some value.
    ///
    /// # Errors
    ///
    /// With [`TableError::NoApplicableSeparator`] if no value separator fits.
    pub fn to_table_string(&self) -> TableResult<String> {
        build_table(
            self.headers.as_slice(),
            self.rows.as_slice(),
            &self.properties,
            true,
            !self.properties.is_empty(),
        )
    }

    /// Replaces the properties of this table.
    #[must_use]
    pub fn with_properties(mut self, properties: TableProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Returns the properties of this table.
    #[must_use]
    pub fn properties(&self) -> &TableProperties {
        &self.properties
    }

    /// Returns the header cells.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the data rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the values of the column with the given `header`.
    #[must_use]
    pub fn column(&self, header: &str) -> Option<Vec<&str>> {
        let index = self.headers.iter().position(|h| h == header)?;
        Some(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Returns the data rows as header-to-value maps.
    #[must_use]
    pub fn rows_as_maps(&self) -> Vec<Row> {
        self.rows
            .iter()
            .map(|row| self.headers.iter().cloned().zip(row.iter().cloned()).collect())
            .collect()
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
