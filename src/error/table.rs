// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Examples table encoding/decoding errors.

use derive_more::with_trait::{Display, Error};

/// Errors of building or parsing an [`ExamplesTable`].
///
/// [`ExamplesTable`]: crate::table::ExamplesTable
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum TableError {
    /// Every candidate value separator occurs in some cell.
    #[display("There are not alternative value separators applicable for examples table")]
    NoApplicableSeparator,

    /// Columns passed for transposition differ in length.
    #[display(
        "Columns are not aligned: column '{first_key}' has {first_len} value(s), \
         column '{key}' has {len} value(s)"
    )]
    ColumnsNotAligned {
        /// Key of the first column.
        #[error(not(source))]
        first_key: String,

        /// Number of values in the first column.
        first_len: usize,

        /// Key of the misaligned column.
        key: String,

        /// Number of values in the misaligned column.
        len: usize,
    },

    /// Data row has a different number of cells than the header.
    #[display("Row {row} has {actual} value(s), but header has {expected}")]
    RowLength {
        /// Zero-based index of the data row.
        row: usize,

        /// Number of header cells.
        expected: usize,

        /// Number of row cells.
        actual: usize,
    },

    /// Transformer is not registered.
    #[display("Table transformer `{_0}` is not registered")]
    UnknownTransformer(#[error(not(source))] String),
}

/// Result type alias for table operations.
pub type TableResult<T> = Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_not_aligned_message() {
        let err = TableError::ColumnsNotAligned {
            first_key: "key1".into(),
            first_len: 2,
            key: "key2".into(),
            len: 1,
        };

        assert_eq!(
            err.to_string(),
            "Columns are not aligned: column 'key1' has 2 value(s), column 'key2' has 1 value(s)",
        );
    }
}
