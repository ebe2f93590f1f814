// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Encoding and decoding of examples tables as text.

use super::{properties::VALUE_SEPARATOR, TableProperties};
use crate::error::{TableError, TableResult};

/// Value separators tried in order when a configured one occurs in a cell.
pub const VALUE_SEPARATORS: [&str; 7] = ["|", "!", "?", "$", "#", "%", "*"];

/// Splits a table into its rows. An empty table has a single empty row.
#[must_use]
pub fn parse_rows(table: &str) -> Vec<&str> {
    table
        .split('\n')
        .map(|row| row.strip_suffix('\r').unwrap_or(row))
        .collect()
}

/// Splits every row but the header one into cells by the value separator.
#[must_use]
pub fn parse_data_rows(rows: &[&str], properties: &TableProperties) -> Vec<Vec<String>> {
    rows.iter()
        .skip(1)
        .map(|row| split_row(row, properties.value_separator()))
        .collect()
}

/// Splits a single row into trimmed cells, ignoring the outer separators.
#[must_use]
pub fn split_row(row: &str, separator: &str) -> Vec<String> {
    let row = row.trim();
    let row = row.strip_prefix(separator).unwrap_or(row);
    let row = row.strip_suffix(separator).unwrap_or(row);
    row.split(separator).map(|cell| cell.trim().to_owned()).collect()
}

/// Builds a table of the given `keys` and `rows`.
///
/// The header always uses the header separator. If
/// `check_for_value_separator` is set and the configured value separator
/// occurs in some value, the first of [`VALUE_SEPARATORS`] not occurring in
/// any value is used instead. With `append_properties` the effective
/// properties line precedes the table.
///
/// # Errors
///
/// With [`TableError::NoApplicableSeparator`] if every candidate separator
/// occurs in some value.
pub fn build_table<R, V>(
    keys: &[impl AsRef<str>],
    rows: &[R],
    properties: &TableProperties,
    check_for_value_separator: bool,
    append_properties: bool,
) -> TableResult<String>
where
    R: AsRef<[V]>,
    V: AsRef<str>,
{
    let mut properties = properties.clone();
    if check_for_value_separator {
        let separator = value_separator_for(rows, properties.value_separator())?.to_owned();
        if separator != properties.value_separator() {
            properties.set(VALUE_SEPARATOR, separator);
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    if append_properties {
        lines.push(properties.to_properties_line());
    }
    lines.push(join_row(keys, properties.header_separator()));
    lines.extend(
        rows.iter()
            .map(|row| join_row(row.as_ref(), properties.value_separator())),
    );
    Ok(lines.join("\n"))
}

/// Builds a table of the given `keys` from `columns` of values, transposing
/// them into rows.
///
/// # Errors
///
/// With [`TableError::ColumnsNotAligned`] if the columns differ in length.
pub fn build_table_from_columns<C, V>(
    keys: &[impl AsRef<str>],
    columns: &[C],
    properties: &TableProperties,
) -> TableResult<String>
where
    C: AsRef<[V]>,
    V: AsRef<str>,
{
    let first_len = columns.first().map_or(0, |c| c.as_ref().len());
    if let Some((i, column)) = columns
        .iter()
        .enumerate()
        .find(|(_, c)| c.as_ref().len() != first_len)
    {
        let name = |i: usize| keys.get(i).map_or_else(String::new, |k| k.as_ref().to_owned());
        return Err(TableError::ColumnsNotAligned {
            first_key: name(0),
            first_len,
            key: name(i),
            len: column.as_ref().len(),
        });
    }

    let rows = (0..first_len)
        .map(|row| {
            columns
                .iter()
                .map(|column| column.as_ref()[row].as_ref())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    build_table(keys, &rows, properties, true, false)
}

fn value_separator_for<'s, R, V>(rows: &[R], configured: &'s str) -> TableResult<&'s str>
where
    R: AsRef<[V]>,
    V: AsRef<str>,
{
    let applicable = |separator: &str| {
        rows.iter()
            .flat_map(|row| -> &[V] { row.as_ref() })
            .all(|value| !value.as_ref().contains(separator))
    };
    if applicable(configured) {
        return Ok(configured);
    }
    VALUE_SEPARATORS
        .into_iter()
        .find(|&s| applicable(s))
        .ok_or(TableError::NoApplicableSeparator)
}

fn join_row(cells: &[impl AsRef<str>], separator: &str) -> String {
    let mut row = String::from(separator);
    for cell in cells {
        row.push_str(cell.as_ref());
        row.push_str(separator);
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "|key1|key2|\n|4|3|\n|1|0|";
    const KEYS: [&str; 2] = ["key1", "key2"];

    #[test]
    fn parses_rows() {
        assert_eq!(parse_rows(TABLE), ["|key1|key2|", "|4|3|", "|1|0|"]);
        assert_eq!(parse_rows(""), [""]);
        assert_eq!(
            parse_rows("|key1|key2|\n|value?|some?value|\r\n|1|0|"),
            ["|key1|key2|", "|value?|some?value|", "|1|0|"],
        );
    }

    #[test]
    fn parses_data_rows() {
        let rows = parse_rows(TABLE);

        assert_eq!(
            parse_data_rows(&rows, &TableProperties::new()),
            [vec!["4", "3"], vec!["1", "0"]],
        );
    }

    #[test]
    fn builds_table_with_configured_separator() {
        let table =
            build_table(&KEYS, &[["4", "3"], ["1", "0"]], &TableProperties::new(), true, false);

        assert_eq!(table.unwrap(), TABLE);
    }

    #[test]
    fn picks_first_applicable_separator() {
        let props = TableProperties::new();

        assert_eq!(
            build_table(&KEYS, &[["4", "3"], ["1|", "0"]], &props, true, false).unwrap(),
            "|key1|key2|\n!4!3!\n!1|!0!",
        );
        assert_eq!(
            build_table(&KEYS, &[["11|", "12!"], ["13?", "14$"]], &props, true, false).unwrap(),
            "|key1|key2|\n#11|#12!#\n#13?#14$#",
        );
    }

    #[test]
    fn fails_without_applicable_separator() {
        let rows = [["0|", "1!"], ["2?", "3$"], ["4#", "5%"], ["6*", "7*"]];

        let err = build_table(&KEYS, &rows, &TableProperties::new(), true, false).unwrap_err();

        assert_eq!(
            err.to_string(),
            "There are not alternative value separators applicable for examples table",
        );
    }

    #[test]
    fn keeps_configured_separator_without_check() {
        let table = build_table(
            &KEYS,
            &[["v\\|a1", "val\\|2"]],
            &TableProperties::new(),
            false,
            false,
        );

        assert_eq!(table.unwrap(), "|key1|key2|\n|v\\|a1|val\\|2|");
    }

    #[test]
    fn prepends_properties_line() {
        let props = TableProperties::new().with(VALUE_SEPARATOR, "!");

        let table = build_table(&KEYS, &[["a1", "a2"]], &props, false, true);

        assert_eq!(table.unwrap(), "{valueSeparator=!}\n|key1|key2|\n!a1!a2!");
    }

    #[test]
    fn transposes_columns() {
        let table =
            build_table_from_columns(&KEYS, &[["4", "3"], ["1", "0"]], &TableProperties::new());

        assert_eq!(table.unwrap(), "|key1|key2|\n|4|1|\n|3|0|");
    }

    #[test]
    fn rejects_misaligned_columns() {
        let columns = [vec!["4", "3"], vec!["0"]];

        let err = build_table_from_columns(&KEYS, &columns, &TableProperties::new()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Columns are not aligned: column 'key1' has 2 value(s), column 'key2' has 1 value(s)",
        );
    }
}
