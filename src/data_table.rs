// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Data tables attached to [`Step`]s.
//!
//! [`Step`]: crate::Step

use std::{collections::HashMap, fmt};

/// Table of string cells attached to a [`Step`].
///
/// The first row is conventionally a header. The table is handed to step
/// handlers as is: no cell is ever coerced or rewritten by the runner.
///
/// ```rust
/// use stepbind::DataTable;
///
/// let table = DataTable::from(vec![
///     vec!["name", "widgets"],
///     vec!["Alice", "3"],
///     vec!["Bob", "5"],
/// ]);
///
/// assert_eq!(table.headers(), Some(&["name".to_owned(), "widgets".to_owned()][..]));
/// assert_eq!(table.hashes()[1]["widgets"], "5");
/// ```
///
/// [`Step`]: crate::Step
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct DataTable {
    rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Creates a new [`DataTable`] out of the given `rows`.
    #[must_use]
    pub const fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Returns all the rows, header included.
    #[must_use]
    pub fn raw(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the header row, if any.
    #[must_use]
    pub fn headers(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Returns the rows following the header.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// Returns the rows following the header as maps keyed by the header
    /// cells.
    #[must_use]
    pub fn hashes(&self) -> Vec<HashMap<String, String>> {
        let Some(headers) = self.headers() else {
            return Vec::new();
        };

        self.rows()
            .iter()
            .map(|row| headers.iter().cloned().zip(row.iter().cloned()).collect())
            .collect()
    }

    /// Returns a two-column table as a map from the first column to the
    /// second one.
    ///
    /// `None` if any row isn't exactly two cells wide.
    #[must_use]
    pub fn rows_hash(&self) -> Option<HashMap<String, String>> {
        self.rows
            .iter()
            .map(|row| match row.as_slice() {
                [k, v] => Some((k.clone(), v.clone())),
                _ => None,
            })
            .collect()
    }

    /// Returns the cells of the column named `name` in the header, excluding
    /// the header itself.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.headers()?.iter().position(|h| h == name)?;
        Some(
            self.rows()
                .iter()
                .map(|row| row.get(idx).map_or("", String::as_str))
                .collect(),
        )
    }

    /// Returns this table with rows and columns swapped.
    ///
    /// Ragged rows are cut down to the width of the first one.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let width = self.width();
        let mut transposed = vec![Vec::with_capacity(self.rows.len()); width];
        for row in &self.rows {
            for (col, cell) in transposed.iter_mut().zip(row) {
                col.push(cell.clone());
            }
        }
        Self::new(transposed)
    }

    /// Indicates whether this table has no rows at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows, header included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Number of cells in the first row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Applies `f` to every cell, stopping at the first error.
    pub(crate) fn try_map_cells<E>(
        &self,
        mut f: impl FnMut(&str) -> Result<String, E>,
    ) -> Result<Self, E> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| f(c.as_str()))
                    .collect::<Result<Vec<_>, E>>()
            })
            .collect::<Result<Vec<_>, E>>()
            .map(Self::new)
    }
}

impl From<Vec<Vec<&str>>> for DataTable {
    fn from(rows: Vec<Vec<&str>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(str::to_owned).collect())
                .collect(),
        )
    }
}

impl From<Vec<Vec<String>>> for DataTable {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

impl From<gherkin::Table> for DataTable {
    fn from(table: gherkin::Table) -> Self {
        Self::new(table.rows)
    }
}

impl fmt::Display for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "| {} |", row.join(" | "))?;
        }
        Ok(())
    }
}
