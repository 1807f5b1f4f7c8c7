//! Tabular step argument.

use std::collections::HashMap;

/// A data table attached to a step.
///
/// Provides convenience accessors over the raw rows; the first row is
/// treated as a header by the map-shaped accessors.
///
/// # Example
///
/// ```rust
/// use cornichon::DataTable;
///
/// let table = DataTable::from(vec![
///     vec!["name", "age"],
///     vec!["Alice", "30"],
///     vec!["Bob", "25"],
/// ]);
///
/// let hashes = table.hashes();
/// assert_eq!(hashes[0].get("name"), Some(&"Alice".to_string()));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataTable {
    rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Creates a new [`DataTable`] from raw rows.
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Returns all rows, header included.
    #[must_use]
    pub fn raw(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the rows without the header row.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        if self.rows.is_empty() { &[] } else { &self.rows[1..] }
    }

    /// Returns the header row, if the table is non-empty.
    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Converts the table to one map per body row, keyed by the header.
    #[must_use]
    pub fn hashes(&self) -> Vec<HashMap<String, String>> {
        let Some(header) = self.header() else {
            return Vec::new();
        };
        self.rows[1..]
            .iter()
            .map(|row| {
                header
                    .iter()
                    .zip(row)
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .collect()
    }

    /// Converts a two-column table to a single key→value map.
    ///
    /// Rows with fewer than two cells are skipped.
    #[must_use]
    pub fn rows_hash(&self) -> HashMap<String, String> {
        self.rows
            .iter()
            .filter(|row| row.len() >= 2)
            .map(|row| (row[0].clone(), row[1].clone()))
            .collect()
    }

    /// Indicates whether the table has no rows at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<S: Into<String>> From<Vec<Vec<S>>> for DataTable {
    fn from(rows: Vec<Vec<S>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}
