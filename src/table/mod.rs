//! # Table Module
//!
//! An explicit ordered-column container. Every column carries a declared type
//! (text or float) and a presence map, so missing data stays distinct from empty
//! text or zero. Row count is stored on the table itself and stays meaningful
//! for tables without columns.
use std::collections::HashSet;
use thiserror::Error;

mod column;
mod validity;
mod value;

pub use column::Column;
pub use column::ColumnData;
pub use column::ColumnType;
pub use validity::Validity;
pub use value::format_float;
pub use value::format_number_text;
pub use value::Value;
pub use value::ValueRef;

/// Errors raised when a table would break its shape invariants.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("Column '{name}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// An ordered sequence of uniquely named columns of equal length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Creates a table with no rows and no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with `row_count` rows and no columns.
    pub fn with_row_count(row_count: usize) -> Self {
        Self {
            columns: Vec::new(),
            row_count,
        }
    }

    /// Builds a table from columns, checking name uniqueness and lengths.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TableError> {
        let mut table = Table::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Builds a table from parts whose invariants are already guaranteed by the caller.
    pub(crate) fn from_parts(columns: Vec<Column>, row_count: usize) -> Self {
        debug_assert!(columns.iter().all(|column| column.len() == row_count));
        Self { columns, row_count }
    }

    /// Appends a column.
    ///
    /// A table without columns and without rows adopts the length of its first column.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already taken or the length differs from the row count.
    pub fn push_column(&mut self, column: Column) -> Result<(), TableError> {
        if self.column(column.name()).is_some() {
            Err(TableError::DuplicateColumn(column.name().to_owned()))?
        }
        if self.columns.is_empty() && self.row_count == 0 {
            self.row_count = column.len();
        } else if column.len() != self.row_count {
            Err(TableError::LengthMismatch {
                name: column.name().to_owned(),
                expected: self.row_count,
                actual: column.len(),
            })?
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks a column up by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Returns (name, type) pairs in column order.
    pub fn schema(&self) -> Vec<(&str, ColumnType)> {
        self.columns
            .iter()
            .map(|column| (column.name(), column.kind()))
            .collect()
    }

    /// Iterates over all rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<ValueRef<'_>>> + '_ {
        (0..self.row_count).map(|index| self.columns.iter().map(|column| column.get(index)).collect())
    }
}

/// Makes names unique by suffixing repeats with `.1`, `.2`, ...
pub(crate) fn deduplicate_names(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen = HashSet::<String>::new();
    names
        .into_iter()
        .map(|name| {
            if seen.insert(name.clone()) {
                return name;
            }
            let mut suffix = 1usize;
            loop {
                let candidate = format!("{name}.{suffix}");
                if taken.insert(candidate.clone()) {
                    seen.insert(candidate.clone());
                    return candidate;
                }
                suffix += 1;
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::float("col1", [Some(1.0), Some(2.0)]),
            Column::text("col2", [Some("a"), None]),
        ])
        .unwrap()
    }

    #[test]
    fn table_shape() {
        let table = sample();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column_names(), vec!["col1", "col2"]);
        assert_eq!(
            table.schema(),
            vec![("col1", ColumnType::Float), ("col2", ColumnType::Text)]
        );
    }

    #[test]
    fn table_rejects_duplicate_names() {
        let mut table = sample();
        let error = table.push_column(Column::text("col1", [Some("x"), Some("y")]));
        assert_eq!(error, Err(TableError::DuplicateColumn("col1".to_owned())));
    }

    #[test]
    fn table_rejects_length_mismatch() {
        let mut table = sample();
        let error = table.push_column(Column::text("col3", [Some("x")]));
        assert_eq!(
            error,
            Err(TableError::LengthMismatch {
                name: "col3".to_owned(),
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn table_rows() {
        let table = sample();
        assert_eq!(table.rows().nth(1), Some(vec![ValueRef::Float(2.0), ValueRef::Absent]));
        assert_eq!(table.rows().count(), 2);
    }

    #[test]
    fn table_without_columns_keeps_row_count() {
        let table = Table::with_row_count(4);
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column_count(), 0);
        assert!(table.is_empty());
        assert_eq!(table.rows().count(), 4);
    }

    #[test]
    fn deduplicate_repeated_names() {
        let names = vec!["a", "b", "a", "a", "a.1"]
            .into_iter()
            .map(str::to_owned)
            .collect();
        assert_eq!(deduplicate_names(names), vec!["a", "b", "a.2", "a.3", "a.1"]);
    }
}
