//! Numeric column selection.
use crate::table::Column;
use crate::table::Table;

/// Selects the columns eligible for mean/min/max aggregation.
///
/// Columns where every cell is absent are dropped first, then only float columns
/// are kept, in their original order. The result keeps the input's row count even
/// when no column qualifies.
pub fn select_numeric(table: &Table) -> Table {
    let columns: Vec<Column> = table
        .columns()
        .iter()
        .filter(|column| !column.is_all_absent())
        .filter(|column| column.kind().is_float())
        .cloned()
        .collect();
    Table::from_parts(columns, table.row_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    #[test]
    fn selects_float_columns_in_order() {
        let table = Table::from_columns(vec![
            Column::float("col1", [Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
            Column::text("col2", [Some("3,1"), Some("4,5"), Some("8,4"), Some("3,4")]),
            Column::text("col3", [Some("a"), Some("b"), Some("c"), Some("e")]),
        ])
        .unwrap();
        let numeric = select_numeric(&normalize(&table));
        assert_eq!(numeric.column_names(), vec!["col1", "col2"]);
        assert_eq!(numeric.row_count(), 4);
        assert_eq!(
            numeric
                .column("col1")
                .unwrap()
                .present_floats()
                .unwrap()
                .collect::<Vec<_>>(),
            vec![1.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn drops_all_absent_float_columns() {
        let table = Table::from_columns(vec![
            Column::float("empty", [None, None]),
            Column::float("half", [None, Some(1.5)]),
        ])
        .unwrap();
        let numeric = select_numeric(&table);
        assert_eq!(numeric.column_names(), vec!["half"]);
        assert!(numeric.columns().iter().all(|column| !column.is_all_absent()));
    }

    #[test]
    fn no_qualifying_columns() {
        let table = Table::from_columns(vec![Column::text("t", [Some("x"), Some("y"), None])]).unwrap();
        let numeric = select_numeric(&table);
        assert_eq!(numeric.column_count(), 0);
        assert_eq!(numeric.row_count(), 3);
    }
}
