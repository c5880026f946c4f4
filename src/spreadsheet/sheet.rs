use crate::error::ResultMessage;
use crate::error::SheetStatsError;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::criteria::Criteria;
use crate::table::deduplicate_names;
use crate::table::format_number_text;
use crate::table::Column;
use crate::table::Table;
use crate::table::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Cells collected from one worksheet, in the order they appear in the file.
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    pub(crate) cells: Vec<Cell>,
    /// Data range covered by the cells
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(crate) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            row_lower_bound: None,
            row_upper_bound: None,
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell, widening the data range to include it.
    pub(crate) fn push(&mut self, cell: Cell) {
        if self.row_lower_bound.map(|lower| cell.row < lower).unwrap_or(true) {
            self.row_lower_bound = Some(cell.row);
        }
        if self.row_upper_bound.map(|upper| upper < cell.row).unwrap_or(true) {
            self.row_upper_bound = Some(cell.row);
        }
        if self.col_lower_bound.map(|lower| cell.col < lower).unwrap_or(true) {
            self.col_lower_bound = Some(cell.col);
        }
        if self.col_upper_bound.map(|upper| upper < cell.col).unwrap_or(true) {
            self.col_upper_bound = Some(cell.col);
        }
        self.cells.push(cell);
    }

    /// Builds a table from the collected cells.
    ///
    /// The first row holding a present value is the header; the data range
    /// below it becomes the records, with rows kept even when all of their
    /// cells are absent. Missing header names become `Unnamed: {index}`, and
    /// repeated names are made unique with numeric suffixes.
    pub(crate) fn into_table(self, criteria: &Criteria) -> Result<Table, SheetStatsError> {
        let prefix = format!("Read sheet '{}' of '{}' failed", self.name, self.file_name);
        let (Some(col_lower), Some(col_upper)) = (self.col_lower_bound, self.col_upper_bound) else {
            debug!(sheet = %self.name, "sheet has no cells");
            return Ok(Table::new());
        };
        let width = col_upper - col_lower + 1;

        let mut rows = BTreeMap::<usize, Vec<Value>>::new();
        for cell in &self.cells {
            let value = cell
                .to_value(criteria)
                .with_prefix(&format!("{prefix}: cell {} holds '{}'", cell.reference(), cell.value))?;
            if !value.is_absent() {
                rows.entry(cell.row).or_insert_with(|| vec![Value::Absent; width])[cell.col - col_lower] = value;
            }
        }

        let Some(last_row) = rows.last_key_value().map(|(row, _)| *row) else {
            debug!(sheet = %self.name, "sheet has no present values");
            return Ok(Table::new());
        };
        let mut rows = rows.into_iter();
        let Some((header_row, header)) = rows.next() else {
            return Ok(Table::new());
        };
        let names = header
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Absent => format!("Unnamed: {index}"),
                Value::Text(text) => text,
                Value::Float(number) => format_number_text(number),
            })
            .collect();
        let names = deduplicate_names(names);

        let row_count = last_row - header_row;
        let mut columns: Vec<Vec<Value>> = vec![vec![Value::Absent; row_count]; width];
        for (row, record) in rows {
            for (col, value) in record.into_iter().enumerate() {
                columns[col][row - header_row - 1] = value;
            }
        }

        let columns = names
            .iter()
            .zip(columns)
            .map(|(name, values)| Column::from_values(name, values))
            .collect();
        let table = Table::from_columns(columns)
            .map_err(SheetStatsError::from)
            .with_prefix(&prefix)?;
        debug!(
            sheet = %self.name,
            rows = table.row_count(),
            columns = table.column_count(),
            "sheet converted to table"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::cell::CellType;
    use crate::table::ColumnType;
    use crate::table::ValueRef;

    fn push(sheet: &mut Sheet, row: usize, col: usize, kind: CellType, value: &str) {
        sheet.push(Cell {
            row,
            col,
            kind,
            value: value.to_owned(),
        });
    }

    fn text(sheet: &mut Sheet, row: usize, col: usize, value: &str) {
        push(sheet, row, col, CellType::Text, value);
    }

    fn number(sheet: &mut Sheet, row: usize, col: usize, value: &str) {
        push(sheet, row, col, CellType::Number, value);
    }

    #[test]
    fn sheet_bounds() {
        let mut sheet = Sheet::new("", "");
        assert!(sheet.is_empty());
        text(&mut sheet, 1, 3, "a");
        text(&mut sheet, 1, 1, "b");
        text(&mut sheet, 3, 2, "c");
        assert_eq!(sheet.row_lower_bound, Some(1));
        assert_eq!(sheet.row_upper_bound, Some(3));
        assert_eq!(sheet.col_lower_bound, Some(1));
        assert_eq!(sheet.col_upper_bound, Some(3));
    }

    #[test]
    fn header_and_records() {
        let mut sheet = Sheet::new("book.xlsx", "Sheet1");
        text(&mut sheet, 0, 0, "col1");
        text(&mut sheet, 0, 1, "col2");
        text(&mut sheet, 0, 2, "col3");
        for (row, (a, b, c)) in [("1", "3,1", "a"), ("2", "4,5", "b"), ("3", "8,4", "c"), ("4", "3,4", "e")]
            .into_iter()
            .enumerate()
        {
            number(&mut sheet, row + 1, 0, a);
            text(&mut sheet, row + 1, 1, b);
            text(&mut sheet, row + 1, 2, c);
        }
        let table = sheet.into_table(&Criteria::default()).unwrap();
        assert_eq!(table.row_count(), 4);
        assert_eq!(
            table.schema(),
            vec![
                ("col1", ColumnType::Float),
                ("col2", ColumnType::Text),
                ("col3", ColumnType::Text)
            ]
        );
        assert_eq!(table.column("col2").unwrap().get(0), ValueRef::Text("3,1"));
    }

    #[test]
    fn header_gaps_and_duplicates() {
        let mut sheet = Sheet::new("", "");
        text(&mut sheet, 2, 1, "x");
        text(&mut sheet, 2, 3, "x");
        number(&mut sheet, 2, 4, "2024");
        number(&mut sheet, 3, 2, "1");
        let table = sheet.into_table(&Criteria::default()).unwrap();
        assert_eq!(table.column_names(), vec!["x", "Unnamed: 1", "x.1", "2024"]);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn blank_rows_inside_data_are_kept() {
        let mut sheet = Sheet::new("", "");
        text(&mut sheet, 0, 0, "n");
        number(&mut sheet, 1, 0, "1");
        text(&mut sheet, 2, 0, "NULL");
        number(&mut sheet, 4, 0, "4");
        let table = sheet.into_table(&Criteria::default()).unwrap();
        let n = table.column("n").unwrap();
        assert_eq!(n.kind(), ColumnType::Float);
        assert_eq!(
            n.values().collect::<Vec<_>>(),
            vec![ValueRef::Float(1.0), ValueRef::Absent, ValueRef::Absent, ValueRef::Float(4.0)]
        );
    }

    #[test]
    fn mixed_column_is_text() {
        let mut sheet = Sheet::new("", "");
        text(&mut sheet, 0, 0, "v");
        number(&mut sheet, 1, 0, "1");
        text(&mut sheet, 2, 0, "two");
        let table = sheet.into_table(&Criteria::default()).unwrap();
        let v = table.column("v").unwrap();
        assert_eq!(v.kind(), ColumnType::Text);
        assert_eq!(v.values().collect::<Vec<_>>(), vec![ValueRef::Text("1"), ValueRef::Text("two")]);
    }

    #[test]
    fn mixed_column_keeps_integer_and_decimal_text_apart() {
        let mut sheet = Sheet::new("", "");
        text(&mut sheet, 0, 0, "v");
        number(&mut sheet, 1, 0, "1");
        text(&mut sheet, 2, 0, "1.0");
        number(&mut sheet, 3, 0, "2.5");
        let table = sheet.into_table(&Criteria::default()).unwrap();
        let v = table.column("v").unwrap();
        assert_eq!(
            v.values().collect::<Vec<_>>(),
            vec![ValueRef::Text("1"), ValueRef::Text("1.0"), ValueRef::Text("2.5")]
        );
        assert_eq!(crate::report::unique_count(v), 3);
    }

    #[test]
    fn boolean_column_is_numeric() {
        let mut sheet = Sheet::new("", "");
        text(&mut sheet, 0, 0, "flag");
        for (row, value) in ["1", "0", "1", "1"].into_iter().enumerate() {
            push(&mut sheet, row + 1, 0, CellType::Boolean, value);
        }
        let table = sheet.into_table(&Criteria::default()).unwrap();
        let flag = table.column("flag").unwrap();
        assert_eq!(flag.kind(), ColumnType::Float);

        let (_, report) = crate::pipeline::analyze(&table);
        let flag = report.column("flag").unwrap();
        assert_eq!(flag.unique_count, 2);
        assert_eq!((flag.mean, flag.min, flag.max), (Some(0.8), Some(0.0), Some(1.0)));
    }

    #[test]
    fn header_only_and_empty_sheets() {
        let mut sheet = Sheet::new("", "");
        text(&mut sheet, 0, 0, "a");
        text(&mut sheet, 0, 1, "b");
        let table = sheet.into_table(&Criteria::default()).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.row_count(), 0);

        let table = Sheet::new("", "").into_table(&Criteria::default()).unwrap();
        assert_eq!((table.row_count(), table.column_count()), (0, 0));

        let mut sheet = Sheet::new("", "");
        text(&mut sheet, 0, 0, "");
        let table = sheet.into_table(&Criteria::default()).unwrap();
        assert_eq!((table.row_count(), table.column_count()), (0, 0));
    }

    #[test]
    fn invalid_number_reports_cell() {
        let mut sheet = Sheet::new("book.xlsx", "Data");
        text(&mut sheet, 0, 0, "n");
        number(&mut sheet, 1, 0, "oops");
        let error = sheet.into_table(&Criteria::default()).unwrap_err();
        assert!(error
            .to_string()
            .starts_with("Read sheet 'Data' of 'book.xlsx' failed: cell A2 holds 'oops'"));
    }
}
