use std::collections::HashSet;

/// Text read as missing data unless [`Criteria::nulls`] is overridden.
pub const DEFAULT_NULL_LITERALS: [&str; 13] = [
    "", "#N/A", "N/A", "NA", "NULL", "NaN", "nan", "null", "n/a", "#NA", "-NaN", "-nan", "<NA>",
];

/// Options controlling how a worksheet is turned into a table.
#[derive(Clone, Debug)]
pub struct Criteria {
    /// Sheet to read; the first sheet of the workbook when None.
    pub sheet_name: Option<String>,

    /// Text cells equal to one of these literals are read as absent.
    pub nulls: HashSet<String>,

    /// Read error cells such as `#DIV/0!` as absent instead of failing.
    pub error_as_null: bool,
}

impl Criteria {
    pub fn with_sheet(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: Some(sheet_name.into()),
            ..Self::default()
        }
    }

    /// Checks if the text is one of the configured null literals.
    pub(crate) fn is_null(&self, text: &str) -> bool {
        self.nulls.contains(text)
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            sheet_name: None,
            nulls: DEFAULT_NULL_LITERALS.iter().map(|literal| literal.to_string()).collect(),
            error_as_null: true,
        }
    }
}
