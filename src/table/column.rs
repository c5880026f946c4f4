use crate::table::validity::Validity;
use crate::table::value::format_number_text;
use crate::table::value::Value;
use crate::table::value::ValueRef;
use std::fmt::Display;

/// Declared type of a column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnType {
    /// Variable-length strings
    Text,
    /// Double-precision floating point numbers
    Float,
}

impl ColumnType {
    /// Returns the string representation of the column type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Float => "float",
        }
    }

    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, ColumnType::Float)
    }

    /// Detects the column type from a set of values.
    /// Float only if every present value is a float; empty or all-absent input is text.
    pub fn detect<'a, I>(values: I) -> ColumnType
    where
        I: IntoIterator<Item = ValueRef<'a>>,
    {
        let mut has_float = false;
        for value in values {
            match value {
                ValueRef::Absent => (),
                ValueRef::Float(_) => has_float = true,
                ValueRef::Text(_) => return ColumnType::Text,
            }
        }
        if has_float {
            ColumnType::Float
        } else {
            ColumnType::Text
        }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed storage of a column. Slots of absent cells hold a default value.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Text(Vec<String>),
    Float(Vec<f64>),
}

/// A named column with typed values and a parallel presence map.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
    validity: Validity,
}

impl Column {
    /// Creates a text column; `None` marks an absent cell.
    pub fn text<I, S>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let mut data = Vec::new();
        let mut validity = Validity::default();
        for value in values {
            validity.push(value.is_some());
            data.push(value.map(Into::into).unwrap_or_default());
        }
        Self {
            name: name.to_owned(),
            data: ColumnData::Text(data),
            validity,
        }
    }

    /// Creates a float column; `None` and `NaN` mark an absent cell.
    pub fn float<I>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut data = Vec::new();
        let mut validity = Validity::default();
        for value in values {
            let value = value.filter(|number| !number.is_nan());
            validity.push(value.is_some());
            data.push(value.unwrap_or_default());
        }
        Self {
            name: name.to_owned(),
            data: ColumnData::Float(data),
            validity,
        }
    }

    /// Creates a column from loosely typed values.
    /// The column is float if every present value is a float; otherwise floats are
    /// stored as text, integral ones without a fraction (`1`, `3.5`).
    pub fn from_values(name: &str, values: Vec<Value>) -> Self {
        match ColumnType::detect(values.iter().map(Value::view)) {
            ColumnType::Float => Column::float(
                name,
                values.into_iter().map(|value| match value {
                    Value::Float(number) => Some(number),
                    _ => None,
                }),
            ),
            ColumnType::Text => Column::text(
                name,
                values.into_iter().map(|value| match value {
                    Value::Absent => None,
                    Value::Text(text) => Some(text),
                    Value::Float(number) => Some(format_number_text(number)),
                }),
            ),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnType {
        match self.data {
            ColumnData::Text(_) => ColumnType::Text,
            ColumnData::Float(_) => ColumnType::Float,
        }
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.validity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validity.is_empty()
    }

    /// Number of absent cells.
    pub fn null_count(&self) -> usize {
        self.validity.absent_count()
    }

    /// Returns true if no cell holds a value (including zero-length columns).
    pub fn is_all_absent(&self) -> bool {
        self.validity.present_count() == 0
    }

    /// Gets the value at `row`; out of range rows read as absent.
    pub fn get(&self, row: usize) -> ValueRef<'_> {
        if !self.validity.is_present(row) {
            return ValueRef::Absent;
        }
        match &self.data {
            ColumnData::Text(values) => ValueRef::Text(&values[row]),
            ColumnData::Float(values) => ValueRef::Float(values[row]),
        }
    }

    /// Iterates over every cell in row order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = ValueRef<'_>> + '_ {
        (0..self.len()).map(|row| self.get(row))
    }

    /// Iterates over text cells, `None` for absent ones. Returns None for float columns.
    pub fn text_values(&self) -> Option<impl Iterator<Item = Option<&str>> + '_> {
        match &self.data {
            ColumnData::Text(values) => Some(
                values
                    .iter()
                    .zip(self.validity.iter())
                    .map(|(value, present)| present.then_some(value.as_str())),
            ),
            ColumnData::Float(_) => None,
        }
    }

    /// Iterates over present float values. Returns None for text columns.
    pub fn present_floats(&self) -> Option<impl Iterator<Item = f64> + '_> {
        match &self.data {
            ColumnData::Float(values) => Some(
                values
                    .iter()
                    .zip(self.validity.iter())
                    .filter_map(|(value, present)| present.then_some(*value)),
            ),
            ColumnData::Text(_) => None,
        }
    }
}
