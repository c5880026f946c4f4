use std::fmt::Display;

/// An owned cell value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Missing data
    #[default]
    Absent,
    /// Text content
    Text(String),
    /// Floating point number
    Float(f64),
}

/// A cell value borrowed from a column.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ValueRef<'a> {
    Absent,
    Text(&'a str),
    Float(f64),
}

impl Value {
    pub fn view(&self) -> ValueRef<'_> {
        match self {
            Value::Absent => ValueRef::Absent,
            Value::Text(text) => ValueRef::Text(text),
            Value::Float(number) => ValueRef::Float(*number),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Absent)
    }
}

impl ValueRef<'_> {
    pub fn is_absent(&self) -> bool {
        matches!(self, ValueRef::Absent)
    }
}

impl Display for ValueRef<'_> {
    /// Absent cells render as an empty string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueRef::Absent => Ok(()),
            ValueRef::Text(text) => f.write_str(text),
            ValueRef::Float(number) => f.write_str(&format_float(*number)),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.view().fmt(f)
    }
}

/// Renders a float in its natural decimal form.
///
/// Integral values keep one fractional digit (`4.0`), everything else uses the
/// shortest representation that round-trips (`3.1`, `0.30000000000000004`).
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Renders a number stored in a text column.
///
/// Integral values drop the fraction (`1`, `2024`); everything else falls back
/// to [`format_float`].
pub fn format_number_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.0}")
    } else {
        format_float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_natural_form() {
        assert_eq!(format_float(4.0), "4.0");
        assert_eq!(format_float(3.1), "3.1");
        assert_eq!(format_float(-2.5), "-2.5");
        assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_float(1234567.0), "1234567.0");
    }

    #[test]
    fn number_text_form() {
        assert_eq!(format_number_text(1.0), "1");
        assert_eq!(format_number_text(2024.0), "2024");
        assert_eq!(format_number_text(3.1), "3.1");
        assert_eq!(format_number_text(1e20), "100000000000000000000");
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Absent.to_string(), "");
        assert_eq!(Value::from("a,b").to_string(), "a,b");
        assert_eq!(Value::from(8.4).to_string(), "8.4");
        assert_eq!(Value::from(None::<f64>), Value::Absent);
    }
}
