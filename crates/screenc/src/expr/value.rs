use std::fmt;

use screenc_core::artifact::ValueData;

/// A variable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Str(String),
    /// The size of a measured `TextBlock`, read as `Name.Width` and
    /// `Name.Height`.
    Size { width: i32, height: i32 },
}

impl Value {
    /// Returns the exportable form, or `None` for sizes.
    pub fn to_data(&self) -> Option<ValueData> {
        match self {
            Value::Int(v) => Some(ValueData::Int(*v)),
            Value::Str(s) => Some(ValueData::Str(s.clone())),
            Value::Size { .. } => None,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Size { .. } => "text size",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
            Value::Size { width, height } => write!(f, "{width}x{height}"),
        }
    }
}
