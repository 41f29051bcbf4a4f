use serde_json::Value;
use std::fmt;

/// Coarse structure of a value, used to decide how two values are compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Mapping,
    Sequence,
    Scalar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn shape(self) -> Shape {
        match self {
            ValueKind::Object => Shape::Mapping,
            ValueKind::Array => Shape::Sequence,
            ValueKind::Null | ValueKind::Bool | ValueKind::Number | ValueKind::String => {
                Shape::Scalar
            }
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Exact equality for leaf values. No coercion happens between kinds, and
/// numbers compare by their parsed representation, so `1` and `1.0` differ.
pub fn scalars_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(v1), Value::Bool(v2)) => v1 == v2,
        (Value::Number(v1), Value::Number(v2)) => v1 == v2,
        (Value::String(v1), Value::String(v2)) => v1 == v2,
        (_, _) => false,
    }
}
