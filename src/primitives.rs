//! The seven JSON Schema primitive types and instance classification.

use serde_json::Value;
use std::fmt;

/// A JSON Schema primitive type.
///
/// `Integer` is a refinement of `Number`: a numeric instance with a zero
/// fractional part is classified as `Integer`, and an `Integer` instance
/// satisfies a schema `type` of `"number"` (see [`matches_type`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Array,
    Boolean,
    Integer,
    Number,
    Null,
    Object,
    String,
}

impl PrimitiveType {
    /// The keyword spelling used by the `type` keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Array => "array",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Number => "number",
            PrimitiveType::Null => "null",
            PrimitiveType::Object => "object",
            PrimitiveType::String => "string",
        }
    }

    /// Parse a `type` keyword value. Returns `None` for anything that is not
    /// one of the seven primitive type names.
    pub fn from_name(name: &str) -> Option<PrimitiveType> {
        match name {
            "array" => Some(PrimitiveType::Array),
            "boolean" => Some(PrimitiveType::Boolean),
            "integer" => Some(PrimitiveType::Integer),
            "number" => Some(PrimitiveType::Number),
            "null" => Some(PrimitiveType::Null),
            "object" => Some(PrimitiveType::Object),
            "string" => Some(PrimitiveType::String),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an instance value as one of the seven primitive types.
///
/// Numbers with a zero fractional part (including all i64/u64 values) are
/// classified as `Integer`; everything else numeric is `Number`.
pub fn primitive_type_of(instance: &Value) -> PrimitiveType {
    match instance {
        Value::Array(_) => PrimitiveType::Array,
        Value::Bool(_) => PrimitiveType::Boolean,
        Value::Null => PrimitiveType::Null,
        Value::Object(_) => PrimitiveType::Object,
        Value::String(_) => PrimitiveType::String,
        Value::Number(n) => {
            if n.is_i64()
                || n.is_u64()
                || n.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
            {
                PrimitiveType::Integer
            } else {
                PrimitiveType::Number
            }
        }
    }
}

/// Whether an instance satisfies a declared `type`. Identical to comparing
/// classifications except that `number` also accepts integer instances.
pub fn matches_type(instance: &Value, declared: PrimitiveType) -> bool {
    let actual = primitive_type_of(instance);
    actual == declared || (declared == PrimitiveType::Number && actual == PrimitiveType::Integer)
}
