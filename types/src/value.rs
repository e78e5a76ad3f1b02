use serde_json::Value;

/// Wire tags for typed scalar values embedded in compiled binaries
/// (predicate operands and SetVariable payloads share this encoding).
pub const VALUE_INT: u8 = 0;
pub const VALUE_FLOAT: u8 = 1;
pub const VALUE_STRING: u8 = 2;
pub const VALUE_BOOL: u8 = 3;

/// A scalar constant authored into a compiled dialog or action bundle.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ScalarValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl ScalarValue {
    /// The JSON representation stored into session variables.
    pub fn to_json(&self) -> Value {
        match self {
            ScalarValue::Int(n) => Value::from(*n),
            ScalarValue::Float(f) => Value::from(*f),
            ScalarValue::Str(s) => Value::from(s.clone()),
            ScalarValue::Bool(b) => Value::from(*b),
        }
    }

    /// Appends the wire encoding of this value: a tag byte followed by the
    /// little-endian payload (strings are u16-length-prefixed UTF-8).
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            ScalarValue::Int(n) => {
                out.push(VALUE_INT);
                out.extend_from_slice(&n.to_le_bytes());
            }
            ScalarValue::Float(f) => {
                out.push(VALUE_FLOAT);
                out.extend_from_slice(&f.to_le_bytes());
            }
            ScalarValue::Str(s) => {
                out.push(VALUE_STRING);
                encode_str_into(s, out);
            }
            ScalarValue::Bool(b) => {
                out.push(VALUE_BOOL);
                out.push(u8::from(*b));
            }
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(n: i64) -> Self {
        ScalarValue::Int(n)
    }
}

impl From<f64> for ScalarValue {
    fn from(f: f64) -> Self {
        ScalarValue::Float(f)
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::Str(s.to_string())
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        ScalarValue::Bool(b)
    }
}

/// Appends a u16-length-prefixed UTF-8 string.
///
/// Panics if the string exceeds `u16::MAX` bytes; authored keys and
/// speech fragments are far below that limit.
pub fn encode_str_into(s: &str, out: &mut Vec<u8>) {
    let len = u16::try_from(s.len()).expect("string exceeds u16 length prefix");
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}
