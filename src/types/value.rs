use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

/// Float comparisons tolerate this much rounding error.
const EPSILON: f64 = 1e-8;

/// Classification of a runtime [`Value`].
///
/// The set is closed: records enter the engine through serde serialization
/// and classify as `Map`, so every match on `Kind` is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Map,
}

/// Classify a value. Total; never fails.
#[must_use]
pub fn kind(v: &Value) -> Kind {
    match v {
        Value::Null => Kind::Null,
        Value::Bool(_) => Kind::Bool,
        Value::Number(_) => Kind::Number,
        Value::String(_) => Kind::String,
        Value::Array(_) => Kind::Array,
        Value::Object(_) => Kind::Map,
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Map => "map",
        };
        write!(f, "{s}")
    }
}

/// Compare two values of possibly different kinds.
///
/// If either side is a number or bool, both are compared as floats within
/// [`EPSILON`]. Otherwise, if either side is a string, both are compared
/// lexicographically. Composite values only support equality: unequal
/// arrays/maps report `Greater`, so no ordering should be read into them.
#[must_use]
pub fn compare(a: &Value, b: &Value) -> Ordering {
    let (ka, kb) = (kind(a), kind(b));
    if matches!(ka, Kind::Number | Kind::Bool) || matches!(kb, Kind::Number | Kind::Bool) {
        let (x, y) = (to_f64(a), to_f64(b));
        if (x - y).abs() < EPSILON {
            Ordering::Equal
        } else if x < y {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    } else if ka == Kind::String || kb == Kind::String {
        to_text(a).cmp(&to_text(b))
    } else if a == b {
        Ordering::Equal
    } else {
        Ordering::Greater
    }
}

/// Whether two values compare equal under [`compare`].
#[must_use]
pub fn equal(a: &Value, b: &Value) -> bool {
    compare(a, b) == Ordering::Equal
}

/// Best-effort float coercion. Unparsable inputs become `0.0`, never an error.
#[must_use]
pub fn to_f64(v: &Value) -> f64 {
    match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        Value::Bool(false) => 0.0,
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Best-effort signed integer coercion, truncating floats toward zero.
#[must_use]
pub fn to_i64(v: &Value) -> i64 {
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else {
                n.as_f64().unwrap_or(0.0) as i64
            }
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse()
                .unwrap_or_else(|_| s.parse::<f64>().unwrap_or(0.0) as i64)
        }
        other => to_f64(other) as i64,
    }
}

/// Best-effort unsigned integer coercion. Negative inputs become `0`.
#[must_use]
pub fn to_u64(v: &Value) -> u64 {
    match v {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u
            } else {
                let f = n.as_f64().unwrap_or(0.0);
                if f > 0.0 {
                    f as u64
                } else {
                    0
                }
            }
        }
        other => {
            let i = to_i64(other);
            if i > 0 {
                i as u64
            } else {
                0
            }
        }
    }
}

/// Best-effort string form. Strings pass through unquoted; composites render
/// as their JSON text; null is the empty string.
#[must_use]
pub fn to_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Best-effort bool coercion: nonzero numbers and the strings `"true"`/`"1"`
/// are true; everything unparsable (including the empty string) is false.
#[must_use]
pub fn to_bool(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim(), "true" | "True" | "TRUE" | "1"),
        _ => false,
    }
}
