//! Numeric values held on the stack
//!
//! The stack is heterogeneous: integers and floats live side by side and
//! mixed arithmetic promotes to float.

use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Float with a zero fractional part becomes an Int when it fits
    pub fn normalized(n: f64) -> Value {
        if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
            Value::Int(n as i64)
        } else {
            Value::Float(n)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Int(n) => n as f64,
            Value::Float(n) => n,
        }
    }

    /// Non-zero is true
    pub fn is_truthy(&self) -> bool {
        match *self {
            Value::Int(n) => n != 0,
            Value::Float(n) => n != 0.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        !self.is_truthy()
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Integral coercion: floats must have no fractional part
    pub fn integral(&self) -> Option<i64> {
        match *self {
            Value::Int(n) => Some(n),
            Value::Float(n) => {
                if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
                    Some(n as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Truncating coercion, the way a host `int()` conversion drops the fraction
    pub fn truncated(&self) -> Option<i64> {
        match *self {
            Value::Int(n) => Some(n),
            Value::Float(n) => Value::Float(n.trunc()).integral(),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Int(b as i64)
    }
}

/// Decimal text that parses back to the same value.
/// Floats always keep a fractional marker (`2.0`, not `2`). Very large or
/// small floats use the shortest exponent form (`1e16`, `1e-5`).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_whole_floats() {
        assert_eq!(Value::normalized(3.0), Value::Int(3));
        assert_eq!(Value::normalized(3.5), Value::Float(3.5));
        assert_eq!(Value::normalized(-0.0), Value::Int(0));
        assert!(Value::normalized(f64::INFINITY).is_float());
        assert!(Value::normalized(1e300).is_float());
    }

    #[test]
    fn display_keeps_float_marker() {
        assert_eq!(Value::Int(27).to_string(), "27");
        assert_eq!(Value::Float(27.0).to_string(), "27.0");
        assert_eq!(Value::Float(0.5).to_string(), "0.5");
    }

    #[test]
    fn exponent_forms_parse_back() {
        for (v, text) in [(1e16, "1e16"), (1e-5, "1e-5"), (f64::INFINITY, "inf"), (-2.5e-7, "-2.5e-7")] {
            assert_eq!(Value::Float(v).to_string(), text);
            assert_eq!(text.parse::<f64>(), Ok(v));
        }
        assert_eq!(Value::Float(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn mixed_comparison() {
        assert!(Value::Int(2) < Value::Float(2.5));
        assert_eq!(Value::Int(2).partial_cmp(&Value::Float(2.0)), Some(Ordering::Equal));
    }

    #[test]
    fn coercions() {
        assert_eq!(Value::Float(4.0).integral(), Some(4));
        assert_eq!(Value::Float(4.5).integral(), None);
        assert_eq!(Value::Float(4.9).truncated(), Some(4));
        assert_eq!(Value::Float(-4.9).truncated(), Some(-4));
        assert_eq!(Value::Float(f64::NAN).truncated(), None);
    }
}
