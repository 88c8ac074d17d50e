//! Lenient conversion of untrusted JSON values into typed appliance fields.

use serde_json::Value;

/// Reads a finite real number from a JSON number or a numeric string.
pub fn real(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    parsed.is_finite().then_some(parsed)
}

/// Reads an integer count. Reals truncate toward zero, strings must hold an integer.
pub fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            let f = n.as_f64()?;
            if !f.is_finite() || f < i64::MIN as f64 || f > i64::MAX as f64 {
                return None;
            }
            Some(f.trunc() as i64)
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
