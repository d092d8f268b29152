use serde_json::{Number, Value};

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    /// The context text is not parseable structured data.
    #[error("malformed context: {0}")]
    MalformedContext(String),
    /// The canonical serializer rejected the value.
    #[error("canonical serialization failed: {0}")]
    Serialization(String),
}

/// Largest integer a producer's IEEE-754 double represents exactly.
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Re-serializes a JSON value with sorted object keys and no insignificant
/// whitespace.
///
/// Proof producers hash the same form, so the output must stay byte-for-byte
/// stable across releases:
///
/// - object keys are ordered by their UTF-16 code units;
/// - strings are emitted as raw UTF-8, escaping only quotes, backslashes and
///   control characters;
/// - numbers use the shortest round-trip decimal, with integral values
///   printed without a fraction (`1.0` becomes `1`) and exponents signed
///   (`1e+22`).
///
/// Golden vectors in `tests/golden.rs` pin it.
pub fn canonicalize(value: &Value) -> Result<String, CanonicalizationError> {
    let mut out = String::new();
    write_value(&mut out, value)?;
    Ok(out)
}

/// Parses `text` as JSON and returns its canonical form.
///
/// # Errors
///
/// Returns [`CanonicalizationError::MalformedContext`] if `text` is not valid JSON.
pub fn canonicalize_str(text: &str) -> Result<String, CanonicalizationError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| CanonicalizationError::MalformedContext(err.to_string()))?;
    canonicalize(&value)
}

fn write_value(out: &mut String, value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        Value::Number(number) => write_number(out, number)?,
        Value::String(text) => write_string(out, text)?,
        Value::Array(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                write_value(out, item)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.encode_utf16().cmp(b.encode_utf16()));
            out.push('{');
            for (idx, (key, child)) in entries.into_iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                write_string(out, key)?;
                out.push(':');
                write_value(out, child)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn write_string(out: &mut String, text: &str) -> Result<(), CanonicalizationError> {
    let quoted = serde_json::to_string(text)
        .map_err(|err| CanonicalizationError::Serialization(err.to_string()))?;
    out.push_str(&quoted);
    Ok(())
}

fn write_number(out: &mut String, number: &Number) -> Result<(), CanonicalizationError> {
    if let Some(n) = number.as_u64().filter(|n| *n <= MAX_SAFE_INTEGER) {
        out.push_str(&n.to_string());
        return Ok(());
    }
    if let Some(n) = number.as_i64().filter(|n| n.unsigned_abs() <= MAX_SAFE_INTEGER) {
        out.push_str(&n.to_string());
        return Ok(());
    }
    let float = number
        .as_f64()
        .filter(|f| f.is_finite())
        .ok_or_else(|| CanonicalizationError::Serialization(format!("non-finite number {number}")))?;
    out.push_str(&format_double(float)?);
    Ok(())
}

/// Formats a finite double the way producers' runtimes print numbers.
fn format_double(value: f64) -> Result<String, CanonicalizationError> {
    if value == 0.0 {
        return Ok("0".to_string());
    }

    // `{:e}` yields the shortest round-trip digits, e.g. `1.2345e22`.
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .ok_or_else(|| CanonicalizationError::Serialization(scientific.clone()))?;
    let exponent: i32 = exponent
        .parse()
        .map_err(|_| CanonicalizationError::Serialization(scientific.clone()))?;
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let k = digits.len() as i32;
    let n = exponent + 1;
    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{lead}e{sign}{}", (n - 1).abs())
        } else {
            format!("{lead}.{rest}e{sign}{}", (n - 1).abs())
        }
    };

    Ok(if value < 0.0 { format!("-{body}") } else { body })
}
