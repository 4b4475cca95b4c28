//! Restricted YAML frontmatter codec for AGD records.
//!
//! Handles markdown files that open with a `---`-delimited key/value
//! block. Only flat single-line scalars are supported: null, booleans,
//! integers, floats, and strings. Quoted values always parse as
//! strings. Malformed or absent frontmatter degrades to "no
//! frontmatter" — parsing never fails.

use crate::core::error::AgdexError;

const DELIMITER: &str = "---";

/// Characters that force a string value into quotes.
const QUOTE_TRIGGERS: [char; 16] = [
    ':', '#', '[', ']', '{', '}', '|', '>', '*', '&', '!', '%', '@', '`', '"', '\'',
];

/// Scalar value of one frontmatter field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// String payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// Insertion-ordered frontmatter mapping.
///
/// Key order is preserved so a rewritten record keeps its fields where
/// the author put them; new fields append at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    entries: Vec<(String, Value)>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Replace the value of an existing key in place, or append a new
    /// entry at the end.
    pub fn set(&mut self, key: &str, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Parse frontmatter from record content.
///
/// Returns the mapping and the body (everything after the closing
/// delimiter, verbatim). Content without a well-formed frontmatter
/// block yields an empty mapping and the full content as body.
pub fn parse(content: &str) -> (Frontmatter, String) {
    if !content.starts_with(DELIMITER) {
        return (Frontmatter::new(), content.to_string());
    }

    let parts: Vec<&str> = content.splitn(3, DELIMITER).collect();
    if parts.len() < 3 {
        return (Frontmatter::new(), content.to_string());
    }

    let mut frontmatter = Frontmatter::new();
    for line in parts[1].trim().lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        frontmatter.set(key.trim(), parse_value(value.trim()));
    }

    (frontmatter, parts[2].to_string())
}

fn parse_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Str(String::new());
    }

    if raw.len() >= 2 {
        let first = raw.as_bytes()[0];
        let last = raw.as_bytes()[raw.len() - 1];
        if first == last && (first == b'"' || first == b'\'') {
            let inner = &raw[1..raw.len() - 1];
            let unescaped = if first == b'"' {
                inner.replace("\\\"", "\"").replace("\\\\", "\\")
            } else {
                inner.replace("''", "'")
            };
            return Value::Str(unescaped);
        }
    }

    detect_scalar(raw)
}

/// Type an unquoted value. Detection order: null, bool, int, float,
/// string fallback.
fn detect_scalar(raw: &str) -> Value {
    match raw.to_ascii_lowercase().as_str() {
        "null" | "~" => return Value::Null,
        "true" | "yes" | "on" => return Value::Bool(true),
        "false" | "no" | "off" => return Value::Bool(false),
        _ => {}
    }

    // A value with no dot and no exponent marker is only ever an
    // integer; one with either may be a float.
    if !raw.contains('.') && !raw.contains('e') && !raw.contains('E') {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Int(n);
        }
    } else if let Ok(f) = raw.parse::<f64>() {
        return Value::Float(f);
    }

    Value::Str(raw.to_string())
}

/// Serialize a mapping and body back to record content.
///
/// The body is appended verbatim after the closing delimiter, so
/// `parse(serialize(m, b)?) == (m, b)` for every serializable mapping.
/// An empty mapping returns the body unchanged.
pub fn serialize(frontmatter: &Frontmatter, body: &str) -> Result<String, AgdexError> {
    if frontmatter.is_empty() {
        return Ok(body.to_string());
    }

    let mut lines = Vec::with_capacity(frontmatter.len());
    for (key, value) in frontmatter.iter() {
        if key.is_empty() {
            return Err(AgdexError::SerializeError(
                "empty frontmatter key".to_string(),
            ));
        }
        let line = match value {
            Value::Null => format!("{}: null", key),
            Value::Bool(b) => format!("{}: {}", key, b),
            Value::Int(n) => format!("{}: {}", key, n),
            Value::Float(f) => format!("{}: {}", key, render_float(*f)),
            Value::Str(s) => render_string(key, s)?,
        };
        lines.push(line);
    }

    Ok(format!(
        "{}\n{}\n{}{}",
        DELIMITER,
        lines.join("\n"),
        DELIMITER,
        body
    ))
}

/// Render a float so it re-parses as a float: an integral finite value
/// keeps a trailing `.0`.
fn render_float(f: f64) -> String {
    let text = f.to_string();
    if f.is_finite() && !text.contains('.') && !text.contains('e') && !text.contains('E') {
        format!("{}.0", text)
    } else {
        text
    }
}

fn render_string(key: &str, value: &str) -> Result<String, AgdexError> {
    if value.is_empty() {
        return Ok(format!("{}:", key));
    }

    if value.contains('\n') || value.contains('\r') {
        return Err(AgdexError::SerializeError(format!(
            "field '{}' contains a multiline value; use single-line values only",
            key
        )));
    }

    if !needs_quoting(value) {
        return Ok(format!("{}: {}", key, value));
    }

    let has_double = value.contains('"');
    let has_single = value.contains('\'');
    if has_double && has_single {
        return Err(AgdexError::SerializeError(format!(
            "field '{}' contains both single and double quotes and cannot be quoted safely",
            key
        )));
    }

    if !has_double {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        Ok(format!("{}: \"{}\"", key, escaped))
    } else {
        // Single quotes: escape single quotes by doubling.
        let escaped = value.replace('\'', "''");
        Ok(format!("{}: '{}'", key, escaped))
    }
}

/// A string needs quotes when emitting it bare would change its parsed
/// type or break the line format.
fn needs_quoting(value: &str) -> bool {
    let reserved = matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "null" | "~"
    );

    reserved
        || value.parse::<i64>().is_ok()
        || value.parse::<f64>().is_ok()
        || value != value.trim()
        || value.contains(&QUOTE_TRIGGERS[..])
}
