//! Field resolution over a loosely-structured parameter document.
//!
//! Every logical field is looked up through an ordered list of candidate keys.
//! A key may be a dotted path (`target.X`) into nested objects. Candidates that
//! hold a `{value, unit}` wrapper resolve to their `value`.

use serde_json::{Map, Value};

use super::ExtractionIssue;

pub struct FieldReader<'a> {
    root: Option<&'a Map<String, Value>>,
    issues: Vec<ExtractionIssue>,
}

impl<'a> FieldReader<'a> {
    /// A reader over `root`; `None` makes every field resolve to its default.
    pub fn new(root: Option<&'a Map<String, Value>>) -> Self {
        Self {
            root,
            issues: Vec::new(),
        }
    }

    pub fn number(&mut self, field: &str, keys: &[&str], default: f64) -> f64 {
        self.resolve(field, keys, as_number).unwrap_or(default)
    }

    /// Integral field; fractional input truncates toward zero.
    pub fn integer(&mut self, field: &str, keys: &[&str], default: i64) -> i64 {
        self.resolve(field, keys, as_number)
            .map(|n| n.trunc() as i64)
            .unwrap_or(default)
    }

    pub fn text(&mut self, field: &str, keys: &[&str], default: &str) -> String {
        self.resolve(field, keys, as_text)
            .unwrap_or_else(|| default.to_string())
    }

    /// The raw object stored under `key`, if it is one.
    pub fn object(&self, key: &str) -> Option<&'a Map<String, Value>> {
        self.lookup(key).and_then(Value::as_object)
    }

    pub fn invalid(&mut self, field: &str, found: &Value) {
        self.issues.push(ExtractionIssue::InvalidField {
            field: field.to_string(),
            found: found.to_string(),
        });
    }

    pub fn finish(self) -> Vec<ExtractionIssue> {
        self.issues
    }

    /// First candidate that converts wins. If candidates exist but none
    /// converts, the first one is recorded as invalid.
    fn resolve<T>(
        &mut self,
        field: &str,
        keys: &[&str],
        convert: impl Fn(&Value) -> Option<T>,
    ) -> Option<T> {
        let mut first_rejected: Option<&'a Value> = None;
        for key in keys {
            let Some(raw) = self.lookup(key) else {
                continue;
            };
            if let Some(converted) = convert(unwrap_value(raw)) {
                return Some(converted);
            }
            first_rejected.get_or_insert(raw);
        }
        if let Some(raw) = first_rejected {
            self.invalid(field, raw);
        }
        None
    }

    fn lookup(&self, key: &str) -> Option<&'a Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.root?.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        (!current.is_null()).then_some(current)
    }
}

/// `{value, unit}` wrappers resolve to their `value`.
pub fn unwrap_value(raw: &Value) -> &Value {
    match raw {
        Value::Object(map) => map.get("value").unwrap_or(raw),
        other => other,
    }
}

pub fn as_number(raw: &Value) -> Option<f64> {
    let n = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

pub fn as_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
