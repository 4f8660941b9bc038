//! Path lookups over a JSON response body.
//!
//! A path is a dot-separated list of object keys and array indexes, e.g.
//! `data.items.0.name`. `\.` is a literal dot inside a key and `#` on an
//! array gives its length. A lookup never fails; anything that does not
//! resolve reads as the zero value of the requested type.

use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accessor {
    value: Option<Value>,
}

impl Accessor {
    pub fn new(value: Option<Value>) -> Self {
        Accessor { value }
    }

    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    pub fn get(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Strings as-is, other values as their JSON text, missing and `null` as `""`.
    pub fn as_str(&self) -> String {
        match &self.value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn as_i64(&self) -> i64 {
        match &self.value {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                    .unwrap_or(0)
            }
            Some(Value::Bool(true)) => 1,
            _ => 0,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match &self.value {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            Some(Value::Bool(true)) => 1.0,
            _ => 0.0,
        }
    }

    pub fn as_bool(&self) -> bool {
        match &self.value {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => matches!(s.as_str(), "1" | "t" | "T" | "true" | "TRUE" | "True"),
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            _ => false,
        }
    }

    /// Compact JSON text of the located value, `""` when missing.
    pub fn raw(&self) -> String {
        self.value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}

/// Looks `path` up in the JSON text `body`.
pub fn lookup(body: &str, path: &str) -> Accessor {
    let root: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("body is not JSON, '{path}' does not resolve: {e}");
            return Accessor::default();
        }
    };
    Accessor::new(resolve(&root, path))
}

fn resolve(root: &Value, path: &str) -> Option<Value> {
    if path.is_empty() {
        return None;
    }

    let mut current = root;
    let components = split_path(path);
    let last = components.len() - 1;

    for (i, component) in components.iter().enumerate() {
        match current {
            Value::Object(map) => current = map.get(component.as_str())?,
            Value::Array(items) if component == "#" && i == last => {
                return Some(Value::from(items.len()));
            }
            Value::Array(items) => {
                let index = component.parse::<usize>().ok()?;
                current = items.get(index)?;
            }
            _ => return None,
        }
    }

    Some(current.clone())
}

fn split_path(path: &str) -> Vec<String> {
    let mut components = Vec::new();
    let mut component = String::new();
    let mut chars = path.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(next) = chars.next() {
                    component.push(next);
                }
            }
            '.' => components.push(std::mem::take(&mut component)),
            _ => component.push(ch),
        }
    }
    components.push(component);
    components
}

#[cfg(test)]
mod test {
    use super::*;

    const BODY: &str = r#"{
        "id": 3,
        "status": "complete",
        "ratio": 2.75,
        "count": "42",
        "flag": "t",
        "data": {"valid": true, "items": [{"name": "a"}, {"name": "b"}]},
        "dotted.key": "yes",
        "nothing": null
    }"#;

    #[test]
    fn lookup_should_read_top_level_scalars() {
        assert_eq!(lookup(BODY, "status").as_str(), "complete");
        assert_eq!(lookup(BODY, "id").as_i64(), 3);
        assert!(lookup(BODY, "data.valid").as_bool());
    }

    #[test]
    fn lookup_should_walk_arrays_by_index() {
        assert_eq!(lookup(BODY, "data.items.1.name").as_str(), "b");
        assert_eq!(lookup(BODY, "data.items.#").as_i64(), 2);
        assert!(!lookup(BODY, "data.items.5").exists());
        assert!(!lookup(BODY, "data.items.x").exists());
    }

    #[test]
    fn lookup_should_support_escaped_dots() {
        assert_eq!(lookup(BODY, r"dotted\.key").as_str(), "yes");
        assert!(!lookup(BODY, "dotted.key").exists());
    }

    #[test]
    fn missing_paths_read_as_zero_values() {
        let missing = lookup(BODY, "data.nope.deeper");
        assert!(!missing.exists());
        assert_eq!(missing.as_str(), "");
        assert_eq!(missing.as_i64(), 0);
        assert!(!missing.as_bool());
        assert_eq!(missing.raw(), "");
    }

    #[test]
    fn malformed_body_reads_as_zero_values() {
        let accessor = lookup("{not json", "id");
        assert_eq!(accessor.as_i64(), 0);
        assert_eq!(accessor.as_str(), "");
        assert!(!accessor.as_bool());
    }

    #[test]
    fn empty_path_does_not_resolve() {
        assert!(!lookup(BODY, "").exists());
    }

    #[test]
    fn type_mismatches_are_coerced_or_zeroed() {
        assert_eq!(lookup(BODY, "count").as_i64(), 42);
        assert_eq!(lookup(BODY, "ratio").as_i64(), 2);
        assert_eq!(lookup(BODY, "status").as_i64(), 0);
        assert_eq!(lookup(BODY, "id").as_str(), "3");
        assert!(lookup(BODY, "flag").as_bool());
        assert!(lookup(BODY, "id").as_bool());
        assert!(!lookup(BODY, "status").as_bool());
        assert_eq!(lookup(BODY, "data.valid").as_i64(), 1);
        assert_eq!(lookup(BODY, "nothing").as_str(), "");
        assert!(lookup(BODY, "nothing").exists());
    }

    #[test]
    fn non_scalars_read_as_json_text() {
        assert_eq!(lookup(BODY, "data.items.0").as_str(), r#"{"name":"a"}"#);
        assert_eq!(lookup(BODY, "data.items.0").raw(), r#"{"name":"a"}"#);
    }

    #[test]
    fn as_i64_should_saturate_large_unsigned_numbers() {
        assert_eq!(lookup(r#"{"n":18446744073709551615}"#, "n").as_i64(), i64::MAX);
        assert_eq!(lookup(r#"{"n":9223372036854775807}"#, "n").as_i64(), i64::MAX);
    }

    #[test]
    fn as_f64_should_read_numbers_and_numeric_strings() {
        assert_eq!(lookup(BODY, "ratio").as_f64(), 2.75);
        assert_eq!(lookup(BODY, "count").as_f64(), 42.0);
    }

    #[test]
    fn lookup_on_top_level_array() {
        assert_eq!(lookup("[10, 20]", "1").as_i64(), 20);
        assert_eq!(lookup("[10, 20]", "#").as_i64(), 2);
    }
}
