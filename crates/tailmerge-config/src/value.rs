//! Structural model of a config object literal.
//!
//! Literal values (strings, numbers, booleans, null, arrays, objects) are
//! modelled as data so they can be merged. Anything else the config author
//! wrote, such as `require('plugin')`, identifiers, template literals or
//! spreads, is carried as verbatim source text and written back unchanged.

/// A value inside a config object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Numeric literal, kept as written (`0.5`, `1e3`, `0x10`)
    Number(String),
    /// String literal, unescaped
    String(String),
    /// Array literal
    Array(Vec<ConfigValue>),
    /// Object literal
    Object(Object),
    /// Any other expression, as source text
    Verbatim(String),
}

impl ConfigValue {
    /// Get as string if it's a string literal.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as object if it's an object literal.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            ConfigValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Short description of the value kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Number(_) => "number",
            ConfigValue::String(_) => "string",
            ConfigValue::Array(_) => "array",
            ConfigValue::Object(_) => "object",
            ConfigValue::Verbatim(_) => "expression",
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<Object> for ConfigValue {
    fn from(o: Object) -> Self {
        ConfigValue::Object(o)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => ConfigValue::Null,
            Value::Bool(b) => ConfigValue::Bool(b),
            Value::Number(n) => ConfigValue::Number(n.to_string()),
            Value::String(s) => ConfigValue::String(s),
            Value::Array(items) => {
                ConfigValue::Array(items.into_iter().map(ConfigValue::from).collect())
            }
            Value::Object(map) => {
                let mut object = Object::new();
                for (key, value) in map {
                    object.insert(key, ConfigValue::from(value));
                }
                ConfigValue::Object(object)
            }
        }
    }
}

/// One member of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// `key: value` with a static key
    Property { key: String, value: ConfigValue },
    /// Spread, method, accessor, shorthand or computed-key member, as source text
    Verbatim(String),
}

/// An object literal: an ordered list of members.
///
/// Insertion order is kept so the rendered config reads like the original.
/// When a key appears twice the last occurrence wins, matching JavaScript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    entries: Vec<Entry>,
}

impl Object {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members, verbatim ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All members in source order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Static keys in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Property { key, .. } => Some(key.as_str()),
            Entry::Verbatim(_) => None,
        })
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|e| matches!(e, Entry::Property { key: k, .. } if k == key))
    }

    /// Look up a property by key.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.iter().rev().find_map(|e| match e {
            Entry::Property { key: k, value } if k == key => Some(value),
            _ => None,
        })
    }

    /// Look up a property by key, mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        let index = self.position(key)?;
        match &mut self.entries[index] {
            Entry::Property { value, .. } => Some(value),
            Entry::Verbatim(_) => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Insert or replace a property.
    ///
    /// A replaced property keeps its position; a new one is appended.
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) -> Option<ConfigValue> {
        let key = key.into();
        match self.position(&key) {
            Some(index) => match &mut self.entries[index] {
                Entry::Property { value: slot, .. } => Some(std::mem::replace(slot, value)),
                Entry::Verbatim(_) => None,
            },
            None => {
                self.entries.push(Entry::Property { key, value });
                None
            }
        }
    }

    /// Move a property after any spread that follows it.
    ///
    /// A spread placed after a key overrides that key at runtime, so a
    /// value that must win has to come last. Returns whether it moved.
    pub fn move_after_spreads(&mut self, key: &str) -> bool {
        let Some(index) = self.position(key) else {
            return false;
        };

        let shadowed = self.entries[index + 1..]
            .iter()
            .any(|e| matches!(e, Entry::Verbatim(src) if src.trim_start().starts_with("...")));
        if !shadowed {
            return false;
        }

        let entry = self.entries.remove(index);
        self.entries.push(entry);
        true
    }

    /// Append a verbatim member.
    pub fn push_verbatim(&mut self, source: impl Into<String>) {
        self.entries.push(Entry::Verbatim(source.into()));
    }

    /// Append a property without checking for an existing key.
    pub(crate) fn push_property(&mut self, key: String, value: ConfigValue) {
        self.entries.push(Entry::Property { key, value });
    }
}
