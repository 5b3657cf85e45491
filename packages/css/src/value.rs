//! Style tree model
//!
//! A [`StyleTree`] is an insertion-ordered map from property names (or nested
//! selector tokens such as `&:hover`) to [`StyleValue`]s. Order matters: when two
//! entries resolve to the same declaration, the later one wins.

use crate::error::{CssError, CssResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A value held by a style tree entry
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Str(String),
    Number(f64),
    Nested(StyleTree),
    /// Absent value; skipped during resolution
    Null,
    /// Neither a primitive nor a tree (e.g. a JSON boolean or array)
    Unsupported,
}

impl StyleValue {
    pub fn is_primitive(&self) -> bool {
        matches!(self, StyleValue::Str(_) | StyleValue::Number(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&StyleTree> {
        match self {
            StyleValue::Nested(tree) => Some(tree),
            _ => None,
        }
    }

    /// Raw text of a primitive value, as it takes part in hashing.
    ///
    /// Numbers print without a trailing `.0` (`4.0` → `"4"`).
    pub fn to_text(&self) -> Option<String> {
        match self {
            StyleValue::Str(s) => Some(s.clone()),
            StyleValue::Number(n) => Some(format_number(*n)),
            _ => None,
        }
    }
}

pub(crate) fn format_number(n: f64) -> String {
    format!("{}", n)
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Str(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Str(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        StyleValue::Number(value as f64)
    }
}

impl From<u32> for StyleValue {
    fn from(value: u32) -> Self {
        StyleValue::Number(value as f64)
    }
}

impl From<StyleTree> for StyleValue {
    fn from(value: StyleTree) -> Self {
        StyleValue::Nested(value)
    }
}

impl<T: Into<StyleValue>> From<Option<T>> for StyleValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(StyleValue::Null)
    }
}

impl From<&Value> for StyleValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => StyleValue::Null,
            Value::String(s) => StyleValue::Str(s.clone()),
            Value::Number(n) => n.as_f64().map(StyleValue::Number).unwrap_or(StyleValue::Unsupported),
            Value::Object(map) => StyleValue::Nested(StyleTree::from_map(map)),
            Value::Bool(_) | Value::Array(_) => StyleValue::Unsupported,
        }
    }
}

impl From<&StyleValue> for Value {
    fn from(value: &StyleValue) -> Self {
        match value {
            StyleValue::Str(s) => Value::String(s.clone()),
            StyleValue::Number(n) => number_to_json(*n),
            StyleValue::Nested(tree) => tree.to_json(),
            StyleValue::Null | StyleValue::Unsupported => Value::Null,
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// Nested, ordered style object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct StyleTree {
    entries: IndexMap<String, StyleValue>,
}

impl StyleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn set(mut self, property: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(property, value);
        self
    }

    /// Builder-style insert of a nested selector block, e.g. `"&:hover"`
    pub fn nested(self, selector: impl Into<String>, tree: StyleTree) -> Self {
        self.set(selector, StyleValue::Nested(tree))
    }

    /// Insert or replace an entry. A replaced entry keeps its original position.
    pub fn insert(
        &mut self,
        property: impl Into<String>,
        value: impl Into<StyleValue>,
    ) -> Option<StyleValue> {
        self.entries.insert(property.into(), value.into())
    }

    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.entries.get(property)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a tree from a JSON object, keeping key order
    pub fn from_json(value: &Value) -> CssResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(CssError::not_an_object(other)),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let entries = map
            .iter()
            .map(|(key, value)| (key.clone(), StyleValue::from(value)))
            .collect();
        Self { entries }
    }

    pub fn to_json(&self) -> Value {
        let map = self
            .entries
            .iter()
            .map(|(key, value)| (key.clone(), Value::from(value)))
            .collect();
        Value::Object(map)
    }
}

impl TryFrom<Value> for StyleTree {
    type Error = CssError;

    fn try_from(value: Value) -> CssResult<Self> {
        StyleTree::from_json(&value)
    }
}

impl From<StyleTree> for Value {
    fn from(tree: StyleTree) -> Self {
        tree.to_json()
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleTree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = StyleTree::new();
        for (key, value) in iter {
            tree.insert(key, value);
        }
        tree
    }
}
