//! Style definitions: conditional style rules and their sources

use crate::tokens::TokenView;
use indexmap::IndexMap;
use makestyles_css::StyleTree;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Value a matcher condition requires, or a selector currently holds
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatcherValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl fmt::Display for MatcherValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatcherValue::Bool(b) => write!(f, "{}", b),
            MatcherValue::Int(i) => write!(f, "{}", i),
            MatcherValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for MatcherValue {
    fn from(value: bool) -> Self {
        MatcherValue::Bool(value)
    }
}

impl From<i64> for MatcherValue {
    fn from(value: i64) -> Self {
        MatcherValue::Int(value)
    }
}

impl From<i32> for MatcherValue {
    fn from(value: i32) -> Self {
        MatcherValue::Int(value as i64)
    }
}

impl From<&str> for MatcherValue {
    fn from(value: &str) -> Self {
        MatcherValue::Text(value.to_string())
    }
}

impl From<String> for MatcherValue {
    fn from(value: String) -> Self {
        MatcherValue::Text(value)
    }
}

/// Ordered condition-name → value mapping.
///
/// Used both as the matcher set gating a definition and as the active
/// selectors of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions(IndexMap<String, MatcherValue>);

pub type Matchers = Conditions;
pub type Selectors = Conditions;

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<MatcherValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<MatcherValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&MatcherValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MatcherValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<MatcherValue>> FromIterator<(K, V)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut conditions = Conditions::new();
        for (name, value) in iter {
            conditions.insert(name, value);
        }
        conditions
    }
}

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a token-dependent style source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

pub type StyleFn = dyn Fn(&TokenView<'_>) -> StyleTree;

/// Where a definition's styles come from
#[derive(Clone)]
pub enum StyleSource {
    Static(StyleTree),
    /// A function of the token object. Clones share identity.
    Dynamic { id: SourceId, function: Rc<StyleFn> },
}

impl StyleSource {
    pub fn dynamic(function: impl Fn(&TokenView<'_>) -> StyleTree + 'static) -> Self {
        StyleSource::Dynamic {
            id: SourceId(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed)),
            function: Rc::new(function),
        }
    }

    pub fn is_token_dependent(&self) -> bool {
        matches!(self, StyleSource::Dynamic { .. })
    }

    pub fn id(&self) -> Option<SourceId> {
        match self {
            StyleSource::Static(_) => None,
            StyleSource::Dynamic { id, .. } => Some(*id),
        }
    }

    pub fn evaluate(&self, tokens: &TokenView<'_>) -> Cow<'_, StyleTree> {
        match self {
            StyleSource::Static(tree) => Cow::Borrowed(tree),
            StyleSource::Dynamic { function, .. } => Cow::Owned(function(tokens)),
        }
    }
}

impl fmt::Debug for StyleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleSource::Static(tree) => f.debug_tuple("Static").field(tree).finish(),
            StyleSource::Dynamic { id, .. } => f.debug_struct("Dynamic").field("id", id).finish(),
        }
    }
}

impl From<StyleTree> for StyleSource {
    fn from(tree: StyleTree) -> Self {
        StyleSource::Static(tree)
    }
}

/// One conditional style rule
#[derive(Debug, Clone)]
pub struct StyleDefinition {
    /// `None` means always active
    pub matchers: Option<Matchers>,
    pub source: StyleSource,
}

impl StyleDefinition {
    pub fn new(matchers: Option<Matchers>, source: impl Into<StyleSource>) -> Self {
        Self {
            matchers,
            source: source.into(),
        }
    }

    /// Unconditional definition
    pub fn always(source: impl Into<StyleSource>) -> Self {
        Self::new(None, source)
    }

    /// Definition gated by `matchers`
    pub fn when(matchers: Matchers, source: impl Into<StyleSource>) -> Self {
        Self::new(Some(matchers), source)
    }
}

/// Ordered list of definitions compiled together.
///
/// Bit assignment for matchers depends on the order of the whole list.
#[derive(Debug, Clone, Default)]
pub struct StyleDefinitionList {
    definitions: Vec<StyleDefinition>,
}

impl StyleDefinitionList {
    pub fn new(definitions: Vec<StyleDefinition>) -> Self {
        Self { definitions }
    }

    pub fn push(&mut self, definition: StyleDefinition) {
        self.definitions.push(definition);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.definitions.iter()
    }

    pub fn get(&self, index: usize) -> Option<&StyleDefinition> {
        self.definitions.get(index)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Matcher sets in list order, skipping unconditional definitions
    pub fn matchers(&self) -> impl Iterator<Item = &Matchers> {
        self.definitions.iter().filter_map(|d| d.matchers.as_ref())
    }
}

impl FromIterator<StyleDefinition> for StyleDefinitionList {
    fn from_iter<I: IntoIterator<Item = StyleDefinition>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
