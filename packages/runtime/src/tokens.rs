//! Design tokens and the views style functions read them through
//!
//! Style functions receive a [`TokenView`]. Under [`TokenView::Variables`] every
//! token path reads as a `var(--theme-...)` reference, so the compiled CSS does
//! not depend on concrete token values and can be cached forever. Under
//! [`TokenView::Values`] paths read the real values.

use crate::error::{StyleError, StyleResult};
use indexmap::IndexMap;
use makestyles_css::StyleValue;
use serde::{Deserialize, Serialize};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix of generated custom-property names
pub const VARIABLE_PREFIX: &str = "--theme";

static NEXT_TOKENS_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a token object. Deeply equal token objects still differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokensId(u64);

impl TokensId {
    fn next() -> Self {
        TokensId(NEXT_TOKENS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenNode {
    Text(String),
    Number(f64),
    Group(IndexMap<String, TokenNode>),
}

impl From<&str> for TokenNode {
    fn from(value: &str) -> Self {
        TokenNode::Text(value.to_string())
    }
}

impl From<String> for TokenNode {
    fn from(value: String) -> Self {
        TokenNode::Text(value)
    }
}

impl From<f64> for TokenNode {
    fn from(value: f64) -> Self {
        TokenNode::Number(value)
    }
}

impl From<i32> for TokenNode {
    fn from(value: i32) -> Self {
        TokenNode::Number(value as f64)
    }
}

/// Observes whether a token object still exists
#[derive(Debug, Clone)]
pub struct TokensLiveness(Weak<()>);

impl TokensLiveness {
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

/// A token tree with identity
#[derive(Debug)]
pub struct Tokens {
    id: TokensId,
    root: IndexMap<String, TokenNode>,
    alive: Rc<()>,
}

impl Tokens {
    pub fn new() -> Self {
        Self::from_root(IndexMap::new())
    }

    pub fn from_root(root: IndexMap<String, TokenNode>) -> Self {
        Self {
            id: TokensId::next(),
            root,
            alive: Rc::new(()),
        }
    }

    pub fn from_json(value: &serde_json::Value) -> StyleResult<Self> {
        let root = IndexMap::<String, TokenNode>::deserialize(value)
            .map_err(|e| StyleError::invalid_tokens(e.to_string()))?;
        Ok(Self::from_root(root))
    }

    pub fn id(&self) -> TokensId {
        self.id
    }

    /// Handle that reports whether this token object has been dropped
    pub fn liveness(&self) -> TokensLiveness {
        TokensLiveness(Rc::downgrade(&self.alive))
    }

    /// Builder-style insert at `path`, creating intermediate groups
    pub fn set(mut self, path: &[&str], value: impl Into<TokenNode>) -> Self {
        insert_path(&mut self.root, path, value.into());
        self
    }

    pub fn lookup(&self, path: &[&str]) -> Option<&TokenNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.root.get(*first)?;
        for name in rest {
            node = match node {
                TokenNode::Group(children) => children.get(*name)?,
                _ => return None,
            };
        }
        Some(node)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl Default for Tokens {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning produces a new token object with its own identity
impl Clone for Tokens {
    fn clone(&self) -> Self {
        Self::from_root(self.root.clone())
    }
}

fn insert_path(group: &mut IndexMap<String, TokenNode>, path: &[&str], value: TokenNode) {
    match path {
        [] => {}
        [last] => {
            group.insert(last.to_string(), value);
        }
        [first, rest @ ..] => {
            let node = group
                .entry(first.to_string())
                .or_insert_with(|| TokenNode::Group(IndexMap::new()));
            if let TokenNode::Group(children) = node {
                insert_path(children, rest, value);
            } else {
                // a leaf on the way down becomes a group
                let mut children = IndexMap::new();
                insert_path(&mut children, rest, value);
                *node = TokenNode::Group(children);
            }
        }
    }
}

/// Custom-property reference for a token path: `["color", "brand"]` → `var(--theme-color-brand)`
pub fn variable_reference(path: &[&str]) -> String {
    let mut name = String::from(VARIABLE_PREFIX);
    for segment in path {
        name.push('-');
        name.push_str(segment);
    }
    format!("var({})", name)
}

/// How a style function sees the token object
#[derive(Debug, Clone, Copy)]
pub enum TokenView<'a> {
    /// Real token values
    Values(&'a Tokens),
    /// Token paths read as `var(--theme-...)` references
    Variables(&'a Tokens),
}

impl<'a> TokenView<'a> {
    pub fn tokens(&self) -> &'a Tokens {
        match self {
            TokenView::Values(tokens) | TokenView::Variables(tokens) => tokens,
        }
    }

    pub fn is_variables(&self) -> bool {
        matches!(self, TokenView::Variables(_))
    }

    /// Read a token as a style value.
    ///
    /// Groups are not values and read as [`StyleValue::Null`], as do missing
    /// tokens under [`TokenView::Values`]. Under [`TokenView::Variables`] a
    /// missing token still yields its reference.
    pub fn token(&self, path: &[&str]) -> StyleValue {
        if path.is_empty() {
            return StyleValue::Null;
        }

        match (self, self.tokens().lookup(path)) {
            (_, Some(TokenNode::Group(_))) => StyleValue::Null,
            (TokenView::Variables(_), _) => StyleValue::Str(variable_reference(path)),
            (TokenView::Values(_), Some(TokenNode::Text(text))) => StyleValue::Str(text.clone()),
            (TokenView::Values(_), Some(TokenNode::Number(n))) => StyleValue::Number(*n),
            (TokenView::Values(_), None) => StyleValue::Null,
        }
    }

    /// Token as text, empty when it has no value
    pub fn text(&self, path: &[&str]) -> String {
        self.token(path).to_text().unwrap_or_default()
    }
}
