//! # makestyles runtime
//!
//! Resolves style definitions into atomic, content-addressed CSS rules,
//! injects them once per output document and hands back class names.
//!
//! ```text
//! StyleDefinitionList ─┬─ matcher: (condition, value) pairs → bits
//!                      └─ variants: sources → DeclarationMap (cached)
//!                                      ↓
//! MakeStyles::query ── selectors → mask → merged declarations
//!                                      ↓
//! insert: Renderer (one per Document) → <style data-makestyles="rule">
//! ```
//!
//! Everything here is single-threaded: handles are `Rc`-based and the
//! renderer registry and token cache are per thread.

pub mod definition;
pub mod document;
pub mod environment;
pub mod error;
pub mod insert;
pub mod matcher;
pub mod query;
pub mod renderer;
pub mod resolver;
pub mod snapshot;
pub mod tokens;
pub mod variants;

pub use definition::{
    Conditions, MatcherValue, Matchers, Selectors, SourceId, StyleDefinition,
    StyleDefinitionList, StyleSource,
};
pub use document::{Document, DocumentId, StyleElement};
pub use environment::Environment;
pub use error::{StyleError, StyleResult};
pub use insert::insert_styles;
pub use matcher::{mask_matches, BitTable, Mask, MAX_MATCHER_BITS};
pub use query::{make_non_ui_styles, make_styles, BoundStyles, MakeStyles, StyleOptions};
pub use renderer::{
    create_target, default_document, default_target, Renderer, RendererId, RendererRegistry,
};
pub use resolver::{resolve_styles, CompiledDeclaration, DeclarationMap};
pub use snapshot::StylesSnapshot;
pub use tokens::{TokenNode, TokenView, Tokens, TokensLiveness};
pub use variants::{ResolvedDefinition, TokenCache, VariantCache};

pub use makestyles_css::{StyleTree, StyleValue};
