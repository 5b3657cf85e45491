//! Variant cache layer
//!
//! Resolves every definition of a list into `(mask, declarations)`. Results are
//! memoized in a side table owned by the compiled styles, never on the caller's
//! definitions:
//!
//! - with CSS variables, each definition compiles once (token functions see a
//!   [`TokenView::Variables`] view) and is reused forever;
//! - without them, static definitions still compile once, but token functions
//!   are compiled per token object through the thread's [`TokenCache`].

use crate::definition::{SourceId, StyleDefinition, StyleDefinitionList, StyleSource};
use crate::environment::Environment;
use crate::matcher::{mask_matches, BitTable, Mask};
use crate::resolver::{resolve_styles, DeclarationMap};
use crate::tokens::{TokenView, Tokens, TokensId, TokensLiveness};
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, instrument};

/// A definition after resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDefinition {
    pub mask: Mask,
    pub declarations: Rc<DeclarationMap>,
}

impl ResolvedDefinition {
    pub fn matches(&self, selector_mask: Mask) -> bool {
        mask_matches(self.mask, selector_mask)
    }
}

/// Per-list side table: bit table plus per-definition mask and compiled slots
#[derive(Debug)]
pub struct VariantCache {
    bits: OnceCell<BitTable>,
    masks: Vec<OnceCell<Mask>>,
    compiled: Vec<OnceCell<Rc<DeclarationMap>>>,
}

impl VariantCache {
    pub fn new(len: usize) -> Self {
        Self {
            bits: OnceCell::new(),
            masks: (0..len).map(|_| OnceCell::new()).collect(),
            compiled: (0..len).map(|_| OnceCell::new()).collect(),
        }
    }

    /// The list's bit table, built on first use
    pub fn bit_table(&self, list: &StyleDefinitionList) -> &BitTable {
        self.bits.get_or_init(|| {
            let table = BitTable::build(list);
            debug!(bits = table.len(), "Built matcher bit table");
            table
        })
    }

    #[instrument(level = "debug", skip_all, fields(definitions = list.len(), css_variables = environment.css_variables))]
    pub fn resolve(
        &self,
        list: &StyleDefinitionList,
        tokens: &Tokens,
        environment: &Environment,
    ) -> Vec<ResolvedDefinition> {
        list.iter()
            .enumerate()
            .map(|(index, definition)| ResolvedDefinition {
                mask: self.mask(list, index, definition),
                declarations: self.declarations(index, definition, tokens, environment),
            })
            .collect()
    }

    fn mask(&self, list: &StyleDefinitionList, index: usize, definition: &StyleDefinition) -> Mask {
        *self.masks[index].get_or_init(|| {
            self.bit_table(list)
                .matchers_to_bits(definition.matchers.as_ref())
        })
    }

    fn declarations(
        &self,
        index: usize,
        definition: &StyleDefinition,
        tokens: &Tokens,
        environment: &Environment,
    ) -> Rc<DeclarationMap> {
        match &definition.source {
            StyleSource::Dynamic { id, .. } if !environment.css_variables => {
                TokenCache::with_current(|cache| cache.get(tokens.id(), *id)).unwrap_or_else(|| {
                    debug!(index, "Compiling token-dependent definition for token object");
                    let compiled = Rc::new(resolve_styles(
                        &definition.source.evaluate(&TokenView::Values(tokens)),
                    ));
                    TokenCache::with_current(|cache| cache.insert(tokens, *id, compiled.clone()));
                    compiled
                })
            }
            source => self.compiled[index]
                .get_or_init(|| {
                    debug!(index, "Compiling definition");
                    Rc::new(resolve_styles(
                        &source.evaluate(&TokenView::Variables(tokens)),
                    ))
                })
                .clone(),
        }
    }
}

/// Compiled declarations of token functions, keyed by token object then
/// source identity. Serves environments without CSS variables.
///
/// Entries live as long as their token object; dead entries are pruned when
/// a new token object is inserted.
#[derive(Debug, Default)]
pub struct TokenCache {
    entries: RefCell<HashMap<TokensId, TokenEntry>>,
}

#[derive(Debug)]
struct TokenEntry {
    liveness: TokensLiveness,
    declarations: HashMap<SourceId, Rc<DeclarationMap>>,
}

thread_local! {
    static TOKEN_CACHE: TokenCache = TokenCache::default();
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against this thread's cache
    pub fn with_current<R>(f: impl FnOnce(&TokenCache) -> R) -> R {
        TOKEN_CACHE.with(f)
    }

    pub fn get(&self, tokens: TokensId, source: SourceId) -> Option<Rc<DeclarationMap>> {
        self.entries
            .borrow()
            .get(&tokens)?
            .declarations
            .get(&source)
            .cloned()
    }

    pub fn insert(&self, tokens: &Tokens, source: SourceId, declarations: Rc<DeclarationMap>) {
        let mut entries = self.entries.borrow_mut();

        if !entries.contains_key(&tokens.id()) {
            let before = entries.len();
            entries.retain(|_, entry| entry.liveness.is_alive());
            if entries.len() < before {
                debug!(pruned = before - entries.len(), "Dropped entries of released token objects");
            }
        }

        entries
            .entry(tokens.id())
            .or_insert_with(|| TokenEntry {
                liveness: tokens.liveness(),
                declarations: HashMap::new(),
            })
            .declarations
            .insert(source, declarations);
    }

    /// Drop everything compiled for one token object
    pub fn evict(&self, tokens: TokensId) {
        self.entries.borrow_mut().remove(&tokens);
    }

    /// Number of cached `(tokens, source)` entries
    pub fn len(&self) -> usize {
        self.entries
            .borrow()
            .values()
            .map(|entry| entry.declarations.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
