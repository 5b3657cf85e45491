//! Query functions: active selectors + override classes → class names

use crate::definition::{Selectors, StyleDefinitionList};
use crate::environment::Environment;
use crate::error::{StyleError, StyleResult};
use crate::insert::insert_styles;
use crate::matcher::{BitTable, Mask, MAX_MATCHER_BITS};
use crate::renderer::{default_target, Renderer, RendererId};
use crate::resolver::DeclarationMap;
use crate::snapshot::StylesSnapshot;
use crate::tokens::Tokens;
use crate::variants::{ResolvedDefinition, VariantCache};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Per-call configuration of a query
#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub rtl: bool,
    pub tokens: Rc<Tokens>,
    pub target: Renderer,
}

impl StyleOptions {
    /// Left-to-right, empty tokens
    pub fn new(target: Renderer) -> Self {
        Self {
            rtl: false,
            tokens: Rc::new(Tokens::new()),
            target,
        }
    }

    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn tokens(mut self, tokens: Rc<Tokens>) -> Self {
        self.tokens = tokens;
        self
    }
}

/// Everything that determines the merged declarations of a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    mask: Mask,
    /// Recognized override class names, in call order
    overrides: String,
    rtl: bool,
    /// Rules are only present in the sheet of the renderer that inserted them
    renderer: RendererId,
}

#[derive(Debug)]
enum Variants {
    Sources {
        list: StyleDefinitionList,
        cache: VariantCache,
    },
    Prebuilt {
        table: BitTable,
        resolved: Vec<ResolvedDefinition>,
    },
}

/// A compiled definition list, callable many times
#[derive(Debug)]
pub struct MakeStyles {
    variants: Variants,
    environment: Environment,
    class_names: RefCell<HashMap<QueryKey, String>>,
}

impl MakeStyles {
    pub fn new(list: StyleDefinitionList) -> StyleResult<Self> {
        Self::with_environment(list, Environment::current())
    }

    pub fn with_environment(list: StyleDefinitionList, environment: Environment) -> StyleResult<Self> {
        let count = BitTable::count_pairs(&list);
        if count > MAX_MATCHER_BITS {
            return Err(StyleError::TooManyMatchers {
                count,
                max: MAX_MATCHER_BITS,
            });
        }

        let cache = VariantCache::new(list.len());
        Ok(Self::from_variants(Variants::Sources { list, cache }, environment))
    }

    /// Styles served from a snapshot; no style source is ever evaluated.
    ///
    /// Snapshots hold declarations resolved against `var(--theme-...)`
    /// references and no token functions, so prebuilt styles always run with
    /// CSS variables enabled. Hosts without custom-property support must
    /// compile from sources with [`MakeStyles::with_environment`] instead.
    pub fn from_snapshot(snapshot: StylesSnapshot) -> StyleResult<Self> {
        if !Environment::current().css_variables {
            warn!("Prebuilt styles reference CSS variables the current environment does not support");
        }

        let (table, resolved) = snapshot.into_parts()?;
        Ok(Self::from_variants(
            Variants::Prebuilt { table, resolved },
            Environment::default(),
        ))
    }

    fn from_variants(variants: Variants, environment: Environment) -> Self {
        Self {
            variants,
            environment,
            class_names: RefCell::new(HashMap::new()),
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn bit_table(&self) -> &BitTable {
        match &self.variants {
            Variants::Sources { list, cache } => cache.bit_table(list),
            Variants::Prebuilt { table, .. } => table,
        }
    }

    /// Resolve every definition against `tokens` under this environment
    pub fn resolve(&self, tokens: &Tokens) -> Vec<ResolvedDefinition> {
        self.resolve_in(tokens, &self.environment)
    }

    fn resolve_in(&self, tokens: &Tokens, environment: &Environment) -> Vec<ResolvedDefinition> {
        match &self.variants {
            Variants::Sources { list, cache } => cache.resolve(list, tokens, environment),
            Variants::Prebuilt { resolved, .. } => resolved.clone(),
        }
    }

    /// Resolve under the CSS-variable path and capture the result
    pub fn snapshot(&self, tokens: &Tokens) -> StylesSnapshot {
        let resolved = self.resolve_in(tokens, &Environment::default());
        StylesSnapshot::new(self.bit_table(), &resolved)
    }

    /// Class names for the definitions matching `selectors`, followed by
    /// `class_names` overrides.
    ///
    /// Classes in `class_names` that this renderer issued override matched
    /// declarations for the same property; other classes pass through verbatim
    /// ahead of the generated ones.
    pub fn query(&self, selectors: &Selectors, options: &StyleOptions, class_names: &[&str]) -> String {
        let renderer = &options.target;

        let mut passthrough: Vec<&str> = Vec::new();
        let mut overrides = DeclarationMap::new();
        let mut signature = String::new();

        for class_name in class_names.iter().copied().flat_map(str::split_whitespace) {
            match renderer.lookup(class_name) {
                Some((key, declaration)) => {
                    overrides.insert(key, declaration);
                    signature.push_str(class_name);
                    signature.push(' ');
                }
                None => passthrough.push(class_name),
            }
        }

        let mask = self.bit_table().selectors_to_mask(selectors);
        let key = QueryKey {
            mask,
            overrides: signature,
            rtl: options.rtl,
            renderer: renderer.id(),
        };

        if self.environment.css_variables {
            if let Some(cached) = self.class_names.borrow().get(&key) {
                trace!(mask, "Class name cache hit");
                return join_classes(&passthrough, cached);
            }
        }

        let mut merged = DeclarationMap::new();
        for definition in self.resolve(&options.tokens).iter().filter(|d| d.matches(mask)) {
            for (property, declaration) in definition.declarations.iter() {
                merged.insert(property.clone(), declaration.clone());
            }
        }
        for (property, declaration) in overrides {
            merged.insert(property, declaration);
        }

        let generated = insert_styles(&merged, options.rtl, renderer);
        debug!(mask, declarations = merged.len(), "Computed class names");

        if self.environment.css_variables {
            self.class_names.borrow_mut().insert(key, generated.clone());
        }

        join_classes(&passthrough, &generated)
    }
}

fn join_classes(passthrough: &[&str], generated: &str) -> String {
    let mut classes = passthrough.join(" ");
    if !generated.is_empty() {
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(generated);
    }
    classes
}

/// Styles bound to the default target, empty tokens and left-to-right layout
#[derive(Debug)]
pub struct BoundStyles {
    styles: MakeStyles,
    options: StyleOptions,
}

impl BoundStyles {
    pub fn query(&self, selectors: &Selectors, class_names: &[&str]) -> String {
        self.styles.query(selectors, &self.options, class_names)
    }

    pub fn styles(&self) -> &MakeStyles {
        &self.styles
    }

    pub fn options(&self) -> &StyleOptions {
        &self.options
    }
}

/// Compile `list` for use with explicit per-call options
pub fn make_non_ui_styles(list: StyleDefinitionList) -> StyleResult<MakeStyles> {
    MakeStyles::new(list)
}

/// Compile `list` against this thread's default document
pub fn make_styles(list: StyleDefinitionList) -> StyleResult<BoundStyles> {
    Ok(BoundStyles {
        styles: MakeStyles::new(list)?,
        options: StyleOptions::new(default_target()),
    })
}
