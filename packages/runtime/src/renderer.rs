//! Renderer registry
//!
//! One [`Renderer`] exists per output [`Document`]. It owns the style element
//! rules are injected into, the insertion cache that maps every issued class
//! name back to its declaration, and the next rule index.

use crate::document::{Document, DocumentId, StyleElement, WeakDocument};
use crate::resolver::CompiledDeclaration;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Attribute marking style elements owned by a renderer
pub const STYLE_ATTRIBUTE: &str = "data-makestyles";
pub const STYLE_ATTRIBUTE_VALUE: &str = "rule";

static NEXT_RENDERER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a renderer. A document that gets a new renderer (after
/// [`RendererRegistry::clear`], or through another registry) gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererId(u64);

#[derive(Debug)]
struct RendererState {
    id: RendererId,
    target: DocumentId,
    /// class name → (merge key, declaration)
    cache: HashMap<String, (String, CompiledDeclaration)>,
    node: StyleElement,
    index: usize,
}

/// Shared handle to a document's renderer
#[derive(Debug, Clone)]
pub struct Renderer {
    state: Rc<RefCell<RendererState>>,
}

impl Renderer {
    fn new(document: &Document) -> Self {
        let node = document.create_style_element();
        node.set_attribute(STYLE_ATTRIBUTE, STYLE_ATTRIBUTE_VALUE);
        document.append_to_head(node.clone());

        Self {
            state: Rc::new(RefCell::new(RendererState {
                id: RendererId(NEXT_RENDERER_ID.fetch_add(1, Ordering::Relaxed)),
                target: document.id(),
                cache: HashMap::new(),
                node,
                index: 0,
            })),
        }
    }

    pub fn id(&self) -> RendererId {
        self.state.borrow().id
    }

    pub fn target(&self) -> DocumentId {
        self.state.borrow().target
    }

    pub fn node(&self) -> StyleElement {
        self.state.borrow().node.clone()
    }

    /// Number of rules inserted so far
    pub fn index(&self) -> usize {
        self.state.borrow().index
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.state.borrow().cache.contains_key(class_name)
    }

    /// Merge key and declaration behind a previously issued class name
    pub fn lookup(&self, class_name: &str) -> Option<(String, CompiledDeclaration)> {
        self.state.borrow().cache.get(class_name).cloned()
    }

    /// Insert `css` as a new rule unless `class_name` was issued before.
    /// Returns whether a rule was inserted.
    pub fn insert(
        &self,
        class_name: &str,
        key: &str,
        declaration: &CompiledDeclaration,
        css: &str,
    ) -> bool {
        let mut state = self.state.borrow_mut();
        if state.cache.contains_key(class_name) {
            return false;
        }

        let index = state.index;
        state.node.insert_rule(css, index);
        state.index += 1;
        state
            .cache
            .insert(class_name.to_string(), (key.to_string(), declaration.clone()));

        trace!(%class_name, index, "Inserted rule");
        true
    }

    pub fn ptr_eq(&self, other: &Renderer) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

/// Renderers keyed by document identity.
///
/// Entries live as long as their document; dead entries are pruned on the
/// next [`RendererRegistry::acquire`].
#[derive(Debug, Default)]
pub struct RendererRegistry {
    renderers: RefCell<HashMap<DocumentId, (WeakDocument, Renderer)>>,
}

thread_local! {
    static REGISTRY: RendererRegistry = RendererRegistry::new();
    static DEFAULT_DOCUMENT: Document = Document::new();
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against this thread's registry
    pub fn with_current<R>(f: impl FnOnce(&RendererRegistry) -> R) -> R {
        REGISTRY.with(f)
    }

    /// Renderer for `document`, created on first access
    pub fn acquire(&self, document: &Document) -> Renderer {
        let mut renderers = self.renderers.borrow_mut();

        if let Some((_, renderer)) = renderers.get(&document.id()) {
            return renderer.clone();
        }

        renderers.retain(|_, (weak, _)| weak.is_alive());

        debug!(target_document = ?document.id(), "Creating renderer");
        let renderer = Renderer::new(document);
        renderers.insert(document.id(), (document.downgrade(), renderer.clone()));
        renderer
    }

    pub fn len(&self) -> usize {
        self.renderers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.renderers.borrow_mut().clear();
    }
}

/// Renderer for `document` from this thread's registry
pub fn create_target(document: &Document) -> Renderer {
    RendererRegistry::with_current(|registry| registry.acquire(document))
}

/// This thread's default output document
pub fn default_document() -> Document {
    DEFAULT_DOCUMENT.with(Document::clone)
}

/// Renderer of [`default_document`]
pub fn default_target() -> Renderer {
    create_target(&default_document())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve_styles;
    use makestyles_css::StyleTree;

    #[test]
    fn test_acquire_creates_marked_node_in_head() {
        let registry = RendererRegistry::new();
        let document = Document::new();
        let renderer = registry.acquire(&document);

        let elements = document.style_elements();
        assert_eq!(elements.len(), 1);
        assert!(elements[0].ptr_eq(&renderer.node()));
        assert_eq!(
            elements[0].attribute(STYLE_ATTRIBUTE).as_deref(),
            Some(STYLE_ATTRIBUTE_VALUE)
        );
        assert_eq!(renderer.index(), 0);
        assert_eq!(renderer.target(), document.id());
    }

    #[test]
    fn test_acquire_returns_same_renderer() {
        let registry = RendererRegistry::new();
        let document = Document::new();
        let a = registry.acquire(&document);
        let b = registry.acquire(&document.clone());

        assert!(a.ptr_eq(&b));
        assert_eq!(a.id(), b.id());
        assert_eq!(document.style_elements().len(), 1);

        let other = registry.acquire(&Document::new());
        assert!(!a.ptr_eq(&other));
        assert_ne!(a.id(), other.id());

        registry.clear();
        let renewed = registry.acquire(&document);
        assert_eq!(renewed.target(), a.target());
        assert_ne!(renewed.id(), a.id());
    }

    #[test]
    fn test_dropped_documents_are_pruned() {
        let registry = RendererRegistry::new();
        let kept = Document::new();
        registry.acquire(&kept);
        registry.acquire(&Document::new());
        assert_eq!(registry.len(), 2);

        registry.acquire(&Document::new());
        assert_eq!(registry.len(), 2);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_insert_is_deduplicated_by_class_name() {
        let document = Document::new();
        let renderer = RendererRegistry::new().acquire(&document);
        let declarations = resolve_styles(&StyleTree::new().set("color", "red"));
        let declaration = &declarations["color"];

        assert!(renderer.insert(&declaration.class_name, "color", declaration, &declaration.css));
        assert!(!renderer.insert(&declaration.class_name, "color", declaration, &declaration.css));

        assert_eq!(renderer.index(), 1);
        assert_eq!(document.to_css(), declaration.css);
        assert_eq!(
            renderer.lookup(&declaration.class_name),
            Some(("color".to_string(), declaration.clone()))
        );
    }

    #[test]
    fn test_thread_registry_and_default_document() {
        let a = default_target();
        let b = create_target(&default_document());
        assert!(a.ptr_eq(&b));
        assert_eq!(a.target(), default_document().id());
    }
}
