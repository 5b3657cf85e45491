//! Output targets
//!
//! A [`Document`] is the host for injected rules: it owns a `head` of
//! [`StyleElement`]s, each carrying an ordered rule list in the manner of a
//! CSSOM stylesheet. Documents are cheap handles; clones share state and
//! identity.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a document, stable for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

#[derive(Debug)]
struct DocumentState {
    id: DocumentId,
    head: RefCell<Vec<StyleElement>>,
}

#[derive(Debug, Clone)]
pub struct Document {
    state: Rc<DocumentState>,
}

impl Document {
    pub fn new() -> Self {
        let id = DocumentId(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            state: Rc::new(DocumentState {
                id,
                head: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn id(&self) -> DocumentId {
        self.state.id
    }

    /// Create a detached `<style>` element
    pub fn create_style_element(&self) -> StyleElement {
        StyleElement::new()
    }

    pub fn append_to_head(&self, element: StyleElement) {
        self.state.head.borrow_mut().push(element);
    }

    pub fn style_elements(&self) -> Vec<StyleElement> {
        self.state.head.borrow().clone()
    }

    /// Text of every rule in every style element of the head, one rule per line
    pub fn to_css(&self) -> String {
        self.state
            .head
            .borrow()
            .iter()
            .flat_map(|element| element.rules())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(crate) fn downgrade(&self) -> WeakDocument {
        WeakDocument(Rc::downgrade(&self.state))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-owning reference used by registries keyed on document lifetime
#[derive(Debug, Clone)]
pub(crate) struct WeakDocument(Weak<DocumentState>);

impl WeakDocument {
    pub(crate) fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

#[derive(Debug, Default)]
struct StyleElementState {
    attributes: RefCell<BTreeMap<String, String>>,
    rules: RefCell<Vec<String>>,
}

/// A `<style>` node and its sheet
#[derive(Debug, Clone, Default)]
pub struct StyleElement {
    state: Rc<StyleElementState>,
}

impl StyleElement {
    fn new() -> Self {
        Self::default()
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        self.state
            .attributes
            .borrow_mut()
            .insert(name.into(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.state.attributes.borrow().get(name).cloned()
    }

    /// Insert a rule at `index`, returning the index it landed at.
    /// Indices past the end append.
    pub fn insert_rule(&self, rule: impl Into<String>, index: usize) -> usize {
        let mut rules = self.state.rules.borrow_mut();
        let index = index.min(rules.len());
        rules.insert(index, rule.into());
        index
    }

    pub fn rules(&self) -> Vec<String> {
        self.state.rules.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.state.rules.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ptr_eq(&self, other: &StyleElement) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}
