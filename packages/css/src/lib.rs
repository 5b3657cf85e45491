//! Style tree model and the CSS text helpers used by the makestyles runtime:
//! shorthand expansion, right-to-left conversion, declaration hashing and
//! single-declaration rule generation.

pub mod compile;
pub mod error;
pub mod hash;
pub mod rtl;
pub mod shorthand;
pub mod value;

pub use compile::{compile_css, format_value, hyphenate};
pub use error::{CssError, CssResult};
pub use hash::hash;
pub use rtl::convert_property;
pub use shorthand::expand;
pub use value::{StyleTree, StyleValue};
