//! Declaration resolver: nested style tree → flat, content-addressed declarations

use indexmap::IndexMap;
use makestyles_css::{compile_css, convert_property, expand, format_value, hash};
use makestyles_css::{StyleTree, StyleValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Prefix that turns a hash into a valid class identifier
pub const HASH_PREFIX: &str = "a";

/// Prefix of the class name of a declaration's right-to-left variant
pub const RTL_PREFIX: &str = "r";

/// A single resolved declaration and its rule text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledDeclaration {
    pub class_name: String,
    pub css: String,
    /// Rule for right-to-left layouts, present only when the declaration flips
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtl_css: Option<String>,
}

impl CompiledDeclaration {
    pub fn rtl_class_name(&self) -> String {
        format!("{}{}", RTL_PREFIX, self.class_name)
    }

    /// Class name and rule text to inject for the given direction
    pub fn for_direction(&self, rtl: bool) -> (String, &str) {
        match (&self.rtl_css, rtl) {
            (Some(rtl_css), true) => (self.rtl_class_name(), rtl_css.as_str()),
            _ => (self.class_name.clone(), self.css.as_str()),
        }
    }
}

/// Declarations keyed by `selector + property`
pub type DeclarationMap = IndexMap<String, CompiledDeclaration>;

/// Whether a key introduces a nested selector block (`:hover`, `[dir]`, `> li`, `&.active`)
pub fn is_nested_selector(property: &str) -> bool {
    matches!(property.chars().next(), Some(':' | '[' | '>' | '&'))
}

fn normalize_nested_property(property: &str) -> &str {
    property.strip_prefix('&').unwrap_or(property)
}

pub fn resolve_styles(tree: &StyleTree) -> DeclarationMap {
    let mut result = DeclarationMap::new();
    resolve_styles_into(tree, "", &mut result);
    result
}

/// Resolve `tree` under `selector`, accumulating into `result`.
///
/// Later writers win on key collisions, so properties declared later in a tree
/// override earlier ones.
pub fn resolve_styles_into(tree: &StyleTree, selector: &str, result: &mut DeclarationMap) {
    let expanded = expand(tree);

    for (property, value) in expanded.iter() {
        match value {
            StyleValue::Null => {}
            StyleValue::Nested(nested) => {
                if is_nested_selector(property) {
                    let nested_selector =
                        format!("{}{}", selector, normalize_nested_property(property));
                    resolve_styles_into(nested, &nested_selector, result);
                } else {
                    // media and support queries land here
                    debug!(%property, %selector, "Skipping nested block without a selector");
                }
            }
            StyleValue::Str(_) | StyleValue::Number(_) => {
                if let Some(declaration) = compile_declaration(selector, property, value) {
                    result.insert(format!("{}{}", selector, property), declaration);
                }
            }
            StyleValue::Unsupported => {
                debug!(%property, %selector, "Dropping value that is neither primitive nor nested");
            }
        }
    }
}

fn compile_declaration(
    selector: &str,
    property: &str,
    value: &StyleValue,
) -> Option<CompiledDeclaration> {
    let text = value.to_text()?;
    let css_value = format_value(property, value)?;

    let class_name = format!(
        "{}{}",
        HASH_PREFIX,
        hash(&format!("{}{}{}", selector, property, text))
    );
    let css = compile_css(&class_name, selector, property, &css_value);

    let (rtl_property, rtl_value) = convert_property(property, value);
    let rtl_css = if rtl_property != property || rtl_value != *value {
        format_value(&rtl_property, &rtl_value).map(|rtl_css_value| {
            compile_css(
                &format!("{}{}", RTL_PREFIX, class_name),
                selector,
                &rtl_property,
                &rtl_css_value,
            )
        })
    } else {
        None
    };

    trace!(%class_name, %css, flipped = rtl_css.is_some(), "Compiled declaration");

    Some(CompiledDeclaration {
        class_name,
        css,
        rtl_css,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> StyleTree {
        StyleTree::from_json(&value).unwrap()
    }

    #[test]
    fn test_nested_selector_tokens() {
        assert!(is_nested_selector(":hover"));
        assert!(is_nested_selector("[data-active]"));
        assert!(is_nested_selector("> li"));
        assert!(is_nested_selector("&.selected"));
        assert!(!is_nested_selector("color"));
        assert!(!is_nested_selector("@media (min-width: 100px)"));
    }

    #[test]
    fn test_resolve_flat_and_nested() {
        let result = resolve_styles(&tree(json!({
            "color": "red",
            "&:hover": { "color": "blue" }
        })));

        assert_eq!(result.len(), 2);
        let base = &result["color"];
        let hover = &result[":hovercolor"];

        assert_ne!(base.class_name, hover.class_name);
        assert_eq!(base.class_name, format!("a{}", hash("colorred")));
        assert_eq!(base.css, format!(".{}{{color:red}}", base.class_name));
        assert_eq!(hover.css, format!(".{}:hover{{color:blue}}", hover.class_name));
        assert_eq!(base.rtl_css, None);
    }

    #[test]
    fn test_ampersand_only_strips_leading_marker() {
        let result = resolve_styles(&tree(json!({
            "&[dir]": { "> span": { "opacity": 0.5 } }
        })));
        let declaration = &result["[dir]> spanopacity"];
        assert!(declaration.css.ends_with("[dir]> span{opacity:0.5}"));
    }

    #[test]
    fn test_skips_absent_unsupported_and_non_selector_blocks() {
        let result = resolve_styles(&tree(json!({
            "color": null,
            "display": true,
            "@media (max-width: 100px)": { "color": "red" },
            "width": 10
        })));

        let keys: Vec<&String> = result.keys().collect();
        assert_eq!(keys, vec!["width"]);
        assert!(result["width"].css.ends_with("{width:10px}"));
    }

    #[test]
    fn test_later_properties_override_earlier() {
        let result = resolve_styles(&tree(json!({
            "padding": "4px",
            "paddingTop": "8px"
        })));

        assert_eq!(result.len(), 4);
        assert!(result["paddingTop"].css.ends_with("{padding-top:8px}"));
    }

    #[test]
    fn test_rtl_variant_for_flipping_properties() {
        let result = resolve_styles(&tree(json!({ "marginLeft": "4px" })));
        let declaration = &result["marginLeft"];
        let rtl_class = declaration.rtl_class_name();

        assert_eq!(rtl_class, format!("r{}", declaration.class_name));
        assert_eq!(
            declaration.rtl_css.as_deref(),
            Some(format!(".{}{{margin-right:4px}}", rtl_class).as_str())
        );
        let (class_name, css) = declaration.for_direction(true);
        assert_eq!(class_name, rtl_class);
        assert!(css.contains("margin-right"));
        assert_eq!(declaration.for_direction(false).0, declaration.class_name);
    }

    #[test]
    fn test_identical_declarations_share_class_names() {
        let a = resolve_styles(&tree(json!({ "color": "red", "display": "flex" })));
        let b = resolve_styles(&tree(json!({ "display": "flex" })));
        assert_eq!(a["display"], b["display"]);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let source = tree(json!({
            "margin": "1px 2px",
            "&:focus": { "outline": "1px solid red" }
        }));
        assert_eq!(resolve_styles(&source), resolve_styles(&source));
    }
}
