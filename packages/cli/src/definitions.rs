//! Definition files
//!
//! A definition file is a JSON array of `{ "matchers": {...} | null, "style": {...} }`
//! entries. String values of the form `"$color.brand"` refer to tokens; a style
//! that uses any becomes a token function.

use anyhow::{anyhow, Context, Result};
use makestyles_runtime::{
    Matchers, StyleDefinition, StyleDefinitionList, StyleSource, StyleTree, StyleValue, TokenView,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Marks a string value as a token path
pub const TOKEN_REFERENCE_PREFIX: char = '$';

#[derive(Debug, Deserialize)]
struct DefinitionEntry {
    #[serde(default)]
    matchers: Option<Matchers>,
    style: Value,
}

pub fn load_definitions(path: &Path) -> Result<StyleDefinitionList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read definitions from {}", path.display()))?;
    parse_definitions(&content).with_context(|| format!("Invalid definitions in {}", path.display()))
}

pub fn parse_definitions(json: &str) -> Result<StyleDefinitionList> {
    let entries: Vec<DefinitionEntry> = serde_json::from_str(json)?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let Value::Object(style) = entry.style else {
                return Err(anyhow!("Definition {} has a style that is not an object", index));
            };
            Ok(StyleDefinition::new(entry.matchers, style_source(style)))
        })
        .collect()
}

fn style_source(style: Map<String, Value>) -> StyleSource {
    if has_token_references(&style) {
        StyleSource::dynamic(move |tokens| build_tree(&style, Some(tokens)))
    } else {
        StyleSource::Static(build_tree(&style, None))
    }
}

fn token_path(value: &str) -> Option<Vec<&str>> {
    let path = value.strip_prefix(TOKEN_REFERENCE_PREFIX)?;
    if path.is_empty() {
        return None;
    }
    Some(path.split('.').collect())
}

fn has_token_references(style: &Map<String, Value>) -> bool {
    style.values().any(|value| match value {
        Value::String(text) => token_path(text).is_some(),
        Value::Object(nested) => has_token_references(nested),
        _ => false,
    })
}

fn build_tree(style: &Map<String, Value>, tokens: Option<&TokenView<'_>>) -> StyleTree {
    let mut tree = StyleTree::new();

    for (property, value) in style {
        let value = match (value, tokens) {
            (Value::Object(nested), _) => StyleValue::Nested(build_tree(nested, tokens)),
            (Value::String(text), Some(tokens)) => match token_path(text) {
                Some(path) => tokens.token(&path),
                None => StyleValue::from(value),
            },
            _ => StyleValue::from(value),
        };
        tree.insert(property.as_str(), value);
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use makestyles_runtime::{Conditions, Tokens};

    #[test]
    fn test_parse_static_and_conditional_entries() {
        let list = parse_definitions(
            r#"[
                { "matchers": null, "style": { "color": "red", "&:hover": { "color": "blue" } } },
                { "matchers": { "size": "small", "primary": true }, "style": { "padding": 4 } }
            ]"#,
        )
        .unwrap();

        assert_eq!(list.len(), 2);
        let first = list.get(0).unwrap();
        assert!(first.matchers.is_none());
        assert!(!first.source.is_token_dependent());

        let second = list.get(1).unwrap();
        assert_eq!(
            second.matchers,
            Some(Conditions::new().with("size", "small").with("primary", true))
        );
    }

    #[test]
    fn test_token_references_make_dynamic_sources() {
        let list = parse_definitions(
            r#"[{ "style": { "&:focus": { "outlineColor": "$color.focus" }, "margin": 0 } }]"#,
        )
        .unwrap();
        let source = &list.get(0).unwrap().source;
        assert!(source.is_token_dependent());

        let tokens = Tokens::new().set(&["color", "focus"], "orange");
        let variables = source.evaluate(&TokenView::Variables(&tokens));
        let nested = variables.get("&:focus").and_then(StyleValue::as_nested).unwrap();
        assert_eq!(
            nested.get("outlineColor"),
            Some(&StyleValue::from("var(--theme-color-focus)"))
        );

        let values = source.evaluate(&TokenView::Values(&tokens));
        let nested = values.get("&:focus").and_then(StyleValue::as_nested).unwrap();
        assert_eq!(nested.get("outlineColor"), Some(&StyleValue::from("orange")));
    }

    #[test]
    fn test_bare_dollar_is_plain_text() {
        let list = parse_definitions(r#"[{ "style": { "content": "$" } }]"#).unwrap();
        assert!(!list.get(0).unwrap().source.is_token_dependent());
    }

    #[test]
    fn test_rejects_non_object_styles() {
        assert!(parse_definitions(r#"[{ "style": "color: red" }]"#).is_err());
        assert!(parse_definitions(r#"{ "style": {} }"#).is_err());
    }
}
