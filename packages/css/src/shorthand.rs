//! Shorthand expansion
//!
//! Rewrites shorthand properties (`margin`, `border`, `flex`, ...) into their
//! longhand equivalents so every declaration owns exactly one property. This
//! keeps merge keys precise: a later `marginLeft` overrides the left edge of an
//! earlier `margin` instead of competing with it as an unrelated key.

use crate::value::{StyleTree, StyleValue};

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

const BORDER_WIDTHS: &[&str] = &["thin", "medium", "thick"];

const SIDES: [&str; 4] = ["Top", "Right", "Bottom", "Left"];

const CORNERS: [&str; 4] = ["TopLeft", "TopRight", "BottomRight", "BottomLeft"];

/// Expand every shorthand property at the top level of `tree`.
///
/// Nested trees, unknown properties and values that cannot be split are kept
/// unchanged, in their original position.
pub fn expand(tree: &StyleTree) -> StyleTree {
    let mut expanded = StyleTree::new();

    for (property, value) in tree.iter() {
        match expand_property(property, value) {
            Some(longhands) => {
                for (longhand, value) in longhands {
                    expanded.insert(longhand, value);
                }
            }
            None => {
                expanded.insert(property, value.clone());
            }
        }
    }

    expanded
}

fn expand_property(property: &str, value: &StyleValue) -> Option<Vec<(String, StyleValue)>> {
    if !value.is_primitive() {
        return None;
    }

    match property {
        "margin" | "padding" => expand_box(value, |side| format!("{}{}", property, side)),
        "inset" => expand_box(value, |side| side.to_ascii_lowercase()),
        "borderWidth" => expand_box(value, |side| format!("border{}Width", side)),
        "borderStyle" => expand_box(value, |side| format!("border{}Style", side)),
        "borderColor" => expand_box(value, |side| format!("border{}Color", side)),
        "borderRadius" => expand_radius(value),
        "border" => expand_border(value),
        "borderTop" | "borderRight" | "borderBottom" | "borderLeft" => {
            expand_line(value, property)
        }
        "outline" => expand_line(value, "outline"),
        "overflow" => expand_pair(value, "overflowX", "overflowY"),
        "gap" => expand_pair(value, "rowGap", "columnGap"),
        "flex" => expand_flex(value),
        _ => None,
    }
}

/// Split a value on top-level whitespace. Parenthesised groups such as
/// `calc(1px + 2px)` stay intact.
pub fn split_values(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in value.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

fn values_of(value: &StyleValue) -> Vec<StyleValue> {
    match value {
        StyleValue::Str(s) => split_values(s).into_iter().map(StyleValue::Str).collect(),
        other => vec![other.clone()],
    }
}

/// 1–4 value box syntax (top, right, bottom, left)
fn box_values(value: &StyleValue) -> Option<[StyleValue; 4]> {
    let values = values_of(value);
    let [top, right, bottom, left] = match values.as_slice() {
        [a] => [a, a, a, a],
        [a, b] => [a, b, a, b],
        [a, b, c] => [a, b, c, b],
        [a, b, c, d] => [a, b, c, d],
        _ => return None,
    };
    Some([top.clone(), right.clone(), bottom.clone(), left.clone()])
}

fn expand_box(
    value: &StyleValue,
    name: impl Fn(&str) -> String,
) -> Option<Vec<(String, StyleValue)>> {
    let values = box_values(value)?;
    Some(SIDES.iter().map(|side| name(side)).zip(values).collect())
}

fn expand_radius(value: &StyleValue) -> Option<Vec<(String, StyleValue)>> {
    // Elliptical radii (`10px / 20px`) are left as-is
    if value.as_str().map_or(false, |s| s.contains('/')) {
        return None;
    }
    let values = box_values(value)?;
    Some(
        CORNERS
            .iter()
            .map(|corner| format!("border{}Radius", corner))
            .zip(values)
            .collect(),
    )
}

fn expand_pair(value: &StyleValue, first: &str, second: &str) -> Option<Vec<(String, StyleValue)>> {
    let values = values_of(value);
    let (a, b) = match values.as_slice() {
        [a] => (a.clone(), a.clone()),
        [a, b] => (a.clone(), b.clone()),
        _ => return None,
    };
    Some(vec![(first.to_string(), a), (second.to_string(), b)])
}

#[derive(Default)]
struct LineParts {
    width: Option<StyleValue>,
    style: Option<StyleValue>,
    color: Option<StyleValue>,
}

fn is_length(token: &str) -> bool {
    token
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_digit() || c == '.')
        || BORDER_WIDTHS.contains(&token)
        || token.starts_with("calc(")
}

/// Classify the parts of a `width style color` shorthand in any order
fn line_parts(value: &StyleValue) -> Option<LineParts> {
    let mut parts = LineParts::default();

    match value {
        StyleValue::Number(_) => parts.width = Some(value.clone()),
        StyleValue::Str(s) => {
            for token in split_values(s) {
                let slot = if BORDER_STYLES.contains(&token.as_str()) {
                    &mut parts.style
                } else if is_length(&token) {
                    &mut parts.width
                } else {
                    &mut parts.color
                };
                if slot.is_some() {
                    return None;
                }
                *slot = Some(StyleValue::Str(token));
            }
        }
        _ => return None,
    }

    Some(parts)
}

fn expand_line(value: &StyleValue, prefix: &str) -> Option<Vec<(String, StyleValue)>> {
    let parts = line_parts(value)?;
    let mut longhands = Vec::new();

    for (suffix, part) in [("Width", parts.width), ("Style", parts.style), ("Color", parts.color)] {
        if let Some(part) = part {
            longhands.push((format!("{}{}", prefix, suffix), part));
        }
    }

    Some(longhands)
}

fn expand_border(value: &StyleValue) -> Option<Vec<(String, StyleValue)>> {
    let parts = line_parts(value)?;
    let mut longhands = Vec::new();

    for (suffix, part) in [("Width", parts.width), ("Style", parts.style), ("Color", parts.color)] {
        if let Some(part) = part {
            for side in SIDES {
                longhands.push((format!("border{}{}", side, suffix), part.clone()));
            }
        }
    }

    Some(longhands)
}

fn is_number(token: &str) -> bool {
    token.parse::<f64>().is_ok()
}

fn expand_flex(value: &StyleValue) -> Option<Vec<(String, StyleValue)>> {
    let (grow, shrink, basis): (StyleValue, StyleValue, StyleValue) = match value {
        StyleValue::Number(_) => (value.clone(), 1.into(), "0%".into()),
        StyleValue::Str(s) => {
            let tokens = split_values(s);
            match tokens.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
                ["none"] => (0.into(), 0.into(), "auto".into()),
                ["auto"] => (1.into(), 1.into(), "auto".into()),
                [grow] if is_number(grow) => ((*grow).into(), 1.into(), "0%".into()),
                [basis] => (1.into(), 1.into(), (*basis).into()),
                [grow, shrink] if is_number(shrink) => {
                    ((*grow).into(), (*shrink).into(), "0%".into())
                }
                [grow, basis] => ((*grow).into(), 1.into(), (*basis).into()),
                [grow, shrink, basis] => ((*grow).into(), (*shrink).into(), (*basis).into()),
                _ => return None,
            }
        }
        _ => return None,
    };

    Some(vec![
        ("flexGrow".to_string(), grow),
        ("flexShrink".to_string(), shrink),
        ("flexBasis".to_string(), basis),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(tree: &StyleTree) -> Vec<(String, String)> {
        tree.iter()
            .map(|(k, v)| (k.to_string(), v.to_text().unwrap_or_default()))
            .collect()
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_expand_margin_box_syntax() {
        let tree = expand(&StyleTree::new().set("margin", "1px 2px 3px"));
        assert_eq!(
            pairs(&tree),
            vec![
                pair("marginTop", "1px"),
                pair("marginRight", "2px"),
                pair("marginBottom", "3px"),
                pair("marginLeft", "2px"),
            ]
        );
    }

    #[test]
    fn test_expand_numeric_padding() {
        let tree = expand(&StyleTree::new().set("padding", 0));
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.get("paddingLeft"), Some(&StyleValue::Number(0.0)));
    }

    #[test]
    fn test_expand_keeps_parenthesised_groups() {
        let tree = expand(&StyleTree::new().set("margin", "calc(1px + 2px) auto"));
        assert_eq!(tree.get("marginTop"), Some(&StyleValue::from("calc(1px + 2px)")));
        assert_eq!(tree.get("marginRight"), Some(&StyleValue::from("auto")));
    }

    #[test]
    fn test_later_longhand_overrides_shorthand() {
        let tree = expand(
            &StyleTree::new()
                .set("margin", "4px")
                .set("marginLeft", "8px"),
        );
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.get("marginLeft"), Some(&StyleValue::from("8px")));
    }

    #[test]
    fn test_expand_border() {
        let tree = expand(&StyleTree::new().set("border", "1px solid red"));
        assert_eq!(tree.len(), 12);
        assert_eq!(tree.get("borderTopWidth"), Some(&StyleValue::from("1px")));
        assert_eq!(tree.get("borderLeftStyle"), Some(&StyleValue::from("solid")));
        assert_eq!(tree.get("borderBottomColor"), Some(&StyleValue::from("red")));

        let side = expand(&StyleTree::new().set("borderLeft", "solid 2px"));
        assert_eq!(
            pairs(&side),
            vec![pair("borderLeftWidth", "2px"), pair("borderLeftStyle", "solid")]
        );
    }

    #[test]
    fn test_expand_border_radius() {
        let tree = expand(&StyleTree::new().set("borderRadius", "4px 0"));
        assert_eq!(tree.get("borderTopLeftRadius"), Some(&StyleValue::from("4px")));
        assert_eq!(tree.get("borderTopRightRadius"), Some(&StyleValue::from("0")));

        let elliptical = expand(&StyleTree::new().set("borderRadius", "10px / 20px"));
        assert_eq!(pairs(&elliptical), vec![pair("borderRadius", "10px / 20px")]);
    }

    #[test]
    fn test_expand_flex() {
        let tree = expand(&StyleTree::new().set("flex", 1));
        assert_eq!(
            pairs(&tree),
            vec![pair("flexGrow", "1"), pair("flexShrink", "1"), pair("flexBasis", "0%")]
        );

        let none = expand(&StyleTree::new().set("flex", "none"));
        assert_eq!(
            pairs(&none),
            vec![pair("flexGrow", "0"), pair("flexShrink", "0"), pair("flexBasis", "auto")]
        );

        let basis = expand(&StyleTree::new().set("flex", "2 200px"));
        assert_eq!(basis.get("flexBasis"), Some(&StyleValue::from("200px")));
    }

    #[test]
    fn test_expand_pairs() {
        let tree = expand(&StyleTree::new().set("overflow", "hidden auto").set("gap", "8px"));
        assert_eq!(
            pairs(&tree),
            vec![
                pair("overflowX", "hidden"),
                pair("overflowY", "auto"),
                pair("rowGap", "8px"),
                pair("columnGap", "8px"),
            ]
        );
    }

    #[test]
    fn test_nested_and_unknown_properties_pass_through() {
        let nested = StyleTree::new().set("margin", "1px");
        let tree = expand(
            &StyleTree::new()
                .set("color", "red")
                .nested("&:hover", nested.clone()),
        );
        assert_eq!(tree.get("color"), Some(&StyleValue::from("red")));
        // nested blocks are expanded when the resolver recurses into them
        assert_eq!(tree.get("&:hover"), Some(&StyleValue::Nested(nested)));
    }
}
