//! Right-to-left property conversion

use crate::shorthand::split_values;
use crate::value::StyleValue;

const CURSOR_FLIPS: &[(&str, &str)] = &[
    ("e-resize", "w-resize"),
    ("ne-resize", "nw-resize"),
    ("se-resize", "sw-resize"),
    ("nesw-resize", "nwse-resize"),
];

/// Convert a longhand declaration to its right-to-left equivalent.
///
/// Returns the input unchanged when nothing flips. Callers detect a flip by
/// comparing the result with the input.
pub fn convert_property(property: &str, value: &StyleValue) -> (String, StyleValue) {
    let key = flip_property_name(property);
    let value = match value.as_str() {
        Some(text) => flip_value(property, text)
            .map(StyleValue::Str)
            .unwrap_or_else(|| value.clone()),
        None => value.clone(),
    };
    (key, value)
}

fn flip_property_name(property: &str) -> String {
    match property {
        "left" => "right".to_string(),
        "right" => "left".to_string(),
        _ if property.contains("Left") => property.replacen("Left", "Right", 1),
        _ if property.contains("Right") => property.replacen("Right", "Left", 1),
        _ => property.to_string(),
    }
}

fn swap_keyword(text: &str) -> Option<String> {
    match text {
        "left" => Some("right".to_string()),
        "right" => Some("left".to_string()),
        _ => None,
    }
}

fn flip_value(property: &str, value: &str) -> Option<String> {
    match property {
        "float" | "clear" | "textAlign" | "textAlignLast" => swap_keyword(value),
        "cursor" => flip_cursor(value),
        "boxShadow" | "textShadow" => flip_shadows(value),
        "backgroundPosition" | "backgroundPositionX" | "transformOrigin" => {
            flip_position_keywords(value)
        }
        _ => None,
    }
}

fn flip_cursor(value: &str) -> Option<String> {
    CURSOR_FLIPS.iter().find_map(|(a, b)| {
        if value == *a {
            Some(b.to_string())
        } else if value == *b {
            Some(a.to_string())
        } else {
            None
        }
    })
}

fn flip_position_keywords(value: &str) -> Option<String> {
    let tokens = split_values(value);
    if !tokens.iter().any(|t| t == "left" || t == "right") {
        return None;
    }
    let flipped: Vec<String> = tokens
        .into_iter()
        .map(|t| swap_keyword(&t).unwrap_or(t))
        .collect();
    Some(flipped.join(" "))
}

/// Split on top-level commas (commas inside `rgba(...)` stay put)
fn split_layers(value: &str) -> Vec<&str> {
    let mut layers = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                layers.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    layers.push(value[start..].trim());
    layers
}

fn negate_length(token: &str) -> String {
    if let Some(stripped) = token.strip_prefix('-') {
        return stripped.to_string();
    }

    let unsigned = token.trim_start_matches('+');
    let magnitude: String = unsigned
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    // zero offsets have no direction
    if magnitude.parse::<f64>().map_or(false, |n| n == 0.0) {
        token.to_string()
    } else {
        format!("-{}", unsigned)
    }
}

fn starts_like_length(token: &str) -> bool {
    token
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
}

/// Negate the horizontal offset of every shadow layer
fn flip_shadows(value: &str) -> Option<String> {
    let mut changed = false;
    let layers: Vec<String> = split_layers(value)
        .into_iter()
        .map(|layer| {
            let mut tokens = split_values(layer);
            if let Some(offset) = tokens.iter_mut().find(|t| starts_like_length(t)) {
                let flipped = negate_length(offset);
                if flipped != *offset {
                    changed = true;
                    *offset = flipped;
                }
            }
            tokens.join(" ")
        })
        .collect();

    changed.then(|| layers.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(property: &str, value: &str) -> (String, String) {
        let (key, value) = convert_property(property, &StyleValue::from(value));
        (key, value.to_text().unwrap())
    }

    #[test]
    fn test_flip_property_names() {
        assert_eq!(convert("marginLeft", "4px"), ("marginRight".into(), "4px".into()));
        assert_eq!(convert("paddingRight", "0"), ("paddingLeft".into(), "0".into()));
        assert_eq!(convert("left", "0"), ("right".into(), "0".into()));
        assert_eq!(
            convert("borderTopLeftRadius", "2px"),
            ("borderTopRightRadius".into(), "2px".into())
        );
    }

    #[test]
    fn test_unflipped_properties_are_unchanged() {
        assert_eq!(convert("color", "red"), ("color".into(), "red".into()));
        assert_eq!(convert("marginTop", "4px"), ("marginTop".into(), "4px".into()));
        let (key, value) = convert_property("zIndex", &StyleValue::from(3));
        assert_eq!(key, "zIndex");
        assert_eq!(value, StyleValue::Number(3.0));
    }

    #[test]
    fn test_flip_keyword_values() {
        assert_eq!(convert("textAlign", "left"), ("textAlign".into(), "right".into()));
        assert_eq!(convert("float", "right"), ("float".into(), "left".into()));
        assert_eq!(convert("textAlign", "center"), ("textAlign".into(), "center".into()));
        assert_eq!(convert("cursor", "ne-resize"), ("cursor".into(), "nw-resize".into()));
    }

    #[test]
    fn test_flip_shadows() {
        assert_eq!(
            convert("boxShadow", "2px 4px rgba(0, 0, 0, 0.2)").1,
            "-2px 4px rgba(0, 0, 0, 0.2)"
        );
        assert_eq!(
            convert("boxShadow", "inset -1px 0 red, 3px 3px blue").1,
            "inset 1px 0 red, -3px 3px blue"
        );
        assert_eq!(convert("boxShadow", "0 2px red").1, "0 2px red");
    }

    #[test]
    fn test_flip_position_keywords() {
        assert_eq!(convert("backgroundPosition", "left top").1, "right top");
        assert_eq!(convert("transformOrigin", "50% 50%").1, "50% 50%");
    }
}
