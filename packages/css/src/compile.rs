//! CSS text generation for a single declaration

use crate::value::StyleValue;

/// Properties whose numeric values are emitted without a `px` unit
const UNITLESS_PROPERTIES: &[&str] = &[
    "animationIterationCount",
    "aspectRatio",
    "borderImageOutset",
    "borderImageSlice",
    "borderImageWidth",
    "columnCount",
    "columns",
    "fillOpacity",
    "flex",
    "flexGrow",
    "flexShrink",
    "floodOpacity",
    "fontWeight",
    "gridArea",
    "gridColumn",
    "gridColumnEnd",
    "gridColumnStart",
    "gridRow",
    "gridRowEnd",
    "gridRowStart",
    "lineClamp",
    "lineHeight",
    "opacity",
    "order",
    "orphans",
    "stopOpacity",
    "strokeDasharray",
    "strokeDashoffset",
    "strokeMiterlimit",
    "strokeOpacity",
    "strokeWidth",
    "tabSize",
    "widows",
    "zIndex",
    "zoom",
];

/// Convert a camelCase property name to its CSS form.
///
/// `marginLeft` → `margin-left`, `WebkitTransition` → `-webkit-transition`,
/// `msFlex` → `-ms-flex`. Custom properties (`--brand`) are returned verbatim.
pub fn hyphenate(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_string();
    }

    let mut result = String::with_capacity(property.len() + 4);
    if property.starts_with("ms") && property[2..].starts_with(|c: char| c.is_ascii_uppercase()) {
        result.push('-');
    }

    for ch in property.chars() {
        if ch.is_ascii_uppercase() {
            result.push('-');
            result.push(ch.to_ascii_lowercase());
        } else {
            result.push(ch);
        }
    }

    result
}

/// Value text as it appears in CSS. Returns `None` for non-primitive values.
pub fn format_value(property: &str, value: &StyleValue) -> Option<String> {
    match value {
        StyleValue::Str(s) => Some(s.clone()),
        StyleValue::Number(n) => {
            let text = value.to_text()?;
            if *n == 0.0 || property.starts_with("--") || UNITLESS_PROPERTIES.contains(&property) {
                Some(text)
            } else {
                Some(format!("{}px", text))
            }
        }
        _ => None,
    }
}

/// Render one declaration as a complete rule: `.{class}{selector}{property:value}`.
///
/// `selector` is the flattened nested-selector suffix (`:hover`, `> div`, `[data-x]`)
/// and is appended directly after the class selector.
pub fn compile_css(class_name: &str, selector: &str, property: &str, value: &str) -> String {
    format!(
        ".{}{}{{{}:{}}}",
        class_name,
        selector,
        hyphenate(property),
        value
    )
}
