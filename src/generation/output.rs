//! Provider output normalization.
//!
//! Different model versions return the image location in different places.
//! Each shape is a matcher that either extracts a non-empty URL or declines.
//! [`SHAPES`] is tried in order and the first match wins, so an output that
//! satisfies two shapes always resolves to the higher-priority one.

use serde_json::Value;
use tracing::debug;

pub type Matcher = fn(&Value) -> Option<String>;

/// Matchers in priority order.
pub const SHAPES: &[(&str, Matcher)] = &[
    ("url", url_field),
    ("array", first_element),
    ("image", image_field),
    ("images", first_image),
];

/// Extract the image URL from a provider output.
#[must_use]
pub fn normalize(output: &Value) -> Option<String> {
    SHAPES.iter().find_map(|(shape, matcher)| {
        let href = matcher(output)?;
        debug!(shape, "matched provider output shape");
        Some(href)
    })
}

fn non_empty(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A `url` value is either the URL itself or an object exposing `href`.
fn url_value(value: &Value) -> Option<String> {
    match value {
        Value::Object(object) => object.get("href").and_then(non_empty),
        other => non_empty(other),
    }
}

/// `{ "url": "..." }` or `{ "url": { "href": "..." } }`.
pub fn url_field(output: &Value) -> Option<String> {
    output.as_object()?.get("url").and_then(url_value)
}

/// `[{ "url": ... }, ...]` or `["...", ...]`.
pub fn first_element(output: &Value) -> Option<String> {
    let first = output.as_array()?.first()?;
    first
        .as_object()
        .and_then(|object| object.get("url"))
        .and_then(url_value)
        .or_else(|| non_empty(first))
}

/// `{ "image": "..." }`.
pub fn image_field(output: &Value) -> Option<String> {
    output.as_object()?.get("image").and_then(non_empty)
}

/// `{ "images": ["...", ...] }`.
pub fn first_image(output: &Value) -> Option<String> {
    output
        .as_object()?
        .get("images")?
        .as_array()?
        .first()
        .and_then(non_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HREF: &str = "https://replicate.delivery/pbxt/poster.png";

    #[test]
    fn url_string() {
        assert_eq!(normalize(&json!({ "url": HREF })).as_deref(), Some(HREF));
    }

    #[test]
    fn url_accessor_object() {
        let output = json!({ "url": { "href": HREF } });
        assert_eq!(normalize(&output).as_deref(), Some(HREF));
    }

    #[test]
    fn array_of_strings_and_objects() {
        assert_eq!(
            normalize(&json!([HREF, "https://other"])).as_deref(),
            Some(HREF)
        );
        assert_eq!(
            normalize(&json!([{ "url": HREF }])).as_deref(),
            Some(HREF)
        );
        assert_eq!(
            normalize(&json!([{ "url": { "href": HREF } }])).as_deref(),
            Some(HREF)
        );
    }

    #[test]
    fn image_and_images() {
        assert_eq!(normalize(&json!({ "image": HREF })).as_deref(), Some(HREF));
        assert_eq!(
            normalize(&json!({ "images": [HREF, "https://other"] })).as_deref(),
            Some(HREF)
        );
    }

    #[test]
    fn url_wins_over_image_and_images() {
        let output = json!({
            "url": "https://from-url",
            "image": "https://from-image",
            "images": ["https://from-images"],
        });
        assert_eq!(normalize(&output).as_deref(), Some("https://from-url"));
    }

    #[test]
    fn image_wins_over_images() {
        let output = json!({
            "image": "https://from-image",
            "images": ["https://from-images"],
        });
        assert_eq!(normalize(&output).as_deref(), Some("https://from-image"));
    }

    #[test]
    fn empty_url_falls_through_to_next_shape() {
        let output = json!({ "url": "", "image": HREF });
        assert_eq!(normalize(&output).as_deref(), Some(HREF));
    }

    #[test]
    fn unrecognized_shapes_decline() {
        for output in [
            json!({}),
            json!(null),
            json!([]),
            json!([{}]),
            json!({ "images": [] }),
            json!({ "images": [42] }),
            json!({ "image": 7 }),
            json!(HREF),
        ] {
            assert_eq!(normalize(&output), None, "output: {output}");
        }
    }

    #[test]
    fn shapes_are_listed_in_priority_order() {
        let names: Vec<&str> = SHAPES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["url", "array", "image", "images"]);
    }
}
