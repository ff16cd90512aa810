use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, html};
use regex::Regex;
use serde_json::{Number, Value};

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

/// Largest integer a JSON number can hold without losing precision in an
/// IEEE double (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Render Markdown to HTML. Empty input renders to an empty string.
///
/// Raw HTML in the source is escaped and rendered as text.
pub fn markdown_to_html(data: &[u8]) -> String {
    if data.is_empty() {
        return String::new();
    }

    let source = String::from_utf8_lossy(data);
    let parser = Parser::new_ext(&source, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Remove every `<...>` sequence from `html`.
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// Re-serialize JSON with two-space indentation, keeping key order.
///
/// Floats with no fractional part within the safe integer range are written
/// as integers (`1.0` -> `1`, `1e2` -> `100`).
pub fn json_to_text(data: &[u8]) -> Result<String, serde_json::Error> {
    let mut value: Value = serde_json::from_slice(data)?;
    integral_floats_to_integers(&mut value);
    serde_json::to_string_pretty(&value)
}

fn integral_floats_to_integers(value: &mut Value) {
    match value {
        Value::Number(n) => {
            let integral = n
                .as_f64()
                .filter(|f| n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER);
            if let Some(f) = integral {
                *n = Number::from(f as i64);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integral_floats_to_integers),
        Value::Object(map) => map.values_mut().for_each(integral_floats_to_integers),
        _ => {}
    }
}
