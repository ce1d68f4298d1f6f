// Best-effort text cleanup for raw description fields. Not an HTML parser:
// entities are decoded and tag-like runs stripped, nothing more.
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Coerces any JSON value to a cleaned string: decode HTML entities, replace
/// `<...>` runs with a space when angle brackets are present, collapse
/// whitespace, trim. Null becomes the empty string.
pub fn clean_text(raw: &Value) -> String {
    let text = match raw {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let mut t = html_escape::decode_html_entities(&text).into_owned();
    if t.contains('<') && t.contains('>') {
        t = TAG_RE.replace_all(&t, " ").into_owned();
    }
    WS_RE.replace_all(&t, " ").trim().to_string()
}
