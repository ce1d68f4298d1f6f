// Sentence splitting and keyword windowing: a focused snippet around the
// first "sponsorship" mention plus a truncated full-text view, so a
// classifier gets tight context and a broader hint in the same call.
use regex::Regex;
use std::sync::LazyLock;

static KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(visa\s+sponsorship|sponsorship)\b").unwrap());

const MAX_FULL_CHARS: usize = 1600;

pub fn keyword_re() -> &'static Regex {
    &KEYWORD_RE
}

/// Splits on sentence-terminal punctuation followed by whitespace, or on
/// newlines. Blank fragments are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    let flush = |buf: &mut String, out: &mut Vec<String>| {
        let trimmed = buf.trim();
        if !trimmed.is_empty() {
            out.push(trimmed.to_string());
        }
        buf.clear();
    };

    while let Some(c) = chars.next() {
        if c == '\n' {
            flush(&mut current, &mut sentences);
            continue;
        }
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            flush(&mut current, &mut sentences);
        }
    }
    flush(&mut current, &mut sentences);
    sentences
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut t: String = text.chars().take(max).collect();
        t.push('…');
        t
    } else {
        text.to_string()
    }
}

/// Returns `(window, full_view)`. The window is up to 3 consecutive sentences
/// centred one-before to one-after the first sentence mentioning sponsorship;
/// with no mention it is the first up-to-3 sentences, and with no sentences at
/// all both halves are the truncated full text.
pub fn focus_window(text: &str) -> (String, String) {
    let sentences = split_sentences(text);
    let full_trunc = truncate_chars(text, MAX_FULL_CHARS);
    if sentences.is_empty() {
        return (full_trunc.clone(), full_trunc);
    }
    let idx = sentences.iter().position(|s| KEYWORD_RE.is_match(s));
    match idx {
        None => {
            let win = sentences[..sentences.len().min(3)].join(" ");
            (win, full_trunc)
        }
        Some(i) => {
            let start = i.saturating_sub(1);
            let end = (i + 2).min(sentences.len());
            (sentences[start..end].join(" "), full_trunc)
        }
    }
}
