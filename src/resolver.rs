// Two-tier resolution of the description field across inconsistent schemas.
// Real-world batches mix key names per source, so the key is tallied once per
// batch and reused for every record.
use crate::model::Record;
use crate::normalizer::clean_text;
use serde_json::Value;
use std::collections::HashMap;

/// Canonical description field names, checked as exact keys first.
pub const CANDIDATE_KEYS: &[&str] = &[
    "description_text",
    "description",
    "job_description",
    "job_desc",
    "jobDescription",
    "details",
    "content",
    "job_description_formatted",
    "job_description_html",
    "job_description_long",
    "job_details",
    "summary",
];

const SAMPLE_LIMIT: usize = 250;
const PRIMARY_KEY: &str = "description_text";

/// Highest count wins; ties break lexically.
fn most_frequent(counts: HashMap<String, usize>) -> Option<String> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().next().map(|(k, _)| k)
}

/// Tallies candidate keys over the first records of a batch. Falls back to a
/// case-insensitive scan for any key containing "description"; `None` means
/// per-record best-effort extraction takes over.
pub fn detect_desc_key(records: &[Record]) -> Option<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for rec in records.iter().take(SAMPLE_LIMIT) {
        for k in CANDIDATE_KEYS {
            if rec.contains_key(*k) {
                *counts.entry((*k).to_string()).or_default() += 1;
            }
        }
    }
    if !counts.is_empty() {
        if counts.contains_key(PRIMARY_KEY) {
            return Some(PRIMARY_KEY.to_string());
        }
        return most_frequent(counts);
    }

    let mut adhoc: HashMap<String, usize> = HashMap::new();
    for rec in records.iter().take(SAMPLE_LIMIT) {
        for k in rec.keys() {
            if k.to_lowercase().contains("description") {
                *adhoc.entry(k.clone()).or_default() += 1;
            }
        }
    }
    most_frequent(adhoc)
}

/// Extracts and cleans the description for one record: the resolved key when
/// it holds a string, else the first candidate key with non-blank string
/// content, else empty.
pub fn extract_text(rec: &Record, desc_key: Option<&str>) -> String {
    if let Some(key) = desc_key {
        if let Some(v @ Value::String(_)) = rec.get(key) {
            return clean_text(v);
        }
    }
    for k in CANDIDATE_KEYS {
        if let Some(v @ Value::String(s)) = rec.get(*k) {
            if !s.trim().is_empty() {
                return clean_text(v);
            }
        }
    }
    String::new()
}
