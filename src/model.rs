// Core types: Record map, typed field views, Label, per-boundary errors.
use serde_json::{Map, Value};
use thiserror::Error;

/// One job-posting record. Arbitrary keys are preserved verbatim; the
/// pipeline only ever inserts into a clone, never mutates the original.
pub type Record = Map<String, Value>;

/// Sponsorship classification. Absence of signal defaults to `Maybe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Yes,
    No,
    Maybe,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Yes => "YES",
            Label::No => "No",
            Label::Maybe => "Maybe",
        }
    }
}

/// Read-only accessor layer over the schema-free record map.
pub struct RecordView<'a> {
    rec: &'a Record,
}

impl<'a> RecordView<'a> {
    pub fn new(rec: &'a Record) -> Self {
        Self { rec }
    }

    fn first_string(&self, keys: &[&str]) -> String {
        for k in keys {
            if let Some(Value::String(s)) = self.rec.get(*k) {
                if !s.trim().is_empty() {
                    return s.trim().to_string();
                }
            }
        }
        String::new()
    }

    pub fn title(&self) -> String {
        self.first_string(&["job_title", "title"])
    }

    pub fn company(&self) -> String {
        self.first_string(&["company_name", "employer"])
    }

    /// Some upstream feeds carry the misspelled key, so both are accepted.
    pub fn salary_formatted(&self) -> String {
        self.first_string(&["salary_formatted", "salary_fomratted"])
    }

    pub fn location(&self) -> String {
        self.rec
            .get("discovery_input")
            .and_then(Value::as_object)
            .and_then(|di| di.get("location"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_string()
    }

    /// A generic URL field that may double as an application link.
    pub fn generic_url(&self) -> Option<String> {
        for k in ["url", "job_url", "link"] {
            if let Some(Value::String(s)) = self.rec.get(k) {
                if !s.trim().is_empty() {
                    return Some(s.clone());
                }
            }
        }
        None
    }
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("llm endpoint returned status {0}")]
    Status(u16),
    #[error("malformed llm response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search endpoint returned status {0}")]
    Status(u16),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}: expected a JSON array of objects or JSONL")]
    InvalidShape(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SEARCH_SLEEP_SEC must be a number, got {0:?}")]
    InvalidSleep(String),
}
