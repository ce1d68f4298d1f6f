// Classifier module: layered label decision — LLM first, regex rules as the
// always-available fallback tier.

pub mod llm;
pub mod patterns;
pub mod rules;

pub use llm::LlmClassifier;
