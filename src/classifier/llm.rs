// Chat-completion classifier. Sends the job title plus the focused window and
// a broader context hint, and expects a strict JSON object back. Any failure
// here is a typed error; the caller falls back to the rule classifier.
use crate::model::{ClassifyError, Label};
use crate::window::truncate_chars;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::warn;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const LLM_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str = "You are a precise classifier for job ads. Decide if the role offers visa sponsorship.\n\
Consider BOTH the job title and the description. If the title implies sponsorship (e.g., 'Tier 2 Visa Sponsorship'), that is strong evidence.\n\
Output strictly JSON with keys: label (one of YES, No, Maybe) and rationale (<=20 words).\n\
Decision policy (apply in this order):\n\
1) Negative language like 'no sponsorship', 'cannot sponsor', or 'right to work without sponsorship' => 'No'.\n\
2) Explicit, unqualified 'visa sponsorship available/provided/offered' => 'YES'.\n\
3) Conditional or unclear ('may consider', 'case by case', 'subject to', 'depending on') => 'Maybe'.\n\
If inconclusive, return 'Maybe'. Keep answers terse.";

pub struct LlmClassifier {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl LlmClassifier {
    pub fn new(api_key: Option<String>, model: String) -> Self {
        let client = Client::builder()
            .timeout(LLM_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            api_key,
            model,
        }
    }

    /// Classifies one posting. Errors immediately when no credential is
    /// configured so the rule fallback can take over without a network call.
    pub async fn classify(
        &self,
        title: &str,
        window: &str,
        full_context: &str,
    ) -> Result<(Label, String), ClassifyError> {
        let api_key = self.api_key.as_deref().ok_or(ClassifyError::MissingApiKey)?;

        let user_content = json!({
            "job_title": truncate_chars(title, 200),
            "focused_window": truncate_chars(window, 2000),
            "full_context_hint": truncate_chars(full_context, 2000),
        });
        let payload = json!({
            "model": self.model,
            "temperature": 0,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user_content.to_string()},
            ],
        });

        let response = self
            .client
            .post(OPENAI_URL)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown".into());
            warn!("LLM endpoint responded [{}]: {}", status, body);
            return Err(ClassifyError::Status(status.as_u16()));
        }

        let data: Value = response.json().await?;
        let content = data["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ClassifyError::MalformedResponse("missing message content".into()))?;
        let obj: Value = serde_json::from_str(content)
            .map_err(|e| ClassifyError::MalformedResponse(e.to_string()))?;

        let raw_label = obj
            .get("label")
            .and_then(Value::as_str)
            .unwrap_or("Maybe")
            .trim()
            .to_string();
        let rationale = obj
            .get("rationale")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_string();

        Ok((normalize_label(&raw_label), rationale))
    }
}

/// Anything other than an exact YES/NO (case-insensitive) becomes Maybe.
fn normalize_label(raw: &str) -> Label {
    match raw.to_uppercase().as_str() {
        "YES" => Label::Yes,
        "NO" => Label::No,
        _ => Label::Maybe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_normalization_is_strict() {
        assert_eq!(normalize_label("yes"), Label::Yes);
        assert_eq!(normalize_label("No"), Label::No);
        assert_eq!(normalize_label("NO"), Label::No);
        assert_eq!(normalize_label("Probably"), Label::Maybe);
        assert_eq!(normalize_label(""), Label::Maybe);
    }

    #[tokio::test]
    async fn missing_credential_is_an_immediate_error() {
        let classifier = LlmClassifier::new(None, "gpt-4o-mini".into());
        let err = classifier.classify("title", "window", "full").await;
        assert!(matches!(err, Err(ClassifyError::MissingApiKey)));
    }
}
