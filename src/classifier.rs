use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PennyError, Result};

/// Zero-shot text classifier behind a fixed interface. Implementations
/// must return one of the provided labels or fail; they never invent a
/// label of their own.
pub trait Classifier {
    fn predict(&self, text: &str, labels: &[String]) -> Result<String>;

    fn predict_batch(&self, texts: &[String], labels: &[String]) -> Result<Vec<String>> {
        texts.iter().map(|t| self.predict(t, labels)).collect()
    }
}

/// Caller policy for offline runs: every prediction resolves to one
/// configured label (normally "Other"). Also the deterministic stub used
/// in tests.
pub struct FixedClassifier {
    label: String,
}

impl FixedClassifier {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
        }
    }
}

impl Classifier for FixedClassifier {
    fn predict(&self, _text: &str, labels: &[String]) -> Result<String> {
        if labels.iter().any(|l| l == &self.label) {
            Ok(self.label.clone())
        } else {
            Err(PennyError::InvalidLabel(self.label.clone()))
        }
    }
}

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

const PROMPT_TEMPLATE: &str = "You will be provided with the description of a bank transaction. \
Classify it as exactly one of the following categories: {categories}. \
Answer with the category name only, nothing else.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// GPT-backed classifier over the OpenAI chat completions API.
pub struct OpenAiClassifier {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl OpenAiClassifier {
    pub fn new(api_key: &str, model: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

impl Classifier for OpenAiClassifier {
    fn predict(&self, text: &str, labels: &[String]) -> Result<String> {
        let system = PROMPT_TEMPLATE.replace("{categories}", &labels.join(", "));
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: text.to_string(),
                },
            ],
            temperature: 0.0,
            max_tokens: 10,
        };

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;
        if !response.status().is_success() {
            return Err(PennyError::Classifier(format!(
                "API returned {}",
                response.status()
            )));
        }

        let parsed: ChatResponse = response.json()?;
        let raw = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| PennyError::Classifier("empty API response".to_string()))?;

        let label = clean_label(raw);
        if labels.iter().any(|l| l == &label) {
            Ok(label)
        } else {
            Err(PennyError::InvalidLabel(label))
        }
    }
}

/// The model occasionally answers "Category: Groceries" or wraps the label
/// in quotes despite the prompt. Strip that decoration before validating.
fn clean_label(raw: &str) -> String {
    let s = raw.trim();
    let s = s
        .strip_prefix("Category is:")
        .or_else(|| s.strip_prefix("Category:"))
        .unwrap_or(s);
    s.trim().trim_matches(|c| c == '"' || c == '.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_clean_label_plain() {
        assert_eq!(clean_label("Groceries"), "Groceries");
        assert_eq!(clean_label("  Groceries \n"), "Groceries");
    }

    #[test]
    fn test_clean_label_strips_decoration() {
        assert_eq!(clean_label("Category: Groceries"), "Groceries");
        assert_eq!(clean_label("Category is: Groceries"), "Groceries");
        assert_eq!(clean_label("\"Groceries\""), "Groceries");
        assert_eq!(clean_label("Groceries."), "Groceries");
    }

    #[test]
    fn test_fixed_classifier_returns_label() {
        let classifier = FixedClassifier::new("Other");
        let result = classifier
            .predict("Some Transaction", &labels(&["Groceries", "Other"]))
            .unwrap();
        assert_eq!(result, "Other");
    }

    #[test]
    fn test_fixed_classifier_rejects_unknown_label() {
        let classifier = FixedClassifier::new("Misc");
        let err = classifier
            .predict("Some Transaction", &labels(&["Groceries", "Other"]))
            .unwrap_err();
        assert!(matches!(err, PennyError::InvalidLabel(_)));
    }

    #[test]
    fn test_predict_batch_maps_each_text() {
        let classifier = FixedClassifier::new("Other");
        let texts = vec!["One".to_string(), "Two".to_string()];
        let result = classifier
            .predict_batch(&texts, &labels(&["Groceries", "Other"]))
            .unwrap();
        assert_eq!(result, vec!["Other", "Other"]);
    }
}
