use std::{
    env,
    time::Duration,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::json;

use super::{
    CardSource,
    FetchRequest,
};
use crate::{
    cards::{
        Card,
        Category,
    },
    core::TorchLearnError,
};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const SYSTEM_INSTRUCTION: &str = "You are a deep learning tutor who knows PyTorch inside out. \
Generate educational flashcards about PyTorch functions. The code example must be correct, \
idiomatic and runnable, and must not contain its output as comments. Put the console output \
the example prints (tensor values or shapes) in the separate `output` field so a beginner can \
follow the data flow from the code and its output alone.";

/// Looks up the Gemini API key: runtime environment first, then a key
/// substituted at build time.
pub fn api_key_from_env() -> Option<String> {
    ["GEMINI_API_KEY", "API_KEY"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .chain(option_env!("API_KEY").map(str::to_string))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Generates cards with the Gemini `generateContent` endpoint using a JSON
/// response schema.
pub struct GeminiSource {
    client: Client,
    config: GeminiConfig,
}

impl GeminiSource {
    pub fn new(config: GeminiConfig) -> Result<Self, TorchLearnError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TorchLearnError::Custom(format!("HTTP client build failed: {e}")))?;

        Ok(Self { client, config })
    }

    async fn generate(&self, request: &FetchRequest) -> Result<String, TorchLearnError> {
        let api_key = self.config.api_key.as_deref().ok_or(TorchLearnError::MissingApiKey)?;
        let url = format!("{API_BASE}/models/{}:generateContent", self.config.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(request, self.config.temperature))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(TorchLearnError::Api { status: status.as_u16(), message });
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        parsed
            .candidates
            .into_iter()
            .flat_map(|candidate| candidate.content.parts)
            .map(|part| part.text)
            .find(|text| !text.trim().is_empty())
            .ok_or(TorchLearnError::EmptyResponse)
    }
}

#[async_trait]
impl CardSource for GeminiSource {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn fetch(&self, request: FetchRequest) -> Result<Vec<Card>, TorchLearnError> {
        log::debug!(
            "Requesting {} card(s) from {} (category: {}, search: {:?}, seen: {})",
            request.count,
            self.config.model,
            request.category,
            request.search_query,
            request.seen.len()
        );

        let text = self.generate(&request).await?;
        let cards = parse_cards(&text)?;
        let received = cards.len();
        let admitted = request.admit(cards);

        if admitted.len() < received {
            log::debug!("Dropped {} generated card(s) outside the request", received - admitted.len());
        }

        Ok(admitted)
    }
}

/// Parses the model's JSON text into cards. Any missing field or unknown
/// enum value fails the whole response.
pub fn parse_cards(text: &str) -> Result<Vec<Card>, TorchLearnError> {
    Ok(serde_json::from_str(strip_code_fence(text))?)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

fn prompt(request: &FetchRequest) -> String {
    if request.is_search() {
        let query = &request.search_query;
        return format!(
            "Generate 1 flashcard about the PyTorch function \"{query}\". If \"{query}\" is not \
             an exact function name, pick the closest or most relevant standard PyTorch \
             function. Return a JSON array."
        );
    }

    let seen = serde_json::to_string(&request.seen).unwrap_or_else(|_| "[]".to_string());
    let category = if request.category.is_all() {
        "Mix functions from different categories, starting with the fundamentals when nothing \
         has been learned yet."
            .to_string()
    } else {
        format!("Only generate functions in the \"{}\" category.", request.category)
    };

    format!(
        "Generate {} different PyTorch function flashcards. Do not include these functions the \
         user has already learned: {seen}. {category} Prefer functions commonly used in research \
         and industry. Return a JSON array.",
        request.count
    )
}

fn response_schema() -> serde_json::Value {
    let categories: Vec<&str> = Category::ALL_CATEGORIES
        .iter()
        .filter(|category| !category.is_all())
        .map(Category::label)
        .collect();

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING", "description": "PyTorch function name, e.g. torch.tensor or torch.nn.Linear." },
                "signature": { "type": "STRING", "description": "Typical function signature." },
                "category": { "type": "STRING", "enum": categories },
                "description": { "type": "STRING", "description": "One sentence describing what it does." },
                "codeExample": { "type": "STRING", "description": "A correct, runnable Python example without output comments." },
                "output": { "type": "STRING", "description": "Console output of the example, showing tensor shapes and values." },
                "difficulty": { "type": "STRING", "enum": ["Beginner", "Intermediate", "Advanced"] }
            },
            "required": ["name", "signature", "category", "description", "codeExample", "output", "difficulty"]
        }
    })
}

fn request_body(request: &FetchRequest, temperature: f32) -> serde_json::Value {
    json!({
        "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
        "contents": [{ "role": "user", "parts": [{ "text": prompt(request) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
            "temperature": temperature,
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Difficulty;

    const PAYLOAD: &str = r#"[{
        "name": "torch.nn.Linear",
        "signature": "torch.nn.Linear(in_features, out_features, bias=True)",
        "category": "Neural Networks",
        "description": "Applies a linear transformation.",
        "codeExample": "import torch.nn as nn",
        "output": "torch.Size([128, 30])",
        "difficulty": "Beginner"
    }]"#;

    fn config(api_key: Option<&str>) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.map(str::to_string),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_parse_cards() {
        let cards = parse_cards(PAYLOAD).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].category, Category::NeuralNetworks);
        assert_eq!(cards[0].difficulty, Difficulty::Beginner);

        let fenced = format!("```json\n{PAYLOAD}\n```");
        assert_eq!(parse_cards(&fenced).unwrap(), cards);
    }

    #[test]
    fn test_malformed_cards_are_errors() {
        let missing = PAYLOAD.replace("\"signature\": \"torch.nn.Linear(in_features, out_features, bias=True)\",", "");
        assert!(matches!(parse_cards(&missing), Err(TorchLearnError::Json(_))));
        assert!(parse_cards("not json").is_err());
        assert!(parse_cards(r#"{"name": "torch.nn.Linear"}"#).is_err());
    }

    #[test]
    fn test_generate_response_extraction() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": PAYLOAD }] } }]
        });
        let parsed: GenerateResponse = serde_json::from_value(body).unwrap();
        let text = &parsed.candidates[0].content.parts[0].text;
        assert_eq!(parse_cards(text).unwrap()[0].name, "torch.nn.Linear");

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.candidates.is_empty());
    }

    #[test]
    fn test_prompt_modes() {
        let search = prompt(&FetchRequest::search("Conv2d", 1, Category::Math));
        assert!(search.contains("\"Conv2d\""));
        assert!(!search.contains("category"));

        let browse = prompt(&FetchRequest::browse(
            vec!["torch.zeros".into()],
            3,
            Category::Optimization,
        ));
        assert!(browse.contains("Generate 3"));
        assert!(browse.contains("[\"torch.zeros\"]"));
        assert!(browse.contains("\"Optimization\""));
    }

    #[test]
    fn test_schema_lists_card_categories() {
        let schema = response_schema();
        let categories = schema["items"]["properties"]["category"]["enum"].as_array().unwrap();
        assert_eq!(categories.len(), 6);
        assert!(!categories.iter().any(|c| c == "All"));
        assert_eq!(schema["items"]["required"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_network() {
        let source = GeminiSource::new(config(None)).unwrap();
        let result = source.fetch(FetchRequest::browse(Vec::new(), 3, Category::All)).await;
        assert!(matches!(result, Err(TorchLearnError::MissingApiKey)));
    }
}
