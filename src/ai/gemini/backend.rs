use super::client::GeminiHttpClient;
use crate::ai::GenerationBackend;
use crate::models::{ChatParams, ContentUnit, GenerationRequest, Role, Turn};
use crate::schema::Schema;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Gemini content container used in both requests and responses.
#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

/// Untagged union of text and inline media content parts.
///
/// Variant order matters for `#[serde(untagged)]` decoding.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Base64 inline payload used for PDF pass-through.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Schema>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

pub struct GeminiBackend {
    http: GeminiHttpClient,
}

impl GeminiBackend {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(30),
                client,
            ),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn system_instruction(text: &str) -> Content {
        Content {
            role: None,
            parts: vec![Part::Text {
                text: text.to_string(),
            }],
        }
    }

    fn part_from_unit(unit: &ContentUnit) -> Part {
        match unit {
            ContentUnit::Text { value } => Part::Text {
                text: value.clone(),
            },
            ContentUnit::Binary { mime_type, data } => Part::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.clone(),
                    data: data.clone(),
                },
            },
        }
    }

    fn content_from_turn(turn: &Turn) -> Content {
        let role = match turn.role {
            Role::User => "user",
            Role::Model => "model",
        };
        Content {
            role: Some(role.to_string()),
            parts: turn.parts.iter().map(Self::part_from_unit).collect(),
        }
    }

    fn generation_config(temperature: Option<f32>, schema: Option<&Schema>) -> GenerationConfig {
        GenerationConfig {
            temperature,
            response_mime_type: schema.map(|_| "application/json".to_string()),
            response_schema: schema.cloned(),
        }
    }

    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        response.candidates.first().and_then(|c| {
            c.content.parts.iter().find_map(|p| match p {
                Part::Text { text } => Some(text.clone()),
                Part::InlineData { .. } => None,
            })
        })
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>> {
        tracing::debug!(
            model = self.http.model(),
            structured = request.schema.is_some(),
            "Sending generateContent request to Gemini"
        );

        let wire_request = GenerateContentRequest {
            system_instruction: Self::system_instruction(&request.system_instruction),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Self::part_from_unit(&request.document),
                    Part::Text {
                        text: request.context.clone(),
                    },
                ],
            }],
            generation_config: Some(Self::generation_config(
                request.temperature,
                request.schema.as_ref(),
            )),
        };

        let response: GenerateContentResponse = self.http.generate_content(&wire_request).await?;
        Ok(Self::extract_text(&response))
    }

    async fn chat_turn(&self, params: &ChatParams, history: &[Turn]) -> Result<Option<String>> {
        tracing::debug!(
            model = self.http.model(),
            turns = history.len(),
            "Sending chat turn to Gemini"
        );

        let wire_request = GenerateContentRequest {
            system_instruction: Self::system_instruction(&params.system_instruction),
            contents: history.iter().map(Self::content_from_turn).collect(),
            generation_config: Some(Self::generation_config(params.temperature, None)),
        };

        let response: GenerateContentResponse = self.http.generate_content(&wire_request).await?;
        Ok(Self::extract_text(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose;
    use crate::schema;
    use crate::Error;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash";
    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn make_backend(server: &MockServer) -> GeminiBackend {
        GeminiBackend::new("test-key".to_string(), DEFAULT_MODEL.to_string())
            .with_base_url(server.uri())
    }

    fn analysis_request() -> GenerationRequest {
        compose::compose(
            "You are a resume strategist.",
            None,
            ContentUnit::Binary {
                mime_type: "application/pdf".to_string(),
                data: "JVBERg==".to_string(),
            },
            compose::analysis_context("Backend engineer with Go experience"),
            Some(schema::analysis_schema()),
        )
    }

    fn text_response(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": text }]
                }
            }]
        }))
    }

    #[tokio::test]
    async fn test_generate_sends_structured_mode_and_returns_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(body_string_contains("\"responseSchema\""))
            .and(body_string_contains("\"responseMimeType\":\"application/json\""))
            .and(body_string_contains("\"inlineData\""))
            .respond_with(text_response("{\"matchScore\": 72}"))
            .expect(1)
            .mount(&server)
            .await;

        let backend = make_backend(&server);
        let text = backend.generate(&analysis_request()).await.unwrap();
        assert_eq!(text.as_deref(), Some("{\"matchScore\": 72}"));
    }

    #[tokio::test]
    async fn test_generate_without_schema_omits_structured_mode() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(text_response("free-form text"))
            .expect(1)
            .mount(&server)
            .await;

        let backend = make_backend(&server);
        let request = compose::compose(
            "system",
            Some(0.7),
            ContentUnit::text("doc"),
            "context",
            None,
        );
        let text = backend.generate(&request).await.unwrap();
        assert_eq!(text.as_deref(), Some("free-form text"));

        let body = &server.received_requests().await.unwrap()[0].body;
        let body = String::from_utf8_lossy(body);
        assert!(!body.contains("responseSchema"));
        assert!(body.contains("\"temperature\":0.7"));
    }

    #[tokio::test]
    async fn test_api_error_returns_backend_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let backend = make_backend(&server);
        let err = backend.generate(&analysis_request()).await.unwrap_err();
        assert!(matches!(err, Error::BackendUnavailable(_)));
    }

    #[tokio::test]
    async fn test_empty_candidates_yield_no_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": []
            })))
            .mount(&server)
            .await;

        let backend = make_backend(&server);
        let text = backend.generate(&analysis_request()).await.unwrap();
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn test_chat_turn_posts_full_history_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(body_string_contains("\"role\":\"user\""))
            .and(body_string_contains("\"role\":\"model\""))
            .respond_with(text_response("As the candidate, I would say..."))
            .expect(1)
            .mount(&server)
            .await;

        let backend = make_backend(&server);
        let params = ChatParams {
            system_instruction: "You are an interview coach.".to_string(),
            temperature: Some(0.7),
        };
        let history = vec![
            Turn::user(vec![ContentUnit::text("Tell me about yourself")]),
            Turn::model("I am a backend engineer."),
            Turn::user(vec![ContentUnit::text("Why Go?")]),
        ];

        let text = backend.chat_turn(&params, &history).await.unwrap();
        assert_eq!(text.as_deref(), Some("As the candidate, I would say..."));

        let body = &server.received_requests().await.unwrap()[0].body;
        let body = String::from_utf8_lossy(body);
        let user_pos = body.find("Tell me about yourself").unwrap();
        let model_pos = body.find("I am a backend engineer.").unwrap();
        let last_pos = body.find("Why Go?").unwrap();
        assert!(user_pos < model_pos && model_pos < last_pos);
    }

    #[tokio::test]
    async fn test_models_prefix_is_stripped_from_model_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(text_response("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let backend =
            GeminiBackend::new("test-key".to_string(), "models/gemini-2.5-flash".to_string())
                .with_base_url(server.uri());

        backend.generate(&analysis_request()).await.unwrap();
    }
}
