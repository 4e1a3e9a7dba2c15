//! Client for the hosted text-generation service.
//!
//! The service speaks the OpenAI-compatible chat completions protocol (Groq by
//! default). One blocking request is made per plan; failures come back as a
//! typed [`GenerationError`] and never as text mixed into the plan.

use serde::{Deserialize, Serialize};

use super::PlanPrompt;
use crate::config::ServiceSettings;
use crate::http_client;

const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Something that can turn a prompt into plan text.
pub trait PlanService: Send + Sync {
    fn generate(&self, prompt: &PlanPrompt, api_key: &str) -> Result<String, GenerationError>;
}

/// Why a plan could not be generated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("API key is missing")]
    MissingCredential,
    #[error("API key was rejected: {0}")]
    InvalidCredential(String),
    #[error("Rate limited by the service: {0}")]
    RateLimited(String),
    #[error("Service error: {0}")]
    Server(String),
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Response(String),
}

impl GenerationError {
    pub fn is_credential_problem(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::InvalidCredential(_))
    }

    /// Message shown to the user in the blocking error banner.
    pub fn user_message(&self) -> String {
        if self.is_credential_problem() {
            "Credential missing or rejected: paste a valid API key in the sidebar.".to_string()
        } else {
            format!("Could not generate a plan: {self}")
        }
    }
}

/// Blocking chat completions client configured from [`ServiceSettings`].
#[derive(Clone, Debug)]
pub struct ChatCompletionsClient {
    endpoint: String,
    model: String,
    temperature: f32,
    max_response_bytes: usize,
}

impl ChatCompletionsClient {
    pub fn new(settings: &ServiceSettings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_response_bytes: settings.max_response_bytes,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponseWire {
    #[serde(default)]
    choices: Vec<ChoiceWire>,
    error: Option<ErrorWire>,
}

#[derive(Deserialize)]
struct ChoiceWire {
    message: Option<MessageWire>,
}

#[derive(Deserialize)]
struct MessageWire {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorWire>,
}

#[derive(Deserialize)]
struct ErrorWire {
    message: Option<String>,
}

impl PlanService for ChatCompletionsClient {
    fn generate(&self, prompt: &PlanPrompt, api_key: &str) -> Result<String, GenerationError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(GenerationError::MissingCredential);
        }
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };
        tracing::info!(model = %self.model, "Requesting study plan");
        let req = http_client::agent()
            .post(&self.endpoint)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json")
            .set("Authorization", &format!("Bearer {api_key}"));

        let response = match req.send_json(&request) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = http_client::read_response_text(response, MAX_ERROR_BODY_BYTES)
                    .unwrap_or_else(|err| err.to_string());
                let err = map_status_error(code, &body);
                tracing::warn!(code, "Plan request failed: {err}");
                return Err(err);
            }
            Err(ureq::Error::Transport(err)) => {
                tracing::warn!("Plan request transport failure: {err}");
                return Err(GenerationError::Transport(err.to_string()));
            }
        };

        let body = http_client::read_response_text(response, self.max_response_bytes)
            .map_err(|err| GenerationError::Response(err.to_string()))?;
        let plan = parse_chat_response(&body)?;
        tracing::info!(chars = plan.len(), "Study plan received");
        Ok(plan)
    }
}

fn map_status_error(code: u16, body: &str) -> GenerationError {
    let detail = error_detail(body);
    match code {
        401 | 403 => GenerationError::InvalidCredential(detail),
        429 => GenerationError::RateLimited(detail),
        500..=599 => GenerationError::Server(format!("HTTP {code}: {detail}")),
        _ => GenerationError::Transport(format!("HTTP {code}: {detail}")),
    }
}

fn error_detail(body: &str) -> String {
    let trimmed = body.trim();
    serde_json::from_str::<ErrorEnvelope>(trimmed)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .unwrap_or_else(|| trimmed.to_string())
}

fn parse_chat_response(body: &str) -> Result<String, GenerationError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::Response("Empty response body".to_string()));
    }
    let parsed: ChatResponseWire = serde_json::from_str(trimmed)
        .map_err(|err| GenerationError::Response(err.to_string()))?;
    if let Some(message) = parsed.error.and_then(|error| error.message) {
        return Err(GenerationError::Server(message));
    }
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| {
            GenerationError::Response("Missing choices[0].message.content".to_string())
        })?;
    if content.trim().is_empty() {
        return Err(GenerationError::Response("Service returned an empty plan".to_string()));
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::test_server::serve_once;

    fn prompt() -> PlanPrompt {
        PlanPrompt {
            system: "system text".to_string(),
            user: "user text".to_string(),
        }
    }

    fn client_for(base_url: &str) -> ChatCompletionsClient {
        ChatCompletionsClient::new(&ServiceSettings {
            endpoint: format!("{base_url}/openai/v1/chat/completions"),
            ..ServiceSettings::default()
        })
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn blank_key_fails_without_network() {
        let client = client_for("http://127.0.0.1:9");
        let err = client.generate(&prompt(), "   ").unwrap_err();
        assert_eq!(err, GenerationError::MissingCredential);
        assert!(err.is_credential_problem());
    }

    #[test]
    fn returns_message_content_verbatim() {
        let body = concat!(
            r#"{"choices":[{"message":{"role":"assistant","#,
            r###""content":"## Topics\n| Level | Topic |"}}]}"###,
        );
        let (url, requests) = serve_once(http_response("200 OK", body));
        let plan = client_for(&url).generate(&prompt(), "gsk_test").unwrap();
        assert_eq!(plan, "## Topics\n| Level | Topic |");

        let request = requests.recv().unwrap();
        assert!(request.starts_with("POST /openai/v1/chat/completions"));
        assert!(request.contains("Bearer gsk_test"));
        assert!(request.contains(r#""role":"system""#));
        assert!(request.contains(r#""content":"user text""#));
        assert!(request.contains(r#""model":"openai/gpt-oss-120b""#));
    }

    #[test]
    fn plan_text_starting_with_error_word_is_still_a_plan() {
        let body = r#"{"choices":[{"message":{"content":"ERROR analysis drills come first."}}]}"#;
        let (url, _requests) = serve_once(http_response("200 OK", body));
        let plan = client_for(&url).generate(&prompt(), "gsk_test").unwrap();
        assert_eq!(plan, "ERROR analysis drills come first.");
    }

    #[test]
    fn unauthorized_maps_to_invalid_credential() {
        let body = r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
        let (url, _requests) = serve_once(http_response("401 Unauthorized", body));
        let err = client_for(&url).generate(&prompt(), "bad").unwrap_err();
        assert_eq!(err, GenerationError::InvalidCredential("Invalid API Key".to_string()));
        assert!(err.user_message().starts_with("Credential missing"));
    }

    #[test]
    fn server_and_rate_limit_statuses_are_distinguished() {
        let (url, _requests) = serve_once(http_response("429 Too Many Requests", "{}"));
        let err = client_for(&url).generate(&prompt(), "key").unwrap_err();
        assert!(matches!(err, GenerationError::RateLimited(_)));

        let (url, _requests) = serve_once(http_response("503 Service Unavailable", "overloaded"));
        let err = client_for(&url).generate(&prompt(), "key").unwrap_err();
        assert_eq!(err, GenerationError::Server("HTTP 503: overloaded".to_string()));
        assert!(!err.is_credential_problem());
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = client_for(&format!("http://{addr}"))
            .generate(&prompt(), "key")
            .unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
    }

    #[test]
    fn malformed_payloads_are_response_errors() {
        assert!(matches!(
            parse_chat_response(""),
            Err(GenerationError::Response(_))
        ));
        assert!(matches!(
            parse_chat_response(r#"{"choices":[]}"#),
            Err(GenerationError::Response(_))
        ));
        assert!(matches!(
            parse_chat_response(r#"{"choices":[{"message":{"content":"  "}}]}"#),
            Err(GenerationError::Response(_))
        ));
        assert_eq!(
            parse_chat_response(r#"{"error":{"message":"model decommissioned"}}"#),
            Err(GenerationError::Server("model decommissioned".to_string()))
        );
    }
}
