//! Client for the analysis/chat service.
//!
//! `POST /analyze` takes the photo as multipart field `image` and answers
//! with one of:
//!
//! - `{"result": "NO INJURIES"}` when nothing treatable is visible
//! - `{"error": "..."}` when a pipeline step failed (still HTTP 200)
//! - the full diagnosis document
//!
//! `POST /chat` takes `{"message", "context"}` and answers `{"reply"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use url::Url;

use crate::capture::PhotoHandle;
use crate::error::{BackendError, Result};
use crate::storage::BackendConfig;

const NO_FINDINGS_MARKER: &str = "NO INJURIES";

/// Full analysis of a photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub description: String,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub relevant_links: Vec<String>,
    #[serde(default)]
    pub page_contents: BTreeMap<String, Option<String>>,
    pub diagnosis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosisResult {
    /// Nothing treatable was found in the photo.
    NoFindings,
    Diagnosis(Diagnosis),
}

impl DiagnosisResult {
    /// One-paragraph summary for the chat transcript.
    pub fn summary(&self) -> String {
        match self {
            DiagnosisResult::NoFindings => {
                "I couldn't find any injuries or treatable conditions in that photo.".to_string()
            }
            DiagnosisResult::Diagnosis(d) => d.diagnosis.clone(),
        }
    }
}

/// Decode an `/analyze` response body.
pub fn parse_analysis(body: Value) -> Result<DiagnosisResult, BackendError> {
    if let Some(err) = body.get("error") {
        let message = err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string());
        return Err(BackendError::Service(message));
    }
    if body.get("result").and_then(Value::as_str) == Some(NO_FINDINGS_MARKER) {
        return Ok(DiagnosisResult::NoFindings);
    }
    serde_json::from_value(body)
        .map(DiagnosisResult::Diagnosis)
        .map_err(|e| BackendError::Decode(e.to_string()))
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    context: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    reply: String,
}

/// Remote analysis and chat.
#[allow(async_fn_in_trait)]
pub trait AssistantBackend {
    async fn analyze(&self, photo: &PhotoHandle) -> Result<DiagnosisResult>;
    async fn chat(&self, message: &str, context: &str) -> Result<String>;
}

/// HTTP client for the analysis service.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(base_url)?;
        // `Url::join` replaces the last path segment unless it ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::new(&config.base_url, config.timeout())
    }

    fn endpoint(&self, name: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(name)?)
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value, BackendError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

impl AssistantBackend for HttpBackend {
    async fn analyze(&self, photo: &PhotoHandle) -> Result<DiagnosisResult> {
        let bytes = photo.read_bytes()?;
        let url = self.endpoint("analyze")?;
        tracing::info!(%url, bytes = bytes.len(), "sending photo for analysis");

        let part = Part::bytes(bytes)
            .file_name(photo.file_name())
            .mime_str(&photo.mime)
            .map_err(BackendError::from)?;
        let form = Form::new().part("image", part);

        let resp = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(BackendError::from)?;
        let body = Self::read_json(resp).await?;
        let result = parse_analysis(body)?;
        tracing::debug!(no_findings = matches!(result, DiagnosisResult::NoFindings), "analysis received");
        Ok(result)
    }

    async fn chat(&self, message: &str, context: &str) -> Result<String> {
        let url = self.endpoint("chat")?;
        tracing::debug!(%url, "sending chat message");
        let resp = self
            .client
            .post(url)
            .json(&ChatRequest { message, context })
            .send()
            .await
            .map_err(BackendError::from)?;
        let body = Self::read_json(resp).await?;
        let reply: ChatResponse =
            serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(reply.reply)
    }
}

/// Offline stand-in that answers from a fixed script.
#[derive(Debug)]
pub struct SimulatedBackend {
    replies: Vec<String>,
    next: AtomicUsize,
}

impl SimulatedBackend {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies,
            next: AtomicUsize::new(0),
        }
    }

    /// Continue the script as if `turns` replies had already been given.
    pub fn resume_at(self, turns: usize) -> Self {
        self.next.store(turns, Ordering::Relaxed);
        self
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(vec![
            "Thanks, I've noted that. Keep the area clean and watch for redness, swelling or warmth.".into(),
            "If the pain gets worse or you develop a fever, please see a doctor.".into(),
            "You can add a reminder for dressing changes or medication from the calendar tab.".into(),
        ])
    }
}

impl AssistantBackend for SimulatedBackend {
    async fn analyze(&self, _photo: &PhotoHandle) -> Result<DiagnosisResult> {
        Err(BackendError::NotConfigured("photo analysis needs the remote service".into()).into())
    }

    async fn chat(&self, _message: &str, _context: &str) -> Result<String> {
        if self.replies.is_empty() {
            return Err(BackendError::NotConfigured("simulated assistant has no replies".into()).into());
        }
        let i = self.next.fetch_add(1, Ordering::Relaxed) % self.replies.len();
        Ok(self.replies[i].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_no_findings() {
        let result = parse_analysis(json!({"result": "NO INJURIES"})).unwrap();
        assert_eq!(result, DiagnosisResult::NoFindings);
    }

    #[test]
    fn parse_service_error() {
        let err = parse_analysis(json!({"error": "Error opening image: bad"})).unwrap_err();
        assert!(matches!(err, BackendError::Service(ref m) if m == "Error opening image: bad"));
    }

    #[test]
    fn parse_full_diagnosis() {
        let result = parse_analysis(json!({
            "description": "Purple bruise on the forearm",
            "search_query": "forearm bruise treatment",
            "relevant_links": ["https://example.org/bruise"],
            "page_contents": {"https://example.org/bruise": "Apply ice", "https://example.org/x": null},
            "diagnosis": "Minor contusion. Rest, ice, compression."
        }))
        .unwrap();
        let DiagnosisResult::Diagnosis(d) = result else {
            panic!("expected a diagnosis");
        };
        assert_eq!(d.relevant_links.len(), 1);
        assert_eq!(d.page_contents["https://example.org/x"], None);
        assert!(d.diagnosis.starts_with("Minor contusion"));
    }

    #[test]
    fn parse_rejects_unexpected_shape() {
        assert!(matches!(
            parse_analysis(json!({"result": "maybe"})),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn base_url_keeps_path_prefix() {
        let backend = HttpBackend::new("http://example.org/api", Duration::from_secs(1)).unwrap();
        assert_eq!(
            backend.endpoint("chat").unwrap().as_str(),
            "http://example.org/api/chat"
        );
        assert!(HttpBackend::new("::", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn simulated_backend_cycles_replies() {
        let backend = SimulatedBackend::new(vec!["a".into(), "b".into()]);
        assert_eq!(backend.chat("hi", "").await.unwrap(), "a");
        assert_eq!(backend.chat("hi", "").await.unwrap(), "b");
        assert_eq!(backend.chat("hi", "").await.unwrap(), "a");
        assert!(backend.analyze(&PhotoHandle::new("x.jpg")).await.is_err());
    }

    #[tokio::test]
    async fn resumed_backend_continues_script() {
        let backend = SimulatedBackend::new(vec!["a".into(), "b".into(), "c".into()]).resume_at(4);
        assert_eq!(backend.chat("hi", "").await.unwrap(), "b");
        assert_eq!(backend.chat("hi", "").await.unwrap(), "c");
    }
}
