use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::debug;
use url::Url;

use crate::clients::{ImageGenerator, SpeechRecognizer, SpeechSynthesizer, WebSearcher};
use crate::utils::{
    config::ClientConfig,
    error::{RemoteError, RemoteResult, SkillError, SkillResult},
    types::{
        ImageRequest, ImageResponse, RecognitionRequest, SearchMode, SearchRequest,
        SearchResponse, SpeechRequest, SpeechResponse, Transcription,
    },
};

/// JSON-over-HTTP client for the generation, speech and search services
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    config: ClientConfig,
}

impl HttpClient {
    /// Create a new client from a validated configuration
    pub fn new(config: ClientConfig) -> SkillResult<Self> {
        config.validate()?;
        let mut base_url = config.parsed_base_url()?;
        // endpoints resolve below any path prefix, so the base must end in '/'
        if !base_url.path().ends_with('/') {
            let prefixed = format!("{}/", base_url.path());
            base_url.set_path(&prefixed);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SkillError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve an endpoint path against the base URL
    fn endpoint_url(&self, path: &str) -> RemoteResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| RemoteError::Transport(format!("invalid endpoint '{}': {}", path, e)))
    }

    /// POST a JSON body and decode the JSON answer
    async fn post_json<B, T>(&self, path: &str, body: &B) -> RemoteResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint_url(path)?;
        debug!(%url, "sending request");

        let mut request = self.client.post(url.clone()).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(format!("HTTP request failed: {}", e)))?;

        let response = Self::check_status(response).await?;
        debug!(%url, "request succeeded");

        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::Transport(format!("Failed to parse JSON response: {}", e)))
    }

    /// Map non-success statuses to `RemoteError::Api`
    async fn check_status(response: Response) -> RemoteResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "service returned an error");

        Err(RemoteError::Api {
            message: extract_error_message(&body)
                .unwrap_or_else(|| format!("HTTP request failed with status: {}", status)),
            status_code: status.as_u16(),
        })
    }
}

/// Find a human readable message in an error body
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<JsonValue>(trimmed) {
        Ok(value) => value
            .pointer("/error/message")
            .or_else(|| value.get("message"))
            .or_else(|| value.get("error").filter(|e| e.is_string()))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        Err(_) => Some(trimmed.to_string()),
    }
}

/// Request body for the search endpoint, shaped by the dispatch mode
pub(crate) fn search_body(request: &SearchRequest) -> JsonValue {
    match request.mode() {
        SearchMode::Image => json!({
            "query": request.query,
            "search_type": "image",
            "count": request.count,
        }),
        SearchMode::Web => json!({
            "query": request.query,
            "search_type": "web",
            "count": request.count,
            "need_summary": request.need_summary,
        }),
        SearchMode::Advanced => {
            let mut body = json!({
                "query": request.query,
                "search_type": "web",
                "count": request.count,
                "need_summary": request.need_summary,
                "need_content": request.need_content,
            });
            if let Some(obj) = body.as_object_mut() {
                if let Some(range) = &request.time_range {
                    obj.insert("time_range".to_string(), json!(range));
                }
                if let Some(sites) = &request.sites {
                    obj.insert("sites".to_string(), json!(sites));
                }
                if let Some(hosts) = &request.block_hosts {
                    obj.insert("block_hosts".to_string(), json!(hosts));
                }
            }
            body
        }
    }
}

#[async_trait]
impl ImageGenerator for HttpClient {
    async fn generate(&self, request: ImageRequest) -> RemoteResult<ImageResponse> {
        let body = json!({
            "prompt": request.prompt,
            "size": request.size,
            "sequential_image_generation": request.sequential_image_generation,
            "sequential_image_generation_options": { "max_images": request.max_images },
            "response_format": "url",
        });
        self.post_json(&self.config.endpoints.image_generation, &body).await
    }
}

#[async_trait]
impl SpeechRecognizer for HttpClient {
    async fn recognize(&self, request: RecognitionRequest) -> RemoteResult<Transcription> {
        self.post_json(&self.config.endpoints.speech_recognition, &request).await
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpClient {
    async fn synthesize(&self, request: SpeechRequest) -> RemoteResult<SpeechResponse> {
        self.post_json(&self.config.endpoints.speech_synthesis, &request).await
    }
}

#[async_trait]
impl WebSearcher for HttpClient {
    async fn search(&self, request: SearchRequest) -> RemoteResult<SearchResponse> {
        let body = search_body(&request);
        self.post_json(&self.config.endpoints.search, &body).await
    }
}
