use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::clients::{ImageGenerator, SpeechRecognizer, SpeechSynthesizer, WebSearcher};
use crate::utils::{
    error::{RemoteError, RemoteResult},
    types::{
        ImageRequest, ImageResponse, RecognitionRequest, SearchRequest, SearchResponse,
        SpeechRequest, SpeechResponse, Transcription,
    },
};

/// Scripted responses for one capability.
///
/// Queued results are handed out in order; once the queue is empty the
/// fallback (if any) answers every further call.
#[derive(Debug)]
struct Script<Req, Resp> {
    queued: VecDeque<RemoteResult<Resp>>,
    fallback: Option<RemoteResult<Resp>>,
    requests: Vec<Req>,
}

impl<Req, Resp: Clone> Script<Req, Resp> {
    fn new() -> Self {
        Self {
            queued: VecDeque::new(),
            fallback: None,
            requests: Vec::new(),
        }
    }

    fn next(&mut self, request: Req) -> RemoteResult<Resp> {
        self.requests.push(request);
        match self.queued.pop_front() {
            Some(result) => result,
            None => self.fallback.clone().unwrap_or_else(|| {
                Err(RemoteError::Transport("mock client has no scripted response".to_string()))
            }),
        }
    }
}

/// In-memory client with deterministic, scripted answers for tests
#[derive(Debug)]
pub struct MockClient {
    images: Mutex<Script<ImageRequest, ImageResponse>>,
    transcriptions: Mutex<Script<RecognitionRequest, Transcription>>,
    speech: Mutex<Script<SpeechRequest, SpeechResponse>>,
    searches: Mutex<Script<SearchRequest, SearchResponse>>,
    calls: AtomicUsize,
}

impl MockClient {
    /// Create a mock client with no scripted answers
    pub fn new() -> Self {
        Self {
            images: Mutex::new(Script::new()),
            transcriptions: Mutex::new(Script::new()),
            speech: Mutex::new(Script::new()),
            searches: Mutex::new(Script::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue the next image generation result
    pub fn push_image(self, result: RemoteResult<ImageResponse>) -> Self {
        lock(&self.images).queued.push_back(result);
        self
    }

    /// Answer every unscripted image generation with this result
    pub fn with_image_fallback(self, result: RemoteResult<ImageResponse>) -> Self {
        lock(&self.images).fallback = Some(result);
        self
    }

    pub fn push_transcription(self, result: RemoteResult<Transcription>) -> Self {
        lock(&self.transcriptions).queued.push_back(result);
        self
    }

    pub fn push_speech(self, result: RemoteResult<SpeechResponse>) -> Self {
        lock(&self.speech).queued.push_back(result);
        self
    }

    pub fn with_speech_fallback(self, result: RemoteResult<SpeechResponse>) -> Self {
        lock(&self.speech).fallback = Some(result);
        self
    }

    pub fn push_search(self, result: RemoteResult<SearchResponse>) -> Self {
        lock(&self.searches).queued.push_back(result);
        self
    }

    /// Total number of remote calls across all capabilities
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn image_requests(&self) -> Vec<ImageRequest> {
        lock(&self.images).requests.clone()
    }

    pub fn recognition_requests(&self) -> Vec<RecognitionRequest> {
        lock(&self.transcriptions).requests.clone()
    }

    pub fn speech_requests(&self) -> Vec<SpeechRequest> {
        lock(&self.speech).requests.clone()
    }

    pub fn search_requests(&self) -> Vec<SearchRequest> {
        lock(&self.searches).requests.clone()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ImageGenerator for MockClient {
    async fn generate(&self, request: ImageRequest) -> RemoteResult<ImageResponse> {
        self.record_call();
        lock(&self.images).next(request)
    }
}

#[async_trait]
impl SpeechRecognizer for MockClient {
    async fn recognize(&self, request: RecognitionRequest) -> RemoteResult<Transcription> {
        self.record_call();
        lock(&self.transcriptions).next(request)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockClient {
    async fn synthesize(&self, request: SpeechRequest) -> RemoteResult<SpeechResponse> {
        self.record_call();
        lock(&self.speech).next(request)
    }
}

#[async_trait]
impl WebSearcher for MockClient {
    async fn search(&self, request: SearchRequest) -> RemoteResult<SearchResponse> {
        self.record_call();
        lock(&self.searches).next(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::types::{SearchType, SequentialMode};

    fn image_request(prompt: &str) -> ImageRequest {
        ImageRequest {
            prompt: prompt.to_string(),
            size: "2K".to_string(),
            sequential_image_generation: SequentialMode::Disabled,
            max_images: 5,
        }
    }

    #[tokio::test]
    async fn test_queued_then_fallback() {
        let client = MockClient::new()
            .push_image(Err(RemoteError::Transport("boom".to_string())))
            .with_image_fallback(Ok(ImageResponse::from_urls(&["https://img/ok.png"])));

        assert!(client.generate(image_request("a")).await.is_err());
        assert!(client.generate(image_request("b")).await.is_ok());
        assert!(client.generate(image_request("c")).await.is_ok());

        assert_eq!(client.call_count(), 3);
        let prompts: Vec<String> = client.image_requests().into_iter().map(|r| r.prompt).collect();
        assert_eq!(prompts, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_unscripted_call_fails() {
        let client = MockClient::new();
        let request = SearchRequest {
            query: "q".to_string(),
            search_type: SearchType::Web,
            count: 1,
            time_range: None,
            sites: None,
            block_hosts: None,
            need_summary: false,
            need_content: false,
        };

        let err = client.search(request).await.unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)));
        assert_eq!(client.search_requests().len(), 1);
    }
}
