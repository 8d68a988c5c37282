use async_trait::async_trait;

use crate::utils::{
    error::RemoteResult,
    types::{
        ImageRequest, ImageResponse, RecognitionRequest, SearchRequest, SearchResponse,
        SpeechRequest, SpeechResponse, Transcription,
    },
};

/// Text-to-image generation capability
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate images for a single prompt
    async fn generate(&self, request: ImageRequest) -> RemoteResult<ImageResponse>;
}

/// Speech-to-text capability
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe audio given by URL or inline base64 data
    async fn recognize(&self, request: RecognitionRequest) -> RemoteResult<Transcription>;
}

/// Text-to-speech capability
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize one text and return where the audio lives
    async fn synthesize(&self, request: SpeechRequest) -> RemoteResult<SpeechResponse>;
}

/// Web and image search capability
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Run one search request
    async fn search(&self, request: SearchRequest) -> RemoteResult<SearchResponse>;
}

/// A client that provides every capability the CLI needs
pub trait SkillClient: ImageGenerator + SpeechRecognizer + SpeechSynthesizer + WebSearcher {}

impl<T> SkillClient for T where T: ImageGenerator + SpeechRecognizer + SpeechSynthesizer + WebSearcher {}
