use serde::{Deserialize, Serialize};

/// Image generation request sent to the image capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: String,
    pub sequential_image_generation: SequentialMode,
    pub max_images: u32,
}

/// Story mode switch for image generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequentialMode {
    Auto,
    Disabled,
}

impl SequentialMode {
    pub fn from_flag(sequential: bool) -> Self {
        if sequential {
            SequentialMode::Auto
        } else {
            SequentialMode::Disabled
        }
    }
}

/// One image produced by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Image generation response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub data: Vec<GeneratedImage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ImageResponse {
    pub fn from_urls(urls: &[&str]) -> Self {
        Self {
            data: urls
                .iter()
                .map(|url| GeneratedImage { url: Some(url.to_string()), error: None })
                .collect(),
            errors: Vec::new(),
        }
    }

    pub fn image_urls(&self) -> Vec<String> {
        self.data.iter().filter_map(|image| image.url.clone()).collect()
    }

    /// Service-level and per-image error messages
    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .cloned()
            .chain(self.data.iter().filter_map(|image| image.error.clone()))
            .collect()
    }

    /// At least one image and no reported errors
    pub fn is_success(&self) -> bool {
        self.error_messages().is_empty() && !self.image_urls().is_empty()
    }
}

/// Where the audio to transcribe comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioSource {
    Url(String),
    Base64Data(String),
}

/// Speech recognition request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionRequest {
    pub uid: String,
    #[serde(flatten)]
    pub source: AudioSource,
}

/// One recognized segment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,
}

/// Speech recognition response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    #[serde(default)]
    pub text: String,
    /// Audio duration in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub utterances: Vec<Utterance>,
}

/// Audio container produced by speech synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    Mp3,
    Pcm,
    OggOpus,
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioFormat::Mp3 => write!(f, "mp3"),
            AudioFormat::Pcm => write!(f, "pcm"),
            AudioFormat::OggOpus => write!(f, "ogg_opus"),
        }
    }
}

/// Speech synthesis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub uid: String,
    pub text: String,
    pub speaker: String,
    pub audio_format: AudioFormat,
    pub sample_rate: u32,
    pub speech_rate: i32,
    pub loudness_rate: i32,
}

/// Speech synthesis response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechResponse {
    pub audio_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_size: Option<u64>,
}

/// Kind of search to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Web,
    Image,
}

/// How a search request is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Web,
    Advanced,
    Image,
}

/// Search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub search_type: SearchType,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sites: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hosts: Option<String>,
    pub need_summary: bool,
    pub need_content: bool,
}

impl SearchRequest {
    pub fn mode(&self) -> SearchMode {
        if self.search_type == SearchType::Image {
            SearchMode::Image
        } else if self.time_range.is_some()
            || self.sites.is_some()
            || self.block_hosts.is_some()
            || self.need_content
        {
            SearchMode::Advanced
        } else {
            SearchMode::Web
        }
    }
}

/// One web search hit. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Image attached to an image search hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// One image search hit. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInfo>,
}

impl ImageItem {
    pub fn image_url(&self) -> Option<&str> {
        self.image.as_ref().and_then(|image| image.url.as_deref())
    }

    /// `WxH` when both dimensions are known
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let image = self.image.as_ref()?;
        match (image.width, image.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }
}

/// Search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub web_items: Vec<WebItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_items: Vec<ImageItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl SearchResponse {
    pub fn item_count(&self, search_type: SearchType) -> usize {
        match search_type {
            SearchType::Web => self.web_items.len(),
            SearchType::Image => self.image_items.len(),
        }
    }
}
