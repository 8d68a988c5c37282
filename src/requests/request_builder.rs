use base64::prelude::*;
use chrono::Utc;
use rand::Rng;
use std::path::Path;
use tracing::debug;

use crate::cli::cli_args::{AsrArgs, ImageArgs, SearchArgs, TtsArgs};
use crate::requests::prompt_generator::generate_prompts;
use crate::utils::{
    error::{ResourceError, SkillResult, UsageError},
    types::{
        AudioSource, ImageRequest, RecognitionRequest, SearchRequest, SequentialMode,
        SpeechRequest,
    },
};

/// Largest local audio file accepted for recognition
pub const MAX_AUDIO_FILE_MB: u64 = 100;
pub const MAX_AUDIO_FILE_BYTES: u64 = MAX_AUDIO_FILE_MB * 1024 * 1024;

/// Prompts for the image batch: the explicit prompt repeated, or random ones
pub fn image_prompts<R: Rng + ?Sized>(args: &ImageArgs, rng: &mut R) -> Vec<String> {
    let count = args.count as usize;
    match args.prompt.as_deref() {
        Some(prompt) if !prompt.is_empty() => vec![prompt.to_string(); count],
        _ => generate_prompts(count, rng),
    }
}

pub fn build_image_request(prompt: &str, args: &ImageArgs) -> ImageRequest {
    ImageRequest {
        prompt: prompt.to_string(),
        size: args.size.clone(),
        sequential_image_generation: SequentialMode::from_flag(args.sequential),
        max_images: args.max_sequential,
    }
}

pub fn build_speech_request(text: &str, args: &TtsArgs) -> SpeechRequest {
    SpeechRequest {
        uid: request_uid("tts"),
        text: text.to_string(),
        speaker: args.speaker.clone(),
        audio_format: args.format.into(),
        sample_rate: args.sample_rate,
        speech_rate: args.speech_rate,
        loudness_rate: args.loudness_rate,
    }
}

pub fn build_search_request(args: &SearchArgs) -> SkillResult<SearchRequest> {
    let query = args
        .query
        .as_deref()
        .filter(|q| !q.is_empty())
        .ok_or_else(|| UsageError::MissingArgument { flags: "--query".to_string() })?;

    Ok(SearchRequest {
        query: query.to_string(),
        search_type: args.search_type.into(),
        count: args.count,
        time_range: args.time_range.clone(),
        sites: args.sites.clone(),
        block_hosts: args.block_hosts.clone(),
        need_summary: !args.no_summary,
        need_content: args.need_content,
    })
}

/// Audio read from disk, ready to send inline
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAudio {
    pub base64_data: String,
    pub size_bytes: u64,
}

impl LoadedAudio {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Read a local audio file, rejecting missing or oversized files
pub fn load_audio_file(path: &Path) -> Result<LoadedAudio, ResourceError> {
    let display = path.display().to_string();
    if !path.is_file() {
        return Err(ResourceError::FileNotFound(display));
    }

    let metadata = std::fs::metadata(path).map_err(|e| ResourceError::ReadFailed {
        path: display.clone(),
        message: e.to_string(),
    })?;
    check_audio_size(metadata.len())?;

    let data = std::fs::read(path).map_err(|e| ResourceError::ReadFailed {
        path: display.clone(),
        message: e.to_string(),
    })?;
    let size_bytes = data.len() as u64;
    check_audio_size(size_bytes)?;
    debug!(path = %path.display(), size_bytes, "loaded audio file");

    Ok(LoadedAudio {
        base64_data: BASE64_STANDARD.encode(&data),
        size_bytes,
    })
}

fn check_audio_size(size_bytes: u64) -> Result<(), ResourceError> {
    if size_bytes > MAX_AUDIO_FILE_BYTES {
        return Err(ResourceError::FileTooLarge {
            size_bytes,
            limit_mb: MAX_AUDIO_FILE_MB,
        });
    }
    Ok(())
}

/// The audio input selected on the command line; `--file` wins over `--url`
#[derive(Debug, Clone, PartialEq)]
pub enum AudioInput<'a> {
    File(&'a Path),
    Url(&'a str),
}

pub fn select_audio_input(args: &AsrArgs) -> SkillResult<AudioInput<'_>> {
    if let Some(file) = &args.file {
        return Ok(AudioInput::File(file.as_path()));
    }
    match args.url.as_deref() {
        Some(url) if !url.is_empty() => Ok(AudioInput::Url(url)),
        _ => Err(UsageError::MissingArgument { flags: "--url or --file".to_string() }.into()),
    }
}

pub fn build_recognition_request(source: AudioSource) -> RecognitionRequest {
    RecognitionRequest {
        uid: request_uid("asr"),
        source,
    }
}

/// `<prefix>-<unix millis>`
pub fn request_uid(prefix: &str) -> String {
    format!("{}-{}", prefix, Utc::now().timestamp_millis())
}
