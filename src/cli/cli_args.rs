use clap::{Args, Parser, Subcommand, ValueEnum};
use regex::Regex;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::utils::types::{AudioFormat, SearchType};

pub const DEFAULT_SPEAKER: &str = "zh_female_xiaohe_uranus_bigtts";
pub const MAX_IMAGE_COUNT: u32 = 100;
pub const SAMPLE_RATES: [u32; 7] = [8000, 16000, 22050, 24000, 32000, 44100, 48000];

/// Skillkit CLI - image generation, speech and search from the command line
#[derive(Parser, Debug)]
#[command(name = "skillkit")]
#[command(about = "Command-line adapters for image generation, speech recognition, speech synthesis and web search")]
#[command(version = "0.1.0")]
pub struct CliArgs {
    /// Client configuration file (JSON)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate images from prompts
    Image(ImageArgs),

    /// Transcribe speech from a URL or a local audio file
    #[command(after_help = ASR_AFTER_HELP)]
    Asr(AsrArgs),

    /// Synthesize speech from one or more texts
    #[command(after_help = TTS_AFTER_HELP)]
    Tts(TtsArgs),

    /// Search the web or images
    #[command(after_help = SEARCH_AFTER_HELP)]
    Search(SearchArgs),
}

/// Options for the `image` command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ImageArgs {
    /// Single prompt. If omitted, random prompts are generated
    #[arg(long)]
    pub prompt: Option<String>,

    /// Number of images to generate
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(0..=MAX_IMAGE_COUNT as i64))]
    pub count: u32,

    /// Image size: 1K, 2K, 4K or WIDTHxHEIGHT
    #[arg(long, default_value = "2K", value_parser = parse_image_size)]
    pub size: String,

    /// Enable sequential image generation (story mode)
    #[arg(long)]
    pub sequential: bool,

    /// Max images for sequential generation
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=15))]
    pub max_sequential: u32,
}

/// Options for the `asr` command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct AsrArgs {
    /// Audio file URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Local audio file path
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Output format for the transcription
    #[arg(long, default_value = "text")]
    pub format: TranscriptFormat,
}

/// Options for the `tts` command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct TtsArgs {
    /// Single text to synthesize
    #[arg(long)]
    pub text: Option<String>,

    /// Multiple texts for batch generation
    #[arg(long, num_args = 1.., value_name = "TEXTS")]
    pub texts: Vec<String>,

    /// Voice ID
    #[arg(long, default_value = DEFAULT_SPEAKER)]
    pub speaker: String,

    /// Audio format
    #[arg(long, default_value = "mp3")]
    pub format: AudioFormatArg,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 24000, value_parser = parse_sample_rate)]
    pub sample_rate: u32,

    /// Speech rate: -50 to 100
    #[arg(long, default_value_t = 0, allow_negative_numbers = true,
          value_parser = clap::value_parser!(i32).range(-50..=100))]
    pub speech_rate: i32,

    /// Volume: -50 to 100
    #[arg(long, default_value_t = 0, allow_negative_numbers = true,
          value_parser = clap::value_parser!(i32).range(-50..=100))]
    pub loudness_rate: i32,
}

impl TtsArgs {
    /// Texts to synthesize; `--text` wins over `--texts`
    pub fn work_items(&self) -> Vec<String> {
        match self.text.as_deref() {
            Some(text) if !text.is_empty() => vec![text.to_string()],
            _ => self.texts.clone(),
        }
    }
}

/// Bind every value following `--texts` to the flag as `--texts=<value>`.
///
/// The list only ends at the next token starting with `--`, so a text may
/// begin with a single dash. A bare `--texts` with nothing after it is kept
/// so the parser still reports the missing value.
pub fn bind_variadic_texts<I, T>(tokens: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut bound = Vec::new();
    let mut pending: Option<OsString> = None;
    let mut in_texts = false;

    for token in tokens.into_iter().map(Into::into) {
        let text = token.to_str();
        if text.map_or(false, |t| t.starts_with("--")) {
            bound.extend(pending.take());
            in_texts = text == Some("--texts");
            if in_texts {
                pending = Some(token);
            } else {
                bound.push(token);
            }
        } else if in_texts {
            pending = None;
            let mut value = OsString::from("--texts=");
            value.push(&token);
            bound.push(value);
        } else {
            bound.push(token);
        }
    }
    bound.extend(pending);
    bound
}

/// Options for the `search` command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct SearchArgs {
    /// Search query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Search type
    #[arg(long = "type", default_value = "web")]
    pub search_type: SearchTypeArg,

    /// Number of results
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,

    /// Time filter: 1d, 1w, 1m (web search only)
    #[arg(long)]
    pub time_range: Option<String>,

    /// Comma-separated domains to include
    #[arg(long)]
    pub sites: Option<String>,

    /// Comma-separated domains to exclude
    #[arg(long)]
    pub block_hosts: Option<String>,

    /// Disable AI summary
    #[arg(long)]
    pub no_summary: bool,

    /// Include full page content
    #[arg(long)]
    pub need_content: bool,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text output
    Text,
    /// Markdown output
    Markdown,
}

/// Transcription output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    Text,
    Json,
}

/// Search type as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTypeArg {
    Web,
    Image,
}

impl From<SearchTypeArg> for SearchType {
    fn from(arg: SearchTypeArg) -> Self {
        match arg {
            SearchTypeArg::Web => SearchType::Web,
            SearchTypeArg::Image => SearchType::Image,
        }
    }
}

/// Audio format as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormatArg {
    Mp3,
    Pcm,
    #[value(name = "ogg_opus")]
    OggOpus,
}

impl From<AudioFormatArg> for AudioFormat {
    fn from(arg: AudioFormatArg) -> Self {
        match arg {
            AudioFormatArg::Mp3 => AudioFormat::Mp3,
            AudioFormatArg::Pcm => AudioFormat::Pcm,
            AudioFormatArg::OggOpus => AudioFormat::OggOpus,
        }
    }
}

fn parse_image_size(value: &str) -> Result<String, String> {
    static CUSTOM_SIZE: OnceLock<Regex> = OnceLock::new();
    let custom = CUSTOM_SIZE.get_or_init(|| Regex::new(r"^[1-9][0-9]*x[1-9][0-9]*$").expect("valid regex"));

    let upper = value.to_ascii_uppercase();
    if matches!(upper.as_str(), "1K" | "2K" | "4K") {
        Ok(upper)
    } else if custom.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(format!("'{}' is not one of 1K, 2K, 4K or WIDTHxHEIGHT", value))
    }
}

fn parse_sample_rate(value: &str) -> Result<u32, String> {
    let rate: u32 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if SAMPLE_RATES.contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("{} is not a supported sample rate (one of {:?})", rate, SAMPLE_RATES))
    }
}

const ASR_AFTER_HELP: &str = "\
Audio Requirements:
  - Duration: <= 2 hours
  - File size: <= 100MB
  - Formats: WAV, MP3, OGG OPUS, M4A

Examples:
  skillkit asr --url \"https://example.com/audio.mp3\"
  skillkit asr --file ./recording.mp3";

const TTS_AFTER_HELP: &str = "\
Available Voices:
  General:
    zh_female_xiaohe_uranus_bigtts    - Xiaohe (default)
    zh_female_vv_uranus_bigtts        - Vivi (Chinese & English)
    zh_male_m191_uranus_bigtts        - Yunzhou (male)
    zh_male_taocheng_uranus_bigtts    - Xiaotian (male)
  Audiobook:
    zh_female_xueayi_saturn_bigtts    - Children's audiobook
  Video Dubbing:
    zh_male_dayi_saturn_bigtts        - Dayi (male)
    zh_female_mizai_saturn_bigtts     - Mizai (female)

Examples:
  skillkit tts --text \"Hello world\"
  skillkit tts --texts \"Chapter 1\" \"Chapter 2\"
  skillkit tts --text \"Fast speech\" --speaker zh_male_dayi_saturn_bigtts --speech-rate 30";

const SEARCH_AFTER_HELP: &str = "\
Examples:
  skillkit search -q \"Python programming\"
  skillkit search -q \"AI news\" --time-range 1w --sites \"techcrunch.com,wired.com\"
  skillkit search -q \"cute cats\" --type image --count 20
  skillkit search -q \"machine learning\" --format markdown";
