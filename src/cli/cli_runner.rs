use async_trait::async_trait;
use clap::error::ErrorKind;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::ffi::OsString;
use std::io;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::batch_runner::{BatchJob, BatchRunner, Console};
use crate::cli::output_formatter::{truncate, OutputFormatter, PROGRESS_PREVIEW_CHARS};
use crate::cli::{bind_variadic_texts, AsrArgs, CliArgs, Commands, ImageArgs, SearchArgs, TtsArgs};
use crate::clients::{HttpClient, SkillClient};
use crate::requests::{
    build_image_request, build_recognition_request, build_search_request, build_speech_request,
    image_prompts, load_audio_file, select_audio_input, AudioInput,
};
use crate::utils::{
    config::ClientConfig,
    error::{RemoteError, SkillResult, UsageError},
    types::{AudioSource, SearchMode, SpeechResponse},
};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

const BIN_NAME: &str = "skillkit";

/// Main CLI runner that handles command execution
pub struct CliRunner {
    client: Arc<dyn SkillClient>,
    prompt_seed: Option<u64>,
}

impl CliRunner {
    /// Create a runner backed by the given capability client
    pub fn new(client: Arc<dyn SkillClient>) -> Self {
        Self {
            client,
            prompt_seed: None,
        }
    }

    /// Make random prompt generation reproducible
    pub fn with_prompt_seed(mut self, seed: u64) -> Self {
        self.prompt_seed = Some(seed);
        self
    }

    /// Parse argument tokens (without the program name).
    ///
    /// Help and version requests are written to the output stream and yield
    /// `Err(EXIT_SUCCESS)`; any other parse failure is a usage error.
    pub fn parse_args<I, T>(tokens: I, console: &mut Console<'_>) -> Result<CliArgs, i32>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let argv = std::iter::once(OsString::from(BIN_NAME)).chain(bind_variadic_texts(tokens));
        match CliArgs::try_parse_from(argv) {
            Ok(args) => Ok(args),
            Err(e) => match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = console.line(e.render().to_string().trim_end());
                    Err(EXIT_SUCCESS)
                }
                _ => {
                    let _ = console.error_line(e.render().to_string().trim_end());
                    Err(EXIT_FAILURE)
                }
            },
        }
    }

    /// Parse and execute one invocation, returning the process exit code
    pub async fn run<I, T>(&self, tokens: I, console: &mut Console<'_>) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::parse_args(tokens, console) {
            Ok(args) => self.execute(args.command, console).await,
            Err(code) => code,
        }
    }

    /// Execute a parsed command, returning the process exit code
    pub async fn execute(&self, command: Commands, console: &mut Console<'_>) -> i32 {
        let result = match command {
            Commands::Image(args) => self.generate_images(&args, console).await,
            Commands::Asr(args) => self.recognize_speech(&args, console).await,
            Commands::Tts(args) => self.synthesize_speech(&args, console).await,
            Commands::Search(args) => self.search(&args, console).await,
        };

        let code = match result {
            Ok(code) => code,
            Err(e) => {
                debug!(precondition = e.is_fatal_precondition(), "command failed");
                let _ = console.error_line(&OutputFormatter::format_error(&e));
                EXIT_FAILURE
            }
        };
        let _ = console.flush();
        code
    }

    /// Generate one image request per prompt, best effort
    pub async fn generate_images(&self, args: &ImageArgs, console: &mut Console<'_>) -> SkillResult<i32> {
        let prompts = image_prompts(args, &mut self.prompt_rng());
        let job = ImageJob {
            client: self.client.as_ref(),
            args,
        };

        let report = BatchRunner::run(&job, &prompts, console).await;
        info!(
            images = report.successes().map(Vec::len).sum::<usize>(),
            failed = report.failed(),
            "image batch finished"
        );
        Ok(EXIT_SUCCESS)
    }

    /// Synthesize every text, best effort
    pub async fn synthesize_speech(&self, args: &TtsArgs, console: &mut Console<'_>) -> SkillResult<i32> {
        let texts = args.work_items();
        if texts.is_empty() {
            return Err(UsageError::MissingArgument { flags: "--text or --texts".to_string() }.into());
        }

        let job = SpeechJob {
            client: self.client.as_ref(),
            args,
        };
        let report = BatchRunner::run(&job, &texts, console).await;
        info!(succeeded = report.succeeded(), failed = report.failed(), "speech batch finished");
        Ok(EXIT_SUCCESS)
    }

    /// Transcribe one audio source
    pub async fn recognize_speech(&self, args: &AsrArgs, console: &mut Console<'_>) -> SkillResult<i32> {
        let source = match select_audio_input(args)? {
            AudioInput::File(path) => {
                console.error_line(&OutputFormatter::format_info(&format!(
                    "Reading local file: {}",
                    path.display()
                )))?;
                let audio = load_audio_file(path)?;
                console.error_line(&OutputFormatter::format_info(&format!(
                    "File size: {:.2} MB",
                    audio.size_mb()
                )))?;
                console.error_line(&OutputFormatter::format_info("Recognizing speech..."))?;
                AudioSource::Base64Data(audio.base64_data)
            }
            AudioInput::Url(url) => {
                console.error_line(&OutputFormatter::format_info(&format!("Recognizing from URL: {}", url)))?;
                AudioSource::Url(url.to_string())
            }
        };

        match self.client.recognize(build_recognition_request(source)).await {
            Ok(transcription) => {
                console.line("")?;
                console.line(OutputFormatter::format_transcription(&transcription, args.format).trim_end())?;
                Ok(EXIT_SUCCESS)
            }
            Err(e) => report_single_failure(&e, console),
        }
    }

    /// Run one search and render it in the requested format
    pub async fn search(&self, args: &SearchArgs, console: &mut Console<'_>) -> SkillResult<i32> {
        let request = build_search_request(args)?;
        let search_type = request.search_type;

        let status = match request.mode() {
            SearchMode::Image => format!("Searching images for: \"{}\"...", request.query),
            SearchMode::Advanced => format!("Advanced searching for: \"{}\"...", request.query),
            SearchMode::Web => format!("Searching for: \"{}\"...", request.query),
        };
        console.error_line(&OutputFormatter::format_info(&status))?;
        debug!(?request, "dispatching search");

        match self.client.search(request).await {
            Ok(response) => {
                let output = OutputFormatter::format_search(&response, search_type, args.format);
                console.line(output.trim_end())?;
                console.error_line(&OutputFormatter::format_info(&format!(
                    "Found {} results.",
                    response.item_count(search_type)
                )))?;
                Ok(EXIT_SUCCESS)
            }
            Err(e) => report_single_failure(&e, console),
        }
    }

    fn prompt_rng(&self) -> StdRng {
        match self.prompt_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// A single-request command failed remotely: report it and exit non-zero
fn report_single_failure(error: &RemoteError, console: &mut Console<'_>) -> SkillResult<i32> {
    for line in OutputFormatter::format_remote_error(error, "") {
        console.error_line(&line)?;
    }
    Ok(EXIT_FAILURE)
}

struct ImageJob<'a> {
    client: &'a dyn SkillClient,
    args: &'a ImageArgs,
}

#[async_trait]
impl BatchJob for ImageJob<'_> {
    type Item = String;
    type Output = Vec<String>;

    fn preview(&self, prompt: &String) -> String {
        prompt.clone()
    }

    async fn process(&self, prompt: &String) -> Result<Vec<String>, RemoteError> {
        let response = self.client.generate(build_image_request(prompt, self.args)).await?;
        if !response.is_success() {
            let mut messages = response.error_messages();
            if messages.is_empty() {
                messages.push("no images returned".to_string());
            }
            return Err(RemoteError::Rejected(messages));
        }
        Ok(response.image_urls())
    }

    fn render(&self, urls: &Vec<String>) -> Vec<String> {
        urls.clone()
    }
}

struct SpeechJob<'a> {
    client: &'a dyn SkillClient,
    args: &'a TtsArgs,
}

#[async_trait]
impl BatchJob for SpeechJob<'_> {
    type Item = String;
    type Output = SpeechResponse;

    fn preview(&self, text: &String) -> String {
        truncate(text, PROGRESS_PREVIEW_CHARS)
    }

    async fn process(&self, text: &String) -> Result<SpeechResponse, RemoteError> {
        self.client.synthesize(build_speech_request(text, self.args)).await
    }

    fn render(&self, response: &SpeechResponse) -> Vec<String> {
        vec![response.audio_uri.clone()]
    }
}

/// Install the tracing subscriber; logs go to stderr
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("skillkit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for CLI execution
pub async fn run_cli() -> anyhow::Result<()> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();
    let mut console = Console::new(&mut out, &mut err);

    let args = match CliRunner::parse_args(std::env::args_os().skip(1), &mut console) {
        Ok(args) => args,
        Err(code) => {
            console.flush()?;
            std::process::exit(code);
        }
    };

    init_tracing(args.verbose);

    let client = match ClientConfig::load(args.config.as_deref()).and_then(HttpClient::new) {
        Ok(client) => client,
        Err(e) => {
            console.error_line(&OutputFormatter::format_error(&e))?;
            console.flush()?;
            std::process::exit(EXIT_FAILURE);
        }
    };
    debug!(base_url = %client.config().base_url, "client configured");

    let runner = CliRunner::new(Arc::new(client));
    let code = runner.execute(args.command, &mut console).await;

    if code != EXIT_SUCCESS {
        console.flush()?;
        std::process::exit(code);
    }
    Ok(())
}
