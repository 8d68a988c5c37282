use colored::*;
use serde::Serialize;

use crate::cli::cli_args::{OutputFormat, TranscriptFormat};
use crate::utils::error::{RemoteError, SkillError};
use crate::utils::types::{ImageItem, SearchResponse, SearchType, Transcription, WebItem};

/// Snippet budget for plain text search results
pub const TEXT_PREVIEW_CHARS: usize = 200;
/// Budget for the collapsible full-content block in markdown
pub const DETAILS_CHARS: usize = 2000;
/// Budget for batch progress previews
pub const PROGRESS_PREVIEW_CHARS: usize = 50;
pub const ELLIPSIS: &str = "...";
const BANNER_WIDTH: usize = 60;

/// Formats service responses and status messages for CLI output
pub struct OutputFormatter;

impl OutputFormatter {
    /// Render a search response in the requested format
    pub fn format_search(response: &SearchResponse, search_type: SearchType, format: OutputFormat) -> String {
        match (format, search_type) {
            (OutputFormat::Json, _) => Self::format_json(response),
            (OutputFormat::Markdown, SearchType::Web) => {
                Self::format_web_markdown(&response.web_items, response.summary.as_deref())
            }
            (OutputFormat::Markdown, SearchType::Image) => Self::format_image_markdown(&response.image_items),
            (OutputFormat::Text, SearchType::Web) => {
                Self::format_web_text(&response.web_items, response.summary.as_deref())
            }
            (OutputFormat::Text, SearchType::Image) => Self::format_image_text(&response.image_items),
        }
    }

    /// Pretty JSON dump of any serializable payload
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Web results as markdown
    pub fn format_web_markdown(items: &[WebItem], summary: Option<&str>) -> String {
        let mut md = String::from("# Web Search Results\n\n");

        if let Some(summary) = summary.filter(|s| !s.is_empty()) {
            md.push_str("## AI Summary\n\n");
            md.push_str(&format!("{}\n\n", summary));
            md.push_str("---\n\n");
        }

        md.push_str("## Results\n\n");

        for (i, item) in items.iter().enumerate() {
            md.push_str(&format!("### {}. {}\n\n", i + 1, title_or_untitled(item.title.as_deref())));
            md.push_str(&format!("- **URL**: {}\n", or_na(item.url.as_deref())));
            md.push_str(&format!("- **Source**: {}\n", or_unknown(item.site_name.as_deref())));
            if let Some(published) = non_empty(item.publish_time.as_deref()) {
                md.push_str(&format!("- **Published**: {}\n", published));
            }
            md.push_str(&format!("\n{}\n\n", item.snippet.as_deref().unwrap_or_default()));
            if let Some(content) = non_empty(item.content.as_deref()) {
                md.push_str(&format!(
                    "<details>\n<summary>Full Content</summary>\n\n{}\n\n</details>\n\n",
                    truncate(content, DETAILS_CHARS)
                ));
            }
        }

        md
    }

    /// Image results as markdown
    pub fn format_image_markdown(items: &[ImageItem]) -> String {
        let mut md = String::from("# Image Search Results\n\n");

        for (i, item) in items.iter().enumerate() {
            let image_url = or_na(item.image_url());
            md.push_str(&format!("### {}. {}\n\n", i + 1, title_or_untitled(item.title.as_deref())));
            md.push_str(&format!("- **Source**: {}\n", or_unknown(item.site_name.as_deref())));
            md.push_str(&format!("- **Page URL**: {}\n", or_na(item.url.as_deref())));
            md.push_str(&format!("- **Image URL**: {}\n", image_url));
            if let Some((width, height)) = item.dimensions() {
                md.push_str(&format!("- **Size**: {}x{}\n", width, height));
            }
            md.push_str(&format!(
                "\n![{}]({})\n\n",
                non_empty(item.title.as_deref()).unwrap_or("Image"),
                image_url
            ));
        }

        md
    }

    /// Web results as plain text
    pub fn format_web_text(items: &[WebItem], summary: Option<&str>) -> String {
        let mut text = String::new();

        if let Some(summary) = summary.filter(|s| !s.is_empty()) {
            text.push_str(&banner("AI SUMMARY"));
            text.push_str(&format!("{}\n\n", summary));
        }

        text.push_str(&banner(&format!("SEARCH RESULTS ({} items)", items.len())));
        text.push('\n');

        for (i, item) in items.iter().enumerate() {
            text.push_str(&format!("[{}] {}\n", i + 1, title_or_untitled(item.title.as_deref())));
            text.push_str(&format!("    URL: {}\n", or_na(item.url.as_deref())));
            text.push_str(&format!("    Source: {}\n", or_unknown(item.site_name.as_deref())));
            if let Some(published) = non_empty(item.publish_time.as_deref()) {
                text.push_str(&format!("    Published: {}\n", published));
            }
            text.push_str(&format!(
                "    {}\n\n",
                truncate(item.snippet.as_deref().unwrap_or_default(), TEXT_PREVIEW_CHARS)
            ));
        }

        text
    }

    /// Image results as plain text
    pub fn format_image_text(items: &[ImageItem]) -> String {
        let mut text = banner(&format!("IMAGE RESULTS ({} items)", items.len()));
        text.push('\n');

        for (i, item) in items.iter().enumerate() {
            text.push_str(&format!("[{}] {}\n", i + 1, title_or_untitled(item.title.as_deref())));
            text.push_str(&format!("    Source: {}\n", or_unknown(item.site_name.as_deref())));
            text.push_str(&format!("    Image: {}\n", or_na(item.image_url())));
            if let Some((width, height)) = item.dimensions() {
                text.push_str(&format!("    Size: {}x{}\n", width, height));
            }
            text.push('\n');
        }

        text
    }

    /// Render a transcription
    pub fn format_transcription(transcription: &Transcription, format: TranscriptFormat) -> String {
        if format == TranscriptFormat::Json {
            return Self::format_json(transcription);
        }

        let rule = "=".repeat(BANNER_WIDTH);
        let mut text = format!("{rule}\nTRANSCRIPTION\n{rule}\n{}\n{rule}\n", transcription.text);

        if let Some(duration) = transcription.duration.filter(|d| *d > 0) {
            text.push_str(&format!("\nDuration: {}\n", format_duration(duration)));
        }
        if !transcription.utterances.is_empty() {
            text.push_str(&format!("\nSegments: {}\n", transcription.utterances.len()));
        }

        text
    }

    /// Lines describing a failed remote call, indented for batch output
    pub fn format_remote_error(error: &RemoteError, indent: &str) -> Vec<String> {
        match error.status_code() {
            Some(status_code) => vec![
                format!("{}API Error: {}", indent, error),
                format!("{}Status Code: {}", indent, status_code),
            ],
            None => vec![format!("{}Error: {}", indent, error)],
        }
    }

    /// Format error message for CLI display
    pub fn format_error(error: &SkillError) -> String {
        format!("{} {}", "Error:".red().bold(), error)
    }

    /// Format info message for CLI display
    pub fn format_info(message: &str) -> String {
        format!("{} {}", "Info:".blue().bold(), message)
    }
}

/// Keep at most `budget` characters, appending `...` when something was cut
pub fn truncate(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Human readable duration from milliseconds: `1h 2m 3s`, `2m 3s` or `3s`
pub fn format_duration(ms: u64) -> String {
    let seconds = ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

fn banner(title: &str) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!("{rule}\n{title}\n{rule}\n")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn title_or_untitled(title: Option<&str>) -> &str {
    non_empty(title).unwrap_or("Untitled")
}

fn or_unknown(value: Option<&str>) -> &str {
    non_empty(value).unwrap_or("Unknown")
}

fn or_na(value: Option<&str>) -> &str {
    non_empty(value).unwrap_or("N/A")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::types::{ImageInfo, Utterance};

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("语音识别服务", 2), "语音...");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59_999), "59s");
        assert_eq!(format_duration(125_000), "2m 5s");
        assert_eq!(format_duration(3_723_000), "1h 2m 3s");
    }

    #[test]
    fn test_web_text_placeholders() {
        let items = vec![WebItem::default()];
        let text = OutputFormatter::format_web_text(&items, None);

        assert!(text.contains("SEARCH RESULTS (1 items)"));
        assert!(text.contains("[1] Untitled"));
        assert!(text.contains("    URL: N/A"));
        assert!(text.contains("    Source: Unknown"));
        assert!(!text.contains("Published"));
        assert!(!text.contains("AI SUMMARY"));
    }

    #[test]
    fn test_web_text_with_summary() {
        let items = vec![WebItem {
            title: Some("Tokio".to_string()),
            url: Some("https://tokio.rs".to_string()),
            site_name: Some("tokio.rs".to_string()),
            publish_time: Some("2024-01-01".to_string()),
            snippet: Some("An asynchronous runtime".to_string()),
            content: None,
        }];
        let text = OutputFormatter::format_web_text(&items, Some("Rust async runtime"));

        assert!(text.starts_with(&"=".repeat(60)));
        assert!(text.contains("AI SUMMARY\n"));
        assert!(text.contains("Rust async runtime\n\n"));
        assert!(text.contains("    Published: 2024-01-01\n"));
        assert!(text.contains("    An asynchronous runtime\n\n"));
    }

    #[test]
    fn test_image_markdown() {
        let items = vec![ImageItem {
            title: None,
            url: None,
            site_name: Some("pics".to_string()),
            image: Some(ImageInfo {
                url: Some("https://img/cat.png".to_string()),
                width: Some(800),
                height: Some(600),
            }),
        }];
        let md = OutputFormatter::format_image_markdown(&items);

        assert!(md.starts_with("# Image Search Results"));
        assert!(md.contains("### 1. Untitled"));
        assert!(md.contains("- **Page URL**: N/A"));
        assert!(md.contains("- **Size**: 800x600"));
        assert!(md.contains("![Image](https://img/cat.png)"));
    }

    #[test]
    fn test_image_text_without_image() {
        let text = OutputFormatter::format_image_text(&[ImageItem::default()]);
        assert!(text.contains("IMAGE RESULTS (1 items)"));
        assert!(text.contains("    Image: N/A"));
        assert!(!text.contains("Size:"));
    }

    #[test]
    fn test_transcription_text() {
        let transcription = Transcription {
            text: "hello there".to_string(),
            duration: Some(65_000),
            utterances: vec![Utterance::default(), Utterance::default()],
        };
        let text = OutputFormatter::format_transcription(&transcription, TranscriptFormat::Text);

        assert!(text.contains("TRANSCRIPTION\n"));
        assert!(text.contains("hello there\n"));
        assert!(text.contains("Duration: 1m 5s"));
        assert!(text.contains("Segments: 2"));
    }

    #[test]
    fn test_transcription_json() {
        let transcription = Transcription { text: "hi".to_string(), duration: None, utterances: vec![] };
        let json = OutputFormatter::format_transcription(&transcription, TranscriptFormat::Json);
        let parsed: Transcription = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, transcription);
    }

    #[test]
    fn test_remote_error_lines() {
        let api = RemoteError::Api { message: "denied".to_string(), status_code: 403 };
        assert_eq!(
            OutputFormatter::format_remote_error(&api, "  "),
            vec!["  API Error: denied", "  Status Code: 403"]
        );

        let other = RemoteError::Transport("reset".to_string());
        assert_eq!(OutputFormatter::format_remote_error(&other, ""), vec!["Error: reset"]);
    }
}
