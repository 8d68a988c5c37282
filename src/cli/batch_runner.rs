use async_trait::async_trait;
use std::io::{self, Write};

use crate::cli::output_formatter::OutputFormatter;
use crate::utils::error::RemoteError;

/// Output and error streams the CLI writes to
pub struct Console<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
}

impl<'a> Console<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { out, err }
    }

    /// Write a line to the output stream
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    /// Write a line to the error stream
    pub fn error_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.err, "{}", text)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }
}

/// One kind of work the batch runner can drive
#[async_trait]
pub trait BatchJob: Send + Sync {
    type Item: Send + Sync;
    type Output: Send;

    /// Short description printed in the progress line
    fn preview(&self, item: &Self::Item) -> String;

    /// Build the request for one item and invoke the remote capability
    async fn process(&self, item: &Self::Item) -> Result<Self::Output, RemoteError>;

    /// Lines printed for a successful item
    fn render(&self, output: &Self::Output) -> Vec<String>;
}

/// Result of one work item, in input order
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome<T> {
    Success(T),
    Failure(RemoteError),
}

impl<T> ItemOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success(_))
    }
}

/// Everything a batch produced
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport<T> {
    pub outcomes: Vec<ItemOutcome<T>>,
    /// Console writes that failed; they never interrupt the batch
    pub console_errors: usize,
}

impl<T> BatchReport<T> {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn successes(&self) -> impl Iterator<Item = &T> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ItemOutcome::Success(value) => Some(value),
            ItemOutcome::Failure(_) => None,
        })
    }
}

/// Runs work items one after another; a failing item never stops the batch
pub struct BatchRunner;

impl BatchRunner {
    pub async fn run<J: BatchJob>(
        job: &J,
        items: &[J::Item],
        console: &mut Console<'_>,
    ) -> BatchReport<J::Output> {
        let total = items.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut console_errors = 0;
        let mut record = |written: io::Result<()>| {
            if let Err(e) = written {
                tracing::warn!(error = %e, "console write failed");
                console_errors += 1;
            }
        };

        for (idx, item) in items.iter().enumerate() {
            record(console.line(&format!("[{}/{}] {}", idx + 1, total, job.preview(item))));

            let outcome = match job.process(item).await {
                Ok(output) => {
                    for line in job.render(&output) {
                        record(console.line(&format!("  {}", line)));
                    }
                    ItemOutcome::Success(output)
                }
                Err(error) => {
                    tracing::debug!(item = idx + 1, %error, "batch item failed");
                    for line in OutputFormatter::format_remote_error(&error, "  ") {
                        record(console.error_line(&line));
                    }
                    ItemOutcome::Failure(error)
                }
            };
            outcomes.push(outcome);
        }

        BatchReport { outcomes, console_errors }
    }
}
