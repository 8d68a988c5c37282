use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use skillkit::cli::{BatchJob, BatchRunner, Console, ItemOutcome};
use skillkit::utils::error::RemoteError;

/// Fails exactly the item at `failing_index`
struct FlakyJob {
    failing_index: usize,
    calls: AtomicUsize,
}

impl FlakyJob {
    fn new(failing_index: usize) -> Self {
        Self {
            failing_index,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BatchJob for FlakyJob {
    type Item = usize;
    type Output = usize;

    fn preview(&self, item: &usize) -> String {
        format!("item {}", item)
    }

    async fn process(&self, item: &usize) -> Result<usize, RemoteError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(call, *item, "items must run strictly in order");

        if *item == self.failing_index {
            Err(RemoteError::Transport(format!("item {} failed", item)))
        } else {
            Ok(item * 10)
        }
    }

    fn render(&self, output: &usize) -> Vec<String> {
        vec![format!("value {}", output)]
    }
}

#[tokio::test]
async fn test_single_failure_in_every_position() {
    for k in 1..=6usize {
        for j in 0..k {
            let items: Vec<usize> = (0..k).collect();
            let job = FlakyJob::new(j);
            let mut out = Vec::new();
            let mut err = Vec::new();

            let report = {
                let mut console = Console::new(&mut out, &mut err);
                BatchRunner::run(&job, &items, &mut console).await
            };

            assert_eq!(report.outcomes.len(), k);
            assert_eq!(report.failed(), 1);
            assert_eq!(report.succeeded(), k - 1);
            for (idx, outcome) in report.outcomes.iter().enumerate() {
                if idx == j {
                    assert!(matches!(outcome, ItemOutcome::Failure(_)));
                } else {
                    assert_eq!(outcome, &ItemOutcome::Success(idx * 10));
                }
            }

            let stdout = String::from_utf8(out).unwrap();
            let progress: Vec<&str> = stdout.lines().filter(|l| l.starts_with('[')).collect();
            let expected: Vec<String> = (0..k).map(|i| format!("[{}/{}] item {}", i + 1, k, i)).collect();
            assert_eq!(progress, expected);
            assert_eq!(stdout.matches("  value ").count(), k - 1);

            let stderr = String::from_utf8(err).unwrap();
            assert_eq!(stderr, format!("  Error: item {} failed\n", j));
        }
    }
}

#[test]
fn test_batch_runs_with_block_on() {
    let job = FlakyJob::new(usize::MAX);
    let items = vec![0, 1];
    let mut out = Vec::new();
    let mut err = Vec::new();

    let report = tokio_test::block_on(async {
        let mut console = Console::new(&mut out, &mut err);
        BatchRunner::run(&job, &items, &mut console).await
    });

    assert_eq!(report.successes().copied().collect::<Vec<_>>(), vec![0, 10]);
    assert!(err.is_empty());
}
