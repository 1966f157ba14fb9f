//! Batched concurrent execution of translation tasks

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::core::client::TranslationClient;
use crate::core::models::{BatchProgress, TaskOutcome, TaskStatus, TranslationTask};
use crate::core::placeholder::is_trivial_text;

/// Runs tasks in sequential groups of at most `batch_size`, each group
/// fully concurrent.
#[derive(Debug, Clone)]
pub struct BatchExecutor {
    client: TranslationClient,
}

impl BatchExecutor {
    /// Create an executor that sends every call through `client`
    pub fn new(client: TranslationClient) -> Self {
        Self { client }
    }

    /// Number of groups `task_count` tasks are split into
    pub fn batch_count(task_count: usize, batch_size: usize) -> usize {
        task_count.div_ceil(batch_size.max(1))
    }

    /// Execute all tasks and return one outcome per task, in task order.
    ///
    /// Group N+1 starts only after every task of group N has finished, so at
    /// most `batch_size` translation calls are in flight. `on_batch` is
    /// called after each group.
    pub async fn run_batches<'a, F>(
        &self,
        tasks: Vec<TranslationTask<'a>>,
        batch_size: usize,
        mut on_batch: F,
    ) -> Vec<TaskOutcome>
    where
        F: FnMut(&BatchProgress),
    {
        let batch_size = batch_size.max(1);
        let total = tasks.len();
        let batch_count = Self::batch_count(total, batch_size);
        let mut outcomes = Vec::with_capacity(total);
        let mut progress = BatchProgress {
            batch_count,
            total,
            ..Default::default()
        };

        debug!("Running {} tasks in {} batches of {}", total, batch_count, batch_size);

        let mut remaining = tasks.into_iter();
        loop {
            let batch: Vec<_> = remaining.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                break;
            }

            let size = batch.len();
            let results = join_all(batch.into_iter().map(|task| self.run_task(task))).await;

            progress.batch_index += 1;
            progress.completed += size;
            progress.skipped += results.iter().filter(|outcome| outcome.is_skipped()).count();
            debug!(
                "Batch {}/{} done ({}/{} tasks)",
                progress.batch_index, batch_count, progress.completed, total
            );

            outcomes.extend(results);
            on_batch(&progress);
        }

        let failed = outcomes.iter().filter(|outcome| !outcome.is_success()).count();
        if failed > 0 {
            info!("{} of {} tasks failed", failed, total);
        }

        outcomes
    }

    /// Run one task; writes its cell at most once
    async fn run_task(&self, task: TranslationTask<'_>) -> TaskOutcome {
        let TranslationTask {
            key,
            source_text,
            source_lang,
            target_lang,
            cell,
        } = task;

        if is_trivial_text(&source_text) {
            cell.value = source_text;
            return TaskOutcome {
                key,
                target_lang,
                status: TaskStatus::Skipped,
            };
        }

        let translation = self
            .client
            .translate(&source_text, &source_lang, &target_lang)
            .await;

        // A fallback carries the source text as-is, whitespace included
        let status = if translation.text.is_empty() {
            warn!("Error processing [{}] ({}): empty result", key, target_lang);
            TaskStatus::Failed("empty translation".to_string())
        } else {
            cell.value = translation.text.clone();
            if translation.fallback {
                TaskStatus::Fallback(translation.text)
            } else {
                TaskStatus::Translated(translation.text)
            }
        };

        TaskOutcome {
            key,
            target_lang,
            status,
        }
    }
}
