//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::document::StringUnit;

/// Translation request sent to a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Masked source text
    pub text: String,
    /// Source language code
    pub source_lang: String,
    /// Base target language code (`pt`, not `pt-PT`)
    pub target_lang: String,
}

impl TranslationRequest {
    /// Build a request
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }

    /// MyMemory style language pair, e.g. `es|pt`
    pub fn lang_pair(&self) -> String {
        format!("{}|{}", self.source_lang, self.target_lang)
    }
}

/// Result of a translation client call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Text to store in the cell
    pub text: String,
    /// `true` when the call failed and `text` is the untouched input
    pub fallback: bool,
}

impl Translation {
    /// Successful translation
    pub fn translated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fallback: false,
        }
    }

    /// Failed call carrying the original text
    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fallback: true,
        }
    }
}

/// One (key, target language) cell to translate.
///
/// Holds the only mutable borrow of its cell for the duration of a run, so
/// two tasks can never write the same slot.
#[derive(Debug)]
pub struct TranslationTask<'a> {
    /// String key of the entry
    pub key: String,
    /// Text to translate, already chosen by source priority
    pub source_text: String,
    /// Language of `source_text`
    pub source_lang: String,
    /// Target language as written in the document
    pub target_lang: String,
    /// The target `stringUnit` this task writes
    pub cell: &'a mut StringUnit,
}

/// Per-task status after execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// Cell holds a fresh translation
    Translated(String),
    /// The call failed; cell holds the source text
    Fallback(String),
    /// Trivial text, written back unchanged
    Skipped,
    /// No usable result; cell left as it was
    Failed(String),
}

impl TaskStatus {
    /// Anything but [`TaskStatus::Failed`]
    pub fn is_success(&self) -> bool {
        !matches!(self, TaskStatus::Failed(_))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Translated(_) => write!(f, "translated"),
            TaskStatus::Fallback(_) => write!(f, "fallback"),
            TaskStatus::Skipped => write!(f, "skipped"),
            TaskStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Outcome record of a single task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    /// String key of the entry
    pub key: String,
    /// Target language of the cell
    pub target_lang: String,
    /// What happened to the cell
    pub status: TaskStatus,
}

impl TaskOutcome {
    /// See [`TaskStatus::is_success`]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Trivial text that needed no call
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, TaskStatus::Skipped)
    }

    /// Text written into the cell, if any
    pub fn translated_text(&self) -> Option<&str> {
        match &self.status {
            TaskStatus::Translated(text) | TaskStatus::Fallback(text) => Some(text),
            TaskStatus::Skipped | TaskStatus::Failed(_) => None,
        }
    }
}

/// Progress snapshot, emitted after each batch completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchProgress {
    /// 1-based index of the batch just finished
    pub batch_index: usize,
    /// Number of batches in the run
    pub batch_count: usize,
    /// Tasks finished so far, skipped ones included
    pub completed: usize,
    /// Trivial tasks so far
    pub skipped: usize,
    /// Tasks in the run
    pub total: usize,
}

impl BatchProgress {
    /// Completed share of the run, 0 to 100
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed * 100) / self.total) as u8
    }
}

/// Summary of a whole document run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Entries in the document
    pub entries: usize,
    /// Tasks executed
    pub total: usize,
    /// Tasks that stored a fresh translation
    pub translated: usize,
    /// Tasks that stored the source text after a failed call
    pub fallback: usize,
    /// Trivial tasks
    pub skipped: usize,
    /// Tasks that left their cell untouched
    pub failed: usize,
}

impl RunSummary {
    /// Tally task outcomes
    pub fn from_outcomes(entries: usize, outcomes: &[TaskOutcome]) -> Self {
        let mut summary = Self {
            entries,
            total: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome.status {
                TaskStatus::Translated(_) => summary.translated += 1,
                TaskStatus::Fallback(_) => summary.fallback += 1,
                TaskStatus::Skipped => summary.skipped += 1,
                TaskStatus::Failed(_) => summary.failed += 1,
            }
        }

        summary
    }
}
