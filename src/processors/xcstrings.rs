//! String Catalog processor: plans and runs the translation of a document

use std::path::Path;
use tracing::{debug, info};

use crate::core::batch::BatchExecutor;
use crate::core::client::TranslationClient;
use crate::core::document::{StringEntry, StringUnit, XcStringsDocument};
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{BatchProgress, RunSummary, TranslationTask};
use crate::core::placeholder::is_trivial_text;

/// Options for a document run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Languages to fill in
    pub target_languages: Vec<String>,
    /// Language the text is read from
    pub source_language: String,
    /// Maximum number of concurrent translation calls
    pub batch_size: usize,
    /// Retranslate targets that already have a value
    pub force: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            target_languages: vec!["en".to_string(), "pt-PT".to_string()],
            source_language: "es".to_string(),
            batch_size: 10,
            force: true,
        }
    }
}

impl TranslateOptions {
    /// Reject a zero batch size or missing languages
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(TranslationError::ConfigError {
                message: "batch size must be greater than 0".to_string(),
            });
        }
        if self.source_language.trim().is_empty() {
            return Err(TranslationError::ConfigError {
                message: "source language is required".to_string(),
            });
        }
        if self.target_languages.is_empty() {
            return Err(TranslationError::ConfigError {
                message: "at least one target language is required".to_string(),
            });
        }
        Ok(())
    }

    /// Target languages without duplicates and without the source language
    fn effective_targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        for lang in &self.target_languages {
            let lang = lang.as_str();
            if lang != self.source_language && !targets.contains(&lang) {
                targets.push(lang);
            }
        }
        targets
    }
}

/// Split a comma separated language list, dropping blanks
pub fn parse_language_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
        .collect()
}

/// Text to translate for an entry: configured source language, then the
/// document's declared source language, then the key itself.
fn source_text<'e>(
    key: &'e str,
    entry: &'e StringEntry,
    source_language: &str,
    declared_language: &str,
) -> &'e str {
    entry
        .value(source_language)
        .or_else(|| entry.value(declared_language))
        .unwrap_or(key)
}

/// Build one task per (key, target language) cell that needs translating.
///
/// Missing target localizations are inserted as empty `translated` units.
/// Each returned task holds the only mutable borrow of its cell.
pub fn plan_tasks<'a>(
    document: &'a mut XcStringsDocument,
    options: &TranslateOptions,
) -> Vec<TranslationTask<'a>> {
    let declared_language = document.declared_source_language().to_string();
    let targets = options.effective_targets();
    let mut tasks = Vec::new();

    for (key, entry) in document.strings.iter_mut() {
        if key.is_empty() {
            continue;
        }

        let text = source_text(key, entry, &options.source_language, &declared_language).to_string();
        if is_trivial_text(&text) {
            debug!("Skipping [{}]: '{}' is not translatable text", key, text);
            continue;
        }

        let mut wanted: Vec<&str> = Vec::new();
        for &target in &targets {
            let localization = entry
                .localizations
                .entry(target.to_string())
                .or_insert_with(|| StringUnit::pending().into());

            match &localization.string_unit {
                None => debug!("Skipping [{}] ({}): no stringUnit", key, target),
                Some(unit) if !options.force && !unit.value.is_empty() => {}
                Some(_) => wanted.push(target),
            }
        }

        for (lang, localization) in entry.localizations.iter_mut() {
            if !wanted.contains(&lang.as_str()) {
                continue;
            }
            if let Some(cell) = localization.string_unit.as_mut() {
                tasks.push(TranslationTask {
                    key: key.clone(),
                    source_text: text.clone(),
                    source_lang: options.source_language.clone(),
                    target_lang: lang.clone(),
                    cell,
                });
            }
        }
    }

    tasks
}

/// Translates String Catalog documents in place
#[derive(Debug, Clone)]
pub struct XcStringsProcessor {
    executor: BatchExecutor,
}

impl XcStringsProcessor {
    /// Create a processor that translates through `client`
    pub fn new(client: TranslationClient) -> Self {
        Self {
            executor: BatchExecutor::new(client),
        }
    }

    /// Create from environment configuration
    pub fn from_env() -> Result<Self> {
        let client = TranslationClient::from_env()?;
        Ok(Self::new(client))
    }

    /// Translate `document` in place; `summary.total` is the number of
    /// tasks processed.
    pub async fn translate<F>(
        &self,
        document: &mut XcStringsDocument,
        options: &TranslateOptions,
        on_batch: F,
    ) -> RunSummary
    where
        F: FnMut(&BatchProgress),
    {
        let entries = document.strings.len();
        info!("File language: {}", document.declared_source_language());
        info!("Translation source language: {}", options.source_language);
        info!("Target languages: {}", options.target_languages.join(", "));
        info!("Strings in file: {}", entries);

        let tasks = plan_tasks(document, options);
        if tasks.is_empty() {
            info!("Nothing requires translation");
            return RunSummary {
                entries,
                ..Default::default()
            };
        }

        info!(
            "Translating {} cells in batches of {}",
            tasks.len(),
            options.batch_size
        );
        let outcomes = self
            .executor
            .run_batches(tasks, options.batch_size, on_batch)
            .await;

        RunSummary::from_outcomes(entries, &outcomes)
    }

    /// Load `input`, translate it and write the result to `output`
    pub async fn translate_file<F>(
        &self,
        input: &Path,
        output: &Path,
        options: &TranslateOptions,
        on_batch: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&BatchProgress),
    {
        options.validate()?;

        let mut document = XcStringsDocument::load(input).await?;
        let summary = self.translate(&mut document, options, on_batch).await;
        document.save(output).await?;

        info!("Translated: {} -> {}", input.display(), output.display());
        Ok(summary)
    }
}
