//! CLI argument definitions and handlers

use clap::{ArgAction, Args};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::core::client::TranslationClient;
use crate::core::config::TranslatorConfig;
use crate::processors::xcstrings::{parse_language_list, TranslateOptions, XcStringsProcessor};

/// Arguments for translating a String Catalog
#[derive(Args, Debug, Clone)]
pub struct TranslateArgs {
    /// Path to the .xcstrings file (required)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the result (default: overwrite the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Comma separated target languages
    #[arg(short, long, default_value = "en,pt-PT")]
    pub languages: String,

    /// Source language to translate from
    #[arg(short, long = "source-lang", default_value = "es")]
    pub source_lang: String,

    /// Number of translations processed in parallel
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: Option<u64>,

    /// Translate every string even if it already has a value
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    pub all: bool,

    /// Accept translations that dropped a placeholder
    #[arg(long)]
    pub lenient_placeholders: bool,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Translation endpoint (MyMemory compatible)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// JSON configuration file (overrides environment variables)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl TranslateArgs {
    /// Effective configuration: file or environment, then CLI overrides
    pub fn translator_config(&self) -> anyhow::Result<TranslatorConfig> {
        let mut config = match &self.config {
            Some(path) => TranslatorConfig::from_file(path)?,
            None => TranslatorConfig::from_env()?,
        };

        if let Some(endpoint) = &self.endpoint {
            config.api_endpoint = endpoint.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = usize::try_from(batch_size)?;
        }
        if self.lenient_placeholders {
            config.strict_placeholders = false;
        }

        config.validate()?;
        Ok(config)
    }

    /// Document options from the arguments and effective configuration
    pub fn translate_options(&self, config: &TranslatorConfig) -> TranslateOptions {
        TranslateOptions {
            target_languages: parse_language_list(&self.languages),
            source_language: self.source_lang.trim().to_string(),
            batch_size: config.batch_size,
            force: self.all,
        }
    }

    /// `--output`, or the input file itself
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| self.input.clone())
    }
}

/// Handle String Catalog translation
pub async fn handle_translate(args: TranslateArgs) -> anyhow::Result<()> {
    let start_time = Instant::now();

    if !args.input.exists() {
        anyhow::bail!("File {} does not exist", args.input.display());
    }

    let config = args.translator_config()?;
    let options = args.translate_options(&config);
    let output = args.output_path();

    info!("Input: {}", args.input.display());
    info!(
        "Output: {} ({})",
        output.display(),
        if args.output.is_some() { "new file" } else { "overwrite" }
    );
    info!("Translating all strings: {}", options.force);

    let client = TranslationClient::from_config(&config)?;
    let processor = XcStringsProcessor::new(client);

    let pb = ProgressBar::new(0);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")?
        .progress_chars("=>-"));

    let summary = processor
        .translate_file(&args.input, &output, &options, |progress| {
            pb.set_length(progress.total as u64);
            pb.set_position(progress.completed as u64);
            pb.set_message(format!("skipped: {}", progress.skipped));
        })
        .await?;

    pb.finish_and_clear();

    let duration = start_time.elapsed();
    info!(
        "Completed: {} tasks ({} translated, {} fallback, {} skipped, {} failed) in {:?}",
        summary.total, summary.translated, summary.fallback, summary.skipped, summary.failed, duration
    );

    if summary.total == 0 {
        println!("No strings required translation.");
    } else {
        println!("\n✅ Translation completed!");
        println!("   Processed: {}", summary.total);
        println!("   Translated: {}", summary.translated);
        println!("   Kept original (service error): {}", summary.fallback);
        println!("   Unchanged (special formats): {}", summary.skipped);
        println!("   Failed: {}", summary.failed);
    }
    println!("   Output: {}", output.display());
    println!("   Time: {:.2?}", duration);

    Ok(())
}
