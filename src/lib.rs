//! Xcode String Catalog translator
//!
//! Translates the string tables of `.xcstrings` documents through an
//! external translation API, keeping format specifiers such as `%@` intact
//! and processing cells in bounded concurrent batches.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod processors;

// Re-export key types for convenience
pub use crate::core::{
    batch::BatchExecutor,
    client::TranslationClient,
    config::TranslatorConfig,
    document::{Localization, StringEntry, StringUnit, TranslationState, XcStringsDocument},
    errors::TranslationError,
    models::{BatchProgress, RunSummary, TaskOutcome, TaskStatus, Translation, TranslationRequest, TranslationTask},
    placeholder::{extract_placeholders, is_trivial_text, restore, PlaceholderToken},
    provider::{MyMemoryProvider, Translate},
};

pub use crate::processors::xcstrings::{TranslateOptions, XcStringsProcessor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
