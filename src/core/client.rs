//! Translation client with placeholder masking and fallback logic

use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{Translation, TranslationRequest};
use crate::core::placeholder::{extract_placeholders, leftover_markers, missing_markers, restore};
use crate::core::provider::{MyMemoryProvider, Translate};

/// Strip a region or script suffix: `pt-PT` -> `pt`, `zh-Hans` -> `zh`
pub fn base_language(lang: &str) -> &str {
    lang.split('-').next().unwrap_or(lang)
}

/// Translation client that never fails: any provider error yields the
/// original text, flagged as a fallback.
#[derive(Clone)]
pub struct TranslationClient {
    provider: Arc<dyn Translate>,
    strict_placeholders: bool,
}

impl std::fmt::Debug for TranslationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationClient")
            .field("provider", &self.provider.provider_name())
            .field("strict_placeholders", &self.strict_placeholders)
            .finish()
    }
}

impl TranslationClient {
    /// Create a client on top of any provider
    pub fn new(provider: Arc<dyn Translate>) -> Self {
        Self {
            provider,
            strict_placeholders: true,
        }
    }

    /// Create a MyMemory backed client from configuration
    pub fn from_config(config: &TranslatorConfig) -> Result<Self> {
        let provider = MyMemoryProvider::new(config)?;
        Ok(Self::new(Arc::new(provider)).with_strict_placeholders(config.strict_placeholders))
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        let config = TranslatorConfig::from_env()?;
        Self::from_config(&config)
    }

    /// Whether a translation that dropped a placeholder marker counts as
    /// a failure
    pub fn with_strict_placeholders(mut self, strict: bool) -> Self {
        self.strict_placeholders = strict;
        self
    }

    /// Name of the underlying provider, for logs
    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Translate `text`, falling back to it unchanged on any failure
    pub async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Translation {
        match self.try_translate(text, source_lang, target_lang).await {
            Ok(translated) => Translation::translated(translated),
            Err(e) => {
                warn!(
                    "Failed to translate '{}' from {} to {}: {}",
                    text, source_lang, target_lang, e
                );
                Translation::fallback(text)
            }
        }
    }

    /// Mask, translate and restore; errors are returned to the caller
    pub async fn try_translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String> {
        let (masked, tokens) = extract_placeholders(text);
        let request = TranslationRequest::new(masked, source_lang, base_language(target_lang));

        let translated = self.provider.translate(&request).await?;
        if translated.trim().is_empty() {
            return Err(TranslationError::InvalidResponseError {
                message: "empty translation".to_string(),
            });
        }

        let missing = missing_markers(&translated, &tokens);
        if !missing.is_empty() {
            if self.strict_placeholders {
                return Err(TranslationError::PlaceholderLoss {
                    markers: missing.into_iter().map(str::to_string).collect(),
                });
            }
            warn!(
                "Accepting translation of '{}' without placeholders {:?}",
                text, missing
            );
        }

        let restored = restore(&translated, &tokens);

        // Repeated markers survive restore; never accepted, even when lenient
        let leftover = leftover_markers(&restored, text);
        if !leftover.is_empty() {
            return Err(TranslationError::PlaceholderLoss { markers: leftover });
        }

        debug!(
            "[{}] {} -> {}: '{}' => '{}'",
            self.provider.provider_name(),
            source_lang,
            target_lang,
            text,
            restored
        );
        Ok(restored)
    }
}
