//! Translation service providers
//!
//! [`Translate`] is the capability the rest of the crate depends on. The
//! HTTP implementation talks to a MyMemory compatible endpoint:
//!
//! ```text
//! GET {endpoint}?q=<text>&langpair=<source>|<target>[&de=<email>]
//! -> { "responseData": { "translatedText": "..." }, "responseStatus": 200 }
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::TranslationRequest;

/// A single-shot text translation service
#[async_trait]
pub trait Translate: Send + Sync {
    /// Translate `request.text` from `request.source_lang` to
    /// `request.target_lang`. Language codes are passed through as given.
    async fn translate(&self, request: &TranslationRequest) -> Result<String>;

    /// Name used in log lines
    fn provider_name(&self) -> &str;
}

/// MyMemory translation API client
#[derive(Debug, Clone)]
pub struct MyMemoryProvider {
    client: reqwest::Client,
    endpoint: String,
    contact_email: Option<String>,
}

impl MyMemoryProvider {
    /// Create a provider from configuration
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        config.validate()?;
        if config.uses_anonymous_quota() {
            warn!("MYMEMORY_EMAIL not set, using the anonymous daily quota");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(config.batch_size)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.api_endpoint.clone(),
            contact_email: config.contact_email.clone(),
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        let config = TranslatorConfig::from_env()?;
        Self::new(&config)
    }

    /// Pull the translated text out of a MyMemory response body
    fn parse_response(json: &Value) -> Result<String> {
        // responseStatus is a number on success but a string on some errors
        let status = match &json["responseStatus"] {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };

        if let Some(status) = status.filter(|s| *s != 200) {
            let message = json["responseDetails"]
                .as_str()
                .filter(|details| !details.is_empty())
                .or_else(|| json["responseData"]["translatedText"].as_str())
                .unwrap_or("unknown error")
                .to_string();

            return Err(TranslationError::ApiError {
                status: u16::try_from(status).unwrap_or(u16::MAX),
                message,
            });
        }

        json["responseData"]["translatedText"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| TranslationError::MissingField {
                field: "responseData.translatedText".to_string(),
            })
    }
}

#[async_trait]
impl Translate for MyMemoryProvider {
    async fn translate(&self, request: &TranslationRequest) -> Result<String> {
        let lang_pair = request.lang_pair();
        let mut query = vec![("q", request.text.as_str()), ("langpair", lang_pair.as_str())];
        if let Some(email) = &self.contact_email {
            query.push(("de", email.as_str()));
        }

        debug!("GET {} langpair={}", self.endpoint, lang_pair);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslationError::TimeoutError
                } else {
                    TranslationError::NetworkError {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let json: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                TranslationError::TimeoutError
            } else {
                TranslationError::InvalidResponseError {
                    message: e.to_string(),
                }
            }
        })?;

        Self::parse_response(&json)
    }

    fn provider_name(&self) -> &str {
        "MyMemory"
    }
}
