use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assert_json_diff::assert_json_eq;
use async_trait::async_trait;
use serde_json::{json, Value};

use xcstrings_translator::core::errors::Result;
use xcstrings_translator::{
    TranslateOptions, Translate, TranslationClient, TranslationError, TranslationRequest,
    XcStringsDocument, XcStringsProcessor,
};

/// Uppercases the text and tags it with the target language; texts
/// containing "offline" fail like an unreachable service.
#[derive(Default)]
struct ShoutingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl Translate for ShoutingProvider {
    async fn translate(&self, request: &TranslationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.text.contains("offline") {
            return Err(TranslationError::NetworkError {
                message: "dns error".to_string(),
            });
        }
        // Markers must survive, so only uppercase the words around them
        let shouted: Vec<String> = request
            .text
            .split(' ')
            .map(|word| {
                if word.starts_with("__PH") {
                    word.to_string()
                } else {
                    word.to_uppercase()
                }
            })
            .collect();
        Ok(format!("[{}] {}", request.target_lang, shouted.join(" ")))
    }

    fn provider_name(&self) -> &str {
        "shouting"
    }
}

const CATALOG: &str = r#"{
  "sourceLanguage" : "es",
  "strings" : {
    "" : {},
    "42" : {
      "localizations" : {
        "es" : { "stringUnit" : { "state" : "translated", "value" : "42" } }
      }
    },
    "greeting" : {
      "comment" : "Shown on the home screen",
      "localizations" : {
        "es" : { "stringUnit" : { "state" : "translated", "value" : "Hola %@, tienes %lld mensajes" } },
        "en" : { "stringUnit" : { "state" : "translated", "value" : "Hi %@, you have %lld messages" } }
      }
    },
    "status" : {
      "localizations" : {
        "es" : { "stringUnit" : { "state" : "translated", "value" : "sin conexión offline" } }
      }
    }
  },
  "version" : "1.0"
}"#;

fn processor(provider: Arc<ShoutingProvider>) -> XcStringsProcessor {
    XcStringsProcessor::new(TranslationClient::new(provider))
}

#[tokio::test]
async fn translates_file_to_new_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Localizable.xcstrings");
    let output = dir.path().join("out").join("Localizable.xcstrings");
    std::fs::write(&input, CATALOG).unwrap();

    let provider = Arc::new(ShoutingProvider::default());
    let options = TranslateOptions {
        target_languages: vec!["en".to_string(), "pt-PT".to_string()],
        ..Default::default()
    };

    let summary = processor(provider.clone())
        .translate_file(&input, &output, &options, |_| {})
        .await
        .unwrap();

    // greeting x 2 + status x 2; "42" and "" are not translatable
    assert_eq!(summary.total, 4);
    assert_eq!(summary.translated, 2);
    assert_eq!(summary.fallback, 2);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 4);

    // The input is untouched when an output path is given
    assert_eq!(std::fs::read_to_string(&input).unwrap(), CATALOG);

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let expected = json!({
        "sourceLanguage": "es",
        "version": "1.0",
        "strings": {
            "": { "localizations": {} },
            "42": {
                "localizations": {
                    "es": { "stringUnit": { "state": "translated", "value": "42" } }
                }
            },
            "greeting": {
                "comment": "Shown on the home screen",
                "localizations": {
                    "es": { "stringUnit": { "state": "translated", "value": "Hola %@, tienes %lld mensajes" } },
                    "en": { "stringUnit": { "state": "translated", "value": "[en] HOLA %@, TIENES %lld MENSAJES" } },
                    "pt-PT": { "stringUnit": { "state": "translated", "value": "[pt] HOLA %@, TIENES %lld MENSAJES" } }
                }
            },
            "status": {
                "localizations": {
                    "es": { "stringUnit": { "state": "translated", "value": "sin conexión offline" } },
                    "en": { "stringUnit": { "state": "translated", "value": "sin conexión offline" } },
                    "pt-PT": { "stringUnit": { "state": "translated", "value": "sin conexión offline" } }
                }
            }
        }
    });
    assert_json_eq!(written, expected);
}

#[test]
fn rerun_without_force_is_a_no_op() {
    let provider = Arc::new(ShoutingProvider::default());
    let processor = processor(provider.clone());
    let mut document = XcStringsDocument::from_json(CATALOG).unwrap();

    let first = tokio_test::block_on(processor.translate(
        &mut document,
        &TranslateOptions::default(),
        |_| {},
    ));
    assert_eq!(first.total, 4);
    let after_first = document.clone();

    let options = TranslateOptions {
        force: false,
        ..Default::default()
    };
    let second = tokio_test::block_on(processor.translate(&mut document, &options, |_| {}));

    assert_eq!(second.total, 0);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    assert_eq!(document, after_first);
}

#[tokio::test]
async fn overwrites_input_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Localizable.xcstrings");
    std::fs::write(
        &path,
        r#"{"sourceLanguage":"es","strings":{"hello":{"localizations":{"es":{"stringUnit":{"value":"Hola %@"}}}}}}"#,
    )
    .unwrap();

    let options = TranslateOptions {
        target_languages: vec!["en".to_string()],
        ..Default::default()
    };
    processor(Arc::new(ShoutingProvider::default()))
        .translate_file(&path, &path, &options, |_| {})
        .await
        .unwrap();

    let document = XcStringsDocument::load(&path).await.unwrap();
    assert_eq!(document.value("hello", "en"), Some("[en] HOLA %@"));
}

#[tokio::test]
async fn malformed_input_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.xcstrings");
    let output = dir.path().join("out.xcstrings");
    std::fs::write(&input, r#"{"strings": "nope"}"#).unwrap();

    let provider = Arc::new(ShoutingProvider::default());
    let result = processor(provider.clone())
        .translate_file(&input, &output, &TranslateOptions::default(), |_| {})
        .await;

    assert!(matches!(result, Err(TranslationError::InvalidFormat { .. })));
    assert!(!output.exists());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}
