//! Placeholder masking for format specifiers
//!
//! Format specifiers such as `%@`, `%lld` or `%1$.2f` are swapped for
//! positional markers (`__PH0__`, `__PH1__`, ...) before text is sent to the
//! translation service and swapped back afterwards, so the service never
//! gets a chance to translate, reorder or "fix" them.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Optional `+`, `%`, optional `n$`, optional width/precision, optional
/// length modifier, conversion character.
/// Digits are ASCII only.
const SPECIFIER: &str =
    r"\+?%(?:[0-9]+\$)?[0-9]*(?:\.[0-9]+)?(?:hh|ll|[hlqztj])?[@dDiuUxXoOfFeEgGaAcCsSp]";

/// `%%` is listed first so an escaped percent is consumed before it can be
/// read as the start of a specifier.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("%%|{}", SPECIFIER)).expect("valid placeholder regex"));

static TRIVIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^(?:{}|[0-9]+)$", SPECIFIER)).expect("valid trivial regex"));

static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__PH[0-9]+__").expect("valid marker regex"));

/// A masked format specifier, valid for a single translation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderToken {
    /// Marker sent to the service in place of the specifier, e.g. `__PH0__`
    pub marker: String,
    /// The specifier exactly as written in the source text
    pub value: String,
}

fn marker_for(index: usize) -> String {
    format!("__PH{}__", index)
}

/// Replace every format specifier in `text` with a positional marker.
///
/// Returns the masked text and the tokens in left-to-right order.
pub fn extract_placeholders(text: &str) -> (String, Vec<PlaceholderToken>) {
    let mut masked = String::with_capacity(text.len());
    let mut tokens = Vec::new();
    let mut last = 0;

    for found in PLACEHOLDER_RE.find_iter(text) {
        if found.as_str() == "%%" {
            continue;
        }

        let marker = marker_for(tokens.len());
        masked.push_str(&text[last..found.start()]);
        masked.push_str(&marker);
        tokens.push(PlaceholderToken {
            marker,
            value: found.as_str().to_string(),
        });
        last = found.end();
    }

    masked.push_str(&text[last..]);
    (masked, tokens)
}

/// Put the original specifiers back in place of their markers.
///
/// A marker the service dropped is skipped; the placeholder is lost from the
/// output. Use [`missing_markers`] to detect that case.
pub fn restore(text: &str, tokens: &[PlaceholderToken]) -> String {
    let mut restored = text.to_string();

    for token in tokens {
        match restored.find(&token.marker) {
            Some(pos) => restored.replace_range(pos..pos + token.marker.len(), &token.value),
            None => debug!("Marker {} missing, '{}' not restored", token.marker, token.value),
        }
    }

    restored
}

/// Markers from `tokens` that do not occur in `text`
pub fn missing_markers<'a>(text: &str, tokens: &'a [PlaceholderToken]) -> Vec<&'a str> {
    tokens
        .iter()
        .filter(|token| !text.contains(&token.marker))
        .map(|token| token.marker.as_str())
        .collect()
}

/// Markers still present in `restored` that were not already part of
/// `original`. A service that repeats a marker leaves the extra copies behind.
pub fn leftover_markers(restored: &str, original: &str) -> Vec<String> {
    MARKER_RE
        .find_iter(restored)
        .map(|found| found.as_str())
        .filter(|marker| !original.contains(marker))
        .map(str::to_string)
        .collect()
}

/// Text that is not natural language and must pass through untranslated:
/// empty, `-`, a bare integer, or a bare (optionally `+`-prefixed) specifier.
pub fn is_trivial_text(text: &str) -> bool {
    text.is_empty() || text == "-" || TRIVIAL_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_and_restore_roundtrip() {
        let samples = [
            "Hola %@",
            "%@ tiene %lld mensajes",
            "Precio: %.2f € (+%d%%)",
            "%1$@ y %2$@",
            "+%@ más",
            "Sin marcadores",
            "100%% seguro",
        ];

        for sample in samples {
            let (masked, tokens) = extract_placeholders(sample);
            assert_eq!(restore(&masked, &tokens), sample, "roundtrip of {:?}", sample);
        }
    }

    #[test]
    fn test_extract_orders_markers() {
        let (masked, tokens) = extract_placeholders("%@ tiene %lld mensajes");

        assert_eq!(masked, "__PH0__ tiene __PH1__ mensajes");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].value, "%@");
        assert_eq!(tokens[1].value, "%lld");
    }

    #[test]
    fn test_escaped_percent_is_not_a_placeholder() {
        let (masked, tokens) = extract_placeholders("50%% de %d");

        assert_eq!(masked, "50%% de __PH0__");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "%d");
    }

    #[test]
    fn test_plus_prefix_is_part_of_the_token() {
        let (masked, tokens) = extract_placeholders("Tienes +%@");

        assert_eq!(masked, "Tienes __PH0__");
        assert_eq!(tokens[0].value, "+%@");
    }

    #[test]
    fn test_restore_after_reordering() {
        let (_, tokens) = extract_placeholders("%@ de %@");
        // A translation that swapped the markers around
        let translated = "__PH1__ of __PH0__";

        assert_eq!(restore(translated, &tokens), "%@ of %@");
    }

    #[test]
    fn test_restore_skips_missing_marker() {
        let (_, tokens) = extract_placeholders("Hola %@, tienes %d");
        let translated = "Hello __PH0__, you have";

        assert_eq!(restore(translated, &tokens), "Hello %@, you have");
        assert_eq!(missing_markers(translated, &tokens), vec!["__PH1__"]);
    }

    #[test]
    fn test_markers_do_not_collide() {
        let text = (0..12).map(|_| "%d").collect::<Vec<_>>().join(" ");
        let (masked, tokens) = extract_placeholders(&text);

        assert_eq!(tokens.len(), 12);
        assert!(masked.contains("__PH1__"));
        assert!(masked.contains("__PH11__"));
        assert_eq!(restore(&masked, &tokens), text);
    }

    #[test]
    fn test_duplicated_marker_is_left_over() {
        let (_, tokens) = extract_placeholders("Hola %@");
        let restored = restore("Hello __PH0__ __PH0__", &tokens);

        assert_eq!(restored, "Hello %@ __PH0__");
        assert!(missing_markers("Hello __PH0__ __PH0__", &tokens).is_empty());
        assert_eq!(leftover_markers(&restored, "Hola %@"), vec!["__PH0__"]);
    }

    #[test]
    fn test_literal_marker_in_source_is_not_left_over() {
        assert!(leftover_markers("Use __PH0__ here", "Usa __PH0__ aquí").is_empty());
        assert!(leftover_markers("Hello %@", "Hola %@").is_empty());
    }

    #[test]
    fn test_non_ascii_digits_are_not_trivial() {
        assert!(!is_trivial_text("\u{0664}\u{0662}"));
        assert!(!is_trivial_text("%\u{0662}$@"));
        assert!(is_trivial_text("%2$@"));
    }

    #[test]
    fn test_trivial_text() {
        for trivial in ["", "-", "42", "0", "%@", "+%@", "%lld", "%d", "%1$@"] {
            assert!(is_trivial_text(trivial), "{:?} should be trivial", trivial);
        }

        for content in ["Hola", "42 km", "%@ y %@", "-1", "Hola %@", " ", "--"] {
            assert!(!is_trivial_text(content), "{:?} should not be trivial", content);
        }
    }
}
