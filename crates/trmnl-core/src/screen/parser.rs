//! Tolerant decoding of the current screen API response.
//!
//! The API normally answers with JSON, but has been seen emitting a
//! hash-literal form (`{"status"=>200, "refresh_rate"=>nil}`). Decoding runs
//! in two stages: strict JSON, then a rewrite of `=>` and `nil` followed by a
//! second JSON attempt. Anything still undecodable yields an empty descriptor.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::types::ScreenDescriptor;

static NIL_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnil\b").expect("nil pattern is valid"));

/// A response body as handed over by the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Already decoded by the transport layer.
    Structured(Value),
    Text(String),
}

impl From<&[u8]> for ResponseBody {
    fn from(bytes: &[u8]) -> Self {
        ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned())
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        ResponseBody::Structured(value)
    }
}

/// Decode a response body. Never fails.
pub fn parse(body: &ResponseBody) -> ScreenDescriptor {
    match body {
        ResponseBody::Structured(value) => descriptor_from_value(value),
        ResponseBody::Text(text) => match decode_text(text) {
            Some(value) => descriptor_from_value(&value),
            None => ScreenDescriptor::default(),
        },
    }
}

fn decode_text(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    let rewritten = rewrite_hash_literal(text);
    match serde_json::from_str(&rewritten) {
        Ok(value) => {
            debug!(event = "core.parser.legacy_format_decoded");
            Some(value)
        }
        Err(e) => {
            warn!(
                event = "core.parser.decode_failed",
                error = %e,
                body_len = text.len(),
                "Response body is neither JSON nor hash-literal, treating as empty"
            );
            None
        }
    }
}

/// `key=>value` becomes `key:value` and the bare word `nil` becomes `null`.
fn rewrite_hash_literal(text: &str) -> String {
    let text = text.replace("=>", ":");
    NIL_WORD.replace_all(&text, "null").into_owned()
}

fn descriptor_from_value(value: &Value) -> ScreenDescriptor {
    match value {
        Value::Object(map) => descriptor_from_map(map),
        _ => ScreenDescriptor::default(),
    }
}

fn descriptor_from_map(map: &Map<String, Value>) -> ScreenDescriptor {
    ScreenDescriptor {
        status: map.get("status").and_then(Value::as_f64),
        image_url: map
            .get("image_url")
            .and_then(Value::as_str)
            .map(str::to_string),
        refresh_rate_seconds: map.get("refresh_rate").and_then(numeric_rate),
    }
}

/// Numbers are taken as-is, zero included. Strings count only when they
/// hold a non-zero number; `""` and `"0"` are absent.
fn numeric_rate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|rate| rate.is_finite() && *rate != 0.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(body: &str) -> ResponseBody {
        ResponseBody::Text(body.to_string())
    }

    #[test]
    fn test_json_text_and_structured_agree() {
        let raw = r#"{"status":200,"image_url":"https://x/img.png","refresh_rate":900}"#;
        let from_text = parse(&text(raw));
        let from_value = parse(&ResponseBody::Structured(
            serde_json::from_str(raw).unwrap(),
        ));

        assert_eq!(from_text, from_value);
        assert_eq!(
            from_text,
            ScreenDescriptor {
                status: Some(200.0),
                image_url: Some("https://x/img.png".to_string()),
                refresh_rate_seconds: Some(900.0),
            }
        );
    }

    #[test]
    fn test_legacy_hash_literal() {
        let body = r#"{"status"=>200, "image_url"=>"http://x/a.bmp", "refresh_rate"=>nil}"#;
        let descriptor = parse(&text(body));
        assert_eq!(descriptor.status, Some(200.0));
        assert_eq!(descriptor.image_url.as_deref(), Some("http://x/a.bmp"));
        assert_eq!(descriptor.refresh_rate_seconds, None);
    }

    #[test]
    fn test_nil_inside_words_is_untouched() {
        let body = r#"{"status"=>200, "image_url"=>"http://x/vanilla.png"}"#;
        let descriptor = parse(&text(body));
        assert_eq!(
            descriptor.image_url.as_deref(),
            Some("http://x/vanilla.png")
        );
    }

    #[test]
    fn test_garbage_yields_empty_descriptor() {
        assert_eq!(parse(&text("<html>502</html>")), ScreenDescriptor::default());
        assert_eq!(parse(&text("")), ScreenDescriptor::default());
    }

    #[test]
    fn test_non_object_documents_are_empty() {
        assert_eq!(parse(&text("[1,2,3]")), ScreenDescriptor::default());
        assert_eq!(parse(&text("42")), ScreenDescriptor::default());
        assert_eq!(
            parse(&ResponseBody::Structured(json!("hello"))),
            ScreenDescriptor::default()
        );
    }

    #[test]
    fn test_wrong_field_types_are_absent() {
        let descriptor = parse(&ResponseBody::Structured(json!({
            "status": "200",
            "image_url": 7,
            "refresh_rate": true,
        })));
        assert_eq!(descriptor, ScreenDescriptor::default());
    }

    #[test]
    fn test_numeric_string_refresh_rate() {
        let descriptor = parse(&ResponseBody::Structured(json!({ "refresh_rate": "600" })));
        assert_eq!(descriptor.refresh_rate_seconds, Some(600.0));
    }

    #[test]
    fn test_zero_refresh_rate_is_kept_only_as_number() {
        let descriptor = parse(&ResponseBody::Structured(json!({ "refresh_rate": 0 })));
        assert_eq!(descriptor.refresh_rate_seconds, Some(0.0));

        for absent in [json!("0"), json!(""), json!("soon"), Value::Null] {
            let descriptor =
                parse(&ResponseBody::Structured(json!({ "refresh_rate": absent })));
            assert_eq!(descriptor.refresh_rate_seconds, None, "{absent}");
        }
    }

    #[test]
    fn test_any_numeric_status_is_kept() {
        let descriptor = parse(&text(r#"{"status":200.0}"#));
        assert_eq!(descriptor.status, Some(200.0));

        let descriptor = parse(&text(r#"{"status":200.5}"#));
        assert_eq!(descriptor.status, Some(200.5));
    }

    #[test]
    fn test_from_bytes_is_lossy_text() {
        let body = ResponseBody::from(&b"{\"status\":503}"[..]);
        assert_eq!(parse(&body).status, Some(503.0));
    }
}
