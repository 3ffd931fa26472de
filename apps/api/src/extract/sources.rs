//! Source Extractor — pulls grounding citations and generated text out of a
//! raw `generateContent` response envelope.
//!
//! Missing or malformed paths produce empty output, never an error.

use serde_json::Value;

use crate::leads::models::GroundingSource;

/// Title used when a Maps chunk carries a URI but no title.
pub const FALLBACK_SOURCE_TITLE: &str = "Google Maps Link";

/// Walks `candidates[0].groundingMetadata.groundingChunks` and returns one
/// source per chunk that carries a Maps URI, in chunk order.
pub fn extract_sources(envelope: &Value) -> Vec<GroundingSource> {
    let Some(chunks) = envelope
        .pointer("/candidates/0/groundingMetadata/groundingChunks")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    chunks
        .iter()
        .filter_map(|chunk| {
            let maps = chunk.get("maps")?;
            let uri = maps
                .get("uri")
                .and_then(Value::as_str)
                .filter(|u| !u.is_empty())?;
            let title = maps
                .get("title")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .unwrap_or(FALLBACK_SOURCE_TITLE);
            Some(GroundingSource {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}

/// Returns the generated markdown carried by the envelope.
///
/// Accepts both the SDK shape (top-level `text`) and the REST shape
/// (`candidates[0].content.parts[*].text`, concatenated and trimmed).
pub fn extract_markdown(envelope: &Value) -> String {
    if let Some(text) = envelope.get("text").and_then(Value::as_str) {
        return text.to_string();
    }

    envelope
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<String>()
                .trim()
                .to_string()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_maps_chunks_in_order() {
        let envelope = json!({
            "candidates": [{
                "groundingMetadata": {
                    "groundingChunks": [
                        {"maps": {"uri": "https://maps.google.com/?cid=1", "title": "Café Atlas"}},
                        {"web": {"uri": "https://example.com", "title": "Not a map"}},
                        {"maps": {"uri": "https://maps.google.com/?cid=2"}},
                        {"maps": {"title": "No uri"}}
                    ]
                }
            }]
        });

        let sources = extract_sources(&envelope);
        assert_eq!(
            sources,
            vec![
                GroundingSource {
                    title: "Café Atlas".to_string(),
                    uri: "https://maps.google.com/?cid=1".to_string(),
                },
                GroundingSource {
                    title: FALLBACK_SOURCE_TITLE.to_string(),
                    uri: "https://maps.google.com/?cid=2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_chunk_with_empty_uri_is_skipped() {
        let envelope = json!({"candidates": [{"groundingMetadata": {"groundingChunks": [
            {"maps": {"uri": "", "title": "Hammam Nour"}},
            {"maps": {"uri": "https://maps.google.com/?cid=7", "title": "Riad Dar"}}
        ]}}]});
        let sources = extract_sources(&envelope);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, "Riad Dar");
    }

    #[test]
    fn test_malformed_envelopes_yield_no_sources() {
        for envelope in [
            json!(null),
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{"groundingMetadata": {"groundingChunks": "oops"}}]}),
            json!({"candidates": [{"groundingMetadata": {}}]}),
            json!([1, 2, 3]),
        ] {
            assert!(extract_sources(&envelope).is_empty(), "{envelope}");
        }
    }

    #[test]
    fn test_markdown_prefers_top_level_text() {
        let envelope = json!({
            "text": "| A | 1 | 2 |",
            "candidates": [{"content": {"parts": [{"text": "ignored"}]}}]
        });
        assert_eq!(extract_markdown(&envelope), "| A | 1 | 2 |");
    }

    #[test]
    fn test_markdown_joins_candidate_parts() {
        let envelope = json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "  | A | 1 | 2 |\n"},
                    {"inlineData": {}},
                    {"text": "| B | 3 | 4 |  "}
                ]}
            }]
        });
        assert_eq!(extract_markdown(&envelope), "| A | 1 | 2 |\n| B | 3 | 4 |");
    }

    #[test]
    fn test_markdown_missing_is_empty() {
        assert_eq!(extract_markdown(&json!({})), "");
        assert_eq!(extract_markdown(&json!({"candidates": [{}]})), "");
    }
}
