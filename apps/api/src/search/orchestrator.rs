//! Search Orchestrator — validates a search request, synthesizes the prompt,
//! and returns the generation service's raw response envelope.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::leads::models::SearchParams;
use crate::llm_client::{ContentGenerator, GenerationRequest, LatLng};
use crate::search::prompts::build_search_prompt;

const SEARCH_FALLBACK_ERROR: &str = "Search API error";

/// Wire request for `POST /api/search`. Fields are loosely typed on purpose:
/// validation and clamping happen in [`SearchRequest::into_query`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub service: Option<String>,
    pub city: Option<String>,
    pub count: Option<Value>,
    pub existing_names: Option<Value>,
    pub location: Option<Value>,
}

/// Reads a `{ latitude, longitude }` object. Coordinates may be numbers or
/// numeric strings; anything else counts as absent. Only a location with both
/// coordinates present and non-zero is used.
pub fn parse_location(raw: &Value) -> Option<LatLng> {
    let latitude = coordinate(raw.get("latitude"))?;
    let longitude = coordinate(raw.get("longitude"))?;
    (latitude != 0.0 && longitude != 0.0).then_some(LatLng {
        latitude,
        longitude,
    })
}

fn coordinate(raw: Option<&Value>) -> Option<f64> {
    match raw? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|c| c.is_finite())
}

/// A validated search: clamped params, exclusion hint (oldest first), location.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub params: SearchParams,
    pub excluded_names: Vec<String>,
    pub location: Option<LatLng>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl SearchRequest {
    pub fn into_query(self) -> Result<SearchQuery, AppError> {
        let (Some(service), Some(city)) = (present(&self.service), present(&self.city)) else {
            return Err(AppError::missing_fields(json!({
                "service": self.service,
                "city": self.city,
            })));
        };

        let excluded_names = match &self.existing_names {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        Ok(SearchQuery {
            params: SearchParams::new(service, city, self.count.as_ref()),
            excluded_names,
            location: self.location.as_ref().and_then(parse_location),
        })
    }
}

/// Runs one grounded search and returns the raw envelope.
pub async fn run_search(
    generator: &dyn ContentGenerator,
    query: &SearchQuery,
) -> Result<Value, AppError> {
    let SearchParams {
        service,
        city,
        count,
    } = &query.params;

    info!(
        "Searching {count} '{service}' businesses in '{city}' (excluding {} known)",
        query.excluded_names.len()
    );

    let request = GenerationRequest {
        prompt: build_search_prompt(service, city, *count, &query.excluded_names),
        maps_grounding: true,
        location: query.location,
    };

    generator
        .generate(&request)
        .await
        .map_err(|e| AppError::upstream(e, SEARCH_FALLBACK_ERROR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::StubGenerator;

    fn request(body: Value) -> SearchRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_missing_service_or_city_is_validation_error() {
        for body in [
            json!({"city": "Rabat"}),
            json!({"service": "Café"}),
            json!({"service": "  ", "city": "Rabat"}),
            json!({}),
        ] {
            let err = request(body).into_query().unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }));
        }
    }

    #[test]
    fn test_query_clamps_count_and_defaults() {
        let query = request(json!({"service": "Café", "city": "Rabat", "count": 999}))
            .into_query()
            .unwrap();
        assert_eq!(query.params.count, 200);

        let query = request(json!({"service": "Café", "city": "Rabat"}))
            .into_query()
            .unwrap();
        assert_eq!(query.params.count, 40);
        assert!(query.excluded_names.is_empty());
        assert!(query.location.is_none());
    }

    #[test]
    fn test_query_keeps_string_names_only() {
        let query = request(json!({
            "service": "Café", "city": "Rabat",
            "existingNames": ["A", 3, null, "B"]
        }))
        .into_query()
        .unwrap();
        assert_eq!(query.excluded_names, vec!["A", "B"]);

        let query = request(json!({"service": "Café", "city": "Rabat", "existingNames": "A"}))
            .into_query()
            .unwrap();
        assert!(query.excluded_names.is_empty());
    }

    #[test]
    fn test_location_requires_both_non_zero_coordinates() {
        assert!(parse_location(&json!({"latitude": 33.5, "longitude": -7.6})).is_some());
        assert!(parse_location(&json!({"latitude": 33.5})).is_none());
        assert!(parse_location(&json!({"latitude": 0.0, "longitude": -7.6})).is_none());
        assert!(parse_location(&json!("Casablanca")).is_none());
    }

    #[test]
    fn test_location_accepts_numeric_strings_only() {
        assert_eq!(
            parse_location(&json!({"latitude": "33.5", "longitude": -7.6})),
            Some(LatLng {
                latitude: 33.5,
                longitude: -7.6
            })
        );
        assert!(parse_location(&json!({"latitude": "north", "longitude": -7.6})).is_none());
        assert!(parse_location(&json!({"latitude": true, "longitude": -7.6})).is_none());
    }

    #[test]
    fn test_malformed_location_does_not_reject_request() {
        let query = request(json!({
            "service": "Café", "city": "Rabat",
            "location": {"latitude": "abc", "longitude": null}
        }))
        .into_query()
        .unwrap();
        assert!(query.location.is_none());
    }

    #[tokio::test]
    async fn test_run_search_sends_grounded_prompt() {
        let stub = StubGenerator::returning(json!({"text": "| A | 1 | 2 |"}));
        let query = request(json!({
            "service": "Café", "city": "Casablanca", "count": 3,
            "location": {"latitude": 33.57, "longitude": -7.59}
        }))
        .into_query()
        .unwrap();

        let envelope = run_search(&stub, &query).await.unwrap();
        assert_eq!(envelope["text"], "| A | 1 | 2 |");

        let sent = stub.requests();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].maps_grounding);
        assert!(sent[0].prompt.contains(r#"Find exactly 3 unique businesses that provide "Café""#));
        assert_eq!(
            sent[0].location,
            Some(LatLng {
                latitude: 33.57,
                longitude: -7.59
            })
        );
    }

    #[tokio::test]
    async fn test_run_search_maps_generator_failure_to_upstream() {
        let stub = StubGenerator::failing("quota exceeded");
        let query = request(json!({"service": "Café", "city": "Rabat"}))
            .into_query()
            .unwrap();
        let err = run_search(&stub, &query).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(ref m) if m == "quota exceeded"));
    }
}
