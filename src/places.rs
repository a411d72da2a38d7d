use crate::error::Error;
use serde::{Deserialize, Serialize};

static TEXT_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";

/// A geographic search result flattened to the fields survey choices keep.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Place {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

pub trait PlaceFinder {
    async fn search(&self, query: &str, radius: i32) -> Result<Vec<Place>, Error>;
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    results: Vec<SearchResult>,
}

impl SearchResponse {
    fn into_places(self) -> Result<Vec<Place>, Error> {
        match self.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(self
                .results
                .into_iter()
                .map(|r| Place {
                    name: r.name,
                    address: r.formatted_address,
                    lat: r.geometry.location.lat,
                    lng: r.geometry.location.lng,
                })
                .collect()),
            status => Err(Error::PlacesStatusError(status.to_owned())),
        }
    }
}

pub struct GooglePlaces {
    key: String,
    client: reqwest::Client,
}

impl GooglePlaces {
    pub fn new(key: String) -> Self {
        Self {
            key,
            client: reqwest::Client::new(),
        }
    }
}

impl PlaceFinder for GooglePlaces {
    async fn search(&self, query: &str, radius: i32) -> Result<Vec<Place>, Error> {
        let radius = radius.to_string();
        let resp: SearchResponse = self
            .client
            .get(TEXT_SEARCH_URL)
            .query(&[("query", query), ("radius", radius.as_str()), ("key", self.key.as_str())])
            .send()
            .await?
            .json()
            .await?;
        resp.into_places()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "status": "OK",
            "results": [
                {
                    "name": "Red Iguana",
                    "formatted_address": "736 W North Temple, Salt Lake City, UT 84116",
                    "geometry": { "location": { "lat": 40.7718, "lng": -111.9124 }, "viewport": {} },
                    "types": ["restaurant"]
                }
            ]
        }"#;
        let resp: SearchResponse = serde_json::from_str(body).unwrap();
        let places = resp.into_places().unwrap();
        assert_eq!(
            places,
            vec![Place {
                name: "Red Iguana".into(),
                address: "736 W North Temple, Salt Lake City, UT 84116".into(),
                lat: 40.7718,
                lng: -111.9124,
            }]
        );
    }

    #[test]
    fn test_zero_results_is_empty() {
        let body = r#"{ "status": "ZERO_RESULTS", "results": [] }"#;
        let resp: SearchResponse = serde_json::from_str(body).unwrap();
        assert!(resp.into_places().unwrap().is_empty());
    }

    #[test]
    fn test_upstream_denied_is_bad_gateway() {
        use actix_web::{http::StatusCode, ResponseError};

        let body = r#"{ "status": "REQUEST_DENIED", "results": [] }"#;
        let resp: SearchResponse = serde_json::from_str(body).unwrap();
        let err = resp.into_places().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
