use serde::{Deserialize, Serialize};

/// A GeoJSON point as stored on a campground.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// GeoJSON geometry type, always `"Point"` here.
    #[serde(rename = "type")]
    pub kind: String,

    /// Longitude and latitude, in that order.
    pub coordinates: [f64; 2],
}

impl Geometry {
    /// Builds a GeoJSON point from a longitude/latitude pair.
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [longitude, latitude],
        }
    }
}

/// Custom error type for geocoding operations
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The HTTP request to the geocoding API failed
    #[error("Geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned no features for the query
    #[error("No geocoding results for the given location")]
    NoResults,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    geometry: Geometry,
}

fn first_geometry(response: GeocodeResponse) -> Result<Geometry, GeocodeError> {
    response
        .features
        .into_iter()
        .next()
        .map(|feature| feature.geometry)
        .ok_or(GeocodeError::NoResults)
}

/// Client for the Mapbox forward-geocoding API.
#[derive(Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    token: String,
}

impl Geocoder {
    /// Creates a geocoder reading the API token from `MAPBOX_TOKEN`.
    pub fn new() -> Self {
        let token = std::env::var("MAPBOX_TOKEN").unwrap_or_default();
        Self::with_token(token)
    }

    /// Creates a geocoder with an explicit API token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
        }
    }

    /// Resolves a free-form location string to a single GeoJSON point.
    pub async fn forward_geocode(&self, query: &str) -> Result<Geometry, GeocodeError> {
        let url = format!(
            "https://api.mapbox.com/geocoding/v5/mapbox.places/{}.json?access_token={}&limit=1",
            urlencoding::encode(query),
            self.token
        );

        let response: GeocodeResponse = self.client.get(&url).send().await?.json().await?;

        first_geometry(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_serializes_as_geojson() {
        let geometry = Geometry::point(-122.3321, 47.6062);
        let json = serde_json::to_value(&geometry).unwrap();

        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"][0], -122.3321);
        assert_eq!(json["coordinates"][1], 47.6062);
    }

    #[test]
    fn response_parsing_takes_the_first_feature() {
        let response: GeocodeResponse = serde_json::from_str(
            r#"{
                "features": [
                    {"geometry": {"type": "Point", "coordinates": [-106.8175, 39.1911]}},
                    {"geometry": {"type": "Point", "coordinates": [0.0, 0.0]}}
                ]
            }"#,
        )
        .unwrap();

        let geometry = first_geometry(response).unwrap();
        assert_eq!(geometry, Geometry::point(-106.8175, 39.1911));
    }

    #[test]
    fn empty_response_is_no_results() {
        let response: GeocodeResponse = serde_json::from_str(r#"{"features": []}"#).unwrap();

        assert!(matches!(
            first_geometry(response),
            Err(GeocodeError::NoResults)
        ));
    }
}
