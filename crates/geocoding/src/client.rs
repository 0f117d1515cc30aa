use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Errors returned by the geocoding client.
#[derive(Debug, thiserror::Error)]
pub enum GeocodingError {
    /// The geocoder returned no result for the query
    #[error("No results for location")]
    NoResults,

    /// The geocoder rejected our credentials
    #[error("Geocoder authentication failed")]
    AuthenticationFailed,

    /// The geocoder is rate limiting us
    #[error("Geocoder rate limit exceeded")]
    RateLimited,

    /// Any other transport or protocol failure
    #[error("Geocoding API error: {0}")]
    ApiError(String),
}

/// A resolved location: canonical place name plus coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedLocation {
    /// Canonical address string returned by the geocoder
    pub place_name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// Response structure from the Mapbox geocoding API
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    features: Vec<GeocodingFeature>,
}

/// Individual match from the Mapbox geocoding API
#[derive(Debug, Deserialize)]
struct GeocodingFeature {
    place_name: String,
    /// Coordinates as [longitude, latitude]
    center: [f64; 2],
}

/// Client for the Mapbox forward-geocoding API.
#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl GeocodingClient {
    /// Create a new geocoding client with the given Mapbox access token.
    pub fn new(access_token: String) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| GeocodingError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: "https://api.mapbox.com/geocoding/v5/mapbox.places".to_string(),
            access_token,
        })
    }

    /// Resolve a free-form location string to coordinates and a canonical name.
    pub async fn forward(&self, location: &str) -> Result<GeocodedLocation, GeocodingError> {
        debug!("Geocoding location: {}", location);

        let url = format!(
            "{}/{}.json",
            self.base_url,
            urlencoding::encode(location)
        );

        let params = vec![
            ("access_token", self.access_token.clone()),
            ("limit", "1".to_string()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| GeocodingError::ApiError(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            match status.as_u16() {
                429 => return Err(GeocodingError::RateLimited),
                401 | 403 => return Err(GeocodingError::AuthenticationFailed),
                _ => return Err(GeocodingError::ApiError(format!("HTTP {}", status))),
            }
        }

        let geocoding_response: GeocodingResponse = response
            .json()
            .await
            .map_err(|e| GeocodingError::ApiError(format!("Failed to parse response: {}", e)))?;

        primary_location(geocoding_response).ok_or(GeocodingError::NoResults)
    }
}

/// Pick the best match out of a geocoding response.
fn primary_location(response: GeocodingResponse) -> Option<GeocodedLocation> {
    response.features.into_iter().next().map(|feature| {
        let [longitude, latitude] = feature.center;
        GeocodedLocation {
            place_name: feature.place_name,
            latitude,
            longitude,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_location_parses_center_as_lng_lat() {
        let response: GeocodingResponse = serde_json::from_str(
            r#"{
                "features": [
                    {
                        "place_name": "Yosemite National Park, California, United States",
                        "center": [-119.5383, 37.8651]
                    },
                    {
                        "place_name": "Yosemite Lakes, California, United States",
                        "center": [-119.7800, 37.1900]
                    }
                ]
            }"#,
        )
        .unwrap();

        let location = primary_location(response).unwrap();
        assert_eq!(
            location.place_name,
            "Yosemite National Park, California, United States"
        );
        assert_eq!(location.latitude, 37.8651);
        assert_eq!(location.longitude, -119.5383);
    }

    #[test]
    fn test_primary_location_empty_features() {
        let response: GeocodingResponse = serde_json::from_str(r#"{"features": []}"#).unwrap();
        assert!(primary_location(response).is_none());
    }
}
