use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, warn};

/// Errors returned by the image-hosting client.
#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    /// The provider rejected our credentials
    #[error("Image host authentication failed")]
    AuthenticationFailed,

    /// The provider is rate limiting us
    #[error("Image host rate limit exceeded")]
    RateLimited,

    /// Any other transport or protocol failure
    #[error("Image host API error: {0}")]
    ApiError(String),
}

/// A hosted image: public URL plus the provider id used for deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    /// HTTPS URL serving the image
    pub url: String,
    /// Provider-side identifier, required to destroy the image later
    pub public_id: String,
}

/// Upload response from the Cloudinary API
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

/// Client for a Cloudinary-backed image store.
#[derive(Clone)]
pub struct ImageStoreClient {
    client: Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    upload_preset: String,
}

impl ImageStoreClient {
    /// Create a new image-store client for the given Cloudinary account.
    pub fn new(
        cloud_name: String,
        api_key: String,
        api_secret: String,
        upload_preset: String,
    ) -> Result<Self, ImageStoreError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ImageStoreError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: "https://api.cloudinary.com/v1_1".to_string(),
            cloud_name,
            api_key,
            api_secret,
            upload_preset,
        })
    }

    /// Upload image bytes, returning the hosted URL and public id.
    pub async fn upload(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredImage, ImageStoreError> {
        debug!("Uploading image {} ({} bytes)", filename, bytes.len());

        let url = format!("{}/{}/image/upload", self.base_url, self.cloud_name);

        let part = Part::bytes(bytes).file_name(filename.to_string());
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageStoreError::ApiError(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            match status.as_u16() {
                429 => return Err(ImageStoreError::RateLimited),
                401 | 403 => return Err(ImageStoreError::AuthenticationFailed),
                _ => return Err(ImageStoreError::ApiError(format!("HTTP {}", status))),
            }
        }

        let upload_response: UploadResponse = response
            .json()
            .await
            .map_err(|e| ImageStoreError::ApiError(format!("Failed to parse response: {}", e)))?;

        Ok(stored_image(upload_response))
    }

    /// Destroy a previously uploaded image by its public id.
    ///
    /// Callers treat failures as residue to log, not as fatal errors; the
    /// listing record is already gone by the time this runs.
    pub async fn destroy(&self, public_id: &str) -> Result<(), ImageStoreError> {
        debug!("Destroying remote image {}", public_id);

        let url = format!(
            "{}/{}/resources/image/upload",
            self.base_url, self.cloud_name
        );

        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .query(&[("public_ids[]", public_id)])
            .send()
            .await
            .map_err(|e| ImageStoreError::ApiError(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Image destroy for {} failed with HTTP {}", public_id, status);
            match status.as_u16() {
                429 => return Err(ImageStoreError::RateLimited),
                401 | 403 => return Err(ImageStoreError::AuthenticationFailed),
                _ => return Err(ImageStoreError::ApiError(format!("HTTP {}", status))),
            }
        }

        Ok(())
    }
}

fn stored_image(response: UploadResponse) -> StoredImage {
    StoredImage {
        url: response.secure_url,
        public_id: response.public_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_maps_to_stored_image() {
        let response: UploadResponse = serde_json::from_str(
            r#"{
                "secure_url": "https://res.cloudinary.com/demo/image/upload/v1700000000/camp.jpg",
                "public_id": "v1700000000/camp",
                "width": 1024,
                "height": 768,
                "format": "jpg"
            }"#,
        )
        .unwrap();

        let image = stored_image(response);
        assert_eq!(
            image.url,
            "https://res.cloudinary.com/demo/image/upload/v1700000000/camp.jpg"
        );
        assert_eq!(image.public_id, "v1700000000/camp");
    }
}
