use actix_multipart::Multipart;
use futures_util::StreamExt;

use campground_services::types::{CampgroundError, CampgroundFields};

/// An image file extracted from a multipart submission.
#[derive(Debug)]
pub struct UploadedImage {
    /// Client-side filename, passed through to the image host
    pub filename: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

/// A parsed campground submission: text fields plus an optional image file.
#[derive(Debug)]
pub struct CampgroundForm {
    /// The listing fields
    pub fields: CampgroundFields,
    /// The uploaded image, when the form carried one
    pub image: Option<UploadedImage>,
}

/// Parses a multipart campground submission.
///
/// Expected parts: `name`, `price`, `description`, `location` as text and an
/// optional `image` file. Unknown parts are ignored.
pub async fn parse_campground_form(
    mut payload: Multipart,
) -> Result<CampgroundForm, CampgroundError> {
    let mut name = None;
    let mut price = None;
    let mut description = None;
    let mut location = None;
    let mut image = None;

    while let Some(field) = payload.next().await {
        let mut field = field
            .map_err(|e| CampgroundError::Validation(format!("Invalid multipart data: {}", e)))?;

        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|f| f.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| {
                CampgroundError::Validation(format!("Failed to read multipart data: {}", e))
            })?;
            bytes.extend_from_slice(&chunk);
        }

        match field_name.as_str() {
            "name" => name = Some(text_value(bytes, "name")?),
            "price" => price = Some(text_value(bytes, "price")?),
            "description" => description = Some(text_value(bytes, "description")?),
            "location" => location = Some(text_value(bytes, "location")?),
            "image" => {
                if !bytes.is_empty() {
                    image = Some(UploadedImage {
                        filename: filename.unwrap_or_else(|| "upload.jpg".to_string()),
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }

    let price = price
        .ok_or_else(|| CampgroundError::Validation("Price is required".to_string()))?
        .trim()
        .parse::<f64>()
        .map_err(|_| CampgroundError::Validation("Price must be a number".to_string()))?;

    let fields = CampgroundFields {
        name: name.ok_or_else(|| CampgroundError::Validation("Name is required".to_string()))?,
        price,
        description: description
            .ok_or_else(|| CampgroundError::Validation("Description is required".to_string()))?,
        location: location
            .ok_or_else(|| CampgroundError::Validation("Location is required".to_string()))?,
    };

    Ok(CampgroundForm { fields, image })
}

fn text_value(bytes: Vec<u8>, field: &str) -> Result<String, CampgroundError> {
    String::from_utf8(bytes)
        .map_err(|_| CampgroundError::Validation(format!("Field '{}' must be UTF-8 text", field)))
}
