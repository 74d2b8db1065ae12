use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;

use crate::campground_types::{CampgroundError, CampgroundForm};

/// Uploaded files larger than this are rejected before they reach storage.
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// A file pulled out of a multipart payload.
#[derive(Debug)]
pub struct UploadedFile {
    /// Client-supplied file name, used only for its extension.
    pub filename: String,
    /// Declared content type.
    pub content_type: String,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

/// Text fields and files collected from a campground form submission.
#[derive(Debug)]
pub struct CampgroundSubmission {
    /// Scalar form fields.
    pub form: CampgroundForm,
    /// Uploaded image files (field name `image`).
    pub images: Vec<UploadedFile>,
    /// Object keys the author marked for deletion (field name `delete_images`).
    pub delete_images: Vec<String>,
}

#[derive(Debug, Default)]
struct RawFields {
    title: Option<String>,
    price: Option<String>,
    location: Option<String>,
    description: Option<String>,
}

fn build_form(raw: RawFields) -> Result<CampgroundForm, CampgroundError> {
    let price = raw
        .price
        .ok_or_else(|| CampgroundError::Validation("Price is required".to_string()))?;
    let price = price
        .trim()
        .parse::<f64>()
        .map_err(|_| CampgroundError::Validation("Price must be a number".to_string()))?;

    Ok(CampgroundForm {
        title: raw
            .title
            .ok_or_else(|| CampgroundError::Validation("Title is required".to_string()))?,
        price,
        location: raw
            .location
            .ok_or_else(|| CampgroundError::Validation("Location is required".to_string()))?,
        description: raw
            .description
            .ok_or_else(|| CampgroundError::Validation("Description is required".to_string()))?,
    })
}

async fn read_bytes(field: &mut Field) -> Result<Vec<u8>, CampgroundError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| CampgroundError::Upload(e.to_string()))?
    {
        if data.len() + chunk.len() > MAX_IMAGE_BYTES {
            return Err(CampgroundError::Upload(
                "Uploaded file exceeds the 5 MB limit".to_string(),
            ));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn read_text(field: &mut Field) -> Result<String, CampgroundError> {
    let data = read_bytes(field).await?;
    String::from_utf8(data)
        .map_err(|_| CampgroundError::Upload("Form field is not valid UTF-8".to_string()))
}

/// Collects a campground form submission from a multipart payload: the scalar
/// fields, the uploaded image files, and any image keys marked for deletion.
pub async fn collect_campground_form(
    mut payload: Multipart,
) -> Result<CampgroundSubmission, CampgroundError> {
    let mut raw = RawFields::default();
    let mut images = Vec::new();
    let mut delete_images = Vec::new();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| CampgroundError::Upload(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "image" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or("upload")
                    .to_string();
                let content_type = field
                    .content_type()
                    .map(|mime| mime.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let data = read_bytes(&mut field).await?;

                // Browsers submit an empty file part when no image was chosen.
                if !data.is_empty() {
                    images.push(UploadedFile {
                        filename,
                        content_type,
                        data,
                    });
                }
            }
            "delete_images" => delete_images.push(read_text(&mut field).await?),
            "title" => raw.title = Some(read_text(&mut field).await?),
            "price" => raw.price = Some(read_text(&mut field).await?),
            "location" => raw.location = Some(read_text(&mut field).await?),
            "description" => raw.description = Some(read_text(&mut field).await?),
            _ => {
                // Unknown fields are drained and ignored.
                read_bytes(&mut field).await?;
            }
        }
    }

    Ok(CampgroundSubmission {
        form: build_form(raw)?,
        images,
        delete_images,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_fields() -> RawFields {
        RawFields {
            title: Some("Roaring Canyon".to_string()),
            price: Some("24.50".to_string()),
            location: Some("Aspen, Colorado".to_string()),
            description: Some("Creekside sites under the pines.".to_string()),
        }
    }

    #[test]
    fn complete_fields_build_a_form() {
        let form = build_form(complete_fields()).unwrap();
        assert_eq!(form.title, "Roaring Canyon");
        assert_eq!(form.price, 24.50);
    }

    #[test]
    fn missing_price_is_a_validation_error() {
        let mut raw = complete_fields();
        raw.price = None;

        assert!(matches!(
            build_form(raw),
            Err(CampgroundError::Validation(_))
        ));
    }

    #[test]
    fn non_numeric_price_is_a_validation_error() {
        let mut raw = complete_fields();
        raw.price = Some("twenty".to_string());

        assert!(matches!(
            build_form(raw),
            Err(CampgroundError::Validation(_))
        ));
    }

    #[test]
    fn missing_title_is_a_validation_error() {
        let mut raw = complete_fields();
        raw.title = None;

        assert!(matches!(
            build_form(raw),
            Err(CampgroundError::Validation(_))
        ));
    }
}
