use chrono::{DateTime, Utc};
use image_storage::StoredImage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::review_types::ReviewInfo;
use crate::validation::validate_no_html;

/// Form fields submitted when creating or editing a campground
#[derive(Debug, Deserialize, Validate)]
pub struct CampgroundForm {
    /// Title of the campground
    #[validate(
        length(min = 1, max = 255, message = "Title is required"),
        custom(function = "validate_no_html")
    )]
    pub title: String,

    /// Nightly price in dollars
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,

    /// Free-form location string, forward-geocoded on save
    #[validate(
        length(min = 1, max = 255, message = "Location is required"),
        custom(function = "validate_no_html")
    )]
    pub location: String,

    /// Description shown on the campground page
    #[validate(
        length(min = 1, message = "Description is required"),
        custom(function = "validate_no_html")
    )]
    pub description: String,
}

/// Campground model representing the database schema
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Campground {
    /// Unique identifier for the campground
    pub id: Uuid,
    /// Title of the campground
    pub title: String,
    /// Nightly price in dollars
    pub price: f64,
    /// Description shown on the campground page
    pub description: String,
    /// Free-form location string
    pub location: String,
    /// GeoJSON point stored as jsonb
    pub geometry: serde_json::Value,
    /// ID of the user who owns the campground
    pub author_id: Uuid,
    /// Timestamp when the campground was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the campground was last updated
    pub updated_at: DateTime<Utc>,
}

/// Campground image in API responses
#[derive(Debug, Serialize)]
pub struct ImageInfo {
    /// Public URL of the image
    pub url: String,
    /// Object key of the image
    pub filename: String,
    /// URL of the width-200 rendition
    pub thumbnail: String,
}

impl From<StoredImage> for ImageInfo {
    fn from(image: StoredImage) -> Self {
        Self {
            thumbnail: image.thumbnail_url(),
            url: image.url,
            filename: image.filename,
        }
    }
}

/// Public author info embedded in campground and review responses
#[derive(Debug, Serialize)]
pub struct AuthorInfo {
    /// Unique identifier for the author
    pub id: Uuid,
    /// Public username of the author
    pub username: String,
}

/// Campground summary for the index listing and the cluster map
#[derive(Debug, Serialize)]
pub struct CampgroundSummary {
    /// Unique identifier for the campground
    pub id: Uuid,
    /// Title of the campground
    pub title: String,
    /// Nightly price in dollars
    pub price: f64,
    /// Free-form location string
    pub location: String,
    /// GeoJSON point for the map
    pub geometry: serde_json::Value,
    /// First image of the campground, if it has any
    pub image: Option<ImageInfo>,
}

/// Response structure for the campground index
#[derive(Debug, Serialize)]
pub struct ListCampgroundsResponse {
    /// All campgrounds, newest first
    pub campgrounds: Vec<CampgroundSummary>,
    /// Total count of campgrounds
    pub total: i64,
}

/// Full campground detail with populated associations
#[derive(Debug, Serialize)]
pub struct CampgroundDetail {
    /// Unique identifier for the campground
    pub id: Uuid,
    /// Title of the campground
    pub title: String,
    /// Nightly price in dollars
    pub price: f64,
    /// Description shown on the campground page
    pub description: String,
    /// Free-form location string
    pub location: String,
    /// GeoJSON point for the map
    pub geometry: serde_json::Value,
    /// Author of the campground
    pub author: AuthorInfo,
    /// Ordered images of the campground
    pub images: Vec<ImageInfo>,
    /// Reviews of the campground, each with its author
    pub reviews: Vec<ReviewInfo>,
    /// Timestamp when the campground was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the campground was last updated
    pub updated_at: DateTime<Utc>,
}

/// Response for the edit form: the campground and its current images
#[derive(Debug, Serialize)]
pub struct EditCampgroundResponse {
    /// The campground being edited
    pub campground: Campground,
    /// Its current images
    pub images: Vec<ImageInfo>,
}

/// Custom error type for campground operations
#[derive(Debug, thiserror::Error)]
pub enum CampgroundError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Campground not found
    #[error("Campground not found")]
    NotFound,

    /// The location string could not be geocoded
    #[error("Geocoding error: {0}")]
    Geocode(#[from] geocoding::GeocodeError),

    /// The image store rejected an upload or delete
    #[error("Image storage error: {0}")]
    Storage(#[from] image_storage::StorageError),

    /// The multipart payload was malformed
    #[error("Malformed upload: {0}")]
    Upload(String),
}

impl actix_web::ResponseError for CampgroundError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            CampgroundError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            CampgroundError::Upload(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "invalid_upload",
                "message": msg
            })),
            CampgroundError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "campground_not_found",
                "message": "Campground not found"
            })),
            CampgroundError::Geocode(geocoding::GeocodeError::NoResults) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "location_not_found",
                    "message": "Could not find that location on the map"
                }))
            }
            _ => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "internal_error",
                "message": "An internal error occurred"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_form() -> CampgroundForm {
        CampgroundForm {
            title: "Roaring Canyon".to_string(),
            price: 24.0,
            location: "Aspen, Colorado".to_string(),
            description: "Creekside sites under the pines.".to_string(),
        }
    }

    #[test]
    fn a_complete_form_validates() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn missing_title_is_rejected() {
        let mut form = valid_form();
        form.title = String::new();
        assert!(form.validate().is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut form = valid_form();
        form.price = -1.0;
        assert!(form.validate().is_err());
    }

    #[test]
    fn html_in_description_is_rejected() {
        let mut form = valid_form();
        form.description = "<script>alert(1)</script>".to_string();
        assert!(form.validate().is_err());
    }
}
