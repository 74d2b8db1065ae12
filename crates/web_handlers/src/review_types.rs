use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::campground_types::AuthorInfo;
use crate::validation::validate_no_html;

/// Form fields submitted when leaving a review
#[derive(Debug, Deserialize, Validate)]
pub struct ReviewForm {
    /// Star rating, 1 through 5
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    /// Review text
    #[validate(
        length(min = 1, message = "Review text is required"),
        custom(function = "validate_no_html")
    )]
    pub body: String,
}

/// Review model representing the database schema
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct Review {
    /// Unique identifier for the review
    pub id: Uuid,
    /// ID of the campground the review belongs to
    pub campground_id: Uuid,
    /// ID of the user who wrote the review
    pub author_id: Uuid,
    /// Star rating, 1 through 5
    pub rating: i32,
    /// Review text
    pub body: String,
    /// Timestamp when the review was created
    pub created_at: DateTime<Utc>,
}

/// Review with its author, as embedded in campground detail responses
#[derive(Debug, Serialize)]
pub struct ReviewInfo {
    /// Unique identifier for the review
    pub id: Uuid,
    /// Star rating, 1 through 5
    pub rating: i32,
    /// Review text
    pub body: String,
    /// Author of the review
    pub author: AuthorInfo,
    /// Timestamp when the review was created
    pub created_at: DateTime<Utc>,
}

/// Custom error type for review operations
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Review not found
    #[error("Review not found")]
    NotFound,

    /// The campground being reviewed does not exist
    #[error("Campground not found")]
    CampgroundNotFound,
}

impl actix_web::ResponseError for ReviewError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            ReviewError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            ReviewError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "review_not_found",
                "message": "Review not found"
            })),
            ReviewError::CampgroundNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "campground_not_found",
                "message": "Campground not found"
            })),
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

    fn valid_form() -> ReviewForm {
        ReviewForm {
            rating: 4,
            body: "Great creek access, sites 12-15 are the quiet ones.".to_string(),
        }
    }

    #[test]
    fn a_complete_review_validates() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn rating_is_bounded_one_to_five() {
        let mut form = valid_form();
        form.rating = 0;
        assert!(form.validate().is_err());

        form.rating = 6;
        assert!(form.validate().is_err());

        form.rating = 1;
        assert!(form.validate().is_ok());

        form.rating = 5;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn empty_body_is_rejected() {
        let mut form = valid_form();
        form.body = String::new();
        assert!(form.validate().is_err());
    }

    #[test]
    fn html_in_body_is_rejected() {
        let mut form = valid_form();
        form.body = "<a href='https://spam.example'>five stars</a>".to_string();
        assert!(form.validate().is_err());
    }
}
