use actix_session::Session;
use actix_web::{HttpResponse, Result, web};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use auth_services::flash::{flash_error, flash_success};
use auth_services::middleware::CurrentUser;

use crate::context::redirect;
use crate::review_service::ReviewService;
use crate::review_types::*;

/// Creates a review on a campground, then redirects back to it
pub async fn create_review(
    pool: web::Data<PgPool>,
    session: Session,
    user: CurrentUser,
    path: web::Path<Uuid>,
    form: web::Form<ReviewForm>,
) -> Result<HttpResponse, ReviewError> {
    // Validate the request
    form.validate()
        .map_err(|e| ReviewError::Validation(format!("Validation error: {}", e)))?;

    let campground_id = path.into_inner();
    let service = ReviewService::new(pool.get_ref().clone());
    service.create(&campground_id, &user.0, &form).await?;

    flash_success(&session, "Created new review!");
    Ok(redirect(&format!("/campgrounds/{}", campground_id)))
}

/// Deletes a review (review author only), then redirects back to the campground
pub async fn delete_review(
    pool: web::Data<PgPool>,
    session: Session,
    user: CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ReviewError> {
    let (campground_id, review_id) = path.into_inner();
    let service = ReviewService::new(pool.get_ref().clone());

    let review = match service.get(&review_id).await? {
        Some(review) => review,
        None => return Err(ReviewError::NotFound),
    };

    if review.author_id != user.0 {
        flash_error(&session, "Error, you do not have permission to do that!");
        return Ok(redirect(&format!("/campgrounds/{}", campground_id)));
    }

    service.delete(&campground_id, &review_id).await?;

    flash_success(&session, "Successfully deleted review!");
    Ok(redirect(&format!("/campgrounds/{}", campground_id)))
}
