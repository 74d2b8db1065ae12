use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{HttpResponse, Result, web};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use auth_services::flash::{flash_error, flash_success};
use auth_services::middleware::CurrentUser;
use auth_services::types::AuthError;
use geocoding::Geocoder;
use image_storage::{ImageStoreHandle, StoredImage};

use crate::campground_service::CampgroundService;
use crate::campground_types::*;
use crate::context::{redirect, session_context};
use crate::forms::{CampgroundSubmission, UploadedFile, collect_campground_form};

async fn store_uploads(
    image_store: &ImageStoreHandle,
    files: Vec<UploadedFile>,
) -> Result<Vec<StoredImage>, CampgroundError> {
    let mut stored = Vec::with_capacity(files.len());
    for file in files {
        stored.push(
            image_store
                .upload(&file.filename, &file.content_type, file.data)
                .await?,
        );
    }
    Ok(stored)
}

/// Lists all campgrounds
pub async fn list_campgrounds(pool: web::Data<PgPool>) -> Result<HttpResponse, CampgroundError> {
    let service = CampgroundService::new(pool.get_ref().clone());
    let campgrounds = service.list().await?;

    let response = ListCampgroundsResponse {
        total: campgrounds.len() as i64,
        campgrounds,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Page context for the new-campground form (login required)
pub async fn new_campground_page(
    pool: web::Data<PgPool>,
    session: Session,
    _user: CurrentUser,
) -> Result<HttpResponse, AuthError> {
    let context = session_context(pool.get_ref(), &session).await?;
    Ok(HttpResponse::Ok().json(context))
}

/// Creates a campground from the submitted form, geocoding its location and
/// storing any uploaded images, then redirects to the new campground's page
pub async fn create_campground(
    pool: web::Data<PgPool>,
    geocoder: web::Data<Geocoder>,
    image_store: web::Data<ImageStoreHandle>,
    session: Session,
    user: CurrentUser,
    payload: Multipart,
) -> Result<HttpResponse, CampgroundError> {
    let CampgroundSubmission { form, images, .. } = collect_campground_form(payload).await?;

    // Validate the form before any write happens
    form.validate()
        .map_err(|e| CampgroundError::Validation(format!("Validation error: {}", e)))?;

    let geometry = geocoder.forward_geocode(&form.location).await?;
    let stored_images = store_uploads(image_store.get_ref(), images).await?;

    let service = CampgroundService::new(pool.get_ref().clone());
    let campground = service
        .create(&user.0, &form, &geometry, &stored_images)
        .await?;

    flash_success(&session, "Successfully made a new campground!");
    Ok(redirect(&format!("/campgrounds/{}", campground.id)))
}

/// Shows a single campground with its images, author, and populated reviews.
/// A missing campground flashes an error and redirects to the index.
pub async fn show_campground(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CampgroundError> {
    let campground_id = path.into_inner();
    let service = CampgroundService::new(pool.get_ref().clone());

    match service.get_detail(&campground_id).await? {
        Some(detail) => Ok(HttpResponse::Ok().json(detail)),
        None => {
            flash_error(&session, "Cannot find that campground, sorry.");
            Ok(redirect("/campgrounds"))
        }
    }
}

/// Returns the campground backing the edit form (author only)
pub async fn edit_campground(
    pool: web::Data<PgPool>,
    session: Session,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CampgroundError> {
    let campground_id = path.into_inner();
    let service = CampgroundService::new(pool.get_ref().clone());

    let campground = match service.get(&campground_id).await? {
        Some(campground) => campground,
        None => {
            flash_error(&session, "Error, cannot find that campground.");
            return Ok(redirect("/campgrounds"));
        }
    };

    if campground.author_id != user.0 {
        flash_error(&session, "Error, you do not have permission to do that!");
        return Ok(redirect(&format!("/campgrounds/{}", campground_id)));
    }

    let images = service.images(&campground_id).await?;

    Ok(HttpResponse::Ok().json(EditCampgroundResponse { campground, images }))
}

/// Applies form edits, appends newly uploaded images, and deletes any images
/// the author marked for removal, then redirects back to the campground
pub async fn update_campground(
    pool: web::Data<PgPool>,
    geocoder: web::Data<Geocoder>,
    image_store: web::Data<ImageStoreHandle>,
    session: Session,
    user: CurrentUser,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse, CampgroundError> {
    let campground_id = path.into_inner();
    let service = CampgroundService::new(pool.get_ref().clone());

    let campground = match service.get(&campground_id).await? {
        Some(campground) => campground,
        None => {
            flash_error(&session, "Error, cannot find that campground.");
            return Ok(redirect("/campgrounds"));
        }
    };

    if campground.author_id != user.0 {
        flash_error(&session, "Error, you do not have permission to do that!");
        return Ok(redirect(&format!("/campgrounds/{}", campground_id)));
    }

    let CampgroundSubmission {
        form,
        images,
        delete_images,
    } = collect_campground_form(payload).await?;

    form.validate()
        .map_err(|e| CampgroundError::Validation(format!("Validation error: {}", e)))?;

    let geometry = geocoder.forward_geocode(&form.location).await?;
    service.update(&campground_id, &form, &geometry).await?;

    let stored_images = store_uploads(image_store.get_ref(), images).await?;
    service.append_images(&campground_id, &stored_images).await?;

    if !delete_images.is_empty() {
        service.remove_images(&campground_id, &delete_images).await?;

        // Object deletes are best-effort: a failure logs and the request continues.
        for filename in &delete_images {
            if let Err(e) = image_store.delete(filename).await {
                log::warn!("Failed to delete stored image {}: {}", filename, e);
            }
        }
    }

    flash_success(&session, "Successfully updated campground!");
    Ok(redirect(&format!("/campgrounds/{}", campground_id)))
}

/// Deletes a campground, its reviews, and its stored images (author only),
/// then redirects to the index
pub async fn delete_campground(
    pool: web::Data<PgPool>,
    image_store: web::Data<ImageStoreHandle>,
    session: Session,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CampgroundError> {
    let campground_id = path.into_inner();
    let service = CampgroundService::new(pool.get_ref().clone());

    let campground = match service.get(&campground_id).await? {
        Some(campground) => campground,
        None => {
            flash_error(&session, "Error, cannot find that campground.");
            return Ok(redirect("/campgrounds"));
        }
    };

    if campground.author_id != user.0 {
        flash_error(
            &session,
            "Error, you do not have permission to delete this campground.",
        );
        return Ok(redirect(&format!("/campgrounds/{}", campground_id)));
    }

    let filenames = service.delete(&campground_id).await?;

    for filename in &filenames {
        if let Err(e) = image_store.delete(filename).await {
            log::warn!("Failed to delete stored image {}: {}", filename, e);
        }
    }

    flash_success(&session, "Successfully deleted campground");
    Ok(redirect("/campgrounds"))
}
