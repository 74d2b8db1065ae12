use actix_session::Session;
use actix_web::{HttpResponse, Result, web};
use sqlx::PgPool;
use validator::Validate;

use auth_services::flash::{flash_error, flash_success};
use auth_services::service::AuthService;
use auth_services::session::{log_in, log_out, take_return_to};
use auth_services::types::*;

use crate::context::{redirect, session_context};

/// Page context for the registration form
pub async fn register_page(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AuthError> {
    let context = session_context(pool.get_ref(), &session).await?;
    Ok(HttpResponse::Ok().json(context))
}

/// Registers a new account, logs it in, and redirects to the campground
/// index. A taken email or username flashes an error and redirects back to
/// the registration form.
pub async fn register(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<RegisterRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    form.validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());

    match auth_service.create_user(&form).await {
        Ok(user) => {
            log_in(&session, user.id);
            flash_success(&session, "Welcome to Camp Atlas!");
            Ok(redirect("/campgrounds"))
        }
        Err(error @ (AuthError::EmailExists | AuthError::UsernameExists)) => {
            flash_error(&session, error.to_string());
            Ok(redirect("/register"))
        }
        Err(error) => Err(error),
    }
}

/// Page context for the login form
pub async fn login_page(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AuthError> {
    let context = session_context(pool.get_ref(), &session).await?;
    Ok(HttpResponse::Ok().json(context))
}

/// Logs a user in. Bad credentials flash an error and redirect back to the
/// login form; success redirects to the remembered return-to path, if a
/// protected page was visited before logging in, or to the index.
pub async fn login(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    form.validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());

    let user = match auth_service
        .verify_password(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            flash_error(&session, "Invalid username or password");
            return Ok(redirect("/login"));
        }
        Err(error) => return Err(error),
    };

    log_in(&session, user.id);
    flash_success(&session, "Welcome back!");

    let destination = take_return_to(&session).unwrap_or_else(|| "/campgrounds".to_string());
    Ok(redirect(&destination))
}

/// Logs the user out and redirects to the campground index
pub async fn logout(session: Session) -> HttpResponse {
    log_out(&session);
    flash_success(&session, "Goodbye!");
    redirect("/campgrounds")
}
