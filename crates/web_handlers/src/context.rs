use actix_session::Session;
use actix_web::{HttpResponse, http::header};
use serde::Serialize;
use sqlx::PgPool;

use auth_services::flash::{FlashMessages, take_flash};
use auth_services::service::AuthService;
use auth_services::session::current_user_id;
use auth_services::types::{AuthError, UserInfo};

/// Everything a page needs before rendering: the logged-in user (if any) and
/// the one-time flash messages queued for it.
#[derive(Debug, Serialize)]
pub struct SessionContext {
    /// Logged-in user, if the session carries one.
    pub current_user: Option<UserInfo>,
    /// One-time success notifications.
    pub success: Vec<String>,
    /// One-time error notifications.
    pub error: Vec<String>,
}

/// Builds the page context, draining flash messages from the session.
pub async fn session_context(
    pool: &PgPool,
    session: &Session,
) -> Result<SessionContext, AuthError> {
    let current_user = match current_user_id(session) {
        Some(user_id) => AuthService::new(pool.clone())
            .get_user_by_id(&user_id)
            .await?
            .map(UserInfo::from),
        None => None,
    };

    let FlashMessages { success, error } = take_flash(session);

    Ok(SessionContext {
        current_user,
        success,
        error,
    })
}

/// 303 redirect to the given location.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn redirect_is_a_303_with_location() {
        let response = redirect("/campgrounds");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/campgrounds"
        );
    }
}
