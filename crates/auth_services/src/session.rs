use actix_session::Session;
use uuid::Uuid;

const USER_ID_KEY: &str = "user_id";
const RETURN_TO_KEY: &str = "return_to";

/// Writes the logged-in user into the session, cycling the session key.
pub fn log_in(session: &Session, user_id: Uuid) {
    session.renew();
    if let Err(e) = session.insert(USER_ID_KEY, user_id) {
        log::warn!("Failed to write user id into session: {}", e);
    }
}

/// Removes the logged-in user from the session. Flash messages queued
/// afterwards still reach the next page.
pub fn log_out(session: &Session) {
    session.remove(USER_ID_KEY);
}

/// Reads the logged-in user's id from the session, if any.
pub fn current_user_id(session: &Session) -> Option<Uuid> {
    session.get::<Uuid>(USER_ID_KEY).ok().flatten()
}

/// Remembers the path an unauthenticated user tried to reach so the next
/// successful login can send them back.
pub fn store_return_to(session: &Session, path: &str) {
    if let Err(e) = session.insert(RETURN_TO_KEY, path.to_string()) {
        log::warn!("Failed to store return-to path: {}", e);
    }
}

/// Takes the remembered path out of the session, if one was stored.
pub fn take_return_to(session: &Session) -> Option<String> {
    match session.remove_as::<String>(RETURN_TO_KEY) {
        Some(Ok(path)) => Some(path),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpResponse, test, web};

    async fn store(session: Session) -> HttpResponse {
        store_return_to(&session, "/campgrounds/new");
        HttpResponse::Ok().finish()
    }

    async fn consume(session: Session) -> HttpResponse {
        let destination = take_return_to(&session).unwrap_or_else(|| "/campgrounds".to_string());
        HttpResponse::Ok().body(destination)
    }

    #[actix_web::test]
    async fn return_to_is_consumed_by_the_next_read() {
        let app = test::init_service(
            App::new()
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[0; 64]))
                        .cookie_secure(false)
                        .build(),
                )
                .route("/store", web::get().to(store))
                .route("/consume", web::get().to(consume)),
        )
        .await;

        let stored = test::call_service(
            &app,
            test::TestRequest::get().uri("/store").to_request(),
        )
        .await;
        let cookie = stored.response().cookies().next().unwrap().into_owned();

        let first = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/consume")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let updated_cookie = first.response().cookies().next().unwrap().into_owned();
        let body = test::read_body(first).await;
        assert_eq!(body, "/campgrounds/new");

        // The stored path is gone after the first read.
        let second = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/consume")
                .cookie(updated_cookie)
                .to_request(),
        )
        .await;
        let body = test::read_body(second).await;
        assert_eq!(body, "/campgrounds");
    }
}
