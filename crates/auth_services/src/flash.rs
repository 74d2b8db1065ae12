use actix_session::Session;
use serde::{Deserialize, Serialize};

const FLASH_KEY: &str = "_flash";

/// Flash messages queued in the session, drained into the next rendered page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashMessages {
    /// Success notifications.
    pub success: Vec<String>,
    /// Error notifications.
    pub error: Vec<String>,
}

impl FlashMessages {
    /// True when no messages are queued.
    pub fn is_empty(&self) -> bool {
        self.success.is_empty() && self.error.is_empty()
    }
}

fn read(session: &Session) -> FlashMessages {
    session
        .get::<FlashMessages>(FLASH_KEY)
        .ok()
        .flatten()
        .unwrap_or_default()
}

fn write(session: &Session, messages: &FlashMessages) {
    if let Err(e) = session.insert(FLASH_KEY, messages) {
        log::warn!("Failed to queue flash message: {}", e);
    }
}

/// Queues a success message for the next rendered page.
pub fn flash_success(session: &Session, message: impl Into<String>) {
    let mut messages = read(session);
    messages.success.push(message.into());
    write(session, &messages);
}

/// Queues an error message for the next rendered page.
pub fn flash_error(session: &Session, message: impl Into<String>) {
    let mut messages = read(session);
    messages.error.push(message.into());
    write(session, &messages);
}

/// Takes all queued messages out of the session.
pub fn take_flash(session: &Session) -> FlashMessages {
    match session.remove_as::<FlashMessages>(FLASH_KEY) {
        Some(Ok(messages)) => messages,
        _ => FlashMessages::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpResponse, test, web};

    async fn push(session: Session) -> HttpResponse {
        flash_success(&session, "Created new review!");
        flash_error(&session, "Something to fix");
        HttpResponse::Ok().finish()
    }

    async fn take(session: Session) -> HttpResponse {
        HttpResponse::Ok().json(take_flash(&session))
    }

    #[actix_web::test]
    async fn flash_messages_drain_once() {
        let app = test::init_service(
            App::new()
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[0; 64]))
                        .cookie_secure(false)
                        .build(),
                )
                .route("/push", web::get().to(push))
                .route("/take", web::get().to(take)),
        )
        .await;

        let pushed = test::call_service(
            &app,
            test::TestRequest::get().uri("/push").to_request(),
        )
        .await;
        let cookie = pushed.response().cookies().next().unwrap().into_owned();

        let first = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/take")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let drained_cookie = first.response().cookies().next().unwrap().into_owned();
        let drained: FlashMessages = test::read_body_json(first).await;
        assert_eq!(drained.success, vec!["Created new review!".to_string()]);
        assert_eq!(drained.error, vec!["Something to fix".to_string()]);

        // The queue is empty on the next page.
        let again: FlashMessages = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/take")
                .cookie(drained_cookie)
                .to_request(),
        )
        .await;
        assert!(again.is_empty());
    }
}
