use actix_session::SessionExt;
use actix_web::{
    Error, HttpMessage, HttpResponse, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{Ready, ready},
    rc::Rc,
};
use uuid::Uuid;

use crate::flash::flash_error;
use crate::session::{current_user_id, store_return_to};

/// Middleware guarding routes that require a logged-in user. Unauthenticated
/// requests have their path remembered in the session, get an error flashed,
/// and are redirected to the login page.
pub struct RequireLogin;

impl<S, B> Transform<S, ServiceRequest> for RequireLogin
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireLoginService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireLoginService {
            service: Rc::new(service),
        }))
    }
}

/// Service that implements the login guard.
pub struct RequireLoginService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireLoginService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let session = req.get_session();

            let user_id = match current_user_id(&session) {
                Some(user_id) => user_id,
                None => {
                    // Remember the full requested URL, query string included
                    let requested = req
                        .uri()
                        .path_and_query()
                        .map(|pq| pq.as_str())
                        .unwrap_or_else(|| req.path());
                    store_return_to(&session, requested);
                    flash_error(&session, "You must be signed in");

                    let response = HttpResponse::SeeOther()
                        .insert_header((header::LOCATION, "/login"))
                        .finish();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            // Add user ID to request extensions
            req.extensions_mut().insert(user_id);

            // Continue with the request
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Extractor for the id of the user placed into the request by [`RequireLogin`].
pub struct CurrentUser(pub Uuid);

impl actix_web::FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let user_id = req.extensions().get::<Uuid>().copied();

        ready(match user_id {
            Some(id) => Ok(CurrentUser(id)),
            None => Err(actix_web::error::ErrorUnauthorized(
                "User not authenticated",
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::log_in;
    use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};

    fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[0; 64]))
            .cookie_secure(false)
            .build()
    }

    async fn protected(user: CurrentUser) -> HttpResponse {
        HttpResponse::Ok().body(user.0.to_string())
    }

    async fn fake_login(session: Session) -> HttpResponse {
        log_in(&session, Uuid::new_v4());
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn unauthenticated_request_redirects_to_login() {
        let app = test::init_service(
            App::new().wrap(session_middleware()).service(
                web::scope("/campgrounds")
                    .wrap(RequireLogin)
                    .route("/new", web::get().to(protected)),
            ),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/campgrounds/new").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[actix_web::test]
    async fn logged_in_request_passes_through() {
        let app = test::init_service(
            App::new()
                .wrap(session_middleware())
                .route("/fake-login", web::get().to(fake_login))
                .service(
                    web::scope("/campgrounds")
                        .wrap(RequireLogin)
                        .route("/new", web::get().to(protected)),
                ),
        )
        .await;

        let login_response = test::call_service(
            &app,
            test::TestRequest::get().uri("/fake-login").to_request(),
        )
        .await;
        let cookie = login_response
            .response()
            .cookies()
            .next()
            .unwrap()
            .into_owned();

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/campgrounds/new")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
