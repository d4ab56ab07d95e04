// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! HTTP surface of the badge service.
//!
//! `GET` and `POST` on `/api/badge` render a badge or banner; `/health`
//! answers `ok`. Errors are returned as plain text.

use actix_web::{
    App, HttpResponse, HttpServer, ResponseError,
    http::{
        StatusCode,
        header::{CACHE_CONTROL, ContentType}
    },
    middleware, web
};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    config::ServiceConfig,
    error::{self, Error},
    request::RequestParams,
    service::BadgeService
};

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// State shared by all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pipeline rendering every request.
    pub service:       BadgeService,
    /// `s-maxage` sent with successful responses.
    pub cache_max_age: u64
}

impl AppState {
    /// Builds handler state from a service and its configuration.
    pub fn new(service: BadgeService, config: &ServiceConfig) -> Self {
        Self {
            service,
            cache_max_age: config.cache_max_age
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest {
                ..
            } => StatusCode::BAD_REQUEST,
            Self::Upstream {
                ..
            } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.to_string())
    }
}

/// Registers the badge and health routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .service(
            web::resource("/api/badge")
                .route(web::get().to(badge_get))
                .route(web::post().to(badge_post))
        );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("ok")
}

async fn badge_get(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>
) -> Result<HttpResponse, Error> {
    let params = RequestParams::merge(query.into_inner(), None);
    render(&state, &params).await
}

async fn badge_post(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
    body: web::Bytes
) -> Result<HttpResponse, Error> {
    let body = if body.is_empty() {
        None
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!("Ignoring request body that is not JSON: {}", error);
                None
            }
        }
    };

    let params = RequestParams::merge(query.into_inner(), body.as_ref());
    render(&state, &params).await
}

async fn render(state: &AppState, params: &RequestParams) -> Result<HttpResponse, Error> {
    let svg = state.service.render_params(params).await.inspect_err(|error| {
        if let Error::Upstream {
            detail, ..
        } = error
        {
            warn!("GitHub request failed: {}", detail);
        }
    })?;

    Ok(HttpResponse::Ok()
        .content_type(SVG_CONTENT_TYPE)
        .insert_header((CACHE_CONTROL, format!("s-maxage={}", state.cache_max_age)))
        .body(svg))
}

/// Runs the HTTP server until it is shut down.
///
/// # Errors
///
/// Returns [`Error::Server`] when the listener cannot bind or the server
/// fails.
pub async fn run_server(service: BadgeService, config: &ServiceConfig) -> Result<(), Error> {
    let state = web::Data::new(AppState::new(service, config));
    let bind = config.bind.clone();

    info!("Listening on {}", bind);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind.as_str())
    .map_err(|source| error::server_error(&bind, source))?
    .run()
    .await
    .map_err(|source| error::server_error(&bind, source))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, body::to_bytes, http::header::CONTENT_TYPE, test, web};
    use serde_json::json;

    use super::*;
    use crate::{aggregate::tests::FakeSource, error::MISSING_REPOSITORY_MESSAGE};

    fn state(source: FakeSource) -> web::Data<AppState> {
        let service = BadgeService::new(Arc::new(source));
        web::Data::new(AppState::new(service, &ServiceConfig::default()))
    }

    #[actix_web::test]
    async fn health_answers_ok() {
        let app = test::init_service(
            App::new()
                .app_data(state(FakeSource::healthy()))
                .configure(configure_routes)
        )
        .await;

        let response =
            test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(test::read_body(response).await, "ok");
    }

    #[actix_web::test]
    async fn badge_returns_svg_with_cache_header() {
        let app = test::init_service(
            App::new()
                .app_data(state(FakeSource::healthy()))
                .configure(configure_routes)
        )
        .await;

        let request = test::TestRequest::get()
            .uri("/api/badge?owner=octocat&repo=Hello-World&metrics=stars")
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok()),
            Some(SVG_CONTENT_TYPE)
        );
        assert_eq!(
            response.headers().get(CACHE_CONTROL).and_then(|value| value.to_str().ok()),
            Some("s-maxage=1800")
        );

        let body = test::read_body(response).await;
        let body = String::from_utf8(body.to_vec()).expect("utf-8 body");
        assert!(body.contains("Stars: 2,587"));
    }

    #[actix_web::test]
    async fn missing_repository_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(state(FakeSource::healthy()))
                .configure(configure_routes)
        )
        .await;

        let request = test::TestRequest::get().uri("/api/badge?owner=octocat").to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(test::read_body(response).await, MISSING_REPOSITORY_MESSAGE);
    }

    #[actix_web::test]
    async fn upstream_failure_is_bad_gateway() {
        let mut source = FakeSource::healthy();
        source.summary = Err("rate limited".to_owned());
        let app =
            test::init_service(App::new().app_data(state(source)).configure(configure_routes))
                .await;

        let request = test::TestRequest::get()
            .uri("/api/badge?owner=octocat&repo=Hello-World")
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(test::read_body(response).await, "Failed to fetch GitHub data.");
    }

    #[actix_web::test]
    async fn post_body_is_read_and_query_wins() {
        let app = test::init_service(
            App::new()
                .app_data(state(FakeSource::healthy()))
                .configure(configure_routes)
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/badge?mode=template")
            .set_json(json!({
                "mode": "badge",
                "title": "From body",
                "emoji": false
            }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = test::read_body(response).await;
        let body = String::from_utf8(body.to_vec()).expect("utf-8 body");
        assert!(body.contains("From body"));
        assert!(body.contains("Stars: N/A"));
    }

    #[actix_web::test]
    async fn unusable_bind_address_reports_server_error() {
        let config = ServiceConfig {
            bind: "not-a-socket-address".to_owned(),
            ..ServiceConfig::default()
        };
        let service = BadgeService::new(Arc::new(FakeSource::healthy()));

        let error = run_server(service, &config).await.expect_err("bind fails");
        assert!(matches!(error, Error::Server { .. }));
        assert!(error.to_string().starts_with("HTTP server on not-a-socket-address failed"));
    }

    #[actix_web::test]
    async fn internal_errors_map_to_server_error() {
        let error = Error::validation("broken");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(error.error_response().into_body())
            .await
            .expect("error body");
        assert_eq!(body, "invalid configuration: broken");
    }
}
