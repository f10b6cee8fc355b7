//! Cross-origin access for the browser frontend.

use actix_cors::Cors;
use actix_web::http::header;

use crate::observability::REQUEST_ID_HEADER;

/// Methods the route table uses.
const ALLOWED_METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

/// Cookies and `Authorization` may cross origins, so only the listed
/// origins are allowed. An empty list keeps the API same-origin.
pub fn cors(origins: &[String]) -> Cors {
    let base = Cors::default()
        .allowed_methods(ALLOWED_METHODS)
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([REQUEST_ID_HEADER])
        .supports_credentials()
        .max_age(3600);

    origins
        .iter()
        .fold(base, |cors, origin| cors.allowed_origin(origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};

    const FRONTEND: &str = "https://blog.example.com";

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .wrap(cors(&[FRONTEND.to_string()]))
                    .route("/posts", web::get().to(HttpResponse::Ok)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_preflight_from_frontend_is_allowed() {
        let app = app!();

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/posts")
            .insert_header((header::ORIGIN, FRONTEND))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PUT"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), FRONTEND);
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
        let methods = headers
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(methods.contains("PUT"));
    }

    #[actix_web::test]
    async fn test_simple_request_echoes_allowed_origin() {
        let app = app!();

        let req = test::TestRequest::get()
            .uri("/posts")
            .insert_header((header::ORIGIN, FRONTEND))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            FRONTEND
        );
    }

    #[actix_web::test]
    async fn test_other_origins_get_no_allow_header() {
        let app = app!();

        let req = test::TestRequest::get()
            .uri("/posts")
            .insert_header((header::ORIGIN, "https://evil.example.net"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
