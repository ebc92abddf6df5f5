use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        companies::{create_company, delete_company, get_company, list_companies, update_company},
        devices::{create_device, delete_device, get_device, list_devices, update_device},
        health::{healthz, livez},
        pictures::get_picture,
        users::{
            change_password, change_role, delete_user, get_user, list_users, login, register,
            update_user,
        },
    },
    rate_limit::rate_limit,
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api_routes = Router::new()
        // Company routes
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/{id}",
            get(get_company)
                .put(update_company)
                .delete(delete_company),
        )
        // Device routes
        .route("/devices", get(list_devices).post(create_device))
        .route(
            "/devices/{id}",
            get(get_device).put(update_device).delete(delete_device),
        )
        // User routes
        .route("/users", get(list_users))
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{id}/changePassword", put(change_password))
        .route("/users/{id}/changeRole", put(change_role))
        // Uploaded pictures
        .route("/pictures/{folder}/{file}", get(get_picture))
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit,
        ))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, Response},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use gamestore_core::auth::Principal;
    use gamestore_core::store::UserRole;

    use crate::rate_limit::{RateLimitConfig, RateLimiter};

    const BOUNDARY: &str = "gamestore-test-boundary";

    fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (AppState::for_tests(dir.path()), dir)
    }

    fn token_for(state: &AppState, user_id: i64, role: UserRole) -> String {
        let principal = Principal {
            user_id,
            username: format!("user{user_id}"),
            role,
        };
        state.auth.tokens.issue(&principal).unwrap()
    }

    fn admin_token(state: &AppState) -> String {
        token_for(state, 999, UserRole::Admin)
    }

    /// Builds a multipart body from text fields and an optional file.
    fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((name, file_name, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Vec<u8>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn json_request(
        method: &str,
        uri: &str,
        token: Option<&str>,
        json: serde_json::Value,
    ) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(json.to_string())).unwrap()
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response<Body>) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    async fn create_company_via_api(app: &Router, token: &str, name: &str) -> serde_json::Value {
        let response = app
            .clone()
            .oneshot(multipart_request(
                "POST",
                "/api/companies",
                Some(token),
                multipart_body(&[("name", name)], None),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await
    }

    #[tokio::test]
    async fn test_livez() {
        let (state, _dir) = test_state();
        let app = create_app(state);

        let response = app.oneshot(get_request("/livez", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_healthz_reports_backends() {
        let (state, _dir) = test_state();
        let app = create_app(state);

        let response = app.oneshot(get_request("/healthz", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["storage"], "inmemory");
        assert_eq!(json["cache"], "memory");
    }

    #[tokio::test]
    async fn test_list_devices_empty() {
        let (state, _dir) = test_state();
        let app = create_app(state);

        let response = app
            .oneshot(get_request("/api/devices", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["entities"], serde_json::json!([]));
        assert_eq!(json["totalCount"], 0);
        assert_eq!(json["pageNumber"], 1);
    }

    #[tokio::test]
    async fn test_invalid_page_number_is_400() {
        let (state, _dir) = test_state();
        let app = create_app(state);

        let response = app
            .oneshot(get_request("/api/companies?pageNumber=0", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_positive_id_is_400() {
        let (state, _dir) = test_state();
        let app = create_app(state);

        let response = app
            .oneshot(get_request("/api/devices/0", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_device_is_404() {
        let (state, _dir) = test_state();
        let app = create_app(state);

        let response = app
            .oneshot(get_request("/api/devices/42", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_device_requires_token() {
        let (state, _dir) = test_state();
        let app = create_app(state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/devices",
                None,
                serde_json::json!({
                    "name": "Viper",
                    "category": "mouse",
                    "price": 50.0,
                    "inStock": 3,
                    "companyId": 1
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_company_requires_admin() {
        let (state, _dir) = test_state();
        let token = token_for(&state, 5, UserRole::User);
        let app = create_app(state);

        let response = app
            .oneshot(multipart_request(
                "POST",
                "/api/companies",
                Some(&token),
                multipart_body(&[("name", "Razer")], None),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_company_and_device_flow() {
        let (state, _dir) = test_state();
        let token = admin_token(&state);
        let app = create_app(state);

        let company = create_company_via_api(&app, &token, "Razer").await;
        let company_id = company["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/devices",
                Some(&token),
                serde_json::json!({
                    "name": "Viper",
                    "category": "mouse",
                    "price": 50.0,
                    "inStock": 3,
                    "companyId": company_id
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let device = json_body(response).await;
        let device_id = device["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/devices/{device_id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["name"], "Viper");
        assert_eq!(json["companyName"], "Razer");

        let response = app
            .clone()
            .oneshot(get_request("/api/devices?companyName=Razer", None))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["totalCount"], 1);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/companies/{company_id}"))
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_renamed_company_lists_its_devices() {
        let (state, _dir) = test_state();
        let token = admin_token(&state);
        let app = create_app(state);

        let company = create_company_via_api(&app, &token, "Razer").await;
        let company_id = company["id"].as_i64().unwrap();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/devices",
                Some(&token),
                serde_json::json!({
                    "name": "Viper",
                    "category": "mouse",
                    "price": 50.0,
                    "inStock": 3,
                    "companyId": company_id
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(multipart_request(
                "PUT",
                &format!("/api/companies/{company_id}"),
                Some(&token),
                multipart_body(&[("name", "RazerX")], None),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(get_request("/api/devices?companyName=RazerX", None))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["entities"][0]["companyName"], "RazerX");
    }

    #[tokio::test]
    async fn test_company_named_all_is_rejected() {
        let (state, _dir) = test_state();
        let token = admin_token(&state);
        let app = create_app(state);

        let response = app
            .oneshot(multipart_request(
                "POST",
                "/api/companies",
                Some(&token),
                multipart_body(&[("name", "all")], None),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_company_is_409() {
        let (state, _dir) = test_state();
        let token = admin_token(&state);
        let app = create_app(state);

        create_company_via_api(&app, &token, "Logitech").await;

        let response = app
            .oneshot(multipart_request(
                "POST",
                "/api/companies",
                Some(&token),
                multipart_body(&[("name", "Logitech")], None),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = json_body(response).await;
        assert_eq!(json["field"], "name");
    }

    #[tokio::test]
    async fn test_company_picture_is_served() {
        let (state, _dir) = test_state();
        let token = admin_token(&state);
        let app = create_app(state);

        let response = app
            .clone()
            .oneshot(multipart_request(
                "POST",
                "/api/companies",
                Some(&token),
                multipart_body(&[("name", "HyperX")], Some(("picture", "logo.png", b"PNGDATA"))),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let company = json_body(response).await;
        let link = company["picture"].as_str().unwrap().to_string();

        let response = app.oneshot(get_request(&link, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"PNGDATA");
    }

    #[tokio::test]
    async fn test_missing_picture_is_404() {
        let (state, _dir) = test_state();
        let app = create_app(state);

        let response = app
            .oneshot(get_request("/api/pictures/company-pictures/none.png", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_register_login_and_change_password() {
        let (state, _dir) = test_state();
        let app = create_app(state);

        let response = app
            .clone()
            .oneshot(multipart_request(
                "POST",
                "/api/users/register",
                None,
                multipart_body(
                    &[
                        ("username", "alice"),
                        ("email", "alice@example.com"),
                        ("password", "secret1"),
                    ],
                    None,
                ),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let user = json_body(response).await;
        assert_eq!(user["role"], "User");
        assert!(user.get("passwordHash").is_none());
        let user_id = user["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/users/login",
                None,
                serde_json::json!({ "email": "alice@example.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let login = json_body(response).await;
        assert_eq!(login["username"], "alice");
        let token = login["token"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/users/{user_id}"), Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/users/{user_id}/changePassword"),
                Some(&token),
                serde_json::json!({ "password": "secret2" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/users/login",
                None,
                serde_json::json!({ "email": "alice@example.com", "password": "secret1" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_other_user_is_forbidden() {
        let (state, _dir) = test_state();
        let app = create_app(state.clone());

        let response = app
            .clone()
            .oneshot(multipart_request(
                "POST",
                "/api/users/register",
                None,
                multipart_body(
                    &[
                        ("username", "bob"),
                        ("email", "bob@example.com"),
                        ("password", "secret1"),
                    ],
                    None,
                ),
            ))
            .await
            .unwrap();
        let bob = json_body(response).await;
        let bob_id = bob["id"].as_i64().unwrap();
        let intruder = token_for(&state, bob_id + 1, UserRole::User);

        let response = app
            .oneshot(multipart_request(
                "PUT",
                &format!("/api/users/{bob_id}"),
                Some(&intruder),
                multipart_body(&[("username", "mallory")], None),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_list_users_requires_admin() {
        let (state, _dir) = test_state();
        let user_token = token_for(&state, 1, UserRole::User);
        let admin = admin_token(&state);
        let app = create_app(state);

        let response = app
            .clone()
            .oneshot(get_request("/api/users", Some(&user_token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(get_request("/api/users", Some(&admin)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rate_limit_rejects_when_exhausted() {
        let (mut state, _dir) = test_state();
        state.rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig {
            token_limit: 1,
            tokens_per_period: 1,
            replenishment_period: Duration::from_secs(3600),
        }));
        let app = create_app(state);

        let first = app
            .clone()
            .oneshot(get_request("/api/companies", None))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .clone()
            .oneshot(get_request("/api/companies", None))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

        // Probes are outside `/api`.
        let probe = app.oneshot(get_request("/livez", None)).await.unwrap();
        assert_eq!(probe.status(), StatusCode::OK);
    }
}
