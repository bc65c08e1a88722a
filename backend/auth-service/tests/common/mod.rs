//! Shared fixtures for the HTTP integration tests
#![allow(dead_code)]

use auth_service::{
    build_router,
    config::Environment,
    db::{InMemoryCompanyStore, InMemoryUserStore},
    models::{Company, UserRecord},
    services::AuthService,
    AppState,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bcrypt::Version;
use jwt_security::{TokenConfig, TokenIssuer};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret-Zq8#Lm2!Wx7$Rt4@Pk9&";

pub struct TestApp {
    pub router: Router,
    pub issuer: Arc<TokenIssuer>,
}

pub fn user(id: i32, username: &str, password: &str, version: Version) -> UserRecord {
    UserRecord {
        id,
        username: username.to_string(),
        password_hash: bcrypt::hash_with_result(password, 4)
            .expect("hash password")
            .format_for_version(version),
        email: Some(format!("{username}@example.com")),
        created_at: None,
        updated_at: None,
    }
}

pub fn company(id: i32, name: &str) -> Company {
    Company {
        id,
        company_name: name.to_string(),
        website: Some(format!("https://{}.example.com", name.to_lowercase())),
        description: None,
        founded_year: Some(2000 + id),
        headquarters: None,
    }
}

/// alice/s3cret ($2b$), bob/hunter2 ($2a$) and two companies
pub fn spawn_app() -> TestApp {
    let users = InMemoryUserStore::with_users([
        user(7, "alice", "s3cret", Version::TwoB),
        user(8, "bob", "hunter2", Version::TwoA),
    ]);
    let companies = InMemoryCompanyStore::with_companies([company(1, "Zeta"), company(2, "Acme")]);

    let issuer = Arc::new(TokenIssuer::new(TokenConfig::new(SECRET)));
    let state = AppState::new(
        AuthService::new(Arc::new(users), Arc::clone(&issuer)),
        Arc::new(companies),
        Environment::Test,
    );

    TestApp {
        router: build_router(state, Duration::from_secs(5)),
        issuer,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, body)
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let body = serde_json::json!({ "username": username, "password": password });
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri("/api/account/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("build request"),
        )
        .await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        match token {
            Some(token) => {
                self.get_with_authorization(uri, &format!("Bearer {token}"))
                    .await
            }
            None => {
                self.send(
                    Request::builder()
                        .method(Method::GET)
                        .uri(uri)
                        .body(Body::empty())
                        .expect("build request"),
                )
                .await
            }
        }
    }

    /// GET with a raw `Authorization` header value
    pub async fn get_with_authorization(
        &self,
        uri: &str,
        authorization: &str,
    ) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .header(header::AUTHORIZATION, authorization)
                .body(Body::empty())
                .expect("build request"),
        )
        .await
    }

    pub async fn token_for(&self, username: &str, password: &str) -> String {
        let (status, body) = self.login(username, password).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["token"]
            .as_str()
            .expect("token in response")
            .to_string()
    }
}
