use super::join_url;
use crate::error::{ClientError, Result};
use crate::session::Session;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_login(email: &str, password: &str) -> Result<()> {
    if !email.contains('@') {
        return Err(ClientError::InvalidInput(
            "Please enter a valid email address".to_string(),
        ));
    }
    if password.is_empty() {
        return Err(ClientError::InvalidInput("Password is required".to_string()));
    }
    Ok(())
}

pub fn validate_registration(username: &str, email: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(ClientError::InvalidInput("Username is required".to_string()));
    }
    validate_login(email, password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let url = join_url(&self.base_url, "/api/v1/auth/login");
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = %status, email = %email, "Invalid login");
            return Err(ClientError::Status {
                status,
                message: "Invalid login credentials".to_string(),
            });
        }

        let body: LoginResponse = serde_json::from_slice(&response.bytes().await?)?;
        info!(email = %email, "Login succeeded");
        Ok(Session::from_token(body.token))
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<()> {
        let url = join_url(&self.base_url, "/api/v1/auth/register");
        let response = self
            .client
            .post(&url)
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            warn!(status = %response.status(), "Error creating new account");
            return Err(ClientError::from_response(response).await);
        }

        info!(username = %username, "Account created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    #[test]
    fn registration_rules() {
        assert!(validate_registration("ana", "ana@example.com", "longenough").is_ok());
        assert!(validate_registration(" ", "ana@example.com", "longenough").is_err());
        assert!(validate_registration("ana", "ana.example.com", "longenough").is_err());
        assert!(validate_registration("ana", "ana@example.com", "short").is_err());
        assert!(validate_login("ana@example.com", "").is_err());
    }

    #[tokio::test]
    async fn login_returns_session_on_200() {
        let router = Router::new().route(
            "/api/v1/auth/login",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["email"], "ana@example.com");
                Json(json!({ "token": "abc.def.ghi", "refresh_token": "r" }))
            }),
        );
        let base = serve(router).await;

        let auth = AuthClient::new(reqwest::Client::new(), base);
        let session = auth.login("ana@example.com", "secret123").await.unwrap();
        assert_eq!(session.token, "abc.def.ghi");
    }

    #[tokio::test]
    async fn login_rejects_non_200() {
        let router = Router::new().route(
            "/api/v1/auth/login",
            post(|| async { (AxumStatus::UNAUTHORIZED, Json(json!({ "error": "nope" }))) }),
        );
        let base = serve(router).await;

        let auth = AuthClient::new(reqwest::Client::new(), base);
        let err = auth.login("ana@example.com", "bad").await.unwrap_err();
        assert!(err.to_string().contains("Invalid login credentials"));
    }

    #[tokio::test]
    async fn register_requires_201() {
        let router = Router::new()
            .route("/api/v1/auth/register", post(|| async { AxumStatus::CREATED }));
        let base = serve(router).await;
        let auth = AuthClient::new(reqwest::Client::new(), base);
        auth.register("ana", "ana@example.com", "longenough")
            .await
            .unwrap();

        let router = Router::new().route(
            "/api/v1/auth/register",
            post(|| async {
                (
                    AxumStatus::BAD_REQUEST,
                    Json(json!({ "error": "User already exists" })),
                )
            }),
        );
        let base = serve(router).await;
        let auth = AuthClient::new(reqwest::Client::new(), base);
        let err = auth
            .register("ana", "ana@example.com", "longenough")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Status { ref message, .. } if message == "User already exists"
        ));
    }
}
