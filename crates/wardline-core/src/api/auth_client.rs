//! Transport for the authentication service.
//!
//! Login, sign-up and refresh travel over an unauthenticated channel - the
//! auth service is the one remote that never requires a bearer token. The
//! `AuthApi` trait is the seam the session orchestrator and the refresh
//! scheduler depend on, so both are testable without a server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::{
    LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse, SignUpRequest,
    SignUpResponse,
};

use super::ClientError;

/// HTTP request timeout in seconds.
/// 30s allows for slow backend responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Route prefix of the authentication service
const AUTH_SERVICE: &str = "AuthServices";

/// Remote operations of the authentication service.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ClientError>;
    async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpResponse, ClientError>;
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshTokenResponse, ClientError>;
}

/// Client for the authentication service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_http(http, base_url))
    }

    /// Build on an existing client, sharing its connection pool.
    pub fn with_http(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}/rpc/{}/{}", self.base_url, AUTH_SERVICE, method);
        debug!(%url, "Auth service call");

        let response = self.http.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, &body));
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("{method}: {e}")))
    }
}

#[async_trait]
impl AuthApi for AuthClient {
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ClientError> {
        self.call("Login", &request).await
    }

    async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpResponse, ClientError> {
        self.call("SignUp", &request).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshTokenResponse, ClientError> {
        let url = format!("{}/rpc/{}/RefreshToken", self.base_url, AUTH_SERVICE);
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };

        let response = self.http.post(&url).json(&request).send().await?;

        let status = response.status();
        // 401 from the refresh endpoint means the refresh token itself is
        // invalid or expired - the one failure the scheduler treats as fatal.
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::RefreshExpired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, &body));
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("RefreshToken: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::models::AuthStatus;

    use super::*;

    #[tokio::test]
    async fn login_returns_server_status_without_erroring() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc/AuthServices/Login"))
            .and(body_partial_json(json!({ "fiscalCode": "CF123" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "loginStatus": "INVALID_CREDENTIALS",
                "accessToken": "",
                "refreshToken": "",
            })))
            .mount(&server)
            .await;

        let client = AuthClient::new(&server.uri()).unwrap();
        let response = client
            .login(LoginRequest {
                fiscal_code: "CF123".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.login_status, AuthStatus::InvalidCredentials);
    }

    #[tokio::test]
    async fn refresh_maps_unauthorized_to_refresh_expired() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc/AuthServices/RefreshToken"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = AuthClient::new(&server.uri()).unwrap();
        let err = client.refresh("R-stale").await.unwrap_err();
        assert!(matches!(err, ClientError::RefreshExpired));
    }

    #[tokio::test]
    async fn refresh_response_fields_are_optional() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc/AuthServices/RefreshToken"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "A2" })),
            )
            .mount(&server)
            .await;

        let client = AuthClient::new(&server.uri()).unwrap();
        let response = client.refresh("R1").await.unwrap();
        assert_eq!(response.access_token.as_deref(), Some("A2"));
        assert!(response.refresh_token.is_none());
    }

    #[tokio::test]
    async fn server_errors_propagate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc/AuthServices/Login"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = AuthClient::new(&server.uri()).unwrap();
        let err = client
            .login(LoginRequest {
                fiscal_code: "CF123".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::ServerError(_)));
    }
}
