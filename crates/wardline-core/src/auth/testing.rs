//! Shared test doubles for the auth modules.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use crate::api::{AuthApi, ClientError};
use crate::models::{
    LoginRequest, LoginResponse, RefreshTokenResponse, SignUpRequest, SignUpResponse,
};

/// Mint an unsigned-for-our-purposes JWT with the given expiry and groups.
pub(crate) fn mint_token(exp: i64, groups: &[&str]) -> String {
    encode(
        &Header::default(),
        &json!({ "exp": exp, "groups": groups }),
        &EncodingKey::from_secret(b"test"),
    )
    .expect("Failed to encode test token")
}

/// Scripted auth transport: tests queue responses per operation, calls pop
/// them in order. An unscripted refresh answers with an empty response so
/// tick-counting tests do not need to pre-fill the queue.
pub(crate) struct MockAuthApi {
    login: Mutex<VecDeque<Result<LoginResponse, ClientError>>>,
    sign_up: Mutex<VecDeque<Result<SignUpResponse, ClientError>>>,
    refresh: Mutex<VecDeque<Result<RefreshTokenResponse, ClientError>>>,
    pub refresh_calls: AtomicUsize,
}

impl MockAuthApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            login: Mutex::new(VecDeque::new()),
            sign_up: Mutex::new(VecDeque::new()),
            refresh: Mutex::new(VecDeque::new()),
            refresh_calls: AtomicUsize::new(0),
        })
    }

    pub fn push_login(&self, response: Result<LoginResponse, ClientError>) {
        self.login.lock().unwrap().push_back(response);
    }

    pub fn push_sign_up(&self, response: Result<SignUpResponse, ClientError>) {
        self.sign_up.lock().unwrap().push_back(response);
    }

    pub fn push_refresh(&self, response: Result<RefreshTokenResponse, ClientError>) {
        self.refresh.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, _request: LoginRequest) -> Result<LoginResponse, ClientError> {
        self.login
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::InvalidResponse("unscripted login".to_string())))
    }

    async fn sign_up(&self, _request: SignUpRequest) -> Result<SignUpResponse, ClientError> {
        self.sign_up
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::InvalidResponse("unscripted sign-up".to_string())))
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<RefreshTokenResponse, ClientError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RefreshTokenResponse::default()))
    }
}
