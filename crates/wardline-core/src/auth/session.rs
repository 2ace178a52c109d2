//! Session façade: login, registration, logout and session queries.
//!
//! Composes the credential store, the auth transport and the refresh
//! scheduler. Dependencies are injected at construction - there is no
//! ambient global session; assemble one at startup and thread it through.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use crate::api::{AuthApi, AuthClient, ClientError};
use crate::models::{LoginRequest, SignUpRequest};

use super::refresh::RefreshScheduler;
use super::store::CredentialStore;
use super::token::{self, Role};

pub struct Session {
    credentials: Arc<CredentialStore>,
    auth: Arc<dyn AuthApi>,
    scheduler: RefreshScheduler,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish()
    }
}

impl Session {
    /// Build a session against the auth service at `endpoint`.
    ///
    /// Fails with a configuration error when the endpoint is empty; the
    /// endpoint is recorded in the credential store so it survives reloads.
    pub fn connect(
        endpoint: &str,
        credentials: Arc<CredentialStore>,
    ) -> Result<Self, ClientError> {
        if endpoint.trim().is_empty() {
            return Err(ClientError::Config(
                "Authentication endpoint is required".to_string(),
            ));
        }
        credentials.set_auth_endpoint(endpoint);
        let auth: Arc<dyn AuthApi> = Arc::new(AuthClient::new(endpoint)?);
        Ok(Self::with_transport(credentials, auth))
    }

    /// Build a session over an already-constructed transport.
    pub fn with_transport(credentials: Arc<CredentialStore>, auth: Arc<dyn AuthApi>) -> Self {
        let scheduler = RefreshScheduler::new(Arc::clone(&credentials), Arc::clone(&auth));
        Self {
            credentials,
            auth,
            scheduler,
        }
    }

    /// Like `with_transport`, with an explicit refresh period.
    pub fn with_refresh_period(
        credentials: Arc<CredentialStore>,
        auth: Arc<dyn AuthApi>,
        period: Duration,
    ) -> Self {
        let scheduler =
            RefreshScheduler::with_period(Arc::clone(&credentials), Arc::clone(&auth), period);
        Self {
            credentials,
            auth,
            scheduler,
        }
    }

    /// Authenticate with fiscal code and password.
    ///
    /// Returns `Ok(false)` when the server rejects the credentials - the
    /// store is left untouched so a previously expired session does not
    /// resurrect. Transport failures propagate.
    pub async fn login(&self, fiscal_code: &str, password: &str) -> Result<bool, ClientError> {
        let response = self
            .auth
            .login(LoginRequest {
                fiscal_code: fiscal_code.to_string(),
                password: password.to_string(),
            })
            .await?;

        if response.login_status != crate::models::AuthStatus::Success {
            debug!(status = ?response.login_status, "Login rejected");
            return Ok(false);
        }

        self.credentials.set_access_token(&response.access_token);
        self.credentials.set_refresh_token(&response.refresh_token);
        self.scheduler.start();
        Ok(true)
    }

    /// Register a new user. Registration does not authenticate: the caller
    /// logs in explicitly afterwards.
    pub async fn register(&self, profile: SignUpRequest) -> Result<bool, ClientError> {
        let response = self.auth.sign_up(profile).await?;
        Ok(response.sign_up_status == crate::models::AuthStatus::Success)
    }

    /// Drop the credential and stop the keep-alive loop. Idempotent.
    pub fn logout(&self) {
        self.credentials.clear();
        self.scheduler.stop();
    }

    /// True iff the stored access token decodes and has not expired.
    pub fn is_authenticated(&self) -> bool {
        match self.credentials.access_token() {
            Some(token) => token::is_valid(&token, Utc::now().timestamp()),
            None => false,
        }
    }

    /// Role memberships carried by the current access token. Unknown group
    /// strings are ignored; an unreadable token yields the empty set.
    pub fn roles(&self) -> HashSet<Role> {
        let Some(access_token) = self.credentials.access_token() else {
            return HashSet::new();
        };
        match token::decode(&access_token) {
            Ok(decoded) => decoded.roles(),
            Err(e) => {
                warn!(error = %e, "Could not decode access token for roles");
                HashSet::new()
            }
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles().contains(&role)
    }

    pub fn is_doctor(&self) -> bool {
        self.has_role(Role::Doctor)
    }

    pub fn is_staff(&self) -> bool {
        self.has_role(Role::Staff)
    }

    pub fn is_patient(&self) -> bool {
        self.has_role(Role::Patient)
    }

    /// Raw access token, for callers that attach the bearer credential by
    /// hand instead of going through a factory connection.
    pub fn access_token(&self) -> Option<String> {
        self.credentials.access_token()
    }

    /// Arm the keep-alive loop (no-op without a refresh token). Useful when
    /// resuming a persisted session without going through `login`.
    pub fn start_token_refresh(&self) {
        self.scheduler.start();
    }

    pub fn stop_token_refresh(&self) {
        self.scheduler.stop();
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tokio::time;

    use crate::auth::storage::MemoryStorage;
    use crate::auth::testing::{mint_token, MockAuthApi};
    use crate::models::{
        AuthStatus, LoginResponse, RefreshTokenResponse, SignUpRequest, SignUpResponse,
    };

    use super::*;

    fn empty_store() -> Arc<CredentialStore> {
        Arc::new(CredentialStore::new(Box::new(MemoryStorage::new())))
    }

    fn profile() -> SignUpRequest {
        SignUpRequest {
            fiscal_code: "RSSMRA80A01H501U".to_string(),
            name: "Mario".to_string(),
            surname: "Rossi".to_string(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            phone_number: "3331234567".to_string(),
            email: "mario.rossi@example.com".to_string(),
            password: "pw".to_string(),
        }
    }

    #[tokio::test]
    async fn rejected_login_leaves_store_untouched() {
        let store = empty_store();
        let auth = MockAuthApi::new();
        auth.push_login(Ok(LoginResponse {
            login_status: AuthStatus::InvalidCredentials,
            access_token: String::new(),
            refresh_token: String::new(),
        }));

        let session = Session::with_transport(Arc::clone(&store), auth);
        let logged_in = session.login("CF123", "pw").await.unwrap();

        assert!(!logged_in);
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn successful_login_authenticates_and_starts_refresh() {
        let store = empty_store();
        let auth = MockAuthApi::new();
        let access = mint_token(Utc::now().timestamp() + 3600, &["patient"]);
        auth.push_login(Ok(LoginResponse {
            login_status: AuthStatus::Success,
            access_token: access,
            refresh_token: "R1".to_string(),
        }));

        let session = Session::with_transport(Arc::clone(&store), auth);
        assert!(session.login("CF123", "pw").await.unwrap());

        assert!(session.is_authenticated());
        assert!(session.is_patient());
        assert_eq!(store.refresh_token().as_deref(), Some("R1"));
        assert!(session.scheduler.is_running());
    }

    #[tokio::test]
    async fn transport_failures_propagate() {
        let session = Session::with_transport(empty_store(), {
            let auth = MockAuthApi::new();
            auth.push_login(Err(ClientError::ServerError("unreachable".to_string())));
            auth
        });
        assert!(session.login("CF123", "pw").await.is_err());
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let store = empty_store();
        let auth = MockAuthApi::new();
        let access = mint_token(Utc::now().timestamp() + 3600, &["doctor"]);
        auth.push_login(Ok(LoginResponse {
            login_status: AuthStatus::Success,
            access_token: access,
            refresh_token: "R1".to_string(),
        }));

        let session = Session::with_transport(Arc::clone(&store), auth);
        session.login("CF123", "pw").await.unwrap();

        session.logout();
        assert!(!session.is_authenticated());
        assert!(store.access_token().is_none());
        assert!(!session.scheduler.is_running());

        session.logout();
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn register_does_not_authenticate() {
        let auth = MockAuthApi::new();
        auth.push_sign_up(Ok(SignUpResponse {
            sign_up_status: AuthStatus::Success,
        }));

        let session = Session::with_transport(empty_store(), auth);
        assert!(session.register(profile()).await.unwrap());
        assert!(!session.is_authenticated());
        assert!(!session.scheduler.is_running());
    }

    #[tokio::test]
    async fn rejected_registration_is_false() {
        let auth = MockAuthApi::new();
        auth.push_sign_up(Ok(SignUpResponse {
            sign_up_status: AuthStatus::UserAlreadyExists,
        }));

        let session = Session::with_transport(empty_store(), auth);
        assert!(!session.register(profile()).await.unwrap());
    }

    #[tokio::test]
    async fn expired_token_reports_roles_but_not_authenticated() {
        let store = empty_store();
        store.set_access_token(&mint_token(
            Utc::now().timestamp() - 1,
            &["doctor", "staff"],
        ));

        let session = Session::with_transport(store, MockAuthApi::new());
        assert!(!session.is_authenticated());
        assert_eq!(
            session.roles(),
            HashSet::from([Role::Doctor, Role::Staff])
        );
        assert!(session.is_doctor());
        assert!(session.is_staff());
        assert!(!session.is_patient());
    }

    #[tokio::test]
    async fn unreadable_token_yields_no_roles() {
        let store = empty_store();
        store.set_access_token("not-a-jwt");

        let session = Session::with_transport(store, MockAuthApi::new());
        assert!(!session.is_authenticated());
        assert!(session.roles().is_empty());
    }

    #[test]
    fn connect_rejects_empty_endpoint() {
        let err = Session::connect("", empty_store()).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));

        let err = Session::connect("   ", empty_store()).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn connect_records_endpoint() {
        let store = empty_store();
        Session::connect("https://auth.example", Arc::clone(&store)).unwrap();
        assert_eq!(
            store.auth_endpoint().as_deref(),
            Some("https://auth.example")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn keepalive_rotates_tokens_after_login() {
        let store = empty_store();
        let auth = MockAuthApi::new();
        let a1 = mint_token(Utc::now().timestamp() + 3600, &["patient"]);
        auth.push_login(Ok(LoginResponse {
            login_status: AuthStatus::Success,
            access_token: a1,
            refresh_token: "R1".to_string(),
        }));
        auth.push_refresh(Ok(RefreshTokenResponse {
            access_token: Some("A2".to_string()),
            refresh_token: Some("R2".to_string()),
        }));

        let session = Session::with_refresh_period(
            Arc::clone(&store),
            auth,
            Duration::from_secs(15),
        );
        assert!(session.login("CF123", "pw").await.unwrap());

        time::sleep(Duration::from_secs(16)).await;
        assert_eq!(store.access_token().as_deref(), Some("A2"));
        assert_eq!(store.refresh_token().as_deref(), Some("R2"));
    }
}
