//! Credentialed connections to the clinical services.
//!
//! One `Connection` per named service, built lazily and shared for the
//! process lifetime. Every outbound call is stamped with the access token
//! read from the credential store *at call time*, so a long-lived connection
//! keeps working across token refreshes without being rebuilt.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::auth::store::CredentialStore;
use crate::auth::token;

use super::ClientError;

/// HTTP request timeout in seconds.
/// 30s allows for slow backend responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Named remote services reachable with a bearer credential.
///
/// The auth service is absent on purpose: its channel is unauthenticated and
/// owned by the auth transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceName {
    Patient,
    Employee,
    EmergencyWard,
    EmergencyWardPanel,
}

impl ServiceName {
    /// Route prefix of the service on the wire
    pub fn route(&self) -> &'static str {
        match self {
            ServiceName::Patient => "PatientServices",
            ServiceName::Employee => "EmployeeServices",
            ServiceName::EmergencyWard => "EmergencyWardServices",
            ServiceName::EmergencyWardPanel => "EmergencyWardPanelsService",
        }
    }
}

/// Closure reading the current access token at call time
type TokenProvider = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// A live client handle bound to one named remote service.
pub struct Connection {
    http: Client,
    base_url: String,
    service: ServiceName,
    token_provider: TokenProvider,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("base_url", &self.base_url)
            .field("service", &self.service)
            .finish()
    }
}

impl Connection {
    /// Invoke a remote operation, attaching the current bearer credential.
    pub async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        rpc: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}/rpc/{}/{}", self.base_url, self.service.route(), rpc);
        debug!(%url, service = ?self.service, "Service call");

        let mut request = self.http.post(&url).json(body);
        // Read at call time, not connection-creation time: a refreshed token
        // flows through this connection without a rebuild.
        if let Some(current) = (self.token_provider)() {
            request = request.bearer_auth(current);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, &body));
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("{rpc}: {e}")))
    }
}

/// Builds and owns the per-service connection singletons.
pub struct ConnectionFactory {
    http: Client,
    credentials: Arc<CredentialStore>,
    endpoints: Mutex<HashMap<ServiceName, String>>,
    connections: Mutex<HashMap<ServiceName, Arc<Connection>>>,
}

impl ConnectionFactory {
    /// `patients_url` serves the patient-facing service, `employees_url` the
    /// employee and emergency-ward services.
    pub fn new(
        credentials: Arc<CredentialStore>,
        patients_url: &str,
        employees_url: &str,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let endpoints = HashMap::from([
            (ServiceName::Patient, patients_url.to_string()),
            (ServiceName::Employee, employees_url.to_string()),
            (ServiceName::EmergencyWard, employees_url.to_string()),
            (ServiceName::EmergencyWardPanel, employees_url.to_string()),
        ]);

        Ok(Self {
            http,
            credentials,
            endpoints: Mutex::new(endpoints),
            connections: Mutex::new(HashMap::new()),
        })
    }

    /// Get the shared connection for a service, creating it on first use.
    ///
    /// Fails with `Unauthenticated` unless the store currently holds an
    /// access token the inspector reports valid - callers are expected to
    /// send the user back to login on that error.
    pub fn get_connection(&self, service: ServiceName) -> Result<Arc<Connection>, ClientError> {
        let valid = self
            .credentials
            .access_token()
            .map(|t| token::is_valid(&t, Utc::now().timestamp()))
            .unwrap_or(false);
        if !valid {
            return Err(ClientError::Unauthenticated);
        }

        // Lock order: endpoints before connections, same as `set_endpoint`.
        let endpoints = self.endpoints.lock().unwrap();
        let mut connections = self.connections.lock().unwrap();
        if let Some(existing) = connections.get(&service) {
            return Ok(Arc::clone(existing));
        }

        let base_url = endpoints
            .get(&service)
            .cloned()
            .ok_or_else(|| ClientError::Config(format!("No endpoint for {service:?}")))?;

        let credentials = Arc::clone(&self.credentials);
        let connection = Arc::new(Connection {
            http: self.http.clone(), // Cheap clone, shares connection pool
            base_url: base_url.trim_end_matches('/').to_string(),
            service,
            token_provider: Arc::new(move || credentials.access_token()),
        });
        connections.insert(service, Arc::clone(&connection));
        Ok(connection)
    }

    /// Replace a service endpoint. Drops the cached connection so the next
    /// `get_connection` rebuilds against the new URL; connections already
    /// handed out keep pointing at the old endpoint until re-fetched.
    pub fn set_endpoint(&self, service: ServiceName, url: &str) {
        let mut endpoints = self.endpoints.lock().unwrap();
        let changed = endpoints
            .get(&service)
            .map(|current| current != url)
            .unwrap_or(true);
        endpoints.insert(service, url.to_string());
        if changed {
            self.connections.lock().unwrap().remove(&service);
        }
    }
}
