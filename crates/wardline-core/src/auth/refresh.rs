//! Background keep-alive loop for the session credential.
//!
//! While a refresh token exists, the scheduler periodically exchanges it for
//! a fresh access/refresh pair and writes the result into the credential
//! store. It stops itself when there is nothing left to refresh, and forces
//! a logout when the auth service rejects the refresh token outright.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use crate::api::{AuthApi, ClientError};

use super::store::CredentialStore;

/// Seconds between refresh attempts.
/// Access tokens outlive several periods, so one missed tick is harmless.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

/// Recurring background task exchanging the refresh token for new
/// credentials. At most one task runs at a time: `start` while running is a
/// no-op, `stop` is idempotent and safe from any state.
pub struct RefreshScheduler {
    credentials: Arc<CredentialStore>,
    auth: Arc<dyn AuthApi>,
    period: Duration,
    task: Mutex<Option<RunningTask>>,
}

struct RunningTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

enum TickOutcome {
    Refreshed,
    Failed,
    NoRefreshToken,
    SessionRevoked,
    Stopped,
}

impl RefreshScheduler {
    pub fn new(credentials: Arc<CredentialStore>, auth: Arc<dyn AuthApi>) -> Self {
        Self::with_period(
            credentials,
            auth,
            Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
        )
    }

    pub fn with_period(
        credentials: Arc<CredentialStore>,
        auth: Arc<dyn AuthApi>,
        period: Duration,
    ) -> Self {
        Self {
            credentials,
            auth,
            period,
            task: Mutex::new(None),
        }
    }

    /// Arm the recurring refresh. No-op when already running or when no
    /// refresh token exists. Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut slot = self.task.lock().unwrap();
        if slot.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            return;
        }
        if self.credentials.refresh_token().is_none() {
            debug!("No refresh token present - scheduler not started");
            return;
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.credentials),
            Arc::clone(&self.auth),
            self.period,
            shutdown_rx,
        ));
        *slot = Some(RunningTask { shutdown, handle });
    }

    /// Cancel the recurring refresh. An in-flight refresh call is not
    /// interrupted; its result is discarded when it lands.
    pub fn stop(&self) {
        let mut slot = self.task.lock().unwrap();
        if let Some(task) = slot.take() {
            let _ = task.shutdown.send(true);
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }
}

async fn run_loop(
    credentials: Arc<CredentialStore>,
    auth: Arc<dyn AuthApi>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    // First refresh one full period after start; login just produced a
    // fresh token pair.
    let mut ticker = time::interval_at(Instant::now() + period, period);
    debug!(period_secs = period.as_secs(), "Token refresh loop started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match refresh_once(&credentials, &*auth, &shutdown_rx).await {
                    TickOutcome::Refreshed | TickOutcome::Failed => {}
                    TickOutcome::NoRefreshToken => {
                        debug!("Refresh token gone - refresh loop stopping itself");
                        break;
                    }
                    TickOutcome::SessionRevoked => {
                        warn!("Refresh token rejected - session cleared, forcing logout");
                        break;
                    }
                    TickOutcome::Stopped => break,
                }
            }
            changed = shutdown_rx.changed() => {
                // Err means every sender is gone: the scheduler itself was
                // dropped, so the loop must not outlive it.
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }
    debug!("Token refresh loop stopped");
}

async fn refresh_once(
    credentials: &CredentialStore,
    auth: &dyn AuthApi,
    shutdown: &watch::Receiver<bool>,
) -> TickOutcome {
    let Some(refresh_token) = credentials.refresh_token() else {
        return TickOutcome::NoRefreshToken;
    };

    match auth.refresh(&refresh_token).await {
        Ok(response) => {
            // The scheduler may have been stopped while the call was in
            // flight; the stale result must not be applied.
            if *shutdown.borrow() {
                return TickOutcome::Stopped;
            }
            // Each field is applied independently: a response missing one
            // token must not blank out the stored counterpart.
            if let Some(access) = response.access_token.filter(|t| !t.is_empty()) {
                credentials.set_access_token(&access);
            }
            if let Some(refresh) = response.refresh_token.filter(|t| !t.is_empty()) {
                credentials.set_refresh_token(&refresh);
            }
            TickOutcome::Refreshed
        }
        Err(ClientError::RefreshExpired) => {
            credentials.clear();
            TickOutcome::SessionRevoked
        }
        Err(e) => {
            // No in-tick retry; the next tick will try again.
            warn!(error = %e, "Token refresh failed - waiting for next tick");
            TickOutcome::Failed
        }
    }
}
