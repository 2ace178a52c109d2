//! Wardline core - client library for a multi-role clinical records app.
//!
//! Doctors, administrative staff and patients reach the hospital backend
//! through this crate. It owns the authentication session (credential
//! storage, token inspection, background refresh, bearer injection) and the
//! typed per-service clients the UI's data-fetch helpers consume.
//!
//! Typical assembly, once at startup:
//!
//! ```no_run
//! use std::sync::Arc;
//! use wardline_core::api::ConnectionFactory;
//! use wardline_core::auth::{CredentialStore, FileStorage, Session};
//! use wardline_core::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let credentials = Arc::new(CredentialStore::new(Box::new(FileStorage::new()?)));
//! let session = Session::connect(&config.auth_url, Arc::clone(&credentials))?;
//! let factory = ConnectionFactory::new(
//!     credentials,
//!     &config.patients_url,
//!     &config.employees_url,
//! )?;
//! # let _ = (session, factory);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ClientError, ConnectionFactory, EmployeeServices, PatientServices, ServiceName};
pub use auth::{CredentialStore, Role, Session};
pub use config::Config;
