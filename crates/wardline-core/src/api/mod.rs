//! RPC clients for the hospital backend services.
//!
//! The auth transport travels unauthenticated; every other service is
//! reached through a credentialed connection built by the
//! `ConnectionFactory`, which stamps the current access token onto each
//! outbound call.

pub mod auth_client;
pub mod connection;
pub mod employee;
pub mod error;
pub mod patient;

pub use auth_client::{AuthApi, AuthClient};
pub use connection::{Connection, ConnectionFactory, ServiceName};
pub use employee::EmployeeServices;
pub use error::ClientError;
pub use patient::PatientServices;
