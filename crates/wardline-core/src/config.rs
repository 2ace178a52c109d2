//! Service endpoint configuration.
//!
//! One URL per remote deployment, sourced from the environment (with `.env`
//! support): `AUTH_URL`, `PATIENTS_URL` and `EMPLOYEES_URL`. The employee
//! services are usually co-deployed with the patient services, so
//! `EMPLOYEES_URL` falls back to `PATIENTS_URL` when unset.

use crate::api::ClientError;

#[derive(Debug, Clone)]
pub struct Config {
    pub auth_url: String,
    pub patients_url: String,
    pub employees_url: String,
}

impl Config {
    /// Load endpoints from the environment, reading a `.env` file if present.
    pub fn from_env() -> Result<Self, ClientError> {
        let _ = dotenvy::dotenv();

        let auth_url = read_var("AUTH_URL")?;
        let patients_url = read_var("PATIENTS_URL")?;
        let employees_url = match std::env::var("EMPLOYEES_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => patients_url.clone(),
        };

        Ok(Self {
            auth_url,
            patients_url,
            employees_url,
        })
    }

    pub fn new(auth_url: &str, patients_url: &str, employees_url: &str) -> Result<Self, ClientError> {
        let config = Self {
            auth_url: auth_url.to_string(),
            patients_url: patients_url.to_string(),
            employees_url: employees_url.to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ClientError> {
        for (name, value) in [
            ("auth_url", &self.auth_url),
            ("patients_url", &self.patients_url),
            ("employees_url", &self.employees_url),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::Config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

fn read_var(name: &str) -> Result<String, ClientError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ClientError::Config(format!("{name} is not set"))),
    }
}
