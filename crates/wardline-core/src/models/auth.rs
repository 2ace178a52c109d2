use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome codes shared by the login and sign-up operations.
///
/// A non-`Success` status is a normal server answer, not a transport
/// failure - callers translate it into a boolean for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthStatus {
    Success,
    InvalidCredentials,
    UserAlreadyExists,
    Unspecified,
}

impl Default for AuthStatus {
    fn default() -> Self {
        AuthStatus::Unspecified
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "fiscalCode")]
    pub fiscal_code: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "loginStatus", default)]
    pub login_status: AuthStatus,
    #[serde(rename = "accessToken", default)]
    pub access_token: String,
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    #[serde(rename = "fiscalCode")]
    pub fiscal_code: String,
    pub name: String,
    pub surname: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpResponse {
    #[serde(rename = "signUpStatus", default)]
    pub sign_up_status: AuthStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Both fields are optional: the server may rotate only one of the pair, and
/// a missing field must leave the stored counterpart untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    #[serde(rename = "accessToken", default)]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: Option<String>,
}
