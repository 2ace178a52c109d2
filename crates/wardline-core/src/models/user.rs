use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "fiscalCode")]
    pub fiscal_code: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "fiscalCode")]
    pub fiscal_code: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    #[serde(rename = "wardCode")]
    pub ward_code: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    #[serde(rename = "fiscalCode")]
    pub fiscal_code: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}
