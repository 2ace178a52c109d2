use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::user::{Doctor, Patient, Staff};

/// Outcome code returned by the employee-side create/modify operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Success,
    NotFound,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ward {
    pub code: i32,
    pub name: Option<String>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Option<i64>,
    #[serde(rename = "patientFiscalCode")]
    pub patient_fiscal_code: Option<String>,
    #[serde(rename = "doctorFiscalCode")]
    pub doctor_fiscal_code: Option<String>,
    #[serde(rename = "scheduledAt")]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub ambulatory: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalInfo {
    #[serde(rename = "patientFiscalCode")]
    pub patient_fiscal_code: Option<String>,
    pub allergies: Option<String>,
    #[serde(rename = "bloodGroup")]
    pub blood_group: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalExam {
    pub id: Option<i64>,
    #[serde(rename = "patientFiscalCode")]
    pub patient_fiscal_code: Option<String>,
    #[serde(rename = "examType")]
    pub exam_type: Option<String>,
    pub date: Option<NaiveDate>,
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalEvent {
    pub id: Option<i64>,
    #[serde(rename = "patientFiscalCode")]
    pub patient_fiscal_code: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    #[serde(rename = "wardCode")]
    pub ward_code: Option<i32>,
}

// Request/response wrappers

/// Date-bounded listing request shared by the history endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeRangeRequest {
    #[serde(rename = "fromDate")]
    pub from_date: Option<NaiveDate>,
    #[serde(rename = "toDate")]
    pub to_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAppointmentsRequest {
    #[serde(rename = "fromDate")]
    pub from_date: Option<NaiveDate>,
    #[serde(rename = "toDate")]
    pub to_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAppointmentsResponse {
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMedicalInfoResponse {
    #[serde(default)]
    pub infos: Vec<MedicalInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAllMedicalEventResponse {
    #[serde(default)]
    pub events: Vec<MedicalEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAllMedicalExamResponse {
    #[serde(default)]
    pub exams: Vec<MedicalExam>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMedicalExamDetailsResponse {
    pub exam: Option<MedicalExam>,
    pub report: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAllDoctorsResponse {
    #[serde(default)]
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAllPatientsResponse {
    #[serde(default)]
    pub patients: Vec<Patient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAllStaffsResponse {
    #[serde(default)]
    pub staffs: Vec<Staff>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAllWardResponse {
    #[serde(default)]
    pub wards: Vec<Ward>,
}
