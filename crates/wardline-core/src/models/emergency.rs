use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPatientRequest {
    #[serde(rename = "patientFiscalCode")]
    pub patient_fiscal_code: String,
    /// Triage severity, white (lowest) to red (highest).
    #[serde(rename = "severityCode")]
    pub severity_code: i32,
    #[serde(rename = "medicalReport")]
    pub medical_report: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPatientResponse {
    #[serde(rename = "patientId")]
    pub patient_id: i64,
    #[serde(rename = "emergencyWardCode")]
    pub emergency_ward_code: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferPatientRequest {
    #[serde(rename = "patientId")]
    pub patient_id: i64,
    #[serde(rename = "targetWardCode")]
    pub target_ward_code: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovePatientRequest {
    #[serde(rename = "patientId")]
    pub patient_id: i64,
    #[serde(rename = "dischargeLetter")]
    pub discharge_letter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallPatientRequest {
    #[serde(rename = "patientId")]
    pub patient_id: i64,
    pub ambulatory: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    #[serde(rename = "patientId")]
    pub patient_id: i64,
    #[serde(rename = "severityCode")]
    pub severity_code: i32,
    pub ambulatory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStatusResponse {
    #[serde(default)]
    pub patients: Vec<QueueEntry>,
}
