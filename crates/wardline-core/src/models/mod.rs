//! Wire payload shapes for the hospital backend services.
//!
//! These are the request/response messages exchanged with the auth, patient,
//! employee and emergency-ward services. Field names follow the backend's
//! camelCase convention via serde renames; the shapes themselves are owned by
//! the backend and treated as opaque typed payloads here.

pub mod auth;
pub mod emergency;
pub mod records;
pub mod user;

pub use auth::{
    AuthStatus, LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
    SignUpRequest, SignUpResponse,
};
pub use emergency::{
    AddPatientRequest, AddPatientResponse, CallPatientRequest, QueueEntry, QueueStatusResponse,
    RemovePatientRequest, TransferPatientRequest,
};
pub use records::{
    Appointment, GetAllDoctorsResponse, GetAllMedicalEventResponse, GetAllMedicalExamResponse,
    GetAllPatientsResponse, GetAllStaffsResponse, GetAllWardResponse, GetAppointmentsRequest,
    GetAppointmentsResponse, GetMedicalExamDetailsResponse, GetMedicalInfoResponse, MedicalEvent,
    MedicalExam, MedicalInfo, OperationStatus, TimeRangeRequest, Ward,
};
pub use user::{Doctor, Patient, Staff};
