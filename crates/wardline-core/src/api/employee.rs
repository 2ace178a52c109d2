//! Employee-facing service clients: the staff/doctor directory and record
//! management plus the emergency-ward services, which live behind separate
//! connections on the same deployment.

use std::sync::Arc;

use crate::models::{
    AddPatientRequest, AddPatientResponse, Appointment, CallPatientRequest, Doctor,
    GetAllDoctorsResponse, GetAllMedicalEventResponse, GetAllPatientsResponse,
    GetAllStaffsResponse, GetAllWardResponse, MedicalEvent, MedicalExam, MedicalInfo,
    OperationStatus, Patient, QueueStatusResponse, RemovePatientRequest, Staff,
    TimeRangeRequest, TransferPatientRequest,
};

use super::connection::{Connection, ConnectionFactory, ServiceName};
use super::ClientError;

/// Status-only reply of the employee-side create/modify operations
#[derive(Debug, Clone, serde::Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub status: Option<OperationStatus>,
}

pub struct EmployeeServices {
    employee: Arc<Connection>,
    emergency_ward: Arc<Connection>,
    emergency_panel: Arc<Connection>,
}

impl EmployeeServices {
    /// Obtain the three employee-side connections; fails with
    /// `Unauthenticated` when no valid access token is held.
    pub fn new(factory: &ConnectionFactory) -> Result<Self, ClientError> {
        Ok(Self {
            employee: factory.get_connection(ServiceName::Employee)?,
            emergency_ward: factory.get_connection(ServiceName::EmergencyWard)?,
            emergency_panel: factory.get_connection(ServiceName::EmergencyWardPanel)?,
        })
    }

    /// The doctor record matching the bearer credential
    pub async fn get_doctor(&self) -> Result<Doctor, ClientError> {
        self.employee.call("GetDoctor", &()).await
    }

    pub async fn get_all_doctors(&self) -> Result<GetAllDoctorsResponse, ClientError> {
        self.employee.call("GetAllDoctors", &()).await
    }

    pub async fn get_all_patients(&self) -> Result<GetAllPatientsResponse, ClientError> {
        self.employee.call("GetAllPatients", &()).await
    }

    pub async fn get_all_staff(&self) -> Result<GetAllStaffsResponse, ClientError> {
        self.employee.call("GetAllStaffs", &()).await
    }

    pub async fn get_all_wards(&self) -> Result<GetAllWardResponse, ClientError> {
        self.employee.call("GetAllWard", &()).await
    }

    pub async fn create_patient(&self, patient: &Patient) -> Result<MutationResponse, ClientError> {
        self.employee.call("CreatePatient", patient).await
    }

    pub async fn modify_patient(&self, patient: &Patient) -> Result<MutationResponse, ClientError> {
        self.employee.call("ModifyPatient", patient).await
    }

    pub async fn create_staff(&self, staff: &Staff) -> Result<MutationResponse, ClientError> {
        self.employee.call("CreateStaff", staff).await
    }

    pub async fn modify_staff(&self, staff: &Staff) -> Result<MutationResponse, ClientError> {
        self.employee.call("ModifyStaff", staff).await
    }

    pub async fn create_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<MutationResponse, ClientError> {
        self.employee.call("CreateAppointment", appointment).await
    }

    pub async fn modify_appointment(
        &self,
        appointment: &Appointment,
    ) -> Result<MutationResponse, ClientError> {
        self.employee.call("ModifyAppointment", appointment).await
    }

    pub async fn create_medical_info(
        &self,
        info: &MedicalInfo,
    ) -> Result<MutationResponse, ClientError> {
        self.employee.call("CreateMedicalInfo", info).await
    }

    pub async fn modify_medical_info(
        &self,
        info: &MedicalInfo,
    ) -> Result<MutationResponse, ClientError> {
        self.employee.call("ModifyMedicalInfo", info).await
    }

    pub async fn create_medical_exam(
        &self,
        exam: &MedicalExam,
    ) -> Result<MutationResponse, ClientError> {
        self.employee.call("CreateMedicalExam", exam).await
    }

    pub async fn modify_medical_exam(
        &self,
        exam: &MedicalExam,
    ) -> Result<MutationResponse, ClientError> {
        self.employee.call("ModifyMedicalExam", exam).await
    }

    pub async fn create_medical_event(
        &self,
        event: &MedicalEvent,
    ) -> Result<MutationResponse, ClientError> {
        self.employee.call("CreateMedicalEvent", event).await
    }

    pub async fn modify_medical_event(
        &self,
        event: &MedicalEvent,
    ) -> Result<MutationResponse, ClientError> {
        self.employee.call("ModifyMedicalEvent", event).await
    }

    pub async fn get_all_medical_events(
        &self,
        range: &TimeRangeRequest,
    ) -> Result<GetAllMedicalEventResponse, ClientError> {
        self.employee.call("GetAllMedicalEvent", range).await
    }

    // Emergency ward

    /// Admit a patient to the emergency ward with a triage severity.
    pub async fn add_emergency_patient(
        &self,
        request: &AddPatientRequest,
    ) -> Result<AddPatientResponse, ClientError> {
        self.emergency_ward.call("AddPatient", request).await
    }

    /// Move an admitted patient to a regular ward.
    pub async fn transfer_emergency_patient(
        &self,
        request: &TransferPatientRequest,
    ) -> Result<(), ClientError> {
        self.emergency_ward
            .call::<_, serde_json::Value>("TransferPatient", request)
            .await?;
        Ok(())
    }

    /// Discharge a patient with the closing letter.
    pub async fn remove_emergency_patient(
        &self,
        request: &RemovePatientRequest,
    ) -> Result<(), ClientError> {
        self.emergency_ward
            .call::<_, serde_json::Value>("RemovePatient", request)
            .await?;
        Ok(())
    }

    /// Call a waiting patient into an ambulatory.
    pub async fn call_emergency_patient(
        &self,
        request: &CallPatientRequest,
    ) -> Result<(), ClientError> {
        self.emergency_ward
            .call::<_, serde_json::Value>("CallPatientForVisit", request)
            .await?;
        Ok(())
    }

    /// Waiting-room queue as shown on the ward panels.
    pub async fn emergency_queue_status(&self) -> Result<QueueStatusResponse, ClientError> {
        self.emergency_panel
            .call("RetrieveInVisitingStatus", &())
            .await
    }
}
