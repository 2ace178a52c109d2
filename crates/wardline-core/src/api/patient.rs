//! Patient-facing service client.
//!
//! The patient the backend resolves from the bearer credential is implicit
//! in every call - no identifier travels in the requests.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::{
    GetAllMedicalEventResponse, GetAllMedicalExamResponse, GetAppointmentsRequest,
    GetAppointmentsResponse, GetMedicalExamDetailsResponse, GetMedicalInfoResponse, MedicalExam,
    Patient, TimeRangeRequest,
};

use super::connection::{Connection, ConnectionFactory, ServiceName};
use super::ClientError;

pub struct PatientServices {
    connection: Arc<Connection>,
}

impl PatientServices {
    /// Obtain the shared patient connection; fails with `Unauthenticated`
    /// when no valid access token is held.
    pub fn new(factory: &ConnectionFactory) -> Result<Self, ClientError> {
        Ok(Self {
            connection: factory.get_connection(ServiceName::Patient)?,
        })
    }

    /// The patient's own record
    pub async fn get_patient(&self) -> Result<Patient, ClientError> {
        self.connection.call("GetPatient", &()).await
    }

    pub async fn get_appointments(
        &self,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<GetAppointmentsResponse, ClientError> {
        self.connection
            .call(
                "GetAppointments",
                &GetAppointmentsRequest { from_date, to_date },
            )
            .await
    }

    pub async fn get_all_medical_info(&self) -> Result<GetMedicalInfoResponse, ClientError> {
        self.connection.call("GetAllMedicalInfo", &()).await
    }

    pub async fn get_all_medical_events(
        &self,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<GetAllMedicalEventResponse, ClientError> {
        self.connection
            .call(
                "GetAllMedicalEvent",
                &TimeRangeRequest { from_date, to_date },
            )
            .await
    }

    pub async fn get_all_medical_exams(
        &self,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Result<GetAllMedicalExamResponse, ClientError> {
        self.connection
            .call(
                "GetAllMedicalExam",
                &TimeRangeRequest { from_date, to_date },
            )
            .await
    }

    pub async fn get_medical_exam_details(
        &self,
        exam: &MedicalExam,
    ) -> Result<GetMedicalExamDetailsResponse, ClientError> {
        self.connection.call("GetMedicalExamDetails", exam).await
    }
}
