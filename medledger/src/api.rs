//! The read-only operations the dashboard consumes.
//!
//! [`DashboardApi`] is implemented by [`ApiClient`] for the live service; the
//! background service task and the parallel detail fetch are generic over it.

use std::future::Future;

use crate::client::{ApiClient, ClientError};
use crate::models::{
    Patient, PatientPage, PatientProfile, RecordList, StatsSummary, TransactionList,
};

/// Patients requested per list page.
pub const PATIENT_PAGE_SIZE: u32 = 10;

/// Most recent transactions requested by the history screen.
pub const TRANSACTION_LIMIT: u32 = 20;

pub trait DashboardApi {
    fn get_patients(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> impl Future<Output = Result<PatientPage, ClientError>> + Send;

    fn get_patient(
        &self,
        patient_id: &str,
    ) -> impl Future<Output = Result<Option<Patient>, ClientError>> + Send;

    fn get_patient_records(
        &self,
        patient_id: &str,
    ) -> impl Future<Output = Result<RecordList, ClientError>> + Send;

    fn get_transactions(
        &self,
        wallet_address: Option<&str>,
        limit: u32,
    ) -> impl Future<Output = Result<TransactionList, ClientError>> + Send;

    fn get_stats(&self) -> impl Future<Output = Result<StatsSummary, ClientError>> + Send;
}

impl DashboardApi for ApiClient {
    fn get_patients(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> impl Future<Output = Result<PatientPage, ClientError>> + Send {
        ApiClient::get_patients(self, page, limit, search)
    }

    fn get_patient(
        &self,
        patient_id: &str,
    ) -> impl Future<Output = Result<Option<Patient>, ClientError>> + Send {
        ApiClient::get_patient(self, patient_id)
    }

    fn get_patient_records(
        &self,
        patient_id: &str,
    ) -> impl Future<Output = Result<RecordList, ClientError>> + Send {
        ApiClient::get_patient_records(self, patient_id)
    }

    fn get_transactions(
        &self,
        wallet_address: Option<&str>,
        limit: u32,
    ) -> impl Future<Output = Result<TransactionList, ClientError>> + Send {
        ApiClient::get_transactions(self, wallet_address, limit)
    }

    fn get_stats(&self) -> impl Future<Output = Result<StatsSummary, ClientError>> + Send {
        ApiClient::get_stats(self)
    }
}

/// Fetch a patient's profile and records concurrently.
///
/// Both requests must succeed; the first failure fails the whole cycle. A
/// profile that resolves to nothing is reported as not found.
pub async fn load_patient_profile<A: DashboardApi>(
    api: &A,
    patient_id: &str,
) -> Result<PatientProfile, ClientError> {
    let (patient, records) = tokio::try_join!(
        api.get_patient(patient_id),
        api.get_patient_records(patient_id)
    )?;

    let patient = patient.ok_or_else(|| ClientError::NotFound("Patient not found".to_string()))?;

    Ok(PatientProfile {
        patient,
        records: records.records,
    })
}
