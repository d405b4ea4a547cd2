//! MedLedger dashboard core
//!
//! Read-only access to the records service, plus the small amount of view
//! state every dashboard screen shares:
//! - Typed, serde-backed entities (patients, medical records, consent
//!   transactions, platform statistics)
//! - An HTTP client and the [`DashboardApi`] trait it implements
//! - Display formatters for dates, addresses and record types
//! - The fetch/render state machine with a request-sequence guard
//! - A deadline-based debouncer for search input

pub mod api;
pub mod client;
pub mod debounce;
pub mod fetch;
pub mod formatters;
pub mod models;

pub use api::{load_patient_profile, DashboardApi, PATIENT_PAGE_SIZE, TRANSACTION_LIMIT};
pub use client::{ApiClient, ClientError};
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use fetch::{failure_message, FetchState, Phase, RequestSeq};
pub use formatters::{
    format_address, format_address_with, format_amount, format_date, format_date_time,
    format_transaction_type, record_type_class, RecordTypeClass,
};
pub use models::{
    MedicalRecord, PaginationInfo, Patient, PatientPage, PatientProfile, RecordList,
    StatsSummary, Transaction, TransactionList,
};
