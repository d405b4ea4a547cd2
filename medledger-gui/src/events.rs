//! Event types for communication between UI and service task.
//!
//! These two enums are the *only* interface between the synchronous egui render
//! loop and the asynchronous service task. Every fetch request carries the
//! sequence number of the fetch cycle that issued it, and every result echoes
//! it back so the UI can drop superseded responses.

use medledger::{PatientPage, PatientProfile, StatsSummary, Transaction};

// ============================================================================
// UI → Service
// ============================================================================

/// One patient list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientQuery {
    pub seq: u64,
    pub page: u32,
    pub limit: u32,
    pub search: String,
}

/// Commands sent from the UI thread to the background service task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Fetch one page of the patient list.
    LoadPatients(PatientQuery),

    /// Fetch a patient's profile and records together.
    LoadPatientDetail { seq: u64, patient_id: String },

    /// Fetch recent transactions, optionally for one wallet address.
    LoadTransactions {
        seq: u64,
        account: Option<String>,
        limit: u32,
    },

    /// Fetch platform statistics.
    LoadStats { seq: u64 },

    /// Clean shutdown.
    Shutdown,
}

/// Screens the dashboard can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Patients,
    PatientDetail,
    Transactions,
    Statistics,
}

// ============================================================================
// Service → UI
// ============================================================================

/// Fetch results sent from the service task back to the UI thread.
///
/// Errors travel as display text; each screen substitutes its own fallback
/// when the text is empty.
#[derive(Debug, Clone)]
pub enum ServiceEvent {
    PatientsLoaded {
        seq: u64,
        result: Result<PatientPage, String>,
    },

    PatientDetailLoaded {
        seq: u64,
        result: Result<PatientProfile, String>,
    },

    TransactionsLoaded {
        seq: u64,
        result: Result<Vec<Transaction>, String>,
    },

    StatsLoaded {
        seq: u64,
        result: Result<StatsSummary, String>,
    },
}
