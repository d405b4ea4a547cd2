//! Integration tests for the dashboard data flow
//! Drives the medledger library end to end against an in-memory API:
//! JSON payloads → fetch cycles → render phases → display formatting.
//!
//! The GUI itself is hard to test without a display, so these tests exercise
//! the pieces every screen is built from.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use medledger::{
    format_address, format_amount, format_date, format_transaction_type, load_patient_profile,
    record_type_class, ClientError, DashboardApi, Debouncer, FetchState, Patient, PatientPage,
    Phase, RecordList, RecordTypeClass, RequestSeq, StatsSummary, TransactionList,
    PATIENT_PAGE_SIZE,
};

const PATIENTS_JSON: &str = r#"{
    "patients": [
        {
            "id": 1,
            "patientId": "PAT-0001",
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "dateOfBirth": "1985-12-10",
            "gender": "female",
            "phone": "555-0100",
            "address": "12 Analytical Way",
            "walletAddress": "0x1234567890abcdef1234567890abcdef12345678"
        }
    ],
    "pagination": { "page": 1, "limit": 10, "total": 23, "totalPages": 3 }
}"#;

const RECORDS_JSON: &str = r#"{
    "records": [
        {
            "id": "r1",
            "title": "Complete Blood Count",
            "type": "Lab Result",
            "description": "Routine panel",
            "date": "2024-03-15",
            "doctor": "Dr. Smith",
            "hospital": "General Hospital",
            "status": "verified",
            "blockchainHash": "0xfeedbeef"
        },
        {
            "id": "r2",
            "title": "Physiotherapy",
            "type": "Treatment Plan",
            "description": "",
            "date": "2024-04-01",
            "doctor": "Dr. Jones",
            "hospital": "City Clinic",
            "status": "active"
        },
        {
            "id": "r3",
            "title": "Chest",
            "type": "X-Ray",
            "description": "Clear",
            "date": "2024-04-20",
            "doctor": "Dr. Lee",
            "hospital": "General Hospital",
            "status": "pending"
        }
    ]
}"#;

const TRANSACTIONS_JSON: &str = r#"{
    "transactions": [
        {
            "id": "t1",
            "type": "consent_approval",
            "status": "confirmed",
            "from": "0x1234567890abcdef1234",
            "to": "0xabcdef1234567890abcd",
            "amount": 0.001,
            "currency": "ETH",
            "timestamp": "2024-01-15T10:30:00Z",
            "blockchainTxHash": "0xdeadbeef"
        },
        {
            "id": "t2",
            "type": "data_access_request",
            "status": "pending",
            "from": "short",
            "to": "0xabcdef1234567890abcd",
            "amount": "5",
            "currency": "ETH",
            "timestamp": 1705314600000
        }
    ]
}"#;

/// Canned API with optional latency and failure switches.
#[derive(Clone, Default)]
struct MemoryApi {
    latency: Duration,
    fail_patient: bool,
    fail_records: bool,
    missing_patient: bool,
    calls: Arc<AtomicUsize>,
}

impl MemoryApi {
    async fn delay(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl DashboardApi for MemoryApi {
    async fn get_patients(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<PatientPage, ClientError> {
        self.delay().await;
        let mut body: PatientPage = serde_json::from_str(PATIENTS_JSON)?;
        if !search.is_empty() {
            body.patients
                .retain(|p| p.name.to_lowercase().contains(&search.to_lowercase()));
        }
        if let Some(pagination) = body.pagination.as_mut() {
            pagination.page = page;
            pagination.limit = Some(limit);
        }
        Ok(body)
    }

    async fn get_patient(&self, patient_id: &str) -> Result<Option<Patient>, ClientError> {
        self.delay().await;
        if self.fail_patient {
            return Err(ClientError::http(500));
        }
        if self.missing_patient {
            return Ok(None);
        }
        let body: PatientPage = serde_json::from_str(PATIENTS_JSON)?;
        Ok(body.patients.into_iter().find(|p| p.id == patient_id))
    }

    async fn get_patient_records(&self, _patient_id: &str) -> Result<RecordList, ClientError> {
        self.delay().await;
        if self.fail_records {
            return Err(ClientError::http(503));
        }
        Ok(serde_json::from_str(RECORDS_JSON)?)
    }

    async fn get_transactions(
        &self,
        _wallet_address: Option<&str>,
        _limit: u32,
    ) -> Result<TransactionList, ClientError> {
        self.delay().await;
        Ok(serde_json::from_str(TRANSACTIONS_JSON)?)
    }

    async fn get_stats(&self) -> Result<StatsSummary, ClientError> {
        self.delay().await;
        Ok(StatsSummary {
            total_patients: 23,
            total_records: 120,
            total_consents: 40,
            active_consents: 31,
            pending_consents: 9,
            total_transactions: 77,
        })
    }
}

#[tokio::test(start_paused = true)]
async fn test_profile_and_records_fetch_concurrently() {
    let api = MemoryApi {
        latency: Duration::from_millis(200),
        ..Default::default()
    };

    let started = tokio::time::Instant::now();
    let profile = load_patient_profile(&api, "1").await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(profile.patient.name, "Ada Lovelace");
    assert_eq!(profile.records.len(), 3);
    assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    // Both requests overlapped instead of running back to back
    assert!(elapsed < Duration::from_millis(400), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_profile_is_all_or_nothing() {
    for api in [
        MemoryApi {
            fail_patient: true,
            ..Default::default()
        },
        MemoryApi {
            fail_records: true,
            ..Default::default()
        },
        MemoryApi {
            missing_patient: true,
            ..Default::default()
        },
    ] {
        let mut state = FetchState::Loading;
        let result = load_patient_profile(&api, "1")
            .await
            .map_err(|e| e.to_string());
        state.settle(result, "Failed to load patient data");

        assert!(state.data().is_none());
        assert!(state.error().is_some());
    }

    let api = MemoryApi {
        missing_patient: true,
        ..Default::default()
    };
    let err = load_patient_profile(&api, "1").await.unwrap_err();
    assert_eq!(err.to_string(), "Patient not found");
}

#[tokio::test]
async fn test_record_cards_classify_types() {
    let api = MemoryApi::default();
    let profile = load_patient_profile(&api, "1").await.unwrap();

    let classes: Vec<RecordTypeClass> = profile
        .records
        .iter()
        .map(|r| record_type_class(&r.record_type))
        .collect();
    assert_eq!(
        classes,
        vec![
            RecordTypeClass::Lab,
            RecordTypeClass::Treatment,
            RecordTypeClass::Diagnostic
        ]
    );
    assert_eq!(
        profile.records[0].blockchain_hash.as_deref(),
        Some("0xfeedbeef")
    );
    assert!(profile.records[1].blockchain_hash.is_none());
    assert_eq!(format_date(&profile.records[0].date), "2024-03-15");
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_cannot_overwrite_latest() {
    let slow = MemoryApi {
        latency: Duration::from_millis(800),
        ..Default::default()
    };
    let fast = MemoryApi::default();

    let mut seq = RequestSeq::default();
    let mut state: FetchState<Vec<Patient>> = FetchState::Loading;

    // First cycle: unfiltered, slow. Second cycle: filtered, fast.
    let first = seq.begin();
    let slow_fetch = tokio::spawn(async move { slow.get_patients(1, PATIENT_PAGE_SIZE, "").await });
    let second = seq.begin();
    let fast_result = fast.get_patients(1, PATIENT_PAGE_SIZE, "nobody").await;

    for (cycle, result) in [(second, fast_result), (first, slow_fetch.await.unwrap())] {
        if seq.is_current(cycle) {
            state.settle(
                result.map(|page| page.patients).map_err(|e| e.to_string()),
                "Failed to fetch patients",
            );
        }
    }

    // The later, superseded response was ignored
    assert_eq!(state.phase(|p| p.is_empty()), Phase::Empty);
}

#[tokio::test]
async fn test_search_burst_issues_one_request() {
    let api = MemoryApi::default();
    let mut debouncer = Debouncer::default();
    let t0 = Instant::now();

    let mut requests = 0;
    for (i, text) in ["a", "ad", "ada"].iter().enumerate() {
        let now = t0 + Duration::from_millis(150 * i as u64);
        debouncer.input(text.to_string(), now);
        if debouncer.poll(now).is_some() {
            requests += 1;
        }
    }

    let fire_at = t0 + Duration::from_millis(300 + 500);
    let term = debouncer.poll(fire_at).expect("search should fire");
    requests += 1;

    let page = api.get_patients(1, PATIENT_PAGE_SIZE, &term).await.unwrap();
    assert_eq!(requests, 1);
    assert_eq!(term, "ada");
    assert_eq!(page.patients.len(), 1);

    let pagination = page.pagination.unwrap();
    assert!(!pagination.has_previous(1));
    assert!(pagination.has_next(1));
    assert!(!pagination.has_next(pagination.total_pages));
}

#[tokio::test]
async fn test_transactions_render_formatted() {
    let api = MemoryApi::default();
    let list = api.get_transactions(None, 20).await.unwrap();
    let txs = list.transactions;

    assert_eq!(format_transaction_type(&txs[0].tx_type), "consent approval");
    assert_eq!(format_transaction_type(&txs[1].tx_type), "data access request");
    assert_eq!(format_address(&txs[0].from), "0x123456...ef1234");
    assert_eq!(format_address(&txs[1].from), "short");
    assert_eq!(format_amount(&txs[0].amount, &txs[0].currency), "0.001 ETH");
    assert_eq!(format_amount(&txs[1].amount, &txs[1].currency), "5 ETH");
    assert_eq!(txs[1].timestamp, "1705314600000");
    assert!(txs[1].blockchain_tx_hash.is_none());
}

#[tokio::test]
async fn test_stats_retry_recovers() {
    let mut state: FetchState<StatsSummary> = FetchState::Loading;
    state.settle(Err(String::new()), "Failed to fetch statistics");
    assert_eq!(state.error(), Some("Failed to fetch statistics"));

    // Retry re-enters Loading and repeats the same fetch
    state = FetchState::Loading;
    assert!(state.is_loading());
    let api = MemoryApi::default();
    state.settle(
        api.get_stats().await.map_err(|e| e.to_string()),
        "Failed to fetch statistics",
    );
    assert!(state.error().is_none());
    assert_eq!(state.data().unwrap().total_transactions, 77);
}
