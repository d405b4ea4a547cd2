//! Background service task: single `select!` loop owning all async I/O.
//!
//! The service receives [`UiEvent`] fetch requests from the UI thread, runs
//! each one as its own task so a slow request never delays another screen,
//! and sends the settled result back as a [`ServiceEvent`]. In-flight fetches
//! are aborted when the loop exits.

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use medledger::{load_patient_profile, ClientError, DashboardApi};

use crate::events::{ServiceEvent, UiEvent};

/// Run the service loop until the cancellation token fires or the UI hangs up.
pub async fn run<A>(
    token: CancellationToken,
    mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
    svc_tx: mpsc::UnboundedSender<ServiceEvent>,
    api: A,
) where
    A: DashboardApi + Clone + Send + Sync + 'static,
{
    let mut fetches: JoinSet<()> = JoinSet::new();

    log::info!("🚀 Service loop started");

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                log::info!("🛑 Service loop shutting down");
                break;
            }

            Some(joined) = fetches.join_next(), if !fetches.is_empty() => {
                if let Err(e) = joined {
                    if e.is_panic() {
                        log::error!("Fetch task panicked: {}", e);
                    }
                }
            }

            event = ui_rx.recv() => {
                match event {
                    None | Some(UiEvent::Shutdown) => {
                        log::info!("🛑 UI closed, stopping service loop");
                        break;
                    }
                    Some(event) => dispatch(&mut fetches, &api, &svc_tx, event),
                }
            }
        }
    }

    if !fetches.is_empty() {
        log::debug!("Aborting {} in-flight fetches", fetches.len());
    }
    fetches.abort_all();
}

/// Spawn the fetch task for one UI request.
fn dispatch<A>(
    fetches: &mut JoinSet<()>,
    api: &A,
    svc_tx: &mpsc::UnboundedSender<ServiceEvent>,
    event: UiEvent,
) where
    A: DashboardApi + Clone + Send + Sync + 'static,
{
    let api = api.clone();
    let svc_tx = svc_tx.clone();

    match event {
        UiEvent::LoadPatients(query) => {
            fetches.spawn(async move {
                let result = api
                    .get_patients(query.page, query.limit, &query.search)
                    .await
                    .map_err(|e| report("patients", e));
                let _ = svc_tx.send(ServiceEvent::PatientsLoaded {
                    seq: query.seq,
                    result,
                });
            });
        }

        UiEvent::LoadPatientDetail { seq, patient_id } => {
            fetches.spawn(async move {
                let result = load_patient_profile(&api, &patient_id)
                    .await
                    .map_err(|e| report("patient detail", e));
                let _ = svc_tx.send(ServiceEvent::PatientDetailLoaded { seq, result });
            });
        }

        UiEvent::LoadTransactions {
            seq,
            account,
            limit,
        } => {
            fetches.spawn(async move {
                let result = api
                    .get_transactions(account.as_deref(), limit)
                    .await
                    .map(|list| list.transactions)
                    .map_err(|e| report("transactions", e));
                let _ = svc_tx.send(ServiceEvent::TransactionsLoaded { seq, result });
            });
        }

        UiEvent::LoadStats { seq } => {
            fetches.spawn(async move {
                let result = api.get_stats().await.map_err(|e| report("statistics", e));
                let _ = svc_tx.send(ServiceEvent::StatsLoaded { seq, result });
            });
        }

        UiEvent::Shutdown => {}
    }
}

fn report(what: &str, e: ClientError) -> String {
    log::warn!("Failed to fetch {}: {}", what, e);
    e.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::PatientQuery;
    use medledger::{
        Patient, PatientPage, RecordList, StatsSummary, Transaction, TransactionList,
    };
    use std::sync::{Arc, Mutex};

    /// In-memory API that records the requests it sees.
    #[derive(Clone, Default)]
    struct FakeApi {
        fail_records: bool,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl FakeApi {
        fn log(&self, entry: String) {
            self.seen.lock().unwrap().push(entry);
        }
    }

    fn patient(id: &str) -> Patient {
        Patient {
            id: id.to_string(),
            patient_id: format!("P-{}", id),
            name: format!("Patient {}", id),
            email: String::new(),
            date_of_birth: "1980-05-01".to_string(),
            gender: String::new(),
            phone: String::new(),
            address: String::new(),
            wallet_address: String::new(),
        }
    }

    impl DashboardApi for FakeApi {
        async fn get_patients(
            &self,
            page: u32,
            limit: u32,
            search: &str,
        ) -> Result<PatientPage, ClientError> {
            self.log(format!("patients page={} limit={} search={}", page, limit, search));
            Ok(PatientPage {
                patients: vec![patient("1")],
                pagination: None,
            })
        }

        async fn get_patient(&self, patient_id: &str) -> Result<Option<Patient>, ClientError> {
            self.log(format!("patient {}", patient_id));
            Ok(Some(patient(patient_id)))
        }

        async fn get_patient_records(&self, patient_id: &str) -> Result<RecordList, ClientError> {
            self.log(format!("records {}", patient_id));
            if self.fail_records {
                Err(ClientError::http(503))
            } else {
                Ok(RecordList::default())
            }
        }

        async fn get_transactions(
            &self,
            wallet_address: Option<&str>,
            limit: u32,
        ) -> Result<TransactionList, ClientError> {
            self.log(format!("transactions {:?} {}", wallet_address, limit));
            Ok(TransactionList {
                transactions: Vec::<Transaction>::new(),
            })
        }

        async fn get_stats(&self) -> Result<StatsSummary, ClientError> {
            self.log("stats".to_string());
            Ok(StatsSummary {
                total_patients: 4,
                ..Default::default()
            })
        }
    }

    fn start(
        api: FakeApi,
    ) -> (
        mpsc::UnboundedSender<UiEvent>,
        mpsc::UnboundedReceiver<ServiceEvent>,
        CancellationToken,
        tokio::task::JoinHandle<()>,
    ) {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (svc_tx, svc_rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let handle = tokio::spawn(run(token.clone(), ui_rx, svc_tx, api));
        (ui_tx, svc_rx, token, handle)
    }

    #[tokio::test]
    async fn test_patients_request_forwarded() {
        let api = FakeApi::default();
        let (ui_tx, mut svc_rx, token, handle) = start(api.clone());

        ui_tx
            .send(UiEvent::LoadPatients(PatientQuery {
                seq: 3,
                page: 2,
                limit: 10,
                search: "ada".to_string(),
            }))
            .unwrap();

        match svc_rx.recv().await.unwrap() {
            ServiceEvent::PatientsLoaded { seq, result } => {
                assert_eq!(seq, 3);
                assert_eq!(result.unwrap().patients.len(), 1);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(
            api.seen.lock().unwrap().as_slice(),
            ["patients page=2 limit=10 search=ada"]
        );

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_detail_failure_reports_message() {
        let api = FakeApi {
            fail_records: true,
            ..Default::default()
        };
        let (ui_tx, mut svc_rx, token, handle) = start(api);

        ui_tx
            .send(UiEvent::LoadPatientDetail {
                seq: 1,
                patient_id: "9".to_string(),
            })
            .unwrap();

        match svc_rx.recv().await.unwrap() {
            ServiceEvent::PatientDetailLoaded { seq, result } => {
                assert_eq!(seq, 1);
                assert_eq!(result.unwrap_err(), "HTTP error 503: Service Unavailable");
            }
            other => panic!("unexpected event: {:?}", other),
        }

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_transactions_and_stats() {
        let api = FakeApi::default();
        let (ui_tx, mut svc_rx, token, handle) = start(api.clone());

        ui_tx
            .send(UiEvent::LoadTransactions {
                seq: 1,
                account: Some("0xabc".to_string()),
                limit: 20,
            })
            .unwrap();
        ui_tx.send(UiEvent::LoadStats { seq: 1 }).unwrap();

        let mut got_transactions = false;
        let mut got_stats = false;
        for _ in 0..2 {
            match svc_rx.recv().await.unwrap() {
                ServiceEvent::TransactionsLoaded { result, .. } => {
                    assert!(result.unwrap().is_empty());
                    got_transactions = true;
                }
                ServiceEvent::StatsLoaded { result, .. } => {
                    assert_eq!(result.unwrap().total_patients, 4);
                    got_stats = true;
                }
                other => panic!("unexpected event: {:?}", other),
            }
        }
        assert!(got_transactions && got_stats);
        assert!(api
            .seen
            .lock()
            .unwrap()
            .contains(&"transactions Some(\"0xabc\") 20".to_string()));

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_event_stops_loop() {
        let (ui_tx, _svc_rx, _token, handle) = start(FakeApi::default());
        ui_tx.send(UiEvent::Shutdown).unwrap();
        handle.await.unwrap();
    }
}
