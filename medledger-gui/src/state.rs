//! Application state: plain data, no async, no Arc.
//!
//! `AppState` holds everything the UI needs to render, split per screen. Each
//! screen owns a [`FetchState`] and a [`RequestSeq`]; user actions only mark a
//! screen as needing a fetch, and [`AppState::poll`] turns those marks into
//! [`UiEvent`] requests once per frame. The service task answers with
//! [`ServiceEvent`]s, applied via [`AppState::apply`]; answers to superseded
//! requests are dropped.

use std::time::{Duration, Instant};

use medledger::{
    format_address, Debouncer, FetchState, PaginationInfo, Patient, PatientPage, PatientProfile,
    RequestSeq, StatsSummary, Transaction, PATIENT_PAGE_SIZE, TRANSACTION_LIMIT,
};

use crate::events::{PatientQuery, Screen, ServiceEvent, UiEvent};

pub const PATIENTS_FALLBACK: &str = "Failed to fetch patients";
pub const PATIENT_DETAIL_FALLBACK: &str = "Failed to load patient data";
pub const TRANSACTIONS_FALLBACK: &str = "Failed to fetch transactions";
pub const STATS_FALLBACK: &str = "Failed to fetch statistics";

// ============================================================================
// Patient list
// ============================================================================

/// Search, paging and fetch state of the patient list.
#[derive(Debug)]
pub struct PatientListState {
    /// Raw text bound to the search box.
    pub search_input: String,
    search: Debouncer<String>,
    search_term: String,
    page: u32,
    pagination: Option<PaginationInfo>,
    pub fetch: FetchState<Vec<Patient>>,
    seq: RequestSeq,
    needs_fetch: bool,
}

impl Default for PatientListState {
    fn default() -> Self {
        Self {
            search_input: String::new(),
            search: Debouncer::default(),
            search_term: String::new(),
            page: 1,
            pagination: None,
            fetch: FetchState::Loading,
            seq: RequestSeq::default(),
            needs_fetch: false,
        }
    }
}

impl PatientListState {
    /// Screen became visible: fetch the current page again and resume any
    /// search text that was still waiting when the screen was left.
    pub fn mount(&mut self, now: Instant) {
        self.needs_fetch = true;
        if self.search_input != self.search_term {
            self.search.input(self.search_input.clone(), now);
        }
    }

    /// Screen is going away: a pending search never fires.
    pub fn unmount(&mut self) {
        self.search.cancel();
    }

    /// The search box text changed.
    pub fn search_changed(&mut self, now: Instant) {
        self.search.input(self.search_input.clone(), now);
    }

    /// The effective (debounced) search term.
    #[cfg(test)]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Pagination of the page on screen; `None` while loading or failed.
    pub fn pagination(&self) -> Option<&PaginationInfo> {
        match self.fetch {
            FetchState::Loaded(_) => self.pagination.as_ref(),
            FetchState::Loading | FetchState::Failed(_) => None,
        }
    }

    pub fn can_go_previous(&self) -> bool {
        self.pagination()
            .map(|p| p.has_previous(self.page))
            .unwrap_or(false)
    }

    pub fn can_go_next(&self) -> bool {
        self.pagination()
            .map(|p| p.has_next(self.page))
            .unwrap_or(false)
    }

    pub fn previous_page(&mut self) {
        if self.can_go_previous() {
            self.page -= 1;
            self.needs_fetch = true;
        }
    }

    pub fn next_page(&mut self) {
        if self.can_go_next() {
            self.page += 1;
            self.needs_fetch = true;
        }
    }

    pub fn retry(&mut self) {
        self.needs_fetch = true;
    }

    /// Time until the pending search fires, for scheduling a repaint.
    pub fn debounce_remaining(&self, now: Instant) -> Option<Duration> {
        self.search.remaining(now)
    }

    /// Fire the debounced search if due, then start a fetch cycle if one is
    /// needed.
    pub fn poll(&mut self, now: Instant) -> Option<PatientQuery> {
        if let Some(term) = self.search.poll(now) {
            if term != self.search_term || self.page != 1 {
                self.search_term = term;
                self.page = 1;
                self.needs_fetch = true;
            }
        }

        if !self.needs_fetch {
            return None;
        }
        self.needs_fetch = false;
        self.fetch = FetchState::Loading;

        Some(PatientQuery {
            seq: self.seq.begin(),
            page: self.page,
            limit: PATIENT_PAGE_SIZE,
            search: self.search_term.clone(),
        })
    }

    /// Apply a settled fetch. Returns `false` if the result was superseded.
    pub fn apply(&mut self, seq: u64, result: Result<PatientPage, String>) -> bool {
        if !self.seq.is_current(seq) {
            log::debug!("Dropping stale patient list response #{}", seq);
            return false;
        }
        match result {
            Ok(page) => {
                self.pagination = page.pagination;
                self.fetch = FetchState::Loaded(page.patients);
            }
            Err(message) => self.fetch.settle(Err(message), PATIENTS_FALLBACK),
        }
        true
    }
}

// ============================================================================
// Patient detail
// ============================================================================

#[derive(Debug, Default)]
pub struct PatientDetailState {
    patient_id: Option<String>,
    pub fetch: FetchState<PatientProfile>,
    seq: RequestSeq,
    needs_fetch: bool,
}

impl PatientDetailState {
    /// Show a patient, starting a fresh fetch cycle.
    pub fn open(&mut self, patient_id: String) {
        self.patient_id = Some(patient_id);
        self.fetch = FetchState::Loading;
        self.needs_fetch = true;
    }

    pub fn close(&mut self) {
        self.patient_id = None;
        self.needs_fetch = false;
    }

    #[cfg(test)]
    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }

    pub fn retry(&mut self) {
        if self.patient_id.is_some() {
            self.needs_fetch = true;
        }
    }

    pub fn poll(&mut self) -> Option<UiEvent> {
        if !self.needs_fetch {
            return None;
        }
        self.needs_fetch = false;
        let patient_id = self.patient_id.clone()?;
        self.fetch = FetchState::Loading;

        Some(UiEvent::LoadPatientDetail {
            seq: self.seq.begin(),
            patient_id,
        })
    }

    pub fn apply(&mut self, seq: u64, result: Result<PatientProfile, String>) -> bool {
        if !self.seq.is_current(seq) {
            log::debug!("Dropping stale patient detail response #{}", seq);
            return false;
        }
        self.fetch.settle(result, PATIENT_DETAIL_FALLBACK);
        true
    }
}

// ============================================================================
// Transaction history
// ============================================================================

#[derive(Debug, Default)]
pub struct TransactionHistoryState {
    account: Option<String>,
    /// Text bound to the wallet filter box.
    pub filter_input: String,
    pub fetch: FetchState<Vec<Transaction>>,
    seq: RequestSeq,
    needs_fetch: bool,
}

fn normalize_account(account: Option<String>) -> Option<String> {
    account
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}

impl TransactionHistoryState {
    pub fn new(account: Option<String>) -> Self {
        let account = normalize_account(account);
        Self {
            filter_input: account.clone().unwrap_or_default(),
            account,
            ..Default::default()
        }
    }

    pub fn mount(&mut self) {
        self.needs_fetch = true;
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Truncated account shown in the "Filtering for" header.
    pub fn filter_label(&self) -> Option<String> {
        self.account.as_deref().map(format_address)
    }

    /// Change the wallet filter; refetches only if it actually changed.
    pub fn set_account(&mut self, account: Option<String>) {
        let account = normalize_account(account);
        self.filter_input = account.clone().unwrap_or_default();
        if account != self.account {
            self.account = account;
            self.needs_fetch = true;
        }
    }

    /// Commit the filter box text as the new account.
    pub fn apply_filter(&mut self) {
        self.set_account(Some(self.filter_input.clone()));
    }

    pub fn clear_filter(&mut self) {
        self.set_account(None);
    }

    pub fn retry(&mut self) {
        self.needs_fetch = true;
    }

    pub fn poll(&mut self) -> Option<UiEvent> {
        if !self.needs_fetch {
            return None;
        }
        self.needs_fetch = false;
        self.fetch = FetchState::Loading;

        Some(UiEvent::LoadTransactions {
            seq: self.seq.begin(),
            account: self.account.clone(),
            limit: TRANSACTION_LIMIT,
        })
    }

    pub fn apply(&mut self, seq: u64, result: Result<Vec<Transaction>, String>) -> bool {
        if !self.seq.is_current(seq) {
            log::debug!("Dropping stale transaction response #{}", seq);
            return false;
        }
        self.fetch.settle(result, TRANSACTIONS_FALLBACK);
        true
    }
}

// ============================================================================
// Statistics
// ============================================================================

#[derive(Debug, Default)]
pub struct StatsState {
    pub fetch: FetchState<StatsSummary>,
    seq: RequestSeq,
    needs_fetch: bool,
}

impl StatsState {
    pub fn mount(&mut self) {
        self.needs_fetch = true;
    }

    pub fn retry(&mut self) {
        self.needs_fetch = true;
    }

    pub fn poll(&mut self) -> Option<UiEvent> {
        if !self.needs_fetch {
            return None;
        }
        self.needs_fetch = false;
        self.fetch = FetchState::Loading;
        Some(UiEvent::LoadStats {
            seq: self.seq.begin(),
        })
    }

    pub fn apply(&mut self, seq: u64, result: Result<StatsSummary, String>) -> bool {
        if !self.seq.is_current(seq) {
            log::debug!("Dropping stale statistics response #{}", seq);
            return false;
        }
        self.fetch.settle(result, STATS_FALLBACK);
        true
    }
}

// ============================================================================
// Application
// ============================================================================

/// All application state needed for rendering.
#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub patient_list: PatientListState,
    pub patient_detail: PatientDetailState,
    pub transactions: TransactionHistoryState,
    pub stats: StatsState,
}

impl AppState {
    /// Fresh state showing the patient list, with an optional wallet address
    /// pre-selected as the transaction filter.
    pub fn new(account: Option<String>, now: Instant) -> Self {
        let mut state = Self {
            screen: Screen::Patients,
            patient_list: PatientListState::default(),
            patient_detail: PatientDetailState::default(),
            transactions: TransactionHistoryState::new(account),
            stats: StatsState::default(),
        };
        state.patient_list.mount(now);
        state
    }

    /// Switch screens, tearing down the old one and mounting the new one.
    pub fn navigate(&mut self, screen: Screen, now: Instant) {
        if screen == self.screen {
            return;
        }
        match self.screen {
            Screen::Patients => self.patient_list.unmount(),
            Screen::PatientDetail => self.patient_detail.close(),
            Screen::Transactions | Screen::Statistics => {}
        }
        self.screen = screen;
        match screen {
            Screen::Patients => self.patient_list.mount(now),
            Screen::Transactions => self.transactions.mount(),
            Screen::Statistics => self.stats.mount(),
            // Only reachable through `select_patient`
            Screen::PatientDetail => {}
        }
    }

    /// A patient card was activated.
    pub fn select_patient(&mut self, patient_id: String, now: Instant) {
        self.navigate(Screen::PatientDetail, now);
        self.patient_detail.open(patient_id);
    }

    pub fn back_to_list(&mut self, now: Instant) {
        self.navigate(Screen::Patients, now);
    }

    /// Collect every fetch request that is due this frame.
    pub fn poll(&mut self, now: Instant) -> Vec<UiEvent> {
        let mut requests = Vec::new();
        if let Some(query) = self.patient_list.poll(now) {
            requests.push(UiEvent::LoadPatients(query));
        }
        requests.extend(self.patient_detail.poll());
        requests.extend(self.transactions.poll());
        requests.extend(self.stats.poll());
        requests
    }

    /// Apply a service event to update state. Pure state-machine transition.
    pub fn apply(&mut self, event: ServiceEvent) {
        match event {
            ServiceEvent::PatientsLoaded { seq, result } => {
                self.patient_list.apply(seq, result);
            }
            ServiceEvent::PatientDetailLoaded { seq, result } => {
                self.patient_detail.apply(seq, result);
            }
            ServiceEvent::TransactionsLoaded { seq, result } => {
                self.transactions.apply(seq, result);
            }
            ServiceEvent::StatsLoaded { seq, result } => {
                self.stats.apply(seq, result);
            }
        }
    }
}
