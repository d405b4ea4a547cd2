//! Fetch/render state shared by every data-backed screen.
//!
//! A screen is always in exactly one of three states: waiting for its fetch
//! cycle to settle, showing the failure message, or showing the fetched data.
//! Successful data that turns out to be an empty collection is a rendering
//! sub-state of `Loaded`, never an error.

/// State of one screen's most recent fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Failed(String),
    Loaded(T),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Loading
    }
}

/// What a screen should render for its current [`FetchState`].
#[derive(Debug, PartialEq)]
pub enum Phase<'a, T> {
    Loading,
    Failed(&'a str),
    Empty,
    Ready(&'a T),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Settle a fetch cycle, replacing whatever was held before.
    ///
    /// An empty error message is replaced by `fallback`.
    pub fn settle(&mut self, result: Result<T, String>, fallback: &str) {
        *self = match result {
            Ok(data) => FetchState::Loaded(data),
            Err(message) => FetchState::Failed(failure_message(message, fallback)),
        };
    }

    /// Classify the state for rendering, using `is_empty` to detect the
    /// empty-collection sub-state of a successful fetch.
    pub fn phase(&self, is_empty: impl FnOnce(&T) -> bool) -> Phase<'_, T> {
        match self {
            FetchState::Loading => Phase::Loading,
            FetchState::Failed(message) => Phase::Failed(message),
            FetchState::Loaded(data) if is_empty(data) => Phase::Empty,
            FetchState::Loaded(data) => Phase::Ready(data),
        }
    }
}

/// The message shown for a failed fetch: the error text, or `fallback` when
/// the error carried no text.
pub fn failure_message(message: impl Into<String>, fallback: &str) -> String {
    let message = message.into();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Monotonic per-screen request counter.
///
/// Each fetch cycle takes a fresh number from [`RequestSeq::begin`]; a result
/// is only applied if it carries the latest number, so a slow response to a
/// superseded request can never overwrite fresher state.
#[derive(Debug, Default, Clone)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    /// Start a new fetch cycle and return its sequence number.
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}
