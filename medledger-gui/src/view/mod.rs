//! UI view modules: pure rendering functions.
//!
//! Each submodule renders one screen. Views read from and mutate [`AppState`]
//! only; fetches are issued by the app from [`AppState::poll`]. No async, no
//! network.
//!
//! [`AppState`]: crate::state::AppState
//! [`AppState::poll`]: crate::state::AppState::poll

pub mod patient_detail;
pub mod patients;
pub mod stats;
pub mod transactions;
