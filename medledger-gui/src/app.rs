//! Application struct: the eframe::App implementation.
//!
//! Thin wrapper: drains service events, sends due fetch requests, dispatches
//! to view modules. No async, no network.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use medledger::ApiClient;

use crate::config::Config;
use crate::events::{Screen, ServiceEvent, UiEvent};
use crate::state::AppState;
use crate::view;

/// The dashboard application.
pub struct App {
    pub state: AppState,
    pub ui_tx: mpsc::UnboundedSender<UiEvent>,
    svc_rx: mpsc::UnboundedReceiver<ServiceEvent>,
    shutdown_token: CancellationToken,
}

impl App {
    /// Create a new App, spawning the background service task.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        cc.egui_ctx.set_fonts(egui::FontDefinitions::default());

        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (svc_tx, svc_rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();

        let api = ApiClient::with_timeouts(
            config.api_url.clone(),
            config.request_timeout(),
            config.connect_timeout(),
        );

        // Spawn the single background service task
        let svc_token = token.clone();
        tokio::spawn(crate::service::run(svc_token, ui_rx, svc_tx, api));

        Self {
            state: AppState::new(config.account, Instant::now()),
            ui_tx,
            svc_rx,
            shutdown_token: token,
        }
    }

    /// Send every fetch request that became due this frame.
    fn send_requests(&mut self, now: Instant) {
        for event in self.state.poll(now) {
            if self.ui_tx.send(event).is_err() {
                log::error!("Service task is gone; request dropped");
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.ui_tx.send(UiEvent::Shutdown);
        self.shutdown_token.cancel();
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Ensure we repaint regularly to pick up background service events
        ctx.request_repaint_after(Duration::from_secs(1));

        // 1. Drain all pending service events (non-blocking)
        while let Ok(event) = self.svc_rx.try_recv() {
            self.state.apply(event);
            ctx.request_repaint();
        }

        // 2. Fire the debounced search and any other due fetches
        let now = Instant::now();
        self.send_requests(now);
        if let Some(remaining) = self.state.patient_list.debounce_remaining(now) {
            ctx.request_repaint_after(remaining);
        }

        // 3. Navigation sidebar
        egui::SidePanel::left("nav").show(ctx, |ui| {
            ui.add_space(10.0);
            ui.label(egui::RichText::new("MedLedger").size(18.0).strong());
            ui.separator();
            ui.add_space(5.0);

            nav_button(ui, &mut self.state, "👥 Patients", Screen::Patients, now);
            nav_button(
                ui,
                &mut self.state,
                "📋 Transactions",
                Screen::Transactions,
                now,
            );
            nav_button(
                ui,
                &mut self.state,
                "📊 Statistics",
                Screen::Statistics,
                now,
            );
        });

        // 4. Central panel: route to the active view
        egui::CentralPanel::default().show(ctx, |ui| match self.state.screen {
            Screen::Patients => {
                view::patients::show(ui, &mut self.state, now);
            }
            Screen::PatientDetail => {
                view::patient_detail::show(ui, &mut self.state, now);
            }
            Screen::Transactions => {
                view::transactions::show(ui, &mut self.state);
            }
            Screen::Statistics => {
                view::stats::show(ui, &mut self.state);
            }
        });
    }
}

/// Render a navigation button, highlighting the active screen. The detail
/// screen counts as part of Patients.
fn nav_button(ui: &mut egui::Ui, state: &mut AppState, label: &str, screen: Screen, now: Instant) {
    let is_active = state.screen == screen
        || (screen == Screen::Patients && state.screen == Screen::PatientDetail);
    let button = egui::Button::new(egui::RichText::new(label).size(14.0))
        .selected(is_active)
        .min_size(egui::vec2(140.0, 28.0));

    if ui.add(button).clicked() && state.screen != screen {
        state.navigate(screen, now);
    }
}
