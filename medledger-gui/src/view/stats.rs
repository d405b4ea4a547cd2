//! Statistics screen: six platform summary cards.

use egui::Ui;
use medledger::{FetchState, StatsSummary};

use crate::state::AppState;
use crate::widgets;

/// Label, value and description for each card, in display order.
fn cards(stats: &StatsSummary) -> [(&'static str, u64, &'static str); 6] {
    [
        ("Total Patients", stats.total_patients, "Registered patients in the system"),
        ("Total Records", stats.total_records, "Medical records stored"),
        ("Total Consents", stats.total_consents, "All consent records"),
        ("Active Consents", stats.active_consents, "Currently active consents"),
        ("Pending Consents", stats.pending_consents, "Awaiting activation"),
        ("Total Transactions", stats.total_transactions, "Blockchain transactions"),
    ]
}

/// Render the statistics dashboard.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    let mut retry = false;

    match &state.stats.fetch {
        FetchState::Loading => widgets::loading(ui, "Loading statistics..."),
        FetchState::Failed(message) => retry = widgets::error(ui, message, true),
        FetchState::Loaded(stats) => {
            ui.heading("Platform Statistics");
            ui.separator();
            ui.add_space(10.0);

            egui::Grid::new("stats_grid")
                .num_columns(3)
                .spacing([12.0, 12.0])
                .show(ui, |ui| {
                    for (i, (label, value, description)) in cards(stats).into_iter().enumerate() {
                        stat_card(ui, label, value, description, i == 0);
                        if i % 3 == 2 {
                            ui.end_row();
                        }
                    }
                });
        }
    }

    if retry {
        state.stats.retry();
    }
}

fn stat_card(ui: &mut Ui, label: &str, value: u64, description: &str, primary: bool) {
    ui.group(|ui| {
        ui.set_min_width(200.0);
        ui.vertical(|ui| {
            ui.label(
                egui::RichText::new(label)
                    .size(14.0)
                    .color(egui::Color32::GRAY),
            );
            ui.add_space(4.0);
            let value = egui::RichText::new(value.to_string()).size(32.0).strong();
            ui.label(if primary {
                value.color(egui::Color32::from_rgb(70, 130, 220))
            } else {
                value
            });
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(description)
                    .small()
                    .color(egui::Color32::DARK_GRAY),
            );
        });
    });
}
