//! Patients screen: debounced search, patient cards, pagination.

use std::time::Instant;

use egui::Ui;
use medledger::{format_date, Patient, Phase};

use crate::state::AppState;
use crate::widgets;

/// Render the patient list.
pub fn show(ui: &mut Ui, state: &mut AppState, now: Instant) {
    ui.horizontal(|ui| {
        ui.heading("Patients");
        ui.add_space(10.0);

        let list = &mut state.patient_list;
        let search = ui.add(
            egui::TextEdit::singleline(&mut list.search_input)
                .hint_text("Search patients...")
                .desired_width(280.0),
        );
        if search.changed() {
            list.search_changed(now);
        }
    });

    ui.separator();
    ui.add_space(5.0);

    let mut selected = None;
    let mut retry = false;
    let mut settled = false;

    match state.patient_list.fetch.phase(|p| p.is_empty()) {
        Phase::Loading => widgets::loading(ui, "Loading patients..."),
        Phase::Failed(message) => retry = widgets::error(ui, message, true),
        Phase::Empty => {
            widgets::empty_state(ui, Some("No patients found"));
            settled = true;
        }
        Phase::Ready(patients) => {
            settled = true;
            egui::ScrollArea::vertical()
                .max_height((ui.available_height() - 40.0).max(120.0))
                .show(ui, |ui| {
                    for patient in patients {
                        if patient_card(ui, patient) {
                            selected = Some(patient.id.clone());
                        }
                        ui.add_space(4.0);
                    }
                });
        }
    }

    if retry {
        state.patient_list.retry();
    }
    if let Some(patient_id) = selected {
        log::debug!("Opening patient {}", patient_id);
        state.select_patient(patient_id, now);
        return;
    }

    if settled {
        pagination_controls(ui, state);
    }
}

/// One clickable patient card. Returns `true` when clicked anywhere.
fn patient_card(ui: &mut Ui, patient: &Patient) -> bool {
    let card = ui.group(|ui| {
        ui.set_min_width(ui.available_width());
        ui.vertical(|ui| {
            ui.label(egui::RichText::new(&patient.name).size(16.0).strong());
            ui.label(
                egui::RichText::new(&patient.patient_id)
                    .color(egui::Color32::GRAY)
                    .small(),
            );
            ui.add_space(4.0);
            ui.horizontal_wrapped(|ui| {
                ui.label(format!("📧 {}", patient.email));
                ui.add_space(10.0);
                ui.label(format!("📞 {}", patient.phone));
                ui.add_space(10.0);
                ui.label(format!("👤 {}", patient.gender));
                ui.add_space(10.0);
                ui.label(format!("🎂 {}", format_date(&patient.date_of_birth)));
            });
            ui.label(
                egui::RichText::new(&patient.wallet_address)
                    .monospace()
                    .color(egui::Color32::GRAY)
                    .small(),
            );
        });
    });

    card.response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
        .clicked()
}

fn pagination_controls(ui: &mut Ui, state: &mut AppState) {
    let list = &mut state.patient_list;
    let Some(pagination) = list.pagination().copied() else {
        return;
    };

    ui.add_space(5.0);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(list.can_go_previous(), egui::Button::new("← Previous"))
            .clicked()
        {
            list.previous_page();
        }

        ui.label(page_label(list.page(), pagination.total_pages));

        if ui
            .add_enabled(list.can_go_next(), egui::Button::new("Next →"))
            .clicked()
        {
            list.next_page();
        }

        ui.add_space(10.0);
        ui.label(
            egui::RichText::new(format!("{} patients", pagination.total))
                .color(egui::Color32::GRAY)
                .small(),
        );
    });
}

/// "Page X of Y", never showing fewer total pages than the current one.
fn page_label(page: u32, total_pages: u32) -> String {
    format!("Page {} of {}", page, total_pages.max(page))
}
