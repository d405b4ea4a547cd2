//! Patient detail screen: profile grid and medical record cards.

use std::time::Instant;

use egui::Ui;
use medledger::{
    format_date, record_type_class, FetchState, MedicalRecord, PatientProfile, RecordTypeClass,
};

use crate::state::AppState;
use crate::widgets;

/// Render the detail screen for the selected patient.
pub fn show(ui: &mut Ui, state: &mut AppState, now: Instant) {
    let mut back = false;
    let mut retry = false;

    match &state.patient_detail.fetch {
        FetchState::Loading => {
            widgets::loading(ui, "Loading patient details...");
        }
        FetchState::Failed(message) => {
            retry = widgets::error(ui, &format!("Error loading patient: {}", message), true);
            ui.vertical_centered(|ui| {
                back = ui.button("Back to List").clicked();
            });
        }
        FetchState::Loaded(profile) => {
            back = ui.button("← Back to List").clicked();
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                profile_section(ui, profile);
                ui.add_space(15.0);
                records_section(ui, &profile.records);
            });
        }
    }

    if retry {
        state.patient_detail.retry();
    }
    if back {
        state.back_to_list(now);
    }
}

fn profile_section(ui: &mut Ui, profile: &PatientProfile) {
    let patient = &profile.patient;
    ui.heading("Patient Information");
    ui.add_space(5.0);

    let dob = format_date(&patient.date_of_birth);
    let fields: [(&str, &str); 8] = [
        ("Name", &patient.name),
        ("Patient ID", &patient.patient_id),
        ("Email", &patient.email),
        ("Date of Birth", &dob),
        ("Gender", &patient.gender),
        ("Phone", &patient.phone),
        ("Address", &patient.address),
        ("Wallet Address", &patient.wallet_address),
    ];

    ui.group(|ui| {
        ui.set_min_width(ui.available_width());
        egui::Grid::new("patient_info_grid")
            .num_columns(2)
            .spacing([40.0, 10.0])
            .show(ui, |ui| {
                for (i, (label, value)) in fields.iter().enumerate() {
                    ui.vertical(|ui| widgets::field(ui, label, value));
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
    });
}

fn records_section(ui: &mut Ui, records: &[MedicalRecord]) {
    ui.heading(format!("Medical Records ({})", records.len()));
    ui.add_space(5.0);

    if records.is_empty() {
        widgets::empty_state(ui, Some("No medical records found for this patient"));
        return;
    }

    for record in records {
        record_card(ui, record);
        ui.add_space(4.0);
    }
}

fn record_card(ui: &mut Ui, record: &MedicalRecord) {
    ui.group(|ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(&record.title).size(15.0).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(&record.record_type)
                        .small()
                        .color(type_color(record_type_class(&record.record_type))),
                );
            });
        });

        if !record.description.is_empty() {
            ui.label(&record.description);
        }

        ui.horizontal_wrapped(|ui| {
            ui.label(format!("📅 {}", format_date(&record.date)));
            ui.add_space(10.0);
            ui.label(format!("👨‍⚕️ {}", record.doctor));
            ui.add_space(10.0);
            ui.label(format!("🏥 {}", record.hospital));
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new(&record.status).color(widgets::status_color(&record.status)),
            );
        });

        if let Some(hash) = &record.blockchain_hash {
            ui.label(
                egui::RichText::new(format!("🔗 {}", hash))
                    .monospace()
                    .small()
                    .color(egui::Color32::GRAY),
            );
        }
    });
}

fn type_color(class: RecordTypeClass) -> egui::Color32 {
    match class {
        RecordTypeClass::Lab => egui::Color32::from_rgb(70, 130, 220),
        RecordTypeClass::Treatment => egui::Color32::from_rgb(50, 170, 90),
        RecordTypeClass::Diagnostic => egui::Color32::from_rgb(200, 120, 40),
    }
}
