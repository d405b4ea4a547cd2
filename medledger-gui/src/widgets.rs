//! Shared status widgets: loading, error-with-retry, and empty state.

use eframe::egui;

/// Message shown by [`empty_state`] when the caller has nothing specific.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No data found";

/// Centered spinner with a message.
pub fn loading(ui: &mut egui::Ui, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.spinner();
        ui.add_space(8.0);
        ui.label(
            egui::RichText::new(message)
                .size(15.0)
                .color(egui::Color32::GRAY),
        );
    });
}

/// Error panel. Returns `true` when the Retry button was clicked; the button is
/// only drawn if `retry` is set.
pub fn error(ui: &mut egui::Ui, message: &str, retry: bool) -> bool {
    let mut clicked = false;
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(
            egui::RichText::new("⚠ Error")
                .size(18.0)
                .strong()
                .color(egui::Color32::from_rgb(200, 50, 50)),
        );
        ui.add_space(6.0);
        ui.colored_label(egui::Color32::from_rgb(200, 50, 50), message);
        if retry {
            ui.add_space(10.0);
            clicked = ui.button("Retry").clicked();
        }
    });
    clicked
}

/// Neutral placeholder for a successful fetch with nothing to show.
pub fn empty_state(ui: &mut egui::Ui, message: Option<&str>) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(
            egui::RichText::new(message.unwrap_or(DEFAULT_EMPTY_MESSAGE))
                .size(16.0)
                .color(egui::Color32::GRAY)
                .italics(),
        );
    });
}

/// Small grey caption above a value, as used in the detail and stats cards.
pub fn field(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.label(
        egui::RichText::new(label)
            .small()
            .color(egui::Color32::GRAY),
    );
    ui.label(value);
}

/// Colour for a status badge; "active"/"confirmed" read as healthy, "pending"
/// as waiting, anything else neutral.
pub fn status_color(status: &str) -> egui::Color32 {
    match status.to_ascii_lowercase().as_str() {
        "active" | "confirmed" | "completed" | "success" => egui::Color32::from_rgb(50, 200, 50),
        "pending" => egui::Color32::from_rgb(200, 150, 50),
        "failed" | "revoked" | "rejected" => egui::Color32::from_rgb(200, 50, 50),
        _ => egui::Color32::GRAY,
    }
}
