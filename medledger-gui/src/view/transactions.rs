//! Transactions screen: recent consent transactions, optionally for one wallet.

use egui::Ui;
use medledger::{format_address, format_amount, format_date_time, format_transaction_type, Phase};

use crate::state::AppState;
use crate::widgets;

/// Render the transactions screen.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    let txs = &mut state.transactions;

    ui.horizontal(|ui| {
        ui.heading("Transaction History");
        if let Some(label) = txs.filter_label() {
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new(format!("Filtering for: {}", label))
                    .monospace()
                    .color(egui::Color32::GRAY),
            );
        }
    });

    ui.horizontal(|ui| {
        let filter = ui.add(
            egui::TextEdit::singleline(&mut txs.filter_input)
                .hint_text("Wallet address")
                .desired_width(320.0),
        );
        if filter.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            txs.apply_filter();
        }
        if ui
            .add_enabled(txs.account().is_some(), egui::Button::new("Clear"))
            .clicked()
        {
            txs.clear_filter();
        }
    });

    ui.separator();
    ui.add_space(5.0);

    let mut retry = false;
    match txs.fetch.phase(|t| t.is_empty()) {
        Phase::Loading => widgets::loading(ui, "Loading transactions..."),
        Phase::Failed(message) => retry = widgets::error(ui, message, true),
        Phase::Empty => widgets::empty_state(ui, Some("No transactions found")),
        Phase::Ready(transactions) => {
            ui.label(format!("{} transactions", transactions.len()));
            ui.add_space(5.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                for tx in transactions {
                    ui.group(|ui| {
                        ui.set_min_width(ui.available_width());
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(format_transaction_type(&tx.tx_type)).strong(),
                            );
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(&tx.status)
                                    .color(widgets::status_color(&tx.status)),
                            );
                        });

                        egui::Grid::new(("tx_details", &tx.id))
                            .num_columns(2)
                            .spacing([20.0, 4.0])
                            .show(ui, |ui| {
                                ui.label(egui::RichText::new("From").color(egui::Color32::GRAY));
                                ui.monospace(format_address(&tx.from));
                                ui.end_row();

                                ui.label(egui::RichText::new("To").color(egui::Color32::GRAY));
                                ui.monospace(format_address(&tx.to));
                                ui.end_row();

                                ui.label(egui::RichText::new("Amount").color(egui::Color32::GRAY));
                                ui.label(
                                    egui::RichText::new(format_amount(&tx.amount, &tx.currency))
                                        .strong(),
                                );
                                ui.end_row();

                                ui.label(
                                    egui::RichText::new("Timestamp").color(egui::Color32::GRAY),
                                );
                                ui.label(format_date_time(&tx.timestamp));
                                ui.end_row();

                                if let Some(hash) = &tx.blockchain_tx_hash {
                                    ui.label(
                                        egui::RichText::new("Transaction Hash")
                                            .color(egui::Color32::GRAY),
                                    );
                                    ui.label(
                                        egui::RichText::new(hash)
                                            .monospace()
                                            .small()
                                            .color(egui::Color32::DARK_GRAY),
                                    );
                                    ui.end_row();
                                }
                            });
                    });
                    ui.add_space(4.0);
                }
            });
        }
    }

    if retry {
        txs.retry();
    }
}
