//! Sidebar listing stored notes

use chrono::{Local, TimeZone};
use eframe::egui;

use crate::app::MdnotesApp;
use crate::core::document::Document;

/// Notes list panel
pub struct FileListPanel;

impl FileListPanel {
    /// Show the notes list
    pub fn show(ui: &mut egui::Ui, app: &mut MdnotesApp) {
        ui.vertical(|ui| {
            // Header
            ui.horizontal(|ui| {
                ui.heading(format!("Notes ({})", app.session.registry.len()));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("\u{2B06}").on_hover_text("Upload markdown files").clicked() {
                        app.browse_uploads();
                    }
                    if ui.button("+").on_hover_text("New note (Ctrl+N)").clicked() {
                        app.new_file_dialog.open();
                    }
                });
            });

            let pending = app.uploader.pending();
            if pending > 0 {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!("Reading {} file(s)...", pending));
                });
            }

            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("file_list_scroll")
                .show(ui, |ui| {
                    if app.session.registry.is_empty() {
                        Self::show_empty(ui);
                        return;
                    }

                    let mut clicked = None;
                    let mut delete = None;
                    let selected = app.session.selected_id();
                    for doc in app.session.registry.list() {
                        let is_active = selected == Some(doc.id.as_str());
                        match Self::show_entry(ui, doc, is_active) {
                            Some(EntryAction::Select) => clicked = Some(doc.id.clone()),
                            Some(EntryAction::Delete) => delete = Some(doc.id.clone()),
                            None => {}
                        }
                    }

                    if let Some(id) = clicked {
                        app.session.select(&id);
                    }
                    if delete.is_some() {
                        app.pending_delete = delete;
                    }
                });
        });
    }

    /// Show a single note row
    fn show_entry(ui: &mut egui::Ui, doc: &Document, is_active: bool) -> Option<EntryAction> {
        let mut action = None;
        ui.horizontal(|ui| {
            let label = ui
                .selectable_label(is_active, format!("\u{1F4DD} {}", doc.name))
                .on_hover_text(format!("Updated {}", format_timestamp(doc.updated_at)));
            if label.clicked() {
                action = Some(EntryAction::Select);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("\u{1F5D1}").on_hover_text("Delete").clicked() {
                    action = Some(EntryAction::Delete);
                }
            });
        });
        action
    }

    fn show_empty(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.label("No notes yet");
            ui.label("Create one or drop .md files here");
        });
    }
}

enum EntryAction {
    Select,
    Delete,
}

/// Render epoch milliseconds in local time
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
        None => "unknown".to_string(),
    }
}
