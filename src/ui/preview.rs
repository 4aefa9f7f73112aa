//! Markdown preview panel using egui_commonmark

use eframe::egui;
use egui_commonmark::CommonMarkViewer;

use crate::app::MdnotesApp;
use crate::ui::file_list::format_timestamp;

/// Markdown preview panel
pub struct PreviewPanel;

impl PreviewPanel {
    /// Show the selected document in view mode
    pub fn show(ui: &mut egui::Ui, app: &mut MdnotesApp) {
        // Copy out what we need to avoid borrow conflicts
        let selected = app
            .session
            .selected()
            .map(|doc| (doc.id.clone(), doc.name.clone(), doc.content.clone(), doc.updated_at));

        let Some((id, name, content, updated_at)) = selected else {
            Self::show_welcome(ui);
            return;
        };

        let mut edit = false;
        let mut delete = false;
        ui.horizontal(|ui| {
            ui.heading(&name);
            ui.label(
                egui::RichText::new(format!("updated {}", format_timestamp(updated_at))).weak(),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("\u{1F5D1} Delete").clicked() {
                    delete = true;
                }
                if ui.button("\u{270F} Edit").clicked() {
                    edit = true;
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("preview_scroll")
            .show(ui, |ui| {
                CommonMarkViewer::new().show(ui, &mut app.commonmark_cache, &content);
            });

        if edit {
            app.session.begin_edit();
        }
        if delete {
            app.pending_delete = Some(id);
        }
    }

    /// Live preview of the draft being edited
    pub fn show_draft(ui: &mut egui::Ui, app: &mut MdnotesApp) {
        let Some(draft) = app.session.draft() else {
            return;
        };

        ui.label(egui::RichText::new("Preview").weak());
        ui.separator();
        egui::ScrollArea::vertical()
            .id_salt("draft_preview_scroll")
            .show(ui, |ui| {
                CommonMarkViewer::new().show(ui, &mut app.commonmark_cache, &draft.content);
            });
    }

    /// Show welcome screen when no document is selected
    fn show_welcome(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);

            ui.heading("Welcome to Mdnotes");
            ui.add_space(20.0);

            ui.label("Select a note, create a new one, or drop markdown files to upload.");
            ui.add_space(10.0);

            ui.label("Keyboard shortcuts:");
            ui.label("  Ctrl+N - New note");
            ui.label("  Ctrl+S - Save");
            ui.label("  Esc - Cancel editing");
            ui.label("  Ctrl+B - Toggle sidebar");
            ui.label("  Ctrl+Shift+T - Cycle theme");
        });
    }
}
