//! Markdown editor panel

use std::time::Instant;

use eframe::egui;

use crate::app::MdnotesApp;

/// Markdown editor panel
pub struct EditorPanel;

impl EditorPanel {
    /// Show the editor for the current draft
    pub fn show(ui: &mut egui::Ui, app: &mut MdnotesApp) {
        let font_size = app.config.editor.font_size;
        let word_wrap = app.config.editor.word_wrap;

        let mut save = false;
        let mut cancel = false;

        ui.vertical(|ui| {
            let Some(draft) = app.session.draft_mut() else {
                return;
            };

            ui.horizontal(|ui| {
                ui.label("Name:");
                ui.add(egui::TextEdit::singleline(&mut draft.name).desired_width(240.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Cancel").on_hover_text("Esc").clicked() {
                        cancel = true;
                    }
                    if ui.button("\u{1F4BE} Save").on_hover_text("Ctrl+S").clicked() {
                        save = true;
                    }
                });
            });

            ui.separator();

            // Without wrapping, long lines scroll horizontally
            let scroll = if word_wrap {
                egui::ScrollArea::vertical()
            } else {
                egui::ScrollArea::both()
            };
            scroll.id_salt("editor_scroll").show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut draft.content)
                        .font(egui::FontId::monospace(font_size))
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .desired_rows(30)
                        .hint_text("Write markdown here..."),
                );
            });
        });

        let now = Instant::now();
        if save {
            app.session.save(now);
        } else if cancel {
            app.session.cancel(now);
        }
    }
}
