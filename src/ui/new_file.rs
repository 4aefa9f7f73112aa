//! Prompt for the name of a new note

use eframe::egui;

/// Dialog for creating a new note
#[derive(Debug, Default)]
pub struct NewFileDialog {
    pub visible: bool,
    pub file_name: String,
    focus_requested: bool,
}

impl NewFileDialog {
    pub fn open(&mut self) {
        self.visible = true;
        self.focus_requested = true;
        self.file_name.clear();
    }

    fn close(&mut self) {
        self.visible = false;
        self.file_name.clear();
    }

    /// Show the dialog; returns the entered name once confirmed
    pub fn show(&mut self, ctx: &egui::Context) -> Option<String> {
        if !self.visible {
            return None;
        }

        let mut result = None;
        let mut cancelled = false;

        egui::Window::new("New Note")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("File name:");
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.file_name).hint_text("untitled.md"),
                    );
                    if self.focus_requested {
                        response.request_focus();
                        self.focus_requested = false;
                    }
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        result = Some(self.file_name.clone());
                    }
                });

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                    if ui.button("Create").clicked() {
                        result = Some(self.file_name.clone());
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            cancelled = true;
        }

        // Blank names are not accepted; the dialog stays open
        let result = result.filter(|name| !name.trim().is_empty());
        if result.is_some() || cancelled {
            self.close();
        }
        result
    }
}
