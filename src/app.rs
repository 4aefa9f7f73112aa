//! Main application state and UI coordination

use std::time::Instant;

use anyhow::{Context, Result};
use eframe::egui;

use crate::core::config::AppConfig;
use crate::core::registry::Registry;
use crate::core::session::Session;
use crate::core::store::{FileStore, Store};
use crate::core::theme::{ThemePreference, ThemeResolver, VisualMode};
use crate::core::upload::{UploadSource, Uploader, MARKDOWN_EXTENSIONS};
use crate::ui::{
    editor::EditorPanel, file_list::FileListPanel, new_file::NewFileDialog,
    preview::PreviewPanel, toasts::ToastOverlay,
};

/// Main application state
pub struct MdnotesApp {
    /// Documents, selection, edit buffer and notifications
    pub session: Session,
    /// Theme preference and applied mode
    pub theme: ThemeResolver,
    /// Background reader for uploaded files
    pub uploader: Uploader,
    /// Application configuration
    pub config: AppConfig,
    /// Whether sidebar is visible
    pub sidebar_visible: bool,
    /// Prompt for the name of a new document
    pub new_file_dialog: NewFileDialog,
    /// Document awaiting delete confirmation
    pub pending_delete: Option<String>,
    /// Commonmark cache for preview
    pub commonmark_cache: egui_commonmark::CommonMarkCache,
}

impl MdnotesApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self> {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let config = AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("Using default config: {:#}", e);
            AppConfig::default()
        });

        let store = match config.storage_dir() {
            Some(dir) => {
                let backend = FileStore::new(dir);
                tracing::info!("Storing notes in {}", backend.root().display());
                Store::new(backend)
            }
            None => {
                tracing::warn!("No data directory available; notes will not outlive this session");
                Store::in_memory()
            }
        };

        let session = Session::new(Registry::load(store.clone()));
        let theme = ThemeResolver::load(store, system_mode(&cc.egui_ctx));
        apply_mode(&cc.egui_ctx, theme.applied());

        let ctx = cc.egui_ctx.clone();
        let uploader = Uploader::new()
            .context("Failed to start upload reader")?
            .with_waker(move || ctx.request_repaint());

        Ok(Self {
            session,
            theme,
            uploader,
            sidebar_visible: config.ui.sidebar_visible,
            config,
            new_file_dialog: NewFileDialog::default(),
            pending_delete: None,
            commonmark_cache: egui_commonmark::CommonMarkCache::default(),
        })
    }

    /// Change the theme preference and apply the resolved mode
    pub fn set_theme(&mut self, ctx: &egui::Context, preference: ThemePreference) {
        if preference == self.theme.preference() {
            return;
        }
        let mode = self.theme.set_preference(preference);
        apply_mode(ctx, mode);
        self.session
            .notifications
            .info(format!("Theme: {}", preference), Instant::now());
    }

    /// Show or hide the sidebar and remember the choice
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
        self.config.ui.sidebar_visible = self.sidebar_visible;
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to save config: {:#}", e);
        }
    }

    /// Let the user pick markdown files and start reading them
    pub fn browse_uploads(&mut self) {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("Markdown", MARKDOWN_EXTENSIONS)
            .pick_files()
        {
            for path in paths {
                self.uploader.submit(UploadSource::Path(path), None);
            }
        }
    }

    /// Queue files dropped onto the window
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            let mime = (!file.mime.is_empty()).then_some(file.mime.as_str());
            let source = match (file.bytes.clone(), file.path.clone()) {
                (Some(bytes), path) => {
                    let name = match path.as_ref().and_then(|p| p.file_name()) {
                        Some(name) if file.name.is_empty() => name.to_string_lossy().to_string(),
                        _ => file.name.clone(),
                    };
                    UploadSource::Bytes { name, bytes }
                }
                (None, Some(path)) => UploadSource::Path(path),
                (None, None) => continue,
            };
            self.uploader.submit(source, mime);
        }
    }

    /// Turn finished upload reads into documents
    fn collect_uploads(&mut self, now: Instant) {
        for result in self.uploader.drain() {
            match result {
                Ok(file) => {
                    self.session.import(file, now);
                }
                Err(e) => tracing::warn!("Upload failed: {}", e),
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context, now: Instant) {
        let (save, cancel, sidebar, new_file, cycle_theme) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(egui::Key::S),
                i.key_pressed(egui::Key::Escape),
                i.modifiers.command && i.key_pressed(egui::Key::B),
                i.modifiers.command && i.key_pressed(egui::Key::N),
                i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::T),
            )
        });

        if save {
            self.session.save(now);
        }
        if cancel && !self.new_file_dialog.visible && self.pending_delete.is_none() {
            self.session.cancel(now);
        }
        if sidebar {
            self.toggle_sidebar();
        }
        if new_file {
            self.new_file_dialog.open();
        }
        if cycle_theme {
            let next = self.theme.preference().cycle();
            self.set_theme(ctx, next);
        }
    }

    /// Render the top bar
    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let icon = if self.sidebar_visible { "\u{25C0}" } else { "\u{2630}" };
                if ui.button(icon).on_hover_text("Toggle sidebar (Ctrl+B)").clicked() {
                    self.toggle_sidebar();
                }
                ui.heading("Mdnotes");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mut chosen = None;
                    for preference in ThemePreference::ALL.iter().rev() {
                        let selected = self.theme.preference() == *preference;
                        if ui.selectable_label(selected, preference.label()).clicked() {
                            chosen = Some(*preference);
                        }
                    }
                    if let Some(preference) = chosen {
                        self.set_theme(ctx, preference);
                    }
                });
            });
        });
    }

    /// Confirmation window for a pending delete
    fn render_delete_confirmation(&mut self, ctx: &egui::Context, now: Instant) {
        let Some(id) = self.pending_delete.clone() else {
            return;
        };
        let Some(name) = self.session.registry.get(&id).map(|doc| doc.name.clone()) else {
            self.pending_delete = None;
            return;
        };

        let mut decision = None;
        egui::Window::new("Delete note")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Delete \"{}\"? This cannot be undone.", name));
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        decision = Some(false);
                    }
                    if ui.button("Delete").clicked() {
                        decision = Some(true);
                    }
                });
            });

        match decision {
            Some(true) => {
                self.session.delete(&id, now);
                self.pending_delete = None;
            }
            Some(false) => self.pending_delete = None,
            None => {}
        }
    }

    /// Overlay shown while files are dragged over the window
    fn render_drop_hint(&self, ctx: &egui::Context) {
        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("drop_hint"),
        ));
        let rect = ctx.screen_rect();
        painter.rect_filled(rect, 0.0, egui::Color32::from_black_alpha(160));
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Drop markdown files to upload",
            egui::FontId::proportional(24.0),
            egui::Color32::WHITE,
        );
    }

    fn render_central(&mut self, ui: &mut egui::Ui) {
        if self.session.is_editing() {
            if self.config.editor.split_preview {
                let available_width = ui.available_width();
                ui.horizontal(|ui| {
                    ui.set_min_width(available_width);

                    ui.vertical(|ui| {
                        ui.set_width(available_width / 2.0 - 4.0);
                        EditorPanel::show(ui, self);
                    });

                    ui.separator();

                    ui.vertical(|ui| {
                        ui.set_width(available_width / 2.0 - 4.0);
                        PreviewPanel::show_draft(ui, self);
                    });
                });
            } else {
                EditorPanel::show(ui, self);
            }
        } else {
            PreviewPanel::show(ui, self);
        }
    }
}

/// Current OS-level light/dark signal
fn system_mode(ctx: &egui::Context) -> Option<VisualMode> {
    ctx.system_theme()
        .map(|theme| VisualMode::from_prefers_dark(theme == egui::Theme::Dark))
}

fn apply_mode(ctx: &egui::Context, mode: VisualMode) {
    let theme = match mode {
        VisualMode::Light => egui::Theme::Light,
        VisualMode::Dark => egui::Theme::Dark,
    };
    ctx.set_theme(theme);
}

impl eframe::App for MdnotesApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.registry.flush();
        tracing::info!("Mdnotes closed");
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Follow the OS preference while the theme is set to system
        if let Some(mode) = self.theme.observe_system(system_mode(ctx)) {
            apply_mode(ctx, mode);
        }

        self.handle_dropped_files(ctx);
        self.collect_uploads(now);
        self.handle_shortcuts(ctx, now);

        self.render_top_bar(ctx);

        if self.sidebar_visible {
            egui::SidePanel::left("sidebar")
                .resizable(true)
                .default_width(self.config.ui.sidebar_width)
                .min_width(180.0)
                .show(ctx, |ui| {
                    FileListPanel::show(ui, self);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_central(ui);
        });

        if let Some(name) = self.new_file_dialog.show(ctx) {
            self.session.new_document(&name, now);
        }
        self.render_delete_confirmation(ctx, now);

        self.session.notifications.expire(now);
        ToastOverlay::show(ctx, &mut self.session.notifications);
        if let Some(deadline) = self.session.notifications.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }

        self.render_drop_hint(ctx);
    }
}
