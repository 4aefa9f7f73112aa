//! Toast overlay for queued notifications

use eframe::egui;

use crate::core::notifications::{NotificationKind, NotificationQueue};

/// Bottom-right stack of notifications, newest on top
pub struct ToastOverlay;

impl ToastOverlay {
    pub fn show(ctx: &egui::Context, queue: &mut NotificationQueue) {
        if queue.is_empty() {
            return;
        }

        let mut dismissed = Vec::new();
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.set_max_width(320.0);
                for notification in queue.iter().rev() {
                    let (icon, color) = Self::style(notification.kind);
                    egui::Frame::popup(ui.style())
                        .stroke(egui::Stroke::new(1.5, color))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.colored_label(color, icon);
                                ui.label(&notification.message);
                                if ui.small_button("\u{2715}").clicked() {
                                    dismissed.push(notification.id);
                                }
                            });
                        });
                    ui.add_space(6.0);
                }
            });

        for id in dismissed {
            queue.dismiss(id);
        }
    }

    fn style(kind: NotificationKind) -> (&'static str, egui::Color32) {
        match kind {
            NotificationKind::Success => ("\u{2714}", egui::Color32::from_rgb(16, 185, 129)),
            NotificationKind::Error => ("\u{26A0}", egui::Color32::from_rgb(239, 68, 68)),
            NotificationKind::Info => ("\u{2139}", egui::Color32::from_rgb(59, 130, 246)),
        }
    }
}
