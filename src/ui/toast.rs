// Unilog - ui/toast.rs
//
// Transient toast notifications, stacked in the bottom-right corner and
// auto-dismissed after their duration. Fire-and-forget: nothing is reported
// back to the caller that raised them.

use std::time::Instant;

use crate::core::buffer::ViewerHandle;
use crate::core::model::Toast;
use crate::ui::theme;
use crate::util::constants::{TOAST_MARGIN, TOAST_SPACING, TOAST_WIDTH};

/// Estimated height of one toast for stack spacing.
const TOAST_STACK_STEP: f32 = 56.0;

/// Render the current toast stack. Expired toasts are pruned first.
pub fn render(ctx: &egui::Context, viewer: &ViewerHandle) {
    let toasts: Vec<Toast> = {
        let mut state = viewer.lock();
        state.prune_toasts(Instant::now());
        state.toasts().to_vec()
    };

    for (i, toast) in toasts.iter().enumerate() {
        let accent = theme::style_colour(toast.presentation.style);
        let offset_y = -(TOAST_MARGIN + i as f32 * (TOAST_STACK_STEP + TOAST_SPACING));

        egui::Area::new(egui::Id::new(("unilog-toast", i)))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-TOAST_MARGIN, offset_y))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .stroke(egui::Stroke::new(1.5, accent))
                    .show(ui, |ui| {
                        ui.set_max_width(TOAST_WIDTH);
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(theme::icon_glyph(toast.presentation.icon))
                                    .color(accent)
                                    .size(16.0),
                            );
                            ui.label(egui::RichText::new(toast.message.as_str()).size(13.0));
                        });
                    });
            });
    }
}
