// Unilog - ui/viewer.rs
//
// The log viewer application: an eframe window rendering the append-only
// buffer with batched redraws, stick-to-bottom auto-scroll, toasts, and the
// command-runner panel.
//
// Rendering cadence is decoupled from appends: each frame flushes the
// buffer only when the redraw interval has elapsed, and a flush reveals
// every pending entry at once. Appends from other threads go through the
// shared ViewerHandle; everything here runs on the event loop's thread.

use std::time::{Duration, Instant};

use egui::text::{LayoutJob, TextFormat};

use crate::app::context::LoggerContext;
use crate::cli::CommandRegistry;
use crate::sink::render_template;
use crate::ui::commands::CommandPanel;
use crate::ui::{theme, toast};
use crate::util::constants::{
    COMMAND_PANEL_WIDTH, MIN_WINDOW_SIZE, REDRAW_INTERVAL_FAST_MS, REDRAW_INTERVAL_NORMAL_MS,
    REDRAW_INTERVAL_SLOW_MS, ROW_HEIGHT, WINDOW_SIZE,
};

// =============================================================================
// Redraw speed
// =============================================================================

/// User-selectable redraw cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RedrawSpeed {
    Slow,
    Normal,
    Fast,
}

impl RedrawSpeed {
    fn label(&self) -> &'static str {
        match self {
            RedrawSpeed::Slow => "Slow",
            RedrawSpeed::Normal => "Normal",
            RedrawSpeed::Fast => "Fast",
        }
    }

    fn interval(&self) -> Duration {
        let ms = match self {
            RedrawSpeed::Slow => REDRAW_INTERVAL_SLOW_MS,
            RedrawSpeed::Normal => REDRAW_INTERVAL_NORMAL_MS,
            RedrawSpeed::Fast => REDRAW_INTERVAL_FAST_MS,
        };
        Duration::from_millis(ms)
    }

    fn nearest(interval: Duration) -> Self {
        let ms = interval.as_millis() as u64;
        if ms >= REDRAW_INTERVAL_SLOW_MS {
            RedrawSpeed::Slow
        } else if ms <= REDRAW_INTERVAL_FAST_MS {
            RedrawSpeed::Fast
        } else {
            RedrawSpeed::Normal
        }
    }
}

// =============================================================================
// Viewer application
// =============================================================================

/// The eframe application owning the logger context and command registry
/// for the duration of the GUI session.
pub struct ViewerApp {
    logger: LoggerContext,
    commands: CommandRegistry,
    panel: CommandPanel,
    dark_mode: bool,
    speed: RedrawSpeed,
}

impl ViewerApp {
    pub fn new(logger: LoggerContext, commands: CommandRegistry) -> Self {
        let dark_mode = logger.config().dark_mode;
        let speed = RedrawSpeed::nearest(logger.config().redraw_interval);
        Self {
            logger,
            commands,
            panel: CommandPanel::default(),
            dark_mode,
            speed,
        }
    }

    fn copy_visible_to_clipboard(&self, ctx: &egui::Context) {
        let template = self.logger.config().format.clone();
        let viewer = self.logger.viewer();
        let state = viewer.lock();
        let text: String = state
            .visible()
            .iter()
            .map(|entry| render_template(&template, entry))
            .collect::<Vec<_>>()
            .join("\n");
        drop(state);
        ctx.copy_text(text);
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let viewer = self.logger.viewer();

        // Flush pending entries on the redraw tick. The flush reveals every
        // appended-but-unrendered entry; nothing is dropped between ticks.
        let interval = {
            let mut state = viewer.lock();
            let now = Instant::now();
            if state.flush_due(now) {
                let revealed = state.flush(now);
                tracing::trace!(revealed, "Viewer flush");
            }
            state.prune_toasts(now);
            state.redraw_interval()
        };
        ctx.request_repaint_after(interval);

        // Top bar: counts, redraw speed, clipboard, theme.
        egui::TopBottomPanel::top("unilog-top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(self.logger.config().app_name.as_str()).strong(),
                );

                ui.separator();
                let (total, pending) = {
                    let state = viewer.lock();
                    (state.len(), state.pending())
                };
                ui.label(format!("{total} entries"));
                if pending > 0 {
                    ui.label(egui::RichText::new(format!("(+{pending} pending)")).weak());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_label = if self.dark_mode { "Light" } else { "Dark" };
                    if ui.button(theme_label).clicked() {
                        self.dark_mode = !self.dark_mode;
                        ctx.set_visuals(if self.dark_mode {
                            egui::Visuals::dark()
                        } else {
                            egui::Visuals::light()
                        });
                    }

                    if ui.button("Copy").clicked() {
                        self.copy_visible_to_clipboard(ctx);
                    }

                    let previous = self.speed;
                    egui::ComboBox::from_id_salt("unilog-speed")
                        .selected_text(self.speed.label())
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.speed, RedrawSpeed::Slow, "Slow");
                            ui.selectable_value(&mut self.speed, RedrawSpeed::Normal, "Normal");
                            ui.selectable_value(&mut self.speed, RedrawSpeed::Fast, "Fast");
                        });
                    if self.speed != previous {
                        viewer.set_redraw_interval(self.speed.interval());
                    }
                    ui.label("Redraw:");
                });
            });
        });

        // Command runner, only when the embedding app registered commands.
        if !self.commands.is_empty() {
            egui::SidePanel::left("unilog-commands")
                .default_width(COMMAND_PANEL_WIDTH)
                .show(ctx, |ui| {
                    self.panel.render(ui, &mut self.commands, &mut self.logger);
                });
        }

        // The log viewer itself.
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut state = viewer.lock();

            if state.visible().is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("No log entries yet.");
                });
                return;
            }

            let stick = state.scroll().is_bottom();
            let visible_len = state.visible().len();
            let body_colour = theme::row_text_colour(self.dark_mode);

            let output = egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .stick_to_bottom(stick)
                .show_rows(ui, ROW_HEIGHT, visible_len, |ui, row_range| {
                    for idx in row_range {
                        let Some(entry) = state.visible().get(idx) else {
                            continue;
                        };

                        let accent = theme::style_colour(entry.presentation.style);
                        let sev_colour = theme::severity_colour(&entry.severity);
                        let font = egui::FontId::monospace(12.0);

                        let mut job = LayoutJob::default();
                        job.append(
                            &format!("{} ", theme::icon_glyph(entry.presentation.icon)),
                            0.0,
                            TextFormat {
                                font_id: font.clone(),
                                color: accent,
                                ..Default::default()
                            },
                        );
                        job.append(
                            &format!("[{:<4}] ", entry.severity.short_label()),
                            0.0,
                            TextFormat {
                                font_id: font.clone(),
                                color: sev_colour,
                                ..Default::default()
                            },
                        );
                        let first_line =
                            entry.message.lines().next().unwrap_or(&entry.message);
                        job.append(
                            &format!(
                                "{} | {}",
                                entry.timestamp.format("%H:%M:%S"),
                                first_line
                            ),
                            0.0,
                            TextFormat {
                                font_id: font,
                                color: body_colour,
                                ..Default::default()
                            },
                        );

                        let response = ui.label(job);

                        // Full message and keyword as a hover tooltip; handy
                        // for multi-line tracebacks truncated to one row.
                        if entry.message.lines().count() > 1 {
                            response.on_hover_ui(|ui| {
                                ui.label(
                                    egui::RichText::new(entry.message.as_str())
                                        .monospace()
                                        .small(),
                                );
                            });
                        }
                    }
                });

            // Record where the viewport ended up so the next appends know
            // whether to follow the bottom or stay pinned to history.
            let max_offset = (output.content_size.y - output.inner_rect.height()).max(0.0);
            let at_bottom = output.state.offset.y >= max_offset - ROW_HEIGHT;
            state.note_scroll(at_bottom, output.state.offset.y);
        });

        toast::render(ctx, &viewer);
    }
}

// =============================================================================
// Event loop entry
// =============================================================================

/// Launch the viewer window and block until it is closed. Takes ownership
/// of the context and registry: the GUI owns the main thread.
pub fn run(logger: LoggerContext, commands: CommandRegistry) -> Result<(), eframe::Error> {
    let app_name = logger.config().app_name.clone();
    let dark_mode = logger.config().dark_mode;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                app_name,
                crate::util::constants::APP_VERSION
            ))
            .with_inner_size(WINDOW_SIZE)
            .with_min_inner_size(MIN_WINDOW_SIZE),
        ..Default::default()
    };

    tracing::info!(app = %app_name, "Launching viewer");

    eframe::run_native(
        &app_name,
        native_options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(if dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            Ok(Box::new(ViewerApp::new(logger, commands)))
        }),
    )
}
