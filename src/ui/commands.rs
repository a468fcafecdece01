// Unilog - ui/commands.rs
//
// Command-runner side panel: every registered command gets a collapsible
// section with typed input fields and an Execute button dispatching through
// the registry. Results and failures are fed back through the logger, so
// they show up in the viewer and as toasts like any other entry.

use std::collections::BTreeMap;

use crate::app::context::LoggerContext;
use crate::cli::{ArgValue, CommandArgs, CommandRegistry, ParamKind, ParamSpec};
use crate::util::error::InvokeError;

/// UI state for the command runner: raw field contents keyed by
/// "command.param", plus the outcome line of the last run.
#[derive(Default)]
pub struct CommandPanel {
    text_inputs: BTreeMap<String, String>,
    flag_inputs: BTreeMap<String, bool>,
    last_outcome: Option<(String, bool)>,
}

impl CommandPanel {
    /// Render the panel. Invocation is deferred until after the widget loop
    /// so the registry is not borrowed while its specs are being listed.
    pub fn render(
        &mut self,
        ui: &mut egui::Ui,
        commands: &mut CommandRegistry,
        logger: &mut LoggerContext,
    ) {
        ui.heading("Commands");
        ui.separator();

        // Snapshot of the introspectable parts; the handlers stay behind.
        let specs: Vec<(String, String, Vec<ParamSpec>)> = commands
            .iter()
            .map(|s| (s.name.clone(), s.about.clone(), s.params.clone()))
            .collect();

        let mut pending_run: Option<(String, Vec<ParamSpec>)> = None;

        for (name, about, params) in &specs {
            egui::CollapsingHeader::new(name.as_str()).show(ui, |ui| {
                if !about.is_empty() {
                    ui.label(egui::RichText::new(about.as_str()).weak());
                }
                for param in params {
                    let key = field_key(name, &param.name);
                    match param.kind {
                        ParamKind::Bool => {
                            let value = self.flag_inputs.entry(key).or_insert(false);
                            ui.checkbox(value, param.name.as_str());
                        }
                        ParamKind::Int | ParamKind::Text => {
                            let value = self.text_inputs.entry(key).or_default();
                            ui.horizontal(|ui| {
                                ui.label(param.name.as_str());
                                ui.add(
                                    egui::TextEdit::singleline(value)
                                        .hint_text(param.kind.label())
                                        .desired_width(120.0),
                                );
                            });
                        }
                    }
                }
                if ui.button("Execute").clicked() {
                    pending_run = Some((name.clone(), params.clone()));
                }
            });
        }

        if let Some((name, params)) = pending_run {
            self.execute(&name, &params, commands, logger);
        }

        if let Some((message, ok)) = &self.last_outcome {
            ui.separator();
            let colour = if *ok {
                egui::Color32::from_rgb(22, 163, 74)
            } else {
                egui::Color32::from_rgb(220, 38, 38)
            };
            ui.label(egui::RichText::new(message.as_str()).color(colour).small());
        }
    }

    fn execute(
        &mut self,
        name: &str,
        params: &[ParamSpec],
        commands: &mut CommandRegistry,
        logger: &mut LoggerContext,
    ) {
        let args = match self.collect_args(name, params) {
            Ok(args) => args,
            Err(reason) => {
                self.last_outcome = Some((reason, false));
                return;
            }
        };

        match commands.invoke(name, &args) {
            Ok(output) => {
                if !output.is_empty() {
                    if let Err(e) = logger.display(&output, "success", true) {
                        tracing::warn!(error = %e, "Failed to log command output");
                    }
                }
                self.last_outcome = Some((format!("{name}: ok"), true));
            }
            Err(InvokeError::Handler { source, .. }) => {
                let error: &(dyn std::error::Error + 'static) = source.as_ref();
                if let Err(e) = logger.log_exception(error, true) {
                    tracing::warn!(error = %e, "Failed to log command failure");
                }
                self.last_outcome = Some((format!("{name}: {source}"), false));
            }
            Err(e) => {
                if let Err(log_err) = logger.display(&e.to_string(), "error", true) {
                    tracing::warn!(error = %log_err, "Failed to log command failure");
                }
                self.last_outcome = Some((e.to_string(), false));
            }
        }
    }

    /// Turn raw field contents into typed arguments. Empty optional fields
    /// are omitted; a malformed value aborts with a user-facing reason.
    fn collect_args(&self, command: &str, params: &[ParamSpec]) -> Result<CommandArgs, String> {
        let mut args = CommandArgs::new();
        for param in params {
            let key = field_key(command, &param.name);
            match param.kind {
                ParamKind::Bool => {
                    let value = self.flag_inputs.get(&key).copied().unwrap_or(false);
                    args.insert(&param.name, ArgValue::Bool(value));
                }
                ParamKind::Int | ParamKind::Text => {
                    let raw = self.text_inputs.get(&key).map(String::as_str).unwrap_or("");
                    if raw.is_empty() && !param.required {
                        continue;
                    }
                    let value = ArgValue::parse(param.kind, raw)
                        .map_err(|e| format!("{}: {e}", param.name))?;
                    args.insert(&param.name, value);
                }
            }
        }
        Ok(args)
    }
}

fn field_key(command: &str, param: &str) -> String {
    format!("{command}.{param}")
}
