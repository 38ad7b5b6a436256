use std::path::PathBuf;

use super::state::ControlTab;
use super::CountdownApp;
use crate::models::settings::{Alignment, BackgroundMode, RgbColor, MAX_MARGIN};
use crate::services::control::ControlCommand;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// What the control window asked for during one frame.
#[derive(Debug, Default)]
pub(super) struct ControlPanelResult {
    pub(super) commands: Vec<ControlCommand>,
    pub(super) open_font_dialog: bool,
}

impl CountdownApp {
    pub(super) fn render_control_panel(&mut self, ctx: &egui::Context) -> ControlPanelResult {
        let mut result = ControlPanelResult::default();

        egui::TopBottomPanel::top("control_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in ControlTab::ALL {
                    ui.selectable_value(&mut self.state.active_tab, tab, tab.label());
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.state.active_tab {
            ControlTab::Countdown => self.render_countdown_tab(ui, &mut result),
            ControlTab::Appearance => self.render_appearance_tab(ui, &mut result),
        });

        result
    }

    fn render_countdown_tab(&mut self, ui: &mut egui::Ui, result: &mut ControlPanelResult) {
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(self.control.timer_text())
                    .monospace()
                    .size(36.0)
                    .strong(),
            );
        });
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.control.can_start(&self.engine), egui::Button::new("Start"))
                .clicked()
            {
                result.commands.push(ControlCommand::StartTimer);
            }
            if ui
                .add_enabled(self.control.can_stop(&self.engine), egui::Button::new("Stop"))
                .clicked()
            {
                result.commands.push(ControlCommand::StopTimer);
            }
            if ui.button("Reset").clicked() {
                result.commands.push(ControlCommand::ResetTimer);
            }
        });

        ui.separator();
        egui::Grid::new("countdown_fields")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.control.preset_field)
                        .desired_width(120.0)
                        .hint_text("HH:MM:SS"),
                );
                if ui.button("Preset Timer").clicked() {
                    result.commands.push(ControlCommand::PresetTimer);
                }
                ui.end_row();

                ui.add(
                    egui::TextEdit::singleline(&mut self.control.clock_field)
                        .desired_width(120.0)
                        .hint_text("HH:MM"),
                );
                if ui.button("Start Countdown").clicked() {
                    result.commands.push(ControlCommand::CountdownToClock);
                }
                ui.end_row();
            });
    }

    fn render_appearance_tab(&mut self, ui: &mut egui::Ui, result: &mut ControlPanelResult) {
        let settings = &self.settings;

        egui::Grid::new("appearance_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Alignment");
                let mut alignment = settings.alignment;
                egui::ComboBox::from_id_source("alignment")
                    .selected_text(alignment.name())
                    .show_ui(ui, |ui| {
                        for option in Alignment::ALL {
                            ui.selectable_value(&mut alignment, option, option.name());
                        }
                    });
                if alignment != settings.alignment {
                    result.commands.push(ControlCommand::SetAlignment(alignment));
                }
                ui.end_row();

                ui.label("Background");
                let mut mode = settings.mode;
                egui::ComboBox::from_id_source("background_mode")
                    .selected_text(mode.name())
                    .show_ui(ui, |ui| {
                        for option in BackgroundMode::ALL {
                            ui.selectable_value(&mut mode, option, option.name());
                        }
                    });
                if mode != settings.mode {
                    result.commands.push(ControlCommand::SetBackgroundMode(mode));
                }
                ui.end_row();

                ui.label("Margin X");
                let mut margin_x = settings.margin_x;
                if ui
                    .add(egui::DragValue::new(&mut margin_x).clamp_range(0..=MAX_MARGIN))
                    .changed()
                {
                    result.commands.push(ControlCommand::SetMarginX(margin_x));
                }
                ui.end_row();

                ui.label("Margin Y");
                let mut margin_y = settings.margin_y;
                if ui
                    .add(egui::DragValue::new(&mut margin_y).clamp_range(0..=MAX_MARGIN))
                    .changed()
                {
                    result.commands.push(ControlCommand::SetMarginY(margin_y));
                }
                ui.end_row();

                ui.label("Text color");
                if let Some(color) = color_button(ui, settings.text_color) {
                    result.commands.push(ControlCommand::SetTextColor(color));
                }
                ui.end_row();

                ui.label("Background color");
                if let Some(color) = color_button(ui, settings.background_color) {
                    result.commands.push(ControlCommand::SetBackgroundColor(color));
                }
                ui.end_row();

                ui.label("Font");
                ui.horizontal(|ui| {
                    ui.label(settings.font.to_string());
                    if ui.button("Choose...").clicked() {
                        result.open_font_dialog = true;
                    }
                });
                ui.end_row();

                ui.label("Image");
                ui.horizontal(|ui| {
                    let current = settings
                        .image_path
                        .as_ref()
                        .and_then(|path| path.file_name())
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "(none)".to_string());
                    ui.label(current);
                    if ui.button("Choose...").clicked() {
                        if let Some(path) = pick_image_file() {
                            result.commands.push(ControlCommand::ChooseBackgroundImage(path));
                        }
                    }
                });
                ui.end_row();

                ui.label("");
                let mut fullscreen = settings.fullscreen;
                if ui.checkbox(&mut fullscreen, "Fullscreen").changed() {
                    result.commands.push(ControlCommand::SetFullscreen(fullscreen));
                }
                ui.end_row();
            });
    }
}

fn color_button(ui: &mut egui::Ui, current: RgbColor) -> Option<RgbColor> {
    let mut rgb = current.to_array();
    if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
        Some(RgbColor::from_array(rgb))
    } else {
        None
    }
}

/// Blocks until the user picks a file or cancels.
fn pick_image_file() -> Option<PathBuf> {
    let path = rfd::FileDialog::new()
        .set_title("Choose background image")
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file();
    if path.is_none() {
        log::debug!("Image selection cancelled");
    }
    path
}
