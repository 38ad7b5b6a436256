//! Modal dialogs of the control window: error messages and the font chooser.

use egui::{Context, RichText};

use crate::models::settings::{FontSpec, FontStyle, MAX_FONT_SIZE};

/// Families offered by the font chooser. Anything else is kept as typed.
pub const FONT_FAMILIES: [&str; 5] = ["serif", "sans-serif", "monospace", "dialog", "dialoginput"];

/// A message waiting to be acknowledged by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub title: String,
    pub message: String,
}

/// State for the error dialog
#[derive(Debug, Default)]
pub struct ErrorDialogState {
    pending: Option<ErrorMessage>,
}

impl ErrorDialogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `message`, replacing whatever was still open.
    pub fn show(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.pending = Some(ErrorMessage {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&ErrorMessage> {
        self.pending.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.pending = None;
    }

    pub fn render(&mut self, ctx: &Context) {
        let Some(error) = &self.pending else {
            return;
        };

        let mut should_close = false;

        egui::Window::new(error.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(260.0);
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("✗")
                            .size(24.0)
                            .color(egui::Color32::from_rgb(180, 40, 40)),
                    );
                    ui.vertical(|ui| {
                        ui.label(error.message.as_str());
                    });
                });
                ui.add_space(15.0);
                ui.separator();
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("OK").clicked() {
                        should_close = true;
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::Enter)) {
            should_close = true;
        }

        if should_close {
            self.dismiss();
        }
    }
}

/// Result of a frame of the font dialog
#[derive(Debug, Clone, PartialEq)]
pub enum FontDialogResult {
    Chosen(FontSpec),
    Cancelled,
    Pending,
}

/// Editable copy of the font while the chooser is open.
#[derive(Debug, Default)]
pub struct FontDialogState {
    draft: Option<FontSpec>,
}

impl FontDialogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, current: &FontSpec) {
        self.draft = Some(current.clone());
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft_mut(&mut self) -> Option<&mut FontSpec> {
        self.draft.as_mut()
    }

    /// Closes the dialog, returning the edited font with its size kept
    /// inside the supported range.
    pub fn confirm(&mut self) -> Option<FontSpec> {
        self.draft.take().map(|font| FontSpec {
            size: font.size.clamp(1, MAX_FONT_SIZE),
            ..font
        })
    }

    pub fn cancel(&mut self) {
        self.draft = None;
    }

    pub fn render(&mut self, ctx: &Context) -> FontDialogResult {
        let Some(draft) = self.draft.as_mut() else {
            return FontDialogResult::Pending;
        };

        let mut result = FontDialogResult::Pending;

        egui::Window::new("Font")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("font_dialog_grid")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Family");
                        egui::ComboBox::from_id_source("font_family")
                            .selected_text(draft.family.as_str())
                            .show_ui(ui, |ui| {
                                for family in FONT_FAMILIES {
                                    ui.selectable_value(&mut draft.family, family.to_string(), family);
                                }
                            });
                        ui.end_row();

                        ui.label("Style");
                        egui::ComboBox::from_id_source("font_style")
                            .selected_text(draft.style.label())
                            .show_ui(ui, |ui| {
                                for style in FontStyle::ALL {
                                    ui.selectable_value(&mut draft.style, style, style.label());
                                }
                            });
                        ui.end_row();

                        ui.label("Size");
                        ui.add(
                            egui::DragValue::new(&mut draft.size)
                                .clamp_range(1..=MAX_FONT_SIZE)
                                .speed(1),
                        );
                        ui.end_row();
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        result = FontDialogResult::Chosen(draft.clone());
                    }
                    if ui.button("Cancel").clicked() {
                        result = FontDialogResult::Cancelled;
                    }
                });
            });

        match result {
            FontDialogResult::Chosen(_) => match self.confirm() {
                Some(font) => FontDialogResult::Chosen(font),
                None => FontDialogResult::Cancelled,
            },
            FontDialogResult::Cancelled => {
                self.cancel();
                FontDialogResult::Cancelled
            }
            FontDialogResult::Pending => FontDialogResult::Pending,
        }
    }
}
