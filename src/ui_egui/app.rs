mod control_panel;
mod dialogs;
mod geometry;
mod lifecycle;
mod overlay;
mod state;

use self::dialogs::{ErrorDialogState, FontDialogState};
use self::overlay::OverlayState;
use self::state::AppState;
use crate::models::settings::Settings;
use crate::services::appearance::AppearanceRenderer;
use crate::services::control::ControlSurface;
use crate::services::preferences::PreferenceStore;
use crate::services::timer::TimerEngine;

pub struct CountdownApp {
    /// Where settings are read at startup and written on exit
    store: Box<dyn PreferenceStore>,
    settings: Settings,
    engine: TimerEngine,
    renderer: AppearanceRenderer,
    /// Time fields and countdown mirror of the control window
    control: ControlSurface,
    overlay: OverlayState,
    error_dialog: ErrorDialogState,
    font_dialog: FontDialogState,
    state: AppState,
}

impl eframe::App for CountdownApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.handle_update(ctx, frame);
    }

    fn on_exit(&mut self, gl: Option<&eframe::glow::Context>) {
        self.handle_exit(gl);
    }

    /// The overlay viewport needs a transparent clear so TRANSPARENT mode
    /// shows the desktop through it.
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }
}
