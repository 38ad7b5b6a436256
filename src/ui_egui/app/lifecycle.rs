use std::time::Duration;

use anyhow::Result;

use super::dialogs::{ErrorDialogState, FontDialogResult, FontDialogState};
use super::overlay::OverlayState;
use super::state::AppState;
use super::CountdownApp;
use crate::config::AppConfig;
use crate::models::settings::{Settings, WindowBounds};
use crate::services::appearance::{AppearanceRenderer, RepaintKind};
use crate::services::control::{ControlCommand, ControlOutcome, ControlSurface};
use crate::services::database::Database;
use crate::services::preferences::{MemoryPreferenceStore, PreferenceStore, SqlitePreferenceStore};
use crate::services::settings::SettingsService;
use crate::services::timer::{SystemClock, TimerEngine};
use crate::utils::monitors;

impl CountdownApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut error_dialog = ErrorDialogState::new();

        let store: Box<dyn PreferenceStore> = match open_preference_store(&config) {
            Ok(store) => store,
            Err(e) => {
                log::error!("Failed to open preference database: {:#}", e);
                error_dialog.show(
                    "Error",
                    format!("Settings cannot be stored this session.\n\n{:#}", e),
                );
                Box::new(MemoryPreferenceStore::new())
            }
        };

        let default_bounds = monitors::default_screen_bounds(&monitors::get_available_monitors(None));
        let settings = load_settings_or_default(store.as_ref(), default_bounds, &mut error_dialog);

        let mut engine = TimerEngine::new(Box::new(SystemClock));
        let control = ControlSurface::new(config.preset_time.clone(), config.clock_time.clone());
        control.attach(&mut engine);
        engine.set_countdown(Duration::from_secs(config.initial_countdown_secs));

        let mut renderer = AppearanceRenderer::new(&settings);
        renderer.set_text(engine.text());

        cc.egui_ctx.set_embed_viewports(false);

        Self {
            store,
            overlay: OverlayState::new(&settings),
            settings,
            engine,
            renderer,
            control,
            error_dialog,
            font_dialog: FontDialogState::new(),
            state: AppState::new(),
        }
    }

    pub(super) fn handle_update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Sanitize bounds on first frame when we have monitor info
        if !self.state.geometry_sanitized {
            self.sanitize_overlay_bounds(ctx);
            self.state.geometry_sanitized = true;
        }

        let ticks = self.engine.poll();
        if ticks > 1 {
            log::debug!("Caught up {} missed ticks", ticks);
        }
        if self.renderer.set_text(&self.control.timer_text()) != RepaintKind::None {
            ctx.request_repaint();
        }

        let panel = self.render_control_panel(ctx);
        if panel.open_font_dialog {
            self.font_dialog.open(&self.settings.font);
        }
        for command in panel.commands {
            self.apply_command(ctx, command);
        }

        if let FontDialogResult::Chosen(font) = self.font_dialog.render(ctx) {
            self.apply_command(ctx, ControlCommand::SetFont(font));
        }
        self.error_dialog.render(ctx);

        if !self.state.overlay_closed {
            self.render_overlay(ctx);
            self.capture_overlay_bounds(ctx);
        }

        if let Some(wait) = self.engine.time_until_next_tick() {
            ctx.request_repaint_after(wait);
        }
    }

    fn apply_command(&mut self, ctx: &egui::Context, command: ControlCommand) {
        match self.control.apply(
            command,
            &mut self.settings,
            &mut self.engine,
            &mut self.renderer,
        ) {
            Ok(ControlOutcome::Unchanged) => {}
            Ok(ControlOutcome::Timer) => {
                self.renderer.set_text(&self.control.timer_text());
                ctx.request_repaint();
            }
            Ok(ControlOutcome::Appearance) => ctx.request_repaint(),
            Err(e) => {
                log::warn!("Control action failed: {}", e);
                self.error_dialog.show(e.title(), e.message());
            }
        }
    }

    pub(super) fn handle_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let service = SettingsService::new(self.store.as_ref());
        if let Err(e) = service.save(&self.settings) {
            log::error!("Failed to save settings: {:#}", e);
        }
    }
}

fn open_preference_store(config: &AppConfig) -> Result<Box<dyn PreferenceStore>> {
    let path = config.resolve_database_path()?;
    let db = Database::new(&path.to_string_lossy())?;
    db.initialize_schema()?;
    log::info!("Using preference database {}", path.display());

    // Lives for the rest of the process, like the eframe app holding it
    let db: &'static Database = Box::leak(Box::new(db));
    Ok(Box::new(SqlitePreferenceStore::new(db)))
}

fn load_settings_or_default(
    store: &dyn PreferenceStore,
    default_bounds: WindowBounds,
    error_dialog: &mut ErrorDialogState,
) -> Settings {
    match SettingsService::new(store).load(default_bounds) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Failed to load settings: {}, using defaults", e);
            error_dialog.show(
                "Error",
                format!("Stored settings could not be read, defaults are used.\n\n{}", e),
            );
            SettingsService::load_defaults(default_bounds)
        }
    }
}
