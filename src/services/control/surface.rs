use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use thiserror::Error;

use super::input::{next_occurrence, parse_clock_time, parse_preset_duration, InputError};
use crate::models::settings::{
    Alignment, BackgroundMode, FontSpec, RgbColor, Settings, MAX_FONT_SIZE, MAX_MARGIN,
};
use crate::services::appearance::{load_background_image, AppearanceRenderer, ImageLoadError};
use crate::services::timer::TimerEngine;

/// A single user action on the control window.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    StartTimer,
    StopTimer,
    ResetTimer,
    /// Uses the current contents of the preset field.
    PresetTimer,
    /// Uses the current contents of the clock field, then starts.
    CountdownToClock,
    SetAlignment(Alignment),
    SetBackgroundMode(BackgroundMode),
    SetMarginX(i32),
    SetMarginY(i32),
    SetTextColor(RgbColor),
    SetBackgroundColor(RgbColor),
    SetFont(FontSpec),
    ChooseBackgroundImage(PathBuf),
    SetFullscreen(bool),
}

/// What a successfully applied command touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    Timer,
    Appearance,
    Unchanged,
}

/// Failures a control action reports back to the user.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Invalid value")]
    InvalidTime(#[from] InputError),
    #[error(transparent)]
    Image(#[from] ImageLoadError),
}

impl ControlError {
    pub fn title(&self) -> &'static str {
        "Error"
    }

    /// Text for the error dialog.
    pub fn message(&self) -> String {
        match self {
            ControlError::InvalidTime(_) => "Invalid value".to_string(),
            ControlError::Image(err) => format!("Error on loading file {}", err.path.display()),
        }
    }
}

/// Turns control-window input into settings mutations and timer calls.
///
/// Holds the editable text of the two time fields and a mirror of the
/// countdown text fed by the engine's update callback.
pub struct ControlSurface {
    pub preset_field: String,
    pub clock_field: String,
    timer_text: Rc<RefCell<String>>,
}

impl ControlSurface {
    pub fn new(preset_field: impl Into<String>, clock_field: impl Into<String>) -> Self {
        Self {
            preset_field: preset_field.into(),
            clock_field: clock_field.into(),
            timer_text: Rc::new(RefCell::new(String::new())),
        }
    }

    /// Registers this surface as the engine's update callback, replacing
    /// any earlier one.
    pub fn attach(&self, engine: &mut TimerEngine) {
        let mirror = Rc::clone(&self.timer_text);
        *mirror.borrow_mut() = engine.text().to_string();
        engine.set_update_callback(move |text| {
            let mut mirror = mirror.borrow_mut();
            mirror.clear();
            mirror.push_str(text);
        });
    }

    /// Countdown text as last reported by the engine.
    pub fn timer_text(&self) -> String {
        self.timer_text.borrow().clone()
    }

    pub fn can_start(&self, engine: &TimerEngine) -> bool {
        !engine.is_running()
    }

    pub fn can_stop(&self, engine: &TimerEngine) -> bool {
        engine.is_running()
    }

    /// Applies `command`. On error nothing was changed.
    pub fn apply(
        &mut self,
        command: ControlCommand,
        settings: &mut Settings,
        engine: &mut TimerEngine,
        renderer: &mut AppearanceRenderer,
    ) -> Result<ControlOutcome, ControlError> {
        log::debug!("Applying control command {:?}", command);

        let outcome = match command {
            ControlCommand::StartTimer => {
                engine.start();
                ControlOutcome::Timer
            }
            ControlCommand::StopTimer => {
                engine.stop();
                ControlOutcome::Timer
            }
            ControlCommand::ResetTimer => {
                engine.reset();
                ControlOutcome::Timer
            }
            ControlCommand::PresetTimer => {
                let duration = parse_preset_duration(&self.preset_field)?;
                engine.set_countdown(duration);
                ControlOutcome::Timer
            }
            ControlCommand::CountdownToClock => {
                let time = parse_clock_time(&self.clock_field)?;
                let target = next_occurrence(time, engine.now())?;
                if !engine.set_countdown_to_time(target) {
                    log::info!("Countdown target {} is not in the future", target);
                }
                engine.start();
                ControlOutcome::Timer
            }
            ControlCommand::SetAlignment(alignment) => {
                settings.alignment = alignment;
                ControlOutcome::Appearance
            }
            ControlCommand::SetBackgroundMode(mode) => {
                settings.mode = mode;
                ControlOutcome::Appearance
            }
            ControlCommand::SetMarginX(margin) => {
                settings.margin_x = margin.clamp(0, MAX_MARGIN);
                ControlOutcome::Appearance
            }
            ControlCommand::SetMarginY(margin) => {
                settings.margin_y = margin.clamp(0, MAX_MARGIN);
                ControlOutcome::Appearance
            }
            ControlCommand::SetTextColor(color) => {
                settings.text_color = color;
                ControlOutcome::Appearance
            }
            ControlCommand::SetBackgroundColor(color) => {
                settings.background_color = color;
                ControlOutcome::Appearance
            }
            ControlCommand::SetFont(font) => {
                settings.font = FontSpec {
                    size: font.size.clamp(1, MAX_FONT_SIZE),
                    ..font
                };
                ControlOutcome::Appearance
            }
            ControlCommand::ChooseBackgroundImage(path) => {
                let image = load_background_image(&path)?;
                let absolute = std::path::absolute(&path).unwrap_or(path);
                log::info!("Background image set to {}", absolute.display());
                settings.background_image = Some(Arc::new(image));
                settings.image_path = Some(absolute);
                ControlOutcome::Appearance
            }
            ControlCommand::SetFullscreen(fullscreen) => {
                if settings.fullscreen == fullscreen {
                    ControlOutcome::Unchanged
                } else {
                    settings.fullscreen = fullscreen;
                    ControlOutcome::Appearance
                }
            }
        };

        if outcome == ControlOutcome::Appearance {
            renderer.refresh(settings);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::{FontStyle, WindowBounds};
    use crate::services::timer::ManualClock;
    use chrono::{Local, TimeZone, Timelike};
    use pretty_assertions::assert_eq;

    struct Fixture {
        surface: ControlSurface,
        settings: Settings,
        engine: TimerEngine,
        renderer: AppearanceRenderer,
        clock: ManualClock,
    }

    impl Fixture {
        fn new() -> Self {
            let start = Local
                .with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
                .earliest()
                .unwrap();
            let clock = ManualClock::new(start);
            let mut engine = TimerEngine::new(Box::new(clock.clone()));
            let settings = Settings::defaults(WindowBounds::new(0, 0, 1920, 1080));
            let renderer = AppearanceRenderer::new(&settings);
            let surface = ControlSurface::new("00:05:00", "10:00 h");
            surface.attach(&mut engine);
            Self {
                surface,
                settings,
                engine,
                renderer,
                clock,
            }
        }

        fn apply(&mut self, command: ControlCommand) -> Result<ControlOutcome, ControlError> {
            self.surface.apply(
                command,
                &mut self.settings,
                &mut self.engine,
                &mut self.renderer,
            )
        }
    }

    #[test]
    fn test_preset_sets_countdown_and_mirrors_text() {
        let mut fx = Fixture::new();
        fx.surface.preset_field = "00:02:30".to_string();

        assert_eq!(fx.apply(ControlCommand::PresetTimer).unwrap(), ControlOutcome::Timer);
        assert_eq!(fx.engine.state().reset_value, 150);
        assert_eq!(fx.surface.timer_text(), "00:02:30");
    }

    #[test]
    fn test_malformed_preset_is_discarded() {
        let mut fx = Fixture::new();
        fx.apply(ControlCommand::PresetTimer).unwrap();
        fx.surface.preset_field = "five minutes".to_string();

        let err = fx.apply(ControlCommand::PresetTimer).unwrap_err();
        assert_eq!(err.message(), "Invalid value");
        assert_eq!(fx.engine.state().reset_value, 300);
    }

    #[test]
    fn test_start_stop_toggle_buttons() {
        let mut fx = Fixture::new();
        assert!(fx.surface.can_start(&fx.engine));
        assert!(!fx.surface.can_stop(&fx.engine));

        fx.apply(ControlCommand::StartTimer).unwrap();
        assert!(!fx.surface.can_start(&fx.engine));
        assert!(fx.surface.can_stop(&fx.engine));

        fx.apply(ControlCommand::StopTimer).unwrap();
        assert!(fx.surface.can_start(&fx.engine));
    }

    #[test]
    fn test_reset_after_ticks_mirrors_preset() {
        let mut fx = Fixture::new();
        fx.apply(ControlCommand::PresetTimer).unwrap();
        fx.apply(ControlCommand::StartTimer).unwrap();
        fx.clock.advance_secs(30);
        fx.engine.poll();
        assert_eq!(fx.surface.timer_text(), "00:04:30");

        fx.apply(ControlCommand::ResetTimer).unwrap();
        assert_eq!(fx.surface.timer_text(), "00:05:00");
    }

    #[test]
    fn test_countdown_to_clock_later_today_starts_timer() {
        let mut fx = Fixture::new();

        fx.apply(ControlCommand::CountdownToClock).unwrap();

        assert_eq!(fx.engine.state().reset_value, 3600);
        assert!(fx.engine.is_running());
    }

    #[test]
    fn test_countdown_to_clock_in_the_past_rolls_to_tomorrow() {
        let mut fx = Fixture::new();
        fx.surface.clock_field = "08:00".to_string();

        fx.apply(ControlCommand::CountdownToClock).unwrap();

        assert_eq!(fx.engine.state().reset_value, 23 * 3600);
        assert_eq!(fx.engine.now().hour(), 9);
    }

    #[test]
    fn test_bad_clock_time_leaves_timer_stopped() {
        let mut fx = Fixture::new();
        fx.surface.clock_field = "25:00".to_string();

        assert!(matches!(
            fx.apply(ControlCommand::CountdownToClock),
            Err(ControlError::InvalidTime(_))
        ));
        assert!(!fx.engine.is_running());
    }

    #[test]
    fn test_appearance_commands_refresh_renderer() {
        let mut fx = Fixture::new();

        let outcome = fx.apply(ControlCommand::SetAlignment(Alignment::BottomLeft)).unwrap();
        assert_eq!(outcome, ControlOutcome::Appearance);
        assert_eq!(fx.renderer.style().alignment, Alignment::BottomLeft);

        fx.apply(ControlCommand::SetTextColor(RgbColor::new(255, 0, 0))).unwrap();
        assert_eq!(fx.renderer.style().text_color, RgbColor::new(255, 0, 0));
        assert_eq!(fx.renderer.generation(), 2);
    }

    #[test]
    fn test_margins_are_clamped() {
        let mut fx = Fixture::new();
        fx.apply(ControlCommand::SetMarginX(-5)).unwrap();
        fx.apply(ControlCommand::SetMarginY(20_000)).unwrap();
        assert_eq!((fx.settings.margin_x, fx.settings.margin_y), (0, MAX_MARGIN));
    }

    #[test]
    fn test_font_change_scales_overlay() {
        let mut fx = Fixture::new();
        fx.apply(ControlCommand::SetFont(FontSpec::new("monospace", FontStyle::ITALIC, 30)))
            .unwrap();
        assert_eq!(fx.settings.font, FontSpec::new("monospace", FontStyle::ITALIC, 30));
        assert_eq!(fx.renderer.style().pixel_size, 120.0);
    }

    #[test]
    fn test_huge_font_size_is_capped() {
        let mut fx = Fixture::new();
        fx.apply(ControlCommand::SetFont(FontSpec::new("serif", FontStyle::PLAIN, 100_000)))
            .unwrap();
        assert_eq!(fx.settings.font.size, MAX_FONT_SIZE);
        assert_eq!(fx.renderer.style().pixel_size, MAX_FONT_SIZE as f32 * 4.0);
    }

    #[test]
    fn test_failed_image_keeps_previous_state() {
        let mut fx = Fixture::new();
        fx.settings.mode = BackgroundMode::Image;
        fx.settings.image_path = Some(PathBuf::from("/old/bg.png"));
        let before = fx.settings.clone();
        let generation = fx.renderer.generation();

        let err = fx
            .apply(ControlCommand::ChooseBackgroundImage(PathBuf::from("/missing/new.png")))
            .unwrap_err();

        assert!(err.message().contains("/missing/new.png"));
        assert_eq!(fx.settings, before);
        assert_eq!(fx.renderer.generation(), generation);
    }

    #[test]
    fn test_choose_image_stores_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 255, 255]))
            .save(&path)
            .unwrap();
        let mut fx = Fixture::new();

        fx.apply(ControlCommand::ChooseBackgroundImage(path.clone())).unwrap();

        let stored = fx.settings.image_path.clone().unwrap();
        assert!(stored.is_absolute());
        assert_eq!(stored.file_name(), path.file_name());
        assert_eq!(fx.settings.background_image.as_ref().map(|i| i.width), Some(2));
        // Choosing a picture does not switch the mode by itself.
        assert_eq!(fx.settings.mode, BackgroundMode::Color);
    }

    #[cfg(unix)]
    #[test]
    fn test_chosen_image_path_keeps_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("real.png");
        image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]))
            .save(&target)
            .unwrap();
        let link = dir.path().join("link.png");
        std::os::unix::fs::symlink(&target, &link).unwrap();
        let mut fx = Fixture::new();

        fx.apply(ControlCommand::ChooseBackgroundImage(link.clone())).unwrap();

        assert_eq!(fx.settings.image_path, Some(link));
    }

    #[test]
    fn test_fullscreen_toggle_reports_unchanged() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.apply(ControlCommand::SetFullscreen(true)).unwrap(),
            ControlOutcome::Unchanged
        );
        assert_eq!(
            fx.apply(ControlCommand::SetFullscreen(false)).unwrap(),
            ControlOutcome::Appearance
        );
        assert!(!fx.settings.fullscreen);
    }
}
