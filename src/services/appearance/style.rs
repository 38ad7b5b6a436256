use std::sync::Arc;

use crate::models::settings::{
    Alignment, BackgroundImage, BackgroundMode, FontSpec, RgbColor, Settings, MAX_FONT_SIZE,
};

/// The overlay draws the clock at this multiple of the configured font size.
pub const FONT_SCALE: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundFill {
    Solid(RgbColor),
    Image(Arc<BackgroundImage>),
    /// Nothing is drawn; the compositor shows through.
    None,
}

/// Everything the overlay needs from [`Settings`] to paint a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub font: FontSpec,
    pub pixel_size: f32,
    pub text_color: RgbColor,
    pub background: BackgroundFill,
    pub alignment: Alignment,
    pub margin_x: i32,
    pub margin_y: i32,
}

impl OverlayStyle {
    pub fn from_settings(settings: &Settings) -> Self {
        let background = match settings.mode {
            BackgroundMode::Color => BackgroundFill::Solid(settings.background_color),
            BackgroundMode::Image => match &settings.background_image {
                Some(image) => BackgroundFill::Image(Arc::clone(image)),
                None => BackgroundFill::None,
            },
            BackgroundMode::Transparent => BackgroundFill::None,
        };

        Self {
            font: settings.font.clone(),
            pixel_size: settings.font.size.clamp(1, MAX_FONT_SIZE) as f32 * FONT_SCALE,
            text_color: settings.text_color,
            background,
            alignment: settings.alignment,
            margin_x: settings.margin_x,
            margin_y: settings.margin_y,
        }
    }
}
