use super::layout::{place_label, LabelPlacement, SurfaceSize};
use super::style::{BackgroundFill, OverlayStyle};
use crate::models::settings::Settings;

/// How much of the overlay has to be redrawn after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepaintKind {
    None,
    TextOnly,
    Full,
}

/// One frame's worth of drawing instructions.
#[derive(Debug, Clone, Copy)]
pub struct OverlayFrame<'a> {
    pub style: &'a OverlayStyle,
    pub background: &'a BackgroundFill,
    pub text: &'a str,
    pub placement: LabelPlacement,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CachedLayout {
    surface: SurfaceSize,
    label: SurfaceSize,
    placement: LabelPlacement,
}

/// Turns [`Settings`] and the current countdown text into overlay frames.
///
/// The style is rebuilt on every settings change. The label placement is
/// cached and only recomputed when the style, the surface, the measured
/// label size or the text length changes.
pub struct AppearanceRenderer {
    style: OverlayStyle,
    text: String,
    layout: Option<CachedLayout>,
    generation: u64,
}

impl AppearanceRenderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            style: OverlayStyle::from_settings(settings),
            text: String::new(),
            layout: None,
            generation: 0,
        }
    }

    /// Rebuilds the style after any settings change.
    pub fn refresh(&mut self, settings: &Settings) -> RepaintKind {
        self.style = OverlayStyle::from_settings(settings);
        self.layout = None;
        self.generation += 1;
        log::debug!(
            "Appearance refreshed (generation {}): {:?} at {}px, {:?}",
            self.generation,
            self.style.alignment,
            self.style.pixel_size,
            settings.mode
        );
        RepaintKind::Full
    }

    pub fn set_text(&mut self, text: &str) -> RepaintKind {
        if self.text == text {
            return RepaintKind::None;
        }
        if self.text.chars().count() != text.chars().count() {
            self.layout = None;
        }
        self.text.clear();
        self.text.push_str(text);
        RepaintKind::TextOnly
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Incremented on every [`refresh`](Self::refresh).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn needs_layout(&self) -> bool {
        self.layout.is_none()
    }

    /// Produces the frame for a surface, given the measured size of the text.
    pub fn compose(&mut self, surface: SurfaceSize, label: SurfaceSize) -> OverlayFrame<'_> {
        let placement = match self.layout {
            Some(cached) if cached.surface == surface && cached.label == label => cached.placement,
            _ => {
                let placement = place_label(
                    surface,
                    label,
                    self.style.alignment,
                    self.style.margin_x,
                    self.style.margin_y,
                );
                if placement.clipped {
                    log::debug!(
                        "Countdown label {:?} does not fit inside {:?}",
                        label,
                        placement.clip
                    );
                }
                self.layout = Some(CachedLayout {
                    surface,
                    label,
                    placement,
                });
                placement
            }
        };

        OverlayFrame {
            style: &self.style,
            background: &self.style.background,
            text: &self.text,
            placement,
        }
    }
}
