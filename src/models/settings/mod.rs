// Settings module
// Appearance and placement of the countdown overlay

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

pub const DEFAULT_FONT_FAMILY: &str = "serif";
pub const DEFAULT_FONT_SIZE: i32 = 40;
pub const DEFAULT_MARGIN: i32 = 50;

/// Largest font size the overlay will draw. Scaled by four it stays well
/// inside the glyph atlas.
pub const MAX_FONT_SIZE: i32 = 500;

/// Upper bound accepted by the margin fields of the control window.
pub const MAX_MARGIN: i32 = 10_000;

/// Returned when a stored enum name does not match any variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Font style bits as stored in preferences (PLAIN = 0, BOLD = 1,
/// ITALIC = 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontStyle(i32);

impl FontStyle {
    pub const PLAIN: Self = Self(0);
    pub const BOLD: Self = Self(1);
    pub const ITALIC: Self = Self(2);
    pub const BOLD_ITALIC: Self = Self(3);

    pub const ALL: [Self; 4] = [Self::PLAIN, Self::BOLD, Self::ITALIC, Self::BOLD_ITALIC];

    /// Unknown bits are dropped.
    pub fn from_bits(bits: i32) -> Self {
        Self(bits & 0b11)
    }

    pub fn bits(self) -> i32 {
        self.0
    }

    pub fn is_bold(self) -> bool {
        self.0 & Self::BOLD.0 != 0
    }

    pub fn is_italic(self) -> bool {
        self.0 & Self::ITALIC.0 != 0
    }

    pub fn label(self) -> &'static str {
        match (self.is_bold(), self.is_italic()) {
            (false, false) => "Plain",
            (true, false) => "Bold",
            (false, true) => "Italic",
            (true, true) => "Bold Italic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSpec {
    pub family: String,
    pub style: FontStyle,
    pub size: i32,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, style: FontStyle, size: i32) -> Self {
        Self {
            family: family.into(),
            style,
            size,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY, FontStyle::PLAIN, DEFAULT_FONT_SIZE)
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.family,
            self.style.label().to_lowercase(),
            self.size
        )
    }
}

/// Opaque 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs as `0xFFRRGGBB` reinterpreted as a signed integer, so white is -1.
    pub fn to_packed(self) -> i32 {
        let argb = 0xFF00_0000u32
            | (u32::from(self.r) << 16)
            | (u32::from(self.g) << 8)
            | u32::from(self.b);
        argb as i32
    }

    /// The alpha byte is ignored.
    pub fn from_packed(value: i32) -> Self {
        let bits = value as u32;
        Self::new((bits >> 16) as u8, (bits >> 8) as u8, bits as u8)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackgroundMode {
    Image,
    #[default]
    Color,
    Transparent,
}

impl BackgroundMode {
    pub const ALL: [Self; 3] = [Self::Image, Self::Color, Self::Transparent];

    /// Name used in the preference store.
    pub fn name(self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
            Self::Color => "COLOR",
            Self::Transparent => "TRANSPARENT",
        }
    }
}

impl fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackgroundMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "background mode",
                value: s.to_string(),
            })
    }
}

/// Horizontal position of an anchor inside its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    Left,
    Center,
    Right,
}

/// Vertical position of an anchor inside its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Top,
    Middle,
    Bottom,
}

/// Where the time label sits on the overlay: one cell of a 3x3 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    #[default]
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Alignment {
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::MiddleLeft,
        Self::MiddleCenter,
        Self::MiddleRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "TOP_LEFT",
            Self::TopCenter => "TOP_CENTER",
            Self::TopRight => "TOP_RIGHT",
            Self::MiddleLeft => "MIDDLE_LEFT",
            Self::MiddleCenter => "MIDDLE_CENTER",
            Self::MiddleRight => "MIDDLE_RIGHT",
            Self::BottomLeft => "BOTTOM_LEFT",
            Self::BottomCenter => "BOTTOM_CENTER",
            Self::BottomRight => "BOTTOM_RIGHT",
        }
    }

    pub fn horizontal(self) -> HorizontalAnchor {
        match self {
            Self::TopLeft | Self::MiddleLeft | Self::BottomLeft => HorizontalAnchor::Left,
            Self::TopCenter | Self::MiddleCenter | Self::BottomCenter => HorizontalAnchor::Center,
            Self::TopRight | Self::MiddleRight | Self::BottomRight => HorizontalAnchor::Right,
        }
    }

    pub fn vertical(self) -> VerticalAnchor {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => VerticalAnchor::Top,
            Self::MiddleLeft | Self::MiddleCenter | Self::MiddleRight => VerticalAnchor::Middle,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => VerticalAnchor::Bottom,
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Alignment {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alignment| alignment.name() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "alignment",
                value: s.to_string(),
            })
    }
}

/// Overlay window position and size in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowBounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Decoded background picture, kept as straight RGBA8 rows.
#[derive(Clone, PartialEq, Eq)]
pub struct BackgroundImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub font: FontSpec,
    pub text_color: RgbColor,
    pub mode: BackgroundMode,
    pub image_path: Option<PathBuf>,
    /// Derived from `image_path`; never persisted.
    pub background_image: Option<Arc<BackgroundImage>>,
    pub background_color: RgbColor,
    pub alignment: Alignment,
    pub margin_x: i32,
    pub margin_y: i32,
    pub bounds: WindowBounds,
    pub fullscreen: bool,
}

impl Settings {
    /// Factory defaults, placed on `default_bounds`.
    pub fn defaults(default_bounds: WindowBounds) -> Self {
        Self {
            font: FontSpec::default(),
            text_color: RgbColor::WHITE,
            mode: BackgroundMode::Color,
            image_path: None,
            background_image: None,
            background_color: RgbColor::BLACK,
            alignment: Alignment::MiddleCenter,
            margin_x: DEFAULT_MARGIN,
            margin_y: DEFAULT_MARGIN,
            bounds: default_bounds,
            fullscreen: true,
        }
    }
}
