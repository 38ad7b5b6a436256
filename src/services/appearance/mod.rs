//! Maps [`Settings`](crate::models::settings::Settings) to what the overlay
//! draws: background fill, clock font and label placement.

mod background;
mod layout;
mod renderer;
mod style;

pub use background::{fit_texture_side, load_background_image, ImageLoadError};
pub use layout::{place_label, LabelPlacement, PixelRect, SurfaceSize};
pub use renderer::{AppearanceRenderer, OverlayFrame, RepaintKind};
pub use style::{BackgroundFill, OverlayStyle, FONT_SCALE};
