// Preference keys, shared with settings files written by earlier releases.

pub const FONT_NAME: &str = "fontName";
pub const FONT_STYLE: &str = "fontStyle";
pub const FONT_SIZE: &str = "fontSize";
pub const ALIGNMENT: &str = "alignment";
pub const MODE: &str = "mode";
pub const TEXT_COLOR: &str = "textColor";
pub const BG_COLOR: &str = "bgColor";
pub const MARGIN_X: &str = "marginX";
pub const MARGIN_Y: &str = "marginY";
pub const BOUNDS_X: &str = "boundsX";
pub const BOUNDS_Y: &str = "boundsY";
pub const BOUNDS_W: &str = "boundsW";
pub const BOUNDS_H: &str = "boundsH";
pub const IMAGE_PATH: &str = "imagePath";
pub const FULLSCREEN: &str = "fullscreen";
