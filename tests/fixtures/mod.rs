// Test fixtures - reusable test data
// Provides consistent settings and stores across all test files

#![allow(dead_code)]

use std::path::Path;

use countdown_overlay::models::settings::{
    Alignment, BackgroundMode, FontSpec, FontStyle, RgbColor, Settings, WindowBounds,
};
use countdown_overlay::services::database::Database;

/// Bounds of a single 1920x1080 screen at the origin
pub const FULL_HD: WindowBounds = WindowBounds::new(0, 0, 1920, 1080);

/// Settings with every field moved away from its default
pub fn customised_settings() -> Settings {
    let mut settings = Settings::defaults(FULL_HD);
    settings.font = FontSpec::new("sans-serif", FontStyle::BOLD, 64);
    settings.text_color = RgbColor::new(250, 40, 40);
    settings.background_color = RgbColor::new(0, 0, 64);
    settings.mode = BackgroundMode::Transparent;
    settings.alignment = Alignment::BottomRight;
    settings.margin_x = 20;
    settings.margin_y = 300;
    settings.bounds = WindowBounds::new(1920, 0, 2560, 1440);
    settings.fullscreen = false;
    settings
}

/// Opens a preference database in `dir`, creating the schema
pub fn open_db(dir: &Path) -> Database {
    let path = dir.join("preferences.db");
    let db = Database::new(path.to_str().unwrap()).expect("Failed to create database");
    db.initialize_schema().expect("Failed to initialize schema");
    db
}
