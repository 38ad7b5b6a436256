use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use super::keys;
use super::mapper::PreferenceReader;
use super::SettingsError;
use crate::models::settings::{
    Alignment, BackgroundImage, BackgroundMode, FontSpec, FontStyle, RgbColor, Settings,
    WindowBounds, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_MARGIN, MAX_FONT_SIZE,
};
use crate::services::appearance::load_background_image;
use crate::services::preferences::PreferenceStore;

pub struct SettingsService<'a> {
    store: &'a dyn PreferenceStore,
}

impl<'a> SettingsService<'a> {
    pub fn new(store: &'a dyn PreferenceStore) -> Self {
        Self { store }
    }

    /// Factory settings placed on `default_bounds`, without touching the store.
    pub fn load_defaults(default_bounds: WindowBounds) -> Settings {
        Settings::defaults(default_bounds)
    }

    /// Reads every field from the store, using the factory default for
    /// missing keys.
    pub fn load(&self, default_bounds: WindowBounds) -> Result<Settings, SettingsError> {
        let reader = PreferenceReader::new(self.store);

        let stored_size = reader.int_or(keys::FONT_SIZE, DEFAULT_FONT_SIZE)?;
        let size = stored_size.clamp(1, MAX_FONT_SIZE);
        if size != stored_size {
            log::warn!("Stored font size {} out of range, using {}", stored_size, size);
        }
        let font = FontSpec {
            family: reader.string_or(keys::FONT_NAME, DEFAULT_FONT_FAMILY)?,
            style: FontStyle::from_bits(reader.int_or(keys::FONT_STYLE, FontStyle::PLAIN.bits())?),
            size,
        };
        let text_color = reader.int_or(keys::TEXT_COLOR, RgbColor::WHITE.to_packed())?;
        let background_color = reader.int_or(keys::BG_COLOR, RgbColor::BLACK.to_packed())?;
        let bounds = WindowBounds {
            x: reader.int_or(keys::BOUNDS_X, default_bounds.x)?,
            y: reader.int_or(keys::BOUNDS_Y, default_bounds.y)?,
            width: reader.int_or(keys::BOUNDS_W, default_bounds.width)?,
            height: reader.int_or(keys::BOUNDS_H, default_bounds.height)?,
        };

        let mut settings = Settings {
            font,
            text_color: RgbColor::from_packed(text_color),
            mode: reader.enum_or(keys::MODE, BackgroundMode::Color)?,
            image_path: None,
            background_image: None,
            background_color: RgbColor::from_packed(background_color),
            alignment: reader.enum_or(keys::ALIGNMENT, Alignment::MiddleCenter)?,
            margin_x: reader.int_or(keys::MARGIN_X, DEFAULT_MARGIN)?,
            margin_y: reader.int_or(keys::MARGIN_Y, DEFAULT_MARGIN)?,
            bounds,
            fullscreen: reader.bool_or(keys::FULLSCREEN, true)?,
        };

        if let Some(raw) = reader.string(keys::IMAGE_PATH)? {
            let path = PathBuf::from(raw);
            settings.background_image = decode_stored_image(&path);
            settings.image_path = Some(path);
        }

        log::info!(
            "Loaded settings: {} {} at {:?}",
            settings.font,
            settings.mode,
            settings.bounds
        );
        Ok(settings)
    }

    /// Writes every field. `imagePath` is only written when an image is set.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let store = self.store;

        store.put(keys::FONT_NAME, &settings.font.family)?;
        store.put_int(keys::FONT_STYLE, settings.font.style.bits())?;
        store.put_int(keys::FONT_SIZE, settings.font.size)?;
        store.put(keys::ALIGNMENT, settings.alignment.name())?;
        store.put(keys::MODE, settings.mode.name())?;
        store.put_int(keys::TEXT_COLOR, settings.text_color.to_packed())?;
        store.put_int(keys::BG_COLOR, settings.background_color.to_packed())?;
        store.put_int(keys::MARGIN_X, settings.margin_x)?;
        store.put_int(keys::MARGIN_Y, settings.margin_y)?;
        store.put_int(keys::BOUNDS_X, settings.bounds.x)?;
        store.put_int(keys::BOUNDS_Y, settings.bounds.y)?;
        store.put_int(keys::BOUNDS_W, settings.bounds.width)?;
        store.put_int(keys::BOUNDS_H, settings.bounds.height)?;
        if let Some(path) = &settings.image_path {
            match path.to_str() {
                Some(text) => store
                    .put(keys::IMAGE_PATH, text)
                    .with_context(|| format!("Failed to store image path {}", path.display()))?,
                None => log::warn!(
                    "Image path {} is not valid UTF-8, keeping the stored one",
                    path.display()
                ),
            }
        }
        store.put_bool(keys::FULLSCREEN, settings.fullscreen)?;

        log::info!("Saved settings");
        Ok(())
    }
}

fn decode_stored_image(path: &Path) -> Option<Arc<BackgroundImage>> {
    match load_background_image(path) {
        Ok(image) => Some(Arc::new(image)),
        Err(err) => {
            log::warn!("Ignoring stored background image: {:#}", anyhow::Error::new(err));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::appearance::{OverlayStyle, FONT_SCALE};
    use crate::services::preferences::{MemoryPreferenceStore, MockPreferenceStore};
    use anyhow::anyhow;
    use pretty_assertions::assert_eq;

    const SCREEN: WindowBounds = WindowBounds::new(0, 0, 1920, 1080);

    fn customised() -> Settings {
        let mut settings = Settings::defaults(SCREEN);
        settings.font = FontSpec::new("monospace", FontStyle::BOLD_ITALIC, 72);
        settings.text_color = RgbColor::new(255, 200, 0);
        settings.background_color = RgbColor::new(10, 20, 30);
        settings.mode = BackgroundMode::Transparent;
        settings.alignment = Alignment::TopRight;
        settings.margin_x = 0;
        settings.margin_y = 125;
        settings.bounds = WindowBounds::new(-1920, 40, 800, 600);
        settings.fullscreen = false;
        settings
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let store = MemoryPreferenceStore::new();
        let loaded = SettingsService::new(&store).load(SCREEN).unwrap();
        assert_eq!(loaded, SettingsService::load_defaults(SCREEN));
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = MemoryPreferenceStore::new();
        let service = SettingsService::new(&store);
        let settings = customised();

        service.save(&settings).unwrap();
        let loaded = service.load(SCREEN).unwrap();

        assert_eq!(loaded, settings);
        assert!(!store.contains_key(keys::IMAGE_PATH));
    }

    #[test]
    fn test_huge_stored_font_size_is_capped() {
        let store = MemoryPreferenceStore::new();
        store.put(keys::FONT_SIZE, "100000").unwrap();

        let loaded = SettingsService::new(&store).load(SCREEN).unwrap();

        assert_eq!(loaded.font.size, MAX_FONT_SIZE);
        let style = OverlayStyle::from_settings(&loaded);
        assert!(style.pixel_size <= MAX_FONT_SIZE as f32 * FONT_SCALE);
    }

    #[test]
    fn test_non_positive_stored_font_size_becomes_one() {
        let store = MemoryPreferenceStore::new();
        store.put(keys::FONT_SIZE, "0").unwrap();
        let loaded = SettingsService::new(&store).load(SCREEN).unwrap();
        assert_eq!(loaded.font.size, 1);
    }

    #[test]
    fn test_stored_values_use_legacy_encoding() {
        let store = MemoryPreferenceStore::new();
        SettingsService::new(&store).save(&customised()).unwrap();

        assert_eq!(store.get(keys::ALIGNMENT).unwrap().as_deref(), Some("TOP_RIGHT"));
        assert_eq!(store.get(keys::MODE).unwrap().as_deref(), Some("TRANSPARENT"));
        assert_eq!(store.get(keys::FONT_STYLE).unwrap().as_deref(), Some("3"));
        assert_eq!(store.get(keys::FULLSCREEN).unwrap().as_deref(), Some("false"));
        assert_eq!(store.get(keys::TEXT_COLOR).unwrap().as_deref(), Some("-14336"));
    }

    #[test]
    fn test_unknown_alignment_fails_load() {
        let store = MemoryPreferenceStore::new();
        store.put(keys::ALIGNMENT, "CENTER").unwrap();

        let err = SettingsService::new(&store).load(SCREEN).unwrap_err();
        assert_eq!(err.to_string(), "invalid value 'CENTER' for preference 'alignment'");
    }

    #[test]
    fn test_unreadable_image_keeps_path_without_pixels() {
        let store = MemoryPreferenceStore::new();
        store.put(keys::MODE, "IMAGE").unwrap();
        store.put(keys::IMAGE_PATH, "/does/not/exist.png").unwrap();

        let loaded = SettingsService::new(&store).load(SCREEN).unwrap();

        assert_eq!(loaded.mode, BackgroundMode::Image);
        assert_eq!(loaded.image_path, Some(PathBuf::from("/does/not/exist.png")));
        assert!(loaded.background_image.is_none());
    }

    #[test]
    fn test_stored_image_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();
        let mut settings = Settings::defaults(SCREEN);
        settings.image_path = Some(path.clone());
        let store = MemoryPreferenceStore::new();
        let service = SettingsService::new(&store);

        service.save(&settings).unwrap();
        let loaded = service.load(SCREEN).unwrap();

        let image = loaded.background_image.unwrap();
        assert_eq!((image.width, image.height), (3, 2));
        assert_eq!(loaded.image_path, Some(path));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_image_path_is_not_mangled() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let store = MemoryPreferenceStore::new();
        store.put(keys::IMAGE_PATH, "/pictures/old.png").unwrap();
        let mut settings = customised();
        settings.image_path = Some(PathBuf::from(OsStr::from_bytes(b"/pictures/\xff.png")));

        SettingsService::new(&store).save(&settings).unwrap();

        assert_eq!(
            store.get(keys::IMAGE_PATH).unwrap().as_deref(),
            Some("/pictures/old.png")
        );
        assert_eq!(store.get(keys::FULLSCREEN).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_store_failure_surfaces_as_settings_error() {
        let mut store = MockPreferenceStore::new();
        store
            .expect_get()
            .returning(|_| Err(anyhow!("disk I/O error")));

        let err = SettingsService::new(&store).load(SCREEN).unwrap_err();

        assert!(matches!(err, SettingsError::Store(_)));
        assert!(err.to_string().contains("disk I/O error"));
    }

    #[test]
    fn test_save_stops_at_first_store_failure() {
        let mut store = MockPreferenceStore::new();
        store
            .expect_put()
            .times(1)
            .returning(|_, _| Err(anyhow!("read-only database")));

        let err = SettingsService::new(&store).save(&customised()).unwrap_err();
        assert!(err.to_string().contains("read-only database"));
    }
}
