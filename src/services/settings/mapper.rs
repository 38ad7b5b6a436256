use std::str::FromStr;

use crate::services::preferences::PreferenceStore;

use super::SettingsError;

/// Typed reads over a [`PreferenceStore`], falling back to a default when a
/// key is absent.
pub struct PreferenceReader<'a> {
    store: &'a dyn PreferenceStore,
}

impl<'a> PreferenceReader<'a> {
    pub fn new(store: &'a dyn PreferenceStore) -> Self {
        Self { store }
    }

    pub fn string(&self, key: &'static str) -> Result<Option<String>, SettingsError> {
        Ok(self.store.get(key)?)
    }

    pub fn string_or(&self, key: &'static str, default: &str) -> Result<String, SettingsError> {
        Ok(self.string(key)?.unwrap_or_else(|| default.to_string()))
    }

    pub fn int_or(&self, key: &'static str, default: i32) -> Result<i32, SettingsError> {
        self.parsed_or(key, default, |raw| raw.trim().parse::<i32>().ok())
    }

    pub fn bool_or(&self, key: &'static str, default: bool) -> Result<bool, SettingsError> {
        self.parsed_or(key, default, |raw| match raw.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        })
    }

    pub fn enum_or<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, SettingsError> {
        self.parsed_or(key, default, |raw| raw.parse::<T>().ok())
    }

    fn parsed_or<T>(
        &self,
        key: &'static str,
        default: T,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> Result<T, SettingsError> {
        match self.string(key)? {
            None => Ok(default),
            Some(raw) => parse(&raw).ok_or(SettingsError::InvalidValue { key, value: raw }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::Alignment;
    use crate::services::preferences::MemoryPreferenceStore;

    #[test]
    fn test_missing_keys_use_defaults() {
        let store = MemoryPreferenceStore::new();
        let reader = PreferenceReader::new(&store);

        assert_eq!(reader.int_or("marginX", 50).unwrap(), 50);
        assert!(reader.bool_or("fullscreen", true).unwrap());
        assert_eq!(
            reader.enum_or("alignment", Alignment::MiddleCenter).unwrap(),
            Alignment::MiddleCenter
        );
    }

    #[test]
    fn test_bad_integer_names_key_and_value() {
        let store = MemoryPreferenceStore::new();
        store.put("marginX", "fifty").unwrap();

        let err = PreferenceReader::new(&store).int_or("marginX", 50).unwrap_err();

        assert!(matches!(
            err,
            SettingsError::InvalidValue { key: "marginX", ref value } if value == "fifty"
        ));
    }

    #[test]
    fn test_bool_accepts_only_true_or_false() {
        let store = MemoryPreferenceStore::new();
        store.put("fullscreen", "yes").unwrap();
        let reader = PreferenceReader::new(&store);
        assert!(reader.bool_or("fullscreen", true).is_err());

        store.put("fullscreen", "false").unwrap();
        assert!(!reader.bool_or("fullscreen", true).unwrap());
    }
}
