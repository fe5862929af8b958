use super::{
    Choice, ColorScheme, FontFamily, FontSize, JsonFileStore, LineSpacing, MarginWidth,
    MemoryStore, Preferences, SettingField, SettingsStore, ThemeSettings,
};
use crate::error::SettingsError;
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

/// A memory store the test can inspect after handing it to [`Preferences`].
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl SettingsStore for SharedStore {
    fn load(&self) -> Result<Option<ThemeSettings>, SettingsError> {
        self.0.borrow().load()
    }

    fn save(&mut self, settings: &ThemeSettings) -> Result<(), SettingsError> {
        self.0.borrow_mut().save(settings)
    }
}

#[test]
fn test_defaults() {
    let settings = ThemeSettings::default();
    assert_eq!(settings.color_scheme, ColorScheme::Dark);
    assert_eq!(settings.font_family, FontFamily::Sans);
    assert_eq!(settings.font_size, FontSize::Medium);
    assert_eq!(settings.line_spacing, LineSpacing::Normal);
    assert_eq!(settings.margin_width, MarginWidth::Medium);
}

#[test]
fn test_rendering_mapping() {
    let mut settings = ThemeSettings::default();
    assert_eq!(settings.measure(), 88);
    assert_eq!(settings.paragraph_gap(), 1);
    assert_eq!(settings.padding(), 4);
    assert_eq!(settings.first_line_indent(), "");

    settings.font_size = FontSize::Xlarge;
    settings.line_spacing = LineSpacing::Relaxed;
    settings.margin_width = MarginWidth::Narrow;
    settings.font_family = FontFamily::Serif;
    assert_eq!(settings.measure(), 64);
    assert_eq!(settings.paragraph_gap(), 2);
    assert_eq!(settings.padding(), 2);
    assert_eq!(settings.first_line_indent(), "    ");
}

#[test]
fn test_choice_cycles_and_wraps() {
    assert_eq!(ColorScheme::Light.cycle(true), ColorScheme::Dark);
    assert_eq!(ColorScheme::Sepia.cycle(true), ColorScheme::Light);
    assert_eq!(ColorScheme::Light.cycle(false), ColorScheme::Sepia);
    assert_eq!(FontSize::Xlarge.cycle(true), FontSize::Small);
}

#[test]
fn test_setting_fields() {
    let mut settings = ThemeSettings::default();
    SettingField::FontSize.cycle(&mut settings, true);
    assert_eq!(settings.font_size, FontSize::Large);
    assert_eq!(SettingField::FontSize.value(&settings), "Large");
    assert_eq!(SettingField::ALL.len(), 5);
}

#[test]
fn test_palettes_differ() {
    let light = ColorScheme::Light.palette();
    let dark = ColorScheme::Dark.palette();
    let sepia = ColorScheme::Sepia.palette();
    assert_ne!(light.background, dark.background);
    assert_ne!(dark.background, sepia.background);
    assert_ne!(light.text, light.background);
}

#[test]
fn test_serialized_names() {
    let json = serde_json::to_string(&ThemeSettings::default()).unwrap();
    assert!(json.contains(r#""colorScheme":"dark""#));
    assert!(json.contains(r#""fontSize":"medium""#));

    let partial: ThemeSettings = serde_json::from_str(r#"{"colorScheme":"sepia"}"#).unwrap();
    assert_eq!(partial.color_scheme, ColorScheme::Sepia);
    assert_eq!(partial.font_size, FontSize::Medium);
}

#[test]
fn test_preferences_read_on_load() {
    let store = SharedStore::default();
    let saved = ThemeSettings {
        color_scheme: ColorScheme::Light,
        ..ThemeSettings::default()
    };
    store.0.borrow_mut().saved = Some(saved);

    let preferences = Preferences::load(Box::new(store.clone()));
    assert_eq!(*preferences.settings(), saved);
    assert_eq!(store.0.borrow().writes, 0);
}

#[test]
fn test_preferences_write_on_change_only() {
    let store = SharedStore::default();
    let mut preferences = Preferences::load(Box::new(store.clone()));

    preferences
        .update(|s| s.color_scheme = ColorScheme::Dark)
        .unwrap();
    assert_eq!(store.0.borrow().writes, 0);

    preferences
        .update(|s| s.color_scheme = ColorScheme::Sepia)
        .unwrap();
    assert_eq!(store.0.borrow().writes, 1);
    assert_eq!(
        store.0.borrow().saved.map(|s| s.color_scheme),
        Some(ColorScheme::Sepia)
    );
}

#[test]
fn test_json_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let mut store = JsonFileStore::new(&path);

    assert!(store.load().unwrap().is_none());

    let settings = ThemeSettings {
        font_family: FontFamily::Serif,
        ..ThemeSettings::default()
    };
    store.save(&settings).unwrap();
    assert_eq!(store.load().unwrap(), Some(settings));
}

#[test]
fn test_unreadable_settings_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "not json").unwrap();

    assert!(matches!(
        JsonFileStore::new(&path).load(),
        Err(SettingsError::Decode(_))
    ));
    let preferences = Preferences::load(Box::new(JsonFileStore::new(&path)));
    assert_eq!(*preferences.settings(), ThemeSettings::default());
}
