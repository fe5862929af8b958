//! Display preferences and their persistence.
//!
//! [`ThemeSettings`] is a plain value owned by a single [`Preferences`] object
//! that the application passes down to rendering. Preferences read from a
//! [`SettingsStore`] once on start-up and write back on every change.

use crate::error::SettingsError;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

/// A closed set of options that can be cycled through in the settings view.
pub trait Choice: Copy + PartialEq + 'static {
    /// Every option in display order.
    const ALL: &'static [Self];

    /// Label shown in the settings view.
    fn label(self) -> &'static str;

    #[must_use]
    /// The option after (or before) this one, wrapping around.
    fn cycle(self, forward: bool) -> Self {
        let len = Self::ALL.len();
        let pos = Self::ALL.iter().position(|&c| c == self).unwrap_or(0);
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        Self::ALL[next]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Background and text colours.
pub enum ColorScheme {
    /// Dark text on white.
    Light,
    /// Light text on near-black.
    #[default]
    Dark,
    /// Brown text on cream.
    Sepia,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Typeface style; selects the modern or traditional paragraph layout.
pub enum FontFamily {
    /// Modern block paragraphs.
    #[default]
    Sans,
    /// Traditional paragraphs with an indented first line.
    Serif,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Text size; a larger size means a narrower measure.
pub enum FontSize {
    /// Widest measure.
    Small,
    /// Default measure.
    #[default]
    Medium,
    /// Narrower measure.
    Large,
    /// Narrowest measure.
    Xlarge,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Space between paragraphs.
pub enum LineSpacing {
    /// No blank line between paragraphs.
    Compact,
    /// One blank line.
    #[default]
    Normal,
    /// Two blank lines.
    Relaxed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Horizontal padding around the text.
pub enum MarginWidth {
    /// Two columns.
    Narrow,
    /// Four columns.
    #[default]
    Medium,
    /// Eight columns.
    Wide,
}

impl Choice for ColorScheme {
    const ALL: &'static [Self] = &[Self::Light, Self::Dark, Self::Sepia];

    fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::Sepia => "Sepia",
        }
    }
}

impl Choice for FontFamily {
    const ALL: &'static [Self] = &[Self::Sans, Self::Serif];

    fn label(self) -> &'static str {
        match self {
            Self::Sans => "Sans (modern)",
            Self::Serif => "Serif (traditional)",
        }
    }
}

impl Choice for FontSize {
    const ALL: &'static [Self] = &[Self::Small, Self::Medium, Self::Large, Self::Xlarge];

    fn label(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
            Self::Xlarge => "Extra large",
        }
    }
}

impl Choice for LineSpacing {
    const ALL: &'static [Self] = &[Self::Compact, Self::Normal, Self::Relaxed];

    fn label(self) -> &'static str {
        match self {
            Self::Compact => "Compact",
            Self::Normal => "Normal",
            Self::Relaxed => "Relaxed",
        }
    }
}

impl Choice for MarginWidth {
    const ALL: &'static [Self] = &[Self::Narrow, Self::Medium, Self::Wide];

    fn label(self) -> &'static str {
        match self {
            Self::Narrow => "Narrow",
            Self::Medium => "Medium",
            Self::Wide => "Wide",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Colours used when drawing.
pub struct Palette {
    /// Page background.
    pub background: Color,
    /// Body text.
    pub text: Color,
    /// Headings of lesser importance, status text.
    pub secondary: Color,
    /// Borders and separators.
    pub border: Color,
    /// Background of the cursor row in lists.
    pub hover: Color,
    /// Active section, selection and accents.
    pub active: Color,
}

impl ColorScheme {
    #[must_use]
    /// Palette for this scheme.
    pub fn palette(self) -> Palette {
        match self {
            Self::Light => Palette {
                background: Color::Rgb(0xff, 0xff, 0xff),
                text: Color::Rgb(0x1a, 0x20, 0x2c),
                secondary: Color::Rgb(0x4a, 0x55, 0x68),
                border: Color::Rgb(0xe2, 0xe8, 0xf0),
                hover: Color::Rgb(0xed, 0xf2, 0xf7),
                active: Color::Rgb(0x31, 0x82, 0xce),
            },
            Self::Dark => Palette {
                background: Color::Rgb(0x1a, 0x20, 0x2c),
                text: Color::Rgb(0xf7, 0xfa, 0xfc),
                secondary: Color::Rgb(0xa0, 0xae, 0xc0),
                border: Color::Rgb(0x2d, 0x37, 0x48),
                hover: Color::Rgb(0x2d, 0x37, 0x48),
                active: Color::Rgb(0x31, 0x82, 0xce),
            },
            Self::Sepia => Palette {
                background: Color::Rgb(0xf8, 0xf1, 0xe3),
                text: Color::Rgb(0x4b, 0x36, 0x21),
                secondary: Color::Rgb(0x5f, 0x4c, 0x32),
                border: Color::Rgb(0xe6, 0xd7, 0xbf),
                hover: Color::Rgb(0xf0, 0xe5, 0xd1),
                active: Color::Rgb(0x95, 0x77, 0x46),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Everything the reader lets the user restyle.
pub struct ThemeSettings {
    /// Colours.
    pub color_scheme: ColorScheme,
    /// Paragraph layout style.
    pub font_family: FontFamily,
    /// Text measure.
    pub font_size: FontSize,
    /// Paragraph spacing.
    pub line_spacing: LineSpacing,
    /// Horizontal padding.
    pub margin_width: MarginWidth,
}

impl ThemeSettings {
    #[must_use]
    /// Maximum text width in columns.
    pub fn measure(&self) -> u16 {
        match self.font_size {
            FontSize::Small => 100,
            FontSize::Medium => 88,
            FontSize::Large => 76,
            FontSize::Xlarge => 64,
        }
    }

    #[must_use]
    /// Blank lines between paragraphs.
    pub fn paragraph_gap(&self) -> usize {
        match self.line_spacing {
            LineSpacing::Compact => 0,
            LineSpacing::Normal => 1,
            LineSpacing::Relaxed => 2,
        }
    }

    #[must_use]
    /// Columns of padding on each side of the text.
    pub fn padding(&self) -> u16 {
        match self.margin_width {
            MarginWidth::Narrow => 2,
            MarginWidth::Medium => 4,
            MarginWidth::Wide => 8,
        }
    }

    #[must_use]
    /// Indent for the first line of each paragraph.
    pub fn first_line_indent(&self) -> &'static str {
        match self.font_family {
            FontFamily::Sans => "",
            FontFamily::Serif => "    ",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Rows of the settings view.
pub enum SettingField {
    /// [`ThemeSettings::color_scheme`].
    ColorScheme,
    /// [`ThemeSettings::font_family`].
    FontFamily,
    /// [`ThemeSettings::font_size`].
    FontSize,
    /// [`ThemeSettings::line_spacing`].
    LineSpacing,
    /// [`ThemeSettings::margin_width`].
    MarginWidth,
}

impl SettingField {
    /// Rows in display order.
    pub const ALL: [Self; 5] = [
        Self::ColorScheme,
        Self::FontFamily,
        Self::FontSize,
        Self::LineSpacing,
        Self::MarginWidth,
    ];

    #[must_use]
    /// Row label.
    pub fn label(self) -> &'static str {
        match self {
            Self::ColorScheme => "Color scheme",
            Self::FontFamily => "Font",
            Self::FontSize => "Text size",
            Self::LineSpacing => "Line spacing",
            Self::MarginWidth => "Margins",
        }
    }

    #[must_use]
    /// Current value's label.
    pub fn value(self, settings: &ThemeSettings) -> &'static str {
        match self {
            Self::ColorScheme => settings.color_scheme.label(),
            Self::FontFamily => settings.font_family.label(),
            Self::FontSize => settings.font_size.label(),
            Self::LineSpacing => settings.line_spacing.label(),
            Self::MarginWidth => settings.margin_width.label(),
        }
    }

    /// Moves this field to its next or previous option.
    pub fn cycle(self, settings: &mut ThemeSettings, forward: bool) {
        match self {
            Self::ColorScheme => settings.color_scheme = settings.color_scheme.cycle(forward),
            Self::FontFamily => settings.font_family = settings.font_family.cycle(forward),
            Self::FontSize => settings.font_size = settings.font_size.cycle(forward),
            Self::LineSpacing => settings.line_spacing = settings.line_spacing.cycle(forward),
            Self::MarginWidth => settings.margin_width = settings.margin_width.cycle(forward),
        }
    }
}

/// Persists display preferences.
pub trait SettingsStore {
    /// Reads saved settings; `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if saved settings exist but cannot be read.
    fn load(&self) -> Result<Option<ThemeSettings>, SettingsError>;

    /// Saves settings, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be written.
    fn save(&mut self, settings: &ThemeSettings) -> Result<(), SettingsError>;
}

#[derive(Clone, Debug)]
/// Stores settings as a JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    /// Uses the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Option<ThemeSettings>, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SettingsError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&mut self, settings: &ThemeSettings) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[derive(Clone, Debug, Default)]
/// Keeps settings in memory; used when persistence is disabled.
pub struct MemoryStore {
    /// Last saved settings.
    pub saved: Option<ThemeSettings>,
    /// Number of saves performed.
    pub writes: usize,
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<ThemeSettings>, SettingsError> {
        Ok(self.saved)
    }

    fn save(&mut self, settings: &ThemeSettings) -> Result<(), SettingsError> {
        self.saved = Some(*settings);
        self.writes += 1;
        Ok(())
    }
}

/// Owner of the live display settings.
pub struct Preferences {
    settings: ThemeSettings,
    store: Box<dyn SettingsStore>,
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Preferences {
    #[must_use]
    /// Reads settings from `store`, falling back to defaults.
    ///
    /// Unreadable saved settings are logged and replaced by defaults rather
    /// than preventing start-up.
    pub fn load(store: Box<dyn SettingsStore>) -> Self {
        let settings = match store.load() {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring saved display settings");
                ThemeSettings::default()
            }
        };
        Self { settings, store }
    }

    #[must_use]
    /// Current settings.
    pub fn settings(&self) -> &ThemeSettings {
        &self.settings
    }

    /// Applies a change and persists it if anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write; the in-memory settings
    /// keep the change.
    pub fn update(&mut self, change: impl FnOnce(&mut ThemeSettings)) -> Result<(), SettingsError> {
        let mut next = self.settings;
        change(&mut next);
        if next == self.settings {
            return Ok(());
        }
        self.settings = next;
        tracing::debug!(settings = ?self.settings, "display settings changed");
        self.store.save(&self.settings)
    }
}

#[cfg(test)]
#[path = "tests/theme.rs"]
mod tests;
