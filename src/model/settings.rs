//! Persisted user preferences

use serde::{Deserialize, Serialize};

use super::image::{AspectRatio, GenerationStyle};

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn all() -> [Theme; 3] {
        [Theme::Light, Theme::Dark, Theme::System]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

/// Per-installation user settings.
///
/// Fields missing from the stored JSON fall back to their defaults, so
/// settings written by older versions keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub theme: Theme,
    pub default_aspect_ratio: AspectRatio,
    pub default_style: GenerationStyle,
    pub auto_save: bool,
    pub show_advanced_controls: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            default_aspect_ratio: AspectRatio::Square,
            default_style: GenerationStyle::Photorealistic,
            auto_save: true,
            show_advanced_controls: false,
        }
    }
}

/// A partial settings update: only the populated fields change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub default_aspect_ratio: Option<AspectRatio>,
    pub default_style: Option<GenerationStyle>,
    pub auto_save: Option<bool>,
    pub show_advanced_controls: Option<bool>,
}

impl SettingsPatch {
    /// Shallow-merge this patch over a base settings value
    pub fn apply(&self, base: &UserSettings) -> UserSettings {
        UserSettings {
            theme: self.theme.unwrap_or(base.theme),
            default_aspect_ratio: self
                .default_aspect_ratio
                .unwrap_or(base.default_aspect_ratio),
            default_style: self.default_style.unwrap_or(base.default_style),
            auto_save: self.auto_save.unwrap_or(base.auto_save),
            show_advanced_controls: self
                .show_advanced_controls
                .unwrap_or(base.show_advanced_controls),
        }
    }
}

impl From<UserSettings> for SettingsPatch {
    /// A full patch that replaces every field (used when hydrating from disk)
    fn from(settings: UserSettings) -> Self {
        Self {
            theme: Some(settings.theme),
            default_aspect_ratio: Some(settings.default_aspect_ratio),
            default_style: Some(settings.default_style),
            auto_save: Some(settings.auto_save),
            show_advanced_controls: Some(settings.show_advanced_controls),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let settings = UserSettings::default();
        assert_eq!(settings.theme, Theme::System);
        assert_eq!(settings.default_aspect_ratio, AspectRatio::Square);
        assert_eq!(settings.default_style, GenerationStyle::Photorealistic);
        assert!(settings.auto_save);
        assert!(!settings.show_advanced_controls);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        // Only the theme is stored; everything else merges from defaults
        let settings: UserSettings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.auto_save);
        assert_eq!(settings.default_style, GenerationStyle::Photorealistic);
    }

    #[test]
    fn test_patch_applies_only_populated_fields() {
        let base = UserSettings::default();
        let patch = SettingsPatch {
            auto_save: Some(false),
            default_style: Some(GenerationStyle::Anime),
            ..Default::default()
        };

        let merged = patch.apply(&base);
        assert!(!merged.auto_save);
        assert_eq!(merged.default_style, GenerationStyle::Anime);
        assert_eq!(merged.theme, base.theme);
        assert_eq!(merged.default_aspect_ratio, base.default_aspect_ratio);
    }

    #[test]
    fn test_full_patch_from_settings_replaces_everything() {
        let stored = UserSettings {
            theme: Theme::Light,
            auto_save: false,
            ..Default::default()
        };

        let patch: SettingsPatch = stored.clone().into();
        let merged = patch.apply(&UserSettings::default());
        assert_eq!(merged, stored);
    }
}
