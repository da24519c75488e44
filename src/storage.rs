//! Local repository for images and settings
//!
//! Persists two JSON records under the app's home directory: the gallery
//! (`images.json`, newest first, capped at 100 entries) and the user
//! settings (`settings.json`). Every write is best-effort: storage failures
//! are logged and swallowed so the caller never sees them.

use chrono::{DateTime, Duration, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{GeneratedImage, SettingsPatch, UserSettings};

/// Maximum number of images kept in the stored gallery
pub const MAX_STORED_IMAGES: usize = 100;

const IMAGES_FILE: &str = "images.json";
const SETTINGS_FILE: &str = "settings.json";
const EXPORT_VERSION: &str = "1.0";

/// Derived read-only aggregate over the stored gallery
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationStats {
    pub total_images: usize,
    pub favorite_count: usize,
    /// Images generated within the trailing 7 days
    pub recent_images: usize,
    /// Usage count per style label (unset style counts as photorealistic)
    pub style_counts: HashMap<String, usize>,
    pub oldest_image: Option<DateTime<Utc>>,
    pub newest_image: Option<DateTime<Utc>>,
}

/// Export payload: both records plus versioning metadata
#[derive(Debug, Serialize, Deserialize)]
struct ExportPayload {
    images: Vec<GeneratedImage>,
    settings: UserSettings,
    // Metadata is informational; imports tolerate its absence
    #[serde(rename = "exportDate", default)]
    export_date: String,
    #[serde(default)]
    version: String,
}

/// File-backed repository for the gallery and user settings
pub struct ImageStore {
    base_dir: PathBuf,
}

impl ImageStore {
    /// Repository rooted at `~/.pixgen`
    pub fn new() -> Self {
        let base_dir = env::var("HOME")
            .map(|home| PathBuf::from(home).join(".pixgen"))
            .unwrap_or_else(|_| PathBuf::from(".pixgen"));
        Self { base_dir }
    }

    /// Repository rooted at an explicit directory (tests, portable installs)
    pub fn with_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn images_path(&self) -> PathBuf {
        self.base_dir.join(IMAGES_FILE)
    }

    fn settings_path(&self) -> PathBuf {
        self.base_dir.join(SETTINGS_FILE)
    }

    /// Write a JSON value to a record file, creating the directory if needed.
    /// Failures are logged and swallowed.
    fn write_record<T: Serialize>(&self, path: &Path, value: &T) {
        if !self.base_dir.exists() {
            if let Err(e) = fs::create_dir_all(&self.base_dir) {
                warn!("failed to create {}: {}", self.base_dir.display(), e);
                return;
            }
        }

        let json = match serde_json::to_string_pretty(value) {
            Ok(j) => j,
            Err(e) => {
                warn!("failed to serialize {}: {}", path.display(), e);
                return;
            }
        };

        if let Err(e) = fs::write(path, json) {
            warn!("failed to write {}: {}", path.display(), e);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Image management
    // ─────────────────────────────────────────────────────────────────────────

    /// Prepend an image to the stored gallery, keeping the latest 100
    pub fn save_image(&self, image: &GeneratedImage) {
        let mut images = self.images();
        images.insert(0, image.clone());
        images.truncate(MAX_STORED_IMAGES);
        self.write_record(&self.images_path(), &images);
    }

    /// Load the stored gallery; absent or corrupt records read as empty.
    /// Timestamps come back as `DateTime` values, reconstructed from their
    /// serialized ISO string form.
    pub fn images(&self) -> Vec<GeneratedImage> {
        let path = self.images_path();
        if !path.exists() {
            return Vec::new();
        }

        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!("failed to read {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(images) => images,
            Err(e) => {
                warn!("corrupt image record at {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Remove an image by id; no-op when absent
    pub fn delete_image(&self, image_id: &str) {
        let mut images = self.images();
        images.retain(|img| img.id != image_id);
        self.write_record(&self.images_path(), &images);
    }

    /// Flip the favorite flag on the matching image; no-op when absent
    pub fn toggle_favorite(&self, image_id: &str) {
        let mut images = self.images();
        for img in &mut images {
            if img.id == image_id {
                img.favorite = !img.favorite;
            }
        }
        self.write_record(&self.images_path(), &images);
    }

    pub fn favorite_images(&self) -> Vec<GeneratedImage> {
        self.images().into_iter().filter(|i| i.favorite).collect()
    }

    /// Delete the entire gallery record
    pub fn clear_all_images(&self) {
        let path = self.images_path();
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                warn!("failed to clear {}: {}", path.display(), e);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings management
    // ─────────────────────────────────────────────────────────────────────────

    /// Merge a patch over the stored settings and persist the result
    pub fn save_settings(&self, patch: &SettingsPatch) {
        let merged = patch.apply(&self.settings());
        self.write_record(&self.settings_path(), &merged);
    }

    /// Load settings, merged shallowly with defaults
    pub fn settings(&self) -> UserSettings {
        let path = self.settings_path();
        if !path.exists() {
            return UserSettings::default();
        }

        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!("failed to read {}: {}", path.display(), e);
                return UserSettings::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("corrupt settings record at {}: {}", path.display(), e);
                UserSettings::default()
            }
        }
    }

    /// Delete the stored override so reads fall back to defaults
    pub fn reset_settings(&self) {
        let path = self.settings_path();
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                warn!("failed to reset {}: {}", path.display(), e);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statistics
    // ─────────────────────────────────────────────────────────────────────────

    /// Compute gallery statistics from the stored record. Never cached.
    pub fn generation_stats(&self) -> GenerationStats {
        let images = self.images();
        let week_ago = Utc::now() - Duration::days(7);

        let mut style_counts: HashMap<String, usize> = HashMap::new();
        for img in &images {
            let style = img
                .settings
                .style
                .unwrap_or(crate::model::GenerationStyle::Photorealistic);
            *style_counts.entry(style.label().to_string()).or_insert(0) += 1;
        }

        GenerationStats {
            total_images: images.len(),
            favorite_count: images.iter().filter(|i| i.favorite).count(),
            recent_images: images.iter().filter(|i| i.timestamp > week_ago).count(),
            style_counts,
            oldest_image: images.last().map(|i| i.timestamp),
            newest_image: images.first().map(|i| i.timestamp),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export / Import
    // ─────────────────────────────────────────────────────────────────────────

    /// Serialize both records into a single versioned payload
    pub fn export_data(&self) -> String {
        let payload = ExportPayload {
            images: self.images(),
            settings: self.settings(),
            export_date: Utc::now().to_rfc3339(),
            version: EXPORT_VERSION.to_string(),
        };

        serde_json::to_string_pretty(&payload).unwrap_or_else(|e| {
            warn!("failed to serialize export payload: {}", e);
            String::new()
        })
    }

    /// Replace both stored records from an exported payload.
    ///
    /// Returns false without touching existing data unless the payload is
    /// structurally valid: `images` must be an array of gallery entries and
    /// `settings` must be present.
    pub fn import_data(&self, json: &str) -> bool {
        let payload: ExportPayload = match serde_json::from_str(json) {
            Ok(p) => p,
            Err(e) => {
                warn!("rejected import payload: {}", e);
                return false;
            }
        };

        self.write_record(&self.images_path(), &payload.images);
        self.write_record(&self.settings_path(), &payload.settings);
        true
    }
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new()
    }
}
