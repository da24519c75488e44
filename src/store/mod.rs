//! Application state store
//!
//! The store pairs the pure reducer with the repository: `dispatch` applies
//! a transition and then runs the matching persistence effect. This is the
//! only place state transitions and the repository interact, so the reducer
//! stays testable in isolation.

pub mod reducer;

pub use reducer::{reduce, StoreAction, MAX_IMAGES};

use crate::model::AppState;
use crate::storage::ImageStore;

/// The authoritative state container, synchronized to the repository
pub struct Store {
    state: AppState,
    repo: ImageStore,
}

impl Store {
    pub fn new(repo: ImageStore) -> Self {
        Self {
            state: AppState::new(),
            repo,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn repo(&self) -> &ImageStore {
        &self.repo
    }

    /// One-time load on startup: the only automatic repository read
    pub fn hydrate(&mut self) {
        let images = self.repo.images();
        let settings = self.repo.settings();
        self.dispatch(StoreAction::SetImages(images));
        self.dispatch(StoreAction::UpdateSettings(settings.into()));
    }

    /// Apply a transition, then run its post-transition persistence effect
    pub fn dispatch(&mut self, action: StoreAction) {
        self.state = reduce(&self.state, action.clone());

        match action {
            // Persist a new image only when auto-save is on
            StoreAction::AddImage(ref image) => {
                if self.state.settings.auto_save {
                    self.repo.save_image(image);
                }
            }
            StoreAction::DeleteImage(ref id) => self.repo.delete_image(id),
            StoreAction::ToggleFavorite(ref id) => self.repo.toggle_favorite(id),
            StoreAction::UpdateSettings(ref patch) => self.repo.save_settings(patch),
            StoreAction::ResetSettings => self.repo.reset_settings(),
            // Pure view transitions never touch the repository
            StoreAction::SetImages(_)
            | StoreAction::SetGenerating(_)
            | StoreAction::SetGenerationProgress(_)
            | StoreAction::ClearGenerationProgress => {}
        }
    }

    /// Bulk-clear: empty the in-memory list and delete the stored record
    pub fn clear_all_images(&mut self) {
        self.dispatch(StoreAction::SetImages(Vec::new()));
        self.repo.clear_all_images();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GeneratedImage, GenerationSettings, SettingsPatch};
    use tempfile::TempDir;

    fn test_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(ImageStore::with_dir(dir.path()));
        (dir, store)
    }

    fn image(prompt: &str) -> GeneratedImage {
        GeneratedImage::new(
            prompt.to_string(),
            "http://x/img.png".to_string(),
            GenerationSettings::default(),
        )
    }

    #[test]
    fn test_add_image_persists_when_auto_save_on() {
        let (_dir, mut store) = test_store();
        store.dispatch(StoreAction::AddImage(image("saved")));

        assert_eq!(store.state().images.len(), 1);
        assert_eq!(store.repo().images().len(), 1);
    }

    #[test]
    fn test_add_image_skips_persistence_when_auto_save_off() {
        let (_dir, mut store) = test_store();
        store.dispatch(StoreAction::UpdateSettings(SettingsPatch {
            auto_save: Some(false),
            ..Default::default()
        }));

        store.dispatch(StoreAction::AddImage(image("unsaved")));

        assert_eq!(store.state().images.len(), 1);
        assert!(store.repo().images().is_empty());
    }

    #[test]
    fn test_delete_and_toggle_always_persist() {
        let (_dir, mut store) = test_store();
        let img = image("a");
        let id = img.id.clone();
        store.dispatch(StoreAction::AddImage(img));

        store.dispatch(StoreAction::ToggleFavorite(id.clone()));
        assert!(store.repo().images()[0].favorite);

        store.dispatch(StoreAction::DeleteImage(id));
        assert!(store.state().images.is_empty());
        assert!(store.repo().images().is_empty());
    }

    #[test]
    fn test_hydrate_loads_both_records() {
        let (dir, mut store) = test_store();
        store.dispatch(StoreAction::AddImage(image("persisted")));
        store.dispatch(StoreAction::UpdateSettings(SettingsPatch {
            auto_save: Some(false),
            ..Default::default()
        }));

        let mut fresh = Store::new(ImageStore::with_dir(dir.path()));
        fresh.hydrate();

        assert_eq!(fresh.state().images.len(), 1);
        assert_eq!(fresh.state().images[0].prompt, "persisted");
        assert!(!fresh.state().settings.auto_save);
    }

    #[test]
    fn test_clear_all_images() {
        let (_dir, mut store) = test_store();
        store.dispatch(StoreAction::AddImage(image("a")));
        store.dispatch(StoreAction::AddImage(image("b")));

        store.clear_all_images();

        assert!(store.state().images.is_empty());
        assert!(store.repo().images().is_empty());
    }
}
