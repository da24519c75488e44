//! Pure state transitions
//!
//! Every transition is a total function of (state, action) -> next state and
//! produces a new snapshot; nothing here touches the repository or performs
//! any other side effect.

use crate::model::{AppState, GeneratedImage, GenerationProgress, SettingsPatch, UserSettings};

/// Maximum number of images held in state; oldest are evicted first
pub const MAX_IMAGES: usize = 100;

/// The complete transition vocabulary of the state store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    /// Replace the image list wholesale (load, import)
    SetImages(Vec<GeneratedImage>),
    /// Prepend a freshly generated image
    AddImage(GeneratedImage),
    /// Remove an image by id
    DeleteImage(String),
    /// Flip the favorite flag on an image by id
    ToggleFavorite(String),
    SetGenerating(bool),
    SetGenerationProgress(GenerationProgress),
    ClearGenerationProgress,
    /// Shallow-merge a settings patch
    UpdateSettings(SettingsPatch),
    ResetSettings,
}

/// Apply one transition, producing the next state snapshot
pub fn reduce(state: &AppState, action: StoreAction) -> AppState {
    match action {
        StoreAction::SetImages(images) => AppState {
            images,
            ..state.clone()
        },

        StoreAction::AddImage(image) => {
            let mut images = Vec::with_capacity((state.images.len() + 1).min(MAX_IMAGES));
            images.push(image);
            images.extend(state.images.iter().cloned());
            images.truncate(MAX_IMAGES);
            AppState {
                images,
                ..state.clone()
            }
        }

        StoreAction::DeleteImage(id) => AppState {
            images: state
                .images
                .iter()
                .filter(|img| img.id != id)
                .cloned()
                .collect(),
            ..state.clone()
        },

        StoreAction::ToggleFavorite(id) => AppState {
            images: state
                .images
                .iter()
                .map(|img| {
                    if img.id == id {
                        GeneratedImage {
                            favorite: !img.favorite,
                            ..img.clone()
                        }
                    } else {
                        img.clone()
                    }
                })
                .collect(),
            ..state.clone()
        },

        StoreAction::SetGenerating(is_generating) => AppState {
            is_generating,
            ..state.clone()
        },

        StoreAction::SetGenerationProgress(progress) => AppState {
            current_generation: Some(progress),
            ..state.clone()
        },

        StoreAction::ClearGenerationProgress => AppState {
            current_generation: None,
            ..state.clone()
        },

        StoreAction::UpdateSettings(patch) => AppState {
            settings: patch.apply(&state.settings),
            ..state.clone()
        },

        StoreAction::ResetSettings => AppState {
            settings: UserSettings::default(),
            ..state.clone()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GenerationSettings, Theme};

    fn image(id: &str) -> GeneratedImage {
        GeneratedImage {
            id: id.to_string(),
            prompt: format!("prompt {}", id),
            image_url: format!("http://x/{}.png", id),
            timestamp: chrono::Utc::now(),
            settings: GenerationSettings::default(),
            favorite: false,
        }
    }

    #[test]
    fn test_add_image_prepends_newest_first() {
        let mut state = AppState::new();
        state = reduce(&state, StoreAction::AddImage(image("a")));
        state = reduce(&state, StoreAction::AddImage(image("b")));

        assert_eq!(state.images.len(), 2);
        assert_eq!(state.images[0].id, "b");
        assert_eq!(state.images[1].id, "a");
    }

    #[test]
    fn test_add_image_caps_list_dropping_oldest() {
        let mut state = AppState::new();
        for i in 0..MAX_IMAGES + 10 {
            state = reduce(&state, StoreAction::AddImage(image(&i.to_string())));
        }

        assert_eq!(state.images.len(), MAX_IMAGES);
        assert_eq!(state.images[0].id, (MAX_IMAGES + 9).to_string());
        assert_eq!(state.images.last().unwrap().id, "10");
    }

    #[test]
    fn test_delete_image_removes_only_matching() {
        let mut state = AppState::new();
        state = reduce(&state, StoreAction::AddImage(image("a")));
        state = reduce(&state, StoreAction::AddImage(image("b")));

        state = reduce(&state, StoreAction::DeleteImage("a".to_string()));
        assert_eq!(state.images.len(), 1);
        assert_eq!(state.images[0].id, "b");

        // Deleting a non-existent id leaves the list unchanged
        let unchanged = reduce(&state, StoreAction::DeleteImage("zzz".to_string()));
        assert_eq!(unchanged.images, state.images);
    }

    #[test]
    fn test_toggle_favorite_is_involutive() {
        let mut state = AppState::new();
        state = reduce(&state, StoreAction::AddImage(image("a")));

        let once = reduce(&state, StoreAction::ToggleFavorite("a".to_string()));
        assert!(once.images[0].favorite);

        let twice = reduce(&once, StoreAction::ToggleFavorite("a".to_string()));
        assert_eq!(twice.images[0].favorite, state.images[0].favorite);
    }

    #[test]
    fn test_progress_transitions() {
        let mut state = AppState::new();
        state = reduce(&state, StoreAction::SetGenerating(true));
        assert!(state.is_generating);

        state = reduce(
            &state,
            StoreAction::SetGenerationProgress(GenerationProgress {
                prompt: "p".to_string(),
                progress: 50,
                status: "Generating image...".to_string(),
            }),
        );
        assert_eq!(state.current_generation.as_ref().unwrap().progress, 50);

        state = reduce(&state, StoreAction::ClearGenerationProgress);
        assert!(state.current_generation.is_none());
    }

    #[test]
    fn test_settings_update_and_reset() {
        let mut state = AppState::new();
        state = reduce(
            &state,
            StoreAction::UpdateSettings(SettingsPatch {
                theme: Some(Theme::Dark),
                ..Default::default()
            }),
        );
        assert_eq!(state.settings.theme, Theme::Dark);
        assert!(state.settings.auto_save);

        state = reduce(&state, StoreAction::ResetSettings);
        assert_eq!(state.settings, UserSettings::default());
    }

    #[test]
    fn test_transitions_do_not_disturb_unrelated_state() {
        let mut state = AppState::new();
        state = reduce(&state, StoreAction::AddImage(image("a")));
        state = reduce(&state, StoreAction::SetGenerating(true));

        let next = reduce(
            &state,
            StoreAction::UpdateSettings(SettingsPatch {
                auto_save: Some(false),
                ..Default::default()
            }),
        );
        assert_eq!(next.images, state.images);
        assert!(next.is_generating);
    }
}
