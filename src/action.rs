//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use std::fmt;

/// All possible actions in the application. The `Display` impl feeds the
/// debug-level action trace in the main event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for polling background generation
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to next screen tab
    NextScreen,
    /// Move to previous screen tab
    PrevScreen,
    /// Move to next item in the current list
    NextItem,
    /// Move to previous item in the current list
    PrevItem,
    /// Jump to first item
    FirstItem,
    /// Jump to last item
    LastItem,

    // ─────────────────────────────────────────────────────────────────────────
    // Prompt Editing
    // ─────────────────────────────────────────────────────────────────────────
    /// Start editing the prompt
    EnterPromptMode,
    /// Stop editing the prompt
    ExitPromptMode,
    /// Add character to the prompt
    PromptInput(char),
    /// Remove last character from the prompt
    PromptBackspace,

    // ─────────────────────────────────────────────────────────────────────────
    // Generation
    // ─────────────────────────────────────────────────────────────────────────
    /// Submit the current prompt and options for generation
    StartGeneration,
    /// Cancel the in-flight generation (local state only)
    CancelGeneration,
    /// Reset the generation form to the configured defaults
    ResetForm,
    /// Select the next form field
    NextField,
    /// Select the previous form field
    PrevField,
    /// Cycle the selected option forward
    CycleForward,
    /// Cycle the selected option backward
    CycleBackward,

    // ─────────────────────────────────────────────────────────────────────────
    // Gallery
    // ─────────────────────────────────────────────────────────────────────────
    /// Flip the favorite flag on the selected image
    ToggleFavorite,
    /// Delete the selected image
    DeleteImage,
    /// Toggle the favorites-only filter
    ToggleFavoritesFilter,
    /// Write the gallery and settings to a backup file
    ExportGallery,
    /// Replace the gallery and settings from a backup file
    ImportGallery,

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// Restore all settings to their defaults
    ResetSettings,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open clear-all confirmation dialog
    OpenClearAllDialog,
    /// Open the gallery statistics overlay
    OpenStats,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextScreen => write!(f, "NextScreen"),
            Action::PrevScreen => write!(f, "PrevScreen"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::FirstItem => write!(f, "FirstItem"),
            Action::LastItem => write!(f, "LastItem"),
            Action::EnterPromptMode => write!(f, "EnterPromptMode"),
            Action::ExitPromptMode => write!(f, "ExitPromptMode"),
            Action::PromptInput(c) => write!(f, "PromptInput('{}')", c),
            Action::PromptBackspace => write!(f, "PromptBackspace"),
            Action::StartGeneration => write!(f, "StartGeneration"),
            Action::CancelGeneration => write!(f, "CancelGeneration"),
            Action::ResetForm => write!(f, "ResetForm"),
            Action::NextField => write!(f, "NextField"),
            Action::PrevField => write!(f, "PrevField"),
            Action::CycleForward => write!(f, "CycleForward"),
            Action::CycleBackward => write!(f, "CycleBackward"),
            Action::ToggleFavorite => write!(f, "ToggleFavorite"),
            Action::DeleteImage => write!(f, "DeleteImage"),
            Action::ToggleFavoritesFilter => write!(f, "ToggleFavoritesFilter"),
            Action::ExportGallery => write!(f, "ExportGallery"),
            Action::ImportGallery => write!(f, "ImportGallery"),
            Action::ResetSettings => write!(f, "ResetSettings"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenClearAllDialog => write!(f, "OpenClearAllDialog"),
            Action::OpenStats => write!(f, "OpenStats"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_payloads() {
        assert_eq!(Action::Tick.to_string(), "Tick");
        assert_eq!(Action::Resize(80, 24).to_string(), "Resize(80, 24)");
        assert_eq!(Action::PromptInput('x').to_string(), "PromptInput('x')");
    }
}
