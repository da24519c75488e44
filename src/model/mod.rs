//! Model layer - centralized state and domain types
//!
//! This module contains all state-related types:
//! - `image` - Generation domain types (images, settings, requests)
//! - `settings` - Persisted user preferences
//! - `state` - The in-memory `AppState` snapshot
//! - `modal` - Modal overlay management
//! - `ui` - Presentation state (screens)

pub mod image;
pub mod modal;
pub mod settings;
pub mod state;
pub mod ui;

// Re-export commonly used types
pub use image::{
    AspectRatio, GeneratedImage, GenerationRequest, GenerationResponse, GenerationSettings,
    GenerationStyle, MAX_PROMPT_LEN,
};
pub use settings::{SettingsPatch, Theme, UserSettings};
pub use state::{AppState, GenerationProgress};
