//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering
//! logic. Components communicate through Actions rather than direct state
//! mutation.

pub mod clear_all_dialog;
pub mod gallery;
pub mod generate;
pub mod help_dialog;
pub mod layout;
pub mod quit_dialog;
pub mod settings;
pub mod stats_dialog;

pub use clear_all_dialog::ClearAllDialog;
pub use gallery::GalleryComponent;
pub use generate::GenerateComponent;
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;
pub use settings::SettingsComponent;
pub use stats_dialog::StatsDialog;
