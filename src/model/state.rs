//! In-memory application state snapshot

use super::image::GeneratedImage;
use super::settings::UserSettings;

/// Progress of the generation currently in flight.
///
/// The percentages follow a fixed script driven by the orchestrator; they do
/// not reflect real backend progress (the upstream call is a single
/// request/response with no streaming).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationProgress {
    pub prompt: String,
    /// 0-100
    pub progress: u8,
    pub status: String,
}

/// The single authoritative projection the UI renders from.
///
/// Mutated only through [`crate::store::reduce`]; every transition produces
/// a new snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    /// Gallery, newest first, capped at [`crate::store::MAX_IMAGES`]
    pub images: Vec<GeneratedImage>,
    /// True while a generation is in flight (the single-flight guard)
    pub is_generating: bool,
    /// Present iff a generation is in flight or just ended
    pub current_generation: Option<GenerationProgress>,
    pub settings: UserSettings,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
