//! Image generation: API client and the single-flight orchestrator

pub mod client;
pub mod orchestrator;

pub use client::{enhance_prompt, HttpImageClient, ImageService};
pub use orchestrator::{BatchOutcome, Orchestrator, Timings};
