//! Core domain types for labelens.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies: the analysis-service wire contract, the chat transcript
//! model, summary emphasis markup, captured images, and the view states the
//! flow controller moves between. Everything here can be used from any layer
//! of the application.

mod analysis;
mod chat;
mod image;
mod markup;
mod view;

pub use analysis::{AnalysisResult, Certainty, Impact, KeyPoint, ScoreVerdict};
pub use chat::{ChatMessage, ChatRole};
pub use image::{CapturedImage, ImageDecodeError};
pub use markup::{Emphasis, SummarySegment, parse_summary, strip_markup};
pub use view::{ChatPane, ViewState};
