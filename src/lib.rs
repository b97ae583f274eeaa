pub mod analyzer;
pub mod config;
pub mod gemini;
pub mod models;
pub mod pipeline;
pub mod service;

pub use analyzer::SymptomAnalyzer;
pub use config::{AnalyzerConfig, FallbackVideos};
pub use models::*;
pub use service::{AppState, create_app};
