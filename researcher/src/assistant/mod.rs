pub mod citation;
pub mod compiler;
pub mod configuration;
pub mod error;
pub mod gemini;
pub mod orchestrator;
pub mod prompts;
pub mod scholar;
pub mod state;
pub mod summarizer;
pub mod wikipedia;
