//! Core library for the `weathernow` assistant.
//!
//! This crate defines:
//! - Shared domain models (places, readings, ask requests)
//! - The rule-based answer composer and its advice rules
//! - Answer backends and the fallback chain over them
//! - Weather lookup via Open-Meteo
//! - Configuration handling and the HTTP API
//!
//! It is used by `weathernow-cli`, but can also be reused by other binaries or services.

pub mod advice;
pub mod api;
pub mod assistant;
pub mod composer;
pub mod condition;
pub mod config;
pub mod model;
pub mod provider;

pub use assistant::{AnswerBackend, Answered, BackendId, FallbackChain};
pub use composer::compose;
pub use condition::Condition;
pub use config::{AssistantSettings, Config, ServerSettings, WeatherSettings};
pub use model::{AskRequest, AskResponse, Place, Snapshot, WeatherReading};
pub use provider::{LookupError, WeatherProvider, provider_from_config};
