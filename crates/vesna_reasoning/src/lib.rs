//! Reasoning layer: model providers, template fallback, and the engine
//! that drives one conversation.

pub mod engine;
pub mod fallback;
pub mod llm;
pub mod prompts;
pub mod providers;
pub mod retry;

pub use engine::{Engine, IdleMessage, TurnOutput};
pub use llm::{ChatMessage, Completion, CompletionParams, LlmClient, Role};
pub use providers::OpenAiClient;
pub use vesna_expression::ProactiveAction;
