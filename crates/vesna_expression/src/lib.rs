//! Expression layer: turns raw model output into something a specific
//! person would actually say, and decides when she speaks unprompted.
//!
//! The response pipeline is a fixed sequence of small passes, each with a
//! single concern; the attention and proactive schedulers own the
//! unprompted-message budget.

pub mod attention;
pub mod coherence;
pub mod context;
pub mod emoji;
pub mod imperfection;
pub mod intonation;
pub mod micro;
pub mod naming;
pub mod overlay;
pub mod persona_touch;
pub mod pipeline;
pub mod proactive;
pub mod repeat;
pub mod sanitize;
pub mod sensory;
pub mod split;
pub mod tense;
pub mod textutil;

pub use attention::{AttentionPhase, AttentionState};
pub use context::StageContext;
pub use pipeline::Pipeline;
pub use proactive::{ProactiveAction, ProactiveEvent, ProactiveState};
pub use repeat::QuestionRateTracker;
pub use split::{split_reply, SplitReply};
