//! Vesna core: the persona's affect model and per-turn decision structures.
//!
//! This crate owns the emotion classifier, the mood state machine with its
//! transition tables, the response-profile selector, configuration, and the
//! memory collaborator contract. Text transformation lives in
//! `vesna_expression`; orchestration in `vesna_reasoning`.

pub mod clock;
pub mod config;
pub mod emotion;
pub mod memory;
pub mod mood;
pub mod profile;
pub mod transitions;

pub use clock::{Season, TimeOfDay};
pub use config::{
    AttentionConfig, LlmConfig, PersonaConfig, PipelineConfig, ProactiveConfig, VesnaConfig,
};
pub use emotion::{classify, EmotionTag};
pub use memory::{ConversationTurn, InMemoryStore, MemoryStore, UserProfile};
pub use mood::{MoodLabel, MoodSnapshot, MoodState};
pub use profile::{select as select_profile, ReactionMode, ResponseProfile, RhythmMode};
