//! Turn orchestrator.
//!
//! Owns all per-conversation state behind one lock and wires the layers
//! together: classification, mood update, profile selection, generation
//! with fallback, the response pipeline, and the idle schedulers.

use crate::fallback::{fallback_reply, looks_like_refusal};
use crate::llm::{ChatMessage, CompletionParams, LlmClient};
use crate::prompts::{compose_system, history_messages};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use vesna_core::clock::{Season, TimeOfDay};
use vesna_core::config::VesnaConfig;
use vesna_core::emotion::{classify, EmotionTag};
use vesna_core::memory::MemoryStore;
use vesna_core::mood::{MoodSnapshot, MoodState};
use vesna_core::profile::{select as select_profile, ReactionMode};
use vesna_expression::{
    split_reply, AttentionState, Pipeline, ProactiveAction, ProactiveState, QuestionRateTracker,
    StageContext,
};

const HISTORY_TURNS: usize = 12;
const BUSY_QUIET_MINUTES: i64 = 90;

const BUSY_MARKERS: &[&str] = &[
    "занят",
    "занята",
    "позже",
    "не могу говорить",
    "на работе",
    "на паре",
];

pub struct TurnOutput {
    pub reply: String,
    pub extra_messages: Vec<String>,
    pub mood: MoodSnapshot,
    pub emotion: EmotionTag,
}

pub struct IdleMessage {
    pub text: String,
    /// Set when the proactive scheduler (not the attention one) fired.
    pub action: Option<ProactiveAction>,
}

struct Session {
    mood: MoodState,
    attention: AttentionState,
    proactive: ProactiveState,
    question_history: QuestionRateTracker,
    prev_reply: Option<String>,
    prev_reaction: Option<ReactionMode>,
    prev_opened_with_name: bool,
    last_topic: Option<String>,
    rng: StdRng,
}

pub struct Engine {
    config: VesnaConfig,
    llm: Arc<dyn LlmClient>,
    memory: Arc<dyn MemoryStore>,
    session: Mutex<Session>,
}

impl Engine {
    pub fn new(config: VesnaConfig, llm: Arc<dyn LlmClient>, memory: Arc<dyn MemoryStore>) -> Self {
        let now = Utc::now();
        let rng = match config.persona.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let question_history = QuestionRateTracker::new(config.pipeline.question_window);
        Self {
            config,
            llm,
            memory,
            session: Mutex::new(Session {
                mood: MoodState::new(now),
                attention: AttentionState::new(now),
                proactive: ProactiveState::new(now),
                question_history,
                prev_reply: None,
                prev_reaction: None,
                prev_opened_with_name: false,
                last_topic: None,
                rng,
            }),
        }
    }

    pub async fn process_turn(&self, user_text: &str) -> Result<TurnOutput> {
        let now = Utc::now();
        self.process_turn_at(user_text, now).await
    }

    /// Same as `process_turn` with an explicit clock, for tests.
    pub async fn process_turn_at(&self, user_text: &str, now: DateTime<Utc>) -> Result<TurnOutput> {
        let tod = TimeOfDay::from_datetime(now);
        let season = Season::from_datetime(now);
        let emotion = classify(user_text);
        debug!(?emotion, "turn classified");

        // The session lock is taken before the memory reads and held across
        // the final append: concurrent turns must each see the other's
        // history, in order.
        let mut guard = self.session.lock().await;

        let idle = self.memory.time_since_last_turn(now).await?;
        let user = self.memory.user_profile().await?;
        let history = self.memory.recent_turns(HISTORY_TURNS).await?;

        // Split borrows once: the pipeline context holds shared references
        // into the session while the rng is borrowed mutably.
        let Session {
            mood,
            attention,
            proactive: _,
            question_history,
            prev_reply,
            prev_reaction,
            prev_opened_with_name,
            last_topic,
            rng,
        } = &mut *guard;

        mood.update(now, tod, emotion, true, &mut *rng);
        attention.note_interaction(now);

        let lower = user_text.to_lowercase();
        if BUSY_MARKERS.iter().any(|m| lower.contains(m)) {
            attention.note_busy(now, BUSY_QUIET_MINUTES);
        }

        let profile = select_profile(emotion, tod, user_text, *prev_reaction, &mut *rng);

        let system = compose_system(mood, &profile, tod, &user, idle);
        let mut messages = history_messages(&history);
        messages.push(ChatMessage::user(user_text));
        let params = CompletionParams {
            max_tokens: self.config.llm.max_tokens,
            temperature: self.config.llm.temperature,
        };

        let raw = self
            .generate(&system, messages, params, emotion, &mut *rng)
            .await;
        let raw_len = raw.chars().count();

        let user_name = self
            .config
            .persona
            .user_name
            .clone()
            .or(user.name.clone());
        let ctx = StageContext {
            emotion,
            user_message: user_text,
            mood,
            profile: &profile,
            time_of_day: tod,
            season,
            user_name: user_name.as_deref(),
            prev_assistant_reply: prev_reply.as_deref(),
            prev_opened_with_name: *prev_opened_with_name,
            femininity: self.config.persona.femininity,
            raw_len,
            config: &self.config.pipeline,
        };
        let reply = Pipeline::run(raw, &ctx, &mut *rng, question_history);

        *prev_opened_with_name = user_name
            .as_deref()
            .map(|n| reply.starts_with(n))
            .unwrap_or(false);
        *prev_reply = Some(reply.clone());
        *prev_reaction = Some(profile.reaction_mode);
        if let Some(topic) = extract_topic(user_text, emotion) {
            *last_topic = Some(topic);
        }
        let mood = mood.snapshot();

        self.memory
            .append_turn(user_text, &reply, emotion, now)
            .await?;
        drop(guard);

        let split = split_reply(&reply);
        Ok(TurnOutput {
            reply: split.reply,
            extra_messages: split.extra_messages,
            mood,
            emotion,
        })
    }

    /// One pass of the background ticker. The attention scheduler has
    /// priority; at most one message fires per tick.
    pub async fn check_idle_tick(&self) -> Result<Option<IdleMessage>> {
        let now = Utc::now();
        self.check_idle_tick_at(now).await
    }

    pub async fn check_idle_tick_at(&self, now: DateTime<Utc>) -> Result<Option<IdleMessage>> {
        let tod = TimeOfDay::from_datetime(now);
        let mut guard = self.session.lock().await;
        let Session {
            mood,
            attention,
            proactive,
            last_topic,
            rng,
            ..
        } = &mut *guard;

        mood.update(now, tod, EmotionTag::Default, false, &mut *rng);

        let idle_minutes = (now - attention.last_interaction).num_minutes();
        let last_topic = last_topic.clone();

        if let Some(text) = attention.check_needed(
            now,
            &self.config.attention,
            tod,
            mood,
            last_topic.as_deref(),
            &mut *rng,
        ) {
            return Ok(Some(IdleMessage { text, action: None }));
        }

        if let Some(event) = proactive.check(
            now,
            &self.config.proactive,
            tod,
            mood,
            idle_minutes,
            last_topic.as_deref(),
            &mut *rng,
        ) {
            return Ok(Some(IdleMessage {
                text: event.message,
                action: Some(event.action),
            }));
        }

        Ok(None)
    }

    pub async fn mood_snapshot(&self) -> MoodSnapshot {
        self.session.lock().await.mood.snapshot()
    }

    /// Candidate text: LLM with a wall-clock budget, one retry on a
    /// character-breaking refusal, template fallback on any failure.
    async fn generate(
        &self,
        system: &str,
        messages: Vec<ChatMessage>,
        params: CompletionParams,
        emotion: EmotionTag,
        rng: &mut StdRng,
    ) -> String {
        let budget = std::time::Duration::from_secs(self.config.llm.timeout_secs);
        for attempt in 0..2 {
            let call = self.llm.complete(system, messages.clone(), params.clone());
            match tokio::time::timeout(budget, call).await {
                Ok(Ok(completion)) => {
                    if looks_like_refusal(&completion.content) {
                        warn!(attempt, "refusal-style completion, retrying");
                        continue;
                    }
                    if completion.content.trim().is_empty() {
                        warn!(attempt, "empty completion");
                        continue;
                    }
                    return completion.content;
                }
                Ok(Err(e)) => {
                    warn!(attempt, error = %e, "generation failed");
                }
                Err(_) => {
                    warn!(attempt, "generation timed out");
                }
            }
        }
        fallback_reply(emotion, rng)
    }
}

/// A topic worth referencing later: a meaty non-ritual message, trimmed to
/// a short snippet.
fn extract_topic(user_text: &str, emotion: EmotionTag) -> Option<String> {
    if emotion.is_social_ritual() {
        return None;
    }
    let trimmed = user_text.trim().trim_end_matches(['.', '!', '?']);
    if trimmed.chars().count() < 12 {
        return None;
    }
    let snippet: String = trimmed.chars().take(40).collect();
    Some(snippet.to_lowercase())
}
