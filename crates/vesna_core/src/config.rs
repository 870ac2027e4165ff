use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VesnaConfig {
    pub llm: LlmConfig,
    pub persona: PersonaConfig,
    pub attention: AttentionConfig,
    pub proactive: ProactiveConfig,
    pub pipeline: PipelineConfig,
}

impl VesnaConfig {
    /// Load config from a TOML file, falling back to defaults for missing
    /// fields. Env var overrides are applied after parsing.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: VesnaConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if the file is missing or invalid, return
    /// defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("VESNA_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("VESNA_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("VESNA_LLM_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("VESNA_LLM_TIMEOUT_SECS") {
            if let Ok(n) = v.parse() {
                self.llm.timeout_secs = n;
            }
        }
        if let Ok(v) = std::env::var("VESNA_RNG_SEED") {
            if let Ok(n) = v.parse() {
                self.persona.rng_seed = Some(n);
            }
        }
        if let Ok(v) = std::env::var("VESNA_USER_NAME") {
            self.persona.user_name = Some(v);
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible chat completions endpoint base.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Wall-clock budget for one generation. On timeout the engine falls
    /// back to template generation instead of failing the turn.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            model: "qwen2.5:14b".to_string(),
            api_key: None,
            max_tokens: 512,
            temperature: 0.8,
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// Assistant display name.
    pub name: String,
    /// User's name if known up-front (the memory store may supersede this).
    pub user_name: Option<String>,
    /// Feminine-intonation level in [0, 1]; scales stage 8 probability.
    pub femininity: f32,
    /// Fixed seed for deterministic test replay. None = entropy-seeded.
    pub rng_seed: Option<u64>,
    /// Interval of the background idle ticker, seconds.
    pub tick_interval_secs: u64,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: "Весна".to_string(),
            user_name: None,
            femininity: 0.7,
            rng_seed: None,
            tick_interval_secs: 45,
        }
    }
}

/// Idle check-in thresholds. Minutes are empirically tuned, not derived.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AttentionConfig {
    pub enabled: bool,
    /// Minimum minutes between two attention messages.
    pub min_gap_minutes: i64,
    /// Idle threshold during day hours.
    pub idle_threshold_day_minutes: i64,
    /// Idle threshold at night / late evening.
    pub idle_threshold_night_minutes: i64,
    /// Daytime idle beyond this escalates to a concern template.
    pub concern_threshold_minutes: i64,
    /// How many recently emitted lines to remember for de-duplication.
    pub recent_cache_size: usize,
    /// Probability of referencing the user's last topic.
    pub topic_reference_prob: f32,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_gap_minutes: 25,
            idle_threshold_day_minutes: 80,
            idle_threshold_night_minutes: 170,
            concern_threshold_minutes: 240,
            recent_cache_size: 12,
            topic_reference_prob: 0.45,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProactiveConfig {
    pub enabled: bool,
    /// Daily quota of proactive messages; resets at local-date rollover.
    pub daily_quota: u32,
    /// Minimum minutes between proactive triggers.
    pub min_gap_minutes: i64,
    pub bored_idle_minutes: i64,
    pub social_idle_minutes: i64,
    pub playful_idle_minutes: i64,
}

impl Default for ProactiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            daily_quota: 4,
            min_gap_minutes: 45,
            bored_idle_minutes: 15,
            social_idle_minutes: 30,
            playful_idle_minutes: 20,
        }
    }
}

/// Per-stage probabilities and caps for the response pipeline. These are
/// tuned constants; tests fix the rng seed rather than re-deriving them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub soft_opener_prob: f32,
    pub ellipsis_prob: f32,
    pub reaction_overlay_prob: f32,
    pub very_short_prob: f32,
    pub hedge_prob: f32,
    pub side_step_prob: f32,
    pub sensory_prob: f32,
    pub personal_fact_prob: f32,
    pub care_reminder_prob: f32,
    pub intonation_base_prob: f32,
    pub imperfection_prob: f32,
    /// Rolling fraction of question-bearing replies allowed.
    pub max_question_rate: f32,
    /// Size of the question-rate sliding window.
    pub question_window: usize,
    /// Hard character cap applied by the coherence guard.
    pub max_reply_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            soft_opener_prob: 0.30,
            ellipsis_prob: 0.25,
            reaction_overlay_prob: 0.35,
            very_short_prob: 0.70,
            hedge_prob: 0.50,
            side_step_prob: 0.40,
            sensory_prob: 0.18,
            personal_fact_prob: 0.12,
            care_reminder_prob: 0.14,
            intonation_base_prob: 0.22,
            imperfection_prob: 0.08,
            max_question_rate: 0.58,
            question_window: 30,
            max_reply_chars: 420,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
