//! The mood state machine.
//!
//! Continuous affect scalars (stress, warmth, energy, social need, smoothed
//! user valence/arousal) plus one discrete mood label with hysteresis: the
//! label may only change when an override trigger fires or the current mood
//! has dwelt long enough for its intensity. All scalar mutations clamp at the
//! point of mutation — out-of-range state is prevented, not detected.

use crate::clock::TimeOfDay;
use crate::emotion::EmotionTag;
use crate::transitions::{
    emotion_delta, explicit_candidate, natural_transitions, threshold_candidate,
    transition_allowed,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The assistant's discrete mood label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodLabel {
    Calm,
    Warm,
    Tender,
    Cheerful,
    Playful,
    Excited,
    Focused,
    Melancholy,
    Anxious,
    Overwhelmed,
    Sad,
    Tired,
    Bored,
    Lonely,
    Vulnerable,
    Angry,
    Offended,
}

impl MoodLabel {
    pub const ALL: [MoodLabel; 17] = [
        Self::Calm,
        Self::Warm,
        Self::Tender,
        Self::Cheerful,
        Self::Playful,
        Self::Excited,
        Self::Focused,
        Self::Melancholy,
        Self::Anxious,
        Self::Overwhelmed,
        Self::Sad,
        Self::Tired,
        Self::Bored,
        Self::Lonely,
        Self::Vulnerable,
        Self::Angry,
        Self::Offended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Warm => "warm",
            Self::Tender => "tender",
            Self::Cheerful => "cheerful",
            Self::Playful => "playful",
            Self::Excited => "excited",
            Self::Focused => "focused",
            Self::Melancholy => "melancholy",
            Self::Anxious => "anxious",
            Self::Overwhelmed => "overwhelmed",
            Self::Sad => "sad",
            Self::Tired => "tired",
            Self::Bored => "bored",
            Self::Lonely => "lonely",
            Self::Vulnerable => "vulnerable",
            Self::Angry => "angry",
            Self::Offended => "offended",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Calm => "😌",
            Self::Warm => "🙂",
            Self::Tender => "🥰",
            Self::Cheerful => "😊",
            Self::Playful => "😜",
            Self::Excited => "🤩",
            Self::Focused => "🧐",
            Self::Melancholy => "🌧",
            Self::Anxious => "😟",
            Self::Overwhelmed => "😵",
            Self::Sad => "😢",
            Self::Tired => "🥱",
            Self::Bored => "😐",
            Self::Lonely => "🫥",
            Self::Vulnerable => "🥺",
            Self::Angry => "😠",
            Self::Offended => "😤",
        }
    }

    /// Hex accent color for UI surfaces.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Calm => "#8fbf9f",
            Self::Warm => "#f2b880",
            Self::Tender => "#f4a6c1",
            Self::Cheerful => "#ffd166",
            Self::Playful => "#ff9f68",
            Self::Excited => "#ff6b6b",
            Self::Focused => "#6f9ceb",
            Self::Melancholy => "#7d8ca3",
            Self::Anxious => "#b8a1e3",
            Self::Overwhelmed => "#9b6fb0",
            Self::Sad => "#6c7a9c",
            Self::Tired => "#a3a3a3",
            Self::Bored => "#c0c0b0",
            Self::Lonely => "#8c90a8",
            Self::Vulnerable => "#e3b5c8",
            Self::Angry => "#d64545",
            Self::Offended => "#c75b39",
        }
    }

    /// Base target intensity per mood category.
    fn intensity_base(&self) -> f32 {
        match self {
            Self::Angry | Self::Offended | Self::Overwhelmed => 0.72,
            Self::Anxious | Self::Sad | Self::Vulnerable => 0.60,
            _ => 0.44,
        }
    }
}

/// Continuous + discrete affect state. One per conversation session,
/// created at engine start and mutated in place on every turn and idle tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodState {
    pub mood: MoodLabel,
    /// Intensity of the current mood, always within [0.1, 1.0].
    pub intensity: f32,
    /// When the current label was committed.
    pub mood_since: DateTime<Utc>,

    pub stress: f32,
    pub warmth: f32,
    pub social_need: f32,
    pub energy: f32,

    /// Exponentially smoothed valence/arousal of the *user's* messages.
    pub user_valence: f32,
    pub user_arousal: f32,

    pub last_user_emotion: EmotionTag,
    /// Consecutive identical detected emotions, capped at 9.
    pub emotion_streak: u32,

    /// Consecutive times the candidate resolved to Bored (hysteresis guard).
    consecutive_bored: u32,
}

impl Default for MoodState {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// Serializable read view for the outbound contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodSnapshot {
    pub label: String,
    pub intensity: f32,
    pub emoji: String,
    pub color: String,
}

impl MoodState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            mood: MoodLabel::Calm,
            intensity: 0.4,
            mood_since: now,
            stress: 0.2,
            warmth: 0.5,
            social_need: 0.4,
            energy: 0.6,
            user_valence: 0.0,
            user_arousal: 0.0,
            last_user_emotion: EmotionTag::Default,
            emotion_streak: 0,
            consecutive_bored: 0,
        }
    }

    pub fn snapshot(&self) -> MoodSnapshot {
        MoodSnapshot {
            label: self.mood.as_str().to_string(),
            intensity: self.intensity,
            emoji: self.mood.emoji().to_string(),
            color: self.mood.color().to_string(),
        }
    }

    /// Minimum minutes the current label must persist before a different
    /// candidate may replace it.
    pub fn dwell_floor_minutes(&self) -> f32 {
        4.5 + self.intensity * 7.5
    }

    fn minutes_in_mood(&self, now: DateTime<Utc>) -> f32 {
        (now - self.mood_since).num_seconds().max(0) as f32 / 60.0
    }

    fn set_stress(&mut self, v: f32) {
        self.stress = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.2 };
    }

    fn set_warmth(&mut self, v: f32) {
        self.warmth = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.5 };
    }

    fn set_intensity(&mut self, v: f32) {
        self.intensity = if v.is_finite() { v.clamp(0.1, 1.0) } else { 0.4 };
    }

    /// Advance the state for one turn or idle tick.
    ///
    /// `interaction` distinguishes a real user turn (engagement reward) from
    /// a background tick (idle drift). Unknown emotion tags are a no-op on
    /// the delta layer; the function never fails.
    pub fn update<R: Rng>(
        &mut self,
        now: DateTime<Utc>,
        time_of_day: TimeOfDay,
        emotion: EmotionTag,
        interaction: bool,
        rng: &mut R,
    ) {
        // 1. Energy snaps to the time-of-day baseline.
        self.energy = time_of_day.energy_baseline().clamp(0.0, 1.0);

        // 2. Idle drift vs engagement reward.
        if !interaction {
            self.social_need = (self.social_need + 0.01).clamp(0.0, 1.0);
            self.set_stress(self.stress + 0.007);
            self.set_warmth(self.warmth - 0.003);
        } else {
            self.social_need = (self.social_need - 0.2).max(0.0);
            self.set_stress(self.stress - 0.08);
            self.set_warmth(self.warmth + 0.05);
            self.consecutive_bored = 0;
        }

        // Streak bookkeeping (only meaningful for real turns).
        if interaction {
            if emotion == self.last_user_emotion {
                self.emotion_streak = (self.emotion_streak + 1).min(9);
            } else {
                self.emotion_streak = 1;
            }
            self.last_user_emotion = emotion;
        }

        // 3. Override triggers bypass everything else.
        if emotion.is_override() {
            let label = match emotion {
                EmotionTag::InsultToAssistant => MoodLabel::Offended,
                _ => MoodLabel::Angry,
            };
            self.mood = label;
            self.set_intensity(rng.gen_range(0.80..=0.82));
            self.mood_since = now;
            tracing::debug!(mood = label.as_str(), "override trigger fired");
            return;
        }

        // 4. Emotion deltas, compounded by the streak and smoothed into the
        //    user affect trace.
        let delta = emotion_delta(emotion);
        let streak_factor =
            (1.0 + (self.emotion_streak.saturating_sub(1) as f32) * 0.12).min(1.8);
        self.set_stress(self.stress + delta.stress * streak_factor);
        self.set_warmth(self.warmth + delta.warmth * streak_factor);

        let target_v = (delta.valence * streak_factor).clamp(-1.0, 1.0);
        let target_a = (delta.arousal * streak_factor).clamp(-1.0, 1.0);
        self.user_valence = (0.7 * self.user_valence + 0.3 * target_v).clamp(-1.0, 1.0);
        self.user_arousal = (0.7 * self.user_arousal + 0.3 * target_a).clamp(-1.0, 1.0);

        // 5. Candidate label cascade.
        let mut candidate = explicit_candidate(emotion, self)
            .or_else(|| threshold_candidate(self))
            .unwrap_or_else(|| self.pick_transition(rng));

        // 6. Target intensity.
        let mut target_intensity =
            (candidate.intensity_base() + (self.stress - 0.4) * 0.12).clamp(0.25, 0.88);

        // 7. Dwell-time guard: the label may not flip before the floor
        //    elapses. The candidate is demoted to the current mood at
        //    slightly reduced intensity.
        if candidate != self.mood && self.minutes_in_mood(now) < self.dwell_floor_minutes() {
            candidate = self.mood;
            target_intensity = (target_intensity - 0.05).clamp(0.25, 0.88);
        }

        // 8. Boredom hysteresis: don't let her sit in "bored" forever.
        if candidate == MoodLabel::Bored && self.social_need > 0.78 {
            self.consecutive_bored += 1;
            if self.consecutive_bored > 2 {
                let alt = self.pick_transition(rng);
                candidate = if alt == MoodLabel::Bored { MoodLabel::Lonely } else { alt };
                self.consecutive_bored = 0;
            }
        } else if candidate != MoodLabel::Bored {
            self.consecutive_bored = 0;
        }

        // 9. Commit.
        if candidate != self.mood {
            tracing::debug!(
                from = self.mood.as_str(),
                to = candidate.as_str(),
                "mood transition"
            );
            self.mood = candidate;
            self.mood_since = now;
        }
        self.set_intensity(target_intensity);
    }

    /// Pick a plausible neighbor from the natural-transition graph.
    /// Falls back to the current mood when every neighbor is filtered out.
    fn pick_transition<R: Rng>(&self, rng: &mut R) -> MoodLabel {
        let allowed: Vec<MoodLabel> = natural_transitions(self.mood)
            .iter()
            .copied()
            .filter(|m| transition_allowed(*m, self))
            .collect();
        if allowed.is_empty() {
            self.mood
        } else {
            allowed[rng.gen_range(0..allowed.len())]
        }
    }

    /// Russian behavioral hints for the LLM system prompt. Describes HOW to
    /// speak right now, not what the model "feels".
    pub fn describe_for_context(&self) -> String {
        let mut hints: Vec<&str> = Vec::new();

        if self.energy < 0.3 {
            hints.push("отвечай коротко, без длинных рассуждений");
        } else if self.energy > 0.8 {
            hints.push("можно говорить живо и развёрнуто");
        }

        if self.stress > 0.7 {
            hints.push("в голосе лёгкая напряжённость, фразы короче обычного");
        } else if self.stress < 0.2 {
            hints.push("тон спокойный и ровный");
        }

        if self.warmth > 0.7 {
            hints.push("говори тепло, с заботой");
        }

        if self.social_need > 0.7 {
            hints.push("ты соскучилась по общению, охотно поддерживай разговор");
        }

        let mood_hint = match self.mood {
            MoodLabel::Cheerful | MoodLabel::Playful | MoodLabel::Excited => {
                "настроение приподнятое, уместны шутки"
            }
            MoodLabel::Sad | MoodLabel::Melancholy | MoodLabel::Lonely => {
                "настроение тихое, говори мягче"
            }
            MoodLabel::Angry | MoodLabel::Offended => "ты задета, отвечай сдержанно и суше",
            MoodLabel::Anxious | MoodLabel::Overwhelmed => {
                "тебе тревожно, избегай резких формулировок"
            }
            MoodLabel::Tired => "ты устала, фразы короткие и тёплые",
            _ => "держись естественно",
        };
        hints.push(mood_hint);

        format!("Сейчас {}: {}.", self.mood.as_str(), hints.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_override_forces_angry_regardless_of_dwell() {
        let now = Utc::now();
        let mut state = MoodState::new(now);
        let mut r = rng();
        state.update(now, TimeOfDay::Afternoon, EmotionTag::Anger, true, &mut r);
        assert_eq!(state.mood, MoodLabel::Angry);
        assert!(state.intensity >= 0.80 && state.intensity <= 0.82);

        // Fire again immediately — still forced, dwell ignored.
        state.update(now, TimeOfDay::Afternoon, EmotionTag::InsultToAssistant, true, &mut r);
        assert_eq!(state.mood, MoodLabel::Offended);
        assert!(state.intensity >= 0.80 && state.intensity <= 0.82);
    }

    #[test]
    fn test_dwell_guard_blocks_fast_flip() {
        let start = Utc::now();
        let mut state = MoodState::new(start);
        state.mood = MoodLabel::Calm;
        state.intensity = 0.5; // dwell floor ≈ 8.25 min
        state.mood_since = start;
        state.warmth = 0.3; // anxiety maps to Anxious, not Tender
        let mut r = rng();

        let two_min_later = start + Duration::minutes(2);
        state.update(two_min_later, TimeOfDay::Afternoon, EmotionTag::Anxiety, true, &mut r);
        assert_ne!(state.mood, MoodLabel::Anxious, "dwell guard must hold the label");
    }

    #[test]
    fn test_dwell_elapsed_allows_flip() {
        let start = Utc::now();
        let mut state = MoodState::new(start);
        state.mood = MoodLabel::Calm;
        state.intensity = 0.5;
        state.mood_since = start;
        state.warmth = 0.3;
        let mut r = rng();

        let later = start + Duration::minutes(30);
        state.update(later, TimeOfDay::Afternoon, EmotionTag::Anxiety, true, &mut r);
        assert_eq!(state.mood, MoodLabel::Anxious);
    }

    #[test]
    fn test_idle_drift_and_engagement_reward() {
        let now = Utc::now();
        let mut state = MoodState::new(now);
        state.social_need = 0.4;
        state.stress = 0.3;
        state.warmth = 0.5;
        let mut r = rng();

        state.update(now, TimeOfDay::Morning, EmotionTag::Default, false, &mut r);
        assert!((state.social_need - 0.41).abs() < 1e-4);
        assert!(state.stress > 0.3);
        assert!(state.warmth < 0.5);

        let sn = state.social_need;
        state.update(now, TimeOfDay::Morning, EmotionTag::Default, true, &mut r);
        assert!(state.social_need < sn);
    }

    #[test]
    fn test_streak_caps_at_nine() {
        let now = Utc::now();
        let mut state = MoodState::new(now);
        let mut r = rng();
        for i in 0..15 {
            let t = now + Duration::minutes(i * 20);
            state.update(t, TimeOfDay::Morning, EmotionTag::Sadness, true, &mut r);
        }
        assert_eq!(state.emotion_streak, 9);
    }

    #[test]
    fn test_bounds_hold_under_hammering() {
        let now = Utc::now();
        let mut state = MoodState::new(now);
        let mut r = rng();
        let emotions = [
            EmotionTag::Anger,
            EmotionTag::Joy,
            EmotionTag::Sadness,
            EmotionTag::Anxiety,
            EmotionTag::Default,
        ];
        for i in 0..200 {
            let t = now + Duration::minutes(i);
            let e = emotions[(i as usize) % emotions.len()];
            state.update(t, TimeOfDay::from_hour((i % 24) as u32), e, i % 3 == 0, &mut r);
            assert!(state.intensity >= 0.1 && state.intensity <= 1.0);
            assert!(state.stress >= 0.0 && state.stress <= 1.0);
            assert!(state.warmth >= 0.0 && state.warmth <= 1.0);
            assert!(state.social_need >= 0.0 && state.social_need <= 1.0);
            assert!(state.energy >= 0.0 && state.energy <= 1.0);
            assert!(state.user_valence >= -1.0 && state.user_valence <= 1.0);
            assert!(state.user_arousal >= -1.0 && state.user_arousal <= 1.0);
        }
    }

    #[test]
    fn test_energy_follows_time_of_day() {
        let now = Utc::now();
        let mut state = MoodState::new(now);
        let mut r = rng();
        state.update(now, TimeOfDay::Night, EmotionTag::Default, false, &mut r);
        assert!((state.energy - 0.2).abs() < 1e-6);
        state.update(now, TimeOfDay::Noon, EmotionTag::Default, false, &mut r);
        assert!((state.energy - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_snapshot_shape() {
        let state = MoodState::default();
        let snap = state.snapshot();
        assert_eq!(snap.label, "calm");
        assert!(!snap.emoji.is_empty());
        assert!(snap.color.starts_with('#'));
    }

    #[test]
    fn test_describe_for_context_mentions_mood() {
        let mut state = MoodState::default();
        state.mood = MoodLabel::Tired;
        state.energy = 0.2;
        let desc = state.describe_for_context();
        assert!(desc.contains("устала"), "got: {desc}");
    }
}
