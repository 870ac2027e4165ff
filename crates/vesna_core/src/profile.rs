//! Per-turn response profile: which rhetorical strategy and pacing the
//! pipeline should layer onto a reply.

use crate::clock::TimeOfDay;
use crate::emotion::EmotionTag;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Rhetorical strategy for the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionMode {
    Support,
    StructuralHelp,
    PersonalExperience,
    LightHumor,
}

/// Pacing/density control for the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RhythmMode {
    VeryShort,
    Emotional,
    SideStep,
    Pause,
    Normal,
}

/// Ephemeral per-turn profile, consumed by the pipeline and discarded.
#[derive(Debug, Clone)]
pub struct ResponseProfile {
    pub reaction_mode: ReactionMode,
    pub rhythm_mode: RhythmMode,
    pub time_of_day: TimeOfDay,
    pub emotion: EmotionTag,
    pub user_message: String,
}

/// Weighted draw over reaction modes.
fn draw_reaction<R: Rng>(weights: &[(ReactionMode, f32)], rng: &mut R) -> ReactionMode {
    let total: f32 = weights.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0.0..total);
    for (mode, w) in weights {
        if roll < *w {
            return *mode;
        }
        roll -= w;
    }
    weights.last().map(|(m, _)| *m).unwrap_or(ReactionMode::Support)
}

fn draw_rhythm<R: Rng>(weights: &[(RhythmMode, f32)], rng: &mut R) -> RhythmMode {
    let total: f32 = weights.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0.0..total);
    for (mode, w) in weights {
        if roll < *w {
            return *mode;
        }
        roll -= w;
    }
    RhythmMode::Normal
}

/// Messages that should never get stylistic noise: explicit reassurance
/// requests and closing-for-sleep lines, plus the social rituals.
fn forces_plain_profile(emotion: EmotionTag, user_message: &str) -> bool {
    if emotion.is_social_ritual() {
        return true;
    }
    let lower = user_message.to_lowercase();
    const PLAIN_MARKERS: &[&str] = &[
        "спокойной ночи",
        "пойду спать",
        "ложусь спать",
        "скажи, что всё будет хорошо",
        "успокой меня",
    ];
    PLAIN_MARKERS.iter().any(|m| lower.contains(m))
}

/// Select the per-turn profile.
///
/// Anti-repeat: a reaction mode equal to the previous turn's is resampled
/// once with probability 0.35.
pub fn select<R: Rng>(
    emotion: EmotionTag,
    time_of_day: TimeOfDay,
    user_message: &str,
    prev_reaction: Option<ReactionMode>,
    rng: &mut R,
) -> ResponseProfile {
    if forces_plain_profile(emotion, user_message) {
        return ResponseProfile {
            reaction_mode: ReactionMode::Support,
            rhythm_mode: RhythmMode::Normal,
            time_of_day,
            emotion,
            user_message: user_message.to_string(),
        };
    }

    let reaction_pool: &[(ReactionMode, f32)] = if emotion.is_fragile() {
        // Fragile emotions: support-biased pool, no humor.
        &[
            (ReactionMode::Support, 0.70),
            (ReactionMode::StructuralHelp, 0.20),
            (ReactionMode::PersonalExperience, 0.10),
        ]
    } else {
        &[
            (ReactionMode::Support, 0.40),
            (ReactionMode::StructuralHelp, 0.30),
            (ReactionMode::PersonalExperience, 0.20),
            (ReactionMode::LightHumor, 0.10),
        ]
    };

    let mut reaction = draw_reaction(reaction_pool, rng);
    if Some(reaction) == prev_reaction && rng.gen::<f32>() < 0.35 {
        reaction = draw_reaction(reaction_pool, rng);
    }

    // Rhythm weights: Normal keeps a 0.60 baseline, per-emotion nudges.
    let mut weights = vec![
        (RhythmMode::Normal, 0.60),
        (RhythmMode::VeryShort, 0.10),
        (RhythmMode::Emotional, 0.12),
        (RhythmMode::SideStep, 0.08),
        (RhythmMode::Pause, 0.10),
    ];
    match emotion {
        EmotionTag::Exhaustion => {
            bump(&mut weights, RhythmMode::VeryShort, 0.20);
        }
        EmotionTag::Anxiety | EmotionTag::ExamFear => {
            bump(&mut weights, RhythmMode::Pause, 0.15);
        }
        EmotionTag::Sadness => {
            bump(&mut weights, RhythmMode::Emotional, 0.10);
        }
        _ => {}
    }
    let rhythm = draw_rhythm(&weights, rng);

    ResponseProfile {
        reaction_mode: reaction,
        rhythm_mode: rhythm,
        time_of_day,
        emotion,
        user_message: user_message.to_string(),
    }
}

fn bump(weights: &mut [(RhythmMode, f32)], mode: RhythmMode, by: f32) {
    for (m, w) in weights.iter_mut() {
        if *m == mode {
            *w += by;
        }
    }
}
