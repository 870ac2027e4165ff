//! Stages 4–5: reaction-mode and rhythm overlays.
//!
//! The reaction overlay appends a short mode-specific addendum; the rhythm
//! overlay reshapes pacing. Both are suppressed for social rituals and
//! sleep/closing contexts — a "давай разобьём на шаги" tail under a good
//! night message is exactly the incoherence the guard later exists to catch.

use crate::context::StageContext;
use crate::textutil::split_sentences;
use rand::Rng;
use vesna_core::profile::{ReactionMode, RhythmMode};

const STRUCTURAL_ADDENDA: &[&str] = &[
    " Хочешь, разобьём это на шаги и пройдём по одному?",
    " Давай попробуем разложить это по полочкам, по одной штуке за раз.",
];

const PERSONAL_ADDENDA: &[&str] = &[
    " У меня однажды было похожее — я тогда долго не решалась начать.",
    " Я такое проходила прошлой зимой, и ничего, выбралась.",
];

const HUMOR_ADDENDA: &[&str] = &[
    " Ну, зато будет что вспомнить, да?",
    " Считай это квестом, только без сохранений.",
];

const SIDE_TANGENTS: &[&str] = &[
    " Кстати, я сегодня полдня думала про море — не к месту, наверное.",
    " А я вот всё возвращаюсь мыслями к одной песне, привяжется же.",
];

const PAUSE_HEDGES: &[&str] = &["Хм… ", "Ну… "];
const EMOTIONAL_HEDGES: &[&str] = &["Ох, ", "Слушай, "];

pub fn reaction_overlay<R: Rng>(text: &str, ctx: &StageContext, rng: &mut R) -> String {
    if ctx.emotion.is_social_ritual() || ctx.is_sleep_context() {
        return text.to_string();
    }
    if rng.gen::<f32>() >= ctx.config.reaction_overlay_prob {
        return text.to_string();
    }

    let addendum = match ctx.profile.reaction_mode {
        ReactionMode::StructuralHelp => {
            Some(STRUCTURAL_ADDENDA[rng.gen_range(0..STRUCTURAL_ADDENDA.len())])
        }
        ReactionMode::PersonalExperience => {
            Some(PERSONAL_ADDENDA[rng.gen_range(0..PERSONAL_ADDENDA.len())])
        }
        ReactionMode::LightHumor => Some(HUMOR_ADDENDA[rng.gen_range(0..HUMOR_ADDENDA.len())]),
        // Support is the default register of the whole reply, no tail.
        ReactionMode::Support => None,
    };

    match addendum {
        Some(tail) if !text.contains(tail.trim()) => format!("{text}{tail}"),
        _ => text.to_string(),
    }
}

pub fn rhythm_overlay<R: Rng>(text: &str, ctx: &StageContext, rng: &mut R) -> String {
    if ctx.emotion.is_social_ritual() {
        return text.to_string();
    }

    match ctx.profile.rhythm_mode {
        RhythmMode::VeryShort => {
            if rng.gen::<f32>() < ctx.config.very_short_prob {
                split_sentences(text)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| text.to_string())
            } else {
                text.to_string()
            }
        }
        RhythmMode::Pause => {
            if rng.gen::<f32>() < ctx.config.hedge_prob {
                let hedge = PAUSE_HEDGES[rng.gen_range(0..PAUSE_HEDGES.len())];
                prepend_hedge(text, hedge)
            } else {
                text.to_string()
            }
        }
        RhythmMode::Emotional => {
            if rng.gen::<f32>() < ctx.config.hedge_prob {
                let hedge = EMOTIONAL_HEDGES[rng.gen_range(0..EMOTIONAL_HEDGES.len())];
                prepend_hedge(text, hedge)
            } else {
                text.to_string()
            }
        }
        RhythmMode::SideStep => {
            if rng.gen::<f32>() < ctx.config.side_step_prob {
                let tangent = SIDE_TANGENTS[rng.gen_range(0..SIDE_TANGENTS.len())];
                format!("{text}{tangent}")
            } else {
                text.to_string()
            }
        }
        RhythmMode::Normal => text.to_string(),
    }
}

fn prepend_hedge(text: &str, hedge: &str) -> String {
    // Lowercase the old first letter so the hedge reads as one sentence.
    let mut rest = text.to_string();
    if let Some(first) = rest.chars().next() {
        if first.is_uppercase() {
            let tail: String = rest.chars().skip(1).collect();
            rest = format!("{}{}", first.to_lowercase(), tail);
        }
    }
    format!("{hedge}{rest}")
}
