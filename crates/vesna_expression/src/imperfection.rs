//! Stage 9: deliberate imperfection.
//!
//! Rarely injects a human slip: a comma-pause filler, a mid-sentence
//! self-correction, or a "misread you at first" opener. Suppressed for
//! anger and social rituals, where a slip would read as mockery.

use crate::context::StageContext;
use rand::Rng;
use vesna_core::emotion::EmotionTag;

const PAUSE_FILLERS: &[&str] = &["как бы", "ну то есть"];
const SELF_CORRECTIONS: &[&str] = &["точнее,", "вернее,"];
const MISREAD_OPENERS: &[&str] = &[
    "Сначала не так прочитала твоё сообщение, прости. ",
    "Ой, я сперва неправильно поняла. ",
];

pub fn imperfection<R: Rng>(text: &str, ctx: &StageContext, rng: &mut R) -> String {
    if ctx.emotion == EmotionTag::Anger || ctx.emotion.is_social_ritual() {
        return text.to_string();
    }
    if rng.gen::<f32>() >= ctx.config.imperfection_prob {
        return text.to_string();
    }

    match rng.gen_range(0..3u8) {
        0 => {
            let filler = PAUSE_FILLERS[rng.gen_range(0..PAUSE_FILLERS.len())];
            match text.find(", ") {
                Some(pos) => {
                    let mut out = text.to_string();
                    out.replace_range(pos..pos + 2, &format!(", {filler}, "));
                    out
                }
                None => text.to_string(),
            }
        }
        1 => {
            let correction = SELF_CORRECTIONS[rng.gen_range(0..SELF_CORRECTIONS.len())];
            match text.find(". ") {
                Some(pos) => {
                    let mut out = text.to_string();
                    out.replace_range(pos..pos + 2, &format!(". Хотя нет, {correction} "));
                    out
                }
                None => text.to_string(),
            }
        }
        _ => {
            let opener = MISREAD_OPENERS[rng.gen_range(0..MISREAD_OPENERS.len())];
            if text.starts_with("Ой") || text.starts_with("Сначала") {
                return text.to_string();
            }
            format!("{opener}{text}")
        }
    }
}
