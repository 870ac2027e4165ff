//! Stage 8: feminine intonation.
//!
//! Probability scales with the persona's femininity knob, so a 0.0 setting
//! switches the stage off entirely.

use crate::context::StageContext;
use rand::Rng;

const SOFT_HEDGES: &[&str] = &["Мне кажется, ", "Знаешь, мне кажется, "];
const AFFIRMING_TAGS: &[&str] = &[" Правда.", " Честно-честно.", " Вот так вот."];

pub fn feminine_intonation<R: Rng>(text: &str, ctx: &StageContext, rng: &mut R) -> String {
    let p = ctx.config.intonation_base_prob * ctx.femininity;
    if rng.gen::<f32>() >= p {
        return text.to_string();
    }

    if rng.gen::<bool>() {
        if text.starts_with("Мне кажется") || text.starts_with("Знаешь") {
            return text.to_string();
        }
        let hedge = SOFT_HEDGES[rng.gen_range(0..SOFT_HEDGES.len())];
        let mut rest = text.to_string();
        if let Some(first) = rest.chars().next() {
            if first.is_uppercase() {
                let tail: String = rest.chars().skip(1).collect();
                rest = format!("{}{}", first.to_lowercase(), tail);
            }
        }
        format!("{hedge}{rest}")
    } else {
        let tag = AFFIRMING_TAGS[rng.gen_range(0..AFFIRMING_TAGS.len())];
        if text.contains(tag.trim()) {
            return text.to_string();
        }
        format!("{text}{tag}")
    }
}
