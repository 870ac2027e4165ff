//! Response pipeline: fifteen ordered passes over the raw model output.
//!
//! The order is load-bearing. Sanitation and tense repair run before any
//! stage that adds text; the coherence guard runs after every additive
//! stage; repeat and question-rate bookkeeping see the near-final reply.

use crate::coherence::coherence_guard;
use crate::context::StageContext;
use crate::emoji::emoji_harmonize;
use crate::imperfection::imperfection;
use crate::intonation::feminine_intonation;
use crate::micro::micro_expression;
use crate::naming::name_reduction;
use crate::overlay::{reaction_overlay, rhythm_overlay};
use crate::persona_touch::personal_touch;
use crate::repeat::{repeat_guard, QuestionRateTracker};
use crate::sanitize::sanitize;
use crate::sensory::sensory_detail;
use crate::tense::tense_fix;
use crate::textutil::capitalize_first;
use rand::Rng;
use tracing::trace;

const SAFE_LINE: &str = "Я рядом и слушаю тебя.";

pub struct Pipeline;

impl Pipeline {
    pub fn run<R: Rng>(
        raw: String,
        ctx: &StageContext,
        rng: &mut R,
        question_history: &mut QuestionRateTracker,
    ) -> String {
        let mut text = sanitize(&raw, ctx);
        text = tense_fix(&text, ctx);
        text = micro_expression(&text, ctx, rng);
        text = reaction_overlay(&text, ctx, rng);
        text = rhythm_overlay(&text, ctx, rng);
        text = sensory_detail(&text, ctx, rng);
        text = personal_touch(&text, ctx, rng);
        text = feminine_intonation(&text, ctx, rng);
        text = imperfection(&text, ctx, rng);
        text = emoji_harmonize(&text, ctx);
        text = name_reduction(&text, ctx);
        text = coherence_guard(&text, ctx);
        text = repeat_guard(&text, ctx, rng);
        text = question_history.apply(&text, ctx);
        let out = finalize(&text);
        trace!(raw_len = ctx.raw_len, out_len = out.chars().count(), "pipeline pass");
        out
    }
}

fn finalize(text: &str) -> String {
    let collapsed: String = {
        let mut out = String::with_capacity(text.len());
        let mut prev_space = false;
        for ch in text.chars() {
            if ch == ' ' {
                if !prev_space {
                    out.push(' ');
                }
                prev_space = true;
            } else {
                out.push(ch);
                prev_space = false;
            }
        }
        out.trim().to_string()
    };
    if collapsed.is_empty() {
        return SAFE_LINE.to_string();
    }
    capitalize_first(&collapsed)
}
