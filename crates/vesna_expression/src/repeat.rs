//! Stages 13–14: self-repeat guard and question-rate limiter.

use crate::context::StageContext;
use crate::textutil::{normal_form, split_sentences};
use rand::Rng;
use std::collections::VecDeque;

const CONTINUATION_TAILS: &[&str] = &[
    " Хотя, знаешь, добавлю ещё кое-что.",
    " Я уже это говорила, да? Прости, настаиваю, потому что правда так думаю.",
    " Повторяюсь, но это важно.",
];

/// Stage 13. An exact repeat of the previous reply (case and punctuation
/// ignored) gets one of three fixed continuations so the dialogue never
/// freezes on a loop.
pub fn repeat_guard<R: Rng>(text: &str, ctx: &StageContext, rng: &mut R) -> String {
    let Some(prev) = ctx.prev_assistant_reply else {
        return text.to_string();
    };
    if normal_form(text) != normal_form(prev) || text.trim().is_empty() {
        return text.to_string();
    }
    let tail = CONTINUATION_TAILS[rng.gen_range(0..CONTINUATION_TAILS.len())];
    let trimmed = text.trim_end_matches(['.', '!', '?', '…', ' ']);
    format!("{trimmed}.{tail}")
}

/// Stage 14 state: sliding window over recent turns, true = the reply asked
/// a question. Social rituals are neither recorded nor stripped.
#[derive(Debug, Clone, Default)]
pub struct QuestionRateTracker {
    window: VecDeque<bool>,
    capacity: usize,
}

const WARMUP_SAMPLES: usize = 4;

impl QuestionRateTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    fn ratio(&self) -> f32 {
        if self.window.is_empty() {
            return 0.0;
        }
        let asked = self.window.iter().filter(|&&q| q).count() as f32;
        asked / self.window.len() as f32
    }

    fn record(&mut self, asked: bool) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(asked);
    }

    /// Applies the rate limit to `text` and records the outcome.
    pub fn apply(&mut self, text: &str, ctx: &StageContext) -> String {
        if ctx.emotion.is_social_ritual() {
            return text.to_string();
        }

        let mut out = text.to_string();
        let over_limit =
            self.window.len() >= WARMUP_SAMPLES && self.ratio() >= ctx.config.max_question_rate;

        if over_limit && out.contains('?') {
            let kept: Vec<String> = split_sentences(&out)
                .into_iter()
                .filter(|s| !s.contains('?'))
                .collect();
            if kept.is_empty() {
                // The whole reply was a question; keep it, drop the mark.
                out = out.replace('?', ".");
            } else {
                out = kept.join(" ");
            }
        }

        self.record(out.contains('?'));
        out
    }
}
