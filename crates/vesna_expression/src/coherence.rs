//! Stage 12: coherence guard.
//!
//! Last line of defense against pipeline degeneration: stitched-artifact
//! phrases in the wrong context, near-duplicate sentences, runaway length,
//! and collapsed or doubled-greeting output. Running the guard on its own
//! output changes nothing.

use crate::context::StageContext;
use crate::textutil::{jaccard, normalize_spaces, split_sentences, truncate_at_word};

/// Task-offer fragments that make no sense under a good-night or a
/// pure-comfort reply.
const TASK_ARTIFACTS: &[&str] = &["разобьём", "по полочкам", "по одному шагу", "квест"];

const GREETING_WORDS: &[&str] = &[
    "привет",
    "доброе утро",
    "добрый день",
    "добрый вечер",
    "здравствуй",
];

const FALLBACK_SLEEP: &str = "Спокойной ночи. Пусть тебе приснится что-то тёплое и хорошее.";
const FALLBACK_DISTRESS: &str =
    "Я здесь, слышу тебя. Давай спокойно, без спешки — я никуда не денусь.";
const FALLBACK_NEUTRAL: &str = "Я рядом и слушаю тебя. Расскажи, как ты сейчас?";

const JACCARD_DUP: f32 = 0.92;
const COLLAPSE_MIN_CHARS: usize = 42;
const COLLAPSE_RAW_CHARS: usize = 180;
/// User messages shorter than this put the reply in the tighter cap band.
const SHORT_INPUT_CHARS: usize = 20;

pub fn coherence_guard(text: &str, ctx: &StageContext) -> String {
    let mut out = normalize_spaces(text);

    // Drop whole sentences carrying an out-of-context task offer.
    if ctx.is_sleep_context() || (ctx.is_distress() && !ctx.is_task_like()) {
        let kept: Vec<String> = split_sentences(&out)
            .into_iter()
            .filter(|s| {
                let lower = s.to_lowercase();
                !TASK_ARTIFACTS.iter().any(|a| lower.contains(a))
            })
            .collect();
        out = kept.join(" ");
    }

    // Near-duplicate sentence removal.
    let mut unique: Vec<String> = Vec::new();
    for sentence in split_sentences(&out) {
        let dup = unique.iter().any(|kept| jaccard(kept, &sentence) >= JACCARD_DUP);
        if !dup {
            unique.push(sentence);
        }
    }

    let short_input = ctx.user_message.chars().count() < SHORT_INPUT_CHARS;
    let cap = if ctx.is_distress() || ctx.is_sleep_context() || short_input {
        3
    } else {
        4
    };
    unique.truncate(cap);
    out = unique.join(" ");

    if out.chars().count() > ctx.config.max_reply_chars {
        out = truncate_at_word(&out, ctx.config.max_reply_chars);
    }

    if is_collapsed(&out, ctx) || has_doubled_greeting(&out) {
        return fallback_for(ctx).to_string();
    }

    out
}

fn is_collapsed(out: &str, ctx: &StageContext) -> bool {
    if out.trim().is_empty() {
        return true;
    }
    if ctx.raw_len <= COLLAPSE_RAW_CHARS {
        return false;
    }
    out.chars().count() < COLLAPSE_MIN_CHARS || split_sentences(out).len() <= 1
}

fn has_doubled_greeting(out: &str) -> bool {
    let lower = out.to_lowercase();
    let hits: usize = GREETING_WORDS
        .iter()
        .map(|g| lower.matches(g).count())
        .sum();
    // "здравствуй" is a substring of nothing else in the list, "привет" can
    // appear inside "приветик"; either way two greeting tokens is a stitch.
    hits >= 2
}

fn fallback_for(ctx: &StageContext) -> &'static str {
    if ctx.is_sleep_context() {
        FALLBACK_SLEEP
    } else if ctx.is_distress() {
        FALLBACK_DISTRESS
    } else {
        FALLBACK_NEUTRAL
    }
}
