//! Stage 2: present-tense fix.
//!
//! When the user asks what the persona is doing *right now*, a reply in
//! past tense reads as stitched from memory. Known past-tense verbs are
//! rewritten to present.

use crate::context::StageContext;

const NOW_QUESTIONS: &[&str] = &[
    "что делаешь",
    "чем занимаешься",
    "что ты сейчас делаешь",
    "чем сейчас занята",
    "что сейчас делаешь",
];

const PAST_TO_PRESENT: &[(&str, &str)] = &[
    ("читала", "читаю"),
    ("слушала", "слушаю"),
    ("смотрела", "смотрю"),
    ("пила", "пью"),
    ("готовила", "готовлю"),
    ("думала", "думаю"),
    ("сидела", "сижу"),
    ("рисовала", "рисую"),
    ("гуляла", "гуляю"),
    ("разбирала", "разбираю"),
];

pub fn tense_fix(text: &str, ctx: &StageContext) -> String {
    let lower = ctx.user_message.to_lowercase();
    if !NOW_QUESTIONS.iter().any(|q| lower.contains(q)) {
        return text.to_string();
    }
    let mut out = text.to_string();
    for (past, present) in PAST_TO_PRESENT {
        out = out.replace(past, present);
    }
    out
}
