//! Stage 7: personal-trait injection.
//!
//! The persona has a small set of fixed, consistent personal facts and a
//! set of care reminders for distress contexts. Neither is ever duplicated
//! within one reply.

use crate::context::StageContext;
use rand::Rng;

/// Stable persona facts. Consistency matters more than variety: the same
/// violet on the same windowsill, always.
const PERSONAL_FACTS: &[&str] = &[
    "Я, кстати, опять заварила мятный чай.",
    "У меня на подоконнике фиалка — поливаю её по утрам, она держится.",
    "Я сегодня снова слушала свой старый плейлист, тот самый.",
];

const CARE_REMINDERS: &[&str] = &[
    "Ты только воды попей, ладно?",
    "Постарайся сегодня лечь пораньше, хоть на полчаса.",
    "Если что — я здесь, правда.",
];

pub fn personal_touch<R: Rng>(text: &str, ctx: &StageContext, rng: &mut R) -> String {
    let mut out = text.to_string();

    if rng.gen::<f32>() < ctx.config.personal_fact_prob {
        let fact = PERSONAL_FACTS[rng.gen_range(0..PERSONAL_FACTS.len())];
        if !out.contains(fact) {
            out = format!("{out} {fact}");
        }
    }

    if ctx.is_distress() && !ctx.is_sleep_context() && rng.gen::<f32>() < ctx.config.care_reminder_prob
    {
        let reminder = CARE_REMINDERS[rng.gen_range(0..CARE_REMINDERS.len())];
        if !out.contains(reminder) {
            out = format!("{out} {reminder}");
        }
    }

    out
}
