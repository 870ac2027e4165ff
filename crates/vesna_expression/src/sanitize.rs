//! Stage 1: sanitize the raw candidate.
//!
//! Fixes gendered verb forms to feminine, strips AI/bot self-references and
//! mixed-script tokens, collapses punctuation runs, and removes time-of-day
//! greetings that contradict the actual hour. Runs first: later stages
//! (name reduction in particular) assume this cleanup already happened.

use crate::context::StageContext;
use crate::textutil::is_mixed_script;
use vesna_core::clock::TimeOfDay;

/// First-person past-tense masculine forms → feminine. The persona speaks
/// about herself in the feminine; LLM output frequently slips.
const FEMININE_FIXES: &[(&str, &str)] = &[
    ("я думал", "я думала"),
    ("я подумал", "я подумала"),
    ("я сделал", "я сделала"),
    ("я понял", "я поняла"),
    ("я хотел", "я хотела"),
    ("я решил", "я решила"),
    ("я сказал", "я сказала"),
    ("я вспомнил", "я вспомнила"),
    ("я устал", "я устала"),
    ("я был", "я была"),
    ("я рад", "я рада"),
    ("я готов", "я готова"),
    ("я согласен", "я согласна"),
    ("я уверен", "я уверена"),
];

/// Self-descriptions that break the persona. Removed outright.
const AI_SELF_REFS: &[&str] = &[
    "как искусственный интеллект",
    "как языковая модель",
    "я всего лишь программа",
    "я всего лишь бот",
    "я нейросеть",
];

/// Greeting phrases valid only in specific buckets.
const TIMED_GREETINGS: &[(&str, &[TimeOfDay])] = &[
    (
        "доброе утро",
        &[TimeOfDay::EarlyMorning, TimeOfDay::Morning],
    ),
    (
        "добрый день",
        &[TimeOfDay::Noon, TimeOfDay::Afternoon],
    ),
    (
        "добрый вечер",
        &[TimeOfDay::Evening, TimeOfDay::LateEvening],
    ),
];

/// Replace `from` with `to` only where the match ends at a word boundary.
/// Plain `str::replace` would corrupt already-feminine forms
/// ("я думала" must not become "я думалаа").
fn replace_word_bounded(text: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(from) {
        let after = &rest[pos + from.len()..];
        let boundary = after.chars().next().map_or(true, |c| !c.is_alphabetic());
        out.push_str(&rest[..pos]);
        if boundary {
            out.push_str(to);
        } else {
            out.push_str(from);
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

fn apply_case_insensitive(text: &str, from: &str, to: &str) -> String {
    // Covers the lowercase form and the sentence-initial capitalized form.
    let capital_from = crate::textutil::capitalize_first(from);
    let capital_to = crate::textutil::capitalize_first(to);
    let out = replace_word_bounded(text, from, to);
    replace_word_bounded(&out, &capital_from, &capital_to)
}

fn collapse_punct_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '!' || ch == '?' {
            let mut j = i;
            while j + 1 < chars.len() && chars[j + 1] == ch {
                j += 1;
            }
            out.push(ch);
            i = j + 1;
        } else if ch == '.' {
            let mut j = i;
            while j + 1 < chars.len() && chars[j + 1] == '.' {
                j += 1;
            }
            if j > i {
                out.push('…');
            } else {
                out.push('.');
            }
            i = j + 1;
        } else {
            out.push(ch);
            i += 1;
        }
    }
    out
}

pub fn sanitize(text: &str, ctx: &StageContext) -> String {
    let mut out = text.to_string();

    for (from, to) in FEMININE_FIXES {
        out = apply_case_insensitive(&out, from, to);
    }

    for phrase in AI_SELF_REFS {
        out = apply_case_insensitive(&out, phrase, "");
    }
    // Tidy separators left behind by phrase removal (", я не могу…").
    out = out.trim_start_matches([' ', ',']).to_string();

    // Drop mixed-script tokens entirely.
    out = out
        .split(' ')
        .filter(|w| !is_mixed_script(w))
        .collect::<Vec<_>>()
        .join(" ");

    out = collapse_punct_runs(&out);

    // Strip greetings that don't match the actual time of day.
    let lower = out.to_lowercase();
    for (greeting, valid) in TIMED_GREETINGS {
        if lower.contains(greeting) && !valid.contains(&ctx.time_of_day) {
            out = apply_case_insensitive(&out, greeting, "");
            // Tidy leftover separators like "! " at the start.
            out = out
                .trim_start_matches([' ', ',', '!', '.'])
                .to_string();
        }
    }

    crate::textutil::normalize_spaces(&out)
}
