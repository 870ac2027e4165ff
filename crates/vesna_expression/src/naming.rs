//! Stage 11: name-overuse reduction.
//!
//! A reply that repeats the user's name reads like a sales script. Only the
//! first occurrence stays, and a leading name-vocative is dropped when the
//! previous reply already opened with it.

use crate::context::StageContext;
use crate::textutil::{capitalize_first, normalize_spaces};

pub fn name_reduction(text: &str, ctx: &StageContext) -> String {
    let Some(name) = ctx.user_name else {
        return text.to_string();
    };
    if name.is_empty() {
        return text.to_string();
    }

    let mut out = text.to_string();

    // Keep only the first occurrence.
    if let Some(first) = out.find(name) {
        let tail_start = first + name.len();
        let mut tail = out[tail_start..].to_string();
        while let Some(pos) = tail.find(name) {
            let mut end = pos + name.len();
            // Swallow the vocative comma after the removed name.
            let rest = &tail[end..];
            if let Some(stripped) = rest.strip_prefix(", ") {
                end += rest.len() - stripped.len();
            } else if let Some(stripped) = rest.strip_prefix(",") {
                end += rest.len() - stripped.len();
            }
            tail.replace_range(pos..end, "");
        }
        out = format!("{}{}", &out[..tail_start], tail);
    }

    // Two name-openers in a row sound mechanical.
    if ctx.prev_opened_with_name {
        for prefix in [format!("{name}, "), format!("{name}! "), format!("{name}. ")] {
            if let Some(rest) = out.strip_prefix(&prefix) {
                out = capitalize_first(rest);
                break;
            }
        }
    }

    normalize_spaces(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StageContext;
    use vesna_core::clock::{Season, TimeOfDay};
    use vesna_core::config::PipelineConfig;
    use vesna_core::emotion::EmotionTag;
    use vesna_core::mood::MoodState;
    use vesna_core::profile::{ReactionMode, ResponseProfile, RhythmMode};

    fn run(text: &str, name: Option<&str>, prev_opened: bool) -> String {
        let mood = MoodState::default();
        let profile = ResponseProfile {
            reaction_mode: ReactionMode::Support,
            rhythm_mode: RhythmMode::Normal,
            time_of_day: TimeOfDay::Morning,
            emotion: EmotionTag::Default,
            user_message: String::new(),
        };
        let config = PipelineConfig::default();
        let ctx = StageContext {
            emotion: EmotionTag::Default,
            user_message: "привет",
            mood: &mood,
            profile: &profile,
            time_of_day: TimeOfDay::Morning,
            season: Season::Spring,
            user_name: name,
            prev_assistant_reply: None,
            prev_opened_with_name: prev_opened,
            femininity: 0.7,
            raw_len: 0,
            config: &config,
        };
        name_reduction(text, &ctx)
    }

    #[test]
    fn test_keeps_only_first_occurrence() {
        let out = run("Саша, я понимаю. Саша, это пройдёт. Правда, Саша.", Some("Саша"), false);
        assert_eq!(out.matches("Саша").count(), 1, "got: {out}");
    }

    #[test]
    fn test_strips_leading_vocative_after_named_opener() {
        let out = run("Саша, доброе утро!", Some("Саша"), true);
        assert_eq!(out, "Доброе утро!");
    }

    #[test]
    fn test_noop_without_name() {
        let text = "Я понимаю тебя.";
        assert_eq!(run(text, None, false), text);
    }
}
