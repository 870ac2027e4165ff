//! Stage 10: emoji harmonization.
//!
//! In serious contexts cheerful emoji are stripped outright and at most one
//! soft emoji survives. Elsewhere the text passes through untouched.

use crate::context::StageContext;

const CHEERFUL: &[char] = &['😄', '😂', '🎉', '😜', '😛', '🤣', '✨', '😁'];
const SOFT: &[char] = &['🙂', '😌', '🌙', '💛', '🤍', '☁'];

pub fn emoji_harmonize(text: &str, ctx: &StageContext) -> String {
    if !ctx.emotion.is_serious() && !ctx.is_distress() {
        return text.to_string();
    }

    let mut soft_seen = false;
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if CHEERFUL.contains(&ch) {
            continue;
        }
        if SOFT.contains(&ch) {
            if soft_seen {
                continue;
            }
            soft_seen = true;
        }
        // Variation selector left behind by a stripped emoji.
        if ch == '\u{fe0f}' && out.chars().last().map_or(true, |p| p.is_whitespace()) {
            continue;
        }
        out.push(ch);
    }
    crate::textutil::normalize_spaces(&out)
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

    fn run(emotion: EmotionTag, text: &str) -> String {
        let mood = MoodState::default();
        let profile = ResponseProfile {
            reaction_mode: ReactionMode::Support,
            rhythm_mode: RhythmMode::Normal,
            time_of_day: TimeOfDay::Evening,
            emotion,
            user_message: String::new(),
        };
        let config = PipelineConfig::default();
        let ctx = StageContext {
            emotion,
            user_message: "мне плохо",
            mood: &mood,
            profile: &profile,
            time_of_day: TimeOfDay::Evening,
            season: Season::Autumn,
            user_name: None,
            prev_assistant_reply: None,
            prev_opened_with_name: false,
            femininity: 0.7,
            raw_len: 0,
            config: &config,
        };
        emoji_harmonize(text, &ctx)
    }

    #[test]
    fn test_strips_cheerful_in_serious_context() {
        let out = run(EmotionTag::Sadness, "Мне жаль 😄🎉, я рядом.");
        assert!(!out.contains('😄') && !out.contains('🎉'), "got: {out}");
    }

    #[test]
    fn test_keeps_one_soft_emoji() {
        let out = run(EmotionTag::Anxiety, "Я рядом 😌 и никуда не уйду 🙂🌙.");
        let soft_count = out.chars().filter(|c| SOFT.contains(c)).count();
        assert_eq!(soft_count, 1, "got: {out}");
    }

    #[test]
    fn test_untouched_in_cheerful_context() {
        let text = "Ура! 😄🎉";
        assert_eq!(run(EmotionTag::Joy, text), text);
    }
}
