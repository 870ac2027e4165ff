//! Stage 3: emotion micro-expression.
//!
//! For serious emotions the reply gets small human touches: a soft opener,
//! a full stop turned into an ellipsis, and — for fatigue and sadness — a
//! hard cut to two sentences so she doesn't lecture a tired person.

use crate::context::StageContext;
use crate::textutil::split_sentences;
use rand::Rng;
use vesna_core::emotion::EmotionTag;

const SOFT_OPENERS: &[&str] = &["Честно говоря… ", "Знаешь… ", "Если честно… "];

pub fn micro_expression<R: Rng>(text: &str, ctx: &StageContext, rng: &mut R) -> String {
    if !ctx.emotion.is_serious() {
        return text.to_string();
    }

    let mut out = text.to_string();

    if rng.gen::<f32>() < ctx.config.soft_opener_prob && !out.starts_with(['Ч', 'З', 'Е']) {
        let opener = SOFT_OPENERS[rng.gen_range(0..SOFT_OPENERS.len())];
        let mut lowered: String = out;
        if let Some(first) = lowered.chars().next() {
            if first.is_uppercase() {
                let rest: String = lowered.chars().skip(1).collect();
                lowered = format!("{}{}", first.to_lowercase(), rest);
            }
        }
        out = format!("{opener}{lowered}");
    }

    if rng.gen::<f32>() < ctx.config.ellipsis_prob {
        if let Some(pos) = out.find(". ") {
            out.replace_range(pos..pos + 2, "… ");
        }
    }

    if matches!(ctx.emotion, EmotionTag::Sadness | EmotionTag::Exhaustion) {
        let sentences = split_sentences(&out);
        if sentences.len() > 2 {
            out = sentences[..2].join(" ");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StageContext;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use vesna_core::clock::{Season, TimeOfDay};
    use vesna_core::config::PipelineConfig;
    use vesna_core::mood::MoodState;
    use vesna_core::profile::{ReactionMode, ResponseProfile, RhythmMode};

    fn run_with(emotion: EmotionTag, text: &str, seed: u64) -> String {
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
            raw_len: text.chars().count(),
            config: &config,
        };
        let mut rng = StdRng::seed_from_u64(seed);
        micro_expression(text, &ctx, &mut rng)
    }

    #[test]
    fn test_noop_for_neutral_emotion() {
        let text = "Первое. Второе. Третье.";
        assert_eq!(run_with(EmotionTag::Default, text, 1), text);
    }

    #[test]
    fn test_sadness_truncates_to_two_sentences() {
        let out = run_with(
            EmotionTag::Sadness,
            "Первое предложение. Второе предложение. Третье предложение. Четвёртое.",
            3,
        );
        let n = crate::textutil::split_sentences(&out).len();
        assert!(n <= 2, "expected at most 2 sentences, got {n}: {out}");
    }

    #[test]
    fn test_opener_fires_eventually() {
        let fired = (0..60u64).any(|seed| {
            run_with(EmotionTag::Anxiety, "Мне жаль, что так вышло.", seed)
                .starts_with(['Ч', 'З', 'Е'])
        });
        assert!(fired, "soft opener never fired over 60 seeds");
    }
}
