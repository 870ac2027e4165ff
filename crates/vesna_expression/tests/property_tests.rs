//! Property coverage for the expression layer: guard idempotence, the
//! question-rate bound, and self-repeat elimination under arbitrary input.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use vesna_core::clock::{Season, TimeOfDay};
use vesna_core::config::PipelineConfig;
use vesna_core::emotion::EmotionTag;
use vesna_core::mood::MoodState;
use vesna_core::profile::{ReactionMode, ResponseProfile, RhythmMode};
use vesna_expression::coherence::coherence_guard;
use vesna_expression::context::StageContext;
use vesna_expression::repeat::repeat_guard;
use vesna_expression::textutil::normal_form;
use vesna_expression::QuestionRateTracker;

struct Fixture {
    mood: MoodState,
    profile: ResponseProfile,
    config: PipelineConfig,
    user_message: String,
}

fn fixture(emotion: EmotionTag, user_message: &str) -> Fixture {
    Fixture {
        mood: MoodState::default(),
        profile: ResponseProfile {
            reaction_mode: ReactionMode::Support,
            rhythm_mode: RhythmMode::Normal,
            time_of_day: TimeOfDay::Evening,
            emotion,
            user_message: user_message.to_string(),
        },
        config: PipelineConfig::default(),
        user_message: user_message.to_string(),
    }
}

fn ctx<'a>(f: &'a Fixture, emotion: EmotionTag, prev: Option<&'a str>) -> StageContext<'a> {
    StageContext {
        emotion,
        user_message: &f.user_message,
        mood: &f.mood,
        profile: &f.profile,
        time_of_day: TimeOfDay::Evening,
        season: Season::Autumn,
        user_name: None,
        prev_assistant_reply: prev,
        prev_opened_with_name: false,
        femininity: 0.7,
        raw_len: 200,
        config: &f.config,
    }
}

fn sentence_pool() -> impl Strategy<Value = String> {
    let sentences = prop::sample::select(vec![
        "Я рядом с тобой.",
        "Привет!",
        "Расскажи, как прошёл день?",
        "Мне кажется, всё наладится.",
        "Спокойной ночи.",
        "Хочешь, разобьём это на шаги?",
        "Это был длинный день, правда.",
        "Да.",
    ]);
    prop::collection::vec(sentences, 0..8).prop_map(|v| {
        v.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(" ")
    })
}

proptest! {
    #[test]
    fn coherence_guard_is_idempotent(text in sentence_pool(), tag_idx in 0usize..3) {
        let (emotion, msg) = match tag_idx {
            0 => (EmotionTag::Default, "расскажи про сегодняшний день"),
            1 => (EmotionTag::Sadness, "мне очень грустно и тяжело"),
            _ => (EmotionTag::Farewell, "спокойной ночи"),
        };
        let f = fixture(emotion, msg);
        let c = ctx(&f, emotion, None);
        let once = coherence_guard(&text, &c);
        let twice = coherence_guard(&once, &c);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn repeat_guard_always_breaks_exact_repeat(seed in 0u64..500) {
        let f = fixture(EmotionTag::Default, "ну и что скажешь");
        let prev = "Я рядом с тобой.";
        let c = ctx(&f, EmotionTag::Default, Some(prev));
        let mut rng = StdRng::seed_from_u64(seed);
        let out = repeat_guard("Я рядом с тобой!", &c, &mut rng);
        prop_assert_ne!(normal_form(&out), normal_form(prev));
    }

    #[test]
    fn question_rate_stays_bounded_after_warmup(flags in prop::collection::vec(any::<bool>(), 40..120)) {
        let f = fixture(EmotionTag::Default, "расскажи что-нибудь");
        let c = ctx(&f, EmotionTag::Default, None);
        let mut tracker = QuestionRateTracker::new(f.config.question_window);
        let mut outputs: Vec<bool> = Vec::new();
        for &asks in &flags {
            let reply = if asks {
                "Понимаю тебя. А что было дальше?"
            } else {
                "Понимаю тебя."
            };
            let out = tracker.apply(reply, &c);
            outputs.push(out.contains('?'));
        }
        // Over any post-warm-up window of the tracker's size, the asked
        // ratio never exceeds the configured maximum by more than one slot.
        let w = f.config.question_window;
        if outputs.len() > w + 4 {
            for window in outputs[4..].windows(w) {
                let asked = window.iter().filter(|&&q| q).count() as f32;
                let ratio = asked / w as f32;
                prop_assert!(
                    ratio <= f.config.max_question_rate + 1.0 / w as f32,
                    "ratio {} over bound", ratio
                );
            }
        }
    }
}
