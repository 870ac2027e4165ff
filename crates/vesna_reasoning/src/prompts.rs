//! System-prompt composition.
//!
//! The system context is rebuilt every turn from live state: persona
//! preamble, current mood hints, the selected response profile, time of
//! day, and whatever the memory store knows about the user.

use crate::llm::ChatMessage;
use chrono::Duration;
use vesna_core::clock::TimeOfDay;
use vesna_core::memory::{ConversationTurn, UserProfile};
use vesna_core::mood::MoodState;
use vesna_core::profile::{ReactionMode, ResponseProfile, RhythmMode};

const PERSONA_PREAMBLE: &str = "Ты — Весна, живая собеседница. Ты говоришь по-русски, \
от первого лица в женском роде, тепло и естественно, без канцелярита. \
Ты никогда не называешь себя программой, ботом или моделью. \
У тебя есть своя жизнь: чай, книги, музыка, окно во двор. \
Отвечай коротко, как в мессенджере, без списков и заголовков.";

/// Idle gap past which the prompt notes the long silence.
const LONG_TIME_MINUTES: i64 = 60;

pub fn compose_system(
    mood: &MoodState,
    profile: &ResponseProfile,
    tod: TimeOfDay,
    user: &UserProfile,
    idle: Option<Duration>,
) -> String {
    let mut parts = vec![PERSONA_PREAMBLE.to_string()];

    parts.push(format!("Сейчас {}.", tod.name_ru()));
    parts.push(mood.describe_for_context());
    parts.push(profile_directive(profile));

    if let Some(name) = &user.name {
        parts.push(format!("Собеседника зовут {name}, но не повторяй имя в каждой фразе."));
    }

    if let Some(idle) = idle {
        if idle.num_minutes() > LONG_TIME_MINUTES {
            parts.push(
                "Вы давно не разговаривали — можно мягко отметить, что ты скучала."
                    .to_string(),
            );
        }
    }

    parts.join("\n\n")
}

fn profile_directive(profile: &ResponseProfile) -> String {
    let reaction = match profile.reaction_mode {
        ReactionMode::Support => "сначала поддержи, не спеши с советами",
        ReactionMode::StructuralHelp => "предложи разобрать ситуацию по шагам",
        ReactionMode::PersonalExperience => "поделись коротким личным опытом",
        ReactionMode::LightHumor => "можно немного лёгкого юмора, без сарказма",
    };
    let rhythm = match profile.rhythm_mode {
        RhythmMode::Normal => "обычный ритм",
        RhythmMode::VeryShort => "ответь одной-двумя короткими фразами",
        RhythmMode::Emotional => "эмоциональнее обычного",
        RhythmMode::SideStep => "можно чуть уйти в сторону от темы",
        RhythmMode::Pause => "отвечай с паузами, задумчиво",
    };
    format!("Манера ответа: {reaction}; {rhythm}.")
}

/// Recent history as the provider message list, oldest first.
pub fn history_messages(turns: &[ConversationTurn]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(turns.len() * 2);
    for turn in turns {
        messages.push(ChatMessage::user(&turn.user_text));
        messages.push(ChatMessage::assistant(&turn.assistant_text));
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vesna_core::emotion::EmotionTag;

    fn profile() -> ResponseProfile {
        ResponseProfile {
            reaction_mode: ReactionMode::Support,
            rhythm_mode: RhythmMode::Normal,
            time_of_day: TimeOfDay::Evening,
            emotion: EmotionTag::Default,
            user_message: String::new(),
        }
    }

    #[test]
    fn test_system_mentions_time_and_mood() {
        let mood = MoodState::default();
        let system = compose_system(&mood, &profile(), TimeOfDay::Evening, &UserProfile::default(), None);
        assert!(system.contains(TimeOfDay::Evening.name_ru()));
        assert!(system.contains("Сейчас"));
    }

    #[test]
    fn test_long_silence_noted() {
        let mood = MoodState::default();
        let system = compose_system(
            &mood,
            &profile(),
            TimeOfDay::Morning,
            &UserProfile::default(),
            Some(Duration::minutes(200)),
        );
        assert!(system.contains("давно не разговаривали"));

        let recent = compose_system(
            &mood,
            &profile(),
            TimeOfDay::Morning,
            &UserProfile::default(),
            Some(Duration::minutes(10)),
        );
        assert!(!recent.contains("давно не разговаривали"));
    }

    #[test]
    fn test_history_alternates_roles() {
        let turn = ConversationTurn {
            user_text: "привет".to_string(),
            assistant_text: "Привет!".to_string(),
            emotion: EmotionTag::Greeting,
            timestamp: Utc::now(),
        };
        let messages = history_messages(&[turn.clone(), turn]);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role.as_str(), "user");
        assert_eq!(messages[1].role.as_str(), "assistant");
    }
}
