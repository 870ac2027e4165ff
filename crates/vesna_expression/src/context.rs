//! Per-turn context shared by every pipeline stage.

use vesna_core::clock::{Season, TimeOfDay};
use vesna_core::config::PipelineConfig;
use vesna_core::emotion::EmotionTag;
use vesna_core::mood::MoodState;
use vesna_core::profile::ResponseProfile;

/// Everything a stage may look at. Stages receive the text separately and
/// must not mutate the context.
pub struct StageContext<'a> {
    pub emotion: EmotionTag,
    pub user_message: &'a str,
    pub mood: &'a MoodState,
    pub profile: &'a ResponseProfile,
    pub time_of_day: TimeOfDay,
    pub season: Season,
    pub user_name: Option<&'a str>,
    pub prev_assistant_reply: Option<&'a str>,
    /// Whether the previous assistant turn opened with the user's name.
    pub prev_opened_with_name: bool,
    /// Feminine-intonation level from config, in [0, 1].
    pub femininity: f32,
    /// Character count of the raw candidate before any stage ran.
    pub raw_len: usize,
    pub config: &'a PipelineConfig,
}

impl<'a> StageContext<'a> {
    /// Bedtime framing: an explicit going-to-sleep message, or a farewell
    /// during the sleep window.
    pub fn is_sleep_context(&self) -> bool {
        let lower = self.user_message.to_lowercase();
        const SLEEP_MARKERS: &[&str] =
            &["спокойной ночи", "пойду спать", "ложусь спать", "я спать"];
        if SLEEP_MARKERS.iter().any(|m| lower.contains(m)) {
            return true;
        }
        self.emotion == EmotionTag::Farewell && self.time_of_day.is_sleep_window()
    }

    /// Whether the user message reads as a concrete task/problem — gates
    /// the "break it into steps" artifact check.
    pub fn is_task_like(&self) -> bool {
        let lower = self.user_message.to_lowercase();
        const TASK_MARKERS: &[&str] = &[
            "надо",
            "нужно",
            "задач",
            "сделать",
            "разобраться",
            "экзамен",
            "работ",
            "дедлайн",
            "не успеваю",
        ];
        TASK_MARKERS.iter().any(|m| lower.contains(m))
    }

    pub fn is_distress(&self) -> bool {
        self.emotion.is_distress()
    }
}
