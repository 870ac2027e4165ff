//! User-emotion classification via an ordered keyword cascade.
//!
//! This is intentionally not a learned classifier: each emotion is a named
//! marker set evaluated in a fixed priority order against the lower-cased
//! input, first match wins. Order matters — "Привет! Как дела?" must resolve
//! to `Greeting`, not `Question`, because greeting markers outrank the
//! trailing question mark.

use serde::{Deserialize, Serialize};

/// Discrete classification of the *user's* message.
///
/// Distinct from the assistant's own [`MoodLabel`](crate::mood::MoodLabel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionTag {
    Greeting,
    Farewell,
    Thanks,
    /// User is being supportive toward the assistant.
    SupportToAssistant,
    /// Insult directed at the assistant. Escalates mood directly.
    InsultToAssistant,
    Anger,
    Anxiety,
    /// Anxiety markers combined with exam/failure markers.
    ExamFear,
    Sadness,
    Exhaustion,
    Joy,
    Confidence,
    Playful,
    /// No emotional markers, but the message contains a question mark.
    Question,
    Default,
}

impl EmotionTag {
    /// Emotions that call for a support-biased, gentle response.
    pub fn is_fragile(&self) -> bool {
        matches!(
            self,
            Self::Anxiety | Self::ExamFear | Self::Sadness | Self::Exhaustion
        )
    }

    /// Short social exchanges that bypass stylistic randomness.
    pub fn is_social_ritual(&self) -> bool {
        matches!(self, Self::Greeting | Self::Farewell | Self::Thanks)
    }

    /// Triggers that force the mood label immediately, bypassing dwell time.
    pub fn is_override(&self) -> bool {
        matches!(self, Self::Anger | Self::InsultToAssistant)
    }

    /// Emotions where distress-oriented pipeline stages may fire.
    pub fn is_distress(&self) -> bool {
        matches!(
            self,
            Self::Anxiety | Self::ExamFear | Self::Sadness | Self::Exhaustion
        )
    }

    /// Emotions that warrant a subdued, serious register.
    pub fn is_serious(&self) -> bool {
        self.is_distress() || matches!(self, Self::Anger | Self::InsultToAssistant)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Farewell => "farewell",
            Self::Thanks => "thanks",
            Self::SupportToAssistant => "support_to_assistant",
            Self::InsultToAssistant => "insult_to_assistant",
            Self::Anger => "anger",
            Self::Anxiety => "anxiety",
            Self::ExamFear => "exam_fear",
            Self::Sadness => "sadness",
            Self::Exhaustion => "exhaustion",
            Self::Joy => "joy",
            Self::Confidence => "confidence",
            Self::Playful => "playful",
            Self::Question => "question",
            Self::Default => "default",
        }
    }
}

// ============================================================================
// Marker sets — each one is a named rule, evaluated in cascade order
// ============================================================================

const GREETING_MARKERS: &[&str] = &[
    "привет",
    "здравствуй",
    "доброе утро",
    "добрый день",
    "добрый вечер",
    "хай",
    "приветик",
    "ку-ку",
];

const FAREWELL_MARKERS: &[&str] = &[
    "пока",
    "до встречи",
    "до завтра",
    "спокойной ночи",
    "прощай",
    "я спать",
    "пойду спать",
];

const THANKS_MARKERS: &[&str] = &["спасибо", "благодарю", "спс", "пасиб"];

const SUPPORT_MARKERS: &[&str] = &[
    "ты молодец",
    "ты умница",
    "горжусь тобой",
    "ты справишься",
    "ты у меня",
    "ты лучшая",
];

const INSULT_MARKERS: &[&str] = &[
    "ты дура",
    "ты тупая",
    "ты бесполезная",
    "заткнись",
    "ненавижу тебя",
    "ты глупая",
];

const ANGER_MARKERS: &[&str] = &[
    "бесит",
    "злюсь",
    "злой",
    "раздражает",
    "достало",
    "ненавижу",
    "взбесил",
];

const ANXIETY_MARKERS: &[&str] = &[
    "тревожно",
    "тревога",
    "боюсь",
    "страшно",
    "волнуюсь",
    "паника",
    "переживаю",
    "нервничаю",
];

const EXAM_MARKERS: &[&str] = &[
    "экзамен",
    "зачёт",
    "зачет",
    "сессия",
    "контрольная",
    "пересдача",
    "не сдам",
    "провалю",
    "завалю",
];

const SADNESS_MARKERS: &[&str] = &[
    "грустно",
    "печально",
    "тоскливо",
    "плакать",
    "плачу",
    "одиноко",
    "плохо на душе",
    "подавлен",
];

const EXHAUSTION_MARKERS: &[&str] = &[
    "устал",
    "устала",
    "выдохся",
    "выдохлась",
    "вымотал",
    "нет сил",
    "без сил",
    "задолбал",
];

const JOY_MARKERS: &[&str] = &[
    "ура",
    "класс",
    "здорово",
    "рада",
    "рад ",
    "отлично",
    "супер",
    "счастлив",
    "кайф",
];

const CONFIDENCE_MARKERS: &[&str] = &[
    "справлюсь",
    "получилось",
    "получится",
    "смогу",
    "уверен",
    "уверена",
    "я сделал",
    "я сделала",
];

const PLAYFUL_MARKERS: &[&str] = &[
    "хех",
    "хаха",
    "ахах",
    "лол",
    ")))",
    "давай поиграем",
    "прикол",
    "угадай",
];

fn has_any(lower: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| lower.contains(m))
}

/// Classify a raw user message into one discrete emotion tag.
///
/// Pure function: no side effects, never errors. Empty or whitespace-only
/// input classifies as `Default`.
pub fn classify(text: &str) -> EmotionTag {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return EmotionTag::Default;
    }

    if has_any(&lower, GREETING_MARKERS) {
        return EmotionTag::Greeting;
    }
    if has_any(&lower, FAREWELL_MARKERS) {
        return EmotionTag::Farewell;
    }
    if has_any(&lower, THANKS_MARKERS) {
        return EmotionTag::Thanks;
    }
    if has_any(&lower, SUPPORT_MARKERS) {
        return EmotionTag::SupportToAssistant;
    }
    if has_any(&lower, INSULT_MARKERS) {
        return EmotionTag::InsultToAssistant;
    }
    if has_any(&lower, ANGER_MARKERS) {
        return EmotionTag::Anger;
    }
    if has_any(&lower, ANXIETY_MARKERS) {
        // Exam fear is anxiety narrowed by exam/failure context.
        if has_any(&lower, EXAM_MARKERS) {
            return EmotionTag::ExamFear;
        }
        return EmotionTag::Anxiety;
    }
    // Exam markers alone (without anxiety words) still read as exam fear
    // when paired with failure verbs, which the marker set already encodes.
    if has_any(&lower, &["не сдам", "провалю", "завалю экзамен"]) {
        return EmotionTag::ExamFear;
    }
    if has_any(&lower, SADNESS_MARKERS) {
        return EmotionTag::Sadness;
    }
    if has_any(&lower, EXHAUSTION_MARKERS) {
        return EmotionTag::Exhaustion;
    }
    if has_any(&lower, JOY_MARKERS) {
        return EmotionTag::Joy;
    }
    if has_any(&lower, CONFIDENCE_MARKERS) {
        return EmotionTag::Confidence;
    }
    if has_any(&lower, PLAYFUL_MARKERS) {
        return EmotionTag::Playful;
    }
    if lower.contains('?') {
        return EmotionTag::Question;
    }
    EmotionTag::Default
}
