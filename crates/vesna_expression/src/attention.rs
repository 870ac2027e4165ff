//! Attention scheduler: "she noticed you went quiet".
//!
//! Fires a gentle check-in after a long silence, with a higher bar at night
//! and an escalation to a concern message when the silence stretches past
//! the concern threshold during the day. Never repeats a recently sent line.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::VecDeque;
use tracing::debug;
use vesna_core::clock::TimeOfDay;
use vesna_core::config::AttentionConfig;
use vesna_core::mood::MoodState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttentionPhase {
    Idle,
    Due,
    Sent,
}

#[derive(Debug, Clone)]
pub struct AttentionState {
    pub last_interaction: DateTime<Utc>,
    pub last_attention_sent: Option<DateTime<Utc>>,
    pub quiet_until: Option<DateTime<Utc>>,
    recent: VecDeque<String>,
}

const OPENERS_MORNING: &[&str] = &["Доброе утро!", "Утро!"];
const OPENERS_DAY: &[&str] = &["Эй.", "Слушай."];
const OPENERS_EVENING: &[&str] = &["Привет, вечер уже.", "Эй, ты тут?"];
const OPENERS_NIGHT: &[&str] = &["Не спится мне что-то.", "Ты ещё не спишь?"];

const GENERIC_TAILS: &[&str] = &[
    "Ты как там? Давно тебя не слышно.",
    "Просто хотела спросить, как ты.",
    "Вспомнила о тебе. Как проходит день?",
];

const CONCERN_LINES: &[&str] = &[
    "Ты весь день молчишь, я уже немного волнуюсь. Всё в порядке?",
    "Давно от тебя ничего нет. Напиши хоть пару слов, ладно?",
];

impl AttentionState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_interaction: now,
            last_attention_sent: None,
            quiet_until: None,
            recent: VecDeque::new(),
        }
    }

    pub fn note_interaction(&mut self, now: DateTime<Utc>) {
        self.last_interaction = now;
        self.quiet_until = None;
    }

    /// User signaled being busy; stay quiet for `minutes`.
    pub fn note_busy(&mut self, now: DateTime<Utc>, minutes: i64) {
        self.quiet_until = Some(now + chrono::Duration::minutes(minutes));
    }

    pub fn phase(&self, now: DateTime<Utc>, config: &AttentionConfig, tod: TimeOfDay) -> AttentionPhase {
        let idle = (now - self.last_interaction).num_minutes();
        let threshold = if tod.is_sleep_window() {
            config.idle_threshold_night_minutes
        } else {
            config.idle_threshold_day_minutes
        };
        if let Some(sent) = self.last_attention_sent {
            if sent >= self.last_interaction {
                return AttentionPhase::Sent;
            }
        }
        if idle >= threshold {
            AttentionPhase::Due
        } else {
            AttentionPhase::Idle
        }
    }

    pub fn check_needed<R: Rng>(
        &mut self,
        now: DateTime<Utc>,
        config: &AttentionConfig,
        tod: TimeOfDay,
        mood: &MoodState,
        last_topic: Option<&str>,
        rng: &mut R,
    ) -> Option<String> {
        if !config.enabled {
            return None;
        }
        if let Some(until) = self.quiet_until {
            if now < until {
                return None;
            }
        }
        if let Some(sent) = self.last_attention_sent {
            if (now - sent).num_minutes() < config.min_gap_minutes {
                return None;
            }
        }

        let idle = (now - self.last_interaction).num_minutes();
        let threshold = if tod.is_sleep_window() {
            config.idle_threshold_night_minutes
        } else {
            config.idle_threshold_day_minutes
        };
        if idle < threshold {
            return None;
        }

        let concern = !tod.is_sleep_window() && idle >= config.concern_threshold_minutes;
        let message = self.compose(config, tod, mood, last_topic, concern, rng)?;

        self.last_attention_sent = Some(now);
        self.remember(config, &message);
        debug!(idle_minutes = idle, concern, "attention check-in fired");
        Some(message)
    }

    fn compose<R: Rng>(
        &self,
        config: &AttentionConfig,
        tod: TimeOfDay,
        mood: &MoodState,
        last_topic: Option<&str>,
        concern: bool,
        rng: &mut R,
    ) -> Option<String> {
        // One resample on a cache hit, then bail until next tick.
        for _ in 0..2 {
            let candidate = if concern {
                CONCERN_LINES[rng.gen_range(0..CONCERN_LINES.len())].to_string()
            } else {
                let opener = match tod {
                    TimeOfDay::EarlyMorning | TimeOfDay::Morning => {
                        OPENERS_MORNING[rng.gen_range(0..OPENERS_MORNING.len())]
                    }
                    TimeOfDay::Noon | TimeOfDay::Afternoon => {
                        OPENERS_DAY[rng.gen_range(0..OPENERS_DAY.len())]
                    }
                    TimeOfDay::Evening => OPENERS_EVENING[rng.gen_range(0..OPENERS_EVENING.len())],
                    TimeOfDay::LateEvening | TimeOfDay::Night => {
                        OPENERS_NIGHT[rng.gen_range(0..OPENERS_NIGHT.len())]
                    }
                };
                let tail = match last_topic {
                    Some(topic) if rng.gen::<f32>() < config.topic_reference_prob => {
                        format!("Я тут вспомнила, ты говорил про {topic}. Как оно?")
                    }
                    _ => {
                        let generic = GENERIC_TAILS[rng.gen_range(0..GENERIC_TAILS.len())];
                        match mood_tail(mood) {
                            Some(tail) if rng.gen::<bool>() => format!("{generic} {tail}"),
                            _ => generic.to_string(),
                        }
                    }
                };
                format!("{opener} {tail}")
            };
            if !self.recent.contains(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    fn remember(&mut self, config: &AttentionConfig, message: &str) {
        if config.recent_cache_size == 0 {
            return;
        }
        if self.recent.len() == config.recent_cache_size {
            self.recent.pop_front();
        }
        self.recent.push_back(message.to_string());
    }
}

fn mood_tail(mood: &MoodState) -> Option<&'static str> {
    use vesna_core::mood::MoodLabel;
    match mood.mood {
        MoodLabel::Cheerful | MoodLabel::Playful | MoodLabel::Excited => {
            Some("У меня сегодня настроение хорошее.")
        }
        MoodLabel::Sad | MoodLabel::Melancholy | MoodLabel::Lonely | MoodLabel::Tired => {
            Some("Я сегодня какая-то тихая.")
        }
        _ => None,
    }
}
