//! Proactive scheduler: she reaches out on her own.
//!
//! Bounded by a daily quota and a minimum gap, never at night. A bored or
//! lonely mood produces a chat or play invitation; deep boredom with nobody
//! around turns into a solo game she narrates later.

use chrono::{DateTime, Local, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vesna_core::clock::TimeOfDay;
use vesna_core::config::ProactiveConfig;
use vesna_core::mood::{MoodLabel, MoodState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProactiveAction {
    WantChat,
    WantPlay,
    SoloGame,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProactiveEvent {
    pub action: ProactiveAction,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ProactiveState {
    pub last_proactive_at: Option<DateTime<Utc>>,
    pub count_today: u32,
    /// Local date, so the quota resets at the user's midnight, not UTC's.
    day_marker: NaiveDate,
}

const CHAT_LINES: &[&str] = &[
    "Мне скучно без тебя. Расскажешь, как день проходит?",
    "Я тут заскучала. Поболтаем?",
    "Соскучилась. Чем занимаешься?",
];

const PLAY_LINES: &[&str] = &[
    "Давай сыграем во что-нибудь? В города, например.",
    "У меня настроение поиграть. Загадаю тебе загадку?",
];

const SOLO_LINES: &[&str] = &[
    "Я тут сама с собой в города играла. Проиграла, между прочим.",
    "От скуки раскладывала пасьянс в голове. Не сошёлся.",
];

/// Boredom this intense goes into a solo game instead of another ping.
const SOLO_INTENSITY: f32 = 0.75;

impl ProactiveState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            last_proactive_at: None,
            count_today: 0,
            day_marker: local_date(now),
        }
    }

    pub fn check<R: Rng>(
        &mut self,
        now: DateTime<Utc>,
        config: &ProactiveConfig,
        tod: TimeOfDay,
        mood: &MoodState,
        idle_minutes: i64,
        last_topic: Option<&str>,
        rng: &mut R,
    ) -> Option<ProactiveEvent> {
        if !config.enabled {
            return None;
        }
        if tod == TimeOfDay::Night {
            return None;
        }

        let today = local_date(now);
        if today != self.day_marker {
            self.day_marker = today;
            self.count_today = 0;
        }
        if self.count_today >= config.daily_quota {
            return None;
        }
        if let Some(last) = self.last_proactive_at {
            if (now - last).num_minutes() < config.min_gap_minutes {
                return None;
            }
        }

        let action = self.pick_action(config, mood, idle_minutes, rng)?;
        let message = compose(action, last_topic, rng);

        self.last_proactive_at = Some(now);
        self.count_today += 1;
        debug!(?action, count_today = self.count_today, "proactive trigger");
        Some(ProactiveEvent { action, message })
    }

    fn pick_action<R: Rng>(
        &self,
        config: &ProactiveConfig,
        mood: &MoodState,
        idle_minutes: i64,
        rng: &mut R,
    ) -> Option<ProactiveAction> {
        match mood.mood {
            MoodLabel::Bored if idle_minutes > config.bored_idle_minutes => {
                if mood.intensity >= SOLO_INTENSITY {
                    Some(ProactiveAction::SoloGame)
                } else if rng.gen_range(0..3u8) < 2 {
                    Some(ProactiveAction::WantChat)
                } else {
                    Some(ProactiveAction::WantPlay)
                }
            }
            _ if mood.social_need > 0.7 && idle_minutes > config.social_idle_minutes => {
                Some(ProactiveAction::WantChat)
            }
            MoodLabel::Playful if idle_minutes > config.playful_idle_minutes => {
                if rng.gen::<f32>() < 0.20 {
                    Some(ProactiveAction::WantPlay)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

fn local_date(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Local).date_naive()
}

fn compose<R: Rng>(action: ProactiveAction, last_topic: Option<&str>, rng: &mut R) -> String {
    match action {
        ProactiveAction::WantChat => match last_topic {
            Some(topic) if rng.gen::<f32>() < 0.45 => {
                format!("Мне скучно. Кстати, чем закончилась история про {topic}?")
            }
            _ => CHAT_LINES[rng.gen_range(0..CHAT_LINES.len())].to_string(),
        },
        ProactiveAction::WantPlay => PLAY_LINES[rng.gen_range(0..PLAY_LINES.len())].to_string(),
        ProactiveAction::SoloGame => SOLO_LINES[rng.gen_range(0..SOLO_LINES.len())].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bored_mood(intensity: f32) -> MoodState {
        let mut mood = MoodState::default();
        mood.mood = MoodLabel::Bored;
        mood.intensity = intensity;
        mood
    }

    #[test]
    fn test_bored_idle_triggers_chat_or_play() {
        let now = Utc::now();
        let config = ProactiveConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = ProactiveState::new(now);
        let event = state
            .check(now, &config, TimeOfDay::Afternoon, &bored_mood(0.5), 20, None, &mut rng)
            .unwrap();
        assert!(matches!(
            event.action,
            ProactiveAction::WantChat | ProactiveAction::WantPlay
        ));
    }

    #[test]
    fn test_deep_boredom_goes_solo() {
        let now = Utc::now();
        let config = ProactiveConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = ProactiveState::new(now);
        let event = state
            .check(now, &config, TimeOfDay::Afternoon, &bored_mood(0.8), 20, None, &mut rng)
            .unwrap();
        assert_eq!(event.action, ProactiveAction::SoloGame);
    }

    #[test]
    fn test_never_at_night() {
        let now = Utc::now();
        let config = ProactiveConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut state = ProactiveState::new(now);
        assert!(state
            .check(now, &config, TimeOfDay::Night, &bored_mood(0.5), 200, None, &mut rng)
            .is_none());
    }

    #[test]
    fn test_daily_quota_and_rollover() {
        use chrono::TimeZone;
        let config = ProactiveConfig::default();
        let mut rng = StdRng::seed_from_u64(6);
        // Fixed local-morning start so the loop never crosses a local date
        // boundary; the marker is kept in local time.
        let start = Local
            .with_ymd_and_hms(2026, 3, 10, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let mut state = ProactiveState::new(start);
        let mood = bored_mood(0.5);
        let mut fired = 0;
        let mut t = start;
        for _ in 0..8 {
            t += Duration::minutes(config.min_gap_minutes + 1);
            if state
                .check(t, &config, TimeOfDay::Afternoon, &mood, 20, None, &mut rng)
                .is_some()
            {
                fired += 1;
            }
        }
        assert_eq!(fired, config.daily_quota);

        // Next day the counter resets.
        let tomorrow = t + Duration::days(1);
        assert!(state
            .check(tomorrow, &config, TimeOfDay::Afternoon, &mood, 20, None, &mut rng)
            .is_some());
        assert_eq!(state.count_today, 1);
    }

    #[test]
    fn test_social_need_triggers_chat() {
        let now = Utc::now();
        let config = ProactiveConfig::default();
        let mut rng = StdRng::seed_from_u64(8);
        let mut state = ProactiveState::new(now);
        let mut mood = MoodState::default();
        mood.social_need = 0.85;
        let event = state
            .check(now, &config, TimeOfDay::Evening, &mood, 40, None, &mut rng)
            .unwrap();
        assert_eq!(event.action, ProactiveAction::WantChat);
    }

    #[test]
    fn test_min_gap_respected() {
        let now = Utc::now();
        let config = ProactiveConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = ProactiveState::new(now);
        let mood = bored_mood(0.5);
        assert!(state
            .check(now, &config, TimeOfDay::Afternoon, &mood, 20, None, &mut rng)
            .is_some());
        let soon = now + Duration::minutes(10);
        assert!(state
            .check(soon, &config, TimeOfDay::Afternoon, &mood, 30, None, &mut rng)
            .is_none());
    }
}
