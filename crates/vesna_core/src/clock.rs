//! Time-of-day bucketing.
//!
//! The mood machine, schedulers and pipeline all branch on a coarse
//! 7-bucket day phase rather than raw hours. Each bucket carries the
//! energy baseline the mood machine resets to on every update.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Coarse phase of the day. Derived from the local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeOfDay {
    Night,        // 00:00 - 05:59
    EarlyMorning, // 06:00 - 08:59
    Morning,      // 09:00 - 11:59
    Noon,         // 12:00 - 13:59
    Afternoon,    // 14:00 - 17:59
    Evening,      // 18:00 - 21:59
    LateEvening,  // 22:00 - 23:59
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => Self::Night,
            6..=8 => Self::EarlyMorning,
            9..=11 => Self::Morning,
            12..=13 => Self::Noon,
            14..=17 => Self::Afternoon,
            18..=21 => Self::Evening,
            _ => Self::LateEvening,
        }
    }

    pub fn from_datetime(now: DateTime<Utc>) -> Self {
        Self::from_hour(now.hour())
    }

    /// Baseline energy the organism settles to at this hour.
    pub fn energy_baseline(&self) -> f32 {
        match self {
            Self::Night => 0.2,
            Self::EarlyMorning => 0.45,
            Self::Morning => 0.8,
            Self::Noon => 1.0,
            Self::Afternoon => 0.85,
            Self::Evening => 0.6,
            Self::LateEvening => 0.35,
        }
    }

    /// Russian display name, used in prompts and attention openers.
    pub fn name_ru(&self) -> &'static str {
        match self {
            Self::Night => "ночь",
            Self::EarlyMorning => "раннее утро",
            Self::Morning => "утро",
            Self::Noon => "полдень",
            Self::Afternoon => "день",
            Self::Evening => "вечер",
            Self::LateEvening => "поздний вечер",
        }
    }

    /// Hours where unsolicited messages are held back and bedtime
    /// phrasing is appropriate.
    pub fn is_sleep_window(&self) -> bool {
        matches!(self, Self::Night | Self::LateEvening)
    }
}

/// Season of the year, used for ambient sensory detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Self::Winter,
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            _ => Self::Autumn,
        }
    }

    pub fn from_datetime(now: DateTime<Utc>) -> Self {
        Self::from_month(now.month())
    }

    pub fn name_ru(&self) -> &'static str {
        match self {
            Self::Winter => "зима",
            Self::Spring => "весна",
            Self::Summer => "лето",
            Self::Autumn => "осень",
        }
    }
}
