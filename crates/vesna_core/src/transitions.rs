//! Mood transition tables.
//!
//! Three lookup layers feed the candidate cascade in `mood.rs`:
//! per-emotion scalar deltas, the explicit emotion→mood map, and the
//! per-mood "natural transitions" adjacency list. The numbers here are
//! empirically tuned configuration, not derived quantities.

use crate::emotion::EmotionTag;
use crate::mood::{MoodLabel, MoodState};

/// Scalar impact of one detected user emotion.
///
/// `valence`/`arousal` are *targets* the smoothed user affect is blended
/// toward, not increments.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmotionDelta {
    pub stress: f32,
    pub warmth: f32,
    pub valence: f32,
    pub arousal: f32,
}

/// Per-emotion delta table. Unknown/neutral tags produce an empty delta.
pub fn emotion_delta(emotion: EmotionTag) -> EmotionDelta {
    use EmotionTag::*;
    let (stress, warmth, valence, arousal) = match emotion {
        Anger => (0.18, -0.06, -0.50, 0.60),
        InsultToAssistant => (0.22, -0.10, -0.60, 0.65),
        Anxiety => (0.14, 0.04, -0.35, 0.45),
        ExamFear => (0.16, 0.05, -0.40, 0.50),
        Sadness => (0.08, 0.06, -0.45, -0.20),
        Exhaustion => (0.06, 0.04, -0.25, -0.35),
        Joy => (-0.10, 0.08, 0.55, 0.35),
        Confidence => (-0.08, 0.05, 0.40, 0.20),
        Playful => (-0.06, 0.06, 0.45, 0.40),
        Greeting => (-0.03, 0.04, 0.20, 0.10),
        Farewell => (0.0, 0.02, 0.05, -0.10),
        Thanks => (-0.05, 0.07, 0.35, 0.10),
        SupportToAssistant => (-0.12, 0.10, 0.50, 0.15),
        Question => (0.0, 0.01, 0.05, 0.05),
        Default => (0.0, 0.0, 0.0, 0.0),
    };
    EmotionDelta {
        stress,
        warmth,
        valence,
        arousal,
    }
}

/// Explicit emotion→mood mapping, highest-priority step of the candidate
/// cascade. `None` falls through to the threshold rules.
pub fn explicit_candidate(emotion: EmotionTag, state: &MoodState) -> Option<MoodLabel> {
    use EmotionTag::*;
    match emotion {
        Anxiety | ExamFear => {
            // High stored warmth lets her meet the user's anxiety with
            // tenderness instead of mirroring it.
            if state.warmth > 0.62 {
                Some(MoodLabel::Tender)
            } else {
                Some(MoodLabel::Anxious)
            }
        }
        Sadness => {
            if state.warmth > 0.66 {
                Some(MoodLabel::Tender)
            } else {
                Some(MoodLabel::Sad)
            }
        }
        Exhaustion => Some(MoodLabel::Tired),
        Joy => Some(MoodLabel::Cheerful),
        Confidence => Some(MoodLabel::Focused),
        Playful => Some(MoodLabel::Playful),
        Thanks | SupportToAssistant => Some(MoodLabel::Warm),
        _ => None,
    }
}

/// Threshold rules on the continuous scalars, applied in this fixed order
/// when no explicit mapping fired.
pub fn threshold_candidate(state: &MoodState) -> Option<MoodLabel> {
    if state.stress > 0.85 {
        return Some(MoodLabel::Overwhelmed);
    }
    if state.energy < 0.3 {
        return Some(MoodLabel::Tired);
    }
    if state.stress > 0.75 {
        return Some(MoodLabel::Anxious);
    }
    if state.social_need > 0.8 {
        return Some(MoodLabel::Lonely);
    }
    if state.warmth > 0.75 && state.stress < 0.4 {
        return Some(MoodLabel::Warm);
    }
    if state.energy > 0.85 && state.user_valence > 0.3 {
        return Some(MoodLabel::Excited);
    }
    if state.social_need > 0.65 && state.energy < 0.5 {
        return Some(MoodLabel::Bored);
    }
    None
}

/// Moods each mood naturally drifts into when nothing pushes harder.
pub fn natural_transitions(mood: MoodLabel) -> &'static [MoodLabel] {
    use MoodLabel::*;
    match mood {
        Calm => &[Warm, Bored, Melancholy],
        Warm => &[Tender, Cheerful, Calm],
        Tender => &[Warm, Vulnerable, Calm],
        Cheerful => &[Playful, Excited, Warm],
        Playful => &[Cheerful, Excited, Bored],
        Excited => &[Cheerful, Playful, Tired],
        Focused => &[Calm, Tired, Bored],
        Melancholy => &[Sad, Calm, Lonely],
        Anxious => &[Overwhelmed, Vulnerable, Calm],
        Overwhelmed => &[Anxious, Tired, Vulnerable],
        Sad => &[Melancholy, Lonely, Vulnerable],
        Tired => &[Calm, Bored, Melancholy],
        Bored => &[Playful, Lonely, Calm],
        Lonely => &[Sad, Bored, Vulnerable],
        Vulnerable => &[Tender, Sad, Anxious],
        Angry => &[Offended, Anxious, Tired],
        Offended => &[Angry, Vulnerable, Melancholy],
    }
}

/// Whether a transition target is plausible given the current scalars.
/// Filters the adjacency list before a random pick.
pub fn transition_allowed(target: MoodLabel, state: &MoodState) -> bool {
    use MoodLabel::*;
    match target {
        Cheerful | Playful | Excited => state.stress < 0.6 && state.energy > 0.35,
        Bored => state.social_need > 0.35,
        Lonely => state.social_need > 0.5,
        Tired => state.energy < 0.55,
        Warm | Tender => state.warmth > 0.4,
        Vulnerable => state.stress > 0.35,
        Overwhelmed => state.stress > 0.7,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag_empty_delta() {
        let d = emotion_delta(EmotionTag::Default);
        assert_eq!(d.stress, 0.0);
        assert_eq!(d.warmth, 0.0);
        assert_eq!(d.valence, 0.0);
        assert_eq!(d.arousal, 0.0);
    }

    #[test]
    fn test_anxiety_maps_by_warmth() {
        let mut state = MoodState::default();
        state.warmth = 0.7;
        assert_eq!(
            explicit_candidate(EmotionTag::Anxiety, &state),
            Some(MoodLabel::Tender)
        );
        state.warmth = 0.3;
        assert_eq!(
            explicit_candidate(EmotionTag::Anxiety, &state),
            Some(MoodLabel::Anxious)
        );
    }

    #[test]
    fn test_threshold_order_overwhelmed_first() {
        let mut state = MoodState::default();
        state.stress = 0.9;
        state.energy = 0.1; // would also be Tired, but stress rule fires first
        assert_eq!(threshold_candidate(&state), Some(MoodLabel::Overwhelmed));
    }

    #[test]
    fn test_every_mood_has_transitions() {
        for mood in MoodLabel::ALL {
            assert!(!natural_transitions(mood).is_empty());
        }
    }

    #[test]
    fn test_transition_filter() {
        let mut state = MoodState::default();
        state.stress = 0.8;
        state.energy = 0.5;
        assert!(!transition_allowed(MoodLabel::Cheerful, &state));
        assert!(transition_allowed(MoodLabel::Vulnerable, &state));
    }
}
