//! Stage 6: ambient sensory detail.
//!
//! For distress-adjacent emotions only, occasionally appends one grounding
//! sensory line keyed by time of day. The point is presence, not poetry.

use crate::context::StageContext;
use rand::Rng;
use vesna_core::clock::TimeOfDay;

fn ambient_line(tod: TimeOfDay) -> &'static str {
    match tod {
        TimeOfDay::Night => "За окном сейчас совсем тихо, только фонарь во дворе горит.",
        TimeOfDay::EarlyMorning => "За окном только-только светает, всё ещё серое.",
        TimeOfDay::Morning => "Утро за окном мягкое, солнце пробивается сквозь шторы.",
        TimeOfDay::Noon | TimeOfDay::Afternoon => "У меня тут чай остывает на столе, пока пишу тебе.",
        TimeOfDay::Evening => "За окном уже темнеет, я лампу включила.",
        TimeOfDay::LateEvening => "Поздно уже, у меня только настольная лампа светит.",
    }
}

pub fn sensory_detail<R: Rng>(text: &str, ctx: &StageContext, rng: &mut R) -> String {
    if !ctx.is_distress() {
        return text.to_string();
    }
    if rng.gen::<f32>() >= ctx.config.sensory_prob {
        return text.to_string();
    }
    let line = ambient_line(ctx.time_of_day);
    if text.contains(line) {
        return text.to_string();
    }
    format!("{text} {line}")
}
