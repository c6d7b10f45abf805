//! Training facts shown before a session.

use rand::seq::SliceRandom;
use rand::Rng;

pub const FACTS: [&str; 8] = [
    "HIIT triggers Excess Post-exercise Oxygen Consumption, boosting metabolic rate and calorie burn for hours after the workout ends.",
    "Research shows HIIT reduces blood pressure and improves arterial elasticity more effectively than traditional continuous cardio.",
    "A 2024 study found that EMOM protocols cause less neuromuscular fatigue and lower lactate buildup compared to AMRAP training.",
    "HIIT provides similar cardiovascular and metabolic benefits in roughly 40% less time than moderate-intensity continuous training.",
    "HIIT is proven to increase VO2 max by forcing the heart to pump more blood and muscles to use oxygen more efficiently.",
    "EMOM training has been shown to lead to faster Heart Rate Variability (HRV) recovery post-workout compared to other high-intensity modalities.",
    "Short, intense intervals are scientifically linked to rapid improvements in insulin sensitivity and blood sugar management in two weeks.",
    "EMOM's built-in rest helps athletes maintain a more consistent movement velocity, preventing form breakdown often seen in timed workouts.",
];

pub fn pick_fact<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    FACTS.choose(rng).copied().unwrap_or(FACTS[0])
}
