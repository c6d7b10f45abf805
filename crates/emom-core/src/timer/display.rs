//! Derived display values. Pure functions of a [`TimerSnapshot`] so every
//! view computes them the same way.

use super::engine::{Phase, TimerSnapshot};

/// 0.0 .. 1.0 progress of the current countdown.
///
/// Preparing measures the lead-in, Running and Paused measure the round.
/// Idle is always 0.
pub fn progress(snapshot: &TimerSnapshot) -> f64 {
    let (total, left) = match snapshot.phase {
        Phase::Idle => return 0.0,
        Phase::Preparing => (snapshot.prep_seconds, snapshot.prep_seconds_left),
        Phase::Running | Phase::Paused => {
            (snapshot.round_length_seconds, snapshot.seconds_left_in_round)
        }
    };
    if total == 0 {
        return 0.0;
    }
    (f64::from(total.saturating_sub(left)) / f64::from(total)).clamp(0.0, 1.0)
}

/// `m:ss` rendering of a second count.
pub fn format_clock(total_seconds: u32) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Seconds of work elapsed since round 1 started.
pub fn session_elapsed_seconds(snapshot: &TimerSnapshot) -> u32 {
    match snapshot.phase {
        Phase::Running | Phase::Paused => {
            let done = snapshot.current_round.saturating_sub(1);
            done.saturating_mul(snapshot.round_length_seconds)
                .saturating_add(
                    snapshot
                        .round_length_seconds
                        .saturating_sub(snapshot.seconds_left_in_round),
                )
        }
        Phase::Idle | Phase::Preparing => 0,
    }
}

/// Seconds of work left until the final round ends.
pub fn session_remaining_seconds(snapshot: &TimerSnapshot) -> u32 {
    snapshot
        .target_rounds
        .saturating_mul(snapshot.round_length_seconds)
        .saturating_sub(session_elapsed_seconds(snapshot))
}
