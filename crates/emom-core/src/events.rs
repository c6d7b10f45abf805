use serde::{Deserialize, Serialize};

use crate::cue::Cue;
use crate::timer::{Phase, Variant};

/// Every state change of the timer produces an Event.
/// The presentation renders them; the workout runner turns them into
/// session-log writes and cues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Idle -> Preparing.
    WorkoutStarted {
        variant: Variant,
        target_rounds: u32,
        prep_seconds: u32,
    },
    /// A cue should be played.
    CueRaised { cue: Cue },
    /// A round began. Round 1 marks the end of the lead-in.
    RoundStarted { round: u32, target_rounds: u32 },
    /// A round boundary passed without finishing the workout.
    RoundCompleted { rounds_done: u32, target_rounds: u32 },
    /// The last round finished. Raised exactly once per natural completion.
    WorkoutCompleted { rounds: u32, variant: Variant },
    TimerPaused { seconds_left: u32 },
    TimerResumed { seconds_left: u32 },
    /// The athlete quit from `from` with `rounds_done` full rounds behind them.
    WorkoutQuit { from: Phase, rounds_done: u32 },
    VariantChanged {
        variant: Variant,
        round_length_seconds: u32,
    },
    TargetRoundsChanged { target_rounds: u32 },
}

impl Event {
    pub fn cue(&self) -> Option<Cue> {
        match self {
            Event::CueRaised { cue } => Some(*cue),
            _ => None,
        }
    }
}
