//! Round-timing state machine.
//!
//! The engine is tick-driven: it does not read the clock and owns no
//! thread. The caller feeds it one `tick()` per elapsed second and user
//! commands in between. Every call returns the events it produced; a
//! command that makes no sense in the current phase returns nothing and
//! changes nothing.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Preparing -> Running <-> Paused
//!   ^                     |
//!   +---- quit / final ---+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(WorkoutConfig::new(Variant::Emom, 10)?);
//! engine.start();
//! // Once per second:
//! for event in engine.tick() { /* render, log, cue */ }
//! ```

use serde::{Deserialize, Serialize};

use super::variant::{validate_rounds, Variant, WorkoutConfig};
use crate::cue::Cue;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Preparing,
    Running,
    Paused,
}

/// Read-only copy of the engine state handed to presentations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub current_round: u32,
    pub target_rounds: u32,
    pub seconds_left_in_round: u32,
    pub round_length_seconds: u32,
    pub prep_seconds_left: u32,
    pub prep_seconds: u32,
    pub variant: Variant,
}

/// Core timer engine.
#[derive(Debug, Clone, Serialize)]
pub struct TimerEngine {
    config: WorkoutConfig,
    phase: Phase,
    /// 1-based; 0 outside Running/Paused.
    current_round: u32,
    seconds_left: u32,
    prep_left: u32,
}

impl TimerEngine {
    /// Create an idle engine for `config`.
    pub fn new(config: WorkoutConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            current_round: 0,
            seconds_left: config.round_length_seconds(),
            prep_left: config.prep_seconds(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &WorkoutConfig {
        &self.config
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn prep_left(&self) -> u32 {
        self.prep_left
    }

    /// Whether ticks currently advance the engine.
    pub fn is_ticking(&self) -> bool {
        matches!(self.phase, Phase::Preparing | Phase::Running)
    }

    /// Full rounds behind the athlete at this moment.
    pub fn rounds_done(&self) -> u32 {
        match self.phase {
            Phase::Running | Phase::Paused => self.current_round.saturating_sub(1),
            Phase::Idle | Phase::Preparing => 0,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            current_round: self.current_round,
            target_rounds: self.config.target_rounds(),
            seconds_left_in_round: self.seconds_left,
            round_length_seconds: self.config.round_length_seconds(),
            prep_seconds_left: self.prep_left,
            prep_seconds: self.config.prep_seconds(),
            variant: self.config.variant(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        if self.phase != Phase::Idle {
            return Vec::new();
        }
        self.phase = Phase::Preparing;
        self.current_round = 0;
        self.prep_left = self.config.prep_seconds();
        self.seconds_left = self.config.round_length_seconds();
        vec![
            Event::WorkoutStarted {
                variant: self.config.variant(),
                target_rounds: self.config.target_rounds(),
                prep_seconds: self.config.prep_seconds(),
            },
            Event::CueRaised { cue: Cue::LeadInTick },
        ]
    }

    pub fn pause(&mut self) -> Vec<Event> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        self.phase = Phase::Paused;
        vec![Event::TimerPaused {
            seconds_left: self.seconds_left,
        }]
    }

    pub fn resume(&mut self) -> Vec<Event> {
        if self.phase != Phase::Paused {
            return Vec::new();
        }
        self.phase = Phase::Running;
        vec![Event::TimerResumed {
            seconds_left: self.seconds_left,
        }]
    }

    /// Abandon the session. No-op when already idle.
    pub fn quit(&mut self) -> Vec<Event> {
        if self.phase == Phase::Idle {
            return Vec::new();
        }
        let event = Event::WorkoutQuit {
            from: self.phase,
            rounds_done: self.rounds_done(),
        };
        self.reset_to_idle();
        vec![event]
    }

    /// Ignored unless idle.
    pub fn set_variant(&mut self, variant: Variant) -> Vec<Event> {
        if self.phase != Phase::Idle || self.config.variant() == variant {
            return Vec::new();
        }
        self.config.set_variant(variant);
        self.seconds_left = variant.round_length_seconds();
        vec![Event::VariantChanged {
            variant,
            round_length_seconds: variant.round_length_seconds(),
        }]
    }

    /// Ignored unless idle and `target_rounds >= 1`.
    pub fn set_target_rounds(&mut self, target_rounds: u32) -> Vec<Event> {
        if self.phase != Phase::Idle
            || validate_rounds(target_rounds).is_err()
            || self.config.target_rounds() == target_rounds
        {
            return Vec::new();
        }
        self.config.set_target_rounds(target_rounds);
        vec![Event::TargetRoundsChanged { target_rounds }]
    }

    /// Advance one second.
    pub fn tick(&mut self) -> Vec<Event> {
        match self.phase {
            Phase::Preparing => self.tick_preparing(),
            Phase::Running => self.tick_running(),
            Phase::Idle | Phase::Paused => Vec::new(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn tick_preparing(&mut self) -> Vec<Event> {
        self.prep_left = self.prep_left.saturating_sub(1);
        if self.prep_left > 0 {
            return vec![Event::CueRaised { cue: Cue::LeadInTick }];
        }
        self.phase = Phase::Running;
        self.current_round = 1;
        self.seconds_left = self.config.round_length_seconds();
        vec![
            Event::RoundStarted {
                round: 1,
                target_rounds: self.config.target_rounds(),
            },
            Event::CueRaised { cue: Cue::RoundStart },
        ]
    }

    fn tick_running(&mut self) -> Vec<Event> {
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left > 0 {
            if self.seconds_left <= self.config.warning_seconds() {
                return vec![Event::CueRaised { cue: Cue::WarningTick }];
            }
            return Vec::new();
        }

        let target = self.config.target_rounds();
        if self.current_round >= target {
            let variant = self.config.variant();
            self.reset_to_idle();
            return vec![
                Event::WorkoutCompleted {
                    rounds: target,
                    variant,
                },
                Event::CueRaised { cue: Cue::Final },
            ];
        }

        let rounds_done = self.current_round;
        self.current_round += 1;
        self.seconds_left = self.config.round_length_seconds();
        vec![
            Event::RoundCompleted {
                rounds_done,
                target_rounds: target,
            },
            Event::RoundStarted {
                round: self.current_round,
                target_rounds: target,
            },
            Event::CueRaised { cue: Cue::RoundStart },
        ]
    }

    fn reset_to_idle(&mut self) {
        self.phase = Phase::Idle;
        self.current_round = 0;
        self.seconds_left = self.config.round_length_seconds();
        self.prep_left = self.config.prep_seconds();
    }
}
