//! Audio/haptic cues raised by the timer.
//!
//! The engine only decides *which* cue fires. Turning a cue into sound or
//! vibration belongs to a [`CueEmitter`], which must never block the tick
//! loop and must swallow its own failures.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// One pulse per second of the pre-roll countdown.
    LeadInTick,
    /// A new round begins.
    RoundStart,
    /// Final seconds before a round boundary.
    WarningTick,
    /// The last round finished.
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueStrength {
    Light,
    Strong,
    Strongest,
}

/// Tone a cue stands for: pitch in Hz and length in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
}

impl Cue {
    pub const fn strength(self) -> CueStrength {
        match self {
            Cue::LeadInTick | Cue::WarningTick => CueStrength::Light,
            Cue::RoundStart => CueStrength::Strong,
            Cue::Final => CueStrength::Strongest,
        }
    }

    pub const fn tone(self) -> Tone {
        match self {
            Cue::LeadInTick | Cue::WarningTick => Tone {
                frequency_hz: 440,
                duration_ms: 100,
            },
            Cue::RoundStart => Tone {
                frequency_hz: 880,
                duration_ms: 300,
            },
            Cue::Final => Tone {
                frequency_hz: 1200,
                duration_ms: 500,
            },
        }
    }
}

/// Fire-and-forget sink for cues.
///
/// Implementations own their error handling; nothing flows back into the
/// timer.
pub trait CueEmitter {
    fn emit(&mut self, cue: Cue);
}

/// Emitter that drops every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCues;

impl CueEmitter for SilentCues {
    fn emit(&mut self, _cue: Cue) {}
}

/// Emitter that keeps every cue it receives. Clones share the same log, so
/// a test can hand one clone to the runner and inspect the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingCues {
    log: Arc<Mutex<Vec<Cue>>>,
}

impl RecordingCues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.cues().iter().filter(|c| **c == cue).count()
    }
}

impl CueEmitter for RecordingCues {
    fn emit(&mut self, cue: Cue) {
        if let Ok(mut log) = self.log.lock() {
            log.push(cue);
        }
    }
}

impl<T: CueEmitter + ?Sized> CueEmitter for Box<T> {
    fn emit(&mut self, cue: Cue) {
        (**self).emit(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_cue_is_strongest() {
        assert!(Cue::Final.strength() > Cue::RoundStart.strength());
        assert!(Cue::RoundStart.strength() > Cue::WarningTick.strength());
    }

    #[test]
    fn tones_follow_pitch_ladder() {
        assert_eq!(Cue::LeadInTick.tone().frequency_hz, 440);
        assert_eq!(Cue::RoundStart.tone().frequency_hz, 880);
        assert_eq!(Cue::Final.tone().frequency_hz, 1200);
    }

    #[test]
    fn recording_clones_share_log() {
        let probe = RecordingCues::new();
        let mut sink = probe.clone();
        sink.emit(Cue::RoundStart);
        sink.emit(Cue::WarningTick);
        assert_eq!(probe.cues(), vec![Cue::RoundStart, Cue::WarningTick]);
        assert_eq!(probe.count(Cue::WarningTick), 1);
    }
}
