//! # EMOM Core Library
//!
//! Core logic for an EMOM-family interval timer (EMOM, E2MOM, E3MOM,
//! E5MOM). The terminal front end in `emom-cli` is a thin layer over this
//! crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine. The caller delivers one
//!   `tick()` per second; commands and ticks return the events they caused.
//! - **Workout Runner**: applies engine events to the collaborators: cue
//!   emitter, session log, keep-awake hold.
//! - **Storage**: SQLite session history and TOML settings.
//! - **Ticker**: cancellable tokio interval that drives the runner.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: round-timing state machine
//! - [`WorkoutRunner`]: engine plus collaborators
//! - [`SessionLog`]: history store trait, with [`Database`] and [`MemoryLog`]
//! - [`Config`]: user settings

pub mod cue;
pub mod error;
pub mod events;
pub mod facts;
pub mod ids;
pub mod runner;
pub mod storage;
pub mod timer;
pub mod wake;

pub use cue::{Cue, CueEmitter, CueStrength};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use runner::WorkoutRunner;
pub use storage::{
    Config, Database, MemoryLog, RecordPatch, SessionLog, SessionRecord, SessionStatus, Summary,
};
pub use timer::{IntervalTicker, Phase, TimerEngine, TimerSnapshot, Variant, WorkoutConfig};
pub use wake::ScreenWake;
