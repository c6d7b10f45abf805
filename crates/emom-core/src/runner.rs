//! Workout runner: the timer engine plus the collaborators it drives.
//!
//! The engine decides what happens; the runner makes it happen. Each
//! command or tick is forwarded to the engine and the resulting events are
//! applied in order: cues go to the [`CueEmitter`], round boundaries become
//! [`SessionLog`] writes, and the keep-awake hold follows the phase.
//!
//! Collaborator failures are logged and swallowed. Nothing a collaborator
//! does can stall or corrupt the timer.

use crate::cue::{CueEmitter, SilentCues};
use crate::events::Event;
use crate::ids::{Clock, IdGenerator, SystemClock, UuidIds};
use crate::storage::{RecordPatch, SessionLog, SessionRecord, SessionStatus};
use crate::timer::{Phase, TimerEngine, TimerSnapshot, Variant, WorkoutConfig};
use crate::wake::{NoWake, ScreenWake};

pub struct WorkoutRunner {
    engine: TimerEngine,
    log: Box<dyn SessionLog>,
    cues: Box<dyn CueEmitter>,
    wake: Box<dyn ScreenWake>,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    /// Id of the record for the session in progress.
    active_session: Option<String>,
    wake_held: bool,
    finished_pending: bool,
}

impl WorkoutRunner {
    /// Runner with silent cues, no keep-awake, UUID ids and the system clock.
    pub fn new(config: WorkoutConfig, log: Box<dyn SessionLog>) -> Self {
        Self {
            engine: TimerEngine::new(config),
            log,
            cues: Box::new(SilentCues),
            wake: Box::new(NoWake),
            ids: Box::new(UuidIds),
            clock: Box::new(SystemClock),
            active_session: None,
            wake_held: false,
            finished_pending: false,
        }
    }

    pub fn with_cues(mut self, cues: impl CueEmitter + 'static) -> Self {
        self.cues = Box::new(cues);
        self
    }

    pub fn with_wake(mut self, wake: impl ScreenWake + 'static) -> Self {
        self.wake = Box::new(wake);
        self
    }

    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> TimerSnapshot {
        self.engine.snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    pub fn config(&self) -> &WorkoutConfig {
        self.engine.config()
    }

    /// Whether the driver should deliver ticks right now.
    pub fn is_ticking(&self) -> bool {
        self.engine.is_ticking()
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.active_session.as_deref()
    }

    pub fn log(&self) -> &dyn SessionLog {
        self.log.as_ref()
    }

    /// True between a natural completion and its acknowledgement.
    pub fn finished_pending(&self) -> bool {
        self.finished_pending
    }

    /// Clear the finished signal. Returns whether it was raised.
    pub fn acknowledge_finished(&mut self) -> bool {
        std::mem::take(&mut self.finished_pending)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        let events = self.engine.start();
        self.apply(&events);
        events
    }

    pub fn pause(&mut self) -> Vec<Event> {
        let events = self.engine.pause();
        self.apply(&events);
        events
    }

    pub fn resume(&mut self) -> Vec<Event> {
        let events = self.engine.resume();
        self.apply(&events);
        events
    }

    pub fn quit(&mut self) -> Vec<Event> {
        let events = self.engine.quit();
        self.apply(&events);
        events
    }

    pub fn tick(&mut self) -> Vec<Event> {
        let events = self.engine.tick();
        self.apply(&events);
        events
    }

    pub fn set_variant(&mut self, variant: Variant) -> Vec<Event> {
        let events = self.engine.set_variant(variant);
        self.apply(&events);
        events
    }

    pub fn set_target_rounds(&mut self, target_rounds: u32) -> Vec<Event> {
        let events = self.engine.set_target_rounds(target_rounds);
        self.apply(&events);
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply(&mut self, events: &[Event]) {
        for event in events {
            tracing::debug!(?event, "timer event");
            match *event {
                Event::WorkoutStarted { .. } => {
                    self.finished_pending = false;
                    self.hold_wake();
                }
                Event::CueRaised { cue } => self.cues.emit(cue),
                Event::RoundStarted { round: 1, .. } => self.open_record(),
                Event::RoundCompleted { rounds_done, .. } => {
                    let minutes = self.engine.config().minutes_for_rounds(rounds_done);
                    self.patch_active(RecordPatch::progress(minutes));
                }
                Event::WorkoutCompleted { .. } => {
                    let minutes = self.engine.config().target_minutes();
                    self.patch_active(RecordPatch::completed(minutes));
                    self.active_session = None;
                    self.finished_pending = true;
                    self.release_wake();
                }
                Event::WorkoutQuit { rounds_done, .. } => {
                    let minutes = self.engine.config().minutes_for_rounds(rounds_done);
                    self.patch_active(RecordPatch::progress(minutes));
                    self.active_session = None;
                    self.release_wake();
                }
                Event::RoundStarted { .. }
                | Event::TimerPaused { .. }
                | Event::TimerResumed { .. }
                | Event::VariantChanged { .. }
                | Event::TargetRoundsChanged { .. } => {}
            }
        }
    }

    fn open_record(&mut self) {
        let config = *self.engine.config();
        let now = self.clock.now();
        let position = match self.log.count() {
            Ok(n) => n + 1,
            Err(e) => {
                tracing::warn!(error = %e, "could not count session history");
                1
            }
        };
        let record = SessionRecord {
            id: self.ids.next_id(),
            title: format!("{} - {}", config.variant(), position),
            date: now.format("%Y-%m-%d").to_string(),
            start_time: now.format("%H:%M").to_string(),
            target_minutes: config.target_minutes(),
            actual_minutes: 0,
            status: SessionStatus::Interrupted,
        };
        match self.log.append(record) {
            Ok(id) => {
                tracing::info!(session = %id, "session opened");
                self.active_session = Some(id);
            }
            Err(e) => tracing::warn!(error = %e, "could not record session; continuing unlogged"),
        }
    }

    fn patch_active(&mut self, patch: RecordPatch) {
        let Some(id) = self.active_session.as_deref() else {
            return;
        };
        if let Err(e) = self.log.update(id, patch) {
            tracing::warn!(session = %id, error = %e, "could not update session record");
        }
    }

    fn hold_wake(&mut self) {
        if self.wake_held {
            return;
        }
        match self.wake.acquire() {
            Ok(()) => self.wake_held = true,
            Err(e) => tracing::warn!(error = %e, "keep-awake request denied"),
        }
    }

    fn release_wake(&mut self) {
        if std::mem::take(&mut self.wake_held) {
            self.wake.release();
        }
    }
}

impl Drop for WorkoutRunner {
    fn drop(&mut self) {
        self.release_wake();
    }
}
