//! Terminal implementations of the timer's collaborators, plus the status
//! line renderer.

use std::io::Write;
use std::process::{Child, Command, Stdio};

use emom_core::cue::{Cue, CueEmitter, CueStrength};
use emom_core::storage::CuesConfig;
use emom_core::timer::{format_clock, progress, session_remaining_seconds};
use emom_core::{Phase, ScreenWake, TimerSnapshot};

const BAR_WIDTH: usize = 20;

/// Rings the terminal bell; stronger cues ring more times.
pub struct TerminalCues {
    enabled: bool,
    bell: bool,
}

impl TerminalCues {
    pub fn new(config: &CuesConfig) -> Self {
        Self {
            enabled: config.enabled,
            bell: config.bell,
        }
    }
}

impl TerminalCues {
    /// Bells rung for `cue`; 0 when the bell is switched off.
    fn rings(&self, cue: Cue) -> usize {
        if !self.enabled || !self.bell {
            return 0;
        }
        match cue.strength() {
            CueStrength::Light => 1,
            CueStrength::Strong => 2,
            CueStrength::Strongest => 3,
        }
    }
}

impl CueEmitter for TerminalCues {
    fn emit(&mut self, cue: Cue) {
        let rings = self.rings(cue);
        if rings == 0 {
            return;
        }
        let mut err = std::io::stderr().lock();
        let result = err
            .write_all("\x07".repeat(rings).as_bytes())
            .and_then(|()| err.flush());
        if let Err(e) = result {
            tracing::debug!(?cue, error = %e, "bell unavailable");
        }
    }
}

/// Holds a `systemd-inhibit` child for as long as the workout runs.
#[derive(Default)]
pub struct InhibitWake {
    child: Option<Child>,
}

impl ScreenWake for InhibitWake {
    fn acquire(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.child.is_some() || !cfg!(target_os = "linux") {
            return Ok(());
        }
        let child = Command::new("systemd-inhibit")
            .args([
                "--what=idle:sleep",
                "--who=emom",
                "--why=EMOM workout in progress",
                "--mode=block",
                "sleep",
                "infinity",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        self.child = Some(child);
        Ok(())
    }

    fn release(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill().and_then(|()| child.wait().map(|_| ())) {
                tracing::debug!(error = %e, "inhibitor already gone");
            }
        }
    }
}

impl Drop for InhibitWake {
    fn drop(&mut self) {
        self.release();
    }
}

fn bar(fraction: f64) -> String {
    // fraction is clamped to 0..=1, so the product fits in usize.
    let filled = ((fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// One-line rendering of the timer.
pub fn status_line(s: &TimerSnapshot) -> String {
    let bar = bar(progress(s));
    match s.phase {
        Phase::Idle => format!("READY  {} x{}", s.variant, s.target_rounds),
        Phase::Preparing => format!("PREPARING  {:>2}  {bar}", s.prep_seconds_left),
        Phase::Running | Phase::Paused => {
            let label = if s.phase == Phase::Paused { "PAUSED " } else { "ROUND" };
            format!(
                "{label} {}/{}  {}  {bar}  left {}",
                s.current_round,
                s.target_rounds,
                format_clock(s.seconds_left_in_round),
                format_clock(session_remaining_seconds(s)),
            )
        }
    }
}

/// Overwrite the current terminal line.
pub fn redraw(line: &str) {
    let mut out = std::io::stdout().lock();
    if let Err(e) = write!(out, "\r\x1b[2K{line}").and_then(|()| out.flush()) {
        tracing::debug!(error = %e, "status line not drawn");
    }
}
