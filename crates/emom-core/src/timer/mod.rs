mod display;
mod engine;
mod ticker;
mod variant;

pub use display::{format_clock, progress, session_elapsed_seconds, session_remaining_seconds};
pub use engine::{Phase, TimerEngine, TimerSnapshot};
pub use ticker::IntervalTicker;
pub use variant::{Variant, WorkoutConfig, DEFAULT_PREP_SECONDS, DEFAULT_WARNING_SECONDS};
