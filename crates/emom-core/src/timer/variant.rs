use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Lead-in countdown before the first round.
pub const DEFAULT_PREP_SECONDS: u32 = 5;

/// Width of the warning window before each round boundary.
pub const DEFAULT_WARNING_SECONDS: u32 = 3;

/// EMOM protocol family. Each variant fixes the length of one round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    #[serde(rename = "EMOM")]
    Emom,
    #[serde(rename = "E2MOM")]
    E2mom,
    #[serde(rename = "E3MOM")]
    E3mom,
    #[serde(rename = "E5MOM")]
    E5mom,
}

impl Variant {
    pub const ALL: [Variant; 4] = [Variant::Emom, Variant::E2mom, Variant::E3mom, Variant::E5mom];

    /// Round length in seconds.
    pub const fn round_length_seconds(self) -> u32 {
        match self {
            Variant::Emom => 60,
            Variant::E2mom => 120,
            Variant::E3mom => 180,
            Variant::E5mom => 300,
        }
    }

    /// Round length in whole minutes.
    pub const fn round_length_minutes(self) -> u32 {
        self.round_length_seconds() / 60
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Variant::Emom => "EMOM",
            Variant::E2mom => "E2MOM",
            Variant::E3mom => "E3MOM",
            Variant::E5mom => "E5MOM",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| ValidationError::UnknownVariant(token.to_string()))
    }
}

/// Immutable per-session workout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkoutConfig {
    variant: Variant,
    target_rounds: u32,
    prep_seconds: u32,
    warning_seconds: u32,
}

impl WorkoutConfig {
    /// Build a config with the default lead-in and warning window.
    pub fn new(variant: Variant, target_rounds: u32) -> Result<Self, ValidationError> {
        Self::with_timing(
            variant,
            target_rounds,
            DEFAULT_PREP_SECONDS,
            DEFAULT_WARNING_SECONDS,
        )
    }

    pub fn with_timing(
        variant: Variant,
        target_rounds: u32,
        prep_seconds: u32,
        warning_seconds: u32,
    ) -> Result<Self, ValidationError> {
        validate_rounds(target_rounds)?;
        if prep_seconds == 0 {
            return Err(ValidationError::TooSmall {
                field: "prep_seconds".into(),
                min: 1,
                value: prep_seconds,
            });
        }
        if warning_seconds >= variant.round_length_seconds() {
            return Err(ValidationError::InvalidValue {
                field: "warning_seconds".into(),
                message: format!(
                    "must be shorter than a {} round ({}s)",
                    variant,
                    variant.round_length_seconds()
                ),
            });
        }
        Ok(Self {
            variant,
            target_rounds,
            prep_seconds,
            warning_seconds,
        })
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn target_rounds(&self) -> u32 {
        self.target_rounds
    }

    pub fn prep_seconds(&self) -> u32 {
        self.prep_seconds
    }

    pub fn warning_seconds(&self) -> u32 {
        self.warning_seconds
    }

    pub fn round_length_seconds(&self) -> u32 {
        self.variant.round_length_seconds()
    }

    /// Full session length in minutes.
    ///
    /// Saturates instead of overflowing on absurd round counts.
    pub fn target_minutes(&self) -> u32 {
        self.minutes_for_rounds(self.target_rounds)
    }

    /// Minutes represented by `rounds` completed rounds.
    pub fn minutes_for_rounds(&self, rounds: u32) -> u32 {
        rounds.saturating_mul(self.variant.round_length_minutes())
    }

    pub(crate) fn set_variant(&mut self, variant: Variant) {
        self.variant = variant;
        // Keep the warning window valid for shorter rounds.
        let max_warning = variant.round_length_seconds().saturating_sub(1);
        self.warning_seconds = self.warning_seconds.min(max_warning);
    }

    pub(crate) fn set_target_rounds(&mut self, target_rounds: u32) {
        self.target_rounds = target_rounds;
    }
}

pub(crate) fn validate_rounds(target_rounds: u32) -> Result<(), ValidationError> {
    if target_rounds == 0 {
        return Err(ValidationError::TooSmall {
            field: "target_rounds".into(),
            min: 1,
            value: target_rounds,
        });
    }
    Ok(())
}
