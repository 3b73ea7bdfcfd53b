// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error types shared by the drivetrain layers.
//!
//! None of these cross the control-tick boundary: [`DriveTrain`](crate::drivetrain::DriveTrain)
//! logs them and substitutes a neutral value so the periodic loop never stalls.

use core::fmt;

/// Optional hardware a [`GearBox`](crate::motors::GearBox) may have been built without.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Encoder + closed-loop regulator pair.
    ClosedLoop,
    /// Gear shift actuator.
    Shifter,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ClosedLoop => f.write_str("closed-loop sensor/regulator"),
            Capability::Shifter => f.write_str("shift actuator"),
        }
    }
}

/// Rejected configuration values.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Turn non-linearity makes the sine shaping curve undefined (zero, NaN, or an even integer).
    DegenerateTurnNonLinearity(f32),
    /// Deadband outside `[0, 1)`.
    InvalidDeadband(f32),
    /// Turn sensitivity is NaN or infinite.
    InvalidSensitivity(f32),
    /// A tuning key read as NaN or infinity.
    NonFinite(&'static str, f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DegenerateTurnNonLinearity(k) => {
                write!(f, "turn non-linearity {} makes the turn curve undefined", k)
            }
            ConfigError::InvalidDeadband(band) => {
                write!(f, "deadband {} is outside [0, 1)", band)
            }
            ConfigError::InvalidSensitivity(s) => write!(f, "turn sensitivity {} is not finite", s),
            ConfigError::NonFinite(key, value) => write!(f, "{} = {} is not finite", key, value),
        }
    }
}

/// Error type for gearbox and drivetrain operations.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DriveError {
    /// The operation needs hardware this gearbox does not have.
    CapabilityAbsent(Capability),
    /// A motor group must hold between 1 and 3 motors.
    InvalidGroupSize(usize),
    /// A configuration value was rejected.
    Config(ConfigError),
}

impl From<ConfigError> for DriveError {
    fn from(e: ConfigError) -> Self {
        DriveError::Config(e)
    }
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveError::CapabilityAbsent(cap) => write!(f, "gearbox has no {}", cap),
            DriveError::InvalidGroupSize(n) => {
                write!(f, "motor group needs 1 to 3 motors, got {}", n)
            }
            DriveError::Config(e) => write!(f, "configuration rejected: {}", e),
        }
    }
}
