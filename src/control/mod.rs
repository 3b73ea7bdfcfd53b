// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! Reusable building blocks for drivetrain control.
//!
//! ## Modules
//!
//! - [`pid`] - General-purpose PID controller implementing [`Regulator`].
//! - [`regulator`] - Closed-loop regulator interface used by gearboxes.
//! - [`steering`] - Cheesy-Drive steering mixer for operator control.
//! - [`profile`] - Trapezoidal motion profile for autonomous moves.

pub mod pid;
pub mod profile;
pub mod regulator;
pub mod steering;

pub use pid::{Pid, PidGains};
pub use profile::TrapezoidProfile;
pub use regulator::Regulator;
pub use steering::{DriveCommand, MixerConfig, SteeringMixer, SteeringState, WheelCommand};
