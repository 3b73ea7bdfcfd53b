// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Actuator Abstractions
//!
//! Drivetrain-side wrappers that sit above the device-level traits in [`hw`](crate::hw).
//!
//! ## Modules
//!
//! - [`group`] - One to three motors written in lockstep.
//! - [`gearbox`] - Manual/closed-loop drivable unit with load-safe gear shifting.

pub mod gearbox;
pub mod group;

pub use gearbox::{GearBox, PidSource, ShiftState};
pub use group::MotorGroup;
