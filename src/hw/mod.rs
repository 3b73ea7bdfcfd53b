// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Hardware Seams
//!
//! Traits for the devices a drivetrain side is built from, plus generic implementations written
//! against `embedded-hal` so they run on any MCU.
//!
//! | Trait | Generic implementation |
//! | ----- | ---------------------- |
//! | [`MotorOutput`] | [`HBridgeMotor`] (two PWM inputs) |
//! | [`Sensor`] | [`QuadratureEncoder`] over a [`PulseCounter`] |
//! | [`ShiftActuator`] | [`Solenoid`] on a GPIO pin |
//!
//! With the `stm32` feature, [`stm32`] provides timer-backed pulse counters and a USART log sink.

pub mod encoder;
pub mod hbridge;
pub mod solenoid;

#[cfg(feature = "stm32")]
pub mod stm32;

#[cfg(test)]
pub mod mock;

pub use encoder::QuadratureEncoder;
pub use hbridge::HBridgeMotor;
pub use solenoid::{ActiveLevel, Solenoid};

/// A single motor output driven with a signed, normalized command.
///
/// Writes are expected to be non-blocking register updates.
pub trait MotorOutput {
    /// Command the motor. `fraction` is in [-1.0, 1.0].
    fn set(&mut self, fraction: f32);

    /// The last commanded fraction.
    fn get(&self) -> f32;
}

/// Distance/rate feedback for one drivetrain side.
pub trait Sensor {
    /// Cumulative distance since the last reset, in distance-per-pulse units.
    fn distance(&self) -> f32;

    /// Instantaneous rate in distance units per second.
    fn rate(&self) -> f32;

    /// Zero the cumulative distance.
    fn reset(&mut self);

    /// Scale factor applied to raw pulses.
    fn set_distance_per_pulse(&mut self, distance_per_pulse: f32);

    /// Refresh derived quantities. Called once per closed-loop period with the elapsed time in
    /// seconds.
    fn update(&mut self, _dt: f32) {}
}

/// Binary gear selector. `true` is high gear.
pub trait ShiftActuator {
    fn set(&mut self, high_gear: bool);

    /// Actual state of the actuator.
    fn get(&self) -> bool;
}

/// Raw signed pulse counter, e.g. a timer in quadrature encoder mode.
pub trait PulseCounter {
    fn count(&self) -> i32;

    fn reset(&mut self);
}
