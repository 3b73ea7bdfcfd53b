// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Closed-loop regulator interface.
//!
//! While enabled, the regulator owns its motor group: the owning gearbox feeds it sensor readings
//! and writes whatever it returns. While disabled, the motors are driven directly. The enable
//! state is the only gate between those two writers.

use crate::control::PidGains;

pub trait Regulator {
    /// Start tracking the setpoint. Enabling an already enabled regulator is a no-op.
    fn enable(&mut self);

    /// Stop tracking and release the motors.
    fn disable(&mut self);

    fn is_enabled(&self) -> bool;

    fn set_setpoint(&mut self, setpoint: f32);

    fn setpoint(&self) -> f32;

    fn set_gains(&mut self, gains: PidGains);

    fn gains(&self) -> PidGains;

    /// True when the last error is within the regulator's tolerance.
    fn on_target(&self) -> bool;

    /// Clear accumulated history.
    fn reset(&mut self);

    /// Compute the next output in [-1.0, 1.0] from a fresh measurement, `dt` seconds after the
    /// previous one.
    fn calculate(&mut self, measurement: f32, dt: f32) -> f32;
}
