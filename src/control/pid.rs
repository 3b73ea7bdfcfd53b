// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Generic PID controller for closed-loop wheel control.
//!
//! Works in `no_std` and does not allocate memory. Implements [`Regulator`] so a
//! [`GearBox`](crate::motors::GearBox) can hand its motors over to it.

use crate::control::Regulator;

/// Default absolute on-target tolerance, in sensor units.
pub const DEFAULT_TOLERANCE: f32 = 1.0;

/// Proportional, integral, derivative and feed-forward gains.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PidGains {
    pub p: f32,
    pub i: f32,
    pub d: f32,
    /// Feed-forward, multiplied by the setpoint.
    pub f: f32,
}

impl PidGains {
    pub const fn new(p: f32, i: f32, d: f32) -> Self {
        Self { p, i, d, f: 0.0 }
    }

    pub const fn with_f(mut self, f: f32) -> Self {
        self.f = f;
        self
    }
}

/// PID controller with tunable gains, output clamping and an enable gate.
pub struct Pid {
    gains: PidGains,

    /// Integrator state
    integral: f32,
    /// Last process variable (for derivative term)
    prev_measurement: f32,

    /// Output clamp
    out_min: f32,
    out_max: f32,

    /// Integral anti-windup clamp
    int_min: f32,
    int_max: f32,

    first_update: bool,

    setpoint: f32,
    enabled: bool,
    tolerance: f32,
    last_error: Option<f32>,
}

impl Pid {
    /// Create a new, disabled PID controller.
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,

            integral: 0.0,
            prev_measurement: 0.0,

            out_min: -1.0,
            out_max: 1.0,

            int_min: -1.0,
            int_max: 1.0,

            first_update: true,

            setpoint: 0.0,
            enabled: false,
            tolerance: DEFAULT_TOLERANCE,
            last_error: None,
        }
    }

    /// Set output limits.
    pub fn with_output_limits(mut self, min: f32, max: f32) -> Self {
        self.out_min = min;
        self.out_max = max;
        self
    }

    /// Set integral limits for anti-windup.
    pub fn with_integral_limits(mut self, min: f32, max: f32) -> Self {
        self.int_min = min;
        self.int_max = max;
        self
    }

    /// Set the absolute tolerance used by [`on_target`](Regulator::on_target).
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    /// Most recent error, if an update has run since the last reset.
    #[inline]
    pub fn last_error(&self) -> Option<f32> {
        self.last_error
    }

    /// Update the controller.
    ///
    /// `setpoint`: desired value
    /// `measurement`: current value
    /// `dt`: timestep in seconds (e.g. 0.02 for 50 Hz control loop)
    ///
    /// Returns a normalized command in [`out_min`, `out_max`] which can be mapped to motor drive.
    pub fn update(&mut self, setpoint: f32, measurement: f32, dt: f32) -> f32 {
        let error = setpoint - measurement;
        self.last_error = Some(error);

        // ----- P term -----
        let p = self.gains.p * error;

        // ----- I term -----
        self.integral += error * dt * self.gains.i;
        if self.integral > self.int_max {
            self.integral = self.int_max;
        }
        if self.integral < self.int_min {
            self.integral = self.int_min;
        }
        let i = self.integral;

        // ----- D term (on measurement to reduce noise sensitivity) -----
        let d = if self.first_update || dt <= 0.0 {
            self.first_update = false;
            0.0
        } else {
            let dv = self.prev_measurement - measurement;
            self.gains.d * (dv / dt)
        };
        self.prev_measurement = measurement;

        // ----- Feed-forward -----
        let f = self.gains.f * setpoint;

        let mut out = p + i + d + f;
        if out > self.out_max {
            out = self.out_max;
        }
        if out < self.out_min {
            out = self.out_min;
        }
        out
    }
}

impl Regulator for Pid {
    fn enable(&mut self) {
        if !self.enabled {
            self.reset();
            self.enabled = true;
        }
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    #[inline]
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_setpoint(&mut self, setpoint: f32) {
        self.setpoint = setpoint;
    }

    #[inline]
    fn setpoint(&self) -> f32 {
        self.setpoint
    }

    fn set_gains(&mut self, gains: PidGains) {
        self.gains = gains;
    }

    #[inline]
    fn gains(&self) -> PidGains {
        self.gains
    }

    fn on_target(&self) -> bool {
        self.last_error
            .map_or(false, |error| error.abs() <= self.tolerance)
    }

    /// Reset integrator + derivative history.
    fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_measurement = 0.0;
        self.first_update = true;
        self.last_error = None;
    }

    fn calculate(&mut self, measurement: f32, dt: f32) -> f32 {
        self.update(self.setpoint, measurement, dt)
    }
}
