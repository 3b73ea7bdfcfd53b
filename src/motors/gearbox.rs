// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! One drivetrain side: a motor group, an optional closed-loop pair and an optional shifter.
//!
//! A gearbox is either in manual mode (the caller writes fractions) or closed-loop mode (the
//! regulator writes its output on every [`step`](GearBox::step)). The regulator's enable state is
//! the mode; there is no separate flag.
//!
//! Gear requests are never applied under load. [`set_gear`](GearBox::set_gear) only records the
//! target; after every write the gearbox checks whether all motors are below
//! [`SHIFT_THRESHOLD`] and only then moves the actuator.
//!
//! ```ignore
//! let mut side = GearBox::new(motors)
//!     .with_closed_loop(encoder, Pid::new(gains))
//!     .with_shifter(solenoid);
//!
//! side.set_gear(true);
//! side.set_manual(0.0); // shifts here
//! ```

use log::{debug, trace, warn};

use crate::control::{PidGains, Regulator};
use crate::error::{Capability, DriveError};
use crate::hw::{MotorOutput, Sensor, ShiftActuator};
use crate::motors::MotorGroup;

/// Motor command magnitude below which the shifter may move.
pub const SHIFT_THRESHOLD: f32 = 0.12;

/// Pending evaluations after which a stalled shift is reported once.
pub const PENDING_SHIFT_WARN_TICKS: u32 = 250;

/// Sensor quantity the regulator tracks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PidSource {
    #[default]
    Distance,
    Rate,
}

/// Whether the shifter matches the requested gear.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShiftState {
    Aligned,
    Pending,
}

struct ClosedLoop<S, R> {
    sensor: S,
    regulator: R,
    source: PidSource,
}

/// A drivable unit with manual and closed-loop modes and load-safe gear shifting.
pub struct GearBox<M, S, R, H> {
    motors: MotorGroup<M>,
    closed_loop: Option<ClosedLoop<S, R>>,
    shifter: Option<H>,

    reversed: bool,
    target_gear: bool,
    pending_shift_ticks: u32,
}

impl<M, S, R, H> GearBox<M, S, R, H>
where
    M: MotorOutput,
    S: Sensor,
    R: Regulator,
    H: ShiftActuator,
{
    /// Manual-only gearbox with no shifter.
    pub fn new(motors: MotorGroup<M>) -> Self {
        Self {
            motors,
            closed_loop: None,
            shifter: None,
            reversed: false,
            target_gear: false,
            pending_shift_ticks: 0,
        }
    }

    /// Attach a sensor and the regulator that consumes it. The regulator is disabled until the
    /// first setpoint.
    pub fn with_closed_loop(mut self, sensor: S, mut regulator: R) -> Self {
        regulator.disable();
        self.closed_loop = Some(ClosedLoop {
            sensor,
            regulator,
            source: PidSource::Distance,
        });
        self
    }

    /// Attach a gear shift actuator. The current actuator state becomes the target.
    pub fn with_shifter(mut self, shifter: H) -> Self {
        self.target_gear = shifter.get();
        self.shifter = Some(shifter);
        self
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    fn closed_loop(&self) -> Result<&ClosedLoop<S, R>, DriveError> {
        self.closed_loop
            .as_ref()
            .ok_or(DriveError::CapabilityAbsent(Capability::ClosedLoop))
    }

    fn closed_loop_mut(&mut self) -> Result<&mut ClosedLoop<S, R>, DriveError> {
        self.closed_loop
            .as_mut()
            .ok_or(DriveError::CapabilityAbsent(Capability::ClosedLoop))
    }

    // ---- Mode control ----

    /// Drive the motors directly. Takes the motors back from the regulator if it was enabled.
    pub fn set_manual(&mut self, fraction: f32) {
        if let Some(cl) = self.closed_loop.as_mut() {
            if cl.regulator.is_enabled() {
                trace!("regulator released for manual control");
                cl.regulator.disable();
            }
        }

        self.write(fraction);
    }

    /// Last commanded fraction, in the caller's polarity.
    pub fn manual(&self) -> f32 {
        let raw = self.motors.get();
        if self.reversed {
            -raw
        } else {
            raw
        }
    }

    /// Hand the motors to the regulator and track `value`.
    pub fn set_setpoint(&mut self, value: f32) -> Result<(), DriveError> {
        let cl = self.closed_loop_mut()?;
        if !cl.regulator.is_enabled() {
            cl.regulator.enable();
        }
        cl.regulator.set_setpoint(value);
        Ok(())
    }

    pub fn setpoint(&self) -> Result<f32, DriveError> {
        Ok(self.closed_loop()?.regulator.setpoint())
    }

    /// True while the regulator owns the motors.
    pub fn is_closed_loop(&self) -> bool {
        self.closed_loop
            .as_ref()
            .map_or(false, |cl| cl.regulator.is_enabled())
    }

    /// Periodic closed-loop update. Refreshes the sensor, then, if the regulator is enabled,
    /// writes its output to the motors.
    pub fn step(&mut self, dt: f32) {
        let Some(cl) = self.closed_loop.as_mut() else {
            return;
        };

        cl.sensor.update(dt);
        if !cl.regulator.is_enabled() {
            return;
        }

        let measurement = match cl.source {
            PidSource::Distance => cl.sensor.distance(),
            PidSource::Rate => cl.sensor.rate(),
        };
        let output = cl.regulator.calculate(measurement, dt);

        self.write(output);
    }

    // ---- Sensor ----

    pub fn distance(&self) -> Result<f32, DriveError> {
        Ok(self.closed_loop()?.sensor.distance())
    }

    pub fn rate(&self) -> Result<f32, DriveError> {
        Ok(self.closed_loop()?.sensor.rate())
    }

    pub fn reset_encoder(&mut self) -> Result<(), DriveError> {
        self.closed_loop_mut()?.sensor.reset();
        Ok(())
    }

    pub fn set_distance_per_pulse(&mut self, distance_per_pulse: f32) -> Result<(), DriveError> {
        self.closed_loop_mut()?
            .sensor
            .set_distance_per_pulse(distance_per_pulse);
        Ok(())
    }

    // ---- Regulator ----

    /// Replace P, I and D. Feed-forward is kept.
    pub fn set_pid(&mut self, p: f32, i: f32, d: f32) -> Result<(), DriveError> {
        let regulator = &mut self.closed_loop_mut()?.regulator;
        let f = regulator.gains().f;
        regulator.set_gains(PidGains::new(p, i, d).with_f(f));
        Ok(())
    }

    /// Replace the feed-forward gain. P, I and D are kept.
    pub fn set_f(&mut self, f: f32) -> Result<(), DriveError> {
        let regulator = &mut self.closed_loop_mut()?.regulator;
        let gains = regulator.gains().with_f(f);
        regulator.set_gains(gains);
        Ok(())
    }

    pub fn set_gains(&mut self, gains: PidGains) -> Result<(), DriveError> {
        self.closed_loop_mut()?.regulator.set_gains(gains);
        Ok(())
    }

    pub fn set_pid_source(&mut self, source: PidSource) -> Result<(), DriveError> {
        self.closed_loop_mut()?.source = source;
        Ok(())
    }

    pub fn pid_source(&self) -> Option<PidSource> {
        self.closed_loop.as_ref().map(|cl| cl.source)
    }

    /// False without a regulator.
    pub fn on_target(&self) -> bool {
        self.closed_loop
            .as_ref()
            .map_or(false, |cl| cl.regulator.on_target())
    }

    /// Clear regulator history and (re-)enable it.
    pub fn reset_pid(&mut self) -> Result<(), DriveError> {
        let regulator = &mut self.closed_loop_mut()?.regulator;
        regulator.reset();
        regulator.enable();
        Ok(())
    }

    // ---- Gear ----

    /// Request a gear. The actuator moves on the next write that finds every motor below
    /// [`SHIFT_THRESHOLD`]. Ignored without a shifter.
    pub fn set_gear(&mut self, high_gear: bool) {
        if self.shifter.is_none() {
            trace!("no shifter, gear request ignored");
            return;
        }

        if high_gear != self.target_gear {
            self.pending_shift_ticks = 0;
        }
        self.target_gear = high_gear;
    }

    /// Actual actuator state. `false` without a shifter.
    pub fn gear(&self) -> bool {
        self.shifter.as_ref().map_or(false, |s| s.get())
    }

    /// Requested gear.
    #[inline]
    pub fn target_gear(&self) -> bool {
        self.target_gear
    }

    pub fn shift_state(&self) -> ShiftState {
        match self.shifter.as_ref() {
            Some(s) if s.get() != self.target_gear => ShiftState::Pending,
            _ => ShiftState::Aligned,
        }
    }

    /// Evaluations spent waiting for the motors to unload since the current request.
    #[inline]
    pub fn pending_shift_ticks(&self) -> u32 {
        self.pending_shift_ticks
    }

    // ---- Polarity & access ----

    pub fn set_reversed(&mut self, reversed: bool) {
        self.reversed = reversed;
    }

    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    #[inline]
    pub fn has_closed_loop(&self) -> bool {
        self.closed_loop.is_some()
    }

    #[inline]
    pub fn has_shifter(&self) -> bool {
        self.shifter.is_some()
    }

    pub fn motors(&self) -> &MotorGroup<M> {
        &self.motors
    }

    pub fn sensor(&self) -> Option<&S> {
        self.closed_loop.as_ref().map(|cl| &cl.sensor)
    }

    pub fn sensor_mut(&mut self) -> Option<&mut S> {
        self.closed_loop.as_mut().map(|cl| &mut cl.sensor)
    }

    pub fn regulator(&self) -> Option<&R> {
        self.closed_loop.as_ref().map(|cl| &cl.regulator)
    }

    pub fn shifter(&self) -> Option<&H> {
        self.shifter.as_ref()
    }

    // ---- Internals ----

    fn write(&mut self, output: f32) {
        let output = if self.reversed { -output } else { output };
        self.motors.set(output);
        self.update_gear();
    }

    fn update_gear(&mut self) {
        let Some(shifter) = self.shifter.as_mut() else {
            return;
        };

        if shifter.get() == self.target_gear {
            self.pending_shift_ticks = 0;
            return;
        }

        if self.motors.all_below(SHIFT_THRESHOLD) {
            shifter.set(self.target_gear);
            debug!(
                "shifted to {} gear after {} pending ticks",
                if self.target_gear { "high" } else { "low" },
                self.pending_shift_ticks
            );
            self.pending_shift_ticks = 0;
        } else {
            self.pending_shift_ticks = self.pending_shift_ticks.saturating_add(1);
            if self.pending_shift_ticks == PENDING_SHIFT_WARN_TICKS {
                warn!(
                    "gear shift pending for {} ticks, motors still loaded",
                    PENDING_SHIFT_WARN_TICKS
                );
            }
        }
    }
}
