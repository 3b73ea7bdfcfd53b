// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Two-sided tank drivetrain.
//!
//! Combines the [`SteeringMixer`] with a left and a right [`GearBox`]. Operator control goes
//! through [`drive`](DriveTrain::drive); autonomous code sets per-side setpoints directly or runs
//! the built-in [`TrapezoidProfile`].
//!
//! No operation here returns a hardware error. A gearbox that lacks the hardware for a request
//! is logged, counted in [`fault_count`](DriveTrain::fault_count), and answered with a neutral
//! value so the control loop keeps running.

use core::f32::consts::PI;
use core::fmt;

use log::{debug, warn};

use crate::config::{ConfigStore, DriveConfig};
use crate::control::{DriveCommand, MixerConfig, Regulator, SteeringMixer, TrapezoidProfile};
use crate::error::{ConfigError, DriveError};
use crate::hw::{MotorOutput, Sensor, ShiftActuator};
use crate::motors::GearBox;

/// Encoder scale for 10.16 cm wheels and 360-count encoders, in cm per pulse.
pub const DEFAULT_DISTANCE_PER_PULSE: f32 = PI * 10.16 / 360.0;

/// Cruise velocity of the drive profile, in distance units per second.
pub const MAX_WHEEL_SPEED: f32 = 150.0;

/// Seconds the drive profile takes to reach [`MAX_WHEEL_SPEED`].
pub const TIME_TO_MAX_SPEED: f32 = 5.0;

/// Consecutive evaluations with mismatched shifters before it is reported.
pub const SHIFT_DISAGREEMENT_WARN_TICKS: u32 = 50;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Tank drivetrain built from two gearboxes and a reloadable configuration store.
pub struct DriveTrain<M, S, R, H, C> {
    left: GearBox<M, S, R, H>,
    right: GearBox<M, S, R, H>,

    mixer: SteeringMixer,
    settings: C,
    config: DriveConfig,
    profile: TrapezoidProfile,

    faults: u32,
    disagreement_ticks: u32,
}

impl<M, S, R, H, C> DriveTrain<M, S, R, H, C>
where
    M: MotorOutput,
    S: Sensor,
    R: Regulator,
    H: ShiftActuator,
    C: ConfigStore,
{
    /// Take ownership of both sides. The left side is mirrored, the encoders get
    /// [`DEFAULT_DISTANCE_PER_PULSE`], and the configuration is loaded once.
    pub fn new(left: GearBox<M, S, R, H>, right: GearBox<M, S, R, H>, mut settings: C) -> Self {
        settings.update();
        let mut config = DriveConfig::default();
        if let Err(e) = config.update_from(&settings) {
            warn!("drive configuration: {}, using default", e);
        }

        let mut drive = Self {
            left: left.reversed(true),
            right: right.reversed(false),
            mixer: SteeringMixer::default(),
            settings,
            config,
            profile: TrapezoidProfile::new(MAX_WHEEL_SPEED, TIME_TO_MAX_SPEED),
            faults: 0,
            disagreement_ticks: 0,
        };

        for gb in [&mut drive.left, &mut drive.right] {
            if gb.has_closed_loop() {
                let _ = gb.set_distance_per_pulse(DEFAULT_DISTANCE_PER_PULSE);
            }
        }

        drive.apply_config();
        drive
    }

    // ---- Operator control ----

    /// Mix one operator command and write it to both sides.
    pub fn drive(&mut self, throttle: f32, turn: f32, quick_turn: bool) {
        let wheels = self.mixer.mix(
            DriveCommand::new(throttle, turn, quick_turn),
            self.left.gear(),
        );

        self.left.set_manual(wheels.left);
        self.right.set_manual(wheels.right);
        self.check_shift_agreement();
    }

    /// Set the joystick deadband. Values outside `[0, 1)` are rejected and the previous band
    /// stays.
    pub fn set_deadband(&mut self, band: f32) -> Result<(), ConfigError> {
        self.mixer.set_deadband(band).map_err(|e| {
            warn!("{}", e);
            e
        })
    }

    // ---- Configuration ----

    /// Re-read the store into the configuration snapshot. Rejected keys keep their previous
    /// value; every other key takes effect and the first rejection is returned.
    pub fn reload_config(&mut self) -> Result<(), ConfigError> {
        self.settings.update();
        let result = self.config.update_from(&self.settings);
        match result {
            Ok(()) => debug!("drive configuration reloaded"),
            Err(e) => warn!("drive configuration: {}, keeping previous", e),
        }
        self.apply_mixer_config();
        result
    }

    /// Reload the configuration and apply the drive gains to both sides. The gains are applied
    /// even when another key was rejected.
    pub fn reload_pid(&mut self) -> Result<(), ConfigError> {
        let result = self.reload_config();
        self.apply_gains();
        result
    }

    #[inline]
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    // ---- Autonomous control ----

    pub fn set_left_setpoint(&mut self, value: f32) {
        let result = self.left.set_setpoint(value);
        self.report(Side::Left, "set_setpoint", result);
    }

    pub fn set_right_setpoint(&mut self, value: f32) {
        let result = self.right.set_setpoint(value);
        self.report(Side::Right, "set_setpoint", result);
    }

    pub fn left_setpoint(&mut self) -> f32 {
        let result = self.left.setpoint();
        self.report(Side::Left, "setpoint", result)
    }

    pub fn right_setpoint(&mut self) -> f32 {
        let result = self.right.setpoint();
        self.report(Side::Right, "setpoint", result)
    }

    pub fn set_left_manual(&mut self, value: f32) {
        self.left.set_manual(value);
        self.check_shift_agreement();
    }

    pub fn set_right_manual(&mut self, value: f32) {
        self.right.set_manual(value);
        self.check_shift_agreement();
    }

    /// Run both closed loops once.
    pub fn step(&mut self, dt: f32) {
        self.left.step(dt);
        self.right.step(dt);
        self.check_shift_agreement();
    }

    /// True when both regulators are within tolerance.
    pub fn on_target(&self) -> bool {
        self.left.on_target() && self.right.on_target()
    }

    /// Plan a profiled move of both sides from their mean distance to `goal`.
    pub fn start_profile(&mut self, goal: f32) {
        let start = (self.left_distance() + self.right_distance()) / 2.0;
        self.profile.set_goal(start, goal);
    }

    /// Feed the profile setpoint `elapsed` seconds into the move to both sides.
    pub fn update_profile(&mut self, elapsed: f32) -> f32 {
        let setpoint = self.profile.setpoint(elapsed);
        self.set_left_setpoint(setpoint);
        self.set_right_setpoint(setpoint);
        setpoint
    }

    pub fn profile_done(&self, elapsed: f32) -> bool {
        self.profile.is_done(elapsed)
    }

    #[inline]
    pub fn profile(&self) -> &TrapezoidProfile {
        &self.profile
    }

    // ---- Sensors ----

    pub fn reset_encoders(&mut self) {
        let result = self.left.reset_encoder();
        self.report(Side::Left, "reset_encoder", result);
        let result = self.right.reset_encoder();
        self.report(Side::Right, "reset_encoder", result);
    }

    pub fn set_distance_per_pulse(&mut self, distance_per_pulse: f32) {
        let result = self.left.set_distance_per_pulse(distance_per_pulse);
        self.report(Side::Left, "set_distance_per_pulse", result);
        let result = self.right.set_distance_per_pulse(distance_per_pulse);
        self.report(Side::Right, "set_distance_per_pulse", result);
    }

    pub fn left_distance(&mut self) -> f32 {
        let result = self.left.distance();
        self.report(Side::Left, "distance", result)
    }

    pub fn right_distance(&mut self) -> f32 {
        let result = self.right.distance();
        self.report(Side::Right, "distance", result)
    }

    pub fn left_rate(&mut self) -> f32 {
        let result = self.left.rate();
        self.report(Side::Left, "rate", result)
    }

    pub fn right_rate(&mut self) -> f32 {
        let result = self.right.rate();
        self.report(Side::Right, "rate", result)
    }

    // ---- Gear ----

    /// Request a gear on both sides and switch the turn sensitivity to match. The store is
    /// re-read first so sensitivity edits take effect on the next shift.
    pub fn set_gear(&mut self, high_gear: bool) {
        let _ = self.reload_config();

        self.left.set_gear(high_gear);
        self.right.set_gear(high_gear);
        if let Err(e) = self.mixer.set_sensitivity(self.config.sensitivity(high_gear)) {
            warn!("{}", e);
        }
    }

    /// Actual gear, read from the left shifter.
    pub fn gear(&self) -> bool {
        self.left.gear()
    }

    /// Both sides have shifters and they are in different gears.
    pub fn shift_disagreement(&self) -> bool {
        self.left.has_shifter() && self.right.has_shifter() && self.left.gear() != self.right.gear()
    }

    // ---- Access ----

    /// Capability faults reported since construction.
    #[inline]
    pub fn fault_count(&self) -> u32 {
        self.faults
    }

    pub fn mixer(&self) -> &SteeringMixer {
        &self.mixer
    }

    pub fn side(&self, side: Side) -> &GearBox<M, S, R, H> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut GearBox<M, S, R, H> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn settings_mut(&mut self) -> &mut C {
        &mut self.settings
    }

    // ---- Internals ----

    fn apply_config(&mut self) {
        self.apply_mixer_config();
        self.apply_gains();
    }

    fn apply_mixer_config(&mut self) {
        let mixer = MixerConfig {
            deadband: self.mixer.config().deadband,
            sensitivity: self.config.sensitivity(self.left.target_gear()),
            turn_non_linearity: self.config.turn_non_linearity,
        };
        if let Err(e) = self.mixer.set_config(mixer) {
            warn!("mixer configuration rejected: {}", e);
        }
    }

    fn apply_gains(&mut self) {
        let gains = self.config.pid;
        for gb in [&mut self.left, &mut self.right] {
            if gb.has_closed_loop() {
                let _ = gb.set_gains(gains);
            }
        }
    }

    fn report<T: Default>(&mut self, side: Side, op: &str, result: Result<T, DriveError>) -> T {
        result.unwrap_or_else(|e| {
            self.faults = self.faults.saturating_add(1);
            warn!("{} gearbox {}: {}", side, op, e);
            T::default()
        })
    }

    fn check_shift_agreement(&mut self) {
        if !self.shift_disagreement() {
            self.disagreement_ticks = 0;
            return;
        }

        self.disagreement_ticks = self.disagreement_ticks.saturating_add(1);
        if self.disagreement_ticks == SHIFT_DISAGREEMENT_WARN_TICKS {
            warn!(
                "shifters disagree for {} ticks (left {}, right {})",
                SHIFT_DISAGREEMENT_WARN_TICKS,
                self.left.gear(),
                self.right.gear()
            );
        }
    }
}
