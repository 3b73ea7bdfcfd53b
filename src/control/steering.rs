// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Cheesy-Drive style steering mixer.
//!
//! Turns one operator command `(throttle, turn, quick_turn)` into left/right wheel fractions.
//! Beyond plain arcade mixing it adds:
//!
//! - a joystick deadband that rescales the remaining travel back onto [-1, 1],
//! - a sine shaping curve that softens small turn inputs,
//! - negative-inertia compensation, which briefly boosts turn output when the turn command
//!   changes so the robot's rotational inertia does not make steering feel sluggish,
//! - quick turn, a pivot mode with full rotational authority regardless of throttle, plus a
//!   quick-stop bias that cancels leftover pivot momentum once normal driving resumes.
//!
//! Call [`SteeringMixer::mix`] once per control tick (e.g. every 20 ms).

use core::f32::consts::FRAC_PI_2;

use micromath::F32Ext;

use crate::error::ConfigError;

/// Joystick deadband used until one is configured.
pub const DEFAULT_DEADBAND: f32 = 0.02;

/// Below this throttle a quick turn counts as a pivot in place.
const QUICK_TURN_THROTTLE: f32 = 0.2;
/// Smoothing factor of the quick-stop accumulator.
const QUICK_STOP_ALPHA: f32 = 0.1;
const QUICK_STOP_GAIN: f32 = 5.0;

const HIGH_GEAR_NEG_INERTIA: f32 = 5.0;
const TURN_IN_NEG_INERTIA: f32 = 2.5;
const LARGE_TURN: f32 = 0.65;
const LARGE_TURN_NEG_INERTIA: f32 = 5.0;
const LOW_GEAR_NEG_INERTIA: f32 = 3.0;

/// `sin(π/2 · k)` must stay at least this far from zero.
const MIN_CURVE_NORMALIZER: f32 = 0.01;

/// One tick of operator intent.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DriveCommand {
    /// Forward power in [-1, 1].
    pub throttle: f32,
    /// Turn rate in [-1, 1], positive turns toward the left wheel side.
    pub turn: f32,
    pub quick_turn: bool,
}

impl DriveCommand {
    pub const fn new(throttle: f32, turn: f32, quick_turn: bool) -> Self {
        Self {
            throttle,
            turn,
            quick_turn,
        }
    }
}

/// Per-side output of the mixer, always within [-1, 1].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WheelCommand {
    pub left: f32,
    pub right: f32,
}

/// Tuning that feeds the mixer. Validated before it is accepted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MixerConfig {
    pub deadband: f32,
    /// Turn authority while driving; 0 disables turning outside quick turn.
    pub sensitivity: f32,
    /// Shape `k` of the turn curve `sin(π/2·k·x) / sin(π/2·k)`.
    pub turn_non_linearity: f32,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            deadband: DEFAULT_DEADBAND,
            sensitivity: 1.0,
            turn_non_linearity: 1.0,
        }
    }
}

impl MixerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_deadband(self.deadband)?;
        validate_sensitivity(self.sensitivity)?;
        validate_turn_non_linearity(self.turn_non_linearity)?;
        Ok(())
    }
}

/// State carried between ticks. Only [`SteeringMixer::mix`] writes it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SteeringState {
    previous_turn: f32,
    neg_inertia_accumulator: f32,
    quick_stop_accumulator: f32,
}

impl SteeringState {
    #[inline]
    pub fn previous_turn(&self) -> f32 {
        self.previous_turn
    }

    #[inline]
    pub fn neg_inertia_accumulator(&self) -> f32 {
        self.neg_inertia_accumulator
    }

    #[inline]
    pub fn quick_stop_accumulator(&self) -> f32 {
        self.quick_stop_accumulator
    }
}

/// Throttle/turn to left/right mixer with persistent accumulators.
pub struct SteeringMixer {
    config: MixerConfig,
    state: SteeringState,
}

impl Default for SteeringMixer {
    fn default() -> Self {
        Self {
            config: MixerConfig::default(),
            state: SteeringState::default(),
        }
    }
}

impl SteeringMixer {
    pub fn new(config: MixerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: SteeringState::default(),
        })
    }

    #[inline]
    pub fn config(&self) -> MixerConfig {
        self.config
    }

    #[inline]
    pub fn state(&self) -> &SteeringState {
        &self.state
    }

    /// Replace the whole configuration. On error the previous one is kept.
    pub fn set_config(&mut self, config: MixerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_deadband(&mut self, band: f32) -> Result<(), ConfigError> {
        self.config.deadband = validate_deadband(band)?;
        Ok(())
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) -> Result<(), ConfigError> {
        self.config.sensitivity = validate_sensitivity(sensitivity)?;
        Ok(())
    }

    pub fn set_turn_non_linearity(&mut self, k: f32) -> Result<(), ConfigError> {
        self.config.turn_non_linearity = validate_turn_non_linearity(k)?;
        Ok(())
    }

    /// Forget all turn history.
    pub fn reset(&mut self) {
        self.state = SteeringState::default();
    }

    /// Mix one command. `high_gear` is the gear the drivetrain is actually in.
    pub fn mix(&mut self, command: DriveCommand, high_gear: bool) -> WheelCommand {
        let band = self.config.deadband;
        let throttle = apply_deadband(limit(finite_or_zero(command.throttle), 1.0), band);
        let mut turn = apply_deadband(limit(finite_or_zero(command.turn), 1.0), band);

        let neg_inertia = turn - self.state.previous_turn;
        self.state.previous_turn = turn;

        let curve = FRAC_PI_2 * self.config.turn_non_linearity;
        turn = (curve * turn).sin() / curve.sin();

        // Negative inertia
        let neg_inertia_scalar = if high_gear {
            HIGH_GEAR_NEG_INERTIA
        } else if turn * neg_inertia > 0.0 {
            TURN_IN_NEG_INERTIA
        } else if turn.abs() > LARGE_TURN {
            LARGE_TURN_NEG_INERTIA
        } else {
            LOW_GEAR_NEG_INERTIA
        };

        self.state.neg_inertia_accumulator += neg_inertia * neg_inertia_scalar;
        turn += self.state.neg_inertia_accumulator;
        self.state.neg_inertia_accumulator = decay(self.state.neg_inertia_accumulator);

        let angular_power = if command.quick_turn {
            if throttle.abs() < QUICK_TURN_THROTTLE {
                self.state.quick_stop_accumulator = (1.0 - QUICK_STOP_ALPHA)
                    * self.state.quick_stop_accumulator
                    + QUICK_STOP_ALPHA * limit(turn, 1.0) * QUICK_STOP_GAIN;
            }
            turn
        } else {
            let power =
                throttle.abs() * turn * self.config.sensitivity - self.state.quick_stop_accumulator;
            self.state.quick_stop_accumulator = decay(self.state.quick_stop_accumulator);
            power
        };

        let (left, right) = rebalance(
            throttle - angular_power,
            throttle + angular_power,
            command.quick_turn,
        );

        WheelCommand {
            left: limit(left, 1.0),
            right: limit(right, 1.0),
        }
    }
}

/// Clip the first side found out of range. With quick turn, the excess is pushed onto the other
/// side so the turn keeps its authority at the cost of straight-line speed.
fn rebalance(mut left: f32, mut right: f32, quick_turn: bool) -> (f32, f32) {
    if left > 1.0 {
        if quick_turn {
            right -= left - 1.0;
        }
        left = 1.0;
    } else if right > 1.0 {
        if quick_turn {
            left -= right - 1.0;
        }
        right = 1.0;
    } else if left < -1.0 {
        if quick_turn {
            right += -left - 1.0;
        }
        left = -1.0;
    } else if right < -1.0 {
        if quick_turn {
            left += -right - 1.0;
        }
        right = -1.0;
    }

    (left, right)
}

/// Zero values inside `[-band, band]` and rescale the rest so the deadband edge maps to 0 and
/// ±1 still maps to ±1.
pub fn apply_deadband(value: f32, band: f32) -> f32 {
    if value.abs() <= band {
        0.0
    } else if value > 0.0 {
        (value - band) / (1.0 - band)
    } else {
        (value + band) / (1.0 - band)
    }
}

/// Clamp `value` to `±limit`. NaN maps to 0.
#[inline]
pub fn limit(value: f32, limit: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else if value > limit {
        limit
    } else if value < -limit {
        -limit
    } else {
        value
    }
}

/// Step an accumulator one unit toward zero, snapping to zero once within a unit.
#[inline]
fn decay(accumulator: f32) -> f32 {
    if accumulator > 1.0 {
        accumulator - 1.0
    } else if accumulator < -1.0 {
        accumulator + 1.0
    } else {
        0.0
    }
}

#[inline]
fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn validate_deadband(band: f32) -> Result<f32, ConfigError> {
    if band.is_finite() && (0.0..1.0).contains(&band) {
        Ok(band)
    } else {
        Err(ConfigError::InvalidDeadband(band))
    }
}

pub fn validate_sensitivity(sensitivity: f32) -> Result<f32, ConfigError> {
    if sensitivity.is_finite() {
        Ok(sensitivity)
    } else {
        Err(ConfigError::InvalidSensitivity(sensitivity))
    }
}

pub fn validate_turn_non_linearity(k: f32) -> Result<f32, ConfigError> {
    if !k.is_finite() || (FRAC_PI_2 * k).sin().abs() < MIN_CURVE_NORMALIZER {
        return Err(ConfigError::DegenerateTurnNonLinearity(k));
    }
    Ok(k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixer(deadband: f32, sensitivity: f32, k: f32) -> SteeringMixer {
        SteeringMixer::new(MixerConfig {
            deadband,
            sensitivity,
            turn_non_linearity: k,
        })
        .unwrap()
    }

    fn approx(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn deadband_zeroes_small_inputs_and_keeps_full_scale() {
        for &band in &[0.02_f32, 0.1, 0.37, 0.9] {
            assert_eq!(apply_deadband(band, band), 0.0);
            assert_eq!(apply_deadband(-band * 0.5, band), 0.0);
            assert_eq!(apply_deadband(1.0, band), 1.0);
            assert_eq!(apply_deadband(-1.0, band), -1.0);
        }
    }

    #[test]
    fn deadband_rescales_linearly() {
        assert!(approx(apply_deadband(0.6, 0.2), 0.5, 1e-6));
        assert!(approx(apply_deadband(-0.6, 0.2), -0.5, 1e-6));
        // Zero band is a passthrough
        assert_eq!(apply_deadband(0.3, 0.0), 0.3);
    }

    #[test]
    fn straight_throttle_has_no_turn() {
        let mut m = mixer(0.02, 1.0, 0.5);
        let out = m.mix(DriveCommand::new(0.5, 0.0, false), false);
        assert!(approx(out.left, 0.5, 0.02));
        assert!(approx(out.right, 0.5, 0.02));
        assert!(approx(out.left, out.right, 1e-4));
    }

    #[test]
    fn quick_turn_pivot_ignores_sensitivity() {
        // Zero sensitivity would forbid any turn outside quick turn
        let mut m = mixer(0.02, 0.0, 0.5);
        let out = m.mix(DriveCommand::new(0.0, 1.0, true), false);
        assert_eq!(out.left, -1.0);
        assert_eq!(out.right, 1.0);
        assert!(m.state().quick_stop_accumulator() > 0.0);
    }

    #[test]
    fn zero_sensitivity_blocks_normal_turning() {
        let mut m = mixer(0.0, 0.0, 0.5);
        let out = m.mix(DriveCommand::new(0.5, 0.3, false), false);
        assert_eq!(out.left, 0.5);
        assert_eq!(out.right, 0.5);
    }

    #[test]
    fn normal_driving_clips_without_transfer() {
        let mut m = mixer(0.0, 1.0, 1.0);
        let out = m.mix(DriveCommand::new(1.0, 0.5, false), false);
        // turn' = sin(pi/4) + 0.5 * 2.5 negative inertia
        assert_eq!(out.right, 1.0);
        assert!(approx(out.left, 1.0 - (0.70711 + 1.25), 0.01));
    }

    #[test]
    fn quick_turn_transfers_overflow() {
        let (left, right) = rebalance(1.4, 0.2, true);
        assert_eq!(left, 1.0);
        assert!(approx(right, -0.2, 1e-6));

        let (left, right) = rebalance(1.4, 0.2, false);
        assert_eq!(left, 1.0);
        assert_eq!(right, 0.2);

        let (left, right) = rebalance(-0.1, -1.5, true);
        assert!(approx(left, 0.4, 1e-6));
        assert_eq!(right, -1.0);
    }

    #[test]
    fn negative_inertia_scalar_depends_on_gear() {
        let mut low = mixer(0.0, 1.0, 1.0);
        low.mix(DriveCommand::new(0.0, 1.0, false), false);
        // 1.0 * 2.5 then one decay step
        assert!(approx(low.state().neg_inertia_accumulator(), 1.5, 1e-6));

        let mut high = mixer(0.0, 1.0, 1.0);
        high.mix(DriveCommand::new(0.0, 1.0, false), true);
        assert!(approx(high.state().neg_inertia_accumulator(), 4.0, 1e-6));
    }

    #[test]
    fn accumulators_decay_to_zero() {
        let mut m = mixer(0.0, 1.0, 1.0);

        // Wind up both accumulators with a pivot
        m.mix(DriveCommand::new(0.0, 1.0, true), true);
        m.mix(DriveCommand::new(0.0, 1.0, true), true);
        let state = *m.state();
        let worst = state
            .neg_inertia_accumulator()
            .abs()
            .max(state.quick_stop_accumulator().abs());
        assert!(worst > 0.0);

        // Same turn (no negative inertia), no quick turn
        let ticks = worst.ceil() as usize;
        for _ in 0..ticks {
            m.mix(DriveCommand::new(0.0, 1.0, false), true);
        }
        assert_eq!(m.state().neg_inertia_accumulator(), 0.0);
        assert_eq!(m.state().quick_stop_accumulator(), 0.0);
    }

    #[test]
    fn output_always_within_bounds() {
        let mut m = mixer(0.05, 1.3, 0.8);
        let steps = [-1.0_f32, -0.7, -0.3, -0.04, 0.0, 0.1, 0.45, 0.9, 1.0];
        for (n, &throttle) in steps.iter().enumerate() {
            for (k, &turn) in steps.iter().enumerate() {
                for &high_gear in &[false, true] {
                    let quick = (n + k) % 3 == 0;
                    let out = m.mix(DriveCommand::new(throttle, turn, quick), high_gear);
                    assert!((-1.0..=1.0).contains(&out.left), "left {}", out.left);
                    assert!((-1.0..=1.0).contains(&out.right), "right {}", out.right);
                    // Whiplash the turn to pile up negative inertia
                    let out = m.mix(DriveCommand::new(-throttle, -turn, !quick), high_gear);
                    assert!((-1.0..=1.0).contains(&out.left));
                    assert!((-1.0..=1.0).contains(&out.right));
                }
            }
        }
    }

    #[test]
    fn out_of_range_and_nan_inputs_are_contained() {
        let mut m = mixer(0.02, 1.0, 0.5);
        let out = m.mix(DriveCommand::new(5.0, f32::NAN, false), false);
        assert!(approx(out.left, 1.0, 1e-4));
        assert!(approx(out.right, 1.0, 1e-4));
        assert_eq!(m.state().previous_turn(), 0.0);
    }

    #[test]
    fn degenerate_non_linearity_is_rejected() {
        assert_eq!(
            validate_turn_non_linearity(0.0),
            Err(ConfigError::DegenerateTurnNonLinearity(0.0))
        );
        assert!(validate_turn_non_linearity(2.0).is_err());
        assert!(validate_turn_non_linearity(f32::NAN).is_err());
        assert!(validate_turn_non_linearity(0.5).is_ok());

        let mut m = mixer(0.02, 1.0, 0.5);
        assert!(m.set_turn_non_linearity(0.0).is_err());
        assert_eq!(m.config().turn_non_linearity, 0.5);
    }

    #[test]
    fn limit_maps_nan_to_zero() {
        assert_eq!(limit(f32::NAN, 1.0), 0.0);
        assert_eq!(limit(f32::INFINITY, 1.0), 1.0);
        assert_eq!(limit(-3.0, 1.0), -1.0);
        assert_eq!(limit(0.25, 1.0), 0.25);
    }

    #[test]
    fn non_finite_sensitivity_keeps_previous() {
        let mut m = mixer(0.02, 0.7, 0.5);
        assert!(matches!(
            m.set_sensitivity(f32::NAN),
            Err(ConfigError::InvalidSensitivity(s)) if s.is_nan()
        ));
        assert!(m.set_sensitivity(f32::INFINITY).is_err());
        assert_eq!(m.config().sensitivity, 0.7);

        let out = m.mix(DriveCommand::new(0.5, 0.5, false), false);
        assert!((-1.0..=1.0).contains(&out.left));
        assert!((-1.0..=1.0).contains(&out.right));
        assert!(out.right > out.left);

        assert!(SteeringMixer::new(MixerConfig {
            sensitivity: f32::NAN,
            ..MixerConfig::default()
        })
        .is_err());
    }

    #[test]
    fn invalid_deadband_keeps_previous() {
        let mut m = mixer(0.02, 1.0, 0.5);
        assert_eq!(m.set_deadband(1.0), Err(ConfigError::InvalidDeadband(1.0)));
        assert!(m.set_deadband(-0.1).is_err());
        assert_eq!(m.config().deadband, 0.02);
        assert!(m.set_deadband(0.1).is_ok());
        assert_eq!(m.config().deadband, 0.1);
    }
}
