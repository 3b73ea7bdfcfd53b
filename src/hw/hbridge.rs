// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Two-input PWM H-bridge motor output (DRV8873 in PWM mode, DRV8837, L298 and similar).
//!
//! Drive scheme:
//! - Forward: IN1 PWM, IN2 low
//! - Reverse: IN1 low, IN2 PWM
//! - Neutral: both high (brake) or both low (coast)

use embedded_hal::pwm::SetDutyCycle;

use crate::hw::MotorOutput;

/// Commands smaller than this are treated as neutral.
const NEUTRAL_EPSILON: f32 = 0.001;

/// What the bridge does when commanded to zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NeutralMode {
    /// Short the motor terminals.
    Brake,
    /// Float the outputs.
    Coast,
}

/// H-bridge motor driven by two PWM channels.
pub struct HBridgeMotor<P1, P2> {
    in1: P1,
    in2: P2,
    neutral: NeutralMode,
    current: f32,
}

impl<P1: SetDutyCycle, P2: SetDutyCycle> HBridgeMotor<P1, P2> {
    /// Construct from the IN1/IN2 channels. The motor starts in neutral.
    pub fn new(in1: P1, in2: P2, neutral: NeutralMode) -> Self {
        let mut motor = Self {
            in1,
            in2,
            neutral,
            current: 0.0,
        };
        motor.apply_neutral();
        motor
    }

    pub fn set_neutral_mode(&mut self, neutral: NeutralMode) {
        self.neutral = neutral;
        if self.current.abs() < NEUTRAL_EPSILON {
            self.apply_neutral();
        }
    }

    /// Release both channels.
    pub fn free(self) -> (P1, P2) {
        (self.in1, self.in2)
    }

    fn apply_neutral(&mut self) {
        match self.neutral {
            NeutralMode::Brake => {
                self.in1.set_duty_cycle_fully_on().ok();
                self.in2.set_duty_cycle_fully_on().ok();
            }
            NeutralMode::Coast => {
                self.in1.set_duty_cycle_fully_off().ok();
                self.in2.set_duty_cycle_fully_off().ok();
            }
        }
    }
}

impl<P1: SetDutyCycle, P2: SetDutyCycle> MotorOutput for HBridgeMotor<P1, P2> {
    fn set(&mut self, fraction: f32) {
        let speed = if fraction.is_finite() {
            fraction.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.current = speed;

        if speed > NEUTRAL_EPSILON {
            let duty = (speed * self.in1.max_duty_cycle() as f32) as u16;
            self.in1.set_duty_cycle(duty).ok();
            self.in2.set_duty_cycle_fully_off().ok();
        } else if speed < -NEUTRAL_EPSILON {
            let duty = (-speed * self.in2.max_duty_cycle() as f32) as u16;
            self.in1.set_duty_cycle_fully_off().ok();
            self.in2.set_duty_cycle(duty).ok();
        } else {
            self.apply_neutral();
        }
    }

    #[inline]
    fn get(&self) -> f32 {
        self.current
    }
}
