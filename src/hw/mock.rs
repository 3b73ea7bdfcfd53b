// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Mock hardware for host-side unit tests.

use core::convert::Infallible;

use embedded_hal::{digital, pwm};

use crate::hw::{MotorOutput, PulseCounter, Sensor, ShiftActuator};

/// Pulse counter whose count is set directly by the test.
#[derive(Debug, Default)]
pub struct MockCounter {
    pub ticks: i32,
    pub resets: u32,
}

impl PulseCounter for MockCounter {
    fn count(&self) -> i32 {
        self.ticks
    }

    fn reset(&mut self) {
        self.ticks = 0;
        self.resets += 1;
    }
}

/// GPIO output that records its level.
#[derive(Debug, Default)]
pub struct MockPin {
    pub high: bool,
}

impl digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}

/// PWM channel that records its duty.
#[derive(Debug)]
pub struct MockPwm {
    pub duty: u16,
    pub max: u16,
}

impl MockPwm {
    pub fn new(max: u16) -> Self {
        Self { duty: 0, max }
    }
}

impl pwm::ErrorType for MockPwm {
    type Error = Infallible;
}

impl pwm::SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}

/// Motor output that stores the last command.
#[derive(Debug, Default)]
pub struct MockMotor {
    pub value: f32,
}

impl MotorOutput for MockMotor {
    fn set(&mut self, fraction: f32) {
        self.value = fraction;
    }

    fn get(&self) -> f32 {
        self.value
    }
}

/// Sensor with directly settable readings.
#[derive(Debug, Default)]
pub struct MockSensor {
    pub distance: f32,
    pub rate: f32,
    pub distance_per_pulse: f32,
    pub resets: u32,
    pub updates: u32,
}

impl Sensor for MockSensor {
    fn distance(&self) -> f32 {
        self.distance
    }

    fn rate(&self) -> f32 {
        self.rate
    }

    fn reset(&mut self) {
        self.distance = 0.0;
        self.resets += 1;
    }

    fn set_distance_per_pulse(&mut self, distance_per_pulse: f32) {
        self.distance_per_pulse = distance_per_pulse;
    }

    fn update(&mut self, _dt: f32) {
        self.updates += 1;
    }
}

/// Shifter that counts state changes.
#[derive(Debug, Default)]
pub struct MockShifter {
    pub state: bool,
    pub shifts: u32,
}

impl ShiftActuator for MockShifter {
    fn set(&mut self, high_gear: bool) {
        if high_gear != self.state {
            self.shifts += 1;
        }
        self.state = high_gear;
    }

    fn get(&self) -> bool {
        self.state
    }
}
