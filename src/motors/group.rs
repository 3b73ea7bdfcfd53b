// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Mechanically coupled motors driven with one command.
//!
//! All motors in a group share a gearbox output shaft, so they always receive the same fraction.

use heapless::Vec;

use crate::error::DriveError;
use crate::hw::MotorOutput;

/// Most motors one gearbox can hold.
pub const MAX_MOTORS: usize = 3;

/// One to three motors written in lockstep.
pub struct MotorGroup<M> {
    motors: Vec<M, MAX_MOTORS>,
}

impl<M: MotorOutput> MotorGroup<M> {
    /// Build a group from 1 to [`MAX_MOTORS`] motors.
    pub fn new<I: IntoIterator<Item = M>>(motors: I) -> Result<Self, DriveError> {
        let mut group = Vec::new();
        let mut count = 0;

        for motor in motors {
            count += 1;
            // Extra motors are dropped; the count still reports them.
            let _ = group.push(motor);
        }

        if count == 0 || count > MAX_MOTORS {
            return Err(DriveError::InvalidGroupSize(count));
        }

        Ok(Self { motors: group })
    }

    /// Group of exactly one motor.
    pub fn single(motor: M) -> Self {
        let mut motors = Vec::new();
        let _ = motors.push(motor);
        Self { motors }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.motors.len()
    }

    /// Write `fraction` to every motor, clamped to [-1.0, 1.0]. Non-finite values are written as
    /// `0.0`.
    pub fn set(&mut self, fraction: f32) {
        let fraction = if fraction.is_finite() {
            fraction.clamp(-1.0, 1.0)
        } else {
            0.0
        };

        for motor in self.motors.iter_mut() {
            motor.set(fraction);
        }
    }

    /// Last command reported by the first motor.
    pub fn get(&self) -> f32 {
        self.motors.first().map_or(0.0, |m| m.get())
    }

    /// True when every motor reports `|command| < threshold`.
    pub fn all_below(&self, threshold: f32) -> bool {
        self.motors.iter().all(|m| m.get().abs() < threshold)
    }

    pub fn motors(&self) -> &[M] {
        &self.motors
    }

    pub fn motors_mut(&mut self) -> &mut [M] {
        &mut self.motors
    }
}
