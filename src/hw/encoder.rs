// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Quadrature encoder feedback built on any [`PulseCounter`].
//!
//! Distance is read straight from the counter; rate is derived from the count delta between two
//! [`update`](Sensor::update) calls, so it is only as fresh as the closed-loop period.

use crate::hw::{PulseCounter, Sensor};

/// Encoder wrapper that scales raw pulses into distance units.
pub struct QuadratureEncoder<C> {
    counter: C,
    distance_per_pulse: f32,
    reversed: bool,
    last_count: i32,
    rate: f32,
}

impl<C: PulseCounter> QuadratureEncoder<C> {
    /// Wrap a pulse counter. `distance_per_pulse` converts one count into distance units.
    pub fn new(counter: C, distance_per_pulse: f32) -> Self {
        let last_count = counter.count();
        Self {
            counter,
            distance_per_pulse,
            reversed: false,
            last_count,
            rate: 0.0,
        }
    }

    /// Flip the counting direction, for encoders mounted mirrored.
    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    /// Raw counter value.
    #[inline]
    pub fn raw(&self) -> i32 {
        self.counter.count()
    }

    #[inline]
    pub fn distance_per_pulse(&self) -> f32 {
        self.distance_per_pulse
    }

    /// Consume the wrapper and return the underlying counter.
    pub fn free(self) -> C {
        self.counter
    }

    #[inline]
    fn sign(&self) -> f32 {
        if self.reversed {
            -1.0
        } else {
            1.0
        }
    }
}

impl<C: PulseCounter> Sensor for QuadratureEncoder<C> {
    fn distance(&self) -> f32 {
        self.sign() * self.counter.count() as f32 * self.distance_per_pulse
    }

    fn rate(&self) -> f32 {
        self.rate
    }

    fn reset(&mut self) {
        self.counter.reset();
        self.last_count = self.counter.count();
        self.rate = 0.0;
    }

    fn set_distance_per_pulse(&mut self, distance_per_pulse: f32) {
        self.distance_per_pulse = distance_per_pulse;
    }

    fn update(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let count = self.counter.count();
        let delta = count.wrapping_sub(self.last_count);
        self.last_count = count;
        self.rate = self.sign() * delta as f32 * self.distance_per_pulse / dt;
    }
}
