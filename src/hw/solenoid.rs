// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Single-coil pneumatic solenoid used as the gear shifter.
//!
//! The valve is driven from one GPIO through a low-side switch or relay board. Energized selects
//! high gear.

use embedded_hal::digital::OutputPin;

use crate::hw::ShiftActuator;

/// Whether the valve is energized by driving the pin high or low.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// Solenoid abstraction that remembers its active level and last driven state.
pub struct Solenoid<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    energized: bool,
}

impl<PIN: OutputPin> Solenoid<PIN> {
    /// Create a solenoid wrapper, initializing it de-energized (low gear).
    pub fn new(mut pin: PIN, active: ActiveLevel) -> Self {
        match active {
            ActiveLevel::High => pin.set_low().ok(),
            ActiveLevel::Low => pin.set_high().ok(),
        };
        Self {
            pin,
            active,
            energized: false,
        }
    }

    pub fn active_high(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    pub fn active_low(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }

    /// Energize (true) or release (false) the valve.
    pub fn energize(&mut self, on: bool) {
        match (self.active, on) {
            (ActiveLevel::High, true) => self.pin.set_high().ok(),
            (ActiveLevel::High, false) => self.pin.set_low().ok(),
            (ActiveLevel::Low, true) => self.pin.set_low().ok(),
            (ActiveLevel::Low, false) => self.pin.set_high().ok(),
        };
        self.energized = on;
    }

    #[inline]
    pub fn is_energized(&self) -> bool {
        self.energized
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}

impl<PIN: OutputPin> ShiftActuator for Solenoid<PIN> {
    #[inline]
    fn set(&mut self, high_gear: bool) {
        self.energize(high_gear);
    }

    #[inline]
    fn get(&self) -> bool {
        self.energized
    }
}
