// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Runtime Configuration
//!
//! Drive tuning lives in a key/value store that can be reloaded while the robot is running.
//! A reload reads every key into the [`DriveConfig`] snapshot. Each key is checked on its own:
//! a rejected value keeps the one already in effect and the remaining keys still apply.
//!
//! ## Modules
//!
//! - [`settings`] - `KEY = VALUE` text store backed by a fixed-size table.

pub mod settings;

pub use settings::{Settings, SettingsSource};

use log::debug;

use crate::control::steering::validate_turn_non_linearity;
use crate::control::PidGains;
use crate::error::ConfigError;

/// Configuration keys read by the drivetrain.
pub mod keys {
    pub const LOW_GEAR_SENSITIVE: &str = "LOW_GEAR_SENSITIVE";
    pub const HIGH_GEAR_SENSITIVE: &str = "HIGH_GEAR_SENSITIVE";
    pub const TURN_NON_LINEARITY: &str = "TURN_NON_LINEARITY";
    pub const PID_DRIVE_P: &str = "PID_DRIVE_P";
    pub const PID_DRIVE_I: &str = "PID_DRIVE_I";
    pub const PID_DRIVE_D: &str = "PID_DRIVE_D";
    pub const PID_DRIVE_F: &str = "PID_DRIVE_F";
}

/// Reloadable key/value store.
pub trait ConfigStore {
    /// Re-read the backing source.
    fn update(&mut self);

    fn get_str(&self, key: &str) -> Option<&str>;

    /// Numeric value for `key`. Missing or unparsable values read as `0.0`.
    fn get_f32(&self, key: &str) -> f32 {
        match self.get_str(key) {
            Some(raw) => match raw.trim().parse::<f32>() {
                Ok(value) => value,
                Err(_) => {
                    debug!("{} = {:?} is not a number, using 0", key, raw);
                    0.0
                }
            },
            None => {
                debug!("{} not set, using 0", key);
                0.0
            }
        }
    }
}

/// Validated snapshot of the drive tuning keys.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DriveConfig {
    pub low_gear_sensitivity: f32,
    pub high_gear_sensitivity: f32,
    pub turn_non_linearity: f32,
    pub pid: PidGains,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            low_gear_sensitivity: 1.0,
            high_gear_sensitivity: 1.0,
            turn_non_linearity: 1.0,
            pid: PidGains::default(),
        }
    }
}

impl DriveConfig {
    /// Read every drive key from `store` into this snapshot. The store is not re-read; call
    /// [`ConfigStore::update`] first to pick up changes.
    ///
    /// Non-finite values and a degenerate turn non-linearity are skipped and keep their current
    /// value. The first rejection is returned after all other keys have been applied.
    pub fn update_from<C: ConfigStore + ?Sized>(&mut self, store: &C) -> Result<(), ConfigError> {
        let mut rejected = None;
        let mut read = |key: &'static str, current: &mut f32| {
            let value = store.get_f32(key);
            if value.is_finite() {
                *current = value;
            } else {
                debug!("{} = {} rejected, keeping {}", key, value, current);
                rejected.get_or_insert(ConfigError::NonFinite(key, value));
            }
        };

        read(keys::LOW_GEAR_SENSITIVE, &mut self.low_gear_sensitivity);
        read(keys::HIGH_GEAR_SENSITIVE, &mut self.high_gear_sensitivity);
        read(keys::PID_DRIVE_P, &mut self.pid.p);
        read(keys::PID_DRIVE_I, &mut self.pid.i);
        read(keys::PID_DRIVE_D, &mut self.pid.d);
        read(keys::PID_DRIVE_F, &mut self.pid.f);

        let k = store.get_f32(keys::TURN_NON_LINEARITY);
        match validate_turn_non_linearity(k) {
            Ok(k) => self.turn_non_linearity = k,
            Err(e) => {
                debug!("{}, keeping {}", e, self.turn_non_linearity);
                rejected.get_or_insert(e);
            }
        }

        rejected.map_or(Ok(()), Err)
    }

    /// Turn sensitivity for the given gear.
    #[inline]
    pub fn sensitivity(&self, high_gear: bool) -> f32 {
        if high_gear {
            self.high_gear_sensitivity
        } else {
            self.low_gear_sensitivity
        }
    }
}
