// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Text-backed key/value settings.
//!
//! The source is plain text, one pair per line:
//!
//! ```text
//! # Drive tuning
//! LOW_GEAR_SENSITIVE  = 0.85
//! HIGH_GEAR_SENSITIVE = 0.6
//! TURN_NON_LINEARITY  = 0.5
//! PID_DRIVE_P = 0.02
//! ```
//!
//! Everything after `#` is ignored. Later duplicates win. Pairs that do not fit the fixed-size
//! table are dropped with a warning. The source is re-read on every [`update`](ConfigStore::update),
//! so a tuning file edited on the robot takes effect on the next reload.

use heapless::{LinearMap, String};
use log::{debug, warn};

use crate::config::ConfigStore;

/// Maximum number of stored pairs.
pub const MAX_SETTINGS: usize = 32;
/// Maximum key length in bytes.
pub const KEY_LEN: usize = 32;
/// Maximum value length in bytes.
pub const VALUE_LEN: usize = 32;

/// Where the raw settings text comes from (flash, SD card, a compiled-in string).
pub trait SettingsSource {
    fn contents(&mut self) -> &str;
}

impl SettingsSource for &str {
    fn contents(&mut self) -> &str {
        self
    }
}

/// Fixed-capacity settings table loaded from a [`SettingsSource`].
pub struct Settings<S> {
    source: S,
    values: LinearMap<String<KEY_LEN>, String<VALUE_LEN>, MAX_SETTINGS>,
}

impl<S: SettingsSource> Settings<S> {
    /// Create an empty table. Nothing is read until [`update`](ConfigStore::update) runs.
    pub fn new(source: S) -> Self {
        Self {
            source,
            values: LinearMap::new(),
        }
    }

    /// Number of loaded pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Access the source, e.g. to swap in new text before the next update.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: SettingsSource> ConfigStore for Settings<S> {
    fn update(&mut self) {
        self.values.clear();

        for (n, raw) in self.source.contents().lines().enumerate() {
            let line = match raw.find('#') {
                Some(i) => &raw[..i],
                None => raw,
            }
            .trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                warn!("settings line {}: expected KEY = VALUE", n + 1);
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() {
                warn!("settings line {}: empty key", n + 1);
                continue;
            }

            let (Ok(key), Ok(value)) = (
                String::<KEY_LEN>::try_from(key),
                String::<VALUE_LEN>::try_from(value),
            ) else {
                warn!("settings line {}: key or value too long", n + 1);
                continue;
            };

            if let Err((key, _)) = self.values.insert(key, value) {
                warn!("settings table full, dropping {}", key.as_str());
            }
        }

        debug!("loaded {} settings", self.values.len());
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }
}
