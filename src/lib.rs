// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Drivebase
//!
//! Control core for a two-speed tank drivetrain, written in `no_std` Rust. Each side is a
//! gearbox of one to three motors with an optional encoder-fed PID loop and an optional
//! pneumatic shifter.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | Device traits plus `embedded-hal` motor, encoder and solenoid drivers |
//! | [`control`] | Steering mixer, PID regulator, motion profile |
//! | [`motors`] | Motor groups and gearboxes with load-safe shifting |
//! | [`drivetrain`] | Two-sided façade used by operator and autonomous code |
//! | [`config`] | Reloadable key/value tuning and its validated snapshot |
//! | [`error`] | Error types |
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Build the STM32F7 glue (timer encoders, USART logger):
//!
//! ```bash
//! cargo build --release --features stm32 --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod drivetrain;
pub mod error;
pub mod hw;
pub mod motors;

pub use drivetrain::{DriveTrain, Side};
pub use error::{Capability, ConfigError, DriveError};
