// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! STM32F7 bindings for the hardware seams.
//!
//! - [`encoder`] - TIM2/TIM3 encoder-mode timers as [`PulseCounter`](crate::hw::PulseCounter)s.
//! - [`usart`] - USART debug terminal and `log` sink.

pub mod encoder;
pub mod usart;

pub use encoder::TimerEncoder;
pub use usart::{init_logger, Usart, UsartLogger};
