// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Quadrature pulse counters via STM32F7 timers in encoder mode.
//!
//! TIM2 (32-bit) is the preferred drive encoder. TIM3 is only 16 bits wide; its count is
//! sign-extended, so wrap-around is seen as a jump once the side travels past ±32767 pulses.

use stm32f7xx_hal::pac;

use crate::hw::PulseCounter;

pub struct TimerEncoder<TIM> {
    tim: TIM,
}

impl<TIM> TimerEncoder<TIM> {
    /// Consume the wrapper and return the underlying timer peripheral.
    #[inline]
    pub fn free(self) -> TIM {
        self.tim
    }
}

impl TimerEncoder<pac::TIM2> {
    /// Configure TIM2 as a quadrature encoder with full 32-bit range.
    pub fn tim2(tim2: pac::TIM2) -> Self {
        let tim = tim2;

        tim.cr1.modify(|_, w| w.cen().clear_bit());
        tim.arr.write(|w| w.bits(0xFFFF_FFFF));

        // Encoder mode 3: count on both TI1 and TI2
        tim.smcr.modify(|_, w| w.sms().bits(0b011));
        tim.ccmr1_input().modify(|_, w| w.cc1s().ti1().cc2s().ti2());
        tim.ccer.modify(|_, w| {
            w.cc1p()
                .clear_bit()
                .cc2p()
                .clear_bit()
                .cc1e()
                .set_bit()
                .cc2e()
                .set_bit()
        });

        tim.cnt.write(|w| w.bits(0));
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }
}

impl PulseCounter for TimerEncoder<pac::TIM2> {
    #[inline]
    fn count(&self) -> i32 {
        self.tim.cnt.read().cnt().bits() as i32
    }

    #[inline]
    fn reset(&mut self) {
        self.tim.cnt.write(|w| w.bits(0));
    }
}

impl TimerEncoder<pac::TIM3> {
    /// Configure TIM3 as a quadrature encoder with full 16-bit range.
    pub fn tim3(tim3: pac::TIM3) -> Self {
        let tim = tim3;

        tim.cr1.modify(|_, w| w.cen().clear_bit());
        tim.arr.write(|w| unsafe { w.bits(0xFFFF) });

        tim.smcr.modify(|_, w| w.sms().bits(0b011));
        tim.ccmr1_input().modify(|_, w| w.cc1s().ti1().cc2s().ti2());
        tim.ccer.modify(|_, w| {
            w.cc1p()
                .clear_bit()
                .cc2p()
                .clear_bit()
                .cc1e()
                .set_bit()
                .cc2e()
                .set_bit()
        });

        tim.cnt.write(|w| unsafe { w.bits(0) });
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim }
    }
}

impl PulseCounter for TimerEncoder<pac::TIM3> {
    #[inline]
    fn count(&self) -> i32 {
        self.tim.cnt.read().cnt().bits() as i16 as i32
    }

    #[inline]
    fn reset(&mut self) {
        self.tim.cnt.write(|w| unsafe { w.bits(0) });
    }
}
