// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART debug terminal and `log` sink.
//!
//! [`init_logger`] hands a [`Usart`] to a global [`UsartLogger`] so that the `warn!`/`debug!`
//! diagnostics emitted by the drivetrain show up on the attached debug terminal.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```

use core::cell::RefCell;
use core::fmt::{self, Write};

use cortex_m::interrupt::{self, Mutex};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use nb::block;
use stm32f7xx_hal::{
    pac,
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}

/// Global logger writing one CRLF-terminated line per record to USART1.
pub struct UsartLogger {
    usart: Mutex<RefCell<Option<Usart<pac::USART1>>>>,
}

static LOGGER: UsartLogger = UsartLogger {
    usart: Mutex::new(RefCell::new(None)),
};

impl Log for UsartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        interrupt::free(|cs| {
            if let Some(usart) = self.usart.borrow(cs).borrow_mut().as_mut() {
                let _ = write!(usart, "[{}] {}\r\n", record.level(), record.args());
            }
        });
    }

    fn flush(&self) {
        interrupt::free(|cs| {
            if let Some(usart) = self.usart.borrow(cs).borrow_mut().as_mut() {
                usart.flush();
            }
        });
    }
}

/// Install USART1 as the `log` backend.
pub fn init_logger(usart: Usart<pac::USART1>, level: LevelFilter) -> Result<(), SetLoggerError> {
    interrupt::free(|cs| {
        LOGGER.usart.borrow(cs).replace(Some(usart));
    });
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
