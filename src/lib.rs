//! Driver for the Sensirion SGP30 gas sensor over I2C.
//!
//! Built on the [`embedded-hal`](https://docs.rs/embedded-hal) 1.0 `I2c` and
//! `DelayNs` traits. The driver owns both for its lifetime and hands them
//! back from [`SGP30::release`].
//!
//! ```
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! # use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
//! use erust_sgp30::{Field, SGP30};
//!
//! # let expectations = [
//! #     Transaction::write(0x58, vec![0x20, 0x08]),
//! #     Transaction::read(0x58, vec![0x01, 0xf4, 0x33, 0x00, 0x00, 0x81]),
//! # ];
//! # let i2c = I2cMock::new(&expectations);
//! let mut sensor = SGP30::new(i2c, NoopDelay::new());
//! let measurement = sensor.read_measurement().unwrap();
//!
//! assert_eq!(measurement.co2eq, Field::Valid(500));
//! assert_eq!(measurement.tvoc, Field::Valid(0));
//! # let (mut i2c, _) = sensor.release();
//! # i2c.done();
//! ```
//!
//! The sensor has to run its measurement loop for a while after
//! initialization before readings mean anything; see [`SGP30::warm_up`] and
//! [`WarmUp`].
//!
//! The driver assumes a single caller. If several tasks share it, serialize
//! whole calls, since each one is a write, a wait and a read.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod commands;
pub mod frame;
pub mod warmup;

#[cfg(test)]
mod recorder;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::debug;

use crate::commands::Command;
pub use crate::frame::{Field, Measurement, RawSignals, SerialNumber};
pub use crate::warmup::{WarmUp, WarmUpState};

pub const DEFAULT_ADDR: u8 = 0x58;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub address: u8,
    /// Reject raw signal frames with bad CRC bytes. Off by default: raw
    /// signals are returned as read, and mismatches are only logged.
    pub verify_raw_signals: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDR,
            verify_raw_signals: false,
        }
    }
}

#[derive(Debug)]
pub struct SGP30<I2C, D> {
    i2c: I2C,
    delay: D,
    config: Config,
}

#[derive(Clone, Copy, Hash, Debug, PartialEq, Eq, PartialOrd, Ord, thiserror::Error)]
pub enum Sgp30Error<I2cError> {
    #[error("invalid CRC")]
    InvalidCrc,
    #[error("I2C error: {0:?}")]
    I2c(I2cError),
}

impl<E> From<E> for Sgp30Error<E> {
    fn from(err: E) -> Self {
        Self::I2c(err)
    }
}

impl<E> embedded_hal::i2c::Error for Sgp30Error<E>
where
    E: embedded_hal::i2c::Error,
{
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        match self {
            Self::I2c(err) => err.kind(),
            _ => embedded_hal::i2c::ErrorKind::Other,
        }
    }
}

impl<I2C: I2c, D: DelayNs> SGP30<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_config(i2c, delay, Config::default())
    }

    pub fn with_config(i2c: I2C, delay: D, config: Config) -> Self {
        Self { i2c, delay, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gives back the bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Reads the chip's serial id. Fails with [`Sgp30Error::InvalidCrc`] if
    /// any of the three words has a bad CRC.
    pub fn read_serial_number(&mut self) -> Result<SerialNumber, Sgp30Error<I2C::Error>> {
        let response = self.execute(&commands::GET_SERIAL_ID)?;

        frame::decode_serial_number(&response).ok_or(Sgp30Error::InvalidCrc)
    }

    /// Starts the on-chip air quality measurement loop. The first readings
    /// after this report the fixed defaults of 400 ppm / 0 ppb.
    pub fn init_measurement(&mut self) -> Result<(), Sgp30Error<I2C::Error>> {
        let [] = self.execute(&commands::INIT_AIR_QUALITY)?;
        Ok(())
    }

    /// Reads CO2eq and TVOC. A bad CRC only invalidates its own field.
    pub fn read_measurement(&mut self) -> Result<Measurement, Sgp30Error<I2C::Error>> {
        let response = self.execute(&commands::MEASURE_AIR_QUALITY)?;

        Ok(frame::decode_measurement(&response))
    }

    /// Reads the raw H2 and ethanol signals. CRC bytes are only enforced
    /// when [`Config::verify_raw_signals`] is set.
    pub fn read_raw_signals(&mut self) -> Result<RawSignals, Sgp30Error<I2C::Error>> {
        let response = self.execute(&commands::MEASURE_RAW_SIGNALS)?;

        frame::decode_raw_signals(&response, self.config.verify_raw_signals)
            .ok_or(Sgp30Error::InvalidCrc)
    }

    /// Initializes the sensor and blocks until the warm-up cycle is done.
    pub fn warm_up(&mut self) -> Result<(), Sgp30Error<I2C::Error>> {
        let mut warmup = WarmUp::new();

        while warmup.step(self)? != WarmUpState::Ready {}

        Ok(())
    }

    pub(crate) fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Writes the opcode, waits out the settle time, then reads `N` bytes.
    fn execute<const N: usize>(
        &mut self,
        cmd: &Command<N>,
    ) -> Result<[u8; N], Sgp30Error<I2C::Error>> {
        let () = Command::<N>::WORD_ALIGNED;

        debug!("command {:02x?}", cmd.opcode);
        self.i2c.write(self.config.address, &cmd.opcode)?;
        self.delay.delay_ms(cmd.delay_ms);

        let mut response = [0u8; N];
        if N > 0 {
            self.i2c.read(self.config.address, &mut response)?;
        }

        Ok(response)
    }
}
