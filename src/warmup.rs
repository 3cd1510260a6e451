//! Post-initialization warm-up.
//!
//! After `init_measurement` the sensor needs its measurement loop polled
//! about once a second for a while before readings are meaningful. Until
//! then it reports a fixed 400 ppm / 0 ppb. [`WarmUp`] runs that cycle one
//! step at a time, so it can be driven from a blocking loop
//! ([`SGP30::warm_up`](crate::SGP30::warm_up)) or scheduled by a host that
//! owns its own timing.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info};

use crate::{SGP30, Sgp30Error};

#[derive(Clone, Copy, Hash, Debug, PartialEq, Eq)]
pub enum WarmUpState {
    NotStarted,
    /// `completed` measurement reads done so far.
    Warming { completed: u8 },
    Ready,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WarmUp {
    state: WarmUpState,
}

impl Default for WarmUp {
    fn default() -> Self {
        Self::new()
    }
}

impl WarmUp {
    pub const ITERATIONS: u8 = 20;
    pub const INTERVAL_MS: u32 = 1000;

    pub const fn new() -> Self {
        Self {
            state: WarmUpState::NotStarted,
        }
    }

    pub fn state(&self) -> WarmUpState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == WarmUpState::Ready
    }

    /// Advances by one step and returns the new state.
    ///
    /// The first step sends `init_measurement`. Each following step reads one
    /// measurement, discards it, then waits [`Self::INTERVAL_MS`]. After
    /// [`Self::ITERATIONS`] reads the state is `Ready` and further steps do
    /// nothing. On a bus error the state is left unchanged.
    pub fn step<I2C: I2c, D: DelayNs>(
        &mut self,
        sensor: &mut SGP30<I2C, D>,
    ) -> Result<WarmUpState, Sgp30Error<I2C::Error>> {
        self.state = match self.state {
            WarmUpState::NotStarted => {
                info!("sgp30 warm-up started");
                sensor.init_measurement()?;
                WarmUpState::Warming { completed: 0 }
            }
            WarmUpState::Warming { completed } => {
                let measurement = sensor.read_measurement()?;
                let completed = completed + 1;
                debug!(
                    "warm-up read {}/{}: {:?}",
                    completed,
                    Self::ITERATIONS,
                    measurement
                );
                sensor.pause_ms(Self::INTERVAL_MS);

                if completed >= Self::ITERATIONS {
                    info!("sgp30 ready");
                    WarmUpState::Ready
                } else {
                    WarmUpState::Warming { completed }
                }
            }
            WarmUpState::Ready => WarmUpState::Ready,
        };

        Ok(self.state)
    }
}
