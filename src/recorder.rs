//! Test double that logs bus traffic and delays in one shared timeline.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write(u8, Vec<u8>),
    Read(u8, usize),
    DelayMs(u32),
    DelayNs(u32),
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Rc<RefCell<Vec<Event>>>,
    responses: Rc<RefCell<VecDeque<Vec<u8>>>>,
}

impl Recorder {
    pub fn with_responses(responses: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            events: Rc::default(),
            responses: Rc::new(RefCell::new(responses.into_iter().collect())),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn total_delay_ms(&self) -> u64 {
        self.events
            .borrow()
            .iter()
            .map(|event| match event {
                Event::DelayMs(ms) => u64::from(*ms),
                Event::DelayNs(ns) => u64::from(*ns) / 1_000_000,
                _ => 0,
            })
            .sum()
    }
}

impl ErrorType for Recorder {
    type Error = ErrorKind;
}

impl I2c for Recorder {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    self.events
                        .borrow_mut()
                        .push(Event::Write(address, bytes.to_vec()));
                }
                Operation::Read(buffer) => {
                    self.events
                        .borrow_mut()
                        .push(Event::Read(address, buffer.len()));
                    let response = self
                        .responses
                        .borrow_mut()
                        .pop_front()
                        .ok_or(ErrorKind::Other)?;
                    if response.len() != buffer.len() {
                        return Err(ErrorKind::Other);
                    }
                    buffer.copy_from_slice(&response);
                }
            }
        }

        Ok(())
    }
}

impl DelayNs for Recorder {
    fn delay_ns(&mut self, ns: u32) {
        self.events.borrow_mut().push(Event::DelayNs(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.events.borrow_mut().push(Event::DelayMs(ms));
    }
}
