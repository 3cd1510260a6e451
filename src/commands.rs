/// A sensor command: opcode, settle delay and an `N`-byte response.
///
/// Every response is a run of 3-byte words (2 data bytes and a CRC byte),
/// so `N` must be a multiple of 3. This is checked when the command is
/// executed, at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Command<const N: usize> {
    pub opcode: [u8; 2],
    pub delay_ms: u32,
}

impl<const N: usize> Command<N> {
    pub(crate) const WORD_ALIGNED: () = assert!(N % 3 == 0, "response must be whole words");

    pub const fn response_len(&self) -> usize {
        N
    }

    pub const fn words(&self) -> usize {
        N / 3
    }
}

pub const GET_SERIAL_ID: Command<9> = Command {
    opcode: [0x36, 0x82],
    delay_ms: 100,
};
pub const INIT_AIR_QUALITY: Command<0> = Command {
    opcode: [0x20, 0x03],
    delay_ms: 10,
};
pub const MEASURE_AIR_QUALITY: Command<6> = Command {
    opcode: [0x20, 0x08],
    delay_ms: 120,
};
pub const MEASURE_RAW_SIGNALS: Command<6> = Command {
    opcode: [0x20, 0x50],
    delay_ms: 250,
};
