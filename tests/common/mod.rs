//! Simulated MRF24J40 for driver tests.
//!
//! The chip decodes the short/long SPI addressing frames into an in-memory
//! register file and logs every access, together with interrupt masking and
//! delays, so tests can assert on exact sequences.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{self, ErrorKind, ErrorType, Operation, SpiDevice};
use mrf24j40::frame::{MFR_SIZE, MHR_SIZE};
use mrf24j40::{InterruptControl, RegisterAddress};

pub const INTSTAT: u8 = 0x31;
pub const RXIF: u8 = 0x08;
pub const RX_FIFO: u16 = 0x300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Read(RegisterAddress),
    Write(RegisterAddress, u8),
    InterruptsDisabled,
    InterruptsEnabled,
    Delay(u32),
}

#[derive(Debug)]
pub struct ChipState {
    pub short: [u8; 0x40],
    pub long: [u8; 0x400],
    pub events: Vec<Event>,
    /// INTSTAT reads needed after an RX flush before RXIF clears
    pub rxif_clear_after_reads: usize,
    /// RXIF never clears
    pub rxif_stuck: bool,
    /// Fail every SPI transaction after this many succeeded
    pub fail_after: Option<usize>,
    /// Transactions completed so far
    pub transactions: usize,
    pending_clear: Option<usize>,
}

impl ChipState {
    fn read(&mut self, address: RegisterAddress) -> u8 {
        self.events.push(Event::Read(address));
        match address {
            RegisterAddress::Short(INTSTAT) => {
                let value = self.short[INTSTAT as usize];
                if let Some(left) = self.pending_clear {
                    if left == 0 {
                        if !self.rxif_stuck {
                            self.short[INTSTAT as usize] &= !RXIF;
                        }
                        self.pending_clear = None;
                    } else {
                        self.pending_clear = Some(left - 1);
                    }
                }
                value
            }
            RegisterAddress::Short(reg) => self.short[reg as usize & 0x3F],
            RegisterAddress::Long(reg) => self.long[reg as usize & 0x3FF],
        }
    }

    fn write(&mut self, address: RegisterAddress, value: u8) {
        self.events.push(Event::Write(address, value));
        match address {
            // RXFLUSH is self-clearing and starts the RXIF clear countdown
            RegisterAddress::Short(0x0D) => {
                self.short[0x0D] = value & !0x01;
                if value & 0x01 != 0 {
                    self.pending_clear = Some(self.rxif_clear_after_reads);
                }
            }
            // TXNTRIG is self-clearing
            RegisterAddress::Short(0x1B) => self.short[0x1B] = value & !0x01,
            RegisterAddress::Short(reg) => self.short[reg as usize & 0x3F] = value,
            RegisterAddress::Long(reg) => self.long[reg as usize & 0x3FF] = value,
        }
    }
}

/// Decodes an SPI header into the accessed address and the write bit.
/// Returns `None` until enough header bytes have been clocked in.
fn decode_header(bytes: &[u8]) -> Option<(RegisterAddress, bool, usize)> {
    let first = *bytes.first()?;
    if first & 0x80 == 0 {
        Some((RegisterAddress::Short((first >> 1) & 0x3F), first & 0x01 != 0, 1))
    } else {
        let second = *bytes.get(1)?;
        let reg = (u16::from(first & 0x7F) << 3) | u16::from(second >> 5);
        Some((RegisterAddress::Long(reg), second & 0x10 != 0, 2))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

impl spi::Error for SimError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Clone)]
pub struct SimulatedChip {
    pub state: Rc<RefCell<ChipState>>,
}

impl SimulatedChip {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ChipState {
                short: [0; 0x40],
                long: [0; 0x400],
                events: Vec::new(),
                rxif_clear_after_reads: 0,
                rxif_stuck: false,
                fail_after: None,
                transactions: 0,
                pending_clear: None,
            })),
        }
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay {
            state: self.state.clone(),
        }
    }

    pub fn interrupts(&self) -> SimInterrupts {
        SimInterrupts {
            state: self.state.clone(),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    pub fn writes(&self) -> Vec<(RegisterAddress, u8)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Write(address, value) => Some((address, value)),
                _ => None,
            })
            .collect()
    }

    pub fn short(&self, reg: u8) -> u8 {
        self.state.borrow().short[reg as usize]
    }

    pub fn set_short(&self, reg: u8, value: u8) {
        self.state.borrow_mut().short[reg as usize] = value;
    }

    pub fn long(&self, reg: u16) -> u8 {
        self.state.borrow().long[reg as usize]
    }

    pub fn set_long(&self, reg: u16, value: u8) {
        self.state.borrow_mut().long[reg as usize] = value;
    }

    /// Places a frame carrying `payload` in the RX FIFO and raises RXIF.
    pub fn deliver(&self, payload: &[u8]) {
        let mut state = self.state.borrow_mut();
        state.long[RX_FIFO as usize] = (MHR_SIZE + payload.len() + MFR_SIZE) as u8;
        for (i, byte) in payload.iter().enumerate() {
            state.long[RX_FIFO as usize + 1 + MHR_SIZE + i] = *byte;
        }
        state.short[INTSTAT as usize] |= RXIF;
    }

    pub fn total_delay_ns(&self) -> u64 {
        self.events()
            .into_iter()
            .map(|event| match event {
                Event::Delay(ns) => u64::from(ns),
                _ => 0,
            })
            .sum()
    }
}

impl ErrorType for SimulatedChip {
    type Error = SimError;
}

impl SpiDevice for SimulatedChip {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if let Some(limit) = state.fail_after {
            if state.transactions >= limit {
                return Err(SimError);
            }
        }
        state.transactions += 1;

        let mut clocked_in = Vec::new();
        let mut read_done = false;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => clocked_in.extend_from_slice(bytes),
                Operation::Read(buf) => {
                    let (address, write, _) =
                        decode_header(&clocked_in).expect("read before header");
                    assert!(!write, "read with write bit set");
                    buf[0] = state.read(address);
                    read_done = true;
                }
                _ => panic!("unexpected SPI operation"),
            }
        }

        if !read_done {
            let (address, write, len) = decode_header(&clocked_in).expect("missing header");
            assert!(write, "transaction without read or write");
            assert_eq!(clocked_in.len(), len + 1, "one data byte per access");
            state.write(address, clocked_in[len]);
        }
        Ok(())
    }
}

pub struct SimDelay {
    state: Rc<RefCell<ChipState>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.state.borrow_mut().events.push(Event::Delay(ns));
    }
}

pub struct SimInterrupts {
    state: Rc<RefCell<ChipState>>,
}

impl InterruptControl for SimInterrupts {
    fn disable(&mut self) {
        self.state.borrow_mut().events.push(Event::InterruptsDisabled);
    }

    fn enable(&mut self) {
        self.state.borrow_mut().events.push(Event::InterruptsEnabled);
    }
}
