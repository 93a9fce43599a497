//! MRF24J40 transceiver driver
//!
//! [`Mrf24j40`] owns the register interface, the configuration, the payload
//! buffers and the MAC sequence number. A typical session:
//!
//! 1. [`initialize`](Mrf24j40::initialize) the chip
//! 2. Adjust PAN ID, address and channel as needed
//! 3. [`start_packet`](Mrf24j40::start_packet), write the payload, then
//!    [`send_packet`](Mrf24j40::send_packet)
//! 4. Call [`receive_packet`](Mrf24j40::receive_packet) from the main loop
//!    and drain [`reader`](Mrf24j40::reader) whenever it returns `true`
//!
//! All operations block. Sending does not wait for the transmission to
//! finish and does not report acknowledgement status.

use embedded_hal::{delay::DelayNs, spi::SpiDevice};

use crate::buffer::{PacketReader, PacketWriter};
use crate::config::{Config, Variant};
use crate::device::{Device, RegisterAddress};
use crate::frame::{self, MacHeader, MHR_SIZE};
use crate::interrupt::InterruptControl;
use crate::registers::*;
use crate::Error;

/// Time the RF circuitry needs to calibrate after an RF state machine reset
const CHANNEL_SETTLE_MS: u32 = 1;
/// Interval between INTSTAT polls while waiting for RXIF to clear
const RX_FLUSH_POLL_INTERVAL_US: u32 = 10;

/// MRF24J40 driver.
///
/// # Type Parameters
/// * `SPI` - SPI device the chip is attached to
/// * `D` - Delay provider, used for the channel change settle time and for
///   pacing the receive flush wait
/// * `I` - Interrupt masking used around the RX FIFO copy
pub struct Mrf24j40<SPI, D, I> {
    device: Device<SPI>,
    delay: D,
    interrupts: I,
    config: Config,
    sequence_number: u8,
    tx: PacketWriter,
    rx: PacketReader,
}

impl<SPI, D, I> Mrf24j40<SPI, D, I> {
    /// Creates a driver with the default configuration for a module variant.
    ///
    /// Nothing is sent to the chip until [`initialize`](Self::initialize).
    pub fn new(spi: SPI, delay: D, interrupts: I, variant: Variant) -> Self {
        Self::with_config(spi, delay, interrupts, Config::for_variant(variant))
    }

    /// Creates a driver with an explicit configuration.
    ///
    /// A channel outside 11 to 26 is replaced by channel 11.
    pub fn with_config(spi: SPI, delay: D, interrupts: I, mut config: Config) -> Self {
        if RfControl0::for_channel(config.channel).is_none() {
            warn!("channel {} out of range, using {}", config.channel, FIRST_CHANNEL);
            config.channel = FIRST_CHANNEL;
        }

        Self {
            device: Device::new(spi),
            delay,
            interrupts,
            config,
            sequence_number: 0,
            tx: PacketWriter::new(),
            rx: PacketReader::new(),
        }
    }

    /// Releases the SPI device, delay provider and interrupt control.
    pub fn release(self) -> (SPI, D, I) {
        (self.device.release(), self.delay, self.interrupts)
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// PAN identifier
    pub fn pan_id(&self) -> u16 {
        self.config.pan_id
    }

    /// Short address used as the source of outgoing frames
    pub fn address(&self) -> u16 {
        self.config.address
    }

    /// Current IEEE 802.15.4 channel
    pub fn channel(&self) -> u8 {
        self.config.channel
    }

    /// Whether coordinator mode is enabled
    pub fn is_coordinator(&self) -> bool {
        self.config.coordinator
    }

    /// Whether the external PA/LNA is driven by the chip
    pub fn external_amplifier(&self) -> bool {
        self.config.external_amplifier
    }

    /// Sequence number the next frame will carry
    pub fn sequence_number(&self) -> u8 {
        self.sequence_number
    }

    /// Starts a new outgoing packet, discarding any unsent payload.
    pub fn start_packet(&mut self) -> &mut PacketWriter {
        self.tx.clear();
        &mut self.tx
    }

    /// Payload of the packet being composed
    pub fn writer(&mut self) -> &mut PacketWriter {
        &mut self.tx
    }

    /// Payload of the last received packet
    pub fn reader(&mut self) -> &mut PacketReader {
        &mut self.rx
    }

    /// Free space left in the outgoing payload
    pub fn remaining_to_write(&self) -> usize {
        self.tx.remaining()
    }

    /// Unread bytes left in the received payload
    pub fn remaining_to_read(&self) -> usize {
        self.rx.remaining()
    }
}

impl<SPI, D, I> Mrf24j40<SPI, D, I>
where
    SPI: SpiDevice,
    D: DelayNs,
    I: InterruptControl,
{
    /// Programs the recommended analog, RF and baseband settings, then
    /// applies the stored PAN ID and PA/LNA mode. Coordinator mode is
    /// turned off and the radio is tuned to channel 11, whatever was set
    /// before.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn initialize(&mut self) -> Result<(), Error> {
        debug!("initializing MRF24J40");

        self.device
            .write_register(PowerAmplifierControl2::RECOMMENDED)?;
        self.device.write_register(TxStabilization::RECOMMENDED)?;
        self.device.write_register(RfControl0::default())?;
        self.device.write_register(RfControl1::RECOMMENDED)?;
        self.device.write_register(RfControl2::RECOMMENDED)?;
        self.device.write_register(RfControl6::RECOMMENDED)?;
        self.device.write_register(RfControl7::RECOMMENDED)?;
        self.device.write_register(RfControl8::RECOMMENDED)?;
        self.device.write_register(SleepClockControl1::RECOMMENDED)?;
        self.device.write_register(GpioDirection::RECOMMENDED)?;
        self.device.write_register(Gpio::RECOMMENDED)?;
        self.device.write_register(Baseband2::RECOMMENDED)?;
        self.device.write_register(CcaEnergyThreshold::RECOMMENDED)?;
        self.device.write_register(Baseband6::RECOMMENDED)?;

        self.set_pan_id(self.config.pan_id)?;
        self.set_coordinator(false)?;
        self.set_external_amplifier(self.config.external_amplifier)?;
        self.set_channel(FIRST_CHANNEL)
    }

    /// Sets the PAN identifier used for address filtering and in outgoing
    /// frames.
    pub fn set_pan_id(&mut self, pan_id: u16) -> Result<(), Error> {
        let [low, high] = pan_id.to_le_bytes();
        self.config.pan_id = pan_id;
        self.device.write_register(PanIdHigh { value: high })?;
        self.device.write_register(PanIdLow { value: low })?;
        Ok(())
    }

    /// Sets the short address used for address filtering and as the source
    /// of outgoing frames.
    pub fn set_address(&mut self, address: u16) -> Result<(), Error> {
        let [low, high] = address.to_le_bytes();
        self.config.address = address;
        self.device.write_register(ShortAddressHigh { value: high })?;
        self.device.write_register(ShortAddressLow { value: low })?;
        Ok(())
    }

    /// Enables or disables automatic control of an external PA/LNA.
    ///
    /// Only the PA/LNA field of TESTMODE is changed.
    pub fn set_external_amplifier(&mut self, enabled: bool) -> Result<(), Error> {
        self.config.external_amplifier = enabled;
        self.device.modify_register(|reg: &mut TestMode| {
            reg.flags.set(TestModeFlags::PA_LNA, enabled)
        })?;
        Ok(())
    }

    /// Enables or disables coordinator mode.
    ///
    /// Only the coordinator bits of RXMCR are changed.
    pub fn set_coordinator(&mut self, enabled: bool) -> Result<(), Error> {
        self.config.coordinator = enabled;
        self.device.modify_register(|reg: &mut RxMacControl| {
            reg.flags.set(RxMacControl::COORDINATOR_MODE, enabled)
        })?;
        Ok(())
    }

    /// Switches to an IEEE 802.15.4 channel and waits for the RF circuitry
    /// to settle.
    ///
    /// Channels outside 11 to 26 are ignored: no register is written and
    /// `Ok(())` is returned. Use [`channel`](Self::channel) to see which
    /// channel is active.
    pub fn set_channel(&mut self, channel: u8) -> Result<(), Error> {
        let Some(rf_control) = RfControl0::for_channel(channel) else {
            warn!("ignoring out of range channel {}", channel);
            return Ok(());
        };

        self.device.write_register(rf_control)?;
        self.device.write_register(RfModeControl {
            flags: RfControlFlags::RF_RESET,
        })?;
        self.device.write_register(RfModeControl::default())?;
        self.delay.delay_ms(CHANNEL_SETTLE_MS);

        self.config.channel = channel;
        debug!("channel set to {}", channel);
        Ok(())
    }

    /// Frames the payload written since [`start_packet`](Self::start_packet)
    /// and triggers its transmission to `destination`.
    ///
    /// The payload stays in the buffer, so calling this again resends it
    /// with the next sequence number.
    ///
    /// # Errors
    /// * `Error::EmptyPacket` - Nothing to send. No SPI traffic happens.
    /// * `Error::Bus` - SPI communication failed
    pub fn send_packet(&mut self, destination: u16) -> Result<(), Error> {
        if self.tx.is_empty() {
            return Err(Error::EmptyPacket);
        }

        let header = MacHeader {
            sequence_number: self.sequence_number,
            pan_id: self.config.pan_id,
            destination,
            source: self.config.address,
        };
        self.sequence_number = self.sequence_number.wrapping_add(1);

        let payload = self.tx.as_bytes();
        self.device
            .write_frame_memory(memory::TX_NORMAL_FIFO, &header.to_bytes(payload.len()))?;
        self.device
            .write_frame_memory(memory::TX_NORMAL_FIFO + MHR_SIZE as u16, payload)?;
        self.device.write_register(TxNormalControl {
            flags: TxNormalFlags::TRIGGER,
        })?;

        trace!(
            "sent seq {} with {} bytes to {:#x}",
            header.sequence_number,
            payload.len(),
            destination
        );
        Ok(())
    }

    /// Polls for a received frame.
    ///
    /// Returns `Ok(false)` right away when no frame is pending, leaving the
    /// receive buffer untouched. Otherwise the frame payload replaces the
    /// receive buffer contents and `Ok(true)` is returned once the chip has
    /// cleared its receive flag.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * `Error::Timeout` - RXIF did not clear within
    ///   [`Config::rx_flush_timeout_us`]. The payload is still available.
    pub fn receive_packet(&mut self) -> Result<bool, Error> {
        if !self.rx_pending()? {
            return Ok(false);
        }

        self.interrupts.disable();
        let copied = self.copy_rx_fifo();
        let resumed = self.resume_reception();
        self.interrupts.enable();
        copied?;
        resumed?;

        trace!("received {} bytes", self.rx.len());
        self.wait_rx_flag_clear()?;
        Ok(true)
    }

    fn rx_pending(&mut self) -> Result<bool, Error> {
        let status: InterruptStatus = self.device.read_register()?;
        Ok(status.flags.contains(InterruptFlags::RX))
    }

    /// Stops the decoder and copies the payload of the frame in the RX FIFO.
    fn copy_rx_fifo(&mut self) -> Result<(), Error> {
        self.device.write_register(Baseband1 {
            flags: Baseband1Flags::RX_DECODE_INVERT,
        })?;

        let frame_len = self.device.read(RegisterAddress::Long(memory::RX_FIFO))?;
        let device = &mut self.device;
        self.rx.refill(frame::payload_len(frame_len), |buf| {
            device.read_frame_memory(memory::RX_FIFO + 1 + MHR_SIZE as u16, buf)
        })?;
        Ok(())
    }

    /// Flushes the RX FIFO and restarts the decoder.
    fn resume_reception(&mut self) -> Result<(), Error> {
        self.device.write_register(RxFlush {
            flags: RxFlushFlags::FLUSH,
        })?;
        self.device.write_register(Baseband1::default())?;
        Ok(())
    }

    fn wait_rx_flag_clear(&mut self) -> Result<(), Error> {
        let mut waited_us: u32 = 0;
        while self.rx_pending()? {
            if let Some(timeout_us) = self.config.rx_flush_timeout_us {
                if waited_us >= timeout_us {
                    warn!("RXIF still set after {} us", waited_us);
                    return Err(Error::Timeout);
                }
            }
            self.delay.delay_us(RX_FLUSH_POLL_INTERVAL_US);
            waited_us = waited_us.saturating_add(RX_FLUSH_POLL_INTERVAL_US);
        }
        Ok(())
    }
}
