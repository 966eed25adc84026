use crate::{
    BASE_ADDRESS, Ds2482, Ds2482Error, Ds2482Result, Fault,
    traits::{Addressing, Interact},
};
use bitfield_struct::bitfield;
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
};
use onewire_core::OneWireStatus;

pub(crate) const DEVICE_RESET_CMD: u8 = 0xf0; // Reset the device
pub(crate) const SET_READ_PTR_CMD: u8 = 0xe1; // Set the read pointer
pub(crate) const WRITE_CONFIG_CMD: u8 = 0xd2; // Write the configuration register

pub(crate) const STATUS_PTR: u8 = 0xf0; // Status register
pub(crate) const DATA_PTR: u8 = 0xe1; // Read data register
pub(crate) const CONFIG_PTR: u8 = 0xc3; // Configuration register

/// Inter-poll delay of the busy-wait loops.
pub(crate) const POLL_DELAY_US: u32 = 20;

/// Status register of the DS2482.
///
/// The read-only Status register is the general means for the bridge to report
/// bit-type data from the 1-Wire side, 1-Wire busy status and its own reset
/// status to the host. All 1-Wire communication commands and the Device Reset
/// command position the read pointer at the Status register; a fresh snapshot
/// is produced on every read and nothing is persisted.
#[bitfield(u8)]
pub struct DeviceStatus {
    /// 1WB: the bridge is still executing a 1-Wire command.
    pub(crate) onewire_busy: bool,
    /// PPD: a presence pulse was detected during the last 1-Wire reset.
    pub(crate) presence_pulse_detect: bool,
    /// SD: the line was sampled low at tSI of the last presence-detect cycle,
    /// indicating a short (or an interrupting DS1994/DS2404).
    pub(crate) short_detect: bool,
    /// LL: the logic state of the 1-Wire line, sampled on every status read.
    pub logic_level: bool,
    /// RST: the bridge has performed an internal reset cycle and is waiting for
    /// a configuration write.
    pub device_reset: bool,
    /// SBR: the line state sampled during the last single-bit command, or the
    /// first bit of a triplet.
    pub(crate) single_bit_result: bool,
    /// TSB: the line state sampled during the second bit of a triplet.
    pub(crate) triplet_second_bit: bool,
    /// DIR: the branch direction the last triplet command actually drove.
    pub(crate) branch_dir_taken: bool,
}

impl OneWireStatus for DeviceStatus {
    fn busy(&self) -> bool {
        self.onewire_busy()
    }

    fn presence(&self) -> bool {
        self.presence_pulse_detect()
    }

    fn shortcircuit(&self) -> bool {
        self.short_detect()
    }

    fn single_bit(&self) -> bool {
        self.single_bit_result()
    }

    fn logic_level(&self) -> Option<bool> {
        Some(self.logic_level())
    }

    fn direction(&self) -> Option<bool> {
        Some(self.branch_dir_taken())
    }
}

impl Addressing for DeviceStatus {
    const WRITE_CMD: u8 = 0x00; // read-only
    const READ_PTR: u8 = STATUS_PTR;
}

impl Interact for DeviceStatus {
    fn read<I: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        dev: &mut Ds2482<I, D>,
    ) -> Result<(), Ds2482Error<I::Error>> {
        let mut buf = [0u8; 1];
        dev.i2c
            .write_read(dev.addr, &[SET_READ_PTR_CMD, Self::READ_PTR], &mut buf)?;
        *self = Self::from_bits(buf[0]);
        Ok(())
    }

    fn write<I: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        _dev: &mut Ds2482<I, D>,
    ) -> Result<(), Ds2482Error<I::Error>> {
        Ok(())
    }
}

/// Configuration register of the DS2482.
///
/// Three 1-Wire features are selected through the low nibble: active pullup
/// (APU), strong pullup (SPU) and 1-Wire speed (1WS). APU and 1WS maintain
/// their states; SPU returns to inactive as soon as the strong pullup has
/// ended. After a device reset the register reads 0x00.
///
/// On the wire a configuration write carries the low nibble together with its
/// one's complement in the high nibble; a read-back always returns the low
/// nibble with the high nibble cleared. [`Interact::write`] handles the
/// framing and verifies the read-back, recording [`Fault::ConfigMismatch`] on
/// disagreement.
#[bitfield(u8)]
pub struct DeviceConfiguration {
    /// APU: drive the line from low to high with a low-impedance transistor
    /// instead of the passive pullup resistor. Recommended for multi-device
    /// buses.
    pub active_pullup: bool,
    _reserved: bool,
    /// SPU: arm the strong pullup for the next write-byte or single-bit
    /// command, to power parasitic devices through conversions. Must be clear
    /// during a 1-Wire reset or the presence pulse may be misread and device
    /// power ratings exceeded.
    pub strong_pullup: bool,
    /// 1WS: generate overdrive instead of standard 1-Wire timing.
    pub onewire_speed: bool,
    #[bits(4)]
    _complement: u8,
}

impl Addressing for DeviceConfiguration {
    const WRITE_CMD: u8 = WRITE_CONFIG_CMD;
    const READ_PTR: u8 = CONFIG_PTR;
}

impl Interact for DeviceConfiguration {
    fn read<I: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        dev: &mut Ds2482<I, D>,
    ) -> Result<(), Ds2482Error<I::Error>> {
        let mut buf = [0u8; 1];
        dev.i2c
            .write_read(dev.addr, &[SET_READ_PTR_CMD, Self::READ_PTR], &mut buf)?;
        *self = Self::from_bits(buf[0]);
        Ok(())
    }

    fn write<I: I2c<SevenBitAddress>, D: DelayNs>(
        &mut self,
        dev: &mut Ds2482<I, D>,
    ) -> Result<(), Ds2482Error<I::Error>> {
        dev.wait_on_busy()?;
        let low = self.into_bits() & 0x0f;
        let mut buf = [0u8; 1];
        dev.i2c.write_read(
            dev.addr,
            &[Self::WRITE_CMD, low | ((!low & 0x0f) << 4)],
            &mut buf,
        )?;
        if buf[0] & 0x0f != low {
            dev.note_fault(Fault::ConfigMismatch);
        }
        *self = Self::from_bits(buf[0] & 0x0f);
        Ok(())
    }
}

impl<I: I2c<SevenBitAddress>, D: DelayNs> Ds2482<I, D> {
    /// Probes whether the bridge chip acknowledges its address.
    ///
    /// Opens and immediately closes a transaction; a liveness check, not a
    /// protocol step.
    pub fn check_presence(&mut self) -> bool {
        self.i2c.write(self.addr, &[]).is_ok()
    }

    /// Performs a global reset of the bridge state machine logic, terminating
    /// any 1-Wire communication in progress.
    ///
    /// # Errors
    /// [`Ds2482Error::RetriesExceeded`] if the bridge never reports the reset
    /// complete; the bridge itself being dead is a hard error, unlike a slow
    /// 1-Wire line.
    pub fn device_reset(&mut self) -> Ds2482Result<DeviceStatus, I::Error> {
        self.i2c.write(self.addr, &[DEVICE_RESET_CMD])?;
        let mut tries = 0;
        loop {
            let mut status = DeviceStatus::default();
            status.read(self)?;
            if status.device_reset() {
                return Ok(status);
            }
            if tries >= self.retries {
                return Err(Ds2482Error::RetriesExceeded);
            }
            tries += 1;
            self.delay.delay_us(POLL_DELAY_US);
        }
    }

    /// Positions the read pointer at the given register code, overriding
    /// wherever the previous command left it.
    pub fn set_read_pointer(&mut self, pointer: u8) -> Ds2482Result<(), I::Error> {
        self.i2c.write(self.addr, &[SET_READ_PTR_CMD, pointer])?;
        Ok(())
    }

    /// Reads the status register.
    pub fn read_status(&mut self) -> Ds2482Result<DeviceStatus, I::Error> {
        let mut status = DeviceStatus::default();
        status.read(self)?;
        Ok(status)
    }

    /// Reads the data register, which holds the byte fetched by the last
    /// 1-Wire read-byte command.
    pub fn read_data(&mut self) -> Ds2482Result<u8, I::Error> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.addr, &[SET_READ_PTR_CMD, DATA_PTR], &mut buf)?;
        Ok(buf[0])
    }

    /// Reads the configuration register.
    pub fn read_config(&mut self) -> Ds2482Result<DeviceConfiguration, I::Error> {
        let mut config = DeviceConfiguration::default();
        config.read(self)?;
        Ok(config)
    }

    /// Polls the status register until the 1-Wire busy flag clears or the
    /// retry budget runs out.
    ///
    /// On exhaustion the last-observed status is still returned and
    /// [`Fault::Timeout`] is recorded, so a lost 1-Wire device degrades to a
    /// stale status instead of hanging the host.
    pub fn wait_on_busy(&mut self) -> Ds2482Result<DeviceStatus, I::Error> {
        self.i2c
            .write(self.addr, &[SET_READ_PTR_CMD, STATUS_PTR])?;
        let mut tries = 0;
        loop {
            let mut buf = [0u8; 1];
            self.i2c.read(self.addr, &mut buf)?;
            let status = DeviceStatus::from_bits(buf[0]);
            if !status.onewire_busy() {
                return Ok(status);
            }
            if tries >= self.retries {
                self.note_fault(Fault::Timeout);
                return Ok(status);
            }
            tries += 1;
            self.delay.delay_us(POLL_DELAY_US);
        }
    }

    /// Writes the configuration register, with complement framing and
    /// read-back verification (see [`DeviceConfiguration`]).
    ///
    /// A verify mismatch records [`Fault::ConfigMismatch`] but does not fail
    /// the call; subsequent operations may still proceed, leaving diagnosis to
    /// [`last_fault`](Ds2482::last_fault).
    pub fn write_config(&mut self, config: DeviceConfiguration) -> Ds2482Result<(), I::Error> {
        let mut config = config;
        config.write(self)
    }

    /// Arms the strong pullup for the next single-bit or write-byte command,
    /// to power parasitic devices through the operation that follows.
    ///
    /// The bit auto-clears when the strong pullup ends; set it immediately
    /// before the command that needs it.
    pub fn set_strong_pullup(&mut self) -> Ds2482Result<(), I::Error> {
        let config = self.read_config()?;
        self.write_config(config.with_strong_pullup(true))
    }

    /// Disarms the strong pullup, in case no transaction consumed it.
    ///
    /// Required before a 1-Wire reset: an armed strong pullup corrupts
    /// presence-detect sampling and can exceed device power ratings.
    pub fn clear_strong_pullup(&mut self) -> Ds2482Result<(), I::Error> {
        let config = self.read_config()?;
        self.write_config(config.with_strong_pullup(false))
    }
}

/// Builder for creating a [`Ds2482`] instance with custom configuration.
pub struct Ds2482Builder {
    address_pins: u8,
    retries: u16,
    config: DeviceConfiguration,
}

impl Default for Ds2482Builder {
    fn default() -> Self {
        Ds2482Builder {
            address_pins: 0,
            retries: 1000,
            config: DeviceConfiguration::new(),
        }
    }
}

impl Ds2482Builder {
    /// Selects which of up to four bridges on the bus to address, by the
    /// 2-bit value strapped on the AD1/AD0 pins.
    pub fn with_address_pins(mut self, pins: u8) -> Self {
        self.address_pins = pins & 0x03;
        self
    }

    /// Sets the busy-wait poll budget (see [`Ds2482::with_retries`]).
    pub fn with_retries(mut self, retries: u16) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the initial device configuration, written during
    /// [`build`](Ds2482Builder::build).
    pub fn with_config(mut self, config: DeviceConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Builds a `Ds2482`: resets the bridge and writes the initial
    /// configuration.
    pub fn build<I: I2c<SevenBitAddress>, D: DelayNs>(
        self,
        i2c: I,
        delay: D,
    ) -> Ds2482Result<Ds2482<I, D>, I::Error> {
        let mut dev = Ds2482 {
            i2c,
            addr: BASE_ADDRESS | self.address_pins,
            delay,
            retries: self.retries,
            fault: None,
        };
        dev.device_reset()?;
        dev.write_config(self.config)?;
        Ok(dev)
    }
}
