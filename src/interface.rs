//! The byte-level transport between the driver and a display controller. Every controller
//! supported here distinguishes command bytes from data bytes; how that distinction travels on
//! the wire is up to the interface.

use hal::blocking::delay::DelayMs;

use crate::error::TransportError;

/// Whether a byte is a controller command or display RAM data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteKind {
    Command,
    Data,
}

pub trait DisplayInterface {
    /// Send one byte tagged with its kind. A failure is reported once and never retried.
    fn send(&mut self, kind: ByteKind, byte: u8) -> Result<(), TransportError>;

    /// Pulse the controller's reset line, if the interface has one.
    fn hard_reset(&mut self, _delay: &mut dyn DelayMs<u16>) -> Result<(), TransportError> {
        Ok(())
    }

    fn send_command(&mut self, cmd: u8) -> Result<(), TransportError> {
        self.send(ByteKind::Command, cmd)
    }

    fn send_data(&mut self, data: u8) -> Result<(), TransportError> {
        self.send(ByteKind::Data, data)
    }
}

pub mod i2c {
    //! The I2C interface prefixes every byte with a control byte: `0x00` announces a command,
    //! `0x40` announces display RAM data (Co = 0, D/C# selects the kind).

    use log::error;

    use super::{ByteKind, DisplayInterface};
    use crate::error::TransportError;

    /// The address of an SSD1306 module with its SA0 pin tied low.
    pub const DEFAULT_ADDRESS: u8 = 0x3C;

    const CONTROL_COMMAND: u8 = 0x00;
    const CONTROL_DATA: u8 = 0x40;

    pub struct I2cInterface<I2C> {
        /// The I2C master the controller is attached to.
        i2c: I2C,
        /// 7-bit slave address of the controller.
        address: u8,
    }

    impl<I2C> I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write,
    {
        /// Create an interface talking to the controller at `address` on `i2c`.
        pub fn new(i2c: I2C, address: u8) -> Self {
            Self { i2c, address }
        }

        /// Give the bus back.
        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C> DisplayInterface for I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write,
    {
        fn send(&mut self, kind: ByteKind, byte: u8) -> Result<(), TransportError> {
            let control = match kind {
                ByteKind::Command => CONTROL_COMMAND,
                ByteKind::Data => CONTROL_DATA,
            };
            self.i2c.write(self.address, &[control, byte]).map_err(|_| {
                error!("I2C write to {:#04x} failed", self.address);
                TransportError::BusFailure
            })
        }
    }
}

pub mod spi {
    //! The SPI interface is the "4-wire" arrangement: each word on the bus is 8 bits and a
    //! separate D/C GPIO selects between command (low) and data (high) before the byte is
    //! clocked out. The controller's active-low RST line is owned here as well.

    use hal::blocking::delay::DelayMs;
    use log::error;

    use super::{ByteKind, DisplayInterface};
    use crate::error::TransportError;

    /// How long RST is held low, and how long the controller needs after it is released.
    const RESET_PULSE_MS: u16 = 10;

    pub struct SpiInterface<SPI, DC, RST> {
        /// The SPI master device connected to the controller.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of the controller.
        dc: DC,
        /// A GPIO output pin connected to the active-low reset pin of the controller.
        rst: RST,
    }

    impl<SPI, DC, RST> SpiInterface<SPI, DC, RST>
    where
        SPI: hal::blocking::spi::Write<u8>,
        DC: hal::digital::v2::OutputPin,
        RST: hal::digital::v2::OutputPin,
    {
        /// Create a new SPI interface. `spi` is the SPI master device (mode 0, 8 bits per word),
        /// `dc` and `rst` are the GPIO outputs wired to D/C and RST.
        pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
            Self { spi, dc, rst }
        }

        /// Give the bus and both pins back.
        pub fn release(self) -> (SPI, DC, RST) {
            (self.spi, self.dc, self.rst)
        }
    }

    impl<SPI, DC, RST> DisplayInterface for SpiInterface<SPI, DC, RST>
    where
        SPI: hal::blocking::spi::Write<u8>,
        DC: hal::digital::v2::OutputPin,
        RST: hal::digital::v2::OutputPin,
    {
        fn send(&mut self, kind: ByteKind, byte: u8) -> Result<(), TransportError> {
            let dc = match kind {
                ByteKind::Command => self.dc.set_low(),
                ByteKind::Data => self.dc.set_high(),
            };
            dc.map_err(|_| {
                error!("cannot drive D/C line");
                TransportError::BusFailure
            })?;
            self.spi.write(&[byte]).map_err(|_| {
                error!("SPI transfer failed");
                TransportError::BusFailure
            })
        }

        fn hard_reset(&mut self, delay: &mut dyn DelayMs<u16>) -> Result<(), TransportError> {
            let fail = |_| {
                error!("cannot drive RST line");
                TransportError::BusFailure
            };
            self.rst.set_low().map_err(fail)?;
            delay.delay_ms(RESET_PULSE_MS);
            self.rst.set_high().map_err(fail)?;
            delay.delay_ms(RESET_PULSE_MS);
            Ok(())
        }
    }
}
