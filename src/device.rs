//! A complete text device: a display session, the message it retains and its registration with
//! the host, brought up together by `attach` and torn down together by `detach`.

use core::str;

use hal::blocking::delay::DelayMs;
use log::{error, info, warn};

use crate::chardev::{CharDevice, MessageBuffer, UserReader, UserWriter};
use crate::config::{Config, ReadExtent, WriteCount};
use crate::controller::{Controller, Pcd8544, Ssd1306};
use crate::error::{AttachError, CopyFault};
use crate::interface::i2c::I2cInterface;
use crate::interface::spi::SpiInterface;
use crate::interface::DisplayInterface;
use crate::registry::{DeviceNames, Host, Registration};
use crate::session::Session;

/// An SSD1306 OLED on I2C.
pub type Ssd1306I2cDevice<I2C, H> = TextDevice<I2cInterface<I2C>, Ssd1306, H>;

/// A Nokia 5110 LCD on 4-wire SPI.
pub type Nokia5110SpiDevice<SPI, DC, RST, H> = TextDevice<SpiInterface<SPI, DC, RST>, Pcd8544, H>;

pub struct TextDevice<DI, C, H>
where
    DI: DisplayInterface,
    C: Controller,
    H: Host,
{
    session: Session<DI, C>,
    message: MessageBuffer,
    write_count: WriteCount,
    read_extent: ReadExtent,
    farewell: Option<&'static str>,
    farewell_delay_ms: u16,
    registration: Registration<H>,
}

impl<DI, C, H> TextDevice<DI, C, H>
where
    DI: DisplayInterface,
    C: Controller,
    H: Host,
{
    /// Reset and initialize the controller, show the configured greeting, then register the
    /// device with `host`.
    ///
    /// Only a failed reset or a refused registration makes this fail. Init commands, the first
    /// clear and the greeting are best-effort and only logged. If registration is refused, the
    /// resources already acquired are released and the panel is powered off again.
    pub fn attach(
        mut iface: DI,
        controller: C,
        config: Config,
        host: H,
        delay: &mut dyn DelayMs<u16>,
    ) -> Result<Self, AttachError> {
        iface.hard_reset(delay).map_err(|e| {
            error!("{}: reset failed: {}", C::NAME, e);
            e
        })?;

        let mut session = Session::new(iface, controller, config.glyph_policy);
        if let Err(e) = session.initialize(delay, config.contrast) {
            warn!("{}: display initialization incomplete: {}", C::NAME, e);
        }
        if let Some(text) = config.greeting {
            if let Err(e) = session.print_string(text.as_bytes()) {
                warn!("{}: cannot show greeting: {}", C::NAME, e);
            }
        }

        let names = config.names.unwrap_or(C::NAMES);
        let registration = match Registration::register(host, names) {
            Ok(reg) => reg,
            Err(e) => {
                if let Err(e) = session.power_off() {
                    warn!("{}: cannot power off: {}", C::NAME, e);
                }
                return Err(e);
            }
        };

        info!("{}: attached as {}", C::NAME, names.node);
        Ok(TextDevice {
            session,
            message: MessageBuffer::new(),
            write_count: config.write_count,
            read_extent: config.read_extent,
            farewell: config.farewell,
            farewell_delay_ms: config.farewell_delay_ms,
            registration,
        })
    }

    /// Show the farewell text, blank and power off the panel, then give up the registration.
    /// Display failures along the way are logged; teardown always completes. Returns the
    /// interface so the bus and pins can be reused.
    pub fn detach(self, delay: &mut dyn DelayMs<u16>) -> DI {
        let TextDevice {
            mut session,
            farewell,
            farewell_delay_ms,
            registration,
            ..
        } = self;

        if let Some(text) = farewell {
            match session.print_string(text.as_bytes()) {
                Ok(()) => delay.delay_ms(farewell_delay_ms),
                Err(e) => warn!("{}: cannot show farewell: {}", C::NAME, e),
            }
        }
        if let Err(e) = session.clear() {
            warn!("{}: cannot clear: {}", C::NAME, e);
        }
        if let Err(e) = session.power_off() {
            warn!("{}: cannot power off: {}", C::NAME, e);
        }

        let node = registration.names().node;
        drop(registration);
        info!("{}: detached {}", C::NAME, node);
        session.release()
    }

    pub fn names(&self) -> &DeviceNames {
        self.registration.names()
    }

    /// The bytes retained by the last write.
    pub fn message(&self) -> &[u8] {
        self.message.as_bytes()
    }

    pub fn session(&self) -> &Session<DI, C> {
        &self.session
    }

    /// Direct access to the panel, for contrast and inversion or drawing outside of `write`.
    pub fn session_mut(&mut self) -> &mut Session<DI, C> {
        &mut self.session
    }
}

impl<DI, C, H> CharDevice for TextDevice<DI, C, H>
where
    DI: DisplayInterface,
    C: Controller,
    H: Host,
{
    fn open(&mut self) {
        info!("{}: device opened", self.names().node);
    }

    fn release(&mut self) {
        info!("{}: device closed", self.names().node);
    }

    fn read<W>(&self, dst: &mut W, offset: &mut usize) -> Result<usize, CopyFault>
    where
        W: UserWriter + ?Sized,
    {
        self.message
            .read_at(dst, offset, self.read_extent)
            .map_err(|e| {
                error!("{}: failed to send data to user", self.names().node);
                e
            })
    }

    /// Retain `src` (truncated to 255 bytes) and draw it. A rendering failure is logged and does
    /// not fail the write; the text stays retained either way.
    fn write<R>(&mut self, src: &R) -> Result<usize, CopyFault>
    where
        R: UserReader + ?Sized,
    {
        let requested = src.len();
        let accepted = match self.message.fill(src) {
            Ok(n) => n,
            Err(e) => {
                error!("{}: failed to get data from user", self.names().node);
                return Err(e);
            }
        };
        info!(
            "{}: received {}",
            self.registration.names().node,
            str::from_utf8(self.message.text()).unwrap_or("<binary>")
        );

        if let Err(e) = self.session.print_string(self.message.text()) {
            warn!("{}: cannot render message: {}", C::NAME, e);
        }

        Ok(match self.write_count {
            WriteCount::Accepted => accepted,
            WriteCount::Requested => requested,
        })
    }
}

impl<I2C, H> Ssd1306I2cDevice<I2C, H>
where
    I2C: hal::blocking::i2c::Write,
    H: Host,
{
    /// Attach an SSD1306 at I2C address `address` (usually
    /// [`DEFAULT_ADDRESS`](crate::interface::i2c::DEFAULT_ADDRESS)).
    pub fn attach_i2c(
        i2c: I2C,
        address: u8,
        config: Config,
        host: H,
        delay: &mut dyn DelayMs<u16>,
    ) -> Result<Self, AttachError> {
        Self::attach(I2cInterface::new(i2c, address), Ssd1306, config, host, delay)
    }
}

impl<SPI, DC, RST, H> Nokia5110SpiDevice<SPI, DC, RST, H>
where
    SPI: hal::blocking::spi::Write<u8>,
    DC: hal::digital::v2::OutputPin,
    RST: hal::digital::v2::OutputPin,
    H: Host,
{
    /// Attach a Nokia 5110 on `spi` with its D/C and RST lines.
    pub fn attach_spi(
        spi: SPI,
        dc: DC,
        rst: RST,
        config: Config,
        host: H,
        delay: &mut dyn DelayMs<u16>,
    ) -> Result<Self, AttachError> {
        Self::attach(SpiInterface::new(spi, dc, rst), Pcd8544, config, host, delay)
    }
}
