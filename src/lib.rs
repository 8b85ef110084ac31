//! Text console driver for small monochrome displays: the Solomon Systech SSD1306 OLED on I2C and
//! the Nokia 5110 (PCD8544) LCD on SPI, each exposed as a character device that retains and shows
//! the last message written to it.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate core;

extern crate embedded_hal as hal;
extern crate itertools;
extern crate log;

pub mod chardev;
pub mod command;
pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod font;
pub mod interface;
pub mod registry;
pub mod session;

// Re-exports for primary API.
pub use chardev::{CharDevice, OpenFile, UserReader, UserWriter, BUFFER_CAPACITY};
pub use config::{Config, GlyphPolicy, ReadExtent, WriteCount};
pub use controller::{Controller, Pcd8544, Ssd1306};
pub use device::{Nokia5110SpiDevice, Ssd1306I2cDevice, TextDevice};
pub use error::{AttachError, CopyFault, DisplayError, HostError, TransportError};
pub use interface::i2c::I2cInterface;
pub use interface::spi::SpiInterface;
pub use registry::{DeviceNames, Host, Resource};
pub use session::Session;
