//! Error types shared by the transport, the display session and the character device front-end.

use core::fmt;

use crate::registry::Resource;

/// A single bus transaction failed. The operation that issued it is abandoned; bytes already
/// sent are not rolled back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportError {
    /// The I2C/SPI transfer or the D/C or RST line reported an error.
    BusFailure,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransportError::BusFailure => f.write_str("bus transaction failed"),
        }
    }
}

/// Errors from drawing operations on a display session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayError {
    Transport(TransportError),
    /// The byte has no glyph in the font (outside 0x20..=0x7E).
    GlyphOutOfRange(u8),
    /// A command argument is outside the range the controller accepts. Nothing was sent.
    InvalidArgument,
}

impl From<TransportError> for DisplayError {
    fn from(e: TransportError) -> Self {
        DisplayError::Transport(e)
    }
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DisplayError::Transport(e) => e.fmt(f),
            DisplayError::GlyphOutOfRange(c) => write!(f, "no glyph for byte {:#04x}", c),
            DisplayError::InvalidArgument => f.write_str("command argument out of range"),
        }
    }
}

/// Copying bytes to or from the caller's buffer failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopyFault;

impl CopyFault {
    /// The negative errno a syscall layer would hand back (`-EFAULT`).
    pub fn to_errno(self) -> isize {
        -14
    }
}

impl fmt::Display for CopyFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("bad address")
    }
}

/// Opaque failure reported by the host while registering a device resource. Carries the host's
/// negative errno.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostError(pub i32);

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "host error {}", self.0)
    }
}

/// Bringing up a device failed. Everything acquired before the failure has been released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachError {
    /// The controller could not be reset.
    Transport(TransportError),
    /// The host refused to register `Resource`.
    Registration(Resource, HostError),
}

impl From<TransportError> for AttachError {
    fn from(e: TransportError) -> Self {
        AttachError::Transport(e)
    }
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AttachError::Transport(e) => write!(f, "reset failed: {}", e),
            AttachError::Registration(r, e) => write!(f, "cannot register {:?}: {}", r, e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}
#[cfg(feature = "std")]
impl std::error::Error for DisplayError {}
#[cfg(feature = "std")]
impl std::error::Error for CopyFault {}
#[cfg(feature = "std")]
impl std::error::Error for AttachError {}
