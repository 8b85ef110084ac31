//! The character device front-end: a fixed buffer retaining the last text written, the copies
//! between that buffer and a caller's memory, and the file-operation surface on top.

use core::cmp;

use log::{debug, info};

use crate::config::ReadExtent;
use crate::error::CopyFault;

/// Size of the retained message buffer. A write keeps at most `BUFFER_CAPACITY - 1` bytes so
/// the stored text is always NUL-terminated.
pub const BUFFER_CAPACITY: usize = 256;

/// A caller-owned source of bytes for a write.
pub trait UserReader {
    /// Number of bytes the caller offers.
    fn len(&self) -> usize;

    /// Copy the first `dst.len()` bytes of the caller's buffer into `dst`.
    fn copy_to(&self, dst: &mut [u8]) -> Result<(), CopyFault>;
}

/// A caller-owned destination for a read.
pub trait UserWriter {
    /// Number of bytes the caller can take.
    fn len(&self) -> usize;

    /// Copy `src` into the start of the caller's buffer.
    fn copy_from(&mut self, src: &[u8]) -> Result<(), CopyFault>;
}

impl UserReader for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_to(&self, dst: &mut [u8]) -> Result<(), CopyFault> {
        let src = self.get(..dst.len()).ok_or(CopyFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl UserWriter for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_from(&mut self, src: &[u8]) -> Result<(), CopyFault> {
        let dst = self.get_mut(..src.len()).ok_or(CopyFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

/// The last text written to a device, zero-filled past its end.
pub struct MessageBuffer {
    bytes: [u8; BUFFER_CAPACITY],
    len: usize,
}

impl Default for MessageBuffer {
    fn default() -> Self {
        MessageBuffer::new()
    }
}

impl MessageBuffer {
    pub const fn new() -> Self {
        MessageBuffer {
            bytes: [0; BUFFER_CAPACITY],
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.bytes = [0; BUFFER_CAPACITY];
        self.len = 0;
    }

    /// Replace the content with up to `BUFFER_CAPACITY - 1` bytes from `src` and return how
    /// many were kept. On a fault the buffer is left empty.
    pub fn fill<R>(&mut self, src: &R) -> Result<usize, CopyFault>
    where
        R: UserReader + ?Sized,
    {
        self.clear();
        let len = cmp::min(src.len(), BUFFER_CAPACITY - 1);
        if len < src.len() {
            info!("input too large, truncating to {} bytes", len);
        }
        if let Err(e) = src.copy_to(&mut self.bytes[..len]) {
            self.clear();
            return Err(e);
        }
        self.len = len;
        Ok(len)
    }

    /// Bytes kept by the last `fill`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The stored bytes up to the first NUL, which is what gets drawn.
    pub fn text(&self) -> &[u8] {
        let bytes = self.as_bytes();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        &bytes[..end]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy from `*offset` into `dst` and move `*offset` past what was copied. Returns 0 once
    /// `*offset` reaches the end chosen by `extent`.
    pub fn read_at<W>(
        &self,
        dst: &mut W,
        offset: &mut usize,
        extent: ReadExtent,
    ) -> Result<usize, CopyFault>
    where
        W: UserWriter + ?Sized,
    {
        let end = match extent {
            ReadExtent::Message => self.len,
            ReadExtent::Capacity => BUFFER_CAPACITY,
        };
        let to_read = cmp::min(dst.len(), end.saturating_sub(*offset));
        if to_read == 0 {
            debug!("read at {}: end of file", *offset);
            return Ok(0);
        }
        dst.copy_from(&self.bytes[*offset..*offset + to_read])?;
        *offset += to_read;
        Ok(to_read)
    }
}

/// File operations of a text device node.
pub trait CharDevice {
    fn open(&mut self);

    fn release(&mut self);

    /// Copy retained text into `dst` starting at `*offset`, advancing it.
    fn read<W>(&self, dst: &mut W, offset: &mut usize) -> Result<usize, CopyFault>
    where
        W: UserWriter + ?Sized;

    /// Replace the retained text with `src` and redraw it.
    fn write<R>(&mut self, src: &R) -> Result<usize, CopyFault>
    where
        R: UserReader + ?Sized;

    /// Open the device and get a handle that tracks its own read position.
    fn open_file(&mut self) -> OpenFile<'_, Self>
    where
        Self: Sized,
    {
        OpenFile::new(self)
    }
}

/// An open device node. Closing happens on drop.
pub struct OpenFile<'d, D>
where
    D: CharDevice,
{
    dev: &'d mut D,
    pos: usize,
}

impl<'d, D> OpenFile<'d, D>
where
    D: CharDevice,
{
    pub fn new(dev: &'d mut D) -> Self {
        dev.open();
        OpenFile { dev, pos: 0 }
    }

    pub fn read<W>(&mut self, dst: &mut W) -> Result<usize, CopyFault>
    where
        W: UserWriter + ?Sized,
    {
        self.dev.read(dst, &mut self.pos)
    }

    /// Writes ignore the file position: every write replaces the whole message.
    pub fn write<R>(&mut self, src: &R) -> Result<usize, CopyFault>
    where
        R: UserReader + ?Sized,
    {
        self.dev.write(src)
    }

    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'d, D> Drop for OpenFile<'d, D>
where
    D: CharDevice,
{
    fn drop(&mut self) {
        self.dev.release();
    }
}

#[cfg(test)]
pub mod test_user {
    //! Caller buffers that fault on every copy.

    use super::{UserReader, UserWriter};
    use crate::error::CopyFault;

    pub struct FaultyUser(pub usize);

    impl UserReader for FaultyUser {
        fn len(&self) -> usize {
            self.0
        }

        fn copy_to(&self, _dst: &mut [u8]) -> Result<(), CopyFault> {
            Err(CopyFault)
        }
    }

    impl UserWriter for FaultyUser {
        fn len(&self) -> usize {
            self.0
        }

        fn copy_from(&mut self, _src: &[u8]) -> Result<(), CopyFault> {
            Err(CopyFault)
        }
    }
}
