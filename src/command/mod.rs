//! Command sets of the supported display controllers. Each command is a small enum value that
//! validates its arguments and encodes to the exact byte sequence the controller expects. All
//! bytes of a command, arguments included, travel as command bytes.

use crate::error::DisplayError;
use crate::interface::DisplayInterface;

// This has to be here in order to be usable by mods declared afterwards.
/// Fill `$buf` with the listed bytes and evaluate to `Ok` of the filled prefix.
macro_rules! ok_command {
    ($buf:ident, [$($byte:expr),+]) => {{
        let mut len = 0;
        $(
            $buf[len] = $byte;
            len += 1;
        )+
        Ok(&$buf[..len])
    }};
}

pub mod pcd8544;
pub mod ssd1306;

/// Send an encoded command one byte at a time, stopping at the first bus failure.
fn send_bytes<DI>(iface: &mut DI, bytes: &[u8]) -> Result<(), DisplayError>
where
    DI: DisplayInterface,
{
    for &b in bytes {
        iface.send_command(b)?;
    }
    Ok(())
}
