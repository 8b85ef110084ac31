//! The command set for the PCD8544, the controller of the Nokia 5110 LCD.
//!
//! The PCD8544 has two instruction sets selected by the H bit of `FunctionSet`. Vop, temperature
//! coefficient and bias are only understood in the extended set; display control and the X/Y
//! address commands only in the basic set. Callers are responsible for switching sets.

use super::send_bytes;
use crate::error::DisplayError;
use crate::interface::DisplayInterface;

pub const NUM_COLUMNS: u8 = 84;
pub const NUM_BANKS: u8 = 6;
pub const COLUMN_MAX: u8 = NUM_COLUMNS - 1;
pub const BANK_MAX: u8 = NUM_BANKS - 1;

/// Setting of the display configuration in the basic instruction set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// All segments off.
    Blank,
    /// All segments on.
    AllOn,
    /// Show RAM content.
    Normal,
    /// Show RAM content inverted.
    Inverse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Power-down, vertical addressing and extended instruction set flags.
    FunctionSet {
        power_down: bool,
        vertical: bool,
        extended: bool,
    },
    /// Extended set: operating voltage, which acts as the contrast. Range 0-127.
    SetVop(u8),
    /// Extended set: temperature coefficient. Range 0-3.
    SetTempCoefficient(u8),
    /// Extended set: bias system. Range 0-7; 3 is the 1:48 mux rate of the 5110 glass.
    SetBias(u8),
    /// Basic set.
    DisplayControl(DisplayMode),
    /// Basic set: RAM column address. Range 0-83.
    SetX(u8),
    /// Basic set: RAM bank address. Range 0-5.
    SetY(u8),
}

impl Command {
    /// The basic instruction set, powered up, horizontal addressing.
    pub const BASIC: Command = Command::FunctionSet {
        power_down: false,
        vertical: false,
        extended: false,
    };

    /// The extended instruction set, powered up, horizontal addressing.
    pub const EXTENDED: Command = Command::FunctionSet {
        power_down: false,
        vertical: false,
        extended: true,
    };

    pub fn send<DI>(self, iface: &mut DI) -> Result<(), DisplayError>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 1];
        let bytes = match self {
            Command::FunctionSet {
                power_down,
                vertical,
                extended,
            } => {
                let pd = (power_down as u8) << 2;
                let v = (vertical as u8) << 1;
                let h = extended as u8;
                ok_command!(arg_buf, [0x20 | pd | v | h])
            }
            Command::SetVop(vop) => match vop {
                0..=0x7F => ok_command!(arg_buf, [0x80 | vop]),
                _ => Err(DisplayError::InvalidArgument),
            },
            Command::SetTempCoefficient(tc) => match tc {
                0..=3 => ok_command!(arg_buf, [0x04 | tc]),
                _ => Err(DisplayError::InvalidArgument),
            },
            Command::SetBias(bias) => match bias {
                0..=7 => ok_command!(arg_buf, [0x10 | bias]),
                _ => Err(DisplayError::InvalidArgument),
            },
            Command::DisplayControl(mode) => ok_command!(
                arg_buf,
                [match mode {
                    DisplayMode::Blank => 0x08,
                    DisplayMode::AllOn => 0x09,
                    DisplayMode::Normal => 0x0C,
                    DisplayMode::Inverse => 0x0D,
                }]
            ),
            Command::SetX(x) => match x {
                0..=COLUMN_MAX => ok_command!(arg_buf, [0x80 | x]),
                _ => Err(DisplayError::InvalidArgument),
            },
            Command::SetY(y) => match y {
                0..=BANK_MAX => ok_command!(arg_buf, [0x40 | y]),
                _ => Err(DisplayError::InvalidArgument),
            },
        }?;
        send_bytes(iface, bytes)
    }
}
