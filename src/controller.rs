//! Per-chip knowledge: panel geometry, the power-on command sequence, and how a text cursor maps
//! onto the controller's RAM addressing.

use log::warn;

use crate::command::{pcd8544, ssd1306};
use crate::error::DisplayError;
use crate::interface::DisplayInterface;
use crate::registry::DeviceNames;

/// A display controller a text session can drive.
pub trait Controller {
    /// Short name used in log messages.
    const NAME: &'static str;
    /// Names the device registers under unless the config overrides them.
    const NAMES: DeviceNames;
    /// Addressable columns (segments) per line.
    const COLUMNS: u8;
    /// Text lines, one per 8-pixel RAM bank/page.
    const LINES: u8;
    /// Settling time after power is applied, before the first command.
    const POWER_UP_DELAY_MS: u16;

    /// Send the power-on command sequence. Every command is attempted; failures are logged and
    /// skipped so one bad transfer does not leave the panel completely unconfigured.
    fn init<DI>(&self, iface: &mut DI, contrast: Option<u8>)
    where
        DI: DisplayInterface;

    /// Point the RAM write address at column `col` of bank `line`.
    fn set_window<DI>(&self, iface: &mut DI, line: u8, col: u8) -> Result<(), DisplayError>
    where
        DI: DisplayInterface;

    fn set_contrast<DI>(&self, iface: &mut DI, contrast: u8) -> Result<(), DisplayError>
    where
        DI: DisplayInterface;

    fn set_inverted<DI>(&self, iface: &mut DI, inverted: bool) -> Result<(), DisplayError>
    where
        DI: DisplayInterface;

    /// Put the panel into its lowest-power state. RAM content is kept.
    fn power_off<DI>(&self, iface: &mut DI) -> Result<(), DisplayError>
    where
        DI: DisplayInterface;
}

/// Solomon Systech SSD1306 driving a 128x64 OLED, horizontal addressing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ssd1306;

impl Ssd1306 {
    const DEFAULT_CONTRAST: u8 = 0x80;
}

impl Controller for Ssd1306 {
    const NAME: &'static str = "ssd1306";
    const NAMES: DeviceNames = DeviceNames::new("ssd1306_devnum", "ssd1306_class", "ssd1306");
    const COLUMNS: u8 = ssd1306::NUM_SEGMENTS;
    const LINES: u8 = ssd1306::NUM_PAGES;
    const POWER_UP_DELAY_MS: u16 = 100;

    fn init<DI>(&self, iface: &mut DI, contrast: Option<u8>)
    where
        DI: DisplayInterface,
    {
        use crate::command::ssd1306::{AddressingMode, Command::*};

        #[cfg_attr(rustfmt, rustfmt_skip)]
        let sequence = [
            DisplayOn(false),
            SetClockDiv(0x80),
            SetMuxRatio(64),
            SetDisplayOffset(0),
            SetStartLine(0),
            ChargePump(true),
            SetAddressingMode(AddressingMode::Horizontal),
            SegmentRemap(true),
            ComScanReversed(true),
            SetComPins { alternative: true, left_right_remap: false },
            SetContrast(contrast.unwrap_or(Self::DEFAULT_CONTRAST)),
            SetPrecharge(1, 15),
            SetVcomhDeselect(0x20),
            EntireDisplayOn(false),
            Invert(false),
            DeactivateScroll,
            DisplayOn(true),
        ];
        for cmd in sequence.iter() {
            if let Err(e) = cmd.send(iface) {
                warn!("{}: init command {:?} failed: {}", Self::NAME, cmd, e);
            }
        }
    }

    fn set_window<DI>(&self, iface: &mut DI, line: u8, col: u8) -> Result<(), DisplayError>
    where
        DI: DisplayInterface,
    {
        ssd1306::Command::SetColumnAddress(col, ssd1306::SEGMENT_MAX).send(iface)?;
        ssd1306::Command::SetPageAddress(line, ssd1306::PAGE_MAX).send(iface)
    }

    fn set_contrast<DI>(&self, iface: &mut DI, contrast: u8) -> Result<(), DisplayError>
    where
        DI: DisplayInterface,
    {
        ssd1306::Command::SetContrast(contrast).send(iface)
    }

    fn set_inverted<DI>(&self, iface: &mut DI, inverted: bool) -> Result<(), DisplayError>
    where
        DI: DisplayInterface,
    {
        ssd1306::Command::Invert(inverted).send(iface)
    }

    fn power_off<DI>(&self, iface: &mut DI) -> Result<(), DisplayError>
    where
        DI: DisplayInterface,
    {
        ssd1306::Command::DisplayOn(false).send(iface)
    }
}

/// Philips PCD8544 driving the 84x48 LCD of the Nokia 5110.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pcd8544;

impl Pcd8544 {
    const DEFAULT_VOP: u8 = 0x31;
}

impl Controller for Pcd8544 {
    const NAME: &'static str = "nokia5110";
    const NAMES: DeviceNames =
        DeviceNames::new("nokia5110_devnum", "nokia5110_class", "nokia5110");
    const COLUMNS: u8 = pcd8544::NUM_COLUMNS;
    const LINES: u8 = pcd8544::NUM_BANKS;
    // The reset pulse on the SPI interface already covers power-up settling.
    const POWER_UP_DELAY_MS: u16 = 0;

    fn init<DI>(&self, iface: &mut DI, contrast: Option<u8>)
    where
        DI: DisplayInterface,
    {
        use crate::command::pcd8544::{Command, DisplayMode};

        let sequence = [
            Command::EXTENDED,
            Command::SetVop(contrast.unwrap_or(Self::DEFAULT_VOP)),
            Command::SetTempCoefficient(0),
            Command::SetBias(3),
            Command::BASIC,
            Command::DisplayControl(DisplayMode::Normal),
        ];
        for cmd in sequence.iter() {
            if let Err(e) = cmd.send(iface) {
                warn!("{}: init command {:?} failed: {}", Self::NAME, cmd, e);
            }
        }
    }

    fn set_window<DI>(&self, iface: &mut DI, line: u8, col: u8) -> Result<(), DisplayError>
    where
        DI: DisplayInterface,
    {
        pcd8544::Command::SetX(col).send(iface)?;
        pcd8544::Command::SetY(line).send(iface)
    }

    fn set_contrast<DI>(&self, iface: &mut DI, contrast: u8) -> Result<(), DisplayError>
    where
        DI: DisplayInterface,
    {
        // Vop lives in the extended set; refuse before switching sets.
        if contrast > 0x7F {
            return Err(DisplayError::InvalidArgument);
        }
        pcd8544::Command::EXTENDED.send(iface)?;
        pcd8544::Command::SetVop(contrast).send(iface)?;
        pcd8544::Command::BASIC.send(iface)
    }

    fn set_inverted<DI>(&self, iface: &mut DI, inverted: bool) -> Result<(), DisplayError>
    where
        DI: DisplayInterface,
    {
        let mode = if inverted {
            pcd8544::DisplayMode::Inverse
        } else {
            pcd8544::DisplayMode::Normal
        };
        pcd8544::Command::DisplayControl(mode).send(iface)
    }

    fn power_off<DI>(&self, iface: &mut DI) -> Result<(), DisplayError>
    where
        DI: DisplayInterface,
    {
        pcd8544::Command::FunctionSet {
            power_down: true,
            vertical: false,
            extended: false,
        }
        .send(iface)
    }
}
