//! The command set for the SSD1306.
//!
//! The display RAM of the SSD1306 is 128 segments wide and 8 pages tall, where each page is a
//! horizontal band of 8 pixel rows and each byte written to RAM is one vertical 8-pixel column of
//! the current page, least significant bit on top.

use super::send_bytes;
use crate::error::DisplayError;
use crate::interface::DisplayInterface;

pub const NUM_SEGMENTS: u8 = 128;
pub const NUM_PAGES: u8 = 8;
pub const SEGMENT_MAX: u8 = NUM_SEGMENTS - 1;
pub const PAGE_MAX: u8 = NUM_PAGES - 1;

/// How the RAM address pointer moves after each data byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    /// Column first, wrapping to the next page at the end of the column window.
    Horizontal,
    /// Page first, wrapping to the next column at the end of the page window.
    Vertical,
    /// Column only; the page never changes on its own.
    Page,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Turn the panel on (`true`) or put it to sleep.
    DisplayOn(bool),
    /// Set the display clock divide ratio (low nibble, minus one) and oscillator frequency (high
    /// nibble).
    SetClockDiv(u8),
    /// Set the multiplex ratio, the number of active COM lines. Range 16-64.
    SetMuxRatio(u8),
    /// Set the vertical shift of COM lines. Range 0-63.
    SetDisplayOffset(u8),
    /// Set the RAM row shown at the top of the panel. Range 0-63.
    SetStartLine(u8),
    /// Enable or disable the internal charge pump. Modules without an external VCC need it on.
    ChargePump(bool),
    SetAddressingMode(AddressingMode),
    /// Map column address 127 to SEG0 when `true`, mirroring the image horizontally.
    SegmentRemap(bool),
    /// Scan COM lines from COM[N-1] to COM0 when `true`, mirroring the image vertically.
    ComScanReversed(bool),
    /// COM pin hardware configuration: alternative (interleaved) pin layout and left/right remap.
    SetComPins { alternative: bool, left_right_remap: bool },
    /// Set the contrast. Range 0-255.
    SetContrast(u8),
    /// Set the pre-charge phase 1 and phase 2 lengths in DCLKs. Each range 1-15.
    SetPrecharge(u8, u8),
    /// Set the VCOMH deselect level. Only bits 4-6 are meaningful (0x00, 0x20, 0x30).
    SetVcomhDeselect(u8),
    /// Light every pixel regardless of RAM (`true`), or resume showing RAM content.
    EntireDisplayOn(bool),
    /// Invert RAM content on the panel.
    Invert(bool),
    DeactivateScroll,
    /// Set the column window for horizontal/vertical addressing. Range 0-127, start <= end.
    SetColumnAddress(u8, u8),
    /// Set the page window for horizontal/vertical addressing. Range 0-7, start <= end.
    SetPageAddress(u8, u8),
}

impl Command {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), DisplayError>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 3];
        let bytes = match self {
            Command::DisplayOn(on) => ok_command!(arg_buf, [if on { 0xAF } else { 0xAE }]),
            Command::SetClockDiv(div) => ok_command!(arg_buf, [0xD5, div]),
            Command::SetMuxRatio(ratio) => match ratio {
                16..=64 => ok_command!(arg_buf, [0xA8, ratio - 1]),
                _ => Err(DisplayError::InvalidArgument),
            },
            Command::SetDisplayOffset(offset) => match offset {
                0..=63 => ok_command!(arg_buf, [0xD3, offset]),
                _ => Err(DisplayError::InvalidArgument),
            },
            Command::SetStartLine(line) => match line {
                0..=63 => ok_command!(arg_buf, [0x40 | line]),
                _ => Err(DisplayError::InvalidArgument),
            },
            Command::ChargePump(on) => ok_command!(arg_buf, [0x8D, if on { 0x14 } else { 0x10 }]),
            Command::SetAddressingMode(mode) => {
                let m = match mode {
                    AddressingMode::Horizontal => 0x00,
                    AddressingMode::Vertical => 0x01,
                    AddressingMode::Page => 0x02,
                };
                ok_command!(arg_buf, [0x20, m])
            }
            Command::SegmentRemap(remap) => ok_command!(arg_buf, [0xA0 | remap as u8]),
            Command::ComScanReversed(rev) => ok_command!(arg_buf, [if rev { 0xC8 } else { 0xC0 }]),
            Command::SetComPins {
                alternative,
                left_right_remap,
            } => {
                let alt = (alternative as u8) << 4;
                let remap = (left_right_remap as u8) << 5;
                ok_command!(arg_buf, [0xDA, 0x02 | alt | remap])
            }
            Command::SetContrast(contrast) => ok_command!(arg_buf, [0x81, contrast]),
            Command::SetPrecharge(phase_1, phase_2) => match (phase_1, phase_2) {
                (1..=15, 1..=15) => ok_command!(arg_buf, [0xD9, phase_2 << 4 | phase_1]),
                _ => Err(DisplayError::InvalidArgument),
            },
            Command::SetVcomhDeselect(level) => match level & !0x70 {
                0 => ok_command!(arg_buf, [0xDB, level]),
                _ => Err(DisplayError::InvalidArgument),
            },
            Command::EntireDisplayOn(on) => ok_command!(arg_buf, [0xA4 | on as u8]),
            Command::Invert(inv) => ok_command!(arg_buf, [0xA6 | inv as u8]),
            Command::DeactivateScroll => ok_command!(arg_buf, [0x2E]),
            Command::SetColumnAddress(start, end) => match (start, end) {
                (0..=SEGMENT_MAX, 0..=SEGMENT_MAX) if start <= end => {
                    ok_command!(arg_buf, [0x21, start, end])
                }
                _ => Err(DisplayError::InvalidArgument),
            },
            Command::SetPageAddress(start, end) => match (start, end) {
                (0..=PAGE_MAX, 0..=PAGE_MAX) if start <= end => {
                    ok_command!(arg_buf, [0x22, start, end])
                }
                _ => Err(DisplayError::InvalidArgument),
            },
        }?;
        send_bytes(iface, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::{Sent, TestSpyInterface};

    fn sent_by(cmd: Command) -> Vec<u8> {
        let mut di = TestSpyInterface::new();
        cmd.send(&mut di).unwrap();
        di.commands()
    }

    #[test]
    fn display_on_off() {
        assert_eq!(sent_by(Command::DisplayOn(true)), [0xAF]);
        assert_eq!(sent_by(Command::DisplayOn(false)), [0xAE]);
    }

    #[test]
    fn set_mux_ratio() {
        assert_eq!(sent_by(Command::SetMuxRatio(64)), [0xA8, 0x3F]);
        assert_eq!(sent_by(Command::SetMuxRatio(16)), [0xA8, 0x0F]);
        let mut di = TestSpyInterface::new();
        assert_eq!(
            Command::SetMuxRatio(15).send(&mut di),
            Err(DisplayError::InvalidArgument)
        );
        assert_eq!(
            Command::SetMuxRatio(65).send(&mut di),
            Err(DisplayError::InvalidArgument)
        );
        di.check_multi(&[]);
    }

    #[test]
    fn start_line_and_offset() {
        assert_eq!(sent_by(Command::SetStartLine(0)), [0x40]);
        assert_eq!(sent_by(Command::SetStartLine(63)), [0x7F]);
        assert_eq!(sent_by(Command::SetDisplayOffset(0)), [0xD3, 0x00]);
        let mut di = TestSpyInterface::new();
        assert!(Command::SetStartLine(64).send(&mut di).is_err());
        assert!(Command::SetDisplayOffset(64).send(&mut di).is_err());
    }

    #[test]
    fn charge_pump_and_addressing() {
        assert_eq!(sent_by(Command::ChargePump(true)), [0x8D, 0x14]);
        assert_eq!(sent_by(Command::ChargePump(false)), [0x8D, 0x10]);
        assert_eq!(
            sent_by(Command::SetAddressingMode(AddressingMode::Horizontal)),
            [0x20, 0x00]
        );
        assert_eq!(
            sent_by(Command::SetAddressingMode(AddressingMode::Page)),
            [0x20, 0x02]
        );
    }

    #[test]
    fn remapping() {
        assert_eq!(sent_by(Command::SegmentRemap(true)), [0xA1]);
        assert_eq!(sent_by(Command::SegmentRemap(false)), [0xA0]);
        assert_eq!(sent_by(Command::ComScanReversed(true)), [0xC8]);
        assert_eq!(sent_by(Command::ComScanReversed(false)), [0xC0]);
        assert_eq!(
            sent_by(Command::SetComPins {
                alternative: true,
                left_right_remap: false
            }),
            [0xDA, 0x12]
        );
        assert_eq!(
            sent_by(Command::SetComPins {
                alternative: false,
                left_right_remap: true
            }),
            [0xDA, 0x22]
        );
    }

    #[test]
    fn precharge() {
        assert_eq!(sent_by(Command::SetPrecharge(1, 15)), [0xD9, 0xF1]);
        assert_eq!(sent_by(Command::SetPrecharge(2, 2)), [0xD9, 0x22]);
        let mut di = TestSpyInterface::new();
        assert!(Command::SetPrecharge(0, 2).send(&mut di).is_err());
        assert!(Command::SetPrecharge(2, 16).send(&mut di).is_err());
    }

    #[test]
    fn vcomh_deselect() {
        assert_eq!(sent_by(Command::SetVcomhDeselect(0x20)), [0xDB, 0x20]);
        assert_eq!(sent_by(Command::SetVcomhDeselect(0x30)), [0xDB, 0x30]);
        let mut di = TestSpyInterface::new();
        assert!(Command::SetVcomhDeselect(0x21).send(&mut di).is_err());
    }

    #[test]
    fn display_modes() {
        assert_eq!(sent_by(Command::EntireDisplayOn(false)), [0xA4]);
        assert_eq!(sent_by(Command::EntireDisplayOn(true)), [0xA5]);
        assert_eq!(sent_by(Command::Invert(false)), [0xA6]);
        assert_eq!(sent_by(Command::Invert(true)), [0xA7]);
        assert_eq!(sent_by(Command::DeactivateScroll), [0x2E]);
    }

    #[test]
    fn column_and_page_windows() {
        assert_eq!(sent_by(Command::SetColumnAddress(6, 127)), [0x21, 6, 127]);
        assert_eq!(sent_by(Command::SetPageAddress(2, 7)), [0x22, 2, 7]);
        let mut di = TestSpyInterface::new();
        assert!(Command::SetColumnAddress(0, 128).send(&mut di).is_err());
        assert!(Command::SetColumnAddress(9, 8).send(&mut di).is_err());
        assert!(Command::SetPageAddress(0, 8).send(&mut di).is_err());
        assert!(Command::SetPageAddress(3, 2).send(&mut di).is_err());
    }

    #[test]
    fn all_bytes_are_commands() {
        let mut di = TestSpyInterface::new();
        Command::SetContrast(0x80).send(&mut di).unwrap();
        di.check_multi(&[Sent::Cmd(0x81), Sent::Cmd(0x80)]);
    }

    #[test]
    fn bus_failure_stops_mid_command() {
        let mut di = TestSpyInterface::new();
        di.fail_after(1);
        assert_eq!(
            Command::SetColumnAddress(0, 127).send(&mut di),
            Err(DisplayError::Transport(
                crate::error::TransportError::BusFailure
            ))
        );
        di.check_multi(&[Sent::Cmd(0x21)]);
    }
}
