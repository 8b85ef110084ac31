//! A text session on one panel: a cursor over `Controller::LINES` text lines of
//! `Controller::COLUMNS` pixel columns, and the rendering of printable ASCII at that cursor.

use hal::blocking::delay::DelayMs;
use itertools::iproduct;
use log::{debug, warn};

use crate::config::GlyphPolicy;
use crate::controller::Controller;
use crate::error::DisplayError;
use crate::font::{self, FONT_WIDTH, GLYPH_ADVANCE};
use crate::interface::DisplayInterface;

/// A controller together with the interface it is wired to and the text cursor. The cursor
/// always addresses a valid cell: `line < C::LINES` and `col < C::COLUMNS`.
pub struct Session<DI, C> {
    iface: DI,
    controller: C,
    current_line: u8,
    cursor_pos: u8,
    font_size: u8,
    glyph_policy: GlyphPolicy,
}

impl<DI, C> Session<DI, C>
where
    DI: DisplayInterface,
    C: Controller,
{
    /// Last valid text line.
    pub const MAX_LINE: u8 = C::LINES - 1;
    /// One past the last valid column.
    pub const MAX_SEG: u8 = C::COLUMNS;

    /// Wrap an interface. Nothing is sent until `initialize` or the first drawing call.
    pub fn new(iface: DI, controller: C, glyph_policy: GlyphPolicy) -> Self {
        Session {
            iface,
            controller,
            current_line: 0,
            cursor_pos: 0,
            font_size: FONT_WIDTH,
            glyph_policy,
        }
    }

    /// Wait out the controller's power-up time, send its init sequence and blank the panel.
    /// Init commands are best-effort; only a failure to clear is reported.
    pub fn initialize(
        &mut self,
        delay: &mut dyn DelayMs<u16>,
        contrast: Option<u8>,
    ) -> Result<(), DisplayError> {
        if C::POWER_UP_DELAY_MS > 0 {
            delay.delay_ms(C::POWER_UP_DELAY_MS);
        }
        self.controller.init(&mut self.iface, contrast);
        self.clear()
    }

    /// Blank the whole panel and leave the cursor at the top left.
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.set_cursor(0, 0)?;
        // The window spans the full RAM, so the address pointer wraps back to (0, 0).
        for (line, col) in iproduct!(0..C::LINES, 0..C::COLUMNS) {
            self.iface.send_data(0x00).map_err(|e| {
                debug!("{}: clear stopped at line {} column {}", C::NAME, line, col);
                e
            })?;
        }
        Ok(())
    }

    /// Move the cursor to column `col` of text line `line`. A position outside the panel is
    /// ignored and the cursor stays where it was.
    pub fn set_cursor(&mut self, line: u8, col: u8) -> Result<(), DisplayError> {
        if line > Self::MAX_LINE || col >= Self::MAX_SEG {
            debug!("{}: ignoring cursor position {},{}", C::NAME, line, col);
            return Ok(());
        }
        self.current_line = line;
        self.cursor_pos = col;
        self.controller.set_window(&mut self.iface, line, col)
    }

    /// Move to the start of the next text line, wrapping from the bottom line to the top.
    pub fn advance_line(&mut self) -> Result<(), DisplayError> {
        let next = (self.current_line + 1) % (Self::MAX_LINE + 1);
        self.set_cursor(next, 0)
    }

    /// Draw one byte at the cursor. `\n` moves to the next line. A glyph that would not fit in
    /// the rest of the line goes to the start of the next one.
    pub fn print_char(&mut self, c: u8) -> Result<(), DisplayError> {
        if c == b'\n' {
            return self.advance_line();
        }
        let glyph = font::glyph(c)?;
        if self.cursor_pos + GLYPH_ADVANCE >= Self::MAX_SEG {
            self.advance_line()?;
        }
        for &column in glyph.iter() {
            self.iface.send_data(column)?;
        }
        // Inter-character gap.
        self.iface.send_data(0x00)?;
        self.cursor_pos += GLYPH_ADVANCE;
        Ok(())
    }

    /// Blank the panel and draw `text` from the top left.
    pub fn print_string(&mut self, text: &[u8]) -> Result<(), DisplayError> {
        self.clear()?;
        self.set_cursor(0, 0)?;
        for &c in text {
            match self.print_char(c) {
                Err(DisplayError::GlyphOutOfRange(b)) if self.glyph_policy == GlyphPolicy::Skip => {
                    warn!("{}: skipping unprintable byte {:#04x}", C::NAME, b);
                }
                other => other?,
            }
        }
        Ok(())
    }

    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        self.controller.set_contrast(&mut self.iface, contrast)
    }

    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.controller.set_inverted(&mut self.iface, inverted)
    }

    pub fn power_off(&mut self) -> Result<(), DisplayError> {
        self.controller.power_off(&mut self.iface)
    }

    /// The cursor as `(line, column)`.
    pub fn position(&self) -> (u8, u8) {
        (self.current_line, self.cursor_pos)
    }

    /// Glyph width in pixel columns.
    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    /// Consume the session and hand back the interface.
    pub fn release(self) -> DI {
        self.iface
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::controller::{Pcd8544, Ssd1306};
    use crate::error::TransportError;
    use crate::interface::test_spy::{Sent, TestDelay, TestSpyInterface};

    fn ssd1306() -> (Session<TestSpyInterface, Ssd1306>, TestSpyInterface) {
        let di = TestSpyInterface::new();
        let spy = di.split();
        (Session::new(di, Ssd1306, GlyphPolicy::Abort), spy)
    }

    fn nokia() -> (Session<TestSpyInterface, Pcd8544>, TestSpyInterface) {
        let di = TestSpyInterface::new();
        let spy = di.split();
        (Session::new(di, Pcd8544, GlyphPolicy::Abort), spy)
    }

    #[test]
    fn initialize_waits_inits_and_clears() {
        let (mut s, spy) = ssd1306();
        let mut delay = TestDelay::default();
        s.initialize(&mut delay, None).unwrap();
        assert_eq!(delay.total_ms, 100);
        let cmds = spy.commands();
        assert_eq!(cmds[0], 0xAE);
        assert_eq!(&cmds[cmds.len() - 6..], [0x21, 0, 127, 0x22, 0, 7]);
        assert_eq!(spy.data(), vec![0u8; 1024]);
        assert_eq!(s.position(), (0, 0));
    }

    #[test]
    fn initialize_nokia_has_no_power_up_wait() {
        let (mut s, spy) = nokia();
        let mut delay = TestDelay::default();
        s.initialize(&mut delay, Some(0x3F)).unwrap();
        assert_eq!(delay.total_ms, 0);
        assert_eq!(
            spy.commands(),
            [0x21, 0xBF, 0x04, 0x13, 0x20, 0x0C, 0x80, 0x40]
        );
        assert_eq!(spy.data().len(), 84 * 6);
    }

    #[test]
    fn clear_blanks_every_cell_and_homes() {
        let (mut s, spy) = nokia();
        s.set_cursor(3, 40).unwrap();
        spy.clear();
        s.clear().unwrap();
        spy.check_multi(&[Sent::Cmd(0x80), Sent::Cmd(0x40), Sent::Data(vec![0; 504])]);
        assert_eq!(s.position(), (0, 0));
    }

    #[test]
    fn clear_stops_on_bus_failure() {
        let (mut s, spy) = ssd1306();
        spy.fail_after(6 + 10);
        assert_eq!(
            s.clear(),
            Err(DisplayError::Transport(TransportError::BusFailure))
        );
        assert_eq!(spy.data().len(), 10);
    }

    #[test]
    fn set_cursor_sends_window() {
        let (mut s, spy) = ssd1306();
        s.set_cursor(2, 10).unwrap();
        assert_eq!(s.position(), (2, 10));
        spy.check_multi(&[
            Sent::Cmd(0x21),
            Sent::Cmd(10),
            Sent::Cmd(127),
            Sent::Cmd(0x22),
            Sent::Cmd(2),
            Sent::Cmd(7),
        ]);
    }

    #[test]
    fn set_cursor_out_of_range_is_ignored() {
        let (mut s, spy) = ssd1306();
        s.set_cursor(1, 5).unwrap();
        spy.clear();
        s.set_cursor(8, 0).unwrap();
        s.set_cursor(0, 128).unwrap();
        assert_eq!(s.position(), (1, 5));
        spy.check_multi(&[]);

        let (mut n, spy) = nokia();
        n.set_cursor(6, 0).unwrap();
        n.set_cursor(0, 84).unwrap();
        assert_eq!(n.position(), (0, 0));
        spy.check_multi(&[]);
    }

    #[test]
    fn advance_line_wraps_to_top() {
        let (mut s, _spy) = ssd1306();
        s.set_cursor(7, 30).unwrap();
        s.advance_line().unwrap();
        assert_eq!(s.position(), (0, 0));
        s.advance_line().unwrap();
        assert_eq!(s.position(), (1, 0));

        let (mut n, _spy) = nokia();
        n.set_cursor(5, 0).unwrap();
        n.advance_line().unwrap();
        assert_eq!(n.position(), (0, 0));
    }

    #[test]
    fn print_char_draws_glyph_and_gap() {
        let (mut s, spy) = ssd1306();
        s.print_char(b'A').unwrap();
        spy.check_multi(&[Sent::Data(vec![0x7E, 0x11, 0x11, 0x11, 0x7E, 0x00])]);
        assert_eq!(s.position(), (0, 6));
    }

    #[test]
    fn print_char_newline() {
        let (mut s, spy) = ssd1306();
        s.set_cursor(0, 30).unwrap();
        spy.clear();
        s.print_char(b'\n').unwrap();
        assert_eq!(s.position(), (1, 0));
        assert!(spy.data().is_empty());
    }

    #[test]
    fn print_char_wraps_before_overflowing() {
        let (mut s, spy) = ssd1306();
        // 122 + 6 reaches the edge: the glyph goes to the next line.
        s.set_cursor(0, 122).unwrap();
        spy.clear();
        s.print_char(b'x').unwrap();
        assert_eq!(s.position(), (1, 6));
        assert_eq!(&spy.commands()[..], [0x21, 0, 127, 0x22, 1, 7]);

        // 121 + 6 still fits.
        s.set_cursor(3, 121).unwrap();
        s.print_char(b'x').unwrap();
        assert_eq!(s.position(), (3, 127));
    }

    #[test]
    fn print_char_unprintable_sends_nothing() {
        let (mut s, spy) = ssd1306();
        s.set_cursor(0, 122).unwrap();
        spy.clear();
        assert_eq!(s.print_char(0x7F), Err(DisplayError::GlyphOutOfRange(0x7F)));
        assert_eq!(s.print_char(b'\r'), Err(DisplayError::GlyphOutOfRange(b'\r')));
        spy.check_multi(&[]);
        assert_eq!(s.position(), (0, 122));
    }

    #[test]
    fn print_string_hello_world() {
        let (mut s, spy) = ssd1306();
        s.print_string(b"Hello World\n").unwrap();
        assert_eq!(s.position(), (1, 0));
        // Clear, then 11 glyphs of 6 columns each.
        assert_eq!(spy.data().len(), 1024 + 11 * 6);
    }

    #[test]
    fn print_string_wraps_long_text() {
        let (mut n, _spy) = nokia();
        // 13 glyphs fit in 84 columns (13 * 6 = 78, the 14th would reach 84).
        n.print_string(&[b'a'; 14]).unwrap();
        assert_eq!(n.position(), (1, 6));
    }

    #[test]
    fn print_string_aborts_on_unprintable() {
        let (mut s, spy) = ssd1306();
        assert_eq!(
            s.print_string(b"ab\x01cd"),
            Err(DisplayError::GlyphOutOfRange(0x01))
        );
        assert_eq!(spy.data().len(), 1024 + 2 * 6);
        assert_eq!(s.position(), (0, 12));
    }

    #[test]
    fn print_string_skips_unprintable_when_asked() {
        let di = TestSpyInterface::new();
        let spy = di.split();
        let mut s = Session::new(di, Ssd1306, GlyphPolicy::Skip);
        s.print_string(b"ab\x01cd").unwrap();
        assert_eq!(spy.data().len(), 1024 + 4 * 6);
        assert_eq!(s.position(), (0, 24));
    }

    #[test]
    fn print_string_is_idempotent() {
        let (mut s, spy) = ssd1306();
        s.print_string(b"same text").unwrap();
        let first = spy.sent();
        let pos = s.position();
        spy.clear();
        s.print_string(b"same text").unwrap();
        assert_eq!(spy.sent(), first);
        assert_eq!(s.position(), pos);
    }

    #[test]
    fn passthrough_commands() {
        let (mut s, spy) = ssd1306();
        s.set_contrast(0x20).unwrap();
        s.set_inverted(false).unwrap();
        s.power_off().unwrap();
        assert_eq!(spy.commands(), [0x81, 0x20, 0xA6, 0xAE]);
        assert_eq!(s.font_size(), 5);
        let _di: TestSpyInterface = s.release();
    }

    proptest! {
        #[test]
        fn cursor_stays_on_panel(text in proptest::collection::vec(0x20u8..=0x7E, 0..400)) {
            let (mut s, _spy) = ssd1306();
            for &c in &text {
                s.print_char(c).unwrap();
                let (line, col) = s.position();
                prop_assert!(line <= Session::<TestSpyInterface, Ssd1306>::MAX_LINE);
                prop_assert!(col < Session::<TestSpyInterface, Ssd1306>::MAX_SEG);
            }
        }

        #[test]
        fn cursor_stays_on_nokia_panel(
            text in proptest::collection::vec(prop_oneof![Just(b'\n'), 0x20u8..=0x7E], 0..200)
        ) {
            let (mut n, _spy) = nokia();
            n.print_string(&text).unwrap();
            let (line, col) = n.position();
            prop_assert!(line < 6);
            prop_assert!(col < 84);
        }

        #[test]
        fn each_overflow_advances_one_line(count in 1usize..120) {
            let (mut s, _spy) = ssd1306();
            for _ in 0..count {
                s.print_char(b'#').unwrap();
            }
            // 21 glyphs fit on a 128-column line.
            let wraps = (count - 1) / 21;
            prop_assert_eq!(s.position().0 as usize, wraps % 8);
        }
    }
}
