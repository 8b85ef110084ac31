//! Attach-time configuration of a text device. Builder methods offer a declarative way to
//! override a setting or leave it at the behaviour of the stock drivers.

use crate::registry::DeviceNames;

/// What `print_string` does with a byte that has no glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphPolicy {
    /// Stop rendering and report `DisplayError::GlyphOutOfRange`.
    Abort,
    /// Log the byte and carry on with the next one.
    Skip,
}

/// What a write reports back when its payload was truncated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteCount {
    /// The number of bytes actually retained.
    Accepted,
    /// The number of bytes the caller asked to write.
    Requested,
}

/// How far a read may go into the retained buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadExtent {
    /// Up to the end of the last written text.
    Message,
    /// Up to the full buffer capacity; bytes past the text read back as zero.
    Capacity,
}

/// A configuration for a text device.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) contrast: Option<u8>,
    pub(crate) glyph_policy: GlyphPolicy,
    pub(crate) write_count: WriteCount,
    pub(crate) read_extent: ReadExtent,
    pub(crate) greeting: Option<&'static str>,
    pub(crate) farewell: Option<&'static str>,
    pub(crate) farewell_delay_ms: u16,
    pub(crate) names: Option<DeviceNames>,
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Create a configuration with the controller's stock contrast, aborting on unprintable
    /// bytes, reporting truncated write counts, reads bounded by the text, no greeting and an
    /// `"END!!!"` farewell shown for one second on detach.
    pub fn new() -> Self {
        Config {
            contrast: None,
            glyph_policy: GlyphPolicy::Abort,
            write_count: WriteCount::Accepted,
            read_extent: ReadExtent::Message,
            greeting: None,
            farewell: Some("END!!!"),
            farewell_delay_ms: 1000,
            names: None,
        }
    }

    /// Extend this `Config` to send a contrast value at init time instead of the controller
    /// default (0x80 for the SSD1306, Vop 0x31 for the PCD8544).
    pub fn contrast(self, contrast: u8) -> Self {
        Self {
            contrast: Some(contrast),
            ..self
        }
    }

    pub fn glyph_policy(self, glyph_policy: GlyphPolicy) -> Self {
        Self {
            glyph_policy,
            ..self
        }
    }

    pub fn write_count(self, write_count: WriteCount) -> Self {
        Self {
            write_count,
            ..self
        }
    }

    pub fn read_extent(self, read_extent: ReadExtent) -> Self {
        Self {
            read_extent,
            ..self
        }
    }

    /// Extend this `Config` to print `text` once the display is initialized. It is shown on the
    /// panel only; the retained buffer stays empty until the first write.
    pub fn greeting(self, text: &'static str) -> Self {
        Self {
            greeting: Some(text),
            ..self
        }
    }

    /// Text shown on detach before the panel is cleared, or `None` to skip it.
    pub fn farewell(self, text: Option<&'static str>) -> Self {
        Self {
            farewell: text,
            ..self
        }
    }

    pub fn farewell_delay_ms(self, ms: u16) -> Self {
        Self {
            farewell_delay_ms: ms,
            ..self
        }
    }

    /// Extend this `Config` to register the device under `names` rather than names derived
    /// from the controller.
    pub fn names(self, names: DeviceNames) -> Self {
        Self {
            names: Some(names),
            ..self
        }
    }
}
