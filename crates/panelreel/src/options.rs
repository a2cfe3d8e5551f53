//! Reel configuration, validated eagerly at `Reel::create`.

use panelreel_render::BorderMask;
use panelreel_term::style::Style;

/// Configuration for a reel, mirroring the original `panelreel_options`
/// struct field-for-field (spec §3).
#[derive(Debug, Clone, Copy)]
pub struct ReelOptions {
    pub min_supported_cols: u16,
    pub min_supported_rows: u16,
    pub max_supported_cols: u16,
    pub max_supported_rows: u16,
    pub toff: u16,
    pub roff: u16,
    pub boff: u16,
    pub loff: u16,
    pub infinitescroll: bool,
    pub circular: bool,
    pub bordermask: BorderMask,
    pub tabletmask: BorderMask,
    pub border_style: Style,
    pub tablet_style: Style,
    pub focused_style: Style,
}

impl Default for ReelOptions {
    fn default() -> Self {
        Self {
            min_supported_cols: 4,
            min_supported_rows: 4,
            max_supported_cols: 0,
            max_supported_rows: 0,
            toff: 0,
            roff: 0,
            boff: 0,
            loff: 0,
            infinitescroll: false,
            circular: false,
            bordermask: BorderMask::empty(),
            tabletmask: BorderMask::empty(),
            border_style: Style::PLAIN,
            tablet_style: Style::PLAIN,
            focused_style: Style::PLAIN,
        }
    }
}

impl ReelOptions {
    /// Check the invariants spec.md requires at construction time, returning
    /// the violated field's name on failure. A zero maximum means
    /// "unlimited" (spec §3) and is never compared against the minimum.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.circular && !self.infinitescroll {
            return Err("circular requires infinitescroll");
        }
        if self.max_supported_cols != 0 && self.max_supported_cols < self.min_supported_cols {
            return Err("max_supported_cols below min_supported_cols");
        }
        if self.max_supported_rows != 0 && self.max_supported_rows < self.min_supported_rows {
            return Err("max_supported_rows below min_supported_rows");
        }
        Ok(())
    }
}
