//! Styling primitives for the drawing surface.
//!
//! Colour is carried solely by a `u16` pair index, never baked into the
//! attribute bitflags — mirroring `outcurses.h`'s separation of `attr_t` from
//! `int pair`, so a caller can restyle every cell sharing a pair without
//! touching the attribute bits that control bold/reverse/etc.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Attr: u8 {
        const BOLD = 0b0001;
        const REVERSE = 0b0010;
        const DIM = 0b0100;
        const UNDERLINE = 0b1000;
    }
}

/// An attribute/colour-pair combination applied to a run of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
    pub attr: Attr,
    pub pair: u16,
}

impl Style {
    pub const PLAIN: Style = Style {
        attr: Attr::empty(),
        pair: 0,
    };

    pub fn new(attr: Attr, pair: u16) -> Self {
        Self { attr, pair }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::PLAIN
    }
}

/// Resolves a colour-pair index to actual foreground/background colours.
/// The crossterm backend never hardcodes colour; it always goes through a
/// caller-supplied palette so pair 0 can mean one thing for one reel and
/// something else for another.
pub trait Palette: Send + Sync {
    fn resolve(&self, pair: u16) -> (crossterm::style::Color, crossterm::style::Color);
}

/// A palette that maps every pair to the terminal's reset colours.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPalette;

impl Palette for DefaultPalette {
    fn resolve(&self, _pair: u16) -> (crossterm::style::Color, crossterm::style::Color) {
        (crossterm::style::Color::Reset, crossterm::style::Color::Reset)
    }
}
