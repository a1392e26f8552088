//! CPU-visible PPU control/mask/status bit layouts.

use bitflags::bitflags;

bitflags! {
    /// PPUCTRL ($2000, write-only).
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct Ctrl: u8 {
        const NAMETABLE_LO     = 0b0000_0001;
        const NAMETABLE_HI     = 0b0000_0010;
        const VRAM_INCREMENT   = 0b0000_0100;
        const SPRITE_TABLE     = 0b0000_1000;
        const BACKGROUND_TABLE = 0b0001_0000;
        const SPRITE_SIZE      = 0b0010_0000;
        const MASTER_SLAVE     = 0b0100_0000;
        const ENABLE_NMI       = 0b1000_0000;
    }

    /// PPUMASK ($2001, write-only).
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct Mask: u8 {
        const GRAYSCALE          = 0b0000_0001;
        const SHOW_BG_LEFT       = 0b0000_0010;
        const SHOW_SPRITES_LEFT  = 0b0000_0100;
        const SHOW_BACKGROUND    = 0b0000_1000;
        const SHOW_SPRITES       = 0b0001_0000;
        const EMPHASIZE_RED      = 0b0010_0000;
        const EMPHASIZE_GREEN    = 0b0100_0000;
        const EMPHASIZE_BLUE     = 0b1000_0000;
    }

    /// PPUSTATUS ($2002, read-only). Bits 0-4 are open-bus in hardware; this
    /// core leaves them clear.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct Status: u8 {
        const SPRITE_OVERFLOW = 0b0010_0000;
        const SPRITE_ZERO_HIT = 0b0100_0000;
        const VBLANK          = 0b1000_0000;
    }
}

impl Ctrl {
    #[inline]
    pub fn vram_increment_step(self) -> u16 {
        if self.contains(Ctrl::VRAM_INCREMENT) { 32 } else { 1 }
    }

    #[inline]
    pub fn sprite_height(self) -> u16 {
        if self.contains(Ctrl::SPRITE_SIZE) { 16 } else { 8 }
    }

    #[inline]
    pub fn background_pattern_base(self) -> u16 {
        if self.contains(Ctrl::BACKGROUND_TABLE) { 0x1000 } else { 0x0000 }
    }

    #[inline]
    pub fn sprite_pattern_base_8x8(self) -> u16 {
        if self.contains(Ctrl::SPRITE_TABLE) { 0x1000 } else { 0x0000 }
    }
}
