//! Read-only diagnostic view of PPU state, suitable for a future debugger UI.
//! Carries no behavior of its own; callers get a `Copy` value out of
//! `Ppu::snapshot()` and must not expect it to stay live-updated.

use super::registers::{Ctrl, Mask, Status};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PpuSnapshot {
    pub ctrl: Ctrl,
    pub mask: Mask,
    pub status: Status,
    pub v: u16,
    pub t: u16,
    pub fine_x: u8,
    pub write_toggle: bool,
    pub scanline: u16,
    pub dot: u16,
    pub frame: u64,
    pub oam_address: u8,
}
