//! Core: owns the CPU, the Bus (which itself owns the PPU, OAM-DMA engine,
//! controllers, and the cartridge handle), and drives the "run until a frame
//! completes" loop that a frontend calls once per video frame.

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::controller::Controller;
use crate::cpu::Cpu;
use crate::ppu::snapshot::PpuSnapshot;

pub struct Core {
    cpu: Cpu,
    bus: Bus,
}

impl Default for Core {
    fn default() -> Self {
        Self::new()
    }
}

impl Core {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            bus: Bus::new(),
        }
    }

    /// Installs a cartridge and resets the CPU and PPU to their power-up
    /// state. PRG-RAM inside the cartridge is untouched.
    pub fn reset(&mut self, cartridge: Cartridge) {
        self.bus = Bus::new();
        self.bus.attach_cartridge(cartridge);
        self.cpu.reset(&mut self.bus);
    }

    /// Runs the core until the PPU completes one frame (scanline 261 → 0
    /// wraparound), stepping the OAM-DMA engine instead of the CPU while a
    /// transfer is in progress.
    pub fn tick_until_vblank(&mut self) {
        loop {
            if self.bus.dma_active() {
                self.bus.step_dma_cycle();
            } else {
                self.cpu.step(&mut self.bus);
            }
            if self.bus.take_frame_ended() {
                break;
            }
        }
    }

    pub fn framebuffer(&self) -> &[u32; 256 * 240] {
        self.bus.framebuffer()
    }

    pub fn ppu_snapshot(&self) -> PpuSnapshot {
        self.bus.ppu_snapshot()
    }

    pub fn controller_mut(&mut self, index: usize) -> &mut Controller {
        self.bus.controller_mut(index)
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::build_nrom_with_prg;

    #[test]
    fn reset_loads_pc_from_vector() {
        let rom = build_nrom_with_prg(&[0xEA], 1, 1, Some((0x8005, 0x8000, 0x8000)));
        let cart = Cartridge::from_ines_bytes(&rom).unwrap();
        let mut core = Core::new();
        core.reset(cart);
        assert_eq!(core.cpu().pc(), 0x8005);
    }

    #[test]
    fn tick_until_vblank_produces_exactly_one_frame_edge() {
        // An infinite loop (JMP $8000) keeps the CPU busy while the PPU
        // free-runs to the first frame boundary.
        let prg = [0x4C, 0x00, 0x80]; // JMP $8000
        let rom = build_nrom_with_prg(&prg, 1, 1, None);
        let cart = Cartridge::from_ines_bytes(&rom).unwrap();
        let mut core = Core::new();
        core.reset(cart);
        core.tick_until_vblank();
        assert_eq!(core.ppu_snapshot().frame, 1);
    }
}
