/*!
Bus: address decode and cycle synchronization between the CPU, the PPU, the
OAM-DMA engine, the controllers, and the cartridge.

Every `read`/`write` first advances the PPU by exactly three dots (the
NTSC PPU:CPU ratio), then performs the access. This is the one invariant
the rest of the core depends on: nothing outside `Bus` ticks the PPU.

Address map (CPU):
- $0000-$1FFF: 2 KiB internal RAM, mirrored every $0800
- $2000-$3FFF: PPU registers, mirrored every 8 bytes
- $4000-$4013, $4015, $4017: APU; out of scope, reads return 0, writes are no-ops
- $4014: OAM-DMA trigger (write starts a transfer)
- $4016: controller 1 strobe/read (write also strobes controller 2)
- $4017: controller 2 read (shared with the APU frame-counter write above)
- $4018-$401F: CPU test mode registers; unused, reads return 0
- $4020-$FFFF: cartridge space, delegated to the mapper
*/

pub mod dma;
pub mod ram;

use dma::{CpuMemoryView, DmaController, OamWriter};
use ram::Ram;

use crate::cartridge::Cartridge;
use crate::controller::Controller;
use crate::ppu::Ppu;

const ACTIVITY_LOG_CAPACITY: usize = 32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    Read,
    Write,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BusActivity {
    pub address: u16,
    pub value: u8,
    pub kind: ActivityKind,
}

impl OamWriter for Ppu {
    fn write_oam_data(&mut self, value: u8) {
        self.dma_write_oam_byte(value);
    }
}

pub struct Bus {
    ram: Ram,
    ppu: Ppu,
    cartridge: Option<Cartridge>,
    controllers: [Controller; 2],
    dma: DmaController,
    cpu_cycle: u64,
    activity_log: Vec<BusActivity>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    pub fn new() -> Self {
        Self {
            ram: Ram::new(),
            ppu: Ppu::new(),
            cartridge: None,
            controllers: [Controller::new(), Controller::new()],
            dma: DmaController::new(),
            cpu_cycle: 0,
            activity_log: Vec::with_capacity(ACTIVITY_LOG_CAPACITY),
        }
    }

    pub fn attach_cartridge(&mut self, cartridge: Cartridge) {
        self.cartridge = Some(cartridge);
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn controller_mut(&mut self, index: usize) -> &mut Controller {
        &mut self.controllers[index]
    }

    // -------------------------------------------------------------
    // CPU-facing accessors. Each call ticks the PPU by 3 dots first.
    // -------------------------------------------------------------

    pub fn read(&mut self, addr: u16) -> u8 {
        self.tick_ppu();
        let value = self.read_no_tick(addr);
        self.log_activity(addr, value, ActivityKind::Read);
        self.cpu_cycle = self.cpu_cycle.wrapping_add(1);
        value
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.tick_ppu();
        self.write_no_tick(addr, value);
        self.log_activity(addr, value, ActivityKind::Write);
        self.cpu_cycle = self.cpu_cycle.wrapping_add(1);
    }

    /// Whether OAM-DMA is currently stalling the CPU. The Core must not call
    /// `Cpu::step` while this is true; instead it drives `step_dma_cycle`.
    pub fn dma_active(&self) -> bool {
        self.dma.is_active()
    }

    /// Advance one CPU cycle's worth of OAM-DMA: ticks the PPU 3 dots and
    /// performs one DMA micro-step (alignment, read, or write).
    pub fn step_dma_cycle(&mut self) {
        self.tick_ppu();
        let mut view = CpuMemoryView::from_parts(&mut self.ram, self.cartridge.as_mut(), &mut self.controllers);
        self.dma.step_one_cycle(&mut view, &mut self.ppu);
        self.cpu_cycle = self.cpu_cycle.wrapping_add(1);
    }

    /// Edge-triggered NMI request, sampled and cleared by the CPU at
    /// instruction boundaries.
    pub fn take_nmi_edge(&mut self) -> bool {
        self.ppu.take_nmi_request()
    }

    /// Level-triggered IRQ line. NROM never asserts one; mappers that do
    /// would report it here.
    pub fn irq_line(&self) -> bool {
        self.cartridge
            .as_ref()
            .map(|cart| cart.mapper.borrow().irq_pending())
            .unwrap_or(false)
    }

    pub fn take_frame_ended(&mut self) -> bool {
        self.ppu.take_frame_ended()
    }

    pub fn framebuffer(&self) -> &[u32; 256 * 240] {
        self.ppu.framebuffer()
    }

    pub fn ppu_snapshot(&self) -> crate::ppu::snapshot::PpuSnapshot {
        self.ppu.snapshot()
    }

    pub fn activity_log(&self) -> &[BusActivity] {
        &self.activity_log
    }

    pub fn clear_activity_log(&mut self) {
        self.activity_log.clear();
    }

    pub fn last_activity(&self) -> Option<BusActivity> {
        self.activity_log.last().copied()
    }

    fn log_activity(&mut self, address: u16, value: u8, kind: ActivityKind) {
        if self.activity_log.len() >= ACTIVITY_LOG_CAPACITY {
            self.activity_log.remove(0);
        }
        self.activity_log.push(BusActivity {
            address,
            value,
            kind,
        });
    }

    fn tick_ppu(&mut self) {
        if let Some(cart) = &self.cartridge {
            self.ppu.tick(cart);
            self.ppu.tick(cart);
            self.ppu.tick(cart);
        }
    }

    fn read_no_tick(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram.read(addr),
            0x2000..=0x3FFF => match &self.cartridge {
                Some(cart) => self.ppu.read_register(addr & 0x7, cart),
                None => 0,
            },
            0x4000..=0x4013 => 0,
            0x4014 => 0,
            0x4015 => 0,
            0x4016 => self.controllers[0].read(),
            0x4017 => self.controllers[1].read(),
            0x4018..=0x401F => 0,
            0x4020..=0x5FFF => 0,
            0x6000..=0x7FFF => self
                .cartridge
                .as_ref()
                .map(|cart| cart.cpu_read_prg_ram(addr))
                .unwrap_or(0),
            0x8000..=0xFFFF => self
                .cartridge
                .as_ref()
                .map(|cart| cart.cpu_read_prg_rom(addr))
                .unwrap_or(0xFF),
        }
    }

    fn write_no_tick(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram.write(addr, value),
            0x2000..=0x3FFF => {
                if let Some(cart) = &self.cartridge {
                    self.ppu.write_register(addr & 0x7, value, cart);
                }
            }
            0x4000..=0x4013 => {}
            0x4014 => self.dma.start(value, self.cpu_cycle),
            0x4015 => {}
            0x4016 => {
                self.controllers[0].write_strobe(value);
                self.controllers[1].write_strobe(value);
            }
            0x4017 => {}
            0x4018..=0x401F => {}
            0x4020..=0x5FFF => {}
            0x6000..=0x7FFF => {
                if let Some(cart) = &self.cartridge {
                    cart.cpu_write_prg_ram(addr, value);
                }
            }
            0x8000..=0xFFFF => {
                if let Some(cart) = &self.cartridge {
                    cart.cpu_write_prg_rom(addr, value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::build_nrom_with_prg;

    fn bus_with_prg(prg: &[u8]) -> Bus {
        let rom = build_nrom_with_prg(prg, 1, 1, None);
        let cart = Cartridge::from_ines_bytes(&rom).expect("parse cart");
        let mut bus = Bus::new();
        bus.attach_cartridge(cart);
        bus
    }

    #[test]
    fn ram_mirrors_across_0x0800_boundaries() {
        let mut bus = bus_with_prg(&[0xEA]);
        bus.write(0x0001, 0xAA);
        assert_eq!(bus.read(0x0801), 0xAA);
        assert_eq!(bus.read(0x1801), 0xAA);
    }

    #[test]
    fn ppu_register_mirrors_every_eight_bytes() {
        let mut bus = bus_with_prg(&[0xEA]);
        bus.write(0x2000, 0x80);
        let a = bus.read(0x2002);
        let b = bus.read(0x200A);
        assert_eq!(a, b);
    }

    #[test]
    fn each_cpu_access_advances_three_ppu_dots() {
        let mut bus = bus_with_prg(&[0xEA]);
        let before = bus.ppu_snapshot().dot;
        bus.read(0x0000);
        let after = bus.ppu_snapshot().dot;
        assert_eq!((after as i32 - before as i32).rem_euclid(341), 3);
    }

    #[test]
    fn controller_strobe_and_serial_read() {
        let mut bus = bus_with_prg(&[0xEA]);
        bus.controller_mut(0).set_state_mask((1 << 0) | (1 << 3)); // A, Start
        bus.write(0x4016, 1);
        bus.write(0x4016, 0);
        let expected = [1, 0, 0, 1, 0, 0, 0, 0];
        for &e in &expected {
            assert_eq!(bus.read(0x4016) & 1, e);
        }
    }

    #[test]
    fn oam_dma_copies_256_bytes_from_source_page() {
        let mut bus = bus_with_prg(&[0xEA]);
        for i in 0..=0xFFu16 {
            bus.write(0x0200 + i, i as u8);
        }
        bus.write(0x4014, 0x02);
        assert!(bus.dma_active());
        let mut cycles = 0u32;
        while bus.dma_active() {
            bus.step_dma_cycle();
            cycles += 1;
        }
        assert!(cycles == 513 || cycles == 514);
    }

    #[test]
    fn unmapped_expansion_area_reads_zero() {
        let mut bus = bus_with_prg(&[0xEA]);
        assert_eq!(bus.read(0x4020), 0);
    }

    #[test]
    fn activity_log_records_recent_accesses() {
        let mut bus = bus_with_prg(&[0xEA]);
        bus.clear_activity_log();
        bus.write(0x0010, 0x99);
        let last = bus.last_activity().expect("an activity was logged");
        assert_eq!(last.address, 0x0010);
        assert_eq!(last.value, 0x99);
        assert_eq!(last.kind, ActivityKind::Write);
    }
}
