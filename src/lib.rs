#![doc = r#"
Cycle-accurate NES CPU + PPU + bus core.

This crate exposes the emulator core modules for use by binaries and tests.

Modules:
- bus: address decode and cycle synchronization; ticks the PPU 3 dots per CPU access
- cartridge: iNES v1 loader and cartridge metadata; constructs a Mapper
- controller: NES controller abstraction
- core: owns CPU/PPU/Bus/cartridge and drives the frame loop
- cpu: cycle-timed 6502 interpreter
- error: the one fallible boundary (cartridge loading)
- mapper: Mapper trait and NROM (mapper 0) implementation
- ppu: per-dot PPU pipeline and CPU-visible register file

In tests, shared iNES builders are available under `crate::test_utils`.
"#]

pub mod bus;
pub mod cartridge;
pub mod controller;
pub mod core;
pub mod cpu;
pub mod error;
pub mod mapper;
pub mod ppu;

pub use bus::Bus;
pub use cartridge::Cartridge;
pub use core::Core;
pub use cpu::Cpu;
pub use error::CartridgeError;

#[cfg(test)]
pub mod test_utils;
